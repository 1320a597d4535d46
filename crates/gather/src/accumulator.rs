use crate::archive::{find_archive, find_image_folder};
use crate::document::{ClusterReport, ReportDocument};
use crate::tools::{parse_operator_listing, ExternalTools, ToolOutcome};
use crate::Result;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use sweep_reconcile::{bare_operator_name, normalize_reference_name};

/// Normalized reference sets the accumulator consults for every installed
/// operator. Membership tests use the bare, lower-cased operator name; the
/// sets themselves keep the reference lists' casing.
pub struct ClassificationSets {
    certified: HashSet<String>,
    redhat: HashSet<String>,
}

impl ClassificationSets {
    /// Build from raw combined reference names, normalizing each entry.
    pub fn from_combined(
        certified: impl IntoIterator<Item = String>,
        redhat: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            certified: certified
                .into_iter()
                .map(|name| normalize_reference_name(&name))
                .collect(),
            redhat: redhat
                .into_iter()
                .map(|name| normalize_reference_name(&name))
                .collect(),
        }
    }

    fn is_certified(&self, reported: &str) -> bool {
        self.certified.contains(&bare_operator_name(reported))
    }

    fn is_redhat(&self, reported: &str) -> bool {
        self.redhat.contains(&bare_operator_name(reported))
    }
}

/// One row of the filtered case export.
#[derive(Debug, Deserialize)]
struct CaseRow {
    #[serde(rename = "Case Number")]
    case_number: String,
    #[serde(rename = "Openshift Cluster ID")]
    cluster_id: String,
    #[serde(rename = "UUID")]
    attachment_uuid: String,
    #[serde(rename = "Account Number")]
    account_number: String,
}

/// Drives the per-cluster pipeline over the filtered case export and appends
/// one report entry per cluster that makes it through every gate.
pub struct ReportAccumulator<'a> {
    tools: &'a ExternalTools,
    attachments_dir: PathBuf,
}

impl<'a> ReportAccumulator<'a> {
    pub fn new(tools: &'a ExternalTools, attachments_dir: impl Into<PathBuf>) -> Self {
        Self {
            tools,
            attachments_dir: attachments_dir.into(),
        }
    }

    /// Process every row of the filtered export in order, returning how many
    /// clusters were appended to the report.
    ///
    /// A row with an empty attachment UUID abandons the remaining batch, not
    /// just the row.
    pub fn run(
        &self,
        filtered_export: &Path,
        sets: &ClassificationSets,
        document: &mut ReportDocument,
    ) -> Result<usize> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(filtered_export)?;

        let mut appended = 0;
        for row in reader.deserialize() {
            let row: CaseRow = row?;

            let cluster_dir = self.attachments_dir.join(&row.cluster_id);
            fs::create_dir_all(&cluster_dir)?;

            if row.attachment_uuid.is_empty() {
                log::warn!(
                    "Case {} carries no attachment UUID; abandoning the remaining rows",
                    row.case_number
                );
                break;
            }

            let fetch =
                self.tools
                    .fetch_attachment(&row.case_number, &row.attachment_uuid, &cluster_dir)?;
            warn_on_failure("attachment fetch", &row.cluster_id, &fetch);

            let Some((archive, kind)) = find_archive(&cluster_dir) else {
                log::info!("No attachment file found for cluster ID: {}", row.cluster_id);
                continue;
            };

            let extract = self.tools.extract_archive(kind, &archive, &cluster_dir)?;
            warn_on_failure("archive extraction", &row.cluster_id, &extract);

            let Some(image_folder) = find_image_folder(&cluster_dir) else {
                log::info!(
                    "Image folder not found in attachment file: {}",
                    archive.display()
                );
                fs::remove_dir_all(&cluster_dir)?;
                continue;
            };

            let switch = self.tools.use_cluster(&image_folder)?;
            warn_on_failure("cluster context switch", &row.cluster_id, &switch);

            let listing = self.tools.installed_operators()?;
            warn_on_failure("operator listing", &row.cluster_id, &listing);
            let operators = parse_operator_listing(&listing.stdout);

            let certified = operators
                .iter()
                .filter(|op| sets.is_certified(op))
                .cloned()
                .collect();
            let redhat = operators
                .iter()
                .filter(|op| sets.is_redhat(op))
                .cloned()
                .collect();

            log::info!(
                "Recording cluster {} with {} installed operators",
                row.cluster_id,
                operators.len()
            );
            document.append(ClusterReport {
                cluster_id: row.cluster_id,
                case_number: row.case_number,
                attachment_uuid: row.attachment_uuid,
                account_number: row.account_number,
                operators_installed: operators,
                certified_operators: certified,
                redhat_operators: redhat,
            })?;
            appended += 1;
        }

        Ok(appended)
    }
}

fn warn_on_failure(step: &str, cluster_id: &str, outcome: &ToolOutcome) {
    if !outcome.success() {
        log::warn!(
            "{step} for cluster {cluster_id} exited with {:?}: {}",
            outcome.status,
            outcome.stderr.trim()
        );
    }
}
