use crate::Result;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};

/// One processed cluster in the persisted report array.
///
/// Field names match the report's downstream consumers verbatim; entries are
/// never mutated after appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterReport {
    #[serde(rename = "Cluster ID")]
    pub cluster_id: String,
    #[serde(rename = "Case Number")]
    pub case_number: String,
    #[serde(rename = "Attachment UUID")]
    pub attachment_uuid: String,
    #[serde(rename = "Contact Account Number")]
    pub account_number: String,
    #[serde(rename = "Operators Installed")]
    pub operators_installed: Vec<String>,
    #[serde(rename = "Certified Operators")]
    pub certified_operators: Vec<String>,
    #[serde(rename = "Red Hat Operators")]
    pub redhat_operators: Vec<String>,
}

/// Durable JSON report: a single pretty-printed array, appended to across
/// runs.
///
/// The handle loads the file once and rewrites it atomically after every
/// append, so a crash mid-run loses at most the in-flight cluster. Nothing
/// tracks already-processed clusters; re-running the sweep appends duplicates.
pub struct ReportDocument {
    path: PathBuf,
    entries: Vec<ClusterReport>,
}

impl ReportDocument {
    /// Open the report at `path`, creating an empty file if none exists.
    ///
    /// A file that does not decode as a report array (corrupt, or the empty
    /// file a previous run left behind) is recovered as an empty document.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                log::warn!(
                    "Report {} did not decode ({err}); starting from an empty document",
                    path.display()
                );
                Vec::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                fs::write(&path, b"")?;
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, entries })
    }

    /// Append a record and flush the whole array to disk.
    pub fn append(&mut self, report: ClusterReport) -> Result<()> {
        self.entries.push(report);
        self.persist()
    }

    pub fn entries(&self) -> &[ClusterReport] {
        &self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut ser)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &buf)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
