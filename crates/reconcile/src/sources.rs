use crate::Result;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Capability to produce a cluster identifier set from a file on disk.
///
/// Identifiers are opaque tokens: no trimming, case folding, or other
/// normalization is applied by any source.
pub trait IdentifierSource {
    fn load(&self, path: &Path) -> Result<HashSet<String>>;
}

/// Case-tracking export: comma-delimited, header row skipped, cluster
/// identifiers in the second column.
pub struct CaseExportSource;

impl IdentifierSource for CaseExportSource {
    fn load(&self, path: &Path) -> Result<HashSet<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let mut clusters = HashSet::new();
        for record in reader.records() {
            let record = record?;
            if record.len() < 2 {
                continue;
            }
            let cluster_id = &record[1];
            if !cluster_id.is_empty() {
                clusters.insert(cluster_id.to_string());
            }
        }
        Ok(clusters)
    }
}

/// Telemetry inventory: one identifier per line, empty lines dropped.
pub struct LineListSource;

impl IdentifierSource for LineListSource {
    fn load(&self, path: &Path) -> Result<HashSet<String>> {
        let contents = fs::read_to_string(path)?;
        Ok(contents
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
