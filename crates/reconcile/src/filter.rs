use crate::sources::{CaseExportSource, IdentifierSource, LineListSource};
use crate::{missing_from, Result};
use std::collections::HashSet;
use std::path::Path;

/// Header written to every filtered export, reproduced verbatim for the
/// downstream consumers.
pub const FILTERED_HEADER: [&str; 4] = [
    "Case Number",
    "Openshift Cluster ID",
    "UUID",
    "Account Number",
];

/// Re-emit the rows of `input` whose cluster identifier is absent from the
/// `reference` inventory.
///
/// Row shape and order are preserved from the input; the destination is
/// overwritten. `input` and `output` may be the same path: all surviving rows
/// are collected before the destination is opened for writing.
pub fn filter_case_export(input: &Path, reference: &Path, output: &Path) -> Result<()> {
    let export_ids = CaseExportSource.load(input)?;
    let reference_ids = LineListSource.load(reference)?;
    let missing: HashSet<String> = missing_from(&export_ids, &reference_ids)
        .into_iter()
        .collect();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(input)?;
    let mut surviving = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() >= 2 && missing.contains(&record[1]) {
            surviving.push(record);
        }
    }

    let mut writer = csv::Writer::from_path(output)?;
    writer.write_record(FILTERED_HEADER)?;
    for record in &surviving {
        writer.write_record(record)?;
    }
    writer.flush()?;
    Ok(())
}
