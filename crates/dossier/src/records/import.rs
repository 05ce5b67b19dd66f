use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use super::domain::{FileTrackingRecord, TrackingId};
use super::repository::{RecordStore, RepositoryError};
use super::tracking::split_documents;

/// Loads custody records exported from the legacy tracking spreadsheet.
pub struct TrackingImporter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Employee codes with no matching employee, one per skipped row.
    pub skipped: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read tracking export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid tracking export: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Debug, Deserialize)]
struct TrackingRow {
    #[serde(rename = "employee_id")]
    employee_code: String,
    date_taken: String,
    taken_by: String,
    file_taken_time: String,
    #[serde(default)]
    documents_taken: String,
    status_of_documents: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    taken_by_email: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    expected_return_date: Option<String>,
}

impl TrackingImporter {
    pub fn from_path<S, P>(store: &S, path: P) -> Result<ImportSummary, ImportError>
    where
        S: RecordStore + ?Sized,
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(store, file)
    }

    pub fn from_reader<S, R>(store: &S, reader: R) -> Result<ImportSummary, ImportError>
    where
        S: RecordStore + ?Sized,
        R: Read,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut summary = ImportSummary::default();
        let mut pending = Vec::new();

        // Nothing is written until every row has parsed and resolved.
        for row in csv_reader.deserialize::<TrackingRow>() {
            let row = row?;
            let Some(employee) = store.employee_by_code(&row.employee_code)? else {
                warn!(employee_code = %row.employee_code, "employee not found; skipping tracking row");
                summary.skipped.push(row.employee_code);
                continue;
            };

            pending.push(FileTrackingRecord {
                id: TrackingId(0),
                employee_id: employee.id,
                date_taken: row.date_taken,
                taken_by: row.taken_by,
                taken_by_email: row.taken_by_email,
                file_taken_time: row.file_taken_time,
                expected_return_date: row.expected_return_date,
                documents_taken: split_documents(&row.documents_taken),
                status_of_documents: row.status_of_documents,
            });
        }

        for record in pending {
            store.insert_tracking(record)?;
            summary.imported += 1;
        }

        info!(
            imported = summary.imported,
            skipped = summary.skipped.len(),
            "tracking import finished"
        );
        Ok(summary)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
