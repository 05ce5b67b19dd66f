use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Status reported for a required document with no submission.
pub const MISSED: &str = "Missed";
/// Placeholder for verification fields of a missed document.
pub const PLACEHOLDER: &str = "-";

const STANDARD_DOCUMENTS: [&str; 22] = [
    "Appointment Letter",
    "NDA Declaration",
    "Passport Photo",
    "Employment Form",
    "Dependent Details Form",
    "ESI Declaration",
    "EPF Declaration",
    "Form 25 Payment of Wages",
    "Gratuity Nomination",
    "NFA (Note for Approval)",
    "Interview Assessment",
    "HR Interview Assessment",
    "Resume with Declaration",
    "Vaccination Certificate",
    "Previous Experience Certificates",
    "SSLC Certificate",
    "PUC Certificate",
    "Graduation Certificate",
    "Post Graduation Certificate",
    "PAN Card",
    "Aadhar Card",
    "Bank Account Details",
];

/// Ordered onboarding documents tracked for every employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredDocuments {
    names: Vec<String>,
}

impl RequiredDocuments {
    /// Builds the list in the given order, rejecting a name that appears twice.
    pub fn new<I, S>(names: I) -> Result<Self, ChecklistConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for name in names {
            let name = name.into();
            if unique.contains(&name) {
                return Err(ChecklistConfigError::DuplicateDocument(name));
            }
            unique.push(name);
        }
        Ok(Self { names: unique })
    }

    pub fn standard() -> Self {
        Self {
            names: STANDARD_DOCUMENTS.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|candidate| candidate == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChecklistConfigError {
    #[error("required document {0} is listed more than once")]
    DuplicateDocument(String),
}

/// A stored checklist row for one employee and document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedChecklistRecord {
    pub document_name: String,
    pub is_submitted: String,
    pub verified_by: Option<String>,
    pub reviewed_by: Option<String>,
    pub verified_date: Option<String>,
    pub file_path: Option<String>,
    pub uploaded_by: Option<String>,
    pub upload_date: Option<String>,
}

/// One line of the checklist report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistStatusEntry {
    pub document_name: String,
    pub is_submitted: String,
    pub verified_by: Option<String>,
    pub reviewed_by: Option<String>,
    pub verified_date: Option<String>,
    pub file_path: Option<String>,
    pub uploaded_by: Option<String>,
    pub upload_date: Option<String>,
}

impl ChecklistStatusEntry {
    pub fn missed(document_name: &str) -> Self {
        Self {
            document_name: document_name.to_string(),
            is_submitted: MISSED.to_string(),
            verified_by: Some(PLACEHOLDER.to_string()),
            reviewed_by: Some(PLACEHOLDER.to_string()),
            verified_date: Some(PLACEHOLDER.to_string()),
            file_path: None,
            uploaded_by: None,
            upload_date: None,
        }
    }

    fn from_record(document_name: &str, record: &SubmittedChecklistRecord) -> Self {
        Self {
            document_name: document_name.to_string(),
            is_submitted: record.is_submitted.clone(),
            verified_by: record.verified_by.clone(),
            reviewed_by: record.reviewed_by.clone(),
            verified_date: record.verified_date.clone(),
            file_path: record.file_path.clone(),
            uploaded_by: record.uploaded_by.clone(),
            upload_date: record.upload_date.clone(),
        }
    }

    pub fn is_missed(&self) -> bool {
        self.is_submitted == MISSED
    }
}

/// Builds the checklist report: one entry per required document, in order.
///
/// When several records share a document name the last one in `submitted` wins.
/// Records for documents outside `required` are dropped.
pub fn aggregate_checklist_status(
    required: &RequiredDocuments,
    submitted: &[SubmittedChecklistRecord],
) -> Vec<ChecklistStatusEntry> {
    let mut latest: HashMap<&str, &SubmittedChecklistRecord> = HashMap::new();
    for record in submitted {
        latest.insert(record.document_name.as_str(), record);
    }

    required
        .names()
        .iter()
        .map(|name| match latest.get(name.as_str()) {
            Some(record) => ChecklistStatusEntry::from_record(name, record),
            None => ChecklistStatusEntry::missed(name),
        })
        .collect()
}

/// Counts for a checklist report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChecklistProgress {
    pub total: usize,
    pub submitted: usize,
    pub missed: usize,
}

impl ChecklistProgress {
    pub fn from_entries(entries: &[ChecklistStatusEntry]) -> Self {
        let missed = entries.iter().filter(|entry| entry.is_missed()).count();
        Self {
            total: entries.len(),
            submitted: entries.len() - missed,
            missed,
        }
    }
}
