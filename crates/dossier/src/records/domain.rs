use serde::{Deserialize, Serialize};

use super::access::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackingId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub u64);

/// Personnel record. Dates are kept as entered on the joining paperwork.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub employee_code: String,
    pub name: String,
    pub designation: String,
    pub department: String,
    pub unit: String,
    pub epf: String,
    pub esi: String,
    pub joining_date: String,
    pub retirement_date: String,
    pub leaving_date: String,
    pub uan: String,
    pub detected_entity: String,
    pub company: String,
}

/// Intake payload for a new employee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEmployee {
    pub employee_code: String,
    pub name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub epf: String,
    #[serde(default)]
    pub esi: String,
    #[serde(default)]
    pub joining_date: String,
    #[serde(default)]
    pub retirement_date: String,
    #[serde(default)]
    pub leaving_date: String,
    #[serde(default)]
    pub uan: String,
    /// Overrides the company derived from the code prefix.
    #[serde(default)]
    pub company: Option<String>,
}

/// Employee field matched by the list search box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    #[default]
    EmployeeCode,
    Name,
    Department,
    Unit,
    Company,
}

impl SearchField {
    /// Unknown names fall back to the employee code.
    pub fn from_param(value: &str) -> Self {
        match value.trim() {
            "name" => Self::Name,
            "department" => Self::Department,
            "unit" => Self::Unit,
            "company" => Self::Company,
            _ => Self::EmployeeCode,
        }
    }

    pub fn value_of(self, employee: &Employee) -> &str {
        match self {
            Self::EmployeeCode => &employee.employee_code,
            Self::Name => &employee.name,
            Self::Department => &employee.department,
            Self::Unit => &employee.unit,
            Self::Company => &employee.company,
        }
    }
}

/// One checklist upload inside a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistUpload {
    pub document_name: String,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSubmission {
    pub verified_by: String,
    pub reviewed_by: String,
    pub verified_date: String,
    pub documents: Vec<ChecklistUpload>,
}

/// Custody record: who took a personnel file, when, and when it is due back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTrackingRecord {
    pub id: TrackingId,
    pub employee_id: EmployeeId,
    pub date_taken: String,
    pub taken_by: String,
    pub taken_by_email: Option<String>,
    pub file_taken_time: String,
    pub expected_return_date: Option<String>,
    pub documents_taken: Vec<String>,
    pub status_of_documents: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFileTracking {
    pub date_taken: String,
    pub taken_by: String,
    #[serde(default)]
    pub taken_by_email: Option<String>,
    pub file_taken_time: String,
    #[serde(default)]
    pub expected_return_date: Option<String>,
    #[serde(default)]
    pub documents_taken: Vec<String>,
    pub status_of_documents: String,
}

impl NewFileTracking {
    pub(crate) fn into_record(self, id: TrackingId, employee_id: EmployeeId) -> FileTrackingRecord {
        FileTrackingRecord {
            id,
            employee_id,
            date_taken: self.date_taken,
            taken_by: self.taken_by,
            taken_by_email: self.taken_by_email.filter(|email| !email.trim().is_empty()),
            file_taken_time: self.file_taken_time,
            expected_return_date: self.expected_return_date,
            documents_taken: self.documents_taken,
            status_of_documents: self.status_of_documents,
        }
    }
}

/// Contact fields an admin may correct on an existing custody record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingContactUpdate {
    #[serde(default)]
    pub taken_by_email: String,
    #[serde(default)]
    pub expected_return_date: String,
}

/// Stored account. `password_hash` never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub companies: Vec<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfileView {
    pub id: UserId,
    pub username: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub companies: Vec<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub profile_photo: Option<String>,
}

impl From<&UserAccount> for UserProfileView {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id,
            username: account.username.clone(),
            role: account.role,
            full_name: account.full_name.clone(),
            companies: account.companies.clone(),
            mobile_number: account.mobile_number.clone(),
            email: account.email.clone(),
            profile_photo: account.profile_photo.clone(),
        }
    }
}

/// Row in the admin management listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSummary {
    pub id: UserId,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub companies: String,
}

/// Audit trail line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub target: String,
    pub employee_code: Option<String>,
}
