use serde::{Deserialize, Serialize};

use super::domain::{
    ActivityEntry, Employee, EmployeeId, FileTrackingRecord, TrackingId, UserAccount, UserId,
};
use crate::resolution::SubmittedChecklistRecord;

/// Storage abstraction over the personnel database.
///
/// Insert methods assign the identifier; the `id` on the argument is ignored.
/// Listing methods return rows in insertion order.
pub trait RecordStore: Send + Sync {
    fn insert_employee(&self, employee: Employee) -> Result<Employee, RepositoryError>;
    fn employee_by_code(&self, code: &str) -> Result<Option<Employee>, RepositoryError>;
    fn employee_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;
    fn employees(&self) -> Result<Vec<Employee>, RepositoryError>;
    /// Removes the employee together with its checklist and custody rows.
    fn delete_employee(&self, id: EmployeeId) -> Result<(), RepositoryError>;

    fn insert_checklist(
        &self,
        employee_id: EmployeeId,
        record: SubmittedChecklistRecord,
    ) -> Result<(), RepositoryError>;
    fn checklist_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<SubmittedChecklistRecord>, RepositoryError>;

    fn insert_tracking(
        &self,
        record: FileTrackingRecord,
    ) -> Result<FileTrackingRecord, RepositoryError>;
    fn tracking_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<FileTrackingRecord>, RepositoryError>;
    fn tracking_by_id(&self, id: TrackingId)
        -> Result<Option<FileTrackingRecord>, RepositoryError>;
    fn all_tracking(&self) -> Result<Vec<FileTrackingRecord>, RepositoryError>;
    fn update_tracking(&self, record: FileTrackingRecord) -> Result<(), RepositoryError>;
    fn delete_tracking(&self, id: TrackingId) -> Result<(), RepositoryError>;

    fn insert_user(&self, account: UserAccount) -> Result<UserAccount, RepositoryError>;
    fn user_by_username(&self, username: &str) -> Result<Option<UserAccount>, RepositoryError>;
    fn users(&self) -> Result<Vec<UserAccount>, RepositoryError>;
    /// Removes the account and its company assignments.
    fn delete_user(&self, id: UserId) -> Result<(), RepositoryError>;

    fn append_activity(&self, entry: ActivityEntry) -> Result<(), RepositoryError>;
    fn activity(&self) -> Result<Vec<ActivityEntry>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound mail hook (SMTP relay or a test outbox).
pub trait Notifier: Send + Sync {
    fn send(&self, message: MailMessage) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail delivery is not configured")]
    NotConfigured,
    #[error("mail transport unavailable: {0}")]
    Transport(String),
}
