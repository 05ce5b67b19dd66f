//! Personnel records: employees, onboarding checklists, file custody, accounts and the
//! activity trail.
//!
//! Storage and outbound mail sit behind [`RecordStore`] and [`Notifier`] so the service
//! and router can run against any backend.

pub mod access;
pub mod dashboard;
pub mod domain;
pub mod import;
pub mod ocr;
pub mod repository;
pub mod router;
pub mod service;
pub mod tracking;
pub mod uploads;

#[cfg(test)]
mod tests;

pub use access::{hash_password, verify_password, AccessError, Actor, Role};
pub use dashboard::{CompanyCount, DashboardView, MonthCount};
pub use domain::{
    ActivityEntry, AdminSummary, ChecklistSubmission, ChecklistUpload, Employee, EmployeeId,
    FileTrackingRecord, NewEmployee, NewFileTracking, NewUser, SearchField,
    TrackingContactUpdate, TrackingId, UserAccount, UserId, UserProfileView,
};
pub use import::{ImportError, ImportSummary, TrackingImporter};
pub use ocr::{extract_employee_code, OcrLookupResult, OcrOutcome};
pub use repository::{MailMessage, Notifier, NotifyError, RecordStore, RepositoryError};
pub use router::{records_router, ACTOR_HEADER};
pub use service::{EmployeeDetail, RecordsService, RecordsServiceError, RecordsSettings};
pub use tracking::{join_documents, split_documents};
