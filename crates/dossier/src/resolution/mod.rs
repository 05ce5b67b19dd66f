//! Deterministic lookups from employee codes to business facts.

pub mod checklist;
pub mod entity;
pub mod locker;

use crate::config::ResolutionConfig;
use std::fs::File;
use tracing::info;

pub use checklist::{
    aggregate_checklist_status, ChecklistConfigError, ChecklistProgress, ChecklistStatusEntry,
    RequiredDocuments, SubmittedChecklistRecord, MISSED, PLACEHOLDER,
};
pub use entity::{classify, classify_entity, LegalEntity, UNKNOWN_ENTITY};
pub use locker::{
    parse_employee_number, EmployeeCodeError, LockerAssignment, LockerConfigError,
    LockerLookupView, LockerRange, LockerTable,
};

/// Lookup tables built once at startup and shared by every request.
#[derive(Debug, Clone)]
pub struct ResolutionTables {
    pub lockers: LockerTable,
    pub required_documents: RequiredDocuments,
}

impl ResolutionTables {
    pub fn standard() -> Self {
        Self {
            lockers: LockerTable::standard(),
            required_documents: RequiredDocuments::standard(),
        }
    }

    pub fn from_config(config: &ResolutionConfig) -> Result<Self, LockerConfigError> {
        let lockers = match &config.locker_table {
            Some(path) => {
                let file = File::open(path)?;
                let table = LockerTable::from_csv_reader(file, config.strict_lockers)?;
                info!(
                    path = %path.display(),
                    ranges = table.ranges().len(),
                    "loaded locker table"
                );
                table
            }
            None if config.strict_lockers => {
                LockerTable::new(LockerTable::standard().ranges().to_vec())?
            }
            None => LockerTable::standard(),
        };

        Ok(Self {
            lockers,
            required_documents: RequiredDocuments::standard(),
        })
    }
}
