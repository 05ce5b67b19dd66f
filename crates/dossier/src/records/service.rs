use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::access::{hash_password, verify_password, AccessError, Actor, Role};
use super::dashboard::DashboardView;
use super::domain::{
    ActivityEntry, AdminSummary, ChecklistSubmission, Employee, EmployeeId, FileTrackingRecord,
    NewEmployee, NewFileTracking, NewUser, SearchField, TrackingContactUpdate, TrackingId,
    UserAccount, UserId, UserProfileView,
};
use super::ocr::{extract_employee_code, OcrLookupResult};
use super::repository::{Notifier, NotifyError, RecordStore, RepositoryError};
use super::tracking::confirmation_mail;
use super::uploads::{allowed_file, checklist_file_path};
use crate::resolution::{
    aggregate_checklist_status, classify, ChecklistProgress, ChecklistStatusEntry,
    EmployeeCodeError, LegalEntity, LockerLookupView, ResolutionTables, SubmittedChecklistRecord,
    UNKNOWN_ENTITY,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SUBMITTED: &str = "Yes";

#[derive(Debug, Clone)]
pub struct RecordsSettings {
    /// Base URL printed into employee QR links.
    pub public_url: String,
}

/// Everything shown on an employee's page.
#[derive(Debug, Clone, Serialize)]
pub struct EmployeeDetail {
    pub employee: Employee,
    pub qr_link: String,
    pub locker: LockerLookupView,
    pub checklist: Vec<ChecklistStatusEntry>,
    pub checklist_progress: ChecklistProgress,
    pub tracking: Vec<FileTrackingRecord>,
}

/// Service composing the record store, outbound mail, and the lookup tables.
pub struct RecordsService<S, N> {
    store: Arc<S>,
    notifier: Arc<N>,
    tables: Arc<ResolutionTables>,
    settings: RecordsSettings,
}

impl<S, N> RecordsService<S, N>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    pub fn new(
        store: Arc<S>,
        notifier: Arc<N>,
        tables: Arc<ResolutionTables>,
        settings: RecordsSettings,
    ) -> Self {
        Self {
            store,
            notifier,
            tables,
            settings,
        }
    }

    /// Creates the configured super admin when no super admin exists yet.
    pub fn bootstrap_super_admin(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, RecordsServiceError> {
        let users = self.store.users()?;
        if users.iter().any(|user| user.role == Role::SuperAdmin) {
            return Ok(false);
        }

        self.store.insert_user(UserAccount {
            id: UserId(0),
            username: username.to_string(),
            password_hash: hash_password(password),
            role: Role::SuperAdmin,
            full_name: None,
            companies: Vec::new(),
            mobile_number: None,
            email: None,
            profile_photo: None,
        })?;
        info!(username, "created bootstrap super admin");
        Ok(true)
    }

    pub fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfileView, RecordsServiceError> {
        let account = self
            .store
            .user_by_username(username.trim())?
            .filter(|account| verify_password(password, &account.password_hash))
            .ok_or(RecordsServiceError::InvalidCredentials)?;

        self.log_activity(&account.username, "Login", "User logged in", None)?;
        info!(username = %account.username, role = account.role.label(), "user logged in");
        Ok(UserProfileView::from(&account))
    }

    /// Resolves the account behind a request.
    pub fn actor(&self, username: &str) -> Result<Actor, RecordsServiceError> {
        let account = self
            .store
            .user_by_username(username)?
            .ok_or(AccessError::Unauthenticated)?;
        Ok(Actor::from(&account))
    }

    pub fn resolve_locker(&self, code: &str) -> Result<LockerLookupView, RecordsServiceError> {
        Ok(self.tables.lockers.resolve(code)?.into())
    }

    pub fn qr_link(&self, employee_code: &str) -> String {
        let base = self.settings.public_url.trim_end_matches('/');
        format!("{base}/employee/{employee_code}?next=/employee/{employee_code}")
    }

    pub fn add_employee(
        &self,
        actor: &Actor,
        payload: NewEmployee,
    ) -> Result<Employee, RecordsServiceError> {
        actor.require(Role::Admin)?;

        let code = payload.employee_code.trim().to_string();
        if code.is_empty() {
            return Err(RecordsServiceError::Validation(
                "employee code is required".to_string(),
            ));
        }
        if payload.name.trim().is_empty() {
            return Err(RecordsServiceError::Validation(
                "employee name is required".to_string(),
            ));
        }
        if self.store.employee_by_code(&code)?.is_some() {
            return Err(RepositoryError::Conflict.into());
        }

        let entity = classify(&code);
        let company = payload
            .company
            .map(|company| company.trim().to_string())
            .filter(|company| !company.is_empty())
            .or_else(|| entity.map(|entity| entity.label().to_string()))
            .unwrap_or_default();
        if !actor.can_see_company(&company) {
            return Err(AccessError::OutOfScope.into());
        }

        let employee = self.store.insert_employee(Employee {
            id: EmployeeId(0),
            employee_code: code.clone(),
            name: payload.name.trim().to_string(),
            designation: payload.designation,
            department: payload.department,
            unit: payload.unit,
            epf: payload.epf,
            esi: payload.esi,
            joining_date: payload.joining_date,
            retirement_date: payload.retirement_date,
            leaving_date: payload.leaving_date,
            uan: payload.uan,
            detected_entity: entity
                .map_or(UNKNOWN_ENTITY, LegalEntity::label)
                .to_string(),
            company,
        })?;

        self.log_activity(
            &actor.username,
            "Add Employee",
            &format!("Added employee {code}"),
            Some(&code),
        )?;
        info!(employee_code = %code, entity = %employee.detected_entity, "employee added");
        Ok(employee)
    }

    /// Employees visible to the actor, optionally filtered by a case-insensitive
    /// substring match on one field.
    pub fn list_employees(
        &self,
        actor: &Actor,
        search: Option<&str>,
        field: SearchField,
    ) -> Result<Vec<Employee>, RecordsServiceError> {
        let needle = search
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        Ok(self
            .store
            .employees()?
            .into_iter()
            .filter(|employee| actor.can_see_company(&employee.company))
            .filter(|employee| match &needle {
                Some(needle) => field.value_of(employee).to_lowercase().contains(needle),
                None => true,
            })
            .collect())
    }

    pub fn employee_detail(
        &self,
        actor: &Actor,
        code: &str,
    ) -> Result<EmployeeDetail, RecordsServiceError> {
        let employee = self.scoped_employee(actor, code)?;
        let checklist = self.checklist_for(&employee)?;
        let tracking = self.store.tracking_for(employee.id)?;
        let locker = match self.tables.lockers.resolve(&employee.employee_code) {
            Ok(assignment) => LockerLookupView::from(assignment),
            Err(err) => {
                debug!(%err, "employee code has no locker");
                LockerLookupView::from(None)
            }
        };

        Ok(EmployeeDetail {
            qr_link: self.qr_link(&employee.employee_code),
            locker,
            checklist_progress: ChecklistProgress::from_entries(&checklist),
            checklist,
            tracking,
            employee,
        })
    }

    pub fn delete_employee(&self, actor: &Actor, code: &str) -> Result<(), RecordsServiceError> {
        actor.require(Role::Admin)?;
        let employee = self.scoped_employee(actor, code)?;
        self.store.delete_employee(employee.id)?;

        self.log_activity(
            &actor.username,
            "Delete Employee",
            &format!("Deleted employee {}", employee.employee_code),
            Some(&employee.employee_code),
        )?;
        info!(employee_code = %employee.employee_code, "employee deleted");
        Ok(())
    }

    pub fn checklist_status(
        &self,
        actor: &Actor,
        code: &str,
    ) -> Result<Vec<ChecklistStatusEntry>, RecordsServiceError> {
        let employee = self.scoped_employee(actor, code)?;
        self.checklist_for(&employee)
    }

    /// Stores one verified upload per document and returns the refreshed report.
    /// Nothing is stored unless every upload passes validation.
    pub fn record_checklist(
        &self,
        actor: &Actor,
        code: &str,
        submission: ChecklistSubmission,
    ) -> Result<Vec<ChecklistStatusEntry>, RecordsServiceError> {
        actor.require(Role::Admin)?;
        let employee = self.scoped_employee(actor, code)?;

        let ChecklistSubmission {
            verified_by,
            reviewed_by,
            verified_date,
            documents,
        } = submission;

        if documents.is_empty() {
            return Err(RecordsServiceError::Validation(
                "select at least one checklist document".to_string(),
            ));
        }
        for upload in &documents {
            if !self.tables.required_documents.contains(&upload.document_name) {
                return Err(RecordsServiceError::Validation(format!(
                    "'{}' is not a checklist document",
                    upload.document_name
                )));
            }
            if upload.file_name.trim().is_empty() {
                return Err(RecordsServiceError::Validation(format!(
                    "file required for {}",
                    upload.document_name
                )));
            }
            if !allowed_file(&upload.file_name) {
                return Err(RecordsServiceError::Validation(format!(
                    "invalid file type for {}",
                    upload.document_name
                )));
            }
        }

        let now = Local::now();
        let upload_date = now.format("%Y-%m-%d").to_string();
        for upload in documents {
            let file_path = checklist_file_path(
                &employee.employee_code,
                &upload.document_name,
                &upload.file_name,
                now.timestamp(),
            );
            self.store.insert_checklist(
                employee.id,
                SubmittedChecklistRecord {
                    document_name: upload.document_name,
                    is_submitted: SUBMITTED.to_string(),
                    verified_by: Some(verified_by.clone()),
                    reviewed_by: Some(reviewed_by.clone()),
                    verified_date: Some(verified_date.clone()),
                    file_path: Some(file_path),
                    uploaded_by: Some(actor.username.clone()),
                    upload_date: Some(upload_date.clone()),
                },
            )?;
        }

        self.log_activity(
            &actor.username,
            "Add Checklist",
            &format!("Added checklist for {}", employee.employee_code),
            Some(&employee.employee_code),
        )?;
        self.checklist_for(&employee)
    }

    pub fn tracking(
        &self,
        actor: &Actor,
        code: &str,
    ) -> Result<Vec<FileTrackingRecord>, RecordsServiceError> {
        let employee = self.scoped_employee(actor, code)?;
        Ok(self.store.tracking_for(employee.id)?)
    }

    /// Records a file checkout and mails a confirmation to the taker when an
    /// address is given. Mail failures are logged, not returned.
    pub fn add_tracking(
        &self,
        actor: &Actor,
        code: &str,
        payload: NewFileTracking,
    ) -> Result<FileTrackingRecord, RecordsServiceError> {
        actor.require(Role::Admin)?;
        let employee = self.scoped_employee(actor, code)?;
        validate_tracking(&payload)?;

        let record = self
            .store
            .insert_tracking(payload.into_record(TrackingId(0), employee.id))?;

        self.log_activity(
            &actor.username,
            "Add File Tracking",
            &format!("Added file tracking for {}", employee.employee_code),
            Some(&employee.employee_code),
        )?;

        if let Some(mail) = confirmation_mail(&employee.employee_code, &record) {
            let to = mail.to.clone();
            match self.notifier.send(mail) {
                Ok(()) => info!(employee_code = %employee.employee_code, %to, "custody confirmation sent"),
                Err(NotifyError::NotConfigured) => {
                    info!(employee_code = %employee.employee_code, "mail not configured; confirmation skipped")
                }
                Err(err) => warn!(%err, employee_code = %employee.employee_code, "custody confirmation not sent"),
            }
        }

        Ok(record)
    }

    pub fn update_tracking_contact(
        &self,
        actor: &Actor,
        id: TrackingId,
        update: TrackingContactUpdate,
    ) -> Result<FileTrackingRecord, RecordsServiceError> {
        actor.require(Role::Admin)?;

        let email = update.taken_by_email.trim();
        let expected_return = update.expected_return_date.trim();
        if email.is_empty() || expected_return.is_empty() {
            return Err(RecordsServiceError::Validation(
                "Email and Expected Return Date required".to_string(),
            ));
        }

        let (mut record, employee) = self.scoped_tracking(actor, id)?;
        record.taken_by_email = Some(email.to_string());
        record.expected_return_date = Some(expected_return.to_string());
        self.store.update_tracking(record.clone())?;

        self.log_activity(
            &actor.username,
            "Edit File Tracking",
            &format!("Updated tracking {} for {}", id.0, employee.employee_code),
            Some(&employee.employee_code),
        )?;
        Ok(record)
    }

    /// Replaces every field of the employee's first custody record.
    pub fn edit_first_tracking(
        &self,
        actor: &Actor,
        code: &str,
        payload: NewFileTracking,
    ) -> Result<FileTrackingRecord, RecordsServiceError> {
        actor.require(Role::SuperAdmin)?;
        let employee = self.scoped_employee(actor, code)?;
        validate_tracking(&payload)?;

        let first = self
            .store
            .tracking_for(employee.id)?
            .into_iter()
            .next()
            .ok_or(RecordsServiceError::TrackingNotFound)?;

        let record = payload.into_record(first.id, employee.id);
        self.store.update_tracking(record.clone())?;

        self.log_activity(
            &actor.username,
            "Edit File Tracking",
            &format!("Edited tracking for {}", employee.employee_code),
            Some(&employee.employee_code),
        )?;
        Ok(record)
    }

    pub fn delete_tracking(&self, actor: &Actor, id: TrackingId) -> Result<(), RecordsServiceError> {
        actor.require(Role::Admin)?;
        let (_, employee) = self.scoped_tracking(actor, id)?;
        self.store.delete_tracking(id)?;

        self.log_activity(
            &actor.username,
            "Delete File Tracking",
            &format!("Deleted tracking {} for {}", id.0, employee.employee_code),
            Some(&employee.employee_code),
        )?;
        Ok(())
    }

    /// Matches OCR text from a badge or document to an employee the actor can see.
    pub fn ocr_lookup(
        &self,
        actor: &Actor,
        text: &str,
    ) -> Result<OcrLookupResult, RecordsServiceError> {
        actor.require(Role::Admin)?;

        let Some(code) = extract_employee_code(text) else {
            debug!("no employee code in OCR text");
            return Ok(OcrLookupResult::no_code());
        };

        match self.store.employee_by_code(code)? {
            Some(employee) if actor.can_see_company(&employee.company) => {
                self.log_activity(
                    &actor.username,
                    "OCR Lookup",
                    &format!("Found employee {code}"),
                    Some(code),
                )?;
                Ok(OcrLookupResult::found(code))
            }
            _ => Ok(OcrLookupResult::unknown_code(code)),
        }
    }

    pub fn dashboard(&self, actor: &Actor) -> Result<DashboardView, RecordsServiceError> {
        actor.require(Role::Admin)?;
        let employees = self.list_employees(actor, None, SearchField::default())?;
        let tracking = self.store.all_tracking()?;
        Ok(DashboardView::build(&employees, &tracking))
    }

    pub fn activity(&self, actor: &Actor) -> Result<Vec<ActivityEntry>, RecordsServiceError> {
        actor.require(Role::Admin)?;
        Ok(self.store.activity()?)
    }

    pub fn create_user(
        &self,
        actor: &Actor,
        payload: NewUser,
    ) -> Result<UserProfileView, RecordsServiceError> {
        actor.require(Role::SuperAdmin)?;

        let username = payload.username.trim().to_string();
        if username.is_empty() || payload.password.is_empty() {
            return Err(RecordsServiceError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let mut companies: Vec<String> = Vec::new();
        for company in payload.companies {
            let company = company.trim().to_string();
            if !company.is_empty() && !companies.contains(&company) {
                companies.push(company);
            }
        }

        let account = self.store.insert_user(UserAccount {
            id: UserId(0),
            username: username.clone(),
            password_hash: hash_password(&payload.password),
            role: payload.role,
            full_name: payload.full_name,
            companies,
            mobile_number: payload.mobile_number,
            email: payload.email,
            profile_photo: payload.profile_photo,
        })?;

        self.log_activity(
            &actor.username,
            "Add User",
            &format!("Added user {username}"),
            None,
        )?;
        info!(%username, role = account.role.label(), "user created");
        Ok(UserProfileView::from(&account))
    }

    pub fn list_admins(&self, actor: &Actor) -> Result<Vec<AdminSummary>, RecordsServiceError> {
        actor.require(Role::SuperAdmin)?;
        Ok(self
            .store
            .users()?
            .into_iter()
            .filter(|account| account.role == Role::Admin)
            .map(|account| AdminSummary {
                id: account.id,
                full_name: account
                    .full_name
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or(account.username),
                email: account.email,
                phone: account.mobile_number,
                companies: account.companies.join(", "),
            })
            .collect())
    }

    pub fn delete_admin(&self, actor: &Actor, id: UserId) -> Result<(), RecordsServiceError> {
        actor.require(Role::SuperAdmin)?;

        let target = self
            .store
            .users()?
            .into_iter()
            .find(|account| account.id == id)
            .ok_or_else(|| RecordsServiceError::UserNotFound(id.0.to_string()))?;
        if target.role != Role::Admin {
            return Err(RecordsServiceError::Validation(
                "only admin accounts can be deleted".to_string(),
            ));
        }

        self.store.delete_user(id)?;
        self.log_activity(
            &actor.username,
            "Delete User",
            &format!("Deleted admin {}", id.0),
            None,
        )?;
        Ok(())
    }

    /// Users may read their own profile; super admins may read any.
    pub fn profile(
        &self,
        actor: &Actor,
        username: &str,
    ) -> Result<UserProfileView, RecordsServiceError> {
        if actor.username != username {
            actor.require(Role::SuperAdmin)?;
        }
        let account = self
            .store
            .user_by_username(username)?
            .ok_or_else(|| RecordsServiceError::UserNotFound(username.to_string()))?;
        Ok(UserProfileView::from(&account))
    }

    fn scoped_employee(&self, actor: &Actor, code: &str) -> Result<Employee, RecordsServiceError> {
        let employee = self
            .store
            .employee_by_code(code)?
            .ok_or_else(|| RecordsServiceError::EmployeeNotFound(code.to_string()))?;
        actor.require_employee(&employee)?;
        Ok(employee)
    }

    fn scoped_tracking(
        &self,
        actor: &Actor,
        id: TrackingId,
    ) -> Result<(FileTrackingRecord, Employee), RecordsServiceError> {
        let record = self
            .store
            .tracking_by_id(id)?
            .ok_or(RecordsServiceError::TrackingNotFound)?;
        let employee = self
            .store
            .employee_by_id(record.employee_id)?
            .ok_or(RecordsServiceError::TrackingNotFound)?;
        actor.require_employee(&employee)?;
        Ok((record, employee))
    }

    fn checklist_for(
        &self,
        employee: &Employee,
    ) -> Result<Vec<ChecklistStatusEntry>, RecordsServiceError> {
        let submitted = self.store.checklist_for(employee.id)?;
        Ok(aggregate_checklist_status(
            &self.tables.required_documents,
            &submitted,
        ))
    }

    fn log_activity(
        &self,
        user: &str,
        action: &str,
        target: &str,
        employee_code: Option<&str>,
    ) -> Result<(), RepositoryError> {
        self.store.append_activity(ActivityEntry {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            user: user.to_string(),
            action: action.to_string(),
            target: target.to_string(),
            employee_code: employee_code.map(str::to_string),
        })
    }
}

fn validate_tracking(payload: &NewFileTracking) -> Result<(), RecordsServiceError> {
    let missing = [
        ("date_taken", &payload.date_taken),
        ("taken_by", &payload.taken_by),
        ("file_taken_time", &payload.file_taken_time),
        ("status_of_documents", &payload.status_of_documents),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty());

    match missing {
        Some((field, _)) => Err(RecordsServiceError::Validation(format!(
            "{field} is required"
        ))),
        None => Ok(()),
    }
}

/// Error raised by the records service.
#[derive(Debug, thiserror::Error)]
pub enum RecordsServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("employee {0} not found")]
    EmployeeNotFound(String),
    #[error("file tracking record not found")]
    TrackingNotFound,
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    EmployeeCode(#[from] EmployeeCodeError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
