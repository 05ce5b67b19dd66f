use std::sync::{Arc, Mutex, MutexGuard};

use axum::response::Response;
use serde_json::Value;

use crate::records::domain::{
    ActivityEntry, Employee, EmployeeId, FileTrackingRecord, NewEmployee, NewFileTracking,
    NewUser, TrackingId, UserAccount, UserId,
};
use crate::records::repository::{
    MailMessage, Notifier, NotifyError, RecordStore, RepositoryError,
};
use crate::records::{records_router, Actor, RecordsService, RecordsSettings, Role};
use crate::resolution::{ResolutionTables, SubmittedChecklistRecord};

pub(super) const PUBLIC_URL: &str = "https://records.example.com/";
pub(super) const SUPER_ADMIN: &str = "superadmin";
pub(super) const ADMIN: &str = "hr.admin";
pub(super) const PASSWORD: &str = "SuperAdmin123";
pub(super) const PAYMENTS: &str = "Manipal Payment and Identity Solutions Limited";
pub(super) const SECURITY_PRESS: &str = "Canara Security Press Limited";

pub(super) type TestService = RecordsService<MemoryStore, MemoryNotifier>;

pub(super) fn settings() -> RecordsSettings {
    RecordsSettings {
        public_url: PUBLIC_URL.to_string(),
    }
}

/// Service with a bootstrapped super admin and one admin scoped to [`PAYMENTS`].
pub(super) fn build_service() -> (TestService, Arc<MemoryStore>, Arc<MemoryNotifier>) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = seeded(RecordsService::new(
        store.clone(),
        notifier.clone(),
        Arc::new(ResolutionTables::standard()),
        settings(),
    ));
    (service, store, notifier)
}

pub(super) fn seeded<N: Notifier + 'static>(
    service: RecordsService<MemoryStore, N>,
) -> RecordsService<MemoryStore, N> {
    service
        .bootstrap_super_admin(SUPER_ADMIN, PASSWORD)
        .expect("bootstrap succeeds");
    let root = service.actor(SUPER_ADMIN).expect("super admin exists");
    service
        .create_user(&root, admin_user(ADMIN, &[PAYMENTS]))
        .expect("admin created");
    service
}

pub(super) fn super_admin<S, N>(service: &RecordsService<S, N>) -> Actor
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    service.actor(SUPER_ADMIN).expect("super admin exists")
}

pub(super) fn admin<S, N>(service: &RecordsService<S, N>) -> Actor
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    service.actor(ADMIN).expect("admin exists")
}

pub(super) fn admin_user(username: &str, companies: &[&str]) -> NewUser {
    NewUser {
        username: username.to_string(),
        password: "Welcome@123".to_string(),
        role: Role::Admin,
        full_name: Some("Priya Shenoy".to_string()),
        companies: companies.iter().map(|company| company.to_string()).collect(),
        mobile_number: Some("9845012345".to_string()),
        email: Some("priya.shenoy@example.com".to_string()),
        profile_photo: None,
    }
}

pub(super) fn new_employee(code: &str, name: &str) -> NewEmployee {
    NewEmployee {
        employee_code: code.to_string(),
        name: name.to_string(),
        designation: "Executive".to_string(),
        department: "Operations".to_string(),
        unit: "Unit 2".to_string(),
        joining_date: "2021-06-14".to_string(),
        ..NewEmployee::default()
    }
}

pub(super) fn tracking_payload(email: Option<&str>) -> NewFileTracking {
    NewFileTracking {
        date_taken: "3/14/2024".to_string(),
        taken_by: "Asha Rao".to_string(),
        taken_by_email: email.map(str::to_string),
        file_taken_time: "10:30".to_string(),
        expected_return_date: Some("3/21/2024".to_string()),
        documents_taken: vec!["PAN Card".to_string(), "Aadhar Card".to_string()],
        status_of_documents: "Complete".to_string(),
    }
}

#[derive(Default)]
pub(super) struct MemoryState {
    employees: Vec<Employee>,
    checklist: Vec<(EmployeeId, SubmittedChecklistRecord)>,
    tracking: Vec<FileTrackingRecord>,
    users: Vec<UserAccount>,
    activity: Vec<ActivityEntry>,
    last_id: u64,
}

impl MemoryState {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().expect("store mutex poisoned")
    }

    pub(super) fn checklist_rows(&self) -> usize {
        self.state().checklist.len()
    }
}

impl RecordStore for MemoryStore {
    fn insert_employee(&self, mut employee: Employee) -> Result<Employee, RepositoryError> {
        let mut state = self.state();
        if state
            .employees
            .iter()
            .any(|existing| existing.employee_code == employee.employee_code)
        {
            return Err(RepositoryError::Conflict);
        }
        employee.id = EmployeeId(state.next_id());
        state.employees.push(employee.clone());
        Ok(employee)
    }

    fn employee_by_code(&self, code: &str) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .state()
            .employees
            .iter()
            .find(|employee| employee.employee_code == code)
            .cloned())
    }

    fn employee_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self
            .state()
            .employees
            .iter()
            .find(|employee| employee.id == id)
            .cloned())
    }

    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.state().employees.clone())
    }

    fn delete_employee(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let mut state = self.state();
        state.employees.retain(|employee| employee.id != id);
        state.checklist.retain(|(owner, _)| *owner != id);
        state.tracking.retain(|record| record.employee_id != id);
        Ok(())
    }

    fn insert_checklist(
        &self,
        employee_id: EmployeeId,
        record: SubmittedChecklistRecord,
    ) -> Result<(), RepositoryError> {
        self.state().checklist.push((employee_id, record));
        Ok(())
    }

    fn checklist_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<SubmittedChecklistRecord>, RepositoryError> {
        Ok(self
            .state()
            .checklist
            .iter()
            .filter(|(owner, _)| *owner == employee_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn insert_tracking(
        &self,
        mut record: FileTrackingRecord,
    ) -> Result<FileTrackingRecord, RepositoryError> {
        let mut state = self.state();
        record.id = TrackingId(state.next_id());
        state.tracking.push(record.clone());
        Ok(record)
    }

    fn tracking_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<FileTrackingRecord>, RepositoryError> {
        Ok(self
            .state()
            .tracking
            .iter()
            .filter(|record| record.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn tracking_by_id(
        &self,
        id: TrackingId,
    ) -> Result<Option<FileTrackingRecord>, RepositoryError> {
        Ok(self
            .state()
            .tracking
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    fn all_tracking(&self) -> Result<Vec<FileTrackingRecord>, RepositoryError> {
        Ok(self.state().tracking.clone())
    }

    fn update_tracking(&self, record: FileTrackingRecord) -> Result<(), RepositoryError> {
        let mut state = self.state();
        let slot = state
            .tracking
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = record;
        Ok(())
    }

    fn delete_tracking(&self, id: TrackingId) -> Result<(), RepositoryError> {
        self.state().tracking.retain(|record| record.id != id);
        Ok(())
    }

    fn insert_user(&self, mut account: UserAccount) -> Result<UserAccount, RepositoryError> {
        let mut state = self.state();
        if state
            .users
            .iter()
            .any(|existing| existing.username == account.username)
        {
            return Err(RepositoryError::Conflict);
        }
        account.id = UserId(state.next_id());
        state.users.push(account.clone());
        Ok(account)
    }

    fn user_by_username(&self, username: &str) -> Result<Option<UserAccount>, RepositoryError> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|account| account.username == username)
            .cloned())
    }

    fn users(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        Ok(self.state().users.clone())
    }

    fn delete_user(&self, id: UserId) -> Result<(), RepositoryError> {
        self.state().users.retain(|account| account.id != id);
        Ok(())
    }

    fn append_activity(&self, entry: ActivityEntry) -> Result<(), RepositoryError> {
        self.state().activity.push(entry);
        Ok(())
    }

    fn activity(&self) -> Result<Vec<ActivityEntry>, RepositoryError> {
        Ok(self.state().activity.clone())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    sent: Arc<Mutex<Vec<MailMessage>>>,
}

impl MemoryNotifier {
    pub(super) fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().expect("outbox mutex poisoned").clone()
    }
}

impl Notifier for MemoryNotifier {
    fn send(&self, message: MailMessage) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("outbox mutex poisoned")
            .push(message);
        Ok(())
    }
}

pub(super) struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _message: MailMessage) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

/// Store whose every call fails, for exercising the 500 path.
pub(super) struct UnavailableStore;

fn offline<T>() -> Result<T, RepositoryError> {
    Err(RepositoryError::Unavailable("database offline".to_string()))
}

impl RecordStore for UnavailableStore {
    fn insert_employee(&self, _employee: Employee) -> Result<Employee, RepositoryError> {
        offline()
    }

    fn employee_by_code(&self, _code: &str) -> Result<Option<Employee>, RepositoryError> {
        offline()
    }

    fn employee_by_id(&self, _id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        offline()
    }

    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        offline()
    }

    fn delete_employee(&self, _id: EmployeeId) -> Result<(), RepositoryError> {
        offline()
    }

    fn insert_checklist(
        &self,
        _employee_id: EmployeeId,
        _record: SubmittedChecklistRecord,
    ) -> Result<(), RepositoryError> {
        offline()
    }

    fn checklist_for(
        &self,
        _employee_id: EmployeeId,
    ) -> Result<Vec<SubmittedChecklistRecord>, RepositoryError> {
        offline()
    }

    fn insert_tracking(
        &self,
        _record: FileTrackingRecord,
    ) -> Result<FileTrackingRecord, RepositoryError> {
        offline()
    }

    fn tracking_for(
        &self,
        _employee_id: EmployeeId,
    ) -> Result<Vec<FileTrackingRecord>, RepositoryError> {
        offline()
    }

    fn tracking_by_id(
        &self,
        _id: TrackingId,
    ) -> Result<Option<FileTrackingRecord>, RepositoryError> {
        offline()
    }

    fn all_tracking(&self) -> Result<Vec<FileTrackingRecord>, RepositoryError> {
        offline()
    }

    fn update_tracking(&self, _record: FileTrackingRecord) -> Result<(), RepositoryError> {
        offline()
    }

    fn delete_tracking(&self, _id: TrackingId) -> Result<(), RepositoryError> {
        offline()
    }

    fn insert_user(&self, _account: UserAccount) -> Result<UserAccount, RepositoryError> {
        offline()
    }

    fn user_by_username(&self, _username: &str) -> Result<Option<UserAccount>, RepositoryError> {
        offline()
    }

    fn users(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        offline()
    }

    fn delete_user(&self, _id: UserId) -> Result<(), RepositoryError> {
        offline()
    }

    fn append_activity(&self, _entry: ActivityEntry) -> Result<(), RepositoryError> {
        offline()
    }

    fn activity(&self) -> Result<Vec<ActivityEntry>, RepositoryError> {
        offline()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn records_router_with_service(service: TestService) -> axum::Router {
    records_router(Arc::new(service))
}
