use dossier::config::SmtpSettings;
use dossier::records::{
    join_documents, split_documents, ActivityEntry, Employee, EmployeeId, FileTrackingRecord,
    MailMessage, Notifier, NotifyError, RecordStore, RepositoryError, TrackingId, UserAccount,
    UserId,
};
use dossier::resolution::SubmittedChecklistRecord;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Custody row as persisted: the document list is stored comma-joined.
#[derive(Debug, Clone)]
struct TrackingRow {
    employee_id: EmployeeId,
    date_taken: String,
    taken_by: String,
    taken_by_email: Option<String>,
    file_taken_time: String,
    expected_return_date: Option<String>,
    documents_taken: String,
    status_of_documents: String,
}

impl TrackingRow {
    fn from_record(record: FileTrackingRecord) -> Self {
        Self {
            employee_id: record.employee_id,
            date_taken: record.date_taken,
            taken_by: record.taken_by,
            taken_by_email: record.taken_by_email,
            file_taken_time: record.file_taken_time,
            expected_return_date: record.expected_return_date,
            documents_taken: join_documents(&record.documents_taken),
            status_of_documents: record.status_of_documents,
        }
    }

    fn to_record(&self, id: TrackingId) -> FileTrackingRecord {
        FileTrackingRecord {
            id,
            employee_id: self.employee_id,
            date_taken: self.date_taken.clone(),
            taken_by: self.taken_by.clone(),
            taken_by_email: self.taken_by_email.clone(),
            file_taken_time: self.file_taken_time.clone(),
            expected_return_date: self.expected_return_date.clone(),
            documents_taken: split_documents(&self.documents_taken),
            status_of_documents: self.status_of_documents.clone(),
        }
    }
}

#[derive(Default)]
struct Tables {
    employees: BTreeMap<EmployeeId, Employee>,
    checklist: Vec<(EmployeeId, SubmittedChecklistRecord)>,
    tracking: BTreeMap<TrackingId, TrackingRow>,
    users: BTreeMap<UserId, UserAccount>,
    activity: Vec<ActivityEntry>,
    last_employee_id: u64,
    last_tracking_id: u64,
    last_user_id: u64,
}

/// Process-local record store. Contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryRecordStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRecordStore {
    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("record store lock poisoned".to_string()))
    }
}

impl RecordStore for InMemoryRecordStore {
    fn insert_employee(&self, mut employee: Employee) -> Result<Employee, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .employees
            .values()
            .any(|existing| existing.employee_code == employee.employee_code)
        {
            return Err(RepositoryError::Conflict);
        }
        tables.last_employee_id += 1;
        employee.id = EmployeeId(tables.last_employee_id);
        tables.employees.insert(employee.id, employee.clone());
        Ok(employee)
    }

    fn employee_by_code(&self, code: &str) -> Result<Option<Employee>, RepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .employees
            .values()
            .find(|employee| employee.employee_code == code)
            .cloned())
    }

    fn employee_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        Ok(self.tables()?.employees.get(&id).cloned())
    }

    fn employees(&self) -> Result<Vec<Employee>, RepositoryError> {
        Ok(self.tables()?.employees.values().cloned().collect())
    }

    fn delete_employee(&self, id: EmployeeId) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if tables.employees.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tables.checklist.retain(|(owner, _)| *owner != id);
        tables.tracking.retain(|_, row| row.employee_id != id);
        Ok(())
    }

    fn insert_checklist(
        &self,
        employee_id: EmployeeId,
        record: SubmittedChecklistRecord,
    ) -> Result<(), RepositoryError> {
        self.tables()?.checklist.push((employee_id, record));
        Ok(())
    }

    fn checklist_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<SubmittedChecklistRecord>, RepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .checklist
            .iter()
            .filter(|(owner, _)| *owner == employee_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn insert_tracking(
        &self,
        record: FileTrackingRecord,
    ) -> Result<FileTrackingRecord, RepositoryError> {
        let mut tables = self.tables()?;
        tables.last_tracking_id += 1;
        let id = TrackingId(tables.last_tracking_id);
        let row = TrackingRow::from_record(record);
        let stored = row.to_record(id);
        tables.tracking.insert(id, row);
        Ok(stored)
    }

    fn tracking_for(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<FileTrackingRecord>, RepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .tracking
            .iter()
            .filter(|(_, row)| row.employee_id == employee_id)
            .map(|(id, row)| row.to_record(*id))
            .collect())
    }

    fn tracking_by_id(
        &self,
        id: TrackingId,
    ) -> Result<Option<FileTrackingRecord>, RepositoryError> {
        Ok(self.tables()?.tracking.get(&id).map(|row| row.to_record(id)))
    }

    fn all_tracking(&self) -> Result<Vec<FileTrackingRecord>, RepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .tracking
            .iter()
            .map(|(id, row)| row.to_record(*id))
            .collect())
    }

    fn update_tracking(&self, record: FileTrackingRecord) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        let id = record.id;
        match tables.tracking.get_mut(&id) {
            Some(row) => {
                *row = TrackingRow::from_record(record);
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn delete_tracking(&self, id: TrackingId) -> Result<(), RepositoryError> {
        match self.tables()?.tracking.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn insert_user(&self, mut account: UserAccount) -> Result<UserAccount, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .users
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(RepositoryError::Conflict);
        }
        tables.last_user_id += 1;
        account.id = UserId(tables.last_user_id);
        tables.users.insert(account.id, account.clone());
        Ok(account)
    }

    fn user_by_username(&self, username: &str) -> Result<Option<UserAccount>, RepositoryError> {
        let tables = self.tables()?;
        Ok(tables
            .users
            .values()
            .find(|account| account.username == username)
            .cloned())
    }

    fn users(&self) -> Result<Vec<UserAccount>, RepositoryError> {
        Ok(self.tables()?.users.values().cloned().collect())
    }

    fn delete_user(&self, id: UserId) -> Result<(), RepositoryError> {
        match self.tables()?.users.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }

    fn append_activity(&self, entry: ActivityEntry) -> Result<(), RepositoryError> {
        self.tables()?.activity.push(entry);
        Ok(())
    }

    fn activity(&self) -> Result<Vec<ActivityEntry>, RepositoryError> {
        Ok(self.tables()?.activity.clone())
    }
}

/// Most recent messages kept in the outbox; older ones are dropped.
const OUTBOX_CAPACITY: usize = 64;

/// Queues outbound mail for the configured relay. Without SMTP settings every
/// message is refused with [`NotifyError::NotConfigured`].
#[derive(Default, Clone)]
pub(crate) struct OutboxNotifier {
    smtp: Option<SmtpSettings>,
    outbox: Arc<Mutex<VecDeque<MailMessage>>>,
}

impl OutboxNotifier {
    pub(crate) fn new(smtp: Option<SmtpSettings>) -> Self {
        Self {
            smtp,
            outbox: Arc::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn queued(&self) -> Vec<MailMessage> {
        self.outbox
            .lock()
            .expect("outbox mutex poisoned")
            .iter()
            .cloned()
            .collect()
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, message: MailMessage) -> Result<(), NotifyError> {
        let Some(smtp) = &self.smtp else {
            return Err(NotifyError::NotConfigured);
        };

        info!(
            relay = %smtp.server,
            port = smtp.port,
            from = %smtp.from,
            to = %message.to,
            subject = %message.subject,
            "mail queued"
        );
        let mut outbox = self
            .outbox
            .lock()
            .map_err(|_| NotifyError::Transport("outbox lock poisoned".to_string()))?;
        if outbox.len() == OUTBOX_CAPACITY {
            outbox.pop_front();
        }
        outbox.push_back(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(documents: &[&str]) -> FileTrackingRecord {
        FileTrackingRecord {
            id: TrackingId(0),
            employee_id: EmployeeId(1),
            date_taken: "3/14/2024".to_string(),
            taken_by: "Asha Rao".to_string(),
            taken_by_email: None,
            file_taken_time: "10:30".to_string(),
            expected_return_date: None,
            documents_taken: documents.iter().map(|d| d.to_string()).collect(),
            status_of_documents: "Complete".to_string(),
        }
    }

    fn smtp() -> SmtpSettings {
        SmtpSettings {
            server: "smtp.example.com".to_string(),
            port: 587,
            username: "records@example.com".to_string(),
            password: "secret".to_string(),
            from: "records@example.com".to_string(),
        }
    }

    #[test]
    fn tracking_ids_are_assigned_in_order() {
        let store = InMemoryRecordStore::default();
        let first = store
            .insert_tracking(record(&["PAN Card"]))
            .expect("insert succeeds");
        let second = store
            .insert_tracking(record(&["Aadhar Card"]))
            .expect("insert succeeds");

        assert_eq!(first.id, TrackingId(1));
        assert_eq!(second.id, TrackingId(2));
        let all = store.all_tracking().expect("list succeeds");
        assert_eq!(all[1].documents_taken, vec!["Aadhar Card"]);
    }

    #[test]
    fn document_lists_survive_comma_storage() {
        let store = InMemoryRecordStore::default();
        let stored = store
            .insert_tracking(record(&["PAN Card", " ", "Bank Account Details"]))
            .expect("insert succeeds");

        let loaded = store
            .tracking_by_id(stored.id)
            .expect("lookup succeeds")
            .expect("record present");
        assert_eq!(
            loaded.documents_taken,
            vec!["PAN Card", "Bank Account Details"]
        );
    }

    #[test]
    fn missing_rows_report_not_found() {
        let store = InMemoryRecordStore::default();
        assert!(matches!(
            store.delete_tracking(TrackingId(9)),
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.update_tracking(record(&[])),
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            store.delete_employee(EmployeeId(3)),
            Err(RepositoryError::NotFound)
        ));
    }

    #[test]
    fn outbox_refuses_mail_without_smtp() {
        let notifier = OutboxNotifier::new(None);
        let message = MailMessage {
            to: "asha.rao@example.com".to_string(),
            subject: "File Taken Confirmation for Employee Code 40273".to_string(),
            body: "Hi".to_string(),
        };

        assert!(matches!(
            notifier.send(message.clone()),
            Err(NotifyError::NotConfigured)
        ));
        assert!(notifier.queued().is_empty());

        let configured = OutboxNotifier::new(Some(smtp()));
        configured.send(message.clone()).expect("mail queued");
        assert_eq!(configured.queued(), vec![message]);
    }

    #[test]
    fn outbox_keeps_only_recent_mail() {
        let notifier = OutboxNotifier::new(Some(smtp()));
        for n in 0..OUTBOX_CAPACITY + 5 {
            notifier
                .send(MailMessage {
                    to: "asha.rao@example.com".to_string(),
                    subject: format!("File Taken Confirmation {n}"),
                    body: "Hi".to_string(),
                })
                .expect("mail queued");
        }

        let queued = notifier.queued();
        assert_eq!(queued.len(), OUTBOX_CAPACITY);
        assert_eq!(queued[0].subject, "File Taken Confirmation 5");
        assert_eq!(
            queued[OUTBOX_CAPACITY - 1].subject,
            format!("File Taken Confirmation {}", OUTBOX_CAPACITY + 4)
        );
    }
}
