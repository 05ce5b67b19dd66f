use crate::infra::{InMemoryRecordStore, OutboxNotifier};
use clap::Args;
use dossier::config::AppConfig;
use dossier::error::AppError;
use dossier::records::{
    ImportError, ImportSummary, NewEmployee, RecordsService, RecordsServiceError, RecordsSettings,
    TrackingImporter,
};
use dossier::resolution::{classify_entity, LockerLookupView, ResolutionTables};
use dossier::telemetry;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct CodeArgs {
    /// Employee code, e.g. 40273
    pub(crate) code: String,
}

#[derive(Args, Debug)]
pub(crate) struct ImportTrackingArgs {
    /// Tracking export with employee_id, date_taken, taken_by, file_taken_time,
    /// documents_taken, status_of_documents, taken_by_email, expected_return_date columns
    pub(crate) csv: PathBuf,
    /// Employee roster (employee_code, name, ...) loaded before the import
    #[arg(long)]
    pub(crate) employees: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    employees_loaded: usize,
    imported: usize,
    skipped: Vec<String>,
}

pub(crate) fn run_locker(args: CodeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let tables = ResolutionTables::from_config(&config.resolution)?;
    let assignment = tables
        .lockers
        .resolve(&args.code)
        .map_err(RecordsServiceError::from)?;

    print_json(&LockerLookupView::from(assignment))
}

pub(crate) fn run_entity(args: CodeArgs) -> Result<(), AppError> {
    println!("{}", classify_entity(&args.code));
    Ok(())
}

pub(crate) fn run_import_tracking(args: ImportTrackingArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    let store = Arc::new(InMemoryRecordStore::default());
    let service = RecordsService::new(
        store.clone(),
        Arc::new(OutboxNotifier::new(None)),
        Arc::new(ResolutionTables::from_config(&config.resolution)?),
        RecordsSettings {
            public_url: config.records.public_url.clone(),
        },
    );

    let employees_loaded = match &args.employees {
        Some(path) => load_roster(&service, &config, path)?,
        None => 0,
    };
    let summary = TrackingImporter::from_path(store.as_ref(), &args.csv)?;

    print_json(&report(employees_loaded, summary))
}

fn load_roster(
    service: &RecordsService<InMemoryRecordStore, OutboxNotifier>,
    config: &AppConfig,
    path: &Path,
) -> Result<usize, AppError> {
    service.bootstrap_super_admin(
        &config.records.bootstrap_username,
        &config.records.bootstrap_password,
    )?;
    let actor = service.actor(&config.records.bootstrap_username)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(ImportError::from)?;
    let mut loaded = 0;
    for row in reader.deserialize::<NewEmployee>() {
        let employee = row.map_err(ImportError::from)?;
        service.add_employee(&actor, employee)?;
        loaded += 1;
    }
    Ok(loaded)
}

fn report(employees_loaded: usize, summary: ImportSummary) -> ImportReport {
    ImportReport {
        employees_loaded,
        imported: summary.imported,
        skipped: summary.skipped,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
