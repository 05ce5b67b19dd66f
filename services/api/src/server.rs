use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRecordStore, OutboxNotifier};
use crate::routes::with_records_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use dossier::config::AppConfig;
use dossier::error::AppError;
use dossier::records::{RecordsService, RecordsSettings};
use dossier::resolution::ResolutionTables;
use dossier::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, config.environment)?;

    let tables = Arc::new(ResolutionTables::from_config(&config.resolution)?);
    info!(
        ranges = tables.lockers.ranges().len(),
        strict = config.resolution.strict_lockers,
        documents = tables.required_documents.len(),
        "resolution tables loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    if config.mail.smtp.is_none() {
        warn!("SMTP settings incomplete; custody confirmation mail is disabled");
    }
    let store = Arc::new(InMemoryRecordStore::default());
    let notifier = Arc::new(OutboxNotifier::new(config.mail.smtp.clone()));
    let records_service = Arc::new(RecordsService::new(
        store,
        notifier,
        tables,
        RecordsSettings {
            public_url: config.records.public_url.clone(),
        },
    ));
    records_service.bootstrap_super_admin(
        &config.records.bootstrap_username,
        &config.records.bootstrap_password,
    )?;

    let app = with_records_routes(records_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "personnel records service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
