use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;

use super::access::{AccessError, Actor};
use super::domain::{
    ChecklistSubmission, NewEmployee, NewFileTracking, NewUser, SearchField,
    TrackingContactUpdate, TrackingId, UserId,
};
use super::repository::{Notifier, RecordStore, RepositoryError};
use super::service::{RecordsService, RecordsServiceError};
use crate::resolution::classify_entity;

/// Request header naming the signed-in user.
///
/// The value is trusted as given. It must be set by an authenticating proxy in front of
/// this router, which strips any client-supplied copy; `login` only checks credentials
/// and issues nothing the header is verified against.
pub const ACTOR_HEADER: &str = "x-dossier-user";

type SharedService<S, N> = State<Arc<RecordsService<S, N>>>;

/// Router builder exposing the personnel records API.
pub fn records_router<S, N>(service: Arc<RecordsService<S, N>>) -> Router
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/login", post(login_handler::<S, N>))
        .route("/api/v1/lockers/:code", get(locker_handler::<S, N>))
        .route("/api/v1/entities/:code", get(entity_handler::<S, N>))
        .route(
            "/api/v1/employees",
            get(list_employees_handler::<S, N>).post(add_employee_handler::<S, N>),
        )
        .route(
            "/api/v1/employees/:code",
            get(employee_detail_handler::<S, N>).delete(delete_employee_handler::<S, N>),
        )
        .route(
            "/api/v1/employees/:code/checklist",
            get(checklist_handler::<S, N>).post(record_checklist_handler::<S, N>),
        )
        .route(
            "/api/v1/employees/:code/tracking",
            get(tracking_handler::<S, N>)
                .post(add_tracking_handler::<S, N>)
                .put(edit_first_tracking_handler::<S, N>),
        )
        .route(
            "/api/v1/tracking/:id",
            patch(update_tracking_handler::<S, N>).delete(delete_tracking_handler::<S, N>),
        )
        .route("/api/v1/ocr/lookup", post(ocr_lookup_handler::<S, N>))
        .route("/api/v1/dashboard", get(dashboard_handler::<S, N>))
        .route("/api/v1/activity", get(activity_handler::<S, N>))
        .route("/api/v1/users", post(create_user_handler::<S, N>))
        .route("/api/v1/users/:username", get(profile_handler::<S, N>))
        .route("/api/v1/admins", get(list_admins_handler::<S, N>))
        .route(
            "/api/v1/admins/:id",
            axum::routing::delete(delete_admin_handler::<S, N>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EmployeeQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OcrLookupRequest {
    pub text: String,
}

pub(crate) async fn login_handler<S, N>(
    State(service): SharedService<S, N>,
    Json(request): Json<LoginRequest>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    respond(StatusCode::OK, service.login(&request.username, &request.password))
}

pub(crate) async fn locker_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|_| service.resolve_locker(&code));
    respond(StatusCode::OK, result)
}

pub(crate) async fn entity_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).map(|_| {
        json!({
            "code": code,
            "entity": classify_entity(&code),
        })
    });
    respond(StatusCode::OK, result)
}

pub(crate) async fn list_employees_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Query(query): Query<EmployeeQuery>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let field = query
        .filter
        .as_deref()
        .map(SearchField::from_param)
        .unwrap_or_default();
    let result = actor(&service, &headers)
        .and_then(|actor| service.list_employees(&actor, query.search.as_deref(), field));
    respond(StatusCode::OK, result)
}

pub(crate) async fn add_employee_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Json(payload): Json<NewEmployee>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.add_employee(&actor, payload));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn employee_detail_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.employee_detail(&actor, &code));
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_employee_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.delete_employee(&actor, &code));
    respond_empty(result)
}

pub(crate) async fn checklist_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result =
        actor(&service, &headers).and_then(|actor| service.checklist_status(&actor, &code));
    respond(StatusCode::OK, result)
}

pub(crate) async fn record_checklist_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Json(submission): Json<ChecklistSubmission>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers)
        .and_then(|actor| service.record_checklist(&actor, &code, submission));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn tracking_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.tracking(&actor, &code));
    respond(StatusCode::OK, result)
}

pub(crate) async fn add_tracking_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Json(payload): Json<NewFileTracking>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result =
        actor(&service, &headers).and_then(|actor| service.add_tracking(&actor, &code, payload));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn edit_first_tracking_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(code): Path<String>,
    Json(payload): Json<NewFileTracking>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers)
        .and_then(|actor| service.edit_first_tracking(&actor, &code, payload));
    respond(StatusCode::OK, result)
}

pub(crate) async fn update_tracking_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(id): Path<u64>,
    Json(update): Json<TrackingContactUpdate>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers)
        .and_then(|actor| service.update_tracking_contact(&actor, TrackingId(id), update));
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_tracking_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result =
        actor(&service, &headers).and_then(|actor| service.delete_tracking(&actor, TrackingId(id)));
    respond_empty(result)
}

pub(crate) async fn ocr_lookup_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Json(request): Json<OcrLookupRequest>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result =
        actor(&service, &headers).and_then(|actor| service.ocr_lookup(&actor, &request.text));
    respond(StatusCode::OK, result)
}

pub(crate) async fn dashboard_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.dashboard(&actor));
    respond(StatusCode::OK, result)
}

pub(crate) async fn activity_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.activity(&actor));
    respond(StatusCode::OK, result)
}

pub(crate) async fn create_user_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Json(payload): Json<NewUser>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.create_user(&actor, payload));
    respond(StatusCode::CREATED, result)
}

pub(crate) async fn profile_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(username): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.profile(&actor, &username));
    respond(StatusCode::OK, result)
}

pub(crate) async fn list_admins_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result = actor(&service, &headers).and_then(|actor| service.list_admins(&actor));
    respond(StatusCode::OK, result)
}

pub(crate) async fn delete_admin_handler<S, N>(
    State(service): SharedService<S, N>,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Response
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let result =
        actor(&service, &headers).and_then(|actor| service.delete_admin(&actor, UserId(id)));
    respond_empty(result)
}

fn actor<S, N>(
    service: &RecordsService<S, N>,
    headers: &HeaderMap,
) -> Result<Actor, RecordsServiceError>
where
    S: RecordStore + 'static,
    N: Notifier + 'static,
{
    let username = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AccessError::Unauthenticated)?;
    service.actor(username)
}

fn respond<T: Serialize>(status: StatusCode, result: Result<T, RecordsServiceError>) -> Response {
    match result {
        Ok(body) => (status, Json(body)).into_response(),
        Err(err) => err.into_response(),
    }
}

fn respond_empty(result: Result<(), RecordsServiceError>) -> Response {
    match result {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

impl IntoResponse for RecordsServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            RecordsServiceError::Access(AccessError::Unauthenticated)
            | RecordsServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            RecordsServiceError::Access(_) => StatusCode::FORBIDDEN,
            RecordsServiceError::EmployeeNotFound(_)
            | RecordsServiceError::TrackingNotFound
            | RecordsServiceError::UserNotFound(_)
            | RecordsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            RecordsServiceError::Validation(_) | RecordsServiceError::EmployeeCode(_) => {
                StatusCode::BAD_REQUEST
            }
            RecordsServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            RecordsServiceError::Repository(RepositoryError::Unavailable(_)) => {
                error!(error = %self, "record store failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let payload = json!({
            "error": self.to_string(),
        });
        (status, Json(payload)).into_response()
    }
}
