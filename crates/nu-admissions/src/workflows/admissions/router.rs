use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::fees::FeeApplication;
use super::identifiers::{
    is_valid_ugc_id, is_valid_university_id, parse_ugc_id, parse_university_id,
    verify_ugc_checksum, IdentifierError, ParsedUgcId, ParsedUniversityId, SequenceError,
};
use super::repository::{IdentifierRepository, NotificationPublisher, RepositoryError};
use super::service::{AdmissionsService, AdmissionsServiceError, ApprovalRequest};
use super::transfer::{AcademicRecord, StagedTransferCourse};

/// Router builder exposing the fee, identifier and transcript endpoints.
pub fn admissions_router<R, N>(service: Arc<AdmissionsService<R, N>>) -> Router
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    Router::new()
        .route("/api/v1/waivers/resolve", post(resolve_waiver_handler::<R, N>))
        .route("/api/v1/fees/quote", post(quote_handler::<R, N>))
        .route(
            "/api/v1/fees/first-semester",
            post(first_semester_handler::<R, N>),
        )
        .route("/api/v1/identifiers", post(issue_handler::<R, N>))
        .route("/api/v1/identifiers/validate", post(validate_handler))
        .route(
            "/api/v1/identifiers/:university_id",
            get(lookup_handler::<R, N>),
        )
        .route(
            "/api/v1/identifiers/:university_id/deactivate",
            post(deactivate_handler::<R, N>),
        )
        .route(
            "/api/v1/transcripts/transfer",
            post(transfer_handler::<R, N>),
        )
        .with_state(service)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaiverSelection {
    #[serde(default)]
    pub policy_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstSemesterRequest {
    pub program_id: String,
    #[serde(default)]
    pub policy_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateRequest {
    pub value: String,
}

/// Format verdicts for a candidate identifier string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationView {
    pub value: String,
    pub university_id: bool,
    pub ugc_id: bool,
    pub ugc_checksum_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_university_id: Option<ParsedUniversityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_ugc_id: Option<ParsedUgcId>,
}

impl ValidationView {
    pub fn inspect(value: &str) -> Self {
        Self {
            value: value.to_string(),
            university_id: is_valid_university_id(value),
            ugc_id: is_valid_ugc_id(value),
            ugc_checksum_verified: verify_ugc_checksum(value),
            parsed_university_id: parse_university_id(value),
            parsed_ugc_id: parse_ugc_id(value),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub courses: Vec<StagedTransferCourse>,
    #[serde(default)]
    pub existing: AcademicRecord,
}

pub(crate) async fn resolve_waiver_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Json(selection): Json<WaiverSelection>,
) -> Response
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    let percentage = service.resolve_waiver(&selection.policy_ids);
    (StatusCode::OK, Json(json!({ "percentage": percentage }))).into_response()
}

pub(crate) async fn quote_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Json(application): Json<FeeApplication>,
) -> Response
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.quote(&application) {
        Ok(quote) => (StatusCode::OK, Json(quote)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn first_semester_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Json(request): Json<FirstSemesterRequest>,
) -> Response
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.first_semester(&request.program_id, &request.policy_ids) {
        Ok(fee) => (StatusCode::OK, Json(fee)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn issue_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Json(request): Json<ApprovalRequest>,
) -> Response
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.approve(&request) {
        Ok(pair) => (StatusCode::CREATED, Json(pair)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn lookup_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Path(university_id): Path<String>,
) -> Response
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.lookup(&university_id) {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn deactivate_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Path(university_id): Path<String>,
) -> Response
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.deactivate(&university_id) {
        Ok(pair) => (StatusCode::OK, Json(pair)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn validate_handler(Json(request): Json<ValidateRequest>) -> Response {
    let view = ValidationView::inspect(request.value.trim());
    (StatusCode::OK, Json(view)).into_response()
}

pub(crate) async fn transfer_handler<R, N>(
    State(service): State<Arc<AdmissionsService<R, N>>>,
    Json(request): Json<TransferRequest>,
) -> Response
where
    R: IdentifierRepository + 'static,
    N: NotificationPublisher + 'static,
{
    match service.combine_transfer(&request.courses, &request.existing) {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn status_for(err: &AdmissionsServiceError) -> StatusCode {
    match err {
        AdmissionsServiceError::Fee(_) | AdmissionsServiceError::Transcript(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AdmissionsServiceError::Identifier(IdentifierError::MalformedUniversityId(_)) => {
            StatusCode::BAD_REQUEST
        }
        AdmissionsServiceError::Identifier(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AdmissionsServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        AdmissionsServiceError::Repository(RepositoryError::Conflict)
        | AdmissionsServiceError::Sequence(SequenceError::Exhausted { .. }) => StatusCode::CONFLICT,
        AdmissionsServiceError::Repository(RepositoryError::Unavailable(_))
        | AdmissionsServiceError::Sequence(SequenceError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(err: AdmissionsServiceError) -> Response {
    let status = status_for(&err);
    let payload = json!({ "error": err.to_string() });
    (status, Json(payload)).into_response()
}
