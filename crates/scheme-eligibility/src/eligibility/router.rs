use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::ApplicationStatus;
use crate::error::AppError;
use super::repository::{
    ApplicantRepository, ApplicationRepository, RepositoryError, SchemeRepository,
};
use super::service::{
    ApplicationService, ApplicationServiceError, EligibilityError, EligibilityService,
};

/// Query string accepted by the eligibility endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct EligibilityQuery {
    #[serde(default)]
    pub applicant: Option<String>,
    /// Evaluation date; defaults to today.
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Body for `POST /api/applications`. Eligibility is always checked as of the server's date.
#[derive(Debug, Deserialize)]
pub struct ApplicationRequest {
    pub applicant_id: String,
    pub scheme_id: String,
}

/// Body for `PUT /api/applications/:application_id`.
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ApplicationStatus,
}

/// Router builder exposing the eligibility query.
pub fn eligibility_router<A, S>(service: Arc<EligibilityService<A, S>>) -> Router
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
{
    Router::new()
        .route("/api/schemes/eligible", get(eligible_schemes_handler::<A, S>))
        .route(
            "/api/schemes/:scheme_id/explain",
            get(explain_handler::<A, S>),
        )
        .with_state(service)
}

/// Router builder exposing application intake and tracking.
pub fn application_router<A, S, R>(service: Arc<ApplicationService<A, S, R>>) -> Router
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route(
            "/api/applications",
            get(list_handler::<A, S, R>).post(submit_handler::<A, S, R>),
        )
        .route(
            "/api/applications/:application_id",
            get(fetch_handler::<A, S, R>)
                .put(update_handler::<A, S, R>)
                .delete(withdraw_handler::<A, S, R>),
        )
        .with_state(service)
}

fn today_or(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (status, axum::Json(payload)).into_response()
}

fn eligibility_error_response(error: EligibilityError) -> Response {
    AppError::from(error).into_response()
}

fn application_error_response(error: ApplicationServiceError) -> Response {
    match error {
        ApplicationServiceError::Eligibility(inner) => eligibility_error_response(inner),
        ApplicationServiceError::NotEligible { .. } => {
            error_response(StatusCode::FORBIDDEN, error.to_string())
        }
        ApplicationServiceError::Repository(RepositoryError::NotFound) => {
            error_response(StatusCode::NOT_FOUND, "application not found")
        }
        ApplicationServiceError::Repository(RepositoryError::Conflict) => {
            error_response(StatusCode::CONFLICT, "application already exists")
        }
        other => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn eligible_schemes_handler<A, S>(
    State(service): State<Arc<EligibilityService<A, S>>>,
    Query(query): Query<EligibilityQuery>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
{
    let Some(applicant_id) = query.applicant.filter(|id| !id.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "applicant is required");
    };

    match service.find_eligible_schemes(&applicant_id, today_or(query.as_of)) {
        Ok(schemes) => (StatusCode::OK, axum::Json(schemes)).into_response(),
        Err(error) => eligibility_error_response(error),
    }
}

pub(crate) async fn explain_handler<A, S>(
    State(service): State<Arc<EligibilityService<A, S>>>,
    Path(scheme_id): Path<String>,
    Query(query): Query<EligibilityQuery>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
{
    let Some(applicant_id) = query.applicant.filter(|id| !id.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "applicant is required");
    };

    match service.explain(&applicant_id, &scheme_id, today_or(query.as_of)) {
        Ok(explanation) => (StatusCode::OK, axum::Json(explanation)).into_response(),
        Err(error) => eligibility_error_response(error),
    }
}

pub(crate) async fn submit_handler<A, S, R>(
    State(service): State<Arc<ApplicationService<A, S, R>>>,
    axum::Json(request): axum::Json<ApplicationRequest>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.submit(
        &request.applicant_id,
        &request.scheme_id,
        Local::now().date_naive(),
    ) {
        Ok(application) => (StatusCode::CREATED, axum::Json(application)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn list_handler<A, S, R>(
    State(service): State<Arc<ApplicationService<A, S, R>>>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.list() {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn fetch_handler<A, S, R>(
    State(service): State<Arc<ApplicationService<A, S, R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.get(&application_id) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn update_handler<A, S, R>(
    State(service): State<Arc<ApplicationService<A, S, R>>>,
    Path(application_id): Path<String>,
    axum::Json(update): axum::Json<StatusUpdate>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.update_status(&application_id, update.status) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => application_error_response(error),
    }
}

pub(crate) async fn withdraw_handler<A, S, R>(
    State(service): State<Arc<ApplicationService<A, S, R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    A: ApplicantRepository + 'static,
    S: SchemeRepository + 'static,
    R: ApplicationRepository + 'static,
{
    match service.withdraw(&application_id) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => application_error_response(error),
    }
}
