//! Axum route handlers for the Job Applications API.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::applications::store::ApplicationFilter;
use crate::applications::upload::read_submission;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::models::application::{ApplicationStatus, JobApplicationView, StatusCounts};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub message: &'static str,
    pub application: JobApplicationView,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/job-applications
///
/// Multipart form with `jobId`, `name`, `email`, `phone` and a PDF `resume`.
pub async fn handle_submit(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let form = read_submission(multipart?, state.config.max_resume_bytes).await?;

    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Resume file is required".to_string()))?;
    let new_application = form.fields.into_new_application(resume)?;

    let application = state.store.insert(new_application).await?;
    info!(
        application_id = %application.id,
        job_id = %application.job_id,
        resume_bytes = application.resume_size,
        "Job application submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Application submitted successfully",
            application: JobApplicationView::from(&application),
        }),
    ))
}

/// GET /api/job-applications
///
/// All applications, newest first, optionally filtered by `?status=`.
pub async fn handle_list_applications(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<ListQuery>,
) -> Result<Json<Vec<JobApplicationView>>, AppError> {
    let status = query
        .status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse::<ApplicationStatus>)
        .transpose()?;

    let applications = state.store.list(ApplicationFilter { status }).await?;
    Ok(Json(applications.iter().map(JobApplicationView::from).collect()))
}

/// GET /api/job-applications-summary
pub async fn handle_status_summary(
    State(state): State<AppState>,
) -> Result<Json<StatusCounts>, AppError> {
    Ok(Json(state.store.status_counts().await?))
}

/// GET /api/job-applications/:jobId
pub async fn handle_list_for_job(
    State(state): State<AppState>,
    AppPath(job_id): AppPath<String>,
) -> Result<Json<Vec<JobApplicationView>>, AppError> {
    let applications = state.store.list_by_job(&job_id).await?;
    Ok(Json(applications.iter().map(JobApplicationView::from).collect()))
}

/// PATCH /api/job-applications/:applicationId
///
/// Body `{ "status": "<pending|reviewed|accepted|rejected>" }`.
pub async fn handle_update_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
    AppJson(request): AppJson<StatusUpdateRequest>,
) -> Result<Json<JobApplicationView>, AppError> {
    let id = parse_application_id(&id)?;
    let status: ApplicationStatus = request.status.trim().parse()?;

    let application = state
        .store
        .update_status(id, status)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;

    info!(application_id = %id, status = %status, "Application status updated");
    Ok(Json(JobApplicationView::from(&application)))
}

/// GET /api/resumes/:applicationId
pub async fn handle_download_resume(
    State(state): State<AppState>,
    AppPath(id): AppPath<String>,
) -> Result<Response, AppError> {
    let id = parse_application_id(&id)?;
    let resume = state
        .store
        .fetch_resume(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Resume not found".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, resume.content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"resume-{id}.pdf\""),
            ),
        ],
        resume.data,
    )
        .into_response())
}

fn parse_application_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::Validation(format!("Invalid application id '{raw}'")))
}
