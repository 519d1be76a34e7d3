pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::applications::handlers;
use crate::applications::upload::FORM_OVERHEAD_BYTES;
use crate::catalog::handlers as catalog;
use crate::errors::route_not_found;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_resume_bytes + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Job applications
        .route(
            "/api/job-applications",
            post(handlers::handle_submit).get(handlers::handle_list_applications),
        )
        .route(
            "/api/job-applications-summary",
            get(handlers::handle_status_summary),
        )
        // GET takes a job id, PATCH an application id
        .route(
            "/api/job-applications/:id",
            get(handlers::handle_list_for_job).patch(handlers::handle_update_status),
        )
        .route(
            "/api/resumes/:application_id",
            get(handlers::handle_download_resume),
        )
        // Catalog
        .route("/api/jobs", get(catalog::handle_list_jobs))
        .route("/api/jobs/:id", get(catalog::handle_get_job))
        .route("/api/trainings", get(catalog::handle_list_trainings))
        .route("/api/events", get(catalog::handle_list_events))
        .route("/api/testimonials", get(catalog::handle_list_testimonials))
        .route("/api/statistics", get(catalog::handle_list_statistics))
        .fallback(route_not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
