use axum::{extract::State, Json};

use crate::catalog::JobQuery;
use crate::errors::AppError;
use crate::extract::{AppPath, AppQuery};
use crate::models::catalog::{Event, Job, Statistic, Testimonial, TrainingProgram};
use crate::state::AppState;

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<JobQuery>,
) -> Json<Vec<Job>> {
    Json(
        state
            .catalog
            .search_jobs(&query)
            .into_iter()
            .cloned()
            .collect(),
    )
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<u32>,
) -> Result<Json<Job>, AppError> {
    state
        .catalog
        .job(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// GET /api/trainings
pub async fn handle_list_trainings(State(state): State<AppState>) -> Json<Vec<TrainingProgram>> {
    Json(state.catalog.trainings.clone())
}

/// GET /api/events
pub async fn handle_list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.catalog.events.clone())
}

/// GET /api/testimonials
pub async fn handle_list_testimonials(State(state): State<AppState>) -> Json<Vec<Testimonial>> {
    Json(state.catalog.testimonials.clone())
}

/// GET /api/statistics
pub async fn handle_list_statistics(State(state): State<AppState>) -> Json<Vec<Statistic>> {
    Json(state.catalog.statistics.clone())
}
