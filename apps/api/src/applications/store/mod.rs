mod memory;
mod postgres;

pub use memory::MemoryApplicationStore;
pub use postgres::PgApplicationStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::application::{
    ApplicationStatus, JobApplication, NewApplication, StatusCounts, StoredResume,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Filter for listing applications across all jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
}

/// Persistence for job applications. Records are never deleted and only
/// `status` changes after insert.
#[async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Persists a new application with status `pending` and `created_at = now`.
    async fn insert(&self, new: NewApplication) -> Result<JobApplication, StoreError>;

    /// Applications for one job, oldest first.
    async fn list_by_job(&self, job_id: &str) -> Result<Vec<JobApplication>, StoreError>;

    /// Applications across all jobs, newest first.
    async fn list(&self, filter: ApplicationFilter) -> Result<Vec<JobApplication>, StoreError>;

    /// Returns `None` when no application has this id.
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, StoreError>;

    async fn fetch_resume(&self, id: Uuid) -> Result<Option<StoredResume>, StoreError>;

    async fn status_counts(&self) -> Result<StatusCounts, StoreError>;
}
