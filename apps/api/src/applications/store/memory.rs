use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ApplicationFilter, ApplicationStore, StoreError};
use crate::models::application::{
    ApplicationStatus, JobApplication, NewApplication, StatusCounts, StoredResume,
};

/// In-process store for local runs (`STORE=memory`) and tests.
/// Entries are kept in insertion order.
#[derive(Default)]
pub struct MemoryApplicationStore {
    entries: RwLock<Vec<(JobApplication, StoredResume)>>,
}

impl MemoryApplicationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApplicationStore for MemoryApplicationStore {
    async fn insert(&self, new: NewApplication) -> Result<JobApplication, StoreError> {
        let application = JobApplication {
            id: Uuid::new_v4(),
            job_id: new.job_id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            resume_content_type: new.resume.content_type.clone(),
            resume_size: new.resume.data.len() as i64,
            status: ApplicationStatus::default(),
            created_at: Utc::now(),
        };
        self.entries
            .write()
            .await
            .push((application.clone(), new.resume));
        Ok(application)
    }

    async fn list_by_job(&self, job_id: &str) -> Result<Vec<JobApplication>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|(app, _)| app.job_id == job_id)
            .map(|(app, _)| app.clone())
            .collect())
    }

    async fn list(&self, filter: ApplicationFilter) -> Result<Vec<JobApplication>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|(app, _)| filter.status.map_or(true, |s| app.status == s))
            .map(|(app, _)| app.clone())
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, StoreError> {
        let mut entries = self.entries.write().await;
        Ok(entries
            .iter_mut()
            .find(|(app, _)| app.id == id)
            .map(|(app, _)| {
                app.status = status;
                app.clone()
            }))
    }

    async fn fetch_resume(&self, id: Uuid) -> Result<Option<StoredResume>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|(app, _)| app.id == id)
            .map(|(_, resume)| resume.clone()))
    }

    async fn status_counts(&self) -> Result<StatusCounts, StoreError> {
        let mut counts = StatusCounts::default();
        for (app, _) in self.entries.read().await.iter() {
            counts.add(app.status, 1);
        }
        Ok(counts)
    }
}
