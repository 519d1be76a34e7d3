use async_trait::async_trait;
use bytes::Bytes;
use sqlx::PgPool;
use uuid::Uuid;

use super::{ApplicationFilter, ApplicationStore, StoreError};
use crate::models::application::{
    ApplicationStatus, JobApplication, JobApplicationRow, NewApplication, StatusCounts,
    StoredResume,
};

/// Columns selected for every `JobApplicationRow`; the résumé body is left out.
const APPLICATION_COLUMNS: &str = "id, job_id, name, email, phone, resume_content_type, \
     octet_length(resume_data)::BIGINT AS resume_size, status, created_at";

/// `ApplicationStore` over the `job_applications` table. The résumé is kept
/// inline in a BYTEA column next to its content type.
#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_domain(rows: Vec<JobApplicationRow>) -> Result<Vec<JobApplication>, StoreError> {
    rows.into_iter()
        .map(|row| JobApplication::try_from(row).map_err(|e| StoreError::Corrupt(e.to_string())))
        .collect()
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn insert(&self, new: NewApplication) -> Result<JobApplication, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO job_applications
                (id, job_id, name, email, phone, resume_data, resume_content_type, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {APPLICATION_COLUMNS}
            "#
        );

        let row: JobApplicationRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(&new.job_id)
            .bind(&new.name)
            .bind(&new.email)
            .bind(&new.phone)
            .bind(new.resume.data.as_ref())
            .bind(&new.resume.content_type)
            .bind(ApplicationStatus::default().as_str())
            .fetch_one(&self.pool)
            .await?;

        JobApplication::try_from(row).map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn list_by_job(&self, job_id: &str) -> Result<Vec<JobApplication>, StoreError> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_applications \
             WHERE job_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let rows: Vec<JobApplicationRow> = sqlx::query_as(&sql)
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        into_domain(rows)
    }

    async fn list(&self, filter: ApplicationFilter) -> Result<Vec<JobApplication>, StoreError> {
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM job_applications \
             WHERE ($1::TEXT IS NULL OR status = $1) \
             ORDER BY created_at DESC, id DESC"
        );
        let rows: Vec<JobApplicationRow> = sqlx::query_as(&sql)
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await?;
        into_domain(rows)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, StoreError> {
        let sql = format!(
            "UPDATE job_applications SET status = $1 WHERE id = $2 RETURNING {APPLICATION_COLUMNS}"
        );
        let row: Option<JobApplicationRow> = sqlx::query_as(&sql)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(JobApplication::try_from)
            .transpose()
            .map_err(|e| StoreError::Corrupt(e.to_string()))
    }

    async fn fetch_resume(&self, id: Uuid) -> Result<Option<StoredResume>, StoreError> {
        let row: Option<(Vec<u8>, String)> = sqlx::query_as(
            "SELECT resume_data, resume_content_type FROM job_applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(data, content_type)| StoredResume {
            data: Bytes::from(data),
            content_type,
        }))
    }

    async fn status_counts(&self) -> Result<StatusCounts, StoreError> {
        let rows: Vec<(String, i64)> =
            sqlx::query_as("SELECT status, COUNT(*) FROM job_applications GROUP BY status")
                .fetch_all(&self.pool)
                .await?;

        let mut counts = StatusCounts::default();
        for (label, n) in rows {
            let status: ApplicationStatus = label
                .parse()
                .map_err(|e: crate::models::application::InvalidStatus| {
                    StoreError::Corrupt(e.to_string())
                })?;
            counts.add(status, n);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Connects to the database named by `DATABASE_URL` and applies migrations.
    /// Returns `None` when the variable is unset.
    async fn store() -> Option<(PgApplicationStore, PgPool)> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let pool = crate::db::create_pool(&url, 2).await.unwrap();
        Some((PgApplicationStore::new(pool.clone()), pool))
    }

    fn submission(job_id: &str) -> NewApplication {
        NewApplication {
            job_id: job_id.to_string(),
            name: "Alex Thompson".to_string(),
            email: "alex@example.com".to_string(),
            phone: "555-0100".to_string(),
            resume: StoredResume {
                data: Bytes::from_static(b"%PDF-1.4 postgres"),
                content_type: "application/pdf".to_string(),
            },
        }
    }

    #[tokio::test]
    #[ignore = "needs DATABASE_URL pointing at a disposable Postgres"]
    async fn test_postgres_store_round_trip() {
        let Some((store, pool)) = store().await else {
            return;
        };
        let job_id = format!("pg-test-{}", Uuid::new_v4());

        let first = store.insert(submission(&job_id)).await.unwrap();
        let second = store.insert(submission(&job_id)).await.unwrap();
        assert_eq!(first.status, ApplicationStatus::Pending);
        assert_eq!(first.resume_size, 17);

        let listed: Vec<Uuid> = store
            .list_by_job(&job_id)
            .await
            .unwrap()
            .into_iter()
            .map(|app| app.id)
            .collect();
        assert_eq!(listed, vec![first.id, second.id]);

        let updated = store
            .update_status(first.id, ApplicationStatus::Accepted)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, ApplicationStatus::Accepted);
        assert_eq!(updated.created_at, first.created_at);

        let accepted = store
            .list(ApplicationFilter {
                status: Some(ApplicationStatus::Accepted),
            })
            .await
            .unwrap();
        assert!(accepted.iter().any(|app| app.id == first.id));
        assert!(accepted
            .iter()
            .all(|app| app.status == ApplicationStatus::Accepted));
        assert!(!accepted.iter().any(|app| app.id == second.id));

        let unfiltered = store.list(ApplicationFilter::default()).await.unwrap();
        assert!(unfiltered.iter().any(|app| app.id == second.id));

        let resume = store.fetch_resume(first.id).await.unwrap().unwrap();
        assert_eq!(resume.data, Bytes::from_static(b"%PDF-1.4 postgres"));
        assert!(store.fetch_resume(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store
            .update_status(Uuid::new_v4(), ApplicationStatus::Reviewed)
            .await
            .unwrap()
            .is_none());

        let counts = store.status_counts().await.unwrap();
        assert!(counts.accepted >= 1);
        assert!(counts.total >= 2);

        let bad_status = sqlx::query("UPDATE job_applications SET status = 'archived' WHERE id = $1")
            .bind(second.id)
            .execute(&pool)
            .await;
        assert!(bad_status.is_err(), "CHECK constraint must reject unknown statuses");
    }
}
