use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Review status of a job application. Any status may follow any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Pending,
        ApplicationStatus::Reviewed,
        ApplicationStatus::Accepted,
        ApplicationStatus::Rejected,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status '{0}': expected one of pending, reviewed, accepted, rejected")]
pub struct InvalidStatus(pub String);

impl FromStr for ApplicationStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

/// Résumé bytes plus the MIME type they were uploaded with.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredResume {
    pub data: Bytes,
    pub content_type: String,
}

/// A validated submission, ready to persist.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume: StoredResume,
}

/// A persisted application without the résumé body.
#[derive(Debug, Clone, PartialEq)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_content_type: String,
    pub resume_size: i64,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

/// Raw `job_applications` row. `status` is TEXT in the schema.
#[derive(Debug, Clone, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub resume_content_type: String,
    pub resume_size: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<JobApplicationRow> for JobApplication {
    type Error = InvalidStatus;

    fn try_from(row: JobApplicationRow) -> Result<Self, Self::Error> {
        Ok(JobApplication {
            status: row.status.parse()?,
            id: row.id,
            job_id: row.job_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            resume_content_type: row.resume_content_type,
            resume_size: row.resume_size,
            created_at: row.created_at,
        })
    }
}

/// Résumé metadata exposed in JSON instead of the raw bytes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResumeMeta {
    pub content_type: String,
    pub size: i64,
    pub url: String,
}

/// JSON representation of an application returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobApplicationView {
    pub id: Uuid,
    pub job_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub resume: ResumeMeta,
}

impl From<&JobApplication> for JobApplicationView {
    fn from(app: &JobApplication) -> Self {
        JobApplicationView {
            id: app.id,
            job_id: app.job_id.clone(),
            name: app.name.clone(),
            email: app.email.clone(),
            phone: app.phone.clone(),
            status: app.status,
            created_at: app.created_at,
            resume: ResumeMeta {
                content_type: app.resume_content_type.clone(),
                size: app.resume_size,
                url: format!("/api/resumes/{}", app.id),
            },
        }
    }
}

/// Number of applications in each status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: i64,
    pub reviewed: i64,
    pub accepted: i64,
    pub rejected: i64,
    pub total: i64,
}

impl StatusCounts {
    pub fn add(&mut self, status: ApplicationStatus, n: i64) {
        match status {
            ApplicationStatus::Pending => self.pending += n,
            ApplicationStatus::Reviewed => self.reviewed += n,
            ApplicationStatus::Accepted => self.accepted += n,
            ApplicationStatus::Rejected => self.rejected += n,
        }
        self.total += n;
    }
}
