//! Static portal content: job listings, training programs, events,
//! testimonials and headline placement statistics.

pub mod handlers;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::catalog::{Event, Job, Statistic, Testimonial, TrainingProgram};

const CATALOG_JSON: &str = include_str!("catalog.json");

#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub jobs: Vec<Job>,
    pub trainings: Vec<TrainingProgram>,
    pub events: Vec<Event>,
    pub testimonials: Vec<Testimonial>,
    pub statistics: Vec<Statistic>,
}

/// Filters accepted by `GET /api/jobs`. Blank values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct JobQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub job_type: Option<String>,
}

impl Catalog {
    /// Parses the catalog bundled into the binary.
    pub fn load() -> Result<Self> {
        serde_json::from_str(CATALOG_JSON).context("embedded catalog.json is malformed")
    }

    pub fn job(&self, id: u32) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id == id)
    }

    pub fn search_jobs(&self, query: &JobQuery) -> Vec<&Job> {
        let needle = non_blank(query.q.as_deref()).map(str::to_lowercase);
        let wanted_type = non_blank(query.job_type.as_deref()).map(normalize_job_type);

        self.jobs
            .iter()
            .filter(|job| match &wanted_type {
                Some(t) => normalize_job_type(&job.job_type) == *t,
                None => true,
            })
            .filter(|job| match &needle {
                Some(n) => job_matches(job, n),
                None => true,
            })
            .collect()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// "Full-time", "full time" and "full-time" all compare equal.
fn normalize_job_type(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c == '-' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

fn job_matches(job: &Job, needle: &str) -> bool {
    [&job.title, &job.company, &job.description]
        .into_iter()
        .chain(job.skills.iter())
        .any(|field| field.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::load().expect("bundled catalog parses")
    }

    fn ids(jobs: Vec<&Job>) -> Vec<u32> {
        jobs.into_iter().map(|j| j.id).collect()
    }

    #[test]
    fn test_bundled_catalog_loads_every_section() {
        let c = catalog();
        assert_eq!(c.jobs.len(), 4);
        assert_eq!(c.trainings.len(), 4);
        assert_eq!(c.events.len(), 4);
        assert_eq!(c.testimonials.len(), 4);
        assert_eq!(c.statistics.len(), 4);
    }

    #[test]
    fn test_empty_query_returns_all_jobs() {
        assert_eq!(ids(catalog().search_jobs(&JobQuery::default())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_blank_parameters_are_ignored() {
        let q = JobQuery {
            q: Some("   ".into()),
            job_type: Some("".into()),
        };
        assert_eq!(catalog().search_jobs(&q).len(), 4);
    }

    #[test]
    fn test_type_filter_normalizes_hyphens_and_case() {
        let q = JobQuery {
            q: None,
            job_type: Some("full-time".into()),
        };
        assert_eq!(ids(catalog().search_jobs(&q)), vec![1, 2, 4]);

        let q = JobQuery {
            q: None,
            job_type: Some("CONTRACT".into()),
        };
        assert_eq!(ids(catalog().search_jobs(&q)), vec![3]);
    }

    #[test]
    fn test_keyword_matches_skills_case_insensitively() {
        let q = JobQuery {
            q: Some("aws".into()),
            job_type: None,
        };
        assert_eq!(ids(catalog().search_jobs(&q)), vec![1, 4]);
    }

    #[test]
    fn test_keyword_and_type_combine() {
        let q = JobQuery {
            q: Some("aws".into()),
            job_type: Some("contract".into()),
        };
        assert!(catalog().search_jobs(&q).is_empty());
    }

    #[test]
    fn test_job_lookup_by_id() {
        let c = catalog();
        assert_eq!(c.job(2).map(|j| j.title.as_str()), Some("Data Scientist"));
        assert!(c.job(99).is_none());
    }

    #[test]
    fn test_normalize_job_type() {
        assert_eq!(normalize_job_type(" Part time "), "part-time");
        assert_eq!(normalize_job_type("Full-time"), "full-time");
    }
}
