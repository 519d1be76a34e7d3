use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;
use crate::models::application::{NewApplication, StoredResume};

/// Same shape check the application form runs client-side.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Text fields of the application form as received. Unknown form fields
/// (education, coverLetter, ...) never reach this struct.
#[derive(Debug, Default, Clone)]
pub struct SubmissionFields {
    pub job_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SubmissionFields {
    /// Wire names of required fields that are absent or blank, in form order.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("jobId", &self.job_id),
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| present(value).is_none())
        .map(|(label, _)| label)
        .collect()
    }

    /// Validates the fields and pairs them with the uploaded résumé.
    pub fn into_new_application(self, resume: StoredResume) -> Result<NewApplication, AppError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Please fill in all required fields: {}",
                missing.join(", ")
            )));
        }

        let email = present(&self.email).unwrap_or_default();
        if !is_valid_email(email) {
            return Err(AppError::Validation(
                "Please enter a valid email address".to_string(),
            ));
        }

        Ok(NewApplication {
            job_id: present(&self.job_id).unwrap_or_default().to_string(),
            name: present(&self.name).unwrap_or_default().to_string(),
            email: email.to_string(),
            phone: present(&self.phone).unwrap_or_default().to_string(),
            resume,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn resume() -> StoredResume {
        StoredResume {
            data: Bytes::from_static(b"%PDF-1.7"),
            content_type: "application/pdf".to_string(),
        }
    }

    fn complete() -> SubmissionFields {
        SubmissionFields {
            job_id: Some("1".into()),
            name: Some("  Alex Thompson ".into()),
            email: Some("alex@example.com".into()),
            phone: Some("555-0100".into()),
        }
    }

    #[test]
    fn test_email_accepts_plain_addresses() {
        assert!(is_valid_email("alex@example.com"));
        assert!(is_valid_email("a.b+c@mail.college.edu"));
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(!is_valid_email("alex@example"));
        assert!(!is_valid_email("alex example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("alex@@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_missing_lists_all_blank_fields() {
        let fields = SubmissionFields {
            job_id: Some("1".into()),
            name: Some("   ".into()),
            email: None,
            phone: Some("555".into()),
        };
        assert_eq!(fields.missing(), vec!["name", "email"]);
    }

    #[test]
    fn test_complete_submission_is_trimmed() {
        let app = complete().into_new_application(resume()).unwrap();
        assert_eq!(app.name, "Alex Thompson");
        assert_eq!(app.job_id, "1");
        assert_eq!(app.resume.content_type, "application/pdf");
    }

    #[test]
    fn test_missing_fields_error_message() {
        let err = SubmissionFields::default()
            .into_new_application(resume())
            .unwrap_err();
        match err {
            AppError::Validation(msg) => assert_eq!(
                msg,
                "Please fill in all required fields: jobId, name, email, phone"
            ),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_bad_email_is_rejected() {
        let mut fields = complete();
        fields.email = Some("not-an-email".into());
        let err = fields.into_new_application(resume()).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("valid email")));
    }
}
