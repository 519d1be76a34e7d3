//! Multipart parsing for application submissions and the résumé file filter.

use axum::extract::multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::applications::validation::SubmissionFields;
use crate::errors::AppError;
use crate::models::application::StoredResume;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Allowance on top of the résumé limit for text fields and multipart framing.
pub const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// A parsed submission form. `resume` is `None` when no file part was sent.
#[derive(Debug, Default)]
pub struct SubmissionForm {
    pub fields: SubmissionFields,
    pub resume: Option<StoredResume>,
}

pub fn too_large_message(max_bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    let size = if max_bytes < MIB {
        format!("{}KB", max_bytes.div_ceil(KIB))
    } else if max_bytes % MIB == 0 {
        format!("{}MB", max_bytes / MIB)
    } else {
        format!("{:.1}MB", max_bytes as f64 / MIB as f64)
    };
    format!("File size too large. Maximum size is {size}.")
}

/// Accepts `application/pdf`, ignoring case and any parameters.
pub fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}

/// Checks the body of a file that already passed the content type filter.
pub fn check_pdf_body(data: &[u8], max_bytes: usize) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Resume file is empty".to_string()));
    }
    if data.len() > max_bytes {
        return Err(AppError::Validation(too_large_message(max_bytes)));
    }
    if !data.starts_with(PDF_MAGIC) {
        return Err(AppError::Validation(
            "Uploaded file is not a valid PDF".to_string(),
        ));
    }
    Ok(())
}

/// Streams the résumé part, aborting as soon as it exceeds `max_bytes`.
async fn read_resume(mut field: Field<'_>, max_bytes: usize) -> Result<StoredResume, AppError> {
    if !is_pdf_content_type(field.content_type()) {
        return Err(AppError::Validation(
            "Only PDF files are allowed".to_string(),
        ));
    }

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if buf.len() + chunk.len() > max_bytes {
            return Err(AppError::Validation(too_large_message(max_bytes)));
        }
        buf.extend_from_slice(&chunk);
    }

    let data: Bytes = buf.freeze();
    check_pdf_body(&data, max_bytes)?;

    Ok(StoredResume {
        data,
        content_type: PDF_CONTENT_TYPE.to_string(),
    })
}

/// Reads every part of an application form.
pub async fn read_submission(
    mut multipart: Multipart,
    max_resume_bytes: usize,
) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                if form.resume.is_some() {
                    return Err(AppError::Validation(
                        "Only one resume file may be uploaded".to_string(),
                    ));
                }
                form.resume = Some(read_resume(field, max_resume_bytes).await?);
            }
            "jobId" => form.fields.job_id = Some(field.text().await?),
            "name" => form.fields.name = Some(field.text().await?),
            "email" => form.fields.email = Some(field.text().await?),
            "phone" => form.fields.phone = Some(field.text().await?),
            other => debug!(field = other, "Ignoring unrecognized form field"),
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 5 * 1024 * 1024;

    #[test]
    fn test_pdf_content_type_variants() {
        assert!(is_pdf_content_type(Some("application/pdf")));
        assert!(is_pdf_content_type(Some("Application/PDF")));
        assert!(is_pdf_content_type(Some("application/pdf; charset=binary")));
        assert!(!is_pdf_content_type(Some("application/msword")));
        assert!(!is_pdf_content_type(Some("image/png")));
        assert!(!is_pdf_content_type(None));
    }

    #[test]
    fn test_body_must_start_with_pdf_magic() {
        assert!(check_pdf_body(b"%PDF-1.4\n...", LIMIT).is_ok());
        let err = check_pdf_body(b"PK\x03\x04zip", LIMIT).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("not a valid PDF")));
    }

    #[test]
    fn test_empty_body_rejected() {
        let err = check_pdf_body(b"", LIMIT).unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("empty")));
    }

    #[test]
    fn test_exactly_at_limit_is_allowed() {
        let mut data = b"%PDF-".to_vec();
        data.resize(16, b'x');
        assert!(check_pdf_body(&data, 16).is_ok());
        data.push(b'x');
        assert!(check_pdf_body(&data, 16).is_err());
    }

    #[test]
    fn test_too_large_message_formats_megabytes() {
        assert_eq!(
            too_large_message(LIMIT),
            "File size too large. Maximum size is 5MB."
        );
        assert_eq!(
            too_large_message(1024 * 1024 + 512 * 1024),
            "File size too large. Maximum size is 1.5MB."
        );
        assert_eq!(
            too_large_message(64 * 1024),
            "File size too large. Maximum size is 64KB."
        );
    }
}
