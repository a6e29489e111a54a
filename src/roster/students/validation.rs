use super::domain::{Student, StudentDetail};

/// Validation errors raised at the request boundary, before a submission
/// reaches the service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("id must not be supplied when registering a student")]
    IdSuppliedOnCreate,
    #[error("id is required when updating a student")]
    IdMissingOnUpdate,
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("'{found}' is not a valid email address")]
    InvalidEmail { found: String },
}

/// Registration rules: the storage layer assigns the id, so the caller must
/// not supply one; name, phonetic name, and email are mandatory.
pub fn validate_registration(detail: &StudentDetail) -> Result<(), ValidationError> {
    if detail.student.id.is_some() {
        return Err(ValidationError::IdSuppliedOnCreate);
    }
    validate_required_fields(&detail.student)
}

/// Update rules: the id addresses the record to overwrite and is mandatory;
/// the same field requirements apply as on registration.
pub fn validate_update(detail: &StudentDetail) -> Result<(), ValidationError> {
    if detail.student.id.is_none() {
        return Err(ValidationError::IdMissingOnUpdate);
    }
    validate_required_fields(&detail.student)
}

fn validate_required_fields(student: &Student) -> Result<(), ValidationError> {
    if student.name.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "name" });
    }
    if student.kana_name.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "kana_name" });
    }
    if student.email.trim().is_empty() {
        return Err(ValidationError::MissingField { field: "email" });
    }
    validate_email(&student.email)
}

fn validate_email(email: &str) -> Result<(), ValidationError> {
    let well_formed = email
        .split_once('@')
        .map(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        })
        .unwrap_or(false);

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            found: email.to_string(),
        })
    }
}
