//! Validation utilities.

use crate::EabError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns an `EabError` on failure.
    fn validate_request(&self) -> Result<(), EabError> {
        self.validate().map_err(validation_errors_to_eab_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `EabError`.
#[must_use]
pub fn validation_errors_to_eab_error(errors: ValidationErrors) -> EabError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.sort();

    EabError::Validation(messages.join("; "))
}

/// Field rules shared by capability builders.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates a SIP feature tag such as `+g.3gpp.icsi-ref` or
    /// `+g.gsma.rcs.botversion="#=1"`.
    pub fn feature_tag(tag: &str) -> Result<(), ValidationError> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(ValidationError::new("feature_tag_empty"));
        }
        if !tag.starts_with('+') {
            return Err(ValidationError::new("feature_tag_missing_plus"));
        }
        if tag.chars().any(char::is_whitespace) {
            return Err(ValidationError::new("feature_tag_whitespace"));
        }
        Ok(())
    }
}
