use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field problem found while turning a request into a domain value
#[derive(Debug, Default, Error)]
#[error("validation failed: {}", summary(.0))]
pub struct ValidationErrors(Vec<FieldError>);

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// Ok(value) when nothing was recorded
    pub fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Checks a required text field, recording a problem and returning None if it is unusable
pub(crate) fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<String>,
    max_len: Option<usize>,
) -> Option<String> {
    match value {
        None => {
            errors.push(field, format!("{field} is required"));
            None
        }
        Some(value) => optional_text(errors, field, value, max_len),
    }
}

/// Same rules as `required_text` for a field that was supplied
pub(crate) fn optional_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: String,
    max_len: Option<usize>,
) -> Option<String> {
    if value.trim().is_empty() {
        errors.push(field, format!("{field} should not be empty"));
        return None;
    }

    if let Some(max) = max_len {
        if value.chars().count() > max {
            errors.push(
                field,
                format!("{field} must be shorter than or equal to {max} characters"),
            );
            return None;
        }
    }

    Some(value)
}
