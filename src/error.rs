// TecaiKids API - Errors
// Validation, not-found and internal failures, mapped to 422/404/500 by the HTTP layer

use thiserror::Error;

use crate::validation::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload failed schema validation; one entry per offending field.
    #[error("validation failed: {}", summarize(.0))]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn program_not_found() -> Self {
        ApiError::NotFound("Program not found".to_string())
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_fields() {
        let e = ApiError::Validation(vec![
            FieldError::missing("email"),
            FieldError::missing("phone"),
        ]);
        let text = e.to_string();
        assert!(text.contains("email"));
        assert!(text.contains("phone"));
    }

    #[test]
    fn test_not_found_display() {
        let e = ApiError::program_not_found();
        assert_eq!(e.to_string(), "Program not found");
    }

    #[test]
    fn test_anyhow_converts_to_internal() {
        let e: ApiError = anyhow::anyhow!("database locked").into();
        assert!(matches!(e, ApiError::Internal(_)));
        assert!(e.to_string().contains("database locked"));
    }
}
