use crate::models::{ErrorResponse, FieldError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlogClientError {
    // HTTP ошибки
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    // Ошибки валидации (локальные и серверные)
    #[error("Validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Server error {status}: {message}")]
    Api { status: u16, message: String },

    // Ошибки сериализации/десериализации
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

fn format_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl BlogClientError {
    /// Maps a non-success response to the matching variant.
    ///
    /// The body is expected to carry `{message, errors?}`; anything else is kept
    /// verbatim as the message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map(|r| r.message.clone())
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            400 => Self::Validation(match parsed {
                Some(r) if !r.errors.is_empty() => r.errors,
                _ => vec![FieldError {
                    field: "body".to_string(),
                    message,
                }],
            }),
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Api { status, message },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogClientError::NotFound(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BlogClientError::Unauthorized(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, BlogClientError::Forbidden(_))
    }

    /// Per-field messages of a validation failure, empty for every other error.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            BlogClientError::Validation(errors) => errors,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_body_keeps_every_field() {
        let body = r#"{"message":"Validation failed","errors":[
            {"field":"title","message":"Title must be between 5 and 120 characters"},
            {"field":"content","message":"Content must be at least 50 characters"}]}"#;
        let err = BlogClientError::from_response(400, body);
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "content"]);
    }

    #[test]
    fn status_codes_map_to_variants() {
        let body = r#"{"message":"Post not found"}"#;
        assert!(BlogClientError::from_response(404, body).is_not_found());
        assert!(BlogClientError::from_response(401, body).is_unauthorized());
        assert!(BlogClientError::from_response(403, body).is_forbidden());
        assert!(matches!(
            BlogClientError::from_response(409, body),
            BlogClientError::Conflict(m) if m == "Post not found"
        ));
        assert!(matches!(
            BlogClientError::from_response(500, "oops"),
            BlogClientError::Api { status: 500, message } if message == "oops"
        ));
    }

    #[test]
    fn bare_bad_request_becomes_body_error() {
        let err = BlogClientError::from_response(400, r#"{"message":"Invalid JSON"}"#);
        assert_eq!(err.field_errors()[0].field, "body");
        assert_eq!(err.field_errors()[0].message, "Invalid JSON");
    }
}
