use crate::domain::{DomainError, FieldError};
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.to_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::ValidationError(errors) => {
                tracing::debug!("Validation failed for fields {:?}", self.invalid_fields());
                ErrorBody {
                    message: "Validation failed".to_string(),
                    errors: Some(errors.as_slice()),
                }
            }
            Self::DatabaseError(_) | Self::InternalError(_) => {
                tracing::error!("Request failed: {}", self);
                ErrorBody {
                    message: "Internal server error".to_string(),
                    errors: None,
                }
            }
            other => ErrorBody {
                message: other.to_string(),
                errors: None,
            },
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed request bodies use the same 400 shape as field validation.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::debug!("Rejected JSON body: {}", err);
    DomainError::ValidationError(vec![FieldError::new("body", err.to_string())]).into()
}

/// Query strings that cannot be decoded get the same JSON 400 as bad bodies.
pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::debug!("Rejected query string: {}", err);
    DomainError::ValidationError(vec![FieldError::new("query", err.to_string())]).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::error::QueryPayloadError;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn undecodable_query_is_a_json_validation_error() {
        let req = TestRequest::default().to_http_request();
        let cause = <serde::de::value::Error as serde::de::Error>::custom("invalid digit");
        let err = query_error_handler(QueryPayloadError::Deserialize(cause), &req);

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value =
            serde_json::from_slice(&to_bytes(resp.into_body()).await.unwrap()).unwrap();
        assert_eq!(body["message"], "Validation failed");
        assert_eq!(body["errors"][0]["field"], "query");
    }
}
