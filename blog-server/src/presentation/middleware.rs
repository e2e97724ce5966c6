use crate::application::AuthService;
use crate::domain::{AuthUser, DomainError};
use actix_web::{dev::Payload, http::header::Header, web, FromRequest, HttpRequest};
use actix_web_httpauth::headers::authorization::{Authorization, Bearer};
use std::future::{ready, Ready};
use std::sync::Arc;

/// Handlers that take an `AuthUser` argument require a valid bearer token.
impl FromRequest for AuthUser {
    type Error = DomainError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, DomainError> {
    let auth_service = req
        .app_data::<web::Data<Arc<AuthService>>>()
        .ok_or_else(|| DomainError::InternalError("Auth service not configured".to_string()))?;

    let bearer = Authorization::<Bearer>::parse(req)
        .map_err(|_| {
            DomainError::Unauthorized("Missing or malformed bearer token".to_string())
        })?
        .into_scheme();

    auth_service.authenticate(bearer.token())
}
