use crate::models::*;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

const API_BASE: &str = "http://localhost:3000";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map(|r| r.message.clone())
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            400 => match parsed {
                Some(r) if !r.errors.is_empty() => Self::Validation(r.errors),
                _ => Self::Validation(vec![FieldError::new("body", message)]),
            },
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Server { status, message },
        }
    }
}

/// REST client. Holds no session; protected calls take the token explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            base_url: API_BASE.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_token(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        builder: RequestBuilder,
        body: Option<&impl Serialize>,
    ) -> Result<T, ApiError> {
        let response = match body {
            Some(body) => builder
                .json(body)
                .map_err(|e| ApiError::Decode(e.to_string()))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        Self::read(response).await
    }

    async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if (200..300).contains(&status) {
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
        } else {
            log::debug!("Request failed with {}: {}", status, text);
            Err(ApiError::from_response(status, &text))
        }
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        Self::send(Request::post(&self.url("/api/auth/register")), Some(req)).await
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        Self::send(Request::post(&self.url("/api/auth/login")), Some(req)).await
    }

    pub async fn me(&self, token: Option<&str>) -> Result<User, ApiError> {
        let builder = Self::with_token(Request::get(&self.url("/api/auth/me")), token);
        Self::send(builder, None::<&()>).await
    }

    pub async fn list_posts(&self, query: &ListQuery) -> Result<PostsPage, ApiError> {
        let builder = Request::get(&self.url("/api/posts")).query(query.params());
        Self::send(builder, None::<&()>).await
    }

    pub async fn get_post(&self, id: &str) -> Result<Post, ApiError> {
        let builder = Request::get(&self.url(&format!("/api/posts/{}", id)));
        Self::send(builder, None::<&()>).await
    }

    pub async fn create_post(
        &self,
        token: Option<&str>,
        req: &CreatePostRequest,
    ) -> Result<Post, ApiError> {
        let builder = Self::with_token(Request::post(&self.url("/api/posts")), token);
        Self::send(builder, Some(req)).await
    }

    pub async fn update_post(
        &self,
        token: Option<&str>,
        id: &str,
        req: &UpdatePostRequest,
    ) -> Result<Post, ApiError> {
        let url = self.url(&format!("/api/posts/{}", id));
        let builder = Self::with_token(Request::put(&url), token);
        Self::send(builder, Some(req)).await
    }

    pub async fn delete_post(&self, token: Option<&str>, id: &str) -> Result<String, ApiError> {
        let builder =
            Self::with_token(Request::delete(&self.url(&format!("/api/posts/{}", id))), token);
        Self::send::<MessageResponse>(builder, None::<&()>)
            .await
            .map(|r| r.message)
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}
