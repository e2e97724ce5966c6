pub mod error;
pub mod http_client;
pub mod models;

pub use error::BlogClientError;
pub use models::{ListParams, Post, PostsPage, UpdatePostRequest, User};

use http_client::HttpClient;
use models::{AuthResponse, CreatePostRequest, LoginRequest, RegisterRequest};
use uuid::Uuid;

/// Blog API client with local validation in front of the write calls.
#[derive(Debug, Clone)]
pub struct BlogClient {
    http: HttpClient,
}

impl BlogClient {
    /// Create a new client for a server base URL (e.g., "http://localhost:3000")
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(base_url),
        }
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Set (or clear) the JWT token for authenticated requests
    pub fn set_token(&mut self, token: Option<String>) {
        self.http.set_token(token);
    }

    pub fn token(&self) -> Option<&str> {
        self.http.token()
    }

    /// Register a new user; the returned token is kept for later calls
    pub async fn register(
        &mut self,
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, BlogClientError> {
        let req = RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        };
        tracing::debug!("Register called for username: {}", req.username);
        self.http.register(&req).await
    }

    /// Log in; the returned token is kept for later calls
    pub async fn login(
        &mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<AuthResponse, BlogClientError> {
        let req = LoginRequest {
            username: username.into(),
            password: password.into(),
        };
        tracing::debug!("Login called for username: {}", req.username);
        self.http.login(&req).await
    }

    pub async fn me(&self) -> Result<User, BlogClientError> {
        self.http.me().await
    }

    pub async fn list_posts(&self, params: &ListParams) -> Result<PostsPage, BlogClientError> {
        self.http.list_posts(params).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, BlogClientError> {
        self.http.get_post(id).await
    }

    pub async fn create_post(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        image_url: Option<String>,
    ) -> Result<Post, BlogClientError> {
        let req = CreatePostRequest {
            title: title.into(),
            content: content.into(),
            image_url,
        };

        let errors = blog_common::violations(&req);
        if !errors.is_empty() {
            return Err(BlogClientError::Validation(errors));
        }

        self.http.create_post(&req).await
    }

    /// Partial update. An empty change set is still sent and only refreshes `updatedAt`.
    pub async fn update_post(
        &self,
        id: Uuid,
        changes: &UpdatePostRequest,
    ) -> Result<Post, BlogClientError> {
        let errors = blog_common::violations(changes);
        if !errors.is_empty() {
            return Err(BlogClientError::Validation(errors));
        }

        self.http.update_post(id, changes).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<String, BlogClientError> {
        self.http.delete_post(id).await
    }
}
