use crate::error::BlogClientError;
use crate::models::{
    AuthResponse, CreatePostRequest, ListParams, LoginRequest, MessageResponse, Post, PostsPage,
    RegisterRequest, UpdatePostRequest, User,
};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use uuid::Uuid;

/// Raw REST transport. Knows routes and status codes, nothing about field rules.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn add_auth_header(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn handle<T: DeserializeOwned>(response: Response) -> Result<T, BlogClientError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| BlogClientError::SerializationError(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!("Request failed with {}: {}", status, body);
        Err(BlogClientError::from_response(status.as_u16(), &body))
    }

    // ==================== Auth ====================

    pub async fn register(
        &mut self,
        req: &RegisterRequest,
    ) -> Result<AuthResponse, BlogClientError> {
        let url = self.url("/api/auth/register");
        let response = self.client.post(&url).json(req).send().await?;

        let auth = Self::handle::<AuthResponse>(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn login(&mut self, req: &LoginRequest) -> Result<AuthResponse, BlogClientError> {
        let url = self.url("/api/auth/login");
        let response = self.client.post(&url).json(req).send().await?;

        let auth = Self::handle::<AuthResponse>(response).await?;
        self.token = Some(auth.token.clone());
        Ok(auth)
    }

    pub async fn me(&self) -> Result<User, BlogClientError> {
        let url = self.url("/api/auth/me");
        let response = self.add_auth_header(self.client.get(&url)).send().await?;
        Self::handle(response).await
    }

    // ==================== Posts ====================

    pub async fn list_posts(&self, params: &ListParams) -> Result<PostsPage, BlogClientError> {
        let url = self.url("/api/posts");
        let response = self.client.get(&url).query(params).send().await?;
        Self::handle(response).await
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, BlogClientError> {
        let url = self.url(&format!("/api/posts/{}", id));
        let response = self.client.get(&url).send().await?;
        Self::handle(response).await
    }

    pub async fn create_post(&self, req: &CreatePostRequest) -> Result<Post, BlogClientError> {
        let url = self.url("/api/posts");
        let response = self
            .add_auth_header(self.client.post(&url))
            .json(req)
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        req: &UpdatePostRequest,
    ) -> Result<Post, BlogClientError> {
        let url = self.url(&format!("/api/posts/{}", id));
        let response = self
            .add_auth_header(self.client.put(&url))
            .json(req)
            .send()
            .await?;
        Self::handle(response).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<String, BlogClientError> {
        let url = self.url(&format!("/api/posts/{}", id));
        let response = self
            .add_auth_header(self.client.delete(&url))
            .send()
            .await?;
        Self::handle::<MessageResponse>(response)
            .await
            .map(|r| r.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = HttpClient::new("http://localhost:3000/");
        assert_eq!(
            client.url("/api/posts"),
            "http://localhost:3000/api/posts"
        );
    }

    #[test]
    fn token_can_be_set_and_cleared() {
        let mut client = HttpClient::new("http://localhost:3000");
        assert!(client.token().is_none());
        client.set_token(Some("abc".into()));
        assert_eq!(client.token(), Some("abc"));
        client.set_token(None);
        assert!(client.token().is_none());
    }

    #[tokio::test]
    async fn unreachable_server_is_an_http_error() {
        // nothing listens on port 9 locally
        let client = HttpClient::new("http://127.0.0.1:9");
        let err = client.list_posts(&ListParams::default()).await.unwrap_err();
        assert!(matches!(err, BlogClientError::HttpError(_)));
    }
}
