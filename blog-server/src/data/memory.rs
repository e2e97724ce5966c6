//! Process-local repositories used when no `DATABASE_URL` is configured and in tests.

use super::post_repository::PostRepository;
use super::user_repository::UserRepository;
use crate::domain::pagination::PostFilter;
use crate::domain::post::{NewPost, PostChanges};
use crate::domain::user::NewUser;
use crate::domain::{AuthUser, DomainError, Post, User};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, author: &AuthUser, post: NewPost) -> Result<Post, DomainError> {
        let post = Post::new(post, author.id, author.username.clone());
        self.posts.write().await.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DomainError::PostNotFound)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let mut posts = self.posts.write().await;
        let post = posts.get_mut(&id).ok_or(DomainError::PostNotFound)?;

        changes.apply(post);

        // updatedAt must move forward even when two writes land in the same tick
        let now = Utc::now();
        post.updated_at = if now > post.updated_at {
            now
        } else {
            post.updated_at + Duration::microseconds(1)
        };

        Ok(post.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        match self.posts.write().await.remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::PostNotFound),
        }
    }

    async fn list(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Post>, i64), DomainError> {
        let posts = self.posts.read().await;

        let mut matching: Vec<&Post> = posts
            .values()
            .filter(|p| filter.matches(&p.title, &p.author_username, p.author_id))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((page, total))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser, password_hash: String) -> Result<User, DomainError> {
        let mut users = self.users.write().await;

        let taken = users
            .values()
            .any(|u| u.username == user.username || u.email == user.email);
        if taken {
            return Err(DomainError::UserAlreadyExists);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash,
            created_at: Utc::now(),
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<User, DomainError> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }

    async fn find_by_email(&self, email: &str) -> Result<User, DomainError> {
        self.users
            .read()
            .await
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(DomainError::UserNotFound)
    }
}
