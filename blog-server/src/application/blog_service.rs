use crate::data::PostRepository;
use crate::domain::pagination::{ListPostsQuery, PageRequest, Paginated, Pagination, PostFilter};
use crate::domain::post::{CreatePostRequest, PostResponse, UpdatePostRequest};
use crate::domain::{AuthUser, DomainError, Post};
use std::sync::Arc;
use uuid::Uuid;

pub struct BlogService {
    post_repo: Arc<dyn PostRepository + Send + Sync>,
}

/// Ids arrive as raw path segments; anything that is not a UUID cannot name a post.
fn parse_post_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::PostNotFound)
}

impl BlogService {
    pub fn new(post_repo: Arc<dyn PostRepository + Send + Sync>) -> Self {
        Self { post_repo }
    }

    pub async fn list_posts(
        &self,
        query: ListPostsQuery,
    ) -> Result<Paginated<PostResponse>, DomainError> {
        let page = PageRequest::new(query.page.as_deref(), query.limit.as_deref());

        let search = query
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let author_id = match query.author.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(id) => Some(id),
                Err(_) => {
                    tracing::debug!("Unknown author filter {:?}, returning empty page", raw);
                    return Ok(Paginated {
                        items: Vec::new(),
                        pagination: Pagination::new(page, 0),
                    });
                }
            },
        };

        let filter = PostFilter { search, author_id };
        let (posts, total) = self
            .post_repo
            .list(&filter, page.limit, page.offset())
            .await?;

        Ok(Paginated {
            items: posts.into_iter().map(PostResponse::from).collect(),
            pagination: Pagination::new(page, total),
        })
    }

    pub async fn get_post(&self, id: &str) -> Result<PostResponse, DomainError> {
        let id = parse_post_id(id)?;
        let post = self.post_repo.find_by_id(id).await?;
        Ok(PostResponse::from(post))
    }

    pub async fn create_post(
        &self,
        author: &AuthUser,
        req: CreatePostRequest,
    ) -> Result<PostResponse, DomainError> {
        let new_post = req.into_new_post()?;

        let post = self.post_repo.create(author, new_post).await?;

        tracing::info!("Post created: id={}, author_id={}", post.id, author.id);

        Ok(PostResponse::from(post))
    }

    pub async fn update_post(
        &self,
        user: &AuthUser,
        id: &str,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, DomainError> {
        let changes = req.into_changes()?;
        let post = self.owned_post(user, id, "update").await?;

        let updated_post = self.post_repo.update(post.id, changes).await?;

        tracing::info!("Post updated: id={}, author_id={}", post.id, user.id);

        Ok(PostResponse::from(updated_post))
    }

    pub async fn delete_post(&self, user: &AuthUser, id: &str) -> Result<(), DomainError> {
        let post = self.owned_post(user, id, "delete").await?;

        self.post_repo.delete(post.id).await?;

        tracing::info!("Post deleted: id={}, author_id={}", post.id, user.id);

        Ok(())
    }

    /// Existence is checked before ownership, so a missing post is always 404.
    async fn owned_post(
        &self,
        user: &AuthUser,
        id: &str,
        action: &str,
    ) -> Result<Post, DomainError> {
        let id = parse_post_id(id)?;
        let post = self.post_repo.find_by_id(id).await?;

        if !post.is_owned_by(user.id) {
            tracing::warn!(
                "User {} attempted to {} post {} owned by {}",
                user.id,
                action,
                id,
                post.author_id
            );
            return Err(DomainError::Forbidden);
        }

        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::InMemoryPostRepository;
    use crate::domain::patch::Patch;

    const CONTENT: &str =
        "A post body that is long enough to pass the fifty character minimum rule.";

    fn service() -> BlogService {
        BlogService::new(Arc::new(InMemoryPostRepository::new()))
    }

    fn user(name: &str) -> AuthUser {
        AuthUser {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{name}@example.com"),
        }
    }

    fn create_req(title: &str) -> CreatePostRequest {
        CreatePostRequest {
            title: title.to_string(),
            content: CONTENT.to_string(),
            image_url: None,
        }
    }

    fn query(page: &str, limit: &str, search: &str) -> ListPostsQuery {
        ListPostsQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            search: Some(search.to_string()),
            author: None,
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let svc = service();
        let jane = user("jane_smith");

        let created = svc
            .create_post(
                &jane,
                CreatePostRequest {
                    title: "Hello World!".into(),
                    content: CONTENT.into(),
                    image_url: Some("https://example.com/cat.png".into()),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.author_id, jane.id);

        let fetched = svc.get_post(&created.id.to_string()).await.unwrap();
        assert_eq!(fetched.title, "Hello World!");
        assert_eq!(fetched.content, CONTENT);
        assert_eq!(fetched.image_url, "https://example.com/cat.png");
        assert_eq!(fetched.author_username, "jane_smith");
    }

    #[tokio::test]
    async fn invalid_create_is_rejected_with_every_field() {
        let svc = service();
        let err = svc
            .create_post(
                &user("jane"),
                CreatePostRequest {
                    title: "x".repeat(121),
                    content: "short".into(),
                    image_url: Some("ftp://nope".into()),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["title", "content", "imageURL"]);
    }

    #[tokio::test]
    async fn malformed_or_unknown_id_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.get_post("not-a-uuid").await,
            Err(DomainError::PostNotFound)
        ));
        assert!(matches!(
            svc.get_post(&Uuid::new_v4().to_string()).await,
            Err(DomainError::PostNotFound)
        ));
    }

    #[tokio::test]
    async fn only_owner_may_mutate() {
        let svc = service();
        let owner = user("owner");
        let intruder = user("intruder");
        let post = svc.create_post(&owner, create_req("Owned post")).await.unwrap();
        let id = post.id.to_string();

        let update = UpdatePostRequest {
            title: Patch::Value("Hijacked".into()),
            ..Default::default()
        };
        assert!(matches!(
            svc.update_post(&intruder, &id, update).await,
            Err(DomainError::Forbidden)
        ));
        assert!(matches!(
            svc.delete_post(&intruder, &id).await,
            Err(DomainError::Forbidden)
        ));

        assert_eq!(svc.get_post(&id).await.unwrap().title, "Owned post");
    }

    #[tokio::test]
    async fn not_found_takes_precedence_over_forbidden() {
        let svc = service();
        let missing = Uuid::new_v4().to_string();
        assert!(matches!(
            svc.delete_post(&user("anyone"), &missing).await,
            Err(DomainError::PostNotFound)
        ));
        assert!(matches!(
            svc.update_post(&user("anyone"), &missing, UpdatePostRequest::default())
                .await,
            Err(DomainError::PostNotFound)
        ));
    }

    #[tokio::test]
    async fn partial_update_touches_only_supplied_fields() {
        let svc = service();
        let owner = user("owner");
        let post = svc
            .create_post(
                &owner,
                CreatePostRequest {
                    title: "Original title".into(),
                    content: CONTENT.into(),
                    image_url: Some("http://img.test/a.png".into()),
                },
            )
            .await
            .unwrap();

        let updated = svc
            .update_post(
                &owner,
                &post.id.to_string(),
                UpdatePostRequest {
                    title: Patch::Value("Brand new title".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Brand new title");
        assert_eq!(updated.content, CONTENT);
        assert_eq!(updated.image_url, "http://img.test/a.png");
        assert_eq!(updated.author_id, owner.id);
        assert!(updated.updated_at > post.updated_at);

        let cleared = svc
            .update_post(
                &owner,
                &post.id.to_string(),
                UpdatePostRequest {
                    image_url: Patch::Null,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.image_url, "");
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let svc = service();
        let owner = user("owner");
        let post = svc.create_post(&owner, create_req("Short lived")).await.unwrap();
        let id = post.id.to_string();

        svc.delete_post(&owner, &id).await.unwrap();
        assert!(matches!(
            svc.delete_post(&owner, &id).await,
            Err(DomainError::PostNotFound)
        ));
        assert!(matches!(
            svc.get_post(&id).await,
            Err(DomainError::PostNotFound)
        ));
    }

    #[tokio::test]
    async fn second_page_of_fifteen_posts() {
        let svc = service();
        let author = user("writer");
        for i in 0..15 {
            svc.create_post(&author, create_req(&format!("Post number {i}")))
                .await
                .unwrap();
        }

        let page = svc.list_posts(query("2", "10", "")).await.unwrap();
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.pagination.current_page, 2);
        assert_eq!(page.pagination.total_pages, 2);
        assert_eq!(page.pagination.total_posts, 15);
        assert!(!page.pagination.has_next_page);
        assert!(page.pagination.has_prev_page);
    }

    #[tokio::test]
    async fn garbage_paging_falls_back_to_defaults() {
        let svc = service();
        let author = user("writer");
        for i in 0..12 {
            svc.create_post(&author, create_req(&format!("Post number {i}")))
                .await
                .unwrap();
        }

        let page = svc.list_posts(query("abc", "zero", "")).await.unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.pagination.current_page, 1);
        assert!(page.pagination.has_next_page);
    }

    #[tokio::test]
    async fn search_matches_title_or_username() {
        let svc = service();
        let jane = user("jane_smith");
        let john = user("john_doe");
        svc.create_post(&jane, create_req("Gardening notes")).await.unwrap();
        svc.create_post(&john, create_req("Letter to JANE")).await.unwrap();
        svc.create_post(&john, create_req("Rust tips and tricks")).await.unwrap();

        let page = svc.list_posts(query("1", "10", "jane")).await.unwrap();
        assert_eq!(page.pagination.total_posts, 2);
        assert!(page.items.iter().all(|p| {
            p.title.to_lowercase().contains("jane")
                || p.author_username.to_lowercase().contains("jane")
        }));
    }

    #[tokio::test]
    async fn author_filter_does_not_overmatch_similar_usernames() {
        let svc = service();
        let ann = user("ann");
        let joanna = user("joanna");
        svc.create_post(&ann, create_req("Ann writes")).await.unwrap();
        svc.create_post(&joanna, create_req("Joanna writes")).await.unwrap();

        let by_search = svc.list_posts(query("1", "100", "ann")).await.unwrap();
        assert_eq!(by_search.pagination.total_posts, 2);

        let by_author = svc
            .list_posts(ListPostsQuery {
                author: Some(ann.id.to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_author.pagination.total_posts, 1);
        assert_eq!(by_author.items[0].author_id, ann.id);

        let bogus = svc
            .list_posts(ListPostsQuery {
                author: Some("nobody".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(bogus.items.is_empty());
        assert_eq!(bogus.pagination.total_pages, 0);
    }
}
