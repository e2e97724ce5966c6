use crate::domain::pagination::PostFilter;
use crate::domain::post::{NewPost, PostChanges};
use crate::domain::{AuthUser, DomainError, Post};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, author: &AuthUser, post: NewPost) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Post, DomainError>;
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    /// Newest first. Returns the page and the total number of matching posts.
    async fn list(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Post>, i64), DomainError>;
}

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str =
    "id, title, content, image_url, author_id, author_username, created_at, updated_at";

// $1 = search term, $2 = author id; NULL disables the condition
const FILTER_CLAUSE: &str = r#"
    ($1::text IS NULL
        OR strpos(lower(title), lower($1)) > 0
        OR strpos(lower(author_username), lower($1)) > 0)
    AND ($2::uuid IS NULL OR author_id = $2)
"#;

fn post_from_row(row: &PgRow) -> Result<Post, DomainError> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        image_url: row.try_get("image_url")?,
        author_id: row.try_get("author_id")?,
        author_username: row.try_get("author_username")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, author: &AuthUser, post: NewPost) -> Result<Post, DomainError> {
        let sql = format!(
            r#"
            INSERT INTO posts (title, content, image_url, author_id, author_username, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING {POST_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.image_url)
            .bind(author.id)
            .bind(&author.username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create post: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        post_from_row(&row)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Post, DomainError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");

        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => post_from_row(&row),
            None => Err(DomainError::PostNotFound),
        }
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        let sql = format!(
            r#"
            UPDATE posts
            SET
                title = COALESCE($1, title),
                content = COALESCE($2, content),
                image_url = COALESCE($3, image_url),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {POST_COLUMNS}
            "#
        );

        let row = sqlx::query(&sql)
            .bind(changes.title)
            .bind(changes.content)
            .bind(changes.image_url)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        match row {
            Some(row) => post_from_row(&row),
            None => Err(DomainError::PostNotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            Err(DomainError::PostNotFound)
        } else {
            Ok(())
        }
    }

    async fn list(
        &self,
        filter: &PostFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Post>, i64), DomainError> {
        let count_sql = format!("SELECT COUNT(*) AS count FROM posts WHERE {FILTER_CLAUSE}");
        let count_row = sqlx::query(&count_sql)
            .bind(filter.search.as_deref())
            .bind(filter.author_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let total: i64 = count_row.try_get("count")?;

        let page_sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE {FILTER_CLAUSE}
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#
        );
        let rows = sqlx::query(&page_sql)
            .bind(filter.search.as_deref())
            .bind(filter.author_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let posts = rows
            .iter()
            .map(post_from_row)
            .collect::<Result<Vec<Post>, DomainError>>()?;

        Ok((posts, total))
    }
}
