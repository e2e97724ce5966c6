use super::patch::Patch;
use super::DomainError;
use blog_common::rules;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create body. Missing keys default to empty so they surface as validation
/// errors together with everything else.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[serde(default)]
    #[validate(custom(function = "rules::title"))]
    pub title: String,
    #[serde(default)]
    #[validate(custom(function = "rules::content"))]
    pub content: String,
    #[serde(default, rename = "imageURL")]
    #[validate(custom(function = "rules::image_url"))]
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub content: Patch<String>,
    #[serde(default, rename = "imageURL")]
    pub image_url: Patch<String>,
}

/// Validated fields of a post about to be stored.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub image_url: String,
}

/// Validated changes; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct PostChanges {
    #[validate(custom(function = "rules::title"))]
    pub title: Option<String>,
    #[validate(custom(function = "rules::content"))]
    pub content: Option<String>,
    #[validate(custom(function = "rules::image_url"))]
    pub image_url: Option<String>,
}

impl PostChanges {
    pub fn apply(self, post: &mut Post) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(image_url) = self.image_url {
            post.image_url = image_url;
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}

impl CreatePostRequest {
    pub fn into_new_post(self) -> Result<NewPost, DomainError> {
        self.validate()?;

        Ok(NewPost {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            image_url: trimmed(self.image_url).unwrap_or_default(),
        })
    }
}

impl UpdatePostRequest {
    /// Resolves null fields, then checks the supplied values with the create rules.
    pub fn into_changes(self) -> Result<PostChanges, DomainError> {
        let mut removed = Vec::new();

        let title = match self.title {
            Patch::Missing => None,
            Patch::Null => {
                removed.push(("title", "Title cannot be removed"));
                None
            }
            Patch::Value(title) => Some(title),
        };

        let content = match self.content {
            Patch::Missing => None,
            Patch::Null => {
                removed.push(("content", "Content cannot be removed"));
                None
            }
            Patch::Value(content) => Some(content),
        };

        // null clears the image
        let image_url = match self.image_url {
            Patch::Missing => None,
            Patch::Null => Some(String::new()),
            Patch::Value(url) => Some(url),
        };

        let changes = PostChanges {
            title: trimmed(title),
            content: trimmed(content),
            image_url: trimmed(image_url),
        };

        let mut errors = changes
            .validate()
            .err()
            .unwrap_or_else(ValidationErrors::new);
        for (field, message) in removed {
            let mut error = validator::ValidationError::new("required");
            error.message = Some(message.into());
            errors.add(field, error);
        }

        let errors = blog_common::field_errors(&errors);
        if errors.is_empty() {
            Ok(changes)
        } else {
            Err(DomainError::ValidationError(errors))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    pub author_id: Uuid,
    pub author_username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            author_id: post.author_id,
            author_username: post.author_username,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl Post {
    pub fn new(new_post: NewPost, author_id: Uuid, author_username: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new_post.title,
            content: new_post.content,
            image_url: new_post.image_url,
            author_id,
            author_username,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn long_content() -> String {
        "This body is comfortably longer than the fifty character minimum.".to_string()
    }

    #[test]
    fn create_collects_all_violations() {
        let req = CreatePostRequest {
            title: "Hey".into(),
            content: "short".into(),
            image_url: Some("not-a-url".into()),
        };
        let err = req.into_new_post().unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["title", "content", "imageURL"]);
    }

    #[test]
    fn create_trims_and_defaults_image() {
        let req = CreatePostRequest {
            title: "  Hello World!  ".into(),
            content: long_content(),
            image_url: None,
        };
        let post = req.into_new_post().unwrap();
        assert_eq!(post.title, "Hello World!");
        assert_eq!(post.image_url, "");
    }

    #[test]
    fn missing_create_fields_are_validation_errors() {
        let req: CreatePostRequest = serde_json::from_str("{}").unwrap();
        let err = req.into_new_post().unwrap_err();
        assert_eq!(err.invalid_fields(), vec!["title", "content"]);
    }

    #[test]
    fn update_only_checks_supplied_fields() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"title":"Fresh title"}"#).unwrap();
        let changes = req.into_changes().unwrap();
        assert_eq!(changes.title.as_deref(), Some("Fresh title"));
        assert!(changes.content.is_none());
        assert!(changes.image_url.is_none());
    }

    #[test]
    fn update_null_image_clears_it_but_null_title_is_rejected() {
        let req: UpdatePostRequest = serde_json::from_str(r#"{"imageURL":null}"#).unwrap();
        assert_eq!(req.into_changes().unwrap().image_url.as_deref(), Some(""));

        let req: UpdatePostRequest = serde_json::from_str(r#"{"title":null}"#).unwrap();
        assert_eq!(req.into_changes().unwrap_err().invalid_fields(), vec!["title"]);
    }

    #[test]
    fn update_rejects_short_title_and_bad_url() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"title":"abc","imageURL":"javascript:alert(1)"}"#).unwrap();
        assert_eq!(
            req.into_changes().unwrap_err().invalid_fields(),
            vec!["title", "imageURL"]
        );
    }

    #[test]
    fn removed_fields_and_rule_failures_are_reported_together() {
        let req: UpdatePostRequest =
            serde_json::from_str(r#"{"content":null,"title":"abc"}"#).unwrap();
        match req.into_changes().unwrap_err() {
            DomainError::ValidationError(errors) => {
                assert_eq!(errors[0].field, "title");
                assert_eq!(errors[1].field, "content");
                assert_eq!(errors[1].message, "Content cannot be removed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn response_uses_api_field_names() {
        let post = Post::new(
            NewPost {
                title: "Hello World!".into(),
                content: long_content(),
                image_url: String::new(),
            },
            Uuid::new_v4(),
            "jane_smith".into(),
        );
        let json = serde_json::to_value(PostResponse::from(post)).unwrap();
        for key in [
            "id",
            "title",
            "content",
            "imageURL",
            "authorId",
            "authorUsername",
            "createdAt",
            "updatedAt",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
    }
}
