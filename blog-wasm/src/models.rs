use blog_common::rules;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

pub use blog_common::FieldError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
    pub author_id: String,
    pub author_username: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_posts: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsPage {
    pub items: Vec<Post>,
    pub pagination: Pagination,
}

impl PostsPage {
    /// Drops a deleted post from a loaded page and recounts the pages.
    pub fn remove_post(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|p| p.id != id);
        if self.items.len() == before {
            return false;
        }

        let p = &mut self.pagination;
        p.total_posts = (p.total_posts - 1).max(0);
        p.total_pages = if p.total_posts == 0 {
            0
        } else {
            (p.total_posts - 1) / ListQuery::PAGE_SIZE + 1
        };
        p.has_next_page = p.current_page < p.total_pages;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(custom(function = "rules::username"))]
    pub username: String,
    #[validate(custom(function = "rules::email"))]
    pub email: String,
    #[validate(custom(function = "rules::password"))]
    pub password: String,
}

impl RegisterRequest {
    /// Field rules plus the sign-up form's password confirmation.
    pub fn violations(&self, confirm: &str) -> Vec<FieldError> {
        let mut errors = self.validate().err().unwrap_or_else(ValidationErrors::new);
        if self.password != confirm {
            errors.add("confirm_password", rules::mismatch("Passwords do not match"));
        }
        blog_common::field_errors(&errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(custom(function = "rules::title"))]
    pub title: String,
    #[validate(custom(function = "rules::content"))]
    pub content: String,
    #[serde(rename = "imageURL")]
    #[validate(custom(function = "rules::image_url"))]
    pub image_url: String,
}

/// The edit form always sends all three fields; an empty `imageURL` removes the image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
}

impl From<CreatePostRequest> for UpdatePostRequest {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            image_url: req.image_url,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page: i64,
    pub search: String,
    pub author: Option<String>,
}

impl ListQuery {
    pub const PAGE_SIZE: i64 = 10;

    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", Self::PAGE_SIZE.to_string()),
        ];
        let search = self.search.trim();
        if !search.is_empty() {
            params.push(("search", search.to_string()));
        }
        if let Some(author) = &self.author {
            params.push(("author", author.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    fn register(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    fn post(id: &str) -> Post {
        Post {
            id: id.into(),
            title: "Hello World!".into(),
            content: "body".into(),
            image_url: String::new(),
            author_id: "a1".into(),
            author_username: "jane_smith".into(),
            created_at: "2024-05-01T10:00:00Z".into(),
            updated_at: "2024-05-01T10:00:00Z".into(),
        }
    }

    #[test]
    fn post_thresholds_match_server() {
        let draft = |title: &str, content: String, image_url: &str| CreatePostRequest {
            title: title.into(),
            content,
            image_url: image_url.into(),
        };
        let content = "a".repeat(50);
        assert!(blog_common::violations(&draft("Hello", content.clone(), "")).is_empty());
        assert!(
            blog_common::violations(&draft(&"t".repeat(120), content, "https://x.io/a.png"))
                .is_empty()
        );
        assert_eq!(
            fields(&blog_common::violations(&draft("Hey", "a".repeat(49), "www.x.io"))),
            vec!["title", "content", "imageURL"]
        );
    }

    #[test]
    fn registration_checks_every_field() {
        let ok = register("jane_smith", "jane@example.com", "secret");
        assert!(ok.violations("secret").is_empty());

        let bad = register("jo", "jane@example", "12345");
        assert_eq!(
            fields(&bad.violations("54321")),
            vec!["username", "email", "password", "confirmPassword"]
        );

        let spaced = register("jane smith", "jane@example.com", "secret");
        assert_eq!(fields(&spaced.violations("secret")), vec!["username"]);
    }

    #[test]
    fn login_requires_both_fields() {
        let empty = LoginRequest {
            username: String::new(),
            password: String::new(),
        };
        assert_eq!(
            fields(&blog_common::violations(&empty)),
            vec!["username", "password"]
        );

        let filled = LoginRequest {
            username: "jane".into(),
            password: "x".into(),
        };
        assert!(blog_common::violations(&filled).is_empty());
    }

    #[test]
    fn removing_a_post_recounts_pages() {
        let mut page = PostsPage {
            items: vec![post("p1"), post("p2")],
            pagination: Pagination {
                current_page: 2,
                total_pages: 2,
                total_posts: 11,
                has_next_page: false,
                has_prev_page: true,
            },
        };

        assert!(page.remove_post("p1"));
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total_posts, 10);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(!page.pagination.has_next_page);

        assert!(!page.remove_post("missing"));
        assert_eq!(page.pagination.total_posts, 10);
    }

    #[test]
    fn list_query_omits_blank_filters() {
        let query = ListQuery {
            page: 0,
            search: "   ".into(),
            author: None,
        };
        assert_eq!(
            query.params(),
            vec![("page", "1".to_string()), ("limit", "10".to_string())]
        );

        let query = ListQuery {
            page: 3,
            search: " jane ".into(),
            author: Some("abc".into()),
        };
        let params = query.params();
        assert!(params.contains(&("search", "jane".to_string())));
        assert!(params.contains(&("author", "abc".to_string())));
    }
}
