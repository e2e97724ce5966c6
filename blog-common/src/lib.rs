//! Request rules shared by the blog server and its clients.

pub mod rules;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// A single field-level violation, as carried in the API error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

// form order; anything else sorts after these
const FIELD_ORDER: [&str; 7] = [
    "username",
    "email",
    "password",
    "confirmPassword",
    "title",
    "content",
    "imageURL",
];

fn wire_name(field: &str) -> &str {
    match field {
        "image_url" => "imageURL",
        "confirm_password" => "confirmPassword",
        other => other,
    }
}

fn rank(field: &str) -> usize {
    FIELD_ORDER
        .iter()
        .position(|known| *known == field)
        .unwrap_or(FIELD_ORDER.len())
}

/// Flattens `validator` output into API field errors, in form order.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, list)| {
            let field = wire_name(&field).to_string();
            list.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    out.sort_by(|a, b| {
        rank(&a.field)
            .cmp(&rank(&b.field))
            .then_with(|| a.field.cmp(&b.field))
    });
    out
}

/// Runs the derived rules of `input`; empty when everything passes.
pub fn violations(input: &impl Validate) -> Vec<FieldError> {
    match input.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Draft {
        #[validate(custom(function = "rules::title"))]
        title: String,
        #[validate(custom(function = "rules::content"))]
        content: String,
        #[validate(custom(function = "rules::image_url"))]
        image_url: Option<String>,
    }

    fn fields(errors: &[FieldError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn violations_are_reported_in_form_order_with_api_names() {
        let draft = Draft {
            title: "Hey".into(),
            content: "short".into(),
            image_url: Some("ftp://x".into()),
        };
        let errors = violations(&draft);
        assert_eq!(fields(&errors), vec!["title", "content", "imageURL"]);
        assert_eq!(errors[2].message, "Please provide a valid image URL");
    }

    #[test]
    fn absent_optional_field_is_not_checked() {
        let draft = Draft {
            title: "Hello World!".into(),
            content: "a".repeat(50),
            image_url: None,
        };
        assert!(violations(&draft).is_empty());
    }

    #[test]
    fn manually_added_errors_join_the_ordering() {
        let mut errors = ValidationErrors::new();
        errors.add("confirm_password", rules::mismatch("Passwords do not match"));
        errors.add("username", validator::ValidationError::new("required"));

        let list = field_errors(&errors);
        assert_eq!(fields(&list), vec!["username", "confirmPassword"]);
        assert_eq!(list[0].message, "Invalid username");
    }
}
