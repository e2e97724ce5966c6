//! Custom `validator` rules for post and account fields.
//!
//! Text fields are trimmed before they are measured and lengths count characters,
//! not bytes. Attach them with `#[validate(custom(function = "..."))]`; on an
//! `Option` field the rule only runs when a value is present.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::ValidationError;

pub const TITLE_MIN_CHARS: usize = 5;
pub const TITLE_MAX_CHARS: usize = 120;
pub const CONTENT_MIN_CHARS: usize = 50;
pub const USERNAME_MIN_CHARS: usize = 3;
pub const USERNAME_MAX_CHARS: usize = 30;
pub const PASSWORD_MIN_CHARS: usize = 6;

static IMAGE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://.+").expect("static regex"));
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("static regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("static regex"));

fn invalid(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn title(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if (TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        Ok(())
    } else {
        Err(invalid(
            "length",
            format!(
                "Title must be between {} and {} characters",
                TITLE_MIN_CHARS, TITLE_MAX_CHARS
            ),
        ))
    }
}

pub fn content(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() >= CONTENT_MIN_CHARS {
        Ok(())
    } else {
        Err(invalid(
            "length",
            format!("Content must be at least {} characters", CONTENT_MIN_CHARS),
        ))
    }
}

/// Blank input passes; it means "no image".
pub fn image_url(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() || IMAGE_URL_RE.is_match(value) {
        Ok(())
    } else {
        Err(invalid("url", "Please provide a valid image URL"))
    }
}

pub fn username(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    let len = value.chars().count();
    if value.is_empty() {
        Err(invalid("required", "Username is required"))
    } else if len < USERNAME_MIN_CHARS {
        Err(invalid(
            "length",
            format!("Username must be at least {} characters", USERNAME_MIN_CHARS),
        ))
    } else if len > USERNAME_MAX_CHARS {
        Err(invalid(
            "length",
            format!("Username cannot exceed {} characters", USERNAME_MAX_CHARS),
        ))
    } else if !USERNAME_RE.is_match(value) {
        Err(invalid(
            "regex",
            "Username can only contain letters, numbers, and underscores",
        ))
    } else {
        Ok(())
    }
}

pub fn email(value: &str) -> Result<(), ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        Err(invalid("required", "Email is required"))
    } else if !EMAIL_RE.is_match(value) {
        Err(invalid("email", "Please enter a valid email"))
    } else {
        Ok(())
    }
}

pub fn password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() >= PASSWORD_MIN_CHARS {
        Ok(())
    } else {
        Err(invalid(
            "length",
            format!("Password must be at least {} characters", PASSWORD_MIN_CHARS),
        ))
    }
}

/// Error for a confirmation field that differs from the original.
pub fn mismatch(message: &'static str) -> ValidationError {
    invalid("must_match", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_bounds_are_inclusive_and_trimmed() {
        assert!(title("abcd").is_err());
        assert!(title("  abcde  ").is_ok());
        assert!(title(&"a".repeat(120)).is_ok());
        assert!(title(&"a".repeat(121)).is_err());
        // padding does not count towards the minimum
        assert!(title("   abc   ").is_err());
    }

    #[test]
    fn title_counts_characters_not_bytes() {
        assert!(title("ёжик!").is_ok());
        assert!(title(&"ж".repeat(120)).is_ok());
    }

    #[test]
    fn content_minimum() {
        assert!(content(&"x".repeat(49)).is_err());
        assert!(content(&"x".repeat(50)).is_ok());
        assert!(content(&" ".repeat(60)).is_err());
    }

    #[test]
    fn image_url_rules() {
        assert!(image_url("").is_ok());
        assert!(image_url("   ").is_ok());
        assert!(image_url("http://example.com/a.png").is_ok());
        assert!(image_url("https://x").is_ok());
        assert!(image_url("https://").is_err());
        assert!(image_url("ftp://example.com/a.png").is_err());
        assert!(image_url("example.com/a.png").is_err());
    }

    #[test]
    fn username_rules() {
        assert!(username("jo").is_err());
        assert!(username(" jane_smith ").is_ok());
        assert!(username("jane smith").is_err());
        assert!(username(&"a".repeat(31)).is_err());

        let err = username("   ").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("Username is required"));
    }

    #[test]
    fn email_and_password_rules() {
        assert!(email("Jane@Example.com").is_ok());
        assert!(email("jane@example").is_err());
        assert!(password("12345").is_err());
        assert!(password("123456").is_ok());
    }
}
