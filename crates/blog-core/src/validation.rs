//! Input validation rules shared by the credential and content stores.
//!
//! Every check returns the first violation it finds as a
//! [`DomainError::Validation`]; callers run checks in a fixed order and stop
//! at the first failure.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::{Gender, Tag};
use crate::error::DomainError;

pub const TITLE_MAX_CHARS: usize = 200;
pub const COMMENT_MAX_CHARS: usize = 1000;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 20;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("username pattern compiles"));

/// Reject a missing or blank field.
pub fn required(
    field: &'static str,
    label: &str,
    value: Option<String>,
) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(DomainError::validation(field, format!("{label} is required"))),
    }
}

/// Reject a missing or empty field. Whitespace is significant, so this is
/// used for secrets.
pub fn present(
    field: &'static str,
    label: &str,
    value: Option<String>,
) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(DomainError::validation(field, format!("{label} is required"))),
    }
}

pub fn email(value: &str) -> Result<(), DomainError> {
    if EMAIL_RE.is_match(value) {
        Ok(())
    } else {
        Err(DomainError::validation(
            "email",
            "Please provide a valid email address",
        ))
    }
}

pub fn password(value: &str) -> Result<(), DomainError> {
    if value.chars().count() >= PASSWORD_MIN_LEN {
        Ok(())
    } else {
        Err(DomainError::validation(
            "password",
            format!("Password must be at least {PASSWORD_MIN_LEN} characters long"),
        ))
    }
}

pub fn gender(value: &str) -> Result<Gender, DomainError> {
    value.parse().map_err(|_| {
        DomainError::validation("gender", "Gender must be either 'male' or 'female'")
    })
}

pub fn username(value: &str) -> Result<(), DomainError> {
    if !USERNAME_RE.is_match(value) {
        return Err(DomainError::validation(
            "username",
            "Username can only contain letters, numbers, and underscores",
        ));
    }

    let len = value.len();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(DomainError::validation(
            "username",
            format!("Username must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"),
        ));
    }

    Ok(())
}

pub fn profile_url(value: &str) -> Result<(), DomainError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|_| DomainError::validation("profile_url", "Please provide a valid profile URL"))
}

/// Trimmed, non-empty, at most [`TITLE_MAX_CHARS`] characters.
pub fn title(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("title", "Title is required"));
    }
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        return Err(DomainError::validation(
            "title",
            format!("Title must be at most {TITLE_MAX_CHARS} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn description(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(
            "description",
            "Description is required",
        ));
    }
    Ok(trimmed.to_string())
}

/// At least one tag, every tag from the fixed taxonomy.
pub fn tags<S: AsRef<str>>(values: &[S]) -> Result<Vec<Tag>, DomainError> {
    if values.is_empty() {
        return Err(DomainError::validation(
            "tags",
            format!("At least one tag is required. Allowed tags: {}", Tag::allowed()),
        ));
    }
    Tag::parse_set(values).map_err(|invalid| DomainError::InvalidTags { invalid })
}

pub fn comment_content(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("content", "Comment content is required"));
    }
    if trimmed.chars().count() > COMMENT_MAX_CHARS {
        return Err(DomainError::validation(
            "content",
            format!("Comment must be at most {COMMENT_MAX_CHARS} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: DomainError) -> &'static str {
        match err {
            DomainError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_present_keeps_whitespace() {
        let kept = present("password", "Password", Some("      ".into())).unwrap();
        assert_eq!(kept, "      ");

        let empty = present("password", "Password", Some(String::new())).unwrap_err();
        assert_eq!(field_of(empty), "password");
        let missing = present("password", "Password", None).unwrap_err();
        assert_eq!(field_of(missing), "password");
        assert!(required("name", "Name", Some("   ".into())).is_err());
    }

    #[test]
    fn test_required_rejects_missing_and_blank() {
        assert_eq!(field_of(required("name", "Name", None).unwrap_err()), "name");
        assert_eq!(
            field_of(required("name", "Name", Some("   ".into())).unwrap_err()),
            "name"
        );
        assert_eq!(required("name", "Name", Some("A".into())).unwrap(), "A");
    }

    #[test]
    fn test_email_shape() {
        assert!(email("a@x.com").is_ok());
        assert!(email("first.last@sub.example.org").is_ok());
        assert!(email("a@x").is_err());
        assert!(email("a x@y.com").is_err());
        assert!(email("@x.com").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(password("12345").is_err());
        assert!(password("123456").is_ok());
    }

    #[test]
    fn test_username_rules() {
        assert!(username("user_a").is_ok());
        assert!(username("ab").is_err());
        assert!(username("a".repeat(21).as_str()).is_err());
        assert!(username("a".repeat(20).as_str()).is_ok());
        assert!(username("bad-name").is_err());
        assert!(username("spaced name").is_err());
    }

    #[test]
    fn test_profile_url() {
        assert!(profile_url("http://x.com/a").is_ok());
        assert!(profile_url("not a url").is_err());
        assert!(profile_url("/relative/path").is_err());
    }

    #[test]
    fn test_title_limits() {
        assert_eq!(title("  Hello  ").unwrap(), "Hello");
        assert!(title("").is_err());
        assert!(title("x".repeat(200).as_str()).is_ok());
        assert!(title("x".repeat(201).as_str()).is_err());
    }

    #[test]
    fn test_tags_require_one_valid() {
        let empty: [&str; 0] = [];
        assert_eq!(field_of(tags(&empty).unwrap_err()), "tags");

        match tags(&["sports", "gardening"]).unwrap_err() {
            DomainError::InvalidTags { invalid } => assert_eq!(invalid, vec!["gardening"]),
            other => panic!("unexpected error: {other:?}"),
        }

        assert_eq!(tags(&["nature"]).unwrap(), vec![Tag::Nature]);
    }

    #[test]
    fn test_comment_content_limits() {
        assert!(comment_content("").is_err());
        assert!(comment_content(" \n ").is_err());
        assert!(comment_content("x".repeat(1000).as_str()).is_ok());
        assert!(comment_content("x".repeat(1001).as_str()).is_err());
    }
}
