//! Field checks shared by the user, note and auth services.

use regex::Regex;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::sync::OnceLock;

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("Invalid regex")
    })
}

/// Returns true when `email` has a local part, an `@`, a dotted domain and a
/// top-level segment of at least two letters. The input is not trimmed.
#[must_use]
pub fn validate_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Collation key for case-insensitive uniqueness: two values collide when
/// their keys are equal.
#[must_use]
pub fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// A text field counts as present when it was supplied and is not empty.
/// Returns the text in that case, `None` otherwise.
#[must_use]
pub fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Field deserializer for request inputs: a value of the wrong JSON type
/// (or `null`) becomes `None`, so the service reports it with its usual
/// required-field or email message instead of failing the whole body.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Input {
        #[serde(default, deserialize_with = "lenient")]
        id: Option<i32>,
        #[serde(default, deserialize_with = "lenient")]
        roles: Option<Vec<String>>,
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("a@b.com"));
        assert!(validate_email("first.last+tag@mail.example.co"));
        assert!(validate_email("x_y%z@sub-domain.org"));

        assert!(!validate_email(""));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("a@b"));
        assert!(!validate_email("a@b.c"));
        assert!(!validate_email("@b.com"));
        assert!(!validate_email("a@b.c0m"));
        assert!(!validate_email(" a@b.com"));
    }

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("Alice"), fold_case("aLICE"));
        assert_eq!(fold_case("REPORT"), "report");
        assert_eq!(fold_case("Ärger"), fold_case("äRGER"));
        assert_ne!(fold_case("alice"), fold_case("alice "));
    }

    #[test]
    fn test_present() {
        assert_eq!(present(Some("a".to_string())), Some("a".to_string()));
        assert_eq!(present(Some(" ".to_string())), Some(" ".to_string()));
        assert_eq!(present(Some(String::new())), None);
        assert_eq!(present(None), None);
    }

    #[test]
    fn test_lenient_drops_mistyped_values() {
        let input: Input = serde_json::from_str(r#"{"id": "abc", "roles": "Manager"}"#).unwrap();
        assert!(input.id.is_none());
        assert!(input.roles.is_none());

        let input: Input = serde_json::from_str(r#"{"id": 7, "roles": ["Manager"]}"#).unwrap();
        assert_eq!(input.id, Some(7));
        assert_eq!(input.roles, Some(vec!["Manager".to_string()]));

        let input: Input = serde_json::from_str(r#"{"id": null}"#).unwrap();
        assert!(input.id.is_none());
        assert!(input.roles.is_none());
    }
}
