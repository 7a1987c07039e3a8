use lazy_static::lazy_static;
use regex::Regex;

use crate::error::ApiError;

fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Canonical stored form of an email: the domain part is lowercased, the
/// local part is kept exactly as given. A blank email is a validation
/// failure before anything touches the store.
pub fn normalize_email(raw: &str) -> Result<String, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ApiError::field("email", "this field may not be blank"));
    }
    let Some((local, domain)) = raw.rsplit_once('@') else {
        return Err(ApiError::field("email", "enter a valid email address"));
    };
    let normalized = format!("{local}@{}", domain.to_lowercase());
    if !is_valid_email(&normalized) {
        return Err(ApiError::field("email", "enter a valid email address"));
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_is_lowercased_local_part_preserved() {
        let samples = [
            ("test1@EXAMPLE.com", "test1@example.com"),
            ("Test2@Example.com", "Test2@example.com"),
            ("TEST3@EXAMPLE.COM", "TEST3@example.com"),
            ("test4@example.COM", "test4@example.com"),
        ];
        for (raw, expected) in samples {
            assert_eq!(normalize_email(raw).unwrap(), expected);
        }
    }

    #[test]
    fn blank_email_is_a_field_error() {
        for raw in ["", "   "] {
            match normalize_email(raw) {
                Err(ApiError::Validation(errors)) => assert!(errors.contains_key("email")),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_email_is_rejected() {
        for raw in ["no-at-sign", "a@b", "spaces in@example.com", "@example.com"] {
            assert!(normalize_email(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(
            normalize_email("  user@Example.COM  ").unwrap(),
            "user@example.com"
        );
    }
}
