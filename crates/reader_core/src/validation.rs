//! crates/reader_core/src/validation.rs
//!
//! Input checks for registration, login and progress saves. Each check
//! returns `PortError::Validation` with a message suitable for the client.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::NewUser;
use crate::ports::{PortError, PortResult};

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

fn required<'a>(value: Option<&'a str>, field: &str) -> PortResult<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(PortError::Validation(format!("Field '{}' is required", field))),
    }
}

/// Validates a registration form. `password_confirm` is only compared when
/// the client sent it.
pub fn validate_registration(
    username: Option<&str>,
    email: Option<&str>,
    password: Option<&str>,
    password_confirm: Option<&str>,
) -> PortResult<NewUser> {
    let username = required(username, "username")?;
    let email = required(email, "email")?;
    // Passwords are taken verbatim, only presence is checked after trimming.
    required(password, "password")?;
    let password = password.unwrap_or_default();

    if username.chars().count() < MIN_USERNAME_CHARS {
        return Err(PortError::Validation(format!(
            "Username must be at least {} characters long",
            MIN_USERNAME_CHARS
        )));
    }
    if !is_valid_email(email) {
        return Err(PortError::Validation("Email address is not valid".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PortError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_CHARS
        )));
    }
    if let Some(confirm) = password_confirm {
        if confirm != password {
            return Err(PortError::Validation("Passwords do not match".to_string()));
        }
    }

    Ok(NewUser {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Both login fields must be present; returns `(login, password)`.
pub fn validate_login<'a>(
    login: Option<&'a str>,
    password: Option<&'a str>,
) -> PortResult<(&'a str, &'a str)> {
    let login = required(login, "login")?;
    required(password, "password")?;
    Ok((login, password.unwrap_or_default()))
}

/// A progress fraction must be a finite number in `[0, 1]`.
pub fn validate_progress_fraction(progress: f64) -> PortResult<f64> {
    if progress.is_finite() && (0.0..=1.0).contains(&progress) {
        Ok(progress)
    } else {
        Err(PortError::Validation(format!(
            "Progress must be between 0 and 1, got {}",
            progress
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_a_complete_form() {
        let user = validate_registration(
            Some(" reader "),
            Some("reader@example.com"),
            Some("secret1"),
            Some("secret1"),
        )
        .unwrap();
        assert_eq!(user.username, "reader");
        assert_eq!(user.email, "reader@example.com");
        assert_eq!(user.password, "secret1");
    }

    #[test]
    fn missing_fields_are_rejected() {
        let err = validate_registration(None, Some("a@b.c"), Some("secret1"), None).unwrap_err();
        assert!(matches!(err, PortError::Validation(msg) if msg.contains("username")));
        assert!(validate_registration(Some("reader"), Some("  "), Some("secret1"), None).is_err());
        assert!(validate_registration(Some("reader"), Some("a@b.c"), None, None).is_err());
    }

    #[test]
    fn short_values_are_rejected() {
        assert!(validate_registration(Some("ab"), Some("a@b.c"), Some("secret1"), None).is_err());
        assert!(validate_registration(Some("reader"), Some("a@b.c"), Some("12345"), None).is_err());
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["plain", "no@dot", "two@@example.com", "sp ace@example.com"] {
            assert!(!is_valid_email(email), "{email} should be invalid");
        }
        assert!(is_valid_email("читатель@пример.рф"));
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        let err = validate_registration(
            Some("reader"),
            Some("reader@example.com"),
            Some("secret1"),
            Some("secret2"),
        )
        .unwrap_err();
        assert!(matches!(err, PortError::Validation(msg) if msg.contains("match")));
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(
            validate_login(Some("reader"), Some("pw")).unwrap(),
            ("reader", "pw")
        );
        assert!(validate_login(Some(""), Some("pw")).is_err());
        assert!(validate_login(Some("reader"), None).is_err());
    }

    #[test]
    fn progress_must_be_a_fraction() {
        assert_eq!(validate_progress_fraction(0.5).unwrap(), 0.5);
        assert!(validate_progress_fraction(0.0).is_ok());
        assert!(validate_progress_fraction(1.0).is_ok());
        assert!(validate_progress_fraction(-0.1).is_err());
        assert!(validate_progress_fraction(1.5).is_err());
        assert!(validate_progress_fraction(f64::NAN).is_err());
    }
}
