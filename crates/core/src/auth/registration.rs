//! Sign-up input rules.

use thiserror::Error;

/// Maximum username length.
pub const MAX_USERNAME_LEN: usize = 150;

/// Minimum password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    /// Username is empty, too long, or has disallowed characters.
    #[error(
        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
    )]
    InvalidUsername,

    /// Email is not of the form `local@domain`.
    #[error("Enter a valid email address.")]
    InvalidEmail,

    /// Password is shorter than the minimum.
    #[error("This password is too short. It must contain at least {min} characters.")]
    WeakPassword {
        /// Minimum length.
        min: usize,
    },

    /// The two password fields differ.
    #[error("Password fields didn't match.")]
    PasswordMismatch,
}

/// Checks a username: 1 to 150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), RegistrationError> {
    let len = username.chars().count();
    let allowed = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));

    if len == 0 || len > MAX_USERNAME_LEN || !allowed {
        return Err(RegistrationError::InvalidUsername);
    }
    Ok(())
}

/// Checks that an email has exactly one `@` with non-empty parts and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), RegistrationError> {
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(RegistrationError::InvalidEmail);
    };

    let domain_ok = !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !domain.contains(char::is_whitespace);

    if local.is_empty() || local.contains(char::is_whitespace) || !domain_ok {
        return Err(RegistrationError::InvalidEmail);
    }
    Ok(())
}

/// Validates a registration request in field order.
///
/// # Errors
///
/// Returns the first failing rule.
pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    password2: &str,
) -> Result<(), RegistrationError> {
    validate_username(username)?;
    validate_email(email)?;

    if password != password2 {
        return Err(RegistrationError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(RegistrationError::WeakPassword {
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("alice")]
    #[case("alice.smith+budget@home")]
    #[case("a_b-c")]
    fn test_valid_usernames(#[case] username: &str) {
        assert_eq!(validate_username(username), Ok(()));
    }

    #[rstest]
    #[case("")]
    #[case("has space")]
    #[case("semi;colon")]
    fn test_invalid_usernames(#[case] username: &str) {
        assert_eq!(
            validate_username(username),
            Err(RegistrationError::InvalidUsername)
        );
    }

    #[test]
    fn test_username_length_limit() {
        assert!(validate_username(&"u".repeat(150)).is_ok());
        assert!(validate_username(&"u".repeat(151)).is_err());
    }

    #[rstest]
    #[case("user@example.com", true)]
    #[case("first.last@mail.example.org", true)]
    #[case("userexample.com", false)]
    #[case("@example.com", false)]
    #[case("user@", false)]
    #[case("user@localhost", false)]
    #[case("a@b@c.com", false)]
    #[case("user@.com", false)]
    fn test_email(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[test]
    fn test_registration_ok() {
        assert_eq!(
            validate_registration("alice", "alice@example.com", "longenough", "longenough"),
            Ok(())
        );
    }

    #[test]
    fn test_registration_mismatch() {
        assert_eq!(
            validate_registration("alice", "alice@example.com", "longenough", "different1"),
            Err(RegistrationError::PasswordMismatch)
        );
    }

    #[test]
    fn test_registration_short_password() {
        assert_eq!(
            validate_registration("alice", "alice@example.com", "short", "short"),
            Err(RegistrationError::WeakPassword { min: 8 })
        );
    }
}
