//! Password hashing and verification using Argon2.

use argon2::{password_hash::SaltString, Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use password_hash::rand_core::OsRng;

use crate::error::{AuthError, Result};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Hashes a password using Argon2id.
///
/// Returns a PHC string that embeds the salt and parameters.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHashError)
}

/// Verifies a password against a stored PHC hash.
///
/// Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Checks that a password has at least [`MIN_PASSWORD_LEN`] characters,
/// a letter and a digit.
pub fn validate_password(password: &str) -> Result<()> {
    let problem = if password.chars().count() < MIN_PASSWORD_LEN {
        Some(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters long"
        ))
    } else if !password.chars().any(char::is_alphabetic) {
        Some("password must contain at least one letter".to_string())
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some("password must contain at least one digit".to_string())
    } else {
        None
    };

    problem.map_or(Ok(()), |msg| Err(AuthError::Validation(msg)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("password1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("password1", &hash));
        assert!(!verify_password("password2", &hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let first = hash_password("admin123").unwrap();
        let second = hash_password("admin123").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("admin123", &first));
        assert!(verify_password("admin123", &second));
    }

    #[test]
    fn test_malformed_hash_never_verifies() {
        assert!(!verify_password("password1", "password1"));
        assert!(!verify_password("", ""));
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("password1").is_ok());
        assert!(validate_password("admin123").is_ok());

        assert!(validate_password("pass1").is_err());
        assert!(validate_password("password").is_err());
        assert!(validate_password("12345678").is_err());
    }
}
