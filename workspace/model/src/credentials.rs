//! Pure credential helpers: password hashing and email normalization.
//! These touch no external state so they stay unit-testable without a
//! database.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("user must have an email address")]
    EmptyEmail,
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
}

/// Hash a password into an Argon2 PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(CredentialError::Hash)?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC string.
/// An unparseable hash counts as a mismatch rather than an error so the
/// caller never learns why verification failed.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Normalize an email address for storage: lower-case the portion after
/// the last `@`, leaving the local part untouched.
/// `Test2@Example.com` becomes `Test2@example.com`.
pub fn normalize_email(email: &str) -> Result<String, CredentialError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(CredentialError::EmptyEmail);
    }
    Ok(match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("password123").unwrap();
        assert_ne!(hash, "password123");
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify_password("password123", "not-a-phc-string"));
    }

    #[test]
    fn test_normalize_email_lowercases_domain_only() {
        assert_eq!(
            normalize_email("Test2@Example.com").unwrap(),
            "Test2@example.com"
        );
        assert_eq!(
            normalize_email("test@EXAMPLE.COM").unwrap(),
            "test@example.com"
        );
    }

    #[test]
    fn test_normalize_email_preserves_local_part() {
        assert_eq!(
            normalize_email("MiXeD.CaSe@Example.Com").unwrap(),
            "MiXeD.CaSe@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_empty() {
        assert!(matches!(
            normalize_email(""),
            Err(CredentialError::EmptyEmail)
        ));
        assert!(matches!(
            normalize_email("   "),
            Err(CredentialError::EmptyEmail)
        ));
    }
}
