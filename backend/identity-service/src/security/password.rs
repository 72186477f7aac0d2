//! Password hashing and verification using Argon2id

use crate::error::{IdentityError, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash a password with Argon2id and a fresh random salt.
///
/// Returns a PHC-formatted string safe for database storage.
pub fn hash_password(password: &str) -> Result<String> {
    validate_password_strength(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| IdentityError::Internal(format!("Password hashing failed: {e}")))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored PHC hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| IdentityError::Internal(format!("Invalid password hash format: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(IdentityError::Internal(format!(
            "Password verification failed: {e}"
        ))),
    }
}

fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(IdentityError::Validation(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(IdentityError::Validation(
            "Password must contain a digit".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_alphabetic()) {
        return Err(IdentityError::Validation(
            "Password must contain a letter".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_round_trip() {
        let hash = hash_password("correct horse 9").unwrap();
        assert!(verify_password("correct horse 9", &hash).unwrap());
        assert!(!verify_password("wrong horse 9", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("correct horse 9").unwrap();
        let b = hash_password("correct horse 9").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_weak_passwords_rejected() {
        assert!(hash_password("short1").is_err());
        assert!(hash_password("nodigitshere").is_err());
        assert!(hash_password("123456789").is_err());
    }
}
