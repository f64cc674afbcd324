//! Password hashing and validation for Aula.
//!
//! Uses Argon2id for secure password hashing.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    TooLong,

    /// Password lacks an uppercase letter.
    #[error("password must contain at least one uppercase letter")]
    MissingUppercase,

    /// Password lacks a lowercase letter.
    #[error("password must contain at least one lowercase letter")]
    MissingLowercase,

    /// Password lacks a digit.
    #[error("password must contain at least one number")]
    MissingDigit,

    /// Password hashing failed.
    #[error("password hashing failed: {0}")]
    HashError(String),

    /// Password hash is invalid.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Password verification failed (wrong password).
    #[error("password verification failed")]
    VerificationFailed,
}

/// Create the Argon2 hasher with recommended parameters.
///
/// Parameters:
/// - Memory cost: 64 MB (65536 KiB)
/// - Time cost: 3 iterations
/// - Parallelism: 4 threads
fn create_argon2() -> Argon2<'static> {
    let m_cost = 65536;
    let t_cost = 3;
    let p_cost = 4;

    let params = Params::new(m_cost, t_cost, p_cost, None).expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Hash a password using Argon2id.
///
/// Returns a PHC-formatted hash string that includes the salt and parameters.
/// The plaintext is never logged.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);

    let argon2 = create_argon2();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns `Ok(())` if the password matches, or an error if it doesn't.
pub fn verify_password(password: &str, hash: &str) -> Result<(), PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    // Parameters come from the parsed hash, not from create_argon2()
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| PasswordError::VerificationFailed)
}

/// Validate password composition requirements.
///
/// Checks:
/// - Length between 8 and 128 characters
/// - At least one uppercase letter, one lowercase letter, and one digit
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(PasswordError::TooLong);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PasswordError::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PasswordError::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PasswordError::MissingDigit);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_success() {
        let password = "TestPassword123";
        let hash = hash_password(password).unwrap();

        // Should be a valid PHC string
        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("$v=19$")); // Version 0x13 = 19
    }

    #[test]
    fn test_hash_password_different_hashes() {
        let password = "SamePassword1";
        let hash1 = hash_password(password).unwrap();
        let hash2 = hash_password(password).unwrap();

        // Same password should produce different hashes (different salts)
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_correct() {
        let password = "CorrectPassword1";
        let hash = hash_password(password).unwrap();

        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_verify_password_wrong() {
        let password = "CorrectPassword1";
        let hash = hash_password(password).unwrap();

        let result = verify_password("WrongPassword1", &hash);
        assert!(result.is_err());
        assert!(matches!(result, Err(PasswordError::VerificationFailed)));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("AnyPassword1", "not_a_valid_hash");
        assert!(result.is_err());
        assert!(matches!(result, Err(PasswordError::InvalidHash)));
    }

    #[test]
    fn test_validate_password_too_short() {
        let result = validate_password("Sh0rt");
        assert!(matches!(result, Err(PasswordError::TooShort)));
    }

    #[test]
    fn test_validate_password_minimum_length() {
        // Exactly 8 characters with all required classes
        assert!(validate_password("Abcdef12").is_ok());
    }

    #[test]
    fn test_validate_password_too_long() {
        let long_password = format!("Aa1{}", "a".repeat(126));
        let result = validate_password(&long_password);
        assert!(matches!(result, Err(PasswordError::TooLong)));
    }

    #[test]
    fn test_validate_password_missing_uppercase() {
        let result = validate_password("lowercase1");
        assert!(matches!(result, Err(PasswordError::MissingUppercase)));
    }

    #[test]
    fn test_validate_password_missing_lowercase() {
        let result = validate_password("UPPERCASE1");
        assert!(matches!(result, Err(PasswordError::MissingLowercase)));
    }

    #[test]
    fn test_validate_password_missing_digit() {
        let result = validate_password("NoDigitsHere");
        assert!(matches!(result, Err(PasswordError::MissingDigit)));
    }

    #[test]
    fn test_hash_password_rejects_weak() {
        let result = hash_password("weakpass");
        assert!(result.is_err());
    }

    #[test]
    fn test_password_with_special_chars() {
        let password = "P@$$w0rd!#$%^&*()";
        let hash = hash_password(password).unwrap();
        assert!(verify_password(password, &hash).is_ok());
    }

    #[test]
    fn test_password_error_display() {
        assert_eq!(
            PasswordError::TooShort.to_string(),
            "password must be at least 8 characters"
        );
        assert_eq!(
            PasswordError::MissingUppercase.to_string(),
            "password must contain at least one uppercase letter"
        );
        assert_eq!(
            PasswordError::VerificationFailed.to_string(),
            "password verification failed"
        );
    }

    #[test]
    fn test_argon2_params() {
        let hash = hash_password("TestPassword1").unwrap();

        assert!(hash.contains("m=65536"));
        assert!(hash.contains("t=3"));
        assert!(hash.contains("p=4"));
    }
}
