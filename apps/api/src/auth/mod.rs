//! Accounts and sessions: Argon2 password hashes in Postgres, session ids in Redis.

pub mod handlers;
pub mod password;
pub mod sessions;
pub mod users;

use crate::errors::AppError;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Rejects obviously malformed credentials before touching the database.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("jana@example.sk", "secret").is_ok());
        assert!(validate_credentials("", "secret").is_err());
        assert!(validate_credentials("jana.example.sk", "secret").is_err());
        assert!(validate_credentials("jana@example.sk", "short").is_err());
    }
}
