//! Password hashing command.
//!
//! # Usage
//!
//! ```bash
//! bizdesk-cli hash-password 'correct horse battery staple'
//! ```
//!
//! The printed PHC string can be placed in `BIZDESK_ADMIN_PASSWORD_HASH` so the
//! plain password never has to live in the server environment.

use thiserror::Error;

use bizdesk_server::services::auth::{self, AuthError, MIN_PASSWORD_LENGTH};

/// Errors that can occur while hashing.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Password is shorter than the login form accepts.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    TooShort,

    /// Hashing failed.
    #[error(transparent)]
    Hash(#[from] AuthError),
}

/// Hash `password` and print the PHC string to stdout.
///
/// # Errors
///
/// Returns `PasswordError::TooShort` for passwords below the minimum length.
pub fn hash(password: &str) -> Result<(), PasswordError> {
    let hash = hash_to_string(password)?;

    #[allow(clippy::print_stdout)]
    {
        println!("{hash}");
    }
    Ok(())
}

fn hash_to_string(password: &str) -> Result<String, PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort);
    }
    Ok(auth::hash_password(password)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_phc_string() {
        let hash = hash_to_string("operator-pass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(hash_to_string("short"), Err(PasswordError::TooShort)));
    }
}
