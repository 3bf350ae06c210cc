//! User account record.

use secrecy::SecretString;

use bizdesk_core::{UserRole, Username};

/// A login account.
///
/// The password is only ever held as an argon2 PHC string.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique login name.
    pub username: Username,
    /// Argon2 PHC hash of the password.
    pub password_hash: SecretString,
    /// Permission level.
    pub role: UserRole,
}
