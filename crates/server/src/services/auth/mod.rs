//! Authentication service.
//!
//! Password login and self-service registration against the user store.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use bizdesk_core::{UserRole, Username};

use crate::config::{AdminPassword, AdminSeed};
use crate::models::User;
use crate::store::{RecordStore, UserRepository};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Handles user registration, login, and seeding the operator account.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self {
            users: UserRepository::new(store),
        }
    }

    /// Register a new `user`-role account.
    ///
    /// Checks run in a fixed order: username format, existing account,
    /// confirmation, password strength. Nothing is written unless all pass.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` if the username is malformed.
    /// Returns `AuthError::UserAlreadyExists` if the username is taken.
    /// Returns `AuthError::PasswordMismatch` if the confirmation differs.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<User, AuthError> {
        let username = Username::parse(username)?;

        if self.users.exists(&username).await {
            return Err(AuthError::UserAlreadyExists);
        }

        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }

        validate_password(password)?;

        let user = User {
            username,
            password_hash: SecretString::from(hash_password(password)?),
            role: UserRole::User,
        };

        // A concurrent registration may have claimed the name since the check.
        self.users
            .create(user.clone())
            .await
            .map_err(|_| AuthError::UserAlreadyExists)?;

        Ok(user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username is unknown or
    /// the password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, AuthError> {
        let Ok(username) = Username::parse(username) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .users
            .get_by_username(&username)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, user.password_hash.expose_secret())?;

        Ok(user)
    }

    /// Create the operator account described by `seed`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserAlreadyExists` if the name is already taken.
    /// Returns `AuthError::PasswordHash` if a plain password cannot be hashed.
    pub async fn seed_admin(&self, seed: &AdminSeed) -> Result<(), AuthError> {
        let password_hash = match &seed.password {
            AdminPassword::Hash(hash) => hash.clone(),
            AdminPassword::Plain(plain) | AdminPassword::Generated(plain) => {
                SecretString::from(hash_password(plain.expose_secret())?)
            }
        };

        self.users
            .create(User {
                username: seed.username.clone(),
                password_hash,
                role: UserRole::Admin,
            })
            .await
            .map_err(|_| AuthError::UserAlreadyExists)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_then_login() {
        let store = RecordStore::new();
        let auth = AuthService::new(&store);

        let user = auth
            .register("alice", "correct horse", "correct horse")
            .await
            .unwrap();
        assert_eq!(user.role, UserRole::User);
        assert!(user.password_hash.expose_secret().starts_with("$argon2"));

        let logged_in = auth.login("alice", "correct horse").await.unwrap();
        assert_eq!(logged_in.username.as_str(), "alice");

        assert!(matches!(
            auth.login("alice", "wrong password").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("bob", "correct horse").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_register_existing_username_is_rejected_first() {
        let store = RecordStore::new();
        let auth = AuthService::new(&store);
        auth.register("alice", "password1", "password1").await.unwrap();

        // Even a mismatched confirmation reports the duplicate.
        let err = auth.register("alice", "other-pass", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));

        auth.login("alice", "password1").await.unwrap();
    }

    #[tokio::test]
    async fn test_register_validation() {
        let store = RecordStore::new();
        let auth = AuthService::new(&store);

        assert!(matches!(
            auth.register("bob", "password1", "password2").await,
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            auth.register("bob", "short", "short").await,
            Err(AuthError::WeakPassword(_))
        ));
        assert!(matches!(
            auth.register("   ", "password1", "password1").await,
            Err(AuthError::InvalidUsername(_))
        ));
        assert!(!store.users().exists(&Username::parse("bob").unwrap()).await);
    }

    #[tokio::test]
    async fn test_seed_admin_from_plain_password() {
        let store = RecordStore::new();
        let auth = AuthService::new(&store);
        let seed = AdminSeed {
            username: Username::parse("admin").unwrap(),
            password: AdminPassword::Plain(SecretString::from("operator-pass")),
        };

        auth.seed_admin(&seed).await.unwrap();

        let admin = auth.login("admin", "operator-pass").await.unwrap();
        assert!(admin.role.is_admin());
        assert!(matches!(
            auth.seed_admin(&seed).await,
            Err(AuthError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_seed_admin_from_hash() {
        let store = RecordStore::new();
        let auth = AuthService::new(&store);
        let hash = hash_password("hashed-secret").unwrap();
        let seed = AdminSeed {
            username: Username::parse("root").unwrap(),
            password: AdminPassword::Hash(SecretString::from(hash)),
        };

        auth.seed_admin(&seed).await.unwrap();
        auth.login("root", "hashed-secret").await.unwrap();
    }
}
