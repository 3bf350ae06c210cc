//! User account repository.

use bizdesk_core::Username;

use super::{RecordStore, RepositoryError};
use crate::models::User;

/// Repository for login accounts.
pub struct UserRepository<'a> {
    store: &'a RecordStore,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &Username) -> Option<User> {
        self.store.users.read().await.get(username).cloned()
    }

    /// Whether an account with this username exists.
    pub async fn exists(&self, username: &Username) -> bool {
        self.store.users.read().await.contains_key(username)
    }

    /// Store a new account.
    ///
    /// The uniqueness check and the insert happen under one write lock, so two
    /// concurrent registrations for the same name cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is already taken.
    /// The collection is left unchanged in that case.
    pub async fn create(&self, user: User) -> Result<(), RepositoryError> {
        let mut users = self.store.users.write().await;
        if users.contains_key(&user.username) {
            return Err(RepositoryError::Conflict(format!(
                "username already exists: {}",
                user.username
            )));
        }
        users.insert(user.username.clone(), user);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bizdesk_core::UserRole;
    use secrecy::{ExposeSecret, SecretString};

    use super::*;

    fn user(name: &str, hash: &str) -> User {
        User {
            username: Username::parse(name).unwrap(),
            password_hash: SecretString::from(hash.to_owned()),
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = RecordStore::new();
        let repo = store.users();

        repo.create(user("alice", "h1")).await.unwrap();

        let found = repo
            .get_by_username(&Username::parse("alice").unwrap())
            .await
            .unwrap();
        assert_eq!(found.password_hash.expose_secret(), "h1");
        assert!(
            repo.get_by_username(&Username::parse("Alice").unwrap())
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts_without_mutation() {
        let store = RecordStore::new();
        let repo = store.users();
        repo.create(user("alice", "original")).await.unwrap();

        let err = repo.create(user("alice", "replacement")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let kept = repo
            .get_by_username(&Username::parse("alice").unwrap())
            .await
            .unwrap();
        assert_eq!(kept.password_hash.expose_secret(), "original");
    }
}
