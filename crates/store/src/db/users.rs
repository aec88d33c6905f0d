//! In-memory user store.
//!
//! A process-wide map of accounts behind a `tokio::sync::RwLock`, seeded
//! with one admin at startup. Guards are held only for the duration of a
//! map operation, never across foreign I/O.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use emporium_core::{Email, Role, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// A stored account: the domain object plus its argon2id password hash.
///
/// The hash stays inside this module; callers get it only through
/// [`UserStore::password_hash`] for verification.
#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: String,
}

/// The in-memory user table.
///
/// Cheaply cloneable; all clones share the same map.
#[derive(Debug, Clone)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<Username, StoredUser>>>,
    next_id: Arc<AtomicI32>,
}

impl UserStore {
    /// Create a store seeded with a single admin account.
    ///
    /// `admin_password_hash` must already be an argon2id hash; hashing is
    /// the auth service's job.
    #[must_use]
    pub fn seeded(admin_email: Email, admin_password_hash: String) -> Self {
        let admin_username =
            Username::parse("admin").expect("the literal 'admin' is a valid username");
        let admin = StoredUser {
            user: User {
                id: UserId::new(1),
                username: admin_username.clone(),
                email: admin_email,
                role: Role::Admin,
                created_at: Utc::now(),
            },
            password_hash: admin_password_hash,
        };

        let mut users = HashMap::new();
        users.insert(admin_username, admin);

        Self {
            users: Arc::new(RwLock::new(users)),
            next_id: Arc::new(AtomicI32::new(2)),
        }
    }

    /// Create a new user with the `user` role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    pub async fn create(
        &self,
        username: Username,
        email: Email,
        password_hash: String,
    ) -> Result<User, RepositoryError> {
        let mut users = self.users.write().await;

        if users.contains_key(&username) {
            return Err(RepositoryError::Conflict(format!(
                "username '{username}' is already registered"
            )));
        }

        let user = User {
            id: UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed)),
            username: username.clone(),
            email,
            role: Role::User,
            created_at: Utc::now(),
        };
        users.insert(
            username,
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    /// Get a user by username.
    pub async fn get(&self, username: &Username) -> Option<User> {
        let users = self.users.read().await;
        users.get(username).map(|stored| stored.user.clone())
    }

    /// Get a user together with their password hash, for verification.
    pub async fn password_hash(&self, username: &Username) -> Option<(User, String)> {
        let users = self.users.read().await;
        users
            .get(username)
            .map(|stored| (stored.user.clone(), stored.password_hash.clone()))
    }

    /// List all users, ordered by ID.
    pub async fn list(&self) -> Vec<User> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().map(|stored| stored.user.clone()).collect();
        all.sort_by_key(|u| u.id);
        all
    }

    /// Number of registered accounts.
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn store() -> UserStore {
        UserStore::seeded(
            Email::parse("admin@emporium.test").unwrap(),
            "$argon2id$fake-hash-for-tests".to_string(),
        )
    }

    #[tokio::test]
    async fn test_seeded_admin_exists() {
        let store = store();
        let admin = Username::parse("admin").unwrap();

        let user = store.get(&admin).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(store.count().await, 1);
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = store();
        let a = store
            .create(
                Username::parse("alice").unwrap(),
                Email::parse("alice@example.com").unwrap(),
                "hash-a".to_string(),
            )
            .await
            .unwrap();
        let b = store
            .create(
                Username::parse("bob").unwrap(),
                Email::parse("bob@example.com").unwrap(),
                "hash-b".to_string(),
            )
            .await
            .unwrap();

        assert!(a.id < b.id);
        assert_eq!(a.role, Role::User);
    }

    #[tokio::test]
    async fn test_create_duplicate_conflicts() {
        let store = store();
        let username = Username::parse("alice").unwrap();
        let email = Email::parse("alice@example.com").unwrap();

        store
            .create(username.clone(), email.clone(), "hash".to_string())
            .await
            .unwrap();
        let err = store
            .create(username, email, "hash".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_password_hash_returned_for_verification() {
        let store = store();
        let admin = Username::parse("admin").unwrap();

        let (user, hash) = store.password_hash(&admin).await.unwrap();
        assert_eq!(user.username, admin);
        assert_eq!(hash, "$argon2id$fake-hash-for-tests");
    }

    #[tokio::test]
    async fn test_list_sorted_by_id() {
        let store = store();
        store
            .create(
                Username::parse("zed").unwrap(),
                Email::parse("zed@example.com").unwrap(),
                "hash".to_string(),
            )
            .await
            .unwrap();

        let all = store.list().await;
        assert_eq!(all.len(), 2);
        assert_eq!(all.first().unwrap().username.as_str(), "admin");
    }
}
