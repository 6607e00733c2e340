//! services/api/src/adapters/users.rs
//!
//! The `UserRepository` port backed by `users.json`.

use crate::adapters::json_file::{read_json_array, write_json_array};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reader_core::domain::{NewUser, User, UserCredentials, UserId};
use reader_core::ports::{PortError, PortResult, UserRepository};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::info;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Every mutation reads the whole file, edits it and writes it back while
/// holding `lock`, so concurrent registrations cannot drop each other's rows.
#[derive(Debug)]
pub struct JsonUserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> PortResult<Vec<UserRecord>> {
        read_json_array(&self.path).await
    }
}

/// Millisecond timestamps, bumped past the current maximum when two users
/// register within the same millisecond.
fn next_user_id(users: &[UserRecord], now: DateTime<Utc>) -> UserId {
    let max_id = users.iter().map(|u| u.id).max().unwrap_or(0);
    now.timestamp_millis().max(max_id.saturating_add(1))
}

//=========================================================================================
// File Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    id: UserId,
    username: String,
    email: String,
    password: String,
    join_date: DateTime<Utc>,
    #[serde(default)]
    last_login: Option<DateTime<Utc>>,
}

impl UserRecord {
    fn to_domain(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            join_date: self.join_date,
            last_login: self.last_login,
        }
    }

    fn to_credentials(&self) -> UserCredentials {
        UserCredentials {
            user: self.to_domain(),
            password: self.password.clone(),
        }
    }
}

//=========================================================================================
// `UserRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl UserRepository for JsonUserStore {
    async fn create_user(&self, new_user: NewUser) -> PortResult<User> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;

        if users
            .iter()
            .any(|u| u.email == new_user.email || u.username == new_user.username)
        {
            return Err(PortError::Conflict(
                "A user with this email or username already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let record = UserRecord {
            id: next_user_id(&users, now),
            username: new_user.username,
            email: new_user.email,
            password: new_user.password,
            join_date: now,
            last_login: None,
        };
        let user = record.to_domain();
        users.push(record);
        write_json_array(&self.path, &users).await?;

        info!("Registered user {} ({})", user.id, user.username);
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> PortResult<UserCredentials> {
        self.load()
            .await?
            .iter()
            .find(|u| u.email == login || u.username == login)
            .map(UserRecord::to_credentials)
            .ok_or_else(|| PortError::NotFound(format!("No user with login '{}'", login)))
    }

    async fn record_login(&self, user_id: UserId) -> PortResult<User> {
        let _guard = self.lock.lock().await;
        let mut users = self.load().await?;

        let record = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        record.last_login = Some(Utc::now());
        let user = record.to_domain();

        write_json_array(&self.path, &users).await?;
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
        }
    }

    fn stored(id: UserId) -> UserRecord {
        UserRecord {
            id,
            username: format!("user{id}"),
            email: format!("u{id}@example.com"),
            password: "secret1".to_string(),
            join_date: Utc::now(),
            last_login: None,
        }
    }

    #[test]
    fn next_id_follows_the_clock_or_the_largest_id() {
        let now = Utc::now();
        let millis = now.timestamp_millis();
        assert_eq!(next_user_id(&[], now), millis);
        assert_eq!(next_user_id(&[stored(1)], now), millis);
        assert_eq!(next_user_id(&[stored(millis)], now), millis + 1);
        assert_eq!(next_user_id(&[stored(i64::MAX)], now), i64::MAX);
    }

    #[tokio::test]
    async fn registered_users_can_be_found_by_either_login() {
        let dir = TempDir::new().unwrap();
        let store = JsonUserStore::new(dir.path().join("users.json"));

        let user = store
            .create_user(new_user("anna", "anna@example.com"))
            .await
            .unwrap();
        assert!(user.last_login.is_none());

        let by_name = store.find_by_login("anna").await.unwrap();
        let by_email = store.find_by_login("anna@example.com").await.unwrap();
        assert_eq!(by_name.user, user);
        assert_eq!(by_email.password, "secret1");
        assert!(matches!(
            store.find_by_login("boris").await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn duplicates_conflict_and_leave_the_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.json");
        let store = JsonUserStore::new(&path);
        store
            .create_user(new_user("anna", "anna@example.com"))
            .await
            .unwrap();
        let before = tokio::fs::read_to_string(&path).await.unwrap();

        for dup in [
            new_user("anna", "other@example.com"),
            new_user("other", "anna@example.com"),
        ] {
            assert!(matches!(
                store.create_user(dup).await,
                Err(PortError::Conflict(_))
            ));
        }
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), before);
    }

    #[tokio::test]
    async fn record_login_stamps_last_login() {
        let dir = TempDir::new().unwrap();
        let store = JsonUserStore::new(dir.path().join("users.json"));
        let user = store
            .create_user(new_user("anna", "anna@example.com"))
            .await
            .unwrap();

        let logged_in = store.record_login(user.id).await.unwrap();
        assert!(logged_in.last_login.is_some());
        let stored = store.find_by_login("anna").await.unwrap();
        assert_eq!(stored.user.last_login, logged_in.last_login);
        assert!(matches!(
            store.record_login(user.id + 1).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn concurrent_registrations_keep_every_user() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonUserStore::new(dir.path().join("users.json")));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_user(new_user(&format!("user{i}"), &format!("u{i}@example.com")))
                        .await
                })
            })
            .collect();
        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().unwrap().id);
        }
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 8);

        for i in 0..8 {
            assert!(store.find_by_login(&format!("user{i}")).await.is_ok());
        }
    }
}
