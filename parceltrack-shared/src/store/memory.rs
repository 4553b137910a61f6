/// In-memory store implementations
///
/// Lock-guarded hash maps implementing the same contracts (including the
/// uniqueness semantics) as the Postgres stores. The test suites run the
/// service and the HTTP layer against these, and they back local demo
/// setups that have no database.

use crate::error::StoreError;
use crate::models::{tracker::Tracker, user::User};
use crate::store::{TrackerStore, UserStore};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// Hash-map backed [`UserStore`]
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, User>>,
}

/// Hash-map backed [`TrackerStore`]
#[derive(Default)]
pub struct InMemoryTrackerStore {
    trackers: RwLock<HashMap<String, Tracker>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Uuid, User>> {
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, User>> {
        self.users.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        let users = self.read();
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.read().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.read().values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.write();

        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate { field: "email" });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, StoreError> {
        let mut users = self.write();

        if !users.contains_key(&user.id) {
            return Err(StoreError::NotFound);
        }

        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::Duplicate { field: "email" });
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn add_tracker_ref(&self, user_id: Uuid, tracker: &Tracker) -> Result<User, StoreError> {
        let mut users = self.write();

        let user = users.get_mut(&user_id).ok_or(StoreError::NotFound)?;

        if user.has_tracker(&tracker.code) {
            return Err(StoreError::Duplicate {
                field: "tracking code",
            });
        }

        user.trackers.push(tracker.clone());
        Ok(user.clone())
    }
}

impl InMemoryTrackerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Tracker>> {
        self.trackers.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TrackerStore for InMemoryTrackerStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Tracker>, StoreError> {
        let trackers = self.trackers.read().unwrap_or_else(|e| e.into_inner());
        Ok(trackers.get(code).cloned())
    }

    async fn create(&self, tracker: Tracker) -> Result<Tracker, StoreError> {
        let mut trackers = self.write();

        if trackers.contains_key(&tracker.code) {
            return Err(StoreError::Duplicate {
                field: "tracking code",
            });
        }

        trackers.insert(tracker.code.clone(), tracker.clone());
        Ok(tracker)
    }

    async fn delete(&self, code: &str) -> Result<(), StoreError> {
        self.write().remove(code);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Someone".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            active: true,
            trackers: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn tracker(code: &str) -> Tracker {
        Tracker {
            code: code.to_string(),
            owner_id: None,
            package_info: Vec::new(),
            registered_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email() {
        let store = InMemoryUserStore::new();

        store.create(user("a@x.com")).await.unwrap();
        let err = store.create(user("a@x.com")).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { field: "email" }));
    }

    #[tokio::test]
    async fn test_update_rejects_email_taken_by_other_user() {
        let store = InMemoryUserStore::new();

        store.create(user("a@x.com")).await.unwrap();
        let mut second = store.create(user("b@x.com")).await.unwrap();

        second.email = "a@x.com".to_string();
        let err = store.update(second).await.unwrap_err();

        assert!(matches!(err, StoreError::Duplicate { field: "email" }));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let store = InMemoryUserStore::new();
        let err = store.update(user("ghost@x.com")).await.unwrap_err();

        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn test_add_tracker_ref_appends_in_order() {
        let store = InMemoryUserStore::new();
        let created = store.create(user("a@x.com")).await.unwrap();

        store
            .add_tracker_ref(created.id, &tracker("AA111"))
            .await
            .unwrap();
        let updated = store
            .add_tracker_ref(created.id, &tracker("BB222"))
            .await
            .unwrap();

        let codes: Vec<&str> = updated.trackers.iter().map(|t| t.code.as_str()).collect();
        assert_eq!(codes, vec!["AA111", "BB222"]);
    }

    #[tokio::test]
    async fn test_add_tracker_ref_rejects_duplicate_code() {
        let store = InMemoryUserStore::new();
        let created = store.create(user("a@x.com")).await.unwrap();

        store
            .add_tracker_ref(created.id, &tracker("AA111"))
            .await
            .unwrap();
        let err = store
            .add_tracker_ref(created.id, &tracker("AA111"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Duplicate {
                field: "tracking code"
            }
        ));
    }

    #[tokio::test]
    async fn test_tracker_store_create_and_delete() {
        let store = InMemoryTrackerStore::new();

        store.create(tracker("AA111")).await.unwrap();
        let err = store.create(tracker("AA111")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));

        store.delete("AA111").await.unwrap();
        assert!(store.find_by_code("AA111").await.unwrap().is_none());
    }
}
