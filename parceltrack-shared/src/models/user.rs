/// User account model
///
/// This module provides the User record plus the input shapes used by the
/// account service: `NewAccount` for registration and `UserPatch` for
/// partial updates.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     active BOOLEAN NOT NULL DEFAULT TRUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_email_key ON users (email);
/// ```
///
/// The user's tracker sequence is stored separately (`user_trackers` join
/// rows, ordered by insertion) and assembled by the store when a record is
/// loaded.

use crate::models::tracker::Tracker;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account
///
/// Passwords are stored as Argon2id hashes, never in plaintext. The tracker
/// sequence is ordered and append-only; the service guarantees it contains
/// no duplicate tracking codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID (UUID v4), generated at registration
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique across all users (exact-match policy)
    pub email: String,

    /// Argon2id password hash (PHC string format)
    ///
    /// Never serialize this over the wire; transport response types must
    /// omit it.
    pub password_hash: String,

    /// Whether the account is active
    pub active: bool,

    /// Packages registered by this user, in registration order
    pub trackers: Vec<Tracker>,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for the registration workflow
///
/// Carries the plaintext password; the service hashes it before anything
/// is persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Plaintext password, hashed by the service
    pub password: String,

    /// Initial active flag
    pub active: bool,
}

/// Partial update for an existing user
///
/// `None` fields leave the stored value untouched; `Some` fields are
/// applied. `active` is a plain bool and is always overwritten — it has no
/// "leave unchanged" state.
#[derive(Debug, Clone, Deserialize)]
pub struct UserPatch {
    /// New display name
    pub name: Option<String>,

    /// New email address
    pub email: Option<String>,

    /// New plaintext password, re-hashed by the service
    pub password: Option<String>,

    /// New active flag, always applied
    pub active: bool,
}

impl User {
    /// Returns true if this user already holds a tracker with `code`.
    pub fn has_tracker(&self, code: &str) -> bool {
        self.trackers.iter().any(|t| t.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tracker::Tracker;

    fn user_with_codes(codes: &[&str]) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            active: true,
            trackers: codes
                .iter()
                .map(|c| Tracker {
                    code: c.to_string(),
                    owner_id: None,
                    package_info: Vec::new(),
                    registered_at: Utc::now(),
                })
                .collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_has_tracker() {
        let user = user_with_codes(&["AA123", "BB456"]);
        assert!(user.has_tracker("AA123"));
        assert!(user.has_tracker("BB456"));
        assert!(!user.has_tracker("CC789"));
    }

    #[test]
    fn test_user_serialization_roundtrip() {
        let user = user_with_codes(&["AA123"]);
        let json = serde_json::to_string(&user).unwrap();
        let back: User = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, user.id);
        assert_eq!(back.trackers.len(), 1);
        assert_eq!(back.trackers[0].code, "AA123");
    }
}
