/// Store contracts for the account service
///
/// The service talks to its two durable collaborators through these async
/// traits so the core stays independent of the storage engine. Two
/// implementations ship in-tree:
///
/// - [`postgres`]: the production sqlx/Postgres stores; uniqueness is
///   enforced by database indexes and surfaced as
///   [`StoreError::Duplicate`](crate::error::StoreError)
/// - [`memory`]: lock-guarded in-memory stores with the same uniqueness
///   semantics, used by the test suites and local demos

pub mod memory;
pub mod postgres;

use crate::error::StoreError;
use crate::models::{tracker::Tracker, user::User};
use async_trait::async_trait;
use uuid::Uuid;

/// Durable mapping from user id / email to user records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns all users; order is implementation-defined.
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;

    /// Looks a user up by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Looks a user up by email (exact match).
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persists a new user and returns the stored record.
    ///
    /// Fails with [`StoreError::Duplicate`] when the email is taken; this
    /// is the authoritative uniqueness check.
    async fn create(&self, user: User) -> Result<User, StoreError>;

    /// Persists the full user record and returns it.
    ///
    /// Fails with [`StoreError::NotFound`] when the id is unknown and with
    /// [`StoreError::Duplicate`] when the new email collides.
    async fn update(&self, user: User) -> Result<User, StoreError>;

    /// Appends a tracker reference to the user's ordered sequence and
    /// returns the updated user.
    ///
    /// Fails with [`StoreError::Duplicate`] when the user already holds
    /// the code and with [`StoreError::NotFound`] when the user is gone.
    async fn add_tracker_ref(&self, user_id: Uuid, tracker: &Tracker) -> Result<User, StoreError>;
}

/// Durable mapping from tracking code to tracker records
#[async_trait]
pub trait TrackerStore: Send + Sync {
    /// Looks a tracker up by its code.
    async fn find_by_code(&self, code: &str) -> Result<Option<Tracker>, StoreError>;

    /// Persists a new tracker and returns the stored record.
    ///
    /// Fails with [`StoreError::Duplicate`] when the code is taken.
    async fn create(&self, tracker: Tracker) -> Result<Tracker, StoreError>;

    /// Removes a tracker by code.
    ///
    /// Only the package-registration compensation path calls this; there
    /// is no public deletion surface.
    async fn delete(&self, code: &str) -> Result<(), StoreError>;
}
