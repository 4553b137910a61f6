/// Account service — the business core
///
/// Orchestrates the user store, the tracker store and the tracking
/// provider while enforcing the business invariants: one user per email,
/// one tracker per code, verified credentials before token issuance. All
/// expected failures surface as typed [`ServiceError`] values; the service
/// never retries and never swallows an error.
///
/// The service is stateless between calls. Every collaborator call is an
/// await point, and within one workflow the steps run strictly in the
/// order written here — later checks depend on earlier results.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use parceltrack_shared::service::AccountService;
/// use parceltrack_shared::store::memory::{InMemoryTrackerStore, InMemoryUserStore};
/// use parceltrack_shared::tracking::mock::MockTrackingProvider;
///
/// let service = AccountService::new(
///     Arc::new(InMemoryUserStore::new()),
///     Arc::new(InMemoryTrackerStore::new()),
///     Arc::new(MockTrackingProvider::new()),
///     "secret-key-at-least-32-bytes-long!!",
/// );
/// ```

use crate::auth::{jwt, password};
use crate::error::{ServiceError, ServiceResult};
use crate::models::{
    tracker::Tracker,
    user::{NewAccount, User, UserPatch},
};
use crate::store::{TrackerStore, UserStore};
use crate::tracking::TrackingProvider;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Result of a successful authentication
///
/// The token is session-scoped and never persisted; a fresh one is signed
/// on every login.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The authenticated user record
    pub user: User,

    /// Signed access token embedding the user id, valid for 15 minutes
    pub access_token: String,
}

/// The account/tracking service core
pub struct AccountService {
    users: Arc<dyn UserStore>,
    trackers: Arc<dyn TrackerStore>,
    provider: Arc<dyn TrackingProvider>,
    token_secret: String,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserStore>,
        trackers: Arc<dyn TrackerStore>,
        provider: Arc<dyn TrackingProvider>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            users,
            trackers,
            provider,
            token_secret: token_secret.into(),
        }
    }

    /// Verifies credentials and issues an access token.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::NotFound`] when no user has `email`
    /// - [`ServiceError::InvalidCredentials`] when the password does not
    ///   match; no token is issued in that case
    pub async fn authenticate(
        &self,
        email: &str,
        plaintext_password: &str,
    ) -> ServiceResult<AuthenticatedUser> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        let verified = password::verify_password(plaintext_password, &user.password_hash)?;
        if !verified {
            return Err(ServiceError::InvalidCredentials);
        }

        let access_token = jwt::issue_token(user.id, &self.token_secret)?;

        Ok(AuthenticatedUser { user, access_token })
    }

    /// Registers a new user.
    ///
    /// Generates the id, hashes the password and persists the record. The
    /// store's unique email index is the authoritative uniqueness check —
    /// there is no pre-insert lookup, so concurrent registrations cannot
    /// both pass a stale check; the loser gets [`ServiceError::Conflict`].
    pub async fn register(&self, account: NewAccount) -> ServiceResult<User> {
        let password_hash = password::hash_password(&account.password)?;

        let user = User {
            id: Uuid::new_v4(),
            name: account.name,
            email: account.email,
            password_hash,
            active: account.active,
            trackers: Vec::new(),
            created_at: Utc::now(),
        };

        let created = self.users.create(user).await?;

        tracing::info!(user_id = %created.id, "user registered");
        Ok(created)
    }

    /// Applies a partial update to a user.
    ///
    /// `None` fields keep their stored value; a supplied password is
    /// re-hashed before persisting. `active` is always overwritten with
    /// the supplied value, including `false` — it has no "leave unchanged"
    /// state. Email uniqueness is not re-checked here; a colliding email
    /// is rejected by the store index as [`ServiceError::Conflict`].
    pub async fn update_user(&self, id: Uuid, patch: UserPatch) -> ServiceResult<User> {
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(plaintext) = patch.password {
            user.password_hash = password::hash_password(&plaintext)?;
        }
        user.active = patch.active;

        Ok(self.users.update(user).await?)
    }

    /// Returns all users; order follows the store.
    pub async fn find_all(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.find_all().await?)
    }

    /// Looks a user up by id, failing with `NotFound` when absent.
    pub async fn find_by_id(&self, id: Uuid) -> ServiceResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    /// Looks a user up by email; absence is not an error here.
    pub async fn find_by_email(&self, email: &str) -> ServiceResult<Option<User>> {
        Ok(self.users.find_by_email(email).await?)
    }

    /// Anonymous tracking lookup.
    ///
    /// Read-only passthrough to the provider; nothing is persisted. Fails
    /// with `NotFound` when the carrier has no events for the code or the
    /// provider call fails.
    pub async fn search_tracking_by_code(&self, code: &str) -> ServiceResult<Tracker> {
        self.lookup_package(code, None).await
    }

    /// Registers a tracking code for a user.
    ///
    /// Workflow order is fixed: user existence, code uniqueness, carrier
    /// lookup, tracker insert, user append. The pre-insert uniqueness
    /// check fails fast before any carrier I/O; the tracker store's
    /// unique index backstops the remaining race window between check and
    /// insert.
    ///
    /// The two writes span two stores without a shared transaction. If the
    /// user append fails after the tracker insert succeeded, the tracker
    /// is deleted again (compensating action) and the original error
    /// propagates.
    pub async fn add_package(&self, user_id: Uuid, code: &str) -> ServiceResult<User> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ServiceError::NotFound("user"))?;

        if self.trackers.find_by_code(code).await?.is_some() {
            return Err(ServiceError::Conflict("tracking code"));
        }

        let tracker = self.lookup_package(code, Some(user.id)).await?;

        let tracker = self.trackers.create(tracker).await?;

        match self.users.add_tracker_ref(user_id, &tracker).await {
            Ok(updated) => {
                tracing::info!(user_id = %user_id, code = %tracker.code, "package registered");
                Ok(updated)
            }
            Err(err) => {
                // Compensate the first write so no orphaned tracker blocks
                // a retry of this code.
                if let Err(comp_err) = self.trackers.delete(&tracker.code).await {
                    tracing::warn!(
                        code = %tracker.code,
                        error = %comp_err,
                        "failed to delete tracker while compensating a failed user append"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Provider lookup with the "absent package" policy applied: provider
    /// failures are logged and reported as `NotFound`, and an empty event
    /// sequence is `NotFound` too.
    async fn lookup_package(&self, code: &str, owner: Option<Uuid>) -> ServiceResult<Tracker> {
        let tracker = match self.provider.lookup(code, owner).await {
            Ok(tracker) => tracker,
            Err(err) => {
                tracing::warn!(code = %code, error = %err, "carrier lookup failed");
                return Err(ServiceError::NotFound("package"));
            }
        };

        if tracker.is_empty() {
            return Err(ServiceError::NotFound("package"));
        }

        Ok(tracker)
    }
}

// The behavioral test suite for this module lives in
// tests/service_tests.rs, running against the in-memory stores and the
// mock provider.
