/// API route handlers
///
/// Handlers are organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration and login
/// - `users`: account listing, lookup, update, package registration
/// - `tracking`: anonymous tracking lookup
///
/// The wire representations of users and trackers live here because
/// several resources share them. `UserResponse` deliberately has no
/// `password_hash` field — the hash must never cross the transport
/// boundary.

pub mod auth;
pub mod health;
pub mod tracking;
pub mod users;

use chrono::{DateTime, Utc};
use parceltrack_shared::models::{
    tracker::{Tracker, TrackingEvent},
    user::User,
};
use serde::Serialize;
use uuid::Uuid;

/// Wire representation of a user account
#[derive(Debug, Serialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Active flag
    pub active: bool,

    /// Registered packages in registration order
    pub trackers: Vec<TrackerResponse>,

    /// Account creation time
    pub created_at: DateTime<Utc>,
}

/// Wire representation of a tracker
#[derive(Debug, Serialize)]
pub struct TrackerResponse {
    /// Carrier tracking code
    pub code: String,

    /// Registering user, when the lookup was owned
    pub owner_id: Option<Uuid>,

    /// Shipment events in carrier order
    pub package_info: Vec<TrackingEvent>,

    /// When the provider returned this record
    pub registered_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            name: user.name,
            email: user.email,
            active: user.active,
            trackers: user.trackers.into_iter().map(TrackerResponse::from).collect(),
            created_at: user.created_at,
        }
    }
}

impl From<Tracker> for TrackerResponse {
    fn from(tracker: Tracker) -> Self {
        TrackerResponse {
            code: tracker.code,
            owner_id: tracker.owner_id,
            package_info: tracker.package_info,
            registered_at: tracker.registered_at,
        }
    }
}
