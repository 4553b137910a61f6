/// Tracker model
///
/// A tracker represents a carrier tracking code together with the shipment
/// events retrieved for it. Trackers are created once by the
/// package-registration workflow and never mutated afterwards.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE trackers (
///     code VARCHAR(64) PRIMARY KEY,
///     owner_id UUID REFERENCES users(id),
///     package_info JSONB NOT NULL DEFAULT '[]'::jsonb,
///     registered_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered (or looked-up) shipment tracking entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tracker {
    /// Carrier tracking code; unique identity in the tracker store
    pub code: String,

    /// User who registered the code; None for anonymous lookups
    pub owner_id: Option<Uuid>,

    /// Shipment events in carrier order; empty means "not found"
    pub package_info: Vec<TrackingEvent>,

    /// When the provider returned this record
    pub registered_at: DateTime<Utc>,
}

/// A single shipment event reported by the carrier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingEvent {
    /// When the event occurred, if the carrier reported it
    pub occurred_at: Option<DateTime<Utc>>,

    /// Where the event occurred, if the carrier reported it
    pub location: Option<String>,

    /// Carrier status line, e.g. "Out for delivery"
    pub description: String,
}

impl Tracker {
    /// True when the provider had no events for this code.
    pub fn is_empty(&self) -> bool {
        self.package_info.is_empty()
    }
}
