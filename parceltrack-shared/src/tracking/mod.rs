/// External tracking-information provider
///
/// The account service obtains shipment status from a carrier system
/// through this trait. Two implementations ship in-tree:
///
/// - [`carrier::CarrierClient`]: reqwest-backed HTTP client against the
///   carrier's JSON tracking endpoint
/// - [`mock::MockTrackingProvider`]: programmable responses with call
///   recording, for tests
///
/// A provider returns a tracker-shaped record whose event sequence may be
/// empty ("carrier has nothing for this code"). Provider *failures* are a
/// separate channel; the service treats both the empty sequence and any
/// failure as "package not found".

pub mod carrier;
pub mod mock;

use crate::models::tracker::Tracker;
use async_trait::async_trait;
use uuid::Uuid;

/// Error type for provider lookups
///
/// These never cross the service boundary: the service logs them and
/// reports `NotFound` to its caller.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Connection-level failure
    #[error("carrier transport error: {0}")]
    Transport(String),

    /// The carrier did not answer in time
    #[error("carrier timed out: {0}")]
    Timeout(String),

    /// The carrier answered with a non-success status
    #[error("carrier returned status {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body preview
        message: String,
    },

    /// The carrier payload could not be decoded
    #[error("carrier payload decode failed: {0}")]
    Decode(String),
}

/// Carrier lookup contract
#[async_trait]
pub trait TrackingProvider: Send + Sync {
    /// Retrieves current shipment status for `code`.
    ///
    /// `owner` stamps the resulting tracker when the lookup happens on
    /// behalf of a registered user; anonymous lookups pass `None`. An
    /// unknown code yields a tracker with an empty event sequence, not an
    /// error.
    async fn lookup(&self, code: &str, owner: Option<Uuid>) -> Result<Tracker, ProviderError>;
}
