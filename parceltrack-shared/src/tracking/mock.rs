/// Mock tracking provider for tests and demos
///
/// Responses are programmed per code; unknown codes come back with an
/// empty event sequence, exactly like a carrier that has never seen the
/// code. Every lookup is recorded so tests can assert that the service
/// fails fast *before* reaching the provider.
///
/// # Example
///
/// ```
/// use parceltrack_shared::tracking::{mock::MockTrackingProvider, TrackingProvider};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = MockTrackingProvider::new();
/// provider.insert_package("TRACK123", vec![MockTrackingProvider::event("Posted")]);
///
/// let tracker = provider.lookup("TRACK123", None).await?;
/// assert_eq!(tracker.package_info.len(), 1);
/// assert_eq!(provider.call_count(), 1);
/// # Ok(())
/// # }
/// ```

use crate::models::tracker::{Tracker, TrackingEvent};
use crate::tracking::{ProviderError, TrackingProvider};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// Programmable [`TrackingProvider`] test double
#[derive(Default)]
pub struct MockTrackingProvider {
    responses: Mutex<HashMap<String, Vec<TrackingEvent>>>,
    calls: Mutex<Vec<(String, Option<Uuid>)>>,
    fail_transport: AtomicBool,
}

impl MockTrackingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programs the events returned for `code`.
    pub fn insert_package(&self, code: &str, events: Vec<TrackingEvent>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(code.to_string(), events);
    }

    /// Makes every subsequent lookup fail with a transport error.
    pub fn fail_with_transport_error(&self) {
        self.fail_transport.store(true, Ordering::SeqCst);
    }

    /// Number of lookups performed so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// All lookups performed so far, in order.
    pub fn calls(&self) -> Vec<(String, Option<Uuid>)> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Convenience constructor for a minimal shipment event.
    pub fn event(description: &str) -> TrackingEvent {
        TrackingEvent {
            occurred_at: Some(Utc::now()),
            location: Some("Distribution center".to_string()),
            description: description.to_string(),
        }
    }
}

#[async_trait]
impl TrackingProvider for MockTrackingProvider {
    async fn lookup(&self, code: &str, owner: Option<Uuid>) -> Result<Tracker, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((code.to_string(), owner));

        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(ProviderError::Transport(
                "simulated connection failure".to_string(),
            ));
        }

        let events = self
            .responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(code)
            .cloned()
            .unwrap_or_default();

        Ok(Tracker {
            code: code.to_string(),
            owner_id: owner,
            package_info: events,
            registered_at: Utc::now(),
        })
    }
}
