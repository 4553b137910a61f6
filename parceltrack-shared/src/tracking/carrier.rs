/// Reqwest-backed carrier tracking client
///
/// This client owns transport details only: request construction, timeout
/// and HTTP error mapping, and JSON decoding of the carrier payload into
/// domain shipment events.
///
/// The carrier endpoint is `GET {base_url}/track/{code}` answering
///
/// ```json
/// {
///   "code": "TRACK123",
///   "events": [
///     {"timestamp": "2024-05-01T12:00:00Z", "location": "Curitiba / PR", "status": "Posted"}
///   ]
/// }
/// ```
///
/// A 404 from the carrier means "unknown code" and is reported as an empty
/// event sequence, not as an error.

use crate::models::tracker::{Tracker, TrackingEvent};
use crate::tracking::{ProviderError, TrackingProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

/// HTTP client for the carrier tracking endpoint
pub struct CarrierClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct CarrierTrackingDto {
    #[serde(default)]
    events: Vec<CarrierEventDto>,
}

#[derive(Debug, Deserialize)]
struct CarrierEventDto {
    timestamp: Option<DateTime<Utc>>,
    location: Option<String>,
    status: String,
}

impl From<CarrierEventDto> for TrackingEvent {
    fn from(dto: CarrierEventDto) -> Self {
        TrackingEvent {
            occurred_at: dto.timestamp,
            location: dto.location,
            description: dto.status,
        }
    }
}

impl CarrierClient {
    /// Builds a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying reqwest client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    fn track_url(&self, code: &str) -> String {
        format!("{}/track/{}", self.base_url, code)
    }
}

#[async_trait]
impl TrackingProvider for CarrierClient {
    async fn lookup(&self, code: &str, owner: Option<Uuid>) -> Result<Tracker, ProviderError> {
        let response = self
            .client
            .get(self.track_url(code))
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();

        // Unknown code: same shape as "no events yet".
        if status == StatusCode::NOT_FOUND {
            return Ok(empty_tracker(code, owner));
        }

        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let events = parse_events(body.as_ref())?;

        Ok(Tracker {
            code: code.to_string(),
            owner_id: owner,
            package_info: events,
            registered_at: Utc::now(),
        })
    }
}

fn empty_tracker(code: &str, owner: Option<Uuid>) -> Tracker {
    Tracker {
        code: code.to_string(),
        owner_id: owner,
        package_info: Vec::new(),
        registered_at: Utc::now(),
    }
}

fn parse_events(body: &[u8]) -> Result<Vec<TrackingEvent>, ProviderError> {
    let decoded: CarrierTrackingDto = serde_json::from_slice(body)
        .map_err(|e| ProviderError::Decode(format!("invalid carrier JSON payload: {}", e)))?;

    Ok(decoded.events.into_iter().map(TrackingEvent::from).collect())
}

fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout(error.to_string())
    } else {
        ProviderError::Transport(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ProviderError {
    let preview: String = String::from_utf8_lossy(body).chars().take(160).collect();

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::Timeout(format!("status {}", status.as_u16()))
        }
        _ => ProviderError::Status {
            status: status.as_u16(),
            message: preview,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        let body = r#"{
            "code": "TRACK123",
            "events": [
                {"timestamp": "2024-05-01T12:00:00Z", "location": "Curitiba / PR", "status": "Posted"},
                {"timestamp": null, "location": null, "status": "In transit"}
            ]
        }"#;

        let events = parse_events(body.as_bytes()).expect("payload should decode");

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].description, "Posted");
        assert_eq!(events[0].location.as_deref(), Some("Curitiba / PR"));
        assert!(events[1].occurred_at.is_none());
    }

    #[test]
    fn test_parse_events_missing_events_field() {
        let events = parse_events(br#"{"code": "TRACK123"}"#).expect("payload should decode");
        assert!(events.is_empty());
    }

    #[test]
    fn test_parse_events_rejects_garbage() {
        let err = parse_events(b"<html>maintenance</html>").unwrap_err();
        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[test]
    fn test_map_status_error() {
        assert!(matches!(
            map_status_error(StatusCode::GATEWAY_TIMEOUT, b""),
            ProviderError::Timeout(_)
        ));
        assert!(matches!(
            map_status_error(StatusCode::INTERNAL_SERVER_ERROR, b"boom"),
            ProviderError::Status { status: 500, .. }
        ));
    }

    #[test]
    fn test_track_url_normalizes_trailing_slash() {
        let client =
            CarrierClient::new("https://carrier.example/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.track_url("TRACK123"),
            "https://carrier.example/api/track/TRACK123"
        );
    }
}
