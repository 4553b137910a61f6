/// Anonymous tracking lookup endpoint
///
/// # Endpoint
///
/// ```text
/// GET /v1/tracking/:code
/// ```
///
/// Read-only passthrough to the carrier; nothing is persisted and no
/// authentication is required.

use crate::{app::AppState, error::ApiResult, routes::TrackerResponse};
use axum::{
    extract::{Path, State},
    Json,
};

/// Look a tracking code up at the carrier
///
/// # Errors
///
/// - `404 Not Found`: the carrier has no events for this code
pub async fn search_tracking(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> ApiResult<Json<TrackerResponse>> {
    let tracker = state.service.search_tracking_by_code(&code).await?;

    Ok(Json(TrackerResponse::from(tracker)))
}
