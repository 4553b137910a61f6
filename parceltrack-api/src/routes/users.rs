/// Account management endpoints
///
/// All routes in this module sit behind the bearer-token middleware.
///
/// # Endpoints
///
/// - `GET   /v1/users` - List all users
/// - `GET   /v1/users/:id` - Fetch one user
/// - `PATCH /v1/users/:id` - Partial update
/// - `POST  /v1/users/:id/packages` - Register a tracking code

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::UserResponse,
};
use axum::{
    extract::{Path, State},
    Json,
};
use parceltrack_shared::{auth::password, models::user::UserPatch};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Partial-update request
///
/// Omitted fields keep their stored values. `active` is required on every
/// update and is always applied, including `false` — it deliberately has
/// no "leave unchanged" form.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New password
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: Option<String>,

    /// New active flag, always applied
    pub active: bool,
}

/// Package registration request
#[derive(Debug, Deserialize, Validate)]
pub struct AddPackageRequest {
    /// Carrier tracking code
    #[validate(length(min = 1, max = 64, message = "Tracking code must be 1-64 characters"))]
    pub code: String,
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.service.find_all().await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Fetch a user by id
///
/// # Errors
///
/// - `404 Not Found`: unknown user id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.service.find_by_id(id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Apply a partial update to a user
///
/// # Errors
///
/// - `404 Not Found`: unknown user id
/// - `409 Conflict`: new email already in use
/// - `422 Unprocessable Entity`: validation failed
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    if let Some(ref plaintext) = req.password {
        password::validate_password_strength(plaintext).map_err(|e| {
            ApiError::ValidationError(vec![ValidationErrorDetail {
                field: "password".to_string(),
                message: e,
            }])
        })?;
    }

    let user = state
        .service
        .update_user(
            id,
            UserPatch {
                name: req.name,
                email: req.email,
                password: req.password,
                active: req.active,
            },
        )
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Register a tracking code for a user
///
/// # Endpoint
///
/// ```text
/// POST /v1/users/:id/packages
/// Content-Type: application/json
///
/// {"code": "TRACK123"}
/// ```
///
/// # Errors
///
/// - `404 Not Found`: unknown user, or the carrier has nothing for the code
/// - `409 Conflict`: tracking code already registered
/// - `422 Unprocessable Entity`: validation failed
pub async fn add_package(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddPackageRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    let user = state.service.add_package(id, &req.code).await?;

    Ok(Json(UserResponse::from(user)))
}
