/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/register` - Create a new account
/// - `POST /v1/auth/login` - Authenticate and receive an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
    routes::UserResponse,
};
use axum::{extract::State, Json};
use parceltrack_shared::{auth::password, models::user::NewAccount};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (also validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Initial active flag
    pub active: bool,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// The authenticated user
    pub user: UserResponse,

    /// Access token (15 minutes)
    pub access_token: String,
}

/// Register a new account
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/register
/// Content-Type: application/json
///
/// {
///   "name": "Ada Lovelace",
///   "email": "ada@example.com",
///   "password": "SecureP@ss123",
///   "active": true
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: email already in use
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    req.validate()?;

    // Strength rules beyond plain length live in the auth module.
    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    let user = state
        .service
        .register(NewAccount {
            name: req.name,
            email: req.email,
            password: req.password,
            active: req.active,
        })
        .await?;

    Ok(Json(UserResponse::from(user)))
}

/// Login
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "ada@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: wrong password
/// - `404 Not Found`: unknown email
/// - `422 Unprocessable Entity`: validation failed
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    req.validate()?;

    let session = state.service.authenticate(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        user: UserResponse::from(session.user),
        access_token: session.access_token,
    }))
}
