//! User route handlers: registration, login, and profile management.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use footflex_core::{Email, UserId};

use crate::error::Result;
use crate::middleware::{ApiJson, RequireUser};
use crate::models::user::{User, UserAddress};
use crate::services::auth::{AuthService, ProfileUpdate};
use crate::services::token::Audience;
use crate::state::AppState;

/// Build the user router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
        .route("/profile", get(get_profile).put(update_profile))
}

// =============================================================================
// Request / Response Types
// =============================================================================

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile update request body. Absent and empty fields keep stored values.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<UserAddress>,
    pub password: Option<String>,
}

/// Auth response: identity fields plus a fresh bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuthResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<UserAddress>,
    pub token: String,
}

/// Profile response (no token).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<UserAddress>,
}

impl UserAuthResponse {
    fn from_user(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            token,
        }
    }
}

impl From<User> for UserProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user and return identity plus bearer token.
///
/// # Errors
///
/// 400 on duplicate email or invalid fields.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserAuthResponse>)> {
    let auth = AuthService::new(state.pool());
    let user = auth
        .register_user(&body.name, &body.email, &body.password)
        .await?;

    let token = state.tokens().issue(user.id.as_i32(), Audience::User)?;
    tracing::info!(user_id = %user.id, "user registered");

    Ok((
        StatusCode::CREATED,
        Json(UserAuthResponse::from_user(user, token)),
    ))
}

/// Authenticate a user and return identity plus bearer token.
///
/// # Errors
///
/// 401 with a single generic message on any credential failure.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<UserAuthResponse>> {
    let auth = AuthService::new(state.pool());
    let user = auth.login_user(&body.email, &body.password).await?;

    let token = state.tokens().issue(user.id.as_i32(), Audience::User)?;

    Ok(Json(UserAuthResponse::from_user(user, token)))
}

/// Return the authenticated user's profile.
#[allow(clippy::unused_async)]
pub async fn get_profile(RequireUser(user): RequireUser) -> Json<UserProfileResponse> {
    Json(user.into())
}

/// Apply a partial profile update and return the new state with a fresh
/// token.
///
/// # Errors
///
/// 400 on invalid fields or an email collision.
pub async fn update_profile(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<UpdateProfileRequest>,
) -> Result<Json<UserAuthResponse>> {
    let auth = AuthService::new(state.pool());
    let updated = auth
        .update_user_profile(
            user.id,
            ProfileUpdate {
                name: body.name,
                email: body.email,
                phone: body.phone,
                address: body.address,
                password: body.password,
            },
        )
        .await?;

    let token = state.tokens().issue(updated.id.as_i32(), Audience::User)?;

    Ok(Json(UserAuthResponse::from_user(updated, token)))
}
