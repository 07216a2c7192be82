//! Admin route handlers: back-office auth and user directory.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use footflex_core::{AdminId, Email, UserId};

use crate::db::UserRepository;
use crate::error::{AppError, Result};
use crate::middleware::{ApiJson, RequireAdmin};
use crate::models::admin::Admin;
use crate::models::user::{User, UserAddress};
use crate::services::auth::AuthService;
use crate::services::token::Audience;
use crate::state::AppState;

/// Build the admin router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/login", post(login))
        .route("/profile", get(get_profile))
        .route("/users", get(list_users))
        .route("/users/{id}", get(get_user))
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

/// Auth response: identity fields plus a fresh bearer token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAuthResponse {
    pub id: AdminId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
    pub token: String,
}

/// Profile response (no token).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileResponse {
    pub id: AdminId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
}

/// A user record as exposed to the back office: everything but the password.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<UserAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AdminAuthResponse {
    fn from_admin(admin: Admin, token: String) -> Self {
        Self {
            id: admin.id,
            name: admin.name,
            email: admin.email,
            is_admin: admin.is_admin,
            token,
        }
    }
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            address: user.address,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new admin and return identity plus bearer token.
///
/// # Errors
///
/// 400 on duplicate email or invalid fields.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AdminAuthResponse>)> {
    let auth = AuthService::new(state.pool());
    let admin = auth
        .register_admin(&body.name, &body.email, &body.password)
        .await?;

    let token = state.tokens().issue(admin.id.as_i32(), Audience::Admin)?;
    tracing::info!(admin_id = %admin.id, "admin registered");

    Ok((
        StatusCode::CREATED,
        Json(AdminAuthResponse::from_admin(admin, token)),
    ))
}

/// Authenticate an admin and return identity plus bearer token.
///
/// # Errors
///
/// 401 with a single generic message on any credential failure.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<LoginRequest>,
) -> Result<Json<AdminAuthResponse>> {
    let auth = AuthService::new(state.pool());
    let admin = auth.login_admin(&body.email, &body.password).await?;

    let token = state.tokens().issue(admin.id.as_i32(), Audience::Admin)?;

    Ok(Json(AdminAuthResponse::from_admin(admin, token)))
}

/// Return the authenticated admin's profile.
#[allow(clippy::unused_async)]
pub async fn get_profile(RequireAdmin(admin): RequireAdmin) -> Json<AdminProfileResponse> {
    Json(AdminProfileResponse {
        id: admin.id,
        name: admin.name,
        email: admin.email,
        is_admin: admin.is_admin,
    })
}

/// List every user, passwords excluded.
///
/// # Errors
///
/// 500 if the query fails.
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserView>>> {
    let users = UserRepository::new(state.pool()).list().await?;
    Ok(Json(users.into_iter().map(UserView::from).collect()))
}

/// Fetch a single user by id.
///
/// # Errors
///
/// 404 if no such user exists.
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<UserView>> {
    let user = UserRepository::new(state.pool())
        .find_by_id(UserId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_owned()))?;

    Ok(Json(user.into()))
}
