//! Access guards.
//!
//! Two distinct extractors, one per identity type. Each validates the
//! bearer token against its own audience and resolves the subject against
//! its own table, attaching the identity to the handler. Everything fails
//! closed with a 401; no failure mode is distinguished on the wire.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use footflex_core::{AdminId, UserId};

use crate::db::{AdminRepository, UserRepository};
use crate::error::ErrorBody;
use crate::models::{Admin, User};
use crate::services::token::Audience;
use crate::state::AppState;

/// Extractor that requires a valid user bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(user): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

/// Extractor that requires a valid admin bearer token.
pub struct RequireAdmin(pub Admin);

/// Rejection returned when a guard fails.
pub enum AuthRejection {
    /// No usable Authorization header on the request.
    MissingToken,
    /// Token invalid, expired, wrong audience, or subject unresolvable.
    TokenFailed,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "Not authorized, no token",
            Self::TokenFailed => "Not authorized, token failed",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                message: message.to_owned(),
            }),
        )
            .into_response()
    }
}

/// Pull the bearer token out of the Authorization header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let subject = state
            .tokens()
            .verify(token, Audience::User)
            .map_err(|_| AuthRejection::TokenFailed)?;

        // Fail closed on any lookup problem, including DB errors
        let user = UserRepository::new(state.pool())
            .find_by_id(UserId::new(subject))
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::TokenFailed)?;

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection::MissingToken)?;

        let subject = state
            .tokens()
            .verify(token, Audience::Admin)
            .map_err(|_| AuthRejection::TokenFailed)?;

        let admin = AdminRepository::new(state.pool())
            .find_by_id(AdminId::new(subject))
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::TokenFailed)?;

        Ok(Self(admin))
    }
}
