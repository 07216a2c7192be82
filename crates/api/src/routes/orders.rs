//! Order route handlers: checkout, payment, status, and listings.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::Deserialize;

use footflex_core::OrderId;

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{ApiJson, RequireAdmin, RequireUser};
use crate::models::order::{NewOrder, Order, PaymentResult};
use crate::state::AppState;

const ORDER_NOT_FOUND: &str = "Order not found";

/// Build the order router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_order).get(list_orders))
        .route("/user/myorders", get(my_orders))
        .route("/{id}", get(get_order))
        .route("/{id}/pay", put(pay_order))
        .route("/{id}/status", put(set_status))
}

// =============================================================================
// Request Types
// =============================================================================

/// Payment confirmation callback body, in the gateway's own field names.
#[derive(Debug, Deserialize)]
pub struct PayRequest {
    pub id: String,
    pub status: String,
    pub update_time: String,
    pub payer: Payer,
}

/// Payer block of the confirmation callback.
#[derive(Debug, Deserialize)]
pub struct Payer {
    pub email_address: String,
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Place an order from the client-held cart snapshot.
///
/// # Errors
///
/// 400 if the line-item list is empty.
pub async fn create_order(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewOrder>,
) -> Result<(StatusCode, Json<Order>)> {
    if body.order_items.is_empty() {
        return Err(AppError::BadRequest("No order items".to_owned()));
    }

    let order = OrderRepository::new(state.pool())
        .create(user.id, body)
        .await?;
    tracing::info!(order_id = %order.id, user_id = %user.id, "order placed");

    Ok((StatusCode::CREATED, Json(order)))
}

/// Fetch an order by id with its owner joined in.
///
/// Any authenticated user may fetch any order; there is no ownership check
/// on this route.
///
/// # Errors
///
/// 404 if no such order exists.
pub async fn get_order(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .get(OrderId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(ORDER_NOT_FOUND.to_owned()))?;

    Ok(Json(order))
}

/// Mark an order paid, storing the payment confirmation snapshot.
///
/// # Errors
///
/// 404 if no such order exists.
pub async fn pay_order(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(body): ApiJson<PayRequest>,
) -> Result<Json<Order>> {
    let payment = PaymentResult {
        id: body.id,
        status: body.status,
        update_time: body.update_time,
        email_address: body.payer.email_address,
    };

    let order = OrderRepository::new(state.pool())
        .mark_paid(OrderId::new(id), &payment)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(ORDER_NOT_FOUND.to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(order))
}

/// Overwrite an order's status (free-form; `Delivered` flips the delivery
/// flags).
///
/// # Errors
///
/// 404 if no such order exists.
pub async fn set_status(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<Json<Order>> {
    let status = body.status.unwrap_or_default();

    let order = OrderRepository::new(state.pool())
        .set_status(OrderId::new(id), &status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(ORDER_NOT_FOUND.to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(order))
}

/// List the calling user's orders.
///
/// # Errors
///
/// 500 if the query fails.
pub async fn my_orders(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(Json(orders))
}

/// List every order with owners joined in (back office).
///
/// # Errors
///
/// 500 if the query fails.
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderRepository::new(state.pool()).list_all().await?;

    Ok(Json(orders))
}
