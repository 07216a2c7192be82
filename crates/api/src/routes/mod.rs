//! HTTP route handlers for the gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness check
//! GET  /health/ready                - Readiness check (database ping)
//!
//! # Users
//! POST /api/users                   - Register
//! POST /api/users/login             - Login
//! GET  /api/users/profile           - Own profile (user)
//! PUT  /api/users/profile           - Update own profile (user)
//!
//! # Admins
//! POST /api/admins                  - Register
//! POST /api/admins/login            - Login
//! GET  /api/admins/profile          - Own profile (admin)
//! GET  /api/admins/users            - List users (admin)
//! GET  /api/admins/users/{id}       - User by id (admin)
//!
//! # Products
//! GET  /api/products                - List (?category=&keyword=)
//! GET  /api/products/{id}           - Product by id
//! POST /api/products                - Create (admin)
//! PUT  /api/products/{id}           - Update (admin)
//! DELETE /api/products/{id}         - Delete (admin)
//! POST /api/products/upload         - Multipart image upload (admin)
//! POST /api/products/{id}/reviews   - Add review (user)
//!
//! # Orders
//! POST /api/orders                  - Place order (user)
//! GET  /api/orders                  - List all (admin)
//! GET  /api/orders/user/myorders    - Own orders (user)
//! GET  /api/orders/{id}             - Order by id (user)
//! PUT  /api/orders/{id}/pay         - Mark paid (user)
//! PUT  /api/orders/{id}/status      - Set status (admin)
//! ```

pub mod admins;
pub mod orders;
pub mod products;
pub mod users;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

/// JSON success body for operations that only confirm: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/users", users::router())
        .nest("/api/admins", admins::router())
        .nest("/api/products", products::router())
        .nest("/api/orders", orders::router())
}
