//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use footflex_core::{Email, UserId};

/// A registered storefront customer.
///
/// The password hash never leaves the repository layer; this type is what
/// handlers and guards see.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub address: Option<UserAddress>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user's saved address, stored as a JSONB document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}
