//! Admin domain types.

use chrono::{DateTime, Utc};

use footflex_core::{AdminId, Email};

/// A back-office operator.
///
/// Admins live in their own table with their own guard; `is_admin` is a
/// fixed marker carried through to the wire, not a role switch.
#[derive(Debug, Clone)]
pub struct Admin {
    pub id: AdminId,
    pub name: String,
    pub email: Email,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
