//! Admin repository for database operations.
//!
//! Admins are a parallel identity table, not a role on `users`; the two
//! populations are resolved by different guards and never mix.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use footflex_core::{AdminId, Email};

use super::{RepositoryError, conflict_on_unique};
use crate::models::admin::Admin;

const DUPLICATE_ADMIN: &str = "Admin already exists";

#[derive(Debug, sqlx::FromRow)]
struct AdminRow {
    id: i32,
    name: String,
    email: Email,
    password_hash: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AdminRow {
    fn into_admin(self) -> Admin {
        Admin {
            id: AdminId::new(self.id),
            name: self.name,
            email: self.email,
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for admin database operations.
pub struct AdminRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminRepository<'a> {
    /// Create a new admin repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new admin with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        name: &str,
        email: &Email,
        password_hash: &str,
    ) -> Result<Admin, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>(
            r"
            INSERT INTO admins (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_ADMIN))?;

        Ok(row.into_admin())
    }

    /// Get an admin and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(Admin, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>("SELECT * FROM admins WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|r| {
            let hash = r.password_hash.clone();
            (r.into_admin(), hash)
        }))
    }

    /// Get an admin by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: AdminId) -> Result<Option<Admin>, RepositoryError> {
        let row = sqlx::query_as::<_, AdminRow>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(AdminRow::into_admin))
    }
}
