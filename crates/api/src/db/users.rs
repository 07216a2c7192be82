//! User repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::types::Json;

use footflex_core::{Email, UserId};

use super::{RepositoryError, conflict_on_unique};
use crate::models::user::{User, UserAddress};

const DUPLICATE_USER: &str = "User already exists";

/// Database row for the `users` table.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    name: String,
    email: Email,
    password_hash: String,
    phone: Option<String>,
    address: Option<Json<UserAddress>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            address: self.address.map(|Json(address)| address),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial profile update; `None` fields keep the stored value.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub address: Option<UserAddress>,
    pub password_hash: Option<String>,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with an already-hashed password.
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
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_USER))?;

        Ok(row.into_user())
    }

    /// Get a user and their password hash by email.
    ///
    /// Returns `None` if no account exists for the address; the caller folds
    /// that into the same failure as a wrong password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(|r| {
            let hash = r.password_hash.clone();
            (r.into_user(), hash)
        }))
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(UserRow::into_user))
    }

    /// Apply a partial profile update and return the new state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    /// Returns `RepositoryError::Conflict` if a new email collides with
    /// another account.
    pub async fn update_profile(
        &self,
        id: UserId,
        changes: &ProfileChanges,
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                address = COALESCE($5, address),
                password_hash = COALESCE($6, password_hash),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_ref())
        .bind(changes.phone.as_deref())
        .bind(changes.address.clone().map(Json))
        .bind(changes.password_hash.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, DUPLICATE_USER))?;

        row.map(UserRow::into_user).ok_or(RepositoryError::NotFound)
    }

    /// List every user (back-office view). Passwords never leave this layer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }
}
