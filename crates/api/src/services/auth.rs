//! Credential service.
//!
//! Registration, login, and profile updates for both identity types.
//! Passwords are hashed with Argon2id before storage and never surface past
//! the repository layer.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use thiserror::Error;

use footflex_core::{Email, UserId};

use crate::db::users::ProfileChanges;
use crate::db::{AdminRepository, RepositoryError, UserRepository};
use crate::models::admin::Admin;
use crate::models::user::{User, UserAddress};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] footflex_core::EmailError),

    /// Invalid credentials (wrong password or no such account).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// An account with this email already exists.
    #[error("{0} already exists")]
    AlreadyExists(&'static str),

    /// Password too weak.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

/// Partial profile update as received from the client.
///
/// Empty strings count as "not supplied" and keep the stored value, the
/// same falsy-merge the catalog update uses.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<UserAddress>,
    pub password: Option<String>,
}

/// Credential service for users and admins.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    admins: AdminRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new credential service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
            admins: AdminRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::AlreadyExists` if the email is already registered.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyExists("User"),
                other => AuthError::Repository(other),
            })
    }

    /// Login with user email and password.
    ///
    /// A missing account, malformed email, and wrong password all collapse
    /// into the same `InvalidCredentials`; the response must not reveal
    /// which.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .find_by_email(&email)
            .await
            .map_err(AuthError::Repository)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Apply a partial profile update, rehashing a supplied password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail`/`WeakPassword` on validation
    /// failures, `AuthError::AlreadyExists` if a new email collides, and
    /// `AuthError::Repository` for database errors.
    pub async fn update_user_profile(
        &self,
        id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, AuthError> {
        let email = match non_empty(update.email) {
            Some(raw) => Some(Email::parse(&raw)?),
            None => None,
        };

        let password_hash = match non_empty(update.password) {
            Some(password) => {
                validate_password(&password)?;
                Some(hash_password(&password)?)
            }
            None => None,
        };

        let changes = ProfileChanges {
            name: non_empty(update.name),
            email,
            phone: non_empty(update.phone),
            address: update.address,
            password_hash,
        };

        self.users
            .update_profile(id, &changes)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyExists("User"),
                other => AuthError::Repository(other),
            })
    }

    /// Register a new admin.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::register_user`], against the admin
    /// table.
    pub async fn register_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Admin, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.admins
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::AlreadyExists("Admin"),
                other => AuthError::Repository(other),
            })
    }

    /// Login with admin email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login_admin(&self, email: &str, password: &str) -> Result<Admin, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (admin, password_hash) = self
            .admins
            .find_by_email(&email)
            .await
            .map_err(AuthError::Repository)?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(admin)
    }
}

/// Treat empty strings as absent (falsy-merge).
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id with a random salt.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("tr0ub4dor&3").unwrap();
        assert_ne!(hash, "tr0ub4dor&3");
        assert!(verify_password("tr0ub4dor&3", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong-password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_validate_password_length() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword(_))
        ));
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_non_empty_filters_falsy() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("x".to_string())), Some("x".to_string()));
    }

    #[test]
    fn test_garbage_hash_is_invalid_credentials() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
