//! Seed the database with an admin account and catalog products.
//!
//! Reads a YAML file describing one admin and a list of products, creates
//! the admin if it doesn't exist yet, and inserts every product owned by it.

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use footflex_api::db::{AdminRepository, ProductRepository};
use footflex_api::models::product::NewProduct;
use footflex_api::services::auth::{AuthError, AuthService};
use footflex_core::Email;

/// Seed file layout.
#[derive(Debug, Deserialize)]
struct SeedConfig {
    admin: SeedAdmin,
    products: Vec<NewProduct>,
}

#[derive(Debug, Deserialize)]
struct SeedAdmin {
    name: String,
    email: String,
    password: String,
}

/// Seed the database from a YAML catalog file.
///
/// # Errors
///
/// Returns an error if environment variables are missing, the file cannot
/// be read or parsed, or database operations fail.
pub async fn run(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("FOOTFLEX_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| "FOOTFLEX_DATABASE_URL not set")?;

    info!(path = %file_path, "Loading seed catalog from file");

    // Read and parse YAML before connecting to the database
    let content = tokio::fs::read_to_string(file_path).await?;
    let config: SeedConfig = serde_yaml::from_str(&content)?;

    info!(products = config.products.len(), "Parsed catalog");

    let pool = PgPool::connect(&database_url).await?;

    let auth = AuthService::new(&pool);
    let admin = match auth
        .register_admin(
            &config.admin.name,
            &config.admin.email,
            &config.admin.password,
        )
        .await
    {
        Ok(admin) => {
            info!(admin_id = %admin.id, "Created seed admin");
            admin
        }
        Err(AuthError::AlreadyExists(_)) => {
            let email = Email::parse(&config.admin.email)?;
            AdminRepository::new(&pool)
                .find_by_email(&email)
                .await?
                .map(|(admin, _hash)| admin)
                .ok_or("seed admin exists but could not be loaded")?
        }
        Err(e) => return Err(e.into()),
    };

    let products = ProductRepository::new(&pool);
    for product in config.products {
        let name = product.name.clone();
        let created = products.create(admin.id, product).await?;
        info!(product_id = %created.id, name = %name, "Seeded product");
    }

    info!("Seed complete!");
    Ok(())
}
