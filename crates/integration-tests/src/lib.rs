//! Integration tests for FootFlex.
//!
//! These tests exercise a running API over HTTP. They require:
//! - A running `PostgreSQL` database with migrations applied
//!   (`ff-cli migrate`)
//! - The API server running (`cargo run -p footflex-api`)
//! - `FOOTFLEX_API_URL` pointing at it (e.g. `http://localhost:5000`)
//!
//! When `FOOTFLEX_API_URL` is unset every test returns early, so a plain
//! `cargo test` works without infrastructure.

use reqwest::Client;
use serde_json::{Value, json};

/// Handle to the API under test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
}

impl TestContext {
    /// Build a context from `FOOTFLEX_API_URL`, or `None` to skip the test.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("FOOTFLEX_API_URL").ok()?;
        Some(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// A unique email address, so repeated runs never collide.
    #[must_use]
    pub fn unique_email(prefix: &str) -> String {
        format!("{prefix}-{}@test.footflex.example", uuid::Uuid::new_v4())
    }

    /// Register a fresh user; returns the auth response (incl. `token`).
    ///
    /// # Panics
    ///
    /// Panics if the API rejects the registration.
    pub async fn register_user(&self, name: &str) -> Value {
        let email = Self::unique_email("user");
        let response = self
            .client
            .post(self.url("/api/users"))
            .json(&json!({ "name": name, "email": email, "password": "hunter22" }))
            .send()
            .await
            .expect("register user request");
        assert_eq!(response.status(), 201, "user registration should succeed");
        response.json().await.expect("register user response body")
    }

    /// Register a fresh admin; returns the auth response (incl. `token`).
    ///
    /// # Panics
    ///
    /// Panics if the API rejects the registration.
    pub async fn register_admin(&self) -> Value {
        let email = Self::unique_email("admin");
        let response = self
            .client
            .post(self.url("/api/admins"))
            .json(&json!({ "name": "Test Admin", "email": email, "password": "hunter22" }))
            .send()
            .await
            .expect("register admin request");
        assert_eq!(response.status(), 201, "admin registration should succeed");
        response.json().await.expect("register admin response body")
    }

    /// Create a product as the given admin; returns the created product.
    ///
    /// # Panics
    ///
    /// Panics if the API rejects the creation.
    pub async fn create_product(
        &self,
        admin_token: &str,
        name: &str,
        category: &str,
        price: &str,
    ) -> Value {
        let response = self
            .client
            .post(self.url("/api/products"))
            .bearer_auth(admin_token)
            .json(&json!({
                "name": name,
                "brand": "TestBrand",
                "category": category,
                "description": "integration test product",
                "price": price,
                "images": ["/uploads/test.jpg"],
                "sizes": [{ "size": "42", "countInStock": 3 }],
                "colors": [{ "name": "Black", "hex": "#000000" }],
            }))
            .send()
            .await
            .expect("create product request");
        assert_eq!(response.status(), 201, "product creation should succeed");
        response.json().await.expect("create product response body")
    }
}
