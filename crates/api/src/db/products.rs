//! Product repository for database operations.
//!
//! Sub-document lists (images, sizes, colors, reviews) travel as JSONB, so
//! the review-append path is a read-modify-write with per-row atomicity
//! only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use footflex_core::{AdminId, Category, ProductId, UserId};

use super::RepositoryError;
use crate::models::product::{
    ColorOption, NewProduct, Product, ProductPatch, Review, SizeOption, recompute_rating,
};

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    admin_id: i32,
    name: String,
    brand: String,
    category: Category,
    description: String,
    price: Decimal,
    images: Json<Vec<String>>,
    sizes: Json<Vec<SizeOption>>,
    colors: Json<Vec<ColorOption>>,
    reviews: Json<Vec<Review>>,
    rating: f64,
    num_reviews: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: ProductId::new(self.id),
            admin: AdminId::new(self.admin_id),
            name: self.name,
            brand: self.brand,
            category: self.category,
            description: self.description,
            price: self.price,
            images: self.images.0,
            sizes: self.sizes.0,
            colors: self.colors.0,
            reviews: self.reviews.0,
            rating: self.rating,
            num_reviews: self.num_reviews,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products, optionally filtered by exact category and/or a
    /// case-insensitive name substring.
    ///
    /// The full result set is returned; there is no pagination.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        category: Option<Category>,
        keyword: Option<&str>,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r"
            SELECT * FROM products
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR name ILIKE '%' || $2 || '%')
            ORDER BY id
            ",
        )
        .bind(category.map(|c| c.as_str()))
        .bind(keyword)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(ProductRow::into_product))
    }

    /// Create a product owned by the given admin.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        admin: AdminId,
        new: NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(
            r"
            INSERT INTO products (admin_id, name, brand, category, description, price, images, sizes, colors)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            ",
        )
        .bind(admin)
        .bind(&new.name)
        .bind(&new.brand)
        .bind(new.category)
        .bind(&new.description)
        .bind(new.price)
        .bind(Json(&new.images))
        .bind(Json(&new.sizes))
        .bind(Json(&new.colors))
        .fetch_one(self.pool)
        .await?;

        Ok(row.into_product())
    }

    /// Apply a partial update and return the new state.
    ///
    /// Falsy patch values (zero price, empty strings, empty arrays) leave
    /// the stored value unchanged; see `ProductPatch`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut product = self.get(id).await?.ok_or(RepositoryError::NotFound)?;
        product.apply_patch(patch);

        let row = sqlx::query_as::<_, ProductRow>(
            r"
            UPDATE products SET
                name = $2,
                brand = $3,
                category = $4,
                description = $5,
                price = $6,
                images = $7,
                sizes = $8,
                colors = $9,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            ",
        )
        .bind(id)
        .bind(&product.name)
        .bind(&product.brand)
        .bind(product.category)
        .bind(&product.description)
        .bind(product.price)
        .bind(Json(&product.images))
        .bind(Json(&product.sizes))
        .bind(Json(&product.colors))
        .fetch_optional(self.pool)
        .await?;

        row.map(ProductRow::into_product)
            .ok_or(RepositoryError::NotFound)
    }

    /// Hard-delete a product.
    ///
    /// Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a review and recompute the derived rating fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if this user already reviewed it.
    pub async fn add_review(
        &self,
        id: ProductId,
        user: UserId,
        user_name: &str,
        rating: i32,
        comment: &str,
    ) -> Result<(), RepositoryError> {
        let mut product = self.get(id).await?.ok_or(RepositoryError::NotFound)?;

        if product.reviewed_by(user) {
            return Err(RepositoryError::Conflict(
                "Product already reviewed".to_owned(),
            ));
        }

        product.reviews.push(Review {
            user,
            name: user_name.to_owned(),
            rating,
            comment: comment.to_owned(),
            created_at: Utc::now(),
        });
        let (mean, count) = recompute_rating(&product.reviews);

        sqlx::query(
            r"
            UPDATE products SET
                reviews = $2,
                rating = $3,
                num_reviews = $4,
                updated_at = now()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(Json(&product.reviews))
        .bind(mean)
        .bind(count)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}
