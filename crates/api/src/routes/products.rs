//! Product route handlers: public catalog reads, admin CRUD, reviews, and
//! image upload.

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use footflex_core::{Category, ProductId};

use super::MessageBody;
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{AppError, Result};
use crate::middleware::{ApiJson, RequireAdmin, RequireUser};
use crate::models::product::{NewProduct, Product, ProductPatch};
use crate::state::AppState;

/// Maximum number of images accepted per upload request.
const MAX_UPLOAD_FILES: usize = 5;

/// Upload request body cap (multipart images).
const UPLOAD_BODY_LIMIT: usize = 10 * 1024 * 1024;

const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Build the product router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/upload",
            post(upload_images).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/{id}/reviews", post(add_review))
}

// =============================================================================
// Request Types
// =============================================================================

/// Catalog list filters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<Category>,
    pub keyword: Option<String>,
}

/// Review request body.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i32,
    pub comment: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// List products, optionally filtered by category and/or name keyword.
///
/// # Errors
///
/// 500 if the query fails.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool())
        .list(query.category, query.keyword.as_deref())
        .await?;

    Ok(Json(products))
}

/// Fetch a single product by id.
///
/// # Errors
///
/// 404 if no such product exists.
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()))?;

    Ok(Json(product))
}

/// Create a product owned by the calling admin.
///
/// # Errors
///
/// 400 on invalid fields (unknown category, malformed body).
pub async fn create_product(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = ProductRepository::new(state.pool())
        .create(admin.id, body)
        .await?;
    tracing::info!(product_id = %product.id, admin_id = %admin.id, "product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Apply a partial update to a product.
///
/// # Errors
///
/// 404 if no such product exists.
pub async fn update_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(body): ApiJson<ProductPatch>,
) -> Result<Json<Product>> {
    let updated = ProductRepository::new(state.pool())
        .update(ProductId::new(id), body)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()),
            other => AppError::Database(other),
        })?;

    Ok(Json(updated))
}

/// Hard-delete a product.
///
/// # Errors
///
/// 404 if no such product exists.
pub async fn delete_product(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MessageBody>> {
    let removed = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !removed {
        return Err(AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()));
    }

    Ok(Json(MessageBody::new("Product removed")))
}

/// Add a review to a product, one per user.
///
/// # Errors
///
/// 400 if the caller already reviewed this product; 404 if it doesn't exist.
pub async fn add_review(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ApiJson(body): ApiJson<ReviewRequest>,
) -> Result<(StatusCode, Json<MessageBody>)> {
    ProductRepository::new(state.pool())
        .add_review(
            ProductId::new(id),
            user.id,
            &user.name,
            body.rating,
            &body.comment,
        )
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound(PRODUCT_NOT_FOUND.to_owned()),
            other => AppError::Database(other),
        })?;

    Ok((StatusCode::CREATED, Json(MessageBody::new("Review added"))))
}

/// Store uploaded product images and return their public paths.
///
/// Accepts up to five jpg/jpeg/png files in a multipart body; anything else
/// is rejected outright.
///
/// # Errors
///
/// 400 on a non-image file or malformed multipart body.
pub async fn upload_images(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<String>>> {
    let upload_dir = state.config().upload_dir.clone();
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("creating upload dir: {e}")))?;

    let mut stored = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if stored.len() >= MAX_UPLOAD_FILES {
            return Err(AppError::BadRequest(format!(
                "At most {MAX_UPLOAD_FILES} images per upload"
            )));
        }

        let extension = field
            .file_name()
            .and_then(image_extension)
            .ok_or_else(|| AppError::BadRequest("Images only!".to_owned()))?;

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let filename = format!("images-{}.{extension}", uuid::Uuid::new_v4());
        tokio::fs::write(upload_dir.join(&filename), &bytes)
            .await
            .map_err(|e| AppError::Internal(format!("writing upload: {e}")))?;

        stored.push(format!("/uploads/{filename}"));
    }

    Ok(Json(stored))
}

/// Accepted image extension (lowercased), or `None` for anything else.
fn image_extension(file_name: &str) -> Option<String> {
    let extension = std::path::Path::new(file_name)
        .extension()?
        .to_str()?
        .to_lowercase();

    matches!(extension.as_str(), "jpg" | "jpeg" | "png").then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension_accepts_images() {
        assert_eq!(image_extension("shoe.jpg"), Some("jpg".to_string()));
        assert_eq!(image_extension("shoe.JPEG"), Some("jpeg".to_string()));
        assert_eq!(image_extension("shoe.PNG"), Some("png".to_string()));
    }

    #[test]
    fn test_image_extension_rejects_non_images() {
        assert_eq!(image_extension("shoe.gif"), None);
        assert_eq!(image_extension("shoe.png.exe"), None);
        assert_eq!(image_extension("no-extension"), None);
    }
}
