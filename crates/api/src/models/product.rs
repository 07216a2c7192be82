//! Product domain types and catalog merge/recompute logic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use footflex_core::{AdminId, Category, ProductId, UserId};

/// A size offered for a product, with its stock count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeOption {
    pub size: String,
    pub count_in_stock: i32,
}

/// A color offered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorOption {
    pub name: String,
    pub hex: String,
}

/// A customer review embedded in a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub user: UserId,
    pub name: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// A catalog product with its embedded sub-documents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub admin: AdminId,
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub description: String,
    pub price: Decimal,
    pub images: Vec<String>,
    pub sizes: Vec<SizeOption>,
    pub colors: Vec<ColorOption>,
    pub reviews: Vec<Review>,
    pub rating: f64,
    pub num_reviews: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub category: Category,
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
}

/// A partial product update.
///
/// A field only overwrites when it is present AND truthy: an explicit zero
/// price, empty string, or empty array is indistinguishable from "not
/// supplied" and leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub images: Option<Vec<String>>,
    pub sizes: Option<Vec<SizeOption>>,
    pub colors: Option<Vec<ColorOption>>,
}

impl Product {
    /// Merge a patch into this product.
    pub fn apply_patch(&mut self, patch: ProductPatch) {
        merge_string(&mut self.name, patch.name);
        merge_string(&mut self.brand, patch.brand);
        if let Some(category) = patch.category {
            self.category = category;
        }
        merge_string(&mut self.description, patch.description);
        if let Some(price) = patch.price
            && !price.is_zero()
        {
            self.price = price;
        }
        merge_vec(&mut self.images, patch.images);
        merge_vec(&mut self.sizes, patch.sizes);
        merge_vec(&mut self.colors, patch.colors);
    }

    /// True if the given user already has a review on this product.
    #[must_use]
    pub fn reviewed_by(&self, user: UserId) -> bool {
        self.reviews.iter().any(|r| r.user == user)
    }
}

fn merge_string(target: &mut String, value: Option<String>) {
    if let Some(value) = value
        && !value.is_empty()
    {
        *target = value;
    }
}

fn merge_vec<T>(target: &mut Vec<T>, value: Option<Vec<T>>) {
    if let Some(value) = value
        && !value.is_empty()
    {
        *target = value;
    }
}

/// Recompute the derived rating fields from the review list.
///
/// Returns `(rating, num_reviews)` where rating is the arithmetic mean of
/// review ratings, or 0 for an empty list.
#[must_use]
pub fn recompute_rating(reviews: &[Review]) -> (f64, i32) {
    if reviews.is_empty() {
        return (0.0, 0);
    }
    let sum: i32 = reviews.iter().map(|r| r.rating).sum();
    #[allow(clippy::cast_precision_loss)] // review counts are tiny
    let mean = f64::from(sum) / reviews.len() as f64;
    let count = i32::try_from(reviews.len()).unwrap_or(i32::MAX);
    (mean, count)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_product() -> Product {
        Product {
            id: ProductId::new(1),
            admin: AdminId::new(1),
            name: "Runner Pro".to_string(),
            brand: "FootFlex".to_string(),
            category: Category::Men,
            description: "Lightweight trainer".to_string(),
            price: Decimal::new(9999, 2),
            images: vec!["/uploads/runner.jpg".to_string()],
            sizes: vec![SizeOption {
                size: "42".to_string(),
                count_in_stock: 5,
            }],
            colors: vec![ColorOption {
                name: "Black".to_string(),
                hex: "#000000".to_string(),
            }],
            reviews: vec![],
            rating: 0.0,
            num_reviews: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review(user: i32, rating: i32) -> Review {
        Review {
            user: UserId::new(user),
            name: format!("user-{user}"),
            rating,
            comment: "ok".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_overwrites_supplied_fields() {
        let mut product = sample_product();
        product.apply_patch(ProductPatch {
            name: Some("Runner Pro 2".to_string()),
            price: Some(Decimal::new(12999, 2)),
            category: Some(Category::Women),
            ..ProductPatch::default()
        });

        assert_eq!(product.name, "Runner Pro 2");
        assert_eq!(product.price, Decimal::new(12999, 2));
        assert_eq!(product.category, Category::Women);
        // Untouched fields survive
        assert_eq!(product.brand, "FootFlex");
        assert_eq!(product.sizes.len(), 1);
    }

    #[test]
    fn test_patch_treats_falsy_values_as_absent() {
        let mut product = sample_product();
        product.apply_patch(ProductPatch {
            name: Some(String::new()),
            price: Some(Decimal::ZERO),
            images: Some(vec![]),
            sizes: Some(vec![]),
            ..ProductPatch::default()
        });

        // Zero price, empty string, and empty arrays do not overwrite
        assert_eq!(product.name, "Runner Pro");
        assert_eq!(product.price, Decimal::new(9999, 2));
        assert_eq!(product.images, vec!["/uploads/runner.jpg".to_string()]);
        assert_eq!(product.sizes.len(), 1);
    }

    #[test]
    fn test_recompute_rating_empty() {
        assert_eq!(recompute_rating(&[]), (0.0, 0));
    }

    #[test]
    fn test_recompute_rating_mean() {
        let reviews = vec![review(1, 4)];
        let (rating, count) = recompute_rating(&reviews);
        assert!((rating - 4.0).abs() < f64::EPSILON);
        assert_eq!(count, 1);

        let reviews = vec![review(1, 4), review(2, 5)];
        let (rating, count) = recompute_rating(&reviews);
        assert!((rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_reviewed_by() {
        let mut product = sample_product();
        product.reviews.push(review(7, 5));
        assert!(product.reviewed_by(UserId::new(7)));
        assert!(!product.reviewed_by(UserId::new(8)));
    }
}
