//! Integration tests for catalog CRUD, filters, guards, and reviews.
//!
//! Skipped unless `FOOTFLEX_API_URL` is set; see the crate docs.

use footflex_integration_tests::TestContext;
use serde_json::{Value, json};
use uuid::Uuid;

#[tokio::test]
async fn category_filter_is_exact_and_keyword_is_case_insensitive() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let admin = ctx.register_admin().await;
    let token = admin["token"].as_str().expect("token");

    // Unique marker so this run's products are identifiable
    let marker = Uuid::new_v4().simple().to_string();
    let women = format!("RunFast {marker}");
    let men = format!("Walker {marker}");
    ctx.create_product(token, &women, "Women", "110.00").await;
    ctx.create_product(token, &men, "Men", "90.00").await;

    let by_category = ctx
        .client
        .get(ctx.url("/api/products"))
        .query(&[("category", "Women"), ("keyword", marker.as_str())])
        .send()
        .await
        .expect("category list");
    let listed: Vec<Value> = by_category.json().await.expect("category list body");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["name"], Value::String(women.clone()));

    // Keyword matches a name substring regardless of case and category
    let upper_fragment = marker.to_uppercase();
    let by_keyword = ctx
        .client
        .get(ctx.url("/api/products"))
        .query(&[("keyword", upper_fragment.as_str())])
        .send()
        .await
        .expect("keyword list");
    let listed: Vec<Value> = by_keyword.json().await.expect("keyword list body");
    assert_eq!(listed.len(), 2);
}

#[tokio::test]
async fn admin_routes_reject_user_tokens() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let user = ctx.register_user("Catalog Intruder").await;
    let token = user["token"].as_str().expect("token");

    let response = ctx
        .client
        .post(ctx.url("/api/products"))
        .bearer_auth(token)
        .json(&json!({
            "name": "Nope",
            "brand": "Nope",
            "category": "Men",
            "description": "should not exist",
            "price": "1.00",
        }))
        .send()
        .await
        .expect("create with user token");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn unknown_category_on_create_is_a_validation_error() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let admin = ctx.register_admin().await;
    let token = admin["token"].as_str().expect("token");

    let response = ctx
        .client
        .post(ctx.url("/api/products"))
        .bearer_auth(token)
        .json(&json!({
            "name": "Bad Category",
            "brand": "TestBrand",
            "category": "Unisex",
            "description": "closed enum violation",
            "price": "10.00",
        }))
        .send()
        .await
        .expect("create with bad category");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn falsy_update_values_do_not_overwrite() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let admin = ctx.register_admin().await;
    let token = admin["token"].as_str().expect("token");
    let product = ctx
        .create_product(token, "Merge Target", "Men", "80.00")
        .await;
    let id = product["id"].as_i64().expect("id");

    let response = ctx
        .client
        .put(ctx.url(&format!("/api/products/{id}")))
        .bearer_auth(token)
        .json(&json!({ "price": 0, "name": "", "images": [], "brand": "NewBrand" }))
        .send()
        .await
        .expect("falsy update");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("update body");
    // Supplied-but-falsy fields are indistinguishable from absent ones
    assert_eq!(body["price"], "80.00");
    assert_eq!(body["name"], "Merge Target");
    assert_eq!(body["images"][0], "/uploads/test.jpg");
    // A truthy field does overwrite
    assert_eq!(body["brand"], "NewBrand");
}

#[tokio::test]
async fn delete_removes_the_product() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let admin = ctx.register_admin().await;
    let token = admin["token"].as_str().expect("token");
    let product = ctx
        .create_product(token, "Short Lived", "Kids", "20.00")
        .await;
    let id = product["id"].as_i64().expect("id");

    let deleted = ctx
        .client
        .delete(ctx.url(&format!("/api/products/{id}")))
        .bearer_auth(token)
        .send()
        .await
        .expect("delete");
    assert_eq!(deleted.status(), 200);
    let body: Value = deleted.json().await.expect("delete body");
    assert_eq!(body["message"], "Product removed");

    let gone = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("get after delete");
    assert_eq!(gone.status(), 404);
}

#[tokio::test]
async fn review_append_recomputes_mean_and_blocks_second_review() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let admin = ctx.register_admin().await;
    let admin_token = admin["token"].as_str().expect("token");
    let product = ctx
        .create_product(admin_token, "Review Target", "Women", "70.00")
        .await;
    let id = product["id"].as_i64().expect("id");
    assert_eq!(product["rating"].as_f64(), Some(0.0));
    assert_eq!(product["numReviews"].as_i64(), Some(0));

    let first = ctx.register_user("Reviewer One").await;
    let first_token = first["token"].as_str().expect("token");
    let response = ctx
        .client
        .post(ctx.url(&format!("/api/products/{id}/reviews")))
        .bearer_auth(first_token)
        .json(&json!({ "rating": 4, "comment": "solid" }))
        .send()
        .await
        .expect("first review");
    assert_eq!(response.status(), 201);

    let after_one: Value = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("get after first review")
        .json()
        .await
        .expect("body");
    assert_eq!(after_one["rating"].as_f64(), Some(4.0));
    assert_eq!(after_one["numReviews"].as_i64(), Some(1));

    let second = ctx.register_user("Reviewer Two").await;
    let second_token = second["token"].as_str().expect("token");
    let response = ctx
        .client
        .post(ctx.url(&format!("/api/products/{id}/reviews")))
        .bearer_auth(second_token)
        .json(&json!({ "rating": 2, "comment": "meh" }))
        .send()
        .await
        .expect("second review");
    assert_eq!(response.status(), 201);

    let after_two: Value = ctx
        .client
        .get(ctx.url(&format!("/api/products/{id}")))
        .send()
        .await
        .expect("get after second review")
        .json()
        .await
        .expect("body");
    assert_eq!(after_two["rating"].as_f64(), Some(3.0));
    assert_eq!(after_two["numReviews"].as_i64(), Some(2));

    // Same reviewer again: rejected, nothing recomputed
    let repeat = ctx
        .client
        .post(ctx.url(&format!("/api/products/{id}/reviews")))
        .bearer_auth(first_token)
        .json(&json!({ "rating": 5, "comment": "changed my mind" }))
        .send()
        .await
        .expect("repeat review");
    assert_eq!(repeat.status(), 400);
    let body: Value = repeat.json().await.expect("repeat body");
    assert_eq!(body["message"], "Product already reviewed");
}
