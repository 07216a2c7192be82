//! Integration tests for user registration, login, and the user guard.
//!
//! Skipped unless `FOOTFLEX_API_URL` is set; see the crate docs.

use footflex_integration_tests::TestContext;
use serde_json::{Value, json};

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let email = TestContext::unique_email("dup");
    let body = json!({ "name": "First", "email": email, "password": "hunter22" });

    let first = ctx
        .client
        .post(ctx.url("/api/users"))
        .json(&body)
        .send()
        .await
        .expect("first registration");
    assert_eq!(first.status(), 201);

    let first_body: Value = first.json().await.expect("first body");
    assert!(
        first_body["token"].as_str().is_some_and(|t| !t.is_empty()),
        "first registration returns a usable token"
    );

    let second = ctx
        .client
        .post(ctx.url("/api/users"))
        .json(&body)
        .send()
        .await
        .expect("second registration");
    assert_eq!(second.status(), 400);

    let second_body: Value = second.json().await.expect("second body");
    assert_eq!(second_body["message"], "User already exists");
}

#[tokio::test]
async fn login_does_not_reveal_which_credential_failed() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let user = ctx.register_user("Login Tester").await;
    let email = user["email"].as_str().expect("email");

    let wrong_password = ctx
        .client
        .post(ctx.url("/api/users/login"))
        .json(&json!({ "email": email, "password": "wrong-password" }))
        .send()
        .await
        .expect("wrong password login");
    let no_such_user = ctx
        .client
        .post(ctx.url("/api/users/login"))
        .json(&json!({ "email": TestContext::unique_email("ghost"), "password": "hunter22" }))
        .send()
        .await
        .expect("unknown email login");

    assert_eq!(wrong_password.status(), 401);
    assert_eq!(no_such_user.status(), 401);

    let a: Value = wrong_password.json().await.expect("body");
    let b: Value = no_such_user.json().await.expect("body");
    assert_eq!(a["message"], b["message"], "single generic message");
}

#[tokio::test]
async fn token_resolves_to_its_identity() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let user = ctx.register_user("Profile Tester").await;
    let token = user["token"].as_str().expect("token");

    let profile = ctx
        .client
        .get(ctx.url("/api/users/profile"))
        .bearer_auth(token)
        .send()
        .await
        .expect("profile request");
    assert_eq!(profile.status(), 200);

    let body: Value = profile.json().await.expect("profile body");
    assert_eq!(body["id"], user["id"]);
    assert_eq!(body["email"], user["email"]);
}

#[tokio::test]
async fn protected_route_without_token_is_rejected() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let response = ctx
        .client
        .get(ctx.url("/api/users/profile"))
        .send()
        .await
        .expect("bare profile request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn tampered_token_is_rejected() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let user = ctx.register_user("Tamper Tester").await;
    let token = user["token"].as_str().expect("token");
    let replacement = if token.ends_with('x') { 'y' } else { 'x' };
    let tampered = format!("{}{replacement}", &token[..token.len() - 1]);

    let response = ctx
        .client
        .get(ctx.url("/api/users/profile"))
        .bearer_auth(tampered)
        .send()
        .await
        .expect("tampered profile request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn admin_directory_exposes_users_without_passwords() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let user = ctx.register_user("Directory Entry").await;
    let admin = ctx.register_admin().await;
    let admin_token = admin["token"].as_str().expect("token");

    let listed: Vec<Value> = ctx
        .client
        .get(ctx.url("/api/admins/users"))
        .bearer_auth(admin_token)
        .send()
        .await
        .expect("list users")
        .json()
        .await
        .expect("list body");
    let entry = listed
        .iter()
        .find(|u| u["id"] == user["id"])
        .expect("registered user appears in the directory");
    assert!(entry.get("password").is_none());
    assert!(entry.get("passwordHash").is_none());

    let fetched: Value = ctx
        .client
        .get(ctx.url(&format!("/api/admins/users/{}", user["id"])))
        .bearer_auth(admin_token)
        .send()
        .await
        .expect("get user")
        .json()
        .await
        .expect("get body");
    assert_eq!(fetched["email"], user["email"]);

    let missing = ctx
        .client
        .get(ctx.url("/api/admins/users/999999999"))
        .bearer_auth(admin_token)
        .send()
        .await
        .expect("get missing user");
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn profile_update_rotates_token_and_merges_fields() {
    let Some(ctx) = TestContext::from_env() else {
        return;
    };

    let user = ctx.register_user("Update Tester").await;
    let token = user["token"].as_str().expect("token");

    let response = ctx
        .client
        .put(ctx.url("/api/users/profile"))
        .bearer_auth(token)
        .json(&json!({ "phone": "5551234567" }))
        .send()
        .await
        .expect("profile update");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("update body");
    assert_eq!(body["phone"], "5551234567");
    // Name was not supplied, so it is untouched
    assert_eq!(body["name"], "Update Tester");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}
