//! Router tests for the API-key and bearer gates.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};

#[tokio::test]
async fn test_missing_or_wrong_api_key_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    for key in [None, Some("wrong-key"), Some("")] {
        let response = app
            .post("/api/auth/login")
            .api_key(key)
            .json(serde_json::json!({ "login": "ana", "password": "password123" }))
            .send()
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "key {key:?}");
    }
}

#[tokio::test]
async fn test_geo_routes_require_api_key() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/geo/regions").api_key(None).send().await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_blank_commune_search_is_bad_request() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/geo/communes?search=%20%20").send().await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_key_is_checked_before_bearer() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1, &["user"]);

    let response = app
        .get("/api/users/me")
        .api_key(None)
        .bearer(&token)
        .send()
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["message"], "Missing API key");
}

#[tokio::test]
async fn test_missing_bearer_is_unauthorized() {
    let app = helpers::TestApp::new().await;

    let response = app.get("/api/users/me").send().await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_authorization_header_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1, &["user"]);

    for header in [
        token.clone(),
        format!("Token {token}"),
        format!("Bearer {token} extra"),
        "Bearer".to_string(),
    ] {
        let response = app
            .get("/api/users/me")
            .authorization(&header)
            .send()
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "header {header:?}");
    }
}

#[tokio::test]
async fn test_bearer_scheme_is_case_insensitive() {
    let app = helpers::TestApp::new().await;
    app.register("ana").await;
    let token = app.login("ana", "password123").await;

    let response = app
        .get("/api/users/me")
        .authorization(&format!("bEaReR {token}"))
        .send()
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    let user_id = app.register("ana").await;
    let token = app.token_at(user_id, &["user"], Utc::now() - Duration::days(2));

    let response = app.get("/api/users/me").bearer(&token).send().await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_tampered_token_is_unauthorized() {
    let app = helpers::TestApp::new().await;
    let user_id = app.register("ana").await;
    let token = app.token(user_id, &["user"]);
    let (unsigned, signature) = token.rsplit_once('.').expect("three segments");
    let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
    let token = format!("{unsigned}.{flipped}{}", &signature[1..]);

    let response = app.get("/api/users/me").bearer(&token).send().await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}
