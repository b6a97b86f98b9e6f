//! Router tests for registration, login and the profile endpoint.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_register_returns_created_user() {
    let app = helpers::TestApp::new().await;

    let response = app
        .post("/api/auth/register")
        .json(app.registration("ana"))
        .send()
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["email"], "ana@example.com");
    assert_eq!(response.body["username"], "ana");
    assert!(response.body["address_id"].as_i64().is_some());
    assert!(response.body["created"].is_string());
}

#[tokio::test]
async fn test_identical_addresses_share_one_row() {
    let app = helpers::TestApp::new().await;

    let mut first = app.registration("ana");
    first["street"] = "  Av. Providencia ".into();
    let first = app.post("/api/auth/register").json(first).send().await;
    let second = app
        .post("/api/auth/register")
        .json(app.registration("bob"))
        .send()
        .await;

    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(first.body["address_id"], second.body["address_id"]);
    assert_eq!(app.store.address_count().await, 1);
}

#[tokio::test]
async fn test_register_duplicate_is_conflict() {
    let app = helpers::TestApp::new().await;
    app.register("ana").await;

    let response = app
        .post("/api/auth/register")
        .json(app.registration("ana"))
        .send()
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_unknown_commune_is_bad_request() {
    let app = helpers::TestApp::new().await;
    let mut body = app.registration("ana");
    body["commune_id"] = 999_999.into();

    let response = app.post("/api/auth/register").json(body).send().await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.store.address_count().await, 0);
}

#[tokio::test]
async fn test_register_invalid_body_is_bad_request() {
    let app = helpers::TestApp::new().await;

    let mut blank_street = app.registration("ana");
    blank_street["street"] = "   ".into();
    let response = app.post("/api/auth/register").json(blank_street).send().await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let mut bad_email = app.registration("bob");
    bad_email["email"] = "bob-at-example".into();
    let response = app.post("/api/auth/register").json(bad_email).send().await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .post("/api/auth/register")
        .json(serde_json::json!({ "email": "x@example.com" }))
        .send()
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_returns_bearer_token() {
    let app = helpers::TestApp::new().await;
    app.register("ana").await;

    let response = app
        .post("/api/auth/login")
        .json(serde_json::json!({ "login": "ANA@example.com ", "password": "password123" }))
        .send()
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["token_type"], "Bearer");
    assert_eq!(response.body["expires_in"], 24 * 60 * 60);
    assert!(response.body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized_either_way() {
    let app = helpers::TestApp::new().await;
    app.register("ana").await;

    for login in ["ana", "ana@example.com"] {
        let response = app
            .post("/api/auth/login")
            .json(serde_json::json!({ "login": login, "password": "not-the-password" }))
            .send()
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "login {login}");
        assert_eq!(response.body["message"], "Invalid credentials");
    }
}

#[tokio::test]
async fn test_login_disabled_account_is_forbidden() {
    let app = helpers::TestApp::new().await;
    let user_id = app.register("ana").await;
    app.store.set_active(user_id, false).await;

    let response = app
        .post("/api/auth/login")
        .json(serde_json::json!({ "login": "ana", "password": "password123" }))
        .send()
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_me_returns_profile() {
    let app = helpers::TestApp::new().await;
    app.register("ana").await;
    let token = app.login("ana", "password123").await;

    let response = app.get("/api/users/me").bearer(&token).send().await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["username"], "ana");
    assert_eq!(response.body["is_active"], true);
    assert_eq!(response.body["contact"]["full_name"], "Test User");
    assert_eq!(response.body["phones"][0]["label"], "mobile");
    assert_eq!(response.body["phones"][0]["is_main"], true);
    assert_eq!(response.body["address"]["street"], "Av. Providencia");
    assert_eq!(response.body["location"]["commune"]["name"], "Providencia");
    assert_eq!(response.body["location"]["country"]["code"], "CL");
    assert_eq!(response.body["roles"], serde_json::json!(["user"]));
}

#[tokio::test]
async fn test_me_for_missing_user_is_not_found() {
    let app = helpers::TestApp::new().await;
    let token = app.token(424242, &["user"]);

    let response = app.get("/api/users/me").bearer(&token).send().await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_internal_error_without_detail() {
    let app = helpers::TestApp::new().await;
    app.store.set_failing(true);

    let response = app
        .post("/api/auth/login")
        .json(serde_json::json!({ "login": "ana", "password": "password123" }))
        .send()
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["error"], "INTERNAL_ERROR");
    assert!(!response.body["message"].as_str().unwrap().contains("Store"));
}
