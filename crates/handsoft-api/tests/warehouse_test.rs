//! Router tests for the per-route warehouse permission gates.

mod helpers;

use axum::http::StatusCode;

fn invalid_space() -> serde_json::Value {
    serde_json::json!({ "name": "North", "type": "hangar" })
}

#[tokio::test]
async fn test_user_without_permission_is_forbidden() {
    let app = helpers::TestApp::new().await;
    app.register("ana").await;
    let token = app.login("ana", "password123").await;

    let response = app
        .post("/api/warehouse/spaces")
        .bearer(&token)
        .json(invalid_space())
        .send()
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_read_permission_does_not_grant_create() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1, &["warehouse_reader"]);

    let response = app
        .post("/api/warehouse/spaces")
        .bearer(&token)
        .json(invalid_space())
        .send()
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .put("/api/warehouse/warehouses/1/config")
        .bearer(&token)
        .json(serde_json::json!({ "pallets_floor": -5 }))
        .send()
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_module_wildcard_reaches_handler() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1, &["warehouse_manager"]);

    let response = app
        .post("/api/warehouse/spaces")
        .bearer(&token)
        .json(invalid_space())
        .send()
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app
        .put("/api/warehouse/warehouses/1/config")
        .bearer(&token)
        .json(serde_json::json!({ "pallets_floor": -5 }))
        .send()
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_super_admin_bypasses_permission_gate() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1, &["root"]);

    let response = app
        .post("/api/warehouse/spaces")
        .bearer(&token)
        .json(serde_json::json!({ "name": "Yard", "type": "open_area" }))
        .send()
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_rbac_store_failure_is_internal_error() {
    let app = helpers::TestApp::new().await;
    let token = app.token(1, &["warehouse_manager"]);
    app.store.set_failing(true);

    let response = app
        .post("/api/warehouse/spaces")
        .bearer(&token)
        .json(invalid_space())
        .send()
        .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_open_area_round_trip_through_router() {
    let app = helpers::TestApp::new().await;
    let manager = app.token(1, &["warehouse_manager"]);

    let response = app
        .post("/api/warehouse/spaces")
        .bearer(&manager)
        .json(serde_json::json!({
            "name": "Yard",
            "type": "open_area",
            "open_area_warehouse": {
                "name": "Main",
                "pallets_floor": 10,
                "has_racks": true,
                "racks": [{ "label": "R1", "levels": 3, "pallets_per_level": 4 }]
            }
        }))
        .send()
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["type"], "open_area");
    let space_id = response.body["id"].as_i64().unwrap();

    let tree = app
        .get(&format!("/api/warehouse/spaces/{space_id}"))
        .bearer(&manager)
        .send()
        .await;
    assert_eq!(tree.status, StatusCode::OK);
    let warehouse_id = tree.body["warehouses"][0]["id"].as_i64().unwrap();
    assert_eq!(tree.body["warehouses"][0]["racks"][0]["label"], "R1");

    let detail = app
        .get(&format!("/api/warehouse/warehouses/{warehouse_id}"))
        .bearer(&manager)
        .send()
        .await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["capacity"]["pallets_racks"], 12);
    assert_eq!(detail.body["capacity"]["pallets_total"], 22);
}

#[tokio::test]
async fn test_failed_open_area_creation_leaves_nothing() {
    let app = helpers::TestApp::new().await;
    let manager = app.token(1, &["warehouse_manager"]);
    app.store.reject_inserts_into(Some("warehouse_racks")).await;

    let response = app
        .post("/api/warehouse/spaces")
        .bearer(&manager)
        .json(serde_json::json!({
            "name": "Yard",
            "type": "open_area",
            "open_area_warehouse": {
                "name": "Main",
                "has_racks": true,
                "racks": [{ "label": "R1", "levels": 1, "pallets_per_level": 1 }]
            }
        }))
        .send()
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);

    app.store.reject_inserts_into(None).await;
    let listed = app.get("/api/warehouse/spaces").bearer(&manager).send().await;
    assert_eq!(listed.body, serde_json::json!([]));
    assert_eq!(app.store.warehouse_count().await, 0);
}
