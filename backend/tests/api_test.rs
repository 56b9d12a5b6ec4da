mod common;

use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn health_reports_ok() {
    let db = common::test_db().await;
    let addr = common::spawn_app(db.pool.clone()).await;

    let resp = common::http_client()
        .get(format!("http://{}/api/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn category_crud_flow() {
    let db = common::test_db().await;
    let addr = common::spawn_app(db.pool.clone()).await;
    let client = common::http_client();

    // Create
    let resp = client
        .post(format!("http://{}/api/categories", addr))
        .json(&json!({ "name": "Documentary", "description": "Real stories" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    let created: Value = resp.json().await.unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["name"], "Documentary");
    assert_eq!(created["is_active"], true);

    // Get
    let resp = client
        .get(format!("http://{}/api/categories/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, created);

    // Update name only, deactivate
    let resp = client
        .put(format!("http://{}/api/categories/{}", addr, id))
        .json(&json!({ "name": "Documentaries", "is_active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["name"], "Documentaries");
    assert_eq!(updated["description"], "Real stories");
    assert_eq!(updated["is_active"], false);
    assert_eq!(updated["created_at"], created["created_at"]);

    // Delete
    let resp = client
        .delete(format!("http://{}/api/categories/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("http://{}/api/categories/{}", addr, id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], format!("Category {} not found", id));

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn create_with_invalid_name_returns_422() {
    let db = common::test_db().await;
    let addr = common::spawn_app(db.pool.clone()).await;

    let resp = common::http_client()
        .post(format!("http://{}/api/categories", addr))
        .json(&json!({ "name": "ab" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 422);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Name should be at least 3 characters long");

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn update_missing_category_returns_404() {
    let db = common::test_db().await;
    let addr = common::spawn_app(db.pool.clone()).await;

    let resp = common::http_client()
        .put(format!(
            "http://{}/api/categories/{}",
            addr,
            uuid::Uuid::new_v4()
        ))
        .json(&json!({ "name": "Whatever" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn list_pages_and_filters() {
    let db = common::test_db().await;
    let addr = common::spawn_app(db.pool.clone()).await;
    let client = common::http_client();

    for name in common::GENRE_NAMES {
        let resp = client
            .post(format!("http://{}/api/categories", addr))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 201);
    }

    let resp = client
        .get(format!(
            "http://{}/api/categories?page=2&per_page=5&sort=name&dir=asc",
            addr
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["current_page"], 2);
    assert_eq!(body["per_page"], 5);
    assert_eq!(body["total"], 9);
    assert_eq!(body["items"].as_array().unwrap().len(), 4);

    let resp = client
        .get(format!(
            "http://{}/api/categories?search=Horror&sort=name&dir=desc",
            addr
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let names: Vec<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["name"].as_str())
        .collect();
    assert_eq!(body["total"], 3);
    assert_eq!(
        names,
        ["Horror - Robots", "Horror - Based on Real Facts", "Horror"]
    );

    db.cleanup().await;
}

#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL"]
async fn nul_characters_never_surface_as_server_errors() {
    let db = common::test_db().await;
    let addr = common::spawn_app(db.pool.clone()).await;
    let client = common::http_client();

    let resp = client
        .get(format!("http://{}/api/categories?search=%00", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["total"], 0);

    let resp = client
        .post(format!("http://{}/api/categories", addr))
        .json(&json!({ "name": "Bad\u{0}Name" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    db.cleanup().await;
}
