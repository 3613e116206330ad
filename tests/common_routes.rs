use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use multidb_api::{api_router, common_routes, MemoryStore, Settings};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let resp = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn settings() -> Arc<Settings> {
    Arc::new(Settings {
        app_name: "Inventory".into(),
        app_version: "2.3.4".into(),
        ..Settings::default()
    })
}

#[tokio::test]
async fn root_lists_backends_and_entrypoints() {
    let (status, body) = get_json(common_routes(settings()), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to Inventory");
    assert_eq!(body["version"], "2.3.4");
    assert_eq!(body["databases"].as_array().unwrap().len(), 3);
    assert_eq!(body["endpoints"]["MySQL"], "/api/v1/mysql/users");
}

#[tokio::test]
async fn aggregate_health_does_not_touch_backends() {
    let store = Arc::new(MemoryStore::named("MongoDB"));
    store.set_available(false);
    let router = api_router(settings(), store.clone(), store.clone(), store);
    let (status, body) = get_json(router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["app_name"], "Inventory");
    assert_eq!(body["version"], "2.3.4");
}

#[tokio::test]
async fn version_reports_crate() {
    let (status, body) = get_json(common_routes(settings()), "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "multidb-api");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (status, body) = get_json(common_routes(settings()), "/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Inventory");
    assert_eq!(body["info"]["version"], "2.3.4");
    assert!(body["components"]["schemas"]["Product"].is_object());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let router = api_router(settings(), store.clone(), store.clone(), store);
    let big = format!(
        r#"{{"name":"Desk","price":1.0,"category":"furniture","description":"{}"}}"#,
        "x".repeat(2 * 1024 * 1024)
    );
    let resp = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/mongodb/products")
                .header("content-type", "application/json")
                .body(Body::from(big))
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(resp.status().is_client_error());
}
