//! The CRUD contract exercised through the full router, with in-memory stores
//! standing in for the three databases.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use multidb_api::{api_router, MemoryStore, Settings};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const BACKENDS: [&str; 3] = ["mongodb", "mysql", "postgresql"];
const MISSING_ID: &str = "5f0c3e1a-9b7d-4c2e-8a6f-1d2e3f4a5b6c";

struct Harness {
    router: Router,
    mysql: Arc<MemoryStore>,
}

fn harness() -> Harness {
    let mongodb = Arc::new(MemoryStore::named("MongoDB"));
    let mysql = Arc::new(MemoryStore::named("MySQL"));
    let postgresql = Arc::new(MemoryStore::named("PostgreSQL"));
    let router = api_router(
        Arc::new(Settings::default()),
        mongodb,
        mysql.clone(),
        postgresql,
    );
    Harness { router, mysql }
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(v) => {
            req = req.header("content-type", "application/json");
            Body::from(v.to_string())
        }
        None => Body::empty(),
    };
    let resp = router.clone().oneshot(req.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn url(backend: &str, resource: &str) -> String {
    format!("/api/v1/{}/{}", backend, resource)
}

fn timestamp(v: &Value) -> DateTime<Utc> {
    serde_json::from_value(v.clone()).unwrap()
}

fn laptop() -> Value {
    json!({
        "name": "Laptop",
        "description": "14 inch, 16 GB",
        "price": 999.99,
        "category": "electronics"
    })
}

fn order() -> Value {
    json!({
        "user_id": "0b6e2c1a-3f4d-4e5b-9c8a-7d6e5f4a3b2c",
        "product_id": "1c7f3d2b-4a5e-4f6c-8d9b-8e7f6a5b4c3d",
        "quantity": 2,
        "total_amount": 1999.98
    })
}

#[tokio::test]
async fn john_doe_round_trip_on_every_backend() {
    let h = harness();
    for backend in BACKENDS {
        let (status, created) = send(
            &h.router,
            "POST",
            &url(backend, "users"),
            Some(json!({"name": "John Doe", "email": "john@example.com", "age": 30})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{backend}: {created}");
        let id = created["id"].as_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
        assert_eq!(created["name"], "John Doe");
        assert_eq!(created["age"], 30);
        assert!(created["created_at"].is_string());
        assert!(created["updated_at"].is_null());

        let (status, fetched) = send(&h.router, "GET", &format!("{}/{}", url(backend, "users"), id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
    }
}

#[tokio::test]
async fn product_partial_update_keeps_other_fields() {
    let h = harness();
    for backend in BACKENDS {
        let (_, created) = send(&h.router, "POST", &url(backend, "products"), Some(laptop())).await;
        let path = format!("{}/{}", url(backend, "products"), created["id"].as_str().unwrap());
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        let (status, updated) = send(&h.router, "PUT", &path, Some(json!({"price": 49.99}))).await;
        assert_eq!(status, StatusCode::OK, "{backend}: {updated}");
        assert_eq!(updated["price"], 49.99);
        assert_eq!(updated["name"], "Laptop");
        assert_eq!(updated["category"], "electronics");
        assert_eq!(updated["description"], "14 inch, 16 GB");
        assert_eq!(updated["created_at"], created["created_at"]);
        assert!(timestamp(&updated["updated_at"]) > timestamp(&created["created_at"]));

        let (_, fetched) = send(&h.router, "GET", &path, None).await;
        assert_eq!(fetched, updated);
    }
}

#[tokio::test]
async fn empty_update_is_rejected_without_mutation() {
    let h = harness();
    for backend in BACKENDS {
        let (_, created) = send(
            &h.router,
            "POST",
            &url(backend, "users"),
            Some(json!({"name": "Ada", "email": "ada@example.com"})),
        )
        .await;
        let path = format!("{}/{}", url(backend, "users"), created["id"].as_str().unwrap());

        for body in [json!({}), json!({"age": null})] {
            let (status, err) = send(&h.router, "PUT", &path, Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(err["error"]["code"], "bad_request");
            assert_eq!(err["error"]["message"], "bad request: No data provided for update");
        }

        let (_, fetched) = send(&h.router, "GET", &path, None).await;
        assert_eq!(fetched, created);
    }
}

#[tokio::test]
async fn empty_update_on_missing_record_is_still_a_bad_request() {
    let h = harness();
    let path = format!("{}/{}", url("mysql", "orders"), MISSING_ID);
    let (status, _) = send(&h.router, "PUT", &path, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let h = harness();
    for backend in BACKENDS {
        let path = format!("{}/{}", url(backend, "orders"), MISSING_ID);
        let (status, err) = send(&h.router, "PUT", &path, Some(json!({"quantity": 3}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["error"]["code"], "not_found");
        assert!(err["error"]["message"].as_str().unwrap().contains(MISSING_ID));
    }
}

#[tokio::test]
async fn delete_twice_then_read() {
    let h = harness();
    for backend in BACKENDS {
        let (_, created) = send(&h.router, "POST", &url(backend, "orders"), Some(order())).await;
        let path = format!("{}/{}", url(backend, "orders"), created["id"].as_str().unwrap());

        let (status, body) = send(&h.router, "DELETE", &path, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(body.is_null());

        let (status, _) = send(&h.router, "DELETE", &path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&h.router, "GET", &path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn list_returns_every_created_record() {
    let h = harness();
    for backend in BACKENDS {
        let (status, rows) = send(&h.router, "GET", &url(backend, "orders"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rows, json!([]));

        for _ in 0..3 {
            let (status, _) = send(&h.router, "POST", &url(backend, "orders"), Some(order())).await;
            assert_eq!(status, StatusCode::CREATED);
        }
        let (_, rows) = send(&h.router, "GET", &url(backend, "orders"), None).await;
        assert_eq!(rows.as_array().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn backends_do_not_share_records() {
    let h = harness();
    let (_, created) = send(&h.router, "POST", &url("mongodb", "products"), Some(laptop())).await;
    let id = created["id"].as_str().unwrap();

    let (_, rows) = send(&h.router, "GET", &url("postgresql", "products"), None).await;
    assert_eq!(rows, json!([]));
    let (status, _) = send(&h.router, "GET", &format!("{}/{}", url("mysql", "products"), id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn order_references_are_stored_in_canonical_form() {
    let h = harness();
    for backend in BACKENDS {
        let (_, user) = send(
            &h.router,
            "POST",
            &url(backend, "users"),
            Some(json!({"name": "Grace", "email": "grace@example.com"})),
        )
        .await;
        let (_, product) = send(&h.router, "POST", &url(backend, "products"), Some(laptop())).await;
        let user_id = user["id"].as_str().unwrap();
        let product_id = product["id"].as_str().unwrap();

        let (status, placed) = send(
            &h.router,
            "POST",
            &url(backend, "orders"),
            Some(json!({
                "user_id": user_id.to_uppercase(),
                "product_id": product_id.to_uppercase(),
                "quantity": 1,
                "total_amount": 999.99
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{backend}: {placed}");
        assert_eq!(placed["user_id"], user["id"], "{backend}");
        assert_eq!(placed["product_id"], product["id"], "{backend}");

        let path = format!("{}/{}", url(backend, "orders"), placed["id"].as_str().unwrap());
        let (_, fetched) = send(&h.router, "GET", &path, None).await;
        assert_eq!(fetched["user_id"], user["id"]);
    }
}

#[tokio::test]
async fn malformed_id_is_a_bad_request() {
    let h = harness();
    let path = format!("{}/not-a-uuid", url("postgresql", "users"));
    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({"name": "x"}))),
        ("DELETE", None),
    ] {
        let (status, err) = send(&h.router, method, &path, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method}");
        assert_eq!(err["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn invalid_payloads_store_nothing() {
    let h = harness();
    let cases = [
        ("users", json!({"name": "John", "email": "not-an-email"})),
        ("users", json!({"name": "", "email": "john@example.com"})),
        ("users", json!({"email": "john@example.com"})),
        ("users", json!({"name": "John", "email": "john@example.com", "age": 151})),
        ("users", json!({"name": "John", "email": "john@example.com", "age": "thirty"})),
        ("products", json!({"name": "Desk", "price": 0, "category": "furniture"})),
        ("products", json!({"name": "Desk", "price": 10.0, "category": "furniture", "description": "x".repeat(1001)})),
        ("orders", json!({"user_id": "abc", "product_id": MISSING_ID, "quantity": 1, "total_amount": 5.0})),
        ("orders", json!({"user_id": MISSING_ID, "product_id": MISSING_ID, "quantity": 0, "total_amount": 5.0})),
        ("orders", json!({"user_id": MISSING_ID, "product_id": MISSING_ID, "quantity": 1.5, "total_amount": 5.0})),
        ("orders", json!([1, 2, 3])),
    ];
    for backend in BACKENDS {
        for (resource, body) in &cases {
            let (status, err) = send(&h.router, "POST", &url(backend, resource), Some(body.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{backend}/{resource}: {body}");
            assert_eq!(err["error"]["code"], "validation_error");
        }
        for resource in ["users", "products", "orders"] {
            let (_, rows) = send(&h.router, "GET", &url(backend, resource), None).await;
            assert_eq!(rows, json!([]), "{backend}/{resource}");
        }
    }
}

#[tokio::test]
async fn invalid_update_leaves_record_untouched() {
    let h = harness();
    let (_, created) = send(&h.router, "POST", &url("mysql", "products"), Some(laptop())).await;
    let path = format!("{}/{}", url("mysql", "products"), created["id"].as_str().unwrap());

    let (status, _) = send(&h.router, "PUT", &path, Some(json!({"price": -1}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, fetched) = send(&h.router, "GET", &path, None).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn non_json_body_is_a_validation_failure() {
    let h = harness();
    let req = Request::builder()
        .method("POST")
        .uri(url("mongodb", "users"))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let resp = h.router.clone().oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn backend_health_reports_outage() {
    let h = harness();
    let (status, body) = send(&h.router, "GET", "/api/v1/mongodb/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "MongoDB");
    assert!(body["timestamp"].is_string());

    h.mysql.set_available(false);
    let (status, body) = send(&h.router, "GET", "/api/v1/mysql/health", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "service_unavailable");
    assert!(body["error"]["message"].as_str().unwrap().starts_with("MySQL health check failed"));

    let (status, body) = send(&h.router, "GET", &url("mysql", "users"), None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "database_error");

    let (status, _) = send(&h.router, "GET", "/api/v1/postgresql/health", None).await;
    assert_eq!(status, StatusCode::OK);

    h.mysql.set_available(true);
    let (status, _) = send(&h.router, "GET", "/api/v1/mysql/health", None).await;
    assert_eq!(status, StatusCode::OK);
}
