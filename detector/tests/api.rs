//! HTTP-level tests for the detector's REST boundary.

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use detector::liveness;
use detector::registry::Registry;
use detector::rest;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceExt;

fn test_app() -> Router {
    let registry = Arc::new(Mutex::new(Registry::new(liveness::default_ghost_timeout())));
    rest::create_router(registry)
}

async fn send(app: &Router, method: Method, uri: &str, body: Body) -> Response<Body> {
    let mut request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    // Stand in for the connection info the real server attaches per socket.
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 41000))));
    app.clone().oneshot(request).await.unwrap()
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(body.to_string())).await
}

async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty()).await
}

async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn observe_empty_registry_returns_ok() {
    let app = test_app();
    let response = get(&app, "/api/v1/state").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["miners"], json!([]));
    assert_eq!(json["readings"], json!([]));
}

#[tokio::test]
async fn register_then_observe_shows_monitoring() {
    let app = test_app();

    let response = post_json(
        &app,
        "/api/v1/miners",
        json!({"mac": "AA:BB", "lat": 40.0, "lon": -74.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let ack = body_json(response).await;
    assert_eq!(ack["status"], "monitoring");
    assert_eq!(ack["mac"], "AA:BB");

    let state = body_json(get(&app, "/api/v1/state").await).await;
    assert_eq!(state["miners"].as_array().unwrap().len(), 1);
    assert_eq!(state["miners"][0]["mac"], "AA:BB");
    assert_eq!(state["miners"][0]["status"], "Monitoring");
}

#[tokio::test]
async fn register_accepts_form_style_numeric_strings() {
    let app = test_app();

    let response = post_json(
        &app,
        "/api/v1/miners",
        json!({"mac": "CC:DD", "lat": "40.7128", "lon": "-74.0060"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let state = body_json(get(&app, "/api/v1/state").await).await;
    assert_eq!(state["miners"][0]["claimed_lat"], 40.7128);
}

#[tokio::test]
async fn register_with_garbage_latitude_is_rejected_and_not_stored() {
    let app = test_app();

    let response = post_json(
        &app,
        "/api/v1/miners",
        json!({"mac": "AA:BB", "lat": "somewhere", "lon": -74.0}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].is_string());

    let state = body_json(get(&app, "/api/v1/state").await).await;
    assert_eq!(state["miners"], json!([]));
}

#[tokio::test]
async fn register_with_missing_field_is_rejected() {
    let app = test_app();

    let response = post_json(&app, "/api/v1/miners", json!({"mac": "AA:BB"})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_echoes_stored_reading_with_source() {
    let app = test_app();

    let response = post_json(
        &app,
        "/api/v1/readings",
        json!({"rssi": -82, "snr": 3.5, "size": 32}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["received"]["rssi"], -82.0);
    assert_eq!(json["received"]["snr"], 3.5);
    assert_eq!(json["received"]["size"], 32);
    assert_eq!(json["received"]["source"], "127.0.0.1:41000");
    assert!(json["received"]["received_at"].is_string());
}

#[tokio::test]
async fn ingest_marks_registered_miners_active() {
    let app = test_app();

    post_json(
        &app,
        "/api/v1/miners",
        json!({"mac": "AA:BB", "lat": 40.0, "lon": -74.0}),
    )
    .await;
    post_json(
        &app,
        "/api/v1/readings",
        json!({"rssi": -82, "snr": 3.5, "size": 32}),
    )
    .await;

    let state = body_json(get(&app, "/api/v1/state").await).await;
    assert_eq!(state["miners"][0]["status"], "Active");
    assert_eq!(state["readings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn ingest_missing_field_is_rejected_and_log_unchanged() {
    let app = test_app();

    let response = post_json(&app, "/api/v1/readings", json!({"snr": 3.5, "size": 32})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let state = body_json(get(&app, "/api/v1/state").await).await;
    assert_eq!(state["readings"], json!([]));
}

#[tokio::test]
async fn ingest_non_json_body_is_rejected() {
    let app = test_app();

    let response = send(
        &app,
        Method::POST,
        "/api/v1/readings",
        Body::from("rssi=-82&snr=3.5&size=32"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed message"));
}

#[tokio::test]
async fn readings_are_listed_newest_first() {
    let app = test_app();

    for rssi in [-70, -80, -90] {
        post_json(
            &app,
            "/api/v1/readings",
            json!({"rssi": rssi, "snr": 0.0, "size": 16}),
        )
        .await;
    }

    let state = body_json(get(&app, "/api/v1/state").await).await;
    let readings = state["readings"].as_array().unwrap();
    assert_eq!(readings.len(), 3);
    assert_eq!(readings[0]["rssi"], -90.0);
    assert_eq!(readings[2]["rssi"], -70.0);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = test_app();
    let response = get(&app, "/api/v1/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
