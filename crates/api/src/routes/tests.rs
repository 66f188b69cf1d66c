use super::*;
use crate::{DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD};
use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
};
use clickhouse::test::{Mock, handlers};
use serde_json::Value;
use std::time::Duration;
use tower::util::ServiceExt;
use url::Url;
use warehouse::{SatelliteKpiRow, SatelliteUserActivityRow, SatelliteUsersRow, WarehouseReader};

fn build_app(mock_url: &str) -> Router {
    let url = Url::parse(mock_url).unwrap();
    let reader =
        WarehouseReader::new(url, "axelar".to_owned(), "user".into(), "pass".into()).unwrap();
    let state = ApiState::new(
        reader,
        Duration::from_secs(3600),
        DEFAULT_MAX_REQUESTS,
        DEFAULT_RATE_PERIOD,
    );
    router(state)
}

async fn send_request(app: Router, uri: &str) -> (StatusCode, Value) {
    let response =
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn lists_pages_with_defaults() {
    let mock = Mock::new();
    let (status, body) = send_request(build_app(mock.url()), "/pages").await;

    assert_eq!(status, StatusCode::OK);
    let pages = body["pages"].as_array().unwrap();
    let ids: Vec<_> = pages.iter().map(|p| p["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["user-behaviour", "squid", "satellite"]);
    assert_eq!(pages[1]["defaults"]["start_date"], "2023-01-01");
    assert_eq!(pages[1]["defaults"]["granularity"], "month");
    assert_eq!(pages[0]["defaults"]["granularity"], "day");
}

#[tokio::test]
async fn unknown_page_is_not_found() {
    let mock = Mock::new();
    let (status, body) = send_request(build_app(mock.url()), "/pages/bridges").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["type"], "not-found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn inverted_window_is_rejected_before_querying() {
    // No handlers are registered: the response can only come from validation.
    let mock = Mock::new();
    let (status, body) = send_request(
        build_app(mock.url()),
        "/pages/squid?start_date=2024-06-01&end_date=2024-05-01",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["type"], "invalid-params");
}

#[tokio::test]
async fn unknown_granularity_is_rejected() {
    let mock = Mock::new();
    let (status, body) =
        send_request(build_app(mock.url()), "/pages/satellite?granularity=year").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("year"));
}

#[tokio::test]
async fn page_document_uses_requested_window() {
    let mock = Mock::new();
    mock.add(handlers::provide(vec![SatelliteKpiRow {
        transfers: 3,
        users: 2,
        volume_usd: Some(10.0),
        avg_daily_users: Some(1.0),
        avg_daily_txns: Some(1.5),
        avg_daily_volume: Some(5.0),
    }]));
    mock.add(handlers::provide(vec![SatelliteUsersRow {
        date: 19723,
        new_users: 2,
        returning_users: 0,
        total_users: 2,
    }]));
    mock.add(handlers::provide(Vec::<SatelliteUserActivityRow>::new()));

    let (status, body) = send_request(
        build_app(mock.url()),
        "/pages/satellite?start_date=2024-01-01&end_date=2024-01-31&granularity=week",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], "satellite");
    assert_eq!(body["params"]["start_date"], "2024-01-01");
    assert_eq!(body["params"]["granularity"], "week");
    let regions = body["regions"].as_array().unwrap();
    assert!(regions.iter().all(|r| r["status"] == "ok"));
    let top = regions.iter().find(|r| r["id"] == "top-users").unwrap();
    assert_eq!(top["view"]["type"], "placeholder");
    let users = regions.iter().find(|r| r["id"] == "new-users").unwrap();
    assert_eq!(users["view"]["type"], "figure");
    assert_eq!(users["view"]["categories"][0], "2024-01-01");
}

#[tokio::test]
async fn serves_openapi_document() {
    let mock = Mock::new();
    let (status, body) = send_request(build_app(mock.url()), "/api-doc/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/pages/{page}"].is_object());
}
