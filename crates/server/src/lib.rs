//! Helper utilities to launch the Axelscope API server.

use std::{net::SocketAddr, sync::Arc};

use api::ApiState;
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use eyre::Result;
use runtime::{health, shutdown::ShutdownSignal};
mod rate_limit;
use rate_limit::RateLimitLayer;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, info};

/// Version prefix for all API routes.
pub const API_VERSION: &str = "v1";

fn origin_allowed(allowed: &[String], origin: &str) -> bool {
    allowed.iter().any(|o| o == origin)
        || origin.starts_with("http://localhost:")
        || origin.starts_with("http://127.0.0.1:")
}

/// Build the API router with CORS, tracing and rate limiting layers.
pub fn router(state: ApiState, allowed_origins: Vec<String>) -> Router {
    let allowed = Arc::new(allowed_origins);
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate({
            let allowed = Arc::clone(&allowed);
            move |origin: &HeaderValue, _| {
                origin.to_str().is_ok_and(|origin| origin_allowed(&allowed, origin))
            }
        }))
        .allow_methods([Method::GET])
        .allow_headers(Any)
        .expose_headers(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    let api_service = tower::ServiceBuilder::new()
        .layer(RateLimitLayer::new(state.max_requests(), state.rate_period()))
        .service(api::router(state));

    Router::new()
        .route("/health", get(health::handler))
        .nest_service(&format!("/{API_VERSION}"), api_service)
        .layer(cors)
        .layer(trace)
}

/// Serve the API on `addr` until SIGINT or SIGTERM is received.
pub async fn run(addr: SocketAddr, state: ApiState, allowed_origins: Vec<String>) -> Result<()> {
    let app = router(state, allowed_origins);

    info!("Starting API server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(ShutdownSignal::new())
        .await?;
    info!("API server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{DEFAULT_MAX_REQUESTS, DEFAULT_RATE_PERIOD};
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode},
    };
    use clickhouse::test::Mock;
    use serde_json::{Value, json};
    use std::time::Duration;
    use tower::util::ServiceExt;
    use url::Url;
    use warehouse::WarehouseReader;

    fn state(mock_url: &str, max_requests: u64) -> ApiState {
        let url = Url::parse(mock_url).unwrap();
        let reader =
            WarehouseReader::new(url, "axelar".to_owned(), "user".into(), "pass".into()).unwrap();
        ApiState::new(reader, Duration::from_secs(3600), max_requests, DEFAULT_RATE_PERIOD)
    }

    fn build_app(mock_url: &str, allowed: Vec<String>) -> Router {
        router(state(mock_url, DEFAULT_MAX_REQUESTS), allowed)
    }

    fn default_origins() -> Vec<String> {
        config::DEFAULT_ALLOWED_ORIGINS.split(',').map(|s| s.to_owned()).collect()
    }

    async fn send_request(app: Router, uri: &str, origin: &str) -> (StatusCode, Value, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).header("Origin", origin).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let cors = response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        (status, body, cors)
    }

    #[tokio::test]
    async fn health_is_outside_the_version_prefix() {
        let mock = Mock::new();
        let app = build_app(mock.url(), default_origins());
        let (status, body, _) = send_request(app, "/health", "https://axelscope.xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn allows_default_origin() {
        let mock = Mock::new();
        let app = build_app(mock.url(), default_origins());
        let (status, _, cors) =
            send_request(app, &format!("/{API_VERSION}/pages"), "https://axelscope.xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cors.as_deref(), Some("https://axelscope.xyz"));
    }

    #[tokio::test]
    async fn allows_extra_origin() {
        let mock = Mock::new();
        let mut origins = default_origins();
        origins.push("https://example.com".to_owned());
        let app = build_app(mock.url(), origins);
        let (_, _, cors) =
            send_request(app, &format!("/{API_VERSION}/pages"), "https://example.com").await;
        assert_eq!(cors.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn allows_localhost_origins() {
        for origin in ["http://localhost:5173", "http://127.0.0.1:3001"] {
            let mock = Mock::new();
            let app = build_app(mock.url(), default_origins());
            let (status, _, cors) = send_request(app, "/health", origin).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(cors.as_deref(), Some(origin));
        }
    }

    #[tokio::test]
    async fn denies_other_origin() {
        let mock = Mock::new();
        let app = build_app(mock.url(), default_origins());
        let (status, _, cors) =
            send_request(app, &format!("/{API_VERSION}/pages"), "https://notallowed.com").await;
        assert_eq!(status, StatusCode::OK);
        assert!(cors.is_none());
    }

    #[tokio::test]
    async fn api_routes_are_rate_limited() {
        let mock = Mock::new();
        let app = router(state(mock.url(), 1), default_origins());
        let uri = format!("/{API_VERSION}/pages");

        let (first, _, _) = send_request(app.clone(), &uri, "https://axelscope.xyz").await;
        let (second, body, _) = send_request(app.clone(), &uri, "https://axelscope.xyz").await;
        assert_eq!(first, StatusCode::OK);
        assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["type"], "rate-limit");

        // The health check is not subject to the API limit.
        let (health, _, _) = send_request(app, "/health", "https://axelscope.xyz").await;
        assert_eq!(health, StatusCode::OK);
    }

    #[test]
    fn origin_predicate() {
        let allowed = default_origins();
        assert!(origin_allowed(&allowed, "https://www.axelscope.xyz"));
        assert!(!origin_allowed(&allowed, "https://axelscope.xyz.evil.com"));
        assert!(!origin_allowed(&allowed, "http://localhost.evil.com"));
    }
}
