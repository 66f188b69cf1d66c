use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use api_types::ErrorResponse;
use axum::{
    http::{HeaderValue, Request, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use tracing::debug;

use runtime::rate_limiter::RateLimiter;

/// Rejects requests with 429 once the current window is exhausted.
#[derive(Clone, Debug)]
pub(crate) struct RateLimitLayer {
    limiter: RateLimiter,
}

impl RateLimitLayer {
    pub(crate) fn new(max: u64, period: Duration) -> Self {
        Self { limiter: RateLimiter::new(max, period) }
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimit<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimit { inner, limiter: self.limiter.clone() }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct RateLimit<S> {
    inner: S,
    limiter: RateLimiter,
}

fn too_many_requests(period: Duration) -> Response {
    let retry_after = period.as_secs().max(1);
    let body = ErrorResponse::new(
        "rate-limit",
        "Too Many Requests",
        StatusCode::TOO_MANY_REQUESTS,
        format!("Rate limit exceeded. Retry after {retry_after} seconds"),
    );
    let mut resp = body.into_response();
    resp.headers_mut().insert(RETRY_AFTER, HeaderValue::from(retry_after));
    resp
}

impl<S, ReqBody> Service<Request<ReqBody>> for RateLimit<S>
where
    S: Service<Request<ReqBody>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if self.limiter.try_acquire() {
            Box::pin(self.inner.call(req))
        } else {
            debug!(uri = %req.uri(), "Rate limit exceeded");
            Box::pin(std::future::ready(Ok(too_many_requests(self.limiter.period()))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RateLimitLayer;
    use axum::{
        body::{self, Body},
        http::{Request, StatusCode, header::RETRY_AFTER},
        response::Response,
    };
    use std::{convert::Infallible, time::Duration};
    use tower::{Layer, Service, ServiceExt, service_fn};

    #[tokio::test]
    async fn sets_retry_after_header() {
        let layer = RateLimitLayer::new(1, Duration::from_secs(30));
        let inner = service_fn(|_req: Request<Body>| async move {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        });
        let mut svc = layer.layer(inner);

        let first = svc.ready().await.unwrap().call(Request::new(Body::empty())).await.unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let resp = svc.ready().await.unwrap().call(Request::new(Body::empty())).await.unwrap();

        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get(RETRY_AFTER).unwrap().to_str().unwrap(), "30");
        let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["type"], "rate-limit");
        assert_eq!(body["status"], 429);
    }

    #[tokio::test]
    async fn sub_second_windows_advertise_one_second() {
        let layer = RateLimitLayer::new(0, Duration::from_millis(200));
        let inner = service_fn(|_req: Request<Body>| async move {
            Ok::<_, Infallible>(Response::new(Body::empty()))
        });
        let mut svc = layer.layer(inner);

        let resp = svc.ready().await.unwrap().call(Request::new(Body::empty())).await.unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers().get(RETRY_AFTER).unwrap().to_str().unwrap(), "1");
    }
}
