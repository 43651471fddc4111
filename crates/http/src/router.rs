//! Router builder for the catalog HTTP server

use axum::{
    extract::{ConnectInfo, Request},
    http::HeaderValue,
    middleware, Router,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    errors::GovernorError, governor::GovernorConfigBuilder, key_extractor::KeyExtractor,
    GovernorLayer,
};
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use uuid::Uuid;

use crate::error;

/// Builder for constructing the main HTTP router
///
/// Layers are applied in `build`, after every route is in place, so they wrap
/// module routes and the fallback alike.
pub struct RouterBuilder {
    router: Router,
    catalog: Router,
    tracing: bool,
    request_id: bool,
    timeout: Option<Duration>,
    compression: bool,
    rate_limit: Option<RateLimit>,
    expose_error_details: bool,
}

/// At most `requests` per client within `window`, refilled evenly.
#[derive(Debug, Clone, Copy)]
struct RateLimit {
    requests: u32,
    window: Duration,
}

impl RouterBuilder {
    /// Create a new router builder
    pub fn new() -> Self {
        Self {
            router: Router::new(),
            catalog: Router::new(),
            tracing: false,
            request_id: false,
            timeout: None,
            compression: false,
            rate_limit: None,
            expose_error_details: false,
        }
    }

    /// Add a route at the top level
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Merge a module's routes into the catalog router
    pub fn mount_module(mut self, module_router: Router) -> Self {
        self.catalog = self.catalog.merge(module_router);
        self
    }

    /// Add tracing middleware
    pub fn with_tracing(mut self) -> Self {
        self.tracing = true;
        self
    }

    /// Add request ID middleware
    pub fn with_request_id(mut self) -> Self {
        self.request_id = true;
        self
    }

    /// Add timeout middleware
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(Duration::from_millis(timeout_ms));
        self
    }

    /// Compress response bodies for clients that accept it
    pub fn with_compression(mut self) -> Self {
        self.compression = true;
        self
    }

    /// Answer 429 once a client exceeds `requests` within `window`
    pub fn with_rate_limit(mut self, requests: u32, window: Duration) -> Self {
        self.rate_limit = Some(RateLimit { requests, window });
        self
    }

    /// Show internal error detail on error pages
    pub fn with_error_details(mut self, expose: bool) -> Self {
        self.expose_error_details = expose;
        self
    }

    /// Build the final router with the catalog nested under `mount_path`
    pub fn build(self, mount_path: &str) -> Router {
        let mut router = self
            .router
            .nest(mount_path, self.catalog)
            .fallback(error::not_found)
            .layer(middleware::map_response_with_state(
                self.expose_error_details,
                error::expose_error_details,
            ));

        if let Some(timeout) = self.timeout {
            router = router.layer(TimeoutLayer::new(timeout));
        }

        if self.compression {
            router = router.layer(CompressionLayer::new());
        }

        if let Some(limit) = self.rate_limit {
            let config = limit.window.checked_div(limit.requests).and_then(|period| {
                GovernorConfigBuilder::default()
                    .key_extractor(ClientIp)
                    .period(period)
                    .burst_size(limit.requests)
                    .finish()
            });

            match config {
                Some(config) => router = router.layer(GovernorLayer::new(Arc::new(config))),
                None => tracing::warn!(
                    requests = limit.requests,
                    window_secs = limit.window.as_secs(),
                    "invalid rate limit quota, rate limiting disabled"
                ),
            }
        }

        if self.tracing {
            router = router.layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().include_headers(true))
                    .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                    .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
            );
        }

        if self.request_id {
            router = router
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7));
        }

        router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Rate limit key: the peer address, or loopback when the connection info is
/// absent (requests driven in-process).
#[derive(Debug, Clone, Copy)]
struct ClientIp;

impl KeyExtractor for ClientIp {
    type Key = IpAddr;

    fn extract<T>(&self, request: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|info| info.0.ip())
            .unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST)))
    }
}

/// Request ID generator for tracing
#[derive(Clone)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let request_id = Uuid::now_v7().to_string().parse::<HeaderValue>().ok()?;
        Some(RequestId::new(request_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, StatusCode},
        routing::get,
    };
    use tower::ServiceExt;

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_module_routes_nested_under_mount_path() {
        let module_router = Router::new().route("/genres", get(|| async { "genres" }));
        let router = RouterBuilder::new()
            .mount_module(module_router)
            .build("/catalog");

        let response = router.oneshot(get_request("/catalog/genres")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_renders_not_found() {
        let router = RouterBuilder::new().build("/catalog");

        let response = router.oneshot(get_request("/nowhere")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_middleware_chain_sets_request_id() {
        let router = RouterBuilder::new()
            .with_tracing()
            .with_request_id()
            .with_timeout(5000)
            .route("/healthz", get(|| async { "ok" }))
            .build("/catalog");

        let response = router.oneshot(get_request("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn test_compression_honours_accept_encoding() {
        let page = "catalog page ".repeat(64);
        let router = RouterBuilder::new()
            .with_compression()
            .route(
                "/page",
                get(move || {
                    let page = page.clone();
                    async move { page }
                }),
            )
            .build("/catalog");

        let request = Request::builder()
            .uri("/page")
            .header(header::ACCEPT_ENCODING, "gzip")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_ENCODING).unwrap(),
            "gzip"
        );

        let plain = router.oneshot(get_request("/page")).await.unwrap();
        assert!(plain.headers().get(header::CONTENT_ENCODING).is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_requests_over_budget() {
        let router = RouterBuilder::new()
            .with_rate_limit(20, Duration::from_secs(60))
            .route("/healthz", get(|| async { "ok" }))
            .build("/catalog");

        for attempt in 1..=20 {
            let response = router.clone().oneshot(get_request("/healthz")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "request {attempt}");
        }

        let response = router.oneshot(get_request("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_zero_rate_limit_is_skipped() {
        let router = RouterBuilder::new()
            .with_rate_limit(0, Duration::from_secs(60))
            .route("/healthz", get(|| async { "ok" }))
            .build("/catalog");

        let response = router.oneshot(get_request("/healthz")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
