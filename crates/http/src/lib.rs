//! HTTP server facade for the catalog: router assembly, error pages and
//! template responses.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::signal;

use catalog_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod response;
pub mod router;

pub use error::AppError;
pub use response::HtmlTemplate;
use router::RouterBuilder;

/// Start the HTTP server and serve until a shutdown signal arrives
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    mount_path: &str,
) -> anyhow::Result<()> {
    let app = build_router(registry, settings, mount_path);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!(
        "HTTP server listening on http://{}{}",
        address,
        mount_path
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes nested under `mount_path`
pub fn build_router(registry: &ModuleRegistry, settings: &Settings, mount_path: &str) -> Router {
    let home = mount_path.to_string();

    let server = &settings.server;
    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_request_id()
        .with_timeout(server.request_timeout_ms)
        .with_error_details(settings.environment.exposes_error_details())
        .route("/healthz", get(health_check))
        .route(
            "/",
            get(move || {
                let target = home.clone();
                async move { axum::response::Redirect::to(&target) }
            }),
        );

    if server.compression {
        router_builder = router_builder.with_compression();
    }

    if server.rate_limit.enabled {
        router_builder = router_builder.with_rate_limit(
            server.rate_limit.requests,
            Duration::from_secs(server.rate_limit.window_secs),
        );
    }

    for module in registry.modules() {
        tracing::info!(
            module = module.name(),
            "mounting module routes under {}",
            mount_path
        );
        router_builder = router_builder.mount_module(module.routes());
    }

    router_builder.build(mount_path)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, starting graceful shutdown"),
        _ = terminate => tracing::info!("received SIGTERM, starting graceful shutdown"),
    }
}
