//! HTTP server facade for libris: router assembly, error translation, and
//! the serve loop with graceful shutdown.

use anyhow::Context;
use axum::{extract::Request, http::HeaderValue, routing::get, Router};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::{Timestamp, Uuid};

use libris_kernel::{InitCtx, ModuleRegistry};

pub mod error;
pub mod router;

pub use error::AppError;

use router::RouterBuilder;

/// Start the HTTP server with the given module registry. Returns once a
/// shutdown signal has been received and in-flight requests have drained.
pub async fn start_server(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
    let settings = ctx.settings;

    let app = build_router(registry, ctx);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", settings.server.host, settings.server.port))
            .await
            .context("failed to bind to address")?;

    tracing::info!(
        "HTTP server listening on http://{}:{}",
        settings.server.host,
        settings.server.port
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted. Public so
/// integration tests can drive the exact router the server runs.
pub fn build_router(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> Router {
    let mut router_builder = RouterBuilder::new().route("/healthz", get(health_check));

    for module in registry.modules() {
        let module_name = module.name();

        tracing::info!(module = module_name, "mounting module routes under /{}", module_name);
        router_builder = router_builder.mount_module(module_name, module.routes(ctx));
    }

    // Middleware layers wrap the routes registered above them.
    router_builder
        .with_openapi(registry)
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(ctx.settings.server.request_timeout_ms)
        .with_fallback()
        .build()
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

/// Request ID generator: sortable UUIDv7 per request.
#[derive(Clone)]
pub(crate) struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
