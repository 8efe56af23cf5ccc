use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wrap API routes with docs and the shared middleware stack.
///
/// - `apis` nested under `/api`
/// - Swagger UI at `/swagger-ui` (spec at `/api-docs/openapi.json`), ReDoc at
///   `/redoc`, RapiDoc at `/rapidoc`, Scalar at `/scalar`
/// - JSON 404 fallback
/// - tracing, security headers, CORS (see [`cors_layer_from_env`]) and compression
///
/// Health routes are merged by the caller so they stay outside `/api`.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = cors_layer_from_env()?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve `router` until `coordinator` fires, then run `cleanup` within `cleanup_timeout`
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    coordinator: ShutdownCoordinator,
    cleanup_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Server listening on {}", listener.local_addr()?);

    let signal = coordinator.clone();
    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Server encountered an error"));

    info!(timeout = ?cleanup_timeout, "Running cleanup");
    if tokio::time::timeout(cleanup_timeout, cleanup).await.is_err() {
        warn!(timeout = ?cleanup_timeout, "Cleanup exceeded timeout, forcing shutdown");
    }

    serve_result
}

/// Bind `server_config.address()` and serve with SIGINT/SIGTERM handling.
///
/// `cleanup` (typically closing the database pool) runs after in-flight
/// requests drain, bounded by `server_config.shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind(server_config.address()).await?;
    serve(
        listener,
        router,
        ShutdownCoordinator::new(),
        server_config.shutdown_timeout,
        cleanup,
    )
    .await
}
