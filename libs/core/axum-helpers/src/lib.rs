//! # Axum Helpers
//!
//! Shared HTTP plumbing for the API binary and the domain routers.
//!
//! - **[`server`]**: router assembly with OpenAPI UIs, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security-header middleware
//! - **[`errors`]**: [`AppError`] and the JSON [`ErrorResponse`] body
//! - **[`extractors`]**: [`IdPath`] and [`ValidatedJson`]
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(router, &ServerConfig::default(), async {}).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_postgres, create_production_app,
    create_router, health_router, run_health_checks,
};

pub use http::{cors_layer_from_env, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{IdPath, ValidatedJson};
