use axum_helpers::server::{close_postgres, create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation so startup errors are reported with color-eyre
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name)
        .await
        .map_err(|e| eyre::eyre!("Migrations failed: {}", e))?;

    let state = AppState { config, db };

    let api_routes = api::routes(&state);

    // Docs, /api nesting, fallback and middleware
    let router = create_router::<openapi::ApiDoc>(api_routes)?;

    // /health: liveness with name/version, /ready: database check
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        address = %state.config.server.address(),
        shutdown_timeout_secs = state.config.server.shutdown_timeout.as_secs(),
        "Starting Connect API"
    );

    let server_config = state.config.server.clone();
    create_production_app(app, &server_config, close_postgres(state.db))
        .await
        .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Connect API shutdown complete");
    Ok(())
}
