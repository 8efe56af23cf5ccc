//! Readiness check against the database.

use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};
use database::postgres::check_health;

pub async fn ready_handler(State(state): State<AppState>) -> impl IntoResponse {
    let checks: Vec<(&str, HealthCheckFuture<'_>)> = vec![(
        "database",
        Box::pin(async {
            check_health(&state.db)
                .await
                .map_err(|e| format!("Database check failed: {}", e))
        }),
    )];

    run_health_checks(checks).await
}
