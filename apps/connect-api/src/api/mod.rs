use axum::Router;

pub mod events;
pub mod health;

/// API routes without the `/api` prefix; `create_router` adds it.
///
/// Sub-routers have their state applied, so the result is stateless.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new().nest(domain_events::entity::Model::URL, events::router(state))
}

/// `/ready`, with real dependency checks.
///
/// Merged next to the stateless app router returned by `create_router`.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
