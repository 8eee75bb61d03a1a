use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use super::handlers;
use crate::gateway::MetaGateway;

/// Build the HTTP surface: one GET route per gateway operation under
/// `/meta/anilist`, plus `/healthcheck`.
pub fn create_router(gateway: Arc<MetaGateway>) -> Router {
    let anilist = Router::new()
        .route("/", get(handlers::intro))
        .route("/advanced-search", get(handlers::advanced_search))
        .route("/trending", get(handlers::trending))
        .route("/popular", get(handlers::popular))
        .route("/airing-schedule", get(handlers::airing_schedule))
        .route("/genre", get(handlers::genre))
        .route("/recent-episodes", get(handlers::recent_episodes))
        .route("/random-anime", get(handlers::random))
        .route("/servers/{id}", get(handlers::servers))
        .route("/episodes/{id}", get(handlers::episodes))
        .route("/info/{id}", get(handlers::info))
        .route("/data/{id}", get(handlers::data))
        .route("/character/{id}", get(handlers::character))
        .route("/watch/{episode_id}", get(handlers::watch))
        // free-text search is the catch-all single segment
        .route("/{query}", get(handlers::search))
        .with_state(gateway);

    Router::new()
        .nest("/meta/anilist", anilist)
        .route("/healthcheck", get(handlers::healthcheck))
}
