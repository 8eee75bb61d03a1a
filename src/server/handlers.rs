//! HTTP handlers, one per gateway operation.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use serde_json::json;

use super::error::{ApiError, OperationResultExt};
use super::extract::ApiQuery;
use crate::gateway::{
    AdvancedSearchQuery, AiringScheduleQuery, EpisodesQuery, GenreQuery, MetaGateway, PageQuery,
    ProviderQuery, RecentEpisodesQuery,
};
use crate::types::Payload;
use crate::version::version_string;

type Gateway = State<Arc<MetaGateway>>;
type ApiResult = Result<Json<Payload>, ApiError>;

pub async fn healthcheck() -> &'static str {
    "ok"
}

/// Route listing for `/meta/anilist`.
pub async fn intro() -> Json<Payload> {
    Json(json!({
        "intro": "Welcome to the anilist provider",
        "version": version_string(),
        "routes": [
            "/:query",
            "/info/:id",
            "/data/:id",
            "/episodes/:id",
            "/servers/:id",
            "/watch/:episodeId",
            "/character/:id",
            "/advanced-search",
            "/trending",
            "/popular",
            "/airing-schedule",
            "/genre",
            "/recent-episodes",
            "/random-anime",
        ],
    }))
}

pub async fn search(
    State(gateway): Gateway,
    Path(query): Path<String>,
    ApiQuery(page): ApiQuery<PageQuery>,
) -> ApiResult {
    gateway
        .search(&query, &page)
        .await
        .for_operation("search")
        .map(Json)
}

pub async fn advanced_search(
    State(gateway): Gateway,
    ApiQuery(query): ApiQuery<AdvancedSearchQuery>,
) -> ApiResult {
    gateway
        .advanced_search(&query)
        .await
        .for_operation("advanced search")
        .map(Json)
}

pub async fn trending(State(gateway): Gateway, ApiQuery(page): ApiQuery<PageQuery>) -> ApiResult {
    gateway
        .trending(&page)
        .await
        .for_operation("trending")
        .map(Json)
}

pub async fn popular(State(gateway): Gateway, ApiQuery(page): ApiQuery<PageQuery>) -> ApiResult {
    gateway
        .popular(&page)
        .await
        .for_operation("popular")
        .map(Json)
}

pub async fn airing_schedule(
    State(gateway): Gateway,
    ApiQuery(query): ApiQuery<AiringScheduleQuery>,
) -> ApiResult {
    gateway
        .airing_schedule(&query)
        .await
        .for_operation("airing schedule")
        .map(Json)
}

pub async fn genre(State(gateway): Gateway, ApiQuery(query): ApiQuery<GenreQuery>) -> ApiResult {
    gateway
        .genre(&query)
        .await
        .for_operation("genre")
        .map(Json)
}

pub async fn recent_episodes(
    State(gateway): Gateway,
    ApiQuery(query): ApiQuery<RecentEpisodesQuery>,
) -> ApiResult {
    gateway
        .recent_episodes(&query)
        .await
        .for_operation("recent episodes")
        .map(Json)
}

pub async fn random(State(gateway): Gateway) -> ApiResult {
    gateway.random().await.for_operation("random anime").map(Json)
}

pub async fn servers(
    State(gateway): Gateway,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<ProviderQuery>,
) -> ApiResult {
    gateway
        .servers(&id, &query)
        .await
        .for_operation("servers")
        .map(Json)
}

pub async fn episodes(
    State(gateway): Gateway,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<EpisodesQuery>,
) -> ApiResult {
    gateway
        .episodes(&id, &query)
        .await
        .for_operation("episodes")
        .map(Json)
}

pub async fn info(
    State(gateway): Gateway,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<EpisodesQuery>,
) -> ApiResult {
    gateway.info(&id, &query).await.for_operation("info").map(Json)
}

pub async fn data(State(gateway): Gateway, Path(id): Path<String>) -> ApiResult {
    gateway.data(&id).await.for_operation("data").map(Json)
}

pub async fn character(State(gateway): Gateway, Path(id): Path<String>) -> ApiResult {
    gateway
        .character(&id)
        .await
        .for_operation("character")
        .map(Json)
}

pub async fn watch(
    State(gateway): Gateway,
    Path(episode_id): Path<String>,
    ApiQuery(query): ApiQuery<ProviderQuery>,
) -> ApiResult {
    gateway
        .watch(&episode_id, &query)
        .await
        .for_operation("watch")
        .map(Json)
}
