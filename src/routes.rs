use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    cache::FetchedPosts, error::BlogError, post::FeedPost, state::AppState, utils::iso_timestamp,
};

pub const CACHE_HIT_HEADER: &str = "x-cache-hit";

#[derive(Deserialize)]
pub struct PostsQuery {
    refresh: Option<String>,
}

#[derive(Serialize)]
pub struct PostsResponse {
    pub posts: Vec<FeedPost>,
    pub count: usize,
    pub cached: bool,
    pub timestamp: String,
}

pub async fn posts_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PostsQuery>,
) -> Result<impl IntoResponse, BlogError> {
    let force_refresh = query.refresh.as_deref() == Some("true");
    let FetchedPosts { posts, cached } = state.feed_cache.fetch_posts(force_refresh).await?;

    let cache_hit = if cached { "true" } else { "false" };
    let body = PostsResponse {
        count: posts.len(),
        posts,
        cached,
        timestamp: iso_timestamp(),
    };

    Ok(([(CACHE_HIT_HEADER, cache_hit)], Json(body)))
}

pub async fn post_handler(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<FeedPost>, BlogError> {
    let post = state.feed_cache.fetch_post_by_slug(&slug).await?;

    Ok(Json(post))
}

pub async fn clear_cache_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.feed_cache.clear_cache();

    (
        StatusCode::OK,
        Json(json!({ "message": "Cache cleared successfully" })),
    )
}

/// `uptime` is in seconds since the state was built.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": iso_timestamp(),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}
