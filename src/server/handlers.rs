//! Route handlers.

use super::AppState;
use crate::error::{ErrorKind, Result, VidlibError};
use crate::media::{MediaFile, StreamPlan};
use crate::orchestrator::SearchResponse;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

const THUMBNAIL_PLACEHOLDER: &str = r##"<svg width="320" height="180" xmlns="http://www.w3.org/2000/svg">
  <rect width="320" height="180" fill="#374151"/>
  <text x="160" y="90" text-anchor="middle" fill="white" font-family="Arial" font-size="24">&#127909;</text>
</svg>"##;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub index_name: String,
    pub total_vectors: u64,
    pub dimension: u32,
    pub model: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct VideoQuery {
    pub quality: Option<String>,
}

fn no_cache_headers(content_type: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-store, must-revalidate"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
    headers
}

fn range_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::RANGE).and_then(|v| v.to_str().ok())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "API is running".to_string(),
    })
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsResponse>> {
    let stats = state.orchestrator.index_stats().await?;
    Ok(Json(StatsResponse {
        index_name: stats.index_name,
        total_vectors: stats.total_vectors,
        dimension: stats.dimension,
        model: state.orchestrator.embedding_model().to_string(),
    }))
}

pub async fn videos(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "public, max-age=300")],
        Json(state.catalog.raw().clone()),
    )
}

pub async fn video(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<VideoQuery>,
    headers: HeaderMap,
) -> Result<Response> {
    let path = state
        .resolver
        .resolve_video(&id, params.quality.as_deref())
        .await?;
    let file = MediaFile::open(&path).await?;
    let plan = StreamPlan::from_header(range_header(&headers), file.size());
    debug!(id = %id, ?plan, "Serving video");

    let mut extra = HeaderMap::new();
    extra.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    extra.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    );
    extra.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    extra.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));

    let preload = format!(
        "</video/{id}/thumbnail>; rel=preload; as=image, \
         </video/{id}/subtitles>; rel=preload; as=fetch, \
         </video/{id}/summary>; rel=preload; as=fetch"
    );
    if let Ok(value) = HeaderValue::from_str(&preload) {
        extra.insert(header::LINK, value);
    }

    file.respond(plan, extra).await
}

pub async fn video_info(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let info = state.resolver.video_info(&id).await?;
    Ok(Json(info).into_response())
}

pub async fn video_metadata(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let metadata = state.resolver.video_metadata(&id).await?;
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=3600")],
        Json(metadata),
    )
        .into_response())
}

pub async fn thumbnail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    match state.resolver.resolve_thumbnail(&id).await {
        Ok(path) => {
            let file = MediaFile::open(&path).await?;
            let plan = StreamPlan::from_header(range_header(&headers), file.size());
            file.respond(plan, no_cache_headers("image/jpeg")).await
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(id = %id, "No thumbnail, serving placeholder");
            Ok((
                StatusCode::OK,
                no_cache_headers("image/svg+xml"),
                THUMBNAIL_PLACEHOLDER,
            )
                .into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn subtitles(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let path = state.resolver.resolve_subtitles(&id).await?;
    let content = tokio::fs::read(&path).await?;
    Ok((no_cache_headers("text/vtt; charset=utf-8"), content).into_response())
}

pub async fn summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let content = state.resolver.read_summary(&id).await?;
    Ok((no_cache_headers("text/plain; charset=utf-8"), content).into_response())
}

/// Run a search. A missing or non-positive `top_k` uses the configured default.
pub async fn search(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        VidlibError::InvalidInput(format!("Query required: {}", rejection.body_text()))
    })?;

    let top_k = match request.top_k {
        Some(k) if k > 0 => k,
        _ => state.orchestrator.limits().default_top_k as i64,
    };

    let response = state.orchestrator.search(&request.query, top_k).await?;
    Ok(Json(response))
}
