//! HTTP API: video streaming, catalog and semantic search.

mod error;
pub mod handlers;

pub use error::ErrorResponse;

use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::Result;
use crate::media::MediaResolver;
use crate::orchestrator::SearchOrchestrator;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only application state.
pub struct AppState {
    pub settings: Settings,
    pub catalog: Arc<Catalog>,
    pub resolver: MediaResolver,
    pub orchestrator: SearchOrchestrator,
}

impl AppState {
    /// Load the catalog and connect to the configured providers.
    pub async fn from_settings(settings: Settings) -> Result<Self> {
        let catalog = Arc::new(Catalog::load_or_empty(&settings.catalog_path()));
        let resolver = MediaResolver::new(settings.videos_path());
        let orchestrator = SearchOrchestrator::new(&settings, catalog.clone()).await?;

        Ok(Self {
            settings,
            catalog,
            resolver,
            orchestrator,
        })
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/stats", get(handlers::stats))
        .route("/videos", get(handlers::videos))
        .route("/video/{id}", get(handlers::video))
        .route("/video/{id}/info", get(handlers::video_info))
        .route("/video/{id}/metadata", get(handlers::video_metadata))
        .route("/video/{id}/thumbnail", get(handlers::thumbnail))
        .route("/video/{id}/subtitles", get(handlers::subtitles))
        .route("/video/{id}/summary", get(handlers::summary))
        .route("/search", post(handlers::search));

    with_middleware(routes).with_state(state)
}

/// Panic recovery, CORS, request ids and trace spans, innermost first.
fn with_middleware<S>(routes: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let trace = TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    });

    routes
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(trace)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Bind and serve until Ctrl+C.
pub async fn serve(host: &str, port: u16, state: Arc<AppState>) -> Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}
