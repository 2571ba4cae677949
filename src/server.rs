use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    config::Config,
    routes::{clear_cache_handler, health_handler, post_handler, posts_handler, CACHE_HIT_HEADER},
    state::AppState,
};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).init();
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring malformed allowed origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .expose_headers([
            HeaderName::from_static("x-content-timestamp"),
            HeaderName::from_static(CACHE_HIT_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60 * 24))
}

pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.allowed_origins);

    let blog: Router<Arc<AppState>> = Router::new()
        .route("/posts", get(posts_handler))
        .route("/post/{slug}", get(post_handler))
        .route("/cache/clear", post(clear_cache_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/blog", blog)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let state = AppState::new(config);
    info!(
        feed_url = state.feed_cache.feed_url(),
        ttl_secs = state.feed_cache.ttl().as_secs(),
        "Blog feed configured"
    );

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
