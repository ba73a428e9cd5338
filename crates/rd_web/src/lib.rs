use axum::{middleware, routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod error;
pub mod handlers;
pub mod state;

pub use error::{ApiError, ErrorBody};
pub use state::{ApiKey, AppState};

pub fn create_app(state: AppState) -> Router {
    let state = Arc::new(state);
    let cors = CorsLayer::permissive();

    let articles = Router::new()
        .route("/subreddit/list", get(handlers::default_subreddit_list))
        .route("/subreddit/random", get(handlers::default_subreddit_random))
        .route("/subreddit/list/:subreddit", get(handlers::subreddit_list))
        .route("/subreddit/random/:subreddit", get(handlers::subreddit_random))
        .route("/user/list/:username", get(handlers::user_list))
        .route("/user/random/:username", get(handlers::user_random))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key));

    Router::new()
        .route("/healthz", get(handlers::healthz))
        .merge(articles)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn serve(
    addr: SocketAddr,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let auth = if state.api_key.is_some() { "enabled" } else { "disabled" };
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        "🚀 Listening on http://{} (upstream: {}, API key: {})",
        listener.local_addr()?,
        state.query.source_name(),
        auth
    );
    axum::serve(listener, create_app(state).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await
}

pub mod prelude {
    pub use rd_core::{Article, ArticleList, Error, Result};
    pub use crate::{create_app, AppState};
}
