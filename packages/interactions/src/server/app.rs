//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::domains::interactions::InteractionResolver;
use crate::kernel::{
    DefaultInteractionUrl, InMemoryInteractionStore, InteractionDeps, RouteUrlBuilder,
    TracingEventSink,
};
use crate::server::routes::{authorization_handler, health_handler, interaction_handler};
use crate::Config;

/// How often expired interaction sessions are purged
const STORE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<InteractionResolver>,
    /// Redirect URIs that may receive error redirects
    pub client_redirect_uris: Arc<Vec<String>>,
}

/// Wire the default collaborators for a configuration
///
/// Starts the store cleanup task, so this must run inside a Tokio runtime.
pub fn build_state(config: &Config) -> Result<AppState> {
    let interactions = Arc::new(config.interactions()?);

    let store = InMemoryInteractionStore::new();
    store.spawn_cleanup(STORE_CLEANUP_INTERVAL);

    let urls = RouteUrlBuilder::with_default_routes(config.issuer.clone());
    let deps = InteractionDeps::new(
        Arc::new(store),
        Arc::new(TracingEventSink),
        Arc::new(urls.clone()),
        Arc::new(DefaultInteractionUrl::new(urls)),
    );

    Ok(AppState {
        resolver: Arc::new(InteractionResolver::new(interactions, deps)),
        client_redirect_uris: Arc::new(config.client_redirect_uris.clone()),
    })
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/auth", get(authorization_handler))
        .route("/interaction/:uid", get(interaction_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
