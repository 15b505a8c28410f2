//! API Server - HTTP server for the forms REST API

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::handlers::{self, AppState};
use crate::forms::FormManager;

/// API Server configuration
pub struct ApiServer {
    state: Arc<AppState>,
    addr: String,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(forms: FormManager, addr: String) -> Self {
        Self {
            state: Arc::new(AppState { forms }),
            addr,
        }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Start the API server
    pub async fn run(&self) -> std::io::Result<()> {
        let router = self.router();

        info!("Starting API server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

/// Build the router over shared state
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/forms",
            get(handlers::list_forms).post(handlers::create_form),
        )
        .route(
            "/forms/:id",
            get(handlers::get_form)
                .put(handlers::update_form)
                .delete(handlers::delete_form),
        )
        .route("/forms/:id/duplicate", post(handlers::duplicate_form))
        .route("/forms/:id/visibility", post(handlers::form_visibility))
        .route("/forms/:id/notifications", post(handlers::form_notifications))
        .route("/forms/:id/render", get(handlers::render_form))
        .route("/embed", get(handlers::render_embed));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
