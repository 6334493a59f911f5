use crate::handlers::{self, ApiState};
use anyhow::Result;
use axum::{routing::get, Router};
use funding_data::Repositories;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Read-only query API over the funding-rate store.
pub struct ApiServer {
    state: ApiState,
}

impl ApiServer {
    #[must_use]
    pub fn new(repos: Repositories) -> Self {
        Self {
            state: ApiState { repos },
        }
    }

    /// Builds the router with all API routes.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/venues", get(handlers::list_venues))
            .route("/api/history", get(handlers::list_history))
            .route("/api/history/latest", get(handlers::latest_history))
            .route("/api/history/stats", get(handlers::history_stats))
            .route("/api/online", get(handlers::list_online))
            .route("/api/online/latest", get(handlers::latest_online))
            .route("/api/online/stats", get(handlers::online_stats))
            .with_state(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Binds and serves until the process exits.
    ///
    /// # Errors
    /// Returns an error if binding or serving fails.
    pub async fn serve(&self, addr: &str) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Query API listening on {}", addr);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}
