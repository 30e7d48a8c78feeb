//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::auth_routes::auth_routes;
use super::config::ServerConfig;
use super::photo_routes::photo_routes;
use super::stats_routes::{health_routes, stats_routes};
use super::sync_routes::{sync_routes, SyncState};
use crate::db::DbPool;

/// HTTP server for the sync protocol
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with default configuration
    pub fn new(pool: DbPool) -> Self {
        Self::with_config(ServerConfig::default(), pool)
    }

    /// Create a new HTTP server with custom configuration
    pub fn with_config(config: ServerConfig, pool: DbPool) -> Self {
        let router = Self::build_router(&config, pool);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &ServerConfig, pool: DbPool) -> Router {
        let state = Arc::new(SyncState { pool });

        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            use tower_http::cors::AllowOrigin;
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes())
            .merge(sync_routes(state.clone()))
            .merge(stats_routes(state.clone()))
            .merge(auth_routes(state.clone()))
            .merge(photo_routes(state))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = %addr, "stocksync listening");
        axum::serve(listener, self.router).await
    }
}
