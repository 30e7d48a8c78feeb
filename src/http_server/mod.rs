//! # HTTP Server Module
//!
//! Axum transport for the sync protocol. Routers are composed per concern
//! and merged in [`server::HttpServer`].
//!
//! # Endpoints
//!
//! - `/rrhe`, `/rrhe/changes` - delta export
//! - `/rrhe/update`, `/rrhe/insert` - mutation paths
//! - `/stats` - aggregate reader
//! - `/login`, `/update_fcm_token` - credential surface
//! - `/update_photo_column` - file-relay callback
//! - `/health` - health check

pub mod auth_routes;
pub mod config;
pub mod photo_routes;
pub mod server;
pub mod stats_routes;
pub mod sync_routes;

pub use config::ServerConfig;
pub use server::HttpServer;
pub use sync_routes::SyncState;
