//! stocksync - incremental change-sync server for a stock inventory
//!
//! The core is the sync protocol: streaming delta export of inventory rows
//! changed since a client-supplied stamp, an optimistic-concurrency update
//! path, and a write-lock-serialized identifier allocator.

pub mod auth;
pub mod cli;
pub mod db;
pub mod http_server;
pub mod model;
pub mod sync;
