//! # Sync Protocol Core
//!
//! The incremental change-sync protocol: streaming delta export, the
//! optimistic-concurrency update path, the write-lock-serialized
//! identifier allocator, the stats reader, and the photo-URL callback
//! consumed by the file relay.

mod errors;
mod export;
mod insert;
mod photo;
mod stats;
mod update;

pub use errors::{ErrorResponse, SyncError, SyncResult};
pub use export::{collect_changes, export_body};
pub use insert::{insert_stock, StockInsert};
pub use photo::set_photo_url;
pub use stats::read_stats;
pub use update::{update_stock, StockUpdate};
