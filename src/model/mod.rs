//! # Domain Model
//!
//! The stock export projection with its per-field normalization policy,
//! the stats projection, stamp parsing/formatting, and the sanitize step
//! applied to free-text fields on export.

mod sanitize;
mod stamp;
mod stats;
mod stock;
pub(crate) mod wire;

pub use sanitize::sanitize;
pub use stamp::{epoch, format_stamp, parse_stamp, parse_sync_bound, EPOCH_SENTINEL, STAMP_FORMAT};
pub use stats::StatsExport;
pub(crate) use stats::STATS_COLUMNS;
pub use stock::{StockExport, EXPORT_COLUMNS};
