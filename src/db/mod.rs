//! # Database Adapter
//!
//! Connection pooling and schema bootstrap for the SQLite store.
//!
//! Every operation checks out its own connection from the pool and returns
//! it on drop, including on error paths. The only cross-request
//! coordination is what SQLite itself enforces: immediate transactions take
//! the single database write lock at BEGIN.

mod errors;
mod pool;
mod schema;

pub use errors::{DbError, DbResult};
pub use pool::{DbPool, PooledConnection};
pub use schema::ensure_schema;
