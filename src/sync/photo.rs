//! # Photo-URL Callback
//!
//! Targeted single-column update invoked by the file relay after it stores
//! an uploaded photo (or deletes one; a null URL clears the column).
//!
//! Photo placement does not rewrite `Stamp`: the relay owns these columns
//! and they do not participate in delta sync.

use rusqlite::params;

use super::errors::{SyncError, SyncResult};
use crate::db::DbPool;

/// Set or clear one of the four photo columns for a stock row.
///
/// The column name is chosen from a fixed match on the index; caller input
/// is never interpolated into SQL.
pub fn set_photo_url(
    pool: &DbPool,
    stock_id: i64,
    photo_index: i64,
    photo_url: Option<&str>,
) -> SyncResult<()> {
    let column = match photo_index {
        1 => "Photo1",
        2 => "Photo2",
        3 => "Photo3",
        4 => "Photo4",
        _ => {
            return Err(SyncError::validation(
                "photoIndex must be between 1 and 4",
            ))
        }
    };

    let conn = pool.get()?;
    let affected = conn.execute(
        &format!("UPDATE stock SET {} = ?1 WHERE StockID = ?2", column),
        params![photo_url, stock_id],
    )?;

    if affected == 0 {
        return Err(SyncError::not_found(format!(
            "no stock with StockID {}",
            stock_id
        )));
    }

    tracing::debug!(stock_id, column, cleared = photo_url.is_none(), "photo column updated");
    Ok(())
}
