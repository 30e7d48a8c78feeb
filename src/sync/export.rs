//! # Delta Export Encoder
//!
//! Streams every stock row whose `Stamp` is strictly greater than the
//! client-supplied bound, as one JSON array, ordered by `(Stamp, StockID)`
//! so re-exports are deterministic and resumable.
//!
//! The encoder is lazy: a blocking task walks the cursor and feeds framed
//! chunks through a bounded channel, so emission begins before the result
//! set is materialized and memory stays bounded. A row that fails to
//! decode or serialize is logged and skipped; the stream always closes the
//! array, and end-of-stream is the only success signal clients get. If the
//! client disconnects, the channel closes and the feeder stops; the cursor
//! and connection are released on every exit path.

use std::convert::Infallible;

use axum::body::{Body, Bytes};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use tokio::sync::mpsc;

use super::errors::{SyncError, SyncResult};
use crate::db::{DbError, DbPool, PooledConnection};
use crate::model::{format_stamp, StockExport, EXPORT_COLUMNS};

/// Chunks buffered between the cursor walk and the HTTP body.
const CHANNEL_CAPACITY: usize = 32;

fn changes_sql() -> String {
    format!(
        "SELECT {} FROM stock WHERE Stamp > ?1 ORDER BY Stamp, StockID",
        EXPORT_COLUMNS
    )
}

/// Collect all changed rows since `since` into memory.
///
/// The streaming path goes through [`export_body`]; this variant backs the
/// places where the full set is wanted at once (tests, tooling).
pub fn collect_changes(pool: &DbPool, since: &NaiveDateTime) -> SyncResult<Vec<StockExport>> {
    let conn = pool.get()?;
    let mut records = Vec::new();
    for_each_change(&conn, since, |record| {
        records.push(record);
        true
    })?;
    Ok(records)
}

/// Walk the delta cursor, applying the export policy row by row.
///
/// `emit` returns false to stop early (receiver hung up). Rows that fail
/// to decode are logged with their identifier and skipped.
fn for_each_change(
    conn: &Connection,
    since: &NaiveDateTime,
    mut emit: impl FnMut(StockExport) -> bool,
) -> SyncResult<()> {
    let sql = changes_sql();
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params![format_stamp(since)])?;

    while let Some(row) = rows.next()? {
        match StockExport::from_row(row) {
            Ok(record) => {
                if !emit(record) {
                    break;
                }
            }
            Err(err) => {
                let stock_id: i64 = row.get("StockID").unwrap_or(-1);
                tracing::error!(stock_id, error = %err, "skipping row that failed to decode");
            }
        }
    }
    Ok(())
}

/// Blocking feeder: frames records into a JSON array and pushes chunks
/// into the channel until the scan ends or the receiver goes away.
fn stream_into(
    conn: PooledConnection,
    since: NaiveDateTime,
    tx: mpsc::Sender<Result<Bytes, Infallible>>,
) {
    let send = |chunk: String| tx.blocking_send(Ok(Bytes::from(chunk))).is_ok();

    if !send("[".to_string()) {
        return;
    }

    let mut first = true;
    let result = for_each_change(&conn, &since, |record| {
        match serde_json::to_string(&record) {
            Ok(json) => {
                let chunk = if first {
                    first = false;
                    json
                } else {
                    format!(",{}", json)
                };
                send(chunk)
            }
            Err(err) => {
                tracing::error!(
                    stock_id = record.stock_id,
                    record = ?record,
                    error = %err,
                    "skipping record that failed to serialize"
                );
                true
            }
        }
    });

    if let Err(err) = result {
        // The status line is long gone; close the array validly and leave
        // the failure in the log.
        tracing::error!(error = %err, "export scan aborted mid-stream");
    }

    let _ = tx.blocking_send(Ok(Bytes::from("]")));
}

/// Build the streamed response body for a delta export.
///
/// The connection is checked out before the body is constructed so pool
/// failures still surface as a 500 instead of a broken stream.
pub async fn export_body(pool: &DbPool, since: NaiveDateTime) -> SyncResult<Body> {
    let pool = pool.clone();
    let conn = tokio::task::spawn_blocking(move || pool.get())
        .await
        .map_err(|e| SyncError::Persistence(DbError::Worker(e.to_string())))??;

    let (tx, rx) = mpsc::channel::<Result<Bytes, Infallible>>(CHANNEL_CAPACITY);
    tokio::task::spawn_blocking(move || stream_into(conn, since, tx));

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    });
    Ok(Body::from_stream(stream))
}
