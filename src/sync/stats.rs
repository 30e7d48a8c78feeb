//! # Stats Reader
//!
//! Read-only projection of the precomputed aggregate rows. No mutation,
//! no locking beyond the database's default read isolation.

use super::errors::{SyncError, SyncResult};
use crate::db::DbPool;
use crate::model::{StatsExport, STATS_COLUMNS};

/// Read all stats rows.
///
/// An empty table is a [`SyncError::NotFound`], distinct from rows whose
/// aggregates happen to be zero.
pub fn read_stats(pool: &DbPool) -> SyncResult<Vec<StatsExport>> {
    let conn = pool.get()?;
    let mut stmt = conn.prepare(&format!("SELECT {} FROM stats", STATS_COLUMNS))?;
    let rows = stmt.query_map([], StatsExport::from_row)?;

    let mut stats = Vec::new();
    for row in rows {
        stats.push(row?);
    }

    if stats.is_empty() {
        return Err(SyncError::not_found("no stats found"));
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;
    use tempfile::TempDir;

    fn empty_pool() -> (TempDir, DbPool) {
        let dir = TempDir::new().unwrap();
        let pool = DbPool::open(dir.path().join("test.db")).unwrap();
        ensure_schema(&pool.get().unwrap()).unwrap();
        (dir, pool)
    }

    #[test]
    fn test_empty_table_is_not_found() {
        let (_dir, pool) = empty_pool();
        assert!(matches!(read_stats(&pool), Err(SyncError::NotFound(_))));
    }

    #[test]
    fn test_reads_all_rows() {
        let (_dir, pool) = empty_pool();
        let conn = pool.get().unwrap();
        conn.execute_batch(
            "INSERT INTO stats (Stamp, TotalRows, TotalValue, USD)
             VALUES ('2024-01-01 00:00:00', 420, 19250.5, 550.25);
             INSERT INTO stats (Stamp, TotalRows) VALUES ('2024-01-02 00:00:00', 421);",
        )
        .unwrap();
        drop(conn);

        let stats = read_stats(&pool).unwrap();
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].total_rows, Some(420));
        assert_eq!(stats[0].usd, Some(550.25));
        assert_eq!(stats[1].total_value, None);
    }
}
