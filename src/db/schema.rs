//! # Schema Bootstrap
//!
//! Creates the `stock`, `stats`, and `users` tables. Idempotent; `init` and
//! `start` both call it.
//!
//! `Stamp` columns are TEXT in the canonical `YYYY-MM-DD HH:MM:SS` form so
//! that lexicographic comparison in SQL equals chronological comparison.
//! Date columns are TEXT `YYYY-MM-DD`. Currency columns are NUMERIC and
//! surface as floats on export.

use rusqlite::Connection;

use super::errors::DbResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS stock (
    StockID          INTEGER PRIMARY KEY,
    M_ID             INTEGER,
    F_ID             INTEGER,
    Family           TEXT,
    Species          TEXT,
    Subspecies       TEXT,
    ThaiName         TEXT,
    NameConcat       TEXT,
    TableName        TEXT,
    StockQty         INTEGER,
    StockPrice       NUMERIC,
    Mother           INTEGER NOT NULL DEFAULT 0,
    Website          INTEGER NOT NULL DEFAULT 0,
    PlantedStart     TEXT,
    PlantedEnd       TEXT,
    PollinateDate    TEXT,
    SeedsPlanted     TEXT,
    SeedsHarvest     TEXT,
    PlantStatus      TEXT,
    PlantDescription TEXT,
    StatusNote       TEXT,
    PurchasePrice    NUMERIC,
    TotalValue       NUMERIC,
    USD              NUMERIC,
    EUR              NUMERIC,
    Photo1           TEXT,
    Photo2           TEXT,
    Photo3           TEXT,
    Photo4           TEXT,
    PhotoLink1       TEXT,
    PhotoLink2       TEXT,
    PhotoLink3       TEXT,
    PhotoLink4       TEXT,
    AddedBy          TEXT,
    LastEditedBy     TEXT,
    Weight           INTEGER,
    Grams            INTEGER,
    TraySize         TEXT,
    TrayQty          INTEGER,
    Variegated       INTEGER NOT NULL DEFAULT 0,
    Stamp            TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_stock_stamp ON stock (Stamp, StockID);

CREATE TABLE IF NOT EXISTS stats (
    Stamp       TEXT,
    TotalRows   INTEGER,
    TotalPlants INTEGER,
    TotalNonM   INTEGER,
    TotalM      INTEGER,
    NonMValue   NUMERIC,
    MValue      NUMERIC,
    TotalValue  NUMERIC,
    WebPlants   INTEGER,
    WebQty      INTEGER,
    WebValue    NUMERIC,
    USD         NUMERIC,
    EUR         NUMERIC
);

CREATE TABLE IF NOT EXISTS users (
    user_id       INTEGER PRIMARY KEY AUTOINCREMENT,
    user_name     TEXT NOT NULL UNIQUE,
    salt          TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    lang_id       INTEGER,
    fcm_token     TEXT
);
";

/// Create all tables and indexes if they do not exist.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbPool;
    use tempfile::TempDir;

    #[test]
    fn test_schema_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let pool = DbPool::open(dir.path().join("test.db")).unwrap();
        let conn = pool.get().unwrap();

        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('stock', 'stats', 'users')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
