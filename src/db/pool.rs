//! # Connection Pool
//!
//! A database session is scoped to one logical operation: callers borrow a
//! connection on entry and it is returned on exit, including on error, via
//! the [`PooledConnection`] drop guard.
//!
//! Connections are created lazily. An empty pool opens a fresh connection
//! rather than blocking, so concurrency is bounded by SQLite's own locking
//! and not by the pool.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;

use super::errors::{DbError, DbResult};

/// Writers queue on SQLite's database write lock instead of failing fast.
/// No operation timeout policy exists; this is the largest wait the busy
/// handler accepts.
const BUSY_WAIT: Duration = Duration::from_millis(i32::MAX as u64);

/// Shared handle to the connection pool. Cheap to clone.
#[derive(Clone)]
pub struct DbPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    path: PathBuf,
    idle: Mutex<Vec<Connection>>,
}

impl DbPool {
    /// Open a pool against the database file at `path`.
    ///
    /// Opens one connection eagerly so configuration errors surface at
    /// startup rather than on the first request.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        let path = path.as_ref().to_path_buf();
        let first = connect(&path)?;
        Ok(Self {
            inner: Arc::new(PoolInner {
                path,
                idle: Mutex::new(vec![first]),
            }),
        })
    }

    /// Check out a connection. Returned to the pool when the guard drops.
    pub fn get(&self) -> DbResult<PooledConnection> {
        let reused = {
            let mut idle = self
                .inner
                .idle
                .lock()
                .map_err(|_| DbError::Connection("pool mutex poisoned".to_string()))?;
            idle.pop()
        };

        let conn = match reused {
            Some(conn) => conn,
            None => connect(&self.inner.path)?,
        };

        Ok(PooledConnection {
            conn: Some(conn),
            pool: Arc::clone(&self.inner),
        })
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }
}

/// Open and configure one connection.
fn connect(path: &Path) -> DbResult<Connection> {
    let conn = Connection::open(path)
        .map_err(|e| DbError::Connection(format!("{}: {}", path.display(), e)))?;

    conn.busy_timeout(BUSY_WAIT)?;
    // WAL keeps the export's read cursor unblocked by concurrent writers.
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;

    Ok(conn)
}

/// Checked-out connection; returns itself to the pool on drop.
pub struct PooledConnection {
    conn: Option<Connection>,
    pool: Arc<PoolInner>,
}

impl std::ops::Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("connection present until drop")
    }
}

impl std::ops::DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Connection {
        self.conn.as_mut().expect("connection present until drop")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Ok(mut idle) = self.pool.idle.lock() {
                idle.push(conn);
            }
            // A poisoned mutex drops the connection instead; the next
            // checkout opens a fresh one.
        }
    }
}
