//! # Stats Projection
//!
//! Precomputed aggregates over the stock table, maintained by an external
//! aggregation process. Read-only here.

use serde::{Deserialize, Serialize};

/// Column list matching [`StatsExport::from_row`].
pub(crate) const STATS_COLUMNS: &str = "Stamp, TotalRows, TotalPlants, TotalNonM, TotalM, \
     NonMValue, MValue, TotalValue, WebPlants, WebQty, WebValue, USD, EUR";

/// One aggregate row as clients receive it. Currency sums export as float
/// or null, counts as integer or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsExport {
    #[serde(rename = "Stamp")]
    pub stamp: Option<String>,
    #[serde(rename = "TotalRows")]
    pub total_rows: Option<i64>,
    #[serde(rename = "TotalPlants")]
    pub total_plants: Option<i64>,
    #[serde(rename = "TotalNonM")]
    pub total_non_m: Option<i64>,
    #[serde(rename = "TotalM")]
    pub total_m: Option<i64>,
    #[serde(rename = "NonMValue")]
    pub non_m_value: Option<f64>,
    #[serde(rename = "MValue")]
    pub m_value: Option<f64>,
    #[serde(rename = "TotalValue")]
    pub total_value: Option<f64>,
    #[serde(rename = "WebPlants")]
    pub web_plants: Option<i64>,
    #[serde(rename = "WebQty")]
    pub web_qty: Option<i64>,
    #[serde(rename = "WebValue")]
    pub web_value: Option<f64>,
    #[serde(rename = "USD")]
    pub usd: Option<f64>,
    #[serde(rename = "EUR")]
    pub eur: Option<f64>,
}

impl StatsExport {
    /// Build the projection from a row selected with [`STATS_COLUMNS`].
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            stamp: row.get("Stamp")?,
            total_rows: row.get("TotalRows")?,
            total_plants: row.get("TotalPlants")?,
            total_non_m: row.get("TotalNonM")?,
            total_m: row.get("TotalM")?,
            non_m_value: row.get("NonMValue")?,
            m_value: row.get("MValue")?,
            total_value: row.get("TotalValue")?,
            web_plants: row.get("WebPlants")?,
            web_qty: row.get("WebQty")?,
            web_value: row.get("WebValue")?,
            usd: row.get("USD")?,
            eur: row.get("EUR")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_zero_valued_row_is_not_null() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO stats (Stamp, TotalRows, TotalValue)
             VALUES ('2024-01-01 00:00:00', 0, 0)",
        )
        .unwrap();

        let stats = conn
            .query_row(
                &format!("SELECT {} FROM stats", STATS_COLUMNS),
                [],
                StatsExport::from_row,
            )
            .unwrap();

        assert_eq!(stats.total_rows, Some(0));
        assert_eq!(stats.total_value, Some(0.0));
        assert_eq!(stats.usd, None);
    }
}
