//! # Stock Export Projection
//!
//! One inventory row as clients receive it. The projection applies the
//! export normalization policy:
//!
//! - `Subspecies`, `PlantDescription`, `StatusNote`: null becomes `""`
//!   (older clients crash on null for these).
//! - Currency columns: float or null, never zero-defaulted.
//! - Dates: `YYYY-MM-DD` or null; `Stamp`: `YYYY-MM-DD HH:MM:SS`.
//! - Free-text columns pass through [`sanitize`](crate::model::sanitize).
//! - Photo references/URLs and provenance columns stay null when absent.

use serde::{Deserialize, Serialize};

use super::sanitize::{sanitize_opt, sanitize_or_empty};

/// Column list matching [`StockExport::from_row`]. Shared by the export
/// query and the insert controller's post-insert read-back.
pub const EXPORT_COLUMNS: &str = "StockID, M_ID, F_ID, Family, Species, Subspecies, ThaiName, \
     NameConcat, TableName, StockQty, StockPrice, Mother, Website, PlantedStart, PlantedEnd, \
     PollinateDate, SeedsPlanted, SeedsHarvest, PlantStatus, Stamp, PlantDescription, StatusNote, \
     PurchasePrice, TotalValue, USD, EUR, Photo1, Photo2, Photo3, Photo4, PhotoLink1, PhotoLink2, \
     PhotoLink3, PhotoLink4, AddedBy, LastEditedBy, Weight, Grams, TraySize, TrayQty, Variegated";

/// Export projection of one stock row, post-normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockExport {
    #[serde(rename = "StockID")]
    pub stock_id: i64,
    #[serde(rename = "M_ID")]
    pub m_id: Option<i64>,
    #[serde(rename = "F_ID")]
    pub f_id: Option<i64>,
    #[serde(rename = "Family")]
    pub family: Option<String>,
    #[serde(rename = "Species")]
    pub species: Option<String>,
    #[serde(rename = "Subspecies")]
    pub subspecies: String,
    #[serde(rename = "ThaiName")]
    pub thai_name: Option<String>,
    #[serde(rename = "NameConcat")]
    pub name_concat: Option<String>,
    #[serde(rename = "TableName")]
    pub table_name: Option<String>,
    #[serde(rename = "StockQty")]
    pub stock_qty: Option<i64>,
    #[serde(rename = "StockPrice")]
    pub stock_price: Option<f64>,
    #[serde(rename = "Mother")]
    pub mother: i64,
    #[serde(rename = "Website")]
    pub website: i64,
    #[serde(rename = "PlantedStart")]
    pub planted_start: Option<String>,
    #[serde(rename = "PlantedEnd")]
    pub planted_end: Option<String>,
    #[serde(rename = "PollinateDate")]
    pub pollinate_date: Option<String>,
    #[serde(rename = "SeedsPlanted")]
    pub seeds_planted: Option<String>,
    #[serde(rename = "SeedsHarvest")]
    pub seeds_harvest: Option<String>,
    #[serde(rename = "PlantStatus")]
    pub plant_status: Option<String>,
    #[serde(rename = "Stamp")]
    pub stamp: String,
    #[serde(rename = "PlantDescription")]
    pub plant_description: String,
    #[serde(rename = "StatusNote")]
    pub status_note: String,
    #[serde(rename = "PurchasePrice")]
    pub purchase_price: Option<f64>,
    #[serde(rename = "TotalValue")]
    pub total_value: Option<f64>,
    #[serde(rename = "USD")]
    pub usd: Option<f64>,
    #[serde(rename = "EUR")]
    pub eur: Option<f64>,
    #[serde(rename = "Photo1")]
    pub photo1: Option<String>,
    #[serde(rename = "Photo2")]
    pub photo2: Option<String>,
    #[serde(rename = "Photo3")]
    pub photo3: Option<String>,
    #[serde(rename = "Photo4")]
    pub photo4: Option<String>,
    #[serde(rename = "PhotoLink1")]
    pub photo_link1: Option<String>,
    #[serde(rename = "PhotoLink2")]
    pub photo_link2: Option<String>,
    #[serde(rename = "PhotoLink3")]
    pub photo_link3: Option<String>,
    #[serde(rename = "PhotoLink4")]
    pub photo_link4: Option<String>,
    #[serde(rename = "AddedBy")]
    pub added_by: Option<String>,
    #[serde(rename = "LastEditedBy")]
    pub last_edited_by: Option<String>,
    #[serde(rename = "Weight")]
    pub weight: Option<i64>,
    #[serde(rename = "Grams")]
    pub grams: Option<i64>,
    #[serde(rename = "TraySize")]
    pub tray_size: Option<String>,
    #[serde(rename = "TrayQty")]
    pub tray_qty: Option<i64>,
    #[serde(rename = "Variegated")]
    pub variegated: i64,
}

impl StockExport {
    /// Build the normalized projection from a row selected with
    /// [`EXPORT_COLUMNS`].
    pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            stock_id: row.get("StockID")?,
            m_id: row.get("M_ID")?,
            f_id: row.get("F_ID")?,
            family: row.get("Family")?,
            species: row.get("Species")?,
            subspecies: row.get::<_, Option<String>>("Subspecies")?.unwrap_or_default(),
            thai_name: sanitize_opt(row.get("ThaiName")?),
            name_concat: sanitize_opt(row.get("NameConcat")?),
            table_name: sanitize_opt(row.get("TableName")?),
            stock_qty: row.get("StockQty")?,
            stock_price: row.get("StockPrice")?,
            mother: row.get("Mother")?,
            website: row.get("Website")?,
            planted_start: row.get("PlantedStart")?,
            planted_end: row.get("PlantedEnd")?,
            pollinate_date: row.get("PollinateDate")?,
            seeds_planted: row.get("SeedsPlanted")?,
            seeds_harvest: row.get("SeedsHarvest")?,
            plant_status: sanitize_opt(row.get("PlantStatus")?),
            stamp: row.get("Stamp")?,
            plant_description: sanitize_or_empty(row.get("PlantDescription")?),
            status_note: sanitize_or_empty(row.get("StatusNote")?),
            purchase_price: row.get("PurchasePrice")?,
            total_value: row.get("TotalValue")?,
            usd: row.get("USD")?,
            eur: row.get("EUR")?,
            photo1: sanitize_opt(row.get("Photo1")?),
            photo2: sanitize_opt(row.get("Photo2")?),
            photo3: sanitize_opt(row.get("Photo3")?),
            photo4: sanitize_opt(row.get("Photo4")?),
            photo_link1: sanitize_opt(row.get("PhotoLink1")?),
            photo_link2: sanitize_opt(row.get("PhotoLink2")?),
            photo_link3: sanitize_opt(row.get("PhotoLink3")?),
            photo_link4: sanitize_opt(row.get("PhotoLink4")?),
            added_by: sanitize_opt(row.get("AddedBy")?),
            last_edited_by: sanitize_opt(row.get("LastEditedBy")?),
            weight: row.get("Weight")?,
            grams: row.get("Grams")?,
            tray_size: sanitize_opt(row.get("TraySize")?),
            tray_qty: row.get("TrayQty")?,
            variegated: row.get("Variegated")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn sample_row_export(setup: &str) -> StockExport {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        conn.execute_batch(setup).unwrap();
        conn.query_row(
            &format!("SELECT {} FROM stock WHERE StockID = 1", EXPORT_COLUMNS),
            [],
            StockExport::from_row,
        )
        .unwrap()
    }

    #[test]
    fn test_null_defaulting_policy() {
        let export = sample_row_export(
            "INSERT INTO stock (StockID, Stamp) VALUES (1, '2024-01-01 00:00:00')",
        );

        // Text fields that older clients require to be non-null.
        assert_eq!(export.subspecies, "");
        assert_eq!(export.plant_description, "");
        assert_eq!(export.status_note, "");

        // Currency stays null, never zero.
        assert_eq!(export.stock_price, None);
        assert_eq!(export.usd, None);

        // Photo URLs and provenance stay null.
        assert_eq!(export.photo_link1, None);
        assert_eq!(export.added_by, None);
    }

    #[test]
    fn test_free_text_is_sanitized() {
        let export = sample_row_export(
            "INSERT INTO stock (StockID, NameConcat, PlantDescription, Stamp)
             VALUES (1, 'Hoya \u{0e44}\u{0e17}\u{0e22} carnosa', 'line1\nline2', '2024-01-01 00:00:00')",
        );
        assert_eq!(export.name_concat.as_deref(), Some("Hoya  carnosa"));
        assert_eq!(export.plant_description, "line1line2");
    }

    #[test]
    fn test_currency_and_flags_coerce() {
        let export = sample_row_export(
            "INSERT INTO stock (StockID, StockPrice, EUR, Mother, Website, Stamp)
             VALUES (1, 150, 3.75, 1, 0, '2024-01-01 00:00:00')",
        );
        assert_eq!(export.stock_price, Some(150.0));
        assert_eq!(export.eur, Some(3.75));
        assert_eq!(export.mother, 1);
        assert_eq!(export.website, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let export = sample_row_export(
            "INSERT INTO stock (StockID, Family, Stamp) VALUES (1, 'Orchidaceae', '2024-01-01 00:00:00')",
        );
        let json = serde_json::to_value(&export).unwrap();
        assert_eq!(json["StockID"], 1);
        assert_eq!(json["Family"], "Orchidaceae");
        assert_eq!(json["Stamp"], "2024-01-01 00:00:00");
        assert!(json["StockPrice"].is_null());
        assert_eq!(json["Subspecies"], "");
    }
}
