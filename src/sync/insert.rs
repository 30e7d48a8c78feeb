//! # Allocator + Insert Controller
//!
//! Allocates the next `StockID` and inserts the row in one immediate
//! transaction. The immediate transaction takes the database write lock at
//! BEGIN, so concurrent allocations serialize on the read-modify-write of
//! MAX(StockID): no two inserts ever observe the same identifier.
//!
//! Input normalization before insert: empty strings collapse to null,
//! flag fields coerce to 0/1, and a well-formed stamp is required.

use rusqlite::{named_params, TransactionBehavior};
use serde::Deserialize;

use super::errors::{SyncError, SyncResult};
use crate::db::DbPool;
use crate::model::{parse_stamp, wire, StockExport, EXPORT_COLUMNS};

/// Full field set for a new record. No identifier: allocation is the
/// controller's job.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockInsert {
    #[serde(rename = "Stamp")]
    pub stamp: Option<String>,
    #[serde(rename = "Family")]
    pub family: Option<String>,
    #[serde(rename = "Species")]
    pub species: Option<String>,
    #[serde(rename = "Subspecies")]
    pub subspecies: Option<String>,
    #[serde(rename = "NameConcat")]
    pub name_concat: Option<String>,
    #[serde(rename = "ThaiName")]
    pub thai_name: Option<String>,
    #[serde(rename = "TableName")]
    pub table_name: Option<String>,
    #[serde(rename = "M_ID")]
    pub m_id: Option<i64>,
    #[serde(rename = "F_ID")]
    pub f_id: Option<i64>,
    #[serde(rename = "StockQty")]
    pub stock_qty: Option<i64>,
    #[serde(rename = "StockPrice")]
    pub stock_price: Option<f64>,
    #[serde(rename = "PurchasePrice")]
    pub purchase_price: Option<f64>,
    #[serde(rename = "TotalValue")]
    pub total_value: Option<f64>,
    #[serde(rename = "USD")]
    pub usd: Option<f64>,
    #[serde(rename = "EUR")]
    pub eur: Option<f64>,
    #[serde(rename = "PlantDescription")]
    pub plant_description: Option<String>,
    #[serde(rename = "PlantStatus")]
    pub plant_status: Option<String>,
    #[serde(rename = "StatusNote")]
    pub status_note: Option<String>,
    #[serde(rename = "Mother", default, deserialize_with = "wire::flag_from_any")]
    pub mother: i64,
    #[serde(rename = "Website", default, deserialize_with = "wire::flag_from_any")]
    pub website: i64,
    #[serde(rename = "Variegated", default, deserialize_with = "wire::flag_from_any")]
    pub variegated: i64,
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
}

const INSERT_SQL: &str = "
INSERT INTO stock (
    StockID, M_ID, F_ID, Family, Species, Subspecies, ThaiName, NameConcat, TableName,
    StockQty, StockPrice, Mother, Website, PlantedStart, PlantedEnd, PollinateDate,
    SeedsPlanted, SeedsHarvest, PlantStatus, PlantDescription, StatusNote, PurchasePrice,
    TotalValue, USD, EUR, Photo1, Photo2, Photo3, Photo4, PhotoLink1, PhotoLink2,
    PhotoLink3, PhotoLink4, AddedBy, LastEditedBy, Weight, Grams, TraySize, TrayQty,
    Variegated, Stamp
) VALUES (
    :stock_id, :m_id, :f_id, :family, :species, :subspecies, :thai_name, :name_concat,
    :table_name, :stock_qty, :stock_price, :mother, :website, :planted_start, :planted_end,
    :pollinate_date, :seeds_planted, :seeds_harvest, :plant_status, :plant_description,
    :status_note, :purchase_price, :total_value, :usd, :eur, :photo1, :photo2, :photo3,
    :photo4, :photo_link1, :photo_link2, :photo_link3, :photo_link4, :added_by,
    :last_edited_by, :weight, :grams, :tray_size, :tray_qty, :variegated, :stamp
)";

/// Empty strings collapse to null before insert; "absent" and "explicit
/// empty string" are deliberately indistinguishable in storage.
fn normalized(value: &Option<String>) -> Option<&str> {
    match value.as_deref() {
        Some("") | None => None,
        Some(s) => Some(s),
    }
}

/// Allocate the next identifier and insert the row, returning the stored
/// record post-defaults.
pub fn insert_stock(pool: &DbPool, req: &StockInsert) -> SyncResult<StockExport> {
    let stamp_raw = req
        .stamp
        .as_deref()
        .ok_or_else(|| SyncError::validation("Stamp is required"))?;
    parse_stamp(stamp_raw).map_err(|_| {
        SyncError::validation("invalid Stamp format, expected yyyy-MM-dd HH:mm:ss")
    })?;

    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    // The write lock is held from here to commit; this read-modify-write
    // cannot interleave with another allocation.
    let max: Option<i64> = tx.query_row("SELECT MAX(StockID) FROM stock", [], |r| r.get(0))?;
    let stock_id = max.unwrap_or(0) + 1;
    tracing::debug!(stock_id, "allocated new StockID");

    tx.execute(
        INSERT_SQL,
        named_params! {
            ":stock_id": stock_id,
            ":m_id": req.m_id,
            ":f_id": req.f_id,
            ":family": normalized(&req.family),
            ":species": normalized(&req.species),
            ":subspecies": normalized(&req.subspecies),
            ":thai_name": normalized(&req.thai_name),
            ":name_concat": normalized(&req.name_concat),
            ":table_name": normalized(&req.table_name),
            ":stock_qty": req.stock_qty,
            ":stock_price": req.stock_price,
            ":mother": req.mother,
            ":website": req.website,
            ":planted_start": normalized(&req.planted_start),
            ":planted_end": normalized(&req.planted_end),
            ":pollinate_date": normalized(&req.pollinate_date),
            ":seeds_planted": normalized(&req.seeds_planted),
            ":seeds_harvest": normalized(&req.seeds_harvest),
            ":plant_status": normalized(&req.plant_status),
            ":plant_description": normalized(&req.plant_description),
            ":status_note": normalized(&req.status_note),
            ":purchase_price": req.purchase_price,
            ":total_value": req.total_value,
            ":usd": req.usd,
            ":eur": req.eur,
            ":photo1": normalized(&req.photo1),
            ":photo2": normalized(&req.photo2),
            ":photo3": normalized(&req.photo3),
            ":photo4": normalized(&req.photo4),
            ":photo_link1": normalized(&req.photo_link1),
            ":photo_link2": normalized(&req.photo_link2),
            ":photo_link3": normalized(&req.photo_link3),
            ":photo_link4": normalized(&req.photo_link4),
            ":added_by": normalized(&req.added_by),
            ":last_edited_by": normalized(&req.last_edited_by),
            ":weight": req.weight,
            ":grams": req.grams,
            ":tray_size": normalized(&req.tray_size),
            ":tray_qty": req.tray_qty,
            ":variegated": req.variegated,
            ":stamp": stamp_raw,
        },
    )?;

    let stored = tx.query_row(
        &format!("SELECT {} FROM stock WHERE StockID = ?1", EXPORT_COLUMNS),
        [stock_id],
        StockExport::from_row,
    )?;
    tx.commit()?;

    tracing::debug!(stock_id, "new stock inserted");
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_collapses_empty_strings() {
        assert_eq!(normalized(&Some("".to_string())), None);
        assert_eq!(normalized(&None), None);
        assert_eq!(normalized(&Some("ok".to_string())), Some("ok"));
    }

    #[test]
    fn test_flag_coercion_from_wire() {
        let parsed: StockInsert = serde_json::from_str(
            r#"{"Stamp": "2024-01-01 00:00:00", "Mother": true, "Variegated": 1}"#,
        )
        .unwrap();
        assert_eq!(parsed.mother, 1);
        assert_eq!(parsed.website, 0);
        assert_eq!(parsed.variegated, 1);
    }
}
