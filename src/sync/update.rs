//! # Optimistic Update Controller
//!
//! Last-write-wins arbitration keyed on the submitted stamp against the
//! stored one, not on wall-clock arrival order. Clients must supply
//! monotonically increasing stamps per record to make progress.
//!
//! The read-compare-write runs inside one immediate transaction, so two
//! racing updates cannot interleave between the stamp read and the write.

use rusqlite::{named_params, OptionalExtension, TransactionBehavior};
use serde::Deserialize;

use super::errors::{SyncError, SyncResult};
use crate::db::{DbError, DbPool};
use crate::model::{parse_stamp, wire};

/// Full mutable field set for an update, plus the identifier and the new
/// stamp. Photo reference columns and weights are not mutable on this
/// path; photo placement belongs to the file-relay callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StockUpdate {
    #[serde(rename = "StockID", default, deserialize_with = "wire::opt_id_from_any")]
    pub stock_id: Option<i64>,
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
    #[serde(rename = "TraySize")]
    pub tray_size: Option<String>,
    #[serde(rename = "Grams")]
    pub grams: Option<i64>,
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
}

const UPDATE_SQL: &str = "
UPDATE stock SET
    Family = :family, Species = :species, Subspecies = :subspecies,
    NameConcat = :name_concat, ThaiName = :thai_name, TableName = :table_name,
    M_ID = :m_id, F_ID = :f_id,
    StockQty = :stock_qty, StockPrice = :stock_price, PurchasePrice = :purchase_price,
    TotalValue = :total_value, USD = :usd, EUR = :eur,
    PlantDescription = :plant_description, PlantStatus = :plant_status,
    StatusNote = :status_note,
    Mother = :mother, Website = :website,
    PlantedStart = :planted_start, PlantedEnd = :planted_end,
    PollinateDate = :pollinate_date, SeedsPlanted = :seeds_planted,
    SeedsHarvest = :seeds_harvest,
    TraySize = :tray_size, Grams = :grams,
    PhotoLink1 = :photo_link1, PhotoLink2 = :photo_link2,
    PhotoLink3 = :photo_link3, PhotoLink4 = :photo_link4,
    AddedBy = :added_by, LastEditedBy = :last_edited_by,
    Stamp = :stamp
WHERE StockID = :stock_id";

/// Apply an update if the submitted stamp is newer than the stored one.
///
/// All-or-nothing: a partial column write never becomes visible. Exactly
/// one row is affected on success.
pub fn update_stock(pool: &DbPool, req: &StockUpdate) -> SyncResult<()> {
    let stock_id = req
        .stock_id
        .ok_or_else(|| SyncError::validation("StockID and Stamp are required"))?;
    let stamp_raw = req
        .stamp
        .as_deref()
        .ok_or_else(|| SyncError::validation("StockID and Stamp are required"))?;
    let incoming = parse_stamp(stamp_raw).map_err(|_| {
        SyncError::validation("invalid Stamp format, expected yyyy-MM-dd HH:mm:ss")
    })?;

    tracing::debug!(stock_id, stamp = stamp_raw, "received update request");

    let mut conn = pool.get()?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let stored: Option<String> = tx
        .query_row("SELECT Stamp FROM stock WHERE StockID = ?1", [stock_id], |r| r.get(0))
        .optional()?;
    let stored =
        stored.ok_or_else(|| SyncError::not_found(format!("no stock with StockID {}", stock_id)))?;
    let current = parse_stamp(&stored).map_err(|_| {
        SyncError::Persistence(DbError::corrupt(format!(
            "stock {} has unparseable stamp {:?}",
            stock_id, stored
        )))
    })?;

    if current >= incoming {
        // Stale write; the transaction rolls back on drop without touching
        // the row.
        return Err(SyncError::Conflict);
    }

    tx.execute(
        UPDATE_SQL,
        named_params! {
            ":stock_id": stock_id,
            ":family": req.family,
            ":species": req.species,
            ":subspecies": req.subspecies,
            ":name_concat": req.name_concat,
            ":thai_name": req.thai_name,
            ":table_name": req.table_name,
            ":m_id": req.m_id,
            ":f_id": req.f_id,
            ":stock_qty": req.stock_qty,
            ":stock_price": req.stock_price,
            ":purchase_price": req.purchase_price,
            ":total_value": req.total_value,
            ":usd": req.usd,
            ":eur": req.eur,
            ":plant_description": req.plant_description,
            ":plant_status": req.plant_status,
            ":status_note": req.status_note,
            ":mother": req.mother,
            ":website": req.website,
            ":planted_start": req.planted_start,
            ":planted_end": req.planted_end,
            ":pollinate_date": req.pollinate_date,
            ":seeds_planted": req.seeds_planted,
            ":seeds_harvest": req.seeds_harvest,
            ":tray_size": req.tray_size,
            ":grams": req.grams,
            ":photo_link1": req.photo_link1,
            ":photo_link2": req.photo_link2,
            ":photo_link3": req.photo_link3,
            ":photo_link4": req.photo_link4,
            ":added_by": req.added_by,
            ":last_edited_by": req.last_edited_by,
            ":stamp": stamp_raw,
        },
    )?;
    tx.commit()?;

    tracing::debug!(stock_id, "stock updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_identifier_is_validation_error() {
        // No database behind this pool path is ever touched.
        let req = StockUpdate {
            stamp: Some("2024-01-01 00:00:00".to_string()),
            ..Default::default()
        };
        assert!(req.stock_id.is_none());

        let parsed: StockUpdate =
            serde_json::from_str(r#"{"Stamp": "2024-01-01 00:00:00"}"#).unwrap();
        assert!(parsed.stock_id.is_none());
    }

    #[test]
    fn test_wire_field_names() {
        let parsed: StockUpdate = serde_json::from_str(
            r#"{"StockID": 7, "Stamp": "2024-01-01 00:00:00", "M_ID": 3,
                "Mother": true, "Website": 0, "StockPrice": 12.5}"#,
        )
        .unwrap();
        assert_eq!(parsed.stock_id, Some(7));
        assert_eq!(parsed.m_id, Some(3));
        assert_eq!(parsed.mother, 1);
        assert_eq!(parsed.website, 0);
        assert_eq!(parsed.stock_price, Some(12.5));
    }
}
