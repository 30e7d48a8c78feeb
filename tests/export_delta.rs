//! Delta Export Invariant Tests
//!
//! - Exactly the rows with `Stamp > T` appear for bound `T`, and only those
//! - The epoch sentinel returns the full table
//! - Re-export with no intervening writes is idempotent
//! - Output order is `(Stamp, StockID)`
//! - The per-field normalization policy holds end to end

use stocksync::db::{ensure_schema, DbPool};
use stocksync::model::{epoch, parse_sync_bound};
use stocksync::sync::{collect_changes, insert_stock, StockInsert};
use tempfile::TempDir;

// =============================================================================
// Test Utilities
// =============================================================================

fn temp_pool() -> (TempDir, DbPool) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pool = DbPool::open(dir.path().join("stock.db")).unwrap();
    ensure_schema(&pool.get().unwrap()).unwrap();
    (dir, pool)
}

fn seed(pool: &DbPool, family: &str, stamp: &str) -> i64 {
    let req = StockInsert {
        family: Some(family.to_string()),
        stamp: Some(stamp.to_string()),
        ..Default::default()
    };
    insert_stock(pool, &req).unwrap().stock_id
}

// =============================================================================
// Delta Property
// =============================================================================

#[test]
fn test_only_rows_past_the_bound_appear() {
    let (_dir, pool) = temp_pool();
    seed(&pool, "a", "2024-01-01 10:00:00");
    seed(&pool, "b", "2024-02-01 10:00:00");
    seed(&pool, "c", "2024-03-01 10:00:00");

    let bound = parse_sync_bound("2024-01-01 10:00:00").unwrap();
    let records = collect_changes(&pool, &bound).unwrap();
    let families: Vec<_> = records.iter().filter_map(|r| r.family.as_deref()).collect();
    assert_eq!(families, vec!["b", "c"]);
}

#[test]
fn test_bound_is_strict() {
    let (_dir, pool) = temp_pool();
    seed(&pool, "only", "2024-06-01 00:00:00");

    // A row whose stamp equals the bound is already synced.
    let bound = parse_sync_bound("2024-06-01 00:00:00").unwrap();
    assert!(collect_changes(&pool, &bound).unwrap().is_empty());

    let earlier = parse_sync_bound("2024-05-31 23:59:59").unwrap();
    assert_eq!(collect_changes(&pool, &earlier).unwrap().len(), 1);
}

#[test]
fn test_epoch_sentinel_returns_full_table() {
    let (_dir, pool) = temp_pool();
    for i in 0..5 {
        seed(&pool, &format!("fam{}", i), &format!("2024-01-0{} 00:00:00", i + 1));
    }
    let records = collect_changes(&pool, &epoch()).unwrap();
    assert_eq!(records.len(), 5);
}

#[test]
fn test_reexport_is_idempotent() {
    let (_dir, pool) = temp_pool();
    seed(&pool, "a", "2024-01-01 10:00:00");
    seed(&pool, "b", "2024-02-01 10:00:00");

    let bound = epoch();
    let first = collect_changes(&pool, &bound).unwrap();
    let second = collect_changes(&pool, &bound).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_output_ordered_by_stamp_then_id() {
    let (_dir, pool) = temp_pool();
    // Allocation order deliberately disagrees with stamp order.
    let id_c = seed(&pool, "c", "2024-03-01 00:00:00");
    let id_a = seed(&pool, "a", "2024-01-01 00:00:00");
    let id_b1 = seed(&pool, "b1", "2024-02-01 00:00:00");
    let id_b2 = seed(&pool, "b2", "2024-02-01 00:00:00");

    let records = collect_changes(&pool, &epoch()).unwrap();
    let ids: Vec<i64> = records.iter().map(|r| r.stock_id).collect();
    assert_eq!(ids, vec![id_a, id_b1, id_b2, id_c]);
}

// =============================================================================
// Field Policy
// =============================================================================

#[test]
fn test_null_policy_end_to_end() {
    let (_dir, pool) = temp_pool();
    let stored = insert_stock(
        &pool,
        &StockInsert {
            stamp: Some("2024-01-01 00:00:00".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let records = collect_changes(&pool, &epoch()).unwrap();
    let rec = &records[0];
    assert_eq!(rec, &stored);

    // Nullable text with client compatibility defaults.
    assert_eq!(rec.subspecies, "");
    assert_eq!(rec.plant_description, "");
    assert_eq!(rec.status_note, "");

    // Currency stays null, not zero.
    assert_eq!(rec.stock_price, None);
    assert_eq!(rec.total_value, None);

    // Photo URLs and provenance stay null.
    assert_eq!(rec.photo_link1, None);
    assert_eq!(rec.added_by, None);

    // Flags defaulted to 0.
    assert_eq!(rec.mother, 0);
    assert_eq!(rec.variegated, 0);
}

#[test]
fn test_free_text_sanitized_on_export() {
    let (_dir, pool) = temp_pool();
    insert_stock(
        &pool,
        &StockInsert {
            name_concat: Some("Hoya \u{0e04}\u{0e34}\u{0e19} kerrii".to_string()),
            plant_description: Some("line1\nline2\ttab".to_string()),
            stamp: Some("2024-01-01 00:00:00".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let records = collect_changes(&pool, &epoch()).unwrap();
    assert_eq!(records[0].name_concat.as_deref(), Some("Hoya  kerrii"));
    assert_eq!(records[0].plant_description, "line1line2tab");
}

#[test]
fn test_dates_and_stamp_formats() {
    let (_dir, pool) = temp_pool();
    insert_stock(
        &pool,
        &StockInsert {
            planted_start: Some("2023-11-05".to_string()),
            stamp: Some("2024-01-01 08:30:00".to_string()),
            ..Default::default()
        },
    )
    .unwrap();

    let records = collect_changes(&pool, &epoch()).unwrap();
    assert_eq!(records[0].planted_start.as_deref(), Some("2023-11-05"));
    assert_eq!(records[0].planted_end, None);
    assert_eq!(records[0].stamp, "2024-01-01 08:30:00");
}
