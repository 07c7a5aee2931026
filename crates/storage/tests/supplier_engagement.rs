#![forbid(unsafe_code)]

use ec_core::{EventId, Money, SupplierId};
use ec_storage::{
    NewContract, NewEngagement, NewEvent, NewSupplier, NewUser, SqliteStore, SupplierUpdate,
};
use rusqlite::{Connection, params};
use std::path::PathBuf;
use time::{Date, Month};

fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("ec_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn day(month: Month, day: u8) -> Date {
    Date::from_calendar_date(2026, month, day).expect("date")
}

fn seed_event(store: &mut SqliteStore) -> EventId {
    let user = store
        .create_user(NewUser {
            name: "Maya".to_string(),
            email: None,
            kind: "CELEB".to_string(),
        })
        .expect("user");
    store
        .create_event(NewEvent {
            celeb_user_id: user.user_id,
            name: "Concert".to_string(),
            event_date: day(Month::September, 10),
            event_time: None,
            guests_num: 200,
        })
        .expect("event")
        .event_id
}

fn supplier(store: &mut SqliteStore, name: &str) -> SupplierId {
    store
        .create_supplier(NewSupplier {
            name: name.to_string(),
            supplier_type: "CATERING".to_string(),
            payment_terms: Some("NET_30".to_string()),
        })
        .expect("supplier")
        .supplier_id
}

fn engagement(event_id: EventId, supplier_id: SupplierId) -> NewEngagement {
    NewEngagement {
        event_id,
        supplier_id,
        contract_id: None,
        agreed_price: Money::from_minor(500_000),
    }
}

#[test]
fn duplicate_engagement_fails_and_snapshot_survives_edits() {
    let storage_dir = temp_dir("duplicate_engagement_fails_and_snapshot_survives_edits");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let event = seed_event(&mut store);
    let caterer = supplier(&mut store, "Tasty Bites");
    let contract = store
        .create_contract(NewContract {
            supplier_id: caterer,
            valid_from: day(Month::January, 1),
            valid_to: Some(day(Month::December, 31)),
            total_price: Money::from_minor(900_000),
        })
        .expect("contract");

    let first = store
        .engage(NewEngagement {
            contract_id: Some(contract.contract_id),
            ..engagement(event, caterer)
        })
        .expect("first engagement");
    assert_eq!(first.supplier_name_snapshot, "Tasty Bites");
    assert_eq!(first.payment_terms_snapshot.as_deref(), Some("NET_30"));
    assert_eq!(first.contract_total_snapshot, Some(Money::from_minor(900_000)));
    assert!(!first.is_confirmed);

    let err = store
        .engage(engagement(event, caterer))
        .expect_err("same pair twice");
    assert_eq!(err.code(), "DUPLICATE_ENGAGEMENT");

    store
        .update_supplier(
            caterer,
            SupplierUpdate {
                name: Some("Tasty Bites Ltd".to_string()),
                payment_terms: Some(Some("IMMEDIATE".to_string())),
                ..SupplierUpdate::default()
            },
        )
        .expect("rename supplier");
    let err = store
        .update_contract_price(contract.contract_id, Money::from_minor(1))
        .expect_err("snapshotted contract is frozen");
    assert_eq!(err.code(), "REFERENCED_ENTITY");

    let reread = store.get_engagement(first.list_id).expect("reread");
    assert_eq!(reread.supplier_name_snapshot, "Tasty Bites");
    assert_eq!(reread.payment_terms_snapshot.as_deref(), Some("NET_30"));
    assert_eq!(reread.contract_total_snapshot, Some(Money::from_minor(900_000)));
    assert_eq!(
        store.get_supplier(caterer).expect("supplier").name,
        "Tasty Bites Ltd"
    );

    let conn = Connection::open(storage_dir.join("eventchain.db")).expect("raw connection");
    let err = conn
        .execute(
            "UPDATE event_suppliers SET supplier_name_snapshot='x' WHERE list_id=?1",
            params![first.list_id.get()],
        )
        .expect_err("snapshot columns are frozen");
    assert!(err.to_string().contains("immutable"));
}

#[test]
fn confirmation_is_idempotent() {
    let storage_dir = temp_dir("confirmation_is_idempotent");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let event = seed_event(&mut store);
    let band = supplier(&mut store, "Band");
    let row = store.engage(engagement(event, band)).expect("engage");

    let unconfirmed = store.unconfirm(row.list_id).expect("never confirmed");
    assert!(!unconfirmed.is_confirmed);
    assert_eq!(unconfirmed.confirmed_at_ms, None);

    let once = store.confirm(row.list_id).expect("confirm");
    let twice = store.confirm(row.list_id).expect("confirm again");
    assert!(once.is_confirmed && twice.is_confirmed);
    assert_eq!(once.confirmed_at_ms, twice.confirmed_at_ms);

    let err = store
        .update_agreed_price(row.list_id, Money::from_minor(1))
        .expect_err("confirmed price is locked");
    assert_eq!(err.code(), "INVALID_INPUT");
    let err = store.disengage(row.list_id).expect_err("confirmed stays");
    assert_eq!(err.code(), "INVALID_INPUT");

    store.unconfirm(row.list_id).expect("unconfirm");
    let repriced = store
        .update_agreed_price(row.list_id, Money::from_minor(450_000))
        .expect("reprice");
    assert_eq!(repriced.agreed_price, Money::from_minor(450_000));
    store.disengage(row.list_id).expect("disengage");
    assert!(store.list_engagements(event).expect("list").is_empty());
}

#[test]
fn contract_window_is_enforced() {
    let storage_dir = temp_dir("contract_window_is_enforced");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let event = seed_event(&mut store);
    let florist = supplier(&mut store, "Florist");
    let other = supplier(&mut store, "Other");

    let summer = store
        .create_contract(NewContract {
            supplier_id: florist,
            valid_from: day(Month::June, 1),
            valid_to: Some(day(Month::August, 31)),
            total_price: Money::from_minor(10_000),
        })
        .expect("summer contract");
    let open_ended = store
        .create_contract(NewContract {
            supplier_id: florist,
            valid_from: day(Month::March, 1),
            valid_to: None,
            total_price: Money::from_minor(20_000),
        })
        .expect("open contract");

    store
        .validate_contract_window(summer.contract_id, day(Month::August, 31))
        .expect("last valid day");
    let err = store
        .validate_contract_window(summer.contract_id, day(Month::September, 1))
        .expect_err("after window");
    assert_eq!(err.code(), "CONTRACT_EXPIRED");
    let err = store
        .validate_contract_window(open_ended.contract_id, day(Month::February, 28))
        .expect_err("before window");
    assert_eq!(err.code(), "CONTRACT_EXPIRED");
    store
        .validate_contract_window(open_ended.contract_id, day(Month::December, 31))
        .expect("open-ended");

    let err = store
        .engage(NewEngagement {
            contract_id: Some(summer.contract_id),
            ..engagement(event, florist)
        })
        .expect_err("event after window");
    assert_eq!(err.code(), "CONTRACT_EXPIRED");

    let err = store
        .engage(NewEngagement {
            contract_id: Some(open_ended.contract_id),
            ..engagement(event, other)
        })
        .expect_err("contract of another supplier");
    assert_eq!(err.code(), "INVALID_REFERENCE");

    store
        .engage(NewEngagement {
            contract_id: Some(open_ended.contract_id),
            ..engagement(event, florist)
        })
        .expect("covered engagement");

    let err = store
        .create_contract(NewContract {
            supplier_id: florist,
            valid_from: day(Month::May, 2),
            valid_to: Some(day(Month::May, 1)),
            total_price: Money::ZERO,
        })
        .expect_err("inverted window");
    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn referenced_suppliers_and_contracts_cannot_be_deleted() {
    let storage_dir = temp_dir("referenced_suppliers_and_contracts_cannot_be_deleted");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let event = seed_event(&mut store);
    let dj = supplier(&mut store, "DJ");
    let contract = store
        .create_contract(NewContract {
            supplier_id: dj,
            valid_from: day(Month::January, 1),
            valid_to: None,
            total_price: Money::from_minor(30_000),
        })
        .expect("contract");

    let err = store.delete_supplier(dj).expect_err("has a contract");
    assert_eq!(err.code(), "REFERENCED_ENTITY");

    store
        .engage(NewEngagement {
            contract_id: Some(contract.contract_id),
            ..engagement(event, dj)
        })
        .expect("engage");
    let err = store
        .delete_contract(contract.contract_id)
        .expect_err("snapshotted contract");
    assert_eq!(err.code(), "REFERENCED_ENTITY");

    let inactive = store.set_supplier_active(dj, false).expect("deactivate");
    assert!(!inactive.is_active);
    assert!(store.list_suppliers(true).expect("active").is_empty());
    assert_eq!(store.list_suppliers(false).expect("all").len(), 1);

    let second_event = seed_event(&mut store);
    let err = store
        .engage(engagement(second_event, dj))
        .expect_err("inactive supplier");
    assert_eq!(err.code(), "INVALID_INPUT");

    let spare = supplier(&mut store, "Spare");
    store.delete_supplier(spare).expect("unreferenced supplier");
    assert_eq!(
        store.get_supplier(spare).expect_err("deleted").code(),
        "NOT_FOUND"
    );
}

#[test]
fn foreign_key_block_is_reported_without_naming_a_known_table() {
    let storage_dir = temp_dir("foreign_key_block_is_reported_without_naming_a_known_table");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let florist = supplier(&mut store, "Florist");

    let conn = Connection::open(storage_dir.join("eventchain.db")).expect("raw connection");
    conn.execute_batch(
        "CREATE TABLE supplier_notes (
           note_id INTEGER PRIMARY KEY,
           supplier_id INTEGER NOT NULL REFERENCES suppliers(supplier_id)
         );",
    )
    .expect("outside table");
    conn.execute(
        "INSERT INTO supplier_notes(supplier_id) VALUES (?1)",
        params![florist.get()],
    )
    .expect("outside reference");
    drop(conn);

    let err = store
        .delete_supplier(florist)
        .expect_err("referenced from outside");
    assert_eq!(err.code(), "REFERENCED_ENTITY");
    let message = err.to_string();
    assert!(message.contains("another table"), "{message}");
    assert!(!message.contains("contracts"), "{message}");
    assert!(store.get_supplier(florist).is_ok());
}

#[test]
fn supplier_master_data_is_validated() {
    let storage_dir = temp_dir("supplier_master_data_is_validated");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    supplier(&mut store, "Unique");

    let err = store
        .create_supplier(NewSupplier {
            name: "Unique".to_string(),
            supplier_type: "MUSIC".to_string(),
            payment_terms: None,
        })
        .expect_err("duplicate name");
    assert_eq!(err.code(), "INVALID_INPUT");

    let err = store
        .create_supplier(NewSupplier {
            name: "Mystery".to_string(),
            supplier_type: "TELEPORTATION".to_string(),
            payment_terms: None,
        })
        .expect_err("unknown type");
    assert_eq!(err.code(), "UNKNOWN_CODE");
}

#[test]
fn deleting_an_event_drops_its_engagements() {
    let storage_dir = temp_dir("deleting_an_event_drops_its_engagements");
    let mut store = SqliteStore::open(&storage_dir).expect("open store");
    let event = seed_event(&mut store);
    let photographer = supplier(&mut store, "Photographer");
    let row = store
        .engage(engagement(event, photographer))
        .expect("engage");
    store.confirm(row.list_id).expect("confirm");

    store.delete_event(event).expect("delete event");
    assert_eq!(
        store.get_engagement(row.list_id).expect_err("cascaded").code(),
        "NOT_FOUND"
    );
    store
        .delete_supplier(photographer)
        .expect("no references remain");
}
