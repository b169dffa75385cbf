//! Store-level properties of the ledgers: append, delete, legacy repair
//!
//! Every test works in its own temporary storage directory.

use std::fs;

use chrono::NaiveDate;
use plantlog::ledger::{LevellerDraft, RollDraft, RollRegister, TensionLeveller};
use plantlog::model::{Location, RollMovement};
use plantlog::{Clock, Ledger, LedgerError, RecordFilter, StoreError, TableStore};
use tempfile::TempDir;

fn clock() -> Clock {
    Clock::fixed(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
}

fn roll(code: &str, location: &str, entry: &str, exit: Option<&str>) -> RollDraft {
    RollDraft {
        code: code.to_string(),
        location: location.to_string(),
        reason: "Desgaste".to_string(),
        planned_service: "Retífica".to_string(),
        entry: entry.to_string(),
        exit: exit.map(str::to_string),
        note: String::new(),
    }
}

#[test]
fn test_missing_file_is_created_with_header() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("rolls.csv");
    let rolls = RollRegister::new(&path);

    assert!(rolls.load().unwrap().is_empty());
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("ID,Codigo,Localização"));
}

#[test]
fn test_append_preserves_record_and_assigns_unique_ids() {
    let dir = TempDir::new().unwrap();
    let rolls = RollRegister::new(dir.path().join("rolls.csv")).with_clock(clock());

    let first = rolls.register(roll("SR01", "Baia", "2024-01-01", None)).unwrap();
    let second = rolls.register(roll("SR01", "Baia", "2024-01-01", None)).unwrap();
    assert_ne!(first, second);

    let records = rolls.load().unwrap();
    assert_eq!(records.len(), 2);
    let stored = &records[0];
    assert_eq!(stored.id, first);
    assert_eq!(stored.code, "SR01");
    assert_eq!(stored.location, Location::Baia);
    assert_eq!(stored.reason, "Desgaste");
    assert_eq!(stored.planned_service, "Retífica");
    assert_eq!(stored.entry.as_str(), "2024-01-01");
    assert!(stored.exit.is_empty());
}

#[test]
fn test_store_append_ignores_caller_id() {
    let dir = TempDir::new().unwrap();
    let store: TableStore<RollMovement> = TableStore::new(dir.path().join("rolls.csv"));
    let record = RollMovement {
        id: "caller-id".to_string(),
        code: "SR02".to_string(),
        ..RollMovement::default()
    };

    let id = store.append(record).unwrap();
    assert_ne!(id, "caller-id");
    assert_eq!(store.position_of(&id).unwrap(), Some(0));
}

#[test]
fn test_delete_removes_only_that_row() {
    let dir = TempDir::new().unwrap();
    let rolls = RollRegister::new(dir.path().join("rolls.csv")).with_clock(clock());
    let ids: Vec<String> = ["SR01", "SR02", "SR03"]
        .iter()
        .map(|code| rolls.register(roll(code, "Baia", "2024-01-01", None)).unwrap())
        .collect();

    let removed = rolls.delete(1).unwrap();
    assert_eq!(removed.id, ids[1]);

    let remaining: Vec<String> = rolls.load().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(remaining, vec![ids[0].clone(), ids[2].clone()]);
}

#[test]
fn test_out_of_range_edits_write_nothing() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rolls.csv");
    let rolls = RollRegister::new(&path).with_clock(clock());
    rolls.register(roll("SR01", "Baia", "2024-01-01", None)).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = rolls.delete(7).unwrap_err();
    assert!(matches!(
        err,
        LedgerError::Store(StoreError::RowNotFound { position: 7, len: 1 })
    ));
    assert!(rolls
        .update(1, roll("SR01", "Usinagem", "2024-01-02", None))
        .is_err());

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_legacy_rows_get_ids_and_are_persisted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("TL.csv");
    fs::write(
        &path,
        "Codigo,Entrada,Saída,Km de saída,Posição,Observação\n\
         AC03,2024-01-01,2024-01-05,\"100,0\",#1 SUP,\n\
         AC04,2024-01-02,,,Anticoil,nova\n",
    )
    .unwrap();

    let tl = TensionLeveller::new(&path).with_clock(clock());
    let records = tl.load().unwrap();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.id.is_empty()));
    assert_ne!(records[0].id, records[1].id);

    // Ids were written back, so a second load sees the same ones
    let again = tl.load().unwrap();
    assert_eq!(again[0].id, records[0].id);
    assert!(fs::read_to_string(&path).unwrap().starts_with("ID,"));

    let rows = tl.history(&RecordFilter::new().code("AC03")).unwrap();
    assert_eq!(rows[0].derived.rate, Some(25.0));
}

#[test]
fn test_validation_failure_leaves_table_untouched() {
    let dir = TempDir::new().unwrap();
    let tl = TensionLeveller::new(dir.path().join("TL.csv")).with_clock(clock());
    let draft = LevellerDraft {
        code: "AC03".to_string(),
        entry: "2024-02-10".to_string(),
        exit: Some("2024-02-01".to_string()),
        position: "#2 INF".to_string(),
        ..LevellerDraft::default()
    };

    assert!(matches!(tl.register(draft), Err(LedgerError::Validation(_))));
    assert!(tl.load().unwrap().is_empty());
}

#[test]
fn test_row_with_cp1252_note_survives_append() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rolls.csv");
    let mut bytes = b"ID,Codigo,Entrada,Observa\xc3\xa7\xc3\xa3o\n".to_vec();
    bytes.extend_from_slice(b"a1,SR01,2024-01-01,\n");
    bytes.extend_from_slice(b"a2,SR02,2024-01-02,manuten\xe7\xe3o\n");
    bytes.extend_from_slice(b"a3,SR03,2024-01-03,\n");
    fs::write(&path, bytes).unwrap();

    let rolls = RollRegister::new(&path).with_clock(clock());
    let codes: Vec<String> = rolls.load().unwrap().into_iter().map(|r| r.code).collect();
    assert_eq!(codes, vec!["SR01", "SR02", "SR03"]);

    rolls.register(roll("SR04", "Baia", "2024-01-20", None)).unwrap();

    let records = rolls.load().unwrap();
    assert_eq!(records.len(), 4);
    let kept = records.iter().find(|r| r.code == "SR02").unwrap();
    assert_eq!(kept.id, "a2");
    assert!(kept.note.starts_with("manuten"));
    assert!(String::from_utf8_lossy(&fs::read(&path).unwrap()).contains("SR02"));
}
