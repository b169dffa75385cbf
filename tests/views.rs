//! Read-side views: current state, filters, derived metrics, JSON shape

use chrono::NaiveDate;
use plantlog::derived::{days_between, rate_per_day};
use plantlog::ledger::{Relocation, RollDraft, RollRegister};
use plantlog::model::Location;
use plantlog::value::tolerant_decimal_parse;
use plantlog::{Clock, DateWindow, Plant, RecordFilter, StorageConfig};
use tempfile::TempDir;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rolls(dir: &TempDir) -> RollRegister {
    RollRegister::new(dir.path().join("rolls.csv")).with_clock(Clock::fixed(day(2024, 2, 1)))
}

fn roll(code: &str, location: &str, entry: &str, exit: Option<&str>) -> RollDraft {
    RollDraft {
        code: code.to_string(),
        location: location.to_string(),
        entry: entry.to_string(),
        exit: exit.map(str::to_string),
        ..RollDraft::default()
    }
}

#[test]
fn test_derived_metric_examples() {
    assert_eq!(days_between("2024-01-01", Some("2024-01-10")), Some(9));
    assert_eq!(rate_per_day(Some(100.0), Some(4)), Some(25.0));
    assert_eq!(rate_per_day(Some(100.0), Some(0)), None);
    assert_eq!(tolerant_decimal_parse("597,5"), 597.5);
    assert_eq!(tolerant_decimal_parse(""), 0.0);
    assert_eq!(tolerant_decimal_parse("abc"), 0.0);
}

#[test]
fn test_active_view_returns_the_open_record() {
    let dir = TempDir::new().unwrap();
    let rolls = rolls(&dir);
    rolls
        .register(roll("SR03", "Usinagem", "2024-01-01", Some("2024-01-05")))
        .unwrap();
    let open = rolls.register(roll("SR03", "Em linha", "2024-01-10", None)).unwrap();

    let active = rolls.active().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].record.id, open);
    assert_eq!(active[0].derived.days, Some(22));
}

#[test]
fn test_same_day_moves_resolve_to_later_row() {
    let dir = TempDir::new().unwrap();
    let rolls = rolls(&dir);
    rolls.register(roll("SR05", "Baia", "2024-01-10", None)).unwrap();
    rolls
        .relocate(
            "SR05",
            Relocation {
                location: "Revestimento".to_string(),
                entry: "2024-01-10".to_string(),
                ..Relocation::default()
            },
        )
        .unwrap();

    let current = rolls.last_movement("SR05").unwrap().unwrap();
    assert_eq!(current.position, 1);
    assert_eq!(current.record.location, Location::Revestimento);
}

#[test]
fn test_location_filter_is_order_independent() {
    let dir = TempDir::new().unwrap();
    let rolls = rolls(&dir);
    rolls.register(roll("SR01", "Em linha", "2024-01-03", None)).unwrap();
    rolls.register(roll("SR02", "Baia", "2024-01-01", None)).unwrap();
    rolls.register(roll("SR03", "Em linha", "2024-01-02", None)).unwrap();
    rolls.register(roll("SR04", "Usinagem", "2024-01-04", None)).unwrap();

    let rows = rolls
        .history(&RecordFilter::new().category("Em linha"))
        .unwrap();
    let codes: Vec<&str> = rows.iter().map(|r| r.record.code.as_str()).collect();
    assert_eq!(codes, vec!["SR01", "SR03"]);
    assert!(rows.iter().all(|r| r.record.location == Location::EmLinha));
}

#[test]
fn test_window_treats_open_records_as_ongoing() {
    let dir = TempDir::new().unwrap();
    let rolls = rolls(&dir);
    rolls
        .register(roll("SR01", "Baia", "2023-10-01", Some("2023-11-01")))
        .unwrap();
    rolls.register(roll("SR02", "Baia", "2023-10-01", None)).unwrap();

    let window = DateWindow::new(Some(day(2024, 1, 1)), Some(day(2024, 1, 31)));
    let rows = rolls.history(&RecordFilter::new().window(window)).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].record.code, "SR02");
}

#[test]
fn test_plant_opens_every_ledger_under_one_directory() {
    let dir = TempDir::new().unwrap();
    let config = StorageConfig::default().with_data_dir(dir.path());
    let plant = Plant::open_with_clock(&config, Clock::fixed(day(2024, 2, 1)));

    plant.rolls.register(roll("SR01", "Baia", "2024-01-01", None)).unwrap();
    assert!(plant.baths.search("x").unwrap().is_empty());
    assert_eq!(plant.levellers.dashboard().unwrap().records, 0);

    assert!(config.roll_path().exists());
    assert!(config.bath_path().exists());
    assert!(config.leveller_path().exists());
}

#[test]
fn test_listed_rows_serialize_with_labels() {
    let dir = TempDir::new().unwrap();
    let rolls = rolls(&dir);
    rolls.register(roll("SR01", "Oficina OCP", "2024-01-01", None)).unwrap();

    let rows = rolls.active().unwrap();
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["position"], 0);
    assert_eq!(json[0]["record"]["location"], "Oficina OCP");
    assert_eq!(json[0]["record"]["entry"], "2024-01-01");
    assert_eq!(json[0]["derived"]["days"], 31);
}
