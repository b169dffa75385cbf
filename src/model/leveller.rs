//! `LevellerRecord` - one stint of a tension-leveller bending unit

use chrono::NaiveDate;
use serde::Serialize;

use super::label::labeled_enum;
use super::Record;
use crate::derived::{days_between_at, rate_per_day, Derived};
use crate::store::Row;
use crate::value::{parse_decimal, DateText};

/// Distance a bending unit is expected to run before replacement.
pub const DISTANCE_TARGET_KM: f64 = 2000.0;

/// Stored column names for the tension-leveller table.
pub mod columns {
    pub const ID: &str = "ID";
    pub const CODE: &str = "Codigo";
    pub const ENTRY: &str = "Entrada";
    pub const EXIT: &str = "Saída";
    pub const DAYS: &str = "Dias de uso";
    pub const DISTANCE: &str = "Km de saída";
    pub const RATE: &str = "Km/DIA";
    pub const POSITION: &str = "Posição";
    pub const NOTE: &str = "Observação";
}

labeled_enum! {
    /// Mounting position on the tension leveller.
    Position {
        Unassigned => "Nenhum",
        FirstUpper => "#1 SUP",
        FirstLower => "#1 INF",
        SecondUpper => "#2 SUP",
        SecondLower => "#2 INF",
        Anticoil => "Anticoil",
        Anticross => "Anticross",
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::Unassigned
    }
}

/// A bending unit's stint at one position.
///
/// `Dias de uso` and `Km/DIA` are written to the file for people opening it
/// in a spreadsheet, but they are never read back: [`Record::derive`] always
/// recomputes them from `entry`, `exit` and `exit_distance`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LevellerRecord {
    pub id: String,
    pub code: String,
    pub entry: DateText,
    pub exit: DateText,
    /// Odometer at exit, dot-decimal text; empty until the unit leaves
    pub exit_distance: String,
    pub position: Position,
    pub note: String,
}

impl LevellerRecord {
    /// Distance at exit, `None` when absent or unparsable.
    #[must_use]
    pub fn distance(&self) -> Option<f64> {
        parse_decimal(&self.exit_distance)
    }
}

impl Record for LevellerRecord {
    const COLUMNS: &'static [&'static str] = &[
        columns::ID,
        columns::CODE,
        columns::ENTRY,
        columns::EXIT,
        columns::DAYS,
        columns::DISTANCE,
        columns::RATE,
        columns::POSITION,
        columns::NOTE,
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn from_row(row: &Row<'_>) -> Self {
        Self {
            id: row.text(columns::ID).trim().to_string(),
            code: row.text(columns::CODE).trim().to_string(),
            entry: DateText::new(row.text(columns::ENTRY)),
            exit: DateText::new(row.text(columns::EXIT)),
            exit_distance: row.text(columns::DISTANCE).trim().to_string(),
            position: Position::from_label(row.get(columns::POSITION)),
            note: row.text(columns::NOTE),
        }
    }

    fn to_row(&self, today: NaiveDate) -> Vec<String> {
        let derived = self.derive(today);
        vec![
            self.id.clone(),
            self.code.clone(),
            self.entry.to_string(),
            self.exit.to_string(),
            derived.days.map(|d| d.to_string()).unwrap_or_default(),
            self.exit_distance.clone(),
            derived.rate.map(|r| format!("{r:.2}")).unwrap_or_default(),
            self.position.to_string(),
            self.note.clone(),
        ]
    }

    /// Days in use and km per day.
    fn derive(&self, today: NaiveDate) -> Derived {
        let days = days_between_at(self.entry.as_str(), self.exit.as_option(), today);
        Derived {
            days,
            rate: rate_per_day(self.distance(), days),
        }
    }

    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }

    fn category(&self) -> &str {
        self.position.as_str()
    }

    fn entry(&self) -> &DateText {
        &self.entry
    }

    fn exit(&self) -> &DateText {
        &self.exit
    }
}
