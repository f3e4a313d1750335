//! Loading record collections handed over by the data layer.
//!
//! Messy fields inside a record are tolerated (they become "no value"), but a
//! document whose shape is wrong, e.g. `"weights": 5`, is a caller bug and is
//! rejected outright.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::{JournalEntry, MeasurementEntry, SupplementEntry, TrainingEntry, WeightEntry};
use crate::values::parse_str;

/// All record collections the engine works on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub weights: Vec<WeightEntry>,
    pub measurements: Vec<MeasurementEntry>,
    pub trainings: Vec<TrainingEntry>,
    pub supplements: Vec<SupplementEntry>,
    pub journal: Vec<JournalEntry>,
}

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    /// The document does not have the expected collection shape.
    InvalidInput(serde_json::Error),
    Csv(csv::Error),
    MissingColumn(&'static str),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "I/O error: {e}"),
            LoadError::InvalidInput(e) => write!(f, "Invalid input: {e}"),
            LoadError::Csv(e) => write!(f, "CSV error: {e}"),
            LoadError::MissingColumn(c) => write!(f, "Missing column: {c}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::InvalidInput(e) => Some(e),
            LoadError::Csv(e) => Some(e),
            LoadError::MissingColumn(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::InvalidInput(e)
    }
}

impl From<csv::Error> for LoadError {
    fn from(e: csv::Error) -> Self {
        LoadError::Csv(e)
    }
}

impl Snapshot {
    pub fn from_json_str(data: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        let snapshot = Self::from_reader(std::io::BufReader::new(file))?;
        log::info!(
            "Loaded {} weights, {} measurements, {} trainings, {} supplements, {} journal entries",
            snapshot.weights.len(),
            snapshot.measurements.len(),
            snapshot.trainings.len(),
            snapshot.supplements.len(),
            snapshot.journal.len()
        );
        Ok(snapshot)
    }
}

/// Read a weight log with `date` and `value` (or `weight`) columns.
///
/// Rows that cannot be read are skipped; unparseable values are kept as
/// "no value" so the row still counts as a dated entry.
pub fn load_weights_csv<R: Read>(reader: R) -> Result<Vec<WeightEntry>, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();
    let column = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
    };
    let date_col = column(&["date"]).ok_or(LoadError::MissingColumn("date"))?;
    let value_col = column(&["value", "weight"]).ok_or(LoadError::MissingColumn("value"))?;

    let mut entries = Vec::new();
    for result in rdr.records() {
        match result {
            Ok(record) => entries.push(WeightEntry {
                date: record.get(date_col).unwrap_or("").trim().to_string(),
                value: record.get(value_col).and_then(parse_str),
            }),
            Err(e) => log::warn!("Skipping unreadable weight row: {e}"),
        }
    }
    Ok(entries)
}
