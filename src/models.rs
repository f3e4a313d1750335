//! Record types handed to the engine and the metric descriptors used to read
//! numeric fields out of them.

use chrono::NaiveDate;
use phf::phf_map;
use serde::{Deserialize, Serialize};

use crate::values::{self, lenient, lenient_opt_text, lenient_text};

/// A record carrying its own calendar date as raw text.
pub trait Dated {
    fn date(&self) -> &str;

    fn parsed_date(&self) -> Option<NaiveDate> {
        values::parse_date(self.date())
    }
}

/// Reads one numeric field out of an entry type.
pub trait Metric<E> {
    /// Stable identifier used as the series / summary key.
    fn key(&self) -> &'static str;
    /// Human readable name including the unit.
    fn label(&self) -> &'static str;
    fn value(&self, entry: &E) -> Option<f64>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient")]
    pub neck: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub shoulders: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub chest: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub waist: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub navel: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub hips: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub biceps_left: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub biceps_right: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub thigh_left: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub thigh_right: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub calf_left: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub calf_right: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub exercise: String,
    #[serde(default, deserialize_with = "lenient")]
    pub sets: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub reps: Option<f64>,
    /// Load in kg.
    #[serde(default, deserialize_with = "lenient")]
    pub load: Option<f64>,
    /// RPE on a 1 to 10 scale.
    #[serde(default, deserialize_with = "lenient")]
    pub perceived_effort: Option<f64>,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub dose: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub start_date: String,
    /// `None` while the supplement is still being taken.
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_text")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient")]
    pub mood: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub energy: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub sleep_quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub sleep_hours: Option<f64>,
}

impl Dated for WeightEntry {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for MeasurementEntry {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for TrainingEntry {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Supplements are placed on the time axis by the day they were started.
impl Dated for SupplementEntry {
    fn date(&self) -> &str {
        &self.start_date
    }
}

impl Dated for JournalEntry {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Body weight in kg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyWeight;

impl Metric<WeightEntry> for BodyWeight {
    fn key(&self) -> &'static str {
        "weight"
    }

    fn label(&self) -> &'static str {
        "Weight (kg)"
    }

    fn value(&self, entry: &WeightEntry) -> Option<f64> {
        values::sanitize(entry.value)
    }
}

/// The twelve body circumference measurements, in cm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementField {
    Neck,
    Shoulders,
    Chest,
    Waist,
    Navel,
    Hips,
    BicepsLeft,
    BicepsRight,
    ThighLeft,
    ThighRight,
    CalfLeft,
    CalfRight,
}

pub const ALL_MEASUREMENTS: [MeasurementField; 12] = [
    MeasurementField::Neck,
    MeasurementField::Shoulders,
    MeasurementField::Chest,
    MeasurementField::Waist,
    MeasurementField::Navel,
    MeasurementField::Hips,
    MeasurementField::BicepsLeft,
    MeasurementField::BicepsRight,
    MeasurementField::ThighLeft,
    MeasurementField::ThighRight,
    MeasurementField::CalfLeft,
    MeasurementField::CalfRight,
];

static MEASUREMENT_KEYS: phf::Map<&'static str, MeasurementField> = phf_map! {
    "neck" => MeasurementField::Neck,
    "shoulders" => MeasurementField::Shoulders,
    "chest" => MeasurementField::Chest,
    "waist" => MeasurementField::Waist,
    "navel" => MeasurementField::Navel,
    "hips" => MeasurementField::Hips,
    "bicepsLeft" => MeasurementField::BicepsLeft,
    "bicepsRight" => MeasurementField::BicepsRight,
    "thighLeft" => MeasurementField::ThighLeft,
    "thighRight" => MeasurementField::ThighRight,
    "calfLeft" => MeasurementField::CalfLeft,
    "calfRight" => MeasurementField::CalfRight,
};

impl MeasurementField {
    /// Look up a field by its record key, e.g. `"bicepsLeft"`.
    pub fn from_key(key: &str) -> Option<Self> {
        MEASUREMENT_KEYS.get(key).copied()
    }
}

impl std::str::FromStr for MeasurementField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::from_key(key).ok_or_else(|| {
            let known: Vec<&str> = ALL_MEASUREMENTS.iter().map(|f| f.key()).collect();
            format!("Unknown measurement '{key}', expected one of {}", known.join(", "))
        })
    }
}

impl Metric<MeasurementEntry> for MeasurementField {
    fn key(&self) -> &'static str {
        match self {
            MeasurementField::Neck => "neck",
            MeasurementField::Shoulders => "shoulders",
            MeasurementField::Chest => "chest",
            MeasurementField::Waist => "waist",
            MeasurementField::Navel => "navel",
            MeasurementField::Hips => "hips",
            MeasurementField::BicepsLeft => "bicepsLeft",
            MeasurementField::BicepsRight => "bicepsRight",
            MeasurementField::ThighLeft => "thighLeft",
            MeasurementField::ThighRight => "thighRight",
            MeasurementField::CalfLeft => "calfLeft",
            MeasurementField::CalfRight => "calfRight",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            MeasurementField::Neck => "Neck (cm)",
            MeasurementField::Shoulders => "Shoulders (cm)",
            MeasurementField::Chest => "Chest (cm)",
            MeasurementField::Waist => "Waist (cm)",
            MeasurementField::Navel => "Navel (cm)",
            MeasurementField::Hips => "Hips (cm)",
            MeasurementField::BicepsLeft => "Biceps L (cm)",
            MeasurementField::BicepsRight => "Biceps R (cm)",
            MeasurementField::ThighLeft => "Thigh L (cm)",
            MeasurementField::ThighRight => "Thigh R (cm)",
            MeasurementField::CalfLeft => "Calf L (cm)",
            MeasurementField::CalfRight => "Calf R (cm)",
        }
    }

    fn value(&self, entry: &MeasurementEntry) -> Option<f64> {
        let raw = match self {
            MeasurementField::Neck => entry.neck,
            MeasurementField::Shoulders => entry.shoulders,
            MeasurementField::Chest => entry.chest,
            MeasurementField::Waist => entry.waist,
            MeasurementField::Navel => entry.navel,
            MeasurementField::Hips => entry.hips,
            MeasurementField::BicepsLeft => entry.biceps_left,
            MeasurementField::BicepsRight => entry.biceps_right,
            MeasurementField::ThighLeft => entry.thigh_left,
            MeasurementField::ThighRight => entry.thigh_right,
            MeasurementField::CalfLeft => entry.calf_left,
            MeasurementField::CalfRight => entry.calf_right,
        };
        values::sanitize(raw)
    }
}

/// Numeric fields of a training entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainingField {
    Sets,
    Reps,
    Load,
    PerceivedEffort,
}

impl Metric<TrainingEntry> for TrainingField {
    fn key(&self) -> &'static str {
        match self {
            TrainingField::Sets => "sets",
            TrainingField::Reps => "reps",
            TrainingField::Load => "load",
            TrainingField::PerceivedEffort => "perceivedEffort",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TrainingField::Sets => "Sets",
            TrainingField::Reps => "Reps",
            TrainingField::Load => "Load (kg)",
            TrainingField::PerceivedEffort => "RPE",
        }
    }

    fn value(&self, entry: &TrainingEntry) -> Option<f64> {
        values::sanitize(match self {
            TrainingField::Sets => entry.sets,
            TrainingField::Reps => entry.reps,
            TrainingField::Load => entry.load,
            TrainingField::PerceivedEffort => entry.perceived_effort,
        })
    }
}

/// Numeric fields of a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JournalField {
    Mood,
    Energy,
    SleepQuality,
    SleepHours,
}

pub const ALL_JOURNAL_FIELDS: [JournalField; 4] = [
    JournalField::Mood,
    JournalField::Energy,
    JournalField::SleepQuality,
    JournalField::SleepHours,
];

impl Metric<JournalEntry> for JournalField {
    fn key(&self) -> &'static str {
        match self {
            JournalField::Mood => "mood",
            JournalField::Energy => "energy",
            JournalField::SleepQuality => "sleepQuality",
            JournalField::SleepHours => "sleepHours",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            JournalField::Mood => "Mood (1-10)",
            JournalField::Energy => "Energy (1-10)",
            JournalField::SleepQuality => "Sleep quality (1-10)",
            JournalField::SleepHours => "Sleep (h)",
        }
    }

    fn value(&self, entry: &JournalEntry) -> Option<f64> {
        values::sanitize(match self {
            JournalField::Mood => entry.mood,
            JournalField::Energy => entry.energy,
            JournalField::SleepQuality => entry.sleep_quality,
            JournalField::SleepHours => entry.sleep_hours,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measurement_keys_round_trip_through_lookup() {
        for field in ALL_MEASUREMENTS {
            assert_eq!(MeasurementField::from_key(field.key()), Some(field));
        }
        assert_eq!(MeasurementField::from_key("biceps"), None);
    }

    #[test]
    fn measurement_names_parse_from_text() {
        assert_eq!(" waist ".parse::<MeasurementField>(), Ok(MeasurementField::Waist));
        assert_eq!("calfRight".parse::<MeasurementField>(), Ok(MeasurementField::CalfRight));
        let err = "Waist".parse::<MeasurementField>().unwrap_err();
        assert!(err.contains("bicepsLeft"));
    }

    #[test]
    fn measurement_entry_accepts_partial_and_messy_records() {
        let entry: MeasurementEntry = serde_json::from_str(
            r#"{"date": "2024-05-01", "waist": "82.5", "bicepsLeft": "", "hips": null}"#,
        )
        .unwrap();
        assert_eq!(MeasurementField::Waist.value(&entry), Some(82.5));
        assert_eq!(MeasurementField::BicepsLeft.value(&entry), None);
        assert_eq!(MeasurementField::Hips.value(&entry), None);
        assert_eq!(MeasurementField::Neck.value(&entry), None);
    }

    #[test]
    fn undated_entries_keep_loading() {
        let entry: WeightEntry = serde_json::from_str(r#"{"date": null, "value": 70}"#).unwrap();
        assert_eq!(entry.date, "");
        assert_eq!(entry.parsed_date(), None);
        assert_eq!(BodyWeight.value(&entry), Some(70.0));
    }

    #[test]
    fn supplement_is_dated_by_start() {
        let s: SupplementEntry = serde_json::from_str(
            r#"{"name": "Creatine", "dose": "5g", "startDate": "2024-03-01", "endDate": ""}"#,
        )
        .unwrap();
        assert_eq!(s.date(), "2024-03-01");
        assert_eq!(s.end_date, None);
        assert_eq!(s.parsed_date(), NaiveDate::from_ymd_opt(2024, 3, 1));
    }
}
