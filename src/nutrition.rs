//! Energy expenditure estimate and supplement status.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::latest_value;
use crate::models::{BodyWeight, Metric, SupplementEntry, WeightEntry};
use crate::values::parse_date;

/// Body weight used when no weigh-in has a usable value.
pub const FALLBACK_WEIGHT_KG: f64 = 80.0;

const DEFICITS: [i64; 2] = [300, 500];

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    #[default]
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Desk job, no training.
    Sedentary,
    /// One or two sessions a week.
    Light,
    /// Three to five sessions a week.
    #[default]
    Moderate,
    /// Six or seven sessions a week.
    Active,
    /// Twice a day.
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "very_active" => Ok(ActivityLevel::VeryActive),
            other => Err(format!("Unknown activity level: {other}")),
        }
    }
}

/// Personal data the estimate needs besides body weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyProfile {
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity: ActivityLevel,
}

impl Default for EnergyProfile {
    fn default() -> Self {
        Self {
            height_cm: 178.0,
            age: 30,
            sex: Sex::Male,
            activity: ActivityLevel::Moderate,
        }
    }
}

/// Daily macronutrient targets in grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Macros {
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl Macros {
    /// Split `kcal` by the given protein/carbs/fat fractions.
    fn split(kcal: i64, protein: f64, carbs: f64, fat: f64) -> Self {
        let kcal = kcal as f64;
        Self {
            protein: (kcal * protein / KCAL_PER_GRAM_PROTEIN).round() as i64,
            carbs: (kcal * carbs / KCAL_PER_GRAM_CARBS).round() as i64,
            fat: (kcal * fat / KCAL_PER_GRAM_FAT).round() as i64,
        }
    }

    fn maintenance(kcal: i64) -> Self {
        Self::split(kcal, 0.35, 0.40, 0.25)
    }

    /// Higher protein share while cutting.
    fn cutting(kcal: i64) -> Self {
        Self::split(kcal, 0.40, 0.35, 0.25)
    }
}

/// Calorie goal together with its macro breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalorieTarget {
    pub deficit: i64,
    pub kcal: i64,
    pub macros: Macros,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyEstimate {
    /// Weight the estimate was computed from.
    pub weight_kg: f64,
    /// Whether `weight_kg` is the fallback rather than a logged value.
    pub assumed_weight: bool,
    pub bmr: i64,
    pub maintenance: CalorieTarget,
    pub deficits: Vec<CalorieTarget>,
}

/// Mifflin-St Jeor basal metabolic rate in kcal per day.
pub fn basal_metabolic_rate(weight_kg: f64, profile: &EnergyProfile) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * profile.height_cm - 5.0 * f64::from(profile.age);
    match profile.sex {
        Sex::Male => base + 5.0,
        Sex::Female => base - 161.0,
    }
}

/// Estimate daily energy expenditure from a known body weight.
pub fn estimate_for_weight(weight_kg: f64, profile: &EnergyProfile) -> EnergyEstimate {
    let bmr = basal_metabolic_rate(weight_kg, profile);
    let maintenance = (bmr * profile.activity.multiplier()).round() as i64;
    let deficits = DEFICITS
        .iter()
        .map(|&deficit| {
            let kcal = maintenance - deficit;
            CalorieTarget {
                deficit,
                kcal,
                macros: Macros::cutting(kcal),
            }
        })
        .collect();

    EnergyEstimate {
        weight_kg,
        assumed_weight: false,
        bmr: bmr.round() as i64,
        maintenance: CalorieTarget {
            deficit: 0,
            kcal: maintenance,
            macros: Macros::maintenance(maintenance),
        },
        deficits,
    }
}

/// Estimate daily energy expenditure from the latest logged weight.
///
/// The whole history is used regardless of any period selection. When no
/// weigh-in carries a value `fallback_kg` is used instead.
pub fn estimate_energy(
    weights: &[WeightEntry],
    profile: &EnergyProfile,
    fallback_kg: f64,
) -> EnergyEstimate {
    match latest_value(weights, |e| BodyWeight.value(e)) {
        Some(weight) => estimate_for_weight(weight, profile),
        None => {
            log::warn!("No logged weight, assuming {fallback_kg} kg");
            EnergyEstimate {
                assumed_weight: true,
                ..estimate_for_weight(fallback_kg, profile)
            }
        }
    }
}

impl SupplementEntry {
    /// A regimen is active while it has no end date or the end date is not
    /// yet past. An end date that does not parse counts as no end date.
    pub fn is_active(&self, now: NaiveDate) -> bool {
        match self.end_date.as_deref().and_then(parse_date) {
            Some(end) => end >= now,
            None => true,
        }
    }
}

pub fn active_supplements(entries: &[SupplementEntry], now: NaiveDate) -> Vec<&SupplementEntry> {
    entries.iter().filter(|s| s.is_active(now)).collect()
}
