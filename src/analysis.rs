// Module for summary statistics over logged records
use chrono::NaiveDate;
use serde::Serialize;
use serde::ser::{SerializeStruct, Serializer};

use crate::grouping::{OrderedMap, group_by};
use crate::models::{
    ALL_JOURNAL_FIELDS, ALL_MEASUREMENTS, BodyWeight, Dated, Metric, TrainingEntry, TrainingField,
};
use crate::period::{Period, filter_by_period};
use crate::snapshot::Snapshot;
use crate::values::sanitize;

/// First-versus-last comparison of a metric across dated entries.
///
/// Serializes with an extra `percentageLabel` field holding
/// [`Evolution::formatted_percentage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evolution {
    pub first: f64,
    pub last: f64,
    pub difference: f64,
    /// Change relative to `first`, rounded to two decimals. `None` when
    /// `first` is zero and the ratio is undefined.
    pub percentage: Option<f64>,
}

impl Evolution {
    pub fn between(first: f64, last: f64) -> Self {
        let difference = last - first;
        let percentage = if first == 0.0 {
            None
        } else {
            let pct = (difference / first * 100.0 * 100.0).round() / 100.0;
            // avoid printing "-0.00"
            Some(if pct == 0.0 { 0.0 } else { pct })
        };
        Self {
            first,
            last,
            difference,
            percentage,
        }
    }

    /// Sign-inclusive percentage such as `+2.50` or `-5.00`.
    pub fn formatted_percentage(&self) -> Option<String> {
        self.percentage.map(|p| format!("{p:+.2}"))
    }
}

impl Serialize for Evolution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Evolution", 5)?;
        state.serialize_field("first", &self.first)?;
        state.serialize_field("last", &self.last)?;
        state.serialize_field("difference", &self.difference)?;
        state.serialize_field("percentage", &self.percentage)?;
        state.serialize_field("percentageLabel", &self.formatted_percentage())?;
        state.end()
    }
}

/// Summary statistics for one exercise.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseProgress {
    pub sessions: usize,
    pub best_load: Option<f64>,
    /// Sum of `sets * reps * load` over entries where all three are known.
    pub total_volume: f64,
    pub average_effort: Option<f64>,
    pub load_evolution: Option<Evolution>,
}

/// Everything shown on the statistics screen for one window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsSummary {
    pub period: Period,
    pub weight_entries: usize,
    pub measurement_entries: usize,
    pub journal_entries: usize,
    pub weight_average: Option<f64>,
    pub latest_weight: Option<f64>,
    pub weight_evolution: Option<Evolution>,
    pub measurement_averages: OrderedMap<Option<f64>>,
    pub measurement_evolutions: OrderedMap<Option<Evolution>>,
    pub journal_averages: OrderedMap<Option<f64>>,
}

/// Arithmetic mean of the usable values of one metric.
///
/// Entries without a value for the metric are skipped rather than counted as
/// zero. Returns `None` when nothing is left.
pub fn average<'a, E, I, F>(entries: I, metric: F) -> Option<f64>
where
    E: 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&E) -> Option<f64>,
{
    let (sum, count) = entries
        .into_iter()
        .filter_map(|e| sanitize(metric(e)))
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        return None;
    }
    Some(sum / count as f64)
}

/// Dated entries that carry a value for `metric`, oldest first.
fn dated_values<'a, E, I, F>(entries: I, metric: F) -> Vec<(NaiveDate, f64)>
where
    E: Dated + 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&E) -> Option<f64>,
{
    let mut points: Vec<(NaiveDate, f64)> = entries
        .into_iter()
        .filter_map(|e| Some((e.parsed_date()?, sanitize(metric(e))?)))
        .collect();
    // stable: same-day entries keep input order
    points.sort_by_key(|(d, _)| *d);
    points
}

/// Compare the earliest and latest usable values of a metric.
///
/// Only entries with both a parseable date and a value take part. A single
/// surviving entry yields a zero difference.
pub fn evolution<'a, E, I, F>(entries: I, metric: F) -> Option<Evolution>
where
    E: Dated + 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&E) -> Option<f64>,
{
    let points = dated_values(entries, metric);
    let (_, first) = points.first()?;
    let (_, last) = points.last()?;
    Some(Evolution::between(*first, *last))
}

/// Value of the most recent dated entry that has one.
pub fn latest_value<'a, E, I, F>(entries: I, metric: F) -> Option<f64>
where
    E: Dated + 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&E) -> Option<f64>,
{
    dated_values(entries, metric).last().map(|(_, v)| *v)
}

/// Averages for each metric in `metrics`, keyed by metric key.
pub fn metric_averages<E, M: Metric<E>>(entries: &[&E], metrics: &[M]) -> OrderedMap<Option<f64>> {
    metrics
        .iter()
        .map(|m| {
            let avg = average(entries.iter().copied(), |e| m.value(e));
            (m.key().to_string(), avg)
        })
        .collect()
}

/// Evolutions for each metric in `metrics`, keyed by metric key.
pub fn metric_evolutions<E: Dated, M: Metric<E>>(
    entries: &[&E],
    metrics: &[M],
) -> OrderedMap<Option<Evolution>> {
    metrics
        .iter()
        .map(|m| {
            let evo = evolution(entries.iter().copied(), |e| m.value(e));
            (m.key().to_string(), evo)
        })
        .collect()
}

/// Compute the statistics summary for the records inside `period`.
pub fn summarize(snapshot: &Snapshot, period: Period, now: NaiveDate) -> StatisticsSummary {
    let weights = filter_by_period(&snapshot.weights, period, now);
    let measurements = filter_by_period(&snapshot.measurements, period, now);
    let journal = filter_by_period(&snapshot.journal, period, now);

    log::info!(
        "Computing statistics for {} weight and {} measurement entries ({period})",
        weights.len(),
        measurements.len()
    );
    if weights.is_empty() && measurements.is_empty() {
        log::warn!("No body data in the selected period");
    }

    StatisticsSummary {
        period,
        weight_entries: weights.len(),
        measurement_entries: measurements.len(),
        journal_entries: journal.len(),
        weight_average: average(weights.iter().copied(), |e| BodyWeight.value(e)),
        latest_weight: latest_value(weights.iter().copied(), |e| BodyWeight.value(e)),
        weight_evolution: evolution(weights.iter().copied(), |e| BodyWeight.value(e)),
        measurement_averages: metric_averages(&measurements, &ALL_MEASUREMENTS),
        measurement_evolutions: metric_evolutions(&measurements, &ALL_MEASUREMENTS),
        journal_averages: metric_averages(&journal, &ALL_JOURNAL_FIELDS),
    }
}

/// Per-exercise progress inside `period`, in first-seen order.
pub fn exercise_progression(
    entries: &[TrainingEntry],
    period: Period,
    now: NaiveDate,
) -> OrderedMap<ExerciseProgress> {
    let filtered = filter_by_period(entries, period, now);
    log::debug!("Aggregating {} training entries by exercise", filtered.len());

    let groups = group_by(filtered, |e| e.exercise.as_str());
    groups
        .into_iter()
        .map(|(exercise, sets)| {
            let load = |e: &TrainingEntry| TrainingField::Load.value(e);
            let mut days: Vec<NaiveDate> = sets.iter().filter_map(|e| e.parsed_date()).collect();
            days.sort();
            days.dedup();
            let total_volume = sets
                .iter()
                .filter_map(|e| {
                    Some(
                        TrainingField::Sets.value(e)?
                            * TrainingField::Reps.value(e)?
                            * TrainingField::Load.value(e)?,
                    )
                })
                .sum();
            let progress = ExerciseProgress {
                sessions: days.len(),
                best_load: sets
                    .iter()
                    .filter_map(|&e| load(e))
                    .fold(None, |best: Option<f64>, v| Some(best.map_or(v, |b| b.max(v)))),
                total_volume,
                average_effort: average(sets.iter().copied(), |e| {
                    TrainingField::PerceivedEffort.value(e)
                }),
                load_evolution: evolution(sets.iter().copied(), load),
            };
            (exercise, progress)
        })
        .collect()
}
