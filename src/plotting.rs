use chrono::NaiveDate;
use serde::Serialize;

use crate::grouping::{OrderedMap, group_by};
use crate::models::{
    ALL_JOURNAL_FIELDS, ALL_MEASUREMENTS, BodyWeight, Dated, JournalEntry, MeasurementEntry,
    Metric, SupplementEntry, TrainingEntry, TrainingField, WeightEntry,
};
use crate::period::{Period, chronological, filter_by_period};
use crate::values::format_label;

/// One named line, aligned with the chart's labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// Shared date axis plus one series per metric that has data.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub series: OrderedMap<Series>,
}

impl LineChart {
    /// True when no entry survived the period and date filtering.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// A training data point. `x` is a formatted date label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: String,
    pub y: f64,
}

/// Per-exercise load lines. Exercises happen on different days so each line
/// carries its own x values; `labels` is the union of all training days.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrainingChart {
    pub labels: Vec<String>,
    pub datasets: OrderedMap<Vec<Point>>,
}

/// Bar style summary: one bar per supplement with its first start date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplementChart {
    pub labels: Vec<String>,
    pub start_dates: Vec<String>,
}

/// Build a line chart for `metrics` over the entries inside `period`.
///
/// Entries are ordered by date and undated ones are dropped. Every remaining
/// entry produces one label. A metric is included only if at least one entry
/// in the window has a value for it; each cell of an included series is the
/// entry's value or `None`.
pub fn build_series<E: Dated, M: Metric<E>>(
    entries: &[E],
    metrics: &[M],
    period: Period,
    now: NaiveDate,
) -> LineChart {
    let rows = chronological(entries, period, now);
    let labels: Vec<String> = rows.iter().map(|(d, _)| format_label(*d)).collect();

    let mut series = OrderedMap::new();
    for metric in metrics {
        let values: Vec<Option<f64>> = rows.iter().map(|(_, e)| metric.value(e)).collect();
        if values.iter().all(Option::is_none) {
            log::debug!("No {} values in period {period}, skipping series", metric.key());
            continue;
        }
        series.insert(
            metric.key(),
            Series {
                label: metric.label().to_string(),
                values,
            },
        );
    }
    LineChart { labels, series }
}

pub fn weight_chart(entries: &[WeightEntry], period: Period, now: NaiveDate) -> LineChart {
    build_series(entries, &[BodyWeight], period, now)
}

/// All twelve measurements; fields never measured in the window are omitted.
pub fn measurement_chart(
    entries: &[MeasurementEntry],
    period: Period,
    now: NaiveDate,
) -> LineChart {
    build_series(entries, &ALL_MEASUREMENTS, period, now)
}

pub fn journal_chart(entries: &[JournalEntry], period: Period, now: NaiveDate) -> LineChart {
    build_series(entries, &ALL_JOURNAL_FIELDS, period, now)
}

/// Load over time for each exercise inside `period`.
///
/// Exercises appear in the order they first occur in `entries`, and each
/// exercise's points are sorted by date. A set without a load is plotted at
/// zero.
pub fn training_series(entries: &[TrainingEntry], period: Period, now: NaiveDate) -> TrainingChart {
    let dated: Vec<&TrainingEntry> = filter_by_period(entries, period, now)
        .into_iter()
        .filter(|e| e.parsed_date().is_some())
        .collect();

    let mut days: Vec<NaiveDate> = dated.iter().filter_map(|e| e.parsed_date()).collect();
    days.sort();
    days.dedup();
    let labels = days.into_iter().map(format_label).collect();

    let groups = group_by(dated, |e| e.exercise.as_str());
    let datasets = groups
        .into_iter()
        .map(|(exercise, sets)| {
            let mut points: Vec<(NaiveDate, f64)> = sets
                .into_iter()
                .filter_map(|e| {
                    Some((e.parsed_date()?, TrainingField::Load.value(e).unwrap_or(0.0)))
                })
                .collect();
            points.sort_by_key(|(d, _)| *d);
            let points = points
                .into_iter()
                .map(|(d, y)| Point {
                    x: format_label(d),
                    y,
                })
                .collect();
            (exercise, points)
        })
        .collect();

    TrainingChart { labels, datasets }
}

/// Supplements started inside `period`, one bar per name.
pub fn supplement_series(
    entries: &[SupplementEntry],
    period: Period,
    now: NaiveDate,
) -> SupplementChart {
    let filtered = filter_by_period(entries, period, now);
    let groups = group_by(filtered, |s| s.name.as_str());

    let mut chart = SupplementChart::default();
    for (name, regimens) in groups {
        let Some(earliest) = regimens.iter().filter_map(|s| s.parsed_date()).min() else {
            log::debug!("Supplement '{name}' has no usable start date");
            continue;
        };
        chart.labels.push(name);
        chart.start_dates.push(format_label(earliest));
    }
    chart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementField;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn waist(date: &str, waist: Option<f64>) -> MeasurementEntry {
        MeasurementEntry {
            date: date.into(),
            waist,
            ..Default::default()
        }
    }

    fn training(date: &str, exercise: &str, load: Option<f64>) -> TrainingEntry {
        TrainingEntry {
            date: date.into(),
            exercise: exercise.into(),
            load,
            ..Default::default()
        }
    }

    #[test]
    fn sparse_metrics_are_omitted() {
        let entries = vec![waist("2024-06-01", Some(85.0)), waist("2024-06-08", Some(84.0))];
        let chart = measurement_chart(&entries, Period::All, day("2024-06-15"));
        let keys: Vec<&str> = chart.series.keys().collect();
        assert_eq!(keys, vec!["waist"]);
        assert!(!chart.series.contains_key("bicepsLeft"));
        assert_eq!(chart.labels, vec!["01/06/24", "08/06/24"]);
    }

    #[test]
    fn rows_are_kept_when_one_metric_is_missing() {
        let entries = vec![
            waist("2024-06-01", Some(85.0)),
            MeasurementEntry {
                date: "2024-06-05".into(),
                hips: Some(100.0),
                ..Default::default()
            },
            waist("2024-06-08", Some(84.0)),
        ];
        let chart = build_series(
            &entries,
            &[MeasurementField::Waist, MeasurementField::Hips, MeasurementField::Neck],
            Period::All,
            day("2024-06-15"),
        );
        assert_eq!(chart.labels.len(), 3);
        let waist = chart.series.get("waist").unwrap();
        assert_eq!(waist.values, vec![Some(85.0), None, Some(84.0)]);
        assert_eq!(waist.label, "Waist (cm)");
        let hips = chart.series.get("hips").unwrap();
        assert_eq!(hips.values, vec![None, Some(100.0), None]);
        assert_eq!(chart.series.len(), 2);
    }

    #[test]
    fn series_are_sorted_and_filtered() {
        let entries = vec![
            WeightEntry {
                date: "2024-06-10".into(),
                value: Some(79.0),
            },
            WeightEntry {
                date: "2024-01-01".into(),
                value: Some(90.0),
            },
            WeightEntry {
                date: "broken".into(),
                value: Some(1.0),
            },
            WeightEntry {
                date: "2024-06-01".into(),
                value: Some(80.0),
            },
        ];
        let chart = weight_chart(&entries, Period::OneMonth, day("2024-06-15"));
        assert_eq!(chart.labels, vec!["01/06/24", "10/06/24"]);
        assert_eq!(chart.series.get("weight").unwrap().values, vec![Some(80.0), Some(79.0)]);

        let all = weight_chart(&entries, Period::All, day("2024-06-15"));
        assert_eq!(all.labels.len(), 3);
    }

    #[test]
    fn empty_window_gives_empty_chart() {
        let entries = vec![waist("2020-01-01", Some(90.0))];
        let chart = measurement_chart(&entries, Period::OneYear, day("2024-06-15"));
        assert!(chart.is_empty());
        assert!(chart.series.is_empty());
    }

    #[test]
    fn training_series_per_exercise() {
        let entries = vec![
            training("2024-01-03", "Squat", Some(105.0)),
            training("2023-12-31", "Squat", Some(100.0)),
            training("2024-01-01", "Bench", None),
            training("2024-01-03", "Bench", Some(82.5)),
        ];
        let chart = training_series(&entries, Period::All, day("2024-02-01"));
        assert_eq!(chart.labels, vec!["31/12/23", "01/01/24", "03/01/24"]);
        let keys: Vec<&str> = chart.datasets.keys().collect();
        assert_eq!(keys, vec!["Squat", "Bench"]);
        assert_eq!(
            chart.datasets.get("Squat").unwrap(),
            &vec![
                Point {
                    x: "31/12/23".into(),
                    y: 100.0
                },
                Point {
                    x: "03/01/24".into(),
                    y: 105.0
                },
            ]
        );
        let bench: Vec<f64> = chart.datasets.get("Bench").unwrap().iter().map(|p| p.y).collect();
        assert_eq!(bench, vec![0.0, 82.5]);
    }

    #[test]
    fn training_datasets_follow_input_order() {
        let entries = vec![
            training("2024-06-10", "Squat", Some(100.0)),
            training("2024-06-01", "Bench", Some(80.0)),
            training("2024-06-03", "Squat", Some(95.0)),
            training("undated", "Row", Some(60.0)),
        ];
        let chart = training_series(&entries, Period::OneMonth, day("2024-06-15"));
        let keys: Vec<&str> = chart.datasets.keys().collect();
        assert_eq!(keys, vec!["Squat", "Bench"]);
        let squat: Vec<&str> = chart
            .datasets
            .get("Squat")
            .unwrap()
            .iter()
            .map(|p| p.x.as_str())
            .collect();
        assert_eq!(squat, vec!["03/06/24", "10/06/24"]);
        assert_eq!(chart.labels, vec!["01/06/24", "03/06/24", "10/06/24"]);
    }

    #[test]
    fn supplement_bars_use_earliest_start() {
        let supplement = |name: &str, start: &str| SupplementEntry {
            name: name.into(),
            start_date: start.into(),
            ..Default::default()
        };
        let entries = vec![
            supplement("Creatine", "2024-05-01"),
            supplement("Omega 3", "2024-04-10"),
            supplement("Creatine", "2024-04-20"),
            supplement("Zinc", "2023-01-01"),
        ];
        let chart = supplement_series(&entries, Period::ThreeMonths, day("2024-06-15"));
        assert_eq!(chart.labels, vec!["Creatine", "Omega 3"]);
        assert_eq!(chart.start_dates, vec!["20/04/24", "10/04/24"]);
    }

    #[test]
    fn charts_are_repeatable() {
        let entries = vec![waist("2024-06-01", Some(85.0)), waist("2024-06-08", None)];
        let a = serde_json::to_string(&measurement_chart(&entries, Period::All, day("2024-06-15")))
            .unwrap();
        let b = serde_json::to_string(&measurement_chart(&entries, Period::All, day("2024-06-15")))
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(
            a,
            r#"{"labels":["01/06/24","08/06/24"],"series":{"waist":{"label":"Waist (cm)","values":[85.0,null]}}}"#
        );
    }
}
