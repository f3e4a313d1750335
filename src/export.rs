use crate::{
    analysis::{ExerciseProgress, StatisticsSummary},
    grouping::OrderedMap,
    models::MeasurementEntry,
    plotting::LineChart,
};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

pub fn write_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    value: &T,
    path: P,
) -> std::io::Result<()> {
    let file = std::io::BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(file, value).map_err(std::io::Error::other)
}

pub fn write_csv<T: Serialize>(writer: impl Write, records: &[T]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in records {
        wtr.serialize(r)?;
    }
    wtr.flush().map_err(Into::into)
}

/// Write a chart as a table: one row per label, one column per series.
///
/// Missing values are written as empty cells.
pub fn write_line_chart_csv(writer: impl Write, chart: &LineChart) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut header = vec!["date"];
    header.extend(chart.series.keys());
    wtr.write_record(&header)?;

    for (row, label) in chart.labels.iter().enumerate() {
        let mut record = vec![label.clone()];
        for series in chart.series.values() {
            let cell = series.values.get(row).copied().flatten();
            record.push(cell.map(|v| v.to_string()).unwrap_or_default());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(Into::into)
}

pub fn save_line_chart_csv<P: AsRef<Path>>(path: P, chart: &LineChart) -> csv::Result<()> {
    write_line_chart_csv(std::fs::File::create(path)?, chart)
}

pub fn save_summary_json<P: AsRef<Path>>(
    path: P,
    summary: &StatisticsSummary,
) -> std::io::Result<()> {
    write_json(summary, path)
}

pub fn save_progression_csv<P: AsRef<Path>>(
    path: P,
    progression: &OrderedMap<ExerciseProgress>,
) -> csv::Result<()> {
    #[derive(Serialize)]
    struct Row<'a> {
        exercise: &'a str,
        sessions: usize,
        best_load: Option<f64>,
        total_volume: f64,
        average_effort: Option<f64>,
        load_difference: Option<f64>,
        load_percentage: Option<f64>,
    }
    let rows: Vec<Row> = progression
        .iter()
        .map(|(exercise, p)| Row {
            exercise,
            sessions: p.sessions,
            best_load: p.best_load,
            total_volume: p.total_volume,
            average_effort: p.average_effort,
            load_difference: p.load_evolution.map(|e| e.difference),
            load_percentage: p.load_evolution.and_then(|e| e.percentage),
        })
        .collect();
    write_csv(std::fs::File::create(path)?, &rows)
}

pub fn save_measurements_csv<P: AsRef<Path>>(
    path: P,
    entries: &[MeasurementEntry],
) -> csv::Result<()> {
    write_csv(std::fs::File::create(path)?, entries)
}

#[derive(Serialize)]
pub struct ChartsExport<'a> {
    pub weight: &'a LineChart,
    pub measurements: &'a LineChart,
    pub journal: &'a LineChart,
}
