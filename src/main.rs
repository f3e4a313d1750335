//! Command line entry point: load a record snapshot, compute every view and
//! print it as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate};
use clap::Parser;
use log::{error, info};
use serde::Serialize;

use progress_trends::{
    Period, Settings, Snapshot, StatisticsSummary, SupplementEntry, TrainingEntry, build_series,
    analysis::{ExerciseProgress, exercise_progression, summarize},
    export::{
        ChartsExport, save_line_chart_csv, save_measurements_csv, save_progression_csv,
        save_summary_json, write_json,
    },
    grouping::{OrderedMap, SIMILAR_KEY_THRESHOLD, group_by_day, similar_keys},
    models::{ALL_MEASUREMENTS, MeasurementField},
    nutrition::{EnergyEstimate, active_supplements, estimate_energy},
    plotting::{
        SupplementChart, TrainingChart, journal_chart, supplement_series, training_series,
        weight_chart,
    },
    snapshot::load_weights_csv,
};

#[derive(Parser)]
#[command(name = "progress-trends")]
#[command(about = "Trends and statistics for a body and training log", long_about = None)]
struct Cli {
    /// JSON snapshot with weights, measurements, trainings, supplements and journal
    snapshot: PathBuf,
    /// Time window: 1month, 3months, 6months, 1year or all
    #[arg(short, long)]
    period: Option<Period>,
    /// Measurements to chart, e.g. waist,hips (default: all twelve)
    #[arg(long, value_delimiter = ',')]
    metrics: Vec<MeasurementField>,
    /// Evaluation date (YYYY-MM-DD), defaults to today
    #[arg(long, value_parser = parse_day)]
    now: Option<NaiveDate>,
    /// Extra weigh-ins from a CSV file with date and value columns
    #[arg(long)]
    weights_csv: Option<PathBuf>,
    /// Directory to write chart, progression and summary files to
    #[arg(long)]
    csv: Option<PathBuf>,
    /// Write the full report to this file instead of stdout
    #[arg(long)]
    json: Option<PathBuf>,
}

fn parse_day(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|e| format!("{s}: {e}"))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    now: NaiveDate,
    summary: StatisticsSummary,
    charts: ChartsExport<'a>,
    training: TrainingChart,
    supplements: SupplementChart,
    active_supplements: Vec<&'a SupplementEntry>,
    progression: &'a OrderedMap<ExerciseProgress>,
    sessions: OrderedMap<Vec<&'a TrainingEntry>>,
    similar_exercises: Vec<(String, String)>,
    energy: EnergyEstimate,
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load();
    let period = cli.period.unwrap_or(settings.default_period);
    let now = cli.now.unwrap_or_else(|| Local::now().date_naive());

    let mut snapshot = Snapshot::load(&cli.snapshot)?;
    if let Some(path) = &cli.weights_csv {
        let extra = load_weights_csv(std::fs::File::open(path)?)?;
        info!("Loaded {} weigh-ins from {}", extra.len(), path.display());
        snapshot.weights.extend(extra);
    }

    info!("Building report for {period} ending {now}");
    let weight = weight_chart(&snapshot.weights, period, now);
    let fields = if cli.metrics.is_empty() {
        ALL_MEASUREMENTS.to_vec()
    } else {
        cli.metrics.clone()
    };
    let measurements = build_series(&snapshot.measurements, &fields, period, now);
    let journal = journal_chart(&snapshot.journal, period, now);
    let progression = exercise_progression(&snapshot.trainings, period, now);
    let similar_exercises = similar_keys(progression.keys(), SIMILAR_KEY_THRESHOLD);
    for (a, b) in &similar_exercises {
        log::warn!("Exercises '{a}' and '{b}' look like the same movement");
    }

    let report = Report {
        now,
        summary: summarize(&snapshot, period, now),
        charts: ChartsExport {
            weight: &weight,
            measurements: &measurements,
            journal: &journal,
        },
        training: training_series(&snapshot.trainings, period, now),
        supplements: supplement_series(&snapshot.supplements, period, now),
        active_supplements: active_supplements(&snapshot.supplements, now),
        progression: &progression,
        sessions: group_by_day(&snapshot.trainings),
        similar_exercises,
        energy: estimate_energy(
            &snapshot.weights,
            &settings.profile,
            settings.fallback_weight_kg,
        ),
    };

    if let Some(dir) = &cli.csv {
        std::fs::create_dir_all(dir)?;
        save_line_chart_csv(dir.join("weight.csv"), &weight)?;
        save_line_chart_csv(dir.join("measurements_chart.csv"), &measurements)?;
        save_line_chart_csv(dir.join("journal.csv"), &journal)?;
        save_measurements_csv(dir.join("measurements.csv"), &snapshot.measurements)?;
        save_progression_csv(dir.join("progression.csv"), &progression)?;
        save_summary_json(dir.join("summary.json"), &report.summary)?;
        info!("Wrote CSV tables to {}", dir.display());
    }

    match &cli.json {
        Some(path) => {
            write_json(&report, path)?;
            info!("Wrote report to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
