//! Trend and statistics engine for a personal body and training log.
//!
//! Every computation takes the record collections, a [`Period`] and an
//! explicit evaluation date, and returns plain serializable values.

pub mod analysis;
pub mod export;
pub mod grouping;
pub mod models;
pub mod nutrition;
pub mod period;
pub mod plotting;
pub mod settings;
pub mod snapshot;
pub mod values;

pub use analysis::{Evolution, StatisticsSummary, average, evolution, summarize};
pub use grouping::{OrderedMap, group_by, group_by_day};
pub use models::{
    Dated, JournalEntry, MeasurementEntry, Metric, SupplementEntry, TrainingEntry, WeightEntry,
};
pub use period::{Period, filter_by_period};
pub use plotting::{LineChart, build_series};
pub use settings::Settings;
pub use snapshot::{LoadError, Snapshot};
pub use values::parse_value;
