//! Rolling time windows relative to an explicit evaluation date.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::Dated;
use crate::values::parse_date;

/// Caller selected window used to restrict which entries feed a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Period {
    #[serde(rename = "1month")]
    OneMonth,
    #[default]
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

pub const ALL_PERIODS: [Period; 5] = [
    Period::OneMonth,
    Period::ThreeMonths,
    Period::SixMonths,
    Period::OneYear,
    Period::All,
];

impl Period {
    fn months(self) -> Option<u32> {
        match self {
            Period::OneMonth => Some(1),
            Period::ThreeMonths => Some(3),
            Period::SixMonths => Some(6),
            Period::OneYear => Some(12),
            Period::All => None,
        }
    }

    /// First day included in the window, or `None` when unbounded.
    ///
    /// Uses calendar month arithmetic. When the target month is shorter than
    /// the day of `now` the start is clamped to that month's last day, so
    /// one month before March 31st is the end of February.
    pub fn window_start(self, now: NaiveDate) -> Option<NaiveDate> {
        let months = self.months()?;
        Some(
            now.checked_sub_months(Months::new(months))
                .unwrap_or(NaiveDate::MIN),
        )
    }

    /// Whether `date` falls inside the window ending at `now`.
    pub fn contains(self, date: NaiveDate, now: NaiveDate) -> bool {
        match self.window_start(now) {
            Some(start) => date >= start && date <= now,
            None => true,
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Period::OneMonth => "1month",
            Period::ThreeMonths => "3months",
            Period::SixMonths => "6months",
            Period::OneYear => "1year",
            Period::All => "all",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1month" | "1m" => Ok(Period::OneMonth),
            "3months" | "3m" => Ok(Period::ThreeMonths),
            "6months" | "6m" => Ok(Period::SixMonths),
            "1year" | "1y" | "12months" => Ok(Period::OneYear),
            "all" => Ok(Period::All),
            other => Err(format!("Unknown period: {other}")),
        }
    }
}

/// Restrict `entries` to the window, reading each entry's own date.
pub fn filter_by_period<E: Dated>(entries: &[E], period: Period, now: NaiveDate) -> Vec<&E> {
    filter_by_period_on(entries, |e| e.date(), period, now)
}

/// Restrict `entries` to the window using the date returned by `date_field`.
///
/// [`Period::All`] keeps every entry, dated or not. Bounded windows silently
/// drop entries whose date does not parse. The input is never modified.
pub fn filter_by_period_on<'a, E, F>(
    entries: &'a [E],
    date_field: F,
    period: Period,
    now: NaiveDate,
) -> Vec<&'a E>
where
    F: Fn(&E) -> &str,
{
    if period == Period::All {
        return entries.iter().collect();
    }
    entries
        .iter()
        .filter(|e| parse_date(date_field(*e)).is_some_and(|d| period.contains(d, now)))
        .collect()
}

/// Entries inside the window paired with their parsed date, oldest first.
///
/// Undated entries are dropped even for [`Period::All`]. Entries sharing a
/// date keep their input order.
pub fn chronological<E: Dated>(
    entries: &[E],
    period: Period,
    now: NaiveDate,
) -> Vec<(NaiveDate, &E)> {
    let mut dated: Vec<(NaiveDate, &E)> = filter_by_period(entries, period, now)
        .into_iter()
        .filter_map(|e| e.parsed_date().map(|d| (d, e)))
        .collect();
    dated.sort_by_key(|(d, _)| *d);
    dated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SupplementEntry, WeightEntry};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn weight(d: &str, v: f64) -> WeightEntry {
        WeightEntry {
            date: d.into(),
            value: Some(v),
        }
    }

    #[test]
    fn one_month_window_boundaries() {
        let entries = vec![weight("2024-05-10", 80.0), weight("2024-05-20", 79.0)];
        let kept = filter_by_period(&entries, Period::OneMonth, date("2024-06-15"));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].date, "2024-05-20");
    }

    #[test]
    fn window_start_is_inclusive_and_future_is_excluded() {
        let entries = vec![
            weight("2024-05-15", 80.0),
            weight("2024-06-15", 79.0),
            weight("2024-06-16", 78.0),
        ];
        let kept = filter_by_period(&entries, Period::OneMonth, date("2024-06-15"));
        let dates: Vec<&str> = kept.iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-05-15", "2024-06-15"]);
    }

    #[test]
    fn month_arithmetic_rolls_over_years_and_clamps_days() {
        assert_eq!(
            Period::ThreeMonths.window_start(date("2024-02-10")),
            Some(date("2023-11-10"))
        );
        assert_eq!(
            Period::OneMonth.window_start(date("2024-03-31")),
            Some(date("2024-02-29"))
        );
        assert_eq!(
            Period::OneYear.window_start(date("2024-02-29")),
            Some(date("2023-02-28"))
        );
        assert_eq!(Period::All.window_start(date("2024-02-29")), None);
    }

    #[test]
    fn all_keeps_everything_including_undated() {
        let entries = vec![weight("garbage", 80.0), weight("1999-01-01", 90.0)];
        let kept = filter_by_period(&entries, Period::All, date("2024-06-15"));
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn bounded_window_drops_undated() {
        let entries = vec![weight("", 80.0), weight("2024-06-01", 79.0)];
        let kept = filter_by_period(&entries, Period::SixMonths, date("2024-06-15"));
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn custom_date_field() {
        let entries = vec![SupplementEntry {
            name: "Zinc".into(),
            start_date: "2020-01-01".into(),
            end_date: Some("2024-06-01".into()),
            ..Default::default()
        }];
        let by_end = filter_by_period_on(
            &entries,
            |s| s.end_date.as_deref().unwrap_or(""),
            Period::OneMonth,
            date("2024-06-15"),
        );
        assert_eq!(by_end.len(), 1);
        assert!(filter_by_period(&entries, Period::OneMonth, date("2024-06-15")).is_empty());
    }

    #[test]
    fn chronological_sorts_by_date_not_input_order() {
        let entries = vec![
            weight("2024-06-03", 3.0),
            weight("bad", 0.0),
            weight("2024-06-01", 1.0),
            weight("2024-06-02", 2.0),
        ];
        let sorted = chronological(&entries, Period::All, date("2024-06-15"));
        let values: Vec<Option<f64>> = sorted.iter().map(|(_, e)| e.value).collect();
        assert_eq!(values, vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn period_parses_from_text() {
        for p in ALL_PERIODS {
            assert_eq!(p.to_string().parse::<Period>(), Ok(p));
        }
        assert_eq!("1Y".parse::<Period>(), Ok(Period::OneYear));
        assert!("fortnight".parse::<Period>().is_err());
    }
}
