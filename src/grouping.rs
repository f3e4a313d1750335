//! Partitioning record collections by a categorical key.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::Dated;

/// Similarity above which two group keys are reported as probable duplicates.
pub const SIMILAR_KEY_THRESHOLD: f64 = 0.85;

/// String keyed map that iterates in first-insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        match self.index.get(&key) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Mutable access to the value for `key`, inserting `default()` first if
    /// the key is new.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.to_string(), i);
                self.entries.push((key.to_string(), default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = OrderedMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Group entries by `key`.
///
/// Groups appear in the order their key is first seen and each group keeps
/// the input order of its entries. Keys are compared exactly, so `"Squat"`
/// and `"squat"` form two groups; see [`similar_keys`] to detect those.
pub fn group_by<'a, E, I, F>(entries: I, key: F) -> OrderedMap<Vec<&'a E>>
where
    E: 'a,
    I: IntoIterator<Item = &'a E>,
    F: Fn(&E) -> &str,
{
    let mut groups: OrderedMap<Vec<&'a E>> = OrderedMap::new();
    for e in entries {
        groups.get_or_insert_with(key(e), Vec::new).push(e);
    }
    groups
}

/// Group dated entries by calendar day, most recent day first.
///
/// Keys are `YYYY-MM-DD`. Undated entries are skipped.
pub fn group_by_day<'a, E, I>(entries: I) -> OrderedMap<Vec<&'a E>>
where
    E: Dated + 'a,
    I: IntoIterator<Item = &'a E>,
{
    let mut dated: Vec<(NaiveDate, &'a E)> = entries
        .into_iter()
        .filter_map(|e| e.parsed_date().map(|d| (d, e)))
        .collect();
    dated.sort_by(|a, b| b.0.cmp(&a.0));
    let mut days: OrderedMap<Vec<&'a E>> = OrderedMap::new();
    for (d, e) in dated {
        days.get_or_insert_with(&d.format("%Y-%m-%d").to_string(), Vec::new)
            .push(e);
    }
    days
}

/// Pairs of distinct keys that probably name the same thing.
///
/// Keys are compared case-insensitively after trimming, using normalized
/// Levenshtein similarity. Pairs are returned in key order.
pub fn similar_keys<'a, I>(keys: I, threshold: f64) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a str>,
{
    let keys: Vec<&str> = keys.into_iter().collect();
    let normalized: Vec<String> = keys.iter().map(|k| k.trim().to_lowercase()).collect();
    let mut pairs = Vec::new();
    for i in 0..keys.len() {
        for j in (i + 1)..keys.len() {
            if keys[i] == keys[j] {
                continue;
            }
            let score = strsim::normalized_levenshtein(&normalized[i], &normalized[j]);
            if score >= threshold {
                log::debug!("'{}' looks like '{}' ({score:.2})", keys[i], keys[j]);
                pairs.push((keys[i].to_string(), keys[j].to_string()));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TrainingEntry;

    fn training(exercise: &str, date: &str) -> TrainingEntry {
        TrainingEntry {
            date: date.into(),
            exercise: exercise.into(),
            ..Default::default()
        }
    }

    #[test]
    fn groups_follow_first_occurrence() {
        let entries = vec![
            training("Squat", "2024-01-01"),
            training("Bench", "2024-01-02"),
            training("Squat", "2024-01-03"),
        ];
        let groups = group_by(&entries, |e| e.exercise.as_str());
        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec!["Squat", "Bench"]);
        let squat: Vec<&str> = groups
            .get("Squat")
            .unwrap()
            .iter()
            .map(|e| e.date.as_str())
            .collect();
        assert_eq!(squat, vec!["2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn keys_are_case_sensitive() {
        let entries = vec![training("Squat", "2024-01-01"), training("squat", "2024-01-02")];
        let groups = group_by(&entries, |e| e.exercise.as_str());
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn group_order_is_not_input_date_order() {
        let entries = vec![training("Row", "2024-03-01"), training("Curl", "2024-01-01")];
        let groups = group_by(&entries, |e| e.exercise.as_str());
        let keys: Vec<&str> = groups.keys().collect();
        assert_eq!(keys, vec!["Row", "Curl"]);
    }

    #[test]
    fn group_by_day_is_newest_first() {
        let entries = vec![
            training("Squat", "2024-01-01"),
            training("Bench", "2024-01-03"),
            training("Row", "oops"),
            training("Dips", "2024-01-01"),
        ];
        let days = group_by_day(&entries);
        let keys: Vec<&str> = days.keys().collect();
        assert_eq!(keys, vec!["2024-01-03", "2024-01-01"]);
        let first_day: Vec<&str> = days
            .get("2024-01-01")
            .unwrap()
            .iter()
            .map(|e| e.exercise.as_str())
            .collect();
        assert_eq!(first_day, vec!["Squat", "Dips"]);
    }

    #[test]
    fn ordered_map_serializes_in_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("waist", 1);
        map.insert("neck", 2);
        map.insert("waist", 3);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"waist":3,"neck":2}"#);
    }

    #[test]
    fn similar_keys_flags_case_and_typos() {
        let pairs = similar_keys(
            ["Squat", "squat ", "Bench Press", "Bench press", "Deadlift"],
            SIMILAR_KEY_THRESHOLD,
        );
        assert_eq!(
            pairs,
            vec![
                ("Squat".to_string(), "squat ".to_string()),
                ("Bench Press".to_string(), "Bench press".to_string()),
            ]
        );
    }
}
