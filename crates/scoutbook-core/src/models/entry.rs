//! Entry data model
//!
//! The field map of one scouting session plus the event context it was
//! collected under. The aggregate `timestamp_ms` is the merge/sync
//! watermark: it is recomputed on every mutation and never smaller than any
//! individual field's timestamp.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::EntryValue;

/// Current wall-clock time as Unix milliseconds.
pub fn now_ms() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

/// Field values of one scouting entry, keyed by field identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
    /// Competition year the data was collected under
    pub year: u32,
    /// Event code the data was collected under
    pub event: String,
    /// The mapping from field ids to values
    pub entries: HashMap<String, EntryValue>,
    /// Most recent edit across all fields (Unix ms)
    pub timestamp_ms: u64,
}

impl EntryData {
    /// Create an empty entry for the given event context.
    #[must_use]
    pub fn new(year: u32, event: impl Into<String>) -> Self {
        Self {
            year,
            event: event.into(),
            entries: HashMap::new(),
            timestamp_ms: 0,
        }
    }

    /// Replace one field's value in place and advance the aggregate
    /// timestamp.
    pub fn set_value(&mut self, field_id: impl Into<String>, value: EntryValue) {
        self.entries.insert(field_id.into(), value);
        self.bump_timestamp();
    }

    /// Remove one field (a logical delete of that field, not of the entry).
    ///
    /// The aggregate timestamp still advances so the entry is picked up as
    /// changed by the next sync run. Returns whether the field was present.
    pub fn clear_value(&mut self, field_id: &str) -> bool {
        let removed = self.entries.remove(field_id).is_some();
        if removed {
            self.bump_timestamp();
        }
        removed
    }

    /// Maximum authorship timestamp across all fields; 0 when empty.
    pub fn max_field_timestamp(&self) -> u64 {
        self.entries
            .values()
            .map(EntryValue::timestamp_ms)
            .max()
            .unwrap_or(0)
    }

    /// Distinct scout names present in the field values.
    ///
    /// Values with an empty scout name are reported as `"Unknown"`.
    pub fn scouts(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .values()
            .map(|value| {
                let scout = value.scout().trim();
                if scout.is_empty() {
                    "Unknown".to_string()
                } else {
                    scout.to_string()
                }
            })
            .collect();
        names.sort();
        names.dedup();
        names
    }

    /// Whether this entry belongs to the given event context.
    pub fn matches_event(&self, year: u32, event: &str) -> bool {
        self.year == year && self.event == event
    }

    fn bump_timestamp(&mut self) {
        self.timestamp_ms = self.max_field_timestamp().max(now_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BoolEntry, CounterEntry};

    fn counter(count: i64, timestamp_ms: u64, scout: &str) -> EntryValue {
        EntryValue::Counter(CounterEntry {
            count,
            timestamp_ms,
            scout: scout.to_string(),
        })
    }

    #[test]
    fn test_new_entry_is_empty_with_zero_timestamp() {
        let data = EntryData::new(2024, "2024idbo");
        assert!(data.entries.is_empty());
        assert_eq!(data.timestamp_ms, 0);
    }

    #[test]
    fn test_set_value_advances_aggregate_monotonically() {
        let mut data = EntryData::new(2024, "2024idbo");

        data.set_value("auto_score", counter(3, now_ms(), "Ada"));
        let first = data.timestamp_ms;
        assert!(first >= data.max_field_timestamp());

        data.set_value("teleop_score", counter(5, now_ms(), "Ada"));
        let second = data.timestamp_ms;
        assert!(second >= first);
        assert!(second >= data.max_field_timestamp());
    }

    #[test]
    fn test_aggregate_is_at_least_every_field_timestamp() {
        let mut data = EntryData::new(2024, "2024idbo");
        data.set_value("a", counter(1, 100, "Ada"));
        data.set_value("b", counter(2, 200, "Ada"));

        let max = data.max_field_timestamp();
        assert_eq!(max, 200);
        assert!(data.timestamp_ms >= max);
        for value in data.entries.values() {
            assert!(data.timestamp_ms >= value.timestamp_ms());
        }
    }

    #[test]
    fn test_clear_value_removes_field_and_advances_timestamp() {
        let mut data = EntryData::new(2024, "2024idbo");
        data.set_value("a", counter(1, 100, "Ada"));
        let before = data.timestamp_ms;

        assert!(data.clear_value("a"));
        assert!(data.entries.is_empty());
        assert!(data.timestamp_ms >= before);

        assert!(!data.clear_value("a"));
    }

    #[test]
    fn test_scouts_dedupes_and_maps_empty_to_unknown() {
        let mut data = EntryData::new(2024, "2024idbo");
        data.set_value("a", counter(1, 100, "Ada"));
        data.set_value("b", counter(2, 100, "Ada"));
        data.set_value(
            "c",
            EntryValue::Bool(BoolEntry {
                value: true,
                timestamp_ms: 100,
                scout: String::new(),
            }),
        );

        assert_eq!(data.scouts(), vec!["Ada".to_string(), "Unknown".to_string()]);
    }

    #[test]
    fn test_matches_event() {
        let data = EntryData::new(2024, "2024idbo");
        assert!(data.matches_event(2024, "2024idbo"));
        assert!(!data.matches_event(2023, "2024idbo"));
        assert!(!data.matches_event(2024, "2024wasno"));
    }
}
