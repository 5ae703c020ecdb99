//! Entry records and identities
//!
//! A record associates [`EntryData`] with an identity: match and driver
//! entries are addressed by a (match id, team id) pair, pit entries by team
//! id alone. Driver records share the match key shape but live in a separate
//! namespace, with a distinct storage prefix and server endpoint.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::entry::EntryData;

/// The three kinds of scouting entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// One team's performance in one match
    Match,
    /// Pit scouting for one team
    Pit,
    /// Drive-team feedback for one team in one match
    Driver,
}

impl RecordKind {
    /// All kinds, in sync order.
    pub const ALL: [Self; 3] = [Self::Match, Self::Pit, Self::Driver];

    /// Storage key prefix for this kind.
    pub const fn storage_prefix(self) -> &'static str {
        match self {
            Self::Match => "match-",
            Self::Pit => "team-",
            Self::Driver => "driver-",
        }
    }

    /// Settings key holding the last successful sync watermark.
    pub const fn watermark_key(self) -> &'static str {
        match self {
            Self::Match => "lastMatchSave",
            Self::Pit => "lastPitSave",
            Self::Driver => "lastDriverSave",
        }
    }

    /// Settings key caching this kind's field definitions.
    pub const fn fields_key(self) -> &'static str {
        match self {
            Self::Match => "matchFields",
            Self::Pit => "pitFields",
            Self::Driver => "driverFields",
        }
    }

    /// Path segment used by the server API for this kind.
    pub const fn api_segment(self) -> &'static str {
        match self {
            Self::Match => "match_entry",
            Self::Pit => "pit_entry",
            Self::Driver => "driver_entry",
        }
    }

    /// Human readable name for logs and CLI output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Pit => "pit",
            Self::Driver => "driver",
        }
    }
}

/// Identity of a match or driver record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchTeamKey {
    pub match_id: String,
    pub team_id: String,
}

impl MatchTeamKey {
    #[must_use]
    pub fn new(match_id: impl Into<String>, team_id: impl Into<String>) -> Self {
        Self {
            match_id: match_id.into(),
            team_id: team_id.into(),
        }
    }
}

/// Minimal digest of one locally held record, sent during the incoming diff
/// so the server only returns records newer than what the client holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntryMarker {
    pub match_id: String,
    pub team_id: String,
    pub timestamp_ms: u64,
}

/// Known-entry marker for pit records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PitEntryMarker {
    pub team_id: String,
    pub timestamp_ms: u64,
}

/// One stored scouting record: identity plus data, as exchanged with the
/// server and persisted locally.
///
/// The storage key is derived deterministically from the identity tuple, so
/// the same identity always maps to the same row.
pub trait EntryRecord: Serialize + DeserializeOwned + Clone {
    /// Which kind of record this is.
    const KIND: RecordKind;
    /// Identity tuple addressing one record of this kind.
    type Id;
    /// Known-entry marker wire type for this kind.
    type Marker: Serialize + DeserializeOwned;

    /// Storage key for the given identity.
    fn key_for(id: &Self::Id) -> String;

    /// Storage key of this record.
    fn storage_key(&self) -> String;

    /// The entry data.
    fn data(&self) -> &EntryData;

    /// Mutable access to the entry data.
    fn data_mut(&mut self) -> &mut EntryData;

    /// Known-entry marker for this record. The marker timestamp is the
    /// maximum authorship timestamp across the record's fields.
    fn marker(&self) -> Self::Marker;
}

/// A match scouting record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEntryIdData {
    pub match_id: String,
    pub team_id: String,
    pub data: EntryData,
}

impl EntryRecord for MatchEntryIdData {
    const KIND: RecordKind = RecordKind::Match;
    type Id = MatchTeamKey;
    type Marker = MatchEntryMarker;

    fn key_for(id: &Self::Id) -> String {
        format!("match-{}-{}", id.match_id, id.team_id)
    }

    fn storage_key(&self) -> String {
        format!("match-{}-{}", self.match_id, self.team_id)
    }

    fn data(&self) -> &EntryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut EntryData {
        &mut self.data
    }

    fn marker(&self) -> Self::Marker {
        MatchEntryMarker {
            match_id: self.match_id.clone(),
            team_id: self.team_id.clone(),
            timestamp_ms: self.data.max_field_timestamp(),
        }
    }
}

/// A pit scouting record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitEntryIdData {
    pub team_id: String,
    pub data: EntryData,
}

impl EntryRecord for PitEntryIdData {
    const KIND: RecordKind = RecordKind::Pit;
    type Id = String;
    type Marker = PitEntryMarker;

    fn key_for(id: &Self::Id) -> String {
        format!("team-{id}")
    }

    fn storage_key(&self) -> String {
        format!("team-{}", self.team_id)
    }

    fn data(&self) -> &EntryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut EntryData {
        &mut self.data
    }

    fn marker(&self) -> Self::Marker {
        PitEntryMarker {
            team_id: self.team_id.clone(),
            timestamp_ms: self.data.max_field_timestamp(),
        }
    }
}

/// A drive-team feedback record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverEntryIdData {
    pub match_id: String,
    pub team_id: String,
    pub data: EntryData,
}

impl EntryRecord for DriverEntryIdData {
    const KIND: RecordKind = RecordKind::Driver;
    type Id = MatchTeamKey;
    type Marker = MatchEntryMarker;

    fn key_for(id: &Self::Id) -> String {
        format!("driver-{}-{}", id.match_id, id.team_id)
    }

    fn storage_key(&self) -> String {
        format!("driver-{}-{}", self.match_id, self.team_id)
    }

    fn data(&self) -> &EntryData {
        &self.data
    }

    fn data_mut(&mut self) -> &mut EntryData {
        &mut self.data
    }

    fn marker(&self) -> Self::Marker {
        MatchEntryMarker {
            match_id: self.match_id.clone(),
            team_id: self.team_id.clone(),
            timestamp_ms: self.data.max_field_timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CounterEntry, EntryValue};

    #[test]
    fn test_storage_keys_are_deterministic() {
        let match_entry = MatchEntryIdData {
            match_id: "12".to_string(),
            team_id: "254".to_string(),
            data: EntryData::new(2024, "2024idbo"),
        };
        assert_eq!(match_entry.storage_key(), "match-12-254");
        assert_eq!(
            MatchEntryIdData::key_for(&MatchTeamKey::new("12", "254")),
            "match-12-254"
        );

        let pit_entry = PitEntryIdData {
            team_id: "254".to_string(),
            data: EntryData::new(2024, "2024idbo"),
        };
        assert_eq!(pit_entry.storage_key(), "team-254");

        let driver_entry = DriverEntryIdData {
            match_id: "12".to_string(),
            team_id: "254".to_string(),
            data: EntryData::new(2024, "2024idbo"),
        };
        assert_eq!(driver_entry.storage_key(), "driver-12-254");
    }

    #[test]
    fn test_driver_and_match_namespaces_differ() {
        let key = MatchTeamKey::new("12", "254");
        assert_ne!(
            MatchEntryIdData::key_for(&key),
            DriverEntryIdData::key_for(&key)
        );
    }

    #[test]
    fn test_marker_uses_max_field_timestamp() {
        let mut data = EntryData::new(2024, "2024idbo");
        data.set_value(
            "a",
            EntryValue::Counter(CounterEntry {
                count: 1,
                timestamp_ms: 100,
                scout: "Ada".to_string(),
            }),
        );
        data.set_value(
            "b",
            EntryValue::Counter(CounterEntry {
                count: 2,
                timestamp_ms: 250,
                scout: "Ada".to_string(),
            }),
        );

        let record = MatchEntryIdData {
            match_id: "7".to_string(),
            team_id: "1678".to_string(),
            data,
        };
        let marker = record.marker();
        assert_eq!(marker.timestamp_ms, 250);
        assert_eq!(marker.match_id, "7");
        assert_eq!(marker.team_id, "1678");
    }

    #[test]
    fn test_kind_tables() {
        assert_eq!(RecordKind::Match.storage_prefix(), "match-");
        assert_eq!(RecordKind::Pit.storage_prefix(), "team-");
        assert_eq!(RecordKind::Driver.storage_prefix(), "driver-");
        assert_eq!(RecordKind::Match.watermark_key(), "lastMatchSave");
        assert_eq!(RecordKind::Pit.api_segment(), "pit_entry");
        assert_eq!(RecordKind::Driver.fields_key(), "driverFields");
    }
}
