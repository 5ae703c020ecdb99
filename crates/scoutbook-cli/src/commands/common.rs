use std::env;
use std::path::Path;

use scoutbook_core::models::{
    DriverEntryIdData, EntryData, EntryRecord, EntryValue, EventInfo, MatchEntryIdData,
    MatchTeamKey, PitEntryIdData,
};
use scoutbook_core::models::{BoolEntry, CounterEntry, EnumEntry, TextEntry, TimerEntry};
use scoutbook_core::store::{Database, EntryStore, SettingsStore};

use crate::cli::EntryTarget;
use crate::error::CliError;

/// Open (and migrate) the structured store, creating parent directories.
pub fn open_database(path: &Path) -> Result<Database, CliError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(Database::open(path)?)
}

/// The scout name that will be stamped on edits.
///
/// Settings win; the `SCOUTBOOK_SCOUT_NAME` environment variable is a
/// fallback for shared devices.
pub fn require_scout_name(settings: &SettingsStore<'_>) -> Result<String, CliError> {
    if let Some(name) = settings.scout_name()? {
        return Ok(name);
    }
    env::var("SCOUTBOOK_SCOUT_NAME")
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .ok_or(CliError::ScoutNameNotSet)
}

/// The current event context; editing is blocked until a sync cached it.
pub fn require_event(settings: &SettingsStore<'_>) -> Result<EventInfo, CliError> {
    settings.event_info()?.ok_or(CliError::SyncRequired)
}

/// CLI-side construction of records from `--team`/`--match` arguments.
pub trait TargetRecord: EntryRecord {
    /// Build the identity tuple for a command target.
    fn target_id(target: &EntryTarget) -> Result<Self::Id, CliError>;

    /// Create an empty record for an identity.
    fn create(id: &Self::Id, data: EntryData) -> Self;
}

impl TargetRecord for MatchEntryIdData {
    fn target_id(target: &EntryTarget) -> Result<Self::Id, CliError> {
        let match_id = target
            .match_id
            .as_deref()
            .ok_or(CliError::MissingMatchId("match"))?;
        Ok(MatchTeamKey::new(match_id, target.team_id.clone()))
    }

    fn create(id: &Self::Id, data: EntryData) -> Self {
        Self {
            match_id: id.match_id.clone(),
            team_id: id.team_id.clone(),
            data,
        }
    }
}

impl TargetRecord for PitEntryIdData {
    fn target_id(target: &EntryTarget) -> Result<Self::Id, CliError> {
        Ok(target.team_id.clone())
    }

    fn create(id: &Self::Id, data: EntryData) -> Self {
        Self {
            team_id: id.clone(),
            data,
        }
    }
}

impl TargetRecord for DriverEntryIdData {
    fn target_id(target: &EntryTarget) -> Result<Self::Id, CliError> {
        let match_id = target
            .match_id
            .as_deref()
            .ok_or(CliError::MissingMatchId("driver"))?;
        Ok(MatchTeamKey::new(match_id, target.team_id.clone()))
    }

    fn create(id: &Self::Id, data: EntryData) -> Self {
        Self {
            match_id: id.match_id.clone(),
            team_id: id.team_id.clone(),
            data,
        }
    }
}

/// Load the record for an identity, or start a fresh one for the current
/// event.
///
/// A stored record from a different event starts fresh too; it is replaced
/// at the same key on the next save, matching the per-event lifecycle of
/// entry forms.
pub fn load_or_create<R: TargetRecord>(
    store: &EntryStore<'_>,
    id: &R::Id,
    info: &EventInfo,
) -> Result<R, CliError> {
    if let Some(record) = store.get::<R>(id)? {
        if record.data().matches_event(info.year, &info.event) {
            return Ok(record);
        }
    }
    Ok(R::create(id, EntryData::new(info.year, info.event.clone())))
}

/// Parse a `kind:value` argument into an [`EntryValue`] stamped with the
/// given authorship.
pub fn parse_value(raw: &str, scout: &str, timestamp_ms: u64) -> Result<EntryValue, CliError> {
    let Some((kind, rest)) = raw.split_once(':') else {
        return Err(CliError::InvalidValue(format!(
            "'{raw}' (expected bool:, enum:, counter:, text:, or timer: prefix)"
        )));
    };

    let scout = scout.to_string();
    match kind {
        "bool" => {
            let value = match rest {
                "true" => true,
                "false" => false,
                other => {
                    return Err(CliError::InvalidValue(format!(
                        "bool value must be true or false, got '{other}'"
                    )))
                }
            };
            Ok(EntryValue::Bool(BoolEntry {
                value,
                timestamp_ms,
                scout,
            }))
        }
        "enum" => {
            let value = rest.parse().map_err(|_| {
                CliError::InvalidValue(format!("enum value must be an option index, got '{rest}'"))
            })?;
            Ok(EntryValue::Enum(EnumEntry {
                value,
                timestamp_ms,
                scout,
            }))
        }
        "counter" => {
            let count = rest.parse().map_err(|_| {
                CliError::InvalidValue(format!("counter value must be an integer, got '{rest}'"))
            })?;
            Ok(EntryValue::Counter(CounterEntry {
                count,
                timestamp_ms,
                scout,
            }))
        }
        "text" => Ok(EntryValue::TextEntry(TextEntry {
            text: rest.to_string(),
            timestamp_ms,
            scout,
        })),
        "timer" => {
            let time_seconds = rest.parse().map_err(|_| {
                CliError::InvalidValue(format!("timer value must be seconds, got '{rest}'"))
            })?;
            Ok(EntryValue::Timer(TimerEntry {
                time_seconds,
                timestamp_ms,
                scout,
            }))
        }
        other => Err(CliError::InvalidValue(format!(
            "unknown value kind '{other}'"
        ))),
    }
}

/// Guess a MIME type from a file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::cli::EntryKindArg;

    fn target(kind: EntryKindArg, match_id: Option<&str>) -> EntryTarget {
        EntryTarget {
            kind,
            team_id: "254".to_string(),
            match_id: match_id.map(ToString::to_string),
        }
    }

    #[test]
    fn test_parse_value_kinds() {
        let value = parse_value("counter:3", "Ada", 100).unwrap();
        assert!(matches!(
            value,
            EntryValue::Counter(CounterEntry { count: 3, .. })
        ));
        assert_eq!(value.timestamp_ms(), 100);
        assert_eq!(value.scout(), "Ada");

        assert!(matches!(
            parse_value("bool:true", "Ada", 100).unwrap(),
            EntryValue::Bool(BoolEntry { value: true, .. })
        ));
        assert!(matches!(
            parse_value("enum:2", "Ada", 100).unwrap(),
            EntryValue::Enum(EnumEntry { value: 2, .. })
        ));
        assert!(matches!(
            parse_value("timer:12.5", "Ada", 100).unwrap(),
            EntryValue::Timer(_)
        ));

        let EntryValue::TextEntry(entry) = parse_value("text:hello: world", "Ada", 100).unwrap()
        else {
            panic!("expected text value");
        };
        assert_eq!(entry.text, "hello: world");
    }

    #[test]
    fn test_parse_value_rejects_garbage() {
        assert!(parse_value("nocolon", "Ada", 100).is_err());
        assert!(parse_value("bool:maybe", "Ada", 100).is_err());
        assert!(parse_value("counter:three", "Ada", 100).is_err());
        assert!(parse_value("color:red", "Ada", 100).is_err());
    }

    #[test]
    fn test_target_id_requires_match_for_match_and_driver() {
        let missing = target(EntryKindArg::Match, None);
        assert!(matches!(
            MatchEntryIdData::target_id(&missing),
            Err(CliError::MissingMatchId(_))
        ));
        assert!(matches!(
            DriverEntryIdData::target_id(&missing),
            Err(CliError::MissingMatchId(_))
        ));

        let pit = target(EntryKindArg::Pit, None);
        assert_eq!(PitEntryIdData::target_id(&pit).unwrap(), "254");

        let full = target(EntryKindArg::Match, Some("12"));
        let id = MatchEntryIdData::target_id(&full).unwrap();
        assert_eq!(MatchEntryIdData::key_for(&id), "match-12-254");
    }

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path(&PathBuf::from("robot.PNG")), "image/png");
        assert_eq!(mime_for_path(&PathBuf::from("a/b/photo.jpeg")), "image/jpeg");
        assert_eq!(
            mime_for_path(&PathBuf::from("mystery")),
            "application/octet-stream"
        );
    }
}
