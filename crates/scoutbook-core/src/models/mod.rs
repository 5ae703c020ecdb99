//! Data models for scoutbook

mod entry;
mod event;
mod record;
mod value;

pub use entry::{now_ms, EntryData};
pub use event::EventInfo;
pub use record::{
    DriverEntryIdData, EntryRecord, MatchEntryIdData, MatchEntryMarker, MatchTeamKey,
    PitEntryIdData, PitEntryMarker, RecordKind,
};
pub use value::{
    BoolEntry, CounterEntry, EntryValue, EnumEntry, ImageEntry, ImageRef, ImageUpload, TextEntry,
    TimerEntry,
};
