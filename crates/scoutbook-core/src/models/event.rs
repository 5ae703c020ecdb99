//! Event configuration model

use serde::{Deserialize, Serialize};

/// The current event's roster, as delivered by the server.
///
/// Only the event context is typed: the match list and team roster are
/// treated as an opaque payload that is cached verbatim and rendered by
/// consumers that understand the current season's shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    /// Competition year
    pub year: u32,
    /// Event code, e.g. `2024idbo`
    pub event: String,
    /// Remainder of the payload (match list, team roster, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_info_keeps_unknown_fields() {
        let json = r#"{"year":2024,"event":"2024idbo","match_infos":[{"id":1}]}"#;
        let info: EventInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.year, 2024);
        assert_eq!(info.event, "2024idbo");
        assert!(info.extra.contains_key("match_infos"));

        let back = serde_json::to_value(&info).unwrap();
        assert_eq!(back["match_infos"][0]["id"], 1);
    }
}
