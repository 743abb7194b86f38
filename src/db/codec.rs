//! Persisted record types and their JSON encoding
//!
//! Layout (all values JSON text):
//! - `weeklyMuscleGroups`: `{ "<week label>": [{"muscle": "...", "sets": n}, ...] }`
//! - `muscleGroups`: `[{"muscle": "...", "sets": 0}, ...]`; `sets` is unused
//! - `schemaVersion`: `"2"` once legacy week keys were imported; absent
//!   means version 1
//! - legacy `<week label>` keys: `[{"muscle": "...", "sets": n}, ...]`

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::{CATALOG_KEY, WEEKLY_LOG_KEY};
use crate::error::CodecError;
use crate::week::WeekLabel;

/// Schema version written by this build
///
/// Version 2 marks that legacy per-week keys were folded into the
/// consolidated log.
pub const SCHEMA_VERSION: u32 = 2;

/// Version assumed when no `schemaVersion` key is stored
pub const UNVERSIONED: u32 = 1;

/// Completed sets for one muscle group in one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingSet {
    pub muscle: String,
    #[serde(deserialize_with = "lenient_count")]
    pub sets: u32,
}

impl WorkingSet {
    pub fn new(muscle: impl Into<String>, sets: u32) -> Self {
        Self { muscle: muscle.into(), sets }
    }
}

/// Week label -> entries, at most one entry per muscle in each week
pub type WeeklyLog = BTreeMap<WeekLabel, Vec<WorkingSet>>;

/// Older builds stored whatever number the user typed, fractions included
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() || raw <= 0.0 {
        return Ok(0);
    }
    Ok(raw.round().min(u32::MAX as f64) as u32)
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogRecord {
    muscle: String,
    #[serde(default)]
    sets: u32,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Record(CatalogRecord),
    Name(String),
}

impl CatalogEntry {
    fn into_name(self) -> String {
        match self {
            CatalogEntry::Record(r) => r.muscle,
            CatalogEntry::Name(name) => name,
        }
    }
}

fn json_error(key: &str) -> impl FnOnce(serde_json::Error) -> CodecError + '_ {
    move |source| CodecError::Json { key: key.to_string(), source }
}

pub fn encode_weekly_log(log: &WeeklyLog) -> Result<String, CodecError> {
    serde_json::to_string(log).map_err(json_error(WEEKLY_LOG_KEY))
}

pub fn decode_weekly_log(raw: &str) -> Result<WeeklyLog, CodecError> {
    serde_json::from_str(raw).map_err(json_error(WEEKLY_LOG_KEY))
}

/// Entries stored under a legacy per-week key
pub fn decode_week_entries(key: &str, raw: &str) -> Result<Vec<WorkingSet>, CodecError> {
    serde_json::from_str(raw).map_err(json_error(key))
}

pub fn encode_catalog(names: &[String]) -> Result<String, CodecError> {
    let records: Vec<CatalogRecord> = names
        .iter()
        .map(|name| CatalogRecord { muscle: name.clone(), sets: 0 })
        .collect();
    serde_json::to_string(&records).map_err(json_error(CATALOG_KEY))
}

/// Accepts `[{"muscle": ..}]` as well as a plain `["Chest", ..]` array
pub fn decode_catalog(raw: &str) -> Result<Vec<String>, CodecError> {
    let entries: Vec<CatalogEntry> =
        serde_json::from_str(raw).map_err(json_error(CATALOG_KEY))?;
    Ok(entries.into_iter().map(CatalogEntry::into_name).collect())
}

pub fn encode_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// Check a stored schema version; `None` is treated as version 1
pub fn check_version(raw: Option<&str>) -> Result<u32, CodecError> {
    let found = match raw {
        None => return Ok(UNVERSIONED),
        Some(v) => v
            .trim()
            .parse::<u32>()
            .map_err(|_| CodecError::BadVersion(v.to_string()))?,
    };
    if found > SCHEMA_VERSION {
        return Err(CodecError::UnsupportedVersion { found, supported: SCHEMA_VERSION });
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekly_log_wire_shape() {
        let mut log = WeeklyLog::new();
        log.insert("Oct 19, 2026".to_string(), vec![WorkingSet::new("Chest", 5)]);
        let raw = encode_weekly_log(&log).unwrap();
        assert_eq!(raw, r#"{"Oct 19, 2026":[{"muscle":"Chest","sets":5}]}"#);
    }

    #[test]
    fn test_decode_weekly_log_from_older_build() {
        let raw = r#"{"Oct 5, 2026":[{"muscle":"Back","sets":2.6},{"muscle":"Chest","sets":-1}]}"#;
        let log = decode_weekly_log(raw).unwrap();
        let week = &log["Oct 5, 2026"];
        assert_eq!(week[0], WorkingSet::new("Back", 3));
        assert_eq!(week[1], WorkingSet::new("Chest", 0));
    }

    #[test]
    fn test_decode_weekly_log_malformed() {
        let err = decode_weekly_log("[1, 2").unwrap_err();
        assert!(matches!(err, CodecError::Json { ref key, .. } if key == WEEKLY_LOG_KEY));
    }

    #[test]
    fn test_catalog_keeps_vestigial_sets() {
        let raw = encode_catalog(&["Chest".to_string(), "Back".to_string()]).unwrap();
        assert_eq!(raw, r#"[{"muscle":"Chest","sets":0},{"muscle":"Back","sets":0}]"#);
    }

    #[test]
    fn test_decode_catalog_both_shapes() {
        let names = decode_catalog(r#"[{"muscle":"Chest","sets":0},{"muscle":"Legs"}]"#).unwrap();
        assert_eq!(names, vec!["Chest", "Legs"]);
        let names = decode_catalog(r#"["Back","Shoulders"]"#).unwrap();
        assert_eq!(names, vec!["Back", "Shoulders"]);
    }

    #[test]
    fn test_check_version() {
        assert_eq!(check_version(None).unwrap(), 1);
        assert_eq!(check_version(Some("1")).unwrap(), 1);
        assert_eq!(check_version(Some("2")).unwrap(), 2);
        assert!(matches!(
            check_version(Some("3")),
            Err(CodecError::UnsupportedVersion { found: 3, supported: 2 })
        ));
        assert!(matches!(check_version(Some("x")), Err(CodecError::BadVersion(_))));
    }
}
