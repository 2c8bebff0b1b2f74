//! Character persistence for save/load functionality.
//!
//! One pretty-printed JSON document per character. Loading is lenient about
//! optional keys (they default) and strict about the character name. Saving
//! goes through a temporary file in the target directory that is renamed over
//! the destination, so a crash mid-write never corrupts the previous save.

use crate::character::{
    AbilityScores, CharacterId, CharacterRecord, CombatStats, Identity, DEFAULT_GAME_SYSTEM,
};
use crate::item::Item;
use crate::purse::Purse;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Current save file version.
pub const SAVE_VERSION: u32 = 1;

/// Section that a flat, single-string `notes` value is filed under.
pub const LEGACY_NOTES_SECTION: &str = "General";

/// Why a document could not be turned into a character record.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed JSON: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("Character document must be a JSON object")]
    NotAnObject,

    #[error("Missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid value for `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Unsupported save version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },
}

impl ParseError {
    /// The offending field, when the error is about one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::MissingField(field) => Some(field),
            ParseError::InvalidField { field, .. } => Some(field),
            ParseError::UnsupportedVersion { .. } => Some("version"),
            ParseError::Syntax(_) | ParseError::NotAnObject => None,
        }
    }
}

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("Could not encode character: {0}")]
    Encode(#[source] serde_json::Error),
}

impl PersistError {
    fn io(path: &Path, source: io::Error) -> Self {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// On-disk envelope: the format version followed by the record's own fields.
#[derive(Serialize)]
struct Document<'a> {
    version: u32,
    #[serde(flatten)]
    record: &'a CharacterRecord,
}

/// Render a record as the JSON document `save` writes.
pub fn to_json(record: &CharacterRecord) -> Result<String, PersistError> {
    let document = Document {
        version: SAVE_VERSION,
        record,
    };
    serde_json::to_string_pretty(&document).map_err(PersistError::Encode)
}

/// Write a record to `path`, replacing any previous save atomically.
pub fn save(record: &CharacterRecord, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let content = to_json(record)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    // The temp file is deleted on drop if anything below fails.
    let mut temp = NamedTempFile::new_in(dir).map_err(|e| PersistError::io(path, e))?;
    temp.write_all(content.as_bytes())
        .map_err(|e| PersistError::io(path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| PersistError::io(path, e))?;
    // The temp file is created 0600; a replaced file keeps its own mode.
    if let Some(existing) = fs::metadata(path).ok().filter(|m| m.is_file()) {
        temp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| PersistError::io(path, e))?;
    }
    temp.persist(path)
        .map_err(|e| PersistError::io(path, e.error))?;

    tracing::info!(character = %record.name(), path = %path.display(), "saved character");
    Ok(())
}

/// Read a record from `path`.
pub fn load(path: impl AsRef<Path>) -> Result<CharacterRecord, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
    let record = from_json(&content)?;
    tracing::info!(character = %record.name(), path = %path.display(), "loaded character");
    Ok(record)
}

/// Parse a JSON document into a fully populated record.
///
/// Each section is decoded on its own so that errors can name the field that
/// broke. Unknown keys are ignored.
pub fn from_json(content: &str) -> Result<CharacterRecord, ParseError> {
    let value: Value = serde_json::from_str(content)?;
    let doc = value.as_object().ok_or(ParseError::NotAnObject)?;

    check_version(doc)?;
    let name = required_name(doc)?;
    let id: CharacterId = section(doc, "id")?;
    let identity = identity(doc)?;
    let abilities: AbilityScores = section(doc, "abilities")?;
    let statistics: CombatStats = section(doc, "statistics")?;
    let items = inventory(doc)?;
    let purse: Purse = section(doc, "currency")?;
    let notes = notes(doc)?;
    let created_at = timestamp(doc, "created_at", Utc::now())?;
    let updated_at = timestamp(doc, "updated_at", created_at)?;

    Ok(CharacterRecord::from_parts(
        id, name, identity, abilities, statistics, items, purse, notes, created_at, updated_at,
    ))
}

/// Metadata about a saved character for quick display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterMetadata {
    pub name: String,
    pub class: String,
    pub level: u32,
    pub game_system: String,
    pub item_count: usize,
}

/// Get metadata without building the full record.
pub fn peek_metadata(path: impl AsRef<Path>) -> Result<CharacterMetadata, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| PersistError::io(path, e))?;
    let value: Value = serde_json::from_str(&content).map_err(ParseError::from)?;
    let doc = value.as_object().ok_or(ParseError::NotAnObject)?;

    check_version(doc)?;
    let name = required_name(doc)?;
    let identity = identity(doc)?;
    let item_count = doc
        .get("inventory")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);

    Ok(CharacterMetadata {
        name,
        class: identity.class,
        level: identity.level,
        game_system: identity.game_system,
        item_count,
    })
}

// ============================================================================
// Section decoding
// ============================================================================

fn invalid(field: &str, reason: impl fmt::Display) -> ParseError {
    ParseError::InvalidField {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Decode `doc[key]`, or the default when the key is absent or null.
fn section<T: DeserializeOwned + Default>(
    doc: &Map<String, Value>,
    key: &str,
) -> Result<T, ParseError> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|e| invalid(key, e)),
    }
}

fn check_version(doc: &Map<String, Value>) -> Result<(), ParseError> {
    let Some(version) = doc.get("version") else {
        return Ok(());
    };
    match version.as_u64() {
        Some(found) if found <= SAVE_VERSION as u64 => Ok(()),
        Some(found) => Err(ParseError::UnsupportedVersion {
            found,
            supported: SAVE_VERSION,
        }),
        None => Err(invalid("version", "expected a non-negative integer")),
    }
}

fn required_name(doc: &Map<String, Value>) -> Result<String, ParseError> {
    match doc.get("name") {
        None | Some(Value::Null) => Err(ParseError::MissingField("name")),
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.trim().to_string()),
        Some(Value::String(_)) => Err(invalid("name", "must not be empty")),
        Some(_) => Err(invalid("name", "expected a string")),
    }
}

/// The `identity` section, falling back to the flat `level` / `game_system`
/// keys found in older saves.
fn identity(doc: &Map<String, Value>) -> Result<Identity, ParseError> {
    if doc.contains_key("identity") {
        return section(doc, "identity");
    }

    let mut identity = Identity {
        game_system: DEFAULT_GAME_SYSTEM.to_string(),
        ..Identity::default()
    };
    if let Some(level) = doc.get("level").filter(|v| !v.is_null()) {
        identity.level = u32::deserialize(level).map_err(|e| invalid("level", e))?;
    }
    if let Some(system) = doc.get("game_system").filter(|v| !v.is_null()) {
        identity.game_system = String::deserialize(system).map_err(|e| invalid("game_system", e))?;
    }
    Ok(identity)
}

fn inventory(doc: &Map<String, Value>) -> Result<Vec<Item>, ParseError> {
    let entries = match doc.get("inventory") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(invalid("inventory", "expected a list of items")),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let field = format!("inventory[{index}]");
            let item = Item::deserialize(entry).map_err(|e| invalid(&field, e))?;
            item.validate().map_err(|e| invalid(&field, e))?;
            Ok(item)
        })
        .collect()
}

fn notes(doc: &Map<String, Value>) -> Result<BTreeMap<String, String>, ParseError> {
    match doc.get("notes") {
        None | Some(Value::Null) => Ok(BTreeMap::new()),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(BTreeMap::new()),
        Some(Value::String(text)) => Ok(BTreeMap::from([(
            LEGACY_NOTES_SECTION.to_string(),
            text.clone(),
        )])),
        Some(value) => BTreeMap::deserialize(value).map_err(|e| invalid("notes", e)),
    }
}

fn timestamp(
    doc: &Map<String, Value>,
    key: &str,
    fallback: DateTime<Utc>,
) -> Result<DateTime<Utc>, ParseError> {
    match doc.get(key) {
        None | Some(Value::Null) => Ok(fallback),
        Some(Value::String(s)) => {
            parse_timestamp(s).ok_or_else(|| invalid(key, format!("'{s}' is not a timestamp")))
        }
        Some(_) => Err(invalid(key, "expected a timestamp string")),
    }
}

/// RFC 3339, or a naive ISO 8601 timestamp which is taken to be UTC.
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_fighter;
    use tempfile::TempDir;

    #[test]
    fn test_json_round_trip() {
        let record = sample_fighter("Thorin Ironfist");
        let json = to_json(&record).unwrap();
        let loaded = from_json(&json).unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_version_is_first_key() {
        let record = sample_fighter("Thorin");
        let json = to_json(&record).unwrap();
        let first_key = json.lines().nth(1).unwrap().trim();
        assert!(first_key.starts_with("\"version\": 1"));
    }

    #[test]
    fn test_missing_optional_keys_default() {
        let record = from_json(r#"{"name": "Mira"}"#).unwrap();
        assert_eq!(record.name(), "Mira");
        assert!(record.items().is_empty());
        assert!(record.purse().is_empty());
        assert!(record.notes().is_empty());
        assert_eq!(record.identity.level, 0);
        assert_eq!(record.identity.game_system, "Generic");
        assert_eq!(record.statistics.armor_class, 0);
        assert_eq!(record.created_at, record.updated_at);
    }

    #[test]
    fn test_partial_sections_default_their_fields() {
        let record = from_json(
            r#"{"name": "Mira", "currency": {"gold": 12}, "statistics": {"armor_class": 15}}"#,
        )
        .unwrap();
        assert_eq!(*record.purse(), Purse::new(0, 12, 0, 0));
        assert_eq!(record.statistics.armor_class, 15);
        assert_eq!(record.statistics.max_hit_points, 0);
    }

    #[test]
    fn test_missing_name_is_reported() {
        let err = from_json(r#"{"inventory": []}"#).unwrap_err();
        assert!(matches!(err, ParseError::MissingField("name")));
        assert_eq!(err.field(), Some("name"));

        let err = from_json(r#"{"name": "  "}"#).unwrap_err();
        assert_eq!(err.field(), Some("name"));

        let err = from_json(r#"{"name": 7}"#).unwrap_err();
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            from_json("{\"name\": \"Mira\""),
            Err(ParseError::Syntax(_))
        ));
        assert!(matches!(from_json("[1, 2]"), Err(ParseError::NotAnObject)));
    }

    #[test]
    fn test_bad_item_names_its_position() {
        let err = from_json(
            r#"{"name": "Mira", "inventory": [{"name": "Rope"}, {"quantity": 2}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("inventory[1]"));

        let err = from_json(
            r#"{"name": "Mira", "inventory": [{"name": "Rock", "unit_weight": -3}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.field(), Some("inventory[0]"));
    }

    #[test]
    fn test_negative_coins_rejected() {
        let err = from_json(r#"{"name": "Mira", "currency": {"gold": -1}}"#).unwrap_err();
        assert_eq!(err.field(), Some("currency"));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let record =
            from_json(r#"{"name": "Mira", "portrait": "mira.png", "currency": {"electrum": 4}}"#)
                .unwrap();
        assert_eq!(record.name(), "Mira");
        assert!(record.purse().is_empty());
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = from_json(r#"{"version": 99, "name": "Mira"}"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnsupportedVersion {
                found: 99,
                supported: SAVE_VERSION
            }
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("thorin.json");

        let record = sample_fighter("Save Test Hero");
        save(&record, &save_path).expect("Save should succeed");
        assert!(save_path.exists());

        let loaded = load(&save_path).expect("Load should succeed");
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_save_overwrites_previous() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("mira.json");

        let mut record = CharacterRecord::create_blank("Mira").unwrap();
        save(&record, &save_path).unwrap();
        record.update_notes("Quest", "Find the lost bell.");
        save(&record, &save_path).unwrap();

        let loaded = load(&save_path).unwrap();
        assert_eq!(loaded.notes()["Quest"], "Find the lost bell.");

        // Only the save itself remains; no stray temp files.
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("mira.json");

        let mut record = CharacterRecord::create_blank("Mira").unwrap();
        save(&record, &save_path).unwrap();
        fs::set_permissions(&save_path, fs::Permissions::from_mode(0o644)).unwrap();

        record.update_notes("Quest", "Find the lost bell.");
        save(&record, &save_path).unwrap();

        let mode = fs::metadata(&save_path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
        assert_eq!(load(&save_path).unwrap(), record);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("no_such_dir").join("mira.json");

        let record = CharacterRecord::create_blank("Mira").unwrap();
        let err = save(&record, &save_path).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
        assert!(!save_path.exists());
    }

    #[test]
    fn test_failed_save_keeps_previous_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        // A directory cannot be replaced by a file, so the final rename fails.
        let target = temp_dir.path().join("occupied");
        std::fs::create_dir(&target).unwrap();
        std::fs::write(target.join("keep.txt"), "still here").unwrap();

        let record = CharacterRecord::create_blank("Mira").unwrap();
        assert!(matches!(
            save(&record, &target),
            Err(PersistError::Io { .. })
        ));
        assert_eq!(
            std::fs::read_to_string(target.join("keep.txt")).unwrap(),
            "still here"
        );
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = load(temp_dir.path().join("ghost.json")).unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }

    #[test]
    fn test_peek_metadata() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let save_path = temp_dir.path().join("peek.json");
        save(&sample_fighter("Peek Test"), &save_path).unwrap();

        let metadata = peek_metadata(&save_path).expect("Peek should succeed");
        assert_eq!(metadata.name, "Peek Test");
        assert_eq!(metadata.class, "Fighter");
        assert_eq!(metadata.level, 3);
        assert_eq!(metadata.item_count, 4);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2025-05-08T14:03:11.123456").is_some());
        assert!(parse_timestamp("2025-05-08T14:03:11Z").is_some());
        assert!(parse_timestamp("2025-05-08T14:03:11+02:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
