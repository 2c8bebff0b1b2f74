//! A directory of saved characters.

use crate::character::CharacterRecord;
use crate::persist::{self, CharacterMetadata, PersistError};
use std::fs;
use std::path::{Path, PathBuf};

/// Information about a character save file.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    /// Path to the save file.
    pub path: PathBuf,

    /// Character metadata.
    pub metadata: CharacterMetadata,
}

/// The save directory and the files in it.
#[derive(Debug, Clone)]
pub struct CharacterLibrary {
    dir: PathBuf,
}

impl CharacterLibrary {
    /// Use `dir` as the save directory, creating it if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| PersistError::Io {
                path: dir.clone(),
                source,
            })?;
            tracing::info!(dir = %dir.display(), "created save directory");
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where `record` is saved: `<sanitized name>-<short id>.json`.
    pub fn path_for(&self, record: &CharacterRecord) -> PathBuf {
        let id = record.id.to_string();
        let short_id = &id[..8];
        self.dir
            .join(format!("{}-{short_id}.json", sanitize(record.name())))
    }

    /// Save `record` to its default path and return that path.
    pub fn save(&self, record: &CharacterRecord) -> Result<PathBuf, PersistError> {
        let path = self.path_for(record);
        persist::save(record, &path)?;
        Ok(path)
    }

    /// Load by file name (relative to the library) or by full path.
    pub fn load(&self, name_or_path: impl AsRef<Path>) -> Result<CharacterRecord, PersistError> {
        persist::load(self.resolve(name_or_path.as_ref()))
    }

    /// Resolve a user-supplied reference to a file path.
    ///
    /// Existing paths are used as-is; otherwise the name is looked up in the
    /// library, with `.json` appended when missing.
    pub fn resolve(&self, name_or_path: &Path) -> PathBuf {
        if name_or_path.exists() || name_or_path.components().count() > 1 {
            return name_or_path.to_path_buf();
        }
        let mut candidate = self.dir.join(name_or_path);
        if candidate.extension().is_none() {
            candidate.set_extension("json");
        }
        candidate
    }

    /// Remove the saved file for `record`. Returns false when there was none.
    pub fn delete(&self, record: &CharacterRecord) -> Result<bool, PersistError> {
        self.remove(&self.path_for(record))
    }

    /// Remove a save file by path. Returns false when there was none.
    pub fn remove(&self, path: &Path) -> Result<bool, PersistError> {
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).map_err(|source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "deleted save");
        Ok(true)
    }

    /// List every readable character save, sorted by name.
    pub fn list(&self) -> Result<Vec<SaveInfo>, PersistError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| PersistError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut saves = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match persist::peek_metadata(&path) {
                    Ok(metadata) => saves.push(SaveInfo { path, metadata }),
                    Err(e) => tracing::warn!(path = %path.display(), error = %e, "skipping unreadable save"),
                }
            }
        }

        saves.sort_by(|a, b| {
            a.metadata
                .name
                .to_lowercase()
                .cmp(&b.metadata.name.to_lowercase())
                .then_with(|| a.path.cmp(&b.path))
        });
        Ok(saves)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
