//! On-disk user preset store
//!
//! The whole file is read on open and rewritten on every [`PresetStore::save`].
//! There is no locking; concurrent invocations may overwrite each other.

use super::UserPreset;
use crate::error::{Error, PersistenceError, Result};
use crate::templates::TargetKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const STORE_VERSION: &str = "1";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    items: Vec<UserPreset>,
}

fn default_version() -> String {
    STORE_VERSION.to_string()
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            version: default_version(),
            items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PresetStore {
    path: PathBuf,
    contents: StoreFile,
}

impl PresetStore {
    /// Open the store at `path`, creating an empty one if it does not exist
    pub fn open(path: impl Into<PathBuf>) -> std::result::Result<Self, PersistenceError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(PersistenceError::NoPath);
        }

        debug!(file = %path.display(), "reading user presets");

        if !path.exists() {
            let store = Self {
                path,
                contents: StoreFile::default(),
            };
            store.save()?;
            return Ok(store);
        }

        let raw = std::fs::read_to_string(&path).map_err(|source| PersistenceError::Read {
            path: path.clone(),
            source,
        })?;

        // An empty file is a store without presets
        let contents = if raw.trim().is_empty() {
            StoreFile::default()
        } else {
            serde_yaml::from_str(&raw).map_err(|source| PersistenceError::Parse {
                path: path.clone(),
                source,
            })?
        };

        Ok(Self { path, contents })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.contents.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.items.is_empty()
    }

    pub fn items(&self) -> &[UserPreset] {
        &self.contents.items
    }

    pub fn items_of_kind(&self, kind: TargetKind) -> impl Iterator<Item = &UserPreset> {
        self.contents.items.iter().filter(move |p| p.kind == kind)
    }

    /// Preset with exactly `name` and `kind`
    pub fn find(&self, kind: TargetKind, name: &str) -> Option<&UserPreset> {
        self.items_of_kind(kind).find(|p| p.name == name)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&UserPreset> {
        self.contents.items.iter().find(|p| p.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Append a preset; names are unique across kinds
    pub fn add(&mut self, preset: UserPreset) -> Result<()> {
        if self.contains(&preset.name) {
            return Err(Error::PresetExists(preset.name));
        }
        self.contents.items.push(preset);
        Ok(())
    }

    /// Rename `from` to `to`; the preset moves to the end of the list
    pub fn rename(&mut self, from: &str, to: &str) -> Result<()> {
        if self.contains(to) {
            return Err(Error::PresetExists(to.to_string()));
        }

        let mut preset = self.remove(from)?;
        preset.name = to.to_string();
        self.contents.items.push(preset);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<UserPreset> {
        let index = self
            .contents
            .items
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| Error::not_found("preset", name))?;

        Ok(self.contents.items.remove(index))
    }

    pub fn remove_all(&mut self) {
        self.contents.items.clear();
    }

    /// Rewrite the whole file
    pub fn save(&self) -> std::result::Result<(), PersistenceError> {
        let output = serde_yaml::to_string(&self.contents).map_err(PersistenceError::Serialize)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistenceError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.path, output).map_err(|source| PersistenceError::Write {
            path: self.path.clone(),
            source,
        })?;

        debug!(file = %self.path.display(), count = self.len(), "user presets saved");
        Ok(())
    }
}
