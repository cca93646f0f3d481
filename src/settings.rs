//! Persisted per-window settings.
//!
//! Windows remember where the player dragged them. Positions are keyed by
//! element type and written through the [`Settings`] trait; the demo client
//! backs it with a TOML file.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::elements::ElementType;
use crate::geometry::Point;

pub trait Settings {
    fn load(&self, key: ElementType) -> Option<Point>;
    fn save(&mut self, key: ElementType, position: Point);
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not encode settings: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// On-disk layout of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsDocument {
    pub positions: BTreeMap<String, Point>,
}

/// Settings stored in a TOML file, rewritten on every save.
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
    document: SettingsDocument,
}

impl FileSettings {
    /// Opens the settings at `path`. A missing file starts empty; an
    /// unreadable one is logged and also starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let document = match Self::read(&path) {
            Ok(document) => document,
            Err(SettingsError::Io(error)) if error.kind() == io::ErrorKind::NotFound => {
                SettingsDocument::default()
            }
            Err(error) => {
                tracing::warn!(?error, path = %path.display(), "failed to load settings; using defaults");
                SettingsDocument::default()
            }
        };
        Self { path, document }
    }

    pub fn read(path: &Path) -> Result<SettingsDocument, SettingsError> {
        let text = fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    pub fn write(&self) -> Result<(), SettingsError> {
        let text = toml::to_string_pretty(&self.document)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, text)?;
        Ok(())
    }

    pub fn document(&self) -> &SettingsDocument {
        &self.document
    }
}

impl Settings for FileSettings {
    fn load(&self, key: ElementType) -> Option<Point> {
        self.document.positions.get(key.name()).copied()
    }

    fn save(&mut self, key: ElementType, position: Point) {
        self.document
            .positions
            .insert(key.name().to_string(), position);
        if let Err(error) = self.write() {
            tracing::warn!(?error, path = %self.path.display(), "failed to save settings");
        }
    }
}

/// In-memory settings. Clones share state, so a test can keep one handle
/// while the facade owns the other.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    inner: Rc<RefCell<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    positions: BTreeMap<ElementType, Point>,
    saves: Vec<(ElementType, Point)>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(self, key: ElementType, position: Point) -> Self {
        self.inner.borrow_mut().positions.insert(key, position);
        self
    }

    /// Every save made so far, in order.
    pub fn saves(&self) -> Vec<(ElementType, Point)> {
        self.inner.borrow().saves.clone()
    }
}

impl Settings for MemorySettings {
    fn load(&self, key: ElementType) -> Option<Point> {
        self.inner.borrow().positions.get(&key).copied()
    }

    fn save(&mut self, key: ElementType, position: Point) {
        let mut inner = self.inner.borrow_mut();
        inner.positions.insert(key, position);
        inner.saves.push((key, position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui.toml");
        let mut settings = FileSettings::open(&path);
        assert_eq!(settings.load(ElementType::ItemInventory), None);
        settings.save(ElementType::ItemInventory, Point::new(120, 80));

        let reopened = FileSettings::open(&path);
        assert_eq!(
            reopened.load(ElementType::ItemInventory),
            Some(Point::new(120, 80))
        );
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ui.toml");
        fs::write(&path, "positions = 12").unwrap();
        let settings = FileSettings::open(&path);
        assert!(settings.document().positions.is_empty());
        assert!(matches!(
            FileSettings::read(&path),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn memory_settings_record_saves() {
        let settings = MemorySettings::new();
        let mut handle = settings.clone();
        handle.save(ElementType::KeyConfig, Point::new(1, 2));
        assert_eq!(settings.saves(), vec![(ElementType::KeyConfig, Point::new(1, 2))]);
        assert_eq!(settings.load(ElementType::KeyConfig), Some(Point::new(1, 2)));
    }
}
