//! JSON file-based settings source and snapshot loaders.
//!
//! [`JsonSettings`] keeps the settings file in memory and only re-reads it on
//! an explicit [`reload`](JsonSettings::reload), so a pass never touches disk.
//! Writes go through a temporary file followed by a rename so the file is never
//! left half written.
//!
//! The snapshot loaders read the JSON arrays a local scanner or catalog
//! fetcher dumps to disk. They are used by the demo binary and by tests.

use crate::domain::error::{CatalogError, Result};
use crate::domain::{LocalInfo, RemoteInfo};
use crate::storage::backend::SettingsSource;
use crate::storage::models::Settings;
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Settings backed by a JSON file.
///
/// A missing file is treated as default settings.
///
/// # Examples
///
/// ```no_run
/// use modcatalog::storage::{JsonSettings, SettingsSource};
/// use std::path::PathBuf;
///
/// let source = JsonSettings::open(PathBuf::from("/tmp/modcatalog/settings.json"))?;
/// let settings = source.settings();
/// # Ok::<(), modcatalog::CatalogError>(())
/// ```
pub struct JsonSettings {
    file_path: PathBuf,
    cached: RwLock<Settings>,
}

impl JsonSettings {
    /// Opens the settings file, loading it if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "opening settings file");
        let settings = Self::load_from_file(&file_path)?;
        Ok(Self {
            file_path,
            cached: RwLock::new(settings),
        })
    }

    /// Re-reads the file, replacing the cached settings.
    ///
    /// On failure the previous settings stay in effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn reload(&self) -> Result<()> {
        let _span = tracing::debug_span!("json_settings_reload", path = ?self.file_path).entered();
        let settings = Self::load_from_file(&self.file_path)?;
        *self.cached.write() = settings;
        tracing::debug!("settings reloaded");
        Ok(())
    }

    /// Persists `settings` atomically and makes them current.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created or the
    /// temporary file cannot be written or renamed.
    pub fn save(&self, settings: Settings) -> Result<()> {
        let _span = tracing::debug_span!("json_settings_save", path = ?self.file_path).entered();

        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&settings)
            .map_err(|e| CatalogError::Settings(format!("failed to serialize JSON: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        tracing::trace!(tmp_path = ?tmp_path, "writing to temporary file");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        *self.cached.write() = settings;
        tracing::debug!("settings saved");
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn load_from_file(path: &Path) -> Result<Settings> {
        if !path.exists() {
            tracing::debug!("settings file missing, using defaults");
            return Ok(Settings::default());
        }
        let contents = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| CatalogError::Settings(format!("failed to parse JSON: {e}")))?;

        tracing::debug!(
            excluded = settings.excluded_module_ids.len(),
            rules = settings.version_exclusion_rules.len(),
            "loaded settings"
        );
        Ok(settings)
    }
}

impl SettingsSource for JsonSettings {
    fn settings(&self) -> Settings {
        self.cached.read().clone()
    }
}

/// Loads a local scan snapshot: a JSON array of [`LocalInfo`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub fn load_local_snapshot(path: &Path) -> Result<Vec<LocalInfo>> {
    load_snapshot(path)
}

/// Loads a remote catalog snapshot: a JSON array of [`RemoteInfo`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub fn load_remote_snapshot(path: &Path) -> Result<Vec<RemoteInfo>> {
    load_snapshot(path)
}

fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let _span = tracing::debug_span!("load_snapshot", path = ?path).entered();
    let contents = std::fs::read_to_string(path)?;
    let items: Vec<T> = serde_json::from_str(&contents)
        .map_err(|e| CatalogError::Snapshot(format!("{}: {e}", path.display())))?;
    tracing::debug!(count = items.len(), "snapshot loaded");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_means_default_settings() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonSettings::open(dir.path().join("settings.json")).unwrap();
        assert_eq!(source.settings(), Settings::default());
    }

    #[test]
    fn save_then_reload_keeps_rules() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let source = JsonSettings::open(path.clone()).unwrap();

        let settings = Settings::default()
            .with_rule("busybox-ndk:^1400")
            .with_excluded("zygisk_shamiko");
        source.save(settings.clone()).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let reopened = JsonSettings::open(path).unwrap();
        assert_eq!(reopened.settings(), settings);
    }

    #[test]
    fn failed_reload_keeps_previous_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"showLowQuality":true}"#).unwrap();
        let source = JsonSettings::open(path.clone()).unwrap();
        assert!(source.settings().show_low_quality);

        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(source.reload(), Err(CatalogError::Settings(_))));
        assert!(source.settings().show_low_quality);
    }

    #[test]
    fn malformed_snapshot_is_a_snapshot_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        std::fs::write(&path, r#"[{"id": 5}]"#).unwrap();
        assert!(matches!(
            load_local_snapshot(&path),
            Err(CatalogError::Snapshot(_))
        ));

        std::fs::write(&path, r#"[{"id":"a","name":"Alpha","versionCode":1}]"#).unwrap();
        assert_eq!(load_local_snapshot(&path).unwrap()[0].name, "Alpha");
    }
}
