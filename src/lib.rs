//! modcatalog: reconciliation engine for a module manager's catalog list.
//!
//! Two independent sources feed one list: the modules installed on the device
//! (the local scan) and the modules offered by remote repositories (the
//! catalog). The engine merges them per module id, classifies every module as
//! updatable, installed or installable, applies the user's exclusion rules and
//! the search query, orders the result and hands the rendering surface a
//! minimal set of range operations instead of a full reload.

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Demo CLI (main.rs)                                 │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← UI thread
//! │  - Event handling, rebuild bookkeeping              │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Reconcile     │   │ Worker Layer  │
//! │ (ui/)         │   │ (reconcile/)  │   │ (worker/)     │
//! │ - View model  │   │ - Classify    │   │ - Source msgs │
//! │ - Surface     │   │ - Filter/sort │   │ - Passes      │
//! │ - Highlights  │   │ - Diff        │   │ - Channels    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────┐
//! │  Storage & Domain Layers                            │
//! │  - Record store, settings, snapshots (storage/)     │
//! │  - Module types, rules, errors (domain/)            │
//! │  - Data directory (infrastructure/)                 │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: UI-thread state, events and actions
//! - [`domain`]: Core domain types and pure rules
//! - [`infrastructure`]: Data directory resolution
//! - [`reconcile`]: Classification, filtering, ordering, list building and diffing
//! - [`storage`]: Record store, settings sources and snapshot loading
//! - [`worker`]: Background worker running passes off the UI thread
//! - [`ui`]: View model and rendering surface
//! - [`observability`]: OpenTelemetry tracing
//!
//! # Threading
//!
//! The local scanner and the remote fetcher report to the worker thread, which
//! mutates the store and runs a pass. Only one pass runs at a time; a pass
//! requested meanwhile is dropped and the UI side re-triggers once the running
//! pass is delivered. The finished list crosses to the UI thread over a
//! channel and is diffed there against what is on screen.
//!
//! # Example
//!
//! ```rust
//! use modcatalog::domain::{LifecycleState, LocalInfo, ModuleRecord, RemoteInfo};
//! use modcatalog::reconcile::{EngineOptions, ReconciliationEngine};
//!
//! let engine = ReconciliationEngine::with_defaults(EngineOptions::default());
//! engine.replace_local(vec![LocalInfo::new("busybox", "BusyBox", 1)]);
//!
//! let list = engine.build().expect("no pass in flight");
//! assert!(matches!(
//!     list.records[0],
//!     ModuleRecord::Separator { bucket: LifecycleState::Installed }
//! ));
//! ```

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod reconcile;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, SortMode};
pub use domain::{CatalogError, Result};
pub use reconcile::{EngineOptions, ReconciliationEngine};
pub use worker::{CatalogWorker, WorkerMessage, WorkerResponse};

use domain::NotificationProbe;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use storage::{JsonSettings, RemoteCatalog};

/// Runtime configuration.
///
/// Read from `key=value` pairs ([`Config::from_map`]) or a TOML file
/// ([`Config::from_toml_file`]). Every key is optional.
///
/// ```toml
/// trace_level = "debug"
/// settings_file = "~/.config/modcatalog/settings.json"
/// footer_height_px = 48
/// retry_backoff_ms = 100
/// max_merge_retries = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tracing filter, e.g. `debug` or `modcatalog=trace`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Settings JSON file. Default: `settings.json` in the data directory.
    pub settings_file: Option<String>,

    /// Height of the trailing footer row; no footer when unset.
    pub footer_height_px: Option<u32>,

    /// Base delay between remote merge retries, in milliseconds.
    pub retry_backoff_ms: u64,

    /// Retries after the first failed remote pull.
    pub max_merge_retries: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trace_level: None,
            settings_file: None,
            footer_height_px: None,
            retry_backoff_ms: 100,
            max_merge_retries: 5,
        }
    }
}

impl Config {
    /// Parses configuration from string key/value pairs.
    ///
    /// Unknown keys are ignored and unparsable numbers fall back to their
    /// defaults.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use modcatalog::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("footer_height_px".to_string(), "48".to_string());
    /// map.insert("max_merge_retries".to_string(), "many".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.footer_height_px, Some(48));
    /// assert_eq!(config.max_merge_retries, 5);
    /// ```
    #[must_use]
    pub fn from_map(config: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| config.get(key).map(|v| v.trim()).filter(|v| !v.is_empty());

        Self {
            trace_level: non_empty("trace_level").map(String::from),
            settings_file: non_empty("settings_file").map(String::from),
            footer_height_px: non_empty("footer_height_px").and_then(|v| v.parse().ok()),
            retry_backoff_ms: non_empty("retry_backoff_ms")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.retry_backoff_ms),
            max_merge_retries: non_empty("max_merge_retries")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_merge_retries),
        }
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read and
    /// [`CatalogError::Config`] if it is not valid TOML for these keys.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| CatalogError::Config(format!("{}: {e}", path.display())))
    }
}

/// Wires the engine, its settings file and a worker for `catalog`.
///
/// Installs tracing, opens the settings JSON (defaults when the file does not
/// exist yet) and returns the UI-side state plus the worker, ready to be
/// spawned on its own thread.
///
/// # Errors
///
/// Returns [`CatalogError::Settings`] if an existing settings file cannot be
/// parsed.
///
/// # Example
///
/// ```rust,no_run
/// use modcatalog::domain::NeverSuppress;
/// use modcatalog::storage::StaticCatalog;
/// use modcatalog::{initialize, Config};
/// use std::sync::Arc;
///
/// let (state, worker) = initialize(
///     &Config::default(),
///     Arc::new(StaticCatalog::new(vec![])),
///     Arc::new(NeverSuppress),
/// )?;
/// # Ok::<(), modcatalog::CatalogError>(())
/// ```
pub fn initialize(
    config: &Config,
    catalog: Arc<dyn RemoteCatalog>,
    probe: Arc<dyn NotificationProbe>,
) -> Result<(AppState, CatalogWorker)> {
    observability::init_tracing(config);

    let settings_path = infrastructure::settings_path(config.settings_file.as_deref());
    tracing::debug!(settings = %settings_path.display(), "initializing modcatalog");
    let settings = JsonSettings::open(settings_path)?;

    let engine = Arc::new(ReconciliationEngine::new(
        Arc::new(settings),
        probe,
        EngineOptions::from_config(config),
    ));
    let worker = CatalogWorker::new(Arc::clone(&engine), catalog);

    Ok((AppState::new(engine), worker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn toml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "footer_height_px = 64\nretry_backoff_ms = 5").unwrap();

        let config = Config::from_toml_file(file.path()).unwrap();
        assert_eq!(config.footer_height_px, Some(64));
        assert_eq!(config.retry_backoff_ms, 5);
        assert_eq!(config.max_merge_retries, 5);
        assert_eq!(config.trace_level, None);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "footer_height_px = \"tall\"").unwrap();

        assert!(matches!(
            Config::from_toml_file(file.path()),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn engine_options_follow_config() {
        let config = Config {
            footer_height_px: Some(10),
            retry_backoff_ms: 7,
            max_merge_retries: 2,
            ..Config::default()
        };
        let options = EngineOptions::from_config(&config);
        assert_eq!(options.footer_height_px, Some(10));
        assert_eq!(options.retry_backoff, std::time::Duration::from_millis(7));
        assert_eq!(options.max_merge_retries, 2);
    }
}
