//! Collaborator contracts consumed by the reconciliation engine.
//!
//! The engine never performs I/O itself. Settings and the remote catalog are
//! reached through the [`SettingsSource`] and [`RemoteCatalog`] traits so that
//! hosts can plug in their own stores, and tests can use the in-memory
//! implementations provided here.
//!
//! # Design Philosophy
//!
//! Both traits are minimal and map directly to what a pass needs: one settings
//! read per pass, and one wholesale pull of the catalog per remote merge.

use crate::domain::error::{CatalogError, Result};
use crate::domain::RemoteInfo;
use crate::storage::models::Settings;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};

/// Read-only access to the settings store.
///
/// # Implementations
///
/// - [`StaticSettings`]: in-memory settings, replaceable at runtime
/// - [`JsonSettings`](crate::storage::JsonSettings): JSON file with explicit reload
pub trait SettingsSource: Send + Sync {
    /// Returns the settings to use for the next pass.
    fn settings(&self) -> Settings;
}

/// The remote repository fetcher, seen from the engine.
pub trait RemoteCatalog: Send + Sync {
    /// Returns the full current set of catalog entries.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::CatalogBusy`] while the fetcher is still
    /// populating entries. Callers treat that as transient and retry.
    fn pull(&self) -> Result<Vec<RemoteInfo>>;
}

/// Settings held in memory.
#[derive(Debug, Default)]
pub struct StaticSettings {
    settings: RwLock<Settings>,
}

impl StaticSettings {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
        }
    }

    /// Replaces the settings seen by subsequent passes.
    pub fn replace(&self, settings: Settings) {
        *self.settings.write() = settings;
    }
}

impl SettingsSource for StaticSettings {
    fn settings(&self) -> Settings {
        self.settings.read().clone()
    }
}

/// A catalog held in memory that can simulate a fetcher still in progress.
///
/// # Examples
///
/// ```
/// use modcatalog::domain::RemoteInfo;
/// use modcatalog::storage::{RemoteCatalog, StaticCatalog};
///
/// let catalog = StaticCatalog::new(vec![RemoteInfo::new("a", "Alpha", 1, "main")]);
/// catalog.set_busy_pulls(1);
///
/// assert!(catalog.pull().is_err());
/// assert_eq!(catalog.pull().unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StaticCatalog {
    modules: RwLock<Vec<RemoteInfo>>,
    busy_pulls: AtomicU32,
}

impl StaticCatalog {
    #[must_use]
    pub fn new(modules: Vec<RemoteInfo>) -> Self {
        Self {
            modules: RwLock::new(modules),
            busy_pulls: AtomicU32::new(0),
        }
    }

    /// Replaces the catalog contents.
    pub fn publish(&self, modules: Vec<RemoteInfo>) {
        *self.modules.write() = modules;
    }

    /// Makes the next `count` pulls fail with [`CatalogError::CatalogBusy`].
    pub fn set_busy_pulls(&self, count: u32) {
        self.busy_pulls.store(count, Ordering::SeqCst);
    }
}

impl RemoteCatalog for StaticCatalog {
    fn pull(&self) -> Result<Vec<RemoteInfo>> {
        let busy = self
            .busy_pulls
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if busy {
            return Err(CatalogError::CatalogBusy(
                "repository index is still being fetched".to_string(),
            ));
        }
        Ok(self.modules.read().clone())
    }
}
