//! The reconciliation engine: owns the record store and runs list passes.
//!
//! # Locking
//!
//! - the store lock (inside [`RecordStore`]) is held only while the store is
//!   mutated or a pass snapshot is taken
//! - the query lock guards the normalized query and is held while a pass
//!   assigns filter tiers, so a concurrent query change waits for it
//! - the `building` flag is a non-blocking guard: a pass requested while
//!   another is in flight returns `None` immediately and is not queued
//!
//! # Example
//!
//! ```
//! use modcatalog::domain::{LocalInfo, RemoteInfo};
//! use modcatalog::reconcile::{EngineOptions, ReconciliationEngine};
//!
//! let engine = ReconciliationEngine::with_defaults(EngineOptions::default());
//! engine.replace_local(vec![LocalInfo::new("a", "Alpha", 1)]);
//! engine.store().replace_remote(vec![RemoteInfo::new("a", "Alpha", 2, "main")]);
//!
//! let built = engine.build().expect("no pass in flight");
//! assert_eq!(built.records.len(), 2);
//! assert_eq!(engine.updates().ids, vec!["a".to_string()]);
//! ```

use super::classify::{classify, visible_entry, UpdateSummary, UpdateTracker};
use super::filter::{match_filter, normalize_query};
use super::ordering::sort_records;
use crate::app::modes::SortMode;
use crate::domain::error::Result;
use crate::domain::{
    ActivateAction, LifecycleState, LocalInfo, ModuleRecord, NeverSuppress, NotificationKind,
    NotificationProbe,
};
use crate::storage::{RecordStore, RemoteCatalog, SettingsSource, StaticSettings};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Tunables for the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOptions {
    /// Height of the trailing footer row; no footer when `None`.
    pub footer_height_px: Option<u32>,
    /// Base delay of the remote merge retry; attempt `n` waits `n * backoff`.
    pub retry_backoff: Duration,
    /// Retries after the first failed pull.
    pub max_merge_retries: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            footer_height_px: None,
            retry_backoff: Duration::from_millis(100),
            max_merge_retries: 5,
        }
    }
}

impl EngineOptions {
    #[must_use]
    pub fn from_config(config: &crate::Config) -> Self {
        Self {
            footer_height_px: config.footer_height_px,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            max_merge_retries: config.max_merge_retries,
        }
    }
}

/// Output of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltList {
    pub records: Vec<ModuleRecord>,
    pub sort_mode: SortMode,
    /// Normalized query the list was filtered with.
    pub query: String,
    /// Ids dropped from the store because no source reports them anymore.
    pub pruned: Vec<String>,
}

impl BuiltList {
    /// Number of module entry rows.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.records.iter().filter(|r| r.as_entry().is_some()).count()
    }
}

/// Releases the `building` flag when a pass ends, including on panic.
struct BuildGuard<'a>(&'a AtomicBool);

impl<'a> BuildGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BuildGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Merges the two sources and produces sorted, filtered catalog lists.
pub struct ReconciliationEngine {
    store: RecordStore,
    settings: Arc<dyn SettingsSource>,
    probe: Arc<dyn NotificationProbe>,
    query: Mutex<String>,
    building: AtomicBool,
    sort_mode: Mutex<SortMode>,
    updates: UpdateTracker,
    options: EngineOptions,
}

impl ReconciliationEngine {
    #[must_use]
    pub fn new(
        settings: Arc<dyn SettingsSource>,
        probe: Arc<dyn NotificationProbe>,
        options: EngineOptions,
    ) -> Self {
        Self {
            store: RecordStore::new(),
            settings,
            probe,
            query: Mutex::new(String::new()),
            building: AtomicBool::new(false),
            sort_mode: Mutex::new(SortMode::default()),
            updates: UpdateTracker::default(),
            options,
        }
    }

    /// Engine with default settings that never suppresses notifications.
    #[must_use]
    pub fn with_defaults(options: EngineOptions) -> Self {
        Self::new(
            Arc::new(StaticSettings::default()),
            Arc::new(NeverSuppress),
            options,
        )
    }

    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    #[must_use]
    pub const fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Runs one reconciliation pass.
    ///
    /// Returns `None` without doing anything if another pass is in flight;
    /// the caller must trigger again once that pass has completed.
    pub fn build(&self) -> Option<BuiltList> {
        let Some(_guard) = BuildGuard::acquire(&self.building) else {
            tracing::debug!("pass already in flight, dropping request");
            return None;
        };
        let _span = tracing::debug_span!("reconcile_pass").entered();

        let settings = self.settings.settings();
        let sort_mode = *self.sort_mode.lock();
        let snapshot = self.store.snapshot_for_pass(self.probe.as_ref());

        let mut records: Vec<ModuleRecord> = snapshot
            .notifications
            .iter()
            .map(|n| ModuleRecord::Notification {
                kind: n.kind,
                special: n.special,
            })
            .collect();
        let mut seen_buckets: Vec<LifecycleState> = Vec::with_capacity(3);

        let query = {
            let query = self.query.lock();
            for entry in snapshot.entries {
                let Some(mut entry) = visible_entry(entry, &settings) else {
                    continue;
                };

                let state = classify(&entry, &settings);
                if state == LifecycleState::Updatable && self.updates.record(&entry.id) {
                    tracing::debug!(module_id = %entry.id, "update available");
                }
                entry.lifecycle = state;
                entry.on_activate = match state {
                    LifecycleState::Updatable | LifecycleState::Installable => {
                        entry.update_target().map(ActivateAction::Install)
                    }
                    _ => None,
                };

                let filter = match_filter(&entry, &query);
                entry.filter_tier = filter.tier;
                if !filter.matches {
                    continue;
                }

                if !seen_buckets.contains(&state) {
                    seen_buckets.push(state);
                    records.push(ModuleRecord::Separator { bucket: state });
                }
                records.push(ModuleRecord::Entry(entry));
            }
            query.clone()
        };

        if let Some(height_px) = self.options.footer_height_px {
            records.push(ModuleRecord::Footer { height_px });
        }
        sort_records(&mut records, sort_mode);

        tracing::debug!(
            rows = records.len(),
            buckets = seen_buckets.len(),
            pruned = snapshot.pruned.len(),
            "pass complete"
        );
        Some(BuiltList {
            records,
            sort_mode,
            query,
            pruned: snapshot.pruned,
        })
    }

    /// Returns `true` while a pass is running.
    #[must_use]
    pub fn is_building(&self) -> bool {
        self.building.load(Ordering::Acquire)
    }

    /// Sets the query. Returns `false` when the normalized query is unchanged,
    /// in which case no rebuild is needed.
    pub fn set_query(&self, raw: &str) -> bool {
        let normalized = normalize_query(raw);
        let mut query = self.query.lock();
        if *query == normalized {
            return false;
        }
        tracing::debug!(query = %normalized, "query changed");
        *query = normalized;
        true
    }

    #[must_use]
    pub fn query(&self) -> String {
        self.query.lock().clone()
    }

    #[must_use]
    pub fn sort_mode(&self) -> SortMode {
        *self.sort_mode.lock()
    }

    /// Switches to the next sort mode.
    ///
    /// Refused while a pass is in flight. Callers rebuild after a successful
    /// switch.
    pub fn cycle_sort_mode(&self) -> bool {
        let Some(_guard) = BuildGuard::acquire(&self.building) else {
            tracing::debug!("sort mode change refused during pass");
            return false;
        };
        let mut mode = self.sort_mode.lock();
        *mode = mode.next();
        tracing::debug!(sort_mode = ?*mode, "sort mode changed");
        true
    }

    /// Replaces the local snapshot wholesale. Returns the pruned ids.
    pub fn replace_local(&self, modules: Vec<LocalInfo>) -> Vec<String> {
        self.store.replace_local(modules)
    }

    /// Pulls the catalog and replaces the remote snapshot wholesale.
    ///
    /// A busy catalog is retried up to `max_merge_retries` times, waiting
    /// `attempt * retry_backoff` before each retry. When retries run out the
    /// store keeps its previous remote entries.
    ///
    /// # Errors
    ///
    /// Returns the last pull error if it is not transient or retries are
    /// exhausted.
    pub fn merge_remote(&self, catalog: &dyn RemoteCatalog) -> Result<usize> {
        let _span = tracing::debug_span!("merge_remote").entered();
        let mut attempt: u32 = 0;
        loop {
            match catalog.pull() {
                Ok(modules) => {
                    let count = modules.len();
                    self.store.replace_remote(modules);
                    tracing::debug!(count, attempt, "remote catalog merged");
                    return Ok(count);
                }
                Err(e) if e.is_transient() && attempt < self.options.max_merge_retries => {
                    attempt += 1;
                    let delay = self.options.retry_backoff * attempt;
                    tracing::warn!(error = %e, attempt, ?delay, "remote catalog busy, retrying");
                    std::thread::sleep(delay);
                }
                Err(e) => {
                    tracing::error!(error = %e, attempt, "remote merge failed, keeping previous catalog");
                    return Err(e);
                }
            }
        }
    }

    pub fn add_notification(&self, kind: NotificationKind, special: bool) {
        self.store.add_notification(kind, special);
    }

    pub fn dismiss_notification(&self, kind: NotificationKind) -> bool {
        self.store.dismiss_notification(kind)
    }

    /// Modules found updatable since the last reset.
    #[must_use]
    pub fn updates(&self) -> UpdateSummary {
        self.updates.summary()
    }

    pub fn reset_updates(&self) {
        self.updates.reset();
    }
}

impl std::fmt::Debug for ReconciliationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReconciliationEngine")
            .field("store", &self.store)
            .field("query", &*self.query.lock())
            .field("building", &self.is_building())
            .field("sort_mode", &self.sort_mode())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
