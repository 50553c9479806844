//! The record store: one merged entry per module id.
//!
//! Every mutation takes the store lock for the duration of that mutation only.
//! Readers get owned snapshots so classification can run without the lock.
//! The active notification set lives behind the same lock.

use crate::domain::{LocalInfo, ModuleEntry, NotificationKind, NotificationProbe, RemoteInfo};
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Default)]
struct StoreInner {
    entries: BTreeMap<String, ModuleEntry>,
    notifications: Vec<ActiveNotification>,
}

/// A raised banner and whether it floats into the special bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveNotification {
    pub kind: NotificationKind,
    pub special: bool,
}

/// What a pass works on, captured under a single lock hold.
#[derive(Debug, Clone, Default)]
pub struct PassSnapshot {
    pub notifications: Vec<ActiveNotification>,
    pub entries: Vec<ModuleEntry>,
    pub pruned: Vec<String>,
}

/// Mapping from module id to merged entry, plus the active notifications.
#[derive(Debug, Default)]
pub struct RecordStore {
    inner: Mutex<StoreInner>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a local scan result to the entry keyed by `info.id`.
    pub fn upsert_local(&self, info: LocalInfo) {
        let mut inner = self.inner.lock();
        Self::put_local(&mut inner.entries, info);
    }

    /// Attaches a catalog result to the entry keyed by `info.id`.
    pub fn upsert_remote(&self, info: RemoteInfo) {
        let mut inner = self.inner.lock();
        Self::put_remote(&mut inner.entries, info);
    }

    /// Detaches every local result. Entries become prunable if nothing remains.
    pub fn clear_local(&self) {
        let mut inner = self.inner.lock();
        for entry in inner.entries.values_mut() {
            entry.local = None;
        }
    }

    /// Detaches every catalog result.
    pub fn clear_remote(&self) {
        let mut inner = self.inner.lock();
        for entry in inner.entries.values_mut() {
            entry.remote = None;
        }
    }

    /// Replaces the whole local side with a fresh scan and prunes.
    ///
    /// Returns the ids that disappeared. A duplicate id within `modules` is a
    /// scanner bug: debug builds panic, release builds keep the last one.
    pub fn replace_local(&self, modules: Vec<LocalInfo>) -> Vec<String> {
        let _span = tracing::debug_span!("store_replace_local", count = modules.len()).entered();
        debug_assert_unique(modules.iter().map(|m| m.id.as_str()));

        let mut inner = self.inner.lock();
        for entry in inner.entries.values_mut() {
            entry.local = None;
        }
        for info in modules {
            Self::put_local(&mut inner.entries, info);
        }
        Self::prune_empty(&mut inner.entries)
    }

    /// Replaces the whole remote side with a fresh catalog and prunes.
    pub fn replace_remote(&self, modules: Vec<RemoteInfo>) -> Vec<String> {
        let _span = tracing::debug_span!("store_replace_remote", count = modules.len()).entered();
        debug_assert_unique(modules.iter().map(|m| m.id.as_str()));

        let mut inner = self.inner.lock();
        for entry in inner.entries.values_mut() {
            entry.remote = None;
        }
        for info in modules {
            Self::put_remote(&mut inner.entries, info);
        }
        Self::prune_empty(&mut inner.entries)
    }

    /// Drops entries that no source reports anymore, returning their ids.
    pub fn prune(&self) -> Vec<String> {
        let mut inner = self.inner.lock();
        Self::prune_empty(&mut inner.entries)
    }

    /// Owned copy of every entry, in id order.
    #[must_use]
    pub fn values(&self) -> Vec<ModuleEntry> {
        self.inner.lock().entries.values().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<ModuleEntry> {
        self.inner.lock().entries.get(id).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Raises a notification. Raising an active kind again updates its flag.
    pub fn add_notification(&self, kind: NotificationKind, special: bool) {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.notifications.iter_mut().find(|n| n.kind == kind) {
            existing.special = special;
        } else {
            inner.notifications.push(ActiveNotification { kind, special });
        }
    }

    /// Removes a notification. Returns `true` if it was active.
    pub fn dismiss_notification(&self, kind: NotificationKind) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.notifications.len();
        inner.notifications.retain(|n| n.kind != kind);
        inner.notifications.len() != before
    }

    #[must_use]
    pub fn notifications(&self) -> Vec<ActiveNotification> {
        self.inner.lock().notifications.clone()
    }

    /// Captures the input of one pass under a single lock hold.
    ///
    /// Suppressed notifications are removed from the active set and empty
    /// entries are pruned before the copy is taken.
    pub fn snapshot_for_pass(&self, probe: &dyn NotificationProbe) -> PassSnapshot {
        let mut inner = self.inner.lock();
        inner.notifications.retain(|n| {
            let keep = !probe.should_suppress(n.kind);
            if !keep {
                tracing::debug!(kind = ?n.kind, "notification suppressed");
            }
            keep
        });
        let pruned = Self::prune_empty(&mut inner.entries);
        PassSnapshot {
            notifications: inner.notifications.clone(),
            entries: inner.entries.values().cloned().collect(),
            pruned,
        }
    }

    fn put_local(entries: &mut BTreeMap<String, ModuleEntry>, info: LocalInfo) {
        let id = info.id.clone();
        entries
            .entry(id.clone())
            .or_insert_with(|| ModuleEntry::new(id))
            .local = Some(info);
    }

    fn put_remote(entries: &mut BTreeMap<String, ModuleEntry>, info: RemoteInfo) {
        let id = info.id.clone();
        entries
            .entry(id.clone())
            .or_insert_with(|| ModuleEntry::new(id))
            .remote = Some(info);
    }

    fn prune_empty(entries: &mut BTreeMap<String, ModuleEntry>) -> Vec<String> {
        let removed: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| entry.is_empty())
            .map(|(id, _)| id.clone())
            .collect();
        for id in &removed {
            entries.remove(id);
        }
        if !removed.is_empty() {
            tracing::debug!(count = removed.len(), "pruned entries");
        }
        removed
    }
}

fn debug_assert_unique<'a>(ids: impl Iterator<Item = &'a str>) {
    if cfg!(debug_assertions) {
        let mut seen = BTreeSet::new();
        for id in ids {
            debug_assert!(seen.insert(id), "duplicate module id in snapshot: {id}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NeverSuppress;
    use pretty_assertions::assert_eq;

    #[test]
    fn upserts_merge_by_id() {
        let store = RecordStore::new();
        store.upsert_local(LocalInfo::new("a", "Alpha", 1));
        store.upsert_remote(RemoteInfo::new("a", "Alpha", 2, "main"));
        store.upsert_remote(RemoteInfo::new("b", "Beta", 1, "main"));

        assert_eq!(store.len(), 2);
        let a = store.get("a").unwrap();
        assert!(a.local.is_some() && a.remote.is_some());
    }

    #[test]
    fn replace_local_is_wholesale() {
        let store = RecordStore::new();
        store.replace_local(vec![LocalInfo::new("a", "Alpha", 1), LocalInfo::new("b", "Beta", 1)]);
        store.upsert_remote(RemoteInfo::new("b", "Beta", 2, "main"));

        let removed = store.replace_local(vec![LocalInfo::new("c", "Gamma", 1)]);
        assert_eq!(removed, vec!["a".to_string()]);

        let ids: Vec<String> = store.values().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b".to_string(), "c".to_string()]);
        assert!(store.get("b").unwrap().local.is_none());
    }

    #[test]
    fn clear_then_prune_empties_the_store() {
        let store = RecordStore::new();
        store.upsert_local(LocalInfo::new("a", "Alpha", 1));
        store.clear_local();
        assert_eq!(store.len(), 1);
        assert_eq!(store.prune(), vec!["a".to_string()]);
        assert!(store.is_empty());
    }

    #[test]
    fn clear_remote_keeps_local_side() {
        let store = RecordStore::new();
        store.upsert_local(LocalInfo::new("a", "Alpha", 1));
        store.upsert_remote(RemoteInfo::new("a", "Alpha", 2, "main"));
        store.upsert_remote(RemoteInfo::new("b", "Beta", 1, "main"));
        store.clear_remote();

        assert_eq!(store.len(), 2);
        assert_eq!(store.prune(), vec!["b".to_string()]);
        let a = store.get("a").unwrap();
        assert!(a.remote.is_none());
        assert_eq!(a.local.map(|l| l.version_code), Some(1));
    }

    #[test]
    fn raising_a_notification_twice_keeps_one() {
        let store = RecordStore::new();
        store.add_notification(NotificationKind::NoInternet, false);
        store.add_notification(NotificationKind::NoInternet, true);
        assert_eq!(
            store.notifications(),
            vec![ActiveNotification {
                kind: NotificationKind::NoInternet,
                special: true
            }]
        );
        let snapshot = store.snapshot_for_pass(&NeverSuppress);
        assert_eq!(snapshot.notifications.len(), 1);
        assert!(store.dismiss_notification(NotificationKind::NoInternet));
        assert!(store.notifications().is_empty());
    }

    #[test]
    #[should_panic(expected = "duplicate module id")]
    #[cfg(debug_assertions)]
    fn duplicate_ids_in_a_scan_trip_debug_assert() {
        let store = RecordStore::new();
        store.replace_local(vec![LocalInfo::new("a", "Alpha", 1), LocalInfo::new("a", "Alpha", 2)]);
    }
}
