//! Lifecycle classification and visibility of merged entries.

use crate::domain::{LifecycleState, ModuleEntry, RemoteInfo, VersionExclusionRule};
use crate::storage::Settings;
use parking_lot::Mutex;

/// Assigns an entry to its lifecycle bucket.
///
/// An entry with a local copy is updatable when either the catalog or the
/// module's own update manifest offers a higher version code, unless the user
/// excluded that update. Everything else with a local copy is installed, and
/// catalog-only entries are installable.
///
/// # Examples
///
/// ```
/// use modcatalog::domain::{LifecycleState, LocalInfo, ModuleEntry, RemoteInfo};
/// use modcatalog::reconcile::classify;
/// use modcatalog::storage::Settings;
///
/// let entry = ModuleEntry {
///     local: Some(LocalInfo::new("a", "Alpha", 10)),
///     remote: Some(RemoteInfo::new("a", "Alpha", 20, "main")),
///     ..ModuleEntry::new("a")
/// };
///
/// assert_eq!(classify(&entry, &Settings::default()), LifecycleState::Updatable);
///
/// let skip = Settings::default().with_rule("a:^15");
/// assert_eq!(classify(&entry, &skip), LifecycleState::Installed);
/// ```
#[must_use]
pub fn classify(entry: &ModuleEntry, settings: &Settings) -> LifecycleState {
    let Some(local) = entry.local.as_ref() else {
        return if entry.remote.is_some() {
            LifecycleState::Installable
        } else {
            LifecycleState::Installed
        };
    };

    let remote_code = entry.remote.as_ref().map(|remote| remote.version_code);
    let newest = remote_code.max(local.update_version_code);
    if !newest.is_some_and(|code| code > local.version_code) {
        return LifecycleState::Installed;
    }

    let offered = remote_code
        .or(local.update_version_code)
        .unwrap_or(local.version_code);
    if update_ignored(&entry.id, offered, settings) {
        tracing::debug!(module_id = %entry.id, offered, "update ignored by exclusion");
        LifecycleState::Installed
    } else {
        LifecycleState::Updatable
    }
}

fn update_ignored(id: &str, offered: i64, settings: &Settings) -> bool {
    if settings.excluded_module_ids.contains(id) {
        return true;
    }
    VersionExclusionRule::find_for(&settings.version_exclusion_rules, id)
        .is_some_and(|rule| rule.excludes(offered))
}

/// Applies the visibility settings to an entry taken from the store.
///
/// Catalog info from a disabled repository, or flagged incompatible while
/// incompatible modules are hidden, is dropped as if the catalog never listed
/// it. Returns `None` when nothing visible remains, or when the entry is a
/// catalog-only low-quality module and low-quality modules are hidden.
#[must_use]
pub fn visible_entry(mut entry: ModuleEntry, settings: &Settings) -> Option<ModuleEntry> {
    let hide_remote = entry.remote.as_ref().is_some_and(|remote| {
        !remote.repo_enabled || (remote.is_incompatible() && !settings.show_incompatible)
    });
    if hide_remote {
        entry.remote = None;
    }

    if entry.is_empty() {
        return None;
    }
    let low_quality_only = entry.local.is_none()
        && entry.remote.as_ref().is_some_and(RemoteInfo::is_low_quality);
    if low_quality_only && !settings.show_low_quality {
        tracing::trace!(module_id = %entry.id, "low quality module hidden");
        return None;
    }
    Some(entry)
}

/// Summary of the modules found updatable so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub count: usize,
    pub ids: Vec<String>,
}

/// Deduplicated record of every id classified updatable since the last reset.
#[derive(Debug, Default)]
pub struct UpdateTracker {
    ids: Mutex<Vec<String>>,
}

impl UpdateTracker {
    /// Records `id`; returns `true` if it was not tracked yet.
    pub fn record(&self, id: &str) -> bool {
        let mut ids = self.ids.lock();
        if ids.iter().any(|known| known == id) {
            return false;
        }
        ids.push(id.to_string());
        true
    }

    #[must_use]
    pub fn summary(&self) -> UpdateSummary {
        let ids = self.ids.lock().clone();
        UpdateSummary {
            count: ids.len(),
            ids,
        }
    }

    pub fn reset(&self) {
        self.ids.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalInfo, QualityFlags};

    fn both(local_code: i64, remote_code: i64) -> ModuleEntry {
        ModuleEntry {
            local: Some(LocalInfo::new("m", "Module", local_code)),
            remote: Some(RemoteInfo::new("m", "Module", remote_code, "main")),
            ..ModuleEntry::new("m")
        }
    }

    #[test]
    fn version_tie_is_installed() {
        assert_eq!(classify(&both(5, 5), &Settings::default()), LifecycleState::Installed);
        assert_eq!(classify(&both(6, 5), &Settings::default()), LifecycleState::Installed);
    }

    #[test]
    fn local_only_with_manifest_update_is_updatable() {
        let mut local = LocalInfo::new("m", "Module", 3);
        local.update_version_code = Some(4);
        let entry = ModuleEntry {
            local: Some(local),
            ..ModuleEntry::new("m")
        };
        assert_eq!(classify(&entry, &Settings::default()), LifecycleState::Updatable);

        let skip = Settings::default().with_rule("m:4");
        assert_eq!(classify(&entry, &skip), LifecycleState::Installed);
    }

    #[test]
    fn remote_code_is_the_offered_version_when_present() {
        let mut entry = both(10, 9);
        if let Some(local) = entry.local.as_mut() {
            local.update_version_code = Some(12);
        }
        // offered version is 9 from the catalog, so an exact rule on 12 does not apply
        assert_eq!(
            classify(&entry, &Settings::default().with_rule("m:12")),
            LifecycleState::Updatable
        );
        assert_eq!(
            classify(&entry, &Settings::default().with_rule("m:9")),
            LifecycleState::Installed
        );
    }

    #[test]
    fn flat_exclusion_wins() {
        let settings = Settings::default().with_excluded("m");
        assert_eq!(classify(&both(1, 2), &settings), LifecycleState::Installed);
    }

    #[test]
    fn malformed_rule_does_not_exclude() {
        let settings = Settings::default().with_rule("m:^next$");
        assert_eq!(classify(&both(1, 2), &settings), LifecycleState::Updatable);
    }

    #[test]
    fn disabled_repo_hides_catalog_info() {
        let mut entry = both(1, 2);
        if let Some(remote) = entry.remote.as_mut() {
            remote.repo_enabled = false;
        }
        let visible = visible_entry(entry, &Settings::default()).unwrap();
        assert!(visible.remote.is_none());
        assert_eq!(classify(&visible, &Settings::default()), LifecycleState::Installed);
    }

    #[test]
    fn incompatible_catalog_only_entry_disappears() {
        let mut remote = RemoteInfo::new("m", "Module", 1, "main");
        remote.author = Some("someone".to_string());
        remote.description = Some("does things".to_string());
        remote.quality_flags = QualityFlags::INCOMPATIBLE;
        let entry = ModuleEntry {
            remote: Some(remote),
            ..ModuleEntry::new("m")
        };
        assert!(visible_entry(entry.clone(), &Settings::default()).is_none());

        let show = Settings {
            show_incompatible: true,
            ..Settings::default()
        };
        assert!(visible_entry(entry, &show).is_some());
    }

    #[test]
    fn low_quality_only_hidden_without_override() {
        let entry = ModuleEntry {
            remote: Some(RemoteInfo::new("m", "Mo", 1, "main")),
            ..ModuleEntry::new("m")
        };
        assert!(visible_entry(entry.clone(), &Settings::default()).is_none());
        let show = Settings {
            show_low_quality: true,
            ..Settings::default()
        };
        assert!(visible_entry(entry, &show).is_some());
    }

    #[test]
    fn tracker_deduplicates() {
        let tracker = UpdateTracker::default();
        assert!(tracker.record("a"));
        assert!(!tracker.record("a"));
        assert!(tracker.record("b"));
        assert_eq!(tracker.summary().count, 2);
        tracker.reset();
        assert_eq!(tracker.summary(), UpdateSummary::default());
    }
}
