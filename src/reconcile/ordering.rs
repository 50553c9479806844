//! Total order over heterogeneous list rows.
//!
//! Rows are ordered by three keys:
//!
//! 1. the compare bucket (a separator counts as the bucket it introduces, a
//!    special notification as [`LifecycleState::SpecialNotification`])
//! 2. the row's true bucket, so a separator precedes its own entries
//! 3. a per-bucket key depending on the [`SortMode`]

use crate::app::modes::SortMode;
use crate::domain::{LifecycleState, ModuleEntry, ModuleRecord};
use std::cmp::Ordering;

/// Compares two rows for display order.
#[must_use]
pub fn compare(a: &ModuleRecord, b: &ModuleRecord, mode: SortMode) -> Ordering {
    a.compare_state()
        .cmp(&b.compare_state())
        .then_with(|| a.state().cmp(&b.state()))
        .then_with(|| compare_within_bucket(a, b, mode))
}

/// Sorts rows in place. The sort is stable.
pub fn sort_records(records: &mut [ModuleRecord], mode: SortMode) {
    records.sort_by(|a, b| compare(a, b, mode));
}

fn compare_within_bucket(a: &ModuleRecord, b: &ModuleRecord, mode: SortMode) -> Ordering {
    match (a, b) {
        (ModuleRecord::Separator { bucket: x }, ModuleRecord::Separator { bucket: y }) => x.cmp(y),
        (
            ModuleRecord::Notification { kind: x, .. },
            ModuleRecord::Notification { kind: y, .. },
        ) => x.cmp(y),
        (ModuleRecord::Entry(x), ModuleRecord::Entry(y)) => compare_entries(x, y, mode),
        (ModuleRecord::Footer { height_px: x }, ModuleRecord::Footer { height_px: y }) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn compare_entries(a: &ModuleEntry, b: &ModuleEntry, mode: SortMode) -> Ordering {
    let by_tier = a.filter_tier.cmp(&b.filter_tier);
    match (a.lifecycle, mode) {
        (LifecycleState::Updatable | LifecycleState::Installable, SortMode::Recency) => by_tier
            .then_with(|| b.remote_last_updated().cmp(&a.remote_last_updated()))
            .then_with(|| a.main_name().cmp(b.main_name())),
        _ => by_tier.then_with(|| {
            a.main_name()
                .to_lowercase()
                .cmp(&b.main_name().to_lowercase())
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalInfo, NotificationKind, RemoteInfo};
    use pretty_assertions::assert_eq;

    fn installable(id: &str, name: &str, last_updated: i64) -> ModuleRecord {
        let mut remote = RemoteInfo::new(id, name, 1, "main");
        remote.last_updated = last_updated;
        ModuleRecord::Entry(ModuleEntry {
            remote: Some(remote),
            lifecycle: LifecycleState::Installable,
            ..ModuleEntry::new(id)
        })
    }

    fn installed(id: &str, name: &str) -> ModuleRecord {
        ModuleRecord::Entry(ModuleEntry {
            local: Some(LocalInfo::new(id, name, 1)),
            lifecycle: LifecycleState::Installed,
            ..ModuleEntry::new(id)
        })
    }

    fn ids(records: &[ModuleRecord]) -> Vec<String> {
        records
            .iter()
            .map(|r| match r {
                ModuleRecord::Entry(e) => e.id.clone(),
                ModuleRecord::Separator { bucket } => format!("sep:{bucket:?}"),
                ModuleRecord::Notification { kind, .. } => format!("note:{kind:?}"),
                ModuleRecord::Footer { .. } => "footer".to_string(),
            })
            .collect()
    }

    #[test]
    fn buckets_then_separators_first() {
        let mut records = vec![
            ModuleRecord::Footer { height_px: 48 },
            installable("b", "Beta", 0),
            ModuleRecord::Separator { bucket: LifecycleState::Installable },
            installed("a", "Alpha"),
            ModuleRecord::Notification { kind: NotificationKind::NoInternet, special: true },
            ModuleRecord::Separator { bucket: LifecycleState::Installed },
            ModuleRecord::Notification { kind: NotificationKind::DebugBuild, special: false },
        ];
        sort_records(&mut records, SortMode::Recency);
        assert_eq!(
            ids(&records),
            vec![
                "note:DebugBuild",
                "sep:Installed",
                "a",
                "note:NoInternet",
                "sep:Installable",
                "b",
                "footer",
            ]
        );
    }

    #[test]
    fn recency_puts_newest_first_and_alphabetical_ignores_time() {
        let mut records = vec![
            installable("old", "Alpha", 100),
            installable("new", "zulu", 900),
            installable("mid", "Beta", 500),
        ];
        sort_records(&mut records, SortMode::Recency);
        assert_eq!(ids(&records), vec!["new", "mid", "old"]);

        sort_records(&mut records, SortMode::Alphabetical);
        assert_eq!(ids(&records), vec!["old", "mid", "new"]);
    }

    #[test]
    fn filter_tier_beats_name() {
        let mut a = installed("a", "Alpha");
        let b = installed("b", "Beta");
        if let ModuleRecord::Entry(e) = &mut a {
            e.filter_tier = 2;
        }
        let mut records = vec![a, b];
        sort_records(&mut records, SortMode::Recency);
        assert_eq!(ids(&records), vec!["b", "a"]);
    }
}
