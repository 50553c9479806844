//! End-to-end passes through the engine: classification, visibility,
//! exclusion rules, filtering and the segment diff.

use modcatalog::domain::{LifecycleState, LocalInfo, ModuleRecord, NeverSuppress, NotificationKind, RemoteInfo};
use modcatalog::reconcile::{
    diff_segments, EngineOptions, ListPresenter, RangeOp, ReconciliationEngine, SegmentLengths, Viewport,
};
use modcatalog::storage::{load_remote_snapshot, Settings, StaticCatalog, StaticSettings};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

fn engine_with(settings: Settings) -> (ReconciliationEngine, Arc<StaticSettings>) {
    let source = Arc::new(StaticSettings::new(settings));
    let engine = ReconciliationEngine::new(
        source.clone(),
        Arc::new(NeverSuppress),
        EngineOptions {
            retry_backoff: Duration::from_millis(1),
            ..EngineOptions::default()
        },
    );
    (engine, source)
}

fn listed(id: &str, name: &str, code: i64) -> RemoteInfo {
    let mut remote = RemoteInfo::new(id, name, code, "main");
    remote.author = Some("someone".to_string());
    remote.description = Some(format!("{name} for everyone"));
    remote
}

/// Compact rendering of a list: `#Bucket` for separators, ids for entries.
fn shape(records: &[ModuleRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| match record {
            ModuleRecord::Entry(entry) => entry.id.clone(),
            ModuleRecord::Separator { bucket } => format!("#{bucket:?}"),
            ModuleRecord::Notification { kind, .. } => format!("!{kind:?}"),
            ModuleRecord::Footer { height_px } => format!("_{height_px}"),
        })
        .collect()
}

#[test]
fn update_and_install_buckets() {
    let (engine, _) = engine_with(Settings::default());
    engine.replace_local(vec![LocalInfo::new("a", "Alpha", 1)]);
    let catalog = StaticCatalog::new(vec![listed("a", "Alpha", 2), listed("b", "Bravo", 1)]);
    engine.merge_remote(&catalog).unwrap();

    let list = engine.build().unwrap();
    assert_eq!(shape(&list.records), vec!["#Updatable", "a", "#Installable", "b"]);
    assert_eq!(engine.updates().ids, vec!["a".to_string()]);
}

#[test]
fn merging_the_same_catalog_twice_is_idempotent() {
    let (engine, _) = engine_with(Settings::default());
    engine.replace_local(vec![LocalInfo::new("a", "Alpha", 1)]);
    let catalog = StaticCatalog::new(vec![listed("a", "Alpha", 2), listed("b", "Bravo", 1)]);

    engine.merge_remote(&catalog).unwrap();
    let first = engine.build().unwrap();
    engine.merge_remote(&catalog).unwrap();
    let second = engine.build().unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(engine.updates().count, 1);
}

#[test]
fn applying_the_same_local_scan_twice_is_idempotent() {
    let (engine, _) = engine_with(Settings::default());
    let mut manifest = LocalInfo::new("m", "Magisk Hide", 3);
    manifest.update_version_code = Some(4);
    manifest.update_zip_url = Some("https://host/m.zip".to_string());
    let scan = vec![LocalInfo::new("a", "Alpha", 1), manifest];
    engine
        .merge_remote(&StaticCatalog::new(vec![listed("a", "Alpha", 2)]))
        .unwrap();

    assert!(engine.replace_local(scan.clone()).is_empty());
    let first = engine.build().unwrap();
    assert!(engine.replace_local(scan).is_empty());
    let second = engine.build().unwrap();

    assert_eq!(first.records, second.records);
    assert_eq!(shape(&second.records), vec!["#Updatable", "a", "m"]);
    assert_eq!(engine.updates().count, 2);
    assert_eq!(engine.updates().ids, vec!["a".to_string(), "m".to_string()]);
}

#[test]
fn snapshot_listing_without_repo_flag_is_shown() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    std::fs::write(
        &path,
        r#"[{"id":"busybox","name":"BusyBox NDK","versionCode":3,"zipUrl":"https://host/busybox.zip","repoId":"main","author":"osm0sis","description":"Static busybox"}]"#,
    )
    .unwrap();

    let (engine, _) = engine_with(Settings::default());
    engine
        .merge_remote(&StaticCatalog::new(load_remote_snapshot(&path).unwrap()))
        .unwrap();

    let list = engine.build().unwrap();
    assert_eq!(list.entry_count(), 1);
    assert_eq!(shape(&list.records), vec!["#Installable", "busybox"]);
}

#[test]
fn exclusion_rules_decide_update_visibility() {
    let cases = [
        ("a:^15", LifecycleState::Installed),
        ("a:15$", LifecycleState::Updatable),
        ("a:25", LifecycleState::Updatable),
        ("a:20", LifecycleState::Installed),
        ("a:^15$", LifecycleState::Updatable),
        ("other:^1", LifecycleState::Updatable),
    ];

    for (rule, expected) in cases {
        let (engine, _) = engine_with(Settings::default().with_rule(rule));
        engine.replace_local(vec![LocalInfo::new("a", "Alpha", 10)]);
        engine
            .merge_remote(&StaticCatalog::new(vec![listed("a", "Alpha", 20)]))
            .unwrap();

        let list = engine.build().unwrap();
        let entry = list.records.iter().find_map(ModuleRecord::as_entry).unwrap();
        assert_eq!(entry.lifecycle, expected, "rule {rule}");
    }
}

#[test]
fn settings_changes_apply_on_next_pass() {
    let (engine, settings) = engine_with(Settings::default());
    engine.replace_local(vec![LocalInfo::new("a", "Alpha", 10)]);
    engine
        .merge_remote(&StaticCatalog::new(vec![listed("a", "Alpha", 20)]))
        .unwrap();
    assert_eq!(shape(&engine.build().unwrap().records), vec!["#Updatable", "a"]);

    settings.replace(Settings::default().with_excluded("a"));
    assert_eq!(shape(&engine.build().unwrap().records), vec!["#Installed", "a"]);
}

#[test]
fn query_without_matches_keeps_notifications() {
    let (engine, _) = engine_with(Settings::default());
    engine.replace_local(vec![LocalInfo::new("a", "Alpha", 1)]);
    engine.add_notification(NotificationKind::NoInternet, false);

    assert!(engine.set_query("  ZZ "));
    let list = engine.build().unwrap();
    assert_eq!(list.query, "zz");
    assert_eq!(shape(&list.records), vec!["!NoInternet"]);
}

#[test]
fn low_quality_and_incompatible_listings_are_hidden() {
    let (engine, settings) = engine_with(Settings::default());
    let mut broken = listed("c", "Charlie", 1);
    broken.quality_flags = modcatalog::domain::QualityFlags::INCOMPATIBLE;
    engine
        .merge_remote(&StaticCatalog::new(vec![
            RemoteInfo::new("x", "X", 1, "main"),
            broken,
            listed("b", "Bravo", 1),
        ]))
        .unwrap();
    assert_eq!(shape(&engine.build().unwrap().records), vec!["#Installable", "b"]);

    settings.replace(Settings {
        show_incompatible: true,
        show_low_quality: true,
        ..Settings::default()
    });
    assert_eq!(
        shape(&engine.build().unwrap().records),
        vec!["#Installable", "b", "c", "x"]
    );
}

#[test]
fn footer_closes_the_list() {
    let source = Arc::new(StaticSettings::new(Settings::default()));
    let engine = ReconciliationEngine::new(
        source,
        Arc::new(NeverSuppress),
        EngineOptions {
            footer_height_px: Some(48),
            ..EngineOptions::default()
        },
    );
    engine.replace_local(vec![LocalInfo::new("a", "Alpha", 1)]);
    assert_eq!(shape(&engine.build().unwrap().records), vec!["#Installed", "a", "_48"]);
}

#[test]
fn segment_diff_from_three_five_two_to_three_two_six() {
    let old = SegmentLengths { notifications: 3, local: 5, online: 2 };
    let new = SegmentLengths { notifications: 3, local: 2, online: 6 };
    assert_eq!(
        diff_segments(old, new),
        vec![
            RangeOp::Changed { index: 0, count: 3 },
            RangeOp::Changed { index: 3, count: 2 },
            RangeOp::Removed { index: 5, count: 3 },
            RangeOp::Changed { index: 5, count: 2 },
            RangeOp::Inserted { index: 7, count: 4 },
        ]
    );
}

#[test]
fn presenter_diffs_consecutive_passes() {
    let (engine, _) = engine_with(Settings::default());
    let mut presenter = ListPresenter::new();
    engine.replace_local(vec![LocalInfo::new("a", "Alpha", 1)]);
    let first = presenter.present(engine.build().unwrap().records, Viewport::middle());
    assert_eq!(first.ops, vec![RangeOp::Inserted { index: 0, count: 2 }]);

    engine
        .merge_remote(&StaticCatalog::new(vec![listed("b", "Bravo", 1)]))
        .unwrap();
    let second = presenter.present(engine.build().unwrap().records, Viewport::middle());
    assert_eq!(
        second.ops,
        vec![
            RangeOp::Changed { index: 0, count: 2 },
            RangeOp::Inserted { index: 2, count: 2 },
        ]
    );
    assert_eq!(second.anchor, modcatalog::reconcile::ScrollAnchor::Keep);
}
