//! Worker thread and UI-side handler driven together over channels.

use crossbeam_channel::{Receiver, Sender};
use modcatalog::app::{handle_event, Action, AppState, Event};
use modcatalog::domain::{LifecycleState, LocalInfo, ModuleRecord, NeverSuppress, RemoteInfo};
use modcatalog::reconcile::{EngineOptions, ReconciliationEngine, ScrollAnchor};
use modcatalog::storage::{Settings, StaticCatalog, StaticSettings};
use modcatalog::ui::{RenderSurface, TextSurface};
use modcatalog::{CatalogWorker, WorkerMessage, WorkerResponse};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

struct Harness {
    app: AppState,
    surface: TextSurface,
    catalog: Arc<StaticCatalog>,
    requests: Sender<WorkerMessage>,
    responses: Receiver<WorkerResponse>,
}

impl Harness {
    fn start() -> Self {
        let engine = Arc::new(ReconciliationEngine::new(
            Arc::new(StaticSettings::new(Settings {
                show_low_quality: true,
                ..Settings::default()
            })),
            Arc::new(NeverSuppress),
            EngineOptions {
                retry_backoff: Duration::from_millis(1),
                max_merge_retries: 2,
                ..EngineOptions::default()
            },
        ));
        let catalog = Arc::new(StaticCatalog::new(vec![]));
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (response_tx, response_rx) = crossbeam_channel::unbounded();
        CatalogWorker::new(engine.clone(), catalog.clone())
            .spawn(request_rx, response_tx)
            .unwrap();

        Self {
            app: AppState::new(engine),
            surface: TextSurface::new(),
            catalog,
            requests: request_tx,
            responses: response_rx,
        }
    }

    /// Posts `message` and feeds every resulting response through the handler.
    fn round_trip(&mut self, message: WorkerMessage) -> Vec<Action> {
        let mut outstanding = 1;
        self.requests.send(message).unwrap();
        let mut seen = Vec::new();
        while outstanding > 0 {
            let response = self.responses.recv_timeout(Duration::from_secs(5)).unwrap();
            outstanding -= 1;
            let (_, actions) = handle_event(&mut self.app, &Event::WorkerResponse(response)).unwrap();
            for action in &actions {
                match action {
                    Action::PostToWorker(next) => {
                        self.requests.send(next.clone()).unwrap();
                        outstanding += 1;
                    }
                    Action::ApplyUpdate(update) => self.surface.apply(update),
                    Action::OpenInstaller { .. } => {}
                }
            }
            seen.extend(actions);
        }
        seen
    }
}

#[test]
fn scan_and_catalog_reach_the_surface() {
    let mut harness = Harness::start();
    harness.round_trip(WorkerMessage::local_scan_completed(vec![LocalInfo::new("a", "Alpha", 1)]));
    assert_eq!(harness.surface.rows(), harness.app.rendered());

    harness.catalog.publish(vec![
        RemoteInfo::new("a", "Alpha", 2, "main"),
        RemoteInfo::new("b", "Bravo", 1, "main"),
    ]);
    let actions = harness.round_trip(WorkerMessage::catalog_updated());
    assert!(matches!(&actions[0], Action::ApplyUpdate(u) if u.anchor == ScrollAnchor::Top));

    let buckets: Vec<_> = harness
        .surface
        .rows()
        .iter()
        .filter_map(|r| match r {
            ModuleRecord::Separator { bucket } => Some(*bucket),
            _ => None,
        })
        .collect();
    assert_eq!(buckets, vec![LifecycleState::Updatable, LifecycleState::Installable]);
    assert_eq!(harness.surface.rows(), harness.app.rendered());
}

#[test]
fn failed_merge_keeps_surface_and_reports_error() {
    let mut harness = Harness::start();
    harness.catalog.publish(vec![RemoteInfo::new("b", "Bravo", 1, "main")]);
    harness.round_trip(WorkerMessage::catalog_updated());
    let before = harness.surface.rows().to_vec();

    harness.catalog.set_busy_pulls(10);
    let actions = harness.round_trip(WorkerMessage::catalog_updated());
    assert!(actions.is_empty());
    assert_eq!(harness.surface.rows(), before.as_slice());
    assert!(harness.app.last_error.is_some());
}

#[test]
fn query_change_rebuilds_and_filters() {
    let mut harness = Harness::start();
    harness.round_trip(WorkerMessage::local_scan_completed(vec![
        LocalInfo::new("a", "Alpha", 1),
        LocalInfo::new("b", "Bravo", 1),
    ]));

    let (_, actions) = handle_event(&mut harness.app, &Event::QueryChanged("brav".into())).unwrap();
    let [Action::PostToWorker(message)] = actions.as_slice() else {
        panic!("expected one rebuild, got {actions:?}");
    };
    harness.round_trip(message.clone());

    let ids: Vec<_> = harness
        .surface
        .rows()
        .iter()
        .filter_map(ModuleRecord::as_entry)
        .map(|e| e.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b"]);

    let viewmodel = harness.app.compute_viewmodel(0);
    let row = viewmodel.rows.iter().find(|r| r.title == "Bravo").unwrap();
    assert_eq!(row.highlight_ranges, vec![(0, 4)]);
}
