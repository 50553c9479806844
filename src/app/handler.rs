//! Event handling and state transition logic.
//!
//! This module implements the UI-thread event handler. It processes user input
//! and worker responses, updates [`AppState`] and returns the actions the host
//! must execute.
//!
//! # Architecture
//!
//! ```text
//! User Input ──▶ Event ──▶ handle_event ──▶ Vec<Action> ──▶ worker / surface
//!                              ▲                                │
//!                              └──── WorkerResponse ◀───────────┘
//! ```
//!
//! # Rebuild Bookkeeping
//!
//! A pass requested while another is running is dropped by the engine and the
//! worker answers `PassSkipped`. The handler remembers that and, when the next
//! list arrives, asks for exactly one more rebuild so the surface converges on
//! the latest sources.

use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{ActivateAction, NotificationKind};
use crate::reconcile::Viewport;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input, host conditions or worker responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The search text changed.
    QueryChanged(String),

    /// Switch to the next sort mode.
    CycleSortMode,

    /// The surface scrolled.
    ViewportChanged(Viewport),

    /// A host condition should be shown as a banner.
    NotificationRaised {
        kind: NotificationKind,
        special: bool,
    },

    /// The user activated the row at `index` of the rendered list.
    Activate {
        index: usize,
    },

    /// Wraps a response from the background worker thread.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// The boolean is `true` when the surface should redraw.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for hosts that wrap it.
///
/// # Example
///
/// ```rust
/// use modcatalog::app::{handle_event, Action, AppState, Event};
/// use modcatalog::reconcile::{EngineOptions, ReconciliationEngine};
/// use std::sync::Arc;
///
/// let engine = Arc::new(ReconciliationEngine::with_defaults(EngineOptions::default()));
/// let mut state = AppState::new(engine);
///
/// let (_, actions) = handle_event(&mut state, &Event::QueryChanged("busy".into()))?;
/// assert!(matches!(actions[0], Action::PostToWorker(_)));
///
/// // same normalized query, nothing to do
/// let (_, actions) = handle_event(&mut state, &Event::QueryChanged(" BUSY ".into()))?;
/// assert!(actions.is_empty());
/// # Ok::<(), modcatalog::CatalogError>(())
/// ```
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event_name(event)).entered();

    match event {
        Event::QueryChanged(raw) => {
            if state.engine.set_query(raw) {
                Ok((false, vec![Action::PostToWorker(WorkerMessage::rebuild())]))
            } else {
                tracing::trace!("query unchanged, skipping rebuild");
                Ok((false, vec![]))
            }
        }
        Event::CycleSortMode => {
            if state.engine.cycle_sort_mode() {
                Ok((false, vec![Action::PostToWorker(WorkerMessage::rebuild())]))
            } else {
                Ok((false, vec![]))
            }
        }
        Event::ViewportChanged(viewport) => {
            state.viewport = *viewport;
            Ok((false, vec![]))
        }
        Event::NotificationRaised { kind, special } => Ok((
            false,
            vec![Action::PostToWorker(WorkerMessage::raise_notification(*kind, *special))],
        )),
        Event::Activate { index } => {
            let Some((module_id, action)) = state.activation_at(*index) else {
                tracing::debug!(index, "row has no activation");
                return Ok((false, vec![]));
            };
            let ActivateAction::Install(target) = action;
            tracing::debug!(module_id = %module_id, source = %target.source, "opening installer");
            Ok((
                false,
                vec![Action::OpenInstaller {
                    module_id: module_id.to_string(),
                    target: target.clone(),
                }],
            ))
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::ListBuilt { list } => {
            let update = state.presenter.present(list.records.clone(), state.viewport);
            state.last_error = None;

            let mut actions = vec![Action::ApplyUpdate(update)];
            if state.rebuild_pending {
                tracing::debug!("issuing deferred rebuild");
                state.rebuild_pending = false;
                actions.push(Action::PostToWorker(WorkerMessage::rebuild()));
            }
            Ok((true, actions))
        }
        WorkerResponse::PassSkipped => {
            tracing::debug!("pass skipped, rebuild pending");
            state.rebuild_pending = true;
            Ok((false, vec![]))
        }
        WorkerResponse::Error { message } => {
            tracing::warn!(error = %message, "worker reported an error, keeping rendered list");
            state.last_error = Some(message.clone());
            Ok((true, vec![]))
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::QueryChanged(_) => "query_changed",
        Event::CycleSortMode => "cycle_sort_mode",
        Event::ViewportChanged(_) => "viewport_changed",
        Event::NotificationRaised { .. } => "notification_raised",
        Event::Activate { .. } => "activate",
        Event::WorkerResponse(_) => "worker_response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LocalInfo, ModuleRecord, NeverSuppress, RemoteInfo};
    use crate::reconcile::{BuiltList, EngineOptions, ReconciliationEngine, ScrollAnchor};
    use crate::storage::{Settings, StaticSettings};
    use std::sync::Arc;

    fn state() -> AppState {
        let engine = ReconciliationEngine::new(
            Arc::new(StaticSettings::new(Settings {
                show_low_quality: true,
                ..Settings::default()
            })),
            Arc::new(NeverSuppress),
            EngineOptions::default(),
        );
        AppState::new(Arc::new(engine))
    }

    fn built(state: &AppState) -> BuiltList {
        state.engine.build().unwrap()
    }

    #[test]
    fn skipped_pass_triggers_exactly_one_follow_up() {
        let mut state = state();
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::PassSkipped)).unwrap();
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::PassSkipped)).unwrap();
        assert!(state.rebuild_pending);

        let list = built(&state);
        let (redraw, actions) =
            handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ListBuilt { list: list.clone() })).unwrap();
        assert!(redraw);
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[1], Action::PostToWorker(WorkerMessage::Rebuild { .. })));

        let (_, actions) =
            handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ListBuilt { list })).unwrap();
        assert_eq!(actions.len(), 1);
    }

    #[test]
    fn error_keeps_rendered_list() {
        let mut state = state();
        state.engine.store().replace_remote(vec![RemoteInfo::new("a", "Alpha", 1, "main")]);
        let list = built(&state);
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ListBuilt { list })).unwrap();
        let before = state.rendered().to_vec();

        let error = WorkerResponse::Error { message: "merge remote catalog: busy".to_string() };
        let (_, actions) = handle_event(&mut state, &Event::WorkerResponse(error)).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.rendered(), before.as_slice());
        assert!(state.last_error.is_some());
    }

    #[test]
    fn activating_installable_row_opens_installer() {
        let mut state = state();
        state.engine.store().replace_remote(vec![RemoteInfo::new("a", "Alpha", 1, "main")]);
        let list = built(&state);
        let (_, actions) =
            handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ListBuilt { list })).unwrap();
        match &actions[0] {
            Action::ApplyUpdate(update) => assert_eq!(update.anchor, ScrollAnchor::Top),
            other => panic!("unexpected action: {other:?}"),
        }

        assert!(matches!(state.rendered()[0], ModuleRecord::Separator { .. }));
        let (_, actions) = handle_event(&mut state, &Event::Activate { index: 0 }).unwrap();
        assert!(actions.is_empty());

        let (_, actions) = handle_event(&mut state, &Event::Activate { index: 1 }).unwrap();
        assert!(matches!(
            &actions[0],
            Action::OpenInstaller { module_id, .. } if module_id == "a"
        ));
    }

    #[test]
    fn header_counts_updates_on_screen() {
        let mut state = state();
        state.engine.replace_local(vec![LocalInfo::new("a", "Alpha", 1)]);
        state.engine.store().replace_remote(vec![RemoteInfo::new("a", "Alpha", 2, "main")]);
        let list = built(&state);
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ListBuilt { list })).unwrap();
        let header = state.compute_viewmodel(0).header;
        assert_eq!(header.subtitle.as_deref(), Some("1 update(s) available"));

        state.engine.replace_local(vec![LocalInfo::new("a", "Alpha", 2)]);
        let list = built(&state);
        handle_event(&mut state, &Event::WorkerResponse(WorkerResponse::ListBuilt { list })).unwrap();
        let header = state.compute_viewmodel(0).header;
        assert_eq!(header.title, " Modules (1) ");
        assert_eq!(header.subtitle, None);
    }
}
