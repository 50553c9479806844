//! UI-thread application state and view model computation.
//!
//! [`AppState`] lives on the rendering thread. It holds a handle to the shared
//! engine (for query and sort mode changes, which take the engine's own locks),
//! the presenter that remembers the last rendered list, and the bookkeeping for
//! passes that were dropped while another was in flight.
//!
//! # Example
//!
//! ```rust
//! use modcatalog::app::AppState;
//! use modcatalog::reconcile::{EngineOptions, ReconciliationEngine};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(ReconciliationEngine::with_defaults(EngineOptions::default()));
//! let state = AppState::new(engine);
//! let viewmodel = state.compute_viewmodel(0);
//! assert!(viewmodel.empty_state.is_some());
//! ```

use crate::domain::{ActivateAction, LifecycleState, ModuleRecord};
use crate::reconcile::{ListPresenter, ReconciliationEngine, Viewport};
use crate::ui::viewmodel::{CatalogViewModel, EmptyState, HeaderInfo, RowContext};
use std::sync::Arc;

/// Central UI-thread state container.
#[derive(Debug)]
pub struct AppState {
    /// Shared engine, also driven by the worker thread.
    pub engine: Arc<ReconciliationEngine>,

    /// Last rendered list, diffed against every new one.
    pub presenter: ListPresenter,

    /// Scroll position reported by the surface.
    pub viewport: Viewport,

    /// A pass was dropped; rebuild once the in-flight one is delivered.
    pub rebuild_pending: bool,

    /// Installs are disabled; uninstall buttons are hidden.
    pub showcase: bool,

    /// Message of the last worker failure, cleared by the next list.
    pub last_error: Option<String>,
}

impl AppState {
    #[must_use]
    pub fn new(engine: Arc<ReconciliationEngine>) -> Self {
        Self {
            engine,
            presenter: ListPresenter::new(),
            viewport: Viewport::top(),
            rebuild_pending: false,
            showcase: false,
            last_error: None,
        }
    }

    /// Rows currently shown by the surface.
    #[must_use]
    pub fn rendered(&self) -> &[ModuleRecord] {
        self.presenter.rendered()
    }

    /// Install action of the row at `index`, if it has one.
    #[must_use]
    pub fn activation_at(&self, index: usize) -> Option<(&str, &ActivateAction)> {
        let entry = self.rendered().get(index)?.as_entry()?;
        entry.on_activate.as_ref().map(|action| (entry.id.as_str(), action))
    }

    /// Display context for the current query and sort mode.
    #[must_use]
    pub fn row_context(&self, now: i64) -> RowContext {
        RowContext {
            query: self.engine.query(),
            sort_mode: self.engine.sort_mode(),
            showcase: self.showcase,
            now,
        }
    }

    /// Computes a renderable view model of the rendered list.
    ///
    /// `now` is the current Unix time in seconds, used for relative update
    /// times.
    #[must_use]
    pub fn compute_viewmodel(&self, now: i64) -> CatalogViewModel {
        let _span = tracing::debug_span!("compute_viewmodel", rows = self.rendered().len()).entered();
        let context = self.row_context(now);
        let matcher = context.matcher();
        let rows = self
            .rendered()
            .iter()
            .map(|record| context.row(record, matcher.as_ref()))
            .collect::<Vec<_>>();

        let entries = self.rendered().iter().filter_map(ModuleRecord::as_entry);
        let (entries, updates) = entries.fold((0_usize, 0_usize), |(all, updatable), entry| {
            let is_update = entry.lifecycle == LifecycleState::Updatable;
            (all + 1, updatable + usize::from(is_update))
        });
        let header = HeaderInfo {
            title: format!(" Modules ({entries}) "),
            subtitle: (updates > 0).then(|| format!("{updates} update(s) available")),
        };

        let empty_state = (entries == 0).then(|| {
            if context.query.is_empty() {
                EmptyState {
                    message: "No modules".to_string(),
                    subtitle: "Nothing installed and no repository listing yet".to_string(),
                }
            } else {
                EmptyState {
                    message: "No matches".to_string(),
                    subtitle: format!("Nothing matches \"{}\"", context.query),
                }
            }
        });

        CatalogViewModel {
            header,
            rows,
            empty_state,
            error: self.last_error.clone(),
        }
    }
}
