//! Actions representing side effects to be executed by the host.
//!
//! The event handler never touches the worker channel or the rendering surface
//! directly. It returns a `Vec<Action>` and the host executes them in order.
//!
//! # Example
//!
//! ```rust
//! use modcatalog::app::Action;
//! use modcatalog::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::rebuild())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::UpdateTarget;
use crate::reconcile::RenderUpdate;
use crate::worker::WorkerMessage;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Posts a message to the background worker thread.
    PostToWorker(WorkerMessage),

    /// Hands a diffed list to the rendering surface.
    ///
    /// The surface applies the range ops in order, then the scroll anchor. It
    /// must not reorder or filter the rows itself.
    ApplyUpdate(RenderUpdate),

    /// Starts the external installer for a module.
    OpenInstaller {
        /// Module being installed or updated.
        module_id: String,
        /// Where the zip comes from.
        target: UpdateTarget,
    },
}
