//! Domain layer for the module catalog.
//!
//! This module contains the value types and pure rules of the catalog,
//! independent of threading, storage or rendering concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`module`]: Local scan and remote catalog source records
//! - [`lifecycle`]: The ordered buckets of the rendered list
//! - [`record`]: Merged entries, list rows and action hints
//! - [`notification`]: System banners and their suppression rules
//! - [`exclusion`]: Persisted per-module update exclusion rules
//!
//! # Examples
//!
//! ```
//! use modcatalog::domain::{LocalInfo, ModuleEntry, RemoteInfo};
//!
//! let entry = ModuleEntry {
//!     local: Some(LocalInfo::new("busybox-ndk", "BusyBox", 1)),
//!     remote: Some(RemoteInfo::new("busybox-ndk", "BusyBox NDK", 2, "main")),
//!     ..ModuleEntry::new("busybox-ndk")
//! };
//! assert_eq!(entry.main_name(), "BusyBox NDK");
//! ```

pub mod error;
pub mod exclusion;
pub mod lifecycle;
pub mod module;
pub mod notification;
pub mod record;

pub use error::{CatalogError, Result};
pub use exclusion::{ExclusionMode, VersionExclusionRule};
pub use lifecycle::LifecycleState;
pub use module::{
    LocalFlags, LocalInfo, QualityFlags, RemoteInfo, UninstallState, UpdateTarget, SELF_UPDATE_SOURCE,
};
pub use notification::{NeverSuppress, NotificationKind, NotificationProbe, StatusProbe, SystemStatus};
pub use record::{action_buttons, ActionButton, ActivateAction, MainInfo, ModuleEntry, ModuleRecord};
