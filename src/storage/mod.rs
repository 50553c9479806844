//! Storage layer: the in-memory record store and the collaborator contracts.
//!
//! The merged model itself is never persisted; it is rebuilt from the local
//! scan and the remote catalog. What lives here is the store that holds it
//! between passes, plus read access to the external settings store.
//!
//! # Modules
//!
//! - `store`: Record store keyed by module id, with the active notifications
//! - `backend`: Settings and remote catalog traits with in-memory implementations
//! - `json`: JSON file-backed settings and snapshot loaders
//! - `models`: Settings model

pub mod backend;
pub mod json;
pub mod models;
pub mod store;

pub use backend::{RemoteCatalog, SettingsSource, StaticCatalog, StaticSettings};
pub use json::{load_local_snapshot, load_remote_snapshot, JsonSettings};
pub use models::Settings;
pub use store::{ActiveNotification, PassSnapshot, RecordStore};
