//! Error types for the module catalog.
//!
//! This module defines the centralized error type [`CatalogError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Only a handful of operations are fallible at all: loading configuration and
//! settings, reading JSON snapshots, pulling the remote catalog and talking to the
//! worker thread. Classification, filtering, ordering and diffing never fail.

use thiserror::Error;

/// The main error type for catalog operations.
///
/// # Examples
///
/// ```
/// use modcatalog::CatalogError;
///
/// let busy = CatalogError::CatalogBusy("repo metadata still loading".to_string());
/// assert!(busy.is_transient());
///
/// let bad = CatalogError::Settings("unreadable settings file".to_string());
/// assert!(!bad.is_transient());
/// ```
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The settings store could not be read or parsed.
    #[error("Settings error: {0}")]
    Settings(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A local-scan or remote-catalog snapshot file is malformed.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// The remote catalog is still being populated by the fetcher.
    ///
    /// This is the only transient variant: the remote merge step retries it
    /// with linear backoff before giving up.
    #[error("Remote catalog busy: {0}")]
    CatalogBusy(String),

    /// Communication with the background worker failed.
    ///
    /// Occurs when a channel end was dropped or the worker thread could not be
    /// spawned.
    #[error("Worker communication error: {0}")]
    Worker(String),
}

impl CatalogError {
    /// Returns `true` when retrying the same operation later may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::CatalogBusy(_))
    }
}

/// A specialized `Result` type for catalog operations.
pub type Result<T> = std::result::Result<T, CatalogError>;
