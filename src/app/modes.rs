//! Sort mode state for the catalog list.
//!
//! The list offers two orderings for the updatable and installable buckets.
//! The user cycles between them; installed modules are always sorted by name.
//!
//! # State Machine
//!
//! ```text
//! Recency ──next()──▶ Alphabetical ──next()──▶ Recency
//! ```
//!
//! # Example
//!
//! ```rust
//! use modcatalog::app::SortMode;
//!
//! let mode = SortMode::default();
//! assert_eq!(mode, SortMode::Recency);
//! assert_eq!(mode.next(), SortMode::Alphabetical);
//! ```

use serde::{Deserialize, Serialize};

/// Ordering applied inside the updatable and installable buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    /// Most recently updated catalog entries first.
    ///
    /// Key: filter tier, then catalog update time descending, then name.
    #[default]
    Recency,

    /// Case-insensitive name order.
    ///
    /// Key: filter tier, then lowercase name.
    Alphabetical,
}

impl SortMode {
    /// The mode that follows this one when cycling.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Recency => Self::Alphabetical,
            Self::Alphabetical => Self::Recency,
        }
    }

    /// Short label shown on the online section header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recency => "by last update",
            Self::Alphabetical => "by name",
        }
    }
}
