//! Reconciliation: classify, filter, order and diff the catalog list.
//!
//! # Pass Pipeline
//!
//! ```text
//! RecordStore ──snapshot──▶ visible_entry ──▶ classify ──▶ match_filter
//!                                                              │
//!      ListPresenter ◀── sort_records ◀── separators / footer ◀┘
//!            │
//!            └──▶ RenderUpdate { records, ops, anchor }
//! ```
//!
//! # Modules
//!
//! - [`classify`]: Lifecycle classification, visibility and update tracking
//! - [`filter`]: Query normalization and tier scoring
//! - [`ordering`]: Comparator over heterogeneous rows
//! - [`engine`]: [`ReconciliationEngine`], one pass at a time
//! - [`diff`]: Three-segment range diff and the [`ListPresenter`]

pub mod classify;
pub mod diff;
pub mod engine;
pub mod filter;
pub mod ordering;

pub use classify::{classify, visible_entry, UpdateSummary, UpdateTracker};
pub use diff::{
    diff_segments, ListPresenter, RangeOp, RenderUpdate, ScrollAnchor, SegmentLengths, Viewport,
};
pub use engine::{BuiltList, EngineOptions, ReconciliationEngine};
pub use filter::{match_filter, normalize_query, FilterMatch, HIDDEN_TIER};
pub use ordering::{compare, sort_records};
