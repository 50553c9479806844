//! View model types representing renderable UI state.
//!
//! View models are computed from the rendered record list via
//! `AppState::compute_viewmodel()` and consumed by the renderer. They carry
//! display-ready text only: titles, version transitions, relative update times,
//! highlight ranges and action buttons.
//!
//! # Example
//!
//! ```rust
//! use modcatalog::app::SortMode;
//! use modcatalog::domain::{LifecycleState, ModuleRecord};
//! use modcatalog::ui::viewmodel::{RowContext, RowKind};
//!
//! let context = RowContext {
//!     query: String::new(),
//!     sort_mode: SortMode::Recency,
//!     showcase: false,
//!     now: 0,
//! };
//! let row = context.row(&ModuleRecord::Separator { bucket: LifecycleState::Installed }, None);
//! assert_eq!(row.kind, RowKind::Separator);
//! assert_eq!(row.title, "Installed");
//! ```

use crate::app::SortMode;
use crate::domain::{action_buttons, ActionButton, LifecycleState, ModuleEntry, ModuleRecord};
use crate::ui::helpers::highlight_ranges;
use chrono::DateTime;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Complete view model for one frame.
#[derive(Debug, Clone)]
pub struct CatalogViewModel {
    pub header: HeaderInfo,

    /// One row per rendered record, same order.
    pub rows: Vec<DisplayRow>,

    /// Set when the list holds no module entries.
    pub empty_state: Option<EmptyState>,

    /// Last worker failure, shown under the header.
    pub error: Option<String>,
}

/// Display information for a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub kind: RowKind,

    /// Module name, notification message or section title.
    pub title: String,

    /// Author line, `by <author>`.
    pub author: Option<String>,

    pub description: Option<String>,

    /// Installed version, or `v1 → v2` when an update is offered.
    pub version_text: Option<String>,

    /// Relative time of the last repository update, e.g. `3d ago`.
    pub updated_text: Option<String>,

    /// Character ranges of `title` matching the query.
    ///
    /// Each tuple is `(start_index, end_index)` in UTF-8 character indices.
    pub highlight_ranges: Vec<(usize, usize)>,

    pub buttons: Vec<ActionButton>,
}

/// What a row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Module(LifecycleState),
    Notification { special: bool },
    Separator,
    Footer { height_px: u32 },
}

/// Header information (title, update count).
#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
    pub subtitle: Option<String>,
}

/// Empty state message.
#[derive(Debug, Clone)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Inputs shared by every row of a frame.
#[derive(Debug, Clone)]
pub struct RowContext {
    /// Normalized query, empty when not searching.
    pub query: String,
    pub sort_mode: SortMode,
    pub showcase: bool,
    /// Current Unix time in seconds.
    pub now: i64,
}

impl RowContext {
    /// Builds a matcher when the query is non-empty.
    #[must_use]
    pub fn matcher(&self) -> Option<SkimMatcherV2> {
        (!self.query.is_empty()).then(SkimMatcherV2::default)
    }

    /// Computes the display row for `record`.
    #[must_use]
    pub fn row(&self, record: &ModuleRecord, matcher: Option<&SkimMatcherV2>) -> DisplayRow {
        match record {
            ModuleRecord::Entry(entry) => self.entry_row(entry, matcher),
            ModuleRecord::Notification { kind, special } => {
                bare_row(RowKind::Notification { special: *special }, kind.message())
            }
            ModuleRecord::Separator { bucket } => {
                let mut row = bare_row(RowKind::Separator, bucket.title());
                if *bucket == LifecycleState::Installable {
                    row.description = Some(self.sort_mode.label().to_string());
                }
                row
            }
            ModuleRecord::Footer { height_px } => bare_row(RowKind::Footer { height_px: *height_px }, ""),
        }
    }

    fn entry_row(&self, entry: &ModuleEntry, matcher: Option<&SkimMatcherV2>) -> DisplayRow {
        let title = entry.main_name().to_string();
        let highlight_ranges = matcher
            .map(|m| highlight_ranges(&title, &self.query, m))
            .unwrap_or_default();
        let main = entry.main_info();

        DisplayRow {
            kind: RowKind::Module(entry.lifecycle),
            author: main.and_then(|m| m.author()).map(|a| format!("by {a}")),
            description: main.and_then(|m| m.description()).map(str::to_string),
            version_text: version_text(entry),
            updated_text: updated_at(entry).map(|ts| time_ago(ts, self.now)),
            highlight_ranges,
            buttons: action_buttons(entry, self.showcase),
            title,
        }
    }
}

fn bare_row(kind: RowKind, title: &str) -> DisplayRow {
    DisplayRow {
        kind,
        title: title.to_string(),
        author: None,
        description: None,
        version_text: None,
        updated_text: None,
        highlight_ranges: Vec::new(),
        buttons: Vec::new(),
    }
}

fn version_text(entry: &ModuleEntry) -> Option<String> {
    match (&entry.local, &entry.remote) {
        (Some(local), remote) if entry.lifecycle == LifecycleState::Updatable => {
            let offered = remote
                .as_ref()
                .filter(|r| r.version_code > local.version_code)
                .map(|r| r.version.as_str())
                .or(local.update_version.as_deref());
            Some(match offered {
                Some(next) => format!("{} → {next}", local.version),
                None => local.version.clone(),
            })
        }
        (Some(local), _) => Some(local.version.clone()),
        (None, Some(remote)) => Some(remote.version.clone()),
        (None, None) => None,
    }
}

fn updated_at(entry: &ModuleEntry) -> Option<i64> {
    entry
        .remote
        .as_ref()
        .map(|r| r.last_updated)
        .filter(|ts| *ts > 0)
        .or_else(|| entry.local.as_ref().and_then(|l| l.last_updated))
}

/// Formats `timestamp` relative to `now`, both Unix seconds.
///
/// Anything older than a month is shown as a date.
///
/// # Examples
///
/// ```
/// use modcatalog::ui::viewmodel::time_ago;
///
/// assert_eq!(time_ago(1_000, 1_030), "just now");
/// assert_eq!(time_ago(0, 3 * 86_400), "3d ago");
/// assert_eq!(time_ago(0, 90 * 86_400), "1970-01-01");
/// ```
#[must_use]
pub fn time_ago(timestamp: i64, now: i64) -> String {
    let elapsed = chrono::Duration::seconds(now.saturating_sub(timestamp).max(0));
    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h ago", elapsed.num_hours())
    } else if elapsed.num_days() < 30 {
        format!("{}d ago", elapsed.num_days())
    } else {
        DateTime::from_timestamp(timestamp, 0)
            .map_or_else(|| timestamp.to_string(), |at| at.format("%Y-%m-%d").to_string())
    }
}
