//! Rendering surface and text output.
//!
//! A [`RenderSurface`] receives [`RenderUpdate`]s and applies the range ops in
//! order, then the scroll anchor. [`TextSurface`] is the terminal
//! implementation: it mirrors the rendered rows and prints them through the
//! view model.
//!
//! # Example
//!
//! ```rust
//! use modcatalog::domain::{LifecycleState, ModuleRecord};
//! use modcatalog::reconcile::{ListPresenter, Viewport};
//! use modcatalog::ui::{RenderSurface, TextSurface};
//!
//! let mut presenter = ListPresenter::new();
//! let mut surface = TextSurface::new();
//! let update = presenter.present(
//!     vec![ModuleRecord::Separator { bucket: LifecycleState::Installed }],
//!     Viewport::top(),
//! );
//! surface.apply(&update);
//! assert_eq!(surface.rows(), presenter.rendered());
//! ```

use crate::domain::ModuleRecord;
use crate::reconcile::{RangeOp, RenderUpdate, ScrollAnchor};
use crate::ui::helpers::{render_highlighted_text, ANSI_BOLD};
use crate::ui::viewmodel::{CatalogViewModel, DisplayRow, RowKind};
use std::fmt::Write as _;

/// Anything that can show a diffed record list.
pub trait RenderSurface {
    /// Applies the ops of `update` in order, then its scroll anchor.
    fn apply(&mut self, update: &RenderUpdate);
}

/// In-memory mirror of the rendered list, printed as text.
#[derive(Debug, Default)]
pub struct TextSurface {
    rows: Vec<ModuleRecord>,
    scroll: usize,
}

impl TextSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn rows(&self) -> &[ModuleRecord] {
        &self.rows
    }

    /// First visible row.
    #[must_use]
    pub const fn scroll(&self) -> usize {
        self.scroll
    }

    fn apply_op(&mut self, op: RangeOp, records: &[ModuleRecord]) -> bool {
        match op {
            RangeOp::Changed { index, count } => {
                let (Some(target), Some(source)) = (
                    self.rows.get_mut(index..index + count),
                    records.get(index..index + count),
                ) else {
                    return false;
                };
                target.clone_from_slice(source);
            }
            RangeOp::Inserted { index, count } => {
                let Some(source) = records.get(index..index + count) else {
                    return false;
                };
                if index > self.rows.len() {
                    return false;
                }
                self.rows.splice(index..index, source.iter().cloned());
            }
            RangeOp::Removed { index, count } => {
                if index + count > self.rows.len() {
                    return false;
                }
                self.rows.drain(index..index + count);
            }
        }
        true
    }
}

impl RenderSurface for TextSurface {
    fn apply(&mut self, update: &RenderUpdate) {
        let _span = tracing::trace_span!("surface_apply", ops = update.ops.len()).entered();

        for op in &update.ops {
            if !self.apply_op(*op, &update.records) {
                tracing::error!(?op, rows = self.rows.len(), "range op out of bounds, resyncing");
                self.rows.clone_from(&update.records);
                break;
            }
        }
        if self.rows.len() != update.records.len() {
            tracing::error!(
                rows = self.rows.len(),
                expected = update.records.len(),
                "surface diverged from update, resyncing"
            );
            self.rows.clone_from(&update.records);
        }

        self.scroll = match update.anchor {
            ScrollAnchor::Top => 0,
            ScrollAnchor::Bottom(position) => position,
            ScrollAnchor::Keep => self.scroll.min(self.rows.len()),
        };
    }
}

/// Renders a view model to plain text, one line per row.
///
/// With `ansi` set, query matches are emboldened.
#[must_use]
pub fn render_to_string(vm: &CatalogViewModel, ansi: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", vm.header.title.trim());
    if let Some(subtitle) = &vm.header.subtitle {
        let _ = writeln!(out, "{subtitle}");
    }
    if let Some(error) = &vm.error {
        let _ = writeln!(out, "! {error}");
    }

    for row in &vm.rows {
        if let Some(line) = render_row(row, ansi) {
            let _ = writeln!(out, "{line}");
        }
    }

    if let Some(empty) = &vm.empty_state {
        let _ = writeln!(out, "{}", empty.message);
        let _ = writeln!(out, "{}", empty.subtitle);
    }
    out
}

/// Prints a view model to stdout.
pub fn render(vm: &CatalogViewModel) {
    print!("{}", render_to_string(vm, true));
}

fn render_row(row: &DisplayRow, ansi: bool) -> Option<String> {
    match row.kind {
        RowKind::Separator => Some(match &row.description {
            Some(hint) => format!("── {} ({hint}) ──", row.title),
            None => format!("── {} ──", row.title),
        }),
        RowKind::Notification { .. } => Some(format!("[!] {}", row.title)),
        RowKind::Footer { .. } => None,
        RowKind::Module(_) => {
            let markers = if ansi { ANSI_BOLD } else { ("", "") };
            let mut line = format!("  {}", render_highlighted_text(&row.title, &row.highlight_ranges, markers));
            if let Some(version) = &row.version_text {
                let _ = write!(line, "  {version}");
            }
            if let Some(author) = &row.author {
                let _ = write!(line, "  {author}");
            }
            if let Some(updated) = &row.updated_text {
                let _ = write!(line, "  ({updated})");
            }
            Some(line)
        }
    }
}
