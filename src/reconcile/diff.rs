//! Three-segment range diff between two rendered lists.
//!
//! A rendered list is read as three contiguous segments:
//!
//! ```text
//! [plain notifications][local / offline rows][online rows]
//!                      ^                     ^
//!                      |                     first Separator(Installable), or end
//!                      first row that is not a plain notification
//! ```
//!
//! Each segment is compared only by length. Equal lengths become one
//! `Changed` op; growth appends an `Inserted` op after the common prefix and
//! shrinkage a `Removed` op. Indexes are in new-list coordinates, so a consumer
//! applying the ops front to back always sees consistent positions.
//!
//! Segment boundaries are recomputed from each list on every pass.

use crate::domain::{LifecycleState, ModuleRecord};
use serde::Serialize;

/// Lengths of the three segments of one list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SegmentLengths {
    pub notifications: usize,
    pub local: usize,
    pub online: usize,
}

impl SegmentLengths {
    /// Measures the segments of a sorted list.
    #[must_use]
    pub fn of(records: &[ModuleRecord]) -> Self {
        let notifications = records
            .iter()
            .take_while(|r| r.is_plain_notification())
            .count();
        let boundary = records[notifications..]
            .iter()
            .position(|r| r.is_separator_for(LifecycleState::Installable))
            .map_or(records.len(), |offset| notifications + offset);
        Self {
            notifications,
            local: boundary - notifications,
            online: records.len() - boundary,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.notifications + self.local + self.online
    }
}

/// One range instruction for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RangeOp {
    Changed { index: usize, count: usize },
    Inserted { index: usize, count: usize },
    Removed { index: usize, count: usize },
}

/// Computes the range ops turning `old` segment lengths into `new` ones.
///
/// Zero-length ops are never emitted.
///
/// # Examples
///
/// ```
/// use modcatalog::reconcile::{diff_segments, RangeOp, SegmentLengths};
///
/// let old = SegmentLengths { notifications: 3, local: 5, online: 2 };
/// let new = SegmentLengths { notifications: 3, local: 2, online: 6 };
///
/// assert_eq!(
///     diff_segments(old, new),
///     vec![
///         RangeOp::Changed { index: 0, count: 3 },
///         RangeOp::Changed { index: 3, count: 2 },
///         RangeOp::Removed { index: 5, count: 3 },
///         RangeOp::Changed { index: 5, count: 2 },
///         RangeOp::Inserted { index: 7, count: 4 },
///     ]
/// );
/// ```
#[must_use]
pub fn diff_segments(old: SegmentLengths, new: SegmentLengths) -> Vec<RangeOp> {
    let mut ops = Vec::with_capacity(6);
    let mut index = 0;
    for (old_len, new_len) in [
        (old.notifications, new.notifications),
        (old.local, new.local),
        (old.online, new.online),
    ] {
        emit_segment(&mut ops, index, old_len, new_len);
        index += new_len;
    }
    ops
}

fn emit_segment(ops: &mut Vec<RangeOp>, index: usize, old_len: usize, new_len: usize) {
    let common = old_len.min(new_len);
    if common > 0 {
        ops.push(RangeOp::Changed { index, count: common });
    }
    if new_len > old_len {
        ops.push(RangeOp::Inserted {
            index: index + old_len,
            count: new_len - old_len,
        });
    } else if old_len > new_len {
        ops.push(RangeOp::Removed {
            index: index + new_len,
            count: old_len - new_len,
        });
    }
}

/// Where the viewport was before the update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub at_top: bool,
    pub at_bottom: bool,
}

impl Viewport {
    #[must_use]
    pub const fn top() -> Self {
        Self { at_top: true, at_bottom: false }
    }

    #[must_use]
    pub const fn bottom() -> Self {
        Self { at_top: false, at_bottom: true }
    }

    /// Scrolled somewhere in the middle.
    #[must_use]
    pub const fn middle() -> Self {
        Self { at_top: false, at_bottom: false }
    }
}

/// Scroll instruction issued after the ops are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScrollAnchor {
    Keep,
    Top,
    /// Scroll to this position, the new list length.
    Bottom(usize),
}

/// Everything the rendering surface needs to apply one pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderUpdate {
    pub records: Vec<ModuleRecord>,
    pub ops: Vec<RangeOp>,
    pub anchor: ScrollAnchor,
}

/// Holds the last rendered list and diffs every new list against it.
#[derive(Debug, Default)]
pub struct ListPresenter {
    rendered: Vec<ModuleRecord>,
}

impl ListPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The list the surface currently shows.
    #[must_use]
    pub fn rendered(&self) -> &[ModuleRecord] {
        &self.rendered
    }

    /// Diffs `records` against the rendered list and makes it current.
    pub fn present(&mut self, records: Vec<ModuleRecord>, viewport: Viewport) -> RenderUpdate {
        let _span = tracing::debug_span!(
            "present",
            old_len = self.rendered.len(),
            new_len = records.len()
        )
        .entered();

        let old = SegmentLengths::of(&self.rendered);
        let new = SegmentLengths::of(&records);
        let ops = diff_segments(old, new);

        let anchor = if self.rendered.is_empty() || viewport.at_top {
            ScrollAnchor::Top
        } else if viewport.at_bottom {
            ScrollAnchor::Bottom(records.len())
        } else {
            ScrollAnchor::Keep
        };

        tracing::debug!(ops = ops.len(), ?anchor, "diff emitted");
        self.rendered.clone_from(&records);
        RenderUpdate {
            records,
            ops,
            anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModuleEntry, NotificationKind};
    use pretty_assertions::assert_eq;

    fn replay(old: SegmentLengths, ops: &[RangeOp]) -> usize {
        ops.iter().fold(old.total(), |len, op| match op {
            RangeOp::Changed { .. } => len,
            RangeOp::Inserted { count, .. } => len + count,
            RangeOp::Removed { count, .. } => len - count,
        })
    }

    #[test]
    fn ops_reconstruct_the_new_length() {
        let cases = [
            ((3, 5, 2), (3, 2, 6)),
            ((0, 0, 0), (1, 4, 2)),
            ((2, 3, 4), (0, 0, 0)),
            ((1, 1, 1), (1, 1, 1)),
        ];
        for ((a, b, c), (x, y, z)) in cases {
            let old = SegmentLengths { notifications: a, local: b, online: c };
            let new = SegmentLengths { notifications: x, local: y, online: z };
            assert_eq!(replay(old, &diff_segments(old, new)), new.total());
        }
    }

    #[test]
    fn empty_to_empty_emits_nothing() {
        assert!(diff_segments(SegmentLengths::default(), SegmentLengths::default()).is_empty());
    }

    #[test]
    fn segments_split_at_installable_separator() {
        let list = vec![
            ModuleRecord::Notification { kind: NotificationKind::NoInternet, special: false },
            ModuleRecord::Separator { bucket: LifecycleState::Installed },
            ModuleRecord::Entry(ModuleEntry::new("a")),
            ModuleRecord::Notification { kind: NotificationKind::NoRoot, special: true },
            ModuleRecord::Separator { bucket: LifecycleState::Installable },
            ModuleRecord::Entry(ModuleEntry::new("b")),
            ModuleRecord::Footer { height_px: 10 },
        ];
        assert_eq!(
            SegmentLengths::of(&list),
            SegmentLengths { notifications: 1, local: 3, online: 3 }
        );
    }

    #[test]
    fn presenter_anchors_top_on_first_render_and_bottom_when_pinned() {
        let mut presenter = ListPresenter::new();
        let first = presenter.present(vec![ModuleRecord::Footer { height_px: 1 }], Viewport::bottom());
        assert_eq!(first.anchor, ScrollAnchor::Top);

        let list = vec![
            ModuleRecord::Entry(ModuleEntry::new("a")),
            ModuleRecord::Footer { height_px: 1 },
        ];
        let second = presenter.present(list.clone(), Viewport::bottom());
        assert_eq!(second.anchor, ScrollAnchor::Bottom(2));

        let third = presenter.present(list, Viewport::middle());
        assert_eq!(third.anchor, ScrollAnchor::Keep);
        assert_eq!(third.ops, vec![RangeOp::Changed { index: 0, count: 2 }]);
    }
}
