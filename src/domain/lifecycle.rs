//! Lifecycle buckets that partition the rendered list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The section a record belongs to. Declaration order is the sort priority.
///
/// Only module entries resolve to [`Updatable`](Self::Updatable),
/// [`Installed`](Self::Installed) or [`Installable`](Self::Installable); the
/// remaining variants are structural.
///
/// # Examples
///
/// ```
/// use modcatalog::domain::LifecycleState;
///
/// assert!(LifecycleState::Notification < LifecycleState::Updatable);
/// assert!(LifecycleState::Installed < LifecycleState::SpecialNotification);
/// assert!(LifecycleState::Installable < LifecycleState::Footer);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifecycleState {
    Header,
    Separator,
    Notification,
    Updatable,
    Installed,
    SpecialNotification,
    Installable,
    Footer,
}

impl LifecycleState {
    /// Section title shown on this bucket's separator row.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Header => "Header",
            Self::Separator => "Separator",
            Self::Notification | Self::SpecialNotification => "Notices",
            Self::Updatable => "Updates available",
            Self::Installed => "Installed",
            Self::Installable => "Online repositories",
            Self::Footer => "Footer",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}
