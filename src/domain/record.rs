//! Records that make up the rendered catalog list.
//!
//! [`ModuleRecord`] is a tagged union over the four row roles. Only
//! [`ModuleRecord::Entry`] carries module data; notifications, separators and
//! the footer are regenerated on every pass.

use super::lifecycle::LifecycleState;
use super::module::{LocalInfo, RemoteInfo, UninstallState, UpdateTarget, SELF_UPDATE_SOURCE};
use super::notification::NotificationKind;
use serde::Serialize;

/// What activating an entry does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActivateAction {
    Install(UpdateTarget),
}

/// A module known from the local scan, the remote catalog, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEntry {
    pub id: String,
    pub local: Option<LocalInfo>,
    pub remote: Option<RemoteInfo>,
    /// How well the entry matched the active query; 0 is best, 3 is hidden.
    pub filter_tier: u8,
    /// Bucket assigned by the last classification.
    pub lifecycle: LifecycleState,
    pub on_activate: Option<ActivateAction>,
}

/// Borrowed view over whichever source info describes an entry best.
#[derive(Debug, Clone, Copy)]
pub enum MainInfo<'a> {
    Local(&'a LocalInfo),
    Remote(&'a RemoteInfo),
}

impl<'a> MainInfo<'a> {
    #[must_use]
    pub fn name(self) -> &'a str {
        match self {
            Self::Local(info) => &info.name,
            Self::Remote(info) => &info.name,
        }
    }

    #[must_use]
    pub fn version(self) -> &'a str {
        match self {
            Self::Local(info) => &info.version,
            Self::Remote(info) => &info.version,
        }
    }

    #[must_use]
    pub fn author(self) -> Option<&'a str> {
        match self {
            Self::Local(info) => info.author.as_deref(),
            Self::Remote(info) => info.author.as_deref(),
        }
    }

    #[must_use]
    pub fn description(self) -> Option<&'a str> {
        match self {
            Self::Local(info) => info.description.as_deref(),
            Self::Remote(info) => info.description.as_deref(),
        }
    }

    #[must_use]
    pub fn support(self) -> Option<&'a str> {
        match self {
            Self::Local(info) => info.support.as_deref(),
            Self::Remote(info) => info.support.as_deref(),
        }
    }

    #[must_use]
    pub fn donate(self) -> Option<&'a str> {
        match self {
            Self::Local(info) => info.donate.as_deref(),
            Self::Remote(info) => info.donate.as_deref(),
        }
    }

    #[must_use]
    pub const fn safe(self) -> bool {
        match self {
            Self::Local(info) => info.safe,
            Self::Remote(info) => info.safe,
        }
    }
}

impl ModuleEntry {
    /// Creates an empty entry for `id`; sources are attached by the store.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            local: None,
            remote: None,
            filter_tier: 0,
            lifecycle: LifecycleState::Installed,
            on_activate: None,
        }
    }

    /// Returns `true` once both sources have stopped reporting this id.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.local.is_none() && self.remote.is_none()
    }

    /// The remote info when it is newer than (or there is no) local info,
    /// otherwise the local info. `None` only for an empty entry.
    #[must_use]
    pub fn main_info(&self) -> Option<MainInfo<'_>> {
        match (&self.local, &self.remote) {
            (None, Some(remote)) => Some(MainInfo::Remote(remote)),
            (Some(local), Some(remote)) if local.version_code < remote.version_code => {
                Some(MainInfo::Remote(remote))
            }
            (Some(local), _) => Some(MainInfo::Local(local)),
            (None, None) => None,
        }
    }

    /// Display name of the main info, falling back to the id.
    #[must_use]
    pub fn main_name(&self) -> &str {
        self.main_info().map_or(self.id.as_str(), MainInfo::name)
    }

    /// Config entry point; only offered for installed modules.
    #[must_use]
    pub fn main_config(&self) -> Option<&str> {
        let local = self.local.as_ref()?;
        local
            .config
            .as_deref()
            .or_else(|| self.remote.as_ref().and_then(|r| r.config.as_deref()))
    }

    /// Where an install or update of this entry would come from.
    ///
    /// The remote zip wins when there is no local copy or the module's own
    /// update manifest is behind the catalog; otherwise the manifest's zip.
    #[must_use]
    pub fn update_target(&self) -> Option<UpdateTarget> {
        let remote_preferred = match (&self.local, &self.remote) {
            (None, Some(_)) => true,
            (Some(local), Some(remote)) => {
                local.update_version_code.unwrap_or(i64::MIN) < remote.version_code
            }
            _ => false,
        };

        if remote_preferred {
            return self.remote.as_ref().map(|remote| UpdateTarget {
                zip_url: remote.zip_url.clone(),
                source: remote.repo_id.clone(),
                checksum: remote.checksum.clone(),
            });
        }

        let local = self.local.as_ref()?;
        local.update_zip_url.as_ref().map(|zip_url| UpdateTarget {
            zip_url: zip_url.clone(),
            source: SELF_UPDATE_SOURCE.to_string(),
            checksum: None,
        })
    }

    /// Last catalog update time, 0 when the entry is not in the catalog.
    #[must_use]
    pub fn remote_last_updated(&self) -> i64 {
        self.remote.as_ref().map_or(0, |remote| remote.last_updated)
    }
}

/// One row of the catalog list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ModuleRecord {
    Entry(ModuleEntry),
    Notification {
        kind: NotificationKind,
        special: bool,
    },
    Separator {
        bucket: LifecycleState,
    },
    Footer {
        height_px: u32,
    },
}

impl ModuleRecord {
    /// The row's true bucket.
    #[must_use]
    pub const fn state(&self) -> LifecycleState {
        match self {
            Self::Entry(entry) => entry.lifecycle,
            Self::Notification { .. } => LifecycleState::Notification,
            Self::Separator { .. } => LifecycleState::Separator,
            Self::Footer { .. } => LifecycleState::Footer,
        }
    }

    /// The bucket used as primary sort key.
    ///
    /// A separator sorts with the bucket it introduces and a special
    /// notification floats into [`LifecycleState::SpecialNotification`].
    #[must_use]
    pub const fn compare_state(&self) -> LifecycleState {
        match self {
            Self::Separator { bucket } => *bucket,
            Self::Notification { special: true, .. } => LifecycleState::SpecialNotification,
            _ => self.state(),
        }
    }

    #[must_use]
    pub const fn as_entry(&self) -> Option<&ModuleEntry> {
        match self {
            Self::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_separator_for(&self, state: LifecycleState) -> bool {
        matches!(self, Self::Separator { bucket } if *bucket as u8 == state as u8)
    }

    /// Notifications that stay in the leading list segment.
    #[must_use]
    pub const fn is_plain_notification(&self) -> bool {
        matches!(self, Self::Notification { special: false, .. })
    }
}

/// Per-row action hints for the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ActionButton {
    /// The id looks hidden or malformed.
    Warning,
    Uninstall(UninstallState),
    /// Release notes are available.
    Info,
    UpdateInstall,
    /// Reinstall from the known source.
    Remote,
    Config,
    Support,
    Donate,
    Safe,
}

/// Computes the buttons shown for an entry, in display order.
#[must_use]
pub fn action_buttons(entry: &ModuleEntry, showcase: bool) -> Vec<ActionButton> {
    let mut buttons = Vec::new();
    let local = entry.local.as_ref();
    let remote = entry.remote.as_ref();

    if entry.id.starts_with('.') || !is_well_formed_id(&entry.id) {
        buttons.push(ActionButton::Warning);
    }
    if let Some(local) = local.filter(|_| !showcase) {
        buttons.push(ActionButton::Uninstall(local.uninstall_state()));
    }
    if remote.is_some_and(|r| r.notes_url.is_some()) {
        buttons.push(ActionButton::Info);
    }
    if remote.is_some() || local.is_some_and(|l| l.update_zip_url.is_some() && l.has_self_update())
    {
        buttons.push(ActionButton::UpdateInstall);
    }
    if let Some(local) = local {
        let remote_not_newer = remote.is_some_and(|r| r.version_code <= local.version_code);
        let manifest_not_newer = local
            .update_version_code
            .is_some_and(|code| code <= local.version_code);
        if remote_not_newer || manifest_not_newer {
            buttons.push(ActionButton::Remote);
        }
    }
    if entry.main_config().is_some() {
        buttons.push(ActionButton::Config);
    }
    if let Some(main) = entry.main_info() {
        if main.support().is_some() {
            buttons.push(ActionButton::Support);
        }
        if main.donate().is_some() {
            buttons.push(ActionButton::Donate);
        }
        if main.safe() {
            buttons.push(ActionButton::Safe);
        }
    }
    buttons
}

// ^[a-zA-Z][a-zA-Z0-9._-]+$
fn is_well_formed_id(id: &str) -> bool {
    let mut chars = id.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let rest = chars.as_str();
    first.is_ascii_alphabetic()
        && !rest.is_empty()
        && rest
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
