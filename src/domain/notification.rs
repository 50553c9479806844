//! System banners shown above the module list.
//!
//! A notification is raised by whatever part of the host notices a condition
//! (no connectivity, installer missing, ...). Before every pass the list builder
//! asks a [`NotificationProbe`] whether each active banner still applies and
//! drops the ones that no longer do.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Kinds of banner. Declaration order is the display order inside a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NotificationKind {
    DebugBuild,
    ShowcaseMode,
    NoRoot,
    RootDenied,
    InstallerOutdated,
    NoInternet,
    RepoUpdateFailed,
    NeedCaptcha,
    NoWebView,
    AppUpdateAvailable,
    InstallFromStorage,
    ExperimentalInstaller,
}

impl NotificationKind {
    /// Every kind in display order.
    pub const ALL: [Self; 12] = [
        Self::DebugBuild,
        Self::ShowcaseMode,
        Self::NoRoot,
        Self::RootDenied,
        Self::InstallerOutdated,
        Self::NoInternet,
        Self::RepoUpdateFailed,
        Self::NeedCaptcha,
        Self::NoWebView,
        Self::AppUpdateAvailable,
        Self::InstallFromStorage,
        Self::ExperimentalInstaller,
    ];

    /// Banner text.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::DebugBuild => "Debug build",
            Self::ShowcaseMode => "Showcase mode: installs are disabled",
            Self::NoRoot => "No root installer found",
            Self::RootDenied => "Root access denied",
            Self::InstallerOutdated => "Installer is too old to install modules",
            Self::NoInternet => "No internet connection",
            Self::RepoUpdateFailed => "Failed to update repositories",
            Self::NeedCaptcha => "Repository requires a captcha",
            Self::NoWebView => "No web view available",
            Self::AppUpdateAvailable => "An app update is available",
            Self::InstallFromStorage => "Install a module from storage",
            Self::ExperimentalInstaller => "Installer support is experimental",
        }
    }
}

/// Decides whether an active notification should be dropped before a pass.
pub trait NotificationProbe: Send + Sync {
    fn should_suppress(&self, kind: NotificationKind) -> bool;
}

/// Probe that never suppresses anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverSuppress;

impl NotificationProbe for NeverSuppress {
    fn should_suppress(&self, _kind: NotificationKind) -> bool {
        false
    }
}

/// Host conditions the built-in suppression rules look at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStatus {
    pub debug_build: bool,
    pub showcase_mode: bool,
    /// The installer failure currently being reported, if any.
    pub installer_error: Option<NotificationKind>,
    /// Whether a root installer binary was found.
    pub installer_present: bool,
    pub installer_version: i64,
    /// Lowest installer version able to run install commands.
    pub installer_min_version: i64,
    pub experimental_installer: bool,
    pub has_connectivity: bool,
    pub last_repo_update_ok: bool,
    pub captcha_repo_enabled: bool,
    pub captcha_required: bool,
    pub has_web_view: bool,
    pub app_update_pending: bool,
}

/// [`NotificationProbe`] backed by a shared, replaceable [`SystemStatus`].
#[derive(Debug, Default)]
pub struct StatusProbe {
    status: RwLock<SystemStatus>,
}

impl StatusProbe {
    #[must_use]
    pub fn new(status: SystemStatus) -> Self {
        Self {
            status: RwLock::new(status),
        }
    }

    /// Replaces the current status snapshot.
    pub fn update(&self, status: SystemStatus) {
        *self.status.write() = status;
    }

    #[must_use]
    pub fn status(&self) -> SystemStatus {
        self.status.read().clone()
    }
}

impl NotificationProbe for StatusProbe {
    fn should_suppress(&self, kind: NotificationKind) -> bool {
        let s = self.status.read();
        match kind {
            NotificationKind::DebugBuild => !s.debug_build,
            NotificationKind::ShowcaseMode => !s.showcase_mode,
            NotificationKind::NoRoot | NotificationKind::RootDenied => {
                s.installer_error != Some(kind)
            }
            NotificationKind::InstallerOutdated => {
                s.experimental_installer
                    || !s.installer_present
                    || s.installer_version >= s.installer_min_version
            }
            NotificationKind::NoInternet => s.has_connectivity,
            NotificationKind::RepoUpdateFailed => s.last_repo_update_ok,
            NotificationKind::NeedCaptcha => !s.captcha_repo_enabled || !s.captcha_required,
            NotificationKind::NoWebView => s.has_web_view,
            NotificationKind::AppUpdateAvailable => !s.app_update_pending,
            NotificationKind::InstallFromStorage => {
                !s.debug_build && (s.showcase_mode || !s.installer_present)
            }
            NotificationKind::ExperimentalInstaller => {
                !s.debug_build
                    && (s.showcase_mode || !s.installer_present || !s.experimental_installer)
            }
        }
    }
}
