//! Source records reported by the local scanner and the remote catalog.
//!
//! A module can be known from two independent places: the device scan
//! ([`LocalInfo`]) and a remote repository listing ([`RemoteInfo`]). Both are
//! plain data; merging them into one entry is the job of the record store.
//!
//! Both types deserialize from the camelCase JSON the collaborators emit, with
//! every optional field defaulted, so a minimal snapshot entry only needs
//! `id`, `name` and `versionCode` (plus `zipUrl` and `repoId` for remote ones).

use serde::{Deserialize, Serialize};

/// Status bits reported by the local scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalFlags(pub u32);

impl LocalFlags {
    /// An update was flashed and waits for a reboot.
    pub const UPDATING: Self = Self(0x02);
    pub const ACTIVE: Self = Self(0x04);
    /// Marked for removal on the next reboot.
    pub const UNINSTALLING: Self = Self(0x08);
    pub const MAYBE_ACTIVE: Self = Self(0x20);

    /// Returns `true` if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// What the uninstall button of an installed module would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UninstallState {
    /// Removal is already scheduled; activating cancels it.
    Pending,
    /// Schedule removal for the next reboot.
    OnReboot,
    /// A freshly flashed, not yet active module is deleted right away.
    Immediate,
}

/// Quality and compatibility bits attached to a catalog entry by the fetcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityFlags(pub u32);

impl QualityFlags {
    /// The repository itself marked the module as low quality.
    pub const LOW_QUALITY: Self = Self(0x01);
    /// The module's metadata could not be fully loaded.
    pub const METADATA_INVALID: Self = Self(0x02);
    /// The module cannot run on this device (API level, ABI, ramdisk, ...).
    pub const INCOMPATIBLE: Self = Self(0x04);

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// A module installed on the device, as reported by the local scanner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub version_code: i64,
    pub author: Option<String>,
    pub description: Option<String>,
    /// Version advertised by the module's own update manifest, if any.
    pub update_version: Option<String>,
    pub update_version_code: Option<i64>,
    pub update_zip_url: Option<String>,
    pub flags: LocalFlags,
    /// Unix timestamp (seconds) of the last local modification.
    pub last_updated: Option<i64>,
    pub support: Option<String>,
    pub donate: Option<String>,
    pub config: Option<String>,
    pub safe: bool,
}

impl LocalInfo {
    /// Creates a local record with the required fields set and everything else empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use modcatalog::domain::LocalInfo;
    ///
    /// let info = LocalInfo::new("zygisk_lsposed", "LSPosed", 6_990);
    /// assert_eq!(info.version, "v6990");
    /// assert!(info.update_version_code.is_none());
    /// ```
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, version_code: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            version: format!("v{version_code}"),
            version_code,
            ..Self::default()
        }
    }

    /// Returns `true` when the module's own update manifest offers a newer build.
    #[must_use]
    pub fn has_self_update(&self) -> bool {
        self.update_version_code
            .is_some_and(|code| code > self.version_code)
    }

    #[must_use]
    pub const fn uninstall_state(&self) -> UninstallState {
        let active = LocalFlags::ACTIVE.union(LocalFlags::MAYBE_ACTIVE);
        if self.flags.contains(LocalFlags::UNINSTALLING) {
            UninstallState::Pending
        } else if self.flags.contains(LocalFlags::UPDATING) && !self.flags.intersects(active) {
            UninstallState::Immediate
        } else {
            UninstallState::OnReboot
        }
    }
}

/// A module listed by a remote repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub version_code: i64,
    pub author: Option<String>,
    pub description: Option<String>,
    pub zip_url: String,
    pub checksum: Option<String>,
    pub notes_url: Option<String>,
    pub repo_id: String,
    /// Listings from a snapshot belong to an enabled repository unless stated.
    #[serde(default = "enabled")]
    pub repo_enabled: bool,
    /// Unix timestamp (seconds) of the last catalog update for this module.
    pub last_updated: i64,
    pub quality_flags: QualityFlags,
    pub support: Option<String>,
    pub donate: Option<String>,
    pub config: Option<String>,
    pub safe: bool,
}

const fn enabled() -> bool {
    true
}

impl RemoteInfo {
    /// Creates a remote record from an enabled repository with the required fields set.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        version_code: i64,
        repo_id: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            zip_url: format!("https://example.invalid/{id}.zip"),
            id,
            name: name.into(),
            version: format!("v{version_code}"),
            version_code,
            repo_id: repo_id.into(),
            repo_enabled: true,
            ..Self::default()
        }
    }

    /// Returns `true` if the fetcher marked this module as unusable on this device.
    #[must_use]
    pub const fn is_incompatible(&self) -> bool {
        self.quality_flags.contains(QualityFlags::INCOMPATIBLE)
    }

    /// Heuristic low-quality check applied to remote-only entries.
    ///
    /// A module is low quality when the repository flagged it, when its metadata
    /// is invalid, or when its listing is too sparse to be trusted: a name
    /// shorter than three characters, a negative version code, a missing author
    /// or description, a description that merely repeats the name, or a hidden
    /// (dot-prefixed) id.
    #[must_use]
    pub fn is_low_quality(&self) -> bool {
        if self.quality_flags.contains(QualityFlags::LOW_QUALITY)
            || self.quality_flags.contains(QualityFlags::METADATA_INVALID)
        {
            return true;
        }
        let Some(description) = non_blank(self.description.as_deref()) else {
            return true;
        };
        non_blank(self.author.as_deref()).is_none()
            || self.name.chars().count() < 3
            || self.version_code < 0
            || description.to_lowercase() == self.name.to_lowercase()
            || self.id.starts_with('.')
    }
}

/// Where an install or update for an entry would be downloaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTarget {
    pub zip_url: String,
    /// Repository id, or `"update_json"` for the module's own update manifest.
    pub source: String,
    pub checksum: Option<String>,
}

/// Source label used when an update comes from the module's own manifest.
pub const SELF_UPDATE_SOURCE: &str = "update_json";

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty() && *s != "null")
}
