//! Settings model read by the list builder.
//!
//! These are the user-controlled switches that influence classification and
//! visibility. They are owned by an external settings store; this crate only
//! reads them, once per reconciliation pass.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Read-only catalog settings.
///
/// Rule and id sets are ordered so that rule lookup is deterministic.
///
/// # File Format
///
/// ```json
/// {
///   "excludedModuleIds": ["zygisk_shamiko"],
///   "versionExclusionRules": ["busybox-ndk:^1400", "lsposed:6990$"],
///   "showIncompatible": false,
///   "showLowQuality": false
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Modules whose updates are never reported.
    pub excluded_module_ids: BTreeSet<String>,

    /// Persisted `"<moduleId>:[^]<versionCode>[$]"` rule strings.
    pub version_exclusion_rules: BTreeSet<String>,

    /// Keep catalog entries flagged incompatible with this device.
    pub show_incompatible: bool,

    /// Keep remote-only entries that fail the low-quality heuristics.
    pub show_low_quality: bool,
}

impl Settings {
    /// Adds a version exclusion rule string as-is.
    #[must_use]
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.version_exclusion_rules.insert(rule.into());
        self
    }

    /// Adds a module id to the flat exclude set.
    #[must_use]
    pub fn with_excluded(mut self, id: impl Into<String>) -> Self {
        self.excluded_module_ids.insert(id.into());
        self
    }
}
