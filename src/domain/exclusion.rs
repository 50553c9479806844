//! Version exclusion rules persisted as `"<moduleId>:[^]<versionCode>[$]"`.
//!
//! A rule tells the classifier to ignore a detected update for one module:
//!
//! - `"id:15"` ignores exactly version code 15
//! - `"id:^15"` ignores 15 and everything newer
//! - `"id:15$"` ignores 15 and everything older
//!
//! The strings come from user-editable settings, so parsing never fails loudly.
//! A pattern whose digits do not form a number, or that carries both `^` and `$`,
//! yields no rule and the update stays visible.

use std::fmt;

/// How a rule's version code is compared with the offered version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExclusionMode {
    ExactVersion,
    FromVersionOnward,
    UpToVersion,
}

/// A parsed per-module update exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionExclusionRule {
    pub module_id: String,
    pub mode: ExclusionMode,
    pub version_code: i64,
}

impl VersionExclusionRule {
    /// Parses one persisted rule string.
    ///
    /// Returns `None` for anything that is not a well-formed rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use modcatalog::domain::{ExclusionMode, VersionExclusionRule};
    ///
    /// let rule = VersionExclusionRule::parse("magisk_busybox:^15").unwrap();
    /// assert_eq!(rule.mode, ExclusionMode::FromVersionOnward);
    /// assert_eq!(rule.version_code, 15);
    ///
    /// assert!(VersionExclusionRule::parse("magisk_busybox:^15$").is_none());
    /// assert!(VersionExclusionRule::parse("magisk_busybox:latest").is_none());
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let (module_id, pattern) = raw.split_once(':')?;
        if module_id.is_empty() {
            return None;
        }

        let pattern = pattern.trim();
        let mode = match (pattern.starts_with('^'), pattern.ends_with('$')) {
            (true, true) => {
                tracing::warn!(rule = %raw, "exclusion rule has both ^ and $, ignoring");
                return None;
            }
            (true, false) => ExclusionMode::FromVersionOnward,
            (false, true) => ExclusionMode::UpToVersion,
            (false, false) => ExclusionMode::ExactVersion,
        };

        let digits: String = pattern.chars().filter(char::is_ascii_digit).collect();
        let Ok(version_code) = digits.parse::<i64>() else {
            tracing::warn!(rule = %raw, "exclusion rule version is not a number, ignoring");
            return None;
        };

        Some(Self {
            module_id: module_id.to_string(),
            mode,
            version_code,
        })
    }

    /// Finds the rule for `module_id` among persisted rule strings.
    ///
    /// The first string whose id matches decides; if that string is malformed
    /// there is no rule, even when a later string would parse.
    pub fn find_for<'a, I>(rules: I, module_id: &str) -> Option<Self>
    where
        I: IntoIterator<Item = &'a String>,
    {
        rules
            .into_iter()
            .find(|raw| raw.split_once(':').is_some_and(|(id, _)| id == module_id))
            .and_then(|raw| Self::parse(raw))
    }

    /// Returns `true` if an update to `offered_code` should be ignored.
    #[must_use]
    pub const fn excludes(&self, offered_code: i64) -> bool {
        match self.mode {
            ExclusionMode::ExactVersion => offered_code == self.version_code,
            ExclusionMode::FromVersionOnward => offered_code >= self.version_code,
            ExclusionMode::UpToVersion => offered_code <= self.version_code,
        }
    }
}

impl fmt::Display for VersionExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            ExclusionMode::ExactVersion => write!(f, "{}:{}", self.module_id, self.version_code),
            ExclusionMode::FromVersionOnward => {
                write!(f, "{}:^{}", self.module_id, self.version_code)
            }
            ExclusionMode::UpToVersion => write!(f, "{}:{}$", self.module_id, self.version_code),
        }
    }
}
