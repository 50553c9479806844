//! Query filter scoring entries into tiers.

use crate::domain::ModuleEntry;

/// Tier assigned to entries that do not match the query at all.
pub const HIDDEN_TIER: u8 = 3;

/// Result of matching one entry against the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterMatch {
    pub matches: bool,
    pub tier: u8,
}

/// Trims and lowercases a raw query.
#[must_use]
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Scores an entry against an already normalized query.
///
/// | tier | condition                                          |
/// |------|----------------------------------------------------|
/// | 0    | empty query, or exact id / name / author match     |
/// | 1    | substring of id or name                            |
/// | 2    | substring of author or description                 |
/// | 3    | no match, hidden                                   |
///
/// Name, author and description come from the entry's main info.
///
/// # Examples
///
/// ```
/// use modcatalog::domain::{LocalInfo, ModuleEntry};
/// use modcatalog::reconcile::match_filter;
///
/// let entry = ModuleEntry {
///     local: Some(LocalInfo::new("busybox-ndk", "BusyBox", 1)),
///     ..ModuleEntry::new("busybox-ndk")
/// };
/// assert_eq!(match_filter(&entry, "busybox").tier, 0);
/// assert_eq!(match_filter(&entry, "box").tier, 1);
/// assert!(!match_filter(&entry, "zz").matches);
/// ```
#[must_use]
pub fn match_filter(entry: &ModuleEntry, query: &str) -> FilterMatch {
    if query.is_empty() {
        return FilterMatch { matches: true, tier: 0 };
    }

    let id = entry.id.to_lowercase();
    let main = entry.main_info();
    let name = main.map(|m| m.name().to_lowercase()).unwrap_or_default();
    let author = main
        .and_then(|m| m.author())
        .map(str::to_lowercase)
        .unwrap_or_default();

    let tier = if id == query || name == query || author == query {
        0
    } else if id.contains(query) || name.contains(query) {
        1
    } else if author.contains(query)
        || main
            .and_then(|m| m.description())
            .is_some_and(|d| d.to_lowercase().contains(query))
    {
        2
    } else {
        HIDDEN_TIER
    };

    FilterMatch {
        matches: tier < HIDDEN_TIER,
        tier,
    }
}
