//! Shared rendering utilities and helpers.
//!
//! Fuzzy match highlighting for row titles. Ranges are UTF-8 character
//! indices, never byte indices.
//!
//! # Example
//!
//! ```rust
//! use modcatalog::ui::helpers::render_highlighted_text;
//!
//! let text = render_highlighted_text("busybox", &[(0, 4)], ("[", "]"));
//! assert_eq!(text, "[busy]box");
//! ```

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// ANSI bold on/off, used by terminal output.
pub const ANSI_BOLD: (&str, &str) = ("\u{1b}[1m", "\u{1b}[0m");

/// Computes character index ranges to highlight for `query` in `text`.
///
/// Gets fuzzy match indices from the matcher and coalesces consecutive indices
/// into `(start, end)` ranges with an exclusive end.
#[must_use]
pub fn highlight_ranges(text: &str, query: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
        return vec![];
    };

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for idx in indices {
        match ranges.last_mut() {
            Some((_, end)) if *end == idx => *end = idx + 1,
            _ => ranges.push((idx, idx + 1)),
        }
    }
    ranges
}

/// Wraps the highlighted character ranges of `text` in `markers`.
///
/// Ranges past the end of the text are clamped.
#[must_use]
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], markers: (&str, &str)) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 8);
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.clamp(current_pos, chars.len());
        let end = end.clamp(start, chars.len());
        out.extend(&chars[current_pos..start]);
        out.push_str(markers.0);
        out.extend(&chars[start..end]);
        out.push_str(markers.1);
        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coalesces_consecutive_indices() {
        let matcher = SkimMatcherV2::default();
        assert_eq!(highlight_ranges("my-project", "myp", &matcher), vec![(0, 2), (3, 4)]);
        assert!(highlight_ranges("alpha", "zz", &matcher).is_empty());
    }

    #[test]
    fn renders_multibyte_text() {
        let text = render_highlighted_text("ünïcode", &[(0, 2), (5, 99)], ("<", ">"));
        assert_eq!(text, "<ün>ïco<de>");
    }
}
