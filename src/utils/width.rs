//! Display width measurement and truncation

use std::borrow::Cow;
use unicode_width::UnicodeWidthChar;

/// Marker appended to text that did not fit its column budget
pub const ELLIPSIS: &str = "…";

/// Filler used when a wide character straddles the truncation point
const PADDING: char = ' ';

/// Columns a single character occupies; control characters take none
fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(0)
}

/// Number of terminal columns `text` occupies
pub fn display_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Text up to the first line break
pub fn first_line(text: &str) -> &str {
    let line = text.split('\n').next().unwrap_or("");
    line.strip_suffix('\r').unwrap_or(line)
}

/// First line of `text` with tabs and other control characters blanked
fn clean_line(text: &str) -> Cow<'_, str> {
    let line = first_line(text);
    if line.chars().any(char::is_control) {
        Cow::Owned(line.chars().map(|ch| if ch.is_control() { PADDING } else { ch }).collect())
    } else {
        Cow::Borrowed(line)
    }
}

/// Truncate the first line of `text` to at most `max_width` columns.
///
/// Tabs and control characters count as one blank column each.
/// Text that already fits is returned unchanged. Otherwise the result is
/// exactly `max_width` columns wide and ends in [`ELLIPSIS`]; a wide
/// character that would cross the cut is replaced by padding.
pub fn truncate(text: &str, max_width: usize) -> String {
    let line = clean_line(text);
    if display_width(&line) <= max_width {
        return line.into_owned();
    }

    let marker_width = display_width(ELLIPSIS);
    if max_width < marker_width {
        return PADDING.to_string().repeat(max_width);
    }

    let budget = max_width - marker_width;
    let mut out = String::with_capacity(line.len().min(budget.saturating_mul(4)) + ELLIPSIS.len());
    let mut used = 0usize;
    for ch in line.chars() {
        let w = char_width(ch);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.extend(std::iter::repeat(PADDING).take(budget - used));
    out.push_str(ELLIPSIS);
    out
}
