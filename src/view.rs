//! Display strings derived from records and aggregates.
//!
//! Everything here is a pure function. The result set and the ledger stay
//! the source of truth; nothing is read back from rendered text.

use crate::aggregate::Summary;
use crate::category::Category;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub use crate::size::format_file_size;

/// Display columns used by the result tables.
pub const NAME_COLUMNS: usize = 30;

const ELLIPSIS: &str = "...";

/// Longest prefix of `s` that fits in `max_width` columns.
fn prefix_to_width(s: &str, max_width: usize) -> &str {
    let mut w = 0usize;
    for (idx, ch) in s.char_indices() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w + cw > max_width {
            return &s[..idx];
        }
        w += cw;
    }
    s
}

/// Longest suffix of `s` that fits in `max_width` columns.
fn suffix_to_width(s: &str, max_width: usize) -> &str {
    let mut w = 0usize;
    for (idx, ch) in s.char_indices().rev() {
        let cw = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w + cw > max_width {
            return &s[idx + ch.len_utf8()..];
        }
        w += cw;
    }
    s
}

/// Shorten a file name to `max_width` columns, keeping the extension:
/// `IMG_VeryLongFileName_0....jpg`.
pub fn shorten_file_name(name: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(name) <= max_width {
        return name.to_string();
    }

    // A leading dot is a hidden file, not an extension. An extension too wide
    // to keep is truncated along with the stem.
    let ext = match name.rfind('.') {
        Some(idx) if idx > 0 => &name[idx..],
        _ => "",
    };
    let ext = if UnicodeWidthStr::width(ext) + ELLIPSIS.len() + 2 > max_width {
        ""
    } else {
        ext
    };
    let stem = &name[..name.len() - ext.len()];
    let budget = max_width
        .saturating_sub(ELLIPSIS.len() + 2)
        .saturating_sub(UnicodeWidthStr::width(ext));

    format!("{}{}{}", prefix_to_width(stem, budget), ELLIPSIS, ext)
}

/// Shorten a path to roughly `max_width` columns, keeping the file name and
/// as much of the directory tail as fits: `/ho.../photos/a.jpg`.
pub fn shorten_path(path: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(path) <= max_width {
        return path.to_string();
    }

    let name_start = path.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let (dir, name) = path.split_at(name_start);
    let name_width = UnicodeWidthStr::width(name);

    if name_width > max_width.saturating_sub(5) {
        return format!("{}{}", prefix_to_width(name, max_width.saturating_sub(5)), ELLIPSIS);
    }

    let head = prefix_to_width(dir, 3);
    let available =
        max_width.saturating_sub(name_width + UnicodeWidthStr::width(head) + ELLIPSIS.len());
    let tail = if available > 0 {
        suffix_to_width(dir, available)
    } else {
        ""
    };
    format!("{head}{ELLIPSIS}{tail}{name}")
}

/// Colour band for a blur score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BlurSeverity {
    Low,
    Moderate,
    High,
    Severe,
}

pub fn blur_severity(score: f64) -> BlurSeverity {
    if score >= 90.0 {
        BlurSeverity::Severe
    } else if score >= 70.0 {
        BlurSeverity::High
    } else if score >= 50.0 {
        BlurSeverity::Moderate
    } else {
        BlurSeverity::Low
    }
}

/// `"2.5 MB"`, always one decimal.
pub fn format_mb(mb: f64) -> String {
    format!("{:.1} MB", mb)
}

/// Selected-count part of the footer: `"3 items"` or `"1 pairs, 2 files"`.
pub fn selection_text(summary: &Summary) -> String {
    match summary.category {
        Category::Similar => format!(
            "{} pairs, {} files",
            summary.selected_count, summary.files_selected
        ),
        _ => format!("{} items", summary.selected_count),
    }
}

/// Whole footer line for the active tab.
pub fn footer_text(summary: &Summary) -> String {
    match summary.category {
        Category::Error => format!("Selected: {}", selection_text(summary)),
        _ => format!(
            "Selected: {} (total size: {})",
            selection_text(summary),
            format_mb(summary.total_selected_size_mb)
        ),
    }
}

pub fn tab_label(category: Category, count: usize) -> String {
    format!("{} ({})", category.display_name(), count)
}

/// Status line after a scan finishes.
pub fn scan_done_status(blur: usize, similar: usize, error: usize) -> String {
    format!(
        "Scan complete: {} blurry, {} similar pairs, {} errors",
        blur, similar, error
    )
}
