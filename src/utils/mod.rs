//! Shared helpers.
//!
//! | Module | Purpose                                   |
//! |--------|-------------------------------------------|
//! | `date` | UTC timestamps for generated output       |
//! | `html` | Escaping and element classification       |
//! | `path` | Path normalization and web-path joining   |

pub mod date;
pub mod html;
pub mod path;

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(0, "page")` -> `"0 pages"`
/// - `plural_count(1, "page")` -> `"1 page"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}
