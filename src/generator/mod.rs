//! Static output generators.
//!
//! - **Page**: HTML document shell around a rendered case study
//! - **Sitemap**: Search engine indexing (`sitemap.xml`)
//!
//! Both work from the loaded project index, so nothing is scanned twice.

pub mod page;
pub mod sitemap;

use std::borrow::Cow;

/// Minify line-oriented markup if enabled.
///
/// Trims every line and drops blank ones. Only safe for markup this crate
/// writes itself (no `<pre>` or whitespace-significant text spans lines).
pub fn minify_markup(content: &str, enabled: bool) -> Cow<'_, str> {
    if enabled {
        let minified = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("");
        Cow::Owned(minified)
    } else {
        Cow::Borrowed(content)
    }
}
