//! Write the ATS markup into an existing HTML page.
//!
//! The placeholder element keeps its tag and attributes; only its inner
//! content is replaced. JSON-LD from a previous run is removed before the
//! fresh script is inserted, so re-running on the same input is stable apart
//! from the generation timestamp.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::utils::date::DateTimeUtc;
use crate::utils::html::escape_script_json;

/// Marker on everything this module inserts into `<head>`.
const MARKER: &str = "folio:ats";

static PREVIOUS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!-- folio:ats[^>]*-->\n?").unwrap());

static PREVIOUS_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<script[^>]*data-folio="ats"[^>]*>.*?</script>\n?"#).unwrap()
});

static HEAD_CLOSE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</head\s*>").unwrap());

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("failed to read `{path}`")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write backup `{path}`")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no element with id `{0}`")]
    PlaceholderNotFound(String),

    #[error("element with id `{0}` is never closed")]
    Unclosed(String),

    #[error("target is not parseable HTML")]
    Parse,

    #[error("document has no `</head>`")]
    MissingHead,

    #[error("failed to serialize JSON-LD")]
    Json(#[from] serde_json::Error),
}

/// Replace the placeholder content and refresh the head script.
pub fn inject_markup(
    document: &str,
    placeholder: &str,
    html: &str,
    json_ld: &Value,
    generated: DateTimeUtc,
) -> Result<String, InjectError> {
    let stripped = PREVIOUS_SCRIPT.replace_all(document, "");
    let stripped = PREVIOUS_COMMENT.replace_all(&stripped, "");

    let (inner_start, inner_end) = find_placeholder(&stripped, placeholder)?;
    let mut out = String::with_capacity(stripped.len() + html.len() + 256);
    out.push_str(&stripped[..inner_start]);
    out.push('\n');
    out.push_str(html);
    out.push('\n');
    out.push_str(&stripped[inner_end..]);

    let head = HEAD_CLOSE.find(&out).ok_or(InjectError::MissingHead)?.start();
    let json = serde_json::to_string(json_ld)?;
    let script = format!(
        "<!-- {MARKER} generated {} -->\n<script type=\"application/ld+json\" data-folio=\"ats\">{}</script>\n",
        generated.to_rfc3339(),
        escape_script_json(&json),
    );
    out.insert_str(head, &script);
    Ok(out)
}

/// `inject_markup` on a file, writing `<target>.backup` first when asked.
pub fn inject_file(
    target: &Path,
    backup: bool,
    placeholder: &str,
    html: &str,
    json_ld: &Value,
    generated: DateTimeUtc,
) -> Result<(), InjectError> {
    let document = fs::read_to_string(target).map_err(|source| InjectError::Read {
        path: target.to_path_buf(),
        source,
    })?;

    let injected = inject_markup(&document, placeholder, html, json_ld, generated)?;

    if backup {
        let path = backup_path(target);
        fs::write(&path, &document).map_err(|source| InjectError::Backup { path, source })?;
    }

    fs::write(target, injected).map_err(|source| InjectError::Write {
        path: target.to_path_buf(),
        source,
    })
}

/// `page.html` -> `page.html.backup`
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".backup");
    PathBuf::from(name)
}

/// Byte range of the inner content of the element with `id`.
///
/// Comments and raw-text bodies are never matched, since the element comes
/// from a parsed tree rather than a text search.
fn find_placeholder(document: &str, id: &str) -> Result<(usize, usize), InjectError> {
    let Ok(dom) = tl::parse(document, tl::ParserOptions::default().track_ids()) else {
        return Err(InjectError::Parse);
    };
    let parser = dom.parser();
    let tag = dom
        .get_element_by_id(id)
        .and_then(|handle| handle.get(parser))
        .and_then(tl::Node::as_tag)
        .ok_or_else(|| InjectError::PlaceholderNotFound(id.to_string()))?;

    // the raw span borrows from `document`, so its offset is exact
    let raw = tag.raw().as_bytes();
    let start = (raw.as_ptr() as usize).wrapping_sub(document.as_ptr() as usize);
    let outer = document
        .get(start..start + raw.len())
        .ok_or_else(|| InjectError::Unclosed(id.to_string()))?;

    let name = tag.name().as_utf8_str();
    let open_end = open_tag_len(outer).ok_or_else(|| InjectError::Unclosed(id.to_string()))?;
    let close = outer
        .rfind("</")
        .filter(|&pos| pos >= open_end && is_close_tag(&outer[pos..], &name))
        .ok_or_else(|| InjectError::Unclosed(id.to_string()))?;

    // an unclosed element ends at its last child's close tag instead of its own
    let children_end = tag
        .children()
        .top()
        .iter()
        .filter_map(|handle| handle.get(parser))
        .map(|node| span_end(node, document))
        .max()
        .unwrap_or(start + open_end);
    if children_end > start + close {
        return Err(InjectError::Unclosed(id.to_string()));
    }

    Ok((start + open_end, start + close))
}

/// Byte offset in `document` just past `node`.
fn span_end(node: &tl::Node<'_>, document: &str) -> usize {
    let bytes = match node {
        tl::Node::Tag(tag) => tag.raw().as_bytes(),
        tl::Node::Raw(bytes) | tl::Node::Comment(bytes) => bytes.as_bytes(),
    };
    (bytes.as_ptr() as usize).wrapping_sub(document.as_ptr() as usize) + bytes.len()
}

/// Length of the opening tag at the start of `outer`, `>` included.
///
/// A `>` inside a quoted attribute value does not end the tag.
fn open_tag_len(outer: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in outer.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => {
                // `<div/>` has no content to replace
                return (!outer[..i].ends_with('/')).then_some(i + 1);
            }
            _ => {}
        }
    }
    None
}

/// `</name>` with optional whitespace before `>`.
fn is_close_tag(tail: &str, name: &str) -> bool {
    tail.strip_prefix("</")
        .and_then(|rest| rest.strip_suffix('>'))
        .is_some_and(|inner| inner.trim_end().eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = "<!DOCTYPE html>\n<html>\n<head>\n<title>Jane</title>\n</head>\n<body>\n<div id=\"ats-content\" class=\"visually-hidden\">old</div>\n<footer></footer>\n</body>\n</html>\n";

    fn stamp() -> DateTimeUtc {
        DateTimeUtc::new(2024, 5, 1, 12, 0, 0)
    }

    #[test]
    fn test_inject_replaces_inner_content() {
        let out = inject_markup(PAGE, "ats-content", "<article>new</article>", &json!({"a": 1}), stamp())
            .unwrap();
        assert!(out.contains(
            "<div id=\"ats-content\" class=\"visually-hidden\">\n<article>new</article>\n</div>"
        ));
        assert!(!out.contains(">old<"));
        assert!(out.contains(
            "<!-- folio:ats generated 2024-05-01T12:00:00Z -->\n<script type=\"application/ld+json\" data-folio=\"ats\">{\"a\":1}</script>\n</head>"
        ));
    }

    #[test]
    fn test_inject_idempotent() {
        let ld = json!({"@graph": []});
        let once = inject_markup(PAGE, "ats-content", "<p>x</p>", &ld, stamp()).unwrap();
        let twice = inject_markup(&once, "ats-content", "<p>x</p>", &ld, stamp()).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.matches("application/ld+json").count(), 1);
    }

    #[test]
    fn test_nested_placeholder_content() {
        let page = "<head></head><section id='ats'><div><div>a</div></div><p>b</p></section><div>keep</div>";
        let out = inject_markup(page, "ats", "new", &json!({}), stamp()).unwrap();
        assert!(out.ends_with("<section id='ats'>\nnew\n</section><div>keep</div>"));
    }

    #[test]
    fn test_comment_inside_placeholder() {
        let page = "<head></head><div id=\"ats\"><!-- old markup: </div> --><p>old</p></div><footer></footer>";
        let out = inject_markup(page, "ats", "<p>new</p>", &json!({}), stamp()).unwrap();
        assert!(out.ends_with("<div id=\"ats\">\n<p>new</p>\n</div><footer></footer>"));
        assert!(!out.contains("old"));
    }

    #[test]
    fn test_commented_out_placeholder_ignored() {
        let page = "<head></head><!-- <div id=\"ats\">draft</div> --><div id=\"ats\">old</div>";
        let out = inject_markup(page, "ats", "new", &json!({}), stamp()).unwrap();
        assert!(out.contains("<!-- <div id=\"ats\">draft</div> -->"));
        assert!(out.ends_with("<div id=\"ats\">\nnew\n</div>"));
    }

    #[test]
    fn test_quoted_gt_in_placeholder_attrs() {
        let page = "<head></head><div id=\"ats\" title=\"a > b\">old</div>";
        let out = inject_markup(page, "ats", "new", &json!({}), stamp()).unwrap();
        assert!(out.ends_with("<div id=\"ats\" title=\"a > b\">\nnew\n</div>"));
    }

    #[test]
    fn test_script_json_escaped() {
        let ld = json!({"name": "</script><b>"});
        let out = inject_markup(PAGE, "ats-content", "", &ld, stamp()).unwrap();
        assert!(out.contains(r#"{"name":"<\/script><b>"}"#));
    }

    #[test]
    fn test_inject_errors() {
        let ld = json!({});
        assert!(matches!(
            inject_markup(PAGE, "missing", "", &ld, stamp()),
            Err(InjectError::PlaceholderNotFound(id)) if id == "missing"
        ));
        assert!(matches!(
            inject_markup("<head></head><div id=\"x\"><div></div>", "x", "", &ld, stamp()),
            Err(InjectError::Unclosed(_))
        ));
        assert!(matches!(
            inject_markup("<div id=\"x\"></div>", "x", "", &ld, stamp()),
            Err(InjectError::MissingHead)
        ));
    }

    #[test]
    fn test_inject_file_writes_backup() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        fs::write(&target, PAGE).unwrap();

        inject_file(&target, true, "ats-content", "<p>ats</p>", &json!({}), stamp()).unwrap();

        let backup = backup_path(&target);
        assert_eq!(backup.file_name().unwrap(), "index.html.backup");
        assert_eq!(fs::read_to_string(backup).unwrap(), PAGE);
        assert!(fs::read_to_string(&target).unwrap().contains("<p>ats</p>"));
    }

    #[test]
    fn test_inject_file_leaves_target_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("index.html");
        fs::write(&target, PAGE).unwrap();

        let err = inject_file(&target, true, "nope", "", &json!({}), stamp()).unwrap_err();
        assert!(matches!(err, InjectError::PlaceholderNotFound(_)));
        assert_eq!(fs::read_to_string(&target).unwrap(), PAGE);
        assert!(!backup_path(&target).exists());
    }
}
