//! Static checks over a project index and its detail files.

use std::fmt;
use std::fs;
use std::path::Path;

use super::{ContentBlock, DetailRecord, ProjectEntry, ProjectIndex, SchemaError};
use crate::utils::path::resolve_web_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// One finding about one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub project: String,
    pub level: Level,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    fn push(&mut self, project: &str, level: Level, message: impl Into<String>) {
        self.issues.push(Issue {
            project: project.to_string(),
            level,
            message: message.into(),
        });
    }

    pub fn error_count(&self) -> usize {
        self.count(Level::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Level::Warning)
    }

    fn count(&self, level: Level) -> usize {
        self.issues.iter().filter(|i| i.level == level).count()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues for one project, in discovery order.
    pub fn for_project<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues.iter().filter(move |i| i.project == id)
    }
}

/// Check every project of `index`, reading detail files below `data_root`.
pub fn validate(index: &ProjectIndex, data_root: &Path) -> ValidationReport {
    let mut report = ValidationReport::default();
    for entry in index.iter() {
        validate_entry(entry, data_root, &mut report);
    }
    report
}

fn validate_entry(entry: &ProjectEntry, data_root: &Path, report: &mut ValidationReport) {
    let id = entry.id.as_str();
    // a blank `contentFile` counts as unset, matching how the body is resolved
    let content_file = entry
        .content_file
        .as_deref()
        .filter(|path| !path.trim().is_empty());

    match (content_file, &entry.content_blocks) {
        (Some(_), Some(_)) => report.push(
            id,
            Level::Warning,
            "both `contentFile` and `contentBlocks` are set, `contentBlocks` is ignored",
        ),
        (None, None) => report.push(id, Level::Warning, "no body content"),
        _ => {}
    }

    if let Some(path) = content_file {
        match load_detail(data_root, path) {
            DetailCheck::Loaded(detail) => {
                if let Some(blocks) = &detail.content_blocks {
                    validate_blocks(id, blocks, report);
                }
            }
            DetailCheck::Missing => report.push(
                id,
                Level::Warning,
                format!("content file `{path}` not found"),
            ),
            DetailCheck::OutsideRoot => report.push(
                id,
                Level::Error,
                format!("content file `{path}` points outside the data root"),
            ),
            DetailCheck::Invalid(reason) => report.push(
                id,
                Level::Error,
                format!("content file `{path}` is not a valid detail record: {reason}"),
            ),
        }
    } else if let Some(blocks) = &entry.content_blocks {
        validate_blocks(id, blocks, report);
    }
}

enum DetailCheck {
    Loaded(DetailRecord),
    Missing,
    OutsideRoot,
    Invalid(String),
}

fn load_detail(data_root: &Path, web_path: &str) -> DetailCheck {
    let Some(path) = resolve_web_path(data_root, web_path) else {
        return DetailCheck::OutsideRoot;
    };
    let Ok(json) = fs::read_to_string(&path) else {
        return DetailCheck::Missing;
    };
    match DetailRecord::from_json(&json) {
        Ok(detail) => DetailCheck::Loaded(detail),
        Err(err) => DetailCheck::Invalid(err.to_string()),
    }
}

fn validate_blocks(id: &str, blocks: &[ContentBlock], report: &mut ValidationReport) {
    let mut hooks = 0;
    for (i, block) in blocks.iter().enumerate() {
        if block.is_story_hook() {
            hooks += 1;
        }
        match block.typed() {
            Ok(_) => {}
            Err(SchemaError::MissingTag) => {
                report.push(id, Level::Warning, format!("block #{i} has no `type`"));
            }
            Err(SchemaError::Unknown(tag)) => report.push(
                id,
                Level::Warning,
                format!("block #{i} has unknown type `{tag}` and will be skipped"),
            ),
            Err(err @ SchemaError::Malformed { .. }) => {
                report.push(id, Level::Error, format!("block #{i}: {err}"));
            }
        }
    }
    if hooks > 1 {
        report.push(
            id,
            Level::Warning,
            format!("{hooks} story-hook blocks, only the first is shown"),
        );
    }
}
