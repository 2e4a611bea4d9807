//! Project index validation command.

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

use crate::config::FolioConfig;
use crate::content::ProjectIndex;
use crate::content::validate::{Issue, Level, ValidationReport, validate};
use crate::log;
use crate::utils::{plural_count, plural_s};

/// Validate the project index and every detail file it references.
pub fn validate_content(config: &FolioConfig, warn_only: bool) -> Result<()> {
    let index = ProjectIndex::load(&config.build.index)
        .with_context(|| format!("failed to load {}", config.build.index.display()))?;

    if index.is_empty() {
        log!("validate"; "no projects found");
        return Ok(());
    }
    log!("validate"; "validating {}", plural_count(index.len(), "project"));

    let report = validate(&index, &config.build.data_root);
    print_report(&report, &index.ids());

    if report.is_empty() {
        log!("validate"; "all projects passed");
        return Ok(());
    }

    let summary = format!(
        "{}, {}",
        plural_count(report.error_count(), "error"),
        plural_count(report.warning_count(), "warning")
    );
    if report.has_errors() && !warn_only {
        bail!("validation failed: {summary}");
    }
    log!("validate"; "{}", summary);
    Ok(())
}

/// Print issues grouped by project, in index order.
fn print_report(report: &ValidationReport, order: &[String]) {
    for id in order {
        let issues: Vec<&Issue> = report.for_project(id).collect();
        if issues.is_empty() {
            continue;
        }
        eprintln!();
        eprintln!(
            "{} {}",
            id.bold(),
            format!("({} issue{})", issues.len(), plural_s(issues.len())).dimmed()
        );
        for issue in issues {
            eprintln!("  {} {}", level_label(issue.level), issue.message);
        }
    }
    if !report.is_empty() {
        eprintln!();
    }
}

fn level_label(level: Level) -> String {
    match level {
        Level::Error => "error".red().bold().to_string(),
        Level::Warning => "warning".yellow().bold().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;

    fn site(index: &str) -> (tempfile::TempDir, FolioConfig) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("projects.json"), index).unwrap();
        let mut config = test_parse_config("");
        config.build.index = dir.path().join("projects.json");
        config.build.data_root = dir.path().to_path_buf();
        (dir, config)
    }

    #[test]
    fn test_errors_fail_unless_warn_only() {
        let (_dir, config) = site(r#"{"a": {"contentBlocks": [{"type": "timeline-process"}]}}"#);
        let err = validate_content(&config, false).unwrap_err();
        assert!(err.to_string().contains("1 error"));
        assert!(validate_content(&config, true).is_ok());
    }

    #[test]
    fn test_warnings_pass() {
        let (_dir, config) = site(r#"{"a": {"title": "No body"}}"#);
        assert!(validate_content(&config, false).is_ok());
    }

    #[test]
    fn test_level_label() {
        assert!(level_label(Level::Error).contains("error"));
        assert!(level_label(Level::Warning).contains("warning"));
    }
}
