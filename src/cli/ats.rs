//! `folio ats`: generate the ATS projection and inject it into the target page.

use anyhow::{Context, Result, bail};

use crate::config::FolioConfig;
use crate::log;
use crate::seo::{AtsBatch, inject_file};
use crate::utils::{date::DateTimeUtc, plural_count};

pub fn generate_ats(config: &FolioConfig, dry_run: bool) -> Result<()> {
    let ats = &config.ats;
    if ats.projects.is_empty() {
        log!("warning"; "no `[[ats.projects]]` configured, nothing to generate");
        return Ok(());
    }

    let batch = AtsBatch::load(&ats.projects, &config.build.index);
    if batch.is_empty() {
        bail!("none of the {} could be loaded", plural_count(ats.projects.len(), "ats project"));
    }

    let html = batch.html();
    let json_ld = batch.json_ld(&config.site);

    if dry_run {
        println!("{html}");
        println!("{}", serde_json::to_string_pretty(&json_ld)?);
        return Ok(());
    }

    let Some(target) = ats.target.as_deref() else {
        bail!("`ats.target` is not set");
    };
    inject_file(
        target,
        ats.backup,
        &ats.placeholder,
        &html,
        &json_ld,
        DateTimeUtc::now(),
    )
    .with_context(|| format!("failed to inject ATS markup into {}", target.display()))?;

    log!(
        "ats";
        "injected {} into {}",
        plural_count(batch.len(), "project"),
        config.root_relative(target).display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AtsProject, test_parse_config};
    use std::fs;

    fn site() -> (tempfile::TempDir, FolioConfig) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("projects.json"),
            r#"{"acme": {"title": "Acme", "tags": ["Figma"]}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<html><head><title>x</title></head><body><div id=\"ats-content\"></div></body></html>",
        )
        .unwrap();

        let mut config = test_parse_config("[site]\nauthor = \"Jane\"\n");
        config.build.index = dir.path().join("projects.json");
        config.ats.enable = true;
        config.ats.target = Some(dir.path().join("index.html"));
        config.ats.projects = vec![AtsProject {
            id: "acme".into(),
            json_path: None,
            index_path: None,
            project_key: None,
            priority: 0,
        }];
        (dir, config)
    }

    #[test]
    fn test_generate_injects_target() {
        let (dir, config) = site();
        generate_ats(&config, false).unwrap();

        let page = fs::read_to_string(dir.path().join("index.html")).unwrap();
        assert!(page.contains(r#"data-project-id="acme""#));
        assert!(page.contains(r#""knowsAbout":["Figma"]"#));
        assert!(dir.path().join("index.html.backup").is_file());
    }

    #[test]
    fn test_dry_run_leaves_target() {
        let (dir, config) = site();
        let before = fs::read_to_string(dir.path().join("index.html")).unwrap();
        generate_ats(&config, true).unwrap();
        assert_eq!(fs::read_to_string(dir.path().join("index.html")).unwrap(), before);
    }

    #[test]
    fn test_all_projects_unreadable() {
        let (_dir, mut config) = site();
        config.ats.projects[0].id = "ghost".into();
        assert!(generate_ats(&config, false).is_err());
    }
}
