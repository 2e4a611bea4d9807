//! Priority-ordered batch over the configured ATS projects.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::config::{AtsProject, SiteSectionConfig};
use crate::content::{ContentError, DetailRecord, ProjectIndex};
use crate::log;

use super::document::{PERSON_ID, SemanticDocument, project_to_semantic_document};

/// Why one configured project was left out of the batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("failed to load index `{path}`: {reason}")]
    Index { path: PathBuf, reason: String },

    #[error("no entry `{key}` in `{path}`")]
    MissingEntry { key: String, path: PathBuf },

    #[error("failed to read detail record `{path}`")]
    DetailIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{path}` is not a valid detail record")]
    DetailDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Generated documents, in output order.
#[derive(Debug, Default)]
pub struct AtsBatch {
    documents: Vec<(String, SemanticDocument)>,
    skipped: Vec<(String, String)>,
}

impl AtsBatch {
    /// Load every configured project.
    ///
    /// Projects are processed in ascending `priority`; ties keep their
    /// configured order. A project that cannot be read is skipped with a
    /// warning and does not affect the others.
    pub fn load(projects: &[AtsProject], default_index: &Path) -> Self {
        let mut ordered: Vec<&AtsProject> = projects.iter().collect();
        ordered.sort_by_key(|p| p.priority);

        let indexes = load_indexes(&ordered, default_index);

        let results: Vec<_> = ordered
            .par_iter()
            .map(|project| {
                let index_path = project.index_path.as_deref().unwrap_or(default_index);
                let result = indexes
                    .get(index_path)
                    .ok_or_else(|| BatchError::MissingEntry {
                        key: project.key().to_string(),
                        path: index_path.to_path_buf(),
                    })
                    .and_then(|index| match index {
                        Ok(index) => build_document(project, index, index_path),
                        Err(err) => Err(BatchError::Index {
                            path: index_path.to_path_buf(),
                            reason: error_chain(err),
                        }),
                    });
                (project.id.clone(), result)
            })
            .collect();

        let mut batch = Self::default();
        for (id, result) in results {
            match result {
                Ok(doc) => batch.documents.push((id, doc)),
                Err(err) => {
                    log!("warning"; "skipping ats project `{}`: {}", id, error_chain(&err));
                    batch.skipped.push((id, err.to_string()));
                }
            }
        }
        batch
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|(id, _)| id.as_str())
    }

    /// `(id, reason)` of every skipped project.
    pub fn skipped(&self) -> &[(String, String)] {
        &self.skipped
    }

    /// Concatenated project markup.
    pub fn html(&self) -> String {
        self.documents
            .iter()
            .map(|(_, doc)| doc.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// `@graph` with the owner's `Person` followed by each `CreativeWork`.
    pub fn json_ld(&self, site: &SiteSectionConfig) -> Value {
        let mut graph = vec![self.person(site)];
        graph.extend(self.documents.iter().map(|(_, doc)| doc.json_ld.clone()));
        json!({
            "@context": "https://schema.org",
            "@graph": graph,
        })
    }

    fn person(&self, site: &SiteSectionConfig) -> Value {
        let mut person = Map::new();
        person.insert("@type".into(), json!("Person"));
        person.insert("@id".into(), json!(PERSON_ID));
        let fields = [
            ("name", site.author.as_str()),
            ("jobTitle", site.job_title.as_str()),
            ("email", site.email.as_str()),
            ("description", site.description.as_str()),
            ("url", site.url.as_deref().unwrap_or_default()),
        ];
        for (key, value) in fields {
            if !value.trim().is_empty() {
                person.insert(key.into(), json!(value));
            }
        }

        let mut seen = FxHashSet::default();
        let knows_about: Vec<&str> = self
            .documents
            .iter()
            .flat_map(|(_, doc)| doc.skills.iter())
            .filter(|skill| seen.insert(skill.to_lowercase()))
            .map(String::as_str)
            .collect();
        if !knows_about.is_empty() {
            person.insert("knowsAbout".into(), json!(knows_about));
        }
        Value::Object(person)
    }
}

type LoadedIndex = Result<ProjectIndex, ContentError>;

/// Load each distinct index once.
fn load_indexes(projects: &[&AtsProject], default_index: &Path) -> FxHashMap<PathBuf, LoadedIndex> {
    let mut indexes = FxHashMap::default();
    for project in projects {
        let path = project.index_path.as_deref().unwrap_or(default_index);
        if indexes.contains_key(path) {
            continue;
        }
        indexes.insert(path.to_path_buf(), ProjectIndex::load(path));
    }
    indexes
}

fn build_document(
    project: &AtsProject,
    index: &ProjectIndex,
    index_path: &Path,
) -> Result<SemanticDocument, BatchError> {
    let entry = index
        .get(project.key())
        .ok_or_else(|| BatchError::MissingEntry {
            key: project.key().to_string(),
            path: index_path.to_path_buf(),
        })?;

    let detail = match &project.json_path {
        Some(path) => {
            let json = fs::read_to_string(path).map_err(|source| BatchError::DetailIo {
                path: path.clone(),
                source,
            })?;
            Some(DetailRecord::from_json(&json).map_err(|source| {
                BatchError::DetailDecode {
                    path: path.clone(),
                    source,
                }
            })?)
        }
        None => None,
    };

    Ok(project_to_semantic_document(entry, detail.as_ref()))
}

fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, priority: i32) -> AtsProject {
        AtsProject {
            id: id.into(),
            json_path: None,
            index_path: None,
            project_key: None,
            priority,
        }
    }

    fn site_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("index.json"),
            r#"{
                "acme": {"title": "Acme", "tags": ["Rust", "Figma"]},
                "zen": {"title": "Zen", "tags": ["rust", "Go"]},
                "orbit": {"title": "Orbit"}
            }"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("acme.json"),
            r#"{"subtitle": "Enterprise CRM"}"#,
        )
        .unwrap();
        dir
    }

    #[test]
    fn test_priority_order_is_stable() {
        let dir = site_dir();
        let projects = [project("orbit", 2), project("zen", 1), project("acme", 1)];
        let batch = AtsBatch::load(&projects, &dir.path().join("index.json"));

        assert_eq!(batch.ids().collect::<Vec<_>>(), ["zen", "acme", "orbit"]);
        let html = batch.html();
        let zen = html.find(r#"data-project-id="zen""#).unwrap();
        let acme = html.find(r#"data-project-id="acme""#).unwrap();
        assert!(zen < acme);
    }

    #[test]
    fn test_detail_and_project_key() {
        let dir = site_dir();
        let mut alias = project("crm", 0);
        alias.project_key = Some("acme".into());
        alias.json_path = Some(dir.path().join("acme.json"));

        let batch = AtsBatch::load(&[alias], &dir.path().join("index.json"));
        assert_eq!(batch.len(), 1);
        assert!(batch.html().contains("Enterprise CRM"));
    }

    #[test]
    fn test_unreadable_projects_skipped() {
        let dir = site_dir();
        let mut broken = project("acme", 0);
        broken.json_path = Some(dir.path().join("missing.json"));
        let mut other_index = project("zen", 0);
        other_index.index_path = Some(dir.path().join("nope.json"));
        let projects = [broken, project("ghost", 1), other_index, project("orbit", 2)];

        let batch = AtsBatch::load(&projects, &dir.path().join("index.json"));
        assert_eq!(batch.ids().collect::<Vec<_>>(), ["orbit"]);
        assert_eq!(batch.skipped().len(), 3);
    }

    #[test]
    fn test_json_ld_graph() {
        let dir = site_dir();
        let projects = [project("acme", 0), project("zen", 1)];
        let batch = AtsBatch::load(&projects, &dir.path().join("index.json"));
        let site = SiteSectionConfig {
            author: "Jane Doe".into(),
            job_title: "Product Designer".into(),
            ..Default::default()
        };

        let ld = batch.json_ld(&site);
        assert_eq!(ld["@context"], "https://schema.org");
        let graph = ld["@graph"].as_array().unwrap();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph[0]["@type"], "Person");
        assert_eq!(graph[0]["name"], "Jane Doe");
        assert_eq!(graph[0]["knowsAbout"], json!(["Rust", "Figma", "Go"]));
        assert!(graph[0].get("email").is_none());
        assert_eq!(graph[1]["@id"], "#project-acme");
        assert_eq!(graph[2]["@id"], "#project-zen");
    }

    #[test]
    fn test_output_deterministic() {
        let dir = site_dir();
        let projects = [project("acme", 0), project("zen", 0), project("orbit", 0)];
        let index = dir.path().join("index.json");
        let site = SiteSectionConfig::default();
        let first = AtsBatch::load(&projects, &index);
        let second = AtsBatch::load(&projects, &index);
        assert_eq!(first.html(), second.html());
        assert_eq!(
            serde_json::to_string(&first.json_ld(&site)).unwrap(),
            serde_json::to_string(&second.json_ld(&site)).unwrap()
        );
    }
}
