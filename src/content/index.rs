//! Project index: a JSON object keyed by project ID.

use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use super::{ContentError, ProjectEntry};

/// All projects in source order.
///
/// Key order of the JSON object is kept; it is the navigation order.
#[derive(Debug, Clone, Default)]
pub struct ProjectIndex {
    entries: Vec<ProjectEntry>,
}

impl ProjectIndex {
    /// Parse an index document.
    ///
    /// A malformed entry fails the whole index with an error naming it.
    /// Invalid items inside a metric list are dropped instead.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        let map: Map<String, Value> = serde_json::from_str(json)?;
        let entries = map
            .into_iter()
            .map(|(id, value)| {
                let mut entry: ProjectEntry = serde_json::from_value(value)
                    .map_err(|source| ContentError::Entry { id: id.clone(), source })?;
                entry.id = id;
                Ok(entry)
            })
            .collect::<Result<Vec<_>, ContentError>>()?;
        Ok(Self { entries })
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json =
            fs::read_to_string(path).map_err(|err| ContentError::Io(path.to_path_buf(), err))?;
        Self::from_json(&json)
    }

    pub fn get(&self, id: &str) -> Option<&ProjectEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Project IDs in navigation order.
    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProjectEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ProjectEntry> for ProjectIndex {
    fn from_iter<I: IntoIterator<Item = ProjectEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const INDEX: &str = r#"{
        "zeta": {"title": "Zeta"},
        "acme": {"title": "Acme Platform", "theme": "blue"},
        "beta": {"title": "Beta"}
    }"#;

    #[test]
    fn test_key_order_is_navigation_order() {
        let index = ProjectIndex::from_json(INDEX).unwrap();
        assert_eq!(index.ids(), vec!["zeta", "acme", "beta"]);
    }

    #[test]
    fn test_get_sets_id() {
        let index = ProjectIndex::from_json(INDEX).unwrap();
        let acme = index.get("acme").unwrap();
        assert_eq!(acme.id, "acme");
        assert_eq!(acme.title, "Acme Platform");
        assert!(index.get("missing").is_none());
    }

    #[test]
    fn test_malformed_entry_names_id() {
        let err = ProjectIndex::from_json(r#"{"ok": {}, "bad": {"tags": 5}}"#).unwrap_err();
        match err {
            ContentError::Entry { id, .. } => assert_eq!(id, "bad"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_metric_keeps_entry() {
        let index = ProjectIndex::from_json(
            r#"{
                "acme": {"cardMetrics": [{"value": "30%"}, {"value": "x2", "label": "speed"}]},
                "zen": {"title": "Zen"}
            }"#,
        )
        .unwrap();
        assert_eq!(index.ids(), vec!["acme", "zen"]);
        let acme = index.get("acme").unwrap();
        assert_eq!(acme.card_metrics.len(), 1);
        assert_eq!(acme.card_metrics[0].label, "speed");
    }

    #[test]
    fn test_non_object_index_rejected() {
        assert!(matches!(
            ProjectIndex::from_json("[1, 2]"),
            Err(ContentError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(INDEX.as_bytes()).unwrap();
        let index = ProjectIndex::load(file.path()).unwrap();
        assert_eq!(index.len(), 3);

        let missing = ProjectIndex::load(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(ContentError::Io(..))));
    }
}
