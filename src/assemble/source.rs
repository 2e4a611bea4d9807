//! Where detail records come from.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::content::DetailRecord;
use crate::utils::path::resolve_web_path;

/// A failed detail fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read `{path}`")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("`{path}` is not a valid detail record")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Asynchronous detail-record provider.
#[allow(async_fn_in_trait)]
pub trait DetailSource {
    /// Fetch the record a `contentFile` path points at.
    async fn fetch(&self, path: &str) -> Result<DetailRecord, FetchError>;
}

/// Reads detail records from disk.
///
/// A leading `/` in the requested path is relative to `root`.
#[derive(Debug, Clone)]
pub struct FsSource {
    root: PathBuf,
}

impl FsSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DetailSource for FsSource {
    async fn fetch(&self, path: &str) -> Result<DetailRecord, FetchError> {
        let resolved = resolve_web_path(&self.root, path).ok_or_else(|| FetchError::Io {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "path escapes data root"),
        })?;
        let json = tokio::fs::read_to_string(&resolved)
            .await
            .map_err(|source| FetchError::Io {
                path: path.to_string(),
                source,
            })?;
        DetailRecord::from_json(&json).map_err(|source| FetchError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[tokio::test]
    async fn test_fs_source_reads_site_absolute_path() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("data")).unwrap();
        fs::write(
            dir.path().join("data/acme.json"),
            r#"{"subtitle": "Enterprise CRM"}"#,
        )
        .unwrap();

        let source = FsSource::new(dir.path());
        let detail = source.fetch("/data/acme.json").await.unwrap();
        assert_eq!(detail.subtitle.as_deref(), Some("Enterprise CRM"));
    }

    #[tokio::test]
    async fn test_fs_source_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("bad.json"), "{").unwrap();
        let source = FsSource::new(dir.path());

        assert!(matches!(
            source.fetch("/missing.json").await,
            Err(FetchError::Io { .. })
        ));
        assert!(matches!(
            source.fetch("/bad.json").await,
            Err(FetchError::Decode { .. })
        ));
        assert!(matches!(
            source.fetch("/../outside.json").await,
            Err(FetchError::Io { .. })
        ));
    }
}
