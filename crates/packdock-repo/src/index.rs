//! Repository index types
//!
//! A slim Helm-compatible index, parsed only far enough to prove that a
//! remote actually serves a package repository. `apiVersion` is mandatory:
//! an arbitrary YAML payload without it is rejected, which is the
//! validation gate for `repo add`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{RepoError, Result};

/// Repository index
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryIndex {
    /// API version. Required; its absence marks a non-index payload.
    pub api_version: String,

    /// When this index was generated
    #[serde(default = "Utc::now")]
    pub generated: DateTime<Utc>,

    /// Chart versions indexed by name
    #[serde(default)]
    pub entries: HashMap<String, Vec<ChartVersion>>,
}

impl RepositoryIndex {
    /// Parse an index from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| RepoError::IndexParse {
            message: e.to_string(),
        })
    }

    /// Parse an index from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let yaml = std::str::from_utf8(bytes).map_err(|e| RepoError::IndexParse {
            message: format!("Invalid UTF-8: {}", e),
        })?;
        Self::from_yaml(yaml)
    }

    /// Get all versions of a chart
    pub fn get(&self, name: &str) -> Option<&Vec<ChartVersion>> {
        self.entries.get(name)
    }

    /// List all chart names
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }
}

/// One chart version in the index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartVersion {
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// URLs to download the chart archive
    #[serde(default)]
    pub urls: Vec<String>,

    /// SHA256 digest of the archive
    #[serde(default)]
    pub digest: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
apiVersion: v1
generated: "2024-01-01T00:00:00Z"
entries:
  nginx:
    - name: nginx
      version: "15.0.0"
      description: NGINX Open Source
      urls:
        - https://charts.example.com/nginx-15.0.0.tgz
      digest: "sha256:abc123"
    - name: nginx
      version: "14.0.0"
      urls:
        - https://charts.example.com/nginx-14.0.0.tgz
"#;

    #[test]
    fn test_parse_index() {
        let index = RepositoryIndex::from_yaml(SAMPLE).unwrap();
        assert_eq!(index.api_version, "v1");
        assert_eq!(index.get("nginx").unwrap().len(), 2);
        assert_eq!(index.names(), vec!["nginx"]);
    }

    #[test]
    fn test_missing_api_version_rejected() {
        let err = RepositoryIndex::from_yaml("entries: {}\n").unwrap_err();
        assert!(matches!(err, RepoError::IndexParse { .. }));
    }

    #[test]
    fn test_non_yaml_payload_rejected() {
        assert!(RepositoryIndex::from_bytes(b"<html><body>404</body></html>").is_err());
        assert!(RepositoryIndex::from_bytes(&[0xff, 0xfe, 0x00]).is_err());
    }

    #[test]
    fn test_empty_entries_is_valid() {
        let index = RepositoryIndex::from_yaml("apiVersion: v1\n").unwrap();
        assert!(index.entries.is_empty());
    }
}
