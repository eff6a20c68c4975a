//! Settings for the object store and document database.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CanopyError, Result};

/// Config file picked up from the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "canopy.toml";

/// Remote settings, from `canopy.toml` plus `CANOPY_*` environment overrides.
///
/// ```toml
/// bucket = "branch-brook-park-app.firebasestorage.app"
/// project = "branch-brook-park-app"
/// collection = "trees"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Storage bucket images are re-hosted to.
    pub bucket: Option<String>,
    /// Firestore project id.
    pub project: Option<String>,
    /// Firestore endpoint; the public API when unset.
    pub firestore_url: Option<String>,
    /// Document collection rows are uploaded into.
    pub collection: String,
    /// Prefix for re-hosted object names.
    pub object_prefix: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User-Agent sent when downloading source images.
    pub user_agent: String,
    /// OAuth access token. Only ever read from `CANOPY_ACCESS_TOKEN`.
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            project: None,
            firestore_url: None,
            collection: "trees".to_string(),
            object_prefix: "trees/".to_string(),
            timeout_secs: 10,
            user_agent: "Mozilla/5.0".to_string(),
            access_token: None,
        }
    }
}

impl RemoteConfig {
    /// Load from `path`, or from `canopy.toml` if present, then apply the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CanopyError::io(path, e))?;
        let config = Self::from_toml(&text)
            .map_err(|e| CanopyError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "loaded remote config");
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| CanopyError::Config(e.to_string()))
    }

    /// Apply `CANOPY_BUCKET`, `CANOPY_PROJECT`, `CANOPY_COLLECTION` and
    /// `CANOPY_ACCESS_TOKEN` from `lookup`. Blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("CANOPY_BUCKET") {
            self.bucket = Some(v);
        }
        if let Some(v) = get("CANOPY_PROJECT") {
            self.project = Some(v);
        }
        if let Some(v) = get("CANOPY_COLLECTION") {
            self.collection = v;
        }
        if let Some(v) = get("CANOPY_ACCESS_TOKEN") {
            self.access_token = Some(v);
        }
    }

    /// Use a different collection.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn require_bucket(&self) -> Result<&str> {
        self.bucket.as_deref().ok_or_else(|| {
            CanopyError::Config(
                "storage bucket not set (CANOPY_BUCKET or `bucket` in canopy.toml)".to_string(),
            )
        })
    }

    pub fn require_project(&self) -> Result<&str> {
        self.project.as_deref().ok_or_else(|| {
            CanopyError::Config(
                "Firestore project not set (CANOPY_PROJECT or `project` in canopy.toml)".to_string(),
            )
        })
    }

    pub fn require_token(&self) -> Result<&str> {
        self.access_token.as_deref().ok_or_else(|| {
            CanopyError::Config("CANOPY_ACCESS_TOKEN environment variable not set".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = RemoteConfig::default();
        assert_eq!(config.collection, "trees");
        assert_eq!(config.object_prefix, "trees/");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.require_bucket().is_err());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = RemoteConfig::from_toml(
            r#"
            bucket = "park.appspot.com"
            timeout_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.require_bucket().unwrap(), "park.appspot.com");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.collection, "trees");
    }

    #[test]
    fn test_token_is_not_read_from_file() {
        let config = RemoteConfig::from_toml(r#"access_token = "leaked""#).unwrap();
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            RemoteConfig::from_toml("bucket = ["),
            Err(CanopyError::Config(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CANOPY_PROJECT", "park"),
            ("CANOPY_COLLECTION", "trees_v2"),
            ("CANOPY_ACCESS_TOKEN", "ya29.token"),
            ("CANOPY_BUCKET", "  "),
        ]
        .into_iter()
        .collect();

        let mut config = RemoteConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.require_project().unwrap(), "park");
        assert_eq!(config.collection, "trees_v2");
        assert_eq!(config.require_token().unwrap(), "ya29.token");
        assert!(config.bucket.is_none());
    }
}
