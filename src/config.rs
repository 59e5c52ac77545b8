//! Configuration for the fixture catalog.
//!
//! Names the fixture documents to load, where file references resolve, and
//! which lookups get logged.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration for a fixture catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Fixture documents, loaded in order
    #[serde(default)]
    pub documents: Vec<PathBuf>,

    /// Root directory for `fileReference` paths
    ///
    /// When absent, each document's references resolve against the
    /// directory containing that document.
    #[serde(default)]
    pub external_root: Option<PathBuf>,

    /// Global settings
    #[serde(default)]
    pub settings: CatalogSettings,
}

impl CatalogConfig {
    /// Load configuration from a YAML file.
    ///
    /// Relative paths are taken relative to the file's directory.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        Ok(config)
    }

    /// Parse and validate configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (i, document) in self.documents.iter().enumerate() {
            if document.as_os_str().is_empty() {
                anyhow::bail!("Document {}: path cannot be empty", i);
            }
        }
        if let Some(root) = &self.external_root {
            if root.as_os_str().is_empty() {
                anyhow::bail!("external_root cannot be empty");
            }
        }
        Ok(())
    }

    /// Resolve relative paths against `dir`.
    pub fn rebase(&mut self, dir: &Path) {
        for document in &mut self.documents {
            if document.is_relative() {
                *document = dir.join(&*document);
            }
        }
        if let Some(root) = &mut self.external_root {
            if root.is_relative() {
                *root = dir.join(&*root);
            }
        }
    }
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSettings {
    /// Log every matched interaction
    #[serde(default = "default_true")]
    pub log_matches: bool,

    /// Log requests nothing matched
    #[serde(default = "default_true")]
    pub log_unmatched: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            log_matches: true,
            log_unmatched: true,
        }
    }
}
