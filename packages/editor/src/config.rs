use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::metadata::{Category, TagSet};

pub const DEFAULT_CONFIG_NAME: &str = "blockpress.config.json";

/// Blockpress configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Upload endpoint location
    #[serde(default)]
    pub upload: UploadConfig,

    /// Values a fresh draft starts with
    #[serde(default)]
    pub metadata: MetadataDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_upload_path")]
    pub upload_path: String,
}

fn default_base_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_upload_path() -> String {
    "/api/uploadImage/create".to_string()
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_path: default_upload_path(),
        }
    }
}

impl UploadConfig {
    /// Full upload URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.upload_path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDefaults {
    #[serde(default)]
    pub default_category: Category,

    #[serde(default)]
    pub initial_tags: Vec<String>,
}

impl MetadataDefaults {
    pub fn tags(&self) -> TagSet {
        self.initial_tags.iter().collect()
    }
}

impl Config {
    /// Load config from a directory
    pub fn load(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            tracing::debug!(path = %config_path.display(), "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "upload": { "baseUrl": "https://blog.example.com/", "uploadPath": "/media" },
            "metadata": { "defaultCategory": "Computer Science", "initialTags": ["Depression", " Depression "] }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.upload.endpoint(), "https://blog.example.com/media");
        assert_eq!(config.metadata.default_category, Category::ComputerScience);
        assert_eq!(config.metadata.tags().as_slice(), &["Depression"]);
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.upload.endpoint(),
            "http://localhost:5173/api/uploadImage/create"
        );
        assert_eq!(config.metadata.default_category, Category::Ai);
        assert!(config.metadata.initial_tags.is_empty());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{ "upload": { "baseUrl": "http://cdn" } }"#).unwrap();
        assert_eq!(config.upload.endpoint(), "http://cdn/api/uploadImage/create");
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap().upload.base_url, "http://localhost:5173");

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "metadata": { "defaultCategory": "Agents" } }"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.metadata.default_category, Category::Agents);
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{ nope").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
