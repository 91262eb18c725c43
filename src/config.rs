//! Persisted tool settings

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// User configuration, stored as TOML under the config directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Snippet file or directory the engine synchronizes from
    #[serde(default = "default_snippet_path")]
    pub snippet_path: String,

    /// Whether the Alfred list is written after a changed sync
    #[serde(default)]
    pub export_enabled: bool,

    /// Override for the export file location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
}

fn default_snippet_path() -> String {
    "Snippets.md".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snippet_path: default_snippet_path(),
            export_enabled: false,
            export_path: None,
        }
    }
}

impl Config {
    /// Load configuration from `path` or return defaults when absent.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }

    /// Export file location: the configured override, or the default under
    /// the user data directory.
    pub fn effective_export_path(&self) -> PathBuf {
        self.export_path
            .clone()
            .unwrap_or_else(crate::export::default_export_path)
    }
}

/// Default config file location under the user config directory.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("snipsync")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.snippet_path, "Snippets.md");
        assert!(!config.export_enabled);
        assert!(config.export_path.is_none());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.snippet_path, "Snippets.md");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let config = Config {
            snippet_path: "notes/snippets".to_string(),
            export_enabled: true,
            export_path: Some(PathBuf::from("/tmp/out.json")),
        };
        config.save(&path).unwrap();

        let loaded = Config::load_or_default(&path).unwrap();
        assert_eq!(loaded.snippet_path, "notes/snippets");
        assert!(loaded.export_enabled);
        assert_eq!(loaded.effective_export_path(), PathBuf::from("/tmp/out.json"));
    }

    #[test]
    fn test_partial_toml_uses_field_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "export_enabled = true\n").unwrap();

        let config = Config::load_or_default(&path).unwrap();
        assert!(config.export_enabled);
        assert_eq!(config.snippet_path, "Snippets.md");
    }
}
