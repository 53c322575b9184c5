use crate::resource::{ResourceConfig, builtin_resources};
use crate::{Error, Result};
use fitchlist_core::resolve_data_dir;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            resources: builtin_resources(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::default_path()?;
        Self::load_from(&config_path)
    }

    /// Read `path`, falling back to defaults when it does not exist.
    ///
    /// Built-in resources are always present; a file entry with the same
    /// name replaces the built-in one.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;
        for (name, resource) in builtin_resources() {
            config.resources.entry(name).or_insert(resource);
        }

        tracing::debug!(
            path = %path.display(),
            resources = config.resources.len(),
            "loaded config"
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(resolve_data_dir(None)?.join("config.toml"))
    }

    /// Apply `FITCHLIST_API_URL` and `FITCHLIST_TOKEN` on top of the file.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("FITCHLIST_API_URL")
            && !url.trim().is_empty()
        {
            self.api.base_url = url;
        }
        if let Ok(token) = std::env::var("FITCHLIST_TOKEN")
            && !token.trim().is_empty()
        {
            self.api.token = Some(token);
        }
        self
    }

    pub fn resource(&self, name: &str) -> Result<&ResourceConfig> {
        self.resources
            .get(name)
            .ok_or_else(|| Error::UnknownResource(name.to_string()))
    }

    pub fn set_base_url(&mut self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        url::Url::parse(&url).map_err(|e| Error::Config(format!("invalid URL '{}': {}", url, e)))?;
        self.api.base_url = url;
        Ok(())
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.api.token = token.filter(|t| !t.trim().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.resources.contains_key("modules"));
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.set_base_url("https://fitchfork.example.com/api")?;
        config.set_token(Some("secret".to_string()));
        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded, config);
        Ok(())
    }

    #[test]
    fn test_file_resources_merge_with_builtins() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[api]
base_url = "http://127.0.0.1:8080/api"

[resources.tickets]
endpoint = "modules/{module_id}/assignments/{assignment_id}/tickets"
items_key = "tickets"
page_size = 50

[[resources.tickets.columns]]
key = "title"
label = "Title"
sortable = true

[resources.modules]
endpoint = "modules"
items_key = "modules"
key_field = "code"
"#,
        )?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.token, None);

        let tickets = config.resource("tickets")?;
        assert_eq!(tickets.page_size, Some(50));
        assert_eq!(tickets.key_field, "id");
        assert!(tickets.columns[0].sortable);

        assert_eq!(config.resource("modules")?.key_field, "code");
        assert!(config.resource("users").is_ok());
        Ok(())
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let mut config = Config::default();
        assert!(config.set_base_url("not a url").is_err());
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_unknown_resource() {
        let config = Config::default();
        let err = config.resource("grades").unwrap_err();
        assert_eq!(err.to_string(), "Unknown resource 'grades'");
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("missing.toml"))?;
        assert_eq!(config, Config::default());
        Ok(())
    }
}
