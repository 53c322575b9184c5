use anyhow::{Context, Result};
use fitchlist_core::resolve_data_dir;
use fitchlist_runtime::{ApiClient, Config, ResourceConfig, ResourceFetcher};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::args::parse_key_value;

/// Data directory plus the effective configuration for one invocation
pub struct CliContext {
    pub data_dir: PathBuf,
    pub config: Config,
}

impl CliContext {
    pub fn load(data_dir: Option<&str>) -> Result<Self> {
        let data_dir = resolve_data_dir(data_dir)?;
        let config = Config::load_from(&data_dir.join("config.toml"))
            .context("Failed to load config.toml")?
            .with_env_overrides();
        Ok(Self { data_dir, config })
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("fitchlist.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("fitchlist.log")
    }

    /// Look up `name` and bind it to an HTTP client with the given `--param` values.
    pub fn open_resource(
        &self,
        name: &str,
        raw_params: &[String],
    ) -> Result<(ResourceConfig, ResourceFetcher)> {
        let params = raw_params
            .iter()
            .map(|raw| parse_key_value(raw))
            .collect::<Result<HashMap<_, _>>>()?;

        let resource = self.config.resource(name)?.clone();
        let client = ApiClient::new(&self.config.api)?;
        let fetcher = client.resource(name, &resource, &params)?;
        Ok((resource, fetcher))
    }
}
