//! TestWorld pattern for CLI integration tests.
//!
//! Each world owns a temporary data directory so config files and the
//! view-state database never leak between tests or into the real home.

use anyhow::Result;
use assert_cmd::Command;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated environment for running the `fitchlist` binary.
///
/// # Example
/// ```no_run
/// use fitchlist_testing::TestWorld;
///
/// let world = TestWorld::new().with_api_url("http://127.0.0.1:9/api");
/// let result = world.run(&["resources"]).unwrap();
/// assert!(result.success());
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    data_dir: PathBuf,
    env_vars: HashMap<String, String>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join(".fitchlist");
        std::fs::create_dir_all(&data_dir).expect("Failed to create data dir");

        Self {
            temp_dir,
            data_dir,
            env_vars: HashMap::new(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.toml")
    }

    /// Set an environment variable for CLI execution.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    /// Point the CLI at an API base URL (usually a [`FixtureServer`](crate::FixtureServer)).
    pub fn with_api_url(self, url: impl Into<String>) -> Self {
        self.with_env("FITCHLIST_API_URL", url)
    }

    /// Write a raw `config.toml` into the data directory.
    pub fn with_config(self, contents: &str) -> Self {
        std::fs::write(self.config_path(), contents).expect("Failed to write config");
        self
    }

    /// Apply data dir, plain output and environment to a command.
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--data-dir").arg(self.data_dir());
        cmd.current_dir(self.temp_dir.path());
        cmd.env_remove("FITCHLIST_API_URL")
            .env_remove("FITCHLIST_TOKEN")
            .env_remove("FITCHLIST_PATH");

        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd
    }

    /// Run the `fitchlist` binary with `args`.
    #[allow(deprecated)]
    pub fn run(&self, args: &[&str]) -> Result<CliResult> {
        let mut cmd = Command::cargo_bin("fitchlist")
            .map_err(|e| anyhow::anyhow!("Failed to find fitchlist binary: {}", e))?;
        self.configure_command(&mut cmd);
        cmd.args(args);

        let output = cmd.output()?;
        Ok(CliResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}

/// Result of a CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    pub status: std::process::ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CliResult {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.stdout)?)
    }

    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}
