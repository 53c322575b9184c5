use crate::{Error, Result};
use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Resolve the data directory based on priority:
/// 1. Explicit path (with tilde expansion)
/// 2. FITCHLIST_PATH environment variable (with tilde expansion)
/// 3. System data directory (recommended default)
/// 4. ~/.fitchlist (fallback for systems without standard data directory)
pub fn resolve_data_dir(explicit_path: Option<&str>) -> Result<PathBuf> {
    if let Some(path) = explicit_path {
        return Ok(expand_tilde(path));
    }

    if let Ok(env_path) = std::env::var("FITCHLIST_PATH") {
        return Ok(expand_tilde(&env_path));
    }

    if let Some(data_dir) = dirs::data_dir() {
        return Ok(data_dir.join("fitchlist"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".fitchlist"));
    }

    Err(Error::Config(
        "Could not determine data directory: no HOME directory or system data directory found"
            .to_string(),
    ))
}

/// Expand tilde (~) in paths to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Storage key for a list's persisted view state.
///
/// The same resource on two servers (or with different path parameters)
/// must not share remembered filters, so the key is derived from the
/// fully resolved endpoint URL.
pub fn storage_key(scope: &str, resolved_url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(resolved_url.trim_end_matches('/').as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}:{}", scope, &digest[..16])
}
