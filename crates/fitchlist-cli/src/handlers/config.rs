use anyhow::{Context, Result};

use crate::context::CliContext;
use crate::types::OutputFormat;

/// Print the effective configuration. The token is masked.
pub fn show(ctx: &CliContext, format: OutputFormat) -> Result<()> {
    let mut config = ctx.config.clone();
    if config.api.token.is_some() {
        config.api.token = Some("********".to_string());
    }

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&config)?),
        _ => {
            println!("# {}", ctx.config_path().display());
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

// Edits start from the file, not the env-overridden view of it.
fn load_file_config(ctx: &CliContext) -> Result<fitchlist_runtime::Config> {
    fitchlist_runtime::Config::load_from(&ctx.config_path()).context("Failed to load config.toml")
}

pub fn set_url(ctx: &CliContext, url: &str) -> Result<()> {
    let mut config = load_file_config(ctx)?;
    config.set_base_url(url)?;
    config.save_to(&ctx.config_path())?;
    println!("API base URL set to {}", url);
    Ok(())
}

pub fn set_token(ctx: &CliContext, token: Option<String>) -> Result<()> {
    let mut config = load_file_config(ctx)?;
    let cleared = token.is_none();
    config.set_token(token);
    config.save_to(&ctx.config_path())?;
    if cleared {
        println!("API token removed");
    } else {
        println!("API token saved");
    }
    Ok(())
}
