use clap::{Args, Parser, Subcommand};

use crate::types::{LogLevel, OutputFormat, ViewMode};

#[derive(Parser)]
#[command(name = "fitchlist")]
#[command(about = "Browse paginated FitchFork lists from the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Data directory (config.toml, view-state database, log file)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[arg(long, default_value = "plain", global = true)]
    pub format: OutputFormat,

    #[arg(long, default_value = "warn", global = true)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of a resource
    List(ListArgs),

    /// Browse a resource interactively
    Browse {
        resource: String,

        /// Endpoint parameter, e.g. --param module_id=3
        #[arg(long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        #[arg(long, default_value = "table")]
        view: ViewMode,
    },

    /// List configured resources
    Resources,

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    pub resource: String,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,

    /// Sort keys, comma separated; prefix with '-' for descending (name,-due_date)
    #[arg(long, allow_hyphen_values = true)]
    pub sort: Option<String>,

    /// Column filter, repeatable: --filter year=2024,2025
    #[arg(long = "filter", value_name = "KEY=V1,V2")]
    pub filters: Vec<String>,

    #[arg(long)]
    pub page: Option<u64>,

    #[arg(long)]
    pub per_page: Option<u64>,

    /// Endpoint parameter, e.g. --param module_id=3
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,

    #[arg(long, default_value = "table")]
    pub view: ViewMode,

    /// Hide a column, repeatable
    #[arg(long = "hide", value_name = "COLUMN")]
    pub hide: Vec<String>,

    /// Show a column that is hidden by default, repeatable
    #[arg(long = "show", value_name = "COLUMN")]
    pub show: Vec<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Set the API base URL
    SetUrl { url: String },

    /// Set (or, without a value, remove) the bearer token
    SetToken { token: Option<String> },
}

/// Split `key=value`. The key must be non-empty.
pub(crate) fn parse_key_value(raw: &str) -> anyhow::Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => anyhow::bail!("expected KEY=VALUE, got '{}'", raw),
    }
}

/// Split `key=a,b` into a key and its non-empty values.
pub(crate) fn parse_filter(raw: &str) -> anyhow::Result<(String, Vec<String>)> {
    let (key, values) = parse_key_value(raw)?;
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok((key, values))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("module_id=3").ok(),
            Some(("module_id".to_string(), "3".to_string()))
        );
        assert!(parse_key_value("=3").is_err());
        assert!(parse_key_value("module_id").is_err());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("year=2024, 2025,").ok(),
            Some(("year".to_string(), vec!["2024".to_string(), "2025".to_string()]))
        );
        assert_eq!(
            parse_filter("year=").ok(),
            Some(("year".to_string(), Vec::new()))
        );
    }

    #[test]
    fn test_cli_parses_list() {
        let cli = Cli::try_parse_from([
            "fitchlist",
            "list",
            "assignments",
            "--param",
            "module_id=2",
            "--sort",
            "-due_date,name",
            "--filter",
            "assignment_type=practical",
            "--view",
            "grid",
            "--format",
            "json",
        ]);
        let Ok(cli) = cli else {
            panic!("list arguments should parse");
        };
        assert_eq!(cli.format, OutputFormat::Json);
        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.sort.as_deref(), Some("-due_date,name"));
        assert_eq!(args.view, ViewMode::Grid);
        assert_eq!(args.params, vec!["module_id=2"]);
    }
}
