use super::args::{Cli, Commands, ConfigCommand};
use super::context::CliContext;
use super::handlers;
use crate::logging::init_logging;
use anyhow::Result;

pub fn run(cli: Cli) -> Result<()> {
    let ctx = CliContext::load(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Browse { .. } => init_logging(cli.log_level, Some(&ctx.log_path()))?,
        _ => init_logging(cli.log_level, None)?,
    }
    tracing::debug!(data_dir = %ctx.data_dir.display(), "starting");

    match cli.command {
        Commands::List(args) => handlers::list::handle(&ctx, &args, cli.format),

        Commands::Browse {
            resource,
            params,
            view,
        } => handlers::browse::handle(&ctx, &resource, &params, view),

        Commands::Resources => handlers::resources::handle(&ctx, cli.format),

        Commands::Config { command } => match command {
            ConfigCommand::Show => handlers::config::show(&ctx, cli.format),
            ConfigCommand::SetUrl { url } => handlers::config::set_url(&ctx, &url),
            ConfigCommand::SetToken { token } => handlers::config::set_token(&ctx, token),
        },
    }
}
