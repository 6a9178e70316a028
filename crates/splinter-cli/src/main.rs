use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use tracing::debug;

use splinter_cli::{
    cli::{Cli, Commands},
    commands, logging,
};
use splinter_config::{ConfigOverrides, SplinterConfig};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration with CLI overrides
    let config = SplinterConfig::load(ConfigOverrides {
        config_file: cli.config.clone(),
        vault_path: cli.vault.clone(),
        log_level: cli.log_level.map(|level| level.as_str().to_string()),
    })?;

    // Initialize logging
    let level = logging::resolve_level(cli.verbose, &config.logging.level);
    logging::init(&level);
    debug!(vault = %config.vault.path.display(), template = %config.extract.template, "loaded config");

    let ok = match cli.command {
        Commands::Extract(args) => {
            commands::extract::execute(config, args).await?;
            true
        }
        Commands::Title { text } => commands::title::title(text)?,
        Commands::Check { text } => commands::title::check(text)?,
        Commands::Config(cmd) => {
            commands::config::execute(config, cmd)?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
