use anyhow::{Context, Result};
use splinter_config::SplinterConfig;

use crate::cli::ConfigCommands;

pub fn execute(config: SplinterConfig, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => {
            let path = match path {
                Some(path) => path,
                None => SplinterConfig::default_config_path()?,
            };

            if path.exists() && !force {
                println!("Config file already exists: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            SplinterConfig::create_example(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            println!("Created config file at {}", path.display());
        }
        ConfigCommands::Show => {
            print!("{}", config.display_as_toml()?);
        }
    }
    Ok(())
}
