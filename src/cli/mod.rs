//! Command-line interface.

use clap::{Parser, Subcommand};

use crate::Config;

/// TechNotes - users and notes API for a repair shop
#[derive(Parser)]
#[command(name = "technotes")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "s")]
    Serve,

    /// Write a default config.toml in the working directory
    #[command(alias = "init")]
    InitConfig,

    /// Load and validate the config, then print it
    #[command(alias = "check")]
    CheckConfig,
}

impl Cli {
    /// Runs commands that need no async runtime. Returns `false` when the
    /// server should be started.
    pub fn run_offline(&self, config: &Config) -> anyhow::Result<bool> {
        match self.command {
            None | Some(Commands::Serve) => Ok(false),
            Some(Commands::InitConfig) => {
                if Config::create_default_if_missing()? {
                    println!("Created config.toml");
                } else {
                    println!("config.toml already exists");
                }
                Ok(true)
            }
            Some(Commands::CheckConfig) => {
                config.validate()?;
                println!("{}", toml::to_string_pretty(config)?);
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::parse_from(["technotes"]);
        assert!(cli.command.is_none());
        assert!(!cli.run_offline(&Config::default()).unwrap());
    }

    #[test]
    fn test_check_config_alias() {
        let cli = Cli::parse_from(["technotes", "check"]);
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
        assert!(cli.run_offline(&Config::default()).unwrap());
    }
}
