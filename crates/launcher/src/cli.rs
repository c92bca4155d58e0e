use clap::{Parser, Subcommand};
use forwardbot_core::config::DEFAULT_ENTRYPOINT;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "forwardbot")]
#[command(about = "Startup gate for the Telegram auto forward bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Bot command line; `start` is appended on hand-off
    #[arg(long, env = "BOT_ENTRYPOINT", default_value = DEFAULT_ENTRYPOINT, global = true)]
    pub entrypoint: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq, Default)]
pub enum Commands {
    /// Check required configuration and hand off to the bot (default)
    #[default]
    Start,
    /// Check the deployment without starting the bot
    Verify {
        /// Bot configuration file to validate if present
        #[arg(long, default_value = "config.json")]
        config_file: PathBuf,
    },
}
