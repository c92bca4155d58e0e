//! Launcher configuration
//!
//! Reads the bot's deployment variables from the process environment (or any
//! lookup function, for tests) and resolves the downstream entrypoint.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::fmt;

/// Default database name substituted when `MONGO_DB_NAME` is absent
pub const DEFAULT_MONGO_DB_NAME: &str = "forward_bot";

/// Display sentinel shown when `LOG_CHANNEL` is absent
pub const LOG_CHANNEL_NOT_SET: &str = "Not Set";

/// Downstream program used when `BOT_ENTRYPOINT` is not provided
pub const DEFAULT_ENTRYPOINT: &str = "python3 main.py";

/// Subcommand passed to the downstream program on hand-off
pub const START_ARG: &str = "start";

/// A deployment variable and the human description shown by `verify`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvVar {
    pub name: &'static str,
    pub description: &'static str,
}

/// Variables that must be set and non-empty before the bot may start
pub const REQUIRED_VARS: [EnvVar; 5] = [
    EnvVar {
        name: "API_ID",
        description: "Telegram API ID",
    },
    EnvVar {
        name: "API_HASH",
        description: "Telegram API Hash",
    },
    EnvVar {
        name: "BOT_TOKEN",
        description: "Bot Token from @BotFather",
    },
    EnvVar {
        name: "MONGO_URI",
        description: "MongoDB Connection URI",
    },
    EnvVar {
        name: "OWNER_ID",
        description: "Bot Owner Telegram ID",
    },
];

/// Variables with a fallback when absent
pub const OPTIONAL_VARS: [EnvVar; 2] = [
    EnvVar {
        name: "MONGO_DB_NAME",
        description: "MongoDB Database Name",
    },
    EnvVar {
        name: "LOG_CHANNEL",
        description: "Log Channel ID",
    },
];

/// Variables the bot parses as integers
pub const NUMERIC_VARS: [&str; 3] = ["API_ID", "OWNER_ID", "LOG_CHANNEL"];

/// Read a variable, treating the empty string the same as unset
pub fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.is_empty())
}

/// Lookup backed by the process environment
///
/// Non-UTF-8 values are converted lossily: a set variable is never reported
/// as missing because of its encoding.
pub fn env_lookup(key: &str) -> Option<String> {
    env::var_os(key).map(|value| value.to_string_lossy().into_owned())
}

/// Configuration the bot needs at startup
#[derive(Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Telegram API ID
    pub api_id: String,

    /// Telegram API hash
    pub api_hash: String,

    /// Bot token from @BotFather
    pub bot_token: String,

    /// MongoDB connection URI
    pub mongo_uri: String,

    /// Telegram user ID of the bot owner
    pub owner_id: String,

    /// MongoDB database name, if provided
    pub mongo_db_name: Option<String>,

    /// Log channel ID, if provided
    pub log_channel: Option<String>,
}

impl LaunchConfig {
    /// Load configuration through an arbitrary lookup
    ///
    /// The check is all-or-nothing: every absent required key is collected
    /// before failing.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing: Vec<&'static str> = REQUIRED_VARS
            .iter()
            .map(|var| var.name)
            .filter(|name| non_empty(&lookup, name).is_none())
            .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingConfiguration { missing });
        }

        let required = |key: &str| non_empty(&lookup, key).unwrap_or_default();

        Ok(Self {
            api_id: required("API_ID"),
            api_hash: required("API_HASH"),
            bot_token: required("BOT_TOKEN"),
            mongo_uri: required("MONGO_URI"),
            owner_id: required("OWNER_ID"),
            mongo_db_name: non_empty(&lookup, "MONGO_DB_NAME"),
            log_channel: non_empty(&lookup, "LOG_CHANNEL"),
        })
    }

    /// Database name, falling back to [`DEFAULT_MONGO_DB_NAME`]
    pub fn mongo_db_name_or_default(&self) -> &str {
        self.mongo_db_name
            .as_deref()
            .unwrap_or(DEFAULT_MONGO_DB_NAME)
    }

    /// Log channel for display, falling back to [`LOG_CHANNEL_NOT_SET`]
    pub fn log_channel_display(&self) -> &str {
        self.log_channel.as_deref().unwrap_or(LOG_CHANNEL_NOT_SET)
    }
}

impl fmt::Debug for LaunchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LaunchConfig")
            .field("api_id", &self.api_id)
            .field("api_hash", &"<redacted>")
            .field("bot_token", &"<redacted>")
            .field("mongo_uri", &"<redacted>")
            .field("owner_id", &self.owner_id)
            .field("mongo_db_name", &self.mongo_db_name)
            .field("log_channel", &self.log_channel)
            .finish()
    }
}

/// The downstream program the launcher hands off to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrypoint {
    /// Executable name or path
    pub program: String,

    /// Arguments placed before [`START_ARG`]
    pub args: Vec<String>,
}

impl Entrypoint {
    /// Split a command line on whitespace into program and leading args
    pub fn parse(command_line: &str) -> ConfigResult<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(ConfigError::EmptyEntrypoint)?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    /// Full argument list passed to the program, ending in `start`
    pub fn start_args(&self) -> Vec<String> {
        let mut args = self.args.clone();
        args.push(START_ARG.to_string());
        args
    }
}

impl Default for Entrypoint {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["main.py".to_string()],
        }
    }
}

impl fmt::Display for Entrypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
