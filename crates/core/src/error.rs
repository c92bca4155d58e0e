//! Error types for launcher configuration

use thiserror::Error;

/// Configuration errors raised before the bot is started
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables is unset or empty.
    ///
    /// `missing` is kept in declaration order of [`crate::config::REQUIRED_VARS`].
    #[error("Missing required environment variables: {}", .missing.join(", "))]
    MissingConfiguration { missing: Vec<&'static str> },

    #[error("Bot entrypoint command is empty")]
    EmptyEntrypoint,
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_configuration_lists_keys() {
        let err = ConfigError::MissingConfiguration {
            missing: vec!["BOT_TOKEN", "OWNER_ID"],
        };
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: BOT_TOKEN, OWNER_ID"
        );
    }
}
