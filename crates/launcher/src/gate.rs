//! Startup gate
//!
//! Decides once, from the environment, whether the bot may start. There are
//! exactly two outcomes: refuse with exit status 1, or hand off to the bot.
//! Missing configuration is checked before the entrypoint is parsed.

use crate::banner;
use forwardbot_core::{ConfigError, Entrypoint, LaunchConfig};
use std::io::{self, Write};

/// Everything needed to replace this process with the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOff {
    pub config: LaunchConfig,
    pub entrypoint: Entrypoint,
}

/// Outcome of the gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// All required configuration is present
    HandOff(HandOff),
    /// Required configuration is missing or the entrypoint is empty; the bot
    /// must not be started
    Refuse(ConfigError),
}

impl Decision {
    /// Exit status for a refused start
    pub const REFUSED_EXIT_CODE: u8 = 1;
}

/// Evaluate the gate without producing any output
pub fn evaluate<F>(lookup: F, entrypoint: &str) -> Decision
where
    F: Fn(&str) -> Option<String>,
{
    let config = match LaunchConfig::from_lookup(lookup) {
        Ok(config) => config,
        Err(err) => return Decision::Refuse(err),
    };

    match Entrypoint::parse(entrypoint) {
        Ok(entrypoint) => Decision::HandOff(HandOff { config, entrypoint }),
        Err(err) => Decision::Refuse(err),
    }
}

/// Evaluate the gate and print the matching banner
pub fn run<W, F>(out: &mut W, lookup: F, entrypoint: &str) -> io::Result<Decision>
where
    W: Write,
    F: Fn(&str) -> Option<String>,
{
    let decision = evaluate(lookup, entrypoint);

    match &decision {
        Decision::Refuse(err) => {
            tracing::error!(error = %err, "Refusing to start bot");
            match err {
                ConfigError::MissingConfiguration { .. } => {
                    banner::write_missing_configuration(out)?;
                }
                ConfigError::EmptyEntrypoint => banner::write_empty_entrypoint(out)?,
            }
        }
        Decision::HandOff(handoff) => {
            banner::write_startup(out, &handoff.config)?;
            tracing::info!(
                entrypoint = %handoff.entrypoint,
                owner_id = %handoff.config.owner_id,
                "Handing off to bot"
            );
        }
    }

    out.flush()?;
    Ok(decision)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forwardbot_core::config::DEFAULT_ENTRYPOINT;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            ("API_ID", "123456"),
            ("API_HASH", "0123456789abcdef"),
            ("BOT_TOKEN", "123:ABC"),
            ("MONGO_URI", "mongodb://localhost:27017"),
            ("OWNER_ID", "5482682830"),
        ]
    }

    fn run_to_string(pairs: &[(&str, &str)]) -> (Decision, String) {
        let mut out = Vec::new();
        let decision = run(&mut out, lookup_from(pairs), DEFAULT_ENTRYPOINT).unwrap();
        (decision, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_hands_off_when_all_required_present() {
        let (decision, text) = run_to_string(&required());

        match decision {
            Decision::HandOff(handoff) => {
                assert_eq!(handoff.entrypoint.start_args(), vec!["main.py", "start"]);
                assert_eq!(handoff.config.owner_id, "5482682830");
            }
            Decision::Refuse(err) => panic!("unexpected refusal: {err}"),
        }
        assert!(text.contains("Database: forward_bot"));
        assert!(text.contains("Log Channel: Not Set"));
    }

    #[test]
    fn test_refuses_when_owner_id_unset() {
        let pairs: Vec<_> = required()
            .into_iter()
            .filter(|(k, _)| *k != "OWNER_ID")
            .collect();
        let (decision, text) = run_to_string(&pairs);

        assert_eq!(
            decision,
            Decision::Refuse(ConfigError::MissingConfiguration {
                missing: vec!["OWNER_ID"]
            })
        );
        assert!(text.contains("Missing required environment variables"));
        assert!(!text.contains("Launching bot"));
    }

    #[test]
    fn test_refuses_every_subset_of_missing_required() {
        let all = required();
        // Each bit of the mask keeps one required variable; 0b11111 keeps all.
        for mask in 0u8..0b11111 {
            let pairs: Vec<_> = all
                .iter()
                .enumerate()
                .map(|(i, (k, v))| if mask & (1 << i) != 0 { (*k, *v) } else { (*k, "") })
                .collect();

            let decision = evaluate(lookup_from(&pairs), DEFAULT_ENTRYPOINT);
            assert!(
                matches!(decision, Decision::Refuse(_)),
                "mask {mask:#07b} should be refused"
            );
        }
    }

    #[test]
    fn test_optional_values_echoed() {
        let mut pairs = required();
        pairs.push(("MONGO_DB_NAME", "prod_db"));
        pairs.push(("LOG_CHANNEL", "-1001234567890"));

        let (decision, text) = run_to_string(&pairs);

        assert!(matches!(decision, Decision::HandOff(_)));
        assert!(text.contains("Database: prod_db"));
        assert!(text.contains("Log Channel: -1001234567890"));
    }

    #[test]
    fn test_missing_configuration_reported_before_empty_entrypoint() {
        let pairs: Vec<_> = required()
            .into_iter()
            .filter(|(k, _)| *k != "API_ID")
            .collect();
        let mut out = Vec::new();
        let decision = run(&mut out, lookup_from(&pairs), "   ").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(
            decision,
            Decision::Refuse(ConfigError::MissingConfiguration {
                missing: vec!["API_ID"]
            })
        );
        assert!(text.contains("Missing required environment variables"));
    }

    #[test]
    fn test_empty_entrypoint_refused_with_complete_configuration() {
        let mut out = Vec::new();
        let decision = run(&mut out, lookup_from(&required()), "").unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(decision, Decision::Refuse(ConfigError::EmptyEntrypoint));
        assert!(text.contains("Bot entrypoint command is empty"));
        assert!(!text.contains("Launching bot"));
    }
}
