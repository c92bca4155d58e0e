//! Forward Bot Launcher - startup gate for the Telegram auto forward bot
//!
//! Checks the deployment environment, prints a configuration summary and
//! replaces itself with the bot process.

pub mod banner;
pub mod cli;
pub mod gate;
pub mod handoff;
pub mod verify;

use anyhow::{Context, Result};
use cli::{Cli, Commands};
use forwardbot_core::Entrypoint;
use forwardbot_core::config::env_lookup;
use forwardbot_shared::{LogSettings, init_tracing};
use gate::Decision;
use std::io::{self, Write};
use std::process::ExitCode;

/// Run the launcher
///
/// Returns only when the bot was not started: either the gate refused,
/// verification finished, or the hand-off itself failed.
pub fn run(cli: Cli) -> Result<ExitCode> {
    // The guard must outlive every log call before the hand-off
    let guard = init_tracing("launcher", &LogSettings::from_env());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or_default() {
        Commands::Start => match gate::run(&mut out, env_lookup, &cli.entrypoint)? {
            Decision::Refuse(_) => Ok(ExitCode::from(Decision::REFUSED_EXIT_CODE)),
            Decision::HandOff(handoff) => {
                drop(out);
                // exec skips destructors, so flush file logs now
                drop(guard);

                let err = handoff::exec(&handoff.entrypoint);
                tracing::error!(entrypoint = %handoff.entrypoint, error = %err, "Failed to start bot");

                let mut out = io::stdout().lock();
                writeln!(out, "❌ Failed to start bot ({} start): {err}", handoff.entrypoint)?;
                out.flush()?;
                Ok(ExitCode::from(handoff::exit_code_for(&err)))
            }
        },
        Commands::Verify { config_file } => {
            let entrypoint =
                Entrypoint::parse(&cli.entrypoint).context("Invalid --entrypoint")?;
            let options = verify::VerifyOptions::new(config_file, entrypoint);
            let report = verify::run(&mut out, env_lookup, &options)?;
            Ok(ExitCode::from(report.exit_code()))
        }
    }
}
