//! Fixed console output of the startup gate
//!
//! Everything here goes to stdout so container platforms capture it next to
//! the bot's own output. None of it is meant to be machine-parsed.

use forwardbot_core::LaunchConfig;
use forwardbot_core::config::{DEFAULT_ENTRYPOINT, REQUIRED_VARS};
use std::io::{self, Write};

/// Horizontal rule used by the verify report
pub const RULE: &str = "============================================================";

/// Error banner for a refused start
///
/// Lists every required variable rather than the ones actually missing.
pub fn write_missing_configuration<W: Write>(out: &mut W) -> io::Result<()> {
    let required: Vec<&str> = REQUIRED_VARS.iter().map(|var| var.name).collect();

    writeln!(out, "❌ ERROR: Missing required environment variables!")?;
    writeln!(out, "Required: {}", required.join(", "))?;
    writeln!(
        out,
        "Please set them in your Heroku config vars or Docker environment."
    )?;
    Ok(())
}

/// Error banner for an empty `BOT_ENTRYPOINT` / `--entrypoint`
pub fn write_empty_entrypoint<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "❌ ERROR: Bot entrypoint command is empty!")?;
    writeln!(out, "Set BOT_ENTRYPOINT or pass --entrypoint (default: {DEFAULT_ENTRYPOINT})")?;
    Ok(())
}

/// Startup banner and configuration summary printed before the hand-off
pub fn write_startup<W: Write>(out: &mut W, config: &LaunchConfig) -> io::Result<()> {
    writeln!(out, "🚀 Starting Telegram Auto Forward Bot...")?;
    writeln!(out, "✅ All required environment variables are set")?;
    writeln!(out, "📋 Configuration:")?;
    writeln!(out, "   👤 Owner ID: {}", config.owner_id)?;
    writeln!(out, "   🗄️  Database: {}", config.mongo_db_name_or_default())?;
    writeln!(out, "   📢 Log Channel: {}", config.log_channel_display())?;
    writeln!(out, "🤖 Launching bot...")?;
    Ok(())
}
