use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize dotenvy
pub fn init_env() {
    dotenvy::dotenv().ok();
}

/// Where diagnostics go besides stderr
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Also write JSON logs to `log_dir`
    pub enable_file_logging: bool,

    /// Directory for JSON log files
    pub log_dir: PathBuf,
}

impl LogSettings {
    /// Read `ENABLE_FILE_LOGGING` and `LOG_DIR`
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("ENABLE_FILE_LOGGING").ok().as_deref(),
            std::env::var("LOG_DIR").ok().as_deref(),
        )
    }

    fn from_values(enable: Option<&str>, log_dir: Option<&str>) -> Self {
        // File logging is opt-in: stdout belongs to the banner and the bot.
        let enable_file_logging = enable
            .map(|v| v.to_lowercase() != "false" && v != "0" && !v.is_empty())
            .unwrap_or(false);

        Self {
            enable_file_logging,
            log_dir: PathBuf::from(log_dir.unwrap_or("logs")),
        }
    }
}

/// Log file name for a service, stamped with the start time
pub fn log_file_name(service_name: &str, now: chrono::DateTime<chrono::Local>) -> String {
    format!(
        "forwardbot-{}.log.{}.jsonl",
        service_name,
        now.format("%y-%m-%d-%H-%M-%S")
    )
}

/// Initialize tracing on stderr with optional JSON file logging
///
/// The returned guard flushes the file writer when dropped. Callers that
/// replace the process image must drop it first. If the log file cannot be
/// opened, logging continues on stderr only.
pub fn init_tracing(
    service_name: &str,
    settings: &LogSettings,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let default_filter = format!("warn,{service_name}=info");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    if !settings.enable_file_logging {
        registry.init();
        return None;
    }

    match open_log_file(service_name, &settings.log_dir) {
        Ok(file_appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .json();

            registry.with(file_layer).init();

            Some(guard)
        }
        Err(e) => {
            registry.init();
            tracing::warn!("File logging disabled: {:#}", e);
            None
        }
    }
}

fn open_log_file(service_name: &str, log_dir: &Path) -> Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(log_file_name(service_name, chrono::Local::now()))
        .build(log_dir)
        .with_context(|| format!("Failed to open log file in {}", log_dir.display()))
}
