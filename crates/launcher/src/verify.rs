//! Deployment verification
//!
//! Reports on the environment the bot is about to run in without starting
//! it. Every check runs; the report fails if any of them failed.

use crate::banner::RULE;
use forwardbot_core::Entrypoint;
use forwardbot_core::config::{NUMERIC_VARS, OPTIONAL_VARS, REQUIRED_VARS, non_empty};
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Keys that must be present and non-empty in `config.json`
pub const CONFIG_FILE_KEYS: [&str; 5] = ["api_id", "api_hash", "bot_token", "mongo_uri", "owner_id"];

/// Inputs to the verification run
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// Bot configuration file, checked only if it exists
    pub config_file: PathBuf,

    /// Marker file present inside Docker containers
    pub dockerenv_path: PathBuf,

    /// Program the launcher would hand off to
    pub entrypoint: Entrypoint,
}

impl VerifyOptions {
    pub fn new(config_file: PathBuf, entrypoint: Entrypoint) -> Self {
        Self {
            config_file,
            dockerenv_path: PathBuf::from("/.dockerenv"),
            entrypoint,
        }
    }
}

/// Result of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
}

/// Result of all checks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub checks: Vec<CheckOutcome>,
}

impl VerifyReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| check.name)
    }

    pub fn exit_code(&self) -> u8 {
        u8::from(!self.all_passed())
    }
}

/// Run every check, printing the report to `out`
pub fn run<W, F>(out: &mut W, lookup: F, options: &VerifyOptions) -> io::Result<VerifyReport>
where
    W: Write,
    F: Fn(&str) -> Option<String>,
{
    writeln!(out, "{RULE}")?;
    writeln!(out, "🤖 TELEGRAM AUTO FORWARD BOT")?;
    writeln!(out, "   Deployment Verification")?;
    writeln!(out, "{RULE}")?;

    let mut report = VerifyReport::default();
    let mut record = |name, passed| report.checks.push(CheckOutcome { name, passed });

    record("docker", check_docker(out, &options.dockerenv_path)?);
    record("heroku", check_heroku(out, &lookup)?);
    record("entrypoint", check_entrypoint(out, &lookup, &options.entrypoint)?);
    record("config_file", check_config_file(out, &options.config_file)?);
    record("environment", check_environment(out, &lookup)?);

    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    if report.all_passed() {
        writeln!(out, "✅ ALL CHECKS PASSED!")?;
        writeln!(out, "{RULE}")?;
        writeln!(out)?;
        writeln!(out, "💡 You can now start the bot with:")?;
        writeln!(out, "   forwardbot start")?;
    } else {
        writeln!(out, "❌ SOME CHECKS FAILED!")?;
        writeln!(out, "{RULE}")?;
        writeln!(out)?;
        writeln!(out, "💡 Please fix the issues above and try again.")?;
    }
    writeln!(out, "{RULE}")?;
    out.flush()?;

    let failed: Vec<_> = report.failed().collect();
    if failed.is_empty() {
        tracing::info!("Deployment verification passed");
    } else {
        tracing::warn!(?failed, "Deployment verification failed");
    }

    Ok(report)
}

fn check_docker<W: Write>(out: &mut W, dockerenv_path: &Path) -> io::Result<bool> {
    writeln!(out, "\n🔍 Checking Docker Environment...")?;
    if dockerenv_path.exists() {
        writeln!(out, "   ✅ Running in Docker container")?;
    } else {
        writeln!(out, "   ℹ️  Not running in Docker (local/Heroku deployment)")?;
    }
    Ok(true)
}

fn check_heroku<W, F>(out: &mut W, lookup: &F) -> io::Result<bool>
where
    W: Write,
    F: Fn(&str) -> Option<String>,
{
    writeln!(out, "\n🔍 Checking Heroku Environment...")?;
    match non_empty(lookup, "DYNO") {
        Some(dyno) => {
            writeln!(out, "   ✅ Running on Heroku")?;
            writeln!(out, "   📦 Dyno: {dyno}")?;
        }
        None => writeln!(out, "   ℹ️  Not running on Heroku")?,
    }
    Ok(true)
}

fn check_entrypoint<W, F>(out: &mut W, lookup: &F, entrypoint: &Entrypoint) -> io::Result<bool>
where
    W: Write,
    F: Fn(&str) -> Option<String>,
{
    writeln!(out, "\n🔍 Checking Bot Entrypoint...")?;
    let path_var = lookup("PATH");
    match resolve_program(&entrypoint.program, path_var.as_deref()) {
        Some(resolved) => {
            writeln!(out, "   ✅ {}: {}", entrypoint.program, resolved.display())?;
            writeln!(out, "   🤖 Command: {} start", entrypoint)?;
            Ok(true)
        }
        None => {
            writeln!(out, "   ❌ {}: Not found", entrypoint.program)?;
            writeln!(out, "\n💡 Set BOT_ENTRYPOINT or pass --entrypoint")?;
            Ok(false)
        }
    }
}

fn check_config_file<W: Write>(out: &mut W, path: &Path) -> io::Result<bool> {
    writeln!(out, "\n🔍 Checking Config File...")?;

    if !path.exists() {
        writeln!(
            out,
            "   ⚠️  {} not found (will use environment variables)",
            path.display()
        )?;
        return Ok(true);
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            writeln!(out, "   ❌ Error reading {}: {err}", path.display())?;
            return Ok(false);
        }
    };

    let Ok(config) = serde_json::from_str::<Value>(&contents) else {
        writeln!(out, "   ❌ {} is not valid JSON!", path.display())?;
        return Ok(false);
    };

    let missing = missing_config_keys(&config);
    if !missing.is_empty() {
        writeln!(
            out,
            "   ❌ Missing keys in {}: {}",
            path.display(),
            missing.join(", ")
        )?;
        return Ok(false);
    }

    writeln!(out, "   ✅ {} is valid!", path.display())?;
    Ok(true)
}

fn check_environment<W, F>(out: &mut W, lookup: &F) -> io::Result<bool>
where
    W: Write,
    F: Fn(&str) -> Option<String>,
{
    writeln!(out, "\n🔍 Checking Environment Variables...")?;

    let mut missing = Vec::new();
    for var in REQUIRED_VARS {
        if non_empty(lookup, var.name).is_some() {
            writeln!(out, "   ✅ {}: Set", var.name)?;
        } else {
            missing.push(var);
        }
    }

    for var in OPTIONAL_VARS {
        if non_empty(lookup, var.name).is_some() {
            writeln!(out, "   ✅ {}: Set (optional)", var.name)?;
        } else {
            writeln!(
                out,
                "   ⚠️  {}: Not set (optional - {})",
                var.name, var.description
            )?;
        }
    }

    let malformed: Vec<&str> = NUMERIC_VARS
        .iter()
        .copied()
        .filter(|name| {
            non_empty(lookup, name).is_some_and(|value| value.trim().parse::<i64>().is_err())
        })
        .collect();

    if !missing.is_empty() {
        writeln!(out, "\n❌ Missing Required Variables:")?;
        for var in &missing {
            writeln!(out, "   ❌ {}: Not set ({})", var.name, var.description)?;
        }
    }

    if !malformed.is_empty() {
        writeln!(out, "\n❌ Variables That Must Be Numeric:")?;
        for name in &malformed {
            writeln!(out, "   ❌ {name}: Not a valid integer")?;
        }
    }

    if missing.is_empty() && malformed.is_empty() {
        writeln!(out, "\n✅ All required environment variables are set!")?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Keys of `config.json` that are absent or falsy
fn missing_config_keys(config: &Value) -> Vec<&'static str> {
    CONFIG_FILE_KEYS
        .iter()
        .copied()
        .filter(|key| !config.get(key).is_some_and(is_truthy))
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Locate a program the way `exec` would
///
/// Names containing a path separator are checked as paths; bare names are
/// searched in `path_var`.
pub fn resolve_program(program: &str, path_var: Option<&str>) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    std::env::split_paths(path_var?)
        .map(|dir| dir.join(program))
        .find(|path| is_executable(path))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
