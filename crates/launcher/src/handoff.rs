//! Process hand-off to the bot
//!
//! On Unix the launcher's image is replaced with `exec`, keeping the PID so
//! the platform supervises the bot directly. Elsewhere the bot is spawned and
//! its exit status propagated.

use forwardbot_core::Entrypoint;
use std::io;
use std::process::Command;

/// Exit status when the entrypoint program does not exist
pub const NOT_FOUND_EXIT_CODE: u8 = 127;

/// Exit status when the entrypoint exists but cannot be executed
pub const NOT_EXECUTABLE_EXIT_CODE: u8 = 126;

/// Build the command `<program> <args...> start`
pub fn command(entrypoint: &Entrypoint) -> Command {
    let mut command = Command::new(&entrypoint.program);
    command.args(entrypoint.start_args());
    command
}

/// Replace the current process with the bot
///
/// Only returns if the program could not be executed.
#[cfg(unix)]
pub fn exec(entrypoint: &Entrypoint) -> io::Error {
    use std::os::unix::process::CommandExt;

    command(entrypoint).exec()
}

/// Run the bot as a child and exit with its status
///
/// Only returns if the program could not be spawned.
#[cfg(not(unix))]
pub fn exec(entrypoint: &Entrypoint) -> io::Error {
    match command(entrypoint).status() {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(err) => err,
    }
}

/// Exit status for a failed hand-off, following `sh`
pub fn exit_code_for(err: &io::Error) -> u8 {
    match err.kind() {
        io::ErrorKind::NotFound => NOT_FOUND_EXIT_CODE,
        _ => NOT_EXECUTABLE_EXIT_CODE,
    }
}
