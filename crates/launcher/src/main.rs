use clap::Parser;
use launcher::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Load .env before clap reads BOT_ENTRYPOINT
    forwardbot_shared::init_env();

    let cli = Cli::parse();

    match launcher::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("forwardbot fatal: {e:#}");
            ExitCode::FAILURE
        }
    }
}
