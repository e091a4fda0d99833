use clap::Parser;
use kube_aegis::{
    cli::{Cli, Commands},
    config::{self, Config},
    run_command,
};
use std::process;

/// Exit status when a command could not run at all.
const EXIT_FAILURE: i32 = 2;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(EXIT_FAILURE);
        }
    }
}

fn run() -> kube_aegis::Result<i32> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration; health must report even when the config is broken
    let (config, source) = match config::load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) if matches!(cli.command, Commands::Health { .. }) => {
            log::warn!("{}", e);
            (Config::default(), None)
        }
        Err(e) => return Err(e),
    };

    if !config.output.color {
        colored::control::set_override(false);
    }

    let verdict = run_command(cli.command, &config, source.as_deref(), cli.quiet)?;
    Ok(verdict.exit_code())
}
