use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use human_panic::setup_panic;

use mmadapt::cli::{get_log_file, get_matches, get_verbosity};
use mmadapt::commands::run_command;
use mmadapt::config::load_or_default;
use mmadapt::logging::{format_message, init_logger};

fn main() {
    setup_panic!();

    if let Err(e) = run() {
        let message = format!("Error: {e:#}");
        eprintln!("{}", format_message(&message, &message.red().to_string()));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let matches = get_matches();

    let config_path = matches
        .get_one::<String>("config")
        .map(PathBuf::from)
        .unwrap_or_default();
    let config = load_or_default(config_path)?;

    let log_file = get_log_file(&matches, config.log_file.as_deref())?;
    let verbosity = get_verbosity(&matches, config.log_level.as_deref())?;
    init_logger(verbosity, &log_file)?;

    for produced in run_command(&matches, &config)? {
        let text = produced.display().to_string();
        println!("{}", format_message(&text, &text.green().to_string()));
    }

    Ok(())
}
