mod cli;
mod config;
mod models;
mod prayer_times;
mod spaces;
mod tui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;

    match cli.command {
        Some(Commands::Setup(args)) => handlers::handle_setup(&mut config, &args)?,
        Some(Commands::Times { date, source }) => handlers::handle_times(&config, date, source)?,
        Some(Commands::Next { at, watch, source }) => {
            handlers::handle_next(&config, at, watch, source)?
        }
        Some(Commands::Countdown { source }) => tui::app::run(config, source)?,
        Some(Commands::Spaces(args)) => handlers::handle_spaces(&config, &args)?,
        Some(Commands::Register(args)) => handlers::handle_register(args)?,
        Some(Commands::Methods) => handlers::handle_methods()?,

        // No subcommand → launch the countdown
        None => tui::app::run(config, None)?,
    }

    Ok(())
}
