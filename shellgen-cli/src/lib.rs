//! `shellgen` entry point: the TUI wizard by default, subcommands for scripting.

pub mod generate;
pub mod list;

use anyhow::Context;
use clap::Parser;
use shellgen_core::backend::HttpBackend;
use shellgen_core::cli::{Cli, Command};
use shellgen_core::config::Config;
use shellgen_core::logging;
use std::sync::Arc;

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The wizard owns the terminal, so its logs go to a file.
    if cli.command.is_none() && !cli.dump_tui {
        logging::init_with(cli.log_file.clone());
    } else {
        logging::init();
    }

    let config =
        Config::resolve(&cli.config_overrides()).context("Failed to resolve configuration")?;

    if cli.dump_tui {
        print!("{}", shellgen_tui::wizard::dump_all_steps(&config));
        return Ok(());
    }

    let backend = HttpBackend::new(&config)?;

    match &cli.command {
        // No subcommand = launch the wizard (default)
        None => {
            log::info!("🎉 Launching wizard against {}", config.api_base);
            shellgen_tui::wizard::run(&config, Arc::new(backend))?;
        }
        Some(Command::List { target }) => {
            print!("{}", list::run(&backend, target)?);
        }
        Some(Command::Generate {
            shell,
            features,
            format,
            options,
            client,
            download_dir,
        }) => {
            let args = generate::GenerateArgs {
                shell,
                features,
                format,
                options,
                client,
            };
            let report = generate::run(&backend, &config, &args, download_dir.as_deref())?;
            print!("{}", report);
        }
    }
    Ok(())
}
