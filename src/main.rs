use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

mod acquire;
mod api;
mod artifact;
mod cli;
mod collection;
mod command;
mod config;
mod deck;
mod edit;
mod error;
mod extract;
mod generate;
mod model;
mod service;

#[cfg(test)]
mod testing;

use cli::{Cli, Commands};
use command::GenerateOptions;
use config::Settings;
use error::DeckError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::from_cli(&cli);
    debug!(?settings, "Resolved settings");

    if let Err(err) = run(&settings, cli.command).await {
        match err.downcast_ref::<DeckError>() {
            Some(deck_err) => eprintln!(
                "❌ {:#} ({})",
                err,
                deck_err.category().describe()
            ),
            None => eprintln!("❌ {:#}", err),
        }
        std::process::exit(1);
    }
}

async fn run(settings: &Settings, command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Show { source, slide }) => {
            command::run_show(settings, &source, slide).await?;
        }
        Some(Commands::Export { source, output }) => {
            command::run_export(settings, &source, output).await?;
        }
        Some(Commands::Edit {
            source,
            set,
            set_name,
            export,
        }) => {
            command::run_edit(settings, &source, &set, &set_name, export).await?;
        }
        Some(Commands::Generate {
            text,
            theme,
            length,
            interval_secs,
            max_polls,
            download,
        }) => {
            let options = GenerateOptions {
                text,
                theme,
                length,
                interval_secs,
                max_polls,
                download,
            };
            command::run_generate(settings, options).await?;
        }
        Some(Commands::Interactive) | None => {
            command::run_interactive(settings).await?;
        }
    }

    Ok(())
}
