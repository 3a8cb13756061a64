mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "pob=debug,pob_builds=debug,pob_cli=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Decode {
            input,
            format,
            trace,
        } => {
            commands::decode::decode(&input, format, trace)?;
        }

        Commands::Validate { input } => {
            commands::decode::validate(&input)?;
        }

        Commands::Xml { input, output } => {
            commands::decode::xml(&input, output.as_deref())?;
        }

        Commands::Encode { input } => {
            commands::decode::encode(&input)?;
        }

        Commands::Trade(args) => {
            commands::trade::handle(&args)?;
        }

        Commands::Builds { command } => {
            commands::builds::handle(command)?;
        }

        Commands::Configure {
            league,
            status,
            db,
            show,
        } => {
            commands::configure::handle(league, status, db, show)?;
        }
    }

    Ok(())
}
