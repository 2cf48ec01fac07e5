#![allow(unexpected_cfgs)]
#![cfg(not(tarpaulin_include))]

mod commands;
mod error;
mod util;
use argh::FromArgs;
use core::error::Error;

#[derive(FromArgs, Debug)]
/// Identify and preview game texture files
struct TopLevel {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs, Debug)]
#[argh(subcommand)]
enum Commands {
    Identify(commands::identify::IdentifyCmd),
    Preview(commands::preview::PreviewCmd),
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli: TopLevel = argh::from_env();

    match cli.command {
        Commands::Identify(cmd) => {
            commands::identify::handle_identify_command(cmd)?;
        }
        Commands::Preview(cmd) => {
            commands::preview::handle_preview_command(cmd)?;
        }
    }

    Ok(())
}
