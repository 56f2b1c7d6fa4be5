pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "lookbook",
    about = "Lookbook operator CLI",
    long_about = "Operate Lookbook migrations, batch co-occurrence counting, index builds, and config inspection.",
    after_help = "Examples:\n  lookbook migrate\n  lookbook count\n  lookbook index\n  lookbook config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog into the item store")]
    Seed,
    #[command(
        about = "Count attribute-key co-occurrence over all outfit groups and persist the counter blob"
    )]
    Count,
    #[command(about = "Build the bounded top-K index from the persisted counter blob")]
    Index,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Count => commands::count::run(),
        Command::Index => commands::index::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
