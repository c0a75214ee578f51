mod commands;
mod signal;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, interfaces, scan};
use terminal::logging;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    logging::init_logging(commands.verbose);

    let cfg = commands.config();

    let result: anyhow::Result<()> = match commands.command.unwrap_or(Commands::Scan) {
        Commands::Scan => scan::scan(&cfg).await,
        Commands::Interfaces => interfaces::interfaces(&cfg),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
