use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::check::CheckArgs;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            config,
            permitted,
            whitelist,
            corrections,
            corrections_data,
            provenance_data,
            require_provenance,
            require_provenance_match,
            production,
            errors_only,
            quiet,
            ndjson,
            output,
        } => commands::handle_check(CheckArgs {
            input,
            config,
            permitted,
            whitelist,
            corrections,
            corrections_data,
            provenance_data,
            require_provenance,
            require_provenance_match,
            production,
            errors_only,
            quiet,
            ndjson,
            output,
        }),
        Commands::Init { preset } => commands::handle_init(preset),
        Commands::Config { show, validate } => commands::handle_config(show, validate),
    }
}
