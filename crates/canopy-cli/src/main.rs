//! Canopy CLI - clean and publish tree inventory spreadsheets.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            delimiter,
        } => commands::clean::run(input, output, delimiter, cli.verbose),

        Commands::Rehost {
            input,
            output,
            config,
        } => commands::rehost::run(input, output, config, cli.verbose),

        Commands::Upload {
            input,
            collection,
            config,
        } => commands::upload::run(input, collection, config),

        Commands::List { collection, config } => commands::list::run(collection, config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
