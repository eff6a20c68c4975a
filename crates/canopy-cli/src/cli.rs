//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Canopy: clean and publish tree inventory spreadsheets
#[derive(Parser)]
#[command(name = "canopy")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalize an exported inventory into the nine-column layout
    Clean {
        /// Path to the exported file (CSV/TSV/...)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (default: <input>_cleaned.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter; sniffed from the file when omitted
        #[arg(long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,
    },

    /// Copy row images into the storage bucket and rewrite Image URLs
    Rehost {
        /// Path to a cleaned table
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (default: <input>_rehosted.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file (default: ./canopy.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write every row as a document into the database
    Upload {
        /// Path to a cleaned table
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Target collection (overrides the config)
        #[arg(long)]
        collection: Option<String>,

        /// Config file (default: ./canopy.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print every document in a collection
    List {
        /// Collection to list (overrides the config)
        #[arg(long)]
        collection: Option<String>,

        /// Config file (default: ./canopy.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Accept a single ASCII character, or `\t` / `tab` for tabs.
fn parse_delimiter(value: &str) -> Result<u8, String> {
    if matches!(value, "\\t" | "tab") {
        return Ok(b'\t');
    }
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(format!(
            "delimiter must be a single ASCII character, got '{}'",
            value
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(";"), Ok(b';'));
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("\t"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("é").is_err());
    }

    #[test]
    fn test_parse_clean_args() {
        let cli = Cli::try_parse_from(["canopy", "-v", "clean", "trees.csv", "--delimiter", "|"])
            .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Clean {
                input,
                output,
                delimiter,
            } => {
                assert_eq!(input, PathBuf::from("trees.csv"));
                assert!(output.is_none());
                assert_eq!(delimiter, Some(b'|'));
            }
            _ => panic!("expected clean"),
        }
    }
}
