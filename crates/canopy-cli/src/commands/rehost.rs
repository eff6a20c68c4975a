//! Rehost command - copy row images into the storage bucket.

use std::path::PathBuf;

use canopy::default_output_path;
use canopy::jobs::Rehoster;
use canopy::remote::{CloudStorage, HttpImageFetcher, RemoteConfig};
use colored::Colorize;

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let config = RemoteConfig::load(config.as_deref())?;
    let output = output.unwrap_or_else(|| default_output_path(&input, "_rehosted"));

    let fetcher = HttpImageFetcher::new(&config)?;
    let storage = CloudStorage::from_config(&config)?;

    println!(
        "{} {} to {}",
        "Re-hosting images from".cyan().bold(),
        input.display().to_string().white(),
        config.require_bucket()?.white()
    );

    let report = Rehoster::new(&fetcher, &storage)
        .with_object_prefix(config.object_prefix.clone())
        .run(&input, &output)?;

    let tally = &report.tally;
    println!(
        "Re-hosted {} of {} rows ({} failed, {} without image)",
        tally.rehosted.to_string().green().bold(),
        tally.rows,
        tally.failed.to_string().red(),
        tally.without_image.to_string().yellow()
    );
    if verbose && tally.failed > 0 {
        println!("Rows that failed keep their original image URL.");
    }
    println!("Wrote {}", report.output.display());

    Ok(())
}
