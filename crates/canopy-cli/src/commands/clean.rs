//! Clean command - normalize an exported inventory.

use std::path::PathBuf;

use canopy::{CleanConfig, CleanPipeline, Dialect, SizeTally, default_output_path};
use colored::Colorize;

pub fn run(
    input: PathBuf,
    output: Option<PathBuf>,
    delimiter: Option<u8>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let output = output.unwrap_or_else(|| default_output_path(&input, "_cleaned"));

    let mut config = CleanConfig::default();
    if let Some(d) = delimiter {
        config = config.with_dialect(Dialect::with_delimiter(d));
    }

    let report = CleanPipeline::with_config(config).run(&input, &output)?;

    if verbose {
        println!(
            "{} {} ({})",
            "Read".cyan().bold(),
            input.display().to_string().white(),
            if report.dialect.sniffed {
                format!("sniffed {}", report.dialect.format())
            } else {
                report.dialect.format().to_string()
            }
        );
        println!(
            "Images: {} explicit, {} from description, {} missing",
            report.explicit_images.to_string().green(),
            report.extracted_images.to_string().blue(),
            report.missing_images.to_string().yellow()
        );
        print_tally("Diameter", &report.diameter);
        print_tally("Length", &report.length);
    }

    println!(
        "Processed {} rows and wrote {}",
        report.rows,
        report.output.display()
    );

    Ok(())
}

fn print_tally(label: &str, tally: &SizeTally) {
    println!(
        "{}: {} keyword, {} numeric, {} unclassified",
        label.yellow().bold(),
        tally.keyword,
        tally.numeric,
        tally.unclassified.to_string().red()
    );
}
