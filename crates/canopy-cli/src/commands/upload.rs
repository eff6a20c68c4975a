//! Upload command - write rows as documents.

use std::path::PathBuf;

use canopy::jobs::Uploader;
use canopy::remote::{Firestore, RemoteConfig};
use colored::Colorize;

pub fn run(
    input: PathBuf,
    collection: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !input.exists() {
        return Err(format!("File not found: {}", input.display()).into());
    }

    let mut config = RemoteConfig::load(config.as_deref())?;
    if let Some(c) = collection {
        config = config.with_collection(c);
    }

    let store = Firestore::from_config(&config)?;
    let report = Uploader::new(&store, config.collection.clone()).run(&input)?;

    println!(
        "{} {} documents to '{}'",
        "Uploaded".green().bold(),
        report.documents,
        report.collection
    );

    Ok(())
}
