//! List command - print every document in a collection.

use std::path::PathBuf;

use canopy::jobs::list_documents;
use canopy::remote::{Firestore, RemoteConfig};

pub fn run(
    collection: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = RemoteConfig::load(config.as_deref())?;
    if let Some(c) = collection {
        config = config.with_collection(c);
    }

    let store = Firestore::from_config(&config)?;
    for (id, fields) in list_documents(&store, &config.collection)? {
        println!("{} {}", id, serde_json::to_string(&fields)?);
    }

    Ok(())
}
