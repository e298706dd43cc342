//! Collection of raw listings from a source site into the raw CSV file.

pub mod hellowork;

use crate::error::{EtlError, Result};
use crate::types::ListingSource;
use std::fs;
use std::path::Path;
use tracing::{info, instrument};

/// Result of a complete collection run
#[derive(Debug)]
pub struct CollectResult {
    pub source_name: String,
    pub collected: usize,
    pub output_file: String,
}

/// Fetches up to `target` listings from `source` and writes them to
/// `output_path` as a semicolon-delimited CSV, rewritten in full.
#[instrument(skip(source), fields(source_name = %source.source_name()))]
pub async fn run_collector(
    source: &dyn ListingSource,
    query: &str,
    target: usize,
    output_path: &Path,
) -> Result<CollectResult> {
    let source_name = source.source_name().to_string();
    info!("Starting collection from {}", source_name);

    let listings = source.fetch_listings(query, target).await?;
    info!("Fetched {} raw listings", listings.len());

    if listings.is_empty() {
        return Err(EtlError::Source {
            message: format!("no listings collected from {source_name}"),
        });
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(output_path).map_err(|e| EtlError::Output {
        path: output_path.display().to_string(),
        message: format!("cannot create raw listings file: {e}"),
    })?;
    let mut writer = csv::WriterBuilder::new().delimiter(b';').from_writer(file);
    for listing in &listings {
        writer.serialize(listing)?;
    }
    writer.flush()?;

    info!("Saved {} listings to {}", listings.len(), output_path.display());

    Ok(CollectResult {
        source_name,
        collected: listings.len(),
        output_file: output_path.display().to_string(),
    })
}
