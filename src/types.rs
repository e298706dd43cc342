use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A job listing as scraped from the source site, fields still free-text.
///
/// Every listing carries a non-empty `title` and `url`; the collector skips
/// cards without a title and falls back to the results-page URL when a card
/// has no link. All other fields may be empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub contract: String,
    pub salary: String,
    pub url: String,
    pub scraped_at: String,
}

/// A normalized listing ready for analysis.
///
/// Field order is the clean file's column order. `annual_gross_salary` is in
/// euros per year regardless of how the source expressed the figure, and is
/// left empty when the text could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanListing {
    pub title: String,
    pub annual_gross_salary: Option<f64>,
    pub city: Option<String>,
    pub department: Option<String>,
    pub contract_type: String,
    pub company: String,
    pub url: String,
    pub scraped_at: String,
}

/// Core trait that all listing sources must implement
#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    /// Unique identifier for this source/crawler
    fn source_name(&self) -> &'static str;

    /// Fetch up to `target` raw listings matching `query`
    async fn fetch_listings(&self, query: &str, target: usize) -> Result<Vec<RawListing>>;
}
