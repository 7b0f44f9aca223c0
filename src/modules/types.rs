use derive_more::with_trait::Display;
use serde::{Deserialize, Serialize};

/// Outcome of crawling a single page.
#[derive(Debug, Deserialize, Clone, Display, Serialize)]
#[display("{domain} ({} outbound links)", hrefs.len())]
pub struct CrawlReport {
    pub domain: String,
    pub hrefs: Vec<String>,
}

/// Acknowledgement returned by the browser start/stop endpoints.
#[derive(Debug, Deserialize, Clone, Display, Serialize)]
#[display("status={status}")]
pub struct StackReport {
    pub status: String,
}
