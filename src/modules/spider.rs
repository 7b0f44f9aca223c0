use std::collections::BTreeSet;
use std::error::Error;
use std::io;
use std::time::Duration;

use log::info;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, USER_AGENT};
use scraper::{Html, Selector};
use url::Url;

use crate::modules::types::CrawlReport;

/// A single-page link crawl.
pub trait Spider {
    fn crawl(&self, url: &str) -> Result<CrawlReport, Box<dyn Error>>;
}

/// Crawler that collects a page's outbound `https` links.
#[derive(Debug, Clone)]
pub struct HrefSpider {
    user_agent: String,
    timeout: Duration,
}

impl HrefSpider {
    pub fn new(user_agent: impl Into<String>, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.into(),
            timeout,
        }
    }
}

/// Scheme and host of a URL, without path or query.
pub fn extract_domain(url: &str) -> Result<String, Box<dyn Error>> {
    let parsed = Url::parse(url)?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(format!("no domain in '{url}'").into());
    }
    Ok(origin.ascii_serialization())
}

/// True for absolute https links that leave the page's own domain.
pub fn valid_href(href: &str, domain: &str) -> bool {
    href.starts_with("https") && !href.starts_with(domain)
}

/// Extract link targets from a page, filtered and deduplicated.
fn collect_hrefs(html: &str, domain: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let parsed_html = Html::parse_document(html);
    let links_sel = Selector::parse("a[href]")
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

    let hrefs: BTreeSet<String> = parsed_html
        .select(&links_sel)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| valid_href(href, domain))
        .map(str::to_string)
        .collect();

    Ok(hrefs.into_iter().collect())
}

impl Spider for HrefSpider {
    fn crawl(&self, url: &str) -> Result<CrawlReport, Box<dyn Error>> {
        let domain = extract_domain(url)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, self.user_agent.parse()?);

        let html = Client::builder()
            .timeout(self.timeout)
            .build()?
            .get(url)
            .headers(headers)
            .send()?
            .error_for_status()?
            .text()?;

        let hrefs = collect_hrefs(&html, &domain)?;
        info!("Crawled {url}: {} outbound links", hrefs.len());

        Ok(CrawlReport { domain, hrefs })
    }
}
