// fetcher.rs
use log::warn;
use reqwest::blocking::Client;
use std::collections::HashMap;
use std::thread;
use std::time::Duration;

use crate::errors::ScrapeError;
use crate::scraper::retry::RetryPolicy;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// ScraperAPI gateway. The listing page URL rides along as a query
/// parameter and the proxy hands back the rendered page text.
const SCRAPER_API_BASE: &str = "https://api.scraperapi.com";

const API_KEY_VAR: &str = "SCRAPER_API_KEY";

/// Mexico City rental results, paginated from 1.
fn rent_search_url(page_num: u32) -> String {
    format!("https://propiedades.com/df/renta?pagina={page_num}")
}

/// Supplies the raw text of one results page. An Err means the page stayed
/// unavailable after retries and the caller should move on without it.
pub trait PageFetcher {
    fn fetch_page(&self, page_num: u32) -> Result<String, ScrapeError>;
}

pub struct ScraperApiFetcher {
    client: Client,
    api_key: String,
    policy: RetryPolicy,
}

impl ScraperApiFetcher {
    pub fn new(api_key: String, policy: RetryPolicy) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(70))
            .build()
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            policy,
        })
    }

    /// Builds a fetcher from the `SCRAPER_API_KEY` environment variable
    /// with the default retry policy.
    pub fn from_env() -> Result<Self, ScrapeError> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            ScrapeError::Config(format!("{API_KEY_VAR} environment variable not set"))
        })?;
        Self::new(api_key, RetryPolicy::default())
    }

    fn try_fetch(&self, target_url: &str) -> Result<String, ScrapeError> {
        let mut params = HashMap::new();
        params.insert("api_key", self.api_key.as_str());
        params.insert("url", target_url);

        let resp = self
            .client
            .get(SCRAPER_API_BASE)
            .query(&params)
            .send()
            .map_err(|e| ScrapeError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| ScrapeError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ScrapeError::Network(format!(
                "ScraperAPI HTTP {status}: {text}"
            )));
        }

        Ok(text)
    }
}

impl PageFetcher for ScraperApiFetcher {
    /// Fetches one results page through the proxy, retrying on failure.
    /// The policy delay is slept after every failed attempt, the last one
    /// included.
    fn fetch_page(&self, page_num: u32) -> Result<String, ScrapeError> {
        let target_url = rent_search_url(page_num);
        let mut last_err = None;

        for attempt in 1..=self.policy.max_attempts {
            match self.try_fetch(&target_url) {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!("Attempt {attempt} for page {page_num} failed: {e}");
                    last_err = Some(e);
                    thread::sleep(self.policy.delay_for(attempt));
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            ScrapeError::Network(format!("retry loop for page {page_num} made no attempts"))
        }))
    }
}
