mod fetcher;
mod retry;
mod runner;

pub use fetcher::{PageFetcher, ScraperApiFetcher};
pub use retry::RetryPolicy;
pub use runner::{run_scrape, RunOptions, RunSummary};
