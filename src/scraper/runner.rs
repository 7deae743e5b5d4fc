// runner.rs
use std::thread;
use std::time::Duration;

use log::{debug, error, info, warn};

use crate::domain::{PropertyRecord, RunState};
use crate::errors::ScrapeError;
use crate::extract::{assemble_records, standardize_batch, ListingPatterns};
use crate::scraper::fetcher::PageFetcher;

/// Listings shown per results page, used to turn the advertised total into
/// a page count.
const RESULTS_PER_PAGE: usize = 24;

/// Pages assumed when the first page does not reveal a total.
const DEFAULT_TOTAL_PAGES: u32 = 50;

/// Page cap applied by test mode.
const TEST_MODE_PAGES: u32 = 2;

/// Knobs for one scraping run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Hard cap on pages, on top of whatever page 1 advertises.
    pub max_pages: Option<u32>,
    /// Scrape two pages only; main also truncates the output beforehand.
    pub test_mode: bool,
    /// Pause between successful pages, skipped after the last one.
    pub page_delay: Duration,
    /// Pause after a failed or unprocessable page before moving on.
    pub failure_cooldown: Duration,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_pages: None,
            test_mode: false,
            page_delay: Duration::from_secs(2),
            failure_cooldown: Duration::from_secs(5),
        }
    }
}

/// What a finished run did.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct RunSummary {
    pub pages_fetched: usize,
    pub pages_skipped: usize,
    /// Distinct listing URLs seen this run, the count the closing log
    /// line reports. Not the same as rows written when a page repeats
    /// a URL.
    pub properties_scraped: usize,
}

/// Drives a whole run: plan the page count from page 1, then walk every
/// page through extract, assemble, standardize, dedupe and persist.
///
/// `persist` receives each page's not-yet-seen records and is only called
/// when there is something to write. A failed page is logged, cooled down
/// and skipped; only an unreachable first page ends the run early, since
/// without it there is no page count to plan from.
pub fn run_scrape<F, P>(
    fetcher: &F,
    opts: &RunOptions,
    mut persist: P,
) -> Result<RunSummary, ScrapeError>
where
    F: PageFetcher,
    P: FnMut(&[PropertyRecord]) -> Result<(), ScrapeError>,
{
    let patterns = ListingPatterns::new()?;

    if opts.test_mode {
        info!("Running in test mode - will only scrape {TEST_MODE_PAGES} pages");
    }

    let first_page = match fetcher.fetch_page(1) {
        Ok(body) => body,
        Err(e) => {
            error!("Could not fetch first page. Exiting.");
            return Err(e);
        }
    };

    let mut total_pages = plan_total_pages(&patterns, &first_page);
    let cap = if opts.test_mode {
        Some(TEST_MODE_PAGES)
    } else {
        opts.max_pages
    };
    if let Some(cap) = cap {
        total_pages = total_pages.min(cap);
    }

    info!("Starting scrape for {total_pages} pages");

    let mut state = RunState::new();
    let mut summary = RunSummary::default();

    for page_num in 1..=total_pages {
        let fetched;
        let content: &str = if page_num == 1 {
            // Page 1 is already in hand from the planning fetch.
            &first_page
        } else {
            match fetcher.fetch_page(page_num) {
                Ok(body) => {
                    fetched = body;
                    &fetched
                }
                Err(_) => {
                    error!("Failed to fetch content for page {page_num}. Skipping this page.");
                    summary.pages_skipped += 1;
                    thread::sleep(opts.failure_cooldown);
                    continue;
                }
            }
        };

        match process_page(&patterns, content, &mut state, &mut persist) {
            Ok(saved) => {
                if saved > 0 {
                    info!("Scraped {saved} properties from page {page_num}");
                } else {
                    info!("No new properties found on page {page_num}");
                }
                summary.pages_fetched += 1;

                if page_num < total_pages {
                    thread::sleep(opts.page_delay);
                }
            }
            Err(e) => {
                error!("Error processing page {page_num}: {e}");
                summary.pages_skipped += 1;
                thread::sleep(opts.failure_cooldown);
            }
        }
    }

    summary.properties_scraped = state.seen_count();

    if summary.pages_skipped > 0 {
        warn!(
            "Skipped {} of {} pages this run",
            summary.pages_skipped,
            summary.pages_fetched + summary.pages_skipped
        );
    }
    info!(
        "Scraping completed. Total properties scraped: {}",
        summary.properties_scraped
    );
    Ok(summary)
}

/// One page through the pipeline; returns how many fresh records went out.
fn process_page<P>(
    patterns: &ListingPatterns,
    content: &str,
    state: &mut RunState,
    persist: &mut P,
) -> Result<usize, ScrapeError>
where
    P: FnMut(&[PropertyRecord]) -> Result<(), ScrapeError>,
{
    let fields = patterns.extract_fields(content);
    let mut batch = assemble_records(&fields);
    standardize_batch(&mut batch);

    #[cfg(debug_assertions)]
    {
        let _ = crate::csv_store::save_records_debug(&batch, "records_debug.json");
    }

    let fresh = state.filter_new(batch);
    debug!(
        "{} fresh records on this page, {} distinct URLs so far",
        fresh.len(),
        state.seen_count()
    );
    if !fresh.is_empty() {
        persist(&fresh)?;
    }
    Ok(fresh.len())
}

/// Page count implied by the advertised total, rounded up to whole pages.
/// A total too large for the plan saturates rather than wrapping around.
fn plan_total_pages(patterns: &ListingPatterns, first_page: &str) -> u32 {
    match patterns.total_results(first_page) {
        Some(total) => {
            let pages = total.div_ceil(RESULTS_PER_PAGE);
            u32::try_from(pages).unwrap_or(u32::MAX)
        }
        None => {
            warn!(
                "Could not read a total results count from page 1; assuming {DEFAULT_TOTAL_PAGES} pages"
            );
            DEFAULT_TOTAL_PAGES
        }
    }
}
