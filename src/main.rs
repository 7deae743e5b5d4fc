use clap::Parser;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use time::macros::format_description;

use crate::csv_store::CsvStore;
use crate::scraper::{run_scrape, RunOptions, ScraperApiFetcher};

mod csv_store;
mod domain;
mod errors;
mod extract;
mod scraper;

#[cfg(test)]
mod tests;

/// Destination for scraped rows, appended to across runs.
const OUTPUT_FILE: &str = "propiedades_data_rental.csv";

#[derive(Parser)]
#[command(name = "propiedades_scrape")]
#[command(about = "Scrapes propiedades.com rental listings into a CSV file.")]
#[command(version = "0.1.0")]
struct Cli {
    #[arg(long, help = "Cap the number of result pages fetched this run")]
    max_pages: Option<u32>,

    #[arg(long, help = "Scrape two pages only and start from a fresh output file")]
    test_mode: bool,
}

fn main() {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .with_timestamp_format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second]"
        ))
        .init()
        .expect("Failed to initialize logger");

    let store = CsvStore::new(OUTPUT_FILE);
    info!("Appending scraped listings to {}", store.path().display());
    if cli.test_mode {
        match store.truncate() {
            Ok(()) => info!("Starting fresh CSV file for test mode"),
            Err(e) => error!("Error clearing CSV file: {e}"),
        }
    }

    let fetcher = match ScraperApiFetcher::from_env() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!("Scraper init failed: {e}");
            std::process::exit(1);
        }
    };

    let opts = RunOptions {
        max_pages: cli.max_pages,
        test_mode: cli.test_mode,
        ..RunOptions::default()
    };

    if let Err(e) = run_scrape(&fetcher, &opts, |batch| store.append(batch)) {
        error!("Scrape failed: {e}");
        std::process::exit(1);
    }
}
