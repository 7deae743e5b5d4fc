// errors.rs
use std::fmt;

/// Errors originating from either the scraping side
/// (proxy fetches, pattern setup) or the output side (CSV file).
#[derive(Debug)]
pub enum ScrapeError {
    Network(String),
    Config(String),
    Pattern(String),
    Io(String),
    Csv(String),
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::Network(msg) => write!(f, "Network error: {msg}"),
            ScrapeError::Config(msg) => write!(f, "Config error: {msg}"),
            ScrapeError::Pattern(msg) => write!(f, "Pattern error: {msg}"),
            ScrapeError::Io(msg) => write!(f, "File error: {msg}"),
            ScrapeError::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for ScrapeError {}
