// csv_store.rs
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::domain::PropertyRecord;
use crate::errors::ScrapeError;

/// Column order of the output file. Must stay in lockstep with the field
/// order of `PropertyRecord`, which is what actually gets serialized.
pub const CSV_COLUMNS: [&str; 21] = [
    "url",
    "latitude",
    "longitude",
    "buy_price_mxn",
    "buy_price_usd",
    "rent_price_mxn",
    "rent_price_usd",
    "size",
    "postal_code",
    "street_address",
    "locality",
    "region",
    "bedrooms",
    "bathrooms",
    "image_1",
    "image_2",
    "image_3",
    "image_4",
    "image_5",
    "standardized_price",
    "standardized_size",
];

/// Append-only CSV sink for scraped records. Holds just the destination
/// path; every call opens the file itself.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a batch of records to the file, creating it if needed. The
    /// header row goes in only when the file is currently empty, so headers
    /// never repeat across runs.
    pub fn append(&self, records: &[PropertyRecord]) -> Result<(), ScrapeError> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| ScrapeError::Io(format!("open {}: {e}", self.path.display())))?;
        let needs_header = file
            .metadata()
            .map_err(|e| ScrapeError::Io(e.to_string()))?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if needs_header {
            writer
                .write_record(&CSV_COLUMNS)
                .map_err(|e| ScrapeError::Csv(e.to_string()))?;
        }
        for record in records {
            writer
                .serialize(record)
                .map_err(|e| ScrapeError::Csv(e.to_string()))?;
        }
        writer.flush().map_err(|e| ScrapeError::Csv(e.to_string()))?;
        Ok(())
    }

    /// Empties the destination file; test-mode runs start from scratch.
    pub fn truncate(&self) -> Result<(), ScrapeError> {
        File::create(&self.path)
            .map_err(|e| ScrapeError::Io(format!("truncate {}: {e}", self.path.display())))?;
        Ok(())
    }
}

#[cfg(debug_assertions)]
pub fn save_records_debug(records: &[PropertyRecord], filename: &str) -> std::io::Result<()> {
    use std::io::BufWriter;

    let file = File::create(filename)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}
