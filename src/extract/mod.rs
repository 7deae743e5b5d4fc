pub mod assemble;
pub mod patterns;
pub mod stats;

pub use assemble::assemble_records;
pub use patterns::ListingPatterns;
pub use stats::standardize_batch;
