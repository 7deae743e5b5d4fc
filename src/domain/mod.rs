pub mod property;
pub mod run_state;

pub use property::{PropertyRecord, MXN_TO_USD_CONVERSION_RATE};
pub use run_state::RunState;
