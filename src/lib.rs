pub mod check;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod gauges;
pub mod models;
pub mod queries;
pub mod state;
pub mod tags;
pub mod walker;

pub use check::{CheckOutcome, execute, run};
pub use error::CheckError;
pub use format::OutputFormat;
pub use state::CheckState;
