//! Dataset loading, prompt building, description generation, CSV output, and
//! the batch run driver.

pub mod config;
pub mod dataset;
pub mod driver;
pub mod generator;
pub mod prompt;
pub mod vault;
pub mod writer;

pub use dataset::CompanyRecord;
pub use driver::{Driver, RunOptions, RunState, RunSummary};
pub use writer::{DescriptionWriter, OutputRow, SENTINEL};
