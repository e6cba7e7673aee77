//! Output module for the product report
//!
//! The crawl hands its record sequence to this sink, which writes one
//! timestamped CSV dump per run.

mod report;

pub use report::{write_report, OutputError};
