//! Output module for reporting discoveries
//!
//! This module handles:
//! - The sink interface discoveries are written through
//! - The append-only text file sink and an in-memory sink
//! - Run statistics and their console report

mod sinks;
pub mod stats;
mod traits;

pub use sinks::{AppendFileSink, MemorySink};
pub use stats::{print_statistics, CrawlStats};
pub use traits::{Discovery, DiscoverySink, OutputError, OutputResult};
