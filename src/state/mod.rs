//! Per-host crawl state
//!
//! Holds the state shared by concurrent fetches: the per-host pacing
//! timestamps used to space out requests.

mod pacing;

pub use pacing::RateLimiter;
