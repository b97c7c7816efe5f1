//! Configuration module for wp-hunter
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use wp_hunter::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("wp-hunter.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, FetcherConfig, OutputConfig};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_seed_file};
pub use validation::{validate, validate_settings};
