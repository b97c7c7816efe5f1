//! Concrete discovery sinks

use crate::output::traits::{Discovery, DiscoverySink, OutputError, OutputResult};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

/// Appends one line per discovery to a text file
///
/// Each line is flushed before `record` returns, so an interrupted crawl
/// keeps everything found so far. With `echo` enabled the line is also
/// printed to stdout.
#[derive(Debug)]
pub struct AppendFileSink {
    path: PathBuf,
    file: File,
    echo: bool,
}

impl AppendFileSink {
    /// Opens (creating if needed) `path` in append mode
    pub fn open(path: &Path, echo: bool) -> OutputResult<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
            echo,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiscoverySink for AppendFileSink {
    fn record(&mut self, discovery: &Discovery) -> OutputResult<()> {
        let line = discovery.to_line();
        writeln!(self.file, "{}", line)?;
        self.file.flush()?;

        if self.echo {
            println!("FOUND → {}", line);
        }

        Ok(())
    }

    fn finalize(&mut self) -> OutputResult<()> {
        self.file.sync_all()?;
        Ok(())
    }
}

/// Collects discoveries in memory
///
/// Clones share the same buffer, so a handle can be kept while another is
/// handed to the crawler.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    discoveries: Arc<Mutex<Vec<Discovery>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn discoveries(&self) -> Vec<Discovery> {
        self.discoveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DiscoverySink for MemorySink {
    fn record(&mut self, discovery: &Discovery) -> OutputResult<()> {
        self.discoveries
            .lock()
            .map_err(|e| OutputError::Write(e.to_string()))?
            .push(discovery.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn discovery(url: &str) -> Discovery {
        Discovery {
            host: "example.org".to_string(),
            evidence: "wp-includes path".to_string(),
            final_url: url.to_string(),
        }
    }

    #[test]
    fn test_file_sink_appends_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("found.txt");

        {
            let mut sink = AppendFileSink::open(&path, false).unwrap();
            sink.record(&discovery("https://example.org/")).unwrap();
            // Visible before finalize
            let content = std::fs::read_to_string(&path).unwrap();
            assert_eq!(content, "example.org | wp-includes path | https://example.org/\n");
            sink.finalize().unwrap();
        }

        // Re-opening appends instead of truncating
        let mut sink = AppendFileSink::open(&path, false).unwrap();
        sink.record(&discovery("https://example.org/blog")).unwrap();
        assert_eq!(sink.path(), path.as_path());

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_file_sink_bad_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("found.txt");
        assert!(matches!(
            AppendFileSink::open(&path, false),
            Err(OutputError::Io(_))
        ));
    }

    #[test]
    fn test_memory_sink_shares_buffer() {
        let handle = MemorySink::new();
        let mut sink = handle.clone();
        sink.record(&discovery("https://example.org/")).unwrap();
        assert_eq!(handle.discoveries().len(), 1);
    }
}
