//! Asynchronous JSONL feed reader
//!
//! Follows a growing batch feed file from the beginning: existing records
//! are replayed on startup, then the reader polls for appended lines.

use std::path::PathBuf;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::sleep;

pub struct BatchFeedReader {
    path: PathBuf,
    file: Option<BufReader<File>>,
    poll_interval: Duration,
}

impl BatchFeedReader {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: None,
            poll_interval: Duration::from_millis(100),
        }
    }

    /// Open the feed file, positioned at the first record
    pub async fn start(&mut self) -> std::io::Result<()> {
        let file = File::open(&self.path).await?;
        self.file = Some(BufReader::new(file));

        log::info!("📖 Reading batch feed: {}", self.path.display());
        Ok(())
    }

    /// Read the next non-empty line, waiting for new data if necessary
    pub async fn read_line(&mut self) -> std::io::Result<String> {
        let reader = self.file.as_mut().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "feed not opened")
        })?;

        loop {
            let mut line = String::new();
            match reader.read_line(&mut line).await? {
                0 => {
                    // at end of file; wait for the producer to append more
                    sleep(self.poll_interval).await;
                }
                _ => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Ok(trimmed.to_string());
                    }
                }
            }
        }
    }
}
