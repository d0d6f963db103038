//! JSONL writer for periodic per-symbol statistics snapshots

use crate::stats_core::WindowStats;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// One stats row: a symbol's window statistics at one report exponent
#[derive(Debug, Serialize)]
pub struct StatsSnapshot {
    pub symbol: String,
    pub window_exponent: u32,
    pub min: f64,
    pub max: f64,
    pub last: Option<f64>,
    pub avg: f64,
    pub var: f64,
    pub timestamp: i64,
}

impl StatsSnapshot {
    pub fn from_stats(symbol: &str, k: u32, stats: &WindowStats, timestamp: i64) -> Self {
        Self {
            symbol: symbol.to_string(),
            window_exponent: k,
            min: stats.min,
            max: stats.max,
            last: stats.last,
            avg: stats.avg,
            var: stats.var,
            timestamp,
        }
    }
}

pub struct SnapshotWriter {
    writer: BufWriter<std::fs::File>,
    last_flush: Instant,
}

impl SnapshotWriter {
    pub fn new(path: PathBuf) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        log::info!("📝 Writing stats snapshots to: {}", path.display());
        Ok(Self {
            writer: BufWriter::new(file),
            last_flush: Instant::now(),
        })
    }

    pub fn write_snapshot(&mut self, snapshot: &StatsSnapshot) -> std::io::Result<()> {
        let json = serde_json::to_string(snapshot)?;
        writeln!(self.writer, "{}", json)?;

        // Flush every 5 seconds
        if self.last_flush.elapsed() > Duration::from_secs(5) {
            self.flush()?;
            self.last_flush = Instant::now();
        }

        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl Drop for SnapshotWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.jsonl");

        let stats = WindowStats {
            min: 1.0,
            max: 5.0,
            last: Some(5.0),
            avg: 3.0,
            var: 2.0,
        };
        let snapshot = StatsSnapshot::from_stats("AAPL", 1, &stats, 1763026318);

        let mut writer = SnapshotWriter::new(path.clone()).unwrap();
        writer.write_snapshot(&snapshot).unwrap();
        writer.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert_eq!(parsed["symbol"], "AAPL");
        assert_eq!(parsed["window_exponent"], 1);
        assert_eq!(parsed["last"], 5.0);
        assert_eq!(parsed["avg"], 3.0);
        assert_eq!(parsed["timestamp"], 1763026318);
    }

    #[test]
    fn test_empty_window_serializes_null_last() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("stats.jsonl");

        let stats = WindowStats {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            last: None,
            avg: 0.0,
            var: 0.0,
        };
        let snapshot = StatsSnapshot::from_stats("AAPL", 1, &stats, 0);

        let mut writer = SnapshotWriter::new(path.clone()).unwrap();
        writer.write_snapshot(&snapshot).unwrap();
        writer.flush().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
        assert!(parsed["last"].is_null());
    }
}
