//! Configuration loaded from environment variables

use std::env;
use std::path::PathBuf;

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid configuration value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Runtime configuration for the stats feed
///
/// Every knob has a default; set the corresponding env variable to override:
/// - INITIAL_CAPACITY - starting leaf capacity per window (default: 100)
/// - MAX_WINDOW_SIZE - samples retained per symbol (default: 100000000)
/// - CAPACITY_BUFFER_FACTOR - hard-ceiling multiplier, > 1.0 (default: 1.2)
/// - MAX_SYMBOLS - tracked symbol limit (default: 10)
/// - MAX_BATCH_SIZE - per-record value limit (default: 10000)
/// - BATCH_FEED_PATH - input JSONL stream (default: streams/batches.jsonl)
/// - SNAPSHOT_OUTPUT_PATH - output JSONL file (default: streams/stats.jsonl)
/// - REPORT_EXPONENTS - comma-separated k values in [1, 8] (default: 1,2)
/// - EMISSION_INTERVAL_SECS - snapshot cadence (default: 60)
#[derive(Debug, Clone)]
pub struct Config {
    pub initial_capacity: usize,
    pub max_window_size: usize,
    pub buffer_factor: f64,
    pub max_symbols: usize,
    pub max_batch_size: usize,
    pub batch_feed_path: PathBuf,
    pub snapshot_output_path: PathBuf,
    pub report_exponents: Vec<u32>,
    pub emission_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let initial_capacity = parse_var("INITIAL_CAPACITY", 100)?;
        let max_window_size = parse_var("MAX_WINDOW_SIZE", 100_000_000)?;
        let buffer_factor: f64 = parse_var("CAPACITY_BUFFER_FACTOR", 1.2)?;
        let max_symbols = parse_var("MAX_SYMBOLS", 10)?;
        let max_batch_size = parse_var("MAX_BATCH_SIZE", 10_000)?;
        let emission_interval_secs = parse_var("EMISSION_INTERVAL_SECS", 60)?;

        if buffer_factor <= 1.0 {
            return Err(ConfigError::InvalidValue(
                "CAPACITY_BUFFER_FACTOR must be greater than 1.0".to_string(),
            ));
        }
        if initial_capacity == 0 || max_window_size == 0 {
            return Err(ConfigError::InvalidValue(
                "INITIAL_CAPACITY and MAX_WINDOW_SIZE must be positive".to_string(),
            ));
        }

        let report_exponents = match env::var("REPORT_EXPONENTS") {
            Ok(raw) => parse_exponents(&raw)?,
            Err(_) => vec![1, 2],
        };

        let batch_feed_path = env::var("BATCH_FEED_PATH")
            .unwrap_or_else(|_| "streams/batches.jsonl".to_string())
            .into();
        let snapshot_output_path = env::var("SNAPSHOT_OUTPUT_PATH")
            .unwrap_or_else(|_| "streams/stats.jsonl".to_string())
            .into();

        Ok(Self {
            initial_capacity,
            max_window_size,
            buffer_factor,
            max_symbols,
            max_batch_size,
            batch_feed_path,
            snapshot_output_path,
            report_exponents,
            emission_interval_secs,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{} is not valid: {}", name, raw))),
        Err(_) => Ok(default),
    }
}

/// Parse the comma-separated list of window exponents; each must be in [1, 8]
fn parse_exponents(raw: &str) -> Result<Vec<u32>, ConfigError> {
    let mut exponents = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let k: u32 = part.parse().map_err(|_| {
            ConfigError::InvalidValue(format!("REPORT_EXPONENTS entry is not an integer: {}", part))
        })?;
        if !(1..=8).contains(&k) {
            return Err(ConfigError::InvalidValue(format!(
                "REPORT_EXPONENTS entry out of range [1, 8]: {}",
                k
            )));
        }
        exponents.push(k);
    }
    if exponents.is_empty() {
        return Err(ConfigError::InvalidValue(
            "REPORT_EXPONENTS must name at least one exponent".to_string(),
        ));
    }
    Ok(exponents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exponents() {
        assert_eq!(parse_exponents("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_exponents(" 4 , 8 ").unwrap(), vec![4, 8]);
    }

    #[test]
    fn test_parse_exponents_rejects_out_of_range() {
        assert!(parse_exponents("0").is_err());
        assert!(parse_exponents("9").is_err());
        assert!(parse_exponents("2,abc").is_err());
        assert!(parse_exponents("").is_err());
    }
}
