//! Batch record parsing and boundary validation

use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum FeedError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::Parse(err)
    }
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::Parse(e) => write!(f, "Parse error: {}", e),
            FeedError::Invalid(msg) => write!(f, "Invalid batch record: {}", msg),
        }
    }
}

impl std::error::Error for FeedError {}

/// One batch of samples for one symbol, as read from the JSONL feed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRecord {
    pub symbol: String,
    pub values: Vec<f64>,
}

impl BatchRecord {
    /// Parse a BatchRecord from a JSONL line
    pub fn from_jsonl(line: &str) -> Result<Self, FeedError> {
        let record: BatchRecord = serde_json::from_str(line)?;
        Ok(record)
    }

    /// Boundary validation: the service core only checks its own capacity
    /// limits, so symbol and batch shape are rejected here.
    pub fn validate(&self, max_batch_size: usize) -> Result<(), FeedError> {
        if self.symbol.is_empty() {
            return Err(FeedError::Invalid("symbol must not be empty".to_string()));
        }
        if self.values.len() > max_batch_size {
            return Err(FeedError::Invalid(format!(
                "batch of {} values exceeds the limit of {}",
                self.values.len(),
                max_batch_size
            )));
        }
        if self.values.iter().any(|v| !v.is_finite()) {
            return Err(FeedError::Invalid(
                "values must be finite numbers".to_string(),
            ));
        }
        Ok(())
    }
}
