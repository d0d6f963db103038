//! Per-symbol statistics registry
//!
//! Owns one sliding-window segment tree per tracked symbol and enforces the
//! symbol-count ceiling. Core capacity failures are translated into the
//! caller-facing per-symbol data limit error here; tree errors never leak
//! through this boundary.

use crate::stats_core::{SegmentTree, WindowStats};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    SymbolNotFound(String),
    SymbolLimitReached(usize),
    SymbolDataLimitReached(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::SymbolNotFound(symbol) => {
                write!(f, "Symbol {} not found", symbol)
            }
            ServiceError::SymbolLimitReached(limit) => {
                write!(f, "Symbol limit reached ({} symbols max)", limit)
            }
            ServiceError::SymbolDataLimitReached(symbol) => {
                write!(f, "Per-symbol data limit reached for {}", symbol)
            }
        }
    }
}

impl std::error::Error for ServiceError {}

/// Window construction parameters shared by every symbol
#[derive(Debug, Clone, Copy)]
pub struct WindowParams {
    pub initial_capacity: usize,
    pub max_window_size: usize,
    pub buffer_factor: f64,
}

/// Registry mapping symbol names to their statistics windows
pub struct TradingStatsService {
    windows: HashMap<String, SegmentTree>,
    window_params: WindowParams,
    max_symbols: usize,
}

impl TradingStatsService {
    pub fn new(window_params: WindowParams, max_symbols: usize) -> Self {
        Self {
            windows: HashMap::new(),
            window_params,
            max_symbols,
        }
    }

    /// Add a batch of samples for a symbol. A first batch creates the
    /// symbol's window and bulk-loads it; later batches append.
    pub fn add_batch(&mut self, symbol: &str, values: &[f64]) -> Result<(), ServiceError> {
        match self.windows.get_mut(symbol) {
            Some(window) => window.append(values).map_err(|e| {
                log::error!("Error adding batch for symbol {}: {}", symbol, e);
                ServiceError::SymbolDataLimitReached(symbol.to_string())
            }),
            None => {
                if self.windows.len() >= self.max_symbols {
                    log::error!("Symbol limit reached. Cannot add {}.", symbol);
                    return Err(ServiceError::SymbolLimitReached(self.max_symbols));
                }

                log::info!("Creating new window for symbol {} and adding batch.", symbol);
                let mut window = SegmentTree::new(
                    self.window_params.initial_capacity,
                    self.window_params.max_window_size,
                    self.window_params.buffer_factor,
                );
                window.build(values).map_err(|e| {
                    log::error!("Error adding batch for symbol {}: {}", symbol, e);
                    ServiceError::SymbolDataLimitReached(symbol.to_string())
                })?;

                // insert only after a successful build, so a rejected first
                // batch does not register the symbol
                self.windows.insert(symbol.to_string(), window);
                Ok(())
            }
        }
    }

    /// Statistics over the trailing `10^k` samples of a symbol's window
    pub fn get_stats(&self, symbol: &str, k: u32) -> Result<WindowStats, ServiceError> {
        self.windows
            .get(symbol)
            .map(|window| window.query(k))
            .ok_or_else(|| ServiceError::SymbolNotFound(symbol.to_string()))
    }

    /// Snapshot of tracked symbol names, sorted for stable reporting order
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = self.windows.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    pub fn symbol_count(&self) -> usize {
        self.windows.len()
    }
}
