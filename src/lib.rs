//! tickstats - sliding-window trading statistics
//!
//! Maintains a bounded window of the most recent samples per symbol in a
//! growable array-backed segment tree and answers range-statistics queries
//! ("min/max/avg/var over the last 10^k samples") in logarithmic time.
//!
//! Layers, bottom up:
//! - [`stats_core`]: the per-symbol window (StatsNode aggregates, SegmentTree)
//! - [`service`]: per-symbol registry with symbol-count and data limits
//! - [`ingestion`]: single-owner command task over an mpsc channel
//! - [`feed`]: JSONL batch input and stats snapshot output
//! - [`config`]: env-based runtime configuration

pub mod config;
pub mod feed;
pub mod ingestion;
pub mod service;
pub mod stats_core;

pub use config::Config;
pub use ingestion::{stats_service_task, StatsCommand};
pub use service::{ServiceError, TradingStatsService, WindowParams};
pub use stats_core::{SegmentTree, SegmentTreeError, StatsNode, WindowStats};
