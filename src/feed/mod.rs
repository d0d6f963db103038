//! Batch feed boundary - JSONL input records, feed follower, snapshot output
//!
//! ```text
//! batches.jsonl → BatchFeedReader → BatchRecord::from_jsonl + validate
//!     ↓
//! StatsCommand channel (ingestion)
//!     ↓
//! StatsSnapshot → SnapshotWriter → stats.jsonl
//! ```

pub mod reader;
pub mod record;
pub mod snapshot_writer;

pub use reader::BatchFeedReader;
pub use record::{BatchRecord, FeedError};
pub use snapshot_writer::{SnapshotWriter, StatsSnapshot};
