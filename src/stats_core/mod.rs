//! Stats Core - sliding-window statistics engine
//!
//! Per-symbol windows of trading samples with logarithmic range queries.
//!
//! # Architecture
//!
//! ```text
//! samples → SegmentTree (build / append)
//!     ↓
//! leaf region: one StatsNode per sample, oldest first
//!     ↓
//! internal region: merged subtree statistics (full rebuild per mutation)
//!     ↓
//! query(k) → WindowStats over the trailing 10^k samples
//! ```

pub mod node;
pub mod segment_tree;

pub use node::StatsNode;
pub use segment_tree::{SegmentTree, SegmentTreeError, WindowStats};
