//! Growable sliding-window segment tree over trading samples
//!
//! The backing array holds `2 * capacity` nodes: internal nodes (merged
//! subtree statistics) in `1..capacity`, one leaf per sample in
//! `capacity..2*capacity`, oldest sample first. Capacity grows by a factor
//! of 10 when a batch would not fit; the oldest leaves are evicted once the
//! logical window exceeds `max_window_size`.

use super::node::StatsNode;
use serde::Serialize;

/// Growth factor applied on every reallocation
const GROWTH_FACTOR: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentTreeError {
    /// A build/append would push the window past `max_window_size * buffer_factor`
    CapacityLimitReached,
}

impl std::fmt::Display for SegmentTreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentTreeError::CapacityLimitReached => {
                write!(f, "segment tree capacity limit reached")
            }
        }
    }
}

impl std::error::Error for SegmentTreeError {}

/// Statistics over the trailing `10^k` samples of a window
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    pub min: f64,
    pub max: f64,
    pub last: Option<f64>,
    pub avg: f64,
    pub var: f64,
}

/// Bounded sliding window of samples with O(log n) range statistics
#[derive(Debug, Clone)]
pub struct SegmentTree {
    capacity: usize,
    size: usize,
    max_window_size: usize,
    capacity_limit: f64,
    tree: Vec<StatsNode>,
}

impl SegmentTree {
    /// Create an empty window.
    ///
    /// `buffer_factor` sets the hard ceiling beyond the window size: any
    /// mutation whose resulting size would exceed
    /// `max_window_size * buffer_factor` is rejected outright.
    pub fn new(initial_capacity: usize, max_window_size: usize, buffer_factor: f64) -> Self {
        Self {
            capacity: initial_capacity,
            size: 0,
            max_window_size,
            capacity_limit: max_window_size as f64 * buffer_factor,
            tree: vec![StatsNode::empty(); 2 * initial_capacity],
        }
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Initial bulk load; overwrites any prior contents.
    pub fn build(&mut self, data: &[f64]) -> Result<(), SegmentTreeError> {
        if data.len() as f64 > self.capacity_limit {
            return Err(SegmentTreeError::CapacityLimitReached);
        }

        self.ensure_capacity(data.len());

        for (i, value) in data.iter().enumerate() {
            self.tree[self.capacity + i] = StatsNode::point(*value);
        }
        for i in data.len()..self.capacity {
            self.tree[self.capacity + i] = StatsNode::empty();
        }
        self.size = data.len();

        self.rebuild_internal();
        Ok(())
    }

    /// Append samples after the current newest leaf, evicting the oldest
    /// once the window would exceed `max_window_size`.
    ///
    /// When the overflow is larger than the existing window (a single batch
    /// bigger than `max_window_size`), the leading samples of the batch are
    /// dropped as well, so `len() <= max_window_size` holds afterwards.
    pub fn append(&mut self, data: &[f64]) -> Result<(), SegmentTreeError> {
        let new_size = self.size + data.len();

        if new_size as f64 > self.capacity_limit {
            return Err(SegmentTreeError::CapacityLimitReached);
        }

        self.ensure_capacity(new_size);

        let mut batch = data;
        if new_size > self.max_window_size {
            let excess = new_size - self.max_window_size;
            let evicted = excess.min(self.size);
            self.shift_leaves(evicted);
            // drop what eviction alone could not cover from the batch head
            batch = &data[excess - evicted..];
        }

        for (i, value) in batch.iter().enumerate() {
            self.tree[self.capacity + self.size + i] = StatsNode::point(*value);
        }
        self.size += batch.len();

        self.rebuild_internal();
        Ok(())
    }

    /// Drop the `count` oldest samples. Counts beyond the current size are
    /// clamped.
    pub fn remove_oldest(&mut self, count: usize) {
        self.shift_leaves(count.min(self.size));
        self.rebuild_internal();
    }

    /// Statistics over the trailing `10^k` samples (all samples when fewer
    /// are held). The core does not bound `k`; callers validate the `[1, 8]`
    /// range at the boundary.
    pub fn query(&self, k: u32) -> WindowStats {
        if self.size == 0 {
            return WindowStats {
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
                last: None,
                avg: 0.0,
                var: 0.0,
            };
        }

        let num_elements = 10usize.pow(k);
        let start = self.size.saturating_sub(num_elements);

        let mut l = self.capacity + start;
        let mut r = self.capacity + self.size - 1;
        let count = r - l + 1;
        let last = self.tree[r].min;

        // Classic iterative bottom-up range fold: absorb a node whenever it
        // lies fully inside the range, then climb one level.
        let mut acc = StatsNode::empty();
        while l <= r {
            if l % 2 == 1 {
                acc = acc.merge(&self.tree[l]);
                l += 1;
            }
            if r % 2 == 0 {
                acc = acc.merge(&self.tree[r]);
                r -= 1;
            }
            l /= 2;
            r /= 2;
        }

        let avg = round2(acc.sum / count as f64);
        // Population variance from the already-rounded mean. Rounding before
        // squaring is the compatible computation order and can produce a
        // small negative result for near-constant inputs.
        let var = round2(acc.sum_squares / count as f64 - avg * avg);

        WindowStats {
            min: acc.min,
            max: acc.max,
            last: Some(last),
            avg,
            var,
        }
    }

    /// Grow by the growth factor until `required` leaves fit.
    fn ensure_capacity(&mut self, required: usize) {
        while self.capacity < required {
            let new_capacity = self.capacity * GROWTH_FACTOR;
            let mut new_tree = vec![StatsNode::empty(); 2 * new_capacity];

            // Copy exactly the `size` real leaves, never the whole leaf
            // extent: unused sentinel slots must not be round-tripped into
            // the new store as if they were samples.
            for i in 0..self.size {
                new_tree[new_capacity + i] = self.tree[self.capacity + i];
            }

            self.tree = new_tree;
            self.capacity = new_capacity;
        }
    }

    /// Shift leaves `[count, size)` down to `[0, size - count)` and clear
    /// the vacated tail. Callers rebuild internal nodes afterwards.
    fn shift_leaves(&mut self, count: usize) {
        for i in count..self.size {
            self.tree[self.capacity + i - count] = self.tree[self.capacity + i];
        }
        for i in self.size - count..self.size {
            self.tree[self.capacity + i] = StatsNode::empty();
        }
        self.size -= count;
    }

    /// Recompute every internal node bottom-up. Always a full pass: growth
    /// and eviction perturb arbitrarily many leaves at once.
    fn rebuild_internal(&mut self) {
        for i in (1..self.capacity).rev() {
            self.tree[i] = self.tree[2 * i].merge(&self.tree[2 * i + 1]);
        }
    }
}

/// Round to two decimal places, half away from zero
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
