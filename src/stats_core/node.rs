//! Mergeable statistical summary stored in each tree slot

use serde::Serialize;

/// Statistics of a contiguous run of samples (min, max, sum, sum of squares).
///
/// `empty()` is the identity of `merge`: merging it with any node yields that
/// node unchanged, so unused leaf slots never perturb query results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsNode {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub sum_squares: f64,
}

impl StatsNode {
    /// Identity node for empty slots
    pub fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            sum: 0.0,
            sum_squares: 0.0,
        }
    }

    /// Node summarizing a single sample
    pub fn point(value: f64) -> Self {
        Self {
            min: value,
            max: value,
            sum: value,
            sum_squares: value * value,
        }
    }

    /// Combine two nodes; associative and commutative
    pub fn merge(&self, other: &StatsNode) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
            sum: self.sum + other.sum,
            sum_squares: self.sum_squares + other.sum_squares,
        }
    }
}
