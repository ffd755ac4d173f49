//! AMAT computation over a cache hierarchy

use crate::error::HierarchyError;

/// One level of the hierarchy, fastest first.
/// The last level's miss rate is never consulted: its hit time stands in
/// for the final backing access.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CacheLevel {
    pub hit_time: f64,
    pub miss_rate: f64,
}

/// Average memory access time of the first (fastest) level.
///
/// Computed from the slowest level inward:
/// `amat(last) = hit_time`, `amat(i) = hit_time_i + miss_rate_i * amat(i+1)`.
pub fn compute_amat(levels: &[CacheLevel]) -> Result<f64, HierarchyError> {
    if levels.is_empty() {
        return Err(HierarchyError::EmptyLevels);
    }
    for (level, entry) in levels.iter().enumerate() {
        if !(0.0..=1.0).contains(&entry.miss_rate) {
            return Err(HierarchyError::MissRateOutOfRange {
                level,
                value: entry.miss_rate,
            });
        }
    }

    let mut result = levels[levels.len() - 1].hit_time;
    for level in levels[..levels.len() - 1].iter().rev() {
        result = level.hit_time + level.miss_rate * result;
    }
    Ok(result)
}
