//! 3-C miss classification

use std::collections::HashSet;

use crate::config::CacheConfig;
use crate::error::SimulatorResult;
use crate::replacement::ReplacementPolicy;
use crate::simulator::{simulate, AccessOutcome, MissCause};
use crate::trace::Trace;

/// Per-cause miss counts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MissBreakdown {
    pub compulsory: usize,
    pub capacity: usize,
    pub conflict: usize,
}

/// Label every miss in the outcome log with its 3-C cause.
///
/// The config must be the one the outcomes were simulated with. A shadow
/// replay against the fully-associative LRU cache of equal capacity
/// separates capacity from conflict misses: a real-cache miss that the
/// shadow cache hits is a conflict; a miss in both is a capacity miss;
/// the first touch of a block is compulsory.
pub fn classify_misses(
    config: &CacheConfig,
    outcomes: &[AccessOutcome],
) -> SimulatorResult<Vec<AccessOutcome>> {
    let shadow_config = config.fully_associative()?;
    let shadow_trace = Trace::make(
        "shadow",
        outcomes.iter().map(|outcome| outcome.access).collect(),
    );
    let shadow = simulate(
        &shadow_config,
        &shadow_trace,
        ReplacementPolicy::Lru,
        0,
    )?;

    let mut seen: HashSet<(u32, u32)> = HashSet::new();
    let mut classified = Vec::with_capacity(outcomes.len());

    for (outcome, shadow_outcome) in outcomes.iter().zip(&shadow.outcomes) {
        let block = (outcome.parts.tag, outcome.parts.index);
        let mut labeled = *outcome;
        if !labeled.hit {
            labeled.miss_cause = if !seen.contains(&block) {
                MissCause::Compulsory
            } else if shadow_outcome.hit {
                MissCause::Conflict
            } else {
                MissCause::Capacity
            };
        }
        seen.insert(block);
        classified.push(labeled);
    }

    Ok(classified)
}

/// Count classified misses by cause
pub fn miss_breakdown(outcomes: &[AccessOutcome]) -> MissBreakdown {
    let mut breakdown = MissBreakdown::default();
    for outcome in outcomes {
        match outcome.miss_cause {
            MissCause::Compulsory => breakdown.compulsory += 1,
            MissCause::Capacity => breakdown.capacity += 1,
            MissCause::Conflict => breakdown.conflict += 1,
            MissCause::None => {}
        }
    }
    breakdown
}
