//! Trace replay against the cache model

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::address::{decompose, AddressParts};
use crate::cache::CacheState;
use crate::config::CacheConfig;
use crate::error::SimulatorResult;
use crate::replacement::ReplacementPolicy;
use crate::trace::{MemoryAccess, Trace};

/// Cause labels for the 3-C miss model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissCause {
    /// A hit, or a miss that has not been classified yet
    #[default]
    None,
    Compulsory,
    Capacity,
    Conflict,
}

impl MissCause {
    pub fn name(&self) -> &'static str {
        match self {
            MissCause::None => "-",
            MissCause::Compulsory => "Compulsory",
            MissCause::Capacity => "Capacity",
            MissCause::Conflict => "Conflict",
        }
    }
}

/// The record produced for one replayed access
#[derive(Clone, Copy, Debug)]
pub struct AccessOutcome {
    pub access: MemoryAccess,
    pub parts: AddressParts,
    pub hit: bool,
    pub miss_cause: MissCause,
    pub evicted_tag: Option<u32>,
}

/// Aggregate result of replaying a trace
#[derive(Clone, Debug)]
pub struct SimulationResult {
    pub outcomes: Vec<AccessOutcome>,
    pub hit_count: usize,
    pub miss_count: usize,
    /// Hits over total accesses; `0.0` for an empty trace by convention
    pub hit_ratio: f64,
}

impl SimulationResult {
    /// Misses over total accesses; `0.0` for an empty trace
    pub fn miss_rate(&self) -> f64 {
        let total = self.hit_count + self.miss_count;
        if total == 0 {
            0.0
        } else {
            self.miss_count as f64 / total as f64
        }
    }
}

/// Replay every access of the trace in order against a fresh cache state.
///
/// A global sequence counter is incremented once per access and stamps
/// both insertion and use timestamps. The seed feeds the Random policy's
/// generator; LRU and FIFO never consume it, so replays are deterministic
/// for every policy.
pub fn simulate(
    config: &CacheConfig,
    trace: &Trace,
    policy: ReplacementPolicy,
    seed: u64,
) -> SimulatorResult<SimulationResult> {
    let mut state = CacheState::make(config);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut outcomes = Vec::with_capacity(trace.len());
    let mut hit_count = 0;
    let mut miss_count = 0;
    let mut seq: u64 = 0;

    for access in &trace.accesses {
        seq += 1;
        let parts = decompose(config, access.address)?;

        match state.lookup(parts.index, parts.tag) {
            Some(slot) => {
                state.touch(parts.index, slot, seq);
                hit_count += 1;
                outcomes.push(AccessOutcome {
                    access: *access,
                    parts,
                    hit: true,
                    miss_cause: MissCause::None,
                    evicted_tag: None,
                });
            }
            None => {
                let evicted_tag =
                    state.install(parts.index, parts.tag, seq, policy, &mut rng);
                miss_count += 1;
                outcomes.push(AccessOutcome {
                    access: *access,
                    parts,
                    hit: false,
                    miss_cause: MissCause::None,
                    evicted_tag,
                });
            }
        }
    }

    let total = hit_count + miss_count;
    let hit_ratio = if total == 0 {
        0.0
    } else {
        hit_count as f64 / total as f64
    };

    Ok(SimulationResult {
        outcomes,
        hit_count,
        miss_count,
        hit_ratio,
    })
}
