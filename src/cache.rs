//! Set-associative cache state

use rand::rngs::StdRng;

use crate::config::CacheConfig;
use crate::replacement::ReplacementPolicy;

/// Bookkeeping for a single cache line.
/// `insertion_seq` and `last_use_seq` carry the monotonic counters FIFO
/// and LRU select victims by.
#[derive(Clone, Copy, Debug, Default)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u32,
    pub insertion_seq: u64,
    pub last_use_seq: u64,
}

/// The mutable lookup state of a set-associative cache.
///
/// Lines are stored set-major: set `i` owns the slots
/// `[i * associativity, (i + 1) * associativity)`. Within a set there is
/// at most one valid line per tag.
pub struct CacheState {
    associativity: usize,
    lines: Vec<CacheLine>,
}

impl CacheState {
    pub fn make(config: &CacheConfig) -> Self {
        Self {
            associativity: config.associativity as usize,
            lines: vec![CacheLine::default(); config.block_num as usize],
        }
    }

    /// The slots belonging to the given set
    pub fn set(&self, index: u32) -> &[CacheLine] {
        let begin = index as usize * self.associativity;
        &self.lines[begin..begin + self.associativity]
    }

    /// Scan the set for a valid line holding the tag.
    /// Returns the slot within the set on a hit.
    pub fn lookup(&self, index: u32, tag: u32) -> Option<usize> {
        self.set(index)
            .iter()
            .position(|line| line.valid && line.tag == tag)
    }

    /// Refresh the use timestamp of a resident line
    pub fn touch(&mut self, index: u32, slot: usize, seq: u64) {
        let begin = index as usize * self.associativity;
        self.lines[begin + slot].last_use_seq = seq;
    }

    /// Install a tag into its set, preferring a free slot and otherwise
    /// evicting through the policy. Returns the evicted tag if a valid
    /// line was displaced.
    pub fn install(
        &mut self,
        index: u32,
        tag: u32,
        seq: u64,
        policy: ReplacementPolicy,
        rng: &mut StdRng,
    ) -> Option<u32> {
        let slot = match self.set(index).iter().position(|line| !line.valid) {
            Some(free) => free,
            None => policy.select_victim(self.set(index), rng),
        };

        let begin = index as usize * self.associativity;
        let line = &mut self.lines[begin + slot];
        let evicted = if line.valid { Some(line.tag) } else { None };
        *line = CacheLine {
            valid: true,
            tag,
            insertion_seq: seq,
            last_use_seq: seq,
        };
        evicted
    }
}
