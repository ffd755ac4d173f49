//! Victim-selection policies

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::Rng;

use crate::cache::CacheLine;

/// Replacement policy variants.
/// When several lines qualify, the lowest slot index wins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReplacementPolicy {
    #[default]
    Lru,
    Fifo,
    Random,
}

impl ReplacementPolicy {
    /// Choose the slot to evict from a full set.
    /// Random selection draws from the caller-supplied seeded generator,
    /// keeping replays reproducible.
    pub fn select_victim(&self, set: &[CacheLine], rng: &mut StdRng) -> usize {
        assert!(!set.is_empty());
        match self {
            ReplacementPolicy::Lru => min_slot(set, |line| line.last_use_seq),
            ReplacementPolicy::Fifo => min_slot(set, |line| line.insertion_seq),
            ReplacementPolicy::Random => rng.gen_range(0..set.len()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ReplacementPolicy::Lru => "LRU",
            ReplacementPolicy::Fifo => "FIFO",
            ReplacementPolicy::Random => "Random",
        }
    }
}

/// Index of the line with the smallest key, scanning from slot 0
fn min_slot(set: &[CacheLine], key: impl Fn(&CacheLine) -> u64) -> usize {
    let mut result = 0;
    let mut min_key = key(&set[0]);
    for (i, line) in set.iter().enumerate() {
        if key(line) < min_key {
            min_key = key(line);
            result = i;
        }
    }
    result
}

impl FromStr for ReplacementPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LRU" => Ok(ReplacementPolicy::Lru),
            "FIFO" => Ok(ReplacementPolicy::Fifo),
            "RANDOM" => Ok(ReplacementPolicy::Random),
            _ => Err(format!(
                "Invalid replacement policy: '{}'. Expected 'LRU', 'FIFO', or 'RANDOM'.",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn line(insertion_seq: u64, last_use_seq: u64) -> CacheLine {
        CacheLine {
            valid: true,
            tag: 0,
            insertion_seq,
            last_use_seq,
        }
    }

    #[test]
    fn test_lru_picks_least_recently_used() {
        let set = [line(1, 5), line(2, 3), line(3, 4)];
        let mut rng = StdRng::seed_from_u64(0);
        let slot = ReplacementPolicy::Lru.select_victim(&set, &mut rng);
        assert_eq!(slot, 1);
    }

    #[test]
    fn test_fifo_ignores_later_use() {
        // Slot 0 was inserted first; its recent use must not save it
        let set = [line(1, 9), line(2, 3), line(3, 4)];
        let mut rng = StdRng::seed_from_u64(0);
        let slot = ReplacementPolicy::Fifo.select_victim(&set, &mut rng);
        assert_eq!(slot, 0);
    }

    #[test]
    fn test_tie_break_lowest_slot() {
        let set = [line(7, 2), line(7, 2), line(7, 2)];
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(ReplacementPolicy::Lru.select_victim(&set, &mut rng), 0);
        assert_eq!(ReplacementPolicy::Fifo.select_victim(&set, &mut rng), 0);
    }

    #[test]
    fn test_random_is_seeded() {
        let set = [line(1, 1), line(2, 2), line(3, 3), line(4, 4)];
        let picks_a: Vec<usize> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..16)
                .map(|_| ReplacementPolicy::Random.select_victim(&set, &mut rng))
                .collect()
        };
        let picks_b: Vec<usize> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..16)
                .map(|_| ReplacementPolicy::Random.select_victim(&set, &mut rng))
                .collect()
        };
        assert_eq!(picks_a, picks_b);
        assert!(picks_a.iter().all(|&slot| slot < set.len()));
    }

    #[test]
    fn test_parse_policy_names() {
        assert_eq!("lru".parse(), Ok(ReplacementPolicy::Lru));
        assert_eq!("FIFO".parse(), Ok(ReplacementPolicy::Fifo));
        assert_eq!("Random".parse(), Ok(ReplacementPolicy::Random));
        assert!("plru".parse::<ReplacementPolicy>().is_err());
    }
}
