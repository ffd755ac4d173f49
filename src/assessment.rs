//! Deterministic self-check quiz generation

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::address::AddressParts;
use crate::classifier::classify_misses;
use crate::config::{get_mask, CacheConfig};
use crate::error::{SimulatorResult, TraceError};
use crate::replacement::ReplacementPolicy;
use crate::simulator::{simulate, AccessOutcome, MissCause};
use crate::trace::{AccessType, Trace};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuestionKind {
    HitPredict,
    MissClassify,
    AddressBreakdown,
}

/// A single multiple-choice question.
/// `answer_index` always points into `choices`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    pub kind: QuestionKind,
    pub prompt: String,
    pub choices: Vec<String>,
    pub answer_index: usize,
    pub explanation: String,
}

/// Derive a quiz from the simulation of the trace.
///
/// Question types cycle round-robin, so every type appears once at least
/// three questions are requested. All randomness (access selection,
/// choice order) comes from a generator seeded with `seed`: identical
/// `(config, trace, seed, question_count)` inputs produce identical
/// output.
pub fn generate_assessment(
    config: &CacheConfig,
    trace: &Trace,
    seed: u64,
    question_count: usize,
) -> SimulatorResult<Vec<Question>> {
    if trace.is_empty() {
        return Err(TraceError::EmptyTrace(trace.name.clone()).into());
    }

    // Ground truth: LRU replay, classified. The first access of a
    // non-empty trace always misses, so miss_indices is never empty.
    let result = simulate(config, trace, ReplacementPolicy::Lru, seed)?;
    let outcomes = classify_misses(config, &result.outcomes)?;
    let miss_indices: Vec<usize> = outcomes
        .iter()
        .enumerate()
        .filter(|(_, outcome)| !outcome.hit)
        .map(|(i, _)| i)
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut questions = Vec::with_capacity(question_count);
    for i in 0..question_count {
        let question = match i % 3 {
            0 => hit_predict(&outcomes, &mut rng),
            1 => miss_classify(&outcomes, &miss_indices, &mut rng),
            _ => address_breakdown(config, &outcomes, &mut rng),
        };
        questions.push(question);
    }
    Ok(questions)
}

fn access_verb(outcome: &AccessOutcome) -> &'static str {
    match outcome.access.access_type {
        AccessType::Read => "reads",
        AccessType::Write => "writes",
    }
}

fn hit_predict(outcomes: &[AccessOutcome], rng: &mut StdRng) -> Question {
    let i = rng.gen_range(0..outcomes.len());
    let outcome = &outcomes[i];

    let prompt = format!(
        "Access #{} {} address {:#x}. Does it hit or miss in the cache?",
        i + 1,
        access_verb(outcome),
        outcome.access.address
    );
    let choices = vec!["Hit".to_string(), "Miss".to_string()];
    let (answer_index, explanation) = if outcome.hit {
        (
            0,
            format!(
                "Set {} still holds a valid line with tag {:#x} when access #{} executes.",
                outcome.parts.index,
                outcome.parts.tag,
                i + 1
            ),
        )
    } else {
        (
            1,
            format!(
                "No line in set {} holds tag {:#x} at that point; the access is a {} miss.",
                outcome.parts.index,
                outcome.parts.tag,
                outcome.miss_cause.name().to_lowercase()
            ),
        )
    };

    Question {
        kind: QuestionKind::HitPredict,
        prompt,
        choices,
        answer_index,
        explanation,
    }
}

fn miss_classify(
    outcomes: &[AccessOutcome],
    miss_indices: &[usize],
    rng: &mut StdRng,
) -> Question {
    let i = miss_indices[rng.gen_range(0..miss_indices.len())];
    let outcome = &outcomes[i];

    let prompt = format!(
        "Access #{} to address {:#x} misses. Which miss category does it fall into?",
        i + 1,
        outcome.access.address
    );
    let choices = vec![
        "Compulsory".to_string(),
        "Capacity".to_string(),
        "Conflict".to_string(),
    ];
    let (answer_index, explanation) = match outcome.miss_cause {
        MissCause::Compulsory => (
            0,
            format!(
                "This is the first reference to the block with tag {:#x} in set {}; a first touch can never hit.",
                outcome.parts.tag, outcome.parts.index
            ),
        ),
        MissCause::Capacity => (
            1,
            "The working set exceeds the total cache capacity: a fully \
             associative cache of the same size would also miss here."
                .to_string(),
        ),
        MissCause::Conflict => (
            2,
            format!(
                "A fully associative cache of the same capacity would still hold this block; it was evicted only because set {} ran out of ways.",
                outcome.parts.index
            ),
        ),
        MissCause::None => unreachable!("only misses are selected"),
    };

    Question {
        kind: QuestionKind::MissClassify,
        prompt,
        choices,
        answer_index,
        explanation,
    }
}

fn format_parts(parts: &AddressParts) -> String {
    format!(
        "tag={:#x}, index={}, offset={}",
        parts.tag, parts.index, parts.offset
    )
}

/// Plausible wrong decompositions of the address
fn decoy_parts(
    config: &CacheConfig,
    address: u32,
    correct: AddressParts,
) -> Vec<AddressParts> {
    vec![
        // Offset and index extracted with each other's bit widths
        AddressParts {
            tag: correct.tag,
            index: ((address as u64 >> config.index_bits) as u32)
                & get_mask(config.offset_bits),
            offset: address & get_mask(config.index_bits),
        },
        // Tag and offset values swapped
        AddressParts {
            tag: correct.offset,
            index: correct.index,
            offset: correct.tag,
        },
        AddressParts {
            tag: correct.tag.wrapping_add(1),
            ..correct
        },
        AddressParts {
            index: correct.index.wrapping_add(1),
            ..correct
        },
        AddressParts {
            offset: correct.offset.wrapping_add(1),
            ..correct
        },
    ]
}

fn address_breakdown(
    config: &CacheConfig,
    outcomes: &[AccessOutcome],
    rng: &mut StdRng,
) -> Question {
    let i = rng.gen_range(0..outcomes.len());
    let outcome = &outcomes[i];
    let address = outcome.access.address;
    let correct = format_parts(&outcome.parts);

    let mut choices = vec![correct.clone()];
    for decoy in decoy_parts(config, address, outcome.parts) {
        let text = format_parts(&decoy);
        if !choices.contains(&text) {
            choices.push(text);
        }
        if choices.len() == 4 {
            break;
        }
    }
    choices.shuffle(rng);
    let answer_index = choices.iter().position(|c| *c == correct).unwrap();

    let prompt = format!(
        "Which decomposition of address {:#x} into tag, index, and offset is correct for this cache?",
        address
    );
    let explanation = format!(
        "The low {} bits form the Offset, the next {} bits select the set, and the remaining {} bits form the Tag: {}.",
        config.offset_bits, config.index_bits, config.tag_bits, correct
    );

    Question {
        kind: QuestionKind::AddressBreakdown,
        prompt,
        choices,
        answer_index,
        explanation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawCacheConfig;
    use crate::trace::MemoryAccess;

    fn example_config() -> CacheConfig {
        CacheConfig::normalize(RawCacheConfig {
            cache_size: 32,
            block_size: 4,
            associativity: 2,
            address_bits: 8,
        })
        .unwrap()
    }

    fn example_trace() -> Trace {
        let addresses = [0u32, 8, 16, 0, 32, 8, 64, 16, 0, 128, 32, 4];
        let accesses = addresses
            .iter()
            .enumerate()
            .map(|(i, &address)| MemoryAccess {
                address,
                access_type: if i % 3 == 0 {
                    AccessType::Write
                } else {
                    AccessType::Read
                },
            })
            .collect();
        Trace::make("example", accesses)
    }

    #[test]
    fn test_generation_is_deterministic() {
        let config = example_config();
        let trace = example_trace();
        let a = generate_assessment(&config, &trace, 7, 12).unwrap();
        let b = generate_assessment(&config, &trace, 7, 12).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_may_differ() {
        let config = example_config();
        let trace = example_trace();
        let a = generate_assessment(&config, &trace, 1, 12).unwrap();
        let b = generate_assessment(&config, &trace, 2, 12).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_answer_index_in_bounds() {
        let config = example_config();
        let trace = example_trace();
        let questions =
            generate_assessment(&config, &trace, 3, 30).unwrap();
        for question in &questions {
            assert!(question.answer_index < question.choices.len());
        }
    }

    #[test]
    fn test_all_types_covered() {
        let config = example_config();
        let trace = example_trace();
        let questions = generate_assessment(&config, &trace, 5, 9).unwrap();
        for kind in [
            QuestionKind::HitPredict,
            QuestionKind::MissClassify,
            QuestionKind::AddressBreakdown,
        ] {
            assert!(questions.iter().any(|q| q.kind == kind));
        }
    }

    #[test]
    fn test_empty_trace_is_rejected() {
        let config = example_config();
        let trace = Trace::make("empty", vec![]);
        assert!(generate_assessment(&config, &trace, 0, 3).is_err());
    }

    #[test]
    fn test_hit_predict_matches_ground_truth() {
        // Every access touches a distinct block, so every answer is "Miss"
        let config = example_config();
        let accesses = (0..8)
            .map(|i| MemoryAccess {
                address: i * 16,
                access_type: AccessType::Read,
            })
            .collect();
        let trace = Trace::make("all-miss", accesses);

        let questions =
            generate_assessment(&config, &trace, 11, 30).unwrap();
        for question in questions
            .iter()
            .filter(|q| q.kind == QuestionKind::HitPredict)
        {
            assert_eq!(question.choices[question.answer_index], "Miss");
        }
    }

    #[test]
    fn test_miss_classify_choices() {
        let config = example_config();
        let trace = example_trace();
        let questions =
            generate_assessment(&config, &trace, 13, 9).unwrap();
        for question in questions
            .iter()
            .filter(|q| q.kind == QuestionKind::MissClassify)
        {
            assert_eq!(
                question.choices,
                vec!["Compulsory", "Capacity", "Conflict"]
            );
        }
    }

    #[test]
    fn test_breakdown_choices_are_distinct() {
        let config = example_config();
        let trace = example_trace();
        let questions =
            generate_assessment(&config, &trace, 17, 30).unwrap();
        for question in questions
            .iter()
            .filter(|q| q.kind == QuestionKind::AddressBreakdown)
        {
            assert_eq!(question.choices.len(), 4);
            for (i, choice) in question.choices.iter().enumerate() {
                for other in &question.choices[i + 1..] {
                    assert_ne!(choice, other);
                }
            }
            assert!(question.explanation.contains("Tag"));
            assert!(question.explanation.contains("Offset"));
        }
    }
}
