use std::env;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

use sim_lib::classifier::{classify_misses, miss_breakdown};
use sim_lib::config::{CacheConfig, RawCacheConfig};
use sim_lib::hierarchy::{compute_amat, CacheLevel};
use sim_lib::pipeline::{compute_cpi, PipelineParams};
use sim_lib::replacement::ReplacementPolicy;
use sim_lib::simulator::simulate;
use sim_lib::trace::{fetch_trace, AccessType};

fn next_value<T: FromStr>(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<T, Box<dyn Error>>
where
    T::Err: Display,
{
    let value = args
        .next()
        .ok_or_else(|| format!("You should specify a value after {}", flag))?;
    value
        .parse()
        .map_err(|e| format!("Invalid value after {}: {}", flag, e).into())
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut args = env::args().skip(1);
    let trace_path = args
        .next()
        .ok_or("You should specify exactly one trace file")?;

    let mut raw = RawCacheConfig {
        cache_size: 16 * 1024,
        block_size: 64,
        associativity: 1,
        address_bits: 32,
    };
    let mut policy = ReplacementPolicy::default();
    let mut seed: u64 = 0;
    let mut verbose = false;
    let mut hit_time = 1.0;
    let mut miss_penalty = 100.0;
    let mut cpi_base = 1.0;
    let mut mem_refs_per_instr = 0.3;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-v" => verbose = true,
            "-c" => raw.cache_size = next_value(&mut args, "-c")?,
            "-b" => raw.block_size = next_value(&mut args, "-b")?,
            "-a" => raw.associativity = next_value(&mut args, "-a")?,
            "-w" => raw.address_bits = next_value(&mut args, "-w")?,
            "-r" => {
                let name: String = next_value(&mut args, "-r")?;
                policy = name.parse()?;
            }
            "--seed" => seed = next_value(&mut args, "--seed")?,
            "--hit-time" => hit_time = next_value(&mut args, "--hit-time")?,
            "--miss-penalty" => {
                miss_penalty = next_value(&mut args, "--miss-penalty")?
            }
            "--cpi-base" => cpi_base = next_value(&mut args, "--cpi-base")?,
            "--mem-refs" => {
                mem_refs_per_instr = next_value(&mut args, "--mem-refs")?
            }
            _ => return Err(format!("Unknown parameter: {}", arg).into()),
        }
    }

    let config = CacheConfig::normalize(raw)?;
    let trace = fetch_trace(&trace_path)?;
    let result = simulate(&config, &trace, policy, seed)?;
    let outcomes = classify_misses(&config, &result.outcomes)?;

    if verbose {
        for (i, outcome) in outcomes.iter().enumerate() {
            let op = match outcome.access.access_type {
                AccessType::Read => 'r',
                AccessType::Write => 'w',
            };
            let verdict = if outcome.hit {
                "HIT".to_string()
            } else {
                format!("MISS ({})", outcome.miss_cause.name())
            };
            let eviction = match outcome.evicted_tag {
                Some(tag) => format!(", evicts tag {:#x}", tag),
                None => String::new(),
            };
            println!(
                "#{:<4} {} {:#010x}  tag={:#x} index={} offset={}  {}{}",
                i + 1,
                op,
                outcome.access.address,
                outcome.parts.tag,
                outcome.parts.index,
                outcome.parts.offset,
                verdict,
                eviction
            );
        }
    }

    let breakdown = miss_breakdown(&outcomes);
    println!(
        "Trace '{}' ({}): {} accesses, {} hits, {} misses, hit ratio {:.3}",
        trace.name,
        policy.name(),
        trace.len(),
        result.hit_count,
        result.miss_count,
        result.hit_ratio
    );
    println!(
        "Misses: {} compulsory, {} capacity, {} conflict",
        breakdown.compulsory, breakdown.capacity, breakdown.conflict
    );

    let miss_rate = result.miss_rate();
    let amat = compute_amat(&[
        CacheLevel {
            hit_time,
            miss_rate,
        },
        CacheLevel {
            hit_time: miss_penalty,
            miss_rate: 0.0,
        },
    ])?;
    let cpi = compute_cpi(PipelineParams {
        cpi_base,
        miss_penalty,
        miss_rate,
        mem_refs_per_instr,
    })?;
    println!("AMAT = {:.3} cycles, CPI = {:.3}", amat, cpi);

    Ok(())
}
