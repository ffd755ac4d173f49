use sim_lib::config::{CacheConfig, RawCacheConfig};
use sim_lib::hierarchy::{compute_amat, CacheLevel};
use sim_lib::pipeline::{compute_cpi, PipelineParams};
use sim_lib::replacement::ReplacementPolicy;
use sim_lib::simulator::simulate;
use sim_lib::trace::fetch_trace;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let param_tokens: Vec<String> = std::env::args().collect();
    let trace_path = param_tokens
        .get(1)
        .ok_or("You should specify exactly one trace file")?;
    let trace = fetch_trace(trace_path)?;
    let output_path = format!("eval/sweep_eval_{}.csv", trace.name);

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record([
        "Cache size",
        "Block size",
        "Associativity",
        "Hit ratio",
        "AMAT",
        "CPI",
    ])?;

    // One row per configuration
    let cache_sizes = vec![1024, 4 * 1024, 16 * 1024, 64 * 1024];
    let block_sizes = vec![16, 32, 64];
    let associativities = vec![1, 2, 4];

    for &cache_size in &cache_sizes {
        for &block_size in &block_sizes {
            for &associativity in &associativities {
                let config = CacheConfig::normalize(RawCacheConfig {
                    cache_size,
                    block_size,
                    associativity,
                    address_bits: 32,
                })?;
                let result =
                    simulate(&config, &trace, ReplacementPolicy::Lru, 0)?;
                let miss_rate = result.miss_rate();
                let amat = compute_amat(&[
                    CacheLevel {
                        hit_time: 1.0,
                        miss_rate,
                    },
                    CacheLevel {
                        hit_time: 100.0,
                        miss_rate: 0.0,
                    },
                ])?;
                let cpi = compute_cpi(PipelineParams {
                    cpi_base: 1.0,
                    miss_penalty: 100.0,
                    miss_rate,
                    mem_refs_per_instr: 0.3,
                })?;

                writer.write_record([
                    cache_size.to_string(),
                    block_size.to_string(),
                    associativity.to_string(),
                    format!("{:.3}", result.hit_ratio),
                    format!("{:.3}", amat),
                    format!("{:.3}", cpi),
                ])?;
            }
        }
    }

    Ok(())
}
