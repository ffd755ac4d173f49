use sim_lib::config::{CacheConfig, RawCacheConfig};
use sim_lib::hierarchy::{compute_amat, CacheLevel};
use sim_lib::replacement::ReplacementPolicy;
use sim_lib::simulator::simulate;
use sim_lib::trace::fetch_trace;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let param_tokens: Vec<String> = std::env::args().collect();
    let trace_path = param_tokens
        .get(1)
        .ok_or("You should specify exactly one trace file")?;
    let trace = fetch_trace(trace_path)?;

    // Plot line series for each cache size
    // For a fixed cache size, vary the block size
    // Performance metric: AMAT of a direct-mapped single level
    let cache_sizes = vec![256, 1024, 4 * 1024, 16 * 1024];
    let block_sizes = vec![16, 32, 64, 128, 256];

    let mut data: Vec<Vec<(u32, f64)>> = vec![vec![]; cache_sizes.len()];
    let mut y_max: f64 = 0.;
    for (i, &cache_size) in cache_sizes.iter().enumerate() {
        for &block_size in block_sizes.iter() {
            if block_size > cache_size {
                continue;
            }
            let config = CacheConfig::normalize(RawCacheConfig {
                cache_size,
                block_size,
                associativity: 1,
                address_bits: 32,
            })?;
            let result =
                simulate(&config, &trace, ReplacementPolicy::Lru, 0)?;
            let amat = compute_amat(&[
                CacheLevel {
                    hit_time: 1.0,
                    miss_rate: result.miss_rate(),
                },
                CacheLevel {
                    hit_time: 100.0,
                    miss_rate: 0.0,
                },
            ])?;
            data[i].push((block_size, amat));
            y_max = y_max.max(amat);
        }
    }

    // Plot the data
    use plotters::prelude::*;

    let plot_title = format!("Single level evaluation (AMAT): {}", trace.name);
    let output_path = format!("eval/plot_eval_{}.svg", trace.name);

    let root =
        SVGBackend::new(output_path.as_str(), (800, 600)).into_drawing_area();
    root.fill(&WHITE).unwrap();

    let mut ctx = ChartBuilder::on(&root)
        .caption(plot_title.as_str(), ("sans-serif", 40).into_font())
        .margin(5)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(16..256, 0.0..y_max * 1.1)
        .unwrap();
    ctx.configure_mesh().x_desc("Block size").y_desc("AMAT").draw().unwrap();

    for (i, cache_size) in cache_sizes.iter().enumerate() {
        let series = data[i].iter().map(|(x, y)| (*x as i32, *y));
        let label = format!("Cache size = {}", cache_size);
        let color = Palette99::pick(i).to_rgba();
        ctx.draw_series(LineSeries::new(series, color))
            .unwrap()
            .label(label)
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color)
            });
    }

    ctx.configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .unwrap();

    Ok(())
}
