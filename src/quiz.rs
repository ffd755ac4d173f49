use std::env;
use std::error::Error;
use std::fmt::Display;
use std::str::FromStr;

use sim_lib::assessment::generate_assessment;
use sim_lib::config::{CacheConfig, RawCacheConfig};
use sim_lib::trace::fetch_trace;

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

fn choice_letter(index: usize) -> char {
    (b'a' + index as u8) as char
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
    let mut seed: u64 = 0;
    let mut question_count: usize = 9;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" => raw.cache_size = next_value(&mut args, "-c")?,
            "-b" => raw.block_size = next_value(&mut args, "-b")?,
            "-a" => raw.associativity = next_value(&mut args, "-a")?,
            "-w" => raw.address_bits = next_value(&mut args, "-w")?,
            "-n" => question_count = next_value(&mut args, "-n")?,
            "--seed" => seed = next_value(&mut args, "--seed")?,
            _ => return Err(format!("Unknown parameter: {}", arg).into()),
        }
    }

    let config = CacheConfig::normalize(raw)?;
    let trace = fetch_trace(&trace_path)?;
    let questions = generate_assessment(&config, &trace, seed, question_count)?;

    for (i, question) in questions.iter().enumerate() {
        println!("Q{}: {}", i + 1, question.prompt);
        for (j, choice) in question.choices.iter().enumerate() {
            println!("  {}) {}", choice_letter(j), choice);
        }
        println!();
    }

    println!("Answer key:");
    for (i, question) in questions.iter().enumerate() {
        println!(
            "Q{}: {}) {}",
            i + 1,
            choice_letter(question.answer_index),
            question.explanation
        );
    }

    Ok(())
}
