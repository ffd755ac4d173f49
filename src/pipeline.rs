//! Pipeline CPI estimation

use crate::error::PipelineError;

/// Inputs to the CPI formula
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineParams {
    pub cpi_base: f64,
    pub miss_penalty: f64,
    pub miss_rate: f64,
    pub mem_refs_per_instr: f64,
}

/// `CPI = cpi_base + miss_penalty * miss_rate * mem_refs_per_instr`.
/// Degrades exactly to `cpi_base` when the miss rate is zero.
pub fn compute_cpi(params: PipelineParams) -> Result<f64, PipelineError> {
    let checks = [
        ("base CPI", params.cpi_base),
        ("miss penalty", params.miss_penalty),
        ("miss rate", params.miss_rate),
        ("memory references per instruction", params.mem_refs_per_instr),
    ];
    for (field, value) in checks {
        if value < 0.0 {
            return Err(PipelineError::NegativeParam { field, value });
        }
    }

    Ok(params.cpi_base
        + params.miss_penalty * params.miss_rate * params.mem_refs_per_instr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpi_formula() {
        // 1 + 100 * 0.1 * 0.3 = 4
        let cpi = compute_cpi(PipelineParams {
            cpi_base: 1.0,
            miss_penalty: 100.0,
            miss_rate: 0.1,
            mem_refs_per_instr: 0.3,
        })
        .unwrap();
        assert!((cpi - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_miss_rate_degrades_to_base() {
        for miss_penalty in [0.0, 10.0, 1e9] {
            let cpi = compute_cpi(PipelineParams {
                cpi_base: 1.5,
                miss_penalty,
                miss_rate: 0.0,
                mem_refs_per_instr: 0.3,
            })
            .unwrap();
            assert_eq!(cpi, 1.5);
        }
    }

    #[test]
    fn test_rejects_negative_input() {
        let result = compute_cpi(PipelineParams {
            cpi_base: 1.0,
            miss_penalty: -5.0,
            miss_rate: 0.1,
            mem_refs_per_instr: 0.3,
        });
        assert_eq!(
            result,
            Err(PipelineError::NegativeParam {
                field: "miss penalty",
                value: -5.0
            })
        );
    }
}
