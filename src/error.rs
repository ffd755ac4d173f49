use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the simulator
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Address error: {0}")]
    AddressError(#[from] AddressError),

    #[error("Invalid hierarchy: {0}")]
    InvalidHierarchy(#[from] HierarchyError),

    #[error("Invalid pipeline parameters: {0}")]
    InvalidPipelineParams(#[from] PipelineError),

    #[error("Trace error: {0}")]
    TraceError(#[from] TraceError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors raised while normalizing a raw cache configuration.
/// Each variant names the constraint that was violated.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be a positive integer, got {value}")]
    NotPositive { field: &'static str, value: u32 },

    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo { field: &'static str, value: u32 },

    #[error("block size {block_size} exceeds cache size {cache_size}")]
    BlockExceedsCache { block_size: u32, cache_size: u32 },

    #[error("associativity {associativity} exceeds the {block_num} lines in the cache")]
    AssociativityExceedsLines { associativity: u32, block_num: u32 },

    #[error("address width {address_bits} is too small: {required} bits needed for offset and index")]
    AddressSpaceTooSmall { address_bits: u32, required: u32 },

    #[error("address width {0} exceeds the supported maximum of 32 bits")]
    AddressWidthUnsupported(u32),
}

/// Errors related to address decomposition
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("address {address:#010x} is out of range for a {address_bits}-bit address space")]
    OutOfRange { address: u32, address_bits: u32 },
}

/// Errors raised by the AMAT calculator
#[derive(Error, Debug, PartialEq)]
pub enum HierarchyError {
    #[error("hierarchy must contain at least one level")]
    EmptyLevels,

    #[error("miss rate {value} at level {level} is outside [0, 1]")]
    MissRateOutOfRange { level: usize, value: f64 },
}

/// Errors raised by the pipeline CPI estimator
#[derive(Error, Debug, PartialEq)]
pub enum PipelineError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeParam { field: &'static str, value: f64 },
}

/// Errors related to trace loading and consumption
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Failed to read trace file '{0}': {1}")]
    FileReadError(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse trace '{0}': {1}")]
    ParseError(String, String),

    #[error("trace '{0}' contains no accesses")]
    EmptyTrace(String),
}

/// Type alias for Result with SimulatorError
pub type SimulatorResult<T> = Result<T, SimulatorError>;
