//! Memory access traces and the trace file loader

use std::path::Path;

use crate::error::TraceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    Read,
    Write,
}

/// A single memory reference
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryAccess {
    pub address: u32,
    pub access_type: AccessType,
}

/// An ordered sequence of memory accesses.
/// Replay order follows the order of `accesses`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trace {
    pub name: String,
    pub accesses: Vec<MemoryAccess>,
}

impl Trace {
    pub fn make(name: &str, accesses: Vec<MemoryAccess>) -> Self {
        Self {
            name: name.to_string(),
            accesses,
        }
    }

    pub fn len(&self) -> usize {
        self.accesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accesses.is_empty()
    }
}

/// Parse trace content: one access per line,
/// an `r`/`w` operation followed by a hexadecimal address
pub fn parse_trace(name: &str, content: &str) -> Result<Trace, TraceError> {
    let mut accesses = Vec::new();

    for (line_num, line) in content.lines().enumerate() {
        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        // Parse the line into op and address
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 2 {
            return Err(TraceError::ParseError(
                name.to_string(),
                format!(
                    "Invalid format at line {}: expected 'op address'",
                    line_num + 1
                ),
            ));
        }

        let access_type = match parts[0] {
            "r" | "R" => AccessType::Read,
            "w" | "W" => AccessType::Write,
            op => {
                return Err(TraceError::ParseError(
                    name.to_string(),
                    format!(
                        "Invalid operation '{}' at line {}: expected 'r' or 'w'",
                        op,
                        line_num + 1
                    ),
                ));
            }
        };

        let address_str = parts[1];
        let digits = address_str.strip_prefix("0x").ok_or_else(|| {
            TraceError::ParseError(
                name.to_string(),
                format!(
                    "Invalid address format at line {}: expected hexadecimal starting with '0x'",
                    line_num + 1
                ),
            )
        })?;

        let address = u32::from_str_radix(digits, 16).map_err(|_| {
            TraceError::ParseError(
                name.to_string(),
                format!("Invalid hexadecimal address at line {}", line_num + 1),
            )
        })?;

        accesses.push(MemoryAccess {
            address,
            access_type,
        });
    }

    Ok(Trace::make(name, accesses))
}

/// Load a trace from a file
pub fn fetch_trace(trace_path: &str) -> Result<Trace, TraceError> {
    let content = std::fs::read_to_string(trace_path)
        .map_err(|e| TraceError::FileReadError(trace_path.into(), e))?;
    let name = Path::new(trace_path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(trace_path);
    parse_trace(name, &content)
}
