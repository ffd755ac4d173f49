//! Cache geometry configuration

use crate::error::ConfigError;

pub fn get_log_2(value: u32) -> u32 {
    assert!(value > 0);
    31 - value.leading_zeros()
}

pub fn is_pow_2(value: u32) -> bool {
    value != 0 && value & (value - 1) == 0
}

pub fn get_mask(bits: u32) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1 << bits) - 1
    }
}

/// Unvalidated cache parameters as supplied by the caller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawCacheConfig {
    pub cache_size: u32,
    pub block_size: u32,
    pub associativity: u32,
    pub address_bits: u32,
}

/// A validated cache geometry.
/// Built once through [`CacheConfig::normalize`]; the derived fields are
/// read-only from then on.
///
/// The address layout is:
/// `| tag (tag_bits) | index (index_bits) | offset (offset_bits) |`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    pub cache_size: u32,
    pub block_size: u32,
    pub associativity: u32,
    pub address_bits: u32,

    /// Total number of cache lines
    pub block_num: u32,
    /// Number of sets
    pub set_num: u32,
    pub offset_bits: u32,
    pub index_bits: u32,
    pub tag_bits: u32,
}

impl CacheConfig {
    /// Validate raw parameters and compute the derived geometry.
    /// Normalizing the raw form of an already-normalized config returns
    /// an equal value.
    pub fn normalize(raw: RawCacheConfig) -> Result<Self, ConfigError> {
        let checks = [
            ("cache size", raw.cache_size),
            ("block size", raw.block_size),
            ("associativity", raw.associativity),
            ("address width", raw.address_bits),
        ];
        for (field, value) in checks {
            if value == 0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }
        if raw.address_bits > 32 {
            return Err(ConfigError::AddressWidthUnsupported(raw.address_bits));
        }
        for (field, value) in checks.into_iter().take(3) {
            if !is_pow_2(value) {
                return Err(ConfigError::NotPowerOfTwo { field, value });
            }
        }
        if raw.block_size > raw.cache_size {
            return Err(ConfigError::BlockExceedsCache {
                block_size: raw.block_size,
                cache_size: raw.cache_size,
            });
        }

        let block_num = raw.cache_size / raw.block_size;
        if raw.associativity > block_num {
            return Err(ConfigError::AssociativityExceedsLines {
                associativity: raw.associativity,
                block_num,
            });
        }
        let set_num = block_num / raw.associativity;

        let offset_bits = get_log_2(raw.block_size);
        let index_bits = get_log_2(set_num);
        if offset_bits + index_bits > raw.address_bits {
            return Err(ConfigError::AddressSpaceTooSmall {
                address_bits: raw.address_bits,
                required: offset_bits + index_bits,
            });
        }
        let tag_bits = raw.address_bits - offset_bits - index_bits;

        Ok(Self {
            cache_size: raw.cache_size,
            block_size: raw.block_size,
            associativity: raw.associativity,
            address_bits: raw.address_bits,
            block_num,
            set_num,
            offset_bits,
            index_bits,
            tag_bits,
        })
    }

    /// The raw parameters this config was normalized from
    pub fn raw(&self) -> RawCacheConfig {
        RawCacheConfig {
            cache_size: self.cache_size,
            block_size: self.block_size,
            associativity: self.associativity,
            address_bits: self.address_bits,
        }
    }

    /// The same capacity collapsed into a single fully-associative set
    pub fn fully_associative(&self) -> Result<Self, ConfigError> {
        Self::normalize(RawCacheConfig {
            associativity: self.block_num,
            ..self.raw()
        })
    }
}
