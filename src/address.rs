//! Address decomposition into tag, index, and offset fields

use crate::config::{get_mask, CacheConfig};
use crate::error::AddressError;

/// The three bitfields a set-associative cache looks an address up by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressParts {
    pub tag: u32,
    pub index: u32,
    pub offset: u32,
}

/// Split an address into its tag, index, and offset fields.
/// The address must fit in the configured address width.
pub fn decompose(
    config: &CacheConfig,
    address: u32,
) -> Result<AddressParts, AddressError> {
    if (address as u64) >> config.address_bits != 0 {
        return Err(AddressError::OutOfRange {
            address,
            address_bits: config.address_bits,
        });
    }

    let offset = address & get_mask(config.offset_bits);
    let index =
        ((address as u64 >> config.offset_bits) as u32) & get_mask(config.index_bits);
    let tag =
        (address as u64 >> (config.offset_bits + config.index_bits)) as u32;

    Ok(AddressParts { tag, index, offset })
}

/// Rebuild the original address from its decomposed fields
pub fn reconstruct(config: &CacheConfig, parts: &AddressParts) -> u32 {
    (((parts.tag as u64) << (config.offset_bits + config.index_bits))
        | ((parts.index as u64) << config.offset_bits)
        | parts.offset as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawCacheConfig;

    fn example_config() -> CacheConfig {
        CacheConfig::normalize(RawCacheConfig {
            cache_size: 32,
            block_size: 4,
            associativity: 2,
            address_bits: 8,
        })
        .unwrap()
    }

    #[test]
    fn test_decompose_example_addresses() {
        let config = example_config();

        let parts = decompose(&config, 0).unwrap();
        assert_eq!(parts, AddressParts { tag: 0, index: 0, offset: 0 });

        let parts = decompose(&config, 8).unwrap();
        assert_eq!(parts, AddressParts { tag: 0, index: 2, offset: 0 });

        let parts = decompose(&config, 16).unwrap();
        assert_eq!(parts, AddressParts { tag: 1, index: 0, offset: 0 });

        let parts = decompose(&config, 0xAB).unwrap();
        assert_eq!(parts, AddressParts { tag: 0xA, index: 2, offset: 3 });
    }

    #[test]
    fn test_round_trip_all_addresses() {
        let config = example_config();
        for address in 0..(1u32 << config.address_bits) {
            let parts = decompose(&config, address).unwrap();
            assert_eq!(reconstruct(&config, &parts), address);
        }
    }

    #[test]
    fn test_round_trip_full_width() {
        let config = CacheConfig::normalize(RawCacheConfig {
            cache_size: 16 * 1024,
            block_size: 64,
            associativity: 4,
            address_bits: 32,
        })
        .unwrap();
        for address in [0, 1, 0xdead_beef, u32::MAX] {
            let parts = decompose(&config, address).unwrap();
            assert_eq!(reconstruct(&config, &parts), address);
        }
    }

    #[test]
    fn test_out_of_range_address() {
        let config = example_config();
        assert_eq!(
            decompose(&config, 0x100),
            Err(AddressError::OutOfRange {
                address: 0x100,
                address_bits: 8
            })
        );
    }

    #[test]
    fn test_zero_index_bits() {
        // A fully-associative cache has no index field
        let config = example_config().fully_associative().unwrap();
        let parts = decompose(&config, 0xAB).unwrap();
        assert_eq!(parts.index, 0);
        assert_eq!(parts.tag, 0xAB >> 2);
        assert_eq!(reconstruct(&config, &parts), 0xAB);
    }
}
