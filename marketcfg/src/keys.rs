//! Data store keys for the market parameters the checker reads.
//!
//! Every key is `keccak256(abi.encode(...))` of a hashed name followed by
//! the market address and, for per-side values, a flag.

use alloy::primitives::{keccak256, Address, B256};
use alloy::sol_types::SolValue;

/// `keccak256(abi.encode(value))`.
pub fn hash_string(value: &str) -> B256 {
    keccak256(value.to_string().abi_encode())
}

fn market_key(name: &str, market: Address) -> B256 {
    keccak256((hash_string(name), market).abi_encode())
}

fn market_flag_key(name: &str, market: Address, flag: bool) -> B256 {
    keccak256((hash_string(name), market, flag).abi_encode())
}

pub fn position_impact_factor_key(market: Address, is_positive: bool) -> B256 {
    market_flag_key("POSITION_IMPACT_FACTOR", market, is_positive)
}

pub fn position_impact_exponent_factor_key(market: Address) -> B256 {
    market_key("POSITION_IMPACT_EXPONENT_FACTOR", market)
}

pub fn swap_impact_factor_key(market: Address, is_positive: bool) -> B256 {
    market_flag_key("SWAP_IMPACT_FACTOR", market, is_positive)
}

pub fn swap_impact_exponent_factor_key(market: Address) -> B256 {
    market_key("SWAP_IMPACT_EXPONENT_FACTOR", market)
}

pub fn open_interest_reserve_factor_key(market: Address, is_long: bool) -> B256 {
    market_flag_key("OPEN_INTEREST_RESERVE_FACTOR", market, is_long)
}

pub fn borrowing_factor_key(market: Address, is_long: bool) -> B256 {
    market_flag_key("BORROWING_FACTOR", market, is_long)
}

pub fn borrowing_exponent_factor_key(market: Address, is_long: bool) -> B256 {
    market_flag_key("BORROWING_EXPONENT_FACTOR", market, is_long)
}

pub fn funding_factor_key(market: Address) -> B256 {
    market_key("FUNDING_FACTOR", market)
}

pub fn funding_exponent_factor_key(market: Address) -> B256 {
    market_key("FUNDING_EXPONENT_FACTOR", market)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};

    const MARKET: Address = address!("47c031236e19d024b42f8ae6780e44a573170703");

    #[test]
    fn test_hash_string() {
        assert_eq!(
            hash_string("POSITION_IMPACT_FACTOR"),
            b256!("dbe66c23ce3688bc34131316a8b4dd967631de35afb1dbb972bc1b7c71c4a18b")
        );
        assert_eq!(
            hash_string("FUNDING_FACTOR"),
            b256!("8d25c5b55501c0bb1657a27730a272059c9a87bbf03ea76434f679bfef179e73")
        );
    }

    #[test]
    fn test_market_keys() {
        assert_eq!(
            position_impact_factor_key(MARKET, true),
            b256!("57f9be924ba0f2c763e255396dd8fdd27b3ff06fcde5fee6018b4ed0292eae0a")
        );
        assert_eq!(
            funding_factor_key(MARKET),
            b256!("00d05e5bdb2359dbb44dadeabf027e9d230b2dbbac2c82106932adcf8eec14ec")
        );
    }

    #[test]
    fn test_flag_and_market_distinguish_keys() {
        let other = Address::repeat_byte(0x42);
        assert_ne!(
            borrowing_factor_key(MARKET, true),
            borrowing_factor_key(MARKET, false)
        );
        assert_ne!(
            borrowing_factor_key(MARKET, true),
            borrowing_factor_key(other, true)
        );
        assert_ne!(
            swap_impact_factor_key(MARKET, true),
            position_impact_factor_key(MARKET, true)
        );
    }
}
