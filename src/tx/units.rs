//! Display-unit to on-chain integer conversion

use ethers::types::U256;

/// Wei per native display unit (1 unit = 0.0001 ETH)
pub const NATIVE_UNIT_SCALE: u64 = 100_000_000_000_000;

/// Token base units per display unit (1 unit = 0.00001 gBzz)
pub const TOKEN_UNIT_SCALE: u64 = 1_000_000_000_000;

/// Wei value of a native transfer amount
pub fn native_to_wei(amount: u64) -> U256 {
    U256::from(amount) * U256::from(NATIVE_UNIT_SCALE)
}

/// On-chain integer amount of a token transfer
pub fn token_to_base_units(amount: u64) -> U256 {
    U256::from(amount) * U256::from(TOKEN_UNIT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_scale() {
        assert_eq!(native_to_wei(1000), U256::from(100_000_000_000_000_000u64));
        assert_eq!(native_to_wei(0), U256::zero());
    }

    #[test]
    fn test_token_scale() {
        assert_eq!(token_to_base_units(1), U256::from(1_000_000_000_000u64));
    }

    #[test]
    fn test_large_amounts_exceed_u64() {
        let wei = native_to_wei(u64::MAX);
        assert!(wei > U256::from(u64::MAX));
        assert_eq!(wei / U256::from(NATIVE_UNIT_SCALE), U256::from(u64::MAX));
    }
}
