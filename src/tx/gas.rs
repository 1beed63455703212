//! Gas price and gas limit policy

use ethers::types::U256;
use tracing::debug;

/// How a submission gas price is derived from the node's suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasPriceMode {
    /// `suggested * n`; `0` keeps the suggested price unmodified
    Multiplier(u64),
    /// Use this price only when it exceeds the suggested price
    Floor(U256),
}

impl GasPriceMode {
    pub fn apply(&self, suggested: U256) -> U256 {
        match *self {
            GasPriceMode::Multiplier(0) => suggested,
            GasPriceMode::Multiplier(factor) => suggested.saturating_mul(U256::from(factor)),
            GasPriceMode::Floor(floor) => std::cmp::max(floor, suggested),
        }
    }
}

/// How a submission gas limit is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasLimitMode {
    /// Caller-supplied limit, used as is
    Fixed(u64),
    /// Node estimate, raised to `floor` when the estimate is lower
    Estimated { floor: u64 },
}

impl GasLimitMode {
    pub fn needs_estimate(&self) -> bool {
        matches!(self, GasLimitMode::Estimated { .. })
    }

    /// Resolve the limit given the node estimate (ignored for `Fixed`)
    pub fn resolve(&self, estimate: Option<u64>) -> u64 {
        match *self {
            GasLimitMode::Fixed(limit) => limit,
            GasLimitMode::Estimated { floor } => std::cmp::max(floor, estimate.unwrap_or(0)),
        }
    }
}

/// Candidate price for replacing a pending transaction priced at `current`.
///
/// Returns `None` when the candidate would not out-bid the pending transaction.
pub fn replacement_gas_price(suggested: U256, multiplier: u64, current: U256) -> Option<U256> {
    let candidate = GasPriceMode::Multiplier(multiplier).apply(suggested);
    debug!(
        "Replacement price: suggested {}, multiplier {}, candidate {}, current {}",
        suggested, multiplier, candidate, current
    );

    if candidate > current {
        Some(candidate)
    } else {
        None
    }
}

/// Raise a pending transaction's gas limit to the caller's floor
pub fn apply_gas_limit_floor(decoded: u64, floor: u64) -> u64 {
    std::cmp::max(floor, decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_modes() {
        let suggested = U256::from(6u64);
        assert_eq!(GasPriceMode::Multiplier(2).apply(suggested), U256::from(12u64));
        assert_eq!(GasPriceMode::Multiplier(1).apply(suggested), suggested);
        assert_eq!(GasPriceMode::Multiplier(0).apply(suggested), suggested);
        assert_eq!(GasPriceMode::Multiplier(3).apply(U256::MAX), U256::MAX);
    }

    #[test]
    fn test_floor_only_used_when_higher() {
        let suggested = U256::from(20u64);
        assert_eq!(GasPriceMode::Floor(U256::from(25u64)).apply(suggested), U256::from(25u64));
        assert_eq!(GasPriceMode::Floor(U256::from(5u64)).apply(suggested), suggested);
    }

    #[test]
    fn test_gas_limit_modes() {
        assert_eq!(GasLimitMode::Fixed(21_000).resolve(Some(90_000)), 21_000);
        assert_eq!(GasLimitMode::Estimated { floor: 0 }.resolve(Some(52_000)), 52_000);
        assert_eq!(GasLimitMode::Estimated { floor: 80_000 }.resolve(Some(52_000)), 80_000);
        assert!(!GasLimitMode::Fixed(21_000).needs_estimate());
    }

    #[test]
    fn test_replacement_requires_strictly_higher_price() {
        for current in 0u64..40 {
            for suggested in 0u64..20 {
                let candidate = suggested * 2;
                let decision =
                    replacement_gas_price(U256::from(suggested), 2, U256::from(current));
                if candidate > current {
                    assert_eq!(decision, Some(U256::from(candidate)));
                } else {
                    assert_eq!(decision, None, "candidate {candidate} vs current {current}");
                }
            }
        }
    }

    #[test]
    fn test_gas_limit_floor() {
        assert_eq!(apply_gas_limit_floor(21_000, 0), 21_000);
        assert_eq!(apply_gas_limit_floor(21_000, 60_000), 60_000);
    }
}
