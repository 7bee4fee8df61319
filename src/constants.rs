//! Protocol-wide constants.
//!
//! All percentages and scaled amounts use the 18-decimal fixed-point base
//! defined by [`ONE`]. Rounding behavior around these floors and caps is
//! decided at each call site; see [`crate::math::fixed_point`].

/// Fixed-point one: `1e18`.
pub const ONE: u128 = 1_000_000_000_000_000_000;

/// Minimum number of tokens in a pool.
pub const MIN_TOKENS: usize = 2;

/// Maximum number of tokens in a pool.
pub const MAX_TOKENS: usize = 8;

/// Maximum duration of a pool's pause window, in seconds (four years).
pub const MAX_PAUSE_WINDOW_DURATION: u64 = 4 * 365 * 24 * 60 * 60;

/// Minimum total pool share supply, minted to the zero address at
/// initialization and never redeemable. Guards against share-price
/// manipulation on near-empty pools.
pub const POOL_MINIMUM_TOTAL_SUPPLY: u128 = 1_000_000;

/// Minimum total buffer share supply, burned at buffer initialization.
pub const BUFFER_MINIMUM_TOTAL_SUPPLY: u128 = 10_000;

/// Minimum swap trade amount, in scaled-18 units. Trades below this floor
/// lose too much precision to rounding to be priced safely.
pub const MINIMUM_TRADE_AMOUNT: u128 = 1_000_000;

/// Minimum wrap/unwrap amount, in raw token units.
pub const MINIMUM_WRAP_AMOUNT: u128 = 10_000;

/// Minimum static swap fee percentage (0.0001%).
pub const MIN_SWAP_FEE_PERCENTAGE: u128 = 1_000_000_000_000;

/// Maximum static swap fee percentage (10%).
pub const MAX_SWAP_FEE_PERCENTAGE: u128 = 100_000_000_000_000_000;

/// Maximum aggregate (protocol + pool creator) fee percentage (90%).
pub const MAX_AGGREGATE_FEE_PERCENTAGE: u128 = 900_000_000_000_000_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_is_1e18() {
        assert_eq!(ONE, 10u128.pow(18));
    }

    #[test]
    fn fee_bounds_are_ordered() {
        assert!(MIN_SWAP_FEE_PERCENTAGE < MAX_SWAP_FEE_PERCENTAGE);
        assert!(MAX_SWAP_FEE_PERCENTAGE < MAX_AGGREGATE_FEE_PERCENTAGE);
        assert!(MAX_AGGREGATE_FEE_PERCENTAGE < ONE);
    }

    #[test]
    fn token_count_bounds() {
        assert!(MIN_TOKENS >= 2);
        assert!(MAX_TOKENS <= 8);
    }
}
