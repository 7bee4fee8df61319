//! Per-pool configuration.

use serde::{Deserialize, Serialize};

use crate::constants::{
    MAX_AGGREGATE_FEE_PERCENTAGE, MAX_SWAP_FEE_PERCENTAGE, MIN_SWAP_FEE_PERCENTAGE,
};
use crate::domain::FeePercentage;
use crate::error::{Result, VaultError};

/// Which liquidity operation shapes a pool supports.
///
/// Proportional add/remove cannot be disabled: it is the guaranteed exit
/// path. Everything else is opt-in or opt-out at registration and
/// immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiquidityManagement {
    /// Rejects unbalanced and single-token kinds when set.
    pub disable_unbalanced_liquidity: bool,
    /// Enables the pool's custom add-liquidity callback.
    pub enable_add_liquidity_custom: bool,
    /// Enables the pool's custom remove-liquidity callback.
    pub enable_remove_liquidity_custom: bool,
    /// Enables share-free donations.
    pub enable_donation: bool,
}

/// Mutable lifecycle and fee state for a registered pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Set once the bootstrap deposit succeeded.
    pub initialized: bool,
    /// Pool rejects all state-mutating operations while set.
    pub paused: bool,
    /// Emergency state: only the hook-free proportional exit works.
    pub recovery_mode: bool,
    /// Timestamp after which the pool can never be paused again.
    pub pause_window_end: u64,
    /// Fee charged on every swap unless a dynamic-fee hook overrides it.
    pub static_swap_fee: FeePercentage,
    /// Portion of each swap fee skimmed for protocol + pool creator.
    pub aggregate_swap_fee: FeePercentage,
    /// Portion of rate-driven balance growth skimmed for protocol +
    /// pool creator.
    pub aggregate_yield_fee: FeePercentage,
    /// Supported liquidity operation shapes.
    pub liquidity_management: LiquidityManagement,
}

impl PoolConfig {
    /// Creates the registration-time config with everything inactive.
    #[must_use]
    pub const fn at_registration(
        pause_window_end: u64,
        liquidity_management: LiquidityManagement,
    ) -> Self {
        Self {
            initialized: false,
            paused: false,
            recovery_mode: false,
            pause_window_end,
            static_swap_fee: FeePercentage::ZERO,
            aggregate_swap_fee: FeePercentage::ZERO,
            aggregate_yield_fee: FeePercentage::ZERO,
            liquidity_management,
        }
    }

    /// Validates a static swap fee against the protocol bounds.
    ///
    /// Zero is allowed (fee-free pools); a non-zero fee must sit in
    /// `[MIN_SWAP_FEE_PERCENTAGE, MAX_SWAP_FEE_PERCENTAGE]`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidSwapFeePercentage`] out of bounds.
    pub fn validate_static_swap_fee(fee: FeePercentage) -> Result<()> {
        let value = fee.get();
        if value != 0 && (value < MIN_SWAP_FEE_PERCENTAGE || value > MAX_SWAP_FEE_PERCENTAGE) {
            return Err(VaultError::InvalidSwapFeePercentage);
        }
        Ok(())
    }

    /// Validates an aggregate fee percentage against the protocol cap.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::InvalidAggregateFeePercentage`] above the cap.
    pub fn validate_aggregate_fee(fee: FeePercentage) -> Result<()> {
        if fee.get() > MAX_AGGREGATE_FEE_PERCENTAGE {
            return Err(VaultError::InvalidAggregateFeePercentage);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_config_is_inactive() {
        let config = PoolConfig::at_registration(100, LiquidityManagement::default());
        assert!(!config.initialized);
        assert!(!config.paused);
        assert!(!config.recovery_mode);
        assert_eq!(config.pause_window_end, 100);
        assert!(config.static_swap_fee.is_zero());
    }

    #[test]
    fn zero_swap_fee_is_valid() {
        assert!(PoolConfig::validate_static_swap_fee(FeePercentage::ZERO).is_ok());
    }

    #[test]
    fn swap_fee_below_min_rejected() {
        let fee = FeePercentage::new(MIN_SWAP_FEE_PERCENTAGE - 1).expect("below one");
        assert_eq!(
            PoolConfig::validate_static_swap_fee(fee),
            Err(VaultError::InvalidSwapFeePercentage)
        );
    }

    #[test]
    fn swap_fee_above_max_rejected() {
        let fee = FeePercentage::new(MAX_SWAP_FEE_PERCENTAGE + 1).expect("below one");
        assert_eq!(
            PoolConfig::validate_static_swap_fee(fee),
            Err(VaultError::InvalidSwapFeePercentage)
        );
    }

    #[test]
    fn swap_fee_at_bounds_valid() {
        let min = FeePercentage::new(MIN_SWAP_FEE_PERCENTAGE).expect("below one");
        let max = FeePercentage::new(MAX_SWAP_FEE_PERCENTAGE).expect("below one");
        assert!(PoolConfig::validate_static_swap_fee(min).is_ok());
        assert!(PoolConfig::validate_static_swap_fee(max).is_ok());
    }

    #[test]
    fn aggregate_fee_above_cap_rejected() {
        let fee = FeePercentage::new(MAX_AGGREGATE_FEE_PERCENTAGE + 1).expect("below one");
        assert_eq!(
            PoolConfig::validate_aggregate_fee(fee),
            Err(VaultError::InvalidAggregateFeePercentage)
        );
    }
}
