//! Pool math plugin boundary.
//!
//! Pools are polymorphic over a small fixed interface: an invariant, a
//! balance-for-invariant-ratio inverse, a swap formula, and optional
//! custom liquidity callbacks. The vault owns every balance and fee
//! decision; pool math only prices. All quantities crossing this
//! boundary are scaled-18 and rate-adjusted ("live") balances — pool
//! math never sees raw token units.
//!
//! Implementations must be deterministic and side-effect free over the
//! provided balances; the vault may call them multiple times within one
//! operation.

use core::fmt;

use crate::domain::{Rounding, SwapKind};
use crate::error::{Result, VaultError};

/// A swap pricing request passed to [`PoolMath::on_swap`].
#[derive(Debug, Clone, Copy)]
pub struct PoolSwapRequest<'a> {
    /// Whether the given amount fixes the input or the output.
    pub kind: SwapKind,
    /// The fixed amount, scaled-18, net of swap fees for exact-in.
    pub amount_given_scaled18: u128,
    /// Current live balances for every pool token, in registration order.
    pub balances_scaled18: &'a [u128],
    /// Index of the token being sold to the pool.
    pub token_in_index: usize,
    /// Index of the token being bought from the pool.
    pub token_out_index: usize,
}

/// Request for a pool-defined custom add-liquidity computation.
#[derive(Debug, Clone, Copy)]
pub struct CustomAddRequest<'a> {
    /// Caller's per-token maximums, scaled-18.
    pub max_amounts_in_scaled18: &'a [u128],
    /// Caller's minimum acceptable share output.
    pub min_bpt_amount_out: u128,
    /// Current live balances.
    pub balances_scaled18: &'a [u128],
    /// Current pool share supply.
    pub total_supply: u128,
    /// Opaque caller data forwarded untouched.
    pub user_data: &'a [u8],
}

/// Request for a pool-defined custom remove-liquidity computation.
#[derive(Debug, Clone, Copy)]
pub struct CustomRemoveRequest<'a> {
    /// Caller's maximum share burn.
    pub max_bpt_amount_in: u128,
    /// Caller's per-token minimums, scaled-18.
    pub min_amounts_out_scaled18: &'a [u128],
    /// Current live balances.
    pub balances_scaled18: &'a [u128],
    /// Current pool share supply.
    pub total_supply: u128,
    /// Opaque caller data forwarded untouched.
    pub user_data: &'a [u8],
}

/// Outcome of a custom add-liquidity computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomAddResult {
    /// Per-token deposit amounts, scaled-18.
    pub amounts_in_scaled18: Vec<u128>,
    /// Pool shares to mint.
    pub bpt_amount_out: u128,
    /// Per-token swap fee charged by the pool, scaled-18. The vault
    /// skims its aggregate percentage from these.
    pub swap_fee_amounts_scaled18: Vec<u128>,
}

/// Outcome of a custom remove-liquidity computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRemoveResult {
    /// Pool shares to burn.
    pub bpt_amount_in: u128,
    /// Per-token withdrawal amounts, scaled-18.
    pub amounts_out_scaled18: Vec<u128>,
    /// Per-token swap fee charged by the pool, scaled-18.
    pub swap_fee_amounts_scaled18: Vec<u128>,
}

/// The pricing contract every registered pool must satisfy.
///
/// # Errors
///
/// Any error aborts the enclosing vault operation atomically; pool math
/// failures are never retried.
pub trait PoolMath: fmt::Debug {
    /// Computes the pool invariant over live balances.
    ///
    /// The `rounding` direction is chosen by the vault per call site
    /// (e.g. round up for a denominator invariant, down for a numerator)
    /// and implementations must honor it.
    fn compute_invariant(&self, balances_scaled18: &[u128], rounding: Rounding) -> Result<u128>;

    /// Computes the balance token `token_index` must reach so that the
    /// invariant grows by exactly `invariant_ratio` (scaled-18, `1e18`
    /// meaning unchanged), all other balances held constant.
    fn compute_balance(
        &self,
        balances_scaled18: &[u128],
        token_index: usize,
        invariant_ratio: u128,
    ) -> Result<u128>;

    /// Prices a swap. Returns the calculated amount (output for exact-in,
    /// input for exact-out), scaled-18.
    fn on_swap(&self, request: &PoolSwapRequest<'_>) -> Result<u128>;

    /// Pool-defined add-liquidity computation.
    ///
    /// Only called for [`AddLiquidityKind::Custom`] and only when the
    /// pool enabled it at registration. The default declines.
    ///
    /// [`AddLiquidityKind::Custom`]: crate::domain::AddLiquidityKind::Custom
    fn on_add_liquidity_custom(&self, request: &CustomAddRequest<'_>) -> Result<CustomAddResult> {
        let _ = request;
        Err(VaultError::DoesNotSupportAddLiquidityCustom)
    }

    /// Pool-defined remove-liquidity computation.
    ///
    /// Only called for [`RemoveLiquidityKind::Custom`] and only when the
    /// pool enabled it at registration. The default declines.
    ///
    /// [`RemoveLiquidityKind::Custom`]: crate::domain::RemoveLiquidityKind::Custom
    fn on_remove_liquidity_custom(
        &self,
        request: &CustomRemoveRequest<'_>,
    ) -> Result<CustomRemoveResult> {
        let _ = request;
        Err(VaultError::DoesNotSupportRemoveLiquidityCustom)
    }
}
