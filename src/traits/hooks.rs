//! Hook contract boundary: dynamic dispatch over an untrusted capability
//! set.
//!
//! A pool may register one hook contract. Which extension points the
//! vault calls is governed strictly by the pool's
//! [`HookFlags`](crate::state::HookFlags): an unflagged point is *never*
//! invoked, regardless of what the trait object implements. "Hook not
//! present" and "hook present but declined" are distinct outcomes — the
//! former skips the point, the latter aborts the whole operation with a
//! named error.
//!
//! Before-hooks receive a mutable [`VaultSession`] and may legitimately
//! move tokens through `send_to`/`settle` (hook-funded discounts or
//! surcharges); the engines re-read pool state after any before-hook for
//! exactly this reason. After-hooks may return an adjusted amount, which
//! the vault honors only when the pool enabled hook-adjusted amounts at
//! registration, and re-validates against the caller's declared limits.

use core::fmt;

use crate::domain::{AddLiquidityKind, Address, FeePercentage, RemoveLiquidityKind, SwapKind};
use crate::state::LiquidityManagement;
use crate::vault::VaultSession;

/// Context shared by the before-swap and dynamic-fee extension points.
#[derive(Debug, Clone)]
pub struct SwapHookContext {
    /// Whether the given amount fixes the input or the output.
    pub kind: SwapKind,
    /// The pool being swapped against.
    pub pool: Address,
    /// Token sold to the pool.
    pub token_in: Address,
    /// Token bought from the pool.
    pub token_out: Address,
    /// The fixed amount, scaled-18.
    pub amount_given_scaled18: u128,
    /// Live balances at the time of the call.
    pub balances_scaled18: Vec<u128>,
}

/// Context for the after-swap extension point.
#[derive(Debug, Clone)]
pub struct AfterSwapContext {
    /// Whether the given amount fixed the input or the output.
    pub kind: SwapKind,
    /// The pool that was swapped against.
    pub pool: Address,
    /// Token sold to the pool.
    pub token_in: Address,
    /// Token bought from the pool.
    pub token_out: Address,
    /// Final input amount, scaled-18, fees included.
    pub amount_in_scaled18: u128,
    /// Final output amount, scaled-18.
    pub amount_out_scaled18: u128,
    /// The calculated amount in raw token units, before any hook
    /// adjustment.
    pub amount_calculated_raw: u128,
}

/// Context for the before-add-liquidity extension point.
#[derive(Debug, Clone)]
pub struct BeforeAddLiquidityContext {
    /// The target pool.
    pub pool: Address,
    /// Recipient of the minted shares.
    pub to: Address,
    /// Kind of addition requested.
    pub kind: AddLiquidityKind,
    /// Caller's per-token maximums, scaled-18.
    pub max_amounts_in_scaled18: Vec<u128>,
    /// Caller's minimum acceptable share output.
    pub min_bpt_amount_out: u128,
    /// Live balances at the time of the call.
    pub balances_scaled18: Vec<u128>,
}

/// Context for the after-add-liquidity extension point.
#[derive(Debug, Clone)]
pub struct AfterAddLiquidityContext {
    /// The target pool.
    pub pool: Address,
    /// Recipient of the minted shares.
    pub to: Address,
    /// Kind of addition performed.
    pub kind: AddLiquidityKind,
    /// Actual per-token deposits, raw units.
    pub amounts_in_raw: Vec<u128>,
    /// Shares minted.
    pub bpt_amount_out: u128,
}

/// Context for the before-remove-liquidity extension point.
#[derive(Debug, Clone)]
pub struct BeforeRemoveLiquidityContext {
    /// The target pool.
    pub pool: Address,
    /// Account whose shares are burned.
    pub from: Address,
    /// Kind of removal requested.
    pub kind: RemoveLiquidityKind,
    /// Caller's maximum share burn.
    pub max_bpt_amount_in: u128,
    /// Caller's per-token minimums, scaled-18.
    pub min_amounts_out_scaled18: Vec<u128>,
    /// Live balances at the time of the call.
    pub balances_scaled18: Vec<u128>,
}

/// Context for the after-remove-liquidity extension point.
#[derive(Debug, Clone)]
pub struct AfterRemoveLiquidityContext {
    /// The target pool.
    pub pool: Address,
    /// Account whose shares were burned.
    pub from: Address,
    /// Kind of removal performed.
    pub kind: RemoveLiquidityKind,
    /// Shares burned.
    pub bpt_amount_in: u128,
    /// Actual per-token withdrawals, raw units.
    pub amounts_out_raw: Vec<u128>,
}

/// The hook contract interface.
///
/// Every method has a declining default, so an implementation only
/// overrides the points it flags. Return conventions:
///
/// - `on_register` returns `true` to accept the pool (default accepts —
///   a hook that wants to vet pools overrides it);
/// - before-hooks return `true` on success, `false` to abort;
/// - after-hooks and the dynamic-fee hook return `Some(value)` on
///   success, `None` to abort.
pub trait VaultHooks: fmt::Debug {
    /// Called once at pool registration when a hook contract is supplied.
    fn on_register(
        &mut self,
        pool: Address,
        tokens: &[Address],
        liquidity_management: &LiquidityManagement,
    ) -> bool {
        let _ = (pool, tokens, liquidity_management);
        true
    }

    /// Called before the pool's bootstrap deposit.
    fn on_before_initialize(&mut self, pool: Address, amounts_scaled18: &[u128]) -> bool {
        let _ = (pool, amounts_scaled18);
        false
    }

    /// Called after the pool's bootstrap deposit.
    fn on_after_initialize(
        &mut self,
        pool: Address,
        amounts_scaled18: &[u128],
        bpt_amount_out: u128,
    ) -> bool {
        let _ = (pool, amounts_scaled18, bpt_amount_out);
        false
    }

    /// Computes a per-swap fee overriding the pool's static fee.
    fn on_compute_dynamic_swap_fee(
        &mut self,
        context: &SwapHookContext,
        static_fee: FeePercentage,
    ) -> Option<FeePercentage> {
        let _ = (context, static_fee);
        None
    }

    /// Called before pool math prices a swap. May mutate vault state
    /// through the session; the engine re-reads balances afterwards.
    fn on_before_swap(&mut self, context: &SwapHookContext, vault: &mut VaultSession<'_>) -> bool {
        let _ = (context, vault);
        false
    }

    /// Called after a swap is fully computed and balances are updated.
    /// Returns the (possibly adjusted) calculated amount in raw units.
    fn on_after_swap(
        &mut self,
        context: &AfterSwapContext,
        vault: &mut VaultSession<'_>,
    ) -> Option<u128> {
        let _ = (context, vault);
        None
    }

    /// Called before an add-liquidity operation.
    fn on_before_add_liquidity(
        &mut self,
        context: &BeforeAddLiquidityContext,
        vault: &mut VaultSession<'_>,
    ) -> bool {
        let _ = (context, vault);
        false
    }

    /// Called after an add-liquidity operation. Returns the (possibly
    /// adjusted) per-token input amounts in raw units.
    fn on_after_add_liquidity(
        &mut self,
        context: &AfterAddLiquidityContext,
        vault: &mut VaultSession<'_>,
    ) -> Option<Vec<u128>> {
        let _ = (context, vault);
        None
    }

    /// Called before a remove-liquidity operation.
    fn on_before_remove_liquidity(
        &mut self,
        context: &BeforeRemoveLiquidityContext,
        vault: &mut VaultSession<'_>,
    ) -> bool {
        let _ = (context, vault);
        false
    }

    /// Called after a remove-liquidity operation. Returns the (possibly
    /// adjusted) per-token output amounts in raw units.
    fn on_after_remove_liquidity(
        &mut self,
        context: &AfterRemoveLiquidityContext,
        vault: &mut VaultSession<'_>,
    ) -> Option<Vec<u128>> {
        let _ = (context, vault);
        None
    }
}
