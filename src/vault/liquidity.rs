//! The liquidity engine: pool initialization, adds, removes and the
//! recovery exit.
//!
//! Every operation is vectorized over the pool's canonical token order.
//! Kinds that deviate from the pool's balance proportions perform an
//! implicit swap, so the non-proportional portion of each amount is
//! charged the swap fee through the invariant-ratio routines in
//! [`crate::math::base_pool`]. Purely proportional kinds never call
//! pool math at all.

use tracing::debug;

use crate::constants::POOL_MINIMUM_TOTAL_SUPPLY;
use crate::domain::{AddLiquidityKind, Address, RemoveLiquidityKind, Rounding};
use crate::error::{Result, VaultError};
use crate::math::{base_pool, fixed_point as fp, scaling};
use crate::traits::{
    AfterAddLiquidityContext, AfterRemoveLiquidityContext, BeforeAddLiquidityContext,
    BeforeRemoveLiquidityContext, CustomAddRequest, CustomRemoveRequest,
};
use crate::vault::pool_data::aggregate_fee_scaled18;
use crate::vault::VaultSession;

/// An add-liquidity request.
#[derive(Debug, Clone)]
pub struct AddLiquidityParams {
    /// The target pool.
    pub pool: Address,
    /// Recipient of the minted shares.
    pub to: Address,
    /// Per-token input limits, raw units, in canonical token order.
    /// Exact inputs for the unbalanced and donation kinds.
    pub max_amounts_in_raw: Vec<u128>,
    /// Minimum acceptable share output. Exact share output for the
    /// proportional and single-token-exact-out kinds.
    pub min_bpt_amount_out: u128,
    /// The shape of the addition.
    pub kind: AddLiquidityKind,
    /// Opaque data forwarded to custom pool math.
    pub user_data: Vec<u8>,
}

/// Outcome of an add-liquidity operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddLiquidityResult {
    /// Actual per-token deposits, raw units.
    pub amounts_in_raw: Vec<u128>,
    /// Shares minted.
    pub bpt_amount_out: u128,
}

/// A remove-liquidity request.
#[derive(Debug, Clone)]
pub struct RemoveLiquidityParams {
    /// The target pool.
    pub pool: Address,
    /// Account whose shares are burned.
    pub from: Address,
    /// Share burn limit. Exact burn for the proportional and
    /// single-token-exact-in kinds.
    pub max_bpt_amount_in: u128,
    /// Per-token output minimums, raw units. The exact output for the
    /// single-token-exact-out kind.
    pub min_amounts_out_raw: Vec<u128>,
    /// The shape of the removal.
    pub kind: RemoveLiquidityKind,
    /// Opaque data forwarded to custom pool math.
    pub user_data: Vec<u8>,
}

/// Outcome of a remove-liquidity operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveLiquidityResult {
    /// Shares burned.
    pub bpt_amount_in: u128,
    /// Actual per-token withdrawals, raw units.
    pub amounts_out_raw: Vec<u128>,
}

/// Index of the single non-zero entry; single-token kinds express the
/// chosen token this way.
fn single_input_index(amounts: &[u128]) -> Result<usize> {
    let mut index = None;
    for (i, &amount) in amounts.iter().enumerate() {
        if amount > 0 {
            if index.is_some() {
                return Err(VaultError::MultipleNonZeroInputs);
            }
            index = Some(i);
        }
    }
    index.ok_or(VaultError::MultipleNonZeroInputs)
}

impl VaultSession<'_> {
    /// Seeds a registered pool with its bootstrap liquidity.
    ///
    /// The pool's invariant over the deposited amounts becomes the
    /// share supply; `POOL_MINIMUM_TOTAL_SUPPLY` of it is minted to the
    /// zero address and locked forever, the remainder goes to `to`.
    ///
    /// # Errors
    ///
    /// Fails on an unregistered, already-initialized or paused pool, a
    /// hook veto, an invariant below the locked minimum, or a share
    /// output below `min_bpt_amount_out`.
    pub fn initialize(
        &mut self,
        pool: Address,
        to: Address,
        amounts_in_raw: &[u128],
        min_bpt_amount_out: u128,
    ) -> Result<u128> {
        let (hooks, flags, math, num_tokens, tokens) = {
            let state = self.vault.pool(pool)?;
            if state.config.initialized {
                return Err(VaultError::PoolAlreadyInitialized);
            }
            if state.config.paused {
                return Err(VaultError::PoolPaused);
            }
            (
                state.hooks.clone(),
                state.hook_flags,
                state.math.clone(),
                state.tokens.len(),
                state.tokens.clone(),
            )
        };
        if amounts_in_raw.len() != num_tokens {
            return Err(VaultError::InputLengthMismatch);
        }
        if to.is_zero() {
            return Err(VaultError::ZeroShareOwner);
        }

        let data = self.vault.load_pool_data(pool)?;
        let mut amounts_scaled18 = Vec::with_capacity(num_tokens);
        for i in 0..num_tokens {
            amounts_scaled18.push(scaling::to_scaled18_apply_rate(
                amounts_in_raw[i],
                data.scaling_factors[i],
                data.rates[i],
                Rounding::Down,
            )?);
        }

        if flags.should_call_before_initialize {
            if let Some(hooks) = hooks.clone() {
                if !hooks.borrow_mut().on_before_initialize(pool, &amounts_scaled18) {
                    return Err(VaultError::BeforeInitializeHookFailed);
                }
            }
        }

        let invariant = math.compute_invariant(&amounts_scaled18, Rounding::Down)?;
        let bpt_amount_out = invariant
            .checked_sub(POOL_MINIMUM_TOTAL_SUPPLY)
            .ok_or(VaultError::PoolTotalSupplyTooLow)?;
        if bpt_amount_out < min_bpt_amount_out {
            return Err(VaultError::BptAmountOutBelowMin {
                amount: bpt_amount_out,
                limit: min_bpt_amount_out,
            });
        }

        for i in 0..num_tokens {
            self.vault
                .set_pool_balance(pool, i, amounts_in_raw[i], amounts_scaled18[i])?;
            self.deltas.take_debt(tokens[i], amounts_in_raw[i])?;
        }
        {
            let state = self.vault.pool_mut(pool)?;
            state.mint_shares(Address::zero(), POOL_MINIMUM_TOTAL_SUPPLY)?;
            state.mint_shares(to, bpt_amount_out)?;
            state.config.initialized = true;
        }

        if flags.should_call_after_initialize {
            if let Some(hooks) = hooks {
                let accepted =
                    hooks
                        .borrow_mut()
                        .on_after_initialize(pool, &amounts_scaled18, bpt_amount_out);
                if !accepted {
                    return Err(VaultError::AfterInitializeHookFailed);
                }
            }
        }

        debug!(%pool, %to, bpt_amount_out, "pool initialized");
        Ok(bpt_amount_out)
    }

    /// Adds liquidity to an initialized pool.
    ///
    /// # Errors
    ///
    /// Fails on lifecycle preconditions, kind gating, hook vetoes,
    /// input amounts above the caller's maximums, or a share output
    /// below the caller's minimum.
    pub fn add_liquidity(&mut self, params: AddLiquidityParams) -> Result<AddLiquidityResult> {
        self.vault.ensure_pool_operational(params.pool)?;

        let (hooks, flags, math, tokens, liquidity, static_fee, aggregate_pct) = {
            let state = self.vault.pool(params.pool)?;
            if state.config.recovery_mode {
                return Err(VaultError::PoolInRecoveryMode);
            }
            (
                state.hooks.clone(),
                state.hook_flags,
                state.math.clone(),
                state.tokens.clone(),
                state.config.liquidity_management,
                state.config.static_swap_fee,
                state.config.aggregate_swap_fee,
            )
        };
        let num_tokens = tokens.len();
        if params.max_amounts_in_raw.len() != num_tokens {
            return Err(VaultError::InputLengthMismatch);
        }
        if params.to.is_zero() {
            return Err(VaultError::ZeroShareOwner);
        }

        let mut data = self.vault.load_pool_data(params.pool)?;
        let scale_maxes = |data: &crate::state::PoolData| -> Result<Vec<u128>> {
            params
                .max_amounts_in_raw
                .iter()
                .enumerate()
                .map(|(i, &raw)| {
                    scaling::to_scaled18_apply_rate(
                        raw,
                        data.scaling_factors[i],
                        data.rates[i],
                        Rounding::Down,
                    )
                })
                .collect()
        };
        let mut max_amounts_in_scaled18 = scale_maxes(&data)?;

        if flags.should_call_before_add_liquidity {
            if let Some(hooks) = hooks.clone() {
                let context = BeforeAddLiquidityContext {
                    pool: params.pool,
                    to: params.to,
                    kind: params.kind,
                    max_amounts_in_scaled18: max_amounts_in_scaled18.clone(),
                    min_bpt_amount_out: params.min_bpt_amount_out,
                    balances_scaled18: data.balances_live_scaled18.clone(),
                };
                let accepted = hooks
                    .try_borrow_mut()
                    .map_err(|_| VaultError::ReentrantHookCall)?
                    .on_before_add_liquidity(&context, self);
                if !accepted {
                    return Err(VaultError::BeforeAddLiquidityHookFailed);
                }
                self.vault.ensure_pool_operational(params.pool)?;
                data = self.vault.load_pool_data(params.pool)?;
                max_amounts_in_scaled18 = scale_maxes(&data)?;
            }
        }

        let total_supply = self.vault.pool(params.pool)?.total_supply;
        let (amounts_in_scaled18, bpt_amount_out, swap_fees_scaled18) = match params.kind {
            AddLiquidityKind::Proportional => {
                let bpt_out = params.min_bpt_amount_out;
                let amounts = base_pool::compute_proportional_amounts_in(
                    &data.balances_live_scaled18,
                    total_supply,
                    bpt_out,
                )?;
                (amounts, bpt_out, vec![0; num_tokens])
            }
            AddLiquidityKind::Donation => {
                if !liquidity.enable_donation {
                    return Err(VaultError::DoesNotSupportDonation);
                }
                (max_amounts_in_scaled18.clone(), 0, vec![0; num_tokens])
            }
            AddLiquidityKind::Unbalanced => {
                if liquidity.disable_unbalanced_liquidity {
                    return Err(VaultError::DoesNotSupportUnbalancedLiquidity);
                }
                let (bpt_out, fees) = base_pool::compute_add_liquidity_unbalanced(
                    math.as_ref(),
                    &data.balances_live_scaled18,
                    &max_amounts_in_scaled18,
                    total_supply,
                    static_fee.get(),
                )?;
                (max_amounts_in_scaled18.clone(), bpt_out, fees)
            }
            AddLiquidityKind::SingleTokenExactOut => {
                if liquidity.disable_unbalanced_liquidity {
                    return Err(VaultError::DoesNotSupportUnbalancedLiquidity);
                }
                let index = single_input_index(&params.max_amounts_in_raw)?;
                let bpt_out = params.min_bpt_amount_out;
                let (amount_in, fees) = base_pool::compute_add_liquidity_single_token_exact_out(
                    math.as_ref(),
                    &data.balances_live_scaled18,
                    index,
                    bpt_out,
                    total_supply,
                    static_fee.get(),
                )?;
                let mut amounts = vec![0; num_tokens];
                amounts[index] = amount_in;
                (amounts, bpt_out, fees)
            }
            AddLiquidityKind::Custom => {
                if !liquidity.enable_add_liquidity_custom {
                    return Err(VaultError::DoesNotSupportAddLiquidityCustom);
                }
                let result = math.on_add_liquidity_custom(&CustomAddRequest {
                    max_amounts_in_scaled18: &max_amounts_in_scaled18,
                    min_bpt_amount_out: params.min_bpt_amount_out,
                    balances_scaled18: &data.balances_live_scaled18,
                    total_supply,
                    user_data: &params.user_data,
                })?;
                (
                    result.amounts_in_scaled18,
                    result.bpt_amount_out,
                    result.swap_fee_amounts_scaled18,
                )
            }
        };

        if bpt_amount_out < params.min_bpt_amount_out {
            return Err(VaultError::BptAmountOutBelowMin {
                amount: bpt_amount_out,
                limit: params.min_bpt_amount_out,
            });
        }

        let mut amounts_in_raw = Vec::with_capacity(num_tokens);
        for i in 0..num_tokens {
            // Exact-input kinds keep the caller's raw amounts; computed
            // kinds round the vault's incoming amount up.
            let amount_in_raw = match params.kind {
                AddLiquidityKind::Donation | AddLiquidityKind::Unbalanced => {
                    params.max_amounts_in_raw[i]
                }
                _ => scaling::to_raw_undo_rate(
                    amounts_in_scaled18[i],
                    data.scaling_factors[i],
                    data.rates[i],
                    Rounding::Up,
                )?,
            };
            if amount_in_raw > params.max_amounts_in_raw[i] {
                return Err(VaultError::AmountInAboveMax {
                    amount: amount_in_raw,
                    limit: params.max_amounts_in_raw[i],
                });
            }
            self.deltas.take_debt(tokens[i], amount_in_raw)?;

            let aggregate_scaled18 =
                aggregate_fee_scaled18(swap_fees_scaled18[i], aggregate_pct.get())?;
            let aggregate_raw = scaling::to_raw_undo_rate(
                aggregate_scaled18,
                data.scaling_factors[i],
                data.rates[i],
                Rounding::Down,
            )?;
            if aggregate_raw > 0 {
                let state = self.vault.pool_mut(params.pool)?;
                state.aggregate_fees[i].swap_raw = fp::add(
                    state.aggregate_fees[i].swap_raw,
                    aggregate_raw,
                    "swap fee accrual",
                )?;
            }

            let new_raw = fp::sub(
                fp::add(data.balances_raw[i], amount_in_raw, "pool balance")?,
                aggregate_raw,
                "aggregate fee exceeds input",
            )?;
            let new_live = fp::sub(
                fp::add(
                    data.balances_live_scaled18[i],
                    amounts_in_scaled18[i],
                    "pool balance",
                )?,
                aggregate_scaled18,
                "aggregate fee exceeds input",
            )?;
            self.vault
                .set_pool_balance(params.pool, i, new_raw, new_live)?;
            amounts_in_raw.push(amount_in_raw);
        }

        self.vault
            .pool_mut(params.pool)?
            .mint_shares(params.to, bpt_amount_out)?;

        let mut reported_amounts_in = amounts_in_raw.clone();
        if flags.should_call_after_add_liquidity {
            if let Some(hooks) = hooks {
                let context = AfterAddLiquidityContext {
                    pool: params.pool,
                    to: params.to,
                    kind: params.kind,
                    amounts_in_raw: amounts_in_raw.clone(),
                    bpt_amount_out,
                };
                let adjusted = hooks
                    .try_borrow_mut()
                    .map_err(|_| VaultError::ReentrantHookCall)?
                    .on_after_add_liquidity(&context, self)
                    .ok_or(VaultError::AfterAddLiquidityHookFailed)?;
                if flags.enable_hook_adjusted_amounts {
                    if adjusted.len() != num_tokens {
                        return Err(VaultError::InputLengthMismatch);
                    }
                    for (i, &amount) in adjusted.iter().enumerate() {
                        if amount > params.max_amounts_in_raw[i] {
                            return Err(VaultError::AmountInAboveMax {
                                amount,
                                limit: params.max_amounts_in_raw[i],
                            });
                        }
                    }
                    reported_amounts_in = adjusted;
                }
            }
        }

        debug!(
            pool = %params.pool,
            kind = %params.kind,
            bpt_amount_out,
            "liquidity added"
        );
        Ok(AddLiquidityResult {
            amounts_in_raw: reported_amounts_in,
            bpt_amount_out,
        })
    }

    /// Removes liquidity from an initialized pool.
    ///
    /// While recovery mode is active only the proportional kind is
    /// accepted, and it is routed through the hook-free
    /// [`remove_liquidity_recovery`](Self::remove_liquidity_recovery)
    /// path.
    ///
    /// # Errors
    ///
    /// Fails on lifecycle preconditions, kind gating, hook vetoes, a
    /// share burn above the caller's maximum, or outputs below the
    /// caller's minimums.
    pub fn remove_liquidity(
        &mut self,
        params: RemoveLiquidityParams,
    ) -> Result<RemoveLiquidityResult> {
        if self.vault.pool(params.pool)?.config.recovery_mode {
            return match params.kind {
                RemoveLiquidityKind::Proportional => {
                    let amounts_out_raw = self.remove_liquidity_recovery(
                        params.pool,
                        params.from,
                        params.max_bpt_amount_in,
                        &params.min_amounts_out_raw,
                    )?;
                    Ok(RemoveLiquidityResult {
                        bpt_amount_in: params.max_bpt_amount_in,
                        amounts_out_raw,
                    })
                }
                _ => Err(VaultError::PoolInRecoveryMode),
            };
        }
        self.vault.ensure_pool_operational(params.pool)?;

        let (hooks, flags, math, tokens, liquidity, static_fee, aggregate_pct) = {
            let state = self.vault.pool(params.pool)?;
            (
                state.hooks.clone(),
                state.hook_flags,
                state.math.clone(),
                state.tokens.clone(),
                state.config.liquidity_management,
                state.config.static_swap_fee,
                state.config.aggregate_swap_fee,
            )
        };
        let num_tokens = tokens.len();
        if params.min_amounts_out_raw.len() != num_tokens {
            return Err(VaultError::InputLengthMismatch);
        }

        let mut data = self.vault.load_pool_data(params.pool)?;
        let scale_mins = |data: &crate::state::PoolData| -> Result<Vec<u128>> {
            params
                .min_amounts_out_raw
                .iter()
                .enumerate()
                .map(|(i, &raw)| {
                    scaling::to_scaled18_apply_rate(
                        raw,
                        data.scaling_factors[i],
                        data.rates[i],
                        Rounding::Up,
                    )
                })
                .collect()
        };
        let mut min_amounts_out_scaled18 = scale_mins(&data)?;

        if flags.should_call_before_remove_liquidity {
            if let Some(hooks) = hooks.clone() {
                let context = BeforeRemoveLiquidityContext {
                    pool: params.pool,
                    from: params.from,
                    kind: params.kind,
                    max_bpt_amount_in: params.max_bpt_amount_in,
                    min_amounts_out_scaled18: min_amounts_out_scaled18.clone(),
                    balances_scaled18: data.balances_live_scaled18.clone(),
                };
                let accepted = hooks
                    .try_borrow_mut()
                    .map_err(|_| VaultError::ReentrantHookCall)?
                    .on_before_remove_liquidity(&context, self);
                if !accepted {
                    return Err(VaultError::BeforeRemoveLiquidityHookFailed);
                }
                self.vault.ensure_pool_operational(params.pool)?;
                data = self.vault.load_pool_data(params.pool)?;
                min_amounts_out_scaled18 = scale_mins(&data)?;
            }
        }

        let total_supply = self.vault.pool(params.pool)?.total_supply;
        let (bpt_amount_in, amounts_out_scaled18, swap_fees_scaled18) = match params.kind {
            RemoveLiquidityKind::Proportional => {
                let bpt_in = params.max_bpt_amount_in;
                let amounts = base_pool::compute_proportional_amounts_out(
                    &data.balances_live_scaled18,
                    total_supply,
                    bpt_in,
                )?;
                (bpt_in, amounts, vec![0; num_tokens])
            }
            RemoveLiquidityKind::SingleTokenExactIn => {
                if liquidity.disable_unbalanced_liquidity {
                    return Err(VaultError::DoesNotSupportUnbalancedLiquidity);
                }
                let index = single_input_index(&params.min_amounts_out_raw)?;
                let bpt_in = params.max_bpt_amount_in;
                let (amount_out, fees) = base_pool::compute_remove_liquidity_single_token_exact_in(
                    math.as_ref(),
                    &data.balances_live_scaled18,
                    index,
                    bpt_in,
                    total_supply,
                    static_fee.get(),
                )?;
                let mut amounts = vec![0; num_tokens];
                amounts[index] = amount_out;
                (bpt_in, amounts, fees)
            }
            RemoveLiquidityKind::SingleTokenExactOut => {
                if liquidity.disable_unbalanced_liquidity {
                    return Err(VaultError::DoesNotSupportUnbalancedLiquidity);
                }
                let index = single_input_index(&params.min_amounts_out_raw)?;
                let (bpt_in, fees) = base_pool::compute_remove_liquidity_single_token_exact_out(
                    math.as_ref(),
                    &data.balances_live_scaled18,
                    index,
                    min_amounts_out_scaled18[index],
                    total_supply,
                    static_fee.get(),
                )?;
                let mut amounts = vec![0; num_tokens];
                amounts[index] = min_amounts_out_scaled18[index];
                (bpt_in, amounts, fees)
            }
            RemoveLiquidityKind::Custom => {
                if !liquidity.enable_remove_liquidity_custom {
                    return Err(VaultError::DoesNotSupportRemoveLiquidityCustom);
                }
                let result = math.on_remove_liquidity_custom(&CustomRemoveRequest {
                    max_bpt_amount_in: params.max_bpt_amount_in,
                    min_amounts_out_scaled18: &min_amounts_out_scaled18,
                    balances_scaled18: &data.balances_live_scaled18,
                    total_supply,
                    user_data: &params.user_data,
                })?;
                (
                    result.bpt_amount_in,
                    result.amounts_out_scaled18,
                    result.swap_fee_amounts_scaled18,
                )
            }
        };

        if bpt_amount_in > params.max_bpt_amount_in {
            return Err(VaultError::BptAmountInAboveMax {
                amount: bpt_amount_in,
                limit: params.max_bpt_amount_in,
            });
        }

        self.vault
            .pool_mut(params.pool)?
            .burn_shares(params.from, bpt_amount_in)?;

        let mut amounts_out_raw = Vec::with_capacity(num_tokens);
        for i in 0..num_tokens {
            // The vault's outgoing amount rounds down.
            let amount_out_raw = scaling::to_raw_undo_rate(
                amounts_out_scaled18[i],
                data.scaling_factors[i],
                data.rates[i],
                Rounding::Down,
            )?;
            if amount_out_raw < params.min_amounts_out_raw[i] {
                return Err(VaultError::AmountOutBelowMin {
                    amount: amount_out_raw,
                    limit: params.min_amounts_out_raw[i],
                });
            }
            self.deltas.supply_credit(tokens[i], amount_out_raw)?;

            let aggregate_scaled18 =
                aggregate_fee_scaled18(swap_fees_scaled18[i], aggregate_pct.get())?;
            let aggregate_raw = scaling::to_raw_undo_rate(
                aggregate_scaled18,
                data.scaling_factors[i],
                data.rates[i],
                Rounding::Down,
            )?;
            if aggregate_raw > 0 {
                let state = self.vault.pool_mut(params.pool)?;
                state.aggregate_fees[i].swap_raw = fp::add(
                    state.aggregate_fees[i].swap_raw,
                    aggregate_raw,
                    "swap fee accrual",
                )?;
            }

            let new_raw = fp::sub(
                fp::sub(data.balances_raw[i], amount_out_raw, "pool balance")?,
                aggregate_raw,
                "aggregate fee exceeds balance",
            )?;
            let new_live = fp::sub(
                fp::sub(
                    data.balances_live_scaled18[i],
                    amounts_out_scaled18[i],
                    "pool balance",
                )?,
                aggregate_scaled18,
                "aggregate fee exceeds balance",
            )?;
            self.vault
                .set_pool_balance(params.pool, i, new_raw, new_live)?;
            amounts_out_raw.push(amount_out_raw);
        }

        let mut reported_amounts_out = amounts_out_raw.clone();
        if flags.should_call_after_remove_liquidity {
            if let Some(hooks) = hooks {
                let context = AfterRemoveLiquidityContext {
                    pool: params.pool,
                    from: params.from,
                    kind: params.kind,
                    bpt_amount_in,
                    amounts_out_raw: amounts_out_raw.clone(),
                };
                let adjusted = hooks
                    .try_borrow_mut()
                    .map_err(|_| VaultError::ReentrantHookCall)?
                    .on_after_remove_liquidity(&context, self)
                    .ok_or(VaultError::AfterRemoveLiquidityHookFailed)?;
                if flags.enable_hook_adjusted_amounts {
                    if adjusted.len() != num_tokens {
                        return Err(VaultError::InputLengthMismatch);
                    }
                    for (i, &amount) in adjusted.iter().enumerate() {
                        if amount < params.min_amounts_out_raw[i] {
                            return Err(VaultError::AmountOutBelowMin {
                                amount,
                                limit: params.min_amounts_out_raw[i],
                            });
                        }
                    }
                    reported_amounts_out = adjusted;
                }
            }
        }

        debug!(
            pool = %params.pool,
            kind = %params.kind,
            bpt_amount_in,
            "liquidity removed"
        );
        Ok(RemoveLiquidityResult {
            bpt_amount_in,
            amounts_out_raw: reported_amounts_out,
        })
    }

    /// The emergency exit: proportional removal over raw balances, no
    /// hooks, no rate polling, no fees. Works while the pool is paused,
    /// but only with recovery mode active.
    ///
    /// # Errors
    ///
    /// [`VaultError::PoolNotInRecoveryMode`] when recovery mode is off;
    /// otherwise share-balance and minimum-output failures.
    pub fn remove_liquidity_recovery(
        &mut self,
        pool: Address,
        from: Address,
        exact_bpt_amount_in: u128,
        min_amounts_out_raw: &[u128],
    ) -> Result<Vec<u128>> {
        let (tokens, balances_raw, balances_live, total_supply) = {
            let state = self.vault.pool(pool)?;
            if !state.config.initialized {
                return Err(VaultError::PoolNotInitialized);
            }
            if !state.config.recovery_mode {
                return Err(VaultError::PoolNotInRecoveryMode);
            }
            let raw: Vec<u128> = state.balances.iter().map(|b| b.raw()).collect();
            let live: Vec<u128> = state.balances.iter().map(|b| b.live_scaled18()).collect();
            (state.tokens.clone(), raw, live, state.total_supply)
        };
        if min_amounts_out_raw.len() != tokens.len() {
            return Err(VaultError::InputLengthMismatch);
        }

        let amounts_out_raw = base_pool::compute_proportional_amounts_out(
            &balances_raw,
            total_supply,
            exact_bpt_amount_in,
        )?;
        // Stored live balances shrink by the same proportion; rates are
        // deliberately not polled here.
        let amounts_out_live = base_pool::compute_proportional_amounts_out(
            &balances_live,
            total_supply,
            exact_bpt_amount_in,
        )?;

        self.vault
            .pool_mut(pool)?
            .burn_shares(from, exact_bpt_amount_in)?;
        for i in 0..tokens.len() {
            if amounts_out_raw[i] < min_amounts_out_raw[i] {
                return Err(VaultError::AmountOutBelowMin {
                    amount: amounts_out_raw[i],
                    limit: min_amounts_out_raw[i],
                });
            }
            self.deltas.supply_credit(tokens[i], amounts_out_raw[i])?;
            self.vault.set_pool_balance(
                pool,
                i,
                balances_raw[i] - amounts_out_raw[i],
                balances_live[i] - amounts_out_live[i],
            )?;
        }

        debug!(%pool, %from, exact_bpt_amount_in, "recovery exit");
        Ok(amounts_out_raw)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ONE;
    use crate::state::{HookFlags, LiquidityManagement, RoleAccounts, TokenConfig, TokenType};
    use crate::traits::{PoolMath, PoolSwapRequest};
    use crate::vault::{PoolRegistration, Vault};
    use std::rc::Rc;

    #[derive(Debug)]
    struct LinearMath;

    impl PoolMath for LinearMath {
        fn compute_invariant(
            &self,
            balances: &[u128],
            _rounding: crate::domain::Rounding,
        ) -> Result<u128> {
            Ok(balances.iter().sum())
        }

        fn compute_balance(
            &self,
            balances: &[u128],
            token_index: usize,
            invariant_ratio: u128,
        ) -> Result<u128> {
            let invariant: u128 = balances.iter().sum();
            let target = fp::mul_up(invariant, invariant_ratio)?;
            fp::sub(target, invariant - balances[token_index], "linear balance")
        }

        fn on_swap(&self, request: &PoolSwapRequest<'_>) -> Result<u128> {
            Ok(request.amount_given_scaled18)
        }
    }

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 32])
    }

    fn standard_token(byte: u8) -> TokenConfig {
        TokenConfig {
            token: addr(byte),
            decimals: 18,
            token_type: TokenType::Standard,
            rate_provider: None,
            paying_yield_fees: false,
        }
    }

    fn registered_pool(vault: &mut Vault, liquidity: LiquidityManagement) -> Address {
        let pool = addr(0xAA);
        vault
            .register_pool(
                pool,
                PoolRegistration {
                    tokens: vec![standard_token(1), standard_token(2)],
                    math: Rc::new(LinearMath),
                    hooks: None,
                    hook_flags: HookFlags::NONE,
                    role_accounts: RoleAccounts::default(),
                    liquidity_management: liquidity,
                    pause_window_end: 0,
                },
            )
            .unwrap();
        pool
    }

    fn initialized_pool(vault: &mut Vault) -> Address {
        let pool = registered_pool(vault, LiquidityManagement::default());
        vault
            .unlock(|session| {
                let amounts = [1_000 * ONE, 1_000 * ONE];
                session.initialize(pool, addr(9), &amounts, 0)?;
                session.settle(addr(1), amounts[0])?;
                session.settle(addr(2), amounts[1])?;
                Ok(())
            })
            .unwrap();
        pool
    }

    #[test]
    fn initialize_locks_minimum_supply() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        assert_eq!(
            vault.total_supply(pool),
            Ok(2_000 * ONE)
        );
        assert_eq!(
            vault.balance_of(pool, Address::zero()),
            Ok(POOL_MINIMUM_TOTAL_SUPPLY)
        );
        assert_eq!(
            vault.balance_of(pool, addr(9)),
            Ok(2_000 * ONE - POOL_MINIMUM_TOTAL_SUPPLY)
        );
        assert!(vault.pool_config(pool).unwrap().initialized);
    }

    #[test]
    fn initialize_twice_fails() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        let result = vault.unlock(|session| session.initialize(pool, addr(9), &[ONE, ONE], 0));
        assert_eq!(result, Err(VaultError::PoolAlreadyInitialized));
    }

    #[test]
    fn initialize_below_minimum_fails() {
        let mut vault = Vault::new();
        let pool = registered_pool(&mut vault, LiquidityManagement::default());
        let result = vault.unlock(|session| {
            session.initialize(pool, addr(9), &[100, 200], 0)
        });
        assert_eq!(result, Err(VaultError::PoolTotalSupplyTooLow));
    }

    #[test]
    fn proportional_add_and_remove_round_trip() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        let lp = addr(7);

        vault
            .unlock(|session| {
                let result = session.add_liquidity(AddLiquidityParams {
                    pool,
                    to: lp,
                    max_amounts_in_raw: vec![u128::MAX, u128::MAX],
                    min_bpt_amount_out: 200 * ONE,
                    kind: AddLiquidityKind::Proportional,
                    user_data: Vec::new(),
                })?;
                // 10% supply growth needs 10% of each balance.
                assert_eq!(result.amounts_in_raw, vec![100 * ONE, 100 * ONE]);
                session.settle(addr(1), result.amounts_in_raw[0])?;
                session.settle(addr(2), result.amounts_in_raw[1])?;
                Ok(())
            })
            .unwrap();
        assert_eq!(vault.balance_of(pool, lp), Ok(200 * ONE));
        assert_eq!(
            vault.pool_balances_raw(pool).unwrap(),
            vec![1_100 * ONE, 1_100 * ONE]
        );

        vault
            .unlock(|session| {
                let result = session.remove_liquidity(RemoveLiquidityParams {
                    pool,
                    from: lp,
                    max_bpt_amount_in: 200 * ONE,
                    min_amounts_out_raw: vec![0, 0],
                    kind: RemoveLiquidityKind::Proportional,
                    user_data: Vec::new(),
                })?;
                assert_eq!(result.amounts_out_raw, vec![100 * ONE, 100 * ONE]);
                for (token, amount) in [(addr(1), 100 * ONE), (addr(2), 100 * ONE)] {
                    session.send_to(token, lp, amount)?;
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(vault.balance_of(pool, lp), Ok(0));
    }

    #[test]
    fn unbalanced_add_gated() {
        let mut vault = Vault::new();
        let pool = registered_pool(
            &mut vault,
            LiquidityManagement {
                disable_unbalanced_liquidity: true,
                ..Default::default()
            },
        );
        vault
            .unlock(|session| {
                let amounts = [1_000 * ONE, 1_000 * ONE];
                session.initialize(pool, addr(9), &amounts, 0)?;
                session.settle(addr(1), amounts[0])?;
                session.settle(addr(2), amounts[1])?;
                Ok(())
            })
            .unwrap();
        let result = vault.unlock(|session| {
            session.add_liquidity(AddLiquidityParams {
                pool,
                to: addr(7),
                max_amounts_in_raw: vec![ONE, 0],
                min_bpt_amount_out: 0,
                kind: AddLiquidityKind::Unbalanced,
                user_data: Vec::new(),
            })
        });
        assert_eq!(result, Err(VaultError::DoesNotSupportUnbalancedLiquidity));
    }

    #[test]
    fn donation_gated() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        let result = vault.unlock(|session| {
            session.add_liquidity(AddLiquidityParams {
                pool,
                to: addr(7),
                max_amounts_in_raw: vec![ONE, ONE],
                min_bpt_amount_out: 0,
                kind: AddLiquidityKind::Donation,
                user_data: Vec::new(),
            })
        });
        assert_eq!(result, Err(VaultError::DoesNotSupportDonation));
    }

    #[test]
    fn donation_mints_nothing() {
        let mut vault = Vault::new();
        let pool = registered_pool(
            &mut vault,
            LiquidityManagement {
                enable_donation: true,
                ..Default::default()
            },
        );
        vault
            .unlock(|session| {
                let amounts = [1_000 * ONE, 1_000 * ONE];
                session.initialize(pool, addr(9), &amounts, 0)?;
                session.settle(addr(1), amounts[0])?;
                session.settle(addr(2), amounts[1])?;
                Ok(())
            })
            .unwrap();
        let supply_before = vault.total_supply(pool).unwrap();
        vault
            .unlock(|session| {
                let result = session.add_liquidity(AddLiquidityParams {
                    pool,
                    to: addr(7),
                    max_amounts_in_raw: vec![10 * ONE, 0],
                    min_bpt_amount_out: 0,
                    kind: AddLiquidityKind::Donation,
                    user_data: Vec::new(),
                })?;
                assert_eq!(result.bpt_amount_out, 0);
                session.settle(addr(1), 10 * ONE)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(vault.total_supply(pool).unwrap(), supply_before);
        assert_eq!(vault.pool_balances_raw(pool).unwrap()[0], 1_010 * ONE);
    }

    #[test]
    fn single_token_kinds_need_one_input() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        let result = vault.unlock(|session| {
            session.remove_liquidity(RemoveLiquidityParams {
                pool,
                from: addr(9),
                max_bpt_amount_in: ONE,
                min_amounts_out_raw: vec![1, 1],
                kind: RemoveLiquidityKind::SingleTokenExactIn,
                user_data: Vec::new(),
            })
        });
        assert_eq!(result, Err(VaultError::MultipleNonZeroInputs));
    }

    #[test]
    fn recovery_exit_requires_recovery_mode() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        let result = vault
            .unlock(|session| session.remove_liquidity_recovery(pool, addr(9), ONE, &[0, 0]));
        assert_eq!(result, Err(VaultError::PoolNotInRecoveryMode));
    }

    #[test]
    fn recovery_exit_works_while_paused() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        vault.pools.get_mut(&pool).unwrap().config.pause_window_end = 100;
        vault.set_pool_paused(pool, true).unwrap();
        vault.set_pool_recovery_mode(pool, true).unwrap();

        let held = vault.balance_of(pool, addr(9)).unwrap();
        vault
            .unlock(|session| {
                let amounts =
                    session.remove_liquidity_recovery(pool, addr(9), held / 2, &[0, 0])?;
                for (i, token) in [addr(1), addr(2)].into_iter().enumerate() {
                    session.send_to(token, addr(9), amounts[i])?;
                }
                Ok(())
            })
            .unwrap();
        assert_eq!(vault.balance_of(pool, addr(9)).unwrap(), held - held / 2);
    }

    #[test]
    fn recovery_mode_blocks_non_proportional_exits() {
        let mut vault = Vault::new();
        let pool = initialized_pool(&mut vault);
        vault.set_pool_recovery_mode(pool, true).unwrap();
        let result = vault.unlock(|session| {
            session.remove_liquidity(RemoveLiquidityParams {
                pool,
                from: addr(9),
                max_bpt_amount_in: ONE,
                min_amounts_out_raw: vec![1, 0],
                kind: RemoveLiquidityKind::SingleTokenExactIn,
                user_data: Vec::new(),
            })
        });
        assert_eq!(result, Err(VaultError::PoolInRecoveryMode));
    }
}
