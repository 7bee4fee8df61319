//! The swap engine.
//!
//! Pipeline: load pool data → before-swap hook → dynamic fee → pool
//! math → fee application → balance update → delta registration →
//! after-swap hook. Fees are always charged in the input token; the
//! aggregate portion is withheld from the pool's balance credit and
//! accrued for later collection. Rounding at every site favors the
//! vault: inputs round up, outputs round down.

use tracing::debug;

use crate::constants::MINIMUM_TRADE_AMOUNT;
use crate::domain::{Address, Rounding, SwapKind};
use crate::error::{Result, VaultError};
use crate::math::{fixed_point as fp, scaling};
use crate::traits::{AfterSwapContext, SwapHookContext};
use crate::vault::pool_data::aggregate_fee_scaled18;
use crate::vault::VaultSession;

/// A swap request against one pool.
#[derive(Debug, Clone, Copy)]
pub struct SwapParams {
    /// Whether `amount_given_raw` fixes the input or the output.
    pub kind: SwapKind,
    /// The pool to trade against.
    pub pool: Address,
    /// Token sold to the pool.
    pub token_in: Address,
    /// Token bought from the pool.
    pub token_out: Address,
    /// The fixed amount, in raw token units.
    pub amount_given_raw: u128,
    /// Minimum output (exact-in) or maximum input (exact-out), raw.
    pub limit_raw: u128,
}

/// Outcome of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapResult {
    /// The calculated amount in raw units: output for exact-in, input
    /// for exact-out. Reflects any hook adjustment.
    pub amount_calculated_raw: u128,
    /// Final input amount, raw.
    pub amount_in_raw: u128,
    /// Final output amount, raw.
    pub amount_out_raw: u128,
}

fn ensure_valid_trade_amount(scaled18: u128) -> Result<()> {
    if scaled18 < MINIMUM_TRADE_AMOUNT {
        return Err(VaultError::TradeAmountTooSmall);
    }
    Ok(())
}

impl VaultSession<'_> {
    /// Executes a swap. See the module docs for the pipeline.
    ///
    /// # Errors
    ///
    /// Any precondition, hook, pool-math or limit failure aborts the
    /// enclosing unlock scope atomically.
    pub fn swap(&mut self, params: SwapParams) -> Result<SwapResult> {
        if params.token_in == params.token_out {
            return Err(VaultError::CannotSwapSameToken);
        }
        self.vault.ensure_pool_operational(params.pool)?;

        let (index_in, index_out, hooks, flags, static_fee, aggregate_pct, math) = {
            let state = self.vault.pool(params.pool)?;
            if state.config.recovery_mode {
                return Err(VaultError::PoolInRecoveryMode);
            }
            (
                state.token_index(params.token_in)?,
                state.token_index(params.token_out)?,
                state.hooks.clone(),
                state.hook_flags,
                state.config.static_swap_fee,
                state.config.aggregate_swap_fee,
                state.math.clone(),
            )
        };

        let mut data = self.vault.load_pool_data(params.pool)?;
        let scale_given = |data: &crate::state::PoolData| -> Result<u128> {
            match params.kind {
                // Input fixed: round the vault's incoming amount down.
                SwapKind::ExactIn => scaling::to_scaled18_apply_rate(
                    params.amount_given_raw,
                    data.scaling_factors[index_in],
                    data.rates[index_in],
                    Rounding::Down,
                ),
                // Output fixed: round the vault's outgoing amount up.
                SwapKind::ExactOut => scaling::to_scaled18_apply_rate(
                    params.amount_given_raw,
                    data.scaling_factors[index_out],
                    data.rates[index_out],
                    Rounding::Up,
                ),
            }
        };
        let mut amount_given_scaled18 = scale_given(&data)?;

        if flags.should_call_before_swap {
            if let Some(hooks) = hooks.clone() {
                let context = SwapHookContext {
                    kind: params.kind,
                    pool: params.pool,
                    token_in: params.token_in,
                    token_out: params.token_out,
                    amount_given_scaled18,
                    balances_scaled18: data.balances_live_scaled18.clone(),
                };
                let accepted = hooks
                    .try_borrow_mut()
                    .map_err(|_| VaultError::ReentrantHookCall)?
                    .on_before_swap(&context, self);
                if !accepted {
                    return Err(VaultError::BeforeSwapHookFailed);
                }
                // The hook may have moved balances or rates.
                self.vault.ensure_pool_operational(params.pool)?;
                data = self.vault.load_pool_data(params.pool)?;
                amount_given_scaled18 = scale_given(&data)?;
            }
        }
        ensure_valid_trade_amount(amount_given_scaled18)?;

        let mut swap_fee = static_fee;
        if flags.should_call_compute_dynamic_swap_fee {
            if let Some(hooks) = hooks.clone() {
                let context = SwapHookContext {
                    kind: params.kind,
                    pool: params.pool,
                    token_in: params.token_in,
                    token_out: params.token_out,
                    amount_given_scaled18,
                    balances_scaled18: data.balances_live_scaled18.clone(),
                };
                swap_fee = hooks
                    .borrow_mut()
                    .on_compute_dynamic_swap_fee(&context, static_fee)
                    .ok_or(VaultError::DynamicSwapFeeHookFailed)?;
            }
        }

        let (amount_in_scaled18, amount_out_scaled18, total_fee_scaled18) = match params.kind {
            SwapKind::ExactIn => {
                // Fee comes off the given input before pricing; rounds
                // up so the pool never under-collects.
                let fee = fp::mul_up(amount_given_scaled18, swap_fee.get())?;
                let net_in = fp::sub(amount_given_scaled18, fee, "swap fee exceeds input")?;
                let out = math.on_swap(&crate::traits::PoolSwapRequest {
                    kind: params.kind,
                    amount_given_scaled18: net_in,
                    balances_scaled18: &data.balances_live_scaled18,
                    token_in_index: index_in,
                    token_out_index: index_out,
                })?;
                ensure_valid_trade_amount(out)?;
                (amount_given_scaled18, out, fee)
            }
            SwapKind::ExactOut => {
                let net_in = math.on_swap(&crate::traits::PoolSwapRequest {
                    kind: params.kind,
                    amount_given_scaled18,
                    balances_scaled18: &data.balances_live_scaled18,
                    token_in_index: index_in,
                    token_out_index: index_out,
                })?;
                ensure_valid_trade_amount(net_in)?;
                // Fee on top of the computed input, grossed up so that
                // removing the fee leaves exactly the computed amount.
                let fee = fp::mul_div_up(net_in, swap_fee.get(), fp::complement(swap_fee.get()))?;
                let gross_in = fp::add(net_in, fee, "swap input")?;
                (gross_in, amount_given_scaled18, fee)
            }
        };

        let (amount_in_raw, amount_out_raw) = match params.kind {
            SwapKind::ExactIn => {
                let out_raw = scaling::to_raw_undo_rate(
                    amount_out_scaled18,
                    data.scaling_factors[index_out],
                    data.rates[index_out],
                    Rounding::Down,
                )?;
                if out_raw < params.limit_raw {
                    return Err(VaultError::SwapLimit {
                        amount: out_raw,
                        limit: params.limit_raw,
                    });
                }
                (params.amount_given_raw, out_raw)
            }
            SwapKind::ExactOut => {
                let in_raw = scaling::to_raw_undo_rate(
                    amount_in_scaled18,
                    data.scaling_factors[index_in],
                    data.rates[index_in],
                    Rounding::Up,
                )?;
                if in_raw > params.limit_raw {
                    return Err(VaultError::SwapLimit {
                        amount: in_raw,
                        limit: params.limit_raw,
                    });
                }
                (in_raw, params.amount_given_raw)
            }
        };

        // Aggregate share of the fee leaves the pool's balance and is
        // accrued for the fee controller; the remainder stays with LPs.
        let aggregate_scaled18 = aggregate_fee_scaled18(total_fee_scaled18, aggregate_pct.get())?;
        let aggregate_raw = scaling::to_raw_undo_rate(
            aggregate_scaled18,
            data.scaling_factors[index_in],
            data.rates[index_in],
            Rounding::Down,
        )?;

        let new_raw_in = fp::sub(
            fp::add(data.balances_raw[index_in], amount_in_raw, "pool balance")?,
            aggregate_raw,
            "aggregate fee exceeds input",
        )?;
        let new_live_in = fp::sub(
            fp::add(
                data.balances_live_scaled18[index_in],
                amount_in_scaled18,
                "pool balance",
            )?,
            aggregate_scaled18,
            "aggregate fee exceeds input",
        )?;
        let new_raw_out = fp::sub(
            data.balances_raw[index_out],
            amount_out_raw,
            "pool balance underflow",
        )?;
        let new_live_out = fp::sub(
            data.balances_live_scaled18[index_out],
            amount_out_scaled18,
            "pool balance underflow",
        )?;
        self.vault
            .set_pool_balance(params.pool, index_in, new_raw_in, new_live_in)?;
        self.vault
            .set_pool_balance(params.pool, index_out, new_raw_out, new_live_out)?;
        if aggregate_raw > 0 {
            let state = self.vault.pool_mut(params.pool)?;
            state.aggregate_fees[index_in].swap_raw = fp::add(
                state.aggregate_fees[index_in].swap_raw,
                aggregate_raw,
                "swap fee accrual",
            )?;
        }

        self.deltas.take_debt(params.token_in, amount_in_raw)?;
        self.deltas.supply_credit(params.token_out, amount_out_raw)?;

        let mut amount_calculated_raw = match params.kind {
            SwapKind::ExactIn => amount_out_raw,
            SwapKind::ExactOut => amount_in_raw,
        };
        if flags.should_call_after_swap {
            if let Some(hooks) = hooks {
                let context = AfterSwapContext {
                    kind: params.kind,
                    pool: params.pool,
                    token_in: params.token_in,
                    token_out: params.token_out,
                    amount_in_scaled18,
                    amount_out_scaled18,
                    amount_calculated_raw,
                };
                let adjusted = hooks
                    .try_borrow_mut()
                    .map_err(|_| VaultError::ReentrantHookCall)?
                    .on_after_swap(&context, self)
                    .ok_or(VaultError::AfterSwapHookFailed)?;
                // The adjustment is funded by the hook's own session
                // operations; here it only changes what the caller sees,
                // and must still respect the declared limit.
                if flags.enable_hook_adjusted_amounts {
                    match params.kind {
                        SwapKind::ExactIn if adjusted < params.limit_raw => {
                            return Err(VaultError::SwapLimit {
                                amount: adjusted,
                                limit: params.limit_raw,
                            });
                        }
                        SwapKind::ExactOut if adjusted > params.limit_raw => {
                            return Err(VaultError::SwapLimit {
                                amount: adjusted,
                                limit: params.limit_raw,
                            });
                        }
                        _ => amount_calculated_raw = adjusted,
                    }
                }
            }
        }

        let result = SwapResult {
            amount_calculated_raw,
            amount_in_raw: match params.kind {
                SwapKind::ExactIn => amount_in_raw,
                SwapKind::ExactOut => amount_calculated_raw,
            },
            amount_out_raw: match params.kind {
                SwapKind::ExactIn => amount_calculated_raw,
                SwapKind::ExactOut => amount_out_raw,
            },
        };
        debug!(
            pool = %params.pool,
            kind = %params.kind,
            amount_in = result.amount_in_raw,
            amount_out = result.amount_out_raw,
            "swap executed"
        );
        Ok(result)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ONE;
    use crate::domain::FeePercentage;
    use crate::state::{HookFlags, LiquidityManagement, RoleAccounts, TokenConfig, TokenType};
    use crate::traits::{PoolMath, PoolSwapRequest};
    use crate::vault::{PoolRegistration, Vault};
    use std::rc::Rc;

    /// Constant-sum pricing: one unit in, one unit out.
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
            let others: u128 = invariant - balances[token_index];
            fp::sub(target, others, "linear balance")
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

    /// Registers a two-token linear pool and seeds it with `balance` of
    /// each token, bypassing initialization machinery.
    fn seeded_pool(vault: &mut Vault, fee: u128) -> Address {
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
                    liquidity_management: LiquidityManagement::default(),
                    pause_window_end: 0,
                },
            )
            .unwrap();
        let balance = 1_000 * ONE;
        let state = vault.pools.get_mut(&pool).unwrap();
        state.config.initialized = true;
        state.config.static_swap_fee = FeePercentage::new(fee).unwrap();
        for packed in &mut state.balances {
            *packed = crate::state::PackedBalance::pack(balance, balance);
        }
        vault.reserves.insert(addr(1), balance);
        vault.reserves.insert(addr(2), balance);
        pool
    }

    fn exact_in(pool: Address, amount: u128) -> SwapParams {
        SwapParams {
            kind: SwapKind::ExactIn,
            pool,
            token_in: addr(1),
            token_out: addr(2),
            amount_given_raw: amount,
            limit_raw: 0,
        }
    }

    #[test]
    fn exact_in_no_fee_is_one_to_one() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, 0);
        let result = vault
            .unlock(|session| {
                session.settle(addr(1), 100 * ONE)?;
                let result = session.swap(exact_in(pool, 100 * ONE))?;
                session.send_to(addr(2), addr(9), result.amount_out_raw)?;
                Ok(result)
            })
            .unwrap();
        assert_eq!(result.amount_out_raw, 100 * ONE);
        assert_eq!(vault.pool_balances_raw(pool).unwrap(), vec![
            1_100 * ONE,
            900 * ONE
        ]);
    }

    #[test]
    fn exact_in_fee_reduces_output() {
        let mut vault = Vault::new();
        // 1% fee.
        let pool = seeded_pool(&mut vault, ONE / 100);
        let result = vault
            .unlock(|session| {
                session.settle(addr(1), 100 * ONE)?;
                let result = session.swap(exact_in(pool, 100 * ONE))?;
                session.send_to(addr(2), addr(9), result.amount_out_raw)?;
                Ok(result)
            })
            .unwrap();
        assert_eq!(result.amount_out_raw, 99 * ONE);
        // No aggregate configured: the whole fee stays in the pool.
        assert_eq!(vault.pool_balances_raw(pool).unwrap(), vec![
            1_100 * ONE,
            901 * ONE
        ]);
    }

    #[test]
    fn exact_out_charges_grossed_up_fee() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, ONE / 100);
        let result = vault
            .unlock(|session| {
                let result = session.swap(SwapParams {
                    kind: SwapKind::ExactOut,
                    pool,
                    token_in: addr(1),
                    token_out: addr(2),
                    amount_given_raw: 99 * ONE,
                    limit_raw: u128::MAX,
                })?;
                session.settle(addr(1), result.amount_in_raw)?;
                session.send_to(addr(2), addr(9), 99 * ONE)?;
                Ok(result)
            })
            .unwrap();
        // in = 99 / (1 - 0.01) = 100 exactly.
        assert_eq!(result.amount_in_raw, 100 * ONE);
    }

    #[test]
    fn aggregate_fee_accrues_on_token_in() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, ONE / 100);
        // Half of each swap fee goes to the fee controller.
        vault
            .set_aggregate_swap_fee_percentage(pool, FeePercentage::new(ONE / 2).unwrap())
            .unwrap();
        vault
            .unlock(|session| {
                session.settle(addr(1), 100 * ONE)?;
                let result = session.swap(exact_in(pool, 100 * ONE))?;
                session.send_to(addr(2), addr(9), result.amount_out_raw)?;
                Ok(())
            })
            .unwrap();
        let fees = vault.pool_aggregate_fees(pool).unwrap();
        // Fee was 1, aggregate half of it.
        assert_eq!(fees[0].swap_raw, ONE / 2);
        assert_eq!(fees[1].swap_raw, 0);
        // The pool balance credit excludes the aggregate part.
        assert_eq!(
            vault.pool_balances_raw(pool).unwrap()[0],
            1_100 * ONE - ONE / 2
        );
    }

    #[test]
    fn output_limit_enforced() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, 0);
        let result = vault.unlock(|session| {
            let mut params = exact_in(pool, 100 * ONE);
            params.limit_raw = 101 * ONE;
            session.swap(params)
        });
        assert_eq!(
            result,
            Err(VaultError::SwapLimit {
                amount: 100 * ONE,
                limit: 101 * ONE
            })
        );
    }

    #[test]
    fn dust_trade_rejected() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, 0);
        let result = vault.unlock(|session| session.swap(exact_in(pool, MINIMUM_TRADE_AMOUNT - 1)));
        assert_eq!(result, Err(VaultError::TradeAmountTooSmall));
    }

    #[test]
    fn paused_pool_rejects_swaps() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, 0);
        vault.pools.get_mut(&pool).unwrap().config.pause_window_end = 100;
        vault.set_pool_paused(pool, true).unwrap();
        let result = vault.unlock(|session| session.swap(exact_in(pool, ONE)));
        assert_eq!(result, Err(VaultError::PoolPaused));
    }

    #[test]
    fn recovery_mode_blocks_swaps() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, 0);
        vault.set_pool_recovery_mode(pool, true).unwrap();
        let result = vault.unlock(|session| session.swap(exact_in(pool, ONE)));
        assert_eq!(result, Err(VaultError::PoolInRecoveryMode));
    }

    #[test]
    fn failed_swap_rolls_back_settlements() {
        let mut vault = Vault::new();
        let pool = seeded_pool(&mut vault, 0);
        let reserve_before = vault.reserves_of(addr(1));
        let result: Result<()> = vault.unlock(|session| {
            session.settle(addr(1), 100 * ONE)?;
            session.swap(exact_in(pool, MINIMUM_TRADE_AMOUNT - 1))?;
            Ok(())
        });
        assert_eq!(result, Err(VaultError::TradeAmountTooSmall));
        assert_eq!(vault.reserves_of(addr(1)), reserve_before);
    }
}
