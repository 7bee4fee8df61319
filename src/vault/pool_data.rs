//! Pool data loading: rate polling, live-balance refresh and yield-fee
//! accrual.
//!
//! Every engine operation starts by loading a [`PoolData`] snapshot.
//! Loading is itself a mutation: rates are polled from each token's
//! provider, live balances are recomputed from raw, and the growth of a
//! rate-bearing balance since the last stored value is charged the
//! pool's aggregate yield fee before the snapshot is handed out.

use tracing::trace;

use crate::domain::{Address, Rounding};
use crate::error::Result;
use crate::math::{fixed_point as fp, scaling};
use crate::state::{PackedBalance, PoolData, TokenType};
use crate::vault::Vault;

impl Vault {
    /// Refreshes and returns the pool's working data.
    ///
    /// Rate-bearing, non-exempt tokens are charged the aggregate yield
    /// fee on live-balance growth here; the fee rounds up and is
    /// deducted from the pool's stored balance, leaving it unassigned
    /// in vault reserves until collected.
    pub(crate) fn load_pool_data(&mut self, pool: Address) -> Result<PoolData> {
        let state = self.pool_mut(pool)?;
        let num_tokens = state.tokens.len();
        let aggregate_yield_fee = state.config.aggregate_yield_fee;

        let mut data = PoolData {
            balances_raw: Vec::with_capacity(num_tokens),
            balances_live_scaled18: Vec::with_capacity(num_tokens),
            rates: Vec::with_capacity(num_tokens),
            scaling_factors: Vec::with_capacity(num_tokens),
        };

        for i in 0..num_tokens {
            let info = &state.token_info[i];
            let rate = info.rate();
            let factor = info.scaling_factor;
            let mut raw = state.balances[i].raw();
            let stored_live = state.balances[i].live_scaled18();
            let mut live = scaling::to_scaled18_apply_rate(raw, factor, rate, Rounding::Down)?;

            let charges_yield_fee = info.token_type == TokenType::WithRate
                && info.paying_yield_fees
                && !aggregate_yield_fee.is_zero();
            if charges_yield_fee && live > stored_live {
                let growth = live - stored_live;
                // Yield fee rounds up, in the vault's favor.
                let fee_scaled18 = fp::mul_up(growth, aggregate_yield_fee.get())?;
                let fee_raw =
                    scaling::to_raw_undo_rate(fee_scaled18, factor, rate, Rounding::Down)?;
                state.aggregate_fees[i].yield_raw = fp::add(
                    state.aggregate_fees[i].yield_raw,
                    fee_raw,
                    "yield fee accrual",
                )?;
                raw = fp::sub(raw, fee_raw, "yield fee exceeds balance")?;
                live = fp::sub(live, fee_scaled18, "yield fee exceeds balance")?;
                trace!(%pool, token_index = i, fee_raw, "charged aggregate yield fee");
            }

            state.balances[i] = PackedBalance::pack(raw, live);
            data.balances_raw.push(raw);
            data.balances_live_scaled18.push(live);
            data.rates.push(rate);
            data.scaling_factors.push(factor);
        }

        Ok(data)
    }

    /// Writes one token's balance pair back to pool storage.
    pub(crate) fn set_pool_balance(
        &mut self,
        pool: Address,
        token_index: usize,
        raw: u128,
        live_scaled18: u128,
    ) -> Result<()> {
        let state = self.pool_mut(pool)?;
        state.balances[token_index] = PackedBalance::pack(raw, live_scaled18);
        Ok(())
    }
}

/// Splits a swap fee into the pool's share and the aggregate (protocol +
/// creator) share. The aggregate part rounds down, in the pool's favor;
/// returns the aggregate amount scaled-18.
pub(crate) fn aggregate_fee_scaled18(
    total_fee_scaled18: u128,
    aggregate_percentage: u128,
) -> Result<u128> {
    if total_fee_scaled18 == 0 || aggregate_percentage == 0 {
        return Ok(0);
    }
    fp::mul_down(total_fee_scaled18, aggregate_percentage)
}
