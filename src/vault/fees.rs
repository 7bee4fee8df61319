//! Aggregate fee collection.
//!
//! Aggregate swap and yield fees accrue in raw units per pool token,
//! held inside vault reserves but outside any pool balance. Collection
//! is the fee-controller boundary: it zeroes the accruals and pays them
//! out of reserves in one step.

use tracing::debug;

use crate::domain::Address;
use crate::error::Result;
use crate::state::AggregateFeeAmounts;
use crate::vault::Vault;

impl Vault {
    /// Collects all accrued aggregate fees for `pool`, returning the
    /// per-token amounts in canonical order. Accruals are reset to zero
    /// and the totals leave vault reserves.
    ///
    /// # Errors
    ///
    /// Fails on an unregistered pool; a reserve shortfall indicates a
    /// solvency bug and also fails.
    pub fn collect_aggregate_fees(&mut self, pool: Address) -> Result<Vec<AggregateFeeAmounts>> {
        let (tokens, collected) = {
            let state = self.pool_mut(pool)?;
            let tokens = state.tokens.clone();
            let collected: Vec<AggregateFeeAmounts> = state
                .aggregate_fees
                .iter_mut()
                .map(|fees| std::mem::take(fees))
                .collect();
            (tokens, collected)
        };
        for (token, fees) in tokens.iter().zip(&collected) {
            let total = fees.total()?;
            if total > 0 {
                self.debit_reserves(*token, total)?;
            }
        }
        debug!(%pool, "aggregate fees collected");
        Ok(collected)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
