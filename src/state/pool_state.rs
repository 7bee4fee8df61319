//! The vault's record of a registered pool.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::constants::POOL_MINIMUM_TOTAL_SUPPLY;
use crate::domain::Address;
use crate::error::{Result, VaultError};
use crate::state::{HookFlags, PackedBalance, PoolConfig, RoleAccounts, TokenInfo};
use crate::traits::{PoolMath, VaultHooks};

/// Aggregate (protocol + pool creator) fees accrued for one pool token,
/// in raw units, held in vault reserves until collected.
///
/// Monotonically non-decreasing except on collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AggregateFeeAmounts {
    /// Accrued from swap fees.
    pub swap_raw: u128,
    /// Accrued from rate-driven balance growth.
    pub yield_raw: u128,
}

impl AggregateFeeAmounts {
    /// Total accrued fees.
    ///
    /// # Errors
    ///
    /// [`VaultError::Overflow`] if the two accruals cannot be summed.
    pub fn total(&self) -> Result<u128> {
        self.swap_raw
            .checked_add(self.yield_raw)
            .ok_or(VaultError::Overflow("aggregate fee total"))
    }
}

/// Everything the vault stores per registered pool.
///
/// The token set and all plugin references are immutable after
/// registration; balances, fees and share accounting mutate on every
/// operation.
#[derive(Debug, Clone)]
pub(crate) struct PoolState {
    /// Strictly sorted, unique token list.
    pub tokens: Vec<Address>,
    /// Per-token metadata, parallel to `tokens`.
    pub token_info: Vec<TokenInfo>,
    /// Lifecycle and fee configuration.
    pub config: PoolConfig,
    /// Pricing plugin.
    pub math: Rc<dyn PoolMath>,
    /// Optional hook contract.
    pub hooks: Option<Rc<RefCell<dyn VaultHooks>>>,
    /// Which extension points the hook is called at.
    pub hook_flags: HookFlags,
    /// Role assignments recorded at registration.
    pub role_accounts: RoleAccounts,
    /// Packed (raw, live) balance per token, parallel to `tokens`.
    pub balances: Vec<PackedBalance>,
    /// Accrued aggregate fees per token, parallel to `tokens`.
    pub aggregate_fees: Vec<AggregateFeeAmounts>,
    /// Outstanding pool shares.
    pub total_supply: u128,
    /// Share balances by holder.
    pub share_balances: BTreeMap<Address, u128>,
}

impl PoolState {
    /// Index of `token` in the pool's ordered set.
    pub fn token_index(&self, token: Address) -> Result<usize> {
        self.tokens
            .binary_search(&token)
            .map_err(|_| VaultError::TokenNotRegistered)
    }

    /// Mints pool shares to `to`.
    pub fn mint_shares(&mut self, to: Address, amount: u128) -> Result<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(VaultError::Overflow("share mint"))?;
        let balance = self.share_balances.entry(to).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(VaultError::Overflow("share mint"))?;
        Ok(())
    }

    /// Burns pool shares from `from`, enforcing the minimum total supply.
    ///
    /// # Errors
    ///
    /// [`VaultError::BptBalanceTooLow`] if `from` holds too few shares;
    /// [`VaultError::PoolTotalSupplyTooLow`] if the burn would take the
    /// supply below the bootstrap minimum.
    pub fn burn_shares(&mut self, from: Address, amount: u128) -> Result<()> {
        let new_balance = self
            .share_balance_of(from)
            .checked_sub(amount)
            .ok_or(VaultError::BptBalanceTooLow)?;
        let new_supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(VaultError::BptBalanceTooLow)?;
        if new_supply < POOL_MINIMUM_TOTAL_SUPPLY {
            return Err(VaultError::PoolTotalSupplyTooLow);
        }
        self.share_balances.insert(from, new_balance);
        self.total_supply = new_supply;
        Ok(())
    }

    /// Share balance of `owner` (zero if never minted).
    pub fn share_balance_of(&self, owner: Address) -> u128 {
        self.share_balances.get(&owner).copied().unwrap_or(0)
    }
}

/// Snapshot of a pool's rate-refreshed working state, assembled at the
/// start of every operation that reads balances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolData {
    /// Raw balances per token.
    pub balances_raw: Vec<u128>,
    /// Live (scaled-18, rate-adjusted, yield-fee-net) balances per token.
    pub balances_live_scaled18: Vec<u128>,
    /// Rates polled from each token's provider (`1e18` for standard).
    pub rates: Vec<u128>,
    /// Decimal scaling factors per token.
    pub scaling_factors: Vec<u128>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rounding;
    use crate::traits::PoolSwapRequest;

    #[derive(Debug)]
    struct SumMath;

    impl PoolMath for SumMath {
        fn compute_invariant(&self, balances: &[u128], _rounding: Rounding) -> Result<u128> {
            Ok(balances.iter().sum())
        }

        fn compute_balance(&self, _b: &[u128], _i: usize, _r: u128) -> Result<u128> {
            unimplemented!()
        }

        fn on_swap(&self, _request: &PoolSwapRequest<'_>) -> Result<u128> {
            unimplemented!()
        }
    }

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 32])
    }

    fn two_token_pool() -> PoolState {
        PoolState {
            tokens: vec![addr(1), addr(2)],
            token_info: vec![TokenInfo::standard(); 2],
            config: PoolConfig::at_registration(0, Default::default()),
            math: Rc::new(SumMath),
            hooks: None,
            hook_flags: HookFlags::NONE,
            role_accounts: RoleAccounts::default(),
            balances: vec![PackedBalance::pack(0, 0); 2],
            aggregate_fees: vec![AggregateFeeAmounts::default(); 2],
            total_supply: 0,
            share_balances: BTreeMap::new(),
        }
    }

    // -- Share accounting ------------------------------------------------

    #[test]
    fn mint_then_burn_respects_minimum_supply() {
        let mut pool = two_token_pool();
        let lp = addr(9);
        pool.mint_shares(Address::zero(), POOL_MINIMUM_TOTAL_SUPPLY)
            .unwrap();
        pool.mint_shares(lp, 500).unwrap();
        assert_eq!(pool.total_supply, POOL_MINIMUM_TOTAL_SUPPLY + 500);

        pool.burn_shares(lp, 500).unwrap();
        assert_eq!(pool.share_balance_of(lp), 0);

        // The bootstrap shares are locked forever.
        assert_eq!(
            pool.burn_shares(Address::zero(), 1),
            Err(VaultError::PoolTotalSupplyTooLow)
        );
    }

    #[test]
    fn burn_more_than_balance_fails() {
        let mut pool = two_token_pool();
        let lp = addr(9);
        pool.mint_shares(Address::zero(), POOL_MINIMUM_TOTAL_SUPPLY)
            .unwrap();
        pool.mint_shares(lp, 100).unwrap();
        assert_eq!(
            pool.burn_shares(lp, 101),
            Err(VaultError::BptBalanceTooLow)
        );
        // Nothing changed.
        assert_eq!(pool.share_balance_of(lp), 100);
    }

    #[test]
    fn token_index_looks_up_sorted_tokens() {
        let pool = two_token_pool();
        assert_eq!(pool.token_index(addr(2)), Ok(1));
        assert_eq!(
            pool.token_index(addr(7)),
            Err(VaultError::TokenNotRegistered)
        );
    }

    // -- Aggregate fees --------------------------------------------------

    #[test]
    fn aggregate_fee_total() {
        let fees = AggregateFeeAmounts {
            swap_raw: 3,
            yield_raw: 4,
        };
        assert_eq!(fees.total(), Ok(7));
    }

    #[test]
    fn aggregate_fee_total_overflow_is_an_error() {
        let fees = AggregateFeeAmounts {
            swap_raw: u128::MAX,
            yield_raw: 1,
        };
        assert_eq!(fees.total(), Err(VaultError::Overflow("aggregate fee total")));
    }
}
