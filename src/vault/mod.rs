//! The vault: single owner of all token accounting.
//!
//! Every state-mutating operation runs inside an [`Vault::unlock`]
//! scope. The scope hands a [`VaultSession`] to the caller's closure;
//! the session records every token movement as a signed delta in the
//! settlement ledger and refuses to close until all deltas return to
//! zero. Any error inside the scope restores the pre-unlock snapshot,
//! so partial state is never observable.

mod buffer;
mod fees;
mod liquidity;
mod pool_data;
mod registry;
mod swap;

pub use buffer::WrapOrUnwrapParams;
pub use liquidity::{
    AddLiquidityParams, AddLiquidityResult, RemoveLiquidityParams, RemoveLiquidityResult,
};
pub use registry::PoolRegistration;
pub use swap::{SwapParams, SwapResult};

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::domain::Address;
use crate::error::{Result, VaultError};
use crate::ledger::TokenDeltas;
use crate::state::PoolState;

pub(crate) use buffer::BufferState;

/// The vault state machine.
///
/// Holds the pool registry, the vault's token reserves, and the wrapped
/// token buffers. Time is injected through [`Vault::set_timestamp`]
/// rather than read from a clock, so pause-window behavior is fully
/// deterministic.
#[derive(Debug, Default)]
pub struct Vault {
    pub(crate) pools: BTreeMap<Address, PoolState>,
    pub(crate) reserves: BTreeMap<Address, u128>,
    pub(crate) buffers: BTreeMap<Address, BufferState>,
    timestamp: u64,
    unlocked: bool,
}

impl Vault {
    /// Creates an empty vault at timestamp zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The vault's current notion of time, in seconds.
    #[must_use]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Advances (or rewinds, in tests) the vault clock.
    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }

    /// Whether an unlock scope is currently open.
    #[must_use]
    pub const fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// The vault's total holding of `token`, across pool balances,
    /// accrued fees and buffer balances.
    #[must_use]
    pub fn reserves_of(&self, token: Address) -> u128 {
        self.reserves.get(&token).copied().unwrap_or(0)
    }

    /// Opens the transaction scope and runs `op` against a session.
    ///
    /// The session accumulates signed token deltas; the scope closes
    /// successfully only if `op` succeeds *and* every delta has been
    /// settled back to zero. On any failure the vault state is restored
    /// to the pre-unlock snapshot and the error is propagated.
    ///
    /// # Errors
    ///
    /// [`VaultError::VaultAlreadyUnlocked`] when called from within an
    /// open scope; [`VaultError::BalanceNotSettled`] when `op` succeeds
    /// with outstanding deltas; otherwise whatever `op` returned.
    pub fn unlock<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut VaultSession<'_>) -> Result<T>,
    {
        self.begin_unlock()?;
        let snapshot = Snapshot::of(self);

        let mut session = VaultSession {
            vault: self,
            deltas: TokenDeltas::new(),
        };
        let outcome = op(&mut session).and_then(|value| {
            if session.deltas.is_settled() {
                Ok(value)
            } else {
                trace!(
                    outstanding = session.deltas.nonzero_count(),
                    "unlock scope closed with unsettled deltas"
                );
                Err(VaultError::BalanceNotSettled)
            }
        });
        drop(session);

        self.end_unlock();
        if outcome.is_err() {
            snapshot.restore(self);
        }
        debug!(ok = outcome.is_ok(), "unlock scope closed");
        outcome
    }

    fn begin_unlock(&mut self) -> Result<()> {
        if self.unlocked {
            return Err(VaultError::VaultAlreadyUnlocked);
        }
        self.unlocked = true;
        Ok(())
    }

    fn end_unlock(&mut self) {
        self.unlocked = false;
    }

    pub(crate) fn pool(&self, pool: Address) -> Result<&PoolState> {
        self.pools.get(&pool).ok_or(VaultError::PoolNotRegistered)
    }

    pub(crate) fn pool_mut(&mut self, pool: Address) -> Result<&mut PoolState> {
        self.pools
            .get_mut(&pool)
            .ok_or(VaultError::PoolNotRegistered)
    }

    /// Pool must be initialized and not paused. Engines call this at
    /// entry and again after any before-hook.
    pub(crate) fn ensure_pool_operational(&self, pool: Address) -> Result<()> {
        let state = self.pool(pool)?;
        if !state.config.initialized {
            return Err(VaultError::PoolNotInitialized);
        }
        if state.config.paused {
            return Err(VaultError::PoolPaused);
        }
        Ok(())
    }

    pub(crate) fn credit_reserves(&mut self, token: Address, amount: u128) -> Result<()> {
        let entry = self.reserves.entry(token).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(VaultError::Overflow("vault reserves"))?;
        Ok(())
    }

    pub(crate) fn debit_reserves(&mut self, token: Address, amount: u128) -> Result<()> {
        let entry = self
            .reserves
            .get_mut(&token)
            .ok_or(VaultError::InsufficientVaultReserve)?;
        *entry = entry
            .checked_sub(amount)
            .ok_or(VaultError::InsufficientVaultReserve)?;
        Ok(())
    }
}

/// Snapshot of everything an unlock scope may mutate.
#[derive(Debug)]
struct Snapshot {
    pools: BTreeMap<Address, PoolState>,
    reserves: BTreeMap<Address, u128>,
    buffers: BTreeMap<Address, BufferState>,
}

impl Snapshot {
    fn of(vault: &Vault) -> Self {
        Self {
            pools: vault.pools.clone(),
            reserves: vault.reserves.clone(),
            buffers: vault.buffers.clone(),
        }
    }

    fn restore(self, vault: &mut Vault) {
        vault.pools = self.pools;
        vault.reserves = self.reserves;
        vault.buffers = self.buffers;
    }
}

/// An open transaction scope over the vault.
///
/// All engine entry points (swap, liquidity, buffers, initialization)
/// live on the session, so the type system already rules out calling
/// them outside an unlock. Accounting convention: a positive delta
/// means the caller owes the vault, a negative delta means the vault
/// owes the caller.
#[derive(Debug)]
pub struct VaultSession<'a> {
    pub(crate) vault: &'a mut Vault,
    pub(crate) deltas: TokenDeltas,
}

impl VaultSession<'_> {
    /// Read access to the underlying vault.
    #[must_use]
    pub fn vault(&self) -> &Vault {
        self.vault
    }

    /// The current signed delta for `token`.
    #[must_use]
    pub fn delta_of(&self, token: Address) -> i128 {
        self.deltas.get(token)
    }

    /// Pays `amount` of `token` out of vault reserves to `to`, taking a
    /// matching debt. Routers call this to extract credits granted by
    /// swaps and liquidity removals.
    ///
    /// # Errors
    ///
    /// [`VaultError::InsufficientVaultReserve`] if reserves cannot cover
    /// the payout.
    pub fn send_to(&mut self, token: Address, to: Address, amount: u128) -> Result<()> {
        self.vault.debit_reserves(token, amount)?;
        self.deltas.take_debt(token, amount)?;
        trace!(%token, %to, amount, "sent from vault reserves");
        Ok(())
    }

    /// Acknowledges `amount` of `token` paid in to the vault, crediting
    /// reserves and reducing the caller's outstanding debt. Returns the
    /// credited amount.
    pub fn settle(&mut self, token: Address, amount: u128) -> Result<u128> {
        self.vault.credit_reserves(token, amount)?;
        self.deltas.supply_credit(token, amount)?;
        trace!(%token, amount, "settled into vault reserves");
        Ok(amount)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn token(byte: u8) -> Address {
        Address::from_bytes([byte; 32])
    }

    #[test]
    fn unlock_requires_settlement() {
        let mut vault = Vault::new();
        let result = vault.unlock(|session| {
            session.settle(token(1), 100)?;
            Ok(())
        });
        assert_eq!(result, Err(VaultError::BalanceNotSettled));
        // The rollback also discards the reserve credit.
        assert_eq!(vault.reserves_of(token(1)), 0);
    }

    #[test]
    fn settled_unlock_commits() {
        let mut vault = Vault::new();
        let payee = token(9);
        vault
            .unlock(|session| {
                session.settle(token(1), 100)?;
                session.send_to(token(1), payee, 100)?;
                Ok(())
            })
            .unwrap();
        // Tokens passed through: in at settle, out at send_to.
        assert_eq!(vault.reserves_of(token(1)), 0);
        assert!(!vault.is_unlocked());
    }

    #[test]
    fn error_inside_scope_rolls_back() {
        let mut vault = Vault::new();
        let result: Result<()> = vault.unlock(|session| {
            session.settle(token(1), 50)?;
            Err(VaultError::Overflow("forced"))
        });
        assert_eq!(result, Err(VaultError::Overflow("forced")));
        assert_eq!(vault.reserves_of(token(1)), 0);
    }

    #[test]
    fn nested_unlock_rejected() {
        let mut vault = Vault::new();
        vault.begin_unlock().unwrap();
        assert_eq!(vault.begin_unlock(), Err(VaultError::VaultAlreadyUnlocked));
        vault.end_unlock();
        assert!(vault.begin_unlock().is_ok());
    }

    #[test]
    fn send_to_needs_reserves() {
        let mut vault = Vault::new();
        let result = vault.unlock(|session| session.send_to(token(1), token(9), 1));
        assert_eq!(result, Err(VaultError::InsufficientVaultReserve));
    }
}
