//! The per-unlock settlement ledger.
//!
//! Every token movement inside an unlocked session is recorded as a
//! signed delta: positive means the caller owes the vault, negative
//! means the vault owes the caller. The session may only close once
//! every delta has returned to zero; accounting is decoupled from
//! transfers so a router can batch many operations and settle the net.

use std::collections::BTreeMap;

use crate::domain::Address;
use crate::error::{Result, VaultError};

/// Signed token deltas accumulated within one unlocked session.
///
/// Entries are erased when they return to zero, so the nonzero count is
/// simply the map length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenDeltas {
    deltas: BTreeMap<Address, i128>,
}

impl TokenDeltas {
    /// An empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current delta for `token`; positive is owed to the vault.
    #[must_use]
    pub fn get(&self, token: Address) -> i128 {
        self.deltas.get(&token).copied().unwrap_or(0)
    }

    /// Number of tokens with an outstanding nonzero delta.
    #[must_use]
    pub fn nonzero_count(&self) -> usize {
        self.deltas.len()
    }

    /// True once every delta has been settled back to zero.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Records that the caller owes the vault `amount` of `token`.
    pub fn take_debt(&mut self, token: Address, amount: u128) -> Result<()> {
        self.apply(token, to_signed(amount)?)
    }

    /// Records that the vault owes the caller `amount` of `token`.
    pub fn supply_credit(&mut self, token: Address, amount: u128) -> Result<()> {
        self.apply(token, -to_signed(amount)?)
    }

    fn apply(&mut self, token: Address, signed: i128) -> Result<()> {
        let current = self.get(token);
        let next = current
            .checked_add(signed)
            .ok_or(VaultError::Overflow("token delta"))?;
        if next == 0 {
            self.deltas.remove(&token);
        } else {
            self.deltas.insert(token, next);
        }
        Ok(())
    }
}

fn to_signed(amount: u128) -> Result<i128> {
    i128::try_from(amount).map_err(|_| VaultError::Overflow("token delta"))
}
