//! Packed per-token pool balance.

use core::fmt;

use crate::error::{Result, VaultError};

/// A pool token's balance pair packed into a single 32-byte word.
///
/// The low half holds the **raw** balance (actual token units custodied
/// by the vault), the high half the **live** balance (normalized to 18
/// decimals and adjusted by the token's external rate). The pair is the
/// unit of per-token-per-pool state and is always written atomically.
///
/// # Examples
///
/// ```
/// use amm_vault::state::PackedBalance;
///
/// let packed = PackedBalance::pack(1_000, 1_000_000_000_000_000_000_000);
/// assert_eq!(packed.raw(), 1_000);
/// assert_eq!(packed.live_scaled18(), 1_000_000_000_000_000_000_000);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PackedBalance([u8; 32]);

impl PackedBalance {
    /// The zero balance pair.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Packs a `(raw, live)` pair into one word.
    #[must_use]
    pub const fn pack(raw: u128, live_scaled18: u128) -> Self {
        let lo = raw.to_be_bytes();
        let hi = live_scaled18.to_be_bytes();
        let mut word = [0u8; 32];
        let mut i = 0;
        while i < 16 {
            word[i] = hi[i];
            word[i + 16] = lo[i];
            i += 1;
        }
        Self(word)
    }

    /// Unpacks the word back into `(raw, live)`.
    #[must_use]
    pub const fn unpack(&self) -> (u128, u128) {
        let mut hi = [0u8; 16];
        let mut lo = [0u8; 16];
        let mut i = 0;
        while i < 16 {
            hi[i] = self.0[i];
            lo[i] = self.0[i + 16];
            i += 1;
        }
        (u128::from_be_bytes(lo), u128::from_be_bytes(hi))
    }

    /// Returns the raw balance half.
    #[must_use]
    pub const fn raw(&self) -> u128 {
        self.unpack().0
    }

    /// Returns the live (scaled-18, rate-adjusted) balance half.
    #[must_use]
    pub const fn live_scaled18(&self) -> u128 {
        self.unpack().1
    }

    /// Returns the underlying word.
    #[must_use]
    pub const fn as_word(&self) -> [u8; 32] {
        self.0
    }

    /// Adds to both halves atomically.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if either half overflows.
    pub fn credit(&self, raw: u128, live_scaled18: u128) -> Result<Self> {
        let (cur_raw, cur_live) = self.unpack();
        let new_raw = cur_raw
            .checked_add(raw)
            .ok_or(VaultError::Overflow("raw balance credit"))?;
        let new_live = cur_live
            .checked_add(live_scaled18)
            .ok_or(VaultError::Overflow("live balance credit"))?;
        Ok(Self::pack(new_raw, new_live))
    }

    /// Subtracts from both halves atomically.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Overflow`] if either half underflows;
    /// balances are always non-negative.
    pub fn debit(&self, raw: u128, live_scaled18: u128) -> Result<Self> {
        let (cur_raw, cur_live) = self.unpack();
        let new_raw = cur_raw
            .checked_sub(raw)
            .ok_or(VaultError::Overflow("raw balance debit"))?;
        let new_live = cur_live
            .checked_sub(live_scaled18)
            .ok_or(VaultError::Overflow("live balance debit"))?;
        Ok(Self::pack(new_raw, new_live))
    }
}

impl fmt::Debug for PackedBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (raw, live) = self.unpack();
        f.debug_struct("PackedBalance")
            .field("raw", &raw)
            .field("live_scaled18", &live)
            .finish()
    }
}
