//! Chain-agnostic entity handle.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A generic, chain-agnostic address identifying a token, pool, hook
/// contract or account.
///
/// Wraps a fixed-size `[u8; 32]` byte array. All 32-byte sequences are
/// valid addresses, so construction is infallible. Ordering is
/// lexicographic over the bytes; pool token lists are kept strictly
/// sorted under this ordering.
///
/// # Examples
///
/// ```
/// use amm_vault::domain::Address;
///
/// let addr = Address::from_bytes([1u8; 32]);
/// assert_eq!(addr.as_bytes(), [1u8; 32]);
/// assert!(Address::zero() < addr);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address([u8; 32]);

impl Address {
    /// Creates an `Address` from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the underlying 32-byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Returns the all-zero address.
    ///
    /// Used as the unspendable recipient of minimum bootstrap shares.
    #[must_use]
    pub const fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns `true` if this is the all-zero address.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < 32 {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl Default for Address {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address(0x")?;
        // First four bytes are enough to tell addresses apart in logs.
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        write!(f, "…)")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bytes_round_trip() {
        let bytes = [42u8; 32];
        let addr = Address::from_bytes(bytes);
        assert_eq!(addr.as_bytes(), bytes);
    }

    #[test]
    fn zero_is_all_zeros() {
        assert_eq!(Address::zero().as_bytes(), [0u8; 32]);
        assert!(Address::zero().is_zero());
    }

    #[test]
    fn nonzero_is_not_zero() {
        let mut bytes = [0u8; 32];
        bytes[31] = 1;
        assert!(!Address::from_bytes(bytes).is_zero());
    }

    #[test]
    fn ordering_is_lexicographic() {
        let lo = Address::from_bytes([0u8; 32]);
        let hi = Address::from_bytes([1u8; 32]);
        assert!(lo < hi);
    }

    #[test]
    fn display_is_full_hex() {
        let addr = Address::zero();
        let s = addr.to_string();
        assert_eq!(s.len(), 2 + 64);
        assert!(s.starts_with("0x"));
    }

    #[test]
    fn debug_is_abbreviated() {
        let addr = Address::from_bytes([0xabu8; 32]);
        let dbg = format!("{addr:?}");
        assert!(dbg.contains("0xabababab"));
    }

    #[test]
    fn copy_semantics() {
        let a = Address::from_bytes([5u8; 32]);
        let b = a;
        assert_eq!(a, b);
    }
}
