//! Scaled-18 fee percentage newtype.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ONE;
use crate::error::VaultError;

/// A fee percentage in 18-decimal fixed point, where `1e18` is 100%.
///
/// The constructor enforces the only universal bound — a percentage can
/// never exceed one. Stricter, context-specific bounds (e.g. the static
/// swap fee range, the aggregate fee cap) are checked where the
/// percentage is installed, not here.
///
/// # Examples
///
/// ```
/// use amm_vault::domain::FeePercentage;
///
/// // 0.3%
/// let fee = FeePercentage::new(3_000_000_000_000_000).expect("below one");
/// assert_eq!(fee.get(), 3_000_000_000_000_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[must_use]
pub struct FeePercentage(u128);

impl FeePercentage {
    /// The zero percentage.
    pub const ZERO: Self = Self(0);

    /// Creates a new `FeePercentage`.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::PercentageAboveOne`] if `value > 1e18`.
    pub const fn new(value: u128) -> Result<Self, VaultError> {
        if value > ONE {
            return Err(VaultError::PercentageAboveOne);
        }
        Ok(Self(value))
    }

    /// Returns the underlying scaled-18 value.
    #[must_use]
    pub const fn get(&self) -> u128 {
        self.0
    }

    /// Returns `true` if the percentage is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `1e18 - pct`, the share left after taking this percentage.
    #[must_use]
    pub const fn complement(&self) -> u128 {
        ONE - self.0
    }
}

impl fmt::Display for FeePercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Render as a decimal percentage, e.g. "0.3%".
        let whole = self.0 / (ONE / 100);
        let frac = self.0 % (ONE / 100) / (ONE / 100_000);
        if frac == 0 {
            write!(f, "{whole}%")
        } else {
            write!(f, "{whole}.{frac:03}%")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_above_one() {
        assert_eq!(
            FeePercentage::new(ONE + 1),
            Err(VaultError::PercentageAboveOne)
        );
    }

    #[test]
    fn new_accepts_one() {
        let pct = FeePercentage::new(ONE).expect("one is valid");
        assert_eq!(pct.get(), ONE);
    }

    #[test]
    fn zero_is_zero() {
        assert!(FeePercentage::ZERO.is_zero());
        assert_eq!(FeePercentage::ZERO.complement(), ONE);
    }

    #[test]
    fn complement_of_thirty_percent() {
        let pct = FeePercentage::new(3 * ONE / 10).expect("valid");
        assert_eq!(pct.complement(), 7 * ONE / 10);
    }

    #[test]
    fn display_whole_percent() {
        let pct = FeePercentage::new(ONE / 10).expect("valid");
        assert_eq!(pct.to_string(), "10%");
    }

    #[test]
    fn display_fractional_percent() {
        let pct = FeePercentage::new(3_000_000_000_000_000).expect("valid");
        assert_eq!(pct.to_string(), "0.300%");
    }

    #[test]
    fn ordering_follows_value() {
        let lo = FeePercentage::new(1).expect("valid");
        let hi = FeePercentage::new(2).expect("valid");
        assert!(lo < hi);
    }
}
