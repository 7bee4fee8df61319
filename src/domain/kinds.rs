//! Operation kind descriptors for swaps, liquidity and wrapping.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Descriptor for the constraint driving a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum SwapKind {
    /// The input amount is fixed; output is computed.
    ExactIn = 0,
    /// The output amount is fixed; input is computed.
    ExactOut = 1,
}

impl SwapKind {
    /// Returns `true` for [`SwapKind::ExactIn`].
    #[must_use]
    pub const fn is_exact_in(&self) -> bool {
        matches!(self, Self::ExactIn)
    }
}

impl fmt::Display for SwapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactIn => write!(f, "ExactIn"),
            Self::ExactOut => write!(f, "ExactOut"),
        }
    }
}

/// The shape of an add-liquidity operation.
///
/// `Proportional` computes amounts directly from the share ratio and
/// never invokes pool math; the other kinds are individually gateable by
/// the pool's liquidity-management flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum AddLiquidityKind {
    /// Deposit in the pool's current balance proportions for an exact
    /// share amount.
    Proportional = 0,
    /// Deposit without minting any shares (value accrues to existing
    /// holders). Gated by `enable_donation`.
    Donation = 1,
    /// Deposit exact, arbitrary per-token amounts. Gated by
    /// `disable_unbalanced_liquidity`.
    Unbalanced = 2,
    /// Deposit a single token for an exact share amount. Gated by
    /// `disable_unbalanced_liquidity`.
    SingleTokenExactOut = 3,
    /// Delegate entirely to the pool's custom callback. Gated by
    /// `enable_add_liquidity_custom`.
    Custom = 4,
}

impl fmt::Display for AddLiquidityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proportional => write!(f, "Proportional"),
            Self::Donation => write!(f, "Donation"),
            Self::Unbalanced => write!(f, "Unbalanced"),
            Self::SingleTokenExactOut => write!(f, "SingleTokenExactOut"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// The shape of a remove-liquidity operation.
///
/// `Proportional` is the always-available exit path; in recovery mode it
/// is routed around hooks and pool math entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RemoveLiquidityKind {
    /// Burn an exact share amount for proportional token amounts.
    Proportional = 0,
    /// Burn an exact share amount for a single token. Gated by
    /// `disable_unbalanced_liquidity`.
    SingleTokenExactIn = 1,
    /// Receive an exact single-token amount for a computed share burn.
    /// Gated by `disable_unbalanced_liquidity`.
    SingleTokenExactOut = 2,
    /// Delegate entirely to the pool's custom callback. Gated by
    /// `enable_remove_liquidity_custom`.
    Custom = 3,
}

impl fmt::Display for RemoveLiquidityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Proportional => write!(f, "Proportional"),
            Self::SingleTokenExactIn => write!(f, "SingleTokenExactIn"),
            Self::SingleTokenExactOut => write!(f, "SingleTokenExactOut"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// Direction of a buffer wrap/unwrap operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum WrappingDirection {
    /// Underlying in, wrapped out.
    Wrap = 0,
    /// Wrapped in, underlying out.
    Unwrap = 1,
}

impl fmt::Display for WrappingDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wrap => write!(f, "Wrap"),
            Self::Unwrap => write!(f, "Unwrap"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_kind_predicates() {
        assert!(SwapKind::ExactIn.is_exact_in());
        assert!(!SwapKind::ExactOut.is_exact_in());
    }

    #[test]
    fn display_names() {
        assert_eq!(SwapKind::ExactOut.to_string(), "ExactOut");
        assert_eq!(AddLiquidityKind::Unbalanced.to_string(), "Unbalanced");
        assert_eq!(
            RemoveLiquidityKind::SingleTokenExactIn.to_string(),
            "SingleTokenExactIn"
        );
        assert_eq!(WrappingDirection::Unwrap.to_string(), "Unwrap");
    }

    #[test]
    fn kinds_are_comparable() {
        assert_eq!(AddLiquidityKind::Custom, AddLiquidityKind::Custom);
        assert_ne!(
            RemoveLiquidityKind::Proportional,
            RemoveLiquidityKind::Custom
        );
    }
}
