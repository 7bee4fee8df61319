//! Fundamental domain value types used throughout the vault.
//!
//! This module contains the core value types that model the protocol:
//! addresses, fee percentages, rounding directions, and the descriptor
//! enums for swap, liquidity and wrapping operations. All types use
//! newtypes with validated constructors to enforce invariants.

mod address;
mod fee_percentage;
mod kinds;
mod rounding;

pub use address::Address;
pub use fee_percentage::FeePercentage;
pub use kinds::{AddLiquidityKind, RemoveLiquidityKind, SwapKind, WrappingDirection};
pub use rounding::Rounding;
