//! Convenience re-exports for common types and traits.
//!
//! A single import brings the working set into scope:
//!
//! ```rust
//! use amm_vault::prelude::*;
//! ```

// Domain value types
pub use crate::domain::{
    AddLiquidityKind, Address, FeePercentage, RemoveLiquidityKind, Rounding, SwapKind,
    WrappingDirection,
};

// Error types
pub use crate::error::{Result, VaultError};

// Ledger
pub use crate::ledger::TokenDeltas;

// Registry and configuration state
pub use crate::state::{
    AggregateFeeAmounts, HookFlags, LiquidityManagement, PackedBalance, PoolConfig, RoleAccounts,
    TokenConfig, TokenInfo, TokenType,
};

// Plugin traits
pub use crate::traits::{PoolMath, RateProvider, VaultHooks, WrappedToken};

// The vault and its operation parameter types
pub use crate::vault::{
    AddLiquidityParams, AddLiquidityResult, PoolRegistration, RemoveLiquidityParams,
    RemoveLiquidityResult, SwapParams, SwapResult, Vault, VaultSession, WrapOrUnwrapParams,
};
