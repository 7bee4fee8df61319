//! Boundaries to external collaborators: pool math, hook contracts,
//! rate providers and wrapped tokens.
//!
//! Everything behind these traits is untrusted. The engines re-check
//! pool state after any callback that could have re-entered the vault,
//! and validate every returned value against configured bounds before
//! acting on it.

mod hooks;
mod pool_math;
mod rate_provider;
mod wrapped_token;

pub use hooks::{
    AfterAddLiquidityContext, AfterRemoveLiquidityContext, AfterSwapContext,
    BeforeAddLiquidityContext, BeforeRemoveLiquidityContext, SwapHookContext, VaultHooks,
};
pub use pool_math::{
    CustomAddRequest, CustomAddResult, CustomRemoveRequest, CustomRemoveResult, PoolMath,
    PoolSwapRequest,
};
pub use rate_provider::RateProvider;
pub use wrapped_token::WrappedToken;
