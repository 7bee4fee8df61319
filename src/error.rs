//! Unified error types for the vault engine.
//!
//! All fallible operations across the crate return [`VaultError`] as their
//! error type, ensuring a consistent error handling experience for
//! consumers. The taxonomy mirrors the failure classes of the protocol:
//! precondition violations, limit violations, hook failures, settlement
//! failures and reentrancy violations. Every failure aborts the enclosing
//! transaction atomically; nothing is retried.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = VaultError> = core::result::Result<T, E>;

/// Unified error enum for all vault operations.
///
/// Variants are grouped by failure class. Arithmetic variants carry a
/// short static context string naming the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum VaultError {
    // -- Registry / lifecycle preconditions ---------------------------------
    /// The pool handle is already present in the registry.
    #[error("pool is already registered")]
    PoolAlreadyRegistered,
    /// The pool handle is not present in the registry.
    #[error("pool is not registered")]
    PoolNotRegistered,
    /// The pool has already received its bootstrap liquidity.
    #[error("pool is already initialized")]
    PoolAlreadyInitialized,
    /// The pool has not yet received its bootstrap liquidity.
    #[error("pool is not initialized")]
    PoolNotInitialized,
    /// The pool is paused and rejects all state-mutating operations.
    #[error("pool is paused")]
    PoolPaused,
    /// The pause window has elapsed; the pool can never be paused again.
    #[error("pool pause window has expired")]
    PoolPauseWindowExpired,
    /// The operation requires recovery mode to be active.
    #[error("pool is not in recovery mode")]
    PoolNotInRecoveryMode,
    /// The operation is unavailable while recovery mode is active.
    #[error("pool is in recovery mode")]
    PoolInRecoveryMode,
    /// Token count outside the supported `[2, 8]` range.
    #[error("invalid token count: {0}")]
    InvalidTokenCount(usize),
    /// The registration token list is not strictly sorted and unique.
    #[error("tokens must be strictly sorted and unique")]
    TokensNotSorted,
    /// A token declares more than 18 decimals.
    #[error("invalid token decimals: {0}")]
    InvalidTokenDecimals(u8),
    /// The token is not part of the pool's registered set.
    #[error("token is not registered with the pool")]
    TokenNotRegistered,
    /// The requested pause window ends beyond the maximum duration.
    #[error("pause window exceeds the maximum duration")]
    PauseWindowTooLong,
    /// A swap fee percentage outside the allowed bounds.
    #[error("invalid swap fee percentage")]
    InvalidSwapFeePercentage,
    /// An aggregate fee percentage outside the allowed bounds.
    #[error("invalid aggregate fee percentage")]
    InvalidAggregateFeePercentage,
    /// A percentage value exceeds 100% (scaled-18 one).
    #[error("percentage is above one")]
    PercentageAboveOne,

    // -- Settlement / transaction boundary ----------------------------------
    /// A second top-level unlock was attempted before the first unwound.
    #[error("vault is already unlocked")]
    VaultAlreadyUnlocked,
    /// One or more token deltas were non-zero when the unlock scope closed.
    #[error("balance not settled")]
    BalanceNotSettled,
    /// The vault does not hold enough of the token to pay out.
    #[error("insufficient vault reserve")]
    InsufficientVaultReserve,

    // -- Limit violations ----------------------------------------------------
    /// The calculated swap amount violated the caller's declared limit.
    #[error("swap limit violated: amount {amount}, limit {limit}")]
    SwapLimit {
        /// The calculated amount that broke the limit.
        amount: u128,
        /// The caller-declared limit.
        limit: u128,
    },
    /// Required input exceeds the caller's maximum.
    #[error("amount in above max: amount {amount}, max {limit}")]
    AmountInAboveMax {
        /// The computed input amount.
        amount: u128,
        /// The caller-declared maximum.
        limit: u128,
    },
    /// Produced output is below the caller's minimum.
    #[error("amount out below min: amount {amount}, min {limit}")]
    AmountOutBelowMin {
        /// The computed output amount.
        amount: u128,
        /// The caller-declared minimum.
        limit: u128,
    },
    /// Pool shares to burn exceed the caller's maximum.
    #[error("BPT amount in above max: amount {amount}, max {limit}")]
    BptAmountInAboveMax {
        /// The computed share amount.
        amount: u128,
        /// The caller-declared maximum.
        limit: u128,
    },
    /// Minted pool shares fall below the caller's minimum.
    #[error("BPT amount out below min: amount {amount}, min {limit}")]
    BptAmountOutBelowMin {
        /// The computed share amount.
        amount: u128,
        /// The caller-declared minimum.
        limit: u128,
    },
    /// A trade amount below the precision floor.
    #[error("trade amount too small")]
    TradeAmountTooSmall,
    /// The swap names the same token on both sides.
    #[error("cannot swap a token for itself")]
    CannotSwapSameToken,
    /// A burn would take the pool share supply below the bootstrap minimum.
    #[error("pool total supply too low")]
    PoolTotalSupplyTooLow,
    /// The account does not hold enough pool shares.
    #[error("insufficient pool share balance")]
    BptBalanceTooLow,

    // -- Hook failures -------------------------------------------------------
    /// The hook declined the pool registration.
    #[error("hook registration failed")]
    HookRegistrationFailed,
    /// The before-initialize hook declined the operation.
    #[error("before-initialize hook failed")]
    BeforeInitializeHookFailed,
    /// The after-initialize hook declined the operation.
    #[error("after-initialize hook failed")]
    AfterInitializeHookFailed,
    /// The before-swap hook declined the operation.
    #[error("before-swap hook failed")]
    BeforeSwapHookFailed,
    /// The after-swap hook declined the operation.
    #[error("after-swap hook failed")]
    AfterSwapHookFailed,
    /// The dynamic-fee hook declined to produce a fee.
    #[error("dynamic swap fee hook failed")]
    DynamicSwapFeeHookFailed,
    /// The before-add-liquidity hook declined the operation.
    #[error("before-add-liquidity hook failed")]
    BeforeAddLiquidityHookFailed,
    /// The after-add-liquidity hook declined the operation.
    #[error("after-add-liquidity hook failed")]
    AfterAddLiquidityHookFailed,
    /// The before-remove-liquidity hook declined the operation.
    #[error("before-remove-liquidity hook failed")]
    BeforeRemoveLiquidityHookFailed,
    /// The after-remove-liquidity hook declined the operation.
    #[error("after-remove-liquidity hook failed")]
    AfterRemoveLiquidityHookFailed,
    /// A hook re-entered an operation that dispatches to the same hook.
    #[error("reentrant hook dispatch")]
    ReentrantHookCall,

    // -- Liquidity kind gating -----------------------------------------------
    /// The pool disabled unbalanced liquidity operations.
    #[error("pool does not support unbalanced liquidity")]
    DoesNotSupportUnbalancedLiquidity,
    /// The pool did not enable custom add-liquidity.
    #[error("pool does not support custom add liquidity")]
    DoesNotSupportAddLiquidityCustom,
    /// The pool did not enable custom remove-liquidity.
    #[error("pool does not support custom remove liquidity")]
    DoesNotSupportRemoveLiquidityCustom,
    /// The pool did not enable donations.
    #[error("pool does not support donation")]
    DoesNotSupportDonation,
    /// Single-token kinds require exactly one non-zero amount entry.
    #[error("expected exactly one non-zero amount")]
    MultipleNonZeroInputs,
    /// An amounts vector does not match the pool's token count.
    #[error("input length mismatch")]
    InputLengthMismatch,

    // -- Buffers -------------------------------------------------------------
    /// The wrapped token already has an initialized buffer.
    #[error("buffer is already initialized")]
    BufferAlreadyInitialized,
    /// No buffer exists for the wrapped token.
    #[error("buffer is not initialized")]
    BufferNotInitialized,
    /// The owner does not hold enough buffer shares.
    #[error("insufficient buffer shares")]
    BufferSharesTooLow,
    /// A burn would take buffer shares below the bootstrap minimum.
    #[error("buffer total supply too low")]
    BufferTotalSupplyTooLow,
    /// The wrap/unwrap amount is below the precision floor.
    #[error("wrap amount too small")]
    WrapAmountTooSmall,
    /// The zero address cannot own pool or buffer shares.
    #[error("zero address cannot own shares")]
    ZeroShareOwner,

    // -- Arithmetic ----------------------------------------------------------
    /// Division by zero in fixed-point math.
    #[error("division by zero")]
    DivisionByZero,
    /// Arithmetic overflow with call-site context.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),
}
