//! # AMM Vault
//!
//! A vault-architecture AMM engine: one state machine owns every token
//! balance, every pool's accounting and every fee, while pool math,
//! hook contracts, rate providers and wrapped tokens plug in behind
//! narrow traits.
//!
//! All mutating operations run inside a transaction scope opened with
//! [`Vault::unlock`]. The scope tracks token movements as signed deltas
//! and refuses to commit until every delta has been settled, so a batch
//! of swaps, liquidity operations and wraps either lands atomically or
//! not at all.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use amm_vault::domain::{Address, Rounding, SwapKind};
//! use amm_vault::error::Result;
//! use amm_vault::state::{HookFlags, LiquidityManagement, RoleAccounts, TokenConfig, TokenType};
//! use amm_vault::traits::{PoolMath, PoolSwapRequest};
//! use amm_vault::vault::{PoolRegistration, SwapParams, Vault};
//!
//! /// Constant-sum pricing: one unit in, one unit out.
//! #[derive(Debug)]
//! struct LinearMath;
//!
//! impl PoolMath for LinearMath {
//!     fn compute_invariant(&self, balances: &[u128], _: Rounding) -> Result<u128> {
//!         Ok(balances.iter().sum())
//!     }
//!     fn compute_balance(&self, balances: &[u128], i: usize, ratio: u128) -> Result<u128> {
//!         let invariant: u128 = balances.iter().sum();
//!         let target = amm_vault::math::fixed_point::mul_up(invariant, ratio)?;
//!         Ok(target - (invariant - balances[i]))
//!     }
//!     fn on_swap(&self, request: &PoolSwapRequest<'_>) -> Result<u128> {
//!         Ok(request.amount_given_scaled18)
//!     }
//! }
//!
//! const ONE: u128 = 1_000_000_000_000_000_000;
//! let token = |byte: u8, decimals: u8| TokenConfig {
//!     token: Address::from_bytes([byte; 32]),
//!     decimals,
//!     token_type: TokenType::Standard,
//!     rate_provider: None,
//!     paying_yield_fees: false,
//! };
//!
//! let mut vault = Vault::new();
//! let pool = Address::from_bytes([0xAA; 32]);
//! vault.register_pool(pool, PoolRegistration {
//!     tokens: vec![token(1, 18), token(2, 18)],
//!     math: Rc::new(LinearMath),
//!     hooks: None,
//!     hook_flags: HookFlags::NONE,
//!     role_accounts: RoleAccounts::default(),
//!     liquidity_management: LiquidityManagement::default(),
//!     pause_window_end: 0,
//! }).expect("registration");
//!
//! let lp = Address::from_bytes([9; 32]);
//! vault.unlock(|session| {
//!     session.initialize(pool, lp, &[1_000 * ONE, 1_000 * ONE], 0)?;
//!     session.settle(Address::from_bytes([1; 32]), 1_000 * ONE)?;
//!     session.settle(Address::from_bytes([2; 32]), 1_000 * ONE)?;
//!     Ok(())
//! }).expect("initialization");
//!
//! let result = vault.unlock(|session| {
//!     session.settle(Address::from_bytes([1; 32]), 100 * ONE)?;
//!     let result = session.swap(SwapParams {
//!         kind: SwapKind::ExactIn,
//!         pool,
//!         token_in: Address::from_bytes([1; 32]),
//!         token_out: Address::from_bytes([2; 32]),
//!         amount_given_raw: 100 * ONE,
//!         limit_raw: 0,
//!     })?;
//!     session.send_to(Address::from_bytes([2; 32]), lp, result.amount_out_raw)?;
//!     Ok(result)
//! }).expect("swap");
//!
//! assert_eq!(result.amount_out_raw, 100 * ONE);
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │    Router    │  settles debts, extracts credits
//! └──────┬──────┘
//!        │ unlock(|session| …)
//!        ▼
//! ┌─────────────┐
//! │    Vault     │  registry, reserves, settlement ledger, snapshot/rollback
//! └──────┬──────┘
//!        │ swap / add / remove / wrap
//!        ▼
//! ┌─────────────┐
//! │   Engines    │  swap, liquidity, buffer, fee accrual
//! └──────┬──────┘
//!        │ PoolMath + VaultHooks + RateProvider + WrappedToken traits
//!        ▼
//! ┌─────────────┐
//! │   Plugins    │  pool pricing, hook contracts, rates, ERC-4626 tokens
//! └─────────────┘
//! ```
//!
//! # Module Guide
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`domain`] | Value types: [`Address`](domain::Address), [`FeePercentage`](domain::FeePercentage), operation kinds, [`Rounding`](domain::Rounding) |
//! | [`math`] | Scaled-18 fixed point, decimal/rate scaling, invariant-ratio liquidity routines |
//! | [`state`] | [`PackedBalance`](state::PackedBalance) codec, pool configuration and registry records |
//! | [`traits`] | Plugin seams: [`PoolMath`](traits::PoolMath), [`VaultHooks`](traits::VaultHooks), [`RateProvider`](traits::RateProvider), [`WrappedToken`](traits::WrappedToken) |
//! | [`ledger`] | [`TokenDeltas`](ledger::TokenDeltas) signed settlement ledger |
//! | [`vault`] | [`Vault`](vault::Vault) and the engine entry points on [`VaultSession`](vault::VaultSession) |
//! | [`constants`] | Protocol-wide limits and minimums |
//! | [`error`] | [`VaultError`](error::VaultError) unified error enum |
//! | [`prelude`] | Convenience re-exports for common types and traits |
//!
//! [`Vault::unlock`]: vault::Vault::unlock

pub mod constants;
pub mod domain;
pub mod error;
pub mod ledger;
pub mod math;
pub mod prelude;
pub mod state;
pub mod traits;
pub mod vault;
