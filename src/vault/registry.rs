//! Pool registration and lifecycle management.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::debug;

use crate::constants::{MAX_PAUSE_WINDOW_DURATION, MAX_TOKENS, MIN_TOKENS};
use crate::domain::{Address, FeePercentage};
use crate::error::{Result, VaultError};
use crate::math::scaling;
use crate::state::{
    AggregateFeeAmounts, HookFlags, LiquidityManagement, PackedBalance, PoolConfig, PoolState,
    RoleAccounts, TokenConfig, TokenInfo,
};
use crate::traits::{PoolMath, VaultHooks};
use crate::vault::Vault;

/// Everything a pool supplies at registration.
#[derive(Debug, Clone)]
pub struct PoolRegistration {
    /// Token set, strictly sorted by address, with per-token metadata.
    pub tokens: Vec<TokenConfig>,
    /// Pricing plugin.
    pub math: Rc<dyn PoolMath>,
    /// Optional hook contract.
    pub hooks: Option<Rc<RefCell<dyn VaultHooks>>>,
    /// Which extension points to call on the hook.
    pub hook_flags: HookFlags,
    /// Role assignments (recorded, not permission-checked).
    pub role_accounts: RoleAccounts,
    /// Supported liquidity operation shapes.
    pub liquidity_management: LiquidityManagement,
    /// Timestamp after which the pool can no longer be paused.
    pub pause_window_end: u64,
}

impl Vault {
    /// Registers a pool.
    ///
    /// Token addresses must be strictly ascending (sorted, no
    /// duplicates) so that every balance vector across the crate shares
    /// one canonical order. When a hook contract is supplied its
    /// `on_register` is consulted and may veto the pool.
    ///
    /// # Errors
    ///
    /// Rejects duplicate registration, token counts outside `[2, 8]`,
    /// unsorted or duplicate tokens, tokens with more than 18 decimals,
    /// pause windows beyond the maximum duration, and hook vetoes.
    pub fn register_pool(&mut self, pool: Address, registration: PoolRegistration) -> Result<()> {
        if self.pools.contains_key(&pool) {
            return Err(VaultError::PoolAlreadyRegistered);
        }
        let num_tokens = registration.tokens.len();
        if !(MIN_TOKENS..=MAX_TOKENS).contains(&num_tokens) {
            return Err(VaultError::InvalidTokenCount(num_tokens));
        }
        let sorted = registration
            .tokens
            .windows(2)
            .all(|pair| pair[0].token < pair[1].token);
        if !sorted {
            return Err(VaultError::TokensNotSorted);
        }
        let max_window_end = self
            .timestamp()
            .checked_add(MAX_PAUSE_WINDOW_DURATION)
            .ok_or(VaultError::PauseWindowTooLong)?;
        if registration.pause_window_end > max_window_end {
            return Err(VaultError::PauseWindowTooLong);
        }

        let mut tokens = Vec::with_capacity(num_tokens);
        let mut token_info = Vec::with_capacity(num_tokens);
        for config in &registration.tokens {
            tokens.push(config.token);
            token_info.push(TokenInfo {
                token_type: config.token_type,
                rate_provider: config.rate_provider.clone(),
                paying_yield_fees: config.paying_yield_fees,
                scaling_factor: scaling::compute_scaling_factor(config.decimals)?,
            });
        }

        if let Some(hooks) = &registration.hooks {
            let accepted = hooks.borrow_mut().on_register(
                pool,
                &tokens,
                &registration.liquidity_management,
            );
            if !accepted {
                return Err(VaultError::HookRegistrationFailed);
            }
        }

        self.pools.insert(
            pool,
            PoolState {
                tokens,
                token_info,
                config: PoolConfig::at_registration(
                    registration.pause_window_end,
                    registration.liquidity_management,
                ),
                math: registration.math,
                hooks: registration.hooks,
                hook_flags: registration.hook_flags,
                role_accounts: registration.role_accounts,
                balances: vec![PackedBalance::default(); num_tokens],
                aggregate_fees: vec![AggregateFeeAmounts::default(); num_tokens],
                total_supply: 0,
                share_balances: BTreeMap::new(),
            },
        );
        debug!(%pool, tokens = num_tokens, "pool registered");
        Ok(())
    }

    /// Sets the pool's static swap fee, bounds-checked.
    pub fn set_static_swap_fee_percentage(
        &mut self,
        pool: Address,
        fee: FeePercentage,
    ) -> Result<()> {
        PoolConfig::validate_static_swap_fee(fee)?;
        self.pool_mut(pool)?.config.static_swap_fee = fee;
        Ok(())
    }

    /// Sets the aggregate swap fee percentage, capped at the protocol
    /// maximum.
    pub fn set_aggregate_swap_fee_percentage(
        &mut self,
        pool: Address,
        fee: FeePercentage,
    ) -> Result<()> {
        PoolConfig::validate_aggregate_fee(fee)?;
        self.pool_mut(pool)?.config.aggregate_swap_fee = fee;
        Ok(())
    }

    /// Sets the aggregate yield fee percentage, capped at the protocol
    /// maximum.
    pub fn set_aggregate_yield_fee_percentage(
        &mut self,
        pool: Address,
        fee: FeePercentage,
    ) -> Result<()> {
        PoolConfig::validate_aggregate_fee(fee)?;
        self.pool_mut(pool)?.config.aggregate_yield_fee = fee;
        Ok(())
    }

    /// Pauses or unpauses the pool.
    ///
    /// Pausing is only possible while the pause window is open.
    /// Unpausing works at any time, including after the window closed.
    ///
    /// # Errors
    ///
    /// [`VaultError::PoolPauseWindowExpired`] when pausing after the
    /// window end.
    pub fn set_pool_paused(&mut self, pool: Address, paused: bool) -> Result<()> {
        let now = self.timestamp();
        let state = self.pool_mut(pool)?;
        if paused && now > state.config.pause_window_end {
            return Err(VaultError::PoolPauseWindowExpired);
        }
        state.config.paused = paused;
        debug!(%pool, paused, "pool pause state changed");
        Ok(())
    }

    /// Toggles recovery mode, the emergency state in which the only
    /// guaranteed operation is the hook-free proportional exit.
    pub fn set_pool_recovery_mode(&mut self, pool: Address, recovery_mode: bool) -> Result<()> {
        self.pool_mut(pool)?.config.recovery_mode = recovery_mode;
        debug!(%pool, recovery_mode, "pool recovery mode changed");
        Ok(())
    }

    // -- Getters -------------------------------------------------------------

    /// The pool's registered token set, in canonical order.
    pub fn pool_tokens(&self, pool: Address) -> Result<&[Address]> {
        Ok(&self.pool(pool)?.tokens)
    }

    /// The pool's current configuration.
    pub fn pool_config(&self, pool: Address) -> Result<PoolConfig> {
        Ok(self.pool(pool)?.config)
    }

    /// Raw balances per token, in canonical order.
    pub fn pool_balances_raw(&self, pool: Address) -> Result<Vec<u128>> {
        Ok(self.pool(pool)?.balances.iter().map(|b| b.raw()).collect())
    }

    /// Last stored live balances per token, in canonical order.
    pub fn pool_balances_live(&self, pool: Address) -> Result<Vec<u128>> {
        Ok(self
            .pool(pool)?
            .balances
            .iter()
            .map(|b| b.live_scaled18())
            .collect())
    }

    /// Accrued, uncollected aggregate fees per token.
    pub fn pool_aggregate_fees(&self, pool: Address) -> Result<Vec<AggregateFeeAmounts>> {
        Ok(self.pool(pool)?.aggregate_fees.clone())
    }

    /// The pool's outstanding share supply.
    pub fn total_supply(&self, pool: Address) -> Result<u128> {
        Ok(self.pool(pool)?.total_supply)
    }

    /// `owner`'s pool share balance.
    pub fn balance_of(&self, pool: Address, owner: Address) -> Result<u128> {
        Ok(self.pool(pool)?.share_balance_of(owner))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
