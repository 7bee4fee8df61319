//! Wrapped-token buffers.
//!
//! A buffer holds an underlying/wrapped pair and serves wrap and unwrap
//! requests out of its own holdings whenever it can, touching the
//! external token only when its reserves fall short. On the external
//! path the vault converts the buffer's idle surplus along with the
//! request, nudging the buffer back toward balance. Buffer shares are
//! internal accounting only and are denominated in underlying value.

use std::collections::BTreeMap;

use tracing::debug;

use crate::constants::{BUFFER_MINIMUM_TOTAL_SUPPLY, MINIMUM_WRAP_AMOUNT};
use crate::domain::{Address, SwapKind, WrappingDirection};
use crate::error::{Result, VaultError};
use crate::math::fixed_point as fp;
use crate::state::PackedBalance;
use crate::vault::{Vault, VaultSession};

/// Vault-held state for one wrapped token's buffer.
///
/// The packed balance reuses the pool codec: the raw half holds the
/// underlying balance, the live half the wrapped balance.
#[derive(Debug, Clone)]
pub(crate) struct BufferState {
    /// The underlying asset, cached from the wrapped token.
    pub underlying: Address,
    /// Outstanding buffer shares, in underlying value.
    pub total_shares: u128,
    /// Share balances by owner.
    pub shares: BTreeMap<Address, u128>,
    /// Packed (underlying, wrapped) holdings.
    pub balances: PackedBalance,
}

impl BufferState {
    fn underlying_balance(&self) -> u128 {
        self.balances.raw()
    }

    fn wrapped_balance(&self) -> u128 {
        self.balances.live_scaled18()
    }

    fn set_balances(&mut self, underlying: u128, wrapped: u128) {
        self.balances = PackedBalance::pack(underlying, wrapped);
    }

    fn shares_of(&self, owner: Address) -> u128 {
        self.shares.get(&owner).copied().unwrap_or(0)
    }
}

/// A wrap or unwrap request against one buffer.
#[derive(Debug, Clone, Copy)]
pub struct WrapOrUnwrapParams {
    /// Underlying-to-wrapped or the reverse.
    pub direction: WrappingDirection,
    /// Whether `amount_given_raw` fixes the input or the output.
    pub kind: SwapKind,
    /// The wrapped token whose buffer is used.
    pub wrapped_token: Address,
    /// The fixed amount, raw units of the fixed side.
    pub amount_given_raw: u128,
    /// Minimum output (exact-in) or maximum input (exact-out), raw.
    pub limit_raw: u128,
}

impl Vault {
    fn buffer(&self, wrapped: Address) -> Result<&BufferState> {
        self.buffers
            .get(&wrapped)
            .ok_or(VaultError::BufferNotInitialized)
    }

    fn buffer_mut(&mut self, wrapped: Address) -> Result<&mut BufferState> {
        self.buffers
            .get_mut(&wrapped)
            .ok_or(VaultError::BufferNotInitialized)
    }

    /// The buffer's (underlying, wrapped) holdings.
    pub fn buffer_balances(&self, wrapped: Address) -> Result<(u128, u128)> {
        let buffer = self.buffer(wrapped)?;
        Ok((buffer.underlying_balance(), buffer.wrapped_balance()))
    }

    /// Outstanding buffer shares.
    pub fn buffer_total_shares(&self, wrapped: Address) -> Result<u128> {
        Ok(self.buffer(wrapped)?.total_shares)
    }

    /// `owner`'s buffer share balance.
    pub fn buffer_shares_of(&self, wrapped: Address, owner: Address) -> Result<u128> {
        Ok(self.buffer(wrapped)?.shares_of(owner))
    }
}

impl VaultSession<'_> {
    /// Creates the buffer for `wrapped` with its bootstrap liquidity.
    ///
    /// Shares equal the underlying value of both sides at the token's
    /// current rate; `BUFFER_MINIMUM_TOTAL_SUPPLY` of them is locked at
    /// the zero address.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate buffer, a zero recipient, or bootstrap value
    /// at or below the locked minimum.
    pub fn initialize_buffer(
        &mut self,
        wrapped: Address,
        token: &dyn crate::traits::WrappedToken,
        amount_underlying_raw: u128,
        amount_wrapped_raw: u128,
        to: Address,
    ) -> Result<u128> {
        if self.vault.buffers.contains_key(&wrapped) {
            return Err(VaultError::BufferAlreadyInitialized);
        }
        if to.is_zero() {
            return Err(VaultError::ZeroShareOwner);
        }

        let underlying = token.asset();
        let total_value = fp::add(
            amount_underlying_raw,
            token.convert_to_assets(amount_wrapped_raw),
            "buffer value",
        )?;
        let issued = total_value
            .checked_sub(BUFFER_MINIMUM_TOTAL_SUPPLY)
            .ok_or(VaultError::BufferTotalSupplyTooLow)?;
        if issued == 0 {
            return Err(VaultError::BufferTotalSupplyTooLow);
        }

        let mut shares = BTreeMap::new();
        shares.insert(Address::zero(), BUFFER_MINIMUM_TOTAL_SUPPLY);
        shares.insert(to, issued);
        self.vault.buffers.insert(
            wrapped,
            BufferState {
                underlying,
                total_shares: total_value,
                shares,
                balances: PackedBalance::pack(amount_underlying_raw, amount_wrapped_raw),
            },
        );
        self.deltas.take_debt(underlying, amount_underlying_raw)?;
        self.deltas.take_debt(wrapped, amount_wrapped_raw)?;

        debug!(%wrapped, %to, issued, "buffer initialized");
        Ok(issued)
    }

    /// Adds liquidity to an initialized buffer for exactly
    /// `exact_shares`. Amounts round up against the depositor.
    pub fn add_liquidity_to_buffer(
        &mut self,
        wrapped: Address,
        exact_shares: u128,
        to: Address,
    ) -> Result<(u128, u128)> {
        if to.is_zero() {
            return Err(VaultError::ZeroShareOwner);
        }
        let (underlying, amount_underlying, amount_wrapped) = {
            let buffer = self.vault.buffer(wrapped)?;
            (
                buffer.underlying,
                fp::mul_div_up(
                    buffer.underlying_balance(),
                    exact_shares,
                    buffer.total_shares,
                )?,
                fp::mul_div_up(buffer.wrapped_balance(), exact_shares, buffer.total_shares)?,
            )
        };
        self.deltas.take_debt(underlying, amount_underlying)?;
        self.deltas.take_debt(wrapped, amount_wrapped)?;

        let buffer = self.vault.buffer_mut(wrapped)?;
        let new_underlying = fp::add(
            buffer.underlying_balance(),
            amount_underlying,
            "buffer balance",
        )?;
        let new_wrapped = fp::add(buffer.wrapped_balance(), amount_wrapped, "buffer balance")?;
        buffer.set_balances(new_underlying, new_wrapped);
        buffer.total_shares = fp::add(buffer.total_shares, exact_shares, "buffer shares")?;
        let owned = buffer.shares.entry(to).or_insert(0);
        *owned = fp::add(*owned, exact_shares, "buffer shares")?;

        Ok((amount_underlying, amount_wrapped))
    }

    /// Removes `shares` worth of liquidity from the buffer. Amounts
    /// round down in the buffer's favor.
    ///
    /// # Errors
    ///
    /// Fails when `from` holds too few shares or the burn would breach
    /// the locked minimum supply.
    pub fn remove_liquidity_from_buffer(
        &mut self,
        wrapped: Address,
        shares: u128,
        from: Address,
    ) -> Result<(u128, u128)> {
        let (underlying, amount_underlying, amount_wrapped) = {
            let buffer = self.vault.buffer(wrapped)?;
            if buffer.shares_of(from) < shares {
                return Err(VaultError::BufferSharesTooLow);
            }
            let remaining = buffer
                .total_shares
                .checked_sub(shares)
                .ok_or(VaultError::BufferSharesTooLow)?;
            if remaining < BUFFER_MINIMUM_TOTAL_SUPPLY {
                return Err(VaultError::BufferTotalSupplyTooLow);
            }
            (
                buffer.underlying,
                fp::mul_div_down(
                    buffer.underlying_balance(),
                    shares,
                    buffer.total_shares,
                )?,
                fp::mul_div_down(buffer.wrapped_balance(), shares, buffer.total_shares)?,
            )
        };
        self.deltas.supply_credit(underlying, amount_underlying)?;
        self.deltas.supply_credit(wrapped, amount_wrapped)?;

        let buffer = self.vault.buffer_mut(wrapped)?;
        let new_underlying = fp::sub(
            buffer.underlying_balance(),
            amount_underlying,
            "buffer balance",
        )?;
        let new_wrapped = fp::sub(buffer.wrapped_balance(), amount_wrapped, "buffer balance")?;
        buffer.set_balances(new_underlying, new_wrapped);
        buffer.total_shares -= shares;
        let owned = buffer
            .shares
            .get_mut(&from)
            .ok_or(VaultError::BufferSharesTooLow)?;
        *owned -= shares;

        Ok((amount_underlying, amount_wrapped))
    }

    /// Converts between a wrapped token and its underlying through the
    /// buffer.
    ///
    /// Returns `(amount_in_raw, amount_out_raw)` where "in" is the token
    /// the caller owes the vault and "out" the token the vault owes the
    /// caller. Served internally whenever buffer holdings cover the
    /// request; otherwise the external token is called, and the buffer's
    /// idle surplus is converted alongside to rebalance it.
    ///
    /// # Errors
    ///
    /// Fails on an uninitialized buffer, an amount below
    /// `MINIMUM_WRAP_AMOUNT`, or a violated limit.
    pub fn wrap_or_unwrap(
        &mut self,
        params: WrapOrUnwrapParams,
        token: &mut dyn crate::traits::WrappedToken,
    ) -> Result<(u128, u128)> {
        if params.amount_given_raw < MINIMUM_WRAP_AMOUNT {
            return Err(VaultError::WrapAmountTooSmall);
        }
        let wrapped = params.wrapped_token;
        let underlying = self.vault.buffer(wrapped)?.underlying;

        let (amount_in, amount_out) = match params.direction {
            WrappingDirection::Wrap => self.wrap(wrapped, params, token)?,
            WrappingDirection::Unwrap => self.unwrap(wrapped, params, token)?,
        };

        match params.kind {
            SwapKind::ExactIn if amount_out < params.limit_raw => {
                return Err(VaultError::SwapLimit {
                    amount: amount_out,
                    limit: params.limit_raw,
                });
            }
            SwapKind::ExactOut if amount_in > params.limit_raw => {
                return Err(VaultError::SwapLimit {
                    amount: amount_in,
                    limit: params.limit_raw,
                });
            }
            _ => {}
        }

        let (token_in, token_out) = match params.direction {
            WrappingDirection::Wrap => (underlying, wrapped),
            WrappingDirection::Unwrap => (wrapped, underlying),
        };
        self.deltas.take_debt(token_in, amount_in)?;
        self.deltas.supply_credit(token_out, amount_out)?;

        debug!(
            %wrapped,
            direction = %params.direction,
            amount_in,
            amount_out,
            "wrap or unwrap executed"
        );
        Ok((amount_in, amount_out))
    }

    fn wrap(
        &mut self,
        wrapped: Address,
        params: WrapOrUnwrapParams,
        token: &mut dyn crate::traits::WrappedToken,
    ) -> Result<(u128, u128)> {
        let (amount_in, amount_out) = match params.kind {
            SwapKind::ExactIn => (
                params.amount_given_raw,
                token.preview_deposit(params.amount_given_raw),
            ),
            SwapKind::ExactOut => (
                token.preview_mint(params.amount_given_raw),
                params.amount_given_raw,
            ),
        };

        let buffer = self.vault.buffer(wrapped)?;
        if buffer.wrapped_balance() >= amount_out {
            // Internal: the buffer trades its wrapped for the incoming
            // underlying. Vault reserves are untouched.
            let new_underlying = fp::add(buffer.underlying_balance(), amount_in, "buffer")?;
            let new_wrapped = buffer.wrapped_balance() - amount_out;
            self.vault
                .buffer_mut(wrapped)?
                .set_balances(new_underlying, new_wrapped);
            return Ok((amount_in, amount_out));
        }

        // External: convert the buffer's idle underlying surplus along
        // with the request.
        let surplus = {
            let wrapped_as_underlying = token.convert_to_assets(buffer.wrapped_balance());
            buffer
                .underlying_balance()
                .saturating_sub(wrapped_as_underlying)
                / 2
        };
        let underlying_addr = buffer.underlying;
        let surplus_shares = token.convert_to_shares(surplus);
        let (amount_in, amount_out, total_underlying, total_wrapped) = match params.kind {
            SwapKind::ExactIn => {
                let total_underlying = fp::add(amount_in, surplus, "wrap amount")?;
                let minted = token.deposit(total_underlying);
                let out = fp::sub(minted, surplus_shares, "wrap output")?;
                (amount_in, out, total_underlying, minted)
            }
            SwapKind::ExactOut => {
                let total_wrapped = fp::add(amount_out, surplus_shares, "wrap amount")?;
                let spent = token.mint(total_wrapped);
                let amount_in = fp::sub(spent, surplus, "wrap input")?;
                (amount_in, amount_out, spent, total_wrapped)
            }
        };
        self.vault.debit_reserves(underlying_addr, total_underlying)?;
        self.vault.credit_reserves(wrapped, total_wrapped)?;
        let buffer = self.vault.buffer_mut(wrapped)?;
        let new_underlying = fp::sub(buffer.underlying_balance(), surplus, "buffer")?;
        let new_wrapped = fp::add(buffer.wrapped_balance(), surplus_shares, "buffer")?;
        buffer.set_balances(new_underlying, new_wrapped);
        Ok((amount_in, amount_out))
    }

    fn unwrap(
        &mut self,
        wrapped: Address,
        params: WrapOrUnwrapParams,
        token: &mut dyn crate::traits::WrappedToken,
    ) -> Result<(u128, u128)> {
        let (amount_in, amount_out) = match params.kind {
            SwapKind::ExactIn => (
                params.amount_given_raw,
                token.preview_redeem(params.amount_given_raw),
            ),
            SwapKind::ExactOut => (
                token.preview_withdraw(params.amount_given_raw),
                params.amount_given_raw,
            ),
        };

        let buffer = self.vault.buffer(wrapped)?;
        if buffer.underlying_balance() >= amount_out {
            let new_underlying = buffer.underlying_balance() - amount_out;
            let new_wrapped = fp::add(buffer.wrapped_balance(), amount_in, "buffer")?;
            self.vault
                .buffer_mut(wrapped)?
                .set_balances(new_underlying, new_wrapped);
            return Ok((amount_in, amount_out));
        }

        let surplus = {
            let underlying_as_wrapped = token.convert_to_shares(buffer.underlying_balance());
            buffer
                .wrapped_balance()
                .saturating_sub(underlying_as_wrapped)
                / 2
        };
        let underlying_addr = buffer.underlying;
        let surplus_assets = token.convert_to_assets(surplus);
        let (amount_in, amount_out, total_wrapped, total_underlying) = match params.kind {
            SwapKind::ExactIn => {
                let total_wrapped = fp::add(amount_in, surplus, "unwrap amount")?;
                let released = token.redeem(total_wrapped);
                let out = fp::sub(released, surplus_assets, "unwrap output")?;
                (amount_in, out, total_wrapped, released)
            }
            SwapKind::ExactOut => {
                let total_underlying = fp::add(amount_out, surplus_assets, "unwrap amount")?;
                let spent = token.withdraw(total_underlying);
                let amount_in = fp::sub(spent, surplus, "unwrap input")?;
                (amount_in, amount_out, spent, total_underlying)
            }
        };
        self.vault.debit_reserves(wrapped, total_wrapped)?;
        self.vault.credit_reserves(underlying_addr, total_underlying)?;
        let buffer = self.vault.buffer_mut(wrapped)?;
        let new_wrapped = fp::sub(buffer.wrapped_balance(), surplus, "buffer")?;
        let new_underlying = fp::add(buffer.underlying_balance(), surplus_assets, "buffer")?;
        buffer.set_balances(new_underlying, new_wrapped);
        Ok((amount_in, amount_out))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
