//! ERC-4626-style wrapped-token boundary.
//!
//! The buffer engine prices underlying↔wrapped conversions with the
//! wrapped token's own reported rates, serves what it can from internal
//! reserves, and falls back to these methods only when reserves are
//! insufficient. Preview methods must be side-effect free; the mutating
//! quartet performs the real conversion against the external contract.

use core::fmt;

use crate::domain::Address;

/// A wrapped (vault-share-style) token over some underlying asset.
///
/// Amount conventions follow ERC-4626: "assets" are underlying units,
/// "shares" are wrapped units. Implementations choose their own internal
/// rounding; the vault applies limit checks on top of whatever they
/// return.
pub trait WrappedToken: fmt::Debug {
    /// The underlying asset this token wraps.
    fn asset(&self) -> Address;

    /// Converts an asset amount to the equivalent share amount.
    fn convert_to_shares(&self, assets: u128) -> u128;

    /// Converts a share amount to the equivalent asset amount.
    fn convert_to_assets(&self, shares: u128) -> u128;

    /// Shares that would be minted for depositing `assets`.
    fn preview_deposit(&self, assets: u128) -> u128;

    /// Assets that would be required to mint `shares`.
    fn preview_mint(&self, shares: u128) -> u128;

    /// Assets that would be returned for redeeming `shares`.
    fn preview_redeem(&self, shares: u128) -> u128;

    /// Shares that would be burned to withdraw `assets`.
    fn preview_withdraw(&self, assets: u128) -> u128;

    /// Deposits `assets`, returns shares minted.
    fn deposit(&mut self, assets: u128) -> u128;

    /// Mints exactly `shares`, returns assets consumed.
    fn mint(&mut self, shares: u128) -> u128;

    /// Redeems exactly `shares`, returns assets released.
    fn redeem(&mut self, shares: u128) -> u128;

    /// Withdraws exactly `assets`, returns shares burned.
    fn withdraw(&mut self, assets: u128) -> u128;
}
