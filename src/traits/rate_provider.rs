//! External exchange-rate boundary.

use core::fmt;

/// Reports a token's external exchange rate, scaled-18.
///
/// Polled fresh at the start of any rate-sensitive operation — live
/// balances are never derived from a cached rate. A rate of `1e18` means
/// one token unit is worth exactly one underlying unit; yield-bearing
/// tokens typically report a monotonically growing rate.
///
/// Providers are external collaborators: the vault treats the returned
/// value as authoritative and applies its own rounding on top (see
/// [`crate::math::scaling`]).
pub trait RateProvider: fmt::Debug {
    /// Returns the current rate, scaled-18.
    fn get_rate(&self) -> u128;
}
