//! Per-token registration metadata.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::domain::Address;
use crate::traits::RateProvider;

/// How a token's live balance is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenType {
    /// Live balance is the raw balance scaled to 18 decimals; rate is
    /// identically one.
    Standard,
    /// Live balance is additionally multiplied by an external rate
    /// polled from the token's rate provider.
    WithRate,
}

/// A token's registration entry: identity plus rate semantics.
///
/// Supplied once per token at pool registration and immutable afterwards.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// The token's address.
    pub token: Address,
    /// The token's native decimals (at most 18).
    pub decimals: u8,
    /// Whether and how an external rate applies.
    pub token_type: TokenType,
    /// Rate source; required for [`TokenType::WithRate`], ignored for
    /// [`TokenType::Standard`].
    pub rate_provider: Option<Rc<dyn RateProvider>>,
    /// Whether rate-driven balance growth is charged the aggregate
    /// yield fee. Exempt tokens never pay it.
    pub paying_yield_fees: bool,
}

/// The per-token metadata the vault keeps after registration.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Whether and how an external rate applies.
    pub token_type: TokenType,
    /// Rate source for [`TokenType::WithRate`] tokens.
    pub rate_provider: Option<Rc<dyn RateProvider>>,
    /// Whether this token pays aggregate yield fees.
    pub paying_yield_fees: bool,
    /// Multiplier lifting raw units to 18 decimals.
    pub scaling_factor: u128,
}

impl TokenInfo {
    /// Metadata for a standard 18-decimal token with no rate provider.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            token_type: TokenType::Standard,
            rate_provider: None,
            paying_yield_fees: false,
            scaling_factor: 1,
        }
    }

    /// The token's current rate: polled from the provider for
    /// [`TokenType::WithRate`] tokens, identically one otherwise.
    #[must_use]
    pub fn rate(&self) -> u128 {
        match (&self.token_type, &self.rate_provider) {
            (TokenType::WithRate, Some(provider)) => provider.get_rate(),
            _ => crate::constants::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_type_equality() {
        assert_eq!(TokenType::Standard, TokenType::Standard);
        assert_ne!(TokenType::Standard, TokenType::WithRate);
    }
}
