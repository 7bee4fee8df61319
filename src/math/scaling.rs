//! Decimal scaling and external-rate application.
//!
//! Pool math operates on balances normalized to 18 decimals ("scaled-18")
//! and adjusted by each token's external exchange rate ("live"). This
//! module converts between a token's raw units and that normalized
//! representation. Every conversion takes an explicit [`Rounding`]
//! because the direction matters for solvency (see
//! [`crate::math::fixed_point`]).

use crate::domain::Rounding;
use crate::error::{Result, VaultError};
use crate::math::fixed_point as fp;

/// Computes the multiplier that lifts a token's raw units to 18 decimals:
/// `10^(18 - decimals)`.
///
/// # Errors
///
/// Returns [`VaultError::InvalidTokenDecimals`] for tokens with more than
/// 18 decimals; such tokens cannot be registered.
pub const fn compute_scaling_factor(decimals: u8) -> Result<u128> {
    if decimals > 18 {
        return Err(VaultError::InvalidTokenDecimals(decimals));
    }
    Ok(10u128.pow(18 - decimals as u32))
}

/// Converts a raw token amount to scaled-18 and applies the token's
/// external rate.
///
/// `scaled18 = (raw × factor) × rate / 1e18`, with the final rounding as
/// requested. The decimal scaling itself is exact (a power of ten
/// multiply); only the rate application can lose precision.
///
/// # Errors
///
/// Propagates overflow from the fixed-point layer.
pub fn to_scaled18_apply_rate(
    raw: u128,
    scaling_factor: u128,
    rate: u128,
    rounding: Rounding,
) -> Result<u128> {
    let scaled = raw
        .checked_mul(scaling_factor)
        .ok_or(VaultError::Overflow("decimal scaling"))?;
    match rounding {
        Rounding::Down => fp::mul_down(scaled, rate),
        Rounding::Up => fp::mul_up(scaled, rate),
    }
}

/// Converts a scaled-18, rate-adjusted amount back to raw token units.
///
/// `raw = (scaled18 × 1e18 / rate) / factor`, with the requested
/// rounding applied at both steps.
///
/// # Errors
///
/// Returns [`VaultError::DivisionByZero`] for a zero rate; propagates
/// overflow from the fixed-point layer.
pub fn to_raw_undo_rate(
    scaled18: u128,
    scaling_factor: u128,
    rate: u128,
    rounding: Rounding,
) -> Result<u128> {
    let unrated = match rounding {
        Rounding::Down => fp::div_down(scaled18, rate)?,
        Rounding::Up => fp::div_up(scaled18, rate)?,
    };
    if scaling_factor == 0 {
        return Err(VaultError::DivisionByZero);
    }
    Ok(match rounding {
        Rounding::Down => unrated / scaling_factor,
        Rounding::Up => unrated.div_ceil(scaling_factor),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ONE;

    #[test]
    fn scaling_factor_for_six_decimals() {
        assert_eq!(compute_scaling_factor(6), Ok(1_000_000_000_000));
    }

    #[test]
    fn scaling_factor_for_eighteen_decimals() {
        assert_eq!(compute_scaling_factor(18), Ok(1));
    }

    #[test]
    fn scaling_factor_rejects_nineteen() {
        assert_eq!(
            compute_scaling_factor(19),
            Err(VaultError::InvalidTokenDecimals(19))
        );
    }

    #[test]
    fn unit_rate_round_trip() {
        // 100 USDC (6 decimals) at rate 1.0.
        let factor = compute_scaling_factor(6).expect("valid");
        let scaled = to_scaled18_apply_rate(100_000_000, factor, ONE, Rounding::Down)
            .expect("fits");
        assert_eq!(scaled, 100 * ONE);
        let raw = to_raw_undo_rate(scaled, factor, ONE, Rounding::Down).expect("fits");
        assert_eq!(raw, 100_000_000);
    }

    #[test]
    fn rate_applies_multiplier() {
        // Rate 1.5 doubles-and-a-half the live value.
        let rate = 3 * ONE / 2;
        let scaled = to_scaled18_apply_rate(100, 1, rate, Rounding::Down).expect("fits");
        assert_eq!(scaled, 150);
    }

    #[test]
    fn rounding_direction_respected() {
        // raw=1, factor=1, rate slightly above one: up and down differ.
        let rate = ONE + 1;
        let down = to_scaled18_apply_rate(1, 1, rate, Rounding::Down).expect("fits");
        let up = to_scaled18_apply_rate(1, 1, rate, Rounding::Up).expect("fits");
        assert_eq!(down, 1);
        assert_eq!(up, 2);
    }

    #[test]
    fn undo_rate_rounds_up_against_caller() {
        // 1 scaled18 unit at rate 3e18 → 1/3 raw: 0 down, 1 up.
        let rate = 3 * ONE;
        assert_eq!(to_raw_undo_rate(1, 1, rate, Rounding::Down), Ok(0));
        assert_eq!(to_raw_undo_rate(1, 1, rate, Rounding::Up), Ok(1));
    }

    #[test]
    fn zero_rate_fails() {
        assert_eq!(
            to_raw_undo_rate(1, 1, 0, Rounding::Down),
            Err(VaultError::DivisionByZero)
        );
    }
}
