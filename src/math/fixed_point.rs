//! Scaled-18 fixed-point arithmetic with explicit rounding.
//!
//! All monetary math in the vault routes through this module. Values are
//! `u128` integers representing quantities ×10^18 ("scaled-18");
//! intermediates widen to 256 bits so that products of two full-range
//! inputs never overflow before the final division.
//!
//! # Convention
//!
//! The rounding variant at each call site is a deliberate, auditable
//! decision biasing precision loss toward the vault:
//!
//! | Quantity | Variant | Rationale |
//! |----------|---------|-----------|
//! | Amount owed by the vault | `*_down` | Counterparty receives less |
//! | Amount owed to the vault | `*_up` | Counterparty pays more |
//! | Fee charged to the caller | `*_up` | Vault takes more |
//!
//! # Examples
//!
//! ```
//! use amm_vault::math::fixed_point as fp;
//! use amm_vault::constants::ONE;
//!
//! assert_eq!(fp::mul_down(ONE, ONE / 2), Ok(ONE / 2));
//! assert_eq!(fp::div_up(1, 3), Ok(1));
//! assert!(fp::div_down(1, 0).is_err());
//! ```

use primitive_types::U256;

use crate::constants::ONE;
use crate::error::{Result, VaultError};

/// Narrows a 256-bit intermediate back to `u128`.
fn narrow(value: U256, context: &'static str) -> Result<u128> {
    if value > U256::from(u128::MAX) {
        return Err(VaultError::Overflow(context));
    }
    Ok(value.as_u128())
}

/// `a × b / 1e18`, rounded down.
///
/// # Errors
///
/// Returns [`VaultError::Overflow`] if the result exceeds `u128::MAX`.
pub fn mul_down(a: u128, b: u128) -> Result<u128> {
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(ONE), "mul_down")
}

/// `a × b / 1e18`, rounded up.
///
/// `mul_up(a, b) >= mul_down(a, b)` for all inputs, with equality iff the
/// product is an exact multiple of `1e18`.
///
/// # Errors
///
/// Returns [`VaultError::Overflow`] if the result exceeds `u128::MAX`.
pub fn mul_up(a: u128, b: u128) -> Result<u128> {
    let product = U256::from(a) * U256::from(b);
    if product.is_zero() {
        return Ok(0);
    }
    narrow((product - 1) / U256::from(ONE) + 1, "mul_up")
}

/// `a × 1e18 / b`, rounded down.
///
/// # Errors
///
/// Returns [`VaultError::DivisionByZero`] if `b` is zero and
/// [`VaultError::Overflow`] if the result exceeds `u128::MAX`.
pub fn div_down(a: u128, b: u128) -> Result<u128> {
    if b == 0 {
        return Err(VaultError::DivisionByZero);
    }
    let numerator = U256::from(a) * U256::from(ONE);
    narrow(numerator / U256::from(b), "div_down")
}

/// `a × 1e18 / b`, rounded up.
///
/// `div_up(a, b) >= div_down(a, b)` for all inputs, with equality iff the
/// division is exact.
///
/// # Errors
///
/// Returns [`VaultError::DivisionByZero`] if `b` is zero and
/// [`VaultError::Overflow`] if the result exceeds `u128::MAX`.
pub fn div_up(a: u128, b: u128) -> Result<u128> {
    if b == 0 {
        return Err(VaultError::DivisionByZero);
    }
    if a == 0 {
        return Ok(0);
    }
    let numerator = U256::from(a) * U256::from(ONE);
    narrow((numerator - 1) / U256::from(b) + 1, "div_up")
}

/// `a × b / c` on plain integers (no scaled-18 base), rounded down.
///
/// # Errors
///
/// Returns [`VaultError::DivisionByZero`] if `c` is zero and
/// [`VaultError::Overflow`] if the result exceeds `u128::MAX`.
pub fn mul_div_down(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(VaultError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    narrow(product / U256::from(c), "mul_div_down")
}

/// `a × b / c` on plain integers (no scaled-18 base), rounded up.
///
/// # Errors
///
/// Returns [`VaultError::DivisionByZero`] if `c` is zero and
/// [`VaultError::Overflow`] if the result exceeds `u128::MAX`.
pub fn mul_div_up(a: u128, b: u128, c: u128) -> Result<u128> {
    if c == 0 {
        return Err(VaultError::DivisionByZero);
    }
    let product = U256::from(a) * U256::from(b);
    if product.is_zero() {
        return Ok(0);
    }
    narrow((product - 1) / U256::from(c) + 1, "mul_div_up")
}

/// `1e18 - x`, saturating at zero for `x > 1e18`.
#[must_use]
pub const fn complement(x: u128) -> u128 {
    if x < ONE {
        ONE - x
    } else {
        0
    }
}

/// Checked addition with call-site context.
///
/// # Errors
///
/// Returns [`VaultError::Overflow`] on overflow.
pub fn add(a: u128, b: u128, context: &'static str) -> Result<u128> {
    a.checked_add(b).ok_or(VaultError::Overflow(context))
}

/// Checked subtraction with call-site context.
///
/// # Errors
///
/// Returns [`VaultError::Overflow`] on underflow.
pub fn sub(a: u128, b: u128, context: &'static str) -> Result<u128> {
    a.checked_sub(b).ok_or(VaultError::Overflow(context))
}
