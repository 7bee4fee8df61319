//! Liquidity math shared by every pool kind.
//!
//! Proportional amounts come straight from the share ratio and never
//! touch pool math — that keeps the proportional exit path alive even
//! when a pool's pricing is broken. The non-proportional kinds work
//! through the [`PoolMath`] trait using invariant ratios, charging the
//! swap fee only on the *taxable* portion — the part of the operation
//! that deviates from a proportional one and is therefore economically a
//! swap.
//!
//! Rounding at each site biases toward the vault: proportional reference
//! balances round so the taxable portion grows, fees round up, share
//! mints round down, share burns round up.

use crate::constants::ONE;
use crate::domain::Rounding;
use crate::error::{Result, VaultError};
use crate::math::fixed_point as fp;
use crate::traits::PoolMath;

/// Per-token deposit amounts for minting `bpt_amount_out` shares at the
/// pool's current balance proportions. Rounds up (owed to the vault).
///
/// # Errors
///
/// Fails on zero total supply or arithmetic overflow.
pub fn compute_proportional_amounts_in(
    balances_scaled18: &[u128],
    total_supply: u128,
    bpt_amount_out: u128,
) -> Result<Vec<u128>> {
    balances_scaled18
        .iter()
        .map(|&balance| fp::mul_div_up(balance, bpt_amount_out, total_supply))
        .collect()
}

/// Per-token withdrawal amounts for burning `bpt_amount_in` shares at
/// the pool's current balance proportions. Rounds down (owed by the
/// vault).
///
/// # Errors
///
/// Fails on zero total supply or arithmetic overflow.
pub fn compute_proportional_amounts_out(
    balances_scaled18: &[u128],
    total_supply: u128,
    bpt_amount_in: u128,
) -> Result<Vec<u128>> {
    balances_scaled18
        .iter()
        .map(|&balance| fp::mul_div_down(balance, bpt_amount_in, total_supply))
        .collect()
}

/// Shares minted for exact, arbitrary per-token deposits.
///
/// The deposit is split into a proportional part (fee-free) and a
/// taxable excess per token; the swap fee is charged on the excess, then
/// the share output follows the fee-adjusted invariant growth.
///
/// Returns `(bpt_amount_out, swap_fee_amounts_scaled18)`.
///
/// # Errors
///
/// Fails if the invariant would not grow, or on arithmetic overflow.
pub fn compute_add_liquidity_unbalanced(
    math: &dyn PoolMath,
    balances_scaled18: &[u128],
    exact_amounts_in_scaled18: &[u128],
    total_supply: u128,
    swap_fee_percentage: u128,
) -> Result<(u128, Vec<u128>)> {
    let num_tokens = balances_scaled18.len();
    let mut new_balances = Vec::with_capacity(num_tokens);
    for (balance, amount) in balances_scaled18.iter().zip(exact_amounts_in_scaled18) {
        new_balances.push(fp::add(*balance, *amount, "unbalanced add")?);
    }

    // Invariant before rounds up, after rounds down: understates growth.
    let current_invariant = math.compute_invariant(balances_scaled18, Rounding::Up)?;
    let new_invariant = math.compute_invariant(&new_balances, Rounding::Down)?;
    let invariant_ratio = fp::div_down(new_invariant, current_invariant)?;

    let mut swap_fee_amounts = vec![0u128; num_tokens];
    for i in 0..num_tokens {
        // Proportional reference rounds down so the taxable excess grows.
        let proportional = fp::mul_down(invariant_ratio, balances_scaled18[i])?;
        if new_balances[i] > proportional {
            let taxable = new_balances[i] - proportional;
            let fee = fp::mul_up(taxable, swap_fee_percentage)?;
            swap_fee_amounts[i] = fee;
            new_balances[i] = fp::sub(new_balances[i], fee, "fee exceeds balance")?;
        }
    }

    let invariant_with_fees = math.compute_invariant(&new_balances, Rounding::Down)?;
    let growth = fp::sub(
        invariant_with_fees,
        current_invariant,
        "invariant did not grow",
    )?;
    let bpt_amount_out = fp::mul_div_down(total_supply, growth, current_invariant)?;
    Ok((bpt_amount_out, swap_fee_amounts))
}

/// Required single-token deposit for minting exactly `exact_bpt_amount_out`
/// shares.
///
/// Returns `(amount_in_scaled18, swap_fee_amounts_scaled18)`; the fee is
/// charged on top of the computed input.
///
/// # Errors
///
/// Fails on zero total supply, pool-math failure, or overflow.
pub fn compute_add_liquidity_single_token_exact_out(
    math: &dyn PoolMath,
    balances_scaled18: &[u128],
    token_index: usize,
    exact_bpt_amount_out: u128,
    total_supply: u128,
    swap_fee_percentage: u128,
) -> Result<(u128, Vec<u128>)> {
    let new_supply = fp::add(total_supply, exact_bpt_amount_out, "bpt supply")?;
    // Ratio rounds up: the pool asks for more input.
    let invariant_ratio = fp::div_up(new_supply, total_supply)?;
    let new_balance = math.compute_balance(balances_scaled18, token_index, invariant_ratio)?;
    let amount_in = fp::sub(new_balance, balances_scaled18[token_index], "balance shrank")?;

    // The proportional share of the new balance is fee-free; only the
    // excess is taxable, and the fee is grossed up (fee on the gross).
    let non_taxable = fp::mul_div_up(new_supply, balances_scaled18[token_index], total_supply)?;
    let taxable = new_balance.saturating_sub(non_taxable);
    let fee = fp::sub(
        fp::mul_div_up(taxable, ONE, fp::complement(swap_fee_percentage))?,
        taxable,
        "fee gross-up",
    )?;

    let mut swap_fee_amounts = vec![0u128; balances_scaled18.len()];
    swap_fee_amounts[token_index] = fee;
    let amount_in_with_fee = fp::add(amount_in, fee, "amount in with fee")?;
    Ok((amount_in_with_fee, swap_fee_amounts))
}

/// Single-token withdrawal for burning exactly `exact_bpt_amount_in`
/// shares.
///
/// Returns `(amount_out_scaled18, swap_fee_amounts_scaled18)`; the fee is
/// deducted from the computed output.
///
/// # Errors
///
/// Fails on zero total supply, pool-math failure, or overflow.
pub fn compute_remove_liquidity_single_token_exact_in(
    math: &dyn PoolMath,
    balances_scaled18: &[u128],
    token_index: usize,
    exact_bpt_amount_in: u128,
    total_supply: u128,
    swap_fee_percentage: u128,
) -> Result<(u128, Vec<u128>)> {
    let new_supply = fp::sub(total_supply, exact_bpt_amount_in, "bpt supply")?;
    // Ratio rounds up: the pool keeps more balance behind.
    let invariant_ratio = fp::div_up(new_supply, total_supply)?;
    let new_balance = math.compute_balance(balances_scaled18, token_index, invariant_ratio)?;
    let amount_out = fp::sub(balances_scaled18[token_index], new_balance, "balance grew")?;

    // The balance a proportional exit would have left; anything drawn
    // below it is taxable.
    let proportional = fp::mul_div_up(new_supply, balances_scaled18[token_index], total_supply)?;
    let taxable = proportional.saturating_sub(new_balance);
    let fee = fp::mul_up(taxable, swap_fee_percentage)?;

    let mut swap_fee_amounts = vec![0u128; balances_scaled18.len()];
    swap_fee_amounts[token_index] = fee;
    let amount_out_with_fee = fp::sub(amount_out, fee, "fee exceeds amount out")?;
    Ok((amount_out_with_fee, swap_fee_amounts))
}

/// Shares burned for withdrawing exactly `exact_amount_out` of one token.
///
/// Returns `(bpt_amount_in, swap_fee_amounts_scaled18)`.
///
/// # Errors
///
/// Fails if the withdrawal exceeds the token's balance, on pool-math
/// failure, or on overflow.
pub fn compute_remove_liquidity_single_token_exact_out(
    math: &dyn PoolMath,
    balances_scaled18: &[u128],
    token_index: usize,
    exact_amount_out: u128,
    total_supply: u128,
    swap_fee_percentage: u128,
) -> Result<(u128, Vec<u128>)> {
    let mut new_balances = balances_scaled18.to_vec();
    new_balances[token_index] = fp::sub(
        new_balances[token_index],
        exact_amount_out,
        "withdrawal exceeds balance",
    )?;

    let current_invariant = math.compute_invariant(balances_scaled18, Rounding::Up)?;
    let new_invariant = math.compute_invariant(&new_balances, Rounding::Down)?;
    // Both factors round up: the proportional reference grows, and with
    // it the taxable portion.
    let invariant_ratio = fp::div_up(new_invariant, current_invariant)?;
    let proportional = fp::mul_up(invariant_ratio, balances_scaled18[token_index])?;

    let taxable = proportional.saturating_sub(new_balances[token_index]);
    let fee = fp::sub(
        fp::mul_div_up(taxable, ONE, fp::complement(swap_fee_percentage))?,
        taxable,
        "fee gross-up",
    )?;
    new_balances[token_index] = fp::sub(new_balances[token_index], fee, "fee exceeds balance")?;

    let invariant_with_fees = math.compute_invariant(&new_balances, Rounding::Down)?;
    let shrink = fp::sub(
        current_invariant,
        invariant_with_fees,
        "invariant did not shrink",
    )?;
    // Share burn rounds up.
    let bpt_amount_in = fp::mul_div_up(total_supply, shrink, current_invariant)?;

    let mut swap_fee_amounts = vec![0u128; balances_scaled18.len()];
    swap_fee_amounts[token_index] = fee;
    Ok((bpt_amount_in, swap_fee_amounts))
}
