//! Share / display-unit conversion for reflection-style principal tokens.
//!
//! The contract records principal as shares. A rebasing token reports a
//! global reflection rate (display units per share, scaled by
//! [`RATE_SCALE`]); the rate is read at the moment of every stake and
//! unstake, so growth between the two is shared by all stakers uniformly.
//! Non-rebasing tokens use a fixed rate of one.

use soroban_sdk::{contractclient, Address, Env};

use crate::ContractError;

/// Fixed-point scale of the reflection rate. `RATE_SCALE` means 1 display
/// unit per share.
pub const RATE_SCALE: i128 = 1_000_000_000_000_000_000;

/// The one extra call a rebasing principal token must expose.
#[contractclient(name = "ReflectionTokenClient")]
pub trait ReflectionToken {
    /// Current display units per share, scaled by `RATE_SCALE`.
    fn reflection_rate(env: Env) -> i128;
}

/// Snapshot the principal token's rate for the current action.
pub fn current_rate(env: &Env, stake_token: &Address, rebasing: bool) -> Result<i128, ContractError> {
    if !rebasing {
        return Ok(RATE_SCALE);
    }
    let rate = ReflectionTokenClient::new(env, stake_token).reflection_rate();
    if rate <= 0 {
        return Err(ContractError::InvalidInput);
    }
    Ok(rate)
}

/// `amount × RATE_SCALE / rate`, truncating.
pub fn display_to_shares(amount: i128, rate: i128) -> Result<i128, ContractError> {
    if rate <= 0 {
        return Err(ContractError::InvalidInput);
    }
    amount
        .checked_mul(RATE_SCALE)
        .map(|scaled| scaled / rate)
        .ok_or(ContractError::ArithmeticOverflow)
}

/// `shares × rate / RATE_SCALE`, truncating.
///
/// Truncation in both directions leaves the residue with the token reserve
/// held by the contract, never with an individual staker.
pub fn shares_to_display(shares: i128, rate: i128) -> Result<i128, ContractError> {
    shares
        .checked_mul(rate)
        .map(|scaled| scaled / RATE_SCALE)
        .ok_or(ContractError::ArithmeticOverflow)
}
