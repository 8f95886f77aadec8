use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

/// Fixed-point scaling factor.
///
/// Reward-per-weight values are multiplied by this constant before storage.
/// Weighted stake is `shares × weight`, so the scale has to leave room for
/// pools of `1e16`+ weight without the per-second delta rounding to zero.
pub const PRECISION: i128 = 1_000_000_000_000_000_000;

const ACCRUAL: Symbol = symbol_short!("ACCRUAL");

/// Global accumulator record shared by every position.
///
/// `acc_reward_per_weight` and `acc_secondary_per_weight` only ever grow.
/// The secondary accumulator stays at zero until `secondary_active` is set.
/// `reward_carry` / `secondary_carry` hold the division remainder of the
/// last advance (emission × `PRECISION` not yet reflected in the
/// accumulator), so frequent settlement loses nothing to truncation.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AccrualState {
    pub acc_reward_per_weight: i128,
    pub acc_secondary_per_weight: i128,
    pub reward_carry: i128,
    pub secondary_carry: i128,
    pub last_update: u64,
    pub total_weighted_stake: i128,
    pub secondary_active: bool,
    pub secondary_activated_at: u64,
}

pub fn load(env: &Env) -> Result<AccrualState, ContractError> {
    env.storage()
        .instance()
        .get(&ACCRUAL)
        .ok_or(ContractError::NotInitialized)
}

pub fn store(env: &Env, state: &AccrualState) {
    env.storage().instance().set(&ACCRUAL, state);
}

// ── Core reward engine ──────────────────────────────────────────────────────

/// Recompute a reward-per-weight accumulator, returning `(acc, carry)`.
///
/// ```text
/// scaled = rate × elapsed_seconds × PRECISION + carry
/// Δacc   = scaled / total_weighted
/// carry' = scaled % total_weighted
/// ```
///
/// With no weighted stake the accumulator and carry are returned unchanged;
/// emission during empty intervals is simply not distributed.
pub fn compute_reward_per_weight(
    stored: i128,
    carry: i128,
    rate: i128,
    elapsed: u64,
    total_weighted: i128,
) -> Result<(i128, i128), ContractError> {
    if total_weighted <= 0 || elapsed == 0 {
        return Ok((stored, carry));
    }

    let scaled = rate
        .checked_mul(elapsed as i128)
        .and_then(|v| v.checked_mul(PRECISION))
        .and_then(|v| v.checked_add(carry))
        .ok_or(ContractError::ArithmeticOverflow)?;

    let acc = stored
        .checked_add(scaled / total_weighted)
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok((acc, scaled % total_weighted))
}

/// Reward earned by `weighted` since the snapshot `paid`, plus the
/// sub-unit `dust` left over from the previous settlement.
///
/// ```text
/// scaled = weighted × (current − paid) + dust
/// earned = scaled / PRECISION,  dust' = scaled % PRECISION
/// ```
pub fn earned(
    weighted: i128,
    current: i128,
    paid: i128,
    dust: i128,
) -> Result<(i128, i128), ContractError> {
    let scaled = current
        .checked_sub(paid)
        .and_then(|delta| weighted.checked_mul(delta))
        .and_then(|v| v.checked_add(dust))
        .ok_or(ContractError::ArithmeticOverflow)?;
    Ok((scaled / PRECISION, scaled % PRECISION))
}

impl AccrualState {
    /// Bring both accumulators up to `now`.
    ///
    /// Uses the weighted total as it stood at the start of the interval;
    /// callers change `total_weighted_stake` only after advancing.
    pub fn advance(
        &mut self,
        now: u64,
        reward_rate: i128,
        secondary_rate: i128,
    ) -> Result<(), ContractError> {
        let elapsed = now.saturating_sub(self.last_update);
        (self.acc_reward_per_weight, self.reward_carry) = compute_reward_per_weight(
            self.acc_reward_per_weight,
            self.reward_carry,
            reward_rate,
            elapsed,
            self.total_weighted_stake,
        )?;
        if self.secondary_active {
            (self.acc_secondary_per_weight, self.secondary_carry) = compute_reward_per_weight(
                self.acc_secondary_per_weight,
                self.secondary_carry,
                secondary_rate,
                elapsed,
                self.total_weighted_stake,
            )?;
        }
        if now > self.last_update {
            self.last_update = now;
        }
        Ok(())
    }

    /// Swap one position's weighted contribution for another.
    pub fn reweigh(&mut self, old: i128, new: i128) -> Result<(), ContractError> {
        self.total_weighted_stake = self
            .total_weighted_stake
            .checked_sub(old)
            .and_then(|t| t.checked_add(new))
            .ok_or(ContractError::ArithmeticOverflow)?;
        Ok(())
    }
}

// ── Unit tests ──────────────────────────────────────────────────────────────
