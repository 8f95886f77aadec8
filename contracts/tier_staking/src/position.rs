use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::{
    rebase,
    rewards::{self, AccrualState},
    tiers::{self, Level},
    ContractError,
};

// Per-user persistent storage uses tuple keys:  (prefix, user_address)
const POSITION: Symbol = symbol_short!("POS");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// A staker's stored state.
///
/// The level is not stored: it is always derived from `shares`
/// and the live tier table. `weighted_stake` is the contribution currently
/// counted in the global weighted total, fixed at the last settlement.
/// The `*_dust` fields keep the sub-unit part of each settlement, scaled by
/// `PRECISION`, so repeated settlement pays the same as a single one.
#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UserPosition {
    pub shares: i128,
    pub weighted_stake: i128,
    pub lock_expiry: u64,
    pub reward_debt: i128,
    pub secondary_debt: i128,
    pub reward_dust: i128,
    pub secondary_dust: i128,
    pub owed_reward: i128,
    pub owed_secondary: i128,
    pub allocated_reward: i128,
    pub allocated_secondary: i128,
    pub last_settled: u64,
}

fn position_key(user: &Address) -> (Symbol, Address) {
    (POSITION, user.clone())
}

pub fn load(env: &Env, user: &Address) -> UserPosition {
    env.storage()
        .persistent()
        .get(&position_key(user))
        .unwrap_or_default()
}

pub fn exists(env: &Env, user: &Address) -> bool {
    env.storage().persistent().has(&position_key(user))
}

pub fn store(env: &Env, user: &Address, position: &UserPosition) {
    let key = position_key(user);
    env.storage().persistent().set(&key, position);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

impl UserPosition {
    /// Credit everything accrued since the last settlement and move both
    /// debts to the current accumulators.
    ///
    /// `state` must already be advanced to `now`.
    pub fn settle(&mut self, state: &AccrualState, now: u64) -> Result<(), ContractError> {
        let (reward, reward_dust) = rewards::earned(
            self.weighted_stake,
            state.acc_reward_per_weight,
            self.reward_debt,
            self.reward_dust,
        )?;
        let (secondary, secondary_dust) = rewards::earned(
            self.weighted_stake,
            state.acc_secondary_per_weight,
            self.secondary_debt,
            self.secondary_dust,
        )?;

        self.reward_dust = reward_dust;
        self.secondary_dust = secondary_dust;
        self.owed_reward = checked_add(self.owed_reward, reward)?;
        self.owed_secondary = checked_add(self.owed_secondary, secondary)?;
        self.allocated_reward = checked_add(self.allocated_reward, reward)?;
        self.allocated_secondary = checked_add(self.allocated_secondary, secondary)?;

        self.reward_debt = state.acc_reward_per_weight;
        self.secondary_debt = state.acc_secondary_per_weight;
        self.last_settled = now;
        Ok(())
    }

    /// Re-derive the level from `shares` at `rate` and swap the position's
    /// weighted contribution in `state`. Returns the resolved level.
    pub fn reweigh(
        &mut self,
        state: &mut AccrualState,
        levels: &Vec<Level>,
        rate: i128,
    ) -> Result<Option<u32>, ContractError> {
        let display = rebase::shares_to_display(self.shares, rate)?;
        let level = tiers::resolve(levels, display);
        let weighted = self
            .shares
            .checked_mul(tiers::weight_of(levels, level) as i128)
            .ok_or(ContractError::ArithmeticOverflow)?;

        state.reweigh(self.weighted_stake, weighted)?;
        self.weighted_stake = weighted;
        Ok(level)
    }

    /// Drop the principal and its weight, returning the shares removed.
    pub fn clear_principal(&mut self, state: &mut AccrualState) -> Result<i128, ContractError> {
        state.reweigh(self.weighted_stake, 0)?;
        let shares = self.shares;
        self.shares = 0;
        self.weighted_stake = 0;
        self.lock_expiry = 0;
        Ok(shares)
    }

    /// Discard unpaid reward and skip the debts past anything pending.
    pub fn forfeit(&mut self, state: &AccrualState) {
        self.owed_reward = 0;
        self.owed_secondary = 0;
        self.reward_dust = 0;
        self.secondary_dust = 0;
        self.reward_debt = state.acc_reward_per_weight;
        self.secondary_debt = state.acc_secondary_per_weight;
    }
}

fn checked_add(a: i128, b: i128) -> Result<i128, ContractError> {
    a.checked_add(b).ok_or(ContractError::ArithmeticOverflow)
}
