#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env, String, Symbol};

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub owner: Address,
    pub stake_token: Address,
    pub reward_token: Address,
    pub reward_rate: i128,
    pub secondary_rate: i128,
    pub lock_duration: u64,
    pub rebasing: bool,
    pub timestamp: u64,
}

/// Fired when a user deposits or tops up stake.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub shares: i128,
    pub total_shares: i128,
    pub lock_expiry: u64,
    pub timestamp: u64,
}

/// Fired when a position is closed and its principal returned.
///
/// `reason` doubles as the topic: `UNSTAKED`, `EMRG_UNST`, `KICKED` or `ADM_KICK`.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakedEvent {
    pub staker: Address,
    pub amount: i128,
    pub shares: i128,
    pub reason: Symbol,
    pub timestamp: u64,
}

/// Fired when settled rewards are paid out.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HarvestedEvent {
    pub staker: Address,
    pub reward: i128,
    pub secondary: i128,
    pub timestamp: u64,
}

/// Fired on any tier table mutation.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelChangedEvent {
    pub index: u32,
    pub min_stake: i128,
    pub weight: u32,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LevelRenamedEvent {
    pub index: u32,
    pub name: String,
    pub timestamp: u64,
}

/// Fired when the owner changes the lock duration.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockDurationSetEvent {
    pub new_duration: u64,
    pub timestamp: u64,
}

/// Fired when the secondary reward stream goes live.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SecondaryActivatedEvent {
    pub token: Address,
    pub secondary_rate: i128,
    pub timestamp: u64,
}

/// Fired when ownership moves or is renounced.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipEvent {
    pub previous_owner: Address,
    pub new_owner: Option<Address>,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseEvent {
    pub caller: Address,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, owner: Address, config: &crate::StakingConfig) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            owner,
            stake_token: config.stake_token.clone(),
            reward_token: config.reward_token.clone(),
            reward_rate: config.reward_rate,
            secondary_rate: config.secondary_rate,
            lock_duration: config.lock_duration,
            rebasing: config.rebasing,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_staked(
    env: &Env,
    staker: Address,
    amount: i128,
    shares: i128,
    total_shares: i128,
    lock_expiry: u64,
) {
    env.events().publish(
        (symbol_short!("STAKED"), staker.clone()),
        StakedEvent {
            staker,
            amount,
            shares,
            total_shares,
            lock_expiry,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unstaked(
    env: &Env,
    reason: Symbol,
    staker: Address,
    amount: i128,
    shares: i128,
) {
    env.events().publish(
        (reason.clone(), staker.clone()),
        UnstakedEvent {
            staker,
            amount,
            shares,
            reason,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_harvested(env: &Env, staker: Address, reward: i128, secondary: i128) {
    env.events().publish(
        (symbol_short!("HARVEST"), staker.clone()),
        HarvestedEvent {
            staker,
            reward,
            secondary,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_level_added(env: &Env, index: u32, min_stake: i128, weight: u32) {
    publish_level(env, symbol_short!("LVL_ADD"), index, min_stake, weight);
}

pub fn publish_level_set(env: &Env, index: u32, min_stake: i128, weight: u32) {
    publish_level(env, symbol_short!("LVL_SET"), index, min_stake, weight);
}

pub fn publish_level_deleted(env: &Env, index: u32, min_stake: i128, weight: u32) {
    publish_level(env, symbol_short!("LVL_DEL"), index, min_stake, weight);
}

fn publish_level(env: &Env, topic: Symbol, index: u32, min_stake: i128, weight: u32) {
    env.events().publish(
        (topic,),
        LevelChangedEvent {
            index,
            min_stake,
            weight,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_level_renamed(env: &Env, index: u32, name: String) {
    env.events().publish(
        (symbol_short!("LVL_NAME"),),
        LevelRenamedEvent {
            index,
            name,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_lock_duration_set(env: &Env, new_duration: u64) {
    env.events().publish(
        (symbol_short!("LOCK_SET"),),
        LockDurationSetEvent {
            new_duration,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_secondary_activated(env: &Env, token: Address, secondary_rate: i128) {
    env.events().publish(
        (symbol_short!("SEC_ACT"),),
        SecondaryActivatedEvent {
            token,
            secondary_rate,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_paused(env: &Env, caller: Address) {
    env.events().publish(
        (symbol_short!("PAUSED"),),
        PauseEvent {
            caller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_unpaused(env: &Env, caller: Address) {
    env.events().publish(
        (symbol_short!("UNPAUSED"),),
        PauseEvent {
            caller,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_ownership_transferred(env: &Env, previous_owner: Address, new_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_XFER"), previous_owner.clone()),
        OwnershipEvent {
            previous_owner,
            new_owner: Some(new_owner),
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_ownership_renounced(env: &Env, previous_owner: Address) {
    env.events().publish(
        (symbol_short!("OWN_RNC"), previous_owner.clone()),
        OwnershipEvent {
            previous_owner,
            new_owner: None,
            timestamp: env.ledger().timestamp(),
        },
    );
}
