//! Ordered tier table.
//!
//! Levels are stored as a contiguous `Vec<Level>` in instance storage; a
//! level's index is its position in that vector. Thresholds are strictly
//! increasing by index, which keeps [`resolve`] a simple top-down scan.

use soroban_sdk::{contracttype, symbol_short, Env, String, Symbol, Vec};

use crate::ContractError;

const LEVELS: Symbol = symbol_short!("LEVELS");

/// Text reported for positions that hold no shares or fall below level 0.
pub const NO_STAKE_TEXT: &str = "No Stake";

/// A stake threshold band.
///
/// `min_stake` is expressed in display units of the principal token;
/// `weight` multiplies the holder's shares when computing their share of
/// the emission.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Level {
    pub min_stake: i128,
    pub weight: u32,
    pub name: String,
}

// ── Storage ──────────────────────────────────────────────────────────────────

pub fn load(env: &Env) -> Vec<Level> {
    env.storage()
        .instance()
        .get(&LEVELS)
        .unwrap_or(Vec::new(env))
}

pub fn store(env: &Env, levels: &Vec<Level>) {
    env.storage().instance().set(&LEVELS, levels);
}

/// Table installed by `initialize`.
pub fn default_levels(env: &Env) -> Vec<Level> {
    let mut levels = Vec::new(env);
    levels.push_back(Level {
        min_stake: 0,
        weight: 0,
        name: String::from_str(env, "No Tier"),
    });
    levels.push_back(Level {
        min_stake: 10_000_000,
        weight: 1_000,
        name: String::from_str(env, "Silver"),
    });
    levels.push_back(Level {
        min_stake: 50_000_000,
        weight: 1_100,
        name: String::from_str(env, "Gold"),
    });
    levels
}

// ── Mutations ────────────────────────────────────────────────────────────────

/// Append a level above the current top tier.
///
/// `index` must equal the current level count and `min_stake` must exceed
/// the top tier's threshold. New levels start with an empty name.
pub fn add_level(
    env: &Env,
    levels: &mut Vec<Level>,
    index: u32,
    min_stake: i128,
    weight: u32,
) -> Result<(), ContractError> {
    if index != levels.len() || min_stake < 0 {
        return Err(ContractError::InvalidLevel);
    }
    if let Some(top) = levels.last() {
        if min_stake <= top.min_stake {
            return Err(ContractError::InvalidLevel);
        }
    }
    levels.push_back(Level {
        min_stake,
        weight,
        name: String::from_str(env, ""),
    });
    Ok(())
}

/// Edit an existing level in place, keeping its name.
///
/// The new threshold must sit strictly between its neighbours. Level 0 is
/// checked by the same rule, so it can never be raised to or past level 1.
pub fn set_level(
    levels: &mut Vec<Level>,
    index: u32,
    min_stake: i128,
    weight: u32,
) -> Result<(), ContractError> {
    let mut level = levels.get(index).ok_or(ContractError::InvalidLevel)?;
    if min_stake < 0 {
        return Err(ContractError::InvalidLevel);
    }
    if index > 0 {
        if let Some(below) = levels.get(index - 1) {
            if min_stake <= below.min_stake {
                return Err(ContractError::InvalidLevel);
            }
        }
    }
    if let Some(above) = levels.get(index + 1) {
        if min_stake >= above.min_stake {
            return Err(ContractError::InvalidLevel);
        }
    }
    level.min_stake = min_stake;
    level.weight = weight;
    levels.set(index, level);
    Ok(())
}

/// Remove the top tier. Lower tiers and level 0 cannot be deleted.
pub fn delete_level(levels: &mut Vec<Level>, index: u32) -> Result<Level, ContractError> {
    let len = levels.len();
    if len == 0 || index != len - 1 || index == 0 {
        return Err(ContractError::InvalidLevel);
    }
    levels.pop_back().ok_or(ContractError::InvalidLevel)
}

pub fn set_level_name(
    levels: &mut Vec<Level>,
    index: u32,
    name: String,
) -> Result<(), ContractError> {
    let mut level = levels.get(index).ok_or(ContractError::InvalidLevel)?;
    level.name = name;
    levels.set(index, level);
    Ok(())
}

// ── Lookups ──────────────────────────────────────────────────────────────────

/// Highest level whose threshold is covered by `display_amount`.
///
/// A zero stake is always `None`, whatever level 0's threshold is.
pub fn resolve(levels: &Vec<Level>, display_amount: i128) -> Option<u32> {
    if display_amount <= 0 {
        return None;
    }
    let mut index = levels.len();
    while index > 0 {
        index -= 1;
        if let Some(level) = levels.get(index) {
            if level.min_stake <= display_amount {
                return Some(index);
            }
        }
    }
    None
}

/// Reward weight for a resolved level; `None` weighs nothing.
pub fn weight_of(levels: &Vec<Level>, level: Option<u32>) -> u32 {
    level
        .and_then(|index| levels.get(index))
        .map(|l| l.weight)
        .unwrap_or(0)
}

/// Display name for a resolved level.
pub fn name_of(env: &Env, levels: &Vec<Level>, level: Option<u32>) -> String {
    match level.and_then(|index| levels.get(index)) {
        Some(l) => l.name,
        None => String::from_str(env, NO_STAKE_TEXT),
    }
}
