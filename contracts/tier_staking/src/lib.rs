#![no_std]

pub mod events;
pub mod position;
pub mod rebase;
pub mod rewards;
pub mod tiers;

use common::{ownable, pausable};
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, token, Address, Env, String, Symbol, Vec,
};

use position::UserPosition;
use rewards::AccrualState;
use tiers::Level;

// ── Storage key constants ────────────────────────────────────────────────────

const INITIALIZED: Symbol = symbol_short!("INIT");
const CONFIG: Symbol = symbol_short!("CONFIG");
const TOTAL_SHARES: Symbol = symbol_short!("TOT_SHR");
const SECONDARY_TOKEN: Symbol = symbol_short!("SEC_TOK");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    AccessDenied = 3,
    InvalidInput = 4,
    LockNotExpired = 5,
    Paused = 6,
    NotPaused = 7,
    InvalidLevel = 8,
    NoStake = 9,
    ArithmeticOverflow = 10,
    SecondaryAlreadyActive = 11,
}

// ── Public-facing types ──────────────────────────────────────────────────────

/// Parameters fixed at initialisation. Only `lock_duration` changes later.
///
/// * `reward_rate`    – primary reward units emitted per second across the pool.
/// * `secondary_rate` – secondary units per second once the stream is activated.
/// * `rebasing`       – read the principal token's reflection rate on every action.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakingConfig {
    pub stake_token: Address,
    pub reward_token: Address,
    pub reward_rate: i128,
    pub secondary_rate: i128,
    pub lock_duration: u64,
    pub rebasing: bool,
}

/// Snapshot of a user's position returned by `get_position`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionInfo {
    pub staked: i128,
    pub shares: i128,
    pub level: Option<u32>,
    pub lock_expiry: u64,
    pub pending_reward: i128,
    pub pending_secondary: i128,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct TierStakingContract;

#[contractimpl]
impl TierStakingContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract and seed the default tier table.
    pub fn initialize(env: Env, owner: Address, config: StakingConfig) -> Result<(), ContractError> {
        if env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::AlreadyInitialized);
        }
        if config.reward_rate < 0 || config.secondary_rate < 0 {
            return Err(ContractError::InvalidInput);
        }
        if config.stake_token == config.reward_token {
            return Err(ContractError::InvalidInput);
        }

        let now = env.ledger().timestamp();

        env.storage().instance().set(&INITIALIZED, &true);
        env.storage().instance().set(&CONFIG, &config);
        env.storage().instance().set(&TOTAL_SHARES, &0i128);
        rewards::store(
            &env,
            &AccrualState {
                last_update: now,
                ..Default::default()
            },
        );
        tiers::store(&env, &tiers::default_levels(&env));
        ownable::set_owner(&env, &owner);

        events::publish_initialized(&env, owner, &config);

        Ok(())
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` principal (display units) and restart the lock.
    ///
    /// Pending reward is settled at the old weight before the new shares
    /// are added, and every top-up pushes `lock_expiry` to
    /// `now + lock_duration`.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env)?;

        if amount <= 0 {
            return Err(ContractError::InvalidInput);
        }

        let config = Self::config(&env)?;
        let now = env.ledger().timestamp();

        // 1. Settle both streams at the position's current weight.
        let mut state = Self::advanced_state(&env, &config)?;
        let mut position = position::load(&env, &staker);
        position.settle(&state, now)?;

        // 2. Convert at the current reflection rate.
        let rate = rebase::current_rate(&env, &config.stake_token, config.rebasing)?;
        let shares = rebase::display_to_shares(amount, rate)?;
        if shares <= 0 {
            return Err(ContractError::InvalidInput);
        }

        // 3. Grow the position, re-derive its weight and restart the lock.
        position.shares = position
            .shares
            .checked_add(shares)
            .ok_or(ContractError::ArithmeticOverflow)?;
        position.reweigh(&mut state, &tiers::load(&env), rate)?;
        position.lock_expiry = now.saturating_add(config.lock_duration);

        let total_shares = Self::total_shares(&env)
            .checked_add(shares)
            .ok_or(ContractError::ArithmeticOverflow)?;

        position::store(&env, &staker, &position);
        rewards::store(&env, &state);
        env.storage().instance().set(&TOTAL_SHARES, &total_shares);

        // 4. Pull the principal.
        token::Client::new(&env, &config.stake_token).transfer(
            &staker,
            &env.current_contract_address(),
            &amount,
        );

        events::publish_staked(
            &env,
            staker,
            amount,
            shares,
            total_shares,
            position.lock_expiry,
        );

        Ok(())
    }

    /// Close the whole position once the lock has expired.
    ///
    /// Returns the principal paid out, valued at the current reflection rate.
    /// Owed rewards are paid alongside.
    pub fn unstake_all(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env)?;

        let position = position::load(&env, &staker);
        if position.shares <= 0 {
            return Err(ContractError::NoStake);
        }
        if env.ledger().timestamp() < position.lock_expiry {
            return Err(ContractError::LockNotExpired);
        }

        Self::exit(&env, &staker, position, symbol_short!("UNSTAKED"))
    }

    /// Settle and pay both reward streams without touching principal or lock.
    ///
    /// Safe to call with nothing pending; returns `(reward, secondary)` paid.
    /// Payout is capped at the contract's reward balances.
    pub fn harvest(env: Env, staker: Address) -> Result<(i128, i128), ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env)?;

        if !position::exists(&env, &staker) {
            return Ok((0, 0));
        }

        let config = Self::config(&env)?;
        let now = env.ledger().timestamp();

        let mut state = Self::advanced_state(&env, &config)?;
        let mut position = position::load(&env, &staker);
        position.settle(&state, now)?;
        if position.shares > 0 {
            let rate = rebase::current_rate(&env, &config.stake_token, config.rebasing)?;
            position.reweigh(&mut state, &tiers::load(&env), rate)?;
        }

        let paid = Self::pay_rewards(&env, &config, &staker, &mut position);

        position::store(&env, &staker, &position);
        rewards::store(&env, &state);

        events::publish_harvested(&env, staker, paid.0, paid.1);

        Ok(paid)
    }

    /// Escape hatch while the contract is paused: return principal now,
    /// ignoring the lock, and forfeit every unharvested reward.
    pub fn emergency_unstake(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        if !pausable::require_paused(&env) {
            return Err(ContractError::NotPaused);
        }

        let config = Self::config(&env)?;
        let mut position = position::load(&env, &staker);
        if position.shares <= 0 {
            return Err(ContractError::NoStake);
        }

        // Other stakers' accrual still needs the interval closed at the old total.
        let mut state = Self::advanced_state(&env, &config)?;
        let rate = rebase::current_rate(&env, &config.stake_token, config.rebasing)?;
        let shares = position.clear_principal(&mut state)?;
        position.forfeit(&state);
        let amount = rebase::shares_to_display(shares, rate)?;

        Self::remove_shares(&env, shares)?;
        position::store(&env, &staker, &position);
        rewards::store(&env, &state);

        token::Client::new(&env, &config.stake_token).transfer(
            &env.current_contract_address(),
            &staker,
            &amount,
        );

        events::publish_unstaked(&env, symbol_short!("EMRG_UNST"), staker, amount, shares);

        Ok(amount)
    }

    /// Leave immediately, bypassing the lock. Rewards are settled and paid.
    pub fn kick(env: Env, staker: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        staker.require_auth();
        Self::require_not_paused(&env)?;

        let position = position::load(&env, &staker);
        if position.shares <= 0 {
            return Err(ContractError::NoStake);
        }

        Self::exit(&env, &staker, position, symbol_short!("KICKED"))
    }

    /// Owner-initiated `kick` of `user`.
    pub fn admin_kick(env: Env, caller: Address, user: Address) -> Result<i128, ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;
        Self::require_not_paused(&env)?;

        let position = position::load(&env, &user);
        if position.shares <= 0 {
            return Err(ContractError::NoStake);
        }

        Self::exit(&env, &user, position, symbol_short!("ADM_KICK"))
    }

    /// Settle `user` and re-derive their weight from the live tier table.
    ///
    /// Anyone may call this; it is how a tier edit reaches positions whose
    /// owners have not acted since.
    pub fn sync_position(env: Env, user: Address) -> Result<Option<u32>, ContractError> {
        Self::require_initialized(&env)?;
        Self::require_not_paused(&env)?;

        let config = Self::config(&env)?;
        let now = env.ledger().timestamp();

        let mut state = Self::advanced_state(&env, &config)?;
        let mut position = position::load(&env, &user);
        if position.shares <= 0 {
            return Err(ContractError::NoStake);
        }
        position.settle(&state, now)?;
        let rate = rebase::current_rate(&env, &config.stake_token, config.rebasing)?;
        let level = position.reweigh(&mut state, &tiers::load(&env), rate)?;

        position::store(&env, &user, &position);
        rewards::store(&env, &state);

        Ok(level)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Current level of `user`, derived from their shares at today's rate.
    pub fn get_user_level(env: Env, user: Address) -> Result<Option<u32>, ContractError> {
        let config = Self::config(&env)?;
        let position = position::load(&env, &user);
        Self::derive_level(&env, &config, &position)
    }

    /// Name of the user's level, or "No Stake".
    pub fn get_user_level_text(env: Env, user: Address) -> Result<String, ContractError> {
        let level = Self::get_user_level(env.clone(), user)?;
        Ok(tiers::name_of(&env, &tiers::load(&env), level))
    }

    /// Combined view of a position, with rewards simulated up to now.
    pub fn get_position(env: Env, user: Address) -> Result<PositionInfo, ContractError> {
        let config = Self::config(&env)?;
        let mut position = position::load(&env, &user);
        let rate = rebase::current_rate(&env, &config.stake_token, config.rebasing)?;
        let staked = rebase::shares_to_display(position.shares, rate)?;
        let level = if position.shares > 0 {
            tiers::resolve(&tiers::load(&env), staked)
        } else {
            None
        };

        let state = Self::advanced_state(&env, &config)?;
        position.settle(&state, env.ledger().timestamp())?;

        Ok(PositionInfo {
            staked,
            shares: position.shares,
            level,
            lock_expiry: position.lock_expiry,
            pending_reward: position.owed_reward,
            pending_secondary: position.owed_secondary,
        })
    }

    /// `(reward, secondary)` the user would receive from a harvest right now.
    pub fn get_pending_rewards(env: Env, user: Address) -> Result<(i128, i128), ContractError> {
        let config = Self::config(&env)?;
        let state = Self::advanced_state(&env, &config)?;
        let mut position = position::load(&env, &user);
        position.settle(&state, env.ledger().timestamp())?;
        Ok((position.owed_reward, position.owed_secondary))
    }

    /// Lifetime primary reward credited to `user` at settlements.
    pub fn get_allocated_reward(env: Env, user: Address) -> i128 {
        position::load(&env, &user).allocated_reward
    }

    /// Lifetime secondary reward credited to `user` at settlements.
    pub fn get_allocated_secondary(env: Env, user: Address) -> i128 {
        position::load(&env, &user).allocated_secondary
    }

    /// Timestamp of the user's last settlement.
    pub fn get_user_reward_block(env: Env, user: Address) -> u64 {
        position::load(&env, &user).last_settled
    }

    /// `(reward_debt, secondary_debt)` accumulator snapshots for `user`.
    pub fn get_user_reward_debt(env: Env, user: Address) -> (i128, i128) {
        let position = position::load(&env, &user);
        (position.reward_debt, position.secondary_debt)
    }

    pub fn get_level(env: Env, index: u32) -> Result<Level, ContractError> {
        tiers::load(&env)
            .get(index)
            .ok_or(ContractError::InvalidLevel)
    }

    pub fn get_levels(env: Env) -> Vec<Level> {
        tiers::load(&env)
    }

    pub fn get_level_count(env: Env) -> u32 {
        tiers::load(&env).len()
    }

    pub fn get_lock_duration(env: Env) -> Result<u64, ContractError> {
        Ok(Self::config(&env)?.lock_duration)
    }

    /// `(reward_rate, secondary_rate)` in units per second.
    pub fn get_reward_rates(env: Env) -> Result<(i128, i128), ContractError> {
        let config = Self::config(&env)?;
        Ok((config.reward_rate, config.secondary_rate))
    }

    pub fn get_total_weighted_stake(env: Env) -> Result<i128, ContractError> {
        Ok(rewards::load(&env)?.total_weighted_stake)
    }

    pub fn get_total_shares(env: Env) -> i128 {
        Self::total_shares(&env)
    }

    pub fn get_secondary_token(env: Env) -> Option<Address> {
        env.storage().instance().get(&SECONDARY_TOKEN)
    }

    /// Activation timestamp of the secondary stream, if it is live.
    pub fn get_secondary_activated_at(env: Env) -> Result<Option<u64>, ContractError> {
        let state = rewards::load(&env)?;
        Ok(state
            .secondary_active
            .then_some(state.secondary_activated_at))
    }

    pub fn is_paused(env: Env) -> bool {
        pausable::is_paused(&env)
    }

    pub fn get_owner(env: Env) -> Option<Address> {
        ownable::get_owner(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&INITIALIZED)
    }

    // ── Admin: tier table ───────────────────────────────────────────────────

    /// Append a level above the current top tier.
    pub fn add_level(
        env: Env,
        caller: Address,
        index: u32,
        min_stake: i128,
        weight: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;

        let mut levels = tiers::load(&env);
        tiers::add_level(&env, &mut levels, index, min_stake, weight)?;
        tiers::store(&env, &levels);

        events::publish_level_added(&env, index, min_stake, weight);

        Ok(())
    }

    /// Edit a level's threshold and weight.
    ///
    /// Existing positions keep their weight until their next settlement;
    /// their displayed level changes immediately.
    pub fn set_level(
        env: Env,
        caller: Address,
        index: u32,
        min_stake: i128,
        weight: u32,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;

        let mut levels = tiers::load(&env);
        tiers::set_level(&mut levels, index, min_stake, weight)?;
        tiers::store(&env, &levels);

        events::publish_level_set(&env, index, min_stake, weight);

        Ok(())
    }

    /// Delete the top tier.
    pub fn delete_level(env: Env, caller: Address, index: u32) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;

        let mut levels = tiers::load(&env);
        let removed = tiers::delete_level(&mut levels, index)?;
        tiers::store(&env, &levels);

        events::publish_level_deleted(&env, index, removed.min_stake, removed.weight);

        Ok(())
    }

    pub fn set_level_name(
        env: Env,
        caller: Address,
        index: u32,
        name: String,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;

        let mut levels = tiers::load(&env);
        tiers::set_level_name(&mut levels, index, name.clone())?;
        tiers::store(&env, &levels);

        events::publish_level_renamed(&env, index, name);

        Ok(())
    }

    // ── Admin: parameters ────────────────────────────────────────────────────

    /// Update the lock duration used by *future* stake and top-up actions.
    /// Expiries already recorded on positions are left as they are.
    pub fn set_lock_duration(
        env: Env,
        caller: Address,
        new_duration: u64,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;

        let mut config = Self::config(&env)?;
        config.lock_duration = new_duration;
        env.storage().instance().set(&CONFIG, &config);

        events::publish_lock_duration_set(&env, new_duration);

        Ok(())
    }

    /// Go live with the secondary reward stream, paid in `token`.
    ///
    /// Accumulators are flushed first, so nothing accrues on the secondary
    /// stream for time before this call: there is no pre-activation
    /// allocation waiting to be paid once the token is set.
    pub fn set_secondary_token(
        env: Env,
        caller: Address,
        token: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;

        let config = Self::config(&env)?;
        if token == config.stake_token {
            return Err(ContractError::InvalidInput);
        }

        let mut state = Self::advanced_state(&env, &config)?;
        if state.secondary_active {
            return Err(ContractError::SecondaryAlreadyActive);
        }
        state.secondary_active = true;
        state.secondary_activated_at = env.ledger().timestamp();

        rewards::store(&env, &state);
        env.storage().instance().set(&SECONDARY_TOKEN, &token);

        events::publish_secondary_activated(&env, token, config.secondary_rate);

        Ok(())
    }

    // ── Admin: capabilities ─────────────────────────────────────────────────

    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;
        Self::require_not_paused(&env)?;

        pausable::set_paused(&env, true);
        events::publish_paused(&env, caller);

        Ok(())
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        Self::require_owner(&env, &caller)?;
        if !pausable::require_paused(&env) {
            return Err(ContractError::NotPaused);
        }

        pausable::set_paused(&env, false);
        events::publish_unpaused(&env, caller);

        Ok(())
    }

    pub fn transfer_ownership(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !ownable::transfer_ownership(&env, &caller, &new_owner) {
            return Err(ContractError::AccessDenied);
        }

        events::publish_ownership_transferred(&env, caller, new_owner);

        Ok(())
    }

    /// Give up ownership for good. Every owner-only call fails afterwards.
    pub fn renounce_ownership(env: Env, caller: Address) -> Result<(), ContractError> {
        Self::require_initialized(&env)?;
        caller.require_auth();
        if !ownable::renounce_ownership(&env, &caller) {
            return Err(ContractError::AccessDenied);
        }

        events::publish_ownership_renounced(&env, caller);

        Ok(())
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn require_initialized(env: &Env) -> Result<(), ContractError> {
        if !env.storage().instance().has(&INITIALIZED) {
            return Err(ContractError::NotInitialized);
        }
        Ok(())
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
        caller.require_auth();
        if !ownable::is_owner(env, caller) {
            return Err(ContractError::AccessDenied);
        }
        Ok(())
    }

    fn require_not_paused(env: &Env) -> Result<(), ContractError> {
        if !pausable::require_not_paused(env) {
            return Err(ContractError::Paused);
        }
        Ok(())
    }

    fn config(env: &Env) -> Result<StakingConfig, ContractError> {
        env.storage()
            .instance()
            .get(&CONFIG)
            .ok_or(ContractError::NotInitialized)
    }

    fn total_shares(env: &Env) -> i128 {
        env.storage().instance().get(&TOTAL_SHARES).unwrap_or(0)
    }

    fn remove_shares(env: &Env, shares: i128) -> Result<(), ContractError> {
        let total = Self::total_shares(env)
            .checked_sub(shares)
            .ok_or(ContractError::ArithmeticOverflow)?;
        env.storage().instance().set(&TOTAL_SHARES, &total);
        Ok(())
    }

    /// Load the global accrual record and bring it up to the ledger time.
    fn advanced_state(env: &Env, config: &StakingConfig) -> Result<AccrualState, ContractError> {
        let mut state = rewards::load(env)?;
        state.advance(
            env.ledger().timestamp(),
            config.reward_rate,
            config.secondary_rate,
        )?;
        Ok(state)
    }

    fn derive_level(
        env: &Env,
        config: &StakingConfig,
        position: &UserPosition,
    ) -> Result<Option<u32>, ContractError> {
        if position.shares <= 0 {
            return Ok(None);
        }
        let rate = rebase::current_rate(env, &config.stake_token, config.rebasing)?;
        let display = rebase::shares_to_display(position.shares, rate)?;
        Ok(tiers::resolve(&tiers::load(env), display))
    }

    /// Transfer owed rewards out, capped at what the contract holds. Any
    /// shortfall stays owed for a later harvest, so a short reward balance
    /// never blocks the principal. The secondary stream pays only once its
    /// token is set.
    fn pay_rewards(
        env: &Env,
        config: &StakingConfig,
        user: &Address,
        position: &mut UserPosition,
    ) -> (i128, i128) {
        let reward = Self::pay_capped(env, &config.reward_token, user, &mut position.owed_reward);

        let secondary_token: Option<Address> = env.storage().instance().get(&SECONDARY_TOKEN);
        let secondary = match secondary_token {
            Some(token) => Self::pay_capped(env, &token, user, &mut position.owed_secondary),
            None => 0,
        };

        (reward, secondary)
    }

    fn pay_capped(env: &Env, token: &Address, user: &Address, owed: &mut i128) -> i128 {
        if *owed <= 0 {
            return 0;
        }
        let client = token::Client::new(env, token);
        let contract = env.current_contract_address();
        let amount = (*owed).min(client.balance(&contract));
        if amount <= 0 {
            return 0;
        }
        *owed -= amount;
        client.transfer(&contract, user, &amount);
        amount
    }

    /// Shared tail of `unstake_all`, `kick` and `admin_kick`: settle, pay
    /// rewards, zero the position and return the principal.
    fn exit(
        env: &Env,
        user: &Address,
        mut position: UserPosition,
        reason: Symbol,
    ) -> Result<i128, ContractError> {
        let config = Self::config(env)?;
        let now = env.ledger().timestamp();

        let mut state = Self::advanced_state(env, &config)?;
        position.settle(&state, now)?;

        let rate = rebase::current_rate(env, &config.stake_token, config.rebasing)?;
        let shares = position.clear_principal(&mut state)?;
        let amount = rebase::shares_to_display(shares, rate)?;

        let paid = Self::pay_rewards(env, &config, user, &mut position);

        Self::remove_shares(env, shares)?;
        position::store(env, user, &position);
        rewards::store(env, &state);

        token::Client::new(env, &config.stake_token).transfer(
            &env.current_contract_address(),
            user,
            &amount,
        );

        if paid.0 > 0 || paid.1 > 0 {
            events::publish_harvested(env, user.clone(), paid.0, paid.1);
        }
        events::publish_unstaked(env, reason, user.clone(), amount, shares);

        Ok(amount)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────



#[cfg(test)]
mod test_tiers;



#[cfg(test)]
mod test_pause;
