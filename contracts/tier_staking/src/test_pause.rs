extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::{
    test_utils::{Setup, DAY, LOCK, REWARD_RATE, SILVER},
    ContractError,
};

#[test]
fn test_pause_blocks_user_actions() {
    let s = Setup::new();
    let staker = s.user(2 * SILVER);

    s.client.stake(&staker, &SILVER);
    s.set_time(LOCK + 1);
    s.client.pause(&s.owner);
    assert!(s.client.is_paused());

    let result = s.client.try_stake(&staker, &SILVER);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::Paused);
    let result = s.client.try_unstake_all(&staker);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::Paused);
    let result = s.client.try_harvest(&staker);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::Paused);
    let result = s.client.try_kick(&staker);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::Paused);
    let result = s.client.try_admin_kick(&s.owner, &staker);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::Paused);
    let result = s.client.try_sync_position(&staker);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::Paused);
}

#[test]
fn test_emergency_unstake_forfeits_rewards() {
    let s = Setup::new();
    let staker = s.user(SILVER);

    s.client.stake(&staker, &SILVER);
    s.set_time(DAY);
    s.client.pause(&s.owner);

    // Still inside the lock; the escape hatch ignores it.
    assert_eq!(s.client.emergency_unstake(&staker), SILVER);
    assert_eq!(s.stake_balance(&staker), SILVER);
    assert_eq!(s.reward_balance(&staker), 0);
    assert_eq!(s.client.get_pending_rewards(&staker), (0, 0));
    assert_eq!(s.client.get_total_weighted_stake(), 0);
    assert_eq!(s.client.get_total_shares(), 0);
    assert_eq!(s.client.get_user_level(&staker), None);

    let result = s.client.try_emergency_unstake(&staker);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::NoStake);
}

#[test]
fn test_emergency_unstake_requires_pause() {
    let s = Setup::new();
    let staker = s.user(SILVER);

    s.client.stake(&staker, &SILVER);
    let result = s.client.try_emergency_unstake(&staker);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::NotPaused);
}

#[test]
fn test_emergency_exit_leaves_others_accruing() {
    let s = Setup::new();
    let leaver = s.user(SILVER);
    let stayer = s.user(SILVER);

    s.client.stake(&leaver, &SILVER);
    s.client.stake(&stayer, &SILVER);

    s.set_time(DAY);
    s.client.pause(&s.owner);
    s.client.emergency_unstake(&leaver);
    s.client.unpause(&s.owner);

    s.set_time(2 * DAY);
    assert_eq!(
        s.client.harvest(&stayer),
        (REWARD_RATE * DAY as i128 / 2 + REWARD_RATE * DAY as i128, 0)
    );
}

#[test]
fn test_unpause_restores_actions() {
    let s = Setup::new();
    let staker = s.user(SILVER);

    s.client.pause(&s.owner);
    s.client.unpause(&s.owner);
    assert!(!s.client.is_paused());

    s.client.stake(&staker, &SILVER);
    assert_eq!(s.client.get_user_level(&staker), Some(1));
}

#[test]
fn test_pause_is_owner_only() {
    let s = Setup::new();
    let intruder = Address::generate(&s.env);

    let result = s.client.try_pause(&intruder);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::AccessDenied);

    s.client.pause(&s.owner);
    let result = s.client.try_unpause(&intruder);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::AccessDenied);
}

#[test]
fn test_pause_state_transitions_are_strict() {
    let s = Setup::new();

    let result = s.client.try_unpause(&s.owner);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::NotPaused);

    s.client.pause(&s.owner);
    let result = s.client.try_pause(&s.owner);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::Paused);
}

#[test]
fn test_admin_can_edit_while_paused() {
    let s = Setup::new();

    s.client.pause(&s.owner);
    s.client.set_lock_duration(&s.owner, &DAY);
    s.client.add_level(&s.owner, &3, &200_000_000, &3_000);

    assert_eq!(s.client.get_lock_duration(), DAY);
    assert_eq!(s.client.get_level_count(), 4);
}
