extern crate std;

use soroban_sdk::{testutils::Address as _, Address, String};

use crate::{
    test_utils::{Setup, REWARD_RATE, SILVER},
    ContractError,
};

#[test]
fn test_add_level_and_name_it() {
    let s = Setup::new();
    let staker = s.user(10_000_000_000);

    let result = s.client.try_add_level(&s.owner, &3, &20, &2_000);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);

    s.client.add_level(&s.owner, &3, &200_000_000, &3_000);
    s.client
        .set_level_name(&s.owner, &3, &String::from_str(&s.env, "Diamond"));

    s.client.stake(&staker, &200_000_000);

    assert_eq!(s.client.get_user_level(&staker), Some(3));
    assert_eq!(
        s.client.get_user_level_text(&staker),
        String::from_str(&s.env, "Diamond")
    );
    assert_eq!(s.client.get_total_weighted_stake(), 200_000_000 * 3_000);
}

#[test]
fn test_add_level_must_be_next_index() {
    let s = Setup::new();

    let result = s.client.try_add_level(&s.owner, &5, &200_000_000, &3_000);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);
    let result = s.client.try_add_level(&s.owner, &2, &200_000_000, &3_000);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);
    assert_eq!(s.client.get_level_count(), 3);
}

#[test]
fn test_set_level_rejects_out_of_order_thresholds() {
    let s = Setup::new();

    let result = s.client.try_set_level(&s.owner, &1, &10_000_000_000, &2_000);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);
    let result = s.client.try_set_level(&s.owner, &0, &10_000_000_000, &2_000);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);
    let result = s.client.try_set_level(&s.owner, &3, &1, &1);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);

    s.client.set_level(&s.owner, &1, &20_000_000, &1_200);
    let level = s.client.get_level(&1);
    assert_eq!(level.min_stake, 20_000_000);
    assert_eq!(level.weight, 1_200);
    assert_eq!(level.name, String::from_str(&s.env, "Silver"));
}

#[test]
fn test_delete_highest_level_first() {
    let s = Setup::new();

    let result = s.client.try_delete_level(&s.owner, &1);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);

    s.client.delete_level(&s.owner, &2);
    assert_eq!(s.client.get_level_count(), 2);
    let result = s.client.try_get_level(&2);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);

    s.client.delete_level(&s.owner, &1);
    let result = s.client.try_delete_level(&s.owner, &0);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::InvalidLevel);
}

#[test]
fn test_deleted_tier_demotes_holders() {
    let s = Setup::new();
    let staker = s.user(60_000_000);

    s.client.stake(&staker, &60_000_000);
    assert_eq!(s.client.get_user_level(&staker), Some(2));

    s.client.delete_level(&s.owner, &2);
    assert_eq!(s.client.get_user_level(&staker), Some(1));
    assert_eq!(s.client.sync_position(&staker), Some(1));
    assert_eq!(s.client.get_total_weighted_stake(), 60_000_000 * 1_000);
}

#[test]
fn test_non_owner_cannot_edit_tiers() {
    let s = Setup::new();
    let intruder = Address::generate(&s.env);

    let result = s.client.try_add_level(&intruder, &3, &200_000_000, &3_000);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::AccessDenied);
    let result = s.client.try_set_level(&intruder, &1, &20_000_000, &1_000);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::AccessDenied);
    let result = s.client.try_delete_level(&intruder, &2);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::AccessDenied);
    let result = s
        .client
        .try_set_level_name(&intruder, &1, &String::from_str(&s.env, "Bronze"));
    assert_eq!(result.unwrap_err().unwrap(), ContractError::AccessDenied);
}

#[test]
fn test_raised_threshold_drops_holder_to_floor() {
    let s = Setup::new();
    let staker = s.user(SILVER);

    s.client.stake(&staker, &SILVER);

    s.set_time(1_000);
    s.client.set_level(&s.owner, &1, &20_000_000, &1_000);

    // The displayed level follows the table at once.
    assert_eq!(s.client.get_user_level(&staker), Some(0));
    assert_eq!(
        s.client.get_user_level_text(&staker),
        String::from_str(&s.env, "No Tier")
    );

    // Accrual keeps the old weight until the position is settled again.
    assert_eq!(s.client.get_total_weighted_stake(), SILVER * 1_000);
    assert_eq!(s.client.sync_position(&staker), Some(0));
    assert_eq!(s.client.get_total_weighted_stake(), 0);

    // Level 0 weighs nothing, so the reward stops at what was settled.
    s.set_time(2_000);
    assert_eq!(s.client.get_pending_rewards(&staker), (REWARD_RATE * 1_000, 0));
}

#[test]
fn test_sync_position_without_stake_fails() {
    let s = Setup::new();
    let nobody = Address::generate(&s.env);

    let result = s.client.try_sync_position(&nobody);
    assert_eq!(result.unwrap_err().unwrap(), ContractError::NoStake);
}

#[test]
fn test_levels_stay_strictly_ordered() {
    let s = Setup::new();

    s.client.add_level(&s.owner, &3, &200_000_000, &3_000);
    s.client.set_level(&s.owner, &2, &100_000_000, &2_000);
    let _ = s.client.try_set_level(&s.owner, &2, &300_000_000, &2_000);
    s.client.delete_level(&s.owner, &3);
    s.client.add_level(&s.owner, &3, &150_000_000, &2_500);

    let levels = s.client.get_levels();
    let mut previous: Option<i128> = None;
    for level in levels.iter() {
        if let Some(prev) = previous {
            assert!(level.min_stake > prev);
        }
        previous = Some(level.min_stake);
    }
    assert_eq!(levels.len(), 4);
}
