extern crate std;

use soroban_sdk::{testutils::Address as _, Address};

use crate::test::{at_block, funded_staker, setup, END, ONE, PER_BLOCK, START};
use crate::{Asset, ContractError, PauseScope};

// ── Admin role ───────────────────────────────────────────────────────────────

#[test]
fn test_admin_can_hand_over_role() {
    let s = setup();
    let new_admin = Address::generate(&s.env);

    s.client.set_admin(&s.admin, &new_admin);
    assert_eq!(s.client.get_admin(), new_admin);

    // The old admin is now an ordinary caller.
    match s.client.try_set_meta_node_per_block(&s.admin, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Forbidden),
        _ => unreachable!("Expected Forbidden error"),
    }
}

#[test]
fn test_set_admin_by_non_admin_fails() {
    let s = setup();
    let intruder = Address::generate(&s.env);

    match s.client.try_set_admin(&intruder, &intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Forbidden),
        _ => unreachable!("Expected Forbidden error"),
    }
    assert_eq!(s.client.get_admin(), s.admin);
}

#[test]
fn test_set_admin_without_signature_fails() {
    let s = setup();
    let new_admin = Address::generate(&s.env);

    s.env.set_auths(&[]);
    assert!(s.client.try_set_admin(&s.admin, &new_admin).is_err());
    assert_eq!(s.client.get_admin(), s.admin);
}

#[test]
fn test_admin_operations_require_admin() {
    let s = setup();
    let intruder = Address::generate(&s.env);
    let token = Asset::Token(s.token.clone());

    let results = [
        s.client.try_add_pool(&intruder, &token, &10, &1, &1, &false).err(),
        s.client.try_set_pool_weight(&intruder, &0, &5).err(),
        s.client.try_update_pool(&intruder, &0, &1, &1).err(),
        s.client.try_set_start_block(&intruder, &50).err(),
        s.client.try_set_end_block(&intruder, &5_000).err(),
        s.client.try_set_meta_node_per_block(&intruder, &1).err(),
        s.client.try_set_meta_node(&intruder, &intruder).err(),
        s.client.try_pause(&intruder, &PauseScope::Claim).err(),
    ];
    for result in results {
        match result {
            Some(Ok(e)) => assert_eq!(e, ContractError::Forbidden),
            _ => unreachable!("Expected Forbidden error"),
        }
    }

    assert_eq!(s.client.pool_count(), 1);
    assert_eq!(s.client.pool_weight(&0), 100);
    assert_eq!(s.client.start_block(), START);
    assert_eq!(s.client.end_block(), END);
    assert_eq!(s.client.meta_node_per_block(), PER_BLOCK);
    assert!(!s.client.is_paused(&PauseScope::Claim));
}

// ── Pools ────────────────────────────────────────────────────────────────────

#[test]
fn test_add_pool_enforces_asset_layout() {
    let s = setup();

    match s.client.try_add_pool(&s.admin, &Asset::Native, &10, &1, &1, &false) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAsset),
        _ => unreachable!("Expected InvalidAsset error"),
    }
    match s
        .client
        .try_add_pool(&s.admin, &Asset::Token(s.meta_node.clone()), &10, &1, &1, &false)
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAsset),
        _ => unreachable!("Expected InvalidAsset error"),
    }

    let pid = s
        .client
        .add_pool(&s.admin, &Asset::Token(s.token.clone()), &10, &1, &1, &false);
    assert_eq!(pid, 1);
    assert_eq!(s.client.pool_count(), 2);
    assert_eq!(s.client.get_pool(&pid).asset, Asset::Token(s.token.clone()));
}

#[test]
fn test_add_pool_after_end_fails() {
    let s = setup();
    at_block(&s.env, END);

    match s
        .client
        .try_add_pool(&s.admin, &Asset::Token(s.token.clone()), &10, &1, &1, &false)
    {
        Err(Ok(e)) => assert_eq!(e, ContractError::ScheduleInvalid),
        _ => unreachable!("Expected ScheduleInvalid error"),
    }
}

#[test]
fn test_add_pool_with_update_protects_past_blocks() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, ONE);

    at_block(&s.env, START);
    s.client.deposit_native(&staker, &ONE);

    at_block(&s.env, START + 10);
    s.client
        .add_pool(&s.admin, &Asset::Token(s.token.clone()), &100, &1, &1, &true);

    // First 10 blocks at full weight, next 10 at half.
    at_block(&s.env, START + 20);
    assert_eq!(s.client.pending_reward(&0, &staker), 15 * PER_BLOCK);
}

#[test]
fn test_set_pool_weight_settles_at_old_weight() {
    let s = setup();
    let pid = s
        .client
        .add_pool(&s.admin, &Asset::Token(s.token.clone()), &100, &1, &1, &true);
    let staker = funded_staker(&s, &s.native, ONE);

    at_block(&s.env, START);
    s.client.deposit_native(&staker, &ONE);

    // 10 blocks at 100/200, then 10 blocks at 300/400.
    at_block(&s.env, START + 10);
    s.client.set_pool_weight(&s.admin, &0, &300);
    assert_eq!(s.client.pool_weight(&0), 300);
    assert_eq!(s.client.pool_weight(&pid), 100);
    assert_eq!(s.client.total_weight(), 400);

    at_block(&s.env, START + 20);
    assert_eq!(s.client.pending_reward(&0, &staker), 5 * PER_BLOCK + 15 * PER_BLOCK / 2);
}

#[test]
fn test_set_pool_weight_to_zero_total_fails() {
    let s = setup();

    match s.client.try_set_pool_weight(&s.admin, &0, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ScheduleInvalid),
        _ => unreachable!("Expected ScheduleInvalid error"),
    }
    assert_eq!(s.client.pool_weight(&0), 100);

    match s.client.try_set_pool_weight(&s.admin, &3, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::UnknownPool),
        _ => unreachable!("Expected UnknownPool error"),
    }
}

#[test]
fn test_update_pool_applies_to_new_requests_only() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, 2 * ONE);

    at_block(&s.env, START);
    s.client.deposit_native(&staker, &(2 * ONE));
    let first = s.client.request_unstake(&staker, &0, &ONE);

    s.client.update_pool(&s.admin, &0, &(2 * ONE), &10);
    let pool = s.client.get_pool(&0);
    assert_eq!(pool.min_deposit, 2 * ONE);
    assert_eq!(pool.unlock_delay, 10);

    let second = s.client.request_unstake(&staker, &0, &ONE);
    assert_eq!(first, START + 100);
    assert_eq!(second, START + 10);

    match s.client.try_update_pool(&s.admin, &0, &-1, &10) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAmount),
        _ => unreachable!("Expected InvalidAmount error"),
    }
}

// ── Schedule ─────────────────────────────────────────────────────────────────

#[test]
fn test_admin_sets_window() {
    let s = setup();

    s.client.set_start_block(&s.admin, &200);
    s.client.set_end_block(&s.admin, &300);
    assert_eq!(s.client.start_block(), 200);
    assert_eq!(s.client.end_block(), 300);

    match s.client.try_set_start_block(&s.admin, &300) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ScheduleInvalid),
        _ => unreachable!("Expected ScheduleInvalid error"),
    }
    match s.client.try_set_end_block(&s.admin, &150) {
        Err(Ok(e)) => assert_eq!(e, ContractError::ScheduleInvalid),
        _ => unreachable!("Expected ScheduleInvalid error"),
    }
    assert_eq!(s.client.start_block(), 200);
    assert_eq!(s.client.end_block(), 300);
}

#[test]
fn test_set_meta_node_per_block_is_not_retroactive() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, ONE);

    at_block(&s.env, START);
    s.client.deposit_native(&staker, &ONE);

    at_block(&s.env, START + 50);
    s.client.set_meta_node_per_block(&s.admin, &(PER_BLOCK / 2));
    assert_eq!(s.client.meta_node_per_block(), PER_BLOCK / 2);

    // 50 blocks at the old rate, 100 at the new one.
    at_block(&s.env, START + 150);
    assert_eq!(s.client.pending_reward(&0, &staker), 100 * PER_BLOCK);

    match s.client.try_set_meta_node_per_block(&s.admin, &-1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAmount),
        _ => unreachable!("Expected InvalidAmount error"),
    }
}

#[test]
fn test_rewards_stop_when_rate_set_to_zero() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, ONE);

    at_block(&s.env, START);
    s.client.deposit_native(&staker, &ONE);

    at_block(&s.env, START + 50);
    s.client.set_meta_node_per_block(&s.admin, &0);

    at_block(&s.env, START + 500);
    assert_eq!(s.client.pending_reward(&0, &staker), 50 * PER_BLOCK);
}

#[test]
fn test_extending_a_finished_window_does_not_pay_the_gap() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, ONE);

    at_block(&s.env, END - 10);
    s.client.deposit_native(&staker, &ONE);

    at_block(&s.env, END + 100);
    s.client.set_end_block(&s.admin, &(END + 200));

    // 10 blocks before the old end, none in the gap, 50 after re-opening.
    at_block(&s.env, END + 150);
    assert_eq!(s.client.pending_reward(&0, &staker), 60 * PER_BLOCK);
}

#[test]
fn test_moving_start_earlier_opens_future_blocks_only() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, ONE);

    at_block(&s.env, 20);
    s.client.deposit_native(&staker, &ONE);

    at_block(&s.env, 50);
    s.client.set_start_block(&s.admin, &40);

    at_block(&s.env, 60);
    assert_eq!(s.client.pending_reward(&0, &staker), 10 * PER_BLOCK);
}

// ── Reward token ─────────────────────────────────────────────────────────────

#[test]
fn test_set_meta_node_rejects_staked_assets() {
    let s = setup();
    s.client
        .add_pool(&s.admin, &Asset::Token(s.token.clone()), &10, &1, &1, &false);

    match s.client.try_set_meta_node(&s.admin, &s.token) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAsset),
        _ => unreachable!("Expected InvalidAsset error"),
    }
    match s.client.try_set_meta_node(&s.admin, &s.native) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidAsset),
        _ => unreachable!("Expected InvalidAsset error"),
    }

    let replacement = Address::generate(&s.env);
    s.client.set_meta_node(&s.admin, &replacement);
    assert_eq!(s.client.get_meta_node(), replacement);
}

// ── Pausing ──────────────────────────────────────────────────────────────────

#[test]
fn test_paused_withdraw_blocks_unstake_and_withdraw() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, ONE);
    s.client.deposit_native(&staker, &ONE);

    s.client.pause(&s.admin, &PauseScope::Withdraw);
    assert!(s.client.is_paused(&PauseScope::Withdraw));

    match s.client.try_request_unstake(&staker, &0, &ONE) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }
    match s.client.try_withdraw(&staker, &0, &ONE) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }

    // Claims and deposits are unaffected.
    assert_eq!(s.client.claim(&staker, &0), 0);

    s.client.resume(&s.admin, &PauseScope::Withdraw);
    s.client.request_unstake(&staker, &0, &ONE);
}

#[test]
fn test_paused_claim_blocks_claim_only() {
    let s = setup();
    let staker = funded_staker(&s, &s.native, ONE);

    at_block(&s.env, START);
    s.client.deposit_native(&staker, &ONE);
    s.client.pause(&s.admin, &PauseScope::Claim);

    at_block(&s.env, START + 10);
    match s.client.try_claim(&staker, &0) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }
    s.client.request_unstake(&staker, &0, &ONE);

    s.client.resume(&s.admin, &PauseScope::Claim);
    assert_eq!(s.client.claim(&staker, &0), 10 * PER_BLOCK);
}
