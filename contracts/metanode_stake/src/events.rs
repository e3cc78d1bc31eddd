#![allow(deprecated)] // events().publish migration tracked separately

use soroban_sdk::{symbol_short, Address, Env};

use crate::circuit_breaker::PauseScope;
use crate::pool::Asset;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once when the contract is bootstrapped.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub meta_node: Address,
    pub native_token: Address,
    pub start_block: u32,
    pub end_block: u32,
    pub reward_per_block: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AdminChangedEvent {
    pub old_admin: Address,
    pub new_admin: Address,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetaNodeSetEvent {
    pub meta_node: Address,
    pub block: u32,
}

/// Fired on any start/end/per-block change, with the schedule now in force.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScheduleSetEvent {
    pub start_block: u32,
    pub end_block: u32,
    pub reward_per_block: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolAddedEvent {
    pub pid: u32,
    pub asset: Asset,
    pub weight: u64,
    pub min_deposit: i128,
    pub unlock_delay: u32,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolUpdatedEvent {
    pub pid: u32,
    pub min_deposit: i128,
    pub unlock_delay: u32,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolWeightSetEvent {
    pub pid: u32,
    pub weight: u64,
    pub total_weight: u64,
    pub block: u32,
}

/// Fired when a pool's accumulator actually moves.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolSettledEvent {
    pub pid: u32,
    pub acc_reward_per_share: i128,
    pub total_staked: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DepositEvent {
    pub pid: u32,
    pub staker: Address,
    pub amount: i128,
    pub new_total_staked: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnstakeRequestedEvent {
    pub pid: u32,
    pub staker: Address,
    pub amount: i128,
    pub unlock_block: u32,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawnEvent {
    pub pid: u32,
    pub staker: Address,
    pub amount: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardClaimedEvent {
    pub pid: u32,
    pub staker: Address,
    pub amount: i128,
    pub block: u32,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PauseChangedEvent {
    pub admin: Address,
    pub scope: PauseScope,
    pub block: u32,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_initialized(
    env: &Env,
    admin: Address,
    meta_node: Address,
    native_token: Address,
    start_block: u32,
    end_block: u32,
    reward_per_block: i128,
) {
    env.events().publish(
        (symbol_short!("INIT"),),
        InitializedEvent {
            admin,
            meta_node,
            native_token,
            start_block,
            end_block,
            reward_per_block,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_admin_changed(env: &Env, old_admin: Address, new_admin: Address) {
    env.events().publish(
        (symbol_short!("ADMIN"), new_admin.clone()),
        AdminChangedEvent {
            old_admin,
            new_admin,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_meta_node_set(env: &Env, meta_node: Address) {
    env.events().publish(
        (symbol_short!("META_SET"),),
        MetaNodeSetEvent {
            meta_node,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_schedule_set(env: &Env, start_block: u32, end_block: u32, reward_per_block: i128) {
    env.events().publish(
        (symbol_short!("SCHED"),),
        ScheduleSetEvent {
            start_block,
            end_block,
            reward_per_block,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_added(
    env: &Env,
    pid: u32,
    asset: Asset,
    weight: u64,
    min_deposit: i128,
    unlock_delay: u32,
) {
    env.events().publish(
        (symbol_short!("POOL_ADD"), pid),
        PoolAddedEvent {
            pid,
            asset,
            weight,
            min_deposit,
            unlock_delay,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_updated(env: &Env, pid: u32, min_deposit: i128, unlock_delay: u32) {
    env.events().publish(
        (symbol_short!("POOL_UPD"), pid),
        PoolUpdatedEvent {
            pid,
            min_deposit,
            unlock_delay,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_weight_set(env: &Env, pid: u32, weight: u64, total_weight: u64) {
    env.events().publish(
        (symbol_short!("POOL_WGT"), pid),
        PoolWeightSetEvent {
            pid,
            weight,
            total_weight,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_pool_settled(env: &Env, pid: u32, acc_reward_per_share: i128, total_staked: i128) {
    env.events().publish(
        (symbol_short!("SETTLED"), pid),
        PoolSettledEvent {
            pid,
            acc_reward_per_share,
            total_staked,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_deposit(env: &Env, pid: u32, staker: Address, amount: i128, new_total_staked: i128) {
    env.events().publish(
        (symbol_short!("DEPOSIT"), staker.clone()),
        DepositEvent {
            pid,
            staker,
            amount,
            new_total_staked,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_unstake_requested(env: &Env, pid: u32, staker: Address, amount: i128, unlock_block: u32) {
    env.events().publish(
        (symbol_short!("UNSTAKE"), staker.clone()),
        UnstakeRequestedEvent {
            pid,
            staker,
            amount,
            unlock_block,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_withdrawn(env: &Env, pid: u32, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("WITHDRAW"), staker.clone()),
        WithdrawnEvent {
            pid,
            staker,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_reward_claimed(env: &Env, pid: u32, staker: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("CLAIM"), staker.clone()),
        RewardClaimedEvent {
            pid,
            staker,
            amount,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_paused(env: &Env, admin: Address, scope: PauseScope) {
    env.events().publish(
        (symbol_short!("PAUSE"),),
        PauseChangedEvent {
            admin,
            scope,
            block: env.ledger().sequence(),
        },
    );
}

pub fn publish_resumed(env: &Env, admin: Address, scope: PauseScope) {
    env.events().publish(
        (symbol_short!("RESUME"),),
        PauseChangedEvent {
            admin,
            scope,
            block: env.ledger().sequence(),
        },
    );
}
