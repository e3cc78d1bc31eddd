use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol, Vec};

use crate::pool::{TTL_EXTEND_TO, TTL_THRESHOLD};
use crate::ContractError;

const USER: Symbol = symbol_short!("USER");

// ── Types ───────────────────────────────────────────────────────────────────

/// Principal queued by `request_unstake`, withdrawable from `unlock_block`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawalRequest {
    pub amount: i128,
    pub unlock_block: u32,
}

/// One staker's position in one pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserStake {
    /// Principal currently earning rewards.
    pub staked: i128,
    /// Entitlement of `staked` at the last settlement; subtracted so only new
    /// accrual is credited.
    pub reward_debt: i128,
    /// Settled, unclaimed reward.
    pub pending_reward: i128,
    /// Outstanding withdrawal requests, oldest first.
    pub requests: Vec<WithdrawalRequest>,
}

impl UserStake {
    pub fn new(env: &Env) -> Self {
        UserStake {
            staked: 0,
            reward_debt: 0,
            pending_reward: 0,
            requests: Vec::new(env),
        }
    }
}

/// Split of a user's queued principal.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WithdrawAmounts {
    /// Queued and still waiting for its unlock block.
    pub locked: i128,
    /// Unlocked and ready for `withdraw`.
    pub unlocked: i128,
}

// ── Request queue ───────────────────────────────────────────────────────────

pub fn queue_request(user: &mut UserStake, amount: i128, unlock_block: u32) {
    user.requests.push_back(WithdrawalRequest {
        amount,
        unlock_block,
    });
}

/// Locked and unlocked totals at `current_block`.
///
/// Only the unlocked prefix of the queue counts as unlocked; anything behind
/// a still-locked request waits for it.
pub fn withdraw_amounts(user: &UserStake, current_block: u32) -> Result<WithdrawAmounts, ContractError> {
    let mut locked: i128 = 0;
    let mut unlocked: i128 = 0;
    let mut in_prefix = true;
    for request in user.requests.iter() {
        in_prefix = in_prefix && request.unlock_block <= current_block;
        let bucket = if in_prefix { &mut unlocked } else { &mut locked };
        *bucket = bucket
            .checked_add(request.amount)
            .ok_or(ContractError::MathOverflow)?;
    }
    Ok(WithdrawAmounts { locked, unlocked })
}

/// Take `amount` from the unlocked prefix of the queue.
///
/// Fully covered requests are dropped from the front; a request that only
/// partly covers the remainder is shrunk in place. Fails without touching
/// the queue when the unlocked prefix is short.
pub fn consume_unlocked(user: &mut UserStake, amount: i128, current_block: u32) -> Result<(), ContractError> {
    if withdraw_amounts(user, current_block)?.unlocked < amount {
        return Err(ContractError::WithdrawalLocked);
    }

    let mut remaining = amount;
    while remaining > 0 {
        let Some(mut head) = user.requests.pop_front() else {
            return Err(ContractError::WithdrawalLocked);
        };
        if head.amount > remaining {
            head.amount -= remaining;
            user.requests.push_front(head);
            break;
        }
        remaining -= head.amount;
    }
    Ok(())
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn user_key(pid: u32, user: &Address) -> (Symbol, u32, Address) {
    (USER, pid, user.clone())
}

/// Load a user's position, or an empty one if they never staked here.
pub fn load_user(env: &Env, pid: u32, user: &Address) -> UserStake {
    env.storage()
        .persistent()
        .get(&user_key(pid, user))
        .unwrap_or_else(|| UserStake::new(env))
}

pub fn store_user(env: &Env, pid: u32, user: &Address, stake: &UserStake) {
    let key = user_key(pid, user);
    env.storage().persistent().set(&key, stake);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}
