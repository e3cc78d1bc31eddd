use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::ContractError;

// ── Storage key constants ───────────────────────────────────────────────────

const POOL: Symbol = symbol_short!("POOL");
const POOL_CNT: Symbol = symbol_short!("POOL_CNT");
const SCHEDULE: Symbol = symbol_short!("SCHED");

pub(crate) const TTL_THRESHOLD: u32 = 5184000;
pub(crate) const TTL_EXTEND_TO: u32 = 10368000;

// ── Types ───────────────────────────────────────────────────────────────────

/// What a pool accepts as stake.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Asset {
    /// The network's native currency, resolved through the native-asset
    /// contract configured at initialization.
    Native,
    /// Any other fungible token, by contract address.
    Token(Address),
}

/// A staking bucket with its own weight and unlock delay.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub asset: Asset,
    /// Relative share of the global per-block emission.
    pub weight: u64,
    pub min_deposit: i128,
    /// Blocks between `request_unstake` and the amount becoming withdrawable.
    pub unlock_delay: u32,
    pub total_staked: i128,
    /// Reward per staked unit, scaled by `rewards::PRECISION`. Never decreases.
    pub acc_reward_per_share: i128,
    /// Last block the accumulator was brought up to. Never decreases.
    pub last_settled_block: u32,
}

impl Pool {
    pub fn new(
        asset: Asset,
        weight: u64,
        min_deposit: i128,
        unlock_delay: u32,
        current_block: u32,
    ) -> Self {
        Pool {
            asset,
            weight,
            min_deposit,
            unlock_delay,
            total_staked: 0,
            acc_reward_per_share: 0,
            // Blocks before the window opens are clamped away at settlement.
            // Starting at `current_block` rather than `start_block` keeps the
            // last settled block at or below the current block when the pool
            // is added before the window opens.
            last_settled_block: current_block,
        }
    }
}

/// Global emission schedule shared by every pool.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schedule {
    pub start_block: u32,
    pub end_block: u32,
    pub reward_per_block: i128,
    /// Sum of every pool's weight.
    pub total_weight: u64,
}

impl Schedule {
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.end_block <= self.start_block {
            return Err(ContractError::ScheduleInvalid);
        }
        if self.reward_per_block < 0 {
            return Err(ContractError::InvalidAmount);
        }
        Ok(())
    }

    /// Total weight after one pool's weight moves from `old` to `new`.
    ///
    /// A zero total while pools exist would leave emission with nowhere to
    /// go, so it is rejected.
    pub fn reweighted(&self, old: u64, new: u64) -> Result<u64, ContractError> {
        let total = self
            .total_weight
            .checked_sub(old)
            .and_then(|t| t.checked_add(new))
            .ok_or(ContractError::MathOverflow)?;
        if total == 0 {
            return Err(ContractError::ScheduleInvalid);
        }
        Ok(total)
    }
}

/// Pool 0 is reserved for the native currency and every later pool stakes a
/// token. No pool may stake the reward token.
pub fn validate_asset(pid: u32, asset: &Asset, reward_token: &Address) -> Result<(), ContractError> {
    match asset {
        Asset::Native if pid == 0 => Ok(()),
        Asset::Token(token) if pid > 0 && token != reward_token => Ok(()),
        _ => Err(ContractError::InvalidAsset),
    }
}

// ── Storage helpers ─────────────────────────────────────────────────────────

fn pool_key(pid: u32) -> (Symbol, u32) {
    (POOL, pid)
}

pub fn pool_count(env: &Env) -> u32 {
    env.storage().instance().get(&POOL_CNT).unwrap_or(0)
}

pub fn load_pool(env: &Env, pid: u32) -> Result<Pool, ContractError> {
    env.storage()
        .persistent()
        .get(&pool_key(pid))
        .ok_or(ContractError::UnknownPool)
}

pub fn store_pool(env: &Env, pid: u32, pool: &Pool) {
    let key = pool_key(pid);
    env.storage().persistent().set(&key, pool);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Append a pool and return its index. Indices are never reused.
pub fn push_pool(env: &Env, pool: &Pool) -> u32 {
    let pid = pool_count(env);
    store_pool(env, pid, pool);
    env.storage().instance().set(&POOL_CNT, &(pid + 1));
    pid
}

pub fn load_schedule(env: &Env) -> Result<Schedule, ContractError> {
    env.storage()
        .instance()
        .get(&SCHEDULE)
        .ok_or(ContractError::NotInitialized)
}

pub fn store_schedule(env: &Env, schedule: &Schedule) {
    env.storage().instance().set(&SCHEDULE, schedule);
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}
