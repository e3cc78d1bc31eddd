#![no_std]

pub mod access;
pub mod circuit_breaker;
pub mod events;
pub mod gateway;
pub mod ledger;
pub mod pool;
pub mod rewards;

use soroban_sdk::{contract, contractimpl, symbol_short, Address, Env, Symbol};

pub use circuit_breaker::PauseScope;
pub use ledger::{UserStake, WithdrawAmounts, WithdrawalRequest};
pub use pool::{Asset, Pool, Schedule};

// ── Storage key constants ────────────────────────────────────────────────────

const META_NODE: Symbol = symbol_short!("META");

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Forbidden = 3,
    UnknownPool = 4,
    InvalidAmount = 5,
    InsufficientStake = 6,
    WithdrawalLocked = 7,
    TransferFailed = 8,
    ScheduleInvalid = 9,
    Paused = 10,
    InvalidAsset = 11,
    MathOverflow = 12,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct MetaNodeStakeContract;

#[contractimpl]
impl MetaNodeStakeContract {
    // ── Initialisation ──────────────────────────────────────────────────────

    /// Bootstrap the contract.
    ///
    /// * `meta_node`    – token paid out as reward.
    /// * `native_token` – asset contract backing the native pool.
    /// * `start_block` / `end_block` – emission window, `[start, end)`.
    /// * `meta_node_per_block` – reward emitted per block across all pools.
    pub fn initialize(
        env: Env,
        admin: Address,
        meta_node: Address,
        native_token: Address,
        start_block: u32,
        end_block: u32,
        meta_node_per_block: i128,
    ) -> Result<(), ContractError> {
        if access::has_admin(&env) {
            return Err(ContractError::AlreadyInitialized);
        }
        if meta_node == native_token {
            return Err(ContractError::InvalidAsset);
        }
        let schedule = Schedule {
            start_block,
            end_block,
            reward_per_block: meta_node_per_block,
            total_weight: 0,
        };
        schedule.validate()?;

        access::set_admin(&env, &admin);
        gateway::set_native_token(&env, &native_token);
        env.storage().instance().set(&META_NODE, &meta_node);
        pool::store_schedule(&env, &schedule);

        events::publish_initialized(
            &env,
            admin,
            meta_node,
            native_token,
            start_block,
            end_block,
            meta_node_per_block,
        );

        Ok(())
    }

    // ── Admin: access and pausing ───────────────────────────────────────────

    /// Hand the admin role to `new_admin`. Only the current admin may call this.
    pub fn set_admin(env: Env, caller: Address, new_admin: Address) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;

        access::set_admin(&env, &new_admin);

        events::publish_admin_changed(&env, caller, new_admin);

        Ok(())
    }

    /// Replace the reward token. It may not be the native asset or any
    /// pool's staked token.
    pub fn set_meta_node(env: Env, caller: Address, meta_node: Address) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;

        if meta_node == gateway::native_token(&env)? {
            return Err(ContractError::InvalidAsset);
        }
        let staked_asset = Asset::Token(meta_node.clone());
        for pid in 0..pool::pool_count(&env) {
            if pool::load_pool(&env, pid)?.asset == staked_asset {
                return Err(ContractError::InvalidAsset);
            }
        }

        env.storage().instance().set(&META_NODE, &meta_node);

        events::publish_meta_node_set(&env, meta_node);

        Ok(())
    }

    /// Halt the operations in `scope`: `Withdraw` blocks `request_unstake`
    /// and `withdraw`, `Claim` blocks `claim`. Deposits are never paused.
    pub fn pause(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;
        circuit_breaker::set_paused(&env, &scope, true);
        events::publish_paused(&env, caller, scope);
        Ok(())
    }

    /// Lift a pause set by [`pause`](Self::pause).
    pub fn resume(env: Env, caller: Address, scope: PauseScope) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;
        circuit_breaker::set_paused(&env, &scope, false);
        events::publish_resumed(&env, caller, scope);
        Ok(())
    }

    // ── Admin: emission schedule ────────────────────────────────────────────
    //
    // Every schedule change settles all pools at the old parameters first so
    // past blocks keep the rate they were emitted at.

    /// Move the first block that emits rewards.
    pub fn set_start_block(env: Env, caller: Address, start_block: u32) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;
        let schedule = pool::load_schedule(&env)?;
        let next = Schedule {
            start_block,
            ..schedule.clone()
        };
        Self::apply_schedule(&env, &schedule, &next)
    }

    /// Move the block at which emission stops.
    pub fn set_end_block(env: Env, caller: Address, end_block: u32) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;
        let schedule = pool::load_schedule(&env)?;
        let next = Schedule {
            end_block,
            ..schedule.clone()
        };
        Self::apply_schedule(&env, &schedule, &next)
    }

    /// Change the reward emitted per block across all pools.
    pub fn set_meta_node_per_block(
        env: Env,
        caller: Address,
        meta_node_per_block: i128,
    ) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;
        let schedule = pool::load_schedule(&env)?;
        let next = Schedule {
            reward_per_block: meta_node_per_block,
            ..schedule.clone()
        };
        Self::apply_schedule(&env, &schedule, &next)
    }

    // ── Admin: pools ────────────────────────────────────────────────────────

    /// Append a pool and return its index.
    ///
    /// With `with_update`, every existing pool is settled first so the new
    /// weight does not dilute blocks that have already passed.
    pub fn add_pool(
        env: Env,
        caller: Address,
        asset: Asset,
        weight: u64,
        min_deposit: i128,
        unlock_delay: u32,
        with_update: bool,
    ) -> Result<u32, ContractError> {
        access::require_admin(&env, &caller)?;

        let current = env.ledger().sequence();
        let mut schedule = pool::load_schedule(&env)?;
        if current >= schedule.end_block {
            return Err(ContractError::ScheduleInvalid);
        }
        let pid = pool::pool_count(&env);
        pool::validate_asset(pid, &asset, &Self::meta_node(&env)?)?;
        if min_deposit < 0 {
            return Err(ContractError::InvalidAmount);
        }
        let total_weight = schedule.reweighted(0, weight)?;

        if with_update {
            Self::settle_all(&env, &schedule, current, true)?;
        }

        schedule.total_weight = total_weight;
        pool::store_schedule(&env, &schedule);
        let pid = pool::push_pool(
            &env,
            &Pool::new(asset.clone(), weight, min_deposit, unlock_delay, current),
        );

        events::publish_pool_added(&env, pid, asset, weight, min_deposit, unlock_delay);

        Ok(pid)
    }

    /// Change a pool's minimum deposit and unlock delay. Requests already
    /// queued keep the unlock block they were given.
    pub fn update_pool(
        env: Env,
        caller: Address,
        pid: u32,
        min_deposit: i128,
        unlock_delay: u32,
    ) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;

        let mut pool = pool::load_pool(&env, pid)?;
        if min_deposit < 0 {
            return Err(ContractError::InvalidAmount);
        }
        pool.min_deposit = min_deposit;
        pool.unlock_delay = unlock_delay;
        pool::store_pool(&env, pid, &pool);

        events::publish_pool_updated(&env, pid, min_deposit, unlock_delay);

        Ok(())
    }

    /// Change a pool's weight after settling every pool at the old weights.
    pub fn set_pool_weight(env: Env, caller: Address, pid: u32, weight: u64) -> Result<(), ContractError> {
        access::require_admin(&env, &caller)?;

        let current = env.ledger().sequence();
        let mut schedule = pool::load_schedule(&env)?;
        let old_weight = pool::load_pool(&env, pid)?.weight;
        let total_weight = schedule.reweighted(old_weight, weight)?;

        Self::settle_all(&env, &schedule, current, true)?;

        let mut pool = pool::load_pool(&env, pid)?;
        pool.weight = weight;
        pool::store_pool(&env, pid, &pool);
        schedule.total_weight = total_weight;
        pool::store_schedule(&env, &schedule);

        events::publish_pool_weight_set(&env, pid, weight, total_weight);

        Ok(())
    }

    // ── Settlement ──────────────────────────────────────────────────────────

    /// Bring one pool's accumulator up to the current block.
    pub fn settle_pool(env: Env, pid: u32) -> Result<Pool, ContractError> {
        let schedule = pool::load_schedule(&env)?;
        let pool = pool::load_pool(&env, pid)?;
        let settled = rewards::settle_pool(&pool, &schedule, env.ledger().sequence())?;
        Self::store_settled(&env, pid, &pool, &settled);
        Ok(settled)
    }

    /// Bring every pool's accumulator up to the current block.
    pub fn settle_all_pools(env: Env) -> Result<(), ContractError> {
        let schedule = pool::load_schedule(&env)?;
        Self::settle_all(&env, &schedule, env.ledger().sequence(), false)
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Stake `amount` of pool `pid`'s asset.
    ///
    /// The staker is settled first so the new principal earns nothing for
    /// blocks that have already passed.
    pub fn deposit(env: Env, staker: Address, pid: u32, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        Self::deposit_into(&env, &staker, pid, amount)
    }

    /// Stake native currency into pool 0.
    pub fn deposit_native(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        staker.require_auth();
        Self::deposit_into(&env, &staker, 0, amount)
    }

    /// Queue `amount` of principal for withdrawal and return its unlock block.
    ///
    /// The amount stops earning immediately; the tokens only leave through
    /// `withdraw` once the pool's unlock delay has passed.
    pub fn request_unstake(env: Env, staker: Address, pid: u32, amount: i128) -> Result<u32, ContractError> {
        staker.require_auth();
        circuit_breaker::require_not_paused(&env, &PauseScope::Withdraw)?;
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let current = env.ledger().sequence();
        let (mut pool, mut user) = Self::settle_user(&env, pid, &staker, current)?;
        if user.staked < amount {
            return Err(ContractError::InsufficientStake);
        }

        user.staked -= amount;
        pool.total_staked = pool
            .total_staked
            .checked_sub(amount)
            .ok_or(ContractError::MathOverflow)?;
        rewards::rebase_debt(&mut user, &pool)?;

        let unlock_block = current
            .checked_add(pool.unlock_delay)
            .ok_or(ContractError::MathOverflow)?;
        ledger::queue_request(&mut user, amount, unlock_block);

        pool::store_pool(&env, pid, &pool);
        ledger::store_user(&env, pid, &staker, &user);

        events::publish_unstake_requested(&env, pid, staker, amount, unlock_block);

        Ok(unlock_block)
    }

    /// Pay out `amount` of unlocked principal, oldest requests first.
    ///
    /// Returns the locked/unlocked split left in the queue afterwards.
    pub fn withdraw(env: Env, staker: Address, pid: u32, amount: i128) -> Result<WithdrawAmounts, ContractError> {
        staker.require_auth();
        circuit_breaker::require_not_paused(&env, &PauseScope::Withdraw)?;
        if amount <= 0 {
            return Err(ContractError::InvalidAmount);
        }

        let current = env.ledger().sequence();
        let pool = pool::load_pool(&env, pid)?;
        let mut user = ledger::load_user(&env, pid, &staker);
        ledger::consume_unlocked(&mut user, amount, current)?;
        ledger::store_user(&env, pid, &staker, &user);

        gateway::transfer_out(&env, &pool.asset, &staker, amount)?;

        events::publish_withdrawn(&env, pid, staker, amount);

        ledger::withdraw_amounts(&user, current)
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `staker` has accrued in pool `pid`.
    ///
    /// Returns the amount paid, which is zero when nothing is owed.
    pub fn claim(env: Env, staker: Address, pid: u32) -> Result<i128, ContractError> {
        staker.require_auth();
        circuit_breaker::require_not_paused(&env, &PauseScope::Claim)?;

        let (pool, mut user) = Self::settle_user(&env, pid, &staker, env.ledger().sequence())?;
        let amount = user.pending_reward;
        user.pending_reward = 0;

        pool::store_pool(&env, pid, &pool);
        ledger::store_user(&env, pid, &staker, &user);

        if amount <= 0 {
            return Ok(0);
        }

        let reward = Asset::Token(Self::meta_node(&env)?);
        gateway::transfer_out(&env, &reward, &staker, amount)?;

        events::publish_reward_claimed(&env, pid, staker, amount);

        Ok(amount)
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Principal `user` has earning rewards in pool `pid`.
    pub fn staking_balance(env: Env, pid: u32, user: Address) -> Result<i128, ContractError> {
        pool::load_pool(&env, pid)?;
        Ok(ledger::load_user(&env, pid, &user).staked)
    }

    /// Locked and unlocked totals of `user`'s queued principal.
    pub fn withdraw_amount(env: Env, pid: u32, user: Address) -> Result<WithdrawAmounts, ContractError> {
        pool::load_pool(&env, pid)?;
        let stake = ledger::load_user(&env, pid, &user);
        ledger::withdraw_amounts(&stake, env.ledger().sequence())
    }

    /// Claimable reward as of the current block, without settling.
    pub fn pending_reward(env: Env, pid: u32, user: Address) -> Result<i128, ContractError> {
        let block = env.ledger().sequence();
        Self::pending_reward_at(env, pid, user, block)
    }

    /// Claimable reward as of `block`, without settling.
    pub fn pending_reward_at(env: Env, pid: u32, user: Address, block: u32) -> Result<i128, ContractError> {
        let schedule = pool::load_schedule(&env)?;
        let pool = pool::load_pool(&env, pid)?;
        let stake = ledger::load_user(&env, pid, &user);
        rewards::pending_at(&pool, &stake, &schedule, block)
    }

    /// Reward emitted across all pools over `[from, to)` within the window.
    pub fn get_multiplier(env: Env, from: u32, to: u32) -> Result<i128, ContractError> {
        rewards::multiplier(&pool::load_schedule(&env)?, from, to)
    }

    /// Pool `pid`'s share of the emission, relative to `total_weight`.
    pub fn pool_weight(env: Env, pid: u32) -> Result<u64, ContractError> {
        Ok(pool::load_pool(&env, pid)?.weight)
    }

    /// Number of pools; valid indices are `0..pool_count()`.
    pub fn pool_count(env: Env) -> u32 {
        pool::pool_count(&env)
    }

    /// Pool `pid` as last stored; the accumulator may lag the current block.
    pub fn get_pool(env: Env, pid: u32) -> Result<Pool, ContractError> {
        pool::load_pool(&env, pid)
    }

    /// `user`'s stake, debt, pending reward and withdrawal queue in pool `pid`.
    pub fn get_user(env: Env, pid: u32, user: Address) -> Result<UserStake, ContractError> {
        pool::load_pool(&env, pid)?;
        Ok(ledger::load_user(&env, pid, &user))
    }

    pub fn get_schedule(env: Env) -> Result<Schedule, ContractError> {
        pool::load_schedule(&env)
    }

    /// Sum of every pool's weight.
    pub fn total_weight(env: Env) -> Result<u64, ContractError> {
        Ok(pool::load_schedule(&env)?.total_weight)
    }

    /// First block of the emission window.
    pub fn start_block(env: Env) -> Result<u32, ContractError> {
        Ok(pool::load_schedule(&env)?.start_block)
    }

    /// First block after the emission window.
    pub fn end_block(env: Env) -> Result<u32, ContractError> {
        Ok(pool::load_schedule(&env)?.end_block)
    }

    pub fn meta_node_per_block(env: Env) -> Result<i128, ContractError> {
        Ok(pool::load_schedule(&env)?.reward_per_block)
    }

    /// The reward token.
    pub fn get_meta_node(env: Env) -> Result<Address, ContractError> {
        Self::meta_node(&env)
    }

    pub fn get_admin(env: Env) -> Result<Address, ContractError> {
        access::get_admin(&env)
    }

    /// Whether the operations in `scope` are currently halted.
    pub fn is_paused(env: Env, scope: PauseScope) -> bool {
        circuit_breaker::is_paused(&env, &scope)
    }

    pub fn is_initialized(env: Env) -> bool {
        access::has_admin(&env)
    }

    // ── Internal helpers ─────────────────────────────────────────────────────

    fn meta_node(env: &Env) -> Result<Address, ContractError> {
        env.storage()
            .instance()
            .get(&META_NODE)
            .ok_or(ContractError::NotInitialized)
    }

    fn deposit_into(env: &Env, staker: &Address, pid: u32, amount: i128) -> Result<(), ContractError> {
        let current = env.ledger().sequence();
        let (mut pool, mut user) = Self::settle_user(env, pid, staker, current)?;
        if amount <= 0 || amount < pool.min_deposit {
            return Err(ContractError::InvalidAmount);
        }

        user.staked = user
            .staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        pool.total_staked = pool
            .total_staked
            .checked_add(amount)
            .ok_or(ContractError::MathOverflow)?;
        rewards::rebase_debt(&mut user, &pool)?;

        pool::store_pool(env, pid, &pool);
        ledger::store_user(env, pid, staker, &user);

        gateway::transfer_in(env, &pool.asset, staker, amount)?;

        events::publish_deposit(env, pid, staker.clone(), amount, pool.total_staked);

        Ok(())
    }

    /// Settle pool `pid` and `user` at `current` without persisting either.
    /// Must run before anything reads `pending_reward` or changes `staked`.
    fn settle_user(
        env: &Env,
        pid: u32,
        user: &Address,
        current: u32,
    ) -> Result<(Pool, UserStake), ContractError> {
        let schedule = pool::load_schedule(env)?;
        let pool = pool::load_pool(env, pid)?;
        let stake = ledger::load_user(env, pid, user);

        let (settled, stake, _) = rewards::settle(&pool, &stake, &schedule, current)?;
        if settled.acc_reward_per_share != pool.acc_reward_per_share {
            events::publish_pool_settled(env, pid, settled.acc_reward_per_share, settled.total_staked);
        }
        Ok((settled, stake))
    }

    /// Settle every pool at `schedule`. With `pin`, each pool's last settled
    /// block is also raised to `current`, so blocks that passed outside the
    /// old window are never paid out by a later schedule.
    fn settle_all(env: &Env, schedule: &Schedule, current: u32, pin: bool) -> Result<(), ContractError> {
        for pid in 0..pool::pool_count(env) {
            let pool = pool::load_pool(env, pid)?;
            let mut settled = rewards::settle_pool(&pool, schedule, current)?;
            if pin {
                settled.last_settled_block = settled.last_settled_block.max(current);
            }
            Self::store_settled(env, pid, &pool, &settled);
        }
        Ok(())
    }

    fn store_settled(env: &Env, pid: u32, before: &Pool, settled: &Pool) {
        if settled == before {
            return;
        }
        pool::store_pool(env, pid, settled);
        if settled.acc_reward_per_share != before.acc_reward_per_share {
            events::publish_pool_settled(env, pid, settled.acc_reward_per_share, settled.total_staked);
        }
    }

    fn apply_schedule(env: &Env, old: &Schedule, next: &Schedule) -> Result<(), ContractError> {
        next.validate()?;

        Self::settle_all(env, old, env.ledger().sequence(), true)?;
        pool::store_schedule(env, next);

        events::publish_schedule_set(env, next.start_block, next.end_block, next.reward_per_block);

        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_admin;
