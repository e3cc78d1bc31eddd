use crate::ledger::UserStake;
use crate::pool::{Pool, Schedule};
use crate::ContractError;

/// Fixed-point scaling factor for `acc_reward_per_share`.
///
/// 10^12 keeps per-settlement truncation negligible for stakes up to 10^24
/// units while leaving room in i128 for the intermediate products.
pub const PRECISION: i128 = 1_000_000_000_000;

// ── Core reward engine ──────────────────────────────────────────────────────

/// Total reward emitted over `[from, to)` once the range is clamped to the
/// emission window. Blocks before `start_block` or at/after `end_block` emit
/// nothing.
pub fn multiplier(schedule: &Schedule, from: u32, to: u32) -> Result<i128, ContractError> {
    let from = from.max(schedule.start_block);
    let to = to.min(schedule.end_block);
    if to <= from {
        return Ok(0);
    }
    i128::from(to - from)
        .checked_mul(schedule.reward_per_block)
        .ok_or(ContractError::MathOverflow)
}

/// The pool's weighted slice of the emission over `[from, to)`.
fn pool_reward(schedule: &Schedule, pool: &Pool, from: u32, to: u32) -> Result<i128, ContractError> {
    if pool.weight == 0 || schedule.total_weight == 0 {
        return Ok(0);
    }
    multiplier(schedule, from, to)?
        .checked_mul(i128::from(pool.weight))
        .map(|r| r / i128::from(schedule.total_weight))
        .ok_or(ContractError::MathOverflow)
}

/// Bring a pool's accumulator up to `current_block`.
///
/// ```text
/// Δacc = elapsed × reward_per_block × weight / total_weight × PRECISION / total_staked
/// ```
///
/// `last_settled_block` advances to `min(current, end)` whether or not any
/// reward was added, so an empty pool does not bank the blocks it sat idle.
/// Settling twice at the same block changes nothing the second time.
pub fn settle_pool(pool: &Pool, schedule: &Schedule, current_block: u32) -> Result<Pool, ContractError> {
    let to = current_block.min(schedule.end_block);
    let mut settled = pool.clone();
    if to <= pool.last_settled_block {
        return Ok(settled);
    }

    if pool.total_staked > 0 {
        let reward = pool_reward(schedule, pool, pool.last_settled_block, to)?;
        let delta = reward
            .checked_mul(PRECISION)
            .ok_or(ContractError::MathOverflow)?
            / pool.total_staked;
        settled.acc_reward_per_share = pool
            .acc_reward_per_share
            .checked_add(delta)
            .ok_or(ContractError::MathOverflow)?;
    }
    settled.last_settled_block = to;
    Ok(settled)
}

/// What `staked` units are owed at accumulator value `acc`, rounded down.
pub fn entitlement(staked: i128, acc: i128) -> Result<i128, ContractError> {
    staked
        .checked_mul(acc)
        .map(|v| v / PRECISION)
        .ok_or(ContractError::MathOverflow)
}

/// Settle a pool and one of its stakers.
///
/// Returns the settled pool, the settled user and the reward newly credited
/// to `pending_reward`. The user's `reward_debt` is left at the entitlement
/// of their current stake, so the caller must call [`rebase_debt`] after it
/// changes `staked`.
pub fn settle(
    pool: &Pool,
    user: &UserStake,
    schedule: &Schedule,
    current_block: u32,
) -> Result<(Pool, UserStake, i128), ContractError> {
    let pool = settle_pool(pool, schedule, current_block)?;

    let owed = entitlement(user.staked, pool.acc_reward_per_share)?;
    // Debt is the entitlement at a lower or equal accumulator, so it never
    // exceeds `owed` unless the ledger is corrupt.
    let accrued = owed
        .checked_sub(user.reward_debt)
        .filter(|accrued| *accrued >= 0)
        .ok_or(ContractError::MathOverflow)?;

    let mut user = user.clone();
    user.pending_reward = user
        .pending_reward
        .checked_add(accrued)
        .ok_or(ContractError::MathOverflow)?;
    user.reward_debt = owed;

    Ok((pool, user, accrued))
}

/// Re-snapshot `reward_debt` after the user's stake changed.
pub fn rebase_debt(user: &mut UserStake, pool: &Pool) -> Result<(), ContractError> {
    user.reward_debt = entitlement(user.staked, pool.acc_reward_per_share)?;
    Ok(())
}

/// Claimable reward as of `block`, without persisting anything.
pub fn pending_at(
    pool: &Pool,
    user: &UserStake,
    schedule: &Schedule,
    block: u32,
) -> Result<i128, ContractError> {
    let (_, user, _) = settle(pool, user, schedule, block)?;
    Ok(user.pending_reward)
}

// ── Unit tests ──────────────────────────────────────────────────────────────
// Pure-math tests; the Env is only needed to build the request queue.
