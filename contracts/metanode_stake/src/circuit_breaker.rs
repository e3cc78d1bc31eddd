use soroban_sdk::{contracttype, symbol_short, Env, Symbol};

use crate::ContractError;

// ── Types ─────────────────────────────────────────────────────

/// Operations that can be halted independently.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PauseScope {
    /// `request_unstake` and `withdraw`.
    Withdraw,
    /// `claim`.
    Claim,
}

// ── Storage Keys ─────────────────────────────────────────────

fn pause_key(scope: &PauseScope) -> (Symbol, PauseScope) {
    (symbol_short!("PAUSED"), scope.clone())
}

// ── Core Logistics ───────────────────────────────────────────

pub fn is_paused(env: &Env, scope: &PauseScope) -> bool {
    env.storage()
        .instance()
        .get(&pause_key(scope))
        .unwrap_or(false)
}

pub fn require_not_paused(env: &Env, scope: &PauseScope) -> Result<(), ContractError> {
    if is_paused(env, scope) {
        return Err(ContractError::Paused);
    }
    Ok(())
}

/// Flip the breaker for `scope`. Callers must have checked admin rights.
pub fn set_paused(env: &Env, scope: &PauseScope, paused: bool) {
    env.storage().instance().set(&pause_key(scope), &paused);
}
