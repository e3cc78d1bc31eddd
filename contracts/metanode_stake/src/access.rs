use soroban_sdk::{symbol_short, Address, Env, Symbol};

use crate::ContractError;

const ADMIN: Symbol = symbol_short!("ADMIN");

pub fn has_admin(env: &Env) -> bool {
    env.storage().instance().has(&ADMIN)
}

pub fn get_admin(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&ADMIN)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&ADMIN, admin);
}

/// Guard: `caller` must have signed the invocation and be the stored admin.
///
/// A missing admin is `NotInitialized`.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    let admin = get_admin(env)?;
    if *caller != admin {
        return Err(ContractError::Forbidden);
    }
    Ok(())
}
