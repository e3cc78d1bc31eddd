//! Value movement in and out of the contract.
//!
//! Every pool asset and the reward token is a Stellar Asset Contract, so one
//! token client covers both native currency and tokens once the asset is
//! resolved to a contract address.

use soroban_sdk::{symbol_short, token, Address, Env, Symbol};

use crate::pool::Asset;
use crate::ContractError;

const NATIVE_TOKEN: Symbol = symbol_short!("NATIVE");

pub fn set_native_token(env: &Env, native: &Address) {
    env.storage().instance().set(&NATIVE_TOKEN, native);
}

pub fn native_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&NATIVE_TOKEN)
        .ok_or(ContractError::NotInitialized)
}

/// Contract address backing `asset`.
pub fn resolve(env: &Env, asset: &Asset) -> Result<Address, ContractError> {
    match asset {
        Asset::Native => native_token(env),
        Asset::Token(address) => Ok(address.clone()),
    }
}

/// Pull `amount` of `asset` from `from` into the contract.
pub fn transfer_in(env: &Env, asset: &Asset, from: &Address, amount: i128) -> Result<(), ContractError> {
    let token = resolve(env, asset)?;
    let client = token::Client::new(env, &token);
    if client.balance(from) < amount {
        return Err(ContractError::TransferFailed);
    }
    client.transfer(from, &env.current_contract_address(), &amount);
    Ok(())
}

/// Push `amount` of `asset` from the contract to `to`.
pub fn transfer_out(env: &Env, asset: &Asset, to: &Address, amount: i128) -> Result<(), ContractError> {
    let token = resolve(env, asset)?;
    let client = token::Client::new(env, &token);
    let this = env.current_contract_address();
    if client.balance(&this) < amount {
        return Err(ContractError::TransferFailed);
    }
    client.transfer(&this, to, &amount);
    Ok(())
}
