#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use metanode_stake::{Asset, MetaNodeStakeContract, MetaNodeStakeContractClient};
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token::{Client as TokenClient, StellarAssetClient},
    Address, Env,
};

#[derive(Arbitrary, Debug)]
pub enum FuzzAction {
    Deposit { pool: u8, amount: u32 },
    RequestUnstake { pool: u8, amount: u32 },
    Withdraw { pool: u8, amount: u32 },
    Claim { pool: u8 },
    SettleAll,
    SetWeight { pool: u8, weight: u16 },
    SetRate { rate: u32 },
    Advance { blocks: u8 },
}

const REWARD_SUPPLY: i128 = 1_000_000_000_000_000;

fuzz_target!(|actions: Vec<FuzzAction>| {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_sequence_number(10);

    let meta_node = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let native = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let token = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let assets = [native.clone(), token.clone()];

    let contract_id = env.register(MetaNodeStakeContract, ());
    let client = MetaNodeStakeContractClient::new(&env, &contract_id);
    let admin = Address::generate(&env);

    client.initialize(&admin, &meta_node, &native, &20u32, &2_000u32, &1_000i128);
    client.add_pool(&admin, &Asset::Native, &100, &1, &5, &false);
    client.add_pool(&admin, &Asset::Token(token.clone()), &50, &1, &0, &true);
    StellarAssetClient::new(&env, &meta_node).mint(&contract_id, &REWARD_SUPPLY);

    let mut users = vec![];
    for _ in 0..4 {
        users.push(Address::generate(&env));
    }

    let mut deposited = [0i128; 2];
    let mut withdrawn = [0i128; 2];
    let mut claimed = 0i128;

    for (i, action) in actions.into_iter().take(64).enumerate() {
        let caller = &users[i % users.len()];
        match action {
            FuzzAction::Deposit { pool, amount } => {
                let pid = u32::from(pool % 2);
                let amt = i128::from(amount);
                if amt > 0 {
                    StellarAssetClient::new(&env, &assets[pid as usize]).mint(caller, &amt);
                }
                if client.try_deposit(caller, &pid, &amt).is_ok() {
                    deposited[pid as usize] += amt;
                }
            }
            FuzzAction::RequestUnstake { pool, amount } => {
                let pid = u32::from(pool % 2);
                let _ = client.try_request_unstake(caller, &pid, &i128::from(amount));
            }
            FuzzAction::Withdraw { pool, amount } => {
                let pid = u32::from(pool % 2);
                let amt = i128::from(amount);
                let unlocked = client.withdraw_amount(&pid, caller).unlocked;
                let result = client.try_withdraw(caller, &pid, &amt);
                assert_eq!(result.is_ok(), amt > 0 && amt <= unlocked);
                if result.is_ok() {
                    withdrawn[pid as usize] += amt;
                }
            }
            FuzzAction::Claim { pool } => {
                let pid = u32::from(pool % 2);
                if let Ok(Ok(amount)) = client.try_claim(caller, &pid) {
                    assert!(amount >= 0);
                    claimed += amount;
                }
            }
            FuzzAction::SettleAll => {
                client.settle_all_pools();
            }
            FuzzAction::SetWeight { pool, weight } => {
                let pid = u32::from(pool % 2);
                let _ = client.try_set_pool_weight(&admin, &pid, &u64::from(weight));
            }
            FuzzAction::SetRate { rate } => {
                let _ = client.try_set_meta_node_per_block(&admin, &i128::from(rate));
            }
            FuzzAction::Advance { blocks } => {
                let next = env.ledger().sequence() + u32::from(blocks);
                env.ledger().set_sequence_number(next);
            }
        }

        for pid in 0..2u32 {
            let slot = pid as usize;
            let pool = client.get_pool(&pid);
            let mut staked = 0i128;
            let mut queued = 0i128;
            for user in &users {
                let stake = client.get_user(&pid, user);
                assert!(stake.staked >= 0);
                assert!(stake.pending_reward >= 0);
                staked += stake.staked;
                for request in stake.requests.iter() {
                    queued += request.amount;
                }
            }
            let net = deposited[slot] - withdrawn[slot];
            assert_eq!(pool.total_staked, staked);
            assert_eq!(pool.total_staked + queued, net);
            assert_eq!(
                TokenClient::new(&env, &assets[slot]).balance(&contract_id),
                net
            );
        }
        assert_eq!(
            TokenClient::new(&env, &meta_node).balance(&contract_id),
            REWARD_SUPPLY - claimed
        );
    }
});
