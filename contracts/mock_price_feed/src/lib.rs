//! # Mock Price Feed
//!
//! Stand-in price aggregator for local and test networks, where no real
//! feed is deployed. Exposes the same `decimals` / `latest_answer` interface
//! the escrow's `PriceFeed` client consumes, plus an admin-only
//! `update_answer` to move the price by hand.
//!
//! Local deployments use 8 decimals and an initial answer of `3000 * 10^8`.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, symbol_short, Address,
    Env,
};

pub const DEFAULT_DECIMALS: u32 = 8;
pub const DEFAULT_ANSWER: i128 = 3_000 * 100_000_000;

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InvalidAnswer = 1,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum DataKey {
    Admin,
    Decimals,
    Round,
}

/// The most recent answer and when it was written.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub updated_at: u64,
}

#[contract]
pub struct MockPriceFeed;

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn load_round(env: &Env) -> RoundData {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Round)
        .expect("feed not initialized")
}

#[contractimpl]
impl MockPriceFeed {
    pub fn __constructor(env: Env, admin: Address, decimals: u32, initial_answer: i128) {
        if initial_answer <= 0 {
            panic_with_error!(&env, Error::InvalidAnswer);
        }
        let round = RoundData {
            round_id: 1,
            answer: initial_answer,
            updated_at: env.ledger().timestamp(),
        };
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Decimals, &decimals);
        env.storage().instance().set(&DataKey::Round, &round);
        bump_instance(&env);
    }

    pub fn decimals(env: Env) -> u32 {
        bump_instance(&env);
        env.storage()
            .instance()
            .get(&DataKey::Decimals)
            .expect("feed not initialized")
    }

    pub fn latest_answer(env: Env) -> i128 {
        load_round(&env).answer
    }

    pub fn latest_round(env: Env) -> RoundData {
        load_round(&env)
    }

    /// Publish a new answer. Only the admin set at creation may call this.
    pub fn update_answer(env: Env, answer: i128) -> Result<RoundData, Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .expect("feed not initialized");
        admin.require_auth();

        if answer <= 0 {
            return Err(Error::InvalidAnswer);
        }

        let previous = load_round(&env);
        let round = RoundData {
            round_id: previous.round_id + 1,
            answer,
            updated_at: env.ledger().timestamp(),
        };
        env.storage().instance().set(&DataKey::Round, &round);

        env.events()
            .publish((symbol_short!("price"), round.round_id), answer);
        Ok(round)
    }
}
