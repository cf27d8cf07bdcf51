extern crate std;

use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, Ledger as _},
    token, Address, Env,
};

use crate::{FundEscrow, FundEscrowClient};

/// One whole asset unit (Stellar assets use 7 decimals).
pub const UNIT: i128 = 10_000_000;
pub const LOCK_TIME: u64 = 180;
pub const PRICE_DECIMALS: u32 = 8;
/// 3000 units of account per asset unit.
pub const INITIAL_ANSWER: i128 = 3_000 * 100_000_000;
/// Floor of 50 units of account, i.e. ~0.0167 asset at the initial answer.
pub const MIN_VALUE: i128 = 50 * UNIT;
pub const TARGET: i128 = UNIT;

#[contracttype]
#[derive(Clone)]
enum FeedKey {
    Decimals,
    Answer,
    Offline,
}

/// Deterministic price feed whose answer is set directly by the test.
#[contract]
pub struct StubPriceFeed;

#[contractimpl]
impl StubPriceFeed {
    pub fn __constructor(env: Env, decimals: u32, answer: i128) {
        env.storage().instance().set(&FeedKey::Decimals, &decimals);
        env.storage().instance().set(&FeedKey::Answer, &answer);
        env.storage().instance().set(&FeedKey::Offline, &false);
    }

    pub fn decimals(env: Env) -> u32 {
        env.storage().instance().get(&FeedKey::Decimals).unwrap()
    }

    pub fn latest_answer(env: Env) -> i128 {
        let offline: bool = env.storage().instance().get(&FeedKey::Offline).unwrap();
        if offline {
            panic!("feed offline");
        }
        env.storage().instance().get(&FeedKey::Answer).unwrap()
    }

    pub fn set_answer(env: Env, answer: i128) {
        env.storage().instance().set(&FeedKey::Answer, &answer);
    }

    pub fn set_offline(env: Env, offline: bool) {
        env.storage().instance().set(&FeedKey::Offline, &offline);
    }
}

pub struct Setup {
    pub env: Env,
    pub escrow: FundEscrowClient<'static>,
    pub feed: StubPriceFeedClient<'static>,
    pub token: token::Client<'static>,
    pub beneficiary: Address,
    token_admin: token::StellarAssetClient<'static>,
}

impl Setup {
    /// Campaign with a 180 s window, a target of 1.0 asset and a floor of
    /// 50 units of account at a price of 3000.
    pub fn new() -> Self {
        Self::with_params(LOCK_TIME, TARGET, MIN_VALUE)
    }

    pub fn with_params(lock_time: u64, target: i128, min_value: i128) -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let beneficiary = Address::generate(&env);
        let issuer = Address::generate(&env);
        let sac = env.register_stellar_asset_contract_v2(issuer);
        let token = token::Client::new(&env, &sac.address());
        let token_admin = token::StellarAssetClient::new(&env, &sac.address());

        let feed_id = env.register(StubPriceFeed, (PRICE_DECIMALS, INITIAL_ANSWER));
        let feed = StubPriceFeedClient::new(&env, &feed_id);

        let escrow_id = env.register(
            FundEscrow,
            (
                beneficiary.clone(),
                sac.address(),
                feed_id,
                lock_time,
                target,
                min_value,
            ),
        );
        let escrow = FundEscrowClient::new(&env, &escrow_id);

        Self {
            env,
            escrow,
            feed,
            token,
            beneficiary,
            token_admin,
        }
    }

    /// A fresh address holding `balance` of the funding asset.
    pub fn contributor(&self, balance: i128) -> Address {
        let who = Address::generate(&self.env);
        self.token_admin.mint(&who, &balance);
        who
    }

    /// Move the ledger clock to exactly `window_end`.
    pub fn close_window(&self) {
        let window_end = self.escrow.window_end();
        self.env.ledger().with_mut(|li| li.timestamp = window_end);
    }

    pub fn advance(&self, seconds: u64) {
        self.env.ledger().with_mut(|li| li.timestamp += seconds);
    }

    pub fn escrow_token_balance(&self) -> i128 {
        self.token.balance(&self.escrow.address)
    }
}
