//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the escrow:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key      | Type             | Description                      |
//! |----------|------------------|----------------------------------|
//! | `Config` | `CampaignConfig` | Immutable campaign parameters    |
//! | `State`  | `CampaignState`  | Running totals + settlement flag |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                     | Type   | Description                       |
//! |-------------------------|--------|-----------------------------------|
//! | `Contribution(Address)` | `i128` | Cumulative amount per contributor |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//! Ledger entries are managed by [`crate::ledger`].

use soroban_sdk::{contracttype, Address, Env};

use crate::types::{CampaignConfig, CampaignState};

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Campaign parameters (Instance).
    Config,
    /// Campaign accounting (Instance).
    State,
    /// Ledger entry for one contributor (Persistent).
    Contribution(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Write the campaign parameters and an empty state. Called only by the constructor.
pub fn init_campaign(env: &Env, config: &CampaignConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage()
        .instance()
        .set(&DataKey::State, &CampaignState::default());
    bump_instance(env);
}

/// Load the immutable campaign parameters.
pub fn load_config(env: &Env) -> CampaignConfig {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("campaign not initialized")
}

/// Load the mutable campaign accounting.
pub fn load_state(env: &Env) -> CampaignState {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("campaign not initialized")
}

pub fn save_state(env: &Env, state: &CampaignState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
pub(crate) fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}
