//! Contribution ledger: contributor → cumulative amount in asset base units.
//!
//! A missing entry reads as zero. Refunds remove the entry, so "never
//! contributed" and "already refunded" are indistinguishable here; both
//! correctly reject a further refund.

use soroban_sdk::{Address, Env};

use crate::storage::{bump_persistent, DataKey};
use crate::Error;

/// Amount recorded for `contributor`, or 0.
pub fn contribution_of(env: &Env, contributor: &Address) -> i128 {
    let key = DataKey::Contribution(contributor.clone());
    let amount: Option<i128> = env.storage().persistent().get(&key);
    match amount {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Add `amount` to the contributor's entry and return the new cumulative total.
pub fn record_contribution(env: &Env, contributor: &Address, amount: i128) -> Result<i128, Error> {
    let key = DataKey::Contribution(contributor.clone());
    let current: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    let total = current
        .checked_add(amount)
        .ok_or(Error::ArithmeticOverflow)?;
    env.storage().persistent().set(&key, &total);
    bump_persistent(env, &key);
    Ok(total)
}

/// Read and clear the contributor's entry. Returns 0 if there was none.
pub fn take_contribution(env: &Env, contributor: &Address) -> i128 {
    let key = DataKey::Contribution(contributor.clone());
    let amount: i128 = env.storage().persistent().get(&key).unwrap_or(0);
    if amount > 0 {
        env.storage().persistent().remove(&key);
    }
    amount
}
