//! Events emitted by the escrow. The off-chain indexer keys on the leading
//! topic symbol, so these names are part of the public interface.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCreated {
    pub beneficiary: Address,
    pub token: Address,
    pub oracle: Address,
    pub window_end: u64,
    pub target: i128,
    pub min_value: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionReceived {
    pub contributor: Address,
    pub amount: i128,
    /// Contributor's cumulative amount after this contribution.
    pub total: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsDisbursed {
    pub beneficiary: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RefundIssued {
    pub contributor: Address,
    pub amount: i128,
}

pub fn emit_campaign_created(env: &Env, event: CampaignCreated) {
    env.events().publish((symbol_short!("created"),), event);
}

pub fn emit_contribution_received(env: &Env, contributor: Address, amount: i128, total: i128) {
    let topics = (symbol_short!("funded"), contributor.clone());
    env.events().publish(
        topics,
        ContributionReceived {
            contributor,
            amount,
            total,
        },
    );
}

pub fn emit_funds_disbursed(env: &Env, beneficiary: Address, amount: i128) {
    let topics = (symbol_short!("disbursed"), beneficiary.clone());
    env.events()
        .publish(topics, FundsDisbursed { beneficiary, amount });
}

pub fn emit_refund_issued(env: &Env, contributor: Address, amount: i128) {
    let topics = (symbol_short!("refunded"), contributor.clone());
    env.events()
        .publish(topics, RefundIssued { contributor, amount });
}
