//! # Types
//!
//! Shared data structures used across all modules of the escrow.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A campaign is internally stored as two separate instance entries:
//!
//! - [`CampaignConfig`] — written once by the constructor; never mutated.
//! - [`CampaignState`] — written on every contribution, settlement and refund.
//!
//! The public API exposes the reconstructed [`Campaign`] struct for convenience.
//!
//! ### Settlement as a Finite-State Machine
//!
//! Only the settlement flag is stored ([`CampaignStatus`]). The richer
//! [`CampaignPhase`] is derived from the clock and the running totals:
//!
//! ```text
//! Open ──► ReachedAwaitingSettle ──► SettledPaid
//!   └────► MissedRefundable
//! ```
//!
//! `MissedRefundable` has no terminal transition; each contributor resolves
//! their own share through `claim_refund`.

use soroban_sdk::{contracttype, Address};

/// Stored settlement flag.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignStatus {
    /// Not yet disbursed.
    Open,
    /// Beneficiary has been paid the whole pool. Terminal.
    SettledPaid,
}

/// Lifecycle phase derived from the ledger clock, totals and [`CampaignStatus`].
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignPhase {
    /// Window still open; contributions accepted.
    Open,
    /// Window closed with the target met; only `settle` may succeed.
    ReachedAwaitingSettle,
    /// Window closed with the target missed; only `claim_refund` may succeed.
    MissedRefundable,
    /// Pool paid to the beneficiary.
    SettledPaid,
}

/// Immutable campaign parameters, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub beneficiary: Address,
    pub token: Address,
    pub oracle: Address,
    pub window_end: u64,
    pub target: i128,
    pub min_value: i128,
}

/// Mutable accounting, updated by every successful operation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub total_received: i128,
    pub total_refunded: i128,
    pub total_disbursed: i128,
    pub status: CampaignStatus,
}

impl Default for CampaignState {
    fn default() -> Self {
        Self {
            total_received: 0,
            total_refunded: 0,
            total_disbursed: 0,
            status: CampaignStatus::Open,
        }
    }
}

impl CampaignState {
    /// Asset units currently held on behalf of the campaign.
    pub fn pool_balance(&self) -> i128 {
        self.total_received - self.total_refunded - self.total_disbursed
    }
}

/// Full view of a campaign, reconstructed from config and state.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    /// Only address allowed to trigger disbursement.
    pub beneficiary: Address,
    /// Token contract of the funding asset.
    pub token: Address,
    /// Price feed used for the contribution floor.
    pub oracle: Address,
    /// Ledger timestamp at which the window closes.
    pub window_end: u64,
    /// Asset amount that must be raised for disbursement.
    pub target: i128,
    /// Per-contribution floor in the unit of account.
    pub min_value: i128,
    /// Sum of all accepted contributions.
    pub total_received: i128,
    /// Asset units currently held by the escrow.
    pub pool_balance: i128,
    pub status: CampaignStatus,
    pub phase: CampaignPhase,
}
