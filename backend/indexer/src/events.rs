//! Canonical event types emitted by the fund escrow contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/fund_escrow/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the escrow contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The campaign was created (`created` topic).
    CampaignCreated,
    /// A contribution was accepted (`funded` topic).
    ContributionReceived,
    /// The pool was paid to the beneficiary (`disbursed` topic).
    FundsDisbursed,
    /// A contributor reclaimed their contribution (`refunded` topic).
    RefundIssued,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::CampaignCreated,
            "funded" => Self::ContributionReceived,
            "disbursed" => Self::FundsDisbursed,
            "refunded" => Self::RefundIssued,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CampaignCreated => "campaign_created",
            Self::ContributionReceived => "contribution_received",
            Self::FundsDisbursed => "funds_disbursed",
            Self::RefundIssued => "refund_issued",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn from_stored(s: &str) -> Self {
        match s {
            "campaign_created" => Self::CampaignCreated,
            "contribution_received" => Self::ContributionReceived,
            "funds_disbursed" => Self::FundsDisbursed,
            "refund_issued" => Self::RefundIssued,
            _ => Self::Unknown,
        }
    }
}

/// A fully decoded escrow event, ready to be stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscrowEvent {
    /// RPC event id; unique per emitted event, so it is the dedup key.
    pub event_id: String,
    pub event_type: String,
    /// Contributor for `funded`/`refunded`, beneficiary for `created`/`disbursed`.
    pub actor: Option<String>,
    /// Asset base units as a decimal string (i128 does not fit SQLite INTEGER).
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

impl EventRecord {
    pub fn kind(&self) -> EventKind {
        EventKind::from_stored(&self.event_type)
    }
}
