//! Campaign totals rebuilt from the indexed event stream.
//!
//! The contract is the source of truth; this is a read model for dashboards
//! and refund tooling that would otherwise have to query every contributor.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use tracing::warn;

use crate::events::{EventKind, EventRecord};

/// How the campaign resolved, as far as the indexed events show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No settlement or refund seen yet.
    Pending,
    /// The beneficiary was paid.
    Disbursed,
    /// At least one contributor was refunded.
    Refunding,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContributorSummary {
    pub address: String,
    #[serde(serialize_with = "as_string")]
    pub contributed: i128,
    #[serde(serialize_with = "as_string")]
    pub refunded: i128,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignSummary {
    pub beneficiary: Option<String>,
    #[serde(serialize_with = "opt_as_string")]
    pub target: Option<i128>,
    #[serde(serialize_with = "as_string")]
    pub total_funded: i128,
    #[serde(serialize_with = "as_string")]
    pub total_disbursed: i128,
    #[serde(serialize_with = "as_string")]
    pub total_refunded: i128,
    #[serde(serialize_with = "as_string")]
    pub pool_balance: i128,
    pub outcome: Outcome,
    pub contributors: Vec<ContributorSummary>,
}

/// Fold an ordered event list into campaign totals.
///
/// Records with an unparseable amount are skipped.
pub fn summarize(records: &[EventRecord]) -> CampaignSummary {
    let mut beneficiary = None;
    let mut target = None;
    let mut total_funded = 0i128;
    let mut total_disbursed = 0i128;
    let mut total_refunded = 0i128;
    let mut per_contributor: BTreeMap<String, (i128, i128)> = BTreeMap::new();

    for record in records {
        let kind = record.kind();
        if kind == EventKind::Unknown {
            continue;
        }
        let Some(amount) = parse_amount(record) else {
            continue;
        };

        match kind {
            EventKind::CampaignCreated => {
                beneficiary = record.actor.clone();
                target = Some(amount);
            }
            EventKind::ContributionReceived => {
                total_funded += amount;
                if let Some(actor) = &record.actor {
                    per_contributor.entry(actor.clone()).or_default().0 += amount;
                }
            }
            EventKind::FundsDisbursed => total_disbursed += amount,
            EventKind::RefundIssued => {
                total_refunded += amount;
                if let Some(actor) = &record.actor {
                    per_contributor.entry(actor.clone()).or_default().1 += amount;
                }
            }
            EventKind::Unknown => {}
        }
    }

    let outcome = if total_disbursed > 0 {
        Outcome::Disbursed
    } else if total_refunded > 0 {
        Outcome::Refunding
    } else {
        Outcome::Pending
    };

    CampaignSummary {
        beneficiary,
        target,
        total_funded,
        total_disbursed,
        total_refunded,
        pool_balance: total_funded - total_disbursed - total_refunded,
        outcome,
        contributors: per_contributor
            .into_iter()
            .map(|(address, (contributed, refunded))| ContributorSummary {
                address,
                contributed,
                refunded,
            })
            .collect(),
    }
}

fn parse_amount(record: &EventRecord) -> Option<i128> {
    let raw = record.amount.as_deref()?;
    match raw.parse::<i128>() {
        Ok(amount) => Some(amount),
        Err(_) => {
            warn!(
                "Skipping {} event {} with bad amount {raw:?}",
                record.event_type, record.id
            );
            None
        }
    }
}

fn as_string<S: Serializer>(value: &i128, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

fn opt_as_string<S: Serializer>(value: &Option<i128>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, kind: EventKind, actor: &str, amount: &str) -> EventRecord {
        EventRecord {
            id,
            event_id: format!("000000{id}-0000000001"),
            event_type: kind.as_str().to_string(),
            actor: Some(actor.to_string()),
            amount: Some(amount.to_string()),
            ledger: id,
            timestamp: 0,
            contract_id: "CONTRACT1".to_string(),
            tx_hash: None,
            created_at: 0,
        }
    }

    #[test]
    fn reached_campaign_is_disbursed() {
        let records = vec![
            record(1, EventKind::CampaignCreated, "GBENEF", "10000000"),
            record(2, EventKind::ContributionReceived, "GALICE", "6000000"),
            record(3, EventKind::ContributionReceived, "GBOB", "4000000"),
            record(4, EventKind::FundsDisbursed, "GBENEF", "10000000"),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.beneficiary.as_deref(), Some("GBENEF"));
        assert_eq!(summary.target, Some(10_000_000));
        assert_eq!(summary.total_funded, 10_000_000);
        assert_eq!(summary.total_disbursed, 10_000_000);
        assert_eq!(summary.pool_balance, 0);
        assert_eq!(summary.outcome, Outcome::Disbursed);
        assert_eq!(summary.contributors.len(), 2);
    }

    #[test]
    fn missed_campaign_tracks_refunds_per_contributor() {
        let records = vec![
            record(1, EventKind::ContributionReceived, "GALICE", "1000000"),
            record(2, EventKind::ContributionReceived, "GBOB", "2500000"),
            record(3, EventKind::ContributionReceived, "GALICE", "500000"),
            record(4, EventKind::RefundIssued, "GALICE", "1500000"),
        ];

        let summary = summarize(&records);
        assert_eq!(summary.outcome, Outcome::Refunding);
        assert_eq!(summary.total_refunded, 1_500_000);
        assert_eq!(summary.pool_balance, 2_500_000);
        assert_eq!(
            summary.contributors,
            vec![
                ContributorSummary {
                    address: "GALICE".to_string(),
                    contributed: 1_500_000,
                    refunded: 1_500_000,
                },
                ContributorSummary {
                    address: "GBOB".to_string(),
                    contributed: 2_500_000,
                    refunded: 0,
                },
            ]
        );
    }

    #[test]
    fn bad_amounts_are_skipped() {
        let records = vec![
            record(1, EventKind::ContributionReceived, "GALICE", "oops"),
            record(2, EventKind::ContributionReceived, "GBOB", "7"),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total_funded, 7);
        assert_eq!(summary.outcome, Outcome::Pending);
    }

    #[test]
    fn amounts_serialize_as_strings() {
        let records = vec![record(1, EventKind::ContributionReceived, "GALICE", "42")];
        let json = serde_json::to_value(summarize(&records)).unwrap();
        assert_eq!(json["total_funded"], "42");
        assert_eq!(json["target"], serde_json::Value::Null);
        assert_eq!(json["outcome"], "pending");
        assert_eq!(json["contributors"][0]["contributed"], "42");
    }
}
