//! Soroban RPC client — pages through `getEvents` for one escrow contract
//! and decodes what it returns.
//!
//! ## Resilience
//!
//! * Transport failures, HTTP 429 and JSON-RPC errors outside
//!   [`FATAL_RPC_CODES`] are retried with exponential back-off, capped at
//!   [`MAX_BACKOFF_SECS`].
//! * A malformed request is reported as [`IndexerError::Rpc`] straight away.

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::{IndexerError, Result};
use crate::events::{EscrowEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// Invalid request, unknown method, invalid params.
const FATAL_RPC_CODES: [i64; 3] = [-32600, -32601, -32602];

/// `ScValType::Symbol` discriminant in the XDR encoding of an `ScVal`.
const SCV_SYMBOL: u32 = 15;

// ─────────────────────────────────────────────────────────
// Scan position
// ─────────────────────────────────────────────────────────

/// Where the next `getEvents` request starts.
///
/// A cursor, when present, takes precedence over the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub ledger: u32,
    pub cursor: Option<String>,
}

impl Position {
    pub fn at_ledger(ledger: u32) -> Self {
        Self {
            ledger,
            cursor: None,
        }
    }

    /// Position after a page. The ledger never moves backwards, even if the
    /// RPC reports an older tip.
    fn after_page(&self, latest_ledger: Option<u64>, cursor: Option<String>) -> Self {
        let ledger = latest_ledger
            .map(|l| u32::try_from(l).unwrap_or(u32::MAX).max(self.ledger))
            .unwrap_or(self.ledger);
        Self { ledger, cursor }
    }
}

/// One `getEvents` page and the position to continue from.
#[derive(Debug)]
pub struct Page {
    pub events: Vec<RawEvent>,
    pub next: Position,
}

// ─────────────────────────────────────────────────────────
// JSON-RPC wire shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GetEventsRequest<'a> {
    jsonrpc: &'static str,
    id: u32,
    method: &'static str,
    params: GetEventsParams<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GetEventsParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    start_ledger: Option<u32>,
    filters: [ContractFilter<'a>; 1],
    pagination: Pagination<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ContractFilter<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    contract_ids: [&'a str; 1],
}

#[derive(Debug, Serialize)]
struct Pagination<'a> {
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    cursor: Option<&'a str>,
}

impl<'a> GetEventsRequest<'a> {
    fn new(contract_id: &'a str, from: &'a Position, limit: u32) -> Self {
        let cursor = from.cursor.as_deref();
        Self {
            jsonrpc: "2.0",
            id: 1,
            method: "getEvents",
            params: GetEventsParams {
                start_ledger: cursor.is_none().then_some(from.ledger),
                filters: [ContractFilter {
                    kind: "contract",
                    contract_ids: [contract_id],
                }],
                pagination: Pagination { limit, cursor },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetEventsResponse {
    result: Option<EventsResult>,
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventsResult {
    events: Vec<RawEvent>,
    cursor: Option<String>,
    latest_ledger: Option<u64>,
}

/// An event exactly as `getEvents` returns it.
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    /// Unique per event: ledger, transaction, operation and event index.
    pub id: Option<String>,
    /// Topic list; each entry is JSON or base64 XDR.
    pub topic: Vec<String>,
    /// Event data.
    pub value: Value,
    pub contract_id: Option<String>,
    pub tx_hash: Option<String>,
    pub ledger: Option<u64>,
    pub ledger_closed_at: Option<String>,
    pub in_successful_contract_call: Option<bool>,
}

// ─────────────────────────────────────────────────────────
// Event source
// ─────────────────────────────────────────────────────────

/// Outcome of a single request that did not produce a page.
enum Failure {
    Retry(String),
    Fatal(IndexerError),
}

struct Backoff {
    secs: u64,
}

impl Backoff {
    fn new() -> Self {
        Self {
            secs: INITIAL_BACKOFF_SECS,
        }
    }

    async fn wait(&mut self, reason: &str) {
        warn!("{reason} (will retry in {}s)", self.secs);
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

/// `getEvents` pager for a single escrow contract.
pub struct EventSource {
    client: Client,
    rpc_url: String,
    contract_id: String,
    limit: u32,
}

impl EventSource {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            rpc_url: config.rpc_url.clone(),
            contract_id: config.contract_id.clone(),
            limit: config.events_per_page,
        }
    }

    pub fn contract_id(&self) -> &str {
        &self.contract_id
    }

    /// Fetch the page that starts at `from`, retrying transient failures.
    pub async fn next_page(&self, from: &Position) -> Result<Page> {
        let mut backoff = Backoff::new();
        loop {
            match self.request_page(from).await {
                Ok(page) => return Ok(page),
                Err(Failure::Fatal(e)) => return Err(e),
                Err(Failure::Retry(reason)) => backoff.wait(&reason).await,
            }
        }
    }

    async fn request_page(&self, from: &Position) -> std::result::Result<Page, Failure> {
        let request = GetEventsRequest::new(&self.contract_id, from, self.limit);
        let resp = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Failure::Retry(format!("RPC request failed: {e}")))?;

        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(Failure::Retry("Rate-limited by RPC".to_string()));
        }

        let body: GetEventsResponse = resp
            .json()
            .await
            .map_err(|e| Failure::Fatal(IndexerError::Http(e)))?;
        let result = into_result(body)?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        Ok(Page {
            next: from.after_page(result.latest_ledger, result.cursor),
            events: result.events,
        })
    }
}

fn into_result(body: GetEventsResponse) -> std::result::Result<EventsResult, Failure> {
    if let Some(err) = body.error {
        if FATAL_RPC_CODES.contains(&err.code) {
            return Err(Failure::Fatal(IndexerError::Rpc {
                code: err.code,
                message: err.message,
            }));
        }
        return Err(Failure::Retry(format!(
            "RPC soft error {}: {}",
            err.code, err.message
        )));
    }
    body.result
        .ok_or(Failure::Fatal(IndexerError::EmptyResponse))
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`EscrowEvent`] structs.
///
/// Events from failed contract calls are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<EscrowEvent> {
    raw.iter()
        .filter(|e| e.in_successful_contract_call != Some(false))
        .filter_map(|e| decode_single(e, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, contract_id: &str) -> Option<EscrowEvent> {
    let Some(event_id) = raw.id.clone() else {
        warn!("Dropping event without an id (ledger {:?})", raw.ledger);
        return None;
    };
    // Extract leading topic symbol to determine event type.
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let topic_actor = raw.topic.get(1).map(|t| extract_topic_value(t));
    let (data_actor, amount) = decode_data(&raw.value, kind);
    let actor = data_actor.or(topic_actor);

    if kind == EventKind::Unknown {
        debug!("Unrecognised event topic {first_topic}");
    }

    Some(EscrowEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        actor,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.as_deref().map(normalize_tx_hash),
    })
}

/// Pull apart the JSON `value` blob that Soroban returns for event data.
/// Returns `(actor, amount)`.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::CampaignCreated => {
            let actor = extract_field(value, &["beneficiary"])
                .or_else(|| find_nested(value, "beneficiary"));
            let amount = extract_field(value, &["target"]);
            (actor, amount)
        }
        EventKind::ContributionReceived | EventKind::RefundIssued => {
            let actor = extract_field(value, &["contributor", "address"]);
            let amount = extract_field(value, &["amount"]);
            (actor, amount)
        }
        EventKind::FundsDisbursed => {
            let actor = extract_field(value, &["beneficiary", "address"]);
            let amount = extract_field(value, &["amount"]);
            (actor, amount)
        }
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(s) = value.get(key).and_then(scalar_to_string) {
            return Some(s);
        }
    }
    None
}

/// Render a JSON scalar, or a typed wrapper like `{"i128":"5"}` /
/// `{"type":"address","value":"G..."}`, as a plain string.
fn scalar_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => ["value", "i128", "address", "u64"]
            .iter()
            .find_map(|k| map.get(*k))
            .and_then(scalar_to_string),
        _ => None,
    }
}

fn find_nested(value: &Value, key: &str) -> Option<String> {
    if let Value::Object(map) = value {
        for (k, v) in map {
            if k == key {
                return scalar_to_string(v);
            }
            if let Some(found) = find_nested(v, key) {
                return Some(found);
            }
        }
    }
    None
}

/// Extract a Soroban Symbol from a topic entry.
///
/// The RPC may return `{"type":"symbol","value":"funded"}`, `{"symbol":"funded"}`,
/// base64 XDR of an `ScVal::Symbol`, or just the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = ["value", "symbol"]
            .iter()
            .find_map(|k| v.get(*k))
            .and_then(|x| x.as_str())
        {
            return s.to_string();
        }
    }
    if let Some(s) = decode_xdr_symbol(raw) {
        return s;
    }
    raw.to_string()
}

/// Decode a base64 XDR `ScVal` if it is a symbol.
fn decode_xdr_symbol(raw: &str) -> Option<String> {
    let bytes = STANDARD.decode(raw).ok()?;
    let tag = u32::from_be_bytes(bytes.get(0..4)?.try_into().ok()?);
    if tag != SCV_SYMBOL {
        return None;
    }
    let len = u32::from_be_bytes(bytes.get(4..8)?.try_into().ok()?) as usize;
    let body = bytes.get(8..8 + len)?;
    std::str::from_utf8(body).ok().map(String::from)
}

/// Extract the value of a non-leading topic (an address for escrow events).
fn extract_topic_value(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = scalar_to_string(&v) {
            return s;
        }
    }
    raw.to_string()
}

/// Lower-case a 32-byte hex transaction hash; leave anything else untouched.
fn normalize_tx_hash(raw: &str) -> String {
    match hex::decode(raw) {
        Ok(bytes) if bytes.len() == 32 => hex::encode(bytes),
        _ => raw.to_string(),
    }
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
