//! Soroban RPC client: polls `getEvents` and decodes CharityTrust events.
//!
//! Network failures, HTTP 429 and JSON-RPC errors outside
//! [`RpcError::is_fatal`] are retried with exponential back-off capped at
//! [`MAX_BACKOFF_SECS`]. Fatal JSON-RPC errors and empty results are returned
//! to the caller.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, LedgerEvent};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    /// Invalid request, unknown method or invalid params (for example a
    /// `startLedger` outside the node's retention window): retrying the same
    /// call cannot help.
    pub fn is_fatal(&self) -> bool {
        matches!(self.code, -32602..=-32600)
    }
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

/// One entry of `getEvents` as returned with `xdrFormat: "json"`.
///
/// Topics and data are ScVal JSON: `{"symbol":"donation"}`,
/// `{"address":"G..."}`, `{"i128":"5000000"}`, and for a contract struct
/// `{"map":[{"key":{"symbol":"amount"},"val":{...}}, ...]}`.
#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    #[serde(rename = "topicJson", default)]
    pub topic: Vec<Value>,
    #[serde(rename = "valueJson", default)]
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// One page of `getEvents` output.
#[derive(Debug)]
pub struct EventPage {
    pub events: Vec<RawEvent>,
    /// Opaque cursor for the next page, if the node returned one.
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

/// Doubling delay between retries of one request.
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
        warn!("{reason}; retrying in {}s", self.secs);
        tokio::time::sleep(Duration::from_secs(self.secs)).await;
        self.secs = (self.secs * 2).min(MAX_BACKOFF_SECS);
    }
}

/// Fetch one page of contract events, starting at `start_ledger` or
/// continuing from `cursor` when one is given.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_id: &str,
    start_ledger: u32,
    cursor: Option<&str>,
    limit: u32,
) -> Result<EventPage> {
    let request = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "getEvents",
        "params": build_params(contract_id, start_ledger, cursor, limit),
    });
    let mut backoff = Backoff::new();

    loop {
        let resp = match client.post(rpc_url).json(&request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                backoff.wait(&format!("RPC request failed: {e}")).await;
                continue;
            }
        };

        if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            backoff.wait("Rate-limited by RPC").await;
            continue;
        }

        let body: RpcResponse = resp.json().await?;
        if let Some(err) = body.error {
            if err.is_fatal() {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            backoff
                .wait(&format!("RPC error {}: {}", err.code, err.message))
                .await;
            continue;
        }

        let result = body.result.ok_or(IndexerError::EmptyResult)?;
        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        return Ok(EventPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        });
    }
}

fn build_params(contract_id: &str, start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": [contract_id]
            }
        ],
        "pagination": {
            "limit": limit
        },
        "xdrFormat": "json"
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Fields pulled out of an event's data blob.
#[derive(Debug, Default, PartialEq, Eq)]
struct EventFields {
    actor: Option<String>,
    beneficiary: Option<String>,
    amount: Option<String>,
    note: Option<String>,
    /// Acceptance time recorded by the contract itself, when present.
    timestamp: Option<i64>,
}

/// Decode a list of raw RPC events into [`LedgerEvent`] structs.
///
/// Events emitted by failed contract calls are dropped: the ledger rolled
/// them back, so they never happened.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<LedgerEvent> {
    raw.iter()
        .enumerate()
        .filter(|(_, e)| e.in_successful_contract_call != Some(false))
        .filter_map(|(i, e)| decode_single(e, i, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, index: usize, contract_id: &str) -> Option<LedgerEvent> {
    let kind = EventKind::from_topic(raw.topic.first().and_then(sc_symbol)?);

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let subject = raw.topic.get(1).and_then(sc_scalar);
    let fields = decode_data(&raw.value, &kind, subject);

    let timestamp = fields
        .timestamp
        .or_else(|| raw.ledger_closed_at.as_deref().and_then(parse_iso_to_unix))
        .unwrap_or(0);

    // RPC ids are zero-padded and sort in ledger order; synthesize one in the
    // same spirit when the node omits it.
    let event_id = raw
        .id
        .clone()
        .or_else(|| raw.paging_token.clone())
        .unwrap_or_else(|| {
            format!(
                "{ledger:019}-{}-{index:010}",
                raw.tx_hash.as_deref().unwrap_or("notx")
            )
        });

    Some(LedgerEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        actor: fields.actor,
        beneficiary: fields.beneficiary,
        amount: fields.amount,
        note: fields.note,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Read the event's data map. `subject` is the address carried as the
/// second topic and backs up a missing address field.
fn decode_data(value: &Value, kind: &EventKind, subject: Option<String>) -> EventFields {
    let field = |name: &str| map_entry(value, name).and_then(sc_scalar);
    let timestamp = || field("timestamp").and_then(|t| t.parse::<i64>().ok());

    match kind {
        EventKind::LedgerInitialized => EventFields {
            actor: field("owner").or(subject),
            amount: field("goal"),
            ..Default::default()
        },
        EventKind::DonationReceived => EventFields {
            actor: field("donor").or(subject),
            amount: field("amount"),
            note: field("message"),
            timestamp: timestamp(),
            ..Default::default()
        },
        EventKind::FundsDistributed => EventFields {
            beneficiary: field("beneficiary").or(subject),
            amount: field("amount"),
            timestamp: timestamp(),
            ..Default::default()
        },
        EventKind::GoalUpdated => EventFields {
            actor: subject,
            amount: field("new_goal"),
            ..Default::default()
        },
        EventKind::BeneficiaryAdded => EventFields {
            beneficiary: field("beneficiary").or(subject),
            note: field("name"),
            ..Default::default()
        },
        EventKind::BeneficiaryVerified => EventFields {
            beneficiary: field("beneficiary").or(subject),
            ..Default::default()
        },
        EventKind::Unknown => EventFields::default(),
    }
}

/// Value stored under symbol key `name` in an ScVal map.
fn map_entry<'a>(value: &'a Value, name: &str) -> Option<&'a Value> {
    value
        .get("map")?
        .as_array()?
        .iter()
        .find(|entry| entry.get("key").and_then(sc_symbol) == Some(name))
        .and_then(|entry| entry.get("val"))
}

fn sc_symbol(value: &Value) -> Option<&str> {
    value.get("symbol")?.as_str()
}

/// Render a scalar ScVal as text. Integers may arrive as decimal strings,
/// JSON numbers or, for 128-bit values, `{"hi":..,"lo":..}` parts.
fn sc_scalar(value: &Value) -> Option<String> {
    let (tag, inner) = value.as_object()?.iter().next()?;
    match tag.as_str() {
        "address" | "string" | "symbol" => inner.as_str().map(String::from),
        "bool" => inner.as_bool().map(|b| b.to_string()),
        "u32" | "i32" | "u64" | "i64" | "timepoint" | "duration" => sc_integer(inner),
        "i128" | "u128" => sc_integer(inner).or_else(|| sc_int128_parts(inner)),
        _ => None,
    }
}

fn sc_integer(inner: &Value) -> Option<String> {
    match inner {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn sc_int128_parts(inner: &Value) -> Option<String> {
    let part = |key: &str| -> Option<i128> {
        match inner.get(key)? {
            Value::String(s) => s.parse().ok(),
            Value::Number(n) => n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from)),
            _ => None,
        }
    };
    let hi = part("hi")?;
    let lo = part("lo")?;
    Some(((hi << 64) + lo).to_string())
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
