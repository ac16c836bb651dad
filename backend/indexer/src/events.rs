//! Canonical event types emitted by the CharityTrust contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/charity_trust/src/events.rs`.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// All recognised event kinds from the CharityTrust contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The ledger was initialised (`init` topic).
    LedgerInitialized,
    /// A donation was accepted (`donation` topic).
    DonationReceived,
    /// Funds were paid out to a beneficiary (`distrib` topic).
    FundsDistributed,
    /// The owner changed the fundraising goal (`goal_set` topic).
    GoalUpdated,
    /// A beneficiary was registered (`ben_added` topic).
    BeneficiaryAdded,
    /// A beneficiary was verified (`ben_verif` topic).
    BeneficiaryVerified,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::LedgerInitialized,
            "donation" => Self::DonationReceived,
            "distrib" => Self::FundsDistributed,
            "goal_set" => Self::GoalUpdated,
            "ben_added" => Self::BeneficiaryAdded,
            "ben_verif" => Self::BeneficiaryVerified,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LedgerInitialized => "ledger_initialized",
            Self::DonationReceived => "donation_received",
            Self::FundsDistributed => "funds_distributed",
            Self::GoalUpdated => "goal_updated",
            Self::BeneficiaryAdded => "beneficiary_added",
            Self::BeneficiaryVerified => "beneficiary_verified",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn from_stored(s: &str) -> Self {
        match s {
            "ledger_initialized" => Self::LedgerInitialized,
            "donation_received" => Self::DonationReceived,
            "funds_distributed" => Self::FundsDistributed,
            "goal_updated" => Self::GoalUpdated,
            "beneficiary_added" => Self::BeneficiaryAdded,
            "beneficiary_verified" => Self::BeneficiaryVerified,
            _ => Self::Unknown,
        }
    }
}

/// A fully decoded CharityTrust event, ready to be stored in the database.
///
/// `actor` is the donor for donations and the owner for administrative
/// events; `beneficiary` is set for registry and payout events. Amounts are
/// kept as decimal strings because the contract uses `i128`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEvent {
    pub event_id: String,
    pub event_type: String,
    pub actor: Option<String>,
    pub beneficiary: Option<String>,
    pub amount: Option<String>,
    pub note: Option<String>,
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
    pub beneficiary: Option<String>,
    pub amount: Option<String>,
    pub note: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

/// Ledger totals reconstructed from indexed events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSummary {
    pub total_donated: String,
    pub total_distributed: String,
    pub available: String,
    /// Most recent goal seen (from `init` or `goal_set`).
    pub goal: Option<String>,
    pub donation_count: usize,
    pub distribution_count: usize,
    pub beneficiary_count: usize,
}

impl LedgerSummary {
    /// Fold events, in acceptance order, into running totals.
    pub fn from_events(events: &[EventRecord]) -> Self {
        let mut donated: i128 = 0;
        let mut distributed: i128 = 0;
        let mut goal = None;
        let mut summary = LedgerSummary::default();

        for ev in events {
            let amount = ev.amount.as_deref().and_then(|raw| match raw.parse::<i128>() {
                Ok(n) => Some(n),
                Err(_) => {
                    warn!("Skipping unparsable amount {raw:?} in event {}", ev.event_id);
                    None
                }
            });

            match EventKind::from_stored(&ev.event_type) {
                EventKind::DonationReceived => {
                    donated = donated.saturating_add(amount.unwrap_or(0));
                    summary.donation_count += 1;
                }
                EventKind::FundsDistributed => {
                    distributed = distributed.saturating_add(amount.unwrap_or(0));
                    summary.distribution_count += 1;
                }
                EventKind::LedgerInitialized | EventKind::GoalUpdated => {
                    if let Some(a) = amount {
                        goal = Some(a);
                    }
                }
                EventKind::BeneficiaryAdded => summary.beneficiary_count += 1,
                EventKind::BeneficiaryVerified | EventKind::Unknown => {}
            }
        }

        summary.total_donated = donated.to_string();
        summary.total_distributed = distributed.to_string();
        summary.available = (donated - distributed).to_string();
        summary.goal = goal.map(|g| g.to_string());
        summary
    }
}
