//! # Types
//!
//! Shared data structures used across all modules of the CharityTrust contract.
//!
//! ## Config / State split
//!
//! The ledger singleton is stored as two instance entries:
//!
//! - [`LedgerConfig`]: written once by `init`; never mutated.
//! - [`LedgerState`]: written on every donation, goal change and distribution.
//!
//! Keeping the owner and token out of the hot entry means the frequent writes
//! only touch three integers.
//!
//! ## Audit records
//!
//! [`Donation`] and [`Distribution`] are append-only: each is written once under
//! its sequence number and never rewritten.

use soroban_sdk::{contracttype, Address, String};

/// Immutable ledger configuration, written once at initialisation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    /// Sole administrator of the ledger.
    pub owner: Address,
    /// Token contract holding the pooled funds.
    pub token: Address,
}

/// Mutable ledger totals.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerState {
    /// Advisory fundraising target; always positive.
    pub goal: i128,
    /// Sum of all accepted donations.
    pub total_donated: i128,
    /// Sum of all applied distributions. Never exceeds `total_donated`.
    pub total_distributed: i128,
}

impl LedgerState {
    /// Funds donated but not yet distributed.
    pub fn available(&self) -> i128 {
        self.total_donated - self.total_distributed
    }
}

/// Snapshot of the ledger returned by mutating entry points and `get_totals`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerTotals {
    pub total_donated: i128,
    pub total_distributed: i128,
    pub available: i128,
    pub goal: i128,
}

impl From<&LedgerState> for LedgerTotals {
    fn from(state: &LedgerState) -> Self {
        LedgerTotals {
            total_donated: state.total_donated,
            total_distributed: state.total_distributed,
            available: state.available(),
            goal: state.goal,
        }
    }
}

/// A registered recipient of distributed funds.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Beneficiary {
    /// Wallet address; unique registry key.
    pub address: Address,
    /// Display name; never empty.
    pub name: String,
    /// Set once by the owner; required before any distribution.
    pub verified: bool,
    /// Sum of all distributions received.
    pub total_received: i128,
}

/// An accepted donation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Donation {
    pub donor: Address,
    pub amount: i128,
    /// Free-form note attached by the donor; may be empty.
    pub message: String,
    /// Ledger close time at acceptance.
    pub timestamp: u64,
}

/// An applied distribution.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Distribution {
    pub beneficiary: Address,
    pub amount: i128,
    /// Ledger close time at application.
    pub timestamp: u64,
}
