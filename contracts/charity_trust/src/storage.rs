//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by CharityTrust.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key                 | Type           | Description                          |
//! |---------------------|----------------|--------------------------------------|
//! | `Config`            | `LedgerConfig` | Owner and custody token              |
//! | `State`             | `LedgerState`  | Goal and running totals              |
//! | `DistributionLock`  | `bool`         | Set while a payout transfer runs     |
//! | `DonationCount`     | `u32`          | Length of the donation log           |
//! | `DistributionCount` | `u32`          | Length of the distribution log       |
//! | `BeneficiaryCount`  | `u32`          | Number of registered beneficiaries   |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                   | Type           | Description                         |
//! |-----------------------|----------------|-------------------------------------|
//! | `Beneficiary(addr)`   | `Beneficiary`  | Registry entry keyed by address     |
//! | `BeneficiaryAt(i)`    | `Address`      | Registration-order index            |
//! | `Donation(i)`         | `Donation`     | i-th accepted donation              |
//! | `Distribution(i)`     | `Distribution` | i-th applied distribution           |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! The two logs are append-only: an entry is written exactly once, at the
//! index equal to the count before the append, and the count is bumped in the
//! same invocation.

use core::fmt::Debug;

use soroban_sdk::{contracttype, Address, Env, IntoVal, TryFromVal, Val, Vec};

use crate::types::{Beneficiary, Distribution, Donation, LedgerConfig, LedgerState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

/// Upper bound on entries returned by one paginated log query.
pub const MAX_PAGE_SIZE: u32 = 50;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Immutable owner/token configuration (Instance).
    Config,
    /// Goal and totals (Instance).
    State,
    /// Re-entrancy flag for `distribute` (Instance).
    DistributionLock,
    /// Number of donation log entries (Instance).
    DonationCount,
    /// Number of distribution log entries (Instance).
    DistributionCount,
    /// Number of registered beneficiaries (Instance).
    BeneficiaryCount,
    /// Registry entry keyed by wallet (Persistent).
    Beneficiary(Address),
    /// Registration-order index into the registry (Persistent).
    BeneficiaryAt(u32),
    /// Donation log entry (Persistent).
    Donation(u32),
    /// Distribution log entry (Persistent).
    Distribution(u32),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn get_counter(env: &Env, key: &DataKey) -> u32 {
    env.storage().instance().get(key).unwrap_or(0)
}

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

/// Write config and initial state in one go. Only called by `init`.
pub fn save_initial(env: &Env, config: &LedgerConfig, state: &LedgerState) {
    env.storage().instance().set(&DataKey::Config, config);
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn load_config(env: &Env) -> Result<LedgerConfig, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .ok_or(Error::NotInitialized)
}

pub fn load_state(env: &Env) -> Result<LedgerState, Error> {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .ok_or(Error::NotInitialized)
}

pub fn save_state(env: &Env, state: &LedgerState) {
    env.storage().instance().set(&DataKey::State, state);
    bump_instance(env);
}

pub fn is_distribution_locked(env: &Env) -> bool {
    env.storage()
        .instance()
        .get(&DataKey::DistributionLock)
        .unwrap_or(false)
}

pub fn set_distribution_lock(env: &Env, locked: bool) {
    if locked {
        env.storage()
            .instance()
            .set(&DataKey::DistributionLock, &true);
    } else {
        env.storage().instance().remove(&DataKey::DistributionLock);
    }
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

fn load_persistent<T>(env: &Env, key: &DataKey) -> Option<T>
where
    T: TryFromVal<Env, Val>,
    T::Error: Debug,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        bump_persistent(env, key);
    }
    value
}

// ── Beneficiary Registry ─────────────────────────────────────────────

pub fn has_beneficiary(env: &Env, address: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Beneficiary(address.clone()))
}

pub fn load_beneficiary(env: &Env, address: &Address) -> Result<Beneficiary, Error> {
    load_persistent(env, &DataKey::Beneficiary(address.clone()))
        .ok_or(Error::UnknownBeneficiary)
}

/// Overwrite an existing registry entry.
pub fn save_beneficiary(env: &Env, beneficiary: &Beneficiary) {
    let key = DataKey::Beneficiary(beneficiary.address.clone());
    env.storage().persistent().set(&key, beneficiary);
    bump_persistent(env, &key);
}

/// Insert a new registry entry and append it to the registration index.
pub fn insert_beneficiary(env: &Env, beneficiary: &Beneficiary) {
    save_beneficiary(env, beneficiary);

    let index = get_counter(env, &DataKey::BeneficiaryCount);
    let index_key = DataKey::BeneficiaryAt(index);
    env.storage()
        .persistent()
        .set(&index_key, &beneficiary.address);
    bump_persistent(env, &index_key);
    env.storage()
        .instance()
        .set(&DataKey::BeneficiaryCount, &(index + 1));
    bump_instance(env);
}

/// All beneficiaries in registration order.
pub fn load_all_beneficiaries(env: &Env) -> Vec<Beneficiary> {
    let count = get_counter(env, &DataKey::BeneficiaryCount);
    let mut out = Vec::new(env);
    for i in 0..count {
        let address: Option<Address> = load_persistent(env, &DataKey::BeneficiaryAt(i));
        if let Some(address) = address {
            if let Ok(beneficiary) = load_beneficiary(env, &address) {
                out.push_back(beneficiary);
            }
        }
    }
    out
}

// ── Audit Log ────────────────────────────────────────────────────────

fn append<V>(
    env: &Env,
    count_key: DataKey,
    entry_key: impl Fn(u32) -> DataKey,
    value: &V,
) -> u32
where
    V: IntoVal<Env, Val>,
{
    let index = get_counter(env, &count_key);
    let key = entry_key(index);
    env.storage().persistent().set(&key, value);
    bump_persistent(env, &key);
    env.storage().instance().set(&count_key, &(index + 1));
    bump_instance(env);
    index
}

/// Append a donation to the log and return its sequence number.
pub fn append_donation(env: &Env, donation: &Donation) -> u32 {
    append(env, DataKey::DonationCount, DataKey::Donation, donation)
}

/// Append a distribution to the log and return its sequence number.
pub fn append_distribution(env: &Env, distribution: &Distribution) -> u32 {
    append(
        env,
        DataKey::DistributionCount,
        DataKey::Distribution,
        distribution,
    )
}

pub fn donation_count(env: &Env) -> u32 {
    get_counter(env, &DataKey::DonationCount)
}

pub fn distribution_count(env: &Env) -> u32 {
    get_counter(env, &DataKey::DistributionCount)
}

/// Read `[start, start + limit)` of a log, clipped to its length.
fn load_range<T>(
    env: &Env,
    count: u32,
    entry_key: impl Fn(u32) -> DataKey,
    start: u32,
    limit: u32,
) -> Vec<T>
where
    T: TryFromVal<Env, Val> + IntoVal<Env, Val>,
    T::Error: Debug,
{
    let end = start.saturating_add(limit).min(count);
    let mut out = Vec::new(env);
    for i in start..end {
        if let Some(entry) = load_persistent::<T>(env, &entry_key(i)) {
            out.push_back(entry);
        }
    }
    out
}

pub fn load_donations(env: &Env, start: u32, limit: u32) -> Vec<Donation> {
    load_range(env, donation_count(env), DataKey::Donation, start, limit)
}

pub fn load_distributions(env: &Env, start: u32, limit: u32) -> Vec<Distribution> {
    load_range(env, distribution_count(env), DataKey::Distribution, start, limit)
}
