//! # CharityTrust Contract
//!
//! A publicly auditable donation ledger. Anyone may donate into a pooled
//! balance; a single owner registers and verifies beneficiaries and
//! distributes the pool to them. Every accepted donation and applied
//! distribution is appended to an on-chain log and published as an event.
//!
//! | Phase         | Entry Point(s)                                         |
//! |---------------|--------------------------------------------------------|
//! | Bootstrap     | [`CharityTrust::init`]                                 |
//! | Funding       | [`CharityTrust::donate`], [`CharityTrust::update_goal`]|
//! | Registry      | `add_beneficiary`, `verify_beneficiary`                |
//! | Payout        | [`CharityTrust::distribute`]                           |
//! | Queries       | `get_progress`, `get_totals`, `get_beneficiary`, `get_donations`, `get_distributions`, ... |
//!
//! ## Architecture
//!
//! Authorization lives in [`access`], storage layout in [`storage`], event
//! shapes in [`events`]. This file holds the entry points and the ordering
//! of checks and effects.
//!
//! ## Ledger invariants
//!
//! - `total_distributed <= total_donated` in every reachable state.
//! - `goal > 0` in every reachable state.
//! - A distribution only ever targets a verified beneficiary.
//! - Every entry point validates completely before its first write; a
//!   returned error rolls back the invocation.
//!
//! ## Deployment
//!
//! Ownership is claimed by the first `init` call, not fixed at deploy time.
//! Between a bare deploy and `init` anyone can claim the contract, so the two
//! must be submitted together.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, token, Address, Env, String, Vec};

pub mod access;
pub mod events;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_audit_log;
#[cfg(test)]
mod test_events;

pub use storage::MAX_PAGE_SIZE;
pub use types::{Beneficiary, Distribution, Donation, LedgerConfig, LedgerState, LedgerTotals};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    NotInitialized         = 1,
    AlreadyInitialized     = 2,
    Unauthorized           = 3,
    InvalidGoal            = 4,
    ZeroAmount             = 5,
    InvalidName            = 6,
    DuplicateBeneficiary   = 7,
    UnknownBeneficiary     = 8,
    UnverifiedBeneficiary  = 9,
    InsufficientFunds      = 10,
    DistributionInProgress = 11,
    Overflow               = 12,
}

#[contract]
pub struct CharityTrust;

#[contractimpl]
impl CharityTrust {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Initialise the ledger.
    ///
    /// Must be called exactly once after deployment. `owner` signs and
    /// becomes the immutable administrator; `token` is the asset donations
    /// are made in and distributions are paid out of.
    ///
    /// Whoever calls `init` first becomes the owner. Deploy and initialise in
    /// the same transaction, or check [`CharityTrust::owner`] before funding
    /// the contract.
    pub fn init(env: Env, owner: Address, token: Address, initial_goal: i128) -> Result<(), Error> {
        owner.require_auth();

        if storage::is_initialized(&env) {
            return Err(Error::AlreadyInitialized);
        }
        if initial_goal <= 0 {
            return Err(Error::InvalidGoal);
        }

        let config = LedgerConfig {
            owner: owner.clone(),
            token: token.clone(),
        };
        let state = LedgerState {
            goal: initial_goal,
            total_donated: 0,
            total_distributed: 0,
        };
        storage::save_initial(&env, &config, &state);

        events::publish_initialized(&env, &owner, &token, initial_goal);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────
    // Donation ledger
    // ─────────────────────────────────────────────────────────

    /// Accept a donation of `amount` from `donor`.
    ///
    /// Open to any address. The tokens are pulled from the donor into the
    /// contract's custody before the totals are updated.
    pub fn donate(
        env: Env,
        donor: Address,
        amount: i128,
        message: String,
    ) -> Result<LedgerTotals, Error> {
        donor.require_auth();

        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }
        let total_donated = state
            .total_donated
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&donor, &env.current_contract_address(), &amount);

        state.total_donated = total_donated;
        storage::save_state(&env, &state);

        let timestamp = env.ledger().timestamp();
        storage::append_donation(
            &env,
            &Donation {
                donor: donor.clone(),
                amount,
                message: message.clone(),
                timestamp,
            },
        );

        events::publish_donation_received(&env, &donor, amount, &message, timestamp);
        Ok(LedgerTotals::from(&state))
    }

    /// Replace the fundraising goal.
    ///
    /// The goal is advisory: it may be set below the amount already donated
    /// and never caps further donations.
    pub fn update_goal(env: Env, caller: Address, new_goal: i128) -> Result<i128, Error> {
        access::require_owner(&env, &caller)?;

        if new_goal <= 0 {
            return Err(Error::InvalidGoal);
        }

        let mut state = storage::load_state(&env)?;
        let old_goal = state.goal;
        state.goal = new_goal;
        storage::save_state(&env, &state);

        events::publish_goal_updated(&env, &caller, old_goal, new_goal);
        Ok(new_goal)
    }

    /// Return `(total_donated, goal)`.
    pub fn get_progress(env: Env) -> Result<(i128, i128), Error> {
        let state = storage::load_state(&env)?;
        Ok((state.total_donated, state.goal))
    }

    pub fn get_totals(env: Env) -> Result<LedgerTotals, Error> {
        let state = storage::load_state(&env)?;
        Ok(LedgerTotals::from(&state))
    }

    pub fn fundraising_goal(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.goal)
    }

    pub fn total_donated(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.total_donated)
    }

    pub fn total_distributed(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.total_distributed)
    }

    /// Funds donated but not yet distributed.
    pub fn available_balance(env: Env) -> Result<i128, Error> {
        Ok(storage::load_state(&env)?.available())
    }

    pub fn owner(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.owner)
    }

    pub fn custody_token(env: Env) -> Result<Address, Error> {
        Ok(storage::load_config(&env)?.token)
    }

    pub fn is_owner(env: Env, address: Address) -> bool {
        access::is_owner(&env, &address)
    }

    // ─────────────────────────────────────────────────────────
    // Beneficiary registry
    // ─────────────────────────────────────────────────────────

    /// Register `address` as an unverified beneficiary called `name`.
    pub fn add_beneficiary(
        env: Env,
        caller: Address,
        address: Address,
        name: String,
    ) -> Result<Beneficiary, Error> {
        access::require_owner(&env, &caller)?;

        if name.is_empty() {
            return Err(Error::InvalidName);
        }
        if storage::has_beneficiary(&env, &address) {
            return Err(Error::DuplicateBeneficiary);
        }

        let beneficiary = Beneficiary {
            address: address.clone(),
            name: name.clone(),
            verified: false,
            total_received: 0,
        };
        storage::insert_beneficiary(&env, &beneficiary);

        events::publish_beneficiary_added(&env, &address, &name);
        Ok(beneficiary)
    }

    /// Mark `address` as verified.
    ///
    /// Re-verifying an already verified beneficiary is a no-op: it succeeds,
    /// writes nothing and publishes nothing.
    pub fn verify_beneficiary(
        env: Env,
        caller: Address,
        address: Address,
    ) -> Result<Beneficiary, Error> {
        access::require_owner(&env, &caller)?;

        let mut beneficiary = storage::load_beneficiary(&env, &address)?;
        if beneficiary.verified {
            return Ok(beneficiary);
        }

        beneficiary.verified = true;
        storage::save_beneficiary(&env, &beneficiary);

        events::publish_beneficiary_verified(&env, &address);
        Ok(beneficiary)
    }

    pub fn get_beneficiary(env: Env, address: Address) -> Result<Beneficiary, Error> {
        storage::load_beneficiary(&env, &address)
    }

    pub fn is_registered(env: Env, address: Address) -> bool {
        storage::has_beneficiary(&env, &address)
    }

    /// All beneficiaries in registration order.
    pub fn list_beneficiaries(env: Env) -> Vec<Beneficiary> {
        storage::load_all_beneficiaries(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Distribution engine
    // ─────────────────────────────────────────────────────────

    /// Pay `amount` out of the pool to a verified beneficiary.
    ///
    /// All checks run before the first write. The totals, the beneficiary's
    /// `total_received` and the log entry are committed before the token
    /// transfer is invoked, and the distribution lock is held across the
    /// transfer so a nested `distribute` is rejected.
    pub fn distribute(
        env: Env,
        caller: Address,
        beneficiary: Address,
        amount: i128,
    ) -> Result<LedgerTotals, Error> {
        access::require_owner(&env, &caller)?;

        if storage::is_distribution_locked(&env) {
            return Err(Error::DistributionInProgress);
        }
        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }

        let mut recipient = storage::load_beneficiary(&env, &beneficiary)?;
        if !recipient.verified {
            return Err(Error::UnverifiedBeneficiary);
        }

        let config = storage::load_config(&env)?;
        let mut state = storage::load_state(&env)?;
        if amount > state.available() {
            return Err(Error::InsufficientFunds);
        }
        let total_distributed = state
            .total_distributed
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let total_received = recipient
            .total_received
            .checked_add(amount)
            .ok_or(Error::Overflow)?;

        // Effects.
        state.total_distributed = total_distributed;
        storage::save_state(&env, &state);
        recipient.total_received = total_received;
        storage::save_beneficiary(&env, &recipient);

        let timestamp = env.ledger().timestamp();
        storage::append_distribution(
            &env,
            &Distribution {
                beneficiary: beneficiary.clone(),
                amount,
                timestamp,
            },
        );

        // Interaction.
        storage::set_distribution_lock(&env, true);
        let token_client = token::Client::new(&env, &config.token);
        token_client.transfer(&env.current_contract_address(), &beneficiary, &amount);
        storage::set_distribution_lock(&env, false);

        events::publish_funds_distributed(&env, &beneficiary, amount, timestamp);
        Ok(LedgerTotals::from(&state))
    }

    // ─────────────────────────────────────────────────────────
    // Audit log
    // ─────────────────────────────────────────────────────────

    pub fn donation_count(env: Env) -> u32 {
        storage::donation_count(&env)
    }

    pub fn distribution_count(env: Env) -> u32 {
        storage::distribution_count(&env)
    }

    /// Every donation in acceptance order.
    ///
    /// Reads one ledger entry per donation, so a long log eventually exceeds
    /// the per-transaction read limit. Use [`CharityTrust::get_donations_page`]
    /// or the off-chain indexer for long histories.
    pub fn get_donations(env: Env) -> Vec<Donation> {
        let count = storage::donation_count(&env);
        storage::load_donations(&env, 0, count)
    }

    /// Every distribution in application order.
    ///
    /// Unbounded like [`CharityTrust::get_donations`]; prefer
    /// [`CharityTrust::get_distributions_page`] for long histories.
    pub fn get_distributions(env: Env) -> Vec<Distribution> {
        let count = storage::distribution_count(&env);
        storage::load_distributions(&env, 0, count)
    }

    /// Up to `limit` donations starting at sequence number `start`.
    /// `limit` is capped at [`MAX_PAGE_SIZE`].
    pub fn get_donations_page(env: Env, start: u32, limit: u32) -> Vec<Donation> {
        storage::load_donations(&env, start, limit.min(MAX_PAGE_SIZE))
    }

    /// Up to `limit` distributions starting at sequence number `start`.
    /// `limit` is capped at [`MAX_PAGE_SIZE`].
    pub fn get_distributions_page(env: Env, start: u32, limit: u32) -> Vec<Distribution> {
        storage::load_distributions(&env, start, limit.min(MAX_PAGE_SIZE))
    }
}
