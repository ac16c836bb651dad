//! # Events
//!
//! Every successful state change publishes exactly one event. Topics are
//! `(symbol, subject)` where the subject is the address the event is about;
//! the data is one of the structs below.
//!
//! | Topic       | Subject     | Data                   |
//! |-------------|-------------|------------------------|
//! | `init`      | owner       | [`LedgerInitialized`]  |
//! | `goal_set`  | owner       | [`GoalUpdated`]        |
//! | `ben_added` | beneficiary | [`BeneficiaryAdded`]   |
//! | `ben_verif` | beneficiary | [`BeneficiaryVerified`]|
//! | `donation`  | donor       | [`DonationReceived`]   |
//! | `distrib`   | beneficiary | [`FundsDistributed`]   |
//!
//! The off-chain indexer keys on the leading symbol, so these names are part
//! of the public interface.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerInitialized {
    pub owner: Address,
    pub token: Address,
    pub goal: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GoalUpdated {
    pub old_goal: i128,
    pub new_goal: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BeneficiaryAdded {
    pub beneficiary: Address,
    pub name: String,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BeneficiaryVerified {
    pub beneficiary: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DonationReceived {
    pub donor: Address,
    pub amount: i128,
    pub message: String,
    pub timestamp: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsDistributed {
    pub beneficiary: Address,
    pub amount: i128,
    pub timestamp: u64,
}

pub fn publish_initialized(env: &Env, owner: &Address, token: &Address, goal: i128) {
    env.events().publish(
        (symbol_short!("init"), owner.clone()),
        LedgerInitialized {
            owner: owner.clone(),
            token: token.clone(),
            goal,
        },
    );
}

pub fn publish_goal_updated(env: &Env, owner: &Address, old_goal: i128, new_goal: i128) {
    env.events().publish(
        (symbol_short!("goal_set"), owner.clone()),
        GoalUpdated { old_goal, new_goal },
    );
}

pub fn publish_beneficiary_added(env: &Env, beneficiary: &Address, name: &String) {
    env.events().publish(
        (symbol_short!("ben_added"), beneficiary.clone()),
        BeneficiaryAdded {
            beneficiary: beneficiary.clone(),
            name: name.clone(),
        },
    );
}

pub fn publish_beneficiary_verified(env: &Env, beneficiary: &Address) {
    env.events().publish(
        (symbol_short!("ben_verif"), beneficiary.clone()),
        BeneficiaryVerified {
            beneficiary: beneficiary.clone(),
        },
    );
}

pub fn publish_donation_received(
    env: &Env,
    donor: &Address,
    amount: i128,
    message: &String,
    timestamp: u64,
) {
    env.events().publish(
        (symbol_short!("donation"), donor.clone()),
        DonationReceived {
            donor: donor.clone(),
            amount,
            message: message.clone(),
            timestamp,
        },
    );
}

pub fn publish_funds_distributed(env: &Env, beneficiary: &Address, amount: i128, timestamp: u64) {
    env.events().publish(
        (symbol_short!("distrib"), beneficiary.clone()),
        FundsDistributed {
            beneficiary: beneficiary.clone(),
            amount,
            timestamp,
        },
    );
}
