//! # Access control
//!
//! CharityTrust has a single administrative identity: the `owner` recorded by
//! `init`. It is immutable for the lifetime of the contract. Goal updates,
//! beneficiary registration and verification, and distributions are gated
//! through [`require_owner`]; donations and reads are open to anyone.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::Error;

/// Returns `true` if `caller` is the ledger owner.
///
/// Pure read; an uninitialised contract has no owner.
pub fn is_owner(env: &Env, caller: &Address) -> bool {
    storage::load_config(env)
        .map(|config| config.owner == *caller)
        .unwrap_or(false)
}

/// Authenticate `caller` and check that it holds the owner capability.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    caller.require_auth();
    let config = storage::load_config(env)?;
    if config.owner != *caller {
        return Err(Error::Unauthorized);
    }
    Ok(())
}
