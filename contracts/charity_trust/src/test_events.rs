extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events, Ledger as _},
    token, vec, Address, Env, IntoVal, String, TryIntoVal,
};

use crate::events::{
    BeneficiaryAdded, BeneficiaryVerified, DonationReceived, FundsDistributed, GoalUpdated,
    LedgerInitialized,
};
use crate::{CharityTrust, CharityTrustClient};

const GOAL: i128 = 10_000_000;
const NOW: u64 = 1_700_000_000;

fn setup() -> (Env, CharityTrustClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().set_timestamp(NOW);
    let contract_id = env.register(CharityTrust, ());
    let client = CharityTrustClient::new(&env, &contract_id);
    (env, client)
}

fn create_token<'a>(env: &Env, admin: &Address) -> token::Client<'a> {
    let addr = env.register_stellar_asset_contract_v2(admin.clone());
    token::Client::new(env, &addr.address())
}

fn setup_with_init() -> (
    Env,
    CharityTrustClient<'static>,
    Address,
    token::Client<'static>,
) {
    let (env, client) = setup();
    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);
    client.init(&owner, &token.address, &GOAL);
    (env, client, owner, token)
}

#[test]
fn test_initialized_event() {
    let (env, client) = setup();
    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token = create_token(&env, &token_admin);

    client.init(&owner, &token.address, &GOAL);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("init").into_val(&env),
        owner.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: LedgerInitialized = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        LedgerInitialized {
            owner: owner.clone(),
            token: token.address.clone(),
            goal: GOAL,
        }
    );
}

#[test]
fn test_donation_received_event() {
    let (env, client, _owner, token) = setup_with_init();
    let donor = Address::generate(&env);
    let amount = GOAL / 2;
    let message = String::from_str(&env, "Test donation");

    token::StellarAssetClient::new(&env, &token.address).mint(&donor, &amount);
    client.donate(&donor, &amount, &message);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("donation").into_val(&env),
        donor.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: DonationReceived = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        DonationReceived {
            donor: donor.clone(),
            amount,
            message,
            timestamp: NOW,
        }
    );
}

#[test]
fn test_goal_updated_event() {
    let (env, client, owner, _token) = setup_with_init();

    client.update_goal(&owner, &(3 * GOAL));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("goal_set").into_val(&env),
        owner.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: GoalUpdated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        GoalUpdated {
            old_goal: GOAL,
            new_goal: 3 * GOAL,
        }
    );
}

#[test]
fn test_beneficiary_added_event() {
    let (env, client, owner, _token) = setup_with_init();
    let beneficiary = Address::generate(&env);
    let name = String::from_str(&env, "Water Project");

    client.add_beneficiary(&owner, &beneficiary, &name);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("ben_added").into_val(&env),
        beneficiary.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: BeneficiaryAdded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        BeneficiaryAdded {
            beneficiary: beneficiary.clone(),
            name,
        }
    );
}

#[test]
fn test_beneficiary_verified_event() {
    let (env, client, owner, _token) = setup_with_init();
    let beneficiary = Address::generate(&env);
    client.add_beneficiary(&owner, &beneficiary, &String::from_str(&env, "Clinic"));

    client.verify_beneficiary(&owner, &beneficiary);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    let expected_topics = vec![
        &env,
        symbol_short!("ben_verif").into_val(&env),
        beneficiary.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: BeneficiaryVerified = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        BeneficiaryVerified {
            beneficiary: beneficiary.clone(),
        }
    );
}

#[test]
fn test_funds_distributed_event() {
    let (env, client, owner, token) = setup_with_init();
    let donor = Address::generate(&env);
    let beneficiary = Address::generate(&env);

    token::StellarAssetClient::new(&env, &token.address).mint(&donor, &GOAL);
    client.donate(&donor, &GOAL, &String::from_str(&env, ""));
    client.add_beneficiary(&owner, &beneficiary, &String::from_str(&env, "Shelter"));
    client.verify_beneficiary(&owner, &beneficiary);

    env.ledger().set_timestamp(NOW + 60);
    client.distribute(&owner, &beneficiary, &(GOAL / 10));

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // The payout event follows the token transfer it accounts for.
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("distrib").into_val(&env),
        beneficiary.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsDistributed = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        FundsDistributed {
            beneficiary: beneficiary.clone(),
            amount: GOAL / 10,
            timestamp: NOW + 60,
        }
    );
}
