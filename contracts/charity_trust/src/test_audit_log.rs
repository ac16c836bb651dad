extern crate std;

use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    token, Address, Env, String,
};

use crate::{CharityTrust, CharityTrustClient, Error, MAX_PAGE_SIZE};

const GOAL: i128 = 100_000;

fn setup_with_init() -> (
    Env,
    CharityTrustClient<'static>,
    Address,
    token::Client<'static>,
) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(CharityTrust, ());
    let client = CharityTrustClient::new(&env, &contract_id);

    let owner = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let addr = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token = token::Client::new(&env, &addr.address());

    client.init(&owner, &token.address, &GOAL);
    (env, client, owner, token)
}

fn donate(
    env: &Env,
    client: &CharityTrustClient,
    token: &token::Client,
    donor: &Address,
    amount: i128,
    message: &str,
) {
    token::StellarAssetClient::new(env, &token.address).mint(donor, &amount);
    client.donate(donor, &amount, &String::from_str(env, message));
}

#[test]
fn test_logs_start_empty() {
    let (_env, client, _owner, _token) = setup_with_init();

    assert_eq!(client.donation_count(), 0);
    assert_eq!(client.distribution_count(), 0);
    assert_eq!(client.get_donations().len(), 0);
    assert_eq!(client.get_distributions().len(), 0);
}

#[test]
fn test_donations_logged_in_acceptance_order() {
    let (env, client, _owner, token) = setup_with_init();
    let donor1 = Address::generate(&env);
    let donor2 = Address::generate(&env);

    env.ledger().set_timestamp(1_000);
    donate(&env, &client, &token, &donor1, 500, "first");
    env.ledger().set_timestamp(2_000);
    donate(&env, &client, &token, &donor2, 300, "");
    env.ledger().set_timestamp(3_000);
    donate(&env, &client, &token, &donor1, 200, "again");

    assert_eq!(client.donation_count(), 3);
    let donations = client.get_donations();
    assert_eq!(donations.len(), 3);

    let d0 = donations.get(0).unwrap();
    assert_eq!(d0.donor, donor1);
    assert_eq!(d0.amount, 500);
    assert_eq!(d0.message, String::from_str(&env, "first"));
    assert_eq!(d0.timestamp, 1_000);

    let d1 = donations.get(1).unwrap();
    assert_eq!(d1.donor, donor2);
    assert_eq!(d1.amount, 300);
    assert_eq!(d1.message, String::from_str(&env, ""));
    assert_eq!(d1.timestamp, 2_000);

    let d2 = donations.get(2).unwrap();
    assert_eq!(d2.donor, donor1);
    assert_eq!(d2.amount, 200);
    assert_eq!(d2.timestamp, 3_000);
}

#[test]
fn test_distributions_logged_in_application_order() {
    let (env, client, owner, token) = setup_with_init();
    let donor = Address::generate(&env);
    let x = Address::generate(&env);
    let y = Address::generate(&env);

    donate(&env, &client, &token, &donor, 1_000, "");
    client.add_beneficiary(&owner, &x, &String::from_str(&env, "X"));
    client.add_beneficiary(&owner, &y, &String::from_str(&env, "Y"));
    client.verify_beneficiary(&owner, &x);
    client.verify_beneficiary(&owner, &y);

    env.ledger().set_timestamp(5_000);
    client.distribute(&owner, &y, &400);
    env.ledger().set_timestamp(6_000);
    client.distribute(&owner, &x, &100);

    let distributions = client.get_distributions();
    assert_eq!(client.distribution_count(), 2);
    assert_eq!(distributions.len(), 2);

    let first = distributions.get(0).unwrap();
    assert_eq!(first.beneficiary, y);
    assert_eq!(first.amount, 400);
    assert_eq!(first.timestamp, 5_000);

    let second = distributions.get(1).unwrap();
    assert_eq!(second.beneficiary, x);
    assert_eq!(second.amount, 100);
    assert_eq!(second.timestamp, 6_000);
}

#[test]
fn test_failed_operations_are_not_logged() {
    let (env, client, owner, token) = setup_with_init();
    let donor = Address::generate(&env);
    let x = Address::generate(&env);

    donate(&env, &client, &token, &donor, 100, "");
    client.add_beneficiary(&owner, &x, &String::from_str(&env, "X"));

    assert_eq!(
        client.try_donate(&donor, &0, &String::from_str(&env, "zero")),
        Err(Ok(Error::ZeroAmount))
    );
    assert_eq!(
        client.try_distribute(&owner, &x, &50),
        Err(Ok(Error::UnverifiedBeneficiary))
    );
    client.verify_beneficiary(&owner, &x);
    assert_eq!(
        client.try_distribute(&owner, &x, &500),
        Err(Ok(Error::InsufficientFunds))
    );

    assert_eq!(client.donation_count(), 1);
    assert_eq!(client.distribution_count(), 0);
}

#[test]
fn test_queries_are_repeatable() {
    let (env, client, owner, token) = setup_with_init();
    let donor = Address::generate(&env);
    let x = Address::generate(&env);

    donate(&env, &client, &token, &donor, 700, "a");
    donate(&env, &client, &token, &donor, 300, "b");
    client.add_beneficiary(&owner, &x, &String::from_str(&env, "X"));
    client.verify_beneficiary(&owner, &x);
    client.distribute(&owner, &x, &250);

    assert_eq!(client.get_donations(), client.get_donations());
    assert_eq!(client.get_distributions(), client.get_distributions());
}

#[test]
fn test_donation_pages() {
    let (env, client, _owner, token) = setup_with_init();
    let donor = Address::generate(&env);

    for amount in 1..=5i128 {
        donate(&env, &client, &token, &donor, amount, "");
    }

    let page = client.get_donations_page(&1, &2);
    assert_eq!(page.len(), 2);
    assert_eq!(page.get(0).unwrap().amount, 2);
    assert_eq!(page.get(1).unwrap().amount, 3);

    // Clipped at the end of the log.
    let tail = client.get_donations_page(&4, &10);
    assert_eq!(tail.len(), 1);
    assert_eq!(tail.get(0).unwrap().amount, 5);

    assert_eq!(client.get_donations_page(&5, &10).len(), 0);
    assert_eq!(client.get_donations_page(&u32::MAX, &u32::MAX).len(), 0);
}

#[test]
fn test_page_size_is_capped() {
    let (env, client, _owner, token) = setup_with_init();
    let donor = Address::generate(&env);

    for _ in 0..(MAX_PAGE_SIZE + 5) {
        donate(&env, &client, &token, &donor, 1, "");
    }

    assert_eq!(client.donation_count(), MAX_PAGE_SIZE + 5);
    assert_eq!(client.get_donations_page(&0, &u32::MAX).len(), MAX_PAGE_SIZE);
    assert_eq!(client.get_donations().len(), MAX_PAGE_SIZE + 5);
}

#[test]
fn test_distribution_pages() {
    let (env, client, owner, token) = setup_with_init();
    let donor = Address::generate(&env);
    let x = Address::generate(&env);

    donate(&env, &client, &token, &donor, 1_000, "");
    client.add_beneficiary(&owner, &x, &String::from_str(&env, "X"));
    client.verify_beneficiary(&owner, &x);
    for amount in [10i128, 20, 30] {
        client.distribute(&owner, &x, &amount);
    }

    let page = client.get_distributions_page(&1, &5);
    assert_eq!(page.len(), 2);
    assert_eq!(page.get(0).unwrap().amount, 20);
    assert_eq!(page.get(1).unwrap().amount, 30);
}
