#![allow(dead_code)]

extern crate std;

use soroban_sdk::{token, Address, Vec};

use crate::{Beneficiary, CharityTrustClient, Distribution, Donation, LedgerTotals};

/// INV-1: The pool is never over-distributed.
pub fn assert_distributed_within_donated(totals: &LedgerTotals) {
    assert!(
        totals.total_distributed <= totals.total_donated,
        "INV-1 violated: distributed {} exceeds donated {}",
        totals.total_distributed,
        totals.total_donated
    );
}

/// INV-2: The fundraising goal is always positive.
pub fn assert_goal_positive(totals: &LedgerTotals) {
    assert!(
        totals.goal > 0,
        "INV-2 violated: non-positive goal ({})",
        totals.goal
    );
}

/// INV-3: `available` is exactly donated minus distributed.
pub fn assert_available_consistent(totals: &LedgerTotals) {
    assert_eq!(
        totals.available,
        totals.total_donated - totals.total_distributed,
        "INV-3 violated: available balance out of sync with totals"
    );
    assert!(totals.available >= 0, "INV-3 violated: negative available balance");
}

/// INV-4: Totals never decrease between two observations.
pub fn assert_totals_monotonic(before: &LedgerTotals, after: &LedgerTotals) {
    assert!(
        after.total_donated >= before.total_donated,
        "INV-4 violated: total_donated decreased from {} to {}",
        before.total_donated,
        after.total_donated
    );
    assert!(
        after.total_distributed >= before.total_distributed,
        "INV-4 violated: total_distributed decreased from {} to {}",
        before.total_distributed,
        after.total_distributed
    );
}

/// INV-5: The running totals equal the sums over the audit log.
pub fn assert_totals_match_log(
    totals: &LedgerTotals,
    donations: &Vec<Donation>,
    distributions: &Vec<Distribution>,
) {
    let donated: i128 = donations.iter().map(|d| d.amount).sum();
    let distributed: i128 = distributions.iter().map(|d| d.amount).sum();
    assert_eq!(
        totals.total_donated, donated,
        "INV-5 violated: total_donated {} != logged donations {}",
        totals.total_donated, donated
    );
    assert_eq!(
        totals.total_distributed, distributed,
        "INV-5 violated: total_distributed {} != logged distributions {}",
        totals.total_distributed, distributed
    );
}

/// INV-6: Each beneficiary's `total_received` equals the distributions logged
/// for it, and unverified beneficiaries have received nothing.
pub fn assert_received_matches_log(
    beneficiaries: &Vec<Beneficiary>,
    distributions: &Vec<Distribution>,
) {
    for beneficiary in beneficiaries.iter() {
        let logged: i128 = distributions
            .iter()
            .filter(|d| d.beneficiary == beneficiary.address)
            .map(|d| d.amount)
            .sum();
        assert_eq!(
            beneficiary.total_received, logged,
            "INV-6 violated: beneficiary received {} but log shows {}",
            beneficiary.total_received, logged
        );
        if !beneficiary.verified {
            assert_eq!(
                beneficiary.total_received, 0,
                "INV-6 violated: unverified beneficiary received funds"
            );
        }
    }
}

/// INV-7: Tokens held in custody cover the available balance exactly.
pub fn assert_custody_matches_available(custody_balance: i128, totals: &LedgerTotals) {
    assert_eq!(
        custody_balance, totals.available,
        "INV-7 violated: custody holds {} but available is {}",
        custody_balance, totals.available
    );
}

/// Run every ledger invariant against the live contract.
pub fn assert_all_ledger_invariants(client: &CharityTrustClient, token: &token::Client) {
    let totals = client.get_totals();
    let donations = client.get_donations();
    let distributions = client.get_distributions();
    let beneficiaries = client.list_beneficiaries();
    let custody: Address = client.address.clone();

    assert_distributed_within_donated(&totals);
    assert_goal_positive(&totals);
    assert_available_consistent(&totals);
    assert_totals_match_log(&totals, &donations, &distributions);
    assert_received_matches_log(&beneficiaries, &distributions);
    assert_custody_matches_available(token.balance(&custody), &totals);
}
