#![allow(dead_code)]

extern crate std;

use soroban_sdk::Address;

use crate::testutils::Setup;
use crate::{Campaign, CampaignStatus};

/// Recorded contributions plus refunds account for every unit received,
/// and the escrow's token balance matches its books.
///
/// `contributors` must list every address that ever contributed.
pub fn assert_conservation(setup: &Setup, contributors: &[Address]) {
    let campaign = setup.escrow.get_campaign();
    let recorded: i128 = contributors
        .iter()
        .map(|c| setup.escrow.contribution_of(c))
        .sum();

    assert_eq!(
        campaign.pool_balance,
        setup.escrow_token_balance(),
        "pool balance {} differs from token balance {}",
        campaign.pool_balance,
        setup.escrow_token_balance()
    );

    match campaign.status {
        CampaignStatus::Open => assert_eq!(
            recorded, campaign.pool_balance,
            "recorded contributions {} differ from pool balance {}",
            recorded, campaign.pool_balance
        ),
        CampaignStatus::SettledPaid => {
            assert_eq!(campaign.pool_balance, 0, "settled pool not empty");
            assert_eq!(
                recorded, campaign.total_received,
                "ledger must keep the record of a disbursed campaign"
            );
        }
    }
}

/// The parameters fixed at creation never change.
pub fn assert_parameters_unchanged(original: &Campaign, current: &Campaign) {
    assert_eq!(original.beneficiary, current.beneficiary, "beneficiary changed");
    assert_eq!(original.token, current.token, "token changed");
    assert_eq!(original.oracle, current.oracle, "oracle changed");
    assert_eq!(original.window_end, current.window_end, "window_end changed");
    assert_eq!(original.target, current.target, "target changed");
    assert_eq!(original.min_value, current.min_value, "min_value changed");
}

/// A contribution of `amount` grows the running total by exactly `amount`.
pub fn assert_contribution_delta(before: i128, after: i128, amount: i128) {
    assert_eq!(
        after,
        before + amount,
        "contribution accounting broken: {} + {} != {}",
        before,
        amount,
        after
    );
}
