extern crate std;

use soroban_sdk::{symbol_short, testutils::Events, vec, IntoVal, TryIntoVal};

use crate::events::{CampaignCreated, ContributionReceived, FundsDisbursed, RefundIssued};
use crate::testutils::{Setup, LOCK_TIME, MIN_VALUE, TARGET, UNIT};

#[test]
fn test_contribution_received_event() {
    let s = Setup::new();
    let alice = s.contributor(UNIT);

    s.escrow.contribute(&alice, &(UNIT / 10));
    s.escrow.contribute(&alice, &(UNIT / 5));

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("funded"), contributor)
    assert_eq!(last_event.0, s.escrow.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("funded").into_val(&s.env),
        alice.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ContributionReceived = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        ContributionReceived {
            contributor: alice.clone(),
            amount: UNIT / 5,
            total: UNIT / 10 + UNIT / 5,
        }
    );
}

#[test]
fn test_funds_disbursed_event() {
    let s = Setup::new();
    let alice = s.contributor(UNIT);

    s.escrow.contribute(&alice, &UNIT);
    s.close_window();
    s.escrow.settle(&s.beneficiary);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, s.escrow.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("disbursed").into_val(&s.env),
        s.beneficiary.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsDisbursed = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        FundsDisbursed {
            beneficiary: s.beneficiary.clone(),
            amount: UNIT,
        }
    );
}

#[test]
fn test_refund_issued_event() {
    let s = Setup::new();
    let alice = s.contributor(UNIT);

    s.escrow.contribute(&alice, &(UNIT / 10));
    s.close_window();
    s.escrow.claim_refund(&alice);

    let all_events = s.env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, s.escrow.address);
    let expected_topics = vec![
        &s.env,
        symbol_short!("refunded").into_val(&s.env),
        alice.into_val(&s.env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: RefundIssued = last_event.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        RefundIssued {
            contributor: alice.clone(),
            amount: UNIT / 10,
        }
    );
}

#[test]
fn test_campaign_created_event() {
    let s = Setup::new();

    let created = s
        .env
        .events()
        .all()
        .iter()
        .find(|e| {
            e.0 == s.escrow.address
                && e.1 == vec![&s.env, symbol_short!("created").into_val(&s.env)]
        })
        .expect("created event missing");

    let event_data: CampaignCreated = created.2.try_into_val(&s.env).unwrap();
    assert_eq!(
        event_data,
        CampaignCreated {
            beneficiary: s.beneficiary.clone(),
            token: s.token.address.clone(),
            oracle: s.feed.address.clone(),
            window_end: LOCK_TIME,
            target: TARGET,
            min_value: MIN_VALUE,
        }
    );
}
