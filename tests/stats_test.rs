//! Analytics over entity collections: acceptance rate, response latency,
//! monthly series, month-over-month movement, completeness, and the
//! dashboard priority selector. All pure, no runtime needed.
//!
//! Run with: `cargo test --test stats_test`
mod common;

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use servicedesk_core::models::{ContractStatus, OfferStatus, RequestStatus, Role};
use servicedesk_core::stats::{
    MomDelta, acceptance_rate, avg_response_minutes, client_completeness,
    contract_completion_series, mom_delta, monthly_series, provider_completeness,
    request_creation_series, series_mom_delta,
};
use servicedesk_core::stats::priority::{
    client_activity, dashboard_priority, priority_score, provider_activity,
};

use common::{
    full_client_profile, full_provider_profile, sample_contract, sample_offer, sample_request,
};

fn offer_with_status(status: OfferStatus) -> servicedesk_core::models::Offer {
    sample_offer(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), status)
}

#[test]
fn test_acceptance_rate_with_zero_decided_offers_is_zero() {
    assert_eq!(acceptance_rate(&[]), 0);
    // Sent and withdrawn offers are undecided; still zero.
    let offers = vec![
        offer_with_status(OfferStatus::Sent),
        offer_with_status(OfferStatus::Withdrawn),
    ];
    assert_eq!(acceptance_rate(&offers), 0);
}

#[test]
fn test_acceptance_rate_rounds_to_integer_percent() {
    let offers = vec![
        offer_with_status(OfferStatus::Accepted),
        offer_with_status(OfferStatus::Accepted),
        offer_with_status(OfferStatus::Declined),
        // Undecided offers do not dilute the rate.
        offer_with_status(OfferStatus::Sent),
    ];
    // 2 of 3 decided = 66.67% → 67.
    assert_eq!(acceptance_rate(&offers), 67);
}

#[test]
fn test_avg_response_minutes_skips_non_positive_deltas() {
    let mut fast = offer_with_status(OfferStatus::Accepted);
    fast.created_at = Utc::now() - Duration::minutes(10);
    fast.updated_at = fast.created_at + Duration::minutes(10);

    let mut slow = offer_with_status(OfferStatus::Declined);
    slow.created_at = Utc::now() - Duration::minutes(40);
    slow.updated_at = slow.created_at + Duration::minutes(30);

    // Never touched after creation: zero delta, not a response sample.
    let mut untouched = offer_with_status(OfferStatus::Sent);
    untouched.created_at = Utc::now();
    untouched.updated_at = untouched.created_at;

    // Clock skew artifact: negative delta, excluded too.
    let mut skewed = offer_with_status(OfferStatus::Sent);
    skewed.created_at = Utc::now();
    skewed.updated_at = skewed.created_at - Duration::minutes(5);

    let avg = avg_response_minutes(&[fast, slow, untouched, skewed])
        .expect("two positive samples should produce a mean");
    assert!((avg - 20.0).abs() < 0.01, "expected ~20 minutes, got {avg}");
}

#[test]
fn test_avg_response_minutes_empty_sample_is_unavailable() {
    assert_eq!(avg_response_minutes(&[]), None);

    let mut untouched = offer_with_status(OfferStatus::Sent);
    untouched.updated_at = untouched.created_at;
    assert_eq!(avg_response_minutes(&[untouched]), None);
}

#[test]
fn test_mom_delta_cases() {
    assert_eq!(mom_delta(5, 0), MomDelta::New);
    assert_eq!(mom_delta(5, 0).to_string(), "new");
    assert_eq!(mom_delta(0, 0).to_string(), "0%");
    assert_eq!(mom_delta(4, 5).to_string(), "-20%");
    assert_eq!(mom_delta(6, 5).to_string(), "+20%");
    // Unchanged counts render as a plain unsigned zero.
    assert_eq!(mom_delta(5, 5).to_string(), "0%");
}

#[test]
fn test_monthly_series_covers_six_months_oldest_first_across_year_boundary() {
    let now = Utc.with_ymd_and_hms(2026, 2, 15, 12, 0, 0).unwrap();
    let series = monthly_series(std::iter::empty(), now);

    let months: Vec<(i32, u32)> = series.iter().map(|p| (p.year, p.month)).collect();
    assert_eq!(
        months,
        vec![
            (2025, 9),
            (2025, 10),
            (2025, 11),
            (2025, 12),
            (2026, 1),
            (2026, 2),
        ]
    );
    assert!(series.iter().all(|p| p.count == 0 && p.total_amount == 0.0));
}

#[test]
fn test_monthly_series_buckets_items_and_drops_old_ones() {
    let now = Utc.with_ymd_and_hms(2026, 2, 15, 12, 0, 0).unwrap();
    let items = vec![
        (Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(), 100.0),
        (Utc.with_ymd_and_hms(2026, 2, 14, 0, 0, 0).unwrap(), 50.0),
        (Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap(), 80.0),
        // Seven months back: outside the window, dropped.
        (Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap(), 999.0),
    ];
    let series = monthly_series(items, now);

    let current = series.last().unwrap();
    assert_eq!((current.year, current.month), (2026, 2));
    assert_eq!(current.count, 2);
    assert_eq!(current.total_amount, 150.0);

    let december = &series[3];
    assert_eq!((december.year, december.month), (2025, 12));
    assert_eq!(december.count, 1);
    assert_eq!(december.total_amount, 80.0);

    let total: usize = series.iter().map(|p| p.count).sum();
    assert_eq!(total, 3, "the out-of-window item must not be counted");
}

#[test]
fn test_contract_completion_series_counts_only_completed() {
    let provider = Uuid::new_v4();
    let client = Uuid::new_v4();
    let now = Utc::now();

    let mut done = sample_contract(provider, client, ContractStatus::Completed);
    done.completed_at = Some(now);
    done.price_amount = 200.0;
    let cancelled = sample_contract(provider, client, ContractStatus::Cancelled);
    let pending = sample_contract(provider, client, ContractStatus::Pending);

    let series = contract_completion_series(&[done, cancelled, pending], now);
    let current = series.last().unwrap();
    assert_eq!(current.count, 1);
    assert_eq!(current.total_amount, 200.0);
}

#[test]
fn test_request_creation_series_and_mom_delta_read_new_activity() {
    let client = Uuid::new_v4();
    let now = Utc::now();

    let mut this_month = sample_request(client, RequestStatus::Published);
    this_month.created_at = now;
    let mut also_this_month = sample_request(client, RequestStatus::Draft);
    also_this_month.created_at = now;

    let series = request_creation_series(&[this_month, also_this_month], now);
    assert_eq!(series.last().unwrap().count, 2);
    // Nothing last month, two now: "new", not a division by zero.
    assert_eq!(series_mom_delta(&series), MomDelta::New);
}

#[test]
fn test_provider_completeness_weights() {
    let full = full_provider_profile(Uuid::new_v4());
    assert_eq!(provider_completeness(&full), 100);

    // Blocked providers lose the active-status weight.
    let mut blocked = full_provider_profile(Uuid::new_v4());
    blocked.is_blocked = true;
    assert_eq!(provider_completeness(&blocked), 90);

    // Whitespace-only text fields do not count.
    let mut sparse = full_provider_profile(Uuid::new_v4());
    sparse.display_name = Some("   ".to_string());
    sparse.bio = None;
    sparse.city_id = None;
    sparse.service_keys.clear();
    sparse.base_price = Some(0.0);
    sparse.company_name = None;
    sparse.vat_id = None;
    assert_eq!(provider_completeness(&sparse), 10); // active and unblocked only
}

#[test]
fn test_client_completeness_weights() {
    let full = full_client_profile(Uuid::new_v4());
    assert_eq!(client_completeness(&full), 100);

    let mut bare = full_client_profile(Uuid::new_v4());
    bare.name = None;
    bare.email = None;
    bare.city_id = None;
    bare.phone = None;
    bare.avatar_url = None;
    bare.privacy_accepted = false;
    bare.client_profile_linked = false;
    assert_eq!(client_completeness(&bare), 0);
}

#[test]
fn test_activity_counts() {
    let provider = Uuid::new_v4();
    let client = Uuid::new_v4();

    let offers = vec![
        offer_with_status(OfferStatus::Sent),
        offer_with_status(OfferStatus::Accepted),
        offer_with_status(OfferStatus::Declined),
        // Withdrawn offers are not activity.
        offer_with_status(OfferStatus::Withdrawn),
    ];
    let contracts = vec![
        sample_contract(provider, client, ContractStatus::Pending),
        sample_contract(provider, client, ContractStatus::Completed),
        // Cancelled contracts are history, not activity.
        sample_contract(provider, client, ContractStatus::Cancelled),
    ];
    assert_eq!(provider_activity(&offers, &contracts), 5);

    let requests = vec![
        sample_request(client, RequestStatus::Published), // created + open
        sample_request(client, RequestStatus::Closed),    // created only
    ];
    assert_eq!(client_activity(&requests, &contracts), 5);
}

#[test]
fn test_dashboard_priority_ties_favor_provider() {
    let tie = dashboard_priority(50, 2, 50, 2);
    assert_eq!(tie.provider_score, 60);
    assert_eq!(tie.client_score, 60);
    assert_eq!(tie.primary, Role::Provider);

    let client_heavy = dashboard_priority(10, 0, 80, 4);
    assert_eq!(client_heavy.primary, Role::Client);
    assert_eq!(client_heavy.client_score, 100);

    assert_eq!(priority_score(70, 3), 85);
}
