//! Decides which of the two role dashboards greets the user first. A
//! presentation heuristic only: it reorders views, it never touches data.

use crate::models::{Contract, ContractStatus, Offer, OfferStatus, Request, Role};
use crate::workspace::filter::{FilterBucket, request_bucket};

/// Scores for both dashboards plus the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardPriority {
    pub provider_score: u32,
    pub client_score: u32,
    pub primary: Role,
}

/// Contracts that count as activity: everything still moving plus delivered
/// work. Cancelled contracts are history, not activity.
fn contract_counts(status: ContractStatus) -> bool {
    match status {
        ContractStatus::Pending
        | ContractStatus::Confirmed
        | ContractStatus::InProgress
        | ContractStatus::Completed => true,
        ContractStatus::Cancelled => false,
    }
}

/// Provider-side activity: offers the provider has in play or had decided,
/// plus active and completed contracts. Withdrawn offers do not count.
pub fn provider_activity(offers: &[Offer], contracts: &[Contract]) -> usize {
    let offers = offers
        .iter()
        .filter(|o| {
            matches!(
                o.status,
                OfferStatus::Sent | OfferStatus::Accepted | OfferStatus::Declined
            )
        })
        .count();
    let contracts = contracts
        .iter()
        .filter(|c| contract_counts(c.status))
        .count();
    offers + contracts
}

/// Client-side activity: every request created, with still-open ones counted
/// again (an open request is a live commitment, not just history), plus
/// active and completed contracts.
pub fn client_activity(requests: &[Request], contracts: &[Contract]) -> usize {
    let created = requests.len();
    let open = requests
        .iter()
        .filter(|r| request_bucket(r.status) == Some(FilterBucket::Open))
        .count();
    let contracts = contracts
        .iter()
        .filter(|c| contract_counts(c.status))
        .count();
    created + open + contracts
}

pub fn priority_score(completeness: u8, activity: usize) -> u32 {
    completeness as u32 + activity as u32 * 5
}

/// The dashboard whose score is not lower goes first; ties favor the
/// provider view.
pub fn dashboard_priority(
    provider_completeness: u8,
    provider_activity: usize,
    client_completeness: u8,
    client_activity: usize,
) -> DashboardPriority {
    let provider_score = priority_score(provider_completeness, provider_activity);
    let client_score = priority_score(client_completeness, client_activity);
    DashboardPriority {
        provider_score,
        client_score,
        primary: if provider_score >= client_score {
            Role::Provider
        } else {
            Role::Client
        },
    }
}
