//! Pure derivation of per-tab view models from raw entity collections.
//! Nothing here touches the network: same inputs, same output, so callers
//! can re-derive as often as they like.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::lifecycle::request_is_terminal;
use crate::models::{
    Contract, Offer, Page, ProviderProfile, Request, RequestStatus, Review, Role,
};
use crate::workspace::filter::{
    StatusFilter, contract_bucket, offer_bucket, request_bucket,
};
use crate::workspace::state::{FavoritesView, WorkspaceState, WorkspaceTab};

// ── Inputs ──

/// Raw collections the workspace tabs are derived from, as fetched by the
/// store. Missing offer parents are simply absent from `offer_requests_by_id`.
#[derive(Debug, Clone, Default)]
pub struct WorkspaceData {
    pub my_requests: Vec<Request>,
    pub my_offers: Vec<Offer>,
    pub offer_requests_by_id: HashMap<Uuid, Request>,
    pub contracts_as_provider: Vec<Contract>,
    pub contracts_as_client: Vec<Contract>,
    pub favorite_requests: Vec<Request>,
    pub favorite_providers: Vec<ProviderProfile>,
    pub my_reviews: Vec<Review>,
    pub public_requests: Page<Request>,
}

// ── View models ──

/// An offer joined with its parent request. When the parent could not be
/// resolved the request is a synthesized stand-in and `synthesized` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct OfferCard<'a> {
    pub offer: &'a Offer,
    pub request: Cow<'a, Request>,
    pub synthesized: bool,
}

/// A review shaped for display, with role label and author/date fallbacks
/// already applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard<'a> {
    pub review: &'a Review,
    pub role_label: &'static str,
    pub author_display: String,
    pub date_display: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesTab<'a> {
    Requests(Vec<&'a Request>),
    Providers(Vec<&'a ProviderProfile>),
}

/// What one tab shows under the current filter.
#[derive(Debug, Clone, PartialEq)]
pub enum TabView<'a> {
    NewOrders {
        page: &'a Page<Request>,
        items: Vec<&'a Request>,
    },
    MyRequests(Vec<&'a Request>),
    MyOffers(Vec<OfferCard<'a>>),
    CompletedJobs(Vec<&'a Contract>),
    Favorites(FavoritesTab<'a>),
    Reviews(Vec<ReviewCard<'a>>),
}

// ── Derivation ──

pub fn derive<'a>(data: &'a WorkspaceData, state: &WorkspaceState) -> TabView<'a> {
    match state.active_tab {
        WorkspaceTab::NewOrders => TabView::NewOrders {
            page: &data.public_requests,
            items: filter_requests(&data.public_requests.items, state.status_filter),
        },
        WorkspaceTab::MyRequests => {
            TabView::MyRequests(filter_requests(&data.my_requests, state.status_filter))
        }
        WorkspaceTab::MyOffers => TabView::MyOffers(offer_cards(
            &data.my_offers,
            &data.offer_requests_by_id,
            state.status_filter,
        )),
        WorkspaceTab::CompletedJobs => {
            TabView::CompletedJobs(contract_history(data, state.status_filter))
        }
        WorkspaceTab::Favorites => TabView::Favorites(favorites_tab(data, state.favorites_view)),
        WorkspaceTab::Reviews => TabView::Reviews(review_cards(&data.my_reviews, state.reviews_view)),
    }
}

fn filter_requests(requests: &[Request], filter: StatusFilter) -> Vec<&Request> {
    requests
        .iter()
        .filter(|r| filter.admits(request_bucket(r.status)))
        .collect()
}

/// Joins each offer with its parent request, synthesizing a stand-in where
/// the parent never resolved. Stand-ins for the same request id collapse to
/// one card, first occurrence wins.
pub fn offer_cards<'a>(
    offers: &'a [Offer],
    requests_by_id: &'a HashMap<Uuid, Request>,
    filter: StatusFilter,
) -> Vec<OfferCard<'a>> {
    let mut synthesized_for: HashSet<Uuid> = HashSet::new();
    let mut cards = Vec::new();
    for offer in offers {
        if !filter.admits(offer_bucket(offer.status)) {
            continue;
        }
        match requests_by_id.get(&offer.request_id) {
            Some(request) => cards.push(OfferCard {
                offer,
                request: Cow::Borrowed(request),
                synthesized: false,
            }),
            None => {
                if synthesized_for.insert(offer.request_id) {
                    cards.push(OfferCard {
                        offer,
                        request: Cow::Owned(synthesize_request(offer)),
                        synthesized: true,
                    });
                }
            }
        }
    }
    cards
}

/// Builds a minimal request from an offer's denormalized fields. Shown as
/// published unless the offer knows the request already ended.
pub fn synthesize_request(offer: &Offer) -> Request {
    let status = match offer.request_status {
        Some(status) if request_is_terminal(status) => status,
        _ => RequestStatus::Published,
    };
    Request {
        id: offer.request_id,
        client_id: offer.client_user_id,
        service_key: offer.service_key.clone().unwrap_or_default(),
        city_id: offer.city_id.unwrap_or(0),
        preferred_date: offer.preferred_date.unwrap_or(offer.created_at),
        price: Some(offer.amount),
        is_recurring: false,
        status,
        created_at: offer.created_at,
    }
}

/// Union of both contract roles, deduplicated by id, newest activity first.
pub fn contract_history(data: &WorkspaceData, filter: StatusFilter) -> Vec<&Contract> {
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut contracts: Vec<&Contract> = data
        .contracts_as_provider
        .iter()
        .chain(data.contracts_as_client.iter())
        .filter(|c| seen.insert(c.id))
        .filter(|c| filter.admits(Some(contract_bucket(c.status))))
        .collect();
    contracts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    contracts
}

/// The view actually shown on the favorites tab. When the chosen view is
/// empty but the other has items, fall through to the non-empty one. The
/// redirect is recomputed on every derivation and never written back to
/// the stored preference.
pub fn resolve_favorites_view(chosen: FavoritesView, data: &WorkspaceData) -> FavoritesView {
    match chosen {
        FavoritesView::Requests
            if data.favorite_requests.is_empty() && !data.favorite_providers.is_empty() =>
        {
            FavoritesView::Providers
        }
        FavoritesView::Providers
            if data.favorite_providers.is_empty() && !data.favorite_requests.is_empty() =>
        {
            FavoritesView::Requests
        }
        chosen => chosen,
    }
}

fn favorites_tab(data: &WorkspaceData, chosen: FavoritesView) -> FavoritesTab<'_> {
    match resolve_favorites_view(chosen, data) {
        FavoritesView::Requests => FavoritesTab::Requests(data.favorite_requests.iter().collect()),
        FavoritesView::Providers => {
            FavoritesTab::Providers(data.favorite_providers.iter().collect())
        }
    }
}

/// Reviews about the user in the given role, display-ready.
pub fn review_cards(reviews: &[Review], view: Role) -> Vec<ReviewCard<'_>> {
    reviews
        .iter()
        .filter(|r| r.target_role == view)
        .map(|review| ReviewCard {
            review,
            role_label: match view {
                Role::Provider => "as provider",
                Role::Client => "as client",
            },
            author_display: review
                .author_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_owned)
                .unwrap_or_else(|| "Anonymous".to_owned()),
            date_display: review.created_at.format("%Y-%m-%d").to_string(),
        })
        .collect()
}
