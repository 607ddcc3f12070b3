//! Shared in-memory backend for the integration tests.
//!
//! Implements the collaborator traits against mutexed maps and executes the
//! same lifecycle rules the real backend is expected to enforce (offer
//! acceptance matches the request and opens a pending contract, one live
//! offer per provider/request pair, idempotent favorites). Counters and a
//! failure switch let tests assert how many mutations actually went out.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

use servicedesk_core::api::{
    ContractsApi, FavoritesApi, OffersApi, ProfilesApi, RequestsApi, ReviewsApi,
};
use servicedesk_core::error::ApiError;
use servicedesk_core::lifecycle;
use servicedesk_core::models::{
    AcceptedOffer, ClientProfile, ConfirmContract, Contract, ContractStatus, CreateOffer,
    CreateRequest, DeclinedOffer, FavoriteKind, Offer, OfferStatus, Page, ProviderProfile,
    PublicRequestsQuery, Request, RequestStatus, Review, Role, UpdateOffer,
};
use servicedesk_core::session::{Claims, Session};

/// Signing key for locally minted test tokens; never a real secret.
const TEST_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

/// Mint an HS256 token for `user`, valid for an hour.
pub fn mint_token(user: Uuid) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.to_string(),
        exp: now + 3600,
        iat: Some(now),
        email: Some("tester@example.com".to_string()),
        role: Some("authenticated".to_string()),
        user_metadata: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("failed to encode test token")
}

/// A signed-in session for `user`, built the same way production does it.
pub fn session_for(user: Uuid) -> Session {
    Session::from_token(&mint_token(user))
}

#[derive(Default)]
struct BackendState {
    requests: HashMap<Uuid, Request>,
    offers: HashMap<Uuid, Offer>,
    contracts: HashMap<Uuid, Contract>,
    favorites: HashSet<(FavoriteKind, Uuid)>,
    reviews: Vec<Review>,
    provider_profiles: HashMap<Uuid, ProviderProfile>,
    client_profiles: HashMap<Uuid, ClientProfile>,
}

/// The fake backend. `user` is whoever the access token says is calling.
pub struct InMemoryBackend {
    pub user: Uuid,
    state: Mutex<BackendState>,
    /// When set, favorite mutations fail with a 503 instead of applying.
    pub fail_favorites: AtomicBool,
    pub favorite_mutations: AtomicUsize,
    pub create_offer_calls: AtomicUsize,
    pub update_offer_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new(user: Uuid) -> Arc<Self> {
        Arc::new(Self {
            user,
            state: Mutex::new(BackendState::default()),
            fail_favorites: AtomicBool::new(false),
            favorite_mutations: AtomicUsize::new(0),
            create_offer_calls: AtomicUsize::new(0),
            update_offer_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BackendState> {
        self.state.lock().expect("backend state lock poisoned")
    }

    // ── Seeding ──

    pub fn seed_request(&self, request: Request) {
        self.lock().requests.insert(request.id, request);
    }

    pub fn seed_offer(&self, offer: Offer) {
        self.lock().offers.insert(offer.id, offer);
    }

    pub fn seed_contract(&self, contract: Contract) {
        self.lock().contracts.insert(contract.id, contract);
    }

    pub fn seed_review(&self, review: Review) {
        self.lock().reviews.push(review);
    }

    pub fn seed_provider_profile(&self, profile: ProviderProfile) {
        self.lock().provider_profiles.insert(profile.user_id, profile);
    }

    pub fn seed_client_profile(&self, profile: ClientProfile) {
        self.lock().client_profiles.insert(profile.id, profile);
    }

    pub fn seed_favorite(&self, kind: FavoriteKind, target_id: Uuid) {
        self.lock().favorites.insert((kind, target_id));
    }

    // ── Inspection ──

    pub fn request(&self, id: Uuid) -> Option<Request> {
        self.lock().requests.get(&id).cloned()
    }

    pub fn offer(&self, id: Uuid) -> Option<Offer> {
        self.lock().offers.get(&id).cloned()
    }

    pub fn contract(&self, id: Uuid) -> Option<Contract> {
        self.lock().contracts.get(&id).cloned()
    }

    pub fn contract_for_offer(&self, offer_id: Uuid) -> Option<Contract> {
        self.lock()
            .contracts
            .values()
            .find(|c| c.offer_id == offer_id)
            .cloned()
    }

    pub fn offers_for_request(&self, provider: Uuid, request_id: Uuid) -> Vec<Offer> {
        self.lock()
            .offers
            .values()
            .filter(|o| o.provider_user_id == provider && o.request_id == request_id)
            .cloned()
            .collect()
    }

    pub fn has_favorite(&self, kind: FavoriteKind, target_id: Uuid) -> bool {
        self.lock().favorites.contains(&(kind, target_id))
    }

    fn check_favorites_enabled(&self) -> Result<(), ApiError> {
        if self.fail_favorites.load(Ordering::SeqCst) {
            Err(ApiError::Backend {
                status: 503,
                message: "favorites are temporarily unavailable".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RequestsApi for InMemoryBackend {
    async fn list_my_requests(&self) -> Result<Vec<Request>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .lock()
            .requests
            .values()
            .filter(|r| r.client_id == self.user)
            .cloned()
            .collect())
    }

    async fn create_request(&self, payload: &CreateRequest) -> Result<Request, ApiError> {
        let request = Request {
            id: Uuid::new_v4(),
            client_id: self.user,
            service_key: payload.service_key.clone(),
            city_id: payload.city_id,
            preferred_date: payload.preferred_date,
            price: payload.price,
            is_recurring: payload.is_recurring,
            status: RequestStatus::Published,
            created_at: Utc::now(),
        };
        self.lock().requests.insert(request.id, request.clone());
        Ok(request)
    }

    async fn delete_my_request(&self, request_id: Uuid) -> Result<(), ApiError> {
        let mut state = self.lock();
        match state.requests.get(&request_id) {
            Some(request) if request.client_id == self.user => {
                state.requests.remove(&request_id);
                Ok(())
            }
            Some(_) => Err(ApiError::Unauthorized),
            None => Err(ApiError::NotFound),
        }
    }

    async fn list_public_requests(
        &self,
        query: &PublicRequestsQuery,
    ) -> Result<Page<Request>, ApiError> {
        let state = self.lock();
        let mut items: Vec<Request> = state
            .requests
            .values()
            .filter(|r| r.status == RequestStatus::Published)
            .filter(|r| {
                query
                    .service_key
                    .as_ref()
                    .is_none_or(|key| &r.service_key == key)
            })
            .filter(|r| query.city_id.is_none_or(|city| r.city_id == city))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = items.len() as u64;
        let page = query.page();
        let limit = query.limit();
        let items = items
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok(Page {
            items,
            total,
            page,
            limit,
        })
    }

    async fn get_public_request(&self, request_id: Uuid) -> Result<Request, ApiError> {
        self.lock()
            .requests
            .get(&request_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }
}

#[async_trait]
impl OffersApi for InMemoryBackend {
    async fn create_offer(&self, payload: &CreateOffer) -> Result<Offer, ApiError> {
        self.create_offer_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        let duplicate = state.offers.values().any(|o| {
            o.provider_user_id == self.user
                && o.request_id == payload.request_id
                && o.status == OfferStatus::Sent
        });
        if duplicate {
            return Err(ApiError::Conflict);
        }
        let parent = state.requests.get(&payload.request_id).cloned();
        let now = Utc::now();
        let offer = Offer {
            id: Uuid::new_v4(),
            request_id: payload.request_id,
            provider_user_id: self.user,
            client_user_id: parent.as_ref().map(|r| r.client_id).unwrap_or(Uuid::nil()),
            amount: payload.amount,
            message: payload.message.clone(),
            availability: payload.availability.clone(),
            status: OfferStatus::Sent,
            service_key: parent.as_ref().map(|r| r.service_key.clone()),
            city_id: parent.as_ref().map(|r| r.city_id),
            preferred_date: parent.as_ref().map(|r| r.preferred_date),
            request_status: parent.as_ref().map(|r| r.status),
            created_at: now,
            updated_at: now,
        };
        state.offers.insert(offer.id, offer.clone());
        Ok(offer)
    }

    async fn update_offer(
        &self,
        offer_id: Uuid,
        payload: &UpdateOffer,
    ) -> Result<Offer, ApiError> {
        self.update_offer_calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.lock();
        let offer = state.offers.get_mut(&offer_id).ok_or(ApiError::NotFound)?;
        if !lifecycle::offer_is_editable(offer.status) {
            return Err(ApiError::Conflict);
        }
        offer.amount = payload.amount;
        offer.message = payload.message.clone();
        offer.availability = payload.availability.clone();
        offer.updated_at = Utc::now();
        Ok(offer.clone())
    }

    async fn delete_offer(&self, offer_id: Uuid) -> Result<(), ApiError> {
        let mut state = self.lock();
        let offer = state.offers.get(&offer_id).ok_or(ApiError::NotFound)?;
        if !lifecycle::offer_is_editable(offer.status) {
            return Err(ApiError::Conflict);
        }
        state.offers.remove(&offer_id);
        Ok(())
    }

    async fn list_my_provider_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .lock()
            .offers
            .values()
            .filter(|o| o.provider_user_id == self.user)
            .cloned()
            .collect())
    }

    async fn list_my_client_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .lock()
            .offers
            .values()
            .filter(|o| o.client_user_id == self.user)
            .cloned()
            .collect())
    }

    async fn accept_offer(&self, offer_id: Uuid) -> Result<AcceptedOffer, ApiError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let now = Utc::now();
        let offer = state.offers.get_mut(&offer_id).ok_or(ApiError::NotFound)?;
        // Acceptance needs a live offer on a request that is still open for
        // matching; a sibling acceptance retires the rest of the field.
        let actionable = match state.requests.get(&offer.request_id) {
            Some(parent) => lifecycle::offer_is_actionable(offer.status, parent.status),
            None => lifecycle::offer_transition_allowed(offer.status, OfferStatus::Accepted),
        };
        if !actionable {
            return Err(ApiError::Conflict);
        }
        let effects = lifecycle::acceptance_effects();
        offer.status = effects.offer_status;
        offer.updated_at = now;
        let (request_id, provider, client, amount) = (
            offer.request_id,
            offer.provider_user_id,
            offer.client_user_id,
            offer.amount,
        );
        if let Some(request) = state.requests.get_mut(&request_id) {
            if lifecycle::request_transition_allowed(request.status, effects.request_status) {
                request.status = effects.request_status;
            }
        }
        let contract = Contract {
            id: Uuid::new_v4(),
            request_id,
            offer_id,
            provider_user_id: provider,
            client_user_id: client,
            status: effects.new_contract_status,
            start_at: None,
            duration_min: None,
            price_amount: amount,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        state.contracts.insert(contract.id, contract);
        Ok(AcceptedOffer {
            accepted_offer_id: offer_id,
        })
    }

    async fn decline_offer(&self, offer_id: Uuid) -> Result<DeclinedOffer, ApiError> {
        let mut state = self.lock();
        let offer = state.offers.get_mut(&offer_id).ok_or(ApiError::NotFound)?;
        if !lifecycle::offer_transition_allowed(offer.status, OfferStatus::Declined) {
            return Err(ApiError::Conflict);
        }
        offer.status = OfferStatus::Declined;
        offer.updated_at = Utc::now();
        Ok(DeclinedOffer {
            rejected_offer_id: offer_id,
        })
    }
}

#[async_trait]
impl ContractsApi for InMemoryBackend {
    async fn list_my_contracts(&self, role: Role) -> Result<Vec<Contract>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .lock()
            .contracts
            .values()
            .filter(|c| match role {
                Role::Provider => c.provider_user_id == self.user,
                Role::Client => c.client_user_id == self.user,
            })
            .cloned()
            .collect())
    }

    async fn confirm_contract(
        &self,
        contract_id: Uuid,
        payload: &ConfirmContract,
    ) -> Result<Contract, ApiError> {
        let mut state = self.lock();
        let contract = state
            .contracts
            .get_mut(&contract_id)
            .ok_or(ApiError::NotFound)?;
        if !lifecycle::contract_can_confirm(contract.status) {
            return Err(ApiError::Conflict);
        }
        contract.status = ContractStatus::Confirmed;
        contract.start_at = Some(payload.start_at);
        contract.duration_min = Some(payload.duration_min);
        contract.updated_at = Utc::now();
        Ok(contract.clone())
    }

    async fn cancel_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError> {
        let mut state = self.lock();
        let contract = state
            .contracts
            .get_mut(&contract_id)
            .ok_or(ApiError::NotFound)?;
        if !lifecycle::contract_can_cancel(contract.status) {
            return Err(ApiError::Conflict);
        }
        contract.status = ContractStatus::Cancelled;
        contract.updated_at = Utc::now();
        Ok(contract.clone())
    }

    async fn complete_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError> {
        let mut state = self.lock();
        let contract = state
            .contracts
            .get_mut(&contract_id)
            .ok_or(ApiError::NotFound)?;
        if !lifecycle::contract_can_complete(contract.status) {
            return Err(ApiError::Conflict);
        }
        let now = Utc::now();
        contract.status = ContractStatus::Completed;
        contract.completed_at = Some(now);
        contract.updated_at = now;
        Ok(contract.clone())
    }
}

#[async_trait]
impl FavoritesApi for InMemoryBackend {
    async fn list_favorite_requests(&self) -> Result<Vec<Request>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        Ok(state
            .favorites
            .iter()
            .filter(|(kind, _)| *kind == FavoriteKind::Request)
            .filter_map(|(_, id)| state.requests.get(id).cloned())
            .collect())
    }

    async fn list_favorite_providers(&self) -> Result<Vec<ProviderProfile>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let state = self.lock();
        Ok(state
            .favorites
            .iter()
            .filter(|(kind, _)| *kind == FavoriteKind::Provider)
            .filter_map(|(_, id)| state.provider_profiles.get(id).cloned())
            .collect())
    }

    async fn add_favorite(&self, kind: FavoriteKind, target_id: Uuid) -> Result<(), ApiError> {
        self.favorite_mutations.fetch_add(1, Ordering::SeqCst);
        self.check_favorites_enabled()?;
        // Idempotent: re-adding is a no-op success.
        self.lock().favorites.insert((kind, target_id));
        Ok(())
    }

    async fn remove_favorite(&self, kind: FavoriteKind, target_id: Uuid) -> Result<(), ApiError> {
        self.favorite_mutations.fetch_add(1, Ordering::SeqCst);
        self.check_favorites_enabled()?;
        // Idempotent: removing a missing favorite is a no-op success.
        self.lock().favorites.remove(&(kind, target_id));
        Ok(())
    }
}

#[async_trait]
impl ReviewsApi for InMemoryBackend {
    async fn list_my_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .lock()
            .reviews
            .iter()
            .filter(|r| r.target_user_id == self.user)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfilesApi for InMemoryBackend {
    async fn get_provider_profile(&self) -> Result<Option<ProviderProfile>, ApiError> {
        Ok(self.lock().provider_profiles.get(&self.user).cloned())
    }

    async fn get_client_profile(&self) -> Result<Option<ClientProfile>, ApiError> {
        Ok(self.lock().client_profiles.get(&self.user).cloned())
    }
}

// ── Fixtures ──

pub fn sample_request(client_id: Uuid, status: RequestStatus) -> Request {
    let now = Utc::now();
    Request {
        id: Uuid::new_v4(),
        client_id,
        service_key: "cleaning".to_string(),
        city_id: 42,
        preferred_date: now + Duration::days(3),
        price: Some(80.0),
        is_recurring: false,
        status,
        created_at: now,
    }
}

pub fn sample_offer(
    provider: Uuid,
    client: Uuid,
    request_id: Uuid,
    status: OfferStatus,
) -> Offer {
    let now = Utc::now();
    Offer {
        id: Uuid::new_v4(),
        request_id,
        provider_user_id: provider,
        client_user_id: client,
        amount: 120.0,
        message: Some("Happy to help".to_string()),
        availability: None,
        status,
        service_key: Some("cleaning".to_string()),
        city_id: Some(42),
        preferred_date: Some(now + Duration::days(3)),
        request_status: Some(RequestStatus::Published),
        created_at: now - Duration::minutes(30),
        updated_at: now,
    }
}

pub fn sample_contract(provider: Uuid, client: Uuid, status: ContractStatus) -> Contract {
    let now = Utc::now();
    Contract {
        id: Uuid::new_v4(),
        request_id: Uuid::new_v4(),
        offer_id: Uuid::new_v4(),
        provider_user_id: provider,
        client_user_id: client,
        status,
        start_at: None,
        duration_min: None,
        price_amount: 120.0,
        completed_at: (status == ContractStatus::Completed).then_some(now),
        created_at: now - Duration::days(1),
        updated_at: now,
    }
}

pub fn sample_review(target_user_id: Uuid, target_role: Role) -> Review {
    Review {
        id: Uuid::new_v4(),
        contract_id: Uuid::new_v4(),
        author_user_id: Uuid::new_v4(),
        target_user_id,
        target_role,
        rating: 5,
        comment: Some("Great work".to_string()),
        author_name: Some("Alex".to_string()),
        created_at: Utc::now(),
    }
}

/// A provider profile every completeness weight fires on.
pub fn full_provider_profile(user_id: Uuid) -> ProviderProfile {
    ProviderProfile {
        id: Uuid::new_v4(),
        user_id,
        display_name: Some("Ada's Cleaning".to_string()),
        bio: Some("Ten years of experience".to_string()),
        city_id: Some(42),
        service_keys: vec!["cleaning".to_string()],
        base_price: Some(45.0),
        company_name: Some("Ada GmbH".to_string()),
        vat_id: None,
        is_active: true,
        is_blocked: false,
        created_at: Utc::now(),
    }
}

/// A client profile every completeness weight fires on.
pub fn full_client_profile(id: Uuid) -> ClientProfile {
    ClientProfile {
        id,
        name: Some("Sam".to_string()),
        email: Some("sam@example.com".to_string()),
        city_id: Some(42),
        phone: Some("+49 151 0000000".to_string()),
        avatar_url: Some("https://example.com/sam.png".to_string()),
        privacy_accepted: true,
        client_profile_linked: true,
        created_at: Utc::now(),
    }
}
