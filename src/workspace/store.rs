use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::api::MarketplaceApi;
use crate::api::requests::public_requests_query_string;
use crate::cache::{CacheConfig, QueryCache, keys};
use crate::error::ApiError;
use crate::models::{
    AcceptedOffer, ClientProfile, ConfirmContract, Contract, CreateRequest, DeclinedOffer, Offer,
    Page, ProviderProfile, PublicRequestsQuery, Request, Review, Role,
};
use crate::session::Session;
use crate::workspace::derive::WorkspaceData;

/// Cached read side plus invalidating write side for everything the
/// workspace tabs consume. Generic over the API so tests can run against an
/// in-memory backend.
#[derive(Clone)]
pub struct Workspace<A: MarketplaceApi> {
    api: Arc<A>,
    cache: QueryCache,
    session: Session,
    ttl: CacheConfig,
}

impl<A: MarketplaceApi> Workspace<A> {
    pub fn new(api: Arc<A>, cache: QueryCache, session: Session, ttl: CacheConfig) -> Self {
        Self {
            api,
            cache,
            session,
            ttl,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch-through: answer from cache or run `fetch` and remember the
    /// result for `ttl`.
    async fn cached<T, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.cache.get::<T>(key).await {
            return Ok(hit);
        }
        let value = fetch().await?;
        self.cache.set(key, &value, ttl).await;
        Ok(value)
    }

    // ── Reads ──

    /// Signed-out users own nothing, so personal listings short-circuit to
    /// empty without a network round trip.
    pub async fn my_requests(&self) -> Result<Vec<Request>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        self.cached(&keys::my_requests(user), self.ttl.requests_ttl, || async {
            self.api.list_my_requests().await
        })
        .await
    }

    /// Offers the user has sent as a provider.
    pub async fn provider_offers(&self) -> Result<Vec<Offer>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        self.cached(&keys::provider_offers(user), self.ttl.offers_ttl, || async {
            self.api.list_my_provider_offers().await
        })
        .await
    }

    /// Offers received on the user's own requests.
    pub async fn client_offers(&self) -> Result<Vec<Offer>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        self.cached(&keys::client_offers(user), self.ttl.offers_ttl, || async {
            self.api.list_my_client_offers().await
        })
        .await
    }

    pub async fn contracts(&self, role: Role) -> Result<Vec<Contract>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        self.cached(
            &keys::contracts(user, role),
            self.ttl.contracts_ttl,
            || async { self.api.list_my_contracts(role).await },
        )
        .await
    }

    pub async fn favorite_requests(&self) -> Result<Vec<Request>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        self.cached(
            &keys::favorites(user, crate::models::FavoriteKind::Request),
            self.ttl.favorites_ttl,
            || async { self.api.list_favorite_requests().await },
        )
        .await
    }

    pub async fn favorite_providers(&self) -> Result<Vec<ProviderProfile>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        self.cached(
            &keys::favorites(user, crate::models::FavoriteKind::Provider),
            self.ttl.favorites_ttl,
            || async { self.api.list_favorite_providers().await },
        )
        .await
    }

    pub async fn my_reviews(&self) -> Result<Vec<Review>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        self.cached(&keys::my_reviews(user), self.ttl.reviews_ttl, || async {
            self.api.list_my_reviews().await
        })
        .await
    }

    pub async fn provider_profile(&self) -> Result<Option<ProviderProfile>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(None);
        };
        self.cached(
            &keys::provider_profile(user),
            self.ttl.profile_ttl,
            || async { self.api.get_provider_profile().await },
        )
        .await
    }

    pub async fn client_profile(&self) -> Result<Option<ClientProfile>, ApiError> {
        let Some(user) = self.session.user_id() else {
            return Ok(None);
        };
        self.cached(
            &keys::client_profile(user),
            self.ttl.profile_ttl,
            || async { self.api.get_client_profile().await },
        )
        .await
    }

    /// Public listings are cached anonymously, keyed by the filter string.
    pub async fn public_requests(
        &self,
        query: &PublicRequestsQuery,
    ) -> Result<Page<Request>, ApiError> {
        let key = keys::public_requests(&public_requests_query_string(query));
        self.cached(&key, self.ttl.public_ttl, || async {
            self.api.list_public_requests(query).await
        })
        .await
    }

    /// Resolves the distinct parent requests of the given offers. A parent
    /// that fails to load is simply absent from the map; the derivation
    /// layer synthesizes a stand-in for it.
    pub async fn offer_parent_requests(&self, offers: &[Offer]) -> HashMap<Uuid, Request> {
        let Some(user) = self.session.user_id() else {
            return HashMap::new();
        };
        let key = keys::offer_parents(user);
        if let Some(parents) = self.cache.get::<Vec<Request>>(&key).await {
            return parents.into_iter().map(|r| (r.id, r)).collect();
        }
        let mut ids: Vec<Uuid> = offers.iter().map(|o| o.request_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let results = join_all(ids.into_iter().map(|id| self.api.get_public_request(id))).await;
        let resolved: Vec<Request> = results
            .into_iter()
            .filter_map(|result| match result {
                Ok(request) => Some(request),
                Err(err) => {
                    tracing::debug!(error = %err, "offer parent request did not resolve");
                    None
                }
            })
            .collect();
        self.cache.set(&key, &resolved, self.ttl.requests_ttl).await;
        resolved.into_iter().map(|r| (r.id, r)).collect()
    }

    /// Fetches everything the tabs derive from, concurrently.
    pub async fn load(&self, public_query: &PublicRequestsQuery) -> Result<WorkspaceData, ApiError> {
        let (
            my_requests,
            my_offers,
            contracts_as_provider,
            contracts_as_client,
            favorite_requests,
            favorite_providers,
            my_reviews,
            public_requests,
        ) = tokio::try_join!(
            self.my_requests(),
            self.provider_offers(),
            self.contracts(Role::Provider),
            self.contracts(Role::Client),
            self.favorite_requests(),
            self.favorite_providers(),
            self.my_reviews(),
            self.public_requests(public_query),
        )?;
        let offer_requests_by_id = self.offer_parent_requests(&my_offers).await;
        Ok(WorkspaceData {
            my_requests,
            my_offers,
            offer_requests_by_id,
            contracts_as_provider,
            contracts_as_client,
            favorite_requests,
            favorite_providers,
            my_reviews,
            public_requests,
        })
    }

    // ── Writes ──
    //
    // Every mutation invalidates exactly the keys its backend effects touch,
    // so the next read refetches a consistent view.

    pub async fn create_request(&self, payload: &CreateRequest) -> Result<Request, ApiError> {
        let created = self.api.create_request(payload).await?;
        if let Some(user) = self.session.user_id() {
            self.cache.invalidate(&keys::my_requests(user)).await;
        }
        self.cache
            .invalidate_prefix(keys::public_requests_prefix())
            .await;
        Ok(created)
    }

    pub async fn delete_my_request(&self, request_id: Uuid) -> Result<(), ApiError> {
        self.api.delete_my_request(request_id).await?;
        if let Some(user) = self.session.user_id() {
            self.cache.invalidate(&keys::my_requests(user)).await;
        }
        self.cache
            .invalidate_prefix(keys::public_requests_prefix())
            .await;
        Ok(())
    }

    /// Accepting ripples: the offer decides, the request matches, a contract
    /// appears, and the request leaves the public listing.
    pub async fn accept_offer(&self, offer_id: Uuid) -> Result<AcceptedOffer, ApiError> {
        let accepted = self.api.accept_offer(offer_id).await?;
        if let Some(user) = self.session.user_id() {
            self.cache.invalidate(&keys::client_offers(user)).await;
            self.cache.invalidate(&keys::my_requests(user)).await;
            self.cache
                .invalidate(&keys::contracts(user, Role::Client))
                .await;
        }
        self.cache
            .invalidate_prefix(keys::public_requests_prefix())
            .await;
        Ok(accepted)
    }

    pub async fn decline_offer(&self, offer_id: Uuid) -> Result<DeclinedOffer, ApiError> {
        let declined = self.api.decline_offer(offer_id).await?;
        if let Some(user) = self.session.user_id() {
            self.cache.invalidate(&keys::client_offers(user)).await;
        }
        Ok(declined)
    }

    pub async fn confirm_contract(
        &self,
        contract_id: Uuid,
        payload: &ConfirmContract,
    ) -> Result<Contract, ApiError> {
        let contract = self.api.confirm_contract(contract_id, payload).await?;
        self.invalidate_contracts().await;
        Ok(contract)
    }

    pub async fn cancel_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError> {
        let contract = self.api.cancel_contract(contract_id).await?;
        self.invalidate_contracts().await;
        Ok(contract)
    }

    pub async fn complete_contract(&self, contract_id: Uuid) -> Result<Contract, ApiError> {
        let contract = self.api.complete_contract(contract_id).await?;
        self.invalidate_contracts().await;
        Ok(contract)
    }

    // Contract mutations can matter to either role view, invalidate both.
    async fn invalidate_contracts(&self) {
        if let Some(user) = self.session.user_id() {
            self.cache
                .invalidate(&keys::contracts(user, Role::Provider))
                .await;
            self.cache
                .invalidate(&keys::contracts(user, Role::Client))
                .await;
        }
    }
}
