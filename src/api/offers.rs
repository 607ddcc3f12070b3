use async_trait::async_trait;
use uuid::Uuid;

use crate::api::http::HttpApi;
use crate::error::ApiError;
use crate::models::{AcceptedOffer, CreateOffer, DeclinedOffer, Offer, UpdateOffer};

#[async_trait]
pub trait OffersApi: Send + Sync {
    /// Creates the provider's offer on a request. The backend enforces one
    /// live offer per provider per request and answers 409 on a duplicate.
    async fn create_offer(&self, payload: &CreateOffer) -> Result<Offer, ApiError>;

    /// Edits a still-undecided offer in place.
    async fn update_offer(
        &self,
        offer_id: Uuid,
        payload: &UpdateOffer,
    ) -> Result<Offer, ApiError>;

    /// Withdraws an offer. Only the sender may do this, and only while the
    /// offer is undecided.
    async fn delete_offer(&self, offer_id: Uuid) -> Result<(), ApiError>;

    /// Offers the signed-in user has sent as a provider, with the parent
    /// request fields the backend denormalizes onto each row.
    async fn list_my_provider_offers(&self) -> Result<Vec<Offer>, ApiError>;

    /// Offers other providers have sent on the signed-in client's requests.
    async fn list_my_client_offers(&self) -> Result<Vec<Offer>, ApiError>;

    async fn accept_offer(&self, offer_id: Uuid) -> Result<AcceptedOffer, ApiError>;

    async fn decline_offer(&self, offer_id: Uuid) -> Result<DeclinedOffer, ApiError>;
}

#[async_trait]
impl OffersApi for HttpApi {
    async fn create_offer(&self, payload: &CreateOffer) -> Result<Offer, ApiError> {
        self.post_json("/offers", payload).await
    }

    async fn update_offer(
        &self,
        offer_id: Uuid,
        payload: &UpdateOffer,
    ) -> Result<Offer, ApiError> {
        self.put_json(&format!("/offers/{offer_id}"), payload).await
    }

    async fn delete_offer(&self, offer_id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/offers/{offer_id}")).await
    }

    async fn list_my_provider_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.personal_list("/offers/my/provider").await
    }

    async fn list_my_client_offers(&self) -> Result<Vec<Offer>, ApiError> {
        self.personal_list("/offers/my/client").await
    }

    async fn accept_offer(&self, offer_id: Uuid) -> Result<AcceptedOffer, ApiError> {
        self.post_empty(&format!("/offers/{offer_id}/accept")).await
    }

    async fn decline_offer(&self, offer_id: Uuid) -> Result<DeclinedOffer, ApiError> {
        self.post_empty(&format!("/offers/{offer_id}/decline")).await
    }
}
