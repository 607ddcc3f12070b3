//! The collaborator boundary: what the marketplace backend exposes to this
//! core, one trait per entity so tests can substitute an in-memory fake.
//! `api::http::HttpApi` is the production implementation.

pub mod contracts;
pub mod favorites;
pub mod http;
pub mod offers;
pub mod profiles;
pub mod requests;
pub mod reviews;

pub use contracts::ContractsApi;
pub use favorites::FavoritesApi;
pub use http::HttpApi;
pub use offers::OffersApi;
pub use profiles::ProfilesApi;
pub use requests::RequestsApi;
pub use reviews::ReviewsApi;

/// The whole backend surface the core consumes. Blanket-implemented, so any
/// type implementing the per-entity traits qualifies.
pub trait MarketplaceApi:
    RequestsApi + OffersApi + ContractsApi + FavoritesApi + ReviewsApi + ProfilesApi
{
}

impl<T> MarketplaceApi for T where
    T: RequestsApi + OffersApi + ContractsApi + FavoritesApi + ReviewsApi + ProfilesApi
{
}
