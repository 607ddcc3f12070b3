use async_trait::async_trait;

use crate::api::http::HttpApi;
use crate::error::ApiError;
use crate::models::{ClientProfile, ProviderProfile};

#[async_trait]
pub trait ProfilesApi: Send + Sync {
    /// None when the user has not onboarded as a provider.
    async fn get_provider_profile(&self) -> Result<Option<ProviderProfile>, ApiError>;

    /// None when the user has no client profile yet.
    async fn get_client_profile(&self) -> Result<Option<ClientProfile>, ApiError>;
}

#[async_trait]
impl ProfilesApi for HttpApi {
    async fn get_provider_profile(&self) -> Result<Option<ProviderProfile>, ApiError> {
        self.personal_get("/profiles/provider/me").await
    }

    async fn get_client_profile(&self) -> Result<Option<ClientProfile>, ApiError> {
        self.personal_get("/profiles/client/me").await
    }
}
