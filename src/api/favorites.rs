use async_trait::async_trait;
use uuid::Uuid;

use crate::api::http::HttpApi;
use crate::error::ApiError;
use crate::models::{FavoriteKind, ProviderProfile, Request};

#[async_trait]
pub trait FavoritesApi: Send + Sync {
    /// Resolved request cards for everything the user has starred.
    async fn list_favorite_requests(&self) -> Result<Vec<Request>, ApiError>;

    /// Resolved provider cards for everything the user has starred.
    async fn list_favorite_providers(&self) -> Result<Vec<ProviderProfile>, ApiError>;

    /// Both mutations are idempotent on the backend: re-adding an existing
    /// favorite or removing a missing one succeeds without effect.
    async fn add_favorite(&self, kind: FavoriteKind, target_id: Uuid) -> Result<(), ApiError>;

    async fn remove_favorite(&self, kind: FavoriteKind, target_id: Uuid) -> Result<(), ApiError>;
}

#[async_trait]
impl FavoritesApi for HttpApi {
    async fn list_favorite_requests(&self) -> Result<Vec<Request>, ApiError> {
        self.personal_list("/favorites/requests").await
    }

    async fn list_favorite_providers(&self) -> Result<Vec<ProviderProfile>, ApiError> {
        self.personal_list("/favorites/providers").await
    }

    async fn add_favorite(&self, kind: FavoriteKind, target_id: Uuid) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .post_empty(&format!("/favorites/{kind}/{target_id}"))
            .await?;
        Ok(())
    }

    async fn remove_favorite(&self, kind: FavoriteKind, target_id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/favorites/{kind}/{target_id}")).await
    }
}
