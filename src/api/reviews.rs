use async_trait::async_trait;

use crate::api::http::HttpApi;
use crate::error::ApiError;
use crate::models::Review;

#[async_trait]
pub trait ReviewsApi: Send + Sync {
    /// Reviews written about the signed-in user, in either role.
    async fn list_my_reviews(&self) -> Result<Vec<Review>, ApiError>;
}

#[async_trait]
impl ReviewsApi for HttpApi {
    async fn list_my_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.personal_list("/reviews/my").await
    }
}
