use async_trait::async_trait;
use uuid::Uuid;

use crate::api::http::HttpApi;
use crate::error::ApiError;
use crate::models::{CreateRequest, Page, PublicRequestsQuery, Request};

#[async_trait]
pub trait RequestsApi: Send + Sync {
    /// All requests the signed-in client has created, any status.
    async fn list_my_requests(&self) -> Result<Vec<Request>, ApiError>;

    async fn create_request(&self, payload: &CreateRequest) -> Result<Request, ApiError>;

    async fn delete_my_request(&self, request_id: Uuid) -> Result<(), ApiError>;

    /// Published requests visible to providers, filtered and paginated.
    async fn list_public_requests(
        &self,
        query: &PublicRequestsQuery,
    ) -> Result<Page<Request>, ApiError>;

    async fn get_public_request(&self, request_id: Uuid) -> Result<Request, ApiError>;
}

/// Canonical query string for the public request listing. The cache keys off
/// the same string, so parameter order here is load-bearing.
pub fn public_requests_query_string(query: &PublicRequestsQuery) -> String {
    let mut params = Vec::new();
    if let Some(service_key) = &query.service_key {
        params.push(format!("serviceKey={}", urlencoding::encode(service_key)));
    }
    if let Some(city_id) = query.city_id {
        params.push(format!("cityId={city_id}"));
    }
    params.push(format!("page={}", query.page()));
    params.push(format!("limit={}", query.limit()));
    params.join("&")
}

#[async_trait]
impl RequestsApi for HttpApi {
    async fn list_my_requests(&self) -> Result<Vec<Request>, ApiError> {
        self.personal_list("/requests/my").await
    }

    async fn create_request(&self, payload: &CreateRequest) -> Result<Request, ApiError> {
        self.post_json("/requests", payload).await
    }

    async fn delete_my_request(&self, request_id: Uuid) -> Result<(), ApiError> {
        self.delete(&format!("/requests/my/{request_id}")).await
    }

    async fn list_public_requests(
        &self,
        query: &PublicRequestsQuery,
    ) -> Result<Page<Request>, ApiError> {
        let path = format!("/requests/public?{}", public_requests_query_string(query));
        self.get_json(&path).await
    }

    async fn get_public_request(&self, request_id: Uuid) -> Result<Request, ApiError> {
        self.get_json(&format!("/requests/public/{request_id}")).await
    }
}
