use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::CoreConfig;
use crate::error::ApiError;

/// HTTP implementation of the per-entity API traits, speaking JSON to the
/// marketplace backend. Cheap to clone, reqwest pools connections internally.
#[derive(Clone)]
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(config: &CoreConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            base_url: config.api_base_url.clone(),
            client,
            token: config.access_token.clone(),
        })
    }

    /// Replaces the bearer token, e.g. after a login or refresh.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    #[tracing::instrument(skip_all, fields(%method, path))]
    async fn send(
        &self,
        method: &'static str,
        path: &str,
        builder: RequestBuilder,
    ) -> Result<Response, ApiError> {
        let response = self.authorized(builder).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), "backend returned an error");
        Err(ApiError::from_status(status, &body))
    }

    // Decode through text so malformed payloads surface as ApiError::Decode
    // with the serde message instead of an opaque transport error.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .send("GET", path, self.client.get(self.url(path)))
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send("POST", path, self.client.post(self.url(path)).json(body))
            .await?;
        Self::decode(response).await
    }

    /// POST without a payload, for state-advancing endpoints like accept.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self
            .send("POST", path, self.client.post(self.url(path)))
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .send("PUT", path, self.client.put(self.url(path)).json(body))
            .await?;
        Self::decode(response).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send("DELETE", path, self.client.delete(self.url(path)))
            .await?;
        Ok(())
    }

    /// Personal listings degrade to empty instead of failing: the backend
    /// answers 403/404 when the caller lacks the role or owns nothing yet.
    pub(crate) async fn personal_list<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, ApiError> {
        match self.get_json(path).await {
            Ok(items) => Ok(items),
            Err(err) if err.is_empty_listing() => Ok(Vec::new()),
            Err(err) => Err(err),
        }
    }

    /// Single-resource fetches that may legitimately not exist yet.
    pub(crate) async fn personal_get<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, ApiError> {
        match self.get_json(path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_empty_listing() => Ok(None),
            Err(err) => Err(err),
        }
    }
}
