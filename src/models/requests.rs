use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request status, a lowercase string on the wire.
///
/// `Matched` is reached exactly when one of the request's offers is accepted.
/// `Closed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Draft,
    Published,
    Paused,
    Matched,
    Closed,
    Cancelled,
}

/// A client's posted job. Only the owning client may mutate it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: Uuid,
    pub client_id: Uuid,
    pub service_key: String,
    pub city_id: i64,
    pub preferred_date: DateTime<Utc>,
    pub price: Option<f64>,
    pub is_recurring: bool,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

// ── DTOs ──

/// Body for creating a request. The owning client comes from the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub service_key: String,
    pub city_id: i64,
    pub preferred_date: DateTime<Utc>,
    pub price: Option<f64>,
    pub is_recurring: bool,
}

/// Query for browsing public published requests (the provider's job feed).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicRequestsQuery {
    pub service_key: Option<String>,
    pub city_id: Option<i64>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PublicRequestsQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).min(100)
    }
}
