use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::requests::RequestStatus;

/// Offer status, a lowercase string on the wire.
///
/// `Accepted` and `Declined` are terminal by the client's decision;
/// `Withdrawn` is terminal by the provider's own cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Sent,
    Accepted,
    Declined,
    Withdrawn,
}

/// A provider's priced bid on a request.
///
/// At most one offer per (provider, request) pair may be `Sent` at a time;
/// the backend answers 409 on a duplicate and the flow treats a repeat
/// submission as an edit.
///
/// The `service_key`/`city_id`/`preferred_date`/`request_status` fields are
/// denormalized copies of the parent request, present so the workspace can
/// still render a card when the parent fails to resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: Uuid,
    pub request_id: Uuid,
    pub provider_user_id: Uuid,
    pub client_user_id: Uuid,
    pub amount: f64,
    pub message: Option<String>,
    pub availability: Option<String>,
    pub status: OfferStatus,
    pub service_key: Option<String>,
    pub city_id: Option<i64>,
    pub preferred_date: Option<DateTime<Utc>>,
    pub request_status: Option<RequestStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── DTOs ──

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOffer {
    pub request_id: Uuid,
    pub amount: f64,
    pub message: Option<String>,
    pub availability: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOffer {
    pub amount: f64,
    pub message: Option<String>,
    pub availability: Option<String>,
}

/// Answer to `accept_offer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedOffer {
    pub accepted_offer_id: Uuid,
}

/// Answer to `decline_offer`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclinedOffer {
    pub rejected_offer_id: Uuid,
}
