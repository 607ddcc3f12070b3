use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Contract status, a lowercase string on the wire.
///
/// Created `Pending` atomically with offer acceptance. The client confirms
/// with a start time and duration; either party may cancel while the
/// contract is still `Pending` or `Confirmed`. `Completed` stamps
/// `completed_at` and is terminal, as is `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

/// The binding agreement formed when an offer is accepted.
/// Jointly visible to both parties; both may transition it per the state
/// rules in `lifecycle`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: Uuid,
    pub request_id: Uuid,
    pub offer_id: Uuid,
    pub provider_user_id: Uuid,
    pub client_user_id: Uuid,
    pub status: ContractStatus,
    pub start_at: Option<DateTime<Utc>>,
    pub duration_min: Option<i64>,
    pub price_amount: f64,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── DTOs ──

/// Body for the client's confirmation of a pending contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmContract {
    pub start_at: DateTime<Utc>,
    pub duration_min: i64,
    pub note: Option<String>,
}
