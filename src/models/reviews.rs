use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

/// A rating left on a completed contract.
///
/// `target_role` records which side of the contract the reviewed user was
/// on, which is what the workspace reviews tab partitions by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub contract_id: Uuid,
    pub author_user_id: Uuid,
    pub target_user_id: Uuid,
    pub target_role: Role,
    pub rating: i32,
    pub comment: Option<String>,
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
}
