use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A provider's public profile. The fields mirror what the profile
/// completeness score weighs, plus enough identity for favorite listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub city_id: Option<i64>,
    pub service_keys: Vec<String>,
    pub base_price: Option<f64>,
    pub company_name: Option<String>,
    pub vat_id: Option<String>,
    pub is_active: bool,
    pub is_blocked: bool,
    pub created_at: DateTime<Utc>,
}

/// The client-side account profile used for the client completeness score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientProfile {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub city_id: Option<i64>,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub privacy_accepted: bool,
    pub client_profile_linked: bool,
    pub created_at: DateTime<Utc>,
}
