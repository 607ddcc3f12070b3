use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What a favorite points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoriteKind {
    Request,
    Provider,
}

impl FavoriteKind {
    /// Wire/path segment, matching the serde value.
    pub fn as_str(self) -> &'static str {
        match self {
            FavoriteKind::Request => "request",
            FavoriteKind::Provider => "provider",
        }
    }
}

impl std::fmt::Display for FavoriteKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bookmark from the session owner to a request or a provider.
/// Add and remove are idempotent on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub kind: FavoriteKind,
    pub target_id: Uuid,
}
