pub mod contracts;
pub mod favorites;
pub mod offers;
pub mod profiles;
pub mod requests;
pub mod reviews;

use serde::{Deserialize, Serialize};

pub use contracts::{ConfirmContract, Contract, ContractStatus};
pub use favorites::{Favorite, FavoriteKind};
pub use offers::{AcceptedOffer, CreateOffer, DeclinedOffer, Offer, OfferStatus, UpdateOffer};
pub use profiles::{ClientProfile, ProviderProfile};
pub use requests::{CreateRequest, PublicRequestsQuery, Request, RequestStatus};
pub use reviews::Review;

/// Which side of the marketplace a user is acting as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Provider,
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Provider => "provider",
            Role::Client => "client",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a public listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            limit: 20,
        }
    }
}
