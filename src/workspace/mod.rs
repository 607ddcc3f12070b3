//! The workspace: cached entity collections, the status filter model, and
//! the pure per-tab derivation on top of them.

pub mod derive;
pub mod filter;
pub mod state;
pub mod store;

pub use derive::{
    FavoritesTab, OfferCard, ReviewCard, TabView, WorkspaceData, derive, offer_cards,
    resolve_favorites_view, synthesize_request,
};
pub use filter::{FilterBucket, StatusFilter, contract_bucket, offer_bucket, request_bucket};
pub use state::{FavoritesView, WorkspaceState, WorkspaceTab};
pub use store::Workspace;
