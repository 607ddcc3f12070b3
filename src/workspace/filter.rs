use serde::{Deserialize, Serialize};

use crate::models::{ContractStatus, OfferStatus, RequestStatus};

/// The three-way progress classification the status filter works in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterBucket {
    Open,
    InProgress,
    Completed,
}

/// User-selected status filter for workspace listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    InProgress,
    Completed,
}

impl StatusFilter {
    /// Whether an entity classified into `bucket` survives this filter.
    /// Unclassified entities (`None`) only survive `All`, which admits the
    /// raw listing untouched.
    pub fn admits(self, bucket: Option<FilterBucket>) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Open => bucket == Some(FilterBucket::Open),
            StatusFilter::InProgress => bucket == Some(FilterBucket::InProgress),
            StatusFilter::Completed => bucket == Some(FilterBucket::Completed),
        }
    }
}

/// Cancelled requests carry no bucket: they are neither live nor done, and
/// only the unfiltered view shows them.
pub fn request_bucket(status: RequestStatus) -> Option<FilterBucket> {
    match status {
        RequestStatus::Draft | RequestStatus::Published | RequestStatus::Paused => {
            Some(FilterBucket::Open)
        }
        RequestStatus::Matched => Some(FilterBucket::InProgress),
        RequestStatus::Closed => Some(FilterBucket::Completed),
        RequestStatus::Cancelled => None,
    }
}

/// Withdrawn offers drop out of every bucket, mirroring cancelled requests.
pub fn offer_bucket(status: OfferStatus) -> Option<FilterBucket> {
    match status {
        OfferStatus::Sent => Some(FilterBucket::Open),
        OfferStatus::Accepted => Some(FilterBucket::InProgress),
        OfferStatus::Declined => Some(FilterBucket::Completed),
        OfferStatus::Withdrawn => None,
    }
}

/// Contracts always classify. A cancelled contract stays under in-progress
/// rather than completed, so the completed view stays a record of delivered
/// work only.
pub fn contract_bucket(status: ContractStatus) -> FilterBucket {
    match status {
        ContractStatus::Pending | ContractStatus::Confirmed | ContractStatus::InProgress => {
            FilterBucket::InProgress
        }
        ContractStatus::Completed => FilterBucket::Completed,
        ContractStatus::Cancelled => FilterBucket::InProgress,
    }
}
