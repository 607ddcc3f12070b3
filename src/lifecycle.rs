//! Transition rules for the three status machines, as the client observes
//! them. These are the single source of truth: the UI uses them to gate
//! actions, and the in-memory test backend executes them.
//!
//! Every function matches exhaustively on its status enum, so adding a
//! status variant fails compilation here instead of falling into a default
//! bucket somewhere downstream.

use crate::models::{ContractStatus, OfferStatus, RequestStatus};

/// Legal request transitions. `Matched` is reached exactly when one of the
/// request's offers is accepted; `Closed`/`Cancelled` are terminal.
pub fn request_transition_allowed(from: RequestStatus, to: RequestStatus) -> bool {
    use RequestStatus::*;
    match from {
        Draft => matches!(to, Published | Cancelled),
        Published => matches!(to, Paused | Matched | Closed | Cancelled),
        Paused => matches!(to, Published | Closed | Cancelled),
        Matched => matches!(to, Closed | Cancelled),
        Closed => false,
        Cancelled => false,
    }
}

pub fn request_is_terminal(status: RequestStatus) -> bool {
    use RequestStatus::*;
    match status {
        Draft | Published | Paused | Matched => false,
        Closed | Cancelled => true,
    }
}

/// Legal offer transitions. Only a `Sent` offer is still in play: the client
/// may accept or decline it, the provider may withdraw it.
pub fn offer_transition_allowed(from: OfferStatus, to: OfferStatus) -> bool {
    use OfferStatus::*;
    match from {
        Sent => matches!(to, Accepted | Declined | Withdrawn),
        Accepted | Declined | Withdrawn => false,
    }
}

/// Whether the client has already decided on this offer.
pub fn offer_is_decided(status: OfferStatus) -> bool {
    use OfferStatus::*;
    match status {
        Accepted | Declined => true,
        Sent | Withdrawn => false,
    }
}

/// The provider may edit or withdraw an offer only while it is undecided.
pub fn offer_is_editable(status: OfferStatus) -> bool {
    use OfferStatus::*;
    match status {
        Sent => true,
        Accepted | Declined | Withdrawn => false,
    }
}

/// Legal contract transitions. `InProgress` is entered by the backend when
/// the confirmed start time arrives; the client-visible moves are confirm,
/// cancel (only from `Pending`/`Confirmed`) and complete.
pub fn contract_transition_allowed(from: ContractStatus, to: ContractStatus) -> bool {
    use ContractStatus::*;
    match from {
        Pending => matches!(to, Confirmed | Cancelled),
        Confirmed => matches!(to, InProgress | Completed | Cancelled),
        InProgress => matches!(to, Completed),
        Completed => false,
        Cancelled => false,
    }
}

pub fn contract_is_terminal(status: ContractStatus) -> bool {
    use ContractStatus::*;
    match status {
        Pending | Confirmed | InProgress => false,
        Completed | Cancelled => true,
    }
}

/// A contract that still needs somebody's attention (not yet settled).
pub fn contract_is_active(status: ContractStatus) -> bool {
    !contract_is_terminal(status)
}

pub fn contract_can_confirm(status: ContractStatus) -> bool {
    contract_transition_allowed(status, ContractStatus::Confirmed)
}

pub fn contract_can_cancel(status: ContractStatus) -> bool {
    contract_transition_allowed(status, ContractStatus::Cancelled)
}

pub fn contract_can_complete(status: ContractStatus) -> bool {
    contract_transition_allowed(status, ContractStatus::Completed)
}

/// What accepting an offer implies for the surrounding records: the parent
/// request becomes `Matched` and a contract is created `Pending`. Competing
/// `Sent` offers stay `Sent` but are no longer actionable because the
/// request has left `Published`.
pub struct AcceptanceEffects {
    pub offer_status: OfferStatus,
    pub request_status: RequestStatus,
    pub new_contract_status: ContractStatus,
}

pub fn acceptance_effects() -> AcceptanceEffects {
    AcceptanceEffects {
        offer_status: OfferStatus::Accepted,
        request_status: RequestStatus::Matched,
        new_contract_status: ContractStatus::Pending,
    }
}

/// Whether a competing `Sent` offer can still be acted on, given its parent
/// request's status. Acceptance of a sibling moves the request out of
/// `Published`, which is what retires the rest of the field.
pub fn offer_is_actionable(offer: OfferStatus, parent: RequestStatus) -> bool {
    offer == OfferStatus::Sent && parent == RequestStatus::Published
}
