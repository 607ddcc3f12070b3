//! The offer sheet's state machine: form, validation, exactly-one
//! create-or-update submission, conflict recovery, withdraw.
//!
//! State lives behind an `Arc<RwLock<_>>` handle so readers (a rendering
//! frontend) and the detached settlement task share it. Mutations run to
//! completion even if every handle is dropped mid-flight; settlement then
//! finds no state left to touch and only the backend write remains.

use std::sync::{Arc, Weak};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::api::OffersApi;
use crate::cache::{QueryCache, keys};
use crate::error::ApiError;
use crate::lifecycle::offer_is_editable;
use crate::models::{CreateOffer, Offer, Request, UpdateOffer};
use crate::notify::Notifier;
use crate::session::Session;

/// Prefill when the request names no suggested price.
pub const DEFAULT_OFFER_AMOUNT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// Editing. The only state submissions may leave from.
    Form,
    /// A create or update is outstanding; resubmits are ignored.
    Submitting,
    /// Create confirmed (or conflict recovered). Shows the confirmation.
    Success,
    /// Submission failed; `acknowledge_error` returns to the form.
    Error,
    /// Sheet dismissed, nothing outstanding.
    Closed,
}

/// Raw form fields as the user typed them. Amount stays a string until
/// validation so the form can hold intermediate garbage without losing it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferForm {
    pub amount: String,
    pub message: String,
    pub availability: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created,
    Updated,
    /// Backend said 409: an offer already exists for this pair. Treated as
    /// success, the confirmation marks it "already responded".
    AlreadyResponded,
    /// Local validation failed; still on the form, nothing was sent.
    Invalid,
    /// Not in `Form` (usually a resubmit while one is outstanding).
    Busy,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawOutcome {
    Withdrawn,
    /// No offer, or the offer is already decided.
    NotWithdrawable,
    Busy,
    Failed,
}

struct FlowInner {
    state: FlowState,
    form: OfferForm,
    inline_error: Option<String>,
    existing: Option<Offer>,
    request: Option<Request>,
    already_responded: bool,
}

pub struct OfferFlow<A> {
    api: Arc<A>,
    cache: QueryCache,
    notifier: Notifier,
    session: Session,
    inner: Arc<RwLock<FlowInner>>,
}

impl<A> Clone for OfferFlow<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
            session: self.session.clone(),
            inner: Arc::clone(&self.inner),
        }
    }
}

fn format_amount(value: f64) -> String {
    if value.trunc() == value {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

impl<A> OfferFlow<A>
where
    A: OffersApi + 'static,
{
    /// Opens the sheet for a new offer on `request`. Amount prefills from
    /// the request's suggested price, or the baseline when it has none.
    pub fn for_request(
        api: Arc<A>,
        cache: QueryCache,
        notifier: Notifier,
        session: Session,
        request: Request,
    ) -> Self {
        let form = OfferForm {
            amount: format_amount(request.price.unwrap_or(DEFAULT_OFFER_AMOUNT)),
            ..OfferForm::default()
        };
        Self::with_inner(api, cache, notifier, session, form, None, Some(request))
    }

    /// Opens the sheet to edit an existing offer, fields prefilled from it.
    pub fn for_offer(
        api: Arc<A>,
        cache: QueryCache,
        notifier: Notifier,
        session: Session,
        offer: Offer,
    ) -> Self {
        let form = OfferForm {
            amount: format_amount(offer.amount),
            message: offer.message.clone().unwrap_or_default(),
            availability: offer.availability.clone().unwrap_or_default(),
        };
        Self::with_inner(api, cache, notifier, session, form, Some(offer), None)
    }

    fn with_inner(
        api: Arc<A>,
        cache: QueryCache,
        notifier: Notifier,
        session: Session,
        form: OfferForm,
        existing: Option<Offer>,
        request: Option<Request>,
    ) -> Self {
        Self {
            api,
            cache,
            notifier,
            session,
            inner: Arc::new(RwLock::new(FlowInner {
                state: FlowState::Form,
                form,
                inline_error: None,
                existing,
                request,
                already_responded: false,
            })),
        }
    }

    // ── Snapshots ──

    pub async fn state(&self) -> FlowState {
        self.inner.read().await.state
    }

    pub async fn form(&self) -> OfferForm {
        self.inner.read().await.form.clone()
    }

    pub async fn inline_error(&self) -> Option<String> {
        self.inner.read().await.inline_error.clone()
    }

    pub async fn already_responded(&self) -> bool {
        self.inner.read().await.already_responded
    }

    pub async fn existing_offer(&self) -> Option<Offer> {
        self.inner.read().await.existing.clone()
    }

    // ── Form edits ──

    pub async fn set_amount(&self, amount: impl Into<String>) {
        self.inner.write().await.form.amount = amount.into();
    }

    pub async fn set_message(&self, message: impl Into<String>) {
        self.inner.write().await.form.message = message.into();
    }

    pub async fn set_availability(&self, availability: impl Into<String>) {
        self.inner.write().await.form.availability = availability.into();
    }

    // ── Transitions ──

    /// Validates and issues exactly one create or update. Resubmission
    /// while one is outstanding is ignored.
    pub async fn submit(&self) -> SubmitOutcome {
        // Decide everything under one lock, then release before the network.
        let (payload, was_update) = {
            let mut inner = self.inner.write().await;
            if inner.state != FlowState::Form {
                return SubmitOutcome::Busy;
            }
            let amount = match inner.form.amount.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => v,
                _ => {
                    inner.inline_error =
                        Some(String::from("Enter an amount greater than zero."));
                    return SubmitOutcome::Invalid;
                }
            };
            let message = non_empty(&inner.form.message);
            let availability = non_empty(&inner.form.availability);
            let payload = match (&inner.existing, &inner.request) {
                (Some(offer), _) => Payload::Update(
                    offer.id,
                    UpdateOffer {
                        amount,
                        message,
                        availability,
                    },
                ),
                (None, Some(request)) => Payload::Create(CreateOffer {
                    request_id: request.id,
                    amount,
                    message,
                    availability,
                }),
                (None, None) => {
                    inner.inline_error = Some(String::from("Nothing to submit."));
                    return SubmitOutcome::Invalid;
                }
            };
            inner.inline_error = None;
            inner.state = FlowState::Submitting;
            let was_update = matches!(payload, Payload::Update(..));
            (payload, was_update)
        };

        let api = Arc::clone(&self.api);
        let cache = self.cache.clone();
        let notifier = self.notifier.clone();
        let user = self.session.user_id();
        let inner = Arc::downgrade(&self.inner);
        let outcome = tokio::spawn(async move {
            let result = match payload {
                Payload::Create(create) => api.create_offer(&create).await,
                Payload::Update(id, update) => api.update_offer(id, &update).await,
            };
            settle_submit(result, was_update, inner, cache, notifier, user).await
        });

        outcome.await.unwrap_or(SubmitOutcome::Failed)
    }

    /// Error screen acknowledged, back to the form for a manual retry.
    pub async fn acknowledge_error(&self) {
        let mut inner = self.inner.write().await;
        if inner.state == FlowState::Error {
            inner.state = FlowState::Form;
        }
    }

    /// Deletes the still-undecided offer and clears the form.
    pub async fn withdraw(&self) -> WithdrawOutcome {
        let offer_id = {
            let mut inner = self.inner.write().await;
            match inner.state {
                FlowState::Submitting => return WithdrawOutcome::Busy,
                FlowState::Form | FlowState::Success | FlowState::Error | FlowState::Closed => {}
            }
            let Some(offer) = &inner.existing else {
                return WithdrawOutcome::NotWithdrawable;
            };
            if !offer_is_editable(offer.status) {
                return WithdrawOutcome::NotWithdrawable;
            }
            let id = offer.id;
            inner.state = FlowState::Submitting;
            id
        };

        let api = Arc::clone(&self.api);
        let cache = self.cache.clone();
        let notifier = self.notifier.clone();
        let user = self.session.user_id();
        let inner = Arc::downgrade(&self.inner);
        let outcome = tokio::spawn(async move {
            match api.delete_offer(offer_id).await {
                Ok(()) => {
                    invalidate_offer_caches(&cache, user).await;
                    if let Some(inner) = inner.upgrade() {
                        let mut inner = inner.write().await;
                        inner.existing = None;
                        inner.form = OfferForm::default();
                        inner.inline_error = None;
                        inner.state = FlowState::Closed;
                    }
                    WithdrawOutcome::Withdrawn
                }
                Err(err) => {
                    tracing::warn!(error = %err, %offer_id, "offer withdraw failed");
                    notifier.error(err.user_message());
                    if let Some(inner) = inner.upgrade() {
                        inner.write().await.state = FlowState::Form;
                    }
                    WithdrawOutcome::Failed
                }
            }
        });

        outcome.await.unwrap_or(WithdrawOutcome::Failed)
    }

    /// Dismisses the sheet. Purely local: an existing offer is only deleted
    /// through `withdraw`, never by closing.
    pub async fn close(&self) {
        let mut inner = self.inner.write().await;
        if inner.state != FlowState::Submitting {
            inner.state = FlowState::Closed;
        }
    }
}

enum Payload {
    Create(CreateOffer),
    Update(Uuid, UpdateOffer),
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Everything the provider-side workspace and profile surfaces derive from
/// changes when an offer lands.
async fn invalidate_offer_caches(cache: &QueryCache, user: Option<Uuid>) {
    if let Some(user) = user {
        cache.invalidate(&keys::provider_offers(user)).await;
        cache.invalidate(&keys::offer_parents(user)).await;
        cache.invalidate(&keys::provider_profile(user)).await;
    }
}

async fn settle_submit(
    result: Result<Offer, ApiError>,
    was_update: bool,
    inner: Weak<RwLock<FlowInner>>,
    cache: QueryCache,
    notifier: Notifier,
    user: Option<Uuid>,
) -> SubmitOutcome {
    match result {
        Ok(offer) => {
            invalidate_offer_caches(&cache, user).await;
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.write().await;
                inner.existing = Some(offer);
                // Editing is low ceremony: updates skip the confirmation.
                inner.state = if was_update {
                    FlowState::Closed
                } else {
                    FlowState::Success
                };
            }
            if was_update {
                SubmitOutcome::Updated
            } else {
                SubmitOutcome::Created
            }
        }
        Err(err) if err.is_conflict() => {
            invalidate_offer_caches(&cache, user).await;
            if let Some(inner) = inner.upgrade() {
                let mut inner = inner.write().await;
                inner.already_responded = true;
                inner.state = FlowState::Success;
            }
            SubmitOutcome::AlreadyResponded
        }
        Err(err) => {
            tracing::warn!(error = %err, "offer submission failed");
            notifier.error(err.user_message());
            if let Some(inner) = inner.upgrade() {
                inner.write().await.state = FlowState::Error;
            }
            SubmitOutcome::Failed
        }
    }
}
