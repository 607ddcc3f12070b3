//! Optimistic favorite toggling with rollback.
//!
//! The coordinator owns the local favorite set a frontend renders star
//! states from. `toggle` flips the set immediately, runs the network call
//! on a detached task, and settles afterwards: invalidate the favorites
//! cache on success, revert the flip and raise a notice on failure. At most
//! one mutation per target is in flight at a time.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::api::FavoritesApi;
use crate::cache::{QueryCache, keys};
use crate::models::FavoriteKind;
use crate::notify::Notifier;
use crate::session::{Session, login_redirect};

/// What a toggle call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The set was flipped and the mutation settled. `now_favorited` is the
    /// state after settlement, so a rolled-back toggle reports the old value.
    Applied { now_favorited: bool },
    /// A mutation for this target is already running, nothing was done.
    AlreadyInFlight,
    /// Caller is signed out; send them here and retry after login.
    LoginRequired { redirect: String },
}

#[derive(Default)]
struct FavoritesState {
    set: RwLock<HashSet<(FavoriteKind, Uuid)>>,
    in_flight: Mutex<HashSet<(FavoriteKind, Uuid)>>,
}

pub struct FavoriteToggleCoordinator<A> {
    api: Arc<A>,
    cache: QueryCache,
    notifier: Notifier,
    session: Session,
    login_path: String,
    return_path: Arc<RwLock<String>>,
    state: Arc<FavoritesState>,
}

impl<A> Clone for FavoriteToggleCoordinator<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: self.cache.clone(),
            notifier: self.notifier.clone(),
            session: self.session.clone(),
            login_path: self.login_path.clone(),
            return_path: Arc::clone(&self.return_path),
            state: Arc::clone(&self.state),
        }
    }
}

impl<A> FavoriteToggleCoordinator<A>
where
    A: FavoritesApi + 'static,
{
    pub fn new(
        api: Arc<A>,
        cache: QueryCache,
        notifier: Notifier,
        session: Session,
        login_path: impl Into<String>,
    ) -> Self {
        Self {
            api,
            cache,
            notifier,
            session,
            login_path: login_path.into(),
            return_path: Arc::new(RwLock::new(String::from("/"))),
            state: Arc::new(FavoritesState::default()),
        }
    }

    /// Where a signed-out user should land after logging in, usually the
    /// page the star lives on.
    pub async fn set_return_path(&self, path: impl Into<String>) {
        *self.return_path.write().await = path.into();
    }

    /// Replaces the local entries of one kind with the server's truth,
    /// called after the favorites listings load.
    pub async fn seed(&self, kind: FavoriteKind, ids: impl IntoIterator<Item = Uuid>) {
        let mut set = self.state.set.write().await;
        set.retain(|(k, _)| *k != kind);
        set.extend(ids.into_iter().map(|id| (kind, id)));
    }

    pub async fn is_favorited(&self, kind: FavoriteKind, target_id: Uuid) -> bool {
        self.state.set.read().await.contains(&(kind, target_id))
    }

    pub async fn toggle(&self, kind: FavoriteKind, target_id: Uuid) -> ToggleOutcome {
        // 1. Signed-out callers get a login redirect, not an error.
        let Some(user) = self.session.user_id() else {
            let return_to = self.return_path.read().await;
            return ToggleOutcome::LoginRequired {
                redirect: login_redirect(&self.login_path, &return_to),
            };
        };

        // 2. One mutation per target. A second click while the first is in
        //    flight is dropped silently.
        {
            let mut in_flight = self.state.in_flight.lock().await;
            if !in_flight.insert((kind, target_id)) {
                return ToggleOutcome::AlreadyInFlight;
            }
        }

        // 3. Optimistic flip before the network call.
        let was_favorited = {
            let mut set = self.state.set.write().await;
            if set.remove(&(kind, target_id)) {
                true
            } else {
                set.insert((kind, target_id));
                false
            }
        };

        // 4. The mutation runs detached so it completes even if the caller
        //    is dropped mid-await. The task holds the state only weakly: if
        //    the coordinator is gone by settlement time there is nothing
        //    left to revert or unlock, and the task must not resurrect it.
        let api = Arc::clone(&self.api);
        let cache = self.cache.clone();
        let notifier = self.notifier.clone();
        let state = Arc::downgrade(&self.state);
        let settled = tokio::spawn(async move {
            let result = if was_favorited {
                api.remove_favorite(kind, target_id).await
            } else {
                api.add_favorite(kind, target_id).await
            };
            let now_favorited = match result {
                Ok(()) => {
                    cache.invalidate(&keys::favorites(user, kind)).await;
                    !was_favorited
                }
                Err(err) => {
                    tracing::warn!(error = %err, kind = %kind, %target_id, "favorite toggle failed, rolling back");
                    if let Some(state) = state.upgrade() {
                        let mut set = state.set.write().await;
                        if was_favorited {
                            set.insert((kind, target_id));
                        } else {
                            set.remove(&(kind, target_id));
                        }
                    }
                    notifier.error(err.user_message());
                    was_favorited
                }
            };
            if let Some(state) = state.upgrade() {
                state.in_flight.lock().await.remove(&(kind, target_id));
            }
            now_favorited
        });

        let now_favorited = settled.await.unwrap_or(was_favorited);
        ToggleOutcome::Applied { now_favorited }
    }
}
