use serde::{Deserialize, Serialize};

use crate::models::Role;
use crate::workspace::filter::StatusFilter;

/// The six workspace tabs. Serialized kebab-case so the values double as
/// URL fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkspaceTab {
    #[default]
    NewOrders,
    MyRequests,
    MyOffers,
    CompletedJobs,
    Favorites,
    Reviews,
}

impl WorkspaceTab {
    pub const ALL: [WorkspaceTab; 6] = [
        WorkspaceTab::NewOrders,
        WorkspaceTab::MyRequests,
        WorkspaceTab::MyOffers,
        WorkspaceTab::CompletedJobs,
        WorkspaceTab::Favorites,
        WorkspaceTab::Reviews,
    ];

    /// URL fragment / wire value, matching the serde form.
    pub fn as_str(self) -> &'static str {
        match self {
            WorkspaceTab::NewOrders => "new-orders",
            WorkspaceTab::MyRequests => "my-requests",
            WorkspaceTab::MyOffers => "my-offers",
            WorkspaceTab::CompletedJobs => "completed-jobs",
            WorkspaceTab::Favorites => "favorites",
            WorkspaceTab::Reviews => "reviews",
        }
    }
}

/// Which of the two favorite collections the favorites tab shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoritesView {
    #[default]
    Requests,
    Providers,
}

/// Everything the workspace remembers about where the user is looking.
/// Serializable so a frontend can persist it across sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceState {
    pub active_tab: WorkspaceTab,
    pub status_filter: StatusFilter,
    pub favorites_view: FavoritesView,
    pub reviews_view: Role,
}

impl WorkspaceState {
    /// Switching tabs resets the status filter, each tab starts unfiltered.
    pub fn select_tab(&mut self, tab: WorkspaceTab) {
        if self.active_tab != tab {
            self.active_tab = tab;
            self.status_filter = StatusFilter::All;
        }
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.status_filter = filter;
    }

    pub fn set_favorites_view(&mut self, view: FavoritesView) {
        self.favorites_view = view;
    }

    pub fn set_reviews_view(&mut self, role: Role) {
        self.reviews_view = role;
    }
}
