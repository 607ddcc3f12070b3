use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use dotenv::dotenv;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use servicedesk_core::api::HttpApi;
use servicedesk_core::cache::QueryCache;
use servicedesk_core::config::CoreConfig;
use servicedesk_core::models::{Contract, PublicRequestsQuery};
use servicedesk_core::session::Session;
use servicedesk_core::stats::{self, priority};
use servicedesk_core::workspace::{
    FavoritesTab, TabView, Workspace, WorkspaceState, WorkspaceTab, derive,
};

/// Workspace snapshot: fetches the signed-in user's collections from a live
/// backend, derives every tab, runs the stats engine, and prints the result
/// as pretty JSON. A smoke test for the whole read path.
#[tokio::main]
async fn main() -> Result<(), servicedesk_core::ApiError> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = CoreConfig::from_env().expect("invalid configuration");
    let session = match &config.access_token {
        Some(token) => Session::from_token(token),
        None => Session::anonymous(),
    };
    match session.current_user() {
        Some(user) => tracing::info!(user = %user.id, "snapshotting workspace"),
        None => tracing::info!("no access token; personal tabs will be empty"),
    }

    let api = Arc::new(HttpApi::new(&config)?);
    let workspace = Workspace::new(api, QueryCache::new(), session.clone(), config.cache.clone());

    let data = workspace.load(&PublicRequestsQuery::default()).await?;

    // Every tab, derived from the same snapshot under the default filter.
    let mut tabs = serde_json::Map::new();
    for tab in WorkspaceTab::ALL {
        let state = WorkspaceState {
            active_tab: tab,
            ..WorkspaceState::default()
        };
        let summary = match derive(&data, &state) {
            TabView::NewOrders { page, items } => json!({
                "shown": items.len(),
                "totalPublic": page.total,
            }),
            TabView::MyRequests(items) => json!({ "shown": items.len() }),
            TabView::MyOffers(cards) => json!({
                "shown": cards.len(),
                "synthesizedParents": cards.iter().filter(|c| c.synthesized).count(),
            }),
            TabView::CompletedJobs(contracts) => json!({ "shown": contracts.len() }),
            TabView::Favorites(FavoritesTab::Requests(items)) => json!({
                "view": "requests",
                "shown": items.len(),
            }),
            TabView::Favorites(FavoritesTab::Providers(items)) => json!({
                "view": "providers",
                "shown": items.len(),
            }),
            TabView::Reviews(cards) => json!({ "shown": cards.len() }),
        };
        tabs.insert(tab.as_str().to_string(), summary);
    }

    // Both contract roles feed the completion series; dedup shared rows.
    let mut seen = HashSet::new();
    let contracts: Vec<Contract> = data
        .contracts_as_provider
        .iter()
        .chain(data.contracts_as_client.iter())
        .filter(|c| seen.insert(c.id))
        .cloned()
        .collect();

    let provider_profile = workspace.provider_profile().await?;
    let client_profile = workspace.client_profile().await?;
    let provider_completeness = provider_profile
        .as_ref()
        .map(stats::provider_completeness)
        .unwrap_or(0);
    let client_completeness = client_profile
        .as_ref()
        .map(stats::client_completeness)
        .unwrap_or(0);

    let scores = priority::dashboard_priority(
        provider_completeness,
        priority::provider_activity(&data.my_offers, &data.contracts_as_provider),
        client_completeness,
        priority::client_activity(&data.my_requests, &data.contracts_as_client),
    );

    let now = Utc::now();
    let completed_series = stats::contract_completion_series(&contracts, now);
    let snapshot = json!({
        "user": session.current_user(),
        "primaryDashboard": scores.primary,
        "scores": {
            "provider": scores.provider_score,
            "client": scores.client_score,
        },
        "tabs": tabs,
        "insights": {
            "acceptanceRatePct": stats::acceptance_rate(&data.my_offers),
            "avgResponseMinutes": stats::avg_response_minutes(&data.my_offers),
            "completedByMonth": completed_series,
            "completedVsLastMonth": stats::series_mom_delta(&completed_series).to_string(),
            "requestsByMonth": stats::request_creation_series(&data.my_requests, now),
            "providerCompleteness": provider_completeness,
            "clientCompleteness": client_completeness,
        },
    });

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
