use moka::Expiry;
use moka::future::Cache;
use serde::{Serialize, de::DeserializeOwned};
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::models::{FavoriteKind, Role};

/// A cached query result plus the TTL it was stored with.
#[derive(Clone)]
struct CachedEntry {
    value: serde_json::Value,
    ttl: Duration,
}

/// Per-entry TTL policy: each entry expires `entry.ttl` after it was
/// written, regardless of reads.
struct PerEntryTtl;

impl Expiry<String, CachedEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(value.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        value: &CachedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process query cache for the entity collections the workspace reads.
///
/// Values are stored as JSON so one cache can hold every collection type;
/// readers get typed copies back through serde. Writers (the mutation paths)
/// invalidate exactly the keys they can affect; readers refetch on miss.
#[derive(Clone)]
pub struct QueryCache {
    inner: Cache<String, CachedEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        let inner = Cache::builder()
            .max_capacity(1_000)
            .expire_after(PerEntryTtl)
            .support_invalidation_closures()
            .build();
        Self { inner }
    }

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.inner.get(key).await?;
        match serde_json::from_value(entry.value) {
            Ok(value) => Some(value),
            Err(e) => {
                // A shape mismatch means the cached copy is from an older
                // build; drop it and let the caller refetch.
                tracing::warn!(key, error = %e, "dropping undeserializable cache entry");
                self.inner.invalidate(key).await;
                None
            }
        }
    }

    /// Store a value with a TTL. Serialization failures are logged and the
    /// entry is simply not cached; a fetch must never fail because caching
    /// did.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        match serde_json::to_value(value) {
            Ok(json) => {
                self.inner
                    .insert(key.to_string(), CachedEntry { value: json, ttl })
                    .await;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to serialize value for cache");
            }
        }
    }

    /// Drop a single key.
    pub async fn invalidate(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    /// Drop every key starting with `prefix`.
    pub async fn invalidate_prefix(&self, prefix: &str) {
        let prefix = prefix.to_string();
        // invalidate_entries_if runs the predicate lazily against all keys.
        let _ = self
            .inner
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix));
    }

    /// Check if a key currently has a live entry.
    pub async fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache key generators. A key names the query it caches, scoped by the user
/// whose data it is.
pub mod keys {
    use super::*;

    /// The session owner's posted requests.
    pub fn my_requests(user: Uuid) -> String {
        format!("user:{user}:requests")
    }

    /// Offers the session owner sent as a provider.
    pub fn provider_offers(user: Uuid) -> String {
        format!("user:{user}:offers:provider")
    }

    /// Offers received on the session owner's requests.
    pub fn client_offers(user: Uuid) -> String {
        format!("user:{user}:offers:client")
    }

    /// Resolved parent requests for the session owner's provider offers.
    pub fn offer_parents(user: Uuid) -> String {
        format!("user:{user}:offers:parents")
    }

    /// Contracts where the session owner plays `role`.
    pub fn contracts(user: Uuid, role: Role) -> String {
        format!("user:{user}:contracts:{role}")
    }

    /// The session owner's favorites of one kind.
    pub fn favorites(user: Uuid, kind: FavoriteKind) -> String {
        format!("user:{user}:favorites:{kind}")
    }

    /// Reviews about the session owner.
    pub fn my_reviews(user: Uuid) -> String {
        format!("user:{user}:reviews")
    }

    /// The session owner's provider profile.
    pub fn provider_profile(user: Uuid) -> String {
        format!("user:{user}:profile:provider")
    }

    /// The session owner's client profile.
    pub fn client_profile(user: Uuid) -> String {
        format!("user:{user}:profile:client")
    }

    /// One page of the public request feed.
    pub fn public_requests(filters: &str) -> String {
        format!("public:requests:{filters}")
    }

    /// Prefix for every public request page (for wholesale invalidation).
    pub fn public_requests_prefix() -> &'static str {
        "public:requests:"
    }
}

/// Cache TTL configuration.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub requests_ttl: Duration,
    pub offers_ttl: Duration,
    pub contracts_ttl: Duration,
    pub favorites_ttl: Duration,
    pub reviews_ttl: Duration,
    pub profile_ttl: Duration,
    pub public_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            requests_ttl: Duration::from_secs(120),
            offers_ttl: Duration::from_secs(120),
            contracts_ttl: Duration::from_secs(120),
            favorites_ttl: Duration::from_secs(300),
            reviews_ttl: Duration::from_secs(600),
            profile_ttl: Duration::from_secs(600),
            public_ttl: Duration::from_secs(60),
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            requests_ttl: parse_duration_secs("CACHE_TTL_REQUESTS", 120),
            offers_ttl: parse_duration_secs("CACHE_TTL_OFFERS", 120),
            contracts_ttl: parse_duration_secs("CACHE_TTL_CONTRACTS", 120),
            favorites_ttl: parse_duration_secs("CACHE_TTL_FAVORITES", 300),
            reviews_ttl: parse_duration_secs("CACHE_TTL_REVIEWS", 600),
            profile_ttl: parse_duration_secs("CACHE_TTL_PROFILES", 600),
            public_ttl: parse_duration_secs("CACHE_TTL_PUBLIC", 60),
        }
    }
}

fn parse_duration_secs(env_var: &str, default: u64) -> Duration {
    std::env::var(env_var)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default))
}
