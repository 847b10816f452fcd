//! Lots API and its in-memory mock.
//!
//! Routes:
//! - `GET /lots` → all lots
//! - `POST /lots/<id>/favorite`, `POST /lots/<id>/unfavorite` → acknowledgement
//!
//! Anything else fails with [`ApiError::UnknownAddress`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures_util::future::{self, BoxFuture, FutureExt};

use crate::hash::StableHasher;

use super::error::ApiError;
use super::state::{Lot, LotId};

// =============================================================================
// Api trait
// =============================================================================

/// Asynchronous access to the lots backend.
pub trait Api: Send + Sync {
    /// Fetch a collection
    fn get(&self, path: &str) -> BoxFuture<'static, Result<Vec<Lot>, ApiError>>;

    /// Send a mutation
    fn post(&self, path: &str) -> BoxFuture<'static, Result<(), ApiError>>;
}

/// Kind of favorite mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mutation {
    Favorite,
    Unfavorite,
}

impl Mutation {
    /// Path segment of the mutation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorite => "favorite",
            Self::Unfavorite => "unfavorite",
        }
    }

    /// Endpoint path for a lot
    pub fn path(self, id: LotId) -> String {
        format!("/lots/{id}/{}", self.as_str())
    }

    /// Parse `/lots/<id>/<mutation>`
    pub fn parse_path(path: &str) -> Option<(LotId, Self)> {
        let rest = path.strip_prefix("/lots/")?;
        let (id, action) = rest.split_once('/')?;
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let id = id.parse().ok()?;
        match action {
            "favorite" => Some((id, Self::Favorite)),
            "unfavorite" => Some((id, Self::Unfavorite)),
            _ => None,
        }
    }
}

/// Fetch all lots
pub async fn fetch_lots(api: &dyn Api) -> Result<Vec<Lot>, ApiError> {
    api.get("/lots").await
}

/// Mark a lot as favorite
pub async fn favorite(api: &dyn Api, id: LotId) -> Result<(), ApiError> {
    api.post(&Mutation::Favorite.path(id)).await
}

/// Remove a lot from favorites
pub async fn unfavorite(api: &dyn Api, id: LotId) -> Result<(), ApiError> {
    api.post(&Mutation::Unfavorite.path(id)).await
}

// =============================================================================
// ApiConfig
// =============================================================================

/// Behavior of [`MockApi`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Delay before `GET` resolves. Default: 1s
    pub get_latency: Duration,
    /// Delay before `POST` resolves. Default: 500ms
    pub post_latency: Duration,
    /// Probability that a `GET` fails with a connection error. Default: 0.25
    pub failure_rate: f64,
    /// Probability that a `POST` is rejected. Default: 0.0
    pub mutation_failure_rate: f64,
    /// Seed for the failure rolls
    pub seed: u64,
    /// Lots served by `GET /lots`
    pub lots: Vec<Lot>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            get_latency: Duration::from_millis(1000),
            post_latency: Duration::from_millis(500),
            failure_rate: 0.25,
            mutation_failure_rate: 0.0,
            seed: 0,
            lots: default_lots(),
        }
    }
}

impl ApiConfig {
    /// Config that never fails, with the given latency for every request.
    pub fn reliable(latency: Duration) -> Self {
        Self {
            get_latency: latency,
            post_latency: latency,
            failure_rate: 0.0,
            ..Self::default()
        }
    }

    /// Replace the served lots.
    pub fn with_lots(mut self, lots: Vec<Lot>) -> Self {
        self.lots = lots;
        self
    }

    /// Set the fetch failure probability.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }

    /// Set the mutation failure probability.
    pub fn with_mutation_failure_rate(mut self, rate: f64) -> Self {
        self.mutation_failure_rate = rate;
        self
    }
}

/// The four lots of the demo storefront.
pub fn default_lots() -> Vec<Lot> {
    vec![
        Lot::new(1, "Apple", 16).with_favorite(true),
        Lot::new(2, "Orange", 41),
        Lot::new(3, "Mango", 45),
        Lot::new(4, "Potato", 33),
    ]
}

// =============================================================================
// MockApi
// =============================================================================

/// In-memory API with simulated latency and failures.
///
/// Requires a tokio runtime with the time driver.
#[derive(Debug)]
pub struct MockApi {
    config: ApiConfig,
    calls: AtomicU64,
}

impl MockApi {
    /// Create a mock API.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    /// Roll for a failure; each call advances the sequence.
    fn fails(&self, rate: f64, route: &str) -> bool {
        let n = self.calls.fetch_add(1, Ordering::Relaxed);
        if rate <= 0.0 {
            return false;
        }
        let roll = StableHasher::new()
            .update_u64(self.config.seed)
            .update_str(route)
            .update_u64(n)
            .finish_unit();
        roll < rate
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl Api for MockApi {
    fn get(&self, path: &str) -> BoxFuture<'static, Result<Vec<Lot>, ApiError>> {
        if path != "/lots" {
            log::warn!("GET {path}: unknown address");
            return future::ready(Err(ApiError::UnknownAddress(path.to_string()))).boxed();
        }

        let failed = self.fails(self.config.failure_rate, "get");
        let lots = self.config.lots.clone();
        let latency = self.config.get_latency;
        async move {
            tokio::time::sleep(latency).await;
            if failed {
                log::debug!("GET /lots: simulated connection error");
                Err(ApiError::Connection)
            } else {
                Ok(lots)
            }
        }
        .boxed()
    }

    fn post(&self, path: &str) -> BoxFuture<'static, Result<(), ApiError>> {
        if Mutation::parse_path(path).is_none() {
            log::warn!("POST {path}: unknown address");
            return future::ready(Err(ApiError::UnknownAddress(path.to_string()))).boxed();
        }

        let failed = self.fails(self.config.mutation_failure_rate, "post");
        let latency = self.config.post_latency;
        let path = path.to_string();
        async move {
            tokio::time::sleep(latency).await;
            if failed { Err(ApiError::Rejected(path)) } else { Ok(()) }
        }
        .boxed()
    }
}
