//! Active behavior registry and request dispatch.
//!
//! # Responsibilities
//! - Hold the currently published behavior set
//! - Match requests by method and exact path, first declaration wins
//! - Consume repeat budgets and retire exhausted behaviors
//! - Swap in a freshly compiled set on reload
//!
//! # Design Decisions
//! - The active set sits behind `ArcSwap`: a dispatch works on one snapshot
//!   and never sees a half-installed set
//! - The route list of a snapshot is behind a `RwLock`; lookups share the read
//!   side, only retiring an exhausted route takes the write side
//! - Budget consumption is a CAS on the route itself, so exactly one request
//!   observes the last unit and performs the removal

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::{Method, StatusCode};
use parking_lot::RwLock;
use serde::Serialize;

use crate::behavior::{Behavior, BehaviorSet, HttpMethod, ResponseBehavior};
use crate::observability::metrics;
use crate::routing::budget::{Grant, RepeatBudget};

/// One behavior as served: immutable response plus a live budget.
#[derive(Debug)]
pub struct Route {
    pub method: HttpMethod,
    pub url: String,
    pub response: Arc<ResponseBehavior>,
    budget: RepeatBudget,
}

impl Route {
    fn from_behavior(behavior: Behavior) -> Self {
        Self {
            method: behavior.method,
            url: behavior.url,
            response: Arc::new(behavior.response),
            budget: RepeatBudget::new(behavior.repeat),
        }
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.matches(method) && self.url == path
    }

    /// Remaining repeat budget, `None` when unlimited.
    pub fn remaining(&self) -> Option<usize> {
        self.budget.remaining()
    }
}

/// A published behavior set.
#[derive(Debug, Default)]
struct ActiveSet {
    generation: u64,
    default: Option<Arc<ResponseBehavior>>,
    routes: RwLock<Vec<Arc<Route>>>,
}

impl ActiveSet {
    fn retire(&self, route: &Arc<Route>) {
        let mut routes = self.routes.write();
        routes.retain(|r| !Arc::ptr_eq(r, route));
        metrics::record_active_behaviors(routes.len());
    }
}

/// Result of dispatching one request.
#[derive(Debug, Clone)]
pub struct Dispatch {
    pub response: Arc<ResponseBehavior>,
    pub status: StatusCode,
    /// False when the response came from the default fallback.
    pub matched: bool,
}

impl Dispatch {
    fn matched(response: Arc<ResponseBehavior>) -> Self {
        let status = response
            .status_code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::OK);
        Self {
            response,
            status,
            matched: true,
        }
    }

    /// Unmatched requests are always 404; the default only contributes
    /// body, headers, cookies, delay and stream mode.
    fn fallback(default: Option<Arc<ResponseBehavior>>) -> Self {
        Self {
            response: default.unwrap_or_default(),
            status: StatusCode::NOT_FOUND,
            matched: false,
        }
    }
}

/// Read-only view of the registry for operators.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrySnapshot {
    pub generation: u64,
    pub has_default: bool,
    pub behaviors: Vec<BehaviorSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BehaviorSummary {
    pub method: &'static str,
    pub url: String,
    /// `None` for unlimited behaviors.
    pub remaining: Option<usize>,
}

/// Shared handle to the active behavior set.
///
/// Passed as `Arc<Registry>` to both the request path and the reload path.
#[derive(Debug)]
pub struct Registry {
    active: ArcSwap<ActiveSet>,
    generations: AtomicU64,
}

impl Registry {
    /// Create a registry with nothing published; every request is an empty 404.
    pub fn new() -> Self {
        Self {
            active: ArcSwap::from_pointee(ActiveSet::default()),
            generations: AtomicU64::new(0),
        }
    }

    /// Create a registry with `set` already published.
    pub fn with_set(set: BehaviorSet) -> Self {
        let registry = Self::new();
        registry.replace(set);
        registry
    }

    /// Atomically publish `set`, dropping the previous one once no in-flight
    /// dispatch still holds it. Returns the new generation number.
    pub fn replace(&self, set: BehaviorSet) -> u64 {
        let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
        let routes: Vec<Arc<Route>> = set
            .behaviors
            .into_iter()
            // A zero budget is spent before it starts.
            .filter(|behavior| behavior.repeat != Some(0))
            .map(|behavior| Arc::new(Route::from_behavior(behavior)))
            .collect();
        let count = routes.len();

        self.active.store(Arc::new(ActiveSet {
            generation,
            default: set.default_behavior.map(Arc::new),
            routes: RwLock::new(routes),
        }));

        metrics::record_active_behaviors(count);
        tracing::debug!(generation, behaviors = count, "Behavior set published");
        generation
    }

    /// Find the response for a request.
    ///
    /// Routes are scanned in declaration order. A route whose budget is
    /// already spent is skipped as if it had been removed, so a later route
    /// with the same method and path can answer instead.
    pub fn match_request(&self, method: &Method, path: &str) -> Dispatch {
        let set = self.active.load();

        let hit = {
            let routes = set.routes.read();
            routes.iter().find_map(|route| {
                if !route.matches(method, path) {
                    return None;
                }
                match route.budget.acquire() {
                    Grant::Exhausted => None,
                    Grant::Last => Some((route.clone(), true)),
                    Grant::Unlimited | Grant::Granted { .. } => Some((route.clone(), false)),
                }
            })
        };

        match hit {
            Some((route, exhausted)) => {
                if exhausted {
                    set.retire(&route);
                    metrics::record_exhausted();
                    tracing::debug!(method = %route.method, url = %route.url, "Behavior exhausted, removed");
                }
                Dispatch::matched(route.response.clone())
            }
            None => Dispatch::fallback(set.default.clone()),
        }
    }

    /// Number of behaviors still eligible in the active set.
    pub fn len(&self) -> usize {
        self.active.load().routes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn generation(&self) -> u64 {
        self.active.load().generation
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let set = self.active.load_full();
        let behaviors = set
            .routes
            .read()
            .iter()
            .map(|route| BehaviorSummary {
                method: route.method.as_str(),
                url: route.url.clone(),
                remaining: route.remaining(),
            })
            .collect();

        RegistrySnapshot {
            generation: set.generation,
            has_default: set.default.is_some(),
            behaviors,
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
