use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use fanpulse_core::{CacheScope, QueryParams};
use fanpulse_logging::pulse_debug;
use tokio::time::Instant;

use crate::ApiError;

pub const COMMENTS_TTL: Duration = Duration::from_secs(30);
pub const STATS_TTL: Duration = Duration::from_secs(60);
pub const SUMMARY_TTL: Duration = Duration::from_secs(30);
/// Team reports, trend series and comparisons.
pub const REPORT_TTL: Duration = Duration::from_secs(5 * 60);

/// Resource name plus the parameter tuple it was fetched with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    scope: String,
    params: String,
}

impl CacheKey {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            params: String::new(),
        }
    }

    pub fn with_params(scope: impl Into<String>, params: &QueryParams) -> Self {
        let params = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        Self {
            scope: scope.into(),
            params,
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl From<CacheScope> for CacheKey {
    fn from(scope: CacheScope) -> Self {
        CacheKey::new(scope.as_str())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            f.write_str(&self.scope)
        } else {
            write!(f, "{}?{}", self.scope, self.params)
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    stored_at: Instant,
    ttl: Duration,
}

impl Entry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) < self.ttl
    }
}

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    /// Per-scope counters bumped by invalidation so fetches of that scope
    /// started earlier do not store.
    generations: HashMap<String, u64>,
    /// Bumped by `clear`.
    epoch: u64,
}

impl Inner {
    fn generation(&self, scope: &str) -> (u64, u64) {
        let scoped = self.generations.get(scope).copied().unwrap_or(0);
        (self.epoch, scoped)
    }

    fn bump(&mut self, scope: &str) {
        *self.generations.entry(scope.to_string()).or_insert(0) += 1;
    }
}

/// Process-wide read cache shared by the sessions.
///
/// Entries expire after their TTL. Mutations must invalidate what they touch;
/// there is no dependency tracking between keys.
#[derive(Default)]
pub struct QueryCache {
    inner: Mutex<Inner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh cached value for `key`, if any.
    pub fn get<T>(&self, key: &CacheKey) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let now = Instant::now();
        let inner = self.lock();
        let entry = inner.entries.get(key).filter(|entry| entry.is_fresh(now))?;
        entry.value.downcast_ref::<T>().cloned()
    }

    pub fn insert<T>(&self, key: CacheKey, ttl: Duration, value: T)
    where
        T: Send + Sync + 'static,
    {
        let entry = Entry {
            value: Arc::new(value),
            stored_at: Instant::now(),
            ttl,
        };
        self.lock().entries.insert(key, entry);
    }

    /// Returns the cached value or runs `fetch` and stores its success.
    ///
    /// Errors are never cached. A value fetched across an invalidation of
    /// its own scope is returned to the caller but not stored.
    pub async fn get_or_fetch<T, F, Fut>(
        &self,
        key: CacheKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<T, ApiError>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.get::<T>(&key) {
            pulse_debug!("cache hit {}", key);
            return Ok(hit);
        }
        let generation = self.lock().generation(&key.scope);
        let value = fetch().await?;
        let mut inner = self.lock();
        if inner.generation(&key.scope) == generation {
            inner.entries.insert(
                key,
                Entry {
                    value: Arc::new(value.clone()),
                    stored_at: Instant::now(),
                    ttl,
                },
            );
        } else {
            pulse_debug!("cache invalidated while fetching {}, not storing", key);
        }
        Ok(value)
    }

    /// Drops one exact key. In-flight fetches of its scope will not store.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut inner = self.lock();
        inner.bump(&key.scope);
        inner.entries.remove(key).is_some()
    }

    /// Drops every key of `scope`, whatever its parameters.
    pub fn invalidate_scope(&self, scope: &str) -> usize {
        let mut inner = self.lock();
        inner.bump(scope);
        let before = inner.entries.len();
        inner.entries.retain(|key, _| key.scope != scope);
        let removed = before - inner.entries.len();
        pulse_debug!("invalidated {} cached {} entries", removed, scope);
        removed
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.epoch += 1;
        inner.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
