//! Read-through cache for role matrices and user overrides.
//!
//! # Purpose
//! Resolution runs on every render, so the engine keeps the last loaded
//! matrix per role and override set per user. Entries are created lazily on
//! the first miss and removed by explicit invalidation.
//!
//! # Key invariants
//! - A value loaded before the latest invalidation of its key is never
//!   stored. Each key has a generation and the whole cache has an epoch; a
//!   load remembers both when it starts and is discarded if either moved.
//! - Loads for one key never overlap: concurrent misses share a single store
//!   fetch, and a load that finishes late can only have started earlier, so
//!   the generation check above is enough to keep it from replacing a
//!   fresher entry.
//! - Per-key bookkeeping lives only while a load for the key is running or
//!   an invalidation may still race one.
//! - Failed loads are returned to the caller and leave the cache untouched.
//!
//! # Locking
//! Entry maps sit behind a `std::sync::RwLock` that is never held across an
//! await. The per-key in-flight locks are `tokio` mutexes so waiting callers
//! yield instead of blocking the runtime. A flight-map lookup may happen under the
//! state lock, never the other way round.
use crate::store::StoreResult;
use dashmap::DashMap;
use ecclesia_authz::{PermissionMap, Role, UserId};
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, RwLock, Weak};
use tokio::sync::Mutex;

const KIND_ROLE: &str = "role";
const KIND_USER: &str = "user";

pub struct PermissionCache {
    enabled: bool,
    roles: KeyedCache<Role>,
    users: KeyedCache<UserId>,
}

impl Default for PermissionCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PermissionCache {
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// Cache that never stores anything; every lookup reads through.
    pub fn disabled() -> Self {
        Self::with_enabled(false)
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled,
            roles: KeyedCache::new(KIND_ROLE),
            users: KeyedCache::new(KIND_USER),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cached matrix for `role`, loading it with `load` on a miss.
    pub async fn role_defaults<F, Fut>(
        &self,
        role: &Role,
        load: F,
    ) -> StoreResult<Arc<PermissionMap>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<PermissionMap>>,
    {
        if !self.enabled {
            return load().await.map(Arc::new);
        }
        self.roles.get_or_load(role, load).await
    }

    /// Cached overrides for `user_id`, loading them with `load` on a miss.
    pub async fn user_overrides<F, Fut>(
        &self,
        user_id: &UserId,
        load: F,
    ) -> StoreResult<Arc<PermissionMap>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<PermissionMap>>,
    {
        if !self.enabled {
            return load().await.map(Arc::new);
        }
        self.users.get_or_load(user_id, load).await
    }

    pub fn invalidate_role(&self, role: &Role) {
        self.roles.invalidate(role);
    }

    pub fn invalidate_user(&self, user_id: &UserId) {
        self.users.invalidate(user_id);
    }

    /// Drop every entry, e.g. after a bulk migration or reseeding.
    pub fn invalidate_all(&self) {
        self.roles.invalidate_all();
        self.users.invalidate_all();
    }

    pub fn contains_role(&self, role: &Role) -> bool {
        self.roles.lookup(role).is_some()
    }

    pub fn contains_user(&self, user_id: &UserId) -> bool {
        self.users.lookup(user_id).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Generation {
    epoch: u64,
    key: u64,
}

struct KeyedState<K> {
    epoch: u64,
    generations: HashMap<K, u64>,
    entries: HashMap<K, Arc<PermissionMap>>,
}

impl<K: Eq + Hash> KeyedState<K> {
    fn generation(&self, key: &K) -> Generation {
        Generation {
            epoch: self.epoch,
            key: self.generations.get(key).copied().unwrap_or(0),
        }
    }
}

struct KeyedCache<K> {
    kind: &'static str,
    state: RwLock<KeyedState<K>>,
    flights: DashMap<K, Arc<Mutex<()>>>,
}

impl<K> KeyedCache<K>
where
    K: Eq + Hash + Clone + Display,
{
    fn new(kind: &'static str) -> Self {
        Self {
            kind,
            state: RwLock::new(KeyedState {
                epoch: 0,
                generations: HashMap::new(),
                entries: HashMap::new(),
            }),
            flights: DashMap::new(),
        }
    }

    async fn get_or_load<F, Fut>(&self, key: &K, load: F) -> StoreResult<Arc<PermissionMap>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<PermissionMap>>,
    {
        if let Some(hit) = self.lookup(key) {
            self.record("hit");
            return Ok(hit);
        }

        // Single-flight: whoever takes the key lock first loads, the rest
        // re-check the cache once it is released.
        let flight = self.flights.entry(key.clone()).or_default().clone();
        let result = self.load_in_flight(key, &flight, load).await;
        self.finish_flight(key, flight);
        result
    }

    async fn load_in_flight<F, Fut>(
        &self,
        key: &K,
        flight: &Mutex<()>,
        load: F,
    ) -> StoreResult<Arc<PermissionMap>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = StoreResult<PermissionMap>>,
    {
        let _in_flight = flight.lock().await;
        if let Some(hit) = self.lookup(key) {
            self.record("coalesced");
            return Ok(hit);
        }
        self.record("miss");

        let started = self.generation(key);
        let value = Arc::new(load().await?);
        if !self.commit(key, started, value.clone()) {
            tracing::debug!(kind = self.kind, key = %key, "discarded load superseded by invalidation");
        }
        Ok(value)
    }

    /// Drop the key's flight lock once nobody else holds it, and with it the
    /// key's generation counter.
    fn finish_flight(&self, key: &K, flight: Arc<Mutex<()>>) {
        let ours: Weak<Mutex<()>> = Arc::downgrade(&flight);
        drop(flight);
        let removed = self.flights.remove_if(key, |_, current| {
            std::ptr::eq(Arc::as_ptr(current), ours.as_ptr()) && Arc::strong_count(current) == 1
        });
        if removed.is_none() {
            return;
        }
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Loads registered after the removal read their generation once this
        // lock is released.
        if !self.flights.contains_key(key) {
            state.generations.remove(key);
        }
    }

    fn lookup(&self, key: &K) -> Option<Arc<PermissionMap>> {
        let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.entries.get(key).cloned()
    }

    fn generation(&self, key: &K) -> Generation {
        let state = self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.generation(key)
    }

    fn commit(&self, key: &K, started: Generation, value: Arc<PermissionMap>) -> bool {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        if state.generation(key) != started {
            return false;
        }
        state.entries.insert(key.clone(), value);
        true
    }

    fn invalidate(&self, key: &K) {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.entries.remove(key);
        // Only a running load can observe the counter; without one it would
        // just accumulate.
        if self.flights.contains_key(key) {
            *state.generations.entry(key.clone()).or_insert(0) += 1;
        } else {
            state.generations.remove(key);
        }
        tracing::debug!(kind = self.kind, key = %key, "permission cache entry invalidated");
    }

    fn invalidate_all(&self) {
        let mut state = self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.entries.clear();
        state.generations.clear();
        state.epoch += 1;
        tracing::debug!(kind = self.kind, epoch = state.epoch, "permission cache cleared");
    }

    fn record(&self, result: &'static str) {
        metrics::counter!(
            "ecclesia_permission_cache_total",
            "kind" => self.kind,
            "result" => result
        )
        .increment(1);
    }
}
