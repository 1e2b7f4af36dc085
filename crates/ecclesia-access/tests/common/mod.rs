#![allow(dead_code)]

use async_trait::async_trait;
use ecclesia_access::{
    InMemoryPermissionStore, PermissionCache, PermissionEngine, PermissionStore,
    RolePermissionStore, StoreError, StoreResult, UserOverrideStore,
};
use ecclesia_authz::{PermissionMap, Role, UserId};
use metrics::{Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory store that counts reads and can be told to fail.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: InMemoryPermissionStore,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_role_writes: Mutex<Option<Role>>,
    pub role_reads: AtomicUsize,
    pub override_reads: AtomicUsize,
}

impl FlakyStore {
    pub fn with_roles(roles: impl IntoIterator<Item = (Role, PermissionMap)>) -> Self {
        Self {
            inner: InMemoryPermissionStore::with_roles(roles),
            ..Self::default()
        }
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Fail saves of `role` only; other roles still write.
    pub fn fail_writes_for(&self, role: Role) {
        *self.fail_role_writes.lock().expect("fail role lock") = Some(role);
    }

    pub fn role_reads(&self) -> usize {
        self.role_reads.load(Ordering::SeqCst)
    }

    pub fn override_reads(&self) -> usize {
        self.override_reads.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> StoreResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RolePermissionStore for FlakyStore {
    async fn get_role_defaults(&self, role: &Role) -> StoreResult<PermissionMap> {
        self.role_reads.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        self.inner.get_role_defaults(role).await
    }

    async fn save_role_defaults(&self, role: &Role, entries: PermissionMap) -> StoreResult<()> {
        self.check_write()?;
        if self.fail_role_writes.lock().expect("fail role lock").as_ref() == Some(role) {
            return Err(StoreError::Unavailable(format!("writes disabled for {role}")));
        }
        self.inner.save_role_defaults(role, entries).await
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        self.check_read()?;
        self.inner.list_roles().await
    }
}

#[async_trait]
impl UserOverrideStore for FlakyStore {
    async fn get_overrides(&self, user_id: &UserId) -> StoreResult<PermissionMap> {
        self.override_reads.fetch_add(1, Ordering::SeqCst);
        self.check_read()?;
        self.inner.get_overrides(user_id).await
    }

    async fn save_overrides(&self, user_id: &UserId, entries: PermissionMap) -> StoreResult<()> {
        self.check_write()?;
        self.inner.save_overrides(user_id, entries).await
    }
}

#[async_trait]
impl PermissionStore for FlakyStore {
    async fn health_check(&self) -> StoreResult<()> {
        self.check_read()
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

pub fn engine_over(store: Arc<FlakyStore>) -> PermissionEngine {
    PermissionEngine::new(store, Arc::new(PermissionCache::new()))
}

/// Recorder that keeps counter totals so tests can read them back.
#[derive(Default)]
pub struct CountingRecorder {
    counters: Mutex<Vec<(Key, Arc<AtomicU64>)>>,
}

impl CountingRecorder {
    /// Sum of every `name` counter carrying the `label` pair.
    pub fn total(&self, name: &str, label: (&str, &str)) -> u64 {
        self.counters
            .lock()
            .expect("counters lock")
            .iter()
            .filter(|(key, _)| {
                key.name() == name
                    && key
                        .labels()
                        .any(|l| l.key() == label.0 && l.value() == label.1)
            })
            .map(|(_, value)| value.load(Ordering::SeqCst))
            .sum()
    }
}

impl Recorder for CountingRecorder {
    fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
    fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

    fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
        let mut counters = self.counters.lock().expect("counters lock");
        let value = match counters.iter().find(|(existing, _)| existing == key) {
            Some((_, value)) => value.clone(),
            None => {
                let value = Arc::new(AtomicU64::new(0));
                counters.push((key.clone(), value.clone()));
                value
            }
        };
        Counter::from_arc(value)
    }

    fn register_gauge(&self, _: &Key, _: &Metadata<'_>) -> Gauge {
        Gauge::noop()
    }

    fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
        Histogram::noop()
    }
}
