// src/run/store.rs

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use crate::run::session::TestRun;

/// In-memory registry of test runs, shared through `AppState`.
///
/// Each run is owned by a single user and mutated under the registry lock;
/// nothing here survives a restart, matching the source behavior where a
/// page reload lost the in-flight run.
#[derive(Clone, Default)]
pub struct RunStore {
    inner: Arc<Mutex<HashMap<Uuid, TestRun>>>,
}

impl RunStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Uuid, TestRun>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, run: TestRun) {
        self.lock().insert(run.id, run);
    }

    /// Runs a closure against the run, if present. The closure executes
    /// under the registry lock and must not block.
    pub fn with_run<R>(&self, id: Uuid, f: impl FnOnce(&mut TestRun) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(f)
    }

    pub fn remove(&self, id: Uuid) -> Option<TestRun> {
        self.lock().remove(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Evicts finished runs whose results have gone unread past the grace
    /// period, and unfinished runs whose deadline lapsed at least a grace
    /// period ago (abandoned mid-run, nobody coming back).
    ///
    /// The sweep never applies expiry itself: finishing a run stays on the
    /// request path, where the handler that observes the transition spawns
    /// the attempt write.
    pub fn evict_stale(&self, now: DateTime<Utc>, grace: Duration) -> usize {
        let mut runs = self.lock();
        let before = runs.len();
        runs.retain(|_, run| match run.finished_at() {
            Some(finished_at) => now - finished_at < grace,
            None => now - run.deadline() < grace,
        });
        before - runs.len()
    }
}
