//! Read-only derived statistics views.
//!
//! A [`StatisticsWatcher`] is the report-shaped sibling of
//! [`crate::watch::ResourceWatcher`]: filter-reactive with the same
//! debounce and freshness machinery, but without pagination or mutation
//! surface. The single-level `data.data` nesting some report endpoints
//! produce is flattened by the client before the payload reaches this type.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use tokio::sync::Notify;

use edusync_api::types::{AttendanceStatistics, LibraryStatistics};
use edusync_api::{Client, Error, FilterSet};

use crate::watch::DEBOUNCE;

/// Point-in-time view of a statistics watcher.
#[derive(Clone, Debug)]
pub struct StatsSnapshot<S> {
    pub data: Option<S>,
    pub loading: bool,
    pub error: Option<String>,
}

struct Inner<S> {
    client: Client,
    path: &'static str,
    filters: Mutex<FilterSet>,
    state: Mutex<StatsSnapshot<S>>,
    seq: AtomicU64,
    alive: AtomicBool,
    changed: Notify,
}

impl<S> Inner<S>
where
    S: DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn begin(&self) -> u64 {
        let my_seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.lock().unwrap_or_else(|e| e.into_inner()).loading = true;
        self.changed.notify_waiters();
        my_seq
    }

    fn is_current(&self, my_seq: u64) -> bool {
        self.alive.load(Ordering::SeqCst) && self.seq.load(Ordering::SeqCst) == my_seq
    }

    async fn fetch(self: Arc<Self>, my_seq: u64) {
        let filters = self.filters.lock().unwrap_or_else(|e| e.into_inner()).clone();
        let result = self
            .client
            .fetch_report(self.path, &filters)
            .await
            .and_then(|data| {
                serde_json::from_value::<S>(data)
                    .map_err(|e| Error::Shape(format!("report payload: {e}")))
            });

        if !self.is_current(my_seq) {
            tracing::debug!(path = self.path, seq = my_seq, "discarding stale report");
            return;
        }

        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match result {
                Ok(data) => {
                    state.data = Some(data);
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!(path = self.path, "report fetch failed: {e}");
                    state.data = None;
                    state.error = Some(e.to_string());
                }
            }
            state.loading = false;
        }
        self.changed.notify_waiters();
    }
}

/// Filter-reactive view over one aggregate report endpoint.
pub struct StatisticsWatcher<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for StatisticsWatcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Attendance report watcher (`/api/attendances/statistics`).
pub type AttendanceStatisticsWatcher = StatisticsWatcher<AttendanceStatistics>;

/// Library report watcher (`/api/library/statistics`).
pub type LibraryStatisticsWatcher = StatisticsWatcher<LibraryStatistics>;

impl AttendanceStatisticsWatcher {
    pub fn attendance(client: Client, filters: FilterSet) -> Self {
        Self::new(client, "/api/attendances/statistics", filters)
    }
}

impl LibraryStatisticsWatcher {
    pub fn library(client: Client) -> Self {
        Self::new(client, "/api/library/statistics", FilterSet::new())
    }
}

impl<S> StatisticsWatcher<S>
where
    S: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a watcher over `path` and schedules its initial fetch.
    /// Must be created inside a tokio runtime.
    pub fn new(client: Client, path: &'static str, filters: FilterSet) -> Self {
        let inner = Arc::new(Inner {
            client,
            path,
            filters: Mutex::new(filters),
            state: Mutex::new(StatsSnapshot {
                data: None,
                loading: true,
                error: None,
            }),
            seq: AtomicU64::new(0),
            alive: AtomicBool::new(true),
            changed: Notify::new(),
        });
        let watcher = Self { inner };
        watcher.schedule();
        watcher
    }

    fn schedule(&self) {
        let my_seq = self.inner.begin();
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            if !inner.is_current(my_seq) {
                return;
            }
            inner.fetch(my_seq).await;
        });
    }

    /// Issues one immediate fetch and waits for its application.
    pub async fn refetch(&self) {
        let my_seq = self.inner.begin();
        self.inner.clone().fetch(my_seq).await;
    }

    /// Merges `partial` into the filter set and schedules a fetch. Reports
    /// carry no pagination, so there is no page to reset.
    pub fn update_filters(&self, partial: &FilterSet) {
        self.inner
            .filters
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .merge(partial);
        self.schedule();
    }

    pub fn filters(&self) -> FilterSet {
        self.inner.filters.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn snapshot(&self) -> StatsSnapshot<S> {
        self.inner.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn close(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
        self.inner.changed.notify_waiters();
    }

    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.changed.notified();
            if !self
                .inner
                .state
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .loading
            {
                return;
            }
            if !self.inner.alive.load(Ordering::SeqCst) {
                return;
            }
            notified.await;
        }
    }
}
