//! Reactive resource fetching with debounce and stale-response discard.
//!
//! A [`ResourceWatcher`] owns a snapshot of `{data, loading, error}` for one
//! paginated backend resource, refetches when filters or the page change,
//! and coordinates in-flight requests so that only the freshest one may
//! write state.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Notify;

use edusync_api::types::Page;
use edusync_api::{Client, FilterSet, ListQuery};

use crate::pager::Pager;
use crate::resource::Resource;

/// Delay between a parameter change and the fetch it triggers. Rapid
/// successive changes inside this window collapse into a single request.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

/// Point-in-time view of a watcher's state. `loading`, "empty", and
/// "errored" are three distinct conditions; consumers must not conflate
/// them.
#[derive(Clone, Debug)]
pub struct Snapshot<T> {
    pub data: Option<Page<T>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Snapshot<T> {
    fn idle_empty() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

struct Inner<R: Resource> {
    client: Client,
    state: Mutex<Snapshot<R::Item>>,
    pager: Mutex<Pager>,
    limit: i64,
    /// Freshness token. A fetch captures the sequence number at schedule
    /// time; a response whose number is no longer current is discarded.
    seq: AtomicU64,
    /// Cleared by [`ResourceWatcher::close`]; dead watchers never apply
    /// state again. There is no transport-level abort.
    alive: AtomicBool,
    changed: Notify,
}

impl<R: Resource> Inner<R> {
    fn auth_missing(&self) -> bool {
        R::REQUIRES_AUTH && !self.client.has_credentials()
    }

    fn begin(&self) -> u64 {
        let my_seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.loading = true;
        }
        self.changed.notify_waiters();
        my_seq
    }

    fn is_current(&self, my_seq: u64) -> bool {
        self.alive.load(Ordering::SeqCst) && self.seq.load(Ordering::SeqCst) == my_seq
    }

    async fn fetch(self: Arc<Self>, my_seq: u64) {
        let query = {
            let pager = self.pager.lock().unwrap_or_else(|e| e.into_inner());
            ListQuery::new(pager.filters().clone(), pager.page(), self.limit)
        };
        let result = self.client.list::<R::Item>(R::PATH, R::COLLECTION, &query).await;

        if !self.is_current(my_seq) {
            tracing::debug!(path = R::PATH, seq = my_seq, "discarding stale response");
            return;
        }

        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            match result {
                Ok(page) => {
                    state.data = Some(page);
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!(path = R::PATH, "fetch failed: {e}");
                    state.data = None;
                    state.error = Some(e.to_string());
                }
            }
            state.loading = false;
        }
        self.changed.notify_waiters();
    }
}

/// Reactive view over one paginated backend resource.
///
/// Cloning yields another handle onto the same state; each `new` call is an
/// independent instance with its own state and its own requests. Must be
/// created inside a tokio runtime.
pub struct ResourceWatcher<R: Resource> {
    inner: Arc<Inner<R>>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> Clone for ResourceWatcher<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _marker: PhantomData,
        }
    }
}

impl<R: Resource> ResourceWatcher<R> {
    /// Creates a watcher and schedules its initial (debounced) fetch.
    ///
    /// When the resource requires an authenticated actor and no credential
    /// is stored, the watcher settles immediately into the intentionally
    /// empty state `{data: None, loading: false, error: None}` and issues
    /// no request.
    pub fn new(client: Client, initial_filters: FilterSet, page: i64, limit: i64) -> Self {
        let inner = Arc::new(Inner::<R> {
            client,
            state: Mutex::new(Snapshot {
                data: None,
                loading: true,
                error: None,
            }),
            pager: Mutex::new(Pager::new(initial_filters, page)),
            limit: limit.max(1),
            seq: AtomicU64::new(0),
            alive: AtomicBool::new(true),
            changed: Notify::new(),
        });
        let watcher = Self {
            inner,
            _marker: PhantomData,
        };
        watcher.schedule();
        watcher
    }

    /// Schedules a debounced fetch for the current parameters.
    fn schedule(&self) {
        if self.inner.auth_missing() {
            *self.inner.state.lock().unwrap_or_else(|e| e.into_inner()) = Snapshot::idle_empty();
            self.inner.changed.notify_waiters();
            return;
        }
        let my_seq = self.inner.begin();
        let inner = self.inner.clone();
        tokio::spawn(async move {
            tokio::time::sleep(DEBOUNCE).await;
            // Superseded while debouncing: a newer change owns the fetch.
            if !inner.is_current(my_seq) {
                return;
            }
            inner.fetch(my_seq).await;
        });
    }

    /// Issues one immediate fetch and waits until its result (or a fresher
    /// one's) has been applied.
    pub async fn refetch(&self) {
        if self.inner.auth_missing() {
            *self.inner.state.lock().unwrap_or_else(|e| e.into_inner()) = Snapshot::idle_empty();
            self.inner.changed.notify_waiters();
            return;
        }
        let my_seq = self.inner.begin();
        self.inner.clone().fetch(my_seq).await;
    }

    /// Merges `partial` into the filter set, resets the page to 1, and
    /// schedules a fetch.
    pub fn update_filters(&self, partial: &FilterSet) {
        self.inner
            .pager
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .update_filters(partial);
        self.schedule();
    }

    /// Moves to page `n` (unchecked; the backend's pagination metadata is
    /// the authority) and schedules a fetch.
    pub fn go_to_page(&self, n: i64) {
        self.inner
            .pager
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .go_to_page(n);
        self.schedule();
    }

    /// Advances one page if the last response reported a next page.
    pub fn next_page(&self) {
        if self
            .snapshot()
            .data
            .map(|p| p.pagination.has_next)
            .unwrap_or(false)
        {
            self.go_to_page(self.current_page() + 1);
        }
    }

    /// Steps back one page if the last response reported a previous page.
    pub fn prev_page(&self) {
        if self
            .snapshot()
            .data
            .map(|p| p.pagination.has_prev)
            .unwrap_or(false)
        {
            self.go_to_page(self.current_page() - 1);
        }
    }

    pub fn snapshot(&self) -> Snapshot<R::Item> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn filters(&self) -> FilterSet {
        self.inner
            .pager
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .filters()
            .clone()
    }

    pub fn current_page(&self) -> i64 {
        self.inner.pager.lock().unwrap_or_else(|e| e.into_inner()).page()
    }

    /// Returns filters and page to their initial values and schedules a
    /// fetch.
    pub fn reset(&self) {
        self.inner
            .pager
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .reset();
        self.schedule();
    }

    /// Permanently retires this watcher: in-flight and future responses
    /// will never be applied to its state again.
    pub fn close(&self) {
        self.inner.alive.store(false, Ordering::SeqCst);
        self.inner.changed.notify_waiters();
    }

    /// Waits until no fetch is in flight. Returns immediately when the
    /// watcher is idle (including the auth-missing empty state).
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
