//! # Reactive Read Resources
//!
//! A [`Resource`] owns the lifecycle of one asynchronous read: it runs a
//! producer whenever the observed dependency value changes, exposes
//! `{data, loading, error}` as a signal, and supports manual [`Resource::reload`].
//!
//! ## Staleness
//!
//! Every activation is tagged with a generation counter held *inside* the
//! state cell. A completion, success or failure alike, is applied only if
//! its generation is still the current one at apply time, so a slow earlier
//! request can never clobber a faster later one when dependencies change in
//! quick succession. Superseded results are dropped silently; in-flight
//! requests are not aborted, their answers are simply ignored.
//!
//! ## Error handling
//!
//! A failed load stores the error and leaves the previous `data` visible,
//! so shells can keep rendering the stale list with an error banner. There
//! is no retry policy: one failure surfaces one error, and recovery is an
//! explicit `reload()`.

use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use futures_signals::signal::{Mutable, Signal};
use parking_lot::Mutex;

use crate::errors::AppError;

/// Observable state of one read resource.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    /// Last successfully loaded value, kept across failed reloads.
    pub data: Option<T>,
    /// Whether a load is in flight.
    pub loading: bool,
    /// Error of the most recent settled load, cleared on the next start.
    pub error: Option<AppError>,
    // Generation of the activation this state belongs to. Kept inside the
    // cell so bump-and-mark-loading and check-and-apply are each atomic
    // under the state lock.
    generation: u64,
}

impl<T> ResourceState<T> {
    fn idle() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            generation: 0,
        }
    }

    /// Whether the most recent load has settled, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !self.loading && (self.data.is_some() || self.error.is_some())
    }
}

type Producer<T, D> = Arc<dyn Fn(D) -> BoxFuture<'static, Result<T, AppError>> + Send + Sync>;

/// A dependency-keyed asynchronous read.
///
/// The resource is inert until the first [`Resource::observe`]; after that
/// it refetches whenever the observed dependency value differs from the
/// previous one (by `PartialEq`), or when [`Resource::reload`] forces a new
/// generation with the dependencies unchanged.
///
/// Dependency-less reads use `D = ()` and call `observe(())` once.
pub struct Resource<T, D = ()> {
    state: Mutable<ResourceState<T>>,
    // Lock order: deps before state. The lock is held across start() so
    // generation order always matches dependency-write order.
    deps: Mutex<Option<D>>,
    producer: Producer<T, D>,
}

impl<T, D> Resource<T, D>
where
    T: Clone + Send + Sync + 'static,
    D: Clone + PartialEq + Send + 'static,
{
    /// Create an inert resource around a producer.
    pub fn new<F, Fut>(producer: F) -> Self
    where
        F: Fn(D) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        Self {
            state: Mutable::new(ResourceState::idle()),
            deps: Mutex::new(None),
            producer: Arc::new(move |deps| producer(deps).boxed()),
        }
    }

    /// Declare the dependency value this resource should reflect.
    ///
    /// Starts a load on the first call and again whenever `deps` differs
    /// from the previously observed value. Observing an identical value is
    /// a no-op; in particular it does not restart an in-flight load.
    pub fn observe(&self, deps: D) {
        let mut current = self.deps.lock();
        if current.as_ref() == Some(&deps) {
            return;
        }
        *current = Some(deps.clone());
        self.start(deps);
    }

    /// Force a fresh load with the current dependencies.
    ///
    /// Ignored (with a debug log) before the first observation, since there
    /// is nothing to reload yet.
    pub fn reload(&self) {
        let current = self.deps.lock();
        match current.as_ref() {
            Some(deps) => {
                let deps = deps.clone();
                self.start(deps);
            }
            None => tracing::debug!("reload before first observation ignored"),
        }
    }

    fn start(&self, deps: D) {
        let generation = {
            let mut state = self.state.lock_mut();
            state.generation += 1;
            state.loading = true;
            state.error = None;
            state.generation
        };
        tracing::debug!(generation, "resource load started");

        let future = (self.producer)(deps);
        let cell = self.state.clone();
        tokio::spawn(async move {
            let result = future.await;
            let mut state = cell.lock_mut();
            if state.generation != generation {
                tracing::trace!(
                    generation,
                    current = state.generation,
                    "discarding superseded resource result"
                );
                return;
            }
            state.loading = false;
            match result {
                Ok(data) => {
                    state.data = Some(data);
                }
                Err(error) => {
                    tracing::debug!(generation, %error, "resource load failed");
                    state.error = Some(error);
                }
            }
        });
    }

    /// Current state, cloned out of the cell.
    #[must_use]
    pub fn snapshot(&self) -> ResourceState<T> {
        self.state.get_cloned()
    }

    /// Reactive view of the state. Emits the current value immediately,
    /// then again after every change; intermediate values may be coalesced.
    pub fn signal(&self) -> impl Signal<Item = ResourceState<T>> {
        self.state.signal_cloned()
    }
}
