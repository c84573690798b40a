// ── Refresh controller ──
//
// Owns the fetch lifecycle state machine. All transitions of `FetchState`
// happen here, serialized under the request lock: a fetch resolution is
// applied only while its request id is still the authoritative one, so a
// stale generation can never overwrite state produced by a newer request.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::RefreshConfig;
use crate::error::CoreError;
use crate::generate::SampleSource;
use crate::model::{FetchState, Network, SampleSeries, Selection, Timeframe};

/// Orchestrates the fetch lifecycle for one dashboard session.
///
/// Cheaply cloneable via `Arc`. Construction leaves the controller in
/// `Loading` without fetching; [`start()`](Self::start) issues the initial
/// fetch and spawns the periodic refresh task. Consumers observe state and
/// selection through `watch` receivers and never mutate either directly.
pub struct RefreshController<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for RefreshController<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S> {
    source: S,
    config: RefreshConfig,
    state: watch::Sender<FetchState>,
    selection: watch::Sender<Selection>,
    /// Authoritative request id. Bumped when a fetch starts; compared when
    /// one resolves. Guarded by a mutex so bump+Loading and compare+apply
    /// are each atomic -- last request wins.
    request: Mutex<u64>,
    cancel: CancellationToken,
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

/// Poison-proof lock: a panicked holder cannot have left the id invalid.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<S: SampleSource + 'static> RefreshController<S> {
    /// Create a controller. Does NOT fetch -- call [`start()`](Self::start).
    pub fn new(source: S, config: RefreshConfig, initial: Selection) -> Result<Self, CoreError> {
        config.validate()?;

        let (state, _) = watch::channel(FetchState::Loading);
        let (selection, _) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(Inner {
                source,
                config,
                state,
                selection,
                request: Mutex::new(0),
                cancel: CancellationToken::new(),
                tasks: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Issue the initial fetch and spawn the periodic refresh task.
    ///
    /// Must be called within a tokio runtime. A zero refresh interval
    /// disables the timer (one-shot mode).
    pub fn start(&self) {
        self.begin_fetch();

        let period = self.inner.config.refresh_interval;
        if !period.is_zero() {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            let handle = tokio::spawn(refresh_task(ctrl, period, cancel));
            lock(&self.inner.tasks).push(handle);
        }
        info!(refresh_secs = period.as_secs(), "refresh controller started");
    }

    // ── Inbound operations ───────────────────────────────────────

    /// Switch the displayed network. Re-fetches immediately; any in-flight
    /// fetch for the previous selection becomes stale.
    pub fn select_network(&self, network: Network) {
        let current = *self.inner.selection.borrow();
        if current.network == network {
            return;
        }
        self.inner.selection.send_replace(Selection {
            network,
            ..current
        });
        self.begin_fetch();
    }

    /// Switch the displayed timeframe. Re-fetches immediately.
    pub fn select_timeframe(&self, timeframe: Timeframe) {
        let current = *self.inner.selection.borrow();
        if current.timeframe == timeframe {
            return;
        }
        self.inner.selection.send_replace(Selection {
            timeframe,
            ..current
        });
        self.begin_fetch();
    }

    /// Re-run the failed fetch with the last-used parameters.
    ///
    /// Only meaningful in `Error` state; a no-op otherwise (the error pane
    /// is the only place the action is offered).
    pub fn retry(&self) {
        if self.inner.state.borrow().is_error() {
            self.begin_fetch();
        }
    }

    /// Cancel the refresh timer and render any in-flight fetch a no-op.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();
        let handles: Vec<JoinHandle<()>> = lock(&self.inner.tasks).drain(..).collect();
        for handle in handles {
            let _ = handle.await;
        }
        debug!("refresh controller shut down");
    }

    // ── Observation ──────────────────────────────────────────────

    /// Subscribe to fetch state transitions.
    pub fn state(&self) -> watch::Receiver<FetchState> {
        self.inner.state.subscribe()
    }

    /// Subscribe to selection changes.
    pub fn selection(&self) -> watch::Receiver<Selection> {
        self.inner.selection.subscribe()
    }

    /// The currently selected parameters.
    pub fn current_selection(&self) -> Selection {
        *self.inner.selection.borrow()
    }

    // ── Fetch cycle ──────────────────────────────────────────────

    /// Enter `Loading` under a fresh request id and spawn the generation.
    fn begin_fetch(&self) {
        let sel = *self.inner.selection.borrow();

        let id = {
            let mut request = lock(&self.inner.request);
            *request += 1;
            self.inner.state.send_replace(FetchState::Loading);
            *request
        };
        debug!(request = id, network = %sel.network, timeframe = %sel.timeframe, "fetch started");

        let this = self.clone();
        let cancel = self.inner.cancel.clone();
        tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                () = cancel.cancelled() => return,
                result = this.inner.source.generate(sel.network, sel.timeframe) => result,
            };
            this.apply(id, result);
        });
    }

    /// Apply a fetch resolution, unless a newer request has superseded it.
    fn apply(&self, id: u64, result: Result<SampleSeries, CoreError>) {
        let request = lock(&self.inner.request);
        if *request != id {
            debug!(request = id, current = *request, "stale fetch resolution dropped");
            return;
        }

        match result {
            Ok(series) => {
                debug!(request = id, samples = series.samples.len(), "fetch succeeded");
                self.inner.state.send_replace(FetchState::Ready(Arc::new(series)));
            }
            Err(err) => {
                let message = match err {
                    CoreError::Generation { message } => message,
                    other => other.to_string(),
                };
                warn!(request = id, error = %message, "fetch failed");
                self.inner.state.send_replace(FetchState::Error(message));
            }
        }
    }
}

/// Periodic re-fetch with the currently selected parameters.
///
/// The immediate first tick is consumed so the timer never doubles the
/// initial fetch issued by `start()`.
async fn refresh_task<S: SampleSource + 'static>(
    ctrl: RefreshController<S>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                debug!("periodic refresh tick");
                ctrl.begin_fetch();
            }
        }
    }
}
