//! Caller-facing engine handle: request bookkeeping and progress broadcast
//! around the background projection worker.
//!
//! The engine owns two pieces of host-side state: a pending table mapping
//! request ids to completion channels, and a registry of progress listeners.
//! Progress is not keyed by request id: every listener hears every run. The
//! protocol only attributes results and errors precisely.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use foliocast_core::model::{MonteCarloResult, SimulationParams};

use crate::worker::{ProjectionWorker, WorkerRequest, WorkerResponse};

/// Progress snapshot broadcast to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunProgress {
    pub completed: usize,
    pub total: usize,
}

/// Why a projection request did not produce a result.
///
/// There are no retries: a failed run is re-submitted by the caller as a new
/// request under a fresh id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunError {
    /// The worker reported a failure for this request.
    Failed(String),
    /// The worker went away before answering.
    WorkerGone,
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Failed(message) => write!(f, "projection failed: {message}"),
            RunError::WorkerGone => write!(f, "projection worker is gone"),
        }
    }
}

impl std::error::Error for RunError {}

type RunOutcome = Result<Box<MonteCarloResult>, RunError>;
type Listener = Box<dyn Fn(RunProgress) + Send + 'static>;

/// Completion handle for one submitted request.
pub struct RunHandle {
    id: u64,
    rx: Receiver<RunOutcome>,
}

impl RunHandle {
    /// The request id this handle tracks.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the worker answers.
    pub fn wait(self) -> Result<MonteCarloResult, RunError> {
        match self.rx.recv() {
            Ok(Ok(result)) => Ok(*result),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(RunError::WorkerGone),
        }
    }

    /// Non-blocking poll; `None` while the run is still in flight.
    pub fn try_result(&self) -> Option<Result<MonteCarloResult, RunError>> {
        match self.rx.try_recv() {
            Ok(Ok(result)) => Some(Ok(*result)),
            Ok(Err(e)) => Some(Err(e)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(RunError::WorkerGone)),
        }
    }
}

/// Host-side bookkeeping shared with the dispatch thread.
struct EngineShared {
    pending: Mutex<HashMap<u64, Sender<RunOutcome>>>,
    listeners: Mutex<HashMap<u64, Listener>>,
}

/// Worker plus the dispatch thread draining its responses.
struct EngineInner {
    worker: ProjectionWorker,
    dispatch: JoinHandle<()>,
}

impl EngineInner {
    fn start(shared: Arc<EngineShared>) -> Self {
        let (response_tx, response_rx) = channel();
        let worker = ProjectionWorker::spawn(response_tx);
        let dispatch = thread::spawn(move || dispatch_loop(&response_rx, &shared));
        Self { worker, dispatch }
    }
}

fn dispatch_loop(response_rx: &Receiver<WorkerResponse>, shared: &EngineShared) {
    while let Ok(response) = response_rx.recv() {
        match response {
            WorkerResponse::Progress {
                id: _,
                completed,
                total,
            } => {
                let listeners = shared.listeners.lock().unwrap();
                for listener in listeners.values() {
                    listener(RunProgress { completed, total });
                }
            }
            WorkerResponse::Result { id, result } => {
                // Unknown ids are ignored: the handle was already removed or
                // never registered.
                if let Some(tx) = shared.pending.lock().unwrap().remove(&id) {
                    let _ = tx.send(Ok(result));
                }
            }
            WorkerResponse::Error { id, message } => {
                if let Some(tx) = shared.pending.lock().unwrap().remove(&id) {
                    let _ = tx.send(Err(RunError::Failed(message)));
                }
            }
        }
    }
}

/// Lazily started projection engine.
///
/// The background worker is created on the first run and reused for the
/// engine's lifetime. Requests are answered strictly in submission order;
/// callers that need precise progress attribution should await each handle
/// before submitting the next request.
pub struct ProjectionEngine {
    shared: Arc<EngineShared>,
    inner: Mutex<Option<EngineInner>>,
    next_request_id: AtomicU64,
    next_listener_id: AtomicU64,
}

impl ProjectionEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Arc::new(EngineShared {
                pending: Mutex::new(HashMap::new()),
                listeners: Mutex::new(HashMap::new()),
            }),
            inner: Mutex::new(None),
            next_request_id: AtomicU64::new(0),
            next_listener_id: AtomicU64::new(0),
        }
    }

    /// Submit a projection run under a fresh monotonically increasing id.
    pub fn run_monte_carlo(&self, params: SimulationParams) -> RunHandle {
        let id = self.next_request_id.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = channel();
        self.shared.pending.lock().unwrap().insert(id, tx);

        let sent = {
            let mut inner = self.inner.lock().unwrap();
            let inner = inner
                .get_or_insert_with(|| EngineInner::start(self.shared.clone()));
            inner.worker.send(WorkerRequest::Run { id, params })
        };

        if !sent {
            // Reject through the pending table so the handle still resolves.
            if let Some(tx) = self.shared.pending.lock().unwrap().remove(&id) {
                let _ = tx.send(Err(RunError::WorkerGone));
            }
        }

        RunHandle { id, rx }
    }

    /// Register a progress listener.
    ///
    /// Progress is broadcast to every listener regardless of which request
    /// produced it; listeners that care about one request must disambiguate
    /// themselves. The listener stays registered until the returned
    /// subscription is dropped.
    pub fn on_progress<F>(&self, listener: F) -> ProgressSubscription
    where
        F: Fn(RunProgress) + Send + 'static,
    {
        let key = self.next_listener_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared
            .listeners
            .lock()
            .unwrap()
            .insert(key, Box::new(listener));
        ProgressSubscription {
            shared: self.shared.clone(),
            key,
        }
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProjectionEngine {
    fn drop(&mut self) {
        let inner = self.inner.lock().ok().and_then(|mut guard| guard.take());
        if let Some(EngineInner { worker, dispatch }) = inner {
            // Dropping the worker joins its thread and closes the response
            // channel, which ends the dispatch loop.
            drop(worker);
            let _ = dispatch.join();
        }
    }
}

/// Keeps a progress listener registered; unregisters on drop.
pub struct ProgressSubscription {
    shared: Arc<EngineShared>,
    key: u64,
}

impl ProgressSubscription {
    /// Remove the listener now. Dropping the subscription has the same effect.
    pub fn unsubscribe(self) {}
}

impl Drop for ProgressSubscription {
    fn drop(&mut self) {
        self.shared.listeners.lock().unwrap().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn small_params(simulations: usize) -> SimulationParams {
        SimulationParams {
            initial_capital: 1_000.0,
            annual_return: 0.12,
            months: 12,
            simulations,
            ..Default::default()
        }
    }

    #[test]
    fn test_run_resolves_with_result() {
        let engine = ProjectionEngine::new();
        let result = engine.run_monte_carlo(small_params(1)).wait().unwrap();

        // Zero volatility: the single trial is the closed-form drift value.
        let expected = 1_000.0 * f64::exp(0.12);
        assert!((result.final_distribution[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_request_ids_are_monotonic() {
        let engine = ProjectionEngine::new();
        let first = engine.run_monte_carlo(small_params(1));
        let second = engine.run_monte_carlo(small_params(1));
        assert_eq!(first.id(), 1);
        assert_eq!(second.id(), 2);

        first.wait().unwrap();
        second.wait().unwrap();
    }

    #[test]
    fn test_error_rejects_only_its_request() {
        let engine = ProjectionEngine::new();

        let bad = SimulationParams {
            annual_return: f64::INFINITY,
            ..small_params(1)
        };
        let failing = engine.run_monte_carlo(bad);
        let healthy = engine.run_monte_carlo(small_params(1));

        match failing.wait() {
            Err(RunError::Failed(message)) => assert!(message.contains("annualReturn")),
            other => panic!("expected failure, got {other:?}"),
        }
        // The failure did not disturb the queued request.
        assert!(healthy.wait().is_ok());
    }

    #[test]
    fn test_progress_broadcast_to_all_listeners() {
        let engine = ProjectionEngine::new();

        let first_count = Arc::new(AtomicUsize::new(0));
        let second_count = Arc::new(AtomicUsize::new(0));

        let first = {
            let count = first_count.clone();
            engine.on_progress(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
        };
        let _second = {
            let count = second_count.clone();
            engine.on_progress(move |progress| {
                assert_eq!(progress.total, 500);
                count.fetch_add(1, Ordering::SeqCst);
            })
        };

        // Progress is delivered before the result on the same channel, so
        // both listeners have fired by the time wait() returns.
        engine.run_monte_carlo(small_params(500)).wait().unwrap();
        assert_eq!(first_count.load(Ordering::SeqCst), 2);
        assert_eq!(second_count.load(Ordering::SeqCst), 2);

        // After unsubscribing, only the remaining listener hears the next run.
        first.unsubscribe();
        engine.run_monte_carlo(small_params(500)).wait().unwrap();
        assert_eq!(first_count.load(Ordering::SeqCst), 2);
        assert_eq!(second_count.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_try_result_polls_without_blocking() {
        let engine = ProjectionEngine::new();
        let handle = engine.run_monte_carlo(small_params(2_000));

        // Poll until the run settles.
        loop {
            match handle.try_result() {
                None => std::thread::yield_now(),
                Some(Ok(result)) => {
                    assert_eq!(result.final_distribution.len(), 2_000);
                    break;
                }
                Some(Err(e)) => panic!("unexpected error: {e}"),
            }
        }
    }
}
