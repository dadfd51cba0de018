//! Background worker hosting the Monte Carlo orchestrator off the caller's
//! thread.
//!
//! The worker is a single persistent computation unit: one thread, one
//! request at a time, run to completion. A request posted while another is
//! executing queues at the channel and becomes the active request only once
//! the loop is free again. There is no cancellation; a run that has started
//! always finishes.

use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::{self, JoinHandle};

use foliocast_core::model::{MonteCarloResult, SimulationParams};
use foliocast_core::monte_carlo::run_monte_carlo;
use foliocast_core::rng::GaussianRng;

/// Request accepted by the worker thread.
#[derive(Debug)]
pub enum WorkerRequest {
    /// Run a Monte Carlo projection under the given request id.
    Run { id: u64, params: SimulationParams },
    /// Graceful shutdown.
    Shutdown,
}

/// Message posted back by the worker thread.
#[derive(Debug)]
pub enum WorkerResponse {
    /// Periodic progress for the active request.
    Progress {
        id: u64,
        completed: usize,
        total: usize,
    },
    /// Projection completed (boxed to keep the enum small).
    Result {
        id: u64,
        result: Box<MonteCarloResult>,
    },
    /// Projection failed.
    Error { id: u64, message: String },
}

/// Handle to the persistent computation unit.
///
/// Progress events carry whichever request id is currently active, so
/// callers wanting precise progress attribution must await each result
/// before submitting the next run. Results and errors are always tagged with
/// the id of the request that produced them.
pub struct ProjectionWorker {
    request_tx: Sender<WorkerRequest>,
    thread: Option<JoinHandle<()>>,
}

impl ProjectionWorker {
    /// Spawn the worker thread, posting responses to `response_tx`.
    pub fn spawn(response_tx: Sender<WorkerResponse>) -> Self {
        let (request_tx, request_rx) = channel();

        let mut ctx = WorkerContext {
            response_tx,
            active_request_id: 0,
        };
        let thread = thread::spawn(move || {
            ctx.run(request_rx);
        });

        Self {
            request_tx,
            thread: Some(thread),
        }
    }

    /// Send a request to the worker.
    ///
    /// Returns true if the request was accepted by the channel.
    pub fn send(&self, request: WorkerRequest) -> bool {
        self.request_tx.send(request).is_ok()
    }

    /// Ask the worker to exit after the current request.
    pub fn shutdown(&self) {
        let _ = self.request_tx.send(WorkerRequest::Shutdown);
    }
}

impl Drop for ProjectionWorker {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// State owned by the worker thread.
struct WorkerContext {
    response_tx: Sender<WorkerResponse>,
    /// Single in-flight request slot, overwritten by each `Run` message.
    /// Progress events are tagged with this value.
    active_request_id: u64,
}

impl WorkerContext {
    fn run(&mut self, request_rx: Receiver<WorkerRequest>) {
        while let Ok(request) = request_rx.recv() {
            match request {
                WorkerRequest::Shutdown => break,

                WorkerRequest::Run { id, params } => {
                    self.active_request_id = id;
                    tracing::info!(
                        id,
                        simulations = params.simulations,
                        months = params.months,
                        "starting projection"
                    );

                    let active_id = self.active_request_id;
                    let progress_tx = self.response_tx.clone();
                    let mut source = GaussianRng::from_os_rng();

                    let outcome =
                        run_monte_carlo(&params, &mut source, |completed, total| {
                            let _ = progress_tx.send(WorkerResponse::Progress {
                                id: active_id,
                                completed,
                                total,
                            });
                        });

                    match outcome {
                        Ok(result) => {
                            let _ = self.response_tx.send(WorkerResponse::Result {
                                id,
                                result: Box::new(result),
                            });
                        }
                        Err(e) => {
                            // A bad request must not take the worker down or
                            // disturb any other pending request.
                            tracing::warn!(id, error = %e, "projection failed");
                            let _ = self.response_tx.send(WorkerResponse::Error {
                                id,
                                message: e.to_string(),
                            });
                        }
                    }
                }
            }
        }
    }
}
