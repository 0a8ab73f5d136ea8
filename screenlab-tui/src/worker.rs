//! Background worker thread — the fetch/derive/assemble pipeline runs here.
//!
//! Communication with the main thread is via mpsc channels. Every command
//! carries a sequence number; the app discards responses whose sequence is
//! stale, and the cancel flag lets a superseded render skip its send
//! entirely (last-request-wins).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use screenlab_core::config::ScreenerConfig;
use screenlab_core::data::{CircuitBreaker, YahooProvider};
use screenlab_core::domain::RenderRequest;
use screenlab_core::pipeline::{ScreenError, ScreenRender, Screener};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Render { request: RenderRequest, seq: u64 },
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    RenderComplete {
        seq: u64,
        render: Box<ScreenRender>,
    },
    /// The PE view failed but the price view for this ticker still works.
    PeUnavailable {
        seq: u64,
        message: String,
    },
    RenderFailed {
        seq: u64,
        message: String,
    },
}

impl WorkerResponse {
    pub fn seq(&self) -> u64 {
        match self {
            WorkerResponse::RenderComplete { seq, .. }
            | WorkerResponse::PeUnavailable { seq, .. }
            | WorkerResponse::RenderFailed { seq, .. } => *seq,
        }
    }
}

/// Spawn the background worker thread.
pub fn spawn_worker(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    cancel: Arc<AtomicBool>,
    config: ScreenerConfig,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("screenlab-worker".into())
        .spawn(move || {
            worker_loop(rx, tx, cancel, config);
        })
        .expect("failed to spawn worker thread")
}

fn worker_loop(
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
    cancel: Arc<AtomicBool>,
    config: ScreenerConfig,
) {
    // One screener for the thread's lifetime so the response cache spans
    // requests.
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(breaker, Duration::from_secs(config.request_timeout_secs));
    let screener = Screener::new(provider, &config);

    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Render { request, seq }) => {
                cancel.store(false, Ordering::Relaxed);

                let resp = match screener.render(&request) {
                    Ok(render) => WorkerResponse::RenderComplete {
                        seq,
                        render: Box::new(render),
                    },
                    Err(ScreenError::PeUnavailable(e)) => WorkerResponse::PeUnavailable {
                        seq,
                        message: e.to_string(),
                    },
                    Err(e) => WorkerResponse::RenderFailed {
                        seq,
                        message: e.to_string(),
                    },
                };

                // A newer selection arrived while this one was in flight.
                if cancel.load(Ordering::Relaxed) {
                    continue;
                }
                let _ = tx.send(resp);
            }
        }
    }
}
