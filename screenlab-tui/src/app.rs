//! Application state — single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels,
//! and every in-flight request is identified by a sequence number so a late
//! response can never overwrite a newer selection.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Arc;

use chrono::NaiveDateTime;

use screenlab_core::domain::{ChartMode, OverlayToggles, RenderRequest, Timeframe};
use screenlab_core::pipeline::ScreenRender;

use crate::worker::{WorkerCommand, WorkerResponse};

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the status history.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub message: String,
    pub context: String,
}

const MAX_ERROR_HISTORY: usize = 50;

pub struct AppState {
    pub running: bool,

    // Ticker entry
    pub editing_ticker: bool,
    pub ticker_input: String,
    /// Last submitted ticker (normalized uppercase).
    pub ticker: String,

    // Current selection
    pub timeframe: Timeframe,
    pub mode: ChartMode,
    pub toggles: OverlayToggles,

    // Latest accepted render and PE-mode notice
    pub render: Option<ScreenRender>,
    pub pe_notice: Option<String>,

    // Request tracking
    pub seq: u64,
    pub fetch_in_progress: bool,

    // Status & errors
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,

    // Worker plumbing
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    pub cancel: Arc<AtomicBool>,

    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        cancel: Arc<AtomicBool>,
        state_path: PathBuf,
        default_timeframe: Timeframe,
    ) -> Self {
        Self {
            running: true,
            editing_ticker: false,
            ticker_input: String::new(),
            ticker: "AAPL".into(),
            timeframe: default_timeframe,
            mode: ChartMode::Price,
            toggles: OverlayToggles::default(),
            render: None,
            pe_notice: None,
            seq: 0,
            fetch_in_progress: false,
            status_message: None,
            error_history: VecDeque::new(),
            worker_tx,
            worker_rx,
            cancel,
            state_path,
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Error));
    }

    pub fn push_error(&mut self, message: String, context: String) {
        self.error_history.push_front(ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            message,
            context,
        });
        self.error_history.truncate(MAX_ERROR_HISTORY);
    }

    /// Submit the current selection as a new render request.
    ///
    /// Bumps the sequence number and raises the cancel flag so any in-flight
    /// result is discarded rather than racing the new one.
    pub fn submit(&mut self) {
        if self.ticker.trim().is_empty() {
            self.set_warning("Enter a ticker first");
            return;
        }

        self.seq += 1;
        self.fetch_in_progress = true;
        self.cancel.store(true, Ordering::Relaxed);

        let request =
            RenderRequest::new(&self.ticker, self.timeframe, self.mode, self.toggles);
        self.ticker = request.ticker.clone();
        let _ = self.worker_tx.send(WorkerCommand::Render {
            request,
            seq: self.seq,
        });

        self.set_status(format!(
            "Loading {} ({}, {})...",
            self.ticker,
            self.timeframe.label(),
            self.mode.label()
        ));
    }

    /// Apply a worker response, dropping anything stale.
    pub fn apply_response(&mut self, resp: WorkerResponse) {
        if resp.seq() != self.seq {
            // A newer request owns the screen.
            return;
        }
        self.fetch_in_progress = false;

        match resp {
            WorkerResponse::RenderComplete { render, .. } => {
                self.pe_notice = None;
                if let Some(warning) = render.warnings.first() {
                    self.set_warning(warning.clone());
                } else {
                    self.set_status(format!("{} loaded", render.request.ticker));
                }
                self.render = Some(*render);
            }
            WorkerResponse::PeUnavailable { message, .. } => {
                // Keep whatever chart is on screen; the price view still works.
                self.pe_notice = Some(message.clone());
                self.push_error(message, format!("{} (PE view)", self.ticker));
                self.set_warning("PE view unavailable; price view still renders");
            }
            WorkerResponse::RenderFailed { message, .. } => {
                self.render = None;
                self.push_error(message.clone(), self.ticker.clone());
                self.set_error(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screenlab_core::axis::{AxisGapSpec, TickConfig, TickLabelFormat};
    use screenlab_core::chart::{ChartSpec, XAxisConfig};
    use screenlab_core::domain::QuoteSummary;
    use std::sync::mpsc;

    fn test_app() -> AppState {
        // worker ends are dropped: sends fail silently, which state logic ignores
        let (tx, _) = mpsc::channel();
        let (_, rx) = mpsc::channel();
        AppState::new(
            tx,
            rx,
            Arc::new(AtomicBool::new(false)),
            PathBuf::from("/tmp/screenlab-test-state.json"),
            Timeframe::OneYear,
        )
    }

    fn dummy_render(app: &AppState, label: &str) -> Box<ScreenRender> {
        Box::new(ScreenRender {
            request: RenderRequest::new(&app.ticker, app.timeframe, app.mode, app.toggles),
            chart: ChartSpec {
                title: label.into(),
                traces: vec![],
                x_axis: XAxisConfig {
                    title: "Date".into(),
                    gaps: AxisGapSpec {
                        breaks: vec![],
                        ticks: TickConfig {
                            dtick_ms: None,
                            format: TickLabelFormat::Auto,
                        },
                    },
                },
                y_axes: vec![],
            },
            quote: QuoteSummary {
                name: "Test Inc.".into(),
                exchange: None,
                sector: None,
                description: None,
                market_cap: None,
                pe_ratio_trailing: None,
                eps_trailing: None,
                dividend_yield_pct: None,
            },
            statements: None,
            warnings: vec![],
        })
    }

    #[test]
    fn stale_response_never_overwrites_newer_state() {
        let mut app = test_app();
        app.submit(); // seq 1
        let stale = dummy_render(&app, "stale");
        app.submit(); // seq 2 — user changed selection before seq 1 landed

        app.apply_response(WorkerResponse::RenderComplete {
            seq: 1,
            render: stale,
        });
        assert!(app.render.is_none(), "stale response was applied");
        assert!(app.fetch_in_progress, "stale response cleared the spinner");

        app.apply_response(WorkerResponse::RenderComplete {
            seq: 2,
            render: dummy_render(&app, "fresh"),
        });
        assert_eq!(app.render.as_ref().unwrap().chart.title, "fresh");
        assert!(!app.fetch_in_progress);
    }

    #[test]
    fn pe_failure_keeps_previous_chart() {
        let mut app = test_app();
        app.submit();
        app.apply_response(WorkerResponse::RenderComplete {
            seq: 1,
            render: dummy_render(&app, "price chart"),
        });

        app.mode = ChartMode::PeRatio;
        app.submit();
        app.apply_response(WorkerResponse::PeUnavailable {
            seq: 2,
            message: "expected field missing from provider response: epsBasic/epsDiluted".into(),
        });

        assert!(app.render.is_some(), "price chart was dropped");
        assert!(app.pe_notice.is_some());
        assert_eq!(app.error_history.len(), 1);
    }

    #[test]
    fn render_failure_clears_chart_and_records_error() {
        let mut app = test_app();
        app.submit();
        app.apply_response(WorkerResponse::RenderComplete {
            seq: 1,
            render: dummy_render(&app, "chart"),
        });

        app.submit();
        app.apply_response(WorkerResponse::RenderFailed {
            seq: 2,
            message: "no data available for AAPL".into(),
        });

        assert!(app.render.is_none());
        assert_eq!(app.error_history.len(), 1);
        assert!(matches!(
            app.status_message,
            Some((_, StatusLevel::Error))
        ));
    }

    #[test]
    fn error_history_is_bounded() {
        let mut app = test_app();
        for i in 0..(MAX_ERROR_HISTORY + 20) {
            app.push_error(format!("error {i}"), "ctx".into());
        }
        assert_eq!(app.error_history.len(), MAX_ERROR_HISTORY);
        // most recent first
        assert!(app.error_history[0].message.ends_with("69"));
    }

    #[test]
    fn empty_ticker_is_rejected_without_a_request() {
        let mut app = test_app();
        app.ticker = "  ".into();
        app.submit();
        assert_eq!(app.seq, 0);
        assert!(!app.fetch_in_progress);
    }
}
