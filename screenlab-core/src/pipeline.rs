//! The per-request pipeline: fetch → normalize → derive → assemble.
//!
//! One synchronous pass per RenderRequest. Failure scoping:
//! - history or quote fetch failures abort the whole render;
//! - earnings failures (missing EPS fields, no reports) abort only the PE
//!   view — the price view stays independently renderable;
//! - insufficient trailing history is never an error, just NaN gaps.

use std::time::Duration;

use thiserror::Error;

use crate::axis;
use crate::chart::{self, ChartSpec, DerivedOverlays};
use crate::config::ScreenerConfig;
use crate::data::{normalize_history, FetchError, MarketDataProvider, ResponseCache};
use crate::derive::{align_backward, median_pe, pe_series, sma, ttm_eps};
use crate::domain::{ChartMode, PricePoint, QuoteSummary, RenderRequest, StatementTable};

/// Moving-average windows offered as chart overlays.
const SMA_SHORT: usize = 50;
const SMA_LONG: usize = 200;

/// Pipeline-level errors, scoped by how much of the render is lost.
#[derive(Debug, Error)]
pub enum ScreenError {
    /// The fetch returned nothing usable; nothing renders.
    #[error("no data available for {ticker}")]
    NoData { ticker: String },

    /// The fetch exceeded its time budget; nothing renders.
    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The PE view cannot be built, but a Price-mode request for the same
    /// ticker remains renderable.
    #[error("PE view unavailable: {0}")]
    PeUnavailable(#[source] FetchError),

    /// Any other fetch-boundary failure; nothing renders.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Everything the presentation layer needs for one request.
#[derive(Debug, Clone)]
pub struct ScreenRender {
    pub request: RenderRequest,
    pub chart: ChartSpec,
    pub quote: QuoteSummary,
    /// None when the provider had no statement data; a warning explains it.
    pub statements: Option<StatementTable>,
    pub warnings: Vec<String>,
}

/// The screener pipeline: provider + response cache.
pub struct Screener<P> {
    provider: P,
    cache: ResponseCache,
}

impl<P: MarketDataProvider> Screener<P> {
    pub fn new(provider: P, config: &ScreenerConfig) -> Self {
        Self {
            provider,
            cache: ResponseCache::new(Duration::from_secs(config.cache_ttl_secs)),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run the full pipeline for one request.
    pub fn render(&self, req: &RenderRequest) -> Result<ScreenRender, ScreenError> {
        let prices = self.history(req)?;

        // Empty history is a no-data condition: no gap rules, no traces.
        if prices.is_empty() {
            return Err(ScreenError::NoData {
                ticker: req.ticker.clone(),
            });
        }

        let gaps = axis::gap_policy(req.timeframe, &prices);
        let derived = self.derive(req, &prices)?;
        let chart = chart::assemble(req, &prices, &derived, gaps);

        let quote = self
            .provider
            .fetch_quote_summary(&req.ticker)
            .map_err(map_fatal)?;

        let mut warnings = Vec::new();
        let statements = match self.provider.fetch_income_statement(&req.ticker) {
            Ok(table) if !table.is_empty() => Some(table),
            Ok(_) => {
                warnings.push("no income statement data available".into());
                None
            }
            Err(e) => {
                warnings.push(format!("income statement unavailable: {e}"));
                None
            }
        };

        Ok(ScreenRender {
            request: req.clone(),
            chart,
            quote,
            statements,
            warnings,
        })
    }

    /// Cached or freshly fetched, always normalized.
    fn history(&self, req: &RenderRequest) -> Result<Vec<PricePoint>, ScreenError> {
        if let Some(points) = self.cache.get(&req.ticker, req.timeframe) {
            return Ok(points);
        }

        let raw = self
            .provider
            .fetch_history(&req.ticker, req.timeframe)
            .map_err(map_fatal)?;
        let (points, _report) = normalize_history(raw);

        if !points.is_empty() {
            self.cache.put(&req.ticker, req.timeframe, points.clone());
        }
        Ok(points)
    }

    /// Compute the overlays the requested mode needs.
    fn derive(
        &self,
        req: &RenderRequest,
        prices: &[PricePoint],
    ) -> Result<DerivedOverlays, ScreenError> {
        match req.mode {
            ChartMode::Price => Ok(DerivedOverlays {
                sma50: Some(sma(prices, SMA_SHORT)),
                sma200: Some(sma(prices, SMA_LONG)),
                ..DerivedOverlays::default()
            }),
            ChartMode::PeRatio => {
                let reports = self
                    .provider
                    .fetch_quarterly_earnings(&req.ticker)
                    .map_err(map_pe_scoped)?;
                if reports.is_empty() {
                    return Err(ScreenError::PeUnavailable(FetchError::DataUnavailable {
                        ticker: req.ticker.clone(),
                    }));
                }

                let ttm = ttm_eps(&reports);
                let ttm_aligned = align_backward(prices, &reports, &ttm);
                let pe = pe_series(prices, &ttm_aligned);
                let median = median_pe(&pe);

                Ok(DerivedOverlays {
                    ttm_eps: Some(ttm_aligned),
                    pe: Some(pe),
                    median_pe: median,
                    ..DerivedOverlays::default()
                })
            }
        }
    }
}

/// History/quote failures take down the whole render.
fn map_fatal(e: FetchError) -> ScreenError {
    match e {
        FetchError::Timeout { seconds } => ScreenError::Timeout { seconds },
        FetchError::DataUnavailable { ticker } | FetchError::SymbolNotFound { ticker } => {
            ScreenError::NoData { ticker }
        }
        other => ScreenError::Fetch(other),
    }
}

/// Earnings failures are scoped to the PE view, except timeouts.
fn map_pe_scoped(e: FetchError) -> ScreenError {
    match e {
        FetchError::Timeout { seconds } => ScreenError::Timeout { seconds },
        other => ScreenError::PeUnavailable(other),
    }
}
