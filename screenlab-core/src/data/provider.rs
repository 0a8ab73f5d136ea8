//! Market-data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over the external data source so
//! the pipeline can be tested against mocks and the real client can be
//! swapped without touching derivation or assembly.

use thiserror::Error;

use crate::domain::{EarningsPoint, PricePoint, QuoteSummary, StatementTable, Timeframe};

/// Structured error types for fetch operations.
///
/// These are designed to be displayable in both CLI and TUI contexts, and the
/// pipeline scopes them: history/quote failures abort the whole render, while
/// earnings failures abort only the PE view.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no data available for {ticker}")]
    DataUnavailable { ticker: String },

    #[error("symbol not found: {ticker}")]
    SymbolNotFound { ticker: String },

    #[error("expected field missing from provider response: {field}")]
    FieldMissing { field: String },

    #[error("request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("hard stop: provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("fetch error: {0}")]
    Other(String),
}

/// Trait for market-data providers.
///
/// Implementations handle the specifics of one source. The response cache
/// sits above this trait — providers don't know about it.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the OHLCV history for a ticker at the timeframe's
    /// (range, interval) pair. Order and uniqueness are not guaranteed here;
    /// callers normalize before use.
    fn fetch_history(
        &self,
        ticker: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<PricePoint>, FetchError>;

    /// Fetch name, exchange, sector, description, and the ratio fields.
    fn fetch_quote_summary(&self, ticker: &str) -> Result<QuoteSummary, FetchError>;

    /// Fetch quarterly EPS reports, ascending by report date.
    ///
    /// Returns `FieldMissing` when the income statement exposes neither
    /// `epsBasic` nor `epsDiluted`.
    fn fetch_quarterly_earnings(&self, ticker: &str) -> Result<Vec<EarningsPoint>, FetchError>;

    /// Fetch the quarterly income statement table, most recent period first.
    fn fetch_income_statement(&self, ticker: &str) -> Result<StatementTable, FetchError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool {
        true
    }
}
