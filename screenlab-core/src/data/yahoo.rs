//! Yahoo Finance provider.
//!
//! History comes from the v8 chart API (range/interval parameters), quote
//! fundamentals and quarterly income statements from the v10 quoteSummary
//! API. Handles bounded timeouts, retries with exponential backoff, and the
//! circuit breaker.
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes, so every field is optional at the parse layer and normalization
//! happens before anything downstream sees the data.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::circuit_breaker::CircuitBreaker;
use super::provider::{FetchError, MarketDataProvider};
use crate::domain::{
    earnings, EarningsPoint, PricePoint, QuoteSummary, StatementRow, StatementTable, Timeframe,
};

const BASE_URL: &str = "https://query2.finance.yahoo.com";

// ── v8 chart API response ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Seconds to add to UTC to get the exchange-local clock.
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<u64>>,
}

// ── v10 quoteSummary API response ───────────────────────────────────

#[derive(Debug, Deserialize)]
struct QuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryResult,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    result: Option<Vec<Modules>>,
    error: Option<ApiError>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Modules {
    price: Option<PriceModule>,
    summary_profile: Option<SummaryProfileModule>,
    summary_detail: Option<SummaryDetailModule>,
    default_key_statistics: Option<KeyStatisticsModule>,
    income_statement_history_quarterly: Option<IncomeHistoryModule>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}`.
#[derive(Debug, Default, Deserialize)]
struct Wrapped {
    raw: Option<f64>,
}

impl Wrapped {
    fn value(opt: &Option<Wrapped>) -> Option<f64> {
        opt.as_ref().and_then(|w| w.raw)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    exchange_name: Option<String>,
    market_cap: Option<Wrapped>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryProfileModule {
    sector: Option<String>,
    long_business_summary: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetailModule {
    trailing_pe: Option<Wrapped>,
    /// Raw fraction (0.0044 for 0.44%).
    dividend_yield: Option<Wrapped>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyStatisticsModule {
    trailing_eps: Option<Wrapped>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeHistoryModule {
    income_statement_history: Vec<IncomeStatementEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomeStatementEntry {
    end_date: Option<Wrapped>,
    total_revenue: Option<Wrapped>,
    gross_profit: Option<Wrapped>,
    operating_income: Option<Wrapped>,
    net_income: Option<Wrapped>,
    eps_basic: Option<Wrapped>,
    eps_diluted: Option<Wrapped>,
}

impl IncomeStatementEntry {
    fn period(&self) -> Option<NaiveDate> {
        Wrapped::value(&self.end_date)
            .and_then(|epoch| chrono::DateTime::from_timestamp(epoch as i64, 0))
            .map(|dt| dt.naive_utc().date())
    }

    /// Quarterly EPS: prefer basic, fall back to diluted.
    fn eps(&self) -> Option<f64> {
        Wrapped::value(&self.eps_basic).or_else(|| Wrapped::value(&self.eps_diluted))
    }
}

// ── provider ────────────────────────────────────────────────────────

/// Yahoo Finance market-data provider.
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    breaker: Arc<CircuitBreaker>,
    timeout: Duration,
    max_retries: u32,
    base_delay: Duration,
}

impl YahooProvider {
    pub fn new(breaker: Arc<CircuitBreaker>, timeout: Duration) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            breaker,
            timeout,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    fn chart_url(ticker: &str, timeframe: Timeframe) -> String {
        let range = timeframe.range_param();
        let interval = timeframe.interval().api_param();
        format!(
            "{BASE_URL}/v8/finance/chart/{ticker}\
             ?range={range}&interval={interval}&includePrePost=false"
        )
    }

    fn quote_summary_url(ticker: &str, modules: &str) -> String {
        format!("{BASE_URL}/v10/finance/quoteSummary/{ticker}?modules={modules}")
    }

    /// Execute one GET with retry, backoff, and circuit breaker accounting.
    fn get_json<T: DeserializeOwned>(&self, ticker: &str, url: &str) -> Result<T, FetchError> {
        if !self.breaker.is_allowed() {
            return Err(FetchError::CircuitBreakerTripped);
        }

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            if !self.breaker.is_allowed() {
                return Err(FetchError::CircuitBreakerTripped);
            }

            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::FORBIDDEN {
                        // IP ban — immediately trip the circuit breaker
                        self.breaker.trip();
                        return Err(FetchError::CircuitBreakerTripped);
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        self.breaker.record_failure();
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(FetchError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(FetchError::SymbolNotFound {
                            ticker: ticker.to_string(),
                        });
                    }

                    if !status.is_success() {
                        self.breaker.record_failure();
                        last_error = Some(FetchError::Other(format!("HTTP {status} for {ticker}")));
                        continue;
                    }

                    let parsed: T = resp.json().map_err(|e| {
                        FetchError::ResponseFormatChanged(format!(
                            "failed to parse response for {ticker}: {e}"
                        ))
                    })?;

                    self.breaker.record_success();
                    return Ok(parsed);
                }
                Err(e) => {
                    if e.is_timeout() {
                        return Err(FetchError::Timeout {
                            seconds: self.timeout.as_secs(),
                        });
                    }
                    if e.is_connect() {
                        last_error = Some(FetchError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(FetchError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::Other("max retries exceeded".into())))
    }

    fn modules(&self, ticker: &str, modules: &str) -> Result<Modules, FetchError> {
        let url = Self::quote_summary_url(ticker, modules);
        let resp: QuoteSummaryResponse = self.get_json(ticker, &url)?;
        unwrap_result(ticker, resp.quote_summary.result, resp.quote_summary.error)
    }
}

/// Shared result/error unwrapping for both Yahoo endpoints.
fn unwrap_result<T>(
    ticker: &str,
    result: Option<Vec<T>>,
    error: Option<ApiError>,
) -> Result<T, FetchError> {
    let items = result.ok_or_else(|| match error {
        Some(err) if err.code == "Not Found" => FetchError::SymbolNotFound {
            ticker: ticker.to_string(),
        },
        Some(err) => FetchError::ResponseFormatChanged(format!("{}: {}", err.code, err.description)),
        None => FetchError::ResponseFormatChanged("empty result with no error".into()),
    })?;

    items
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::ResponseFormatChanged("result array is empty".into()))
}

/// Parse the chart API response into price points (exchange-local timestamps).
fn parse_history(ticker: &str, resp: ChartResponse) -> Result<Vec<PricePoint>, FetchError> {
    let data = unwrap_result(ticker, resp.chart.result, resp.chart.error)?;

    let gmtoffset = data.meta.as_ref().and_then(|m| m.gmtoffset).unwrap_or(0);

    let timestamps = data
        .timestamp
        .ok_or_else(|| FetchError::ResponseFormatChanged("no timestamps".into()))?;

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::ResponseFormatChanged("no quote data".into()))?;

    let mut points = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        let local = chrono::DateTime::from_timestamp(ts + gmtoffset, 0)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| FetchError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Skip rows where all OHLCV are None (holidays / halted sessions)
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        points.push(PricePoint {
            ts: local,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
        });
    }

    if points.is_empty() {
        return Err(FetchError::DataUnavailable {
            ticker: ticker.to_string(),
        });
    }

    Ok(points)
}

/// Build the quote summary record from the fetched modules.
fn parse_quote_summary(ticker: &str, modules: Modules) -> QuoteSummary {
    let price = modules.price;
    let profile = modules.summary_profile;
    let detail = modules.summary_detail;
    let stats = modules.default_key_statistics;

    let name = price
        .as_ref()
        .and_then(|p| p.long_name.clone().or_else(|| p.short_name.clone()))
        .unwrap_or_else(|| ticker.to_string());

    QuoteSummary {
        name,
        exchange: price.as_ref().and_then(|p| p.exchange_name.clone()),
        sector: profile.as_ref().and_then(|p| p.sector.clone()),
        description: profile.and_then(|p| p.long_business_summary),
        market_cap: price.as_ref().and_then(|p| Wrapped::value(&p.market_cap)),
        pe_ratio_trailing: detail.as_ref().and_then(|d| Wrapped::value(&d.trailing_pe)),
        eps_trailing: stats.and_then(|s| Wrapped::value(&s.trailing_eps)),
        // Provider reports a raw fraction; the record carries a percentage.
        // Missing stays None (rendered "N/A"), never coerced to 0%.
        dividend_yield_pct: detail
            .and_then(|d| Wrapped::value(&d.dividend_yield))
            .map(|frac| frac * 100.0),
    }
}

/// Extract quarterly EPS reports from the income statement history.
///
/// `FieldMissing` when entries exist but none carries `epsBasic` or
/// `epsDiluted` — the PE view must not render from a partial signal.
fn parse_quarterly_earnings(history: &[IncomeStatementEntry]) -> Result<Vec<EarningsPoint>, FetchError> {
    let mut reports = Vec::with_capacity(history.len());
    let mut saw_eps_field = false;

    for entry in history {
        if entry.eps().is_some() {
            saw_eps_field = true;
        }
        if let (Some(date), Some(eps)) = (entry.period(), entry.eps()) {
            reports.push(EarningsPoint {
                report_date: date,
                eps,
            });
        }
    }

    if !history.is_empty() && !saw_eps_field {
        return Err(FetchError::FieldMissing {
            field: "epsBasic/epsDiluted".into(),
        });
    }

    Ok(earnings::sort_dedupe(reports))
}

/// Build the statement table, most recent period first.
fn parse_income_statement(history: Vec<IncomeStatementEntry>) -> StatementTable {
    let mut entries: Vec<IncomeStatementEntry> = history
        .into_iter()
        .filter(|e| e.period().is_some())
        .collect();
    entries.sort_by_key(|e| std::cmp::Reverse(e.period()));

    let periods: Vec<NaiveDate> = entries.iter().filter_map(|e| e.period()).collect();

    let line_items: [(&str, fn(&IncomeStatementEntry) -> Option<f64>); 6] = [
        ("Total Revenue", |e| Wrapped::value(&e.total_revenue)),
        ("Gross Profit", |e| Wrapped::value(&e.gross_profit)),
        ("Operating Income", |e| Wrapped::value(&e.operating_income)),
        ("Net Income", |e| Wrapped::value(&e.net_income)),
        ("EPS (Basic)", |e| Wrapped::value(&e.eps_basic)),
        ("EPS (Diluted)", |e| Wrapped::value(&e.eps_diluted)),
    ];

    let rows = line_items
        .iter()
        .map(|(label, extract)| StatementRow {
            label: (*label).to_string(),
            values: entries.iter().map(extract).collect(),
        })
        // Drop line items the provider never reported for this ticker
        .filter(|row| row.values.iter().any(|v| v.is_some()))
        .collect();

    StatementTable { periods, rows }
}

impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch_history(
        &self,
        ticker: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<PricePoint>, FetchError> {
        let url = Self::chart_url(ticker, timeframe);
        let resp: ChartResponse = self.get_json(ticker, &url)?;
        parse_history(ticker, resp)
    }

    fn fetch_quote_summary(&self, ticker: &str) -> Result<QuoteSummary, FetchError> {
        let modules =
            self.modules(ticker, "price,summaryProfile,summaryDetail,defaultKeyStatistics")?;
        Ok(parse_quote_summary(ticker, modules))
    }

    fn fetch_quarterly_earnings(&self, ticker: &str) -> Result<Vec<EarningsPoint>, FetchError> {
        let modules = self.modules(ticker, "incomeStatementHistoryQuarterly")?;
        let history = modules
            .income_statement_history_quarterly
            .map(|m| m.income_statement_history)
            .unwrap_or_default();
        parse_quarterly_earnings(&history)
    }

    fn fetch_income_statement(&self, ticker: &str) -> Result<StatementTable, FetchError> {
        let modules = self.modules(ticker, "incomeStatementHistoryQuarterly")?;
        let history = modules
            .income_statement_history_quarterly
            .map(|m| m.income_statement_history)
            .unwrap_or_default();
        Ok(parse_income_statement(history))
    }

    fn is_available(&self) -> bool {
        self.breaker.is_allowed()
    }
}
