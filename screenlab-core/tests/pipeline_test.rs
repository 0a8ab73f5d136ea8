//! End-to-end pipeline tests against a scripted mock provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use screenlab_core::config::ScreenerConfig;
use screenlab_core::data::{FetchError, MarketDataProvider};
use screenlab_core::domain::{
    ChartMode, EarningsPoint, OverlayToggles, PricePoint, QuoteSummary, RenderRequest,
    StatementRow, StatementTable, Timeframe,
};
use screenlab_core::pipeline::{ScreenError, Screener};

/// Scripted provider: canned data per endpoint plus call counting.
#[derive(Default)]
struct MockProvider {
    history: Vec<PricePoint>,
    earnings: Option<Result<Vec<EarningsPoint>, &'static str>>,
    history_error: Option<fn(&str) -> FetchError>,
    statement_fails: bool,
    /// Shared so tests can read it after the provider moves into the screener.
    history_calls: Arc<AtomicUsize>,
}

fn daily_points(closes: &[f64]) -> Vec<PricePoint> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PricePoint {
            ts: (base + chrono::Duration::days(i as i64))
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        })
        .collect()
}

fn quarterly(eps: &[f64]) -> Vec<EarningsPoint> {
    let base = NaiveDate::from_ymd_opt(2022, 12, 31).unwrap();
    eps.iter()
        .enumerate()
        .map(|(i, &e)| EarningsPoint {
            report_date: base + chrono::Months::new(3 * i as u32),
            eps: e,
        })
        .collect()
}

impl MarketDataProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_history(
        &self,
        ticker: &str,
        _timeframe: Timeframe,
    ) -> Result<Vec<PricePoint>, FetchError> {
        self.history_calls.fetch_add(1, Ordering::Relaxed);
        if let Some(make_err) = self.history_error {
            return Err(make_err(ticker));
        }
        Ok(self.history.clone())
    }

    fn fetch_quote_summary(&self, ticker: &str) -> Result<QuoteSummary, FetchError> {
        Ok(QuoteSummary {
            name: format!("{ticker} Inc."),
            exchange: Some("NYSE".into()),
            sector: Some("Technology".into()),
            description: None,
            market_cap: Some(1.0e11),
            pe_ratio_trailing: Some(25.0),
            eps_trailing: Some(4.0),
            dividend_yield_pct: None,
        })
    }

    fn fetch_quarterly_earnings(&self, _ticker: &str) -> Result<Vec<EarningsPoint>, FetchError> {
        match &self.earnings {
            Some(Ok(reports)) => Ok(reports.clone()),
            Some(Err(field)) => Err(FetchError::FieldMissing {
                field: (*field).into(),
            }),
            None => Ok(vec![]),
        }
    }

    fn fetch_income_statement(&self, _ticker: &str) -> Result<StatementTable, FetchError> {
        if self.statement_fails {
            return Err(FetchError::Other("upstream 500".into()));
        }
        Ok(StatementTable {
            periods: vec![NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()],
            rows: vec![StatementRow {
                label: "Total Revenue".into(),
                values: vec![Some(9.9e9)],
            }],
        })
    }
}

fn request(mode: ChartMode) -> RenderRequest {
    RenderRequest::new("TEST", Timeframe::OneYear, mode, OverlayToggles::default())
}

fn config(cache_ttl_secs: u64) -> ScreenerConfig {
    ScreenerConfig {
        cache_ttl_secs,
        ..ScreenerConfig::default()
    }
}

#[test]
fn empty_history_reports_no_data_with_no_chart() {
    let provider = MockProvider::default();
    let screener = Screener::new(provider, &config(0));

    let err = screener.render(&request(ChartMode::Price)).unwrap_err();
    assert!(matches!(err, ScreenError::NoData { ref ticker } if ticker == "TEST"));
}

#[test]
fn price_mode_renders_chart_quote_and_statements() {
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0, 103.0]),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let render = screener.render(&request(ChartMode::Price)).unwrap();
    let names: Vec<&str> = render.chart.traces.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Price", "Volume"]);
    assert_eq!(render.quote.name, "TEST Inc.");
    assert!(render.statements.is_some());
    assert!(render.warnings.is_empty());
}

#[test]
fn missing_eps_fields_abort_pe_view_only() {
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0]),
        earnings: Some(Err("epsBasic/epsDiluted")),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    // PE mode fails with the mode-scoped error...
    let err = screener.render(&request(ChartMode::PeRatio)).unwrap_err();
    match err {
        ScreenError::PeUnavailable(FetchError::FieldMissing { field }) => {
            assert_eq!(field, "epsBasic/epsDiluted");
        }
        other => panic!("expected PeUnavailable(FieldMissing), got {other:?}"),
    }

    // ...while Price mode on the same screener still renders.
    let render = screener.render(&request(ChartMode::Price)).unwrap();
    assert!(!render.chart.traces.is_empty());
}

#[test]
fn empty_earnings_history_also_aborts_pe_view_only() {
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0]),
        earnings: None,
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let err = screener.render(&request(ChartMode::PeRatio)).unwrap_err();
    assert!(matches!(err, ScreenError::PeUnavailable(_)));
    assert!(screener.render(&request(ChartMode::Price)).is_ok());
}

#[test]
fn pe_mode_renders_all_three_traces() {
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0]),
        earnings: Some(Ok(quarterly(&[1.0, 1.1, 1.2, 1.3, 1.4]))),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let render = screener.render(&request(ChartMode::PeRatio)).unwrap();
    let names: Vec<&str> = render.chart.traces.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names.len(), 3);
    assert_eq!(names[0], "TTM EPS");
    assert_eq!(names[1], "PE");
    assert!(names[2].starts_with("Median PE = "));
}

#[test]
fn timeout_aborts_the_whole_render() {
    let provider = MockProvider {
        history_error: Some(|_| FetchError::Timeout { seconds: 30 }),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let err = screener.render(&request(ChartMode::Price)).unwrap_err();
    assert!(matches!(err, ScreenError::Timeout { seconds: 30 }));
}

#[test]
fn symbol_not_found_maps_to_no_data() {
    let provider = MockProvider {
        history_error: Some(|t| FetchError::SymbolNotFound {
            ticker: t.to_string(),
        }),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let err = screener.render(&request(ChartMode::Price)).unwrap_err();
    assert!(matches!(err, ScreenError::NoData { .. }));
}

#[test]
fn cache_hit_skips_the_provider_within_ttl() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0]),
        history_calls: calls.clone(),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(3600));

    let req = request(ChartMode::Price);
    screener.render(&req).unwrap();
    screener.render(&req).unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 1);
}

#[test]
fn disabled_cache_refetches_every_render() {
    let calls = Arc::new(AtomicUsize::new(0));
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0]),
        history_calls: calls.clone(),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let req = request(ChartMode::Price);
    screener.render(&req).unwrap();
    screener.render(&req).unwrap();
    assert_eq!(calls.load(Ordering::Relaxed), 2);
}

#[test]
fn statement_failure_degrades_to_warning() {
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0]),
        statement_fails: true,
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let render = screener.render(&request(ChartMode::Price)).unwrap();
    assert!(render.statements.is_none());
    assert_eq!(render.warnings.len(), 1);
    assert!(render.warnings[0].contains("income statement"));
}

#[test]
fn unordered_duplicate_history_is_normalized_before_derivation() {
    let mut history = daily_points(&[100.0, 101.0, 102.0, 103.0]);
    history.swap(0, 2);
    let mut dup = history[1].clone();
    dup.close = 999.0;
    history.push(dup);

    let provider = MockProvider {
        history,
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(0));

    let render = screener.render(&request(ChartMode::Price)).unwrap();
    let price = &render.chart.traces[0];
    assert_eq!(price.points.len(), 4);
    assert!(price.points.windows(2).all(|w| w[0].0 < w[1].0));
    assert!(price.points.iter().all(|&(_, v)| v != 999.0));
}

#[test]
fn identical_requests_yield_identical_chart_specs() {
    let provider = MockProvider {
        history: daily_points(&[100.0, 101.0, 102.0, 103.0]),
        earnings: Some(Ok(quarterly(&[1.0, 1.1, 1.2, 1.3, 1.4]))),
        ..MockProvider::default()
    };
    let screener = Screener::new(provider, &config(3600));

    for mode in [ChartMode::Price, ChartMode::PeRatio] {
        let a = screener.render(&request(mode)).unwrap();
        let b = screener.render(&request(mode)).unwrap();
        // serialized comparison: undefined entries are NaN, and NaN != NaN
        assert_eq!(
            serde_json::to_string(&a.chart).unwrap(),
            serde_json::to_string(&b.chart).unwrap()
        );
    }
}
