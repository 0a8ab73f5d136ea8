//! ScreenLab CLI — quote, chart, and statements commands.
//!
//! Commands:
//! - `quote` — overview and ratio card for a ticker
//! - `chart` — assemble a chart spec; print a summary, JSON, or CSV export
//! - `statements` — quarterly income statement table, optional CSV export

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use screenlab_core::chart::{AxisSide, ChartSpec, Visibility};
use screenlab_core::config::ScreenerConfig;
use screenlab_core::data::{CircuitBreaker, YahooProvider};
use screenlab_core::domain::{
    ChartMode, OverlayToggles, RenderRequest, StatementTable, Timeframe,
};
use screenlab_core::pipeline::{ScreenRender, Screener};

#[derive(Parser)]
#[command(
    name = "screenlab",
    about = "ScreenLab CLI — terminal stock screener"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./screenlab.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print overview and financial ratios for a ticker.
    Quote {
        /// Ticker symbol (case-insensitive).
        ticker: String,
    },
    /// Assemble the chart for a ticker and print or export it.
    Chart {
        /// Ticker symbol (case-insensitive).
        ticker: String,

        /// Timeframe: 1D, 5D, 1M, 6M, 1Yr, 3Yr, 5Yr, 10Yr, Max.
        #[arg(long, default_value = "1Yr")]
        timeframe: String,

        /// Chart mode: price or pe.
        #[arg(long, default_value = "price")]
        mode: String,

        /// Include the 50-day moving average overlay.
        #[arg(long, default_value_t = false)]
        sma50: bool,

        /// Include the 200-day moving average overlay.
        #[arg(long, default_value_t = false)]
        sma200: bool,

        /// Print the full chart spec as JSON instead of a summary.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Export the chart series to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Print the quarterly income statement, optionally exporting CSV.
    Statements {
        /// Ticker symbol (case-insensitive).
        ticker: String,

        /// Export the table to a CSV file.
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from("screenlab.toml"));
    let config = ScreenerConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let screener = build_screener(&config);

    match cli.command {
        Commands::Quote { ticker } => run_quote(&screener, &ticker, config.default_timeframe),
        Commands::Chart {
            ticker,
            timeframe,
            mode,
            sma50,
            sma200,
            json,
            csv,
        } => run_chart(&screener, &ticker, &timeframe, &mode, sma50, sma200, json, csv),
        Commands::Statements { ticker, csv } => {
            run_statements(&screener, &ticker, config.default_timeframe, csv)
        }
    }
}

fn build_screener(config: &ScreenerConfig) -> Screener<YahooProvider> {
    let breaker = Arc::new(CircuitBreaker::default_provider());
    let provider = YahooProvider::new(breaker, Duration::from_secs(config.request_timeout_secs));
    Screener::new(provider, config)
}

fn render(
    screener: &Screener<YahooProvider>,
    ticker: &str,
    timeframe: Timeframe,
    mode: ChartMode,
    toggles: OverlayToggles,
) -> Result<ScreenRender> {
    let request = RenderRequest::new(ticker, timeframe, mode, toggles);
    screener
        .render(&request)
        .with_context(|| format!("rendering {}", request.ticker))
}

fn run_quote(
    screener: &Screener<YahooProvider>,
    ticker: &str,
    timeframe: Timeframe,
) -> Result<()> {
    let result = render(
        screener,
        ticker,
        timeframe,
        ChartMode::Price,
        OverlayToggles::default(),
    )?;
    let quote = &result.quote;

    println!();
    println!("=== {} ===", quote.name);
    println!(
        "{} | {}",
        quote.exchange.as_deref().unwrap_or("N/A"),
        quote.sector.as_deref().unwrap_or("N/A")
    );
    if let Some(desc) = &quote.description {
        println!();
        println!("{desc}");
    }
    println!();
    println!("--- Ratios ---");
    println!("Market Cap:     {}", fmt_opt(quote.market_cap, |v| fmt_large(v)));
    println!("P/E Ratio:      {}", fmt_opt(quote.pe_ratio_trailing, |v| format!("{v:.2}")));
    println!("EPS (TTM):      {}", fmt_opt(quote.eps_trailing, |v| format!("{v:.2}")));
    println!(
        "Dividend Yield: {}",
        fmt_opt(quote.dividend_yield_pct, |v| format!("{v:.2}%"))
    );
    println!();

    for warning in &result.warnings {
        eprintln!("WARNING: {warning}");
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_chart(
    screener: &Screener<YahooProvider>,
    ticker: &str,
    timeframe: &str,
    mode: &str,
    sma50: bool,
    sma200: bool,
    json: bool,
    csv: Option<PathBuf>,
) -> Result<()> {
    let timeframe = Timeframe::from_label(timeframe)
        .ok_or_else(|| anyhow::anyhow!("unknown timeframe '{timeframe}'. Valid: 1D, 5D, 1M, 6M, 1Yr, 3Yr, 5Yr, 10Yr, Max"))?;

    let mode = match mode.to_ascii_lowercase().as_str() {
        "price" => ChartMode::Price,
        "pe" | "pe_ratio" => ChartMode::PeRatio,
        other => bail!("unknown mode '{other}'. Valid: price, pe"),
    };

    let toggles = OverlayToggles {
        sma50,
        sma200,
        ..OverlayToggles::default()
    };

    let result = render(screener, ticker, timeframe, mode, toggles)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.chart)?);
        return Ok(());
    }

    if let Some(path) = csv {
        export_chart_csv(&result.chart, &path)?;
        println!("Chart series written to: {}", path.display());
        return Ok(());
    }

    print_chart_summary(&result.chart);
    Ok(())
}

fn run_statements(
    screener: &Screener<YahooProvider>,
    ticker: &str,
    timeframe: Timeframe,
    csv: Option<PathBuf>,
) -> Result<()> {
    let result = render(
        screener,
        ticker,
        timeframe,
        ChartMode::Price,
        OverlayToggles::default(),
    )?;

    let Some(table) = &result.statements else {
        bail!("no income statement data available for {ticker}");
    };

    if let Some(path) = csv {
        export_statements_csv(table, &path)?;
        println!("Statements written to: {}", path.display());
        return Ok(());
    }

    print_statements(table);
    Ok(())
}

fn print_chart_summary(chart: &ChartSpec) {
    println!();
    println!("=== {} ===", chart.title);
    println!("{:<28} {:>8} {:>6} {:>12}", "Trace", "Points", "Axis", "Visibility");
    println!("{}", "-".repeat(58));
    for trace in &chart.traces {
        let defined = trace.points.iter().filter(|(_, v)| !v.is_nan()).count();
        println!(
            "{:<28} {:>8} {:>6} {:>12}",
            trace.name,
            defined,
            match trace.axis {
                AxisSide::Left => "left",
                AxisSide::Right => "right",
            },
            match trace.visibility {
                Visibility::Visible => "visible",
                Visibility::LegendOnly => "legend-only",
            },
        );
    }
    println!();
    println!("X-axis rangebreaks: {}", chart.x_axis.gaps.breaks.len());
    println!();
}

/// One row per timestamp, one column per trace; undefined values stay empty.
fn export_chart_csv(chart: &ChartSpec, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["timestamp".to_string()];
    header.extend(chart.traces.iter().map(|t| t.name.clone()));
    writer.write_record(&header)?;

    let n = chart.traces.iter().map(|t| t.points.len()).max().unwrap_or(0);
    for i in 0..n {
        let ts = chart
            .traces
            .iter()
            .find_map(|t| t.points.get(i).map(|&(ts, _)| ts));
        let Some(ts) = ts else { continue };

        let mut record = vec![ts.format("%Y-%m-%d %H:%M:%S").to_string()];
        for trace in &chart.traces {
            let cell = match trace.points.get(i) {
                Some(&(_, v)) if !v.is_nan() => format!("{v}"),
                _ => String::new(),
            };
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn print_statements(table: &StatementTable) {
    println!();
    print!("{:<20}", "Line Item");
    for period in &table.periods {
        print!("{:>14}", period.format("%Y-%m-%d"));
    }
    println!();
    println!("{}", "-".repeat(20 + 14 * table.periods.len()));

    for row in &table.rows {
        print!("{:<20}", row.label);
        for value in &row.values {
            match value {
                Some(v) => print!("{:>14}", fmt_large(*v)),
                None => print!("{:>14}", "-"),
            }
        }
        println!();
    }
    println!();
}

fn export_statements_csv(table: &StatementTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["line_item".to_string()];
    header.extend(table.periods.iter().map(|p| p.format("%Y-%m-%d").to_string()));
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut record = vec![row.label.clone()];
        for value in &row.values {
            record.push(value.map(|v| format!("{v}")).unwrap_or_default());
        }
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

fn fmt_opt(value: Option<f64>, fmt: impl Fn(f64) -> String) -> String {
    value.map(fmt).unwrap_or_else(|| "N/A".into())
}

/// Large-figure formatting shared by quote and statement output.
fn fmt_large(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1.0e12 {
        format!("{:.2}T", v / 1.0e12)
    } else if abs >= 1.0e9 {
        format!("{:.2}B", v / 1.0e9)
    } else if abs >= 1.0e6 {
        format!("{:.1}M", v / 1.0e6)
    } else {
        format!("{v:.2}")
    }
}
