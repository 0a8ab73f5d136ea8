//! Chart assembly — pure construction of a renderable chart specification.
//!
//! Assembly is a function of (request, series, gap spec) and nothing else:
//! identical inputs produce an identical ChartSpec, trace order included.
//! The spec is renderer-agnostic; the TUI maps it onto ratatui datasets and
//! a JSON dump of it drives external plotting.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::axis::AxisGapSpec;
use crate::domain::{ChartMode, PricePoint, RenderRequest};

/// How a trace is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    Line,
    Bar,
}

/// Which y axis a trace is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisSide {
    Left,
    Right,
}

/// Default visibility of a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Visible,
    /// Listed in the legend but not drawn until selected.
    LegendOnly,
}

/// One named series of the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    pub axis: AxisSide,
    pub visibility: Visibility,
    /// NaN values are gaps (undefined derived entries).
    pub points: Vec<(NaiveDateTime, f64)>,
}

/// Y-axis definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YAxis {
    pub title: String,
    pub side: AxisSide,
    pub show_grid: bool,
}

/// Shared x-axis configuration, gap rules included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XAxisConfig {
    pub title: String,
    pub gaps: AxisGapSpec,
}

/// Renderable chart specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub traces: Vec<Trace>,
    pub x_axis: XAxisConfig,
    pub y_axes: Vec<YAxis>,
}

/// Precomputed overlay series, each aligned to the price axis.
///
/// Price mode reads the SMA fields; PE mode reads the TTM/PE fields. Absent
/// series simply produce no trace.
#[derive(Debug, Clone, Default)]
pub struct DerivedOverlays {
    pub sma50: Option<Vec<f64>>,
    pub sma200: Option<Vec<f64>>,
    pub ttm_eps: Option<Vec<f64>>,
    pub pe: Option<Vec<f64>>,
    pub median_pe: Option<f64>,
}

/// Assemble the chart spec for a request from its precomputed series.
pub fn assemble(
    req: &RenderRequest,
    prices: &[PricePoint],
    derived: &DerivedOverlays,
    gaps: AxisGapSpec,
) -> ChartSpec {
    let traces = match req.mode {
        ChartMode::Price => price_traces(req, prices, derived),
        ChartMode::PeRatio => pe_traces(req, prices, derived),
    };

    ChartSpec {
        title: format!(
            "{} - {} ({})",
            req.ticker,
            req.mode.label(),
            req.timeframe.label()
        ),
        traces,
        x_axis: XAxisConfig {
            title: "Date".into(),
            gaps,
        },
        y_axes: y_axes(req.mode),
    }
}

fn y_axes(mode: ChartMode) -> Vec<YAxis> {
    match mode {
        ChartMode::Price => vec![
            YAxis {
                title: "Price".into(),
                side: AxisSide::Left,
                show_grid: true,
            },
            YAxis {
                title: "Volume".into(),
                side: AxisSide::Right,
                show_grid: false,
            },
        ],
        ChartMode::PeRatio => vec![
            YAxis {
                title: "TTM EPS".into(),
                side: AxisSide::Left,
                show_grid: true,
            },
            YAxis {
                title: "PE".into(),
                side: AxisSide::Right,
                show_grid: false,
            },
        ],
    }
}

fn series_trace(
    name: &str,
    kind: TraceKind,
    axis: AxisSide,
    visibility: Visibility,
    prices: &[PricePoint],
    values: &[f64],
) -> Trace {
    Trace {
        name: name.into(),
        kind,
        axis,
        visibility,
        points: prices.iter().zip(values).map(|(p, &v)| (p.ts, v)).collect(),
    }
}

fn price_traces(
    req: &RenderRequest,
    prices: &[PricePoint],
    derived: &DerivedOverlays,
) -> Vec<Trace> {
    let mut traces = Vec::new();

    traces.push(Trace {
        name: "Price".into(),
        kind: TraceKind::Line,
        axis: AxisSide::Left,
        visibility: Visibility::Visible,
        points: prices.iter().map(|p| (p.ts, p.close)).collect(),
    });

    if req.toggles.sma50 {
        if let Some(sma50) = &derived.sma50 {
            traces.push(series_trace(
                "50 DMA",
                TraceKind::Line,
                AxisSide::Left,
                Visibility::LegendOnly,
                prices,
                sma50,
            ));
        }
    }

    if req.toggles.sma200 {
        if let Some(sma200) = &derived.sma200 {
            traces.push(series_trace(
                "200 DMA",
                TraceKind::Line,
                AxisSide::Left,
                Visibility::LegendOnly,
                prices,
                sma200,
            ));
        }
    }

    if req.toggles.volume {
        traces.push(Trace {
            name: "Volume".into(),
            kind: TraceKind::Bar,
            axis: AxisSide::Right,
            visibility: Visibility::Visible,
            points: prices.iter().map(|p| (p.ts, p.volume as f64)).collect(),
        });
    }

    traces
}

fn pe_traces(req: &RenderRequest, prices: &[PricePoint], derived: &DerivedOverlays) -> Vec<Trace> {
    let mut traces = Vec::new();

    if req.toggles.ttm_eps {
        if let Some(ttm) = &derived.ttm_eps {
            traces.push(series_trace(
                "TTM EPS",
                TraceKind::Bar,
                AxisSide::Left,
                Visibility::Visible,
                prices,
                ttm,
            ));
        }
    }

    if req.toggles.pe {
        if let Some(pe) = &derived.pe {
            traces.push(series_trace(
                "PE",
                TraceKind::Line,
                AxisSide::Right,
                Visibility::Visible,
                prices,
                pe,
            ));
        }
    }

    if req.toggles.median_pe {
        // Omitted entirely when no PE value is defined; a reference line at
        // NaN draws nothing and misleads the legend.
        if let Some(median) = derived.median_pe {
            let first = prices.first().map(|p| p.ts);
            let last = prices.last().map(|p| p.ts);
            if let (Some(first), Some(last)) = (first, last) {
                traces.push(Trace {
                    name: format!("Median PE = {median:.1}"),
                    kind: TraceKind::Line,
                    axis: AxisSide::Right,
                    visibility: Visibility::Visible,
                    points: vec![(first, median), (last, median)],
                });
            }
        }
    }

    traces
}
