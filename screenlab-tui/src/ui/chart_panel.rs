//! Chart panel — renders the assembled ChartSpec with ratatui datasets.
//!
//! The x axis is the point index, not wall-clock time: points exist only at
//! trading timestamps, so the gap rules in the spec collapse naturally and
//! only tick labels need the real timestamps. Secondary-axis traces are
//! rescaled into the primary plot window; their true range is shown in the
//! legend name.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;

use screenlab_core::chart::{AxisSide, ChartSpec, Trace, TraceKind, Visibility};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.render {
        Some(render) if !render.chart.traces.is_empty() => {
            render_chart(f, area, &render.chart, app.pe_notice.as_deref())
        }
        _ => render_empty(f, area, app),
    }
}

fn render_empty(f: &mut Frame, area: Rect, app: &AppState) {
    let message = if app.fetch_in_progress {
        "Loading..."
    } else {
        "No chart data. Enter a ticker with [t] and press Enter."
    };
    let para = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(message, theme::muted())),
    ])
    .block(Block::default().borders(Borders::ALL).title(" Chart "));
    f.render_widget(para, area);
}

/// Series color by trace name, stable across redraws.
fn trace_color(name: &str) -> Style {
    match name {
        "Price" | "PE" => theme::accent(),
        "50 DMA" => theme::warning(),
        "200 DMA" => theme::secondary(),
        "Volume" | "TTM EPS" => theme::neutral(),
        n if n.starts_with("Median PE") => theme::muted(),
        _ => theme::secondary(),
    }
}

struct PlottedTrace {
    name: String,
    style: Style,
    kind: TraceKind,
    muted: bool,
    data: Vec<(f64, f64)>,
}

fn render_chart(f: &mut Frame, area: Rect, spec: &ChartSpec, pe_notice: Option<&str>) {
    // Left-axis traces set the plot window.
    let left_bounds = value_bounds(
        spec.traces
            .iter()
            .filter(|t| t.axis == AxisSide::Left)
            .flat_map(|t| t.points.iter().map(|&(_, v)| v)),
    );
    let (y_min, y_max) = pad_bounds(left_bounds);

    let right_bounds = value_bounds(
        spec.traces
            .iter()
            .filter(|t| t.axis == AxisSide::Right)
            .flat_map(|t| t.points.iter().map(|&(_, v)| v)),
    );

    let mut plotted: Vec<PlottedTrace> = Vec::new();
    for trace in &spec.traces {
        let mut name = trace.name.clone();
        let data: Vec<(f64, f64)> = match trace.axis {
            AxisSide::Left => indexed_points(trace),
            AxisSide::Right => {
                // Rescale into the left window; surface the true range.
                let (r_min, r_max) = right_bounds;
                let span = (r_max - r_min).abs().max(f64::EPSILON);
                name = format!("{} [{}]", trace.name, compact_range(r_min, r_max));
                indexed_points(trace)
                    .into_iter()
                    .map(|(x, v)| (x, y_min + (v - r_min) / span * (y_max - y_min)))
                    .collect()
            }
        };
        if data.is_empty() {
            continue;
        }
        plotted.push(PlottedTrace {
            name,
            style: trace_color(&trace.name),
            kind: trace.kind,
            muted: trace.visibility == Visibility::LegendOnly,
            data,
        });
    }

    let datasets: Vec<Dataset> = plotted
        .iter()
        .map(|p| {
            Dataset::default()
                .name(p.name.as_str())
                .marker(if p.kind == TraceKind::Bar {
                    symbols::Marker::HalfBlock
                } else {
                    symbols::Marker::Braille
                })
                .graph_type(match p.kind {
                    TraceKind::Line => GraphType::Line,
                    TraceKind::Bar => GraphType::Bar,
                })
                .style(if p.muted { theme::muted() } else { p.style })
                .data(&p.data)
        })
        .collect();

    let x_max = spec
        .traces
        .iter()
        .map(|t| t.points.len())
        .max()
        .unwrap_or(1)
        .saturating_sub(1) as f64;

    let mut title = format!(" {} ", spec.title);
    if let Some(notice) = pe_notice {
        title = format!(" {} | {} ", spec.title, notice);
    }

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::accent())
                .title(Span::styled(title, theme::title())),
        )
        .x_axis(
            Axis::default()
                .title(Span::styled(spec.x_axis.title.as_str(), theme::secondary()))
                .style(theme::muted())
                .bounds([0.0, x_max.max(1.0)])
                .labels(x_labels(spec)),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled(
                    spec.y_axes.first().map(|a| a.title.as_str()).unwrap_or(""),
                    theme::secondary(),
                ))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.1}"), theme::muted()),
                    Span::styled(format!("{:.1}", (y_min + y_max) / 2.0), theme::muted()),
                    Span::styled(format!("{y_max:.1}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

/// (index, value) points with undefined entries dropped.
fn indexed_points(trace: &Trace) -> Vec<(f64, f64)> {
    trace
        .points
        .iter()
        .enumerate()
        .filter(|(_, (_, v))| !v.is_nan())
        .map(|(i, &(_, v))| (i as f64, v))
        .collect()
}

fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values.filter(|v| !v.is_nan()) {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        (min, max)
    } else {
        (0.0, 1.0)
    }
}

fn pad_bounds((min, max): (f64, f64)) -> (f64, f64) {
    let range = max - min;
    let pad = if range > 0.0 { range * 0.05 } else { 1.0 };
    (min - pad, max + pad)
}

fn compact_range(min: f64, max: f64) -> String {
    format!("{}..{}", compact_value(min), compact_value(max))
}

fn compact_value(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1.0e9 {
        format!("{:.1}B", v / 1.0e9)
    } else if abs >= 1.0e6 {
        format!("{:.1}M", v / 1.0e6)
    } else if abs >= 1.0e3 {
        format!("{:.1}K", v / 1.0e3)
    } else {
        format!("{v:.1}")
    }
}

/// First/middle/last tick labels, formatted per the spec's tick config.
fn x_labels(spec: &ChartSpec) -> Vec<Span<'static>> {
    let timestamps: Vec<_> = spec
        .traces
        .first()
        .map(|t| t.points.iter().map(|&(ts, _)| ts).collect())
        .unwrap_or_default();

    if timestamps.is_empty() {
        return vec![];
    }

    let pattern = spec.x_axis.gaps.ticks.format.pattern().unwrap_or("%Y-%m-%d");
    let mid = timestamps.len() / 2;
    [0, mid, timestamps.len() - 1]
        .iter()
        .map(|&i| {
            Span::styled(
                timestamps[i].format(pattern).to_string(),
                theme::muted(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use screenlab_core::axis::gap_policy;
    use screenlab_core::chart::{assemble, DerivedOverlays};
    use screenlab_core::domain::{
        ChartMode, OverlayToggles, PricePoint, RenderRequest, Timeframe,
    };

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

    fn sample_spec(mode: ChartMode) -> ChartSpec {
        let prices = daily_points(&[100.0, 101.0, 102.0, 103.0, 104.0]);
        let req = RenderRequest::new("AAPL", Timeframe::OneYear, mode, OverlayToggles::default());
        let derived = match mode {
            ChartMode::Price => DerivedOverlays::default(),
            ChartMode::PeRatio => DerivedOverlays {
                ttm_eps: Some(vec![5.0; 5]),
                pe: Some(vec![20.0, 20.2, 20.4, 20.6, 20.8]),
                median_pe: Some(20.4),
                ..DerivedOverlays::default()
            },
        };
        let gaps = gap_policy(req.timeframe, &prices);
        assemble(&req, &prices, &derived, gaps)
    }

    #[test]
    fn price_spec_renders_without_panic() {
        let spec = sample_spec(ChartMode::Price);
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render_chart(f, f.area(), &spec, None))
            .unwrap();
    }

    #[test]
    fn pe_spec_renders_without_panic() {
        let spec = sample_spec(ChartMode::PeRatio);
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render_chart(f, f.area(), &spec, Some("notice")))
            .unwrap();
    }

    #[test]
    fn undefined_entries_are_dropped_from_plots() {
        let trace = Trace {
            name: "Price".into(),
            kind: TraceKind::Line,
            axis: AxisSide::Left,
            visibility: Visibility::Visible,
            points: vec![
                (
                    NaiveDate::from_ymd_opt(2024, 1, 2)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                    f64::NAN,
                ),
                (
                    NaiveDate::from_ymd_opt(2024, 1, 3)
                        .unwrap()
                        .and_hms_opt(0, 0, 0)
                        .unwrap(),
                    100.0,
                ),
            ],
        };
        let data = indexed_points(&trace);
        assert_eq!(data, vec![(1.0, 100.0)]);
    }

    #[test]
    fn bounds_ignore_nan_and_pad() {
        let (min, max) = value_bounds([f64::NAN, 10.0, 20.0].into_iter());
        assert_eq!((min, max), (10.0, 20.0));
        let (lo, hi) = pad_bounds((10.0, 20.0));
        assert!(lo < 10.0 && hi > 20.0);
    }

    #[test]
    fn compact_values() {
        assert_eq!(compact_value(1.5e9), "1.5B");
        assert_eq!(compact_value(2.5e6), "2.5M");
        assert_eq!(compact_value(1_500.0), "1.5K");
        assert_eq!(compact_value(12.34), "12.3");
    }
}
