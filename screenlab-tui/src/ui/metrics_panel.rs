//! Metric cards — market cap, P/E, EPS, dividend yield.
//!
//! Missing fundamentals render as "N/A"; a dividend yield of zero is a real
//! reading and renders as "0.00%".

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let quote = app.render.as_ref().map(|r| &r.quote);

    let cards: [(&str, String); 4] = [
        (
            "Market Cap",
            quote
                .and_then(|q| q.market_cap)
                .map_or_else(|| "N/A".into(), format_market_cap),
        ),
        (
            "P/E Ratio",
            quote
                .and_then(|q| q.pe_ratio_trailing)
                .map_or_else(|| "N/A".into(), |v| format!("{v:.2}")),
        ),
        (
            "EPS (TTM)",
            quote
                .and_then(|q| q.eps_trailing)
                .map_or_else(|| "N/A".into(), |v| format!("{v:.2}")),
        ),
        (
            "Dividend Yield",
            quote
                .and_then(|q| q.dividend_yield_pct)
                .map_or_else(|| "N/A".into(), |v| format!("{v:.2}%")),
        ),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for ((label, value), column) in cards.iter().zip(columns.iter()) {
        let style = if value == "N/A" {
            theme::muted()
        } else {
            theme::accent()
        };
        let para = Paragraph::new(vec![
            Line::from(Span::styled(value.as_str(), style)),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(*label, theme::secondary())),
        );
        f.render_widget(para, *column);
    }
}

/// Human-scale market cap: 2.95T, 410.2B, 38.5M.
fn format_market_cap(value: f64) -> String {
    const TRILLION: f64 = 1.0e12;
    const BILLION: f64 = 1.0e9;
    const MILLION: f64 = 1.0e6;

    if value >= TRILLION {
        format!("{:.2}T", value / TRILLION)
    } else if value >= BILLION {
        format!("{:.1}B", value / BILLION)
    } else if value >= MILLION {
        format!("{:.1}M", value / MILLION)
    } else {
        format!("{value:.0}")
    }
}
