//! Overview header — ticker entry, company name, exchange/sector, description.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    // Ticker entry line
    if app.editing_ticker {
        lines.push(Line::from(vec![
            Span::styled("Ticker: ", theme::muted()),
            Span::styled(format!("{}▏", app.ticker_input), theme::accent()),
            Span::styled("  [Enter]submit [Esc]cancel", theme::muted()),
        ]));
    } else {
        lines.push(Line::from(vec![
            Span::styled("Ticker: ", theme::muted()),
            Span::styled(app.ticker.as_str(), theme::title()),
            Span::styled(
                format!(
                    "  {} | {}  [t]icker [1-9]range [m]ode",
                    app.timeframe.label(),
                    app.mode.label()
                ),
                theme::muted(),
            ),
        ]));
    }

    match &app.render {
        Some(render) => {
            let quote = &render.quote;
            lines.push(Line::from(Span::styled(
                quote.name.as_str(),
                theme::title(),
            )));

            let exchange = quote.exchange.as_deref().unwrap_or("N/A");
            let sector = quote.sector.as_deref().unwrap_or("N/A");
            lines.push(Line::from(Span::styled(
                format!("{exchange} | {sector}"),
                theme::neutral(),
            )));

            if let Some(desc) = &quote.description {
                lines.push(Line::from(Span::styled(desc.as_str(), theme::secondary())));
            }
        }
        None => {
            lines.push(Line::from(Span::styled(
                "No data loaded. Press [t] to enter a ticker.",
                theme::muted(),
            )));
        }
    }

    let para = Paragraph::new(lines)
        .block(Block::default().borders(Borders::BOTTOM))
        .wrap(Wrap { trim: true });
    f.render_widget(para, area);
}
