//! Statements panel — quarterly income statement, most recent period first.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use screenlab_core::domain::StatementTable;

use crate::app::AppState;
use crate::theme;

const LABEL_WIDTH: usize = 18;
const VALUE_WIDTH: usize = 12;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Income Statement (Quarterly) ", theme::secondary()));

    let table = app.render.as_ref().and_then(|r| r.statements.as_ref());

    let lines = match table {
        Some(table) => statement_lines(table),
        None => vec![
            Line::from(""),
            Line::from(Span::styled(
                "No income statement data available.",
                theme::muted(),
            )),
        ],
    };

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn statement_lines(table: &StatementTable) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(table.rows.len() + 1);

    // Header: period end dates, most recent first
    let mut header = vec![Span::styled(
        format!("{:<LABEL_WIDTH$}", "Line Item"),
        theme::secondary(),
    )];
    for period in &table.periods {
        header.push(Span::styled(
            format!("{:>VALUE_WIDTH$}", period.format("%Y-%m-%d")),
            theme::secondary(),
        ));
    }
    lines.push(Line::from(header));

    for row in &table.rows {
        let mut spans = vec![Span::styled(
            format!("{:<LABEL_WIDTH$}", row.label.clone()),
            theme::neutral(),
        )];
        for value in &row.values {
            let (text, style) = match value {
                Some(v) => (format!("{:>VALUE_WIDTH$}", format_figure(*v)), theme::accent()),
                None => (format!("{:>VALUE_WIDTH$}", "-"), theme::muted()),
            };
            spans.push(Span::styled(text, style));
        }
        lines.push(Line::from(spans));
    }

    lines
}

/// Statement figures: billions/millions for large magnitudes, plain
/// two-decimal otherwise (per-share items).
fn format_figure(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1.0e9 {
        format!("{:.2}B", v / 1.0e9)
    } else if abs >= 1.0e6 {
        format!("{:.1}M", v / 1.0e6)
    } else {
        format!("{v:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use screenlab_core::domain::StatementRow;

    #[test]
    fn figures_format_by_magnitude() {
        assert_eq!(format_figure(119.58e9), "119.58B");
        assert_eq!(format_figure(-3.2e6), "-3.2M");
        assert_eq!(format_figure(2.18), "2.18");
    }

    #[test]
    fn header_and_rows_align_with_periods() {
        let table = StatementTable {
            periods: vec![
                NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            ],
            rows: vec![StatementRow {
                label: "Total Revenue".into(),
                values: vec![Some(90.0e9), None],
            }],
        };

        let lines = statement_lines(&table);
        assert_eq!(lines.len(), 2);
        // header has label column + one span per period
        assert_eq!(lines[0].spans.len(), 3);
        assert_eq!(lines[1].spans.len(), 3);
    }
}
