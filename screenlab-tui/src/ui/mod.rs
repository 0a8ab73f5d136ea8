//! Top-level UI layout — overview, metric cards, chart, statements, status bar.

pub mod chart_panel;
pub mod metrics_panel;
pub mod overview_panel;
pub mod statements_panel;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::AppState;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),  // overview header
            Constraint::Length(5),  // metric cards
            Constraint::Min(10),    // chart
            Constraint::Length(9),  // statements
            Constraint::Length(1),  // status bar
        ])
        .split(f.area());

    overview_panel::render(f, chunks[0], app);
    metrics_panel::render(f, chunks[1], app);
    chart_panel::render(f, chunks[2], app);
    statements_panel::render(f, chunks[3], app);
    status_bar::render(f, chunks[4], app);
}
