//! Keyboard input dispatch.
//!
//! Ticker editing consumes input first; everything else is a single-key
//! action. Any change to the selection resubmits a render request — the
//! sequence number in AppState makes the latest submission win.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use screenlab_core::domain::Timeframe;

use crate::app::AppState;

/// Handle a key event.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.editing_ticker {
        handle_ticker_editing(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.running = false;
        }

        // Ticker entry
        KeyCode::Char('t') | KeyCode::Char('/') => {
            app.editing_ticker = true;
            app.ticker_input.clear();
        }

        // Timeframe: digits jump, brackets cycle
        KeyCode::Char(c @ '1'..='9') => {
            let idx = (c as u8 - b'1') as usize;
            app.timeframe = Timeframe::ALL[idx];
            app.submit();
        }
        KeyCode::Char(']') => {
            app.timeframe = app.timeframe.next();
            app.submit();
        }
        KeyCode::Char('[') => {
            app.timeframe = app.timeframe.prev();
            app.submit();
        }

        // Chart mode
        KeyCode::Char('m') => {
            app.mode = app.mode.toggle();
            app.submit();
        }

        // Overlay toggles (price view)
        KeyCode::Char('s') => {
            app.toggles.sma50 = !app.toggles.sma50;
            app.submit();
        }
        KeyCode::Char('d') => {
            app.toggles.sma200 = !app.toggles.sma200;
            app.submit();
        }
        KeyCode::Char('v') => {
            app.toggles.volume = !app.toggles.volume;
            app.submit();
        }

        // Overlay toggles (PE view)
        KeyCode::Char('e') => {
            app.toggles.ttm_eps = !app.toggles.ttm_eps;
            app.submit();
        }
        KeyCode::Char('p') => {
            app.toggles.pe = !app.toggles.pe;
            app.submit();
        }
        KeyCode::Char('n') => {
            app.toggles.median_pe = !app.toggles.median_pe;
            app.submit();
        }

        // Refresh
        KeyCode::Char('r') => {
            app.submit();
        }

        _ => {}
    }
}

fn handle_ticker_editing(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.editing_ticker = false;
            app.ticker_input.clear();
        }
        KeyCode::Enter => {
            app.editing_ticker = false;
            if !app.ticker_input.trim().is_empty() {
                app.ticker = app.ticker_input.trim().to_uppercase();
                app.submit();
            }
            app.ticker_input.clear();
        }
        KeyCode::Backspace => {
            app.ticker_input.pop();
        }
        KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '.' || c == '-' => {
            if app.ticker_input.len() < 10 {
                app.ticker_input.push(c.to_ascii_uppercase());
            }
        }
        _ => {}
    }
}
