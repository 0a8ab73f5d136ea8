//! UI selection persistence — JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use screenlab_core::domain::{ChartMode, OverlayToggles, Timeframe};

use crate::app::AppState;

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
pub struct PersistedState {
    pub ticker: String,
    pub timeframe: Timeframe,
    pub mode: ChartMode,
    pub toggles: OverlayToggles,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            ticker: "AAPL".into(),
            timeframe: Timeframe::OneYear,
            mode: ChartMode::Price,
            toggles: OverlayToggles::default(),
        }
    }
}

/// Load persisted state from disk. Returns defaults if missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract persisted state from AppState.
pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        ticker: app.ticker.clone(),
        timeframe: app.timeframe,
        mode: app.mode,
        toggles: app.toggles,
    }
}

/// Apply persisted state to AppState.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.ticker = state.ticker;
    app.timeframe = state.timeframe;
    app.mode = state.mode;
    app.toggles = state.toggles;
}
