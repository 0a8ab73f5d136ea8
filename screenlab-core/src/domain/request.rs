//! RenderRequest — one immutable value per user interaction.
//!
//! The pipeline receives everything it needs in the request; there is no
//! ambient session state to consult or mutate.

use serde::{Deserialize, Serialize};

use super::timeframe::Timeframe;

/// Which chart the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    Price,
    PeRatio,
}

impl ChartMode {
    pub fn label(self) -> &'static str {
        match self {
            ChartMode::Price => "Price",
            ChartMode::PeRatio => "PE Ratio",
        }
    }

    pub fn toggle(self) -> ChartMode {
        match self {
            ChartMode::Price => ChartMode::PeRatio,
            ChartMode::PeRatio => ChartMode::Price,
        }
    }
}

/// Per-overlay visibility toggles.
///
/// Defaults mirror the chart's out-of-the-box state: price and volume shown,
/// moving averages off until asked for, all PE-view overlays on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayToggles {
    pub sma50: bool,
    pub sma200: bool,
    pub volume: bool,
    pub ttm_eps: bool,
    pub pe: bool,
    pub median_pe: bool,
}

impl Default for OverlayToggles {
    fn default() -> Self {
        Self {
            sma50: false,
            sma200: false,
            volume: true,
            ttm_eps: true,
            pe: true,
            median_pe: true,
        }
    }
}

/// Immutable description of one render: ticker, duration, mode, toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub ticker: String,
    pub timeframe: Timeframe,
    pub mode: ChartMode,
    pub toggles: OverlayToggles,
}

impl RenderRequest {
    /// Build a request, normalizing the ticker (trimmed, uppercase).
    pub fn new(
        ticker: &str,
        timeframe: Timeframe,
        mode: ChartMode,
        toggles: OverlayToggles,
    ) -> Self {
        Self {
            ticker: ticker.trim().to_uppercase(),
            timeframe,
            mode,
            toggles,
        }
    }
}
