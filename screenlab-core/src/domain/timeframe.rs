//! Timeframe — the fixed set of chart durations.
//!
//! Each timeframe maps to a (provider range, sampling interval) pair. The
//! interval coarsens as the span grows so point counts stay bounded: intraday
//! sampling only for single-day and week views, weekly bars past ten years,
//! monthly for the full history.

use serde::{Deserialize, Serialize};

/// Chart duration selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    OneDay,
    FiveDay,
    OneMonth,
    SixMonth,
    OneYear,
    ThreeYear,
    FiveYear,
    TenYear,
    Max,
}

/// Sampling interval for a fetched series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    /// 5 minutes
    M5,
    /// 15 minutes
    M15,
    /// 1 day
    D1,
    /// 1 week
    W1,
    /// 1 month
    Mo1,
}

impl Timeframe {
    /// All timeframes in display order.
    pub const ALL: [Timeframe; 9] = [
        Timeframe::OneDay,
        Timeframe::FiveDay,
        Timeframe::OneMonth,
        Timeframe::SixMonth,
        Timeframe::OneYear,
        Timeframe::ThreeYear,
        Timeframe::FiveYear,
        Timeframe::TenYear,
        Timeframe::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::FiveDay => "5D",
            Timeframe::OneMonth => "1M",
            Timeframe::SixMonth => "6M",
            Timeframe::OneYear => "1Yr",
            Timeframe::ThreeYear => "3Yr",
            Timeframe::FiveYear => "5Yr",
            Timeframe::TenYear => "10Yr",
            Timeframe::Max => "Max",
        }
    }

    /// Parse a display label ("1Yr") or provider range string ("1y").
    pub fn from_label(s: &str) -> Option<Timeframe> {
        Timeframe::ALL.iter().copied().find(|tf| {
            tf.label().eq_ignore_ascii_case(s) || tf.range_param().eq_ignore_ascii_case(s)
        })
    }

    /// Lookback span parameter understood by the provider's chart endpoint.
    pub fn range_param(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::FiveDay => "5d",
            Timeframe::OneMonth => "1mo",
            Timeframe::SixMonth => "6mo",
            Timeframe::OneYear => "1y",
            Timeframe::ThreeYear => "3y",
            Timeframe::FiveYear => "5y",
            Timeframe::TenYear => "10y",
            Timeframe::Max => "max",
        }
    }

    /// Sampling interval paired with this timeframe.
    pub fn interval(self) -> Interval {
        match self {
            Timeframe::OneDay => Interval::M5,
            Timeframe::FiveDay => Interval::M15,
            Timeframe::OneMonth
            | Timeframe::SixMonth
            | Timeframe::OneYear
            | Timeframe::ThreeYear
            | Timeframe::FiveYear => Interval::D1,
            Timeframe::TenYear => Interval::W1,
            Timeframe::Max => Interval::Mo1,
        }
    }

    pub fn index(self) -> usize {
        Timeframe::ALL.iter().position(|tf| *tf == self).unwrap()
    }

    pub fn next(self) -> Timeframe {
        Timeframe::ALL[(self.index() + 1) % Timeframe::ALL.len()]
    }

    pub fn prev(self) -> Timeframe {
        Timeframe::ALL[(self.index() + Timeframe::ALL.len() - 1) % Timeframe::ALL.len()]
    }
}

impl Interval {
    /// Interval parameter understood by the provider's chart endpoint.
    pub fn api_param(self) -> &'static str {
        match self {
            Interval::M5 => "5m",
            Interval::M15 => "15m",
            Interval::D1 => "1d",
            Interval::W1 => "1wk",
            Interval::Mo1 => "1mo",
        }
    }

    /// Sub-daily sampling (multiple points per trading session).
    pub fn is_intraday(self) -> bool {
        matches!(self, Interval::M5 | Interval::M15)
    }
}
