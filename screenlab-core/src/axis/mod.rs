//! Axis gap policy — exclusion rules that collapse non-trading time.
//!
//! A continuous time axis renders weekends, holidays, and overnight hours as
//! flat segments. The policy produces, per timeframe, the set of rangebreaks
//! a renderer applies so those regions take zero visual width:
//! - Daily sampling over multi-day spans: weekends plus any weekday in range
//!   that the realized series skipped (holidays fall out of the data itself).
//! - Intraday sampling: weekends plus the repeating overnight clock window
//!   (close 16:00 to next open 09:30).
//! - Weekly/monthly sampling: no rules — the sampling grid already spans
//!   non-trading days.
//!
//! Callers must not invoke the policy on an empty series; an empty fetch is
//! a no-data condition handled before axis configuration.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::domain::{Interval, PricePoint, Timeframe};

/// One axis exclusion rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RangeBreak {
    /// Saturday through Monday-open boundary, every week.
    Weekend,
    /// Specific calendar days absent from the series (exchange holidays).
    Dates { dates: Vec<NaiveDate> },
    /// Repeating daily window between session close and next open.
    DailyClock { start: NaiveTime, end: NaiveTime },
}

/// Tick label rendering for the x axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TickLabelFormat {
    /// `%H:%M` — single-session views.
    TimeOnly,
    /// `%m-%d %H:%M` — multi-day intraday views.
    DateTime,
    /// Renderer picks date labels automatically.
    Auto,
}

impl TickLabelFormat {
    /// strftime pattern, None when the renderer should choose.
    pub fn pattern(self) -> Option<&'static str> {
        match self {
            TickLabelFormat::TimeOnly => Some("%H:%M"),
            TickLabelFormat::DateTime => Some("%m-%d %H:%M"),
            TickLabelFormat::Auto => None,
        }
    }
}

/// Fixed tick spacing and label format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickConfig {
    /// Fixed tick spacing in milliseconds; None lets the axis auto-scale.
    pub dtick_ms: Option<i64>,
    pub format: TickLabelFormat,
}

/// Full gap/tick configuration for the x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisGapSpec {
    pub breaks: Vec<RangeBreak>,
    pub ticks: TickConfig,
}

/// Session clock window for US equities.
const SESSION_CLOSE: (u32, u32) = (16, 0);
const SESSION_OPEN: (u32, u32) = (9, 30);

const THIRTY_MINUTES_MS: i64 = 30 * 60 * 1000;
const ONE_HOUR_MS: i64 = 60 * 60 * 1000;

/// Compute the exclusion rules for a timeframe over the realized series.
pub fn gap_policy(timeframe: Timeframe, points: &[PricePoint]) -> AxisGapSpec {
    debug_assert!(
        !points.is_empty(),
        "gap policy requires a non-empty series; empty fetches are a no-data condition"
    );

    let interval = timeframe.interval();
    let mut breaks = Vec::new();

    if interval.is_intraday() {
        breaks.push(RangeBreak::Weekend);
        breaks.push(RangeBreak::DailyClock {
            start: NaiveTime::from_hms_opt(SESSION_CLOSE.0, SESSION_CLOSE.1, 0).unwrap(),
            end: NaiveTime::from_hms_opt(SESSION_OPEN.0, SESSION_OPEN.1, 0).unwrap(),
        });
    } else if interval == Interval::D1 {
        breaks.push(RangeBreak::Weekend);
        let missing = missing_business_days(points);
        if !missing.is_empty() {
            breaks.push(RangeBreak::Dates { dates: missing });
        }
    }

    AxisGapSpec {
        breaks,
        ticks: tick_config(timeframe),
    }
}

/// Fixed tick density for the finest views; everything else auto-scales.
fn tick_config(timeframe: Timeframe) -> TickConfig {
    match timeframe {
        Timeframe::OneDay => TickConfig {
            dtick_ms: Some(THIRTY_MINUTES_MS),
            format: TickLabelFormat::TimeOnly,
        },
        Timeframe::FiveDay => TickConfig {
            dtick_ms: Some(ONE_HOUR_MS),
            format: TickLabelFormat::DateTime,
        },
        _ => TickConfig {
            dtick_ms: None,
            format: TickLabelFormat::Auto,
        },
    }
}

/// Weekdays within [min, max] that the realized series skipped.
fn missing_business_days(points: &[PricePoint]) -> Vec<NaiveDate> {
    let realized: BTreeSet<NaiveDate> = points.iter().map(|p| p.ts.date()).collect();
    let first = *realized.first().unwrap();
    let last = *realized.last().unwrap();

    let mut missing = Vec::new();
    let mut day = first;
    while day <= last {
        let weekday = day.weekday();
        if weekday != Weekday::Sat && weekday != Weekday::Sun && !realized.contains(&day) {
            missing.push(day);
        }
        day += chrono::Duration::days(1);
    }
    missing
}
