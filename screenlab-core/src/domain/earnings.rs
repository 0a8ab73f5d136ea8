//! EarningsPoint — one quarterly EPS report.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single quarterly earnings report: period end date and EPS for the quarter.
///
/// Sequences are ordered ascending by `report_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningsPoint {
    pub report_date: NaiveDate,
    pub eps: f64,
}

/// Sort a batch of reports ascending and drop duplicate report dates,
/// keeping the first occurrence.
pub fn sort_dedupe(mut reports: Vec<EarningsPoint>) -> Vec<EarningsPoint> {
    reports.sort_by_key(|e| e.report_date);
    reports.dedup_by_key(|e| e.report_date);
    reports
}
