//! Boundary normalization — sort, dedupe, drop void rows.
//!
//! Derivation assumes strictly increasing timestamps with finite OHLC values.
//! Everything a provider returns passes through here before the pipeline
//! touches it. Duplicate timestamps keep the first occurrence.

use crate::domain::PricePoint;

/// What normalization did to a raw series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NormalizeReport {
    pub kept: usize,
    pub dropped_void: usize,
    pub dropped_duplicate: usize,
}

impl NormalizeReport {
    pub fn dropped(&self) -> usize {
        self.dropped_void + self.dropped_duplicate
    }
}

/// Sort by timestamp (stable), drop void rows, dedupe timestamps keep-first.
pub fn normalize_history(mut points: Vec<PricePoint>) -> (Vec<PricePoint>, NormalizeReport) {
    let mut report = NormalizeReport::default();

    points.sort_by_key(|p| p.ts);

    let mut out: Vec<PricePoint> = Vec::with_capacity(points.len());
    for p in points {
        if p.is_void() {
            report.dropped_void += 1;
            continue;
        }
        if out.last().is_some_and(|prev| prev.ts == p.ts) {
            report.dropped_duplicate += 1;
            continue;
        }
        out.push(p);
    }

    report.kept = out.len();
    (out, report)
}
