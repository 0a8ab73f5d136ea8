//! Fundamentals — quote summary record and financial statement table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Overview and ratio fields for the metric cards.
///
/// Every fundamental is optional: the provider omits fields freely, and a
/// missing value stays `None` all the way to the presentation layer, which
/// renders it as "N/A". Dividend yield is stored as a percentage; `None`
/// means not reported, and 0.0 is reserved for a genuine zero-yield reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSummary {
    pub name: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub description: Option<String>,
    pub market_cap: Option<f64>,
    pub pe_ratio_trailing: Option<f64>,
    pub eps_trailing: Option<f64>,
    pub dividend_yield_pct: Option<f64>,
}

/// One line item of a financial statement, with a value per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub label: String,
    /// Aligned with `StatementTable::periods`; `None` where the provider
    /// omitted the figure.
    pub values: Vec<Option<f64>>,
}

/// Financial statement: rows are line items, columns are reporting periods,
/// most recent period first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub periods: Vec<NaiveDate>,
    pub rows: Vec<StatementRow>,
}

impl StatementTable {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty() || self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_detection() {
        let t = StatementTable {
            periods: vec![],
            rows: vec![],
        };
        assert!(t.is_empty());

        let t = StatementTable {
            periods: vec![NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()],
            rows: vec![StatementRow {
                label: "Total Revenue".into(),
                values: vec![Some(1.0e9)],
            }],
        };
        assert!(!t.is_empty());
    }

    #[test]
    fn quote_summary_serialization_roundtrip() {
        let q = QuoteSummary {
            name: "Apple Inc.".into(),
            exchange: Some("NMS".into()),
            sector: Some("Technology".into()),
            description: None,
            market_cap: Some(2.9e12),
            pe_ratio_trailing: Some(30.5),
            eps_trailing: Some(6.42),
            dividend_yield_pct: None,
        };
        let json = serde_json::to_string(&q).unwrap();
        let deser: QuoteSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(q, deser);
    }
}
