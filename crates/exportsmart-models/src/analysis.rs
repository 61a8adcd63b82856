use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::export_request::TransportMode;

/// Number of monthly points the generation service must return in `historicalData`.
pub const HISTORICAL_MONTHS: usize = 12;

/// The full export analysis returned by the generation service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Markdown text.
    pub executive_summary: String,
    /// Markdown text.
    pub fiscal_analysis: String,
    pub cost_table: Vec<CostItem>,
    /// Markdown text.
    pub final_landed_cost: String,
    /// Markdown text.
    pub strategies: String,
    /// One simulated year, chronological.
    pub historical_data: Vec<HistoricalDataPoint>,
}

impl AnalysisResult {
    /// Sum of every USD-normalized line in the cost table, or `None` on overflow.
    pub fn total_raw_cost(&self) -> Option<Decimal> {
        self.cost_table
            .iter()
            .try_fold(Decimal::ZERO, |acc, line| acc.checked_add(line.raw_value))
    }

    /// The month with the highest average FOB value. Ties keep the earliest month.
    pub fn peak_month(&self) -> Option<&HistoricalDataPoint> {
        self.historical_data.iter().fold(None, |best, point| match best {
            Some(b) if b.average_fob_value >= point.average_fob_value => Some(b),
            _ => Some(point),
        })
    }
}

/// One line of the landed-cost table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CostItem {
    pub item: String,
    /// Display-formatted amount or percentage, e.g. "US$ 10,000.00" or "15%".
    pub value: String,
    /// USD-normalized amount used for charting.
    pub raw_value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalDataPoint {
    /// e.g. "JAN/24"
    pub month: String,
    pub average_fob_value: Decimal,
}

/// Result of classifying a product from its description or HS code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductIdentification {
    pub hs_code: String,
    pub description: String,
    pub category: String,
    pub suggested_transport_mode: TransportMode,
}
