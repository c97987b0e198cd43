//! Results of classifying and summarising an uploaded CSV.
//!
//! An upload is classified into exactly one of three shapes, distinguished on
//! the wire by the `dataset_type` tag:
//!
//! ```json
//! { "dataset_type": "sme_financial", "total_revenue": 1500.0, "total_expense": 1300.0,
//!   "net_cashflow": 200.0, "risk_flags": ["High expense ratio"] }
//! ```

use serde::{Deserialize, Serialize};

/// Message returned when an upload looks like OHLC trading data.
pub const MARKET_DATA_MESSAGE: &str = "This file appears to be trading/market data (OHLC). \
     Financial health analysis is designed for SME cash flow, \
     bank statements, or expense data.";

/// Suggestion returned alongside [`MARKET_DATA_MESSAGE`].
pub const MARKET_DATA_SUGGESTION: &str = "Please upload a bank statement, expense sheet, or \
     transaction CSV for financial health assessment.";

/// Message returned when no amount column can be found.
pub const UNSUPPORTED_MESSAGE: &str = "No financial amount columns found. \
     This platform supports SME financial data.";

/// Risk raised while summarising cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskFlag {
    /// Expenses exceed 80% of revenue
    HighExpenseRatio,
    /// Expenses exceed revenue
    NegativeCashFlow,
}

impl RiskFlag {
    /// Label used in `risk_flags` arrays.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskFlag::HighExpenseRatio => "High expense ratio",
            RiskFlag::NegativeCashFlow => "Negative cash flow",
        }
    }

    /// Whether `flags` (as sent by a client) contains this flag.
    pub fn is_in(self, flags: &[String]) -> bool {
        flags.iter().any(|f| f == self.as_str())
    }
}

/// Cash-flow summary of an SME dataset.
///
/// Also the request body of `/ai-insights` and `/health-score`, where
/// `risk_flags` may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    /// Sum of all positive amounts
    pub total_revenue: f64,

    /// Absolute value of the sum of all negative amounts
    pub total_expense: f64,

    /// `total_revenue - total_expense`
    pub net_cashflow: f64,

    #[serde(default)]
    pub risk_flags: Vec<String>,
}

/// Outcome of `/upload`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "dataset_type", rename_all = "snake_case")]
pub enum DatasetAnalysis {
    /// Trading data (open/high/low/close columns) rather than SME cash flow
    MarketData {
        message: String,
        suggestion: String,
        detected_columns: Vec<String>,
    },

    /// No recognised amount columns
    Unsupported {
        message: String,
        available_columns: Vec<String>,
    },

    SmeFinancial(FinancialSummary),
}

impl DatasetAnalysis {
    pub fn market_data(detected_columns: Vec<String>) -> Self {
        DatasetAnalysis::MarketData {
            message: MARKET_DATA_MESSAGE.to_string(),
            suggestion: MARKET_DATA_SUGGESTION.to_string(),
            detected_columns,
        }
    }

    pub fn unsupported(available_columns: Vec<String>) -> Self {
        DatasetAnalysis::Unsupported {
            message: UNSUPPORTED_MESSAGE.to_string(),
            available_columns,
        }
    }
}
