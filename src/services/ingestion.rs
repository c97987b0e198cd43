//! CSV ingestion - classify an upload and summarise its cash flow.
//!
//! # Classification Order
//!
//! 1. `open`, `high`, `low` and `close` all present → market data (not analysed)
//! 2. `debit` and `credit` present → bank statement, amount = credit - debit
//! 3. First of `amount`, `value`, `transaction_amount` → single amount column
//! 4. None of the above → unsupported
//!
//! Headers are trimmed and lowercased before matching; an empty header cell
//! becomes `unnamed: <index>`. Cells that are empty, missing or not numeric count as
//! zero.

use csv::{ReaderBuilder, StringRecord};

use crate::{
    error::AppError,
    models::dataset::{DatasetAnalysis, FinancialSummary, RiskFlag},
};

const MARKET_COLUMNS: [&str; 4] = ["open", "high", "low", "close"];
const AMOUNT_COLUMNS: [&str; 3] = ["amount", "value", "transaction_amount"];

/// Expenses above this share of revenue raise [`RiskFlag::HighExpenseRatio`].
pub const HIGH_EXPENSE_RATIO: f64 = 0.8;

/// Where a row's signed amount comes from.
#[derive(Debug, Clone, Copy)]
enum AmountSource {
    DebitCredit { debit: usize, credit: usize },
    Column(usize),
}

impl AmountSource {
    fn amount(self, record: &StringRecord) -> f64 {
        match self {
            AmountSource::DebitCredit { debit, credit } => {
                coerce_number(record.get(credit)) - coerce_number(record.get(debit))
            }
            AmountSource::Column(index) => coerce_number(record.get(index)),
        }
    }
}

/// Validate the file name and analyse the uploaded bytes.
///
/// # Errors
///
/// - `UnsupportedFileType`: file name does not end in `.csv`
/// - `InvalidCsv`: no header row, a record could not be decoded, or the
///   totals do not fit in an `f64`
pub fn analyze_upload(file_name: &str, bytes: &[u8]) -> Result<DatasetAnalysis, AppError> {
    if !file_name.ends_with(".csv") {
        return Err(AppError::UnsupportedFileType);
    }

    analyze_csv(bytes)
}

/// Classify CSV bytes and, for SME data, compute the cash-flow summary.
pub fn analyze_csv(bytes: &[u8]) -> Result<DatasetAnalysis, AppError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.is_empty() {
                format!("unnamed: {}", i)
            } else {
                h.trim().to_lowercase()
            }
        })
        .collect();

    if columns.is_empty() {
        return Err(AppError::InvalidCsv("CSV file has no header row".to_string()));
    }

    let position = |name: &str| columns.iter().position(|c| c == name);

    if MARKET_COLUMNS.into_iter().all(|c| position(c).is_some()) {
        return Ok(DatasetAnalysis::market_data(columns));
    }

    let source = match (position("debit"), position("credit")) {
        (Some(debit), Some(credit)) => AmountSource::DebitCredit { debit, credit },
        _ => match AMOUNT_COLUMNS.into_iter().find_map(|c| position(c)) {
            Some(index) => AmountSource::Column(index),
            None => return Ok(DatasetAnalysis::unsupported(columns)),
        },
    };

    let mut revenue = 0.0;
    let mut expense = 0.0;
    let mut rows = 0usize;

    for record in reader.records() {
        let amount = source.amount(&record?);
        if amount > 0.0 {
            revenue += amount;
        } else if amount < 0.0 {
            expense += amount;
        }
        rows += 1;
    }

    if !revenue.is_finite() || !expense.is_finite() {
        return Err(AppError::InvalidCsv("amounts overflow".to_string()));
    }

    tracing::debug!(rows, ?source, "Summarised CSV upload");

    Ok(DatasetAnalysis::SmeFinancial(summarize(revenue, expense.abs())))
}

/// Build the rounded summary and risk flags from raw totals.
///
/// Flags are evaluated on the unrounded totals.
pub fn summarize(total_revenue: f64, total_expense: f64) -> FinancialSummary {
    let net_cashflow = total_revenue - total_expense;

    let mut risk_flags = Vec::new();
    if total_expense > total_revenue * HIGH_EXPENSE_RATIO {
        risk_flags.push(RiskFlag::HighExpenseRatio.as_str().to_string());
    }
    if net_cashflow < 0.0 {
        risk_flags.push(RiskFlag::NegativeCashFlow.as_str().to_string());
    }

    FinancialSummary {
        total_revenue: round2(total_revenue),
        total_expense: round2(total_expense),
        net_cashflow: round2(net_cashflow),
        risk_flags,
    }
}

/// Parse a cell as a number; anything unusable is zero.
fn coerce_number(cell: Option<&str>) -> f64 {
    cell.and_then(|c| c.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Round to cents, half away from zero. Never returns -0.0.
///
/// Values too large to scale by 100 have no fractional cents and are
/// returned as they are.
fn round2(value: f64) -> f64 {
    let cents = value * 100.0;
    if !cents.is_finite() {
        return value + 0.0;
    }
    cents.round() / 100.0 + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_of(csv: &str) -> FinancialSummary {
        match analyze_csv(csv.as_bytes()).unwrap() {
            DatasetAnalysis::SmeFinancial(summary) => summary,
            other => panic!("expected sme_financial, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_csv_file_names() {
        assert!(matches!(
            analyze_upload("statement.xlsx", b"amount\n1\n"),
            Err(AppError::UnsupportedFileType)
        ));
        assert!(matches!(
            analyze_upload("statement.CSV", b"amount\n1\n"),
            Err(AppError::UnsupportedFileType)
        ));
        assert!(analyze_upload("statement.csv", b"amount\n1\n").is_ok());
    }

    #[test]
    fn detects_market_data_with_normalised_columns() {
        let analysis = analyze_csv(b" Date ,Open,HIGH,low,Close,Volume\n2024-01-01,1,2,0.5,1.5,100\n")
            .unwrap();

        assert_eq!(
            analysis,
            DatasetAnalysis::market_data(vec![
                "date".into(),
                "open".into(),
                "high".into(),
                "low".into(),
                "close".into(),
                "volume".into(),
            ])
        );
    }

    #[test]
    fn partial_ohlc_is_not_market_data() {
        let summary = summary_of("open,high,amount\n1,2,50\n");
        assert_eq!(summary.total_revenue, 50.0);
    }

    #[test]
    fn bank_statement_uses_credit_minus_debit() {
        let summary = summary_of(
            "Date,Description,Debit,Credit\n\
             2024-01-01,Sale,,1000\n\
             2024-01-02,Rent,400,\n\
             2024-01-03,Supplies,250.50,0\n\
             2024-01-04,Refund,10,60\n",
        );

        assert_eq!(summary.total_revenue, 1050.0);
        assert_eq!(summary.total_expense, 650.5);
        assert_eq!(summary.net_cashflow, 399.5);
        assert!(summary.risk_flags.is_empty());
    }

    #[test]
    fn debit_credit_takes_priority_over_amount() {
        let summary = summary_of("amount,debit,credit\n999,0,10\n");
        assert_eq!(summary.total_revenue, 10.0);
    }

    #[test]
    fn amount_column_preference_order() {
        let summary = summary_of("transaction_amount,value\n5,-7\n");
        assert_eq!(summary.total_expense, 7.0);
        assert_eq!(summary.total_revenue, 0.0);
    }

    #[test]
    fn unparseable_and_missing_cells_count_as_zero() {
        let summary = summary_of("id,amount\n1,100\n2,abc\n3,\n4\n5,nan\n6,-20\n");
        assert_eq!(summary.total_revenue, 100.0);
        assert_eq!(summary.total_expense, 20.0);
    }

    #[test]
    fn unsupported_lists_available_columns() {
        let analysis = analyze_csv(b"Name,Category\nfoo,bar\n").unwrap();
        assert_eq!(
            analysis,
            DatasetAnalysis::unsupported(vec!["name".into(), "category".into()])
        );
    }

    #[test]
    fn header_only_file_has_zero_totals_and_no_flags() {
        let summary = summary_of("amount\n");
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.total_expense, 0.0);
        assert_eq!(summary.net_cashflow, 0.0);
        assert!(summary.risk_flags.is_empty());
    }

    #[test]
    fn overflowing_totals_are_invalid_csv() {
        let err = analyze_csv(b"amount\n1e308\n1e308\n-1e308\n-1e308\n").unwrap_err();
        match err {
            AppError::InvalidCsv(msg) => assert_eq!(msg, "amounts overflow"),
            other => panic!("unexpected error: {:?}", other),
        }

        assert!(matches!(
            analyze_csv(b"debit,credit\n-1e308,1e308\n"),
            Err(AppError::InvalidCsv(_))
        ));
    }

    #[test]
    fn huge_but_finite_totals_stay_numbers() {
        let summary = summary_of("amount\n1e307\n-1e306\n");
        assert_eq!(summary.total_revenue, 1e307);
        assert!((summary.total_expense - 1e306).abs() <= 1e294);
        assert!(summary.net_cashflow.is_finite());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["total_revenue"].is_f64());
        assert!(json["net_cashflow"].is_f64());
    }

    #[test]
    fn blank_headers_are_named_by_position() {
        let analysis = analyze_csv(b",,\n1,2,3\n").unwrap();
        assert_eq!(
            analysis,
            DatasetAnalysis::unsupported(vec![
                "unnamed: 0".into(),
                "unnamed: 1".into(),
                "unnamed: 2".into(),
            ])
        );

        let summary = summary_of(",Amount\nx,40\n");
        assert_eq!(summary.total_revenue, 40.0);
    }

    #[test]
    fn empty_file_is_invalid_csv() {
        assert!(matches!(analyze_csv(b""), Err(AppError::InvalidCsv(_))));
    }

    #[test]
    fn high_expense_ratio_without_negative_cash_flow() {
        let summary = summary_of("amount\n1000\n-900\n");
        assert_eq!(summary.net_cashflow, 100.0);
        assert_eq!(summary.risk_flags, vec!["High expense ratio".to_string()]);
    }

    #[test]
    fn negative_cash_flow_raises_both_flags() {
        let summary = summary_of("amount\n100\n-250\n");
        assert_eq!(summary.net_cashflow, -150.0);
        assert_eq!(
            summary.risk_flags,
            vec![
                "High expense ratio".to_string(),
                "Negative cash flow".to_string()
            ]
        );
    }

    #[test]
    fn expense_exactly_at_threshold_is_not_flagged() {
        let summary = summarize(1000.0, 800.0);
        assert!(summary.risk_flags.is_empty());
    }

    #[test]
    fn totals_are_rounded_to_cents() {
        let summary = summarize(10.006, 0.0);
        assert_eq!(summary.total_revenue, 10.01);

        let summary = summary_of("amount\n0.1\n0.2\n");
        assert_eq!(summary.total_revenue, 0.3);
    }
}
