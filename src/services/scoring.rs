//! Rule engines that turn a cash-flow summary into a health score, a credit
//! rating, financing product suggestions and plain-English insights.
//!
//! Everything here is pure; handlers and the analysis pipeline call these
//! functions directly.

use crate::models::{
    assessment::{
        AiInsights, Assessment, CreditAssessment, CreditStatus, HealthScore, HealthStatus,
        ProductRecommendation,
    },
    dataset::{FinancialSummary, RiskFlag},
};

const POSITIVE_CASH_FLOW_INSIGHT: &str =
    "Your business is generating positive cash flow, which is a good sign.";
const NEGATIVE_CASH_FLOW_INSIGHT: &str =
    "Your business is facing negative cash flow. Immediate attention is required.";
const HIGH_EXPENSE_INSIGHT: &str =
    "Expenses are consuming a large portion of revenue. Cost optimization is recommended.";

const STANDARD_RECOMMENDATIONS: [&str; 3] = [
    "Review recurring expenses and identify non-essential costs.",
    "Negotiate better payment terms with suppliers.",
    "Improve customer payment collection timelines.",
];

const PRODUCT_NOTE: &str = "Recommendations are indicative and based on financial indicators.";
const NOT_ELIGIBLE: &str =
    "Not eligible for credit currently. Focus on improving cash flow and reducing expenses.";

/// Expense-to-revenue ratio, or 0 when there is no revenue.
pub fn expense_ratio(total_revenue: f64, total_expense: f64) -> f64 {
    if total_revenue > 0.0 {
        total_expense / total_revenue
    } else {
        0.0
    }
}

/// Score a summary from 0 to 100.
///
/// # Deductions
///
/// - 40 when net cash flow is negative
/// - 30 when expenses exceed 80% of revenue, otherwise 15 when they exceed 60%
/// - 20 when the summary carries the "Negative cash flow" flag
///
/// The flag deduction stacks with the net cash flow one: a summary produced
/// by ingestion with negative cash flow loses both.
pub fn health_score(summary: &FinancialSummary) -> HealthScore {
    let mut score: i32 = 100;

    if summary.net_cashflow < 0.0 {
        score -= 40;
    }

    let ratio = expense_ratio(summary.total_revenue, summary.total_expense);
    if ratio > 0.8 {
        score -= 30;
    } else if ratio > 0.6 {
        score -= 15;
    }

    if RiskFlag::NegativeCashFlow.is_in(&summary.risk_flags) {
        score -= 20;
    }

    let score = score.max(0);

    let status = if score >= 80 {
        HealthStatus::Healthy
    } else if score >= 50 {
        HealthStatus::Moderate
    } else {
        HealthStatus::AtRisk
    };

    HealthScore {
        financial_health_score: score,
        status,
    }
}

/// Rate credit readiness from a health score and net cash flow.
pub fn assess_credit(financial_health_score: i32, net_cashflow: f64) -> CreditAssessment {
    let (credit_status, explanation) = if financial_health_score >= 75 && net_cashflow > 0.0 {
        (
            CreditStatus::CreditReady,
            "Strong financial health and positive cash flow.",
        )
    } else if financial_health_score >= 50 {
        (
            CreditStatus::Caution,
            "Moderate financial health. Credit possible with conditions.",
        )
    } else {
        (
            CreditStatus::HighRisk,
            "Weak financial indicators or negative cash flow.",
        )
    };

    CreditAssessment {
        credit_status,
        explanation: explanation.to_string(),
    }
}

/// Suggest financing products for a credit status.
///
/// `None` stands for a status label the service does not recognise and is
/// treated like `High Risk`.
pub fn recommend_products(
    credit_status: Option<CreditStatus>,
    net_cashflow: f64,
) -> ProductRecommendation {
    let recommended_products = match credit_status {
        Some(CreditStatus::CreditReady) if net_cashflow > 0.0 => {
            vec!["Working Capital Loan", "Business Credit Card"]
        }
        Some(CreditStatus::CreditReady) => vec!["Invoice Discounting"],
        Some(CreditStatus::Caution) => vec!["Overdraft Facility"],
        Some(CreditStatus::HighRisk) | None => vec![NOT_ELIGIBLE],
    };

    ProductRecommendation {
        recommended_products: recommended_products
            .into_iter()
            .map(str::to_string)
            .collect(),
        note: PRODUCT_NOTE.to_string(),
    }
}

/// Explain a summary in plain English with standard recommendations.
pub fn generate_insights(summary: &FinancialSummary) -> AiInsights {
    let mut sentences = Vec::with_capacity(2);

    if summary.net_cashflow > 0.0 {
        sentences.push(POSITIVE_CASH_FLOW_INSIGHT);
    } else {
        sentences.push(NEGATIVE_CASH_FLOW_INSIGHT);
    }

    if RiskFlag::HighExpenseRatio.is_in(&summary.risk_flags) {
        sentences.push(HIGH_EXPENSE_INSIGHT);
    }

    AiInsights {
        plain_english_summary: sentences.join(" "),
        actionable_recommendations: STANDARD_RECOMMENDATIONS
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

/// Run every rule over a summary.
pub fn assess(summary: FinancialSummary) -> Assessment {
    let health = health_score(&summary);
    let credit = assess_credit(health.financial_health_score, summary.net_cashflow);
    let products = recommend_products(Some(credit.credit_status), summary.net_cashflow);
    let insights = generate_insights(&summary);

    Assessment {
        summary,
        health,
        credit,
        products,
        insights,
    }
}
