use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Income statement
// ---------------------------------------------------------------------------

/// One company's income statement for one fiscal year, after numeric coercion.
/// Every monetary field is `None` when the stored text did not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialFact {
    pub company: String,
    pub year: i32,
    pub revenue: Option<f64>,
    pub sales_and_services_revenue: Option<f64>,
    pub other_revenue: Option<f64>,
    pub operating_expenses: Option<f64>,
    pub selling_and_marketing: Option<f64>,
    pub depreciation_and_amortization: Option<f64>,
    pub other_operating_expense: Option<f64>,
    pub operating_income: Option<f64>,
    pub operating_loss: Option<f64>,
}

impl FinancialFact {
    /// The monetary columns watched by the load-time coercion diagnostic.
    pub fn monetary_fields(&self) -> [Option<f64>; 9] {
        [
            self.revenue,
            self.sales_and_services_revenue,
            self.other_revenue,
            self.operating_expenses,
            self.selling_and_marketing,
            self.depreciation_and_amortization,
            self.other_operating_expense,
            self.operating_income,
            self.operating_loss,
        ]
    }
}

// ---------------------------------------------------------------------------
// Valuation multiples
// ---------------------------------------------------------------------------

/// A dated multiple observation with the reference bands of its year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultipleObservation {
    pub company: String,
    pub date: NaiveDate,
    pub multiple_type: String,
    pub multiple_value: Option<f64>,
    pub average: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
}

impl MultipleObservation {
    pub fn year(&self) -> i32 {
        self.date.year()
    }
}

// ---------------------------------------------------------------------------
// Key ratios
// ---------------------------------------------------------------------------

/// Ratio metrics as stored. Coercion happens in the radar builder, which is
/// the only consumer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyRatio {
    pub company: String,
    pub ratio_year: i32,
    pub profitability: Option<String>,
    pub liquidity: Option<String>,
    pub credit: Option<String>,
    pub leverage_ratio: Option<String>,
    pub roic: Option<String>,
}

impl KeyRatio {
    /// Raw metric values in radar order.
    pub fn metrics(&self) -> [Option<&str>; 5] {
        [
            self.profitability.as_deref(),
            self.liquidity.as_deref(),
            self.credit.as_deref(),
            self.leverage_ratio.as_deref(),
            self.roic.as_deref(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Enterprise-value ranges
// ---------------------------------------------------------------------------

/// Revenue of one fiscal year paired with the Q1/Q3 multiplier bounds of one
/// multiple type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationBound {
    pub company: String,
    pub fin_year: i32,
    pub multiple_type: String,
    pub revenue: Option<f64>,
    /// Q1 multiplier.
    pub lower: Option<f64>,
    /// Q3 multiplier.
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    /// Base of the stacked bar: `revenue × Q1`.
    Lower,
    /// Height stacked on top of `Lower`: `revenue × Q3 − lower`.
    Span,
}

impl std::fmt::Display for RangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangeKind::Lower => write!(f, "lower"),
            RangeKind::Span => write!(f, "span"),
        }
    }
}

/// One long-form record of the football field dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationRange {
    pub company: String,
    pub fin_year: i32,
    pub multiple_type: String,
    pub range_kind: RangeKind,
    pub value: f64,
}
