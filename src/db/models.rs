/// Raw row types as returned by the fact store queries in `reader.rs`.
/// Monetary text is left untouched here; coercion belongs to the pipeline.

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IncomeStatementRow {
    pub company: String,
    pub year: i64,
    pub revenue: Option<String>,
    pub sales_and_services_revenue: Option<String>,
    pub other_revenue: Option<String>,
    pub operating_expenses: Option<String>,
    pub selling_and_marketing: Option<String>,
    pub depreciation_and_amortization: Option<String>,
    pub other_operating_expense: Option<String>,
    pub operating_income: Option<String>,
    pub operating_loss: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MultipleRow {
    pub company: String,
    pub date: String,
    pub multiple_type: String,
    pub multiple_value: Option<f64>,
    pub average: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct KeyRatioRow {
    pub company: String,
    pub ratio_year: i64,
    pub profitability: Option<String>,
    pub liquidity: Option<String>,
    pub credit: Option<String>,
    pub leverage_ratio: Option<String>,
    pub roic: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ValuationBoundRow {
    pub company: String,
    pub fin_year: i64,
    pub multiple_type: String,
    pub revenue: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

/// The four fully materialized result sets read at startup.
#[derive(Debug, Clone, Default)]
pub struct RawFacts {
    pub income_statements: Vec<IncomeStatementRow>,
    pub multiples: Vec<MultipleRow>,
    pub key_ratios: Vec<KeyRatioRow>,
    pub valuation_bounds: Vec<ValuationBoundRow>,
}
