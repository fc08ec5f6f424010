use crate::db::models::IncomeStatementRow;
use crate::types::FinancialFact;

/// Parses thousand-separated monetary text such as `"1,234.5"`.
///
/// Returns `None` for missing, empty, unparsable, or non-finite input. Never
/// fails: a bad cell is a null cell.
pub fn parse_monetary(raw: Option<&str>) -> Option<f64> {
    let cleaned: String = raw?.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Outcome of coercing the income statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercionReport {
    /// Null cells across the watched monetary columns after coercion.
    pub null_cells: usize,
    /// Rows carrying at least one null monetary cell.
    pub rows_with_nulls: usize,
}

impl CoercionReport {
    /// True when the load should surface its single aggregate warning.
    pub fn has_nulls(&self) -> bool {
        self.null_cells > 0
    }
}

pub fn coerce_income_statement(row: &IncomeStatementRow) -> FinancialFact {
    FinancialFact {
        company: row.company.clone(),
        year: row.year as i32,
        revenue: parse_monetary(row.revenue.as_deref()),
        sales_and_services_revenue: parse_monetary(row.sales_and_services_revenue.as_deref()),
        other_revenue: parse_monetary(row.other_revenue.as_deref()),
        operating_expenses: parse_monetary(row.operating_expenses.as_deref()),
        selling_and_marketing: parse_monetary(row.selling_and_marketing.as_deref()),
        depreciation_and_amortization: parse_monetary(row.depreciation_and_amortization.as_deref()),
        other_operating_expense: parse_monetary(row.other_operating_expense.as_deref()),
        operating_income: parse_monetary(row.operating_income.as_deref()),
        operating_loss: parse_monetary(row.operating_loss.as_deref()),
    }
}

pub fn coerce_income_statements(rows: &[IncomeStatementRow]) -> (Vec<FinancialFact>, CoercionReport) {
    let mut report = CoercionReport::default();
    let facts = rows
        .iter()
        .map(|row| {
            let fact = coerce_income_statement(row);
            let nulls = fact.monetary_fields().iter().filter(|v| v.is_none()).count();
            if nulls > 0 {
                report.null_cells += nulls;
                report.rows_with_nulls += 1;
            }
            fact
        })
        .collect();
    (facts, report)
}
