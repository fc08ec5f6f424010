pub mod coercion;
pub mod valuation;

use chrono::NaiveDate;
use tracing::warn;

pub use coercion::{parse_monetary, CoercionReport};
pub use valuation::{ev_revenue_range, melt_valuation_ranges, EvRevenueRange};

use crate::db::models::{KeyRatioRow, MultipleRow, RawFacts};
use crate::types::{
    FinancialFact, KeyRatio, MultipleObservation, ValuationBound, ValuationRange,
};

/// Everything the views read, derived once from the raw result sets.
#[derive(Debug, Clone, Default)]
pub struct DerivedFacts {
    pub financial_facts: Vec<FinancialFact>,
    pub multiples: Vec<MultipleObservation>,
    pub key_ratios: Vec<KeyRatio>,
    pub valuation_ranges: Vec<ValuationRange>,
    pub diagnostics: LoadDiagnostics,
}

/// Non-fatal findings of one load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadDiagnostics {
    pub coercion: CoercionReport,
    /// Multiple rows dropped because their date did not parse.
    pub undated_multiples: usize,
}

impl LoadDiagnostics {
    pub fn coercion_warning(&self) -> bool {
        self.coercion.has_nulls()
    }
}

pub fn derive(raw: RawFacts) -> DerivedFacts {
    let (financial_facts, coercion) = coercion::coerce_income_statements(&raw.income_statements);
    if coercion.has_nulls() {
        warn!(
            null_cells = coercion.null_cells,
            rows = coercion.rows_with_nulls,
            "Some values in the income statement monetary columns are null after conversion"
        );
    }

    let total_multiples = raw.multiples.len();
    let multiples: Vec<MultipleObservation> =
        raw.multiples.into_iter().filter_map(observation_from_row).collect();
    let undated_multiples = total_multiples - multiples.len();
    if undated_multiples > 0 {
        warn!(dropped = undated_multiples, "Dropped multiple rows with unparsable dates");
    }

    let key_ratios = raw.key_ratios.into_iter().map(KeyRatio::from).collect();

    let bounds: Vec<ValuationBound> =
        raw.valuation_bounds.into_iter().map(ValuationBound::from).collect();
    let valuation_ranges = melt_valuation_ranges(&bounds);

    DerivedFacts {
        financial_facts,
        multiples,
        key_ratios,
        valuation_ranges,
        diagnostics: LoadDiagnostics {
            coercion,
            undated_multiples,
        },
    }
}

/// Accepts `YYYY-MM-DD`, ignoring any trailing time component.
pub fn parse_observation_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn observation_from_row(row: MultipleRow) -> Option<MultipleObservation> {
    let date = parse_observation_date(&row.date)?;
    Some(MultipleObservation {
        company: row.company,
        date,
        multiple_type: row.multiple_type,
        multiple_value: row.multiple_value,
        average: row.average,
        q1: row.q1,
        q3: row.q3,
    })
}

impl From<KeyRatioRow> for KeyRatio {
    fn from(row: KeyRatioRow) -> Self {
        Self {
            company: row.company,
            ratio_year: row.ratio_year as i32,
            profitability: row.profitability,
            liquidity: row.liquidity,
            credit: row.credit,
            leverage_ratio: row.leverage_ratio,
            roic: row.roic,
        }
    }
}
