use std::sync::Arc;

use serde::Serialize;

use crate::error::Result;
use crate::palette;
use crate::pipeline::{DerivedFacts, LoadDiagnostics};
use crate::types::{FinancialFact, KeyRatio, MultipleObservation, ValuationRange};

// ---------------------------------------------------------------------------
// FactStore
// ---------------------------------------------------------------------------

/// Process-wide read-only facts. Built once at startup and shared through an
/// `Arc`; there is no mutating method.
#[derive(Debug, Default)]
pub struct FactStore {
    derived: DerivedFacts,
}

impl FactStore {
    pub fn new(derived: DerivedFacts) -> Arc<Self> {
        Arc::new(Self { derived })
    }

    pub fn financial_facts(&self) -> &[FinancialFact] {
        &self.derived.financial_facts
    }

    pub fn multiples(&self) -> &[MultipleObservation] {
        &self.derived.multiples
    }

    pub fn key_ratios(&self) -> &[KeyRatio] {
        &self.derived.key_ratios
    }

    pub fn valuation_ranges(&self) -> &[ValuationRange] {
        &self.derived.valuation_ranges
    }

    pub fn diagnostics(&self) -> &LoadDiagnostics {
        &self.derived.diagnostics
    }

    /// The income statement of one company/year, if loaded.
    pub fn financial_fact(&self, company: &str, year: i32) -> Option<&FinancialFact> {
        self.financial_facts()
            .iter()
            .find(|f| f.company == company && f.year == year)
    }

    // --- selectable options ---

    pub fn income_statement_companies(&self) -> Vec<String> {
        unique(self.financial_facts().iter().map(|f| f.company.as_str()))
    }

    pub fn ratio_companies(&self) -> Vec<String> {
        unique(self.key_ratios().iter().map(|r| r.company.as_str()))
    }

    pub fn multiple_types(&self) -> Vec<String> {
        unique(self.multiples().iter().map(|m| m.multiple_type.as_str()))
    }

    pub fn income_statement_years(&self) -> Option<YearBounds> {
        YearBounds::of(self.financial_facts().iter().map(|f| f.year))
    }

    pub fn valuation_years(&self) -> Option<YearBounds> {
        YearBounds::of(self.valuation_ranges().iter().map(|r| r.fin_year))
    }

    pub fn ratio_years(&self) -> Option<YearBounds> {
        YearBounds::of(self.key_ratios().iter().map(|r| r.ratio_year))
    }

    /// Every company that can reach a chart.
    pub fn all_companies(&self) -> Vec<String> {
        let facts = self.financial_facts().iter().map(|f| f.company.as_str());
        let multiples = self.multiples().iter().map(|m| m.company.as_str());
        let ratios = self.key_ratios().iter().map(|r| r.company.as_str());
        let ranges = self.valuation_ranges().iter().map(|r| r.company.as_str());
        unique(facts.chain(multiples).chain(ratios).chain(ranges))
    }

    /// Fails when any loaded company lacks a declared palette.
    pub fn ensure_palettes(&self) -> Result<()> {
        let companies = self.all_companies();
        palette::ensure_palettes(companies.iter().map(String::as_str))
    }

    pub fn options(&self) -> SelectionOptions {
        SelectionOptions {
            overview_companies: self.income_statement_companies(),
            overview_years: self.income_statement_years(),
            multiple_types: self.multiple_types(),
            comparison_companies: self.ratio_companies(),
            comparison_years: self.valuation_years(),
        }
    }
}

/// Inclusive year range for a page's year slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearBounds {
    pub min: i32,
    pub max: i32,
}

impl YearBounds {
    fn of(years: impl Iterator<Item = i32>) -> Option<Self> {
        years.fold(None, |acc, y| match acc {
            None => Some(Self { min: y, max: y }),
            Some(b) => Some(Self {
                min: b.min.min(y),
                max: b.max.max(y),
            }),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionOptions {
    pub overview_companies: Vec<String>,
    pub overview_years: Option<YearBounds>,
    pub multiple_types: Vec<String>,
    pub comparison_companies: Vec<String>,
    pub comparison_years: Option<YearBounds>,
}

/// First-seen order, duplicates removed.
fn unique<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.iter().any(|seen| seen == item) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::types::RangeKind;
    use chrono::NaiveDate;

    pub(crate) fn fact(company: &str, year: i32) -> FinancialFact {
        FinancialFact {
            company: company.to_string(),
            year,
            revenue: Some(1000.0),
            sales_and_services_revenue: Some(900.0),
            other_revenue: Some(100.0),
            operating_expenses: Some(850.0),
            selling_and_marketing: Some(300.0),
            depreciation_and_amortization: Some(200.0),
            other_operating_expense: Some(350.0),
            operating_income: Some(150.0),
            operating_loss: Some(0.0),
        }
    }

    pub(crate) fn observation(company: &str, date: (i32, u32, u32), kind: &str, value: f64) -> MultipleObservation {
        MultipleObservation {
            company: company.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            multiple_type: kind.to_string(),
            multiple_value: Some(value),
            average: Some(0.556),
            q1: Some(0.4),
            q3: Some(0.7),
        }
    }

    pub(crate) fn ratio(company: &str, year: i32, metrics: [&str; 5]) -> KeyRatio {
        let s = |v: &str| Some(v.to_string());
        KeyRatio {
            company: company.to_string(),
            ratio_year: year,
            profitability: s(metrics[0]),
            liquidity: s(metrics[1]),
            credit: s(metrics[2]),
            leverage_ratio: s(metrics[3]),
            roic: s(metrics[4]),
        }
    }

    pub(crate) fn range(company: &str, year: i32, kind: RangeKind, value: f64) -> ValuationRange {
        ValuationRange {
            company: company.to_string(),
            fin_year: year,
            multiple_type: "revenue".to_string(),
            range_kind: kind,
            value,
        }
    }

    pub(crate) fn sample_store() -> Arc<FactStore> {
        FactStore::new(DerivedFacts {
            financial_facts: vec![fact("JetBlue", 2022), fact("JetBlue", 2023), fact("Spirit", 2023)],
            multiples: vec![
                observation("JetBlue", (2023, 6, 30), "revenue", 0.55),
                observation("JetBlue", (2023, 3, 31), "revenue", 0.5),
                observation("JetBlue", (2023, 3, 31), "ebitda", 5.0),
                observation("Spirit", (2022, 3, 31), "revenue", 0.3),
            ],
            key_ratios: vec![
                ratio("JetBlue", 2023, ["10", "20", "30", "40", "50"]),
                ratio("Spirit", 2023, ["0.05", "1.2", "0.6", "2.1", "0.08"]),
                ratio("Hawaiian", 2022, ["0.02", "abc", "0.7", "2.5", "0.03"]),
            ],
            valuation_ranges: vec![
                range("JetBlue", 2023, RangeKind::Lower, 400.0),
                range("JetBlue", 2023, RangeKind::Span, 300.0),
                range("Spirit", 2023, RangeKind::Lower, 1072.4),
                range("Spirit", 2023, RangeKind::Span, 1608.6),
                range("Spirit", 2021, RangeKind::Lower, 900.0),
                range("Spirit", 2021, RangeKind::Span, 500.0),
            ],
            diagnostics: LoadDiagnostics::default(),
        })
    }

    #[test]
    fn options_follow_load_order() {
        let options = sample_store().options();
        assert_eq!(options.overview_companies, vec!["JetBlue", "Spirit"]);
        assert_eq!(options.multiple_types, vec!["revenue", "ebitda"]);
        assert_eq!(options.comparison_companies, vec!["JetBlue", "Spirit", "Hawaiian"]);
        assert_eq!(options.overview_years, Some(YearBounds { min: 2022, max: 2023 }));
        assert_eq!(options.comparison_years, Some(YearBounds { min: 2021, max: 2023 }));
    }

    #[test]
    fn financial_fact_lookup_is_exact() {
        let store = sample_store();
        assert!(store.financial_fact("Spirit", 2023).is_some());
        assert!(store.financial_fact("Spirit", 2022).is_none());
    }

    #[test]
    fn palette_check_covers_every_dataset() {
        assert!(sample_store().ensure_palettes().is_ok());

        let store = FactStore::new(DerivedFacts {
            key_ratios: vec![ratio("Allegiant", 2023, ["1", "1", "1", "1", "1"])],
            ..DerivedFacts::default()
        });
        assert!(store.ensure_palettes().is_err());
    }

    #[test]
    fn empty_store_has_no_year_bounds() {
        let store = FactStore::new(DerivedFacts::default());
        assert!(store.income_statement_years().is_none());
        assert!(store.options().overview_companies.is_empty());
    }
}
