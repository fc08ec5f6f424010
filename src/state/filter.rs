use serde::{Deserialize, Serialize};

use crate::state::FactStore;

// ---------------------------------------------------------------------------
// Input signals
// ---------------------------------------------------------------------------

/// Named selection inputs a binding can depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSignal {
    Company,
    Year,
    MultipleType,
    Companies,
    ComparisonYear,
}

impl std::fmt::Display for InputSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InputSignal::Company => "company",
            InputSignal::Year => "year",
            InputSignal::MultipleType => "multiple_type",
            InputSignal::Companies => "companies",
            InputSignal::ComparisonYear => "comparison_year",
        };
        write!(f, "{s}")
    }
}

/// Page-scoped selection state, mutated only through its selection events.
pub trait FilterState {
    type Event;

    /// Applies one selection event and returns the signals whose value
    /// actually changed. Re-selecting the current value changes nothing.
    fn apply(&mut self, event: Self::Event) -> Vec<InputSignal>;
}

// ---------------------------------------------------------------------------
// Overview page: one company, one year, one multiple type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverviewFilter {
    pub company: Option<String>,
    pub year: Option<i32>,
    pub multiple_type: Option<String>,
}

/// Single-select inputs of the overview page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum OverviewSelection {
    Company(String),
    Year(i32),
    MultipleType(String),
}

impl OverviewFilter {
    /// Preferred company if it has income statements, else the first company;
    /// the most recent year; the first multiple type.
    pub fn defaults(store: &FactStore, preferred_company: Option<&str>) -> Self {
        let companies = store.income_statement_companies();
        let company = preferred_company
            .filter(|p| companies.iter().any(|c| c == p))
            .map(str::to_string)
            .or_else(|| companies.into_iter().next());
        Self {
            company,
            year: store.income_statement_years().map(|b| b.max),
            multiple_type: store.multiple_types().into_iter().next(),
        }
    }
}

impl FilterState for OverviewFilter {
    type Event = OverviewSelection;

    fn apply(&mut self, event: OverviewSelection) -> Vec<InputSignal> {
        let changed = match event {
            OverviewSelection::Company(company) => {
                replace(&mut self.company, Some(company)).then_some(InputSignal::Company)
            }
            OverviewSelection::Year(year) => {
                replace(&mut self.year, Some(year)).then_some(InputSignal::Year)
            }
            OverviewSelection::MultipleType(kind) => {
                replace(&mut self.multiple_type, Some(kind)).then_some(InputSignal::MultipleType)
            }
        };
        changed.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Comparison page: a company set and one year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonFilter {
    /// Ordered, without duplicates.
    pub companies: Vec<String>,
    pub year: Option<i32>,
}

/// Multi-select inputs of the comparison page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "input", content = "value", rename_all = "snake_case")]
pub enum ComparisonSelection {
    Companies(Vec<String>),
    Year(i32),
}

impl ComparisonFilter {
    /// Every company with key ratios; the most recent valuation year, or the
    /// most recent ratio year when no valuation range exists.
    pub fn defaults(store: &FactStore) -> Self {
        let year = store
            .valuation_years()
            .or_else(|| store.ratio_years())
            .map(|b| b.max);
        Self {
            companies: store.ratio_companies(),
            year,
        }
    }
}

impl FilterState for ComparisonFilter {
    type Event = ComparisonSelection;

    fn apply(&mut self, event: ComparisonSelection) -> Vec<InputSignal> {
        let changed = match event {
            ComparisonSelection::Companies(companies) => {
                replace(&mut self.companies, dedup(companies)).then_some(InputSignal::Companies)
            }
            ComparisonSelection::Year(year) => {
                replace(&mut self.year, Some(year)).then_some(InputSignal::ComparisonYear)
            }
        };
        changed.into_iter().collect()
    }
}

/// Stores `value` and reports whether the slot changed.
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn dedup(companies: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(companies.len());
    for company in companies {
        if !out.contains(&company) {
            out.push(company);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fact_store::tests::sample_store;

    #[test]
    fn overview_defaults_pick_first_company_and_latest_year() {
        let filter = OverviewFilter::defaults(&sample_store(), None);
        assert_eq!(filter.company.as_deref(), Some("JetBlue"));
        assert_eq!(filter.year, Some(2023));
        assert_eq!(filter.multiple_type.as_deref(), Some("revenue"));
    }

    #[test]
    fn overview_defaults_honor_known_preference_only() {
        let store = sample_store();
        let preferred = OverviewFilter::defaults(&store, Some("Spirit"));
        assert_eq!(preferred.company.as_deref(), Some("Spirit"));

        let unknown = OverviewFilter::defaults(&store, Some("Frontier"));
        assert_eq!(unknown.company.as_deref(), Some("JetBlue"));
    }

    #[test]
    fn comparison_defaults_select_every_ratio_company() {
        let filter = ComparisonFilter::defaults(&sample_store());
        assert_eq!(filter.companies, vec!["JetBlue", "Spirit", "Hawaiian"]);
        assert_eq!(filter.year, Some(2023));
    }

    #[test]
    fn reselecting_the_same_value_reports_no_change() {
        let mut filter = OverviewFilter::defaults(&sample_store(), None);
        assert!(filter.apply(OverviewSelection::Year(2023)).is_empty());
        assert_eq!(filter.apply(OverviewSelection::Year(2022)), vec![InputSignal::Year]);
        assert_eq!(
            filter.apply(OverviewSelection::MultipleType("ebitda".to_string())),
            vec![InputSignal::MultipleType]
        );
    }

    #[test]
    fn company_sets_are_deduplicated_in_order() {
        let mut filter = ComparisonFilter::defaults(&sample_store());
        let changed = filter.apply(ComparisonSelection::Companies(vec![
            "Spirit".to_string(),
            "JetBlue".to_string(),
            "Spirit".to_string(),
        ]));
        assert_eq!(changed, vec![InputSignal::Companies]);
        assert_eq!(filter.companies, vec!["Spirit", "JetBlue"]);
    }

    #[test]
    fn selection_events_use_distinct_wire_shapes() {
        let single: OverviewSelection =
            serde_json::from_str(r#"{"input":"company","value":"Spirit"}"#).unwrap();
        assert_eq!(single, OverviewSelection::Company("Spirit".to_string()));

        let multi: ComparisonSelection =
            serde_json::from_str(r#"{"input":"companies","value":["Spirit"]}"#).unwrap();
        assert_eq!(multi, ComparisonSelection::Companies(vec!["Spirit".to_string()]));

        // a bare company name is not a valid multi-select payload
        assert!(serde_json::from_str::<ComparisonSelection>(
            r#"{"input":"companies","value":"Spirit"}"#
        )
        .is_err());
    }
}
