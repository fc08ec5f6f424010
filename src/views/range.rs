use crate::config::chart_style;
use crate::error::Result;
use crate::palette::identity_color;
use crate::state::{ComparisonFilter, FactStore};
use crate::types::{RangeKind, ValuationRange};
use crate::views::comparison_guard;
use crate::views::model::{Placeholder, RangeBar, RangeSegment, RangeView, ViewModel};

pub const REMINDER: &str = "Reminder: Please select at least two companies to display a meaningful comparison on the football field chart.";

/// Football field chart: per company a transparent `lower` segment that
/// offsets the colored `span` segment stacked on top of it.
pub fn build_range(store: &FactStore, filter: &ComparisonFilter) -> Result<ViewModel> {
    if let Some(placeholder) = comparison_guard(&filter.companies, REMINDER) {
        return Ok(placeholder);
    }
    let Some(year) = filter.year else {
        return Ok(Placeholder::no_data("No data available for the selected year"));
    };

    let mut bars = Vec::new();
    for company in &filter.companies {
        let rows = store
            .valuation_ranges()
            .iter()
            .filter(|r| r.fin_year == year && &r.company == company);
        for (lower, span) in pair_segments(rows) {
            bars.push(RangeBar {
                company: company.clone(),
                segments: [
                    RangeSegment {
                        kind: RangeKind::Lower,
                        value: lower,
                        fill: chart_style::TRANSPARENT,
                        show_in_legend: false,
                        legend_name: None,
                    },
                    RangeSegment {
                        kind: RangeKind::Span,
                        value: span,
                        fill: identity_color(company)?,
                        show_in_legend: true,
                        legend_name: Some(company.clone()),
                    },
                ],
            });
        }
    }

    if bars.is_empty() {
        return Ok(Placeholder::no_data(format!("No data available for year {year}")));
    }

    Ok(ViewModel::Range(RangeView {
        title: "Enterprise Value Range".to_string(),
        x_axis_title: "Business Valuation ($ in millions)".to_string(),
        y_axis_title: "Company".to_string(),
        x_range: chart_style::VALUATION_AXIS_RANGE,
        legend_title: "Company".to_string(),
        bars,
    }))
}

/// Pairs each `lower` record with the `span` record that follows it.
fn pair_segments<'a>(rows: impl Iterator<Item = &'a ValuationRange>) -> Vec<(f64, f64)> {
    let mut pairs = Vec::new();
    let mut pending_lower = None;
    for row in rows {
        match row.range_kind {
            RangeKind::Lower => pending_lower = Some(row.value),
            RangeKind::Span => {
                if let Some(lower) = pending_lower.take() {
                    pairs.push((lower, row.value));
                }
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::DerivedFacts;
    use crate::state::fact_store::tests::{range, sample_store};
    use crate::views::model::PlaceholderKind;

    fn filter(companies: &[&str], year: i32) -> ComparisonFilter {
        ComparisonFilter {
            companies: companies.iter().map(|c| c.to_string()).collect(),
            year: Some(year),
        }
    }

    #[test]
    fn lower_segment_is_transparent_and_hidden_from_legend() {
        let view = build_range(&sample_store(), &filter(&["JetBlue", "Spirit"], 2023)).unwrap();
        let ViewModel::Range(chart) = view else {
            panic!("expected range, got {view:?}");
        };
        assert_eq!(chart.bars.len(), 2);

        let [lower, span] = &chart.bars[0].segments;
        assert_eq!(lower.value, 400.0);
        assert_eq!(lower.fill, "rgba(0, 0, 0, 0)");
        assert!(!lower.show_in_legend);
        assert_eq!(span.value, 300.0);
        assert_eq!(span.fill, "#5B9BD5");
        assert!(span.show_in_legend);
        assert_eq!(span.legend_name.as_deref(), Some("JetBlue"));
        assert_eq!(chart.x_range, [0.0, 8000.0]);
    }

    #[test]
    fn single_company_gets_reminder() {
        let view = build_range(&sample_store(), &filter(&["Spirit"], 2023)).unwrap();
        let placeholder = view.placeholder().unwrap();
        assert_eq!(placeholder.kind, PlaceholderKind::InsufficientSelection);
        assert_eq!(placeholder.message, REMINDER);
    }

    #[test]
    fn valid_selection_without_rows_is_no_data() {
        let view = build_range(&sample_store(), &filter(&["JetBlue", "Hawaiian"], 2021)).unwrap();
        let placeholder = view.placeholder().unwrap();
        assert_eq!(placeholder.kind, PlaceholderKind::NoData);
        assert_eq!(placeholder.message, "No data available for year 2021");
    }

    #[test]
    fn unknown_company_with_ranges_is_fatal() {
        let store = FactStore::new(DerivedFacts {
            valuation_ranges: vec![
                range("Allegiant", 2023, RangeKind::Lower, 10.0),
                range("Allegiant", 2023, RangeKind::Span, 5.0),
            ],
            ..DerivedFacts::default()
        });
        assert!(build_range(&store, &filter(&["Allegiant", "Spirit"], 2023)).is_err());
    }
}
