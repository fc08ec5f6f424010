use crate::config::REVENUE_MULTIPLE;
use crate::db::models::ValuationBoundRow;
use crate::types::{RangeKind, ValuationBound, ValuationRange};

/// Stacked-bar heights derived from one revenue-multiple bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvRevenueRange {
    /// `revenue × Q1`: where the visible bar starts.
    pub lower: f64,
    /// `revenue × Q3 − lower`: the height stacked on top of `lower`, not the
    /// absolute upper bound. `lower + span` is the upper bound.
    pub span: f64,
}

impl From<ValuationBoundRow> for ValuationBound {
    fn from(row: ValuationBoundRow) -> Self {
        Self {
            company: row.company,
            fin_year: row.fin_year as i32,
            multiple_type: row.multiple_type,
            revenue: row.revenue,
            lower: row.lower,
            upper: row.upper,
        }
    }
}

/// EV-Revenue range of a bound, or `None` when the bound is not a revenue
/// multiple or any input is missing.
pub fn ev_revenue_range(bound: &ValuationBound) -> Option<EvRevenueRange> {
    if bound.multiple_type != REVENUE_MULTIPLE {
        return None;
    }
    let revenue = bound.revenue?;
    let lower = revenue * bound.lower?;
    let span = revenue * bound.upper? - lower;
    if !lower.is_finite() || !span.is_finite() {
        return None;
    }
    Some(EvRevenueRange { lower, span })
}

/// Reshapes bounds into the long-form football field dataset: a `lower` and a
/// `span` record per surviving bound, or nothing at all for that bound.
pub fn melt_valuation_ranges(bounds: &[ValuationBound]) -> Vec<ValuationRange> {
    bounds
        .iter()
        .filter_map(|bound| ev_revenue_range(bound).map(|range| (bound, range)))
        .flat_map(|(bound, range)| {
            [(RangeKind::Lower, range.lower), (RangeKind::Span, range.span)]
                .into_iter()
                .map(move |(range_kind, value)| ValuationRange {
                    company: bound.company.clone(),
                    fin_year: bound.fin_year,
                    multiple_type: bound.multiple_type.clone(),
                    range_kind,
                    value,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(multiple_type: &str, revenue: Option<f64>, q1: Option<f64>, q3: Option<f64>) -> ValuationBound {
        ValuationBound {
            company: "JetBlue".to_string(),
            fin_year: 2023,
            multiple_type: multiple_type.to_string(),
            revenue,
            lower: q1,
            upper: q3,
        }
    }

    #[test]
    fn span_is_height_above_lower() {
        let range = ev_revenue_range(&bound("revenue", Some(1000.0), Some(0.4), Some(0.7))).unwrap();
        assert!((range.lower - 400.0).abs() < 1e-9);
        assert!((range.span - 300.0).abs() < 1e-9);
    }

    #[test]
    fn lower_plus_span_reaches_q3_bound() {
        for (revenue, q1, q3) in [(5362.0, 0.2, 0.5), (9158.0, 0.31, 0.64), (1.5, 1.1, 3.9)] {
            let range = ev_revenue_range(&bound("revenue", Some(revenue), Some(q1), Some(q3))).unwrap();
            assert!((range.lower + range.span - revenue * q3).abs() < 1e-9);
        }
    }

    #[test]
    fn other_multiple_types_never_reach_the_melt() {
        let bounds = vec![
            bound("ebitda", Some(1000.0), Some(4.0), Some(8.0)),
            bound("revenue", Some(1000.0), Some(0.4), Some(0.7)),
        ];
        let melted = melt_valuation_ranges(&bounds);
        assert_eq!(melted.len(), 2);
        assert!(melted.iter().all(|r| r.multiple_type == "revenue"));
        assert_eq!(melted[0].range_kind, RangeKind::Lower);
        assert_eq!(melted[1].range_kind, RangeKind::Span);
    }

    #[test]
    fn incomplete_bounds_drop_both_records() {
        let bounds = vec![
            bound("revenue", None, Some(0.4), Some(0.7)),
            bound("revenue", Some(1000.0), Some(0.4), None),
        ];
        assert!(melt_valuation_ranges(&bounds).is_empty());
    }
}
