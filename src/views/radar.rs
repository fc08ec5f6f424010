use crate::error::Result;
use crate::palette::identity_color;
use crate::pipeline::parse_monetary;
use crate::state::{ComparisonFilter, FactStore};
use crate::views::comparison_guard;
use crate::views::model::{Placeholder, RadarPolygon, RadarView, ViewModel};

pub const REMINDER: &str = "Reminder: Please select at least two companies to display a meaningful comparison on the radar chart.";

/// Canonical metric order around the polygon.
pub const METRICS: [&str; 5] = ["Profitability", "Liquidity", "Credit", "Leverage_Ratio", "ROIC"];

pub fn build_radar(store: &FactStore, filter: &ComparisonFilter) -> Result<ViewModel> {
    if let Some(placeholder) = comparison_guard(&filter.companies, REMINDER) {
        return Ok(placeholder);
    }
    let Some(year) = filter.year else {
        return Ok(Placeholder::no_data("No data available for the selected year"));
    };

    let mut polygons = Vec::new();
    for company in &filter.companies {
        let Some(ratio) = store
            .key_ratios()
            .iter()
            .find(|r| r.ratio_year == year && &r.company == company)
        else {
            continue;
        };
        let values = ratio.metrics().map(parse_monetary);
        polygons.push(RadarPolygon {
            company: company.clone(),
            color: identity_color(company)?,
            labels: close_polygon(&METRICS),
            values: close_polygon(&values),
            fill: "toself",
        });
    }

    if polygons.is_empty() {
        return Ok(Placeholder::no_data(format!("No data available for year {year}")));
    }

    Ok(ViewModel::Radar(RadarView {
        title: format!("Financial Ratios for Year {year}"),
        polygons,
    }))
}

/// Repeats the first element at the end so the outline closes on itself.
pub fn close_polygon<T: Clone>(points: &[T]) -> Vec<T> {
    let mut closed = points.to_vec();
    if let Some(first) = points.first() {
        closed.push(first.clone());
    }
    closed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fact_store::tests::sample_store;
    use crate::views::model::PlaceholderKind;

    fn filter(companies: &[&str], year: i32) -> ComparisonFilter {
        ComparisonFilter {
            companies: companies.iter().map(|c| c.to_string()).collect(),
            year: Some(year),
        }
    }

    #[test]
    fn polygon_is_closed_on_values_and_labels() {
        let view = build_radar(&sample_store(), &filter(&["JetBlue", "Spirit"], 2023)).unwrap();
        let ViewModel::Radar(radar) = view else {
            panic!("expected radar, got {view:?}");
        };
        let jetblue = &radar.polygons[0];
        assert_eq!(jetblue.values.len(), 6);
        assert_eq!(jetblue.values[5], Some(10.0));
        assert_eq!(jetblue.values[0], Some(10.0));
        assert_eq!(jetblue.labels.len(), 6);
        assert_eq!(jetblue.labels[5], jetblue.labels[0]);
        assert_eq!(jetblue.labels[0], "Profitability");
        assert_eq!(radar.title, "Financial Ratios for Year 2023");
    }

    #[test]
    fn polygons_follow_selection_order_and_skip_missing_companies() {
        let view =
            build_radar(&sample_store(), &filter(&["Spirit", "Hawaiian", "JetBlue"], 2023)).unwrap();
        let ViewModel::Radar(radar) = view else {
            panic!("expected radar, got {view:?}");
        };
        let companies: Vec<&str> = radar.polygons.iter().map(|p| p.company.as_str()).collect();
        assert_eq!(companies, vec!["Spirit", "JetBlue"]);
        assert_eq!(radar.polygons[0].color, "#FFD966");
    }

    #[test]
    fn unparsable_metric_becomes_null() {
        let view = build_radar(&sample_store(), &filter(&["Hawaiian", "Spirit"], 2022)).unwrap();
        let ViewModel::Radar(radar) = view else {
            panic!("expected radar, got {view:?}");
        };
        assert_eq!(radar.polygons.len(), 1);
        assert_eq!(radar.polygons[0].values[1], None);
        assert_eq!(radar.polygons[0].values[0], Some(0.02));
    }

    #[test]
    fn single_company_gets_reminder() {
        let view = build_radar(&sample_store(), &filter(&["JetBlue"], 2023)).unwrap();
        let placeholder = view.placeholder().unwrap();
        assert_eq!(placeholder.kind, PlaceholderKind::InsufficientSelection);
        assert_eq!(placeholder.message, REMINDER);
    }

    #[test]
    fn valid_selection_without_rows_is_no_data() {
        let view = build_radar(&sample_store(), &filter(&["JetBlue", "Spirit"], 2019)).unwrap();
        let placeholder = view.placeholder().unwrap();
        assert_eq!(placeholder.kind, PlaceholderKind::NoData);
        assert_ne!(placeholder.message, REMINDER);
    }

    #[test]
    fn closing_an_empty_polygon_adds_nothing() {
        assert!(close_polygon::<f64>(&[]).is_empty());
        assert_eq!(close_polygon(&[10, 20, 30, 40, 50]), vec![10, 20, 30, 40, 50, 10]);
    }
}
