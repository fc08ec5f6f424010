use crate::config::chart_style;
use crate::error::Result;
use crate::palette::identity_color;
use crate::state::{FactStore, OverviewFilter};
use crate::types::MultipleObservation;
use crate::views::model::{
    LineDash, Placeholder, ReferenceKind, ReferenceLine, TrendPoint, TrendView, ViewModel,
};

pub const NO_DATA_MESSAGE: &str = "No data available for the selected filters.";

/// Multiple time series of one company/year/type with the year's average and
/// ±1 std bands as horizontal markers.
pub fn build_trend(store: &FactStore, filter: &OverviewFilter) -> Result<ViewModel> {
    let (Some(company), Some(year), Some(multiple_type)) = (
        filter.company.as_deref(),
        filter.year,
        filter.multiple_type.as_deref(),
    ) else {
        return Ok(Placeholder::no_data(NO_DATA_MESSAGE));
    };

    let mut rows: Vec<&MultipleObservation> = store
        .multiples()
        .iter()
        .filter(|m| m.company == company && m.year() == year && m.multiple_type == multiple_type)
        .collect();
    // the bands come from the first row as loaded, before ordering the series
    let Some(first) = rows.first().copied() else {
        return Ok(Placeholder::no_data(NO_DATA_MESSAGE));
    };
    let reference_lines = reference_lines(first);
    rows.sort_by_key(|m| m.date);

    Ok(ViewModel::Trend(TrendView {
        title: format!("Multiple Trend of {year}"),
        y_axis_title: format!("{multiple_type} multiple"),
        company: company.to_string(),
        color: identity_color(company)?,
        points: rows
            .iter()
            .map(|m| TrendPoint {
                date: m.date,
                value: m.multiple_value,
            })
            .collect(),
        reference_lines,
    }))
}

fn reference_lines(row: &MultipleObservation) -> Vec<ReferenceLine> {
    let line = |kind, prefix: &str, value: Option<f64>, dash, color| ReferenceLine {
        kind,
        value,
        label: format!("{prefix}({})", display_value(value)),
        dash,
        color,
    };
    vec![
        line(ReferenceKind::Average, "Average", row.average, LineDash::Solid, chart_style::AVERAGE_LINE),
        line(ReferenceKind::MinusOneStd, "-1 std", row.q1, LineDash::Dash, chart_style::STD_LINE),
        line(ReferenceKind::PlusOneStd, "+1 std", row.q3, LineDash::Dash, chart_style::STD_LINE),
    ]
}

/// Two-decimal rounding in shortest form: 0.556 → "0.56", 7 → "7.0".
fn display_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:?}", (v * 100.0).round() / 100.0),
        None => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::fact_store::tests::sample_store;
    use crate::views::model::PlaceholderKind;
    use chrono::NaiveDate;

    fn filter(company: &str, year: i32, kind: &str) -> OverviewFilter {
        OverviewFilter {
            company: Some(company.to_string()),
            year: Some(year),
            multiple_type: Some(kind.to_string()),
        }
    }

    #[test]
    fn series_is_date_ordered_with_three_markers() {
        let view = build_trend(&sample_store(), &filter("JetBlue", 2023, "revenue")).unwrap();
        let ViewModel::Trend(trend) = view else {
            panic!("expected trend, got {view:?}");
        };
        assert_eq!(trend.points.len(), 2);
        assert_eq!(trend.points[0].date, NaiveDate::from_ymd_opt(2023, 3, 31).unwrap());
        assert_eq!(trend.points[0].value, Some(0.5));
        assert_eq!(trend.title, "Multiple Trend of 2023");
        assert_eq!(trend.y_axis_title, "revenue multiple");
        assert_eq!(trend.color, "#5B9BD5");

        let labels: Vec<&str> = trend.reference_lines.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Average(0.56)", "-1 std(0.4)", "+1 std(0.7)"]);
        assert_eq!(trend.reference_lines[0].dash, LineDash::Solid);
        assert_eq!(trend.reference_lines[2].dash, LineDash::Dash);
    }

    #[test]
    fn empty_filter_result_is_no_data() {
        let view = build_trend(&sample_store(), &filter("Spirit", 2023, "revenue")).unwrap();
        let placeholder = view.placeholder().unwrap();
        assert_eq!(placeholder.kind, PlaceholderKind::NoData);
        assert_eq!(placeholder.message, NO_DATA_MESSAGE);
    }

    #[test]
    fn missing_band_keeps_marker_with_na_label() {
        assert_eq!(display_value(None), "n/a");
        assert_eq!(display_value(Some(12.346)), "12.35");
        assert_eq!(display_value(Some(7.0)), "7.0");
    }
}
