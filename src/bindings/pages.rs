use std::sync::Arc;

use crate::bindings::graph::{Binding, BindingGraph, OutputView};
use crate::error::Result;
use crate::state::{ComparisonFilter, FactStore, InputSignal, OverviewFilter};
use crate::views::{build_radar, build_range, build_sankey, build_trend};

pub type OverviewPage = BindingGraph<OverviewFilter>;
pub type ComparisonPage = BindingGraph<ComparisonFilter>;

const SANKEY_INPUTS: &[InputSignal] = &[InputSignal::Company, InputSignal::Year];
const TREND_INPUTS: &[InputSignal] = &[
    InputSignal::Company,
    InputSignal::Year,
    InputSignal::MultipleType,
];
const COMPARISON_INPUTS: &[InputSignal] = &[InputSignal::Companies, InputSignal::ComparisonYear];

pub fn overview_bindings() -> Vec<Binding<OverviewFilter>> {
    vec![
        Binding::new(OutputView::Sankey, SANKEY_INPUTS, build_sankey),
        Binding::new(OutputView::Trend, TREND_INPUTS, build_trend),
    ]
}

pub fn comparison_bindings() -> Vec<Binding<ComparisonFilter>> {
    vec![
        Binding::new(OutputView::Radar, COMPARISON_INPUTS, build_radar),
        Binding::new(OutputView::Range, COMPARISON_INPUTS, build_range),
    ]
}

pub fn overview_page(store: Arc<FactStore>, preferred_company: Option<&str>) -> Result<OverviewPage> {
    let filter = OverviewFilter::defaults(&store, preferred_company);
    BindingGraph::new(store, filter, overview_bindings())
}

pub fn comparison_page(store: Arc<FactStore>) -> Result<ComparisonPage> {
    let filter = ComparisonFilter::defaults(&store);
    BindingGraph::new(store, filter, comparison_bindings())
}
