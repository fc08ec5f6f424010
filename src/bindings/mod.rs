pub mod graph;
pub mod pages;

pub use graph::{Binding, BindingGraph, OutputView, Recomputed};
pub use pages::{comparison_page, overview_page, ComparisonPage, OverviewPage};
