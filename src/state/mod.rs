pub mod fact_store;
pub mod filter;

pub use fact_store::{FactStore, SelectionOptions, YearBounds};
pub use filter::{
    ComparisonFilter, ComparisonSelection, FilterState, InputSignal, OverviewFilter,
    OverviewSelection,
};
