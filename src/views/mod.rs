pub mod model;
pub mod radar;
pub mod range;
pub mod sankey;
pub mod trend;

pub use model::{Placeholder, PlaceholderKind, ViewModel};
pub use radar::build_radar;
pub use range::build_range;
pub use sankey::build_sankey;
pub use trend::build_trend;

use crate::config::MIN_COMPARISON_COMPANIES;

/// Insufficient-selection guard shared by the comparison views. Runs before
/// any filtering so a one-company selection never yields a partial chart.
pub fn comparison_guard(companies: &[String], reminder: &str) -> Option<ViewModel> {
    (companies.len() < MIN_COMPARISON_COMPANIES).then(|| Placeholder::insufficient_selection(reminder))
}
