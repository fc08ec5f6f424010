use crate::config::chart_style;
use crate::error::Result;
use crate::palette::palette_for;
use crate::sankey::{build_edges, select_topology, NODE_LABELS};
use crate::state::{FactStore, OverviewFilter};
use crate::views::model::{NodeStyle, Placeholder, SankeyView, ViewModel};

/// Income-statement flow for the selected company/year. A missing row yields
/// the no-data placeholder; nothing is filled in from defaults.
pub fn build_sankey(store: &FactStore, filter: &OverviewFilter) -> Result<ViewModel> {
    let (Some(company), Some(year)) = (filter.company.as_deref(), filter.year) else {
        return Ok(Placeholder::no_data("No data available for the selected filters."));
    };
    let Some(fact) = store.financial_fact(company, year) else {
        return Ok(Placeholder::no_data(format!(
            "No data available for {company} in {year}"
        )));
    };

    let palette = palette_for(company)?;
    let topology = select_topology(fact);
    let edges = build_edges(fact, topology);
    let edge_colors = palette.links.iter().take(edges.len()).copied().collect();

    Ok(ViewModel::Sankey(SankeyView {
        title: format!("Sankey Diagram for {company} {year} Financial Data"),
        topology,
        nodes: NODE_LABELS.to_vec(),
        node_style: NodeStyle {
            pad: chart_style::SANKEY_NODE_PAD,
            thickness: chart_style::SANKEY_NODE_THICKNESS,
            fill: chart_style::SANKEY_NODE_FILL,
            outline: chart_style::SANKEY_NODE_OUTLINE,
            outline_width: 0,
        },
        edges,
        edge_colors,
    }))
}
