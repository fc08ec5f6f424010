use crate::types::FinancialFact;
use crate::views::model::{SankeyEdge, SankeyTopology};

// Node indices into `NODE_LABELS`.
pub const SALES_AND_SERVICES: usize = 0;
pub const OTHER_REVENUE: usize = 1;
pub const REVENUE: usize = 2;
pub const OPERATING_INCOME: usize = 3;
pub const OPERATING_EXPENSES: usize = 4;
pub const OPERATING_LOSS: usize = 5;
pub const SELLING_AND_MARKETING: usize = 6;
pub const DEPRECIATION_AND_AMORTIZATION: usize = 7;
pub const OTHER_OPERATING_EXPENSE: usize = 8;

/// Canonical node set shared by both topologies, so node positions stay put
/// when the topology flips.
pub const NODE_LABELS: [&str; 9] = [
    "Sales & Services Revenue",
    "Other Revenue",
    "Revenue",
    "Operating Income",
    "Operating Expenses",
    "Operating Loss",
    "Selling & Marketing",
    "Depreciation & Amortization",
    "Other Operating Expense",
];

/// Balanced when there is no operating loss and a positive operating income.
/// A null in either field never satisfies the guard, and the
/// `loss == 0 && income == 0` case stays Lossy.
pub fn select_topology(fact: &FinancialFact) -> SankeyTopology {
    let no_loss = fact.operating_loss == Some(0.0);
    let positive_income = fact.operating_income.is_some_and(|v| v > 0.0);
    if no_loss && positive_income {
        SankeyTopology::Balanced
    } else {
        SankeyTopology::Lossy
    }
}

/// Edges of the chosen topology, in declaration order.
pub fn build_edges(fact: &FinancialFact, topology: SankeyTopology) -> Vec<SankeyEdge> {
    let edge = |source, target, value| SankeyEdge { source, target, value };

    let mut edges = vec![
        edge(SALES_AND_SERVICES, REVENUE, fact.sales_and_services_revenue),
        edge(OTHER_REVENUE, REVENUE, fact.other_revenue),
    ];
    match topology {
        SankeyTopology::Balanced => {
            edges.push(edge(REVENUE, OPERATING_INCOME, fact.operating_income));
            edges.push(edge(REVENUE, OPERATING_EXPENSES, fact.operating_expenses));
        }
        SankeyTopology::Lossy => {
            // the whole revenue is consumed by expenses; the loss tops it up
            edges.push(edge(REVENUE, OPERATING_EXPENSES, fact.revenue));
        }
    }
    // zero-valued in the balanced branch, kept for a stable layout
    edges.push(edge(OPERATING_LOSS, OPERATING_EXPENSES, fact.operating_loss));
    edges.push(edge(OPERATING_EXPENSES, SELLING_AND_MARKETING, fact.selling_and_marketing));
    edges.push(edge(
        OPERATING_EXPENSES,
        DEPRECIATION_AND_AMORTIZATION,
        fact.depreciation_and_amortization,
    ));
    edges.push(edge(OPERATING_EXPENSES, OTHER_OPERATING_EXPENSE, fact.other_operating_expense));
    edges
}
