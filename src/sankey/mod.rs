pub mod topology;

pub use topology::{build_edges, select_topology, NODE_LABELS};
