//! View models handed to the render boundary. Each is a plain structured
//! value; the boundary draws it and never calls back into the engine.

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::RangeKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewModel {
    Sankey(SankeyView),
    Trend(TrendView),
    Radar(RadarView),
    Range(RangeView),
    Placeholder(Placeholder),
}

impl ViewModel {
    pub fn placeholder(&self) -> Option<&Placeholder> {
        match self {
            ViewModel::Placeholder(p) => Some(p),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Placeholders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    /// Too few entities selected for a comparison.
    InsufficientSelection,
    /// The selection is valid but matched no rows.
    NoData,
}

/// Stands in for a chart. Carries a message and no data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub message: String,
}

impl Placeholder {
    pub fn insufficient_selection(message: impl Into<String>) -> ViewModel {
        ViewModel::Placeholder(Self {
            kind: PlaceholderKind::InsufficientSelection,
            message: message.into(),
        })
    }

    pub fn no_data(message: impl Into<String>) -> ViewModel {
        ViewModel::Placeholder(Self {
            kind: PlaceholderKind::NoData,
            message: message.into(),
        })
    }
}

// ---------------------------------------------------------------------------
// Sankey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SankeyTopology {
    /// Revenue splits into operating income and operating expenses.
    Balanced,
    /// Revenue flows entirely into operating expenses, topped up by the loss.
    Lossy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyEdge {
    /// Index into `SankeyView::nodes`.
    pub source: usize,
    pub target: usize,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeStyle {
    pub pad: u32,
    pub thickness: u32,
    pub fill: &'static str,
    pub outline: &'static str,
    pub outline_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyView {
    pub title: String,
    pub topology: SankeyTopology,
    pub nodes: Vec<&'static str>,
    pub node_style: NodeStyle,
    pub edges: Vec<SankeyEdge>,
    /// One color per edge, same order as `edges`.
    pub edge_colors: Vec<&'static str>,
}

// ---------------------------------------------------------------------------
// Trend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDash {
    Solid,
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Average,
    MinusOneStd,
    PlusOneStd,
}

/// Horizontal marker with its display value baked into the label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub kind: ReferenceKind,
    pub value: Option<f64>,
    pub label: String,
    pub dash: LineDash,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub title: String,
    pub y_axis_title: String,
    pub company: String,
    pub color: &'static str,
    pub points: Vec<TrendPoint>,
    pub reference_lines: Vec<ReferenceLine>,
}

// ---------------------------------------------------------------------------
// Radar
// ---------------------------------------------------------------------------

/// Closed polygon: the last label/value repeats the first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPolygon {
    pub company: String,
    pub color: &'static str,
    pub labels: Vec<&'static str>,
    pub values: Vec<Option<f64>>,
    pub fill: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarView {
    pub title: String,
    pub polygons: Vec<RadarPolygon>,
}

// ---------------------------------------------------------------------------
// Range ("football field")
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSegment {
    pub kind: RangeKind,
    /// Always a real value; a transparent segment still takes up space.
    pub value: f64,
    pub fill: &'static str,
    pub show_in_legend: bool,
    pub legend_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeBar {
    pub company: String,
    /// `[lower, span]`, stacked in that order.
    pub segments: [RangeSegment; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeView {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub x_range: [f64; 2],
    pub legend_title: String,
    pub bars: Vec<RangeBar>,
}
