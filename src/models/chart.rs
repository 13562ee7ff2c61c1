//! Chart rendering models

use crate::utils::svg::NodeId;

/// Handles to every element the renderer created, in drawing order
#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub close_path: NodeId,
    pub open_path: NodeId,
    pub markers: Vec<NodeId>,
    pub x_axis: NodeId,
    pub y_axis: NodeId,
}
