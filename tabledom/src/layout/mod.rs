pub mod grid;
mod rect;

use std::collections::HashMap;

pub use grid::{layout, GridOptions};
pub use rect::Rect;

use crate::node::NodeId;

pub type LayoutResult = HashMap<NodeId, Rect>;

/// Supplies the rendered bounding box of a node, in viewport coordinates.
pub trait GeometryOracle {
    fn bounding_rect(&self, node: NodeId) -> Option<Rect>;
}

impl GeometryOracle for LayoutResult {
    fn bounding_rect(&self, node: NodeId) -> Option<Rect> {
        self.get(&node).copied()
    }
}

/// An oracle paired with the reference frame its rectangles are translated into.
#[derive(Clone, Copy)]
pub struct Geometry<'a> {
    oracle: &'a dyn GeometryOracle,
    frame: Rect,
}

impl<'a> Geometry<'a> {
    pub fn new(oracle: &'a dyn GeometryOracle, frame: Rect) -> Self {
        Self { oracle, frame }
    }

    /// Geometry whose frame is the viewport origin.
    pub fn viewport(oracle: &'a dyn GeometryOracle) -> Self {
        Self::new(oracle, Rect::default())
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    /// Rectangle of `node` relative to the frame.
    pub fn rect(&self, node: NodeId) -> Option<Rect> {
        self.oracle
            .bounding_rect(node)
            .map(|r| r.relative_to(self.frame))
    }

    /// Capture the rectangles of `nodes` in order. Nodes the oracle cannot
    /// place are skipped.
    pub fn snapshot(&self, nodes: &[NodeId]) -> Vec<(NodeId, Rect)> {
        nodes
            .iter()
            .filter_map(|&node| match self.rect(node) {
                Some(rect) => Some((node, rect)),
                None => {
                    log::warn!("[geometry] no rect for {}", node);
                    None
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for Geometry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Geometry")
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}
