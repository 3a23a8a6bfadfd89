use crate::layout::LayoutResult;
use crate::node::{NodeId, NodeKind};
use crate::tree::Tree;

/// Find the deepest node under `root` whose rect contains the point.
/// Nodes without a rect are transparent: their children are still searched.
/// Rows and columns are always transparent, since a rowspan cell extends
/// below the rect of the row that holds it.
pub fn hit_test(tree: &Tree, layout: &LayoutResult, root: NodeId, x: f32, y: f32) -> Option<NodeId> {
    hit_test_node(tree, layout, root, x, y)
}

/// Like [`hit_test`], then walk up to the nearest node of `kind`.
pub fn hit_test_kind(
    tree: &Tree,
    layout: &LayoutResult,
    root: NodeId,
    kind: NodeKind,
    x: f32,
    y: f32,
) -> Option<NodeId> {
    let hit = hit_test_node(tree, layout, root, x, y)?;
    tree.closest(hit, kind)
}

fn hit_test_node(tree: &Tree, layout: &LayoutResult, node: NodeId, x: f32, y: f32) -> Option<NodeId> {
    let rect = layout.get(&node).filter(|_| !passes_through(tree, node));
    if let Some(rect) = rect {
        if !rect.contains(x, y) {
            return None;
        }
    }

    // Later children are on top
    for &child in tree.children(node).iter().rev() {
        if let Some(id) = hit_test_node(tree, layout, child, x, y) {
            return Some(id);
        }
    }

    rect.map(|_| node)
}

fn passes_through(tree: &Tree, node: NodeId) -> bool {
    matches!(
        tree.kind(node),
        Some(NodeKind::Row | NodeKind::ColumnGroup | NodeKind::Column)
    )
}
