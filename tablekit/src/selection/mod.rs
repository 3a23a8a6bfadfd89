//! Rectangular multi-cell selection.
//!
//! A press on a cell anchors the selection; every move while the button is
//! held re-derives the boundary from the anchor cell and the cell under the
//! pointer. The boundary is then snapped outward over cells it only partly
//! covers, and the selection is every cell fully inside it.

mod lines;

pub use lines::{HelpLines, LinePosition};

use tabledom::{Geometry, MouseButton, NodeId, NodeKind, PointerEvent, Rect, Span, Tree};

use crate::config::TableConfig;
use crate::host::EditorHost;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        anchor: NodeId,
        /// Anchor rectangle as captured on press.
        anchor_rect: Rect,
    },
}

/// Selection state for one table.
#[derive(Debug, Clone)]
pub struct SelectionController {
    table: NodeId,
    tolerance: f32,
    edit_tolerance: f32,
    state: DragState,
    boundary: Rect,
    selected: Vec<NodeId>,
    lines: HelpLines,
}

impl SelectionController {
    pub fn new(table: NodeId, config: &TableConfig) -> Self {
        Self {
            table,
            tolerance: config.selection_tolerance,
            edit_tolerance: config.edit_tolerance,
            state: DragState::Idle,
            boundary: Rect::default(),
            selected: Vec::new(),
            lines: HelpLines::new(config.line_color.clone()),
        }
    }

    pub fn table(&self) -> NodeId {
        self.table
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn boundary(&self) -> Rect {
        self.boundary
    }

    /// Selected cells in document order.
    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    pub fn lines(&self) -> &HelpLines {
        &self.lines
    }

    /// Feed a pointer event. Returns whether the event was consumed.
    pub fn handle_event(
        &mut self,
        tree: &Tree,
        geometry: &Geometry<'_>,
        event: &PointerEvent,
        host: &mut dyn EditorHost,
    ) -> bool {
        match *event {
            PointerEvent::Press { target, button, .. } => {
                self.press(tree, geometry, target, button)
            }
            PointerEvent::Move { target, button, .. } => {
                self.drag(tree, geometry, target, button, host)
            }
            PointerEvent::Release { .. } => self.release(),
        }
    }

    fn press(
        &mut self,
        tree: &Tree,
        geometry: &Geometry<'_>,
        target: Option<NodeId>,
        button: MouseButton,
    ) -> bool {
        if button != MouseButton::Left {
            return false;
        }
        let Some(anchor) = self.cell_in_table(tree, target) else {
            return false;
        };
        let Some(anchor_rect) = geometry.rect(anchor) else {
            log::warn!("[selection] anchor {} has no rect", anchor);
            return false;
        };

        // A new press discards whatever the previous drag selected.
        self.state = DragState::Dragging {
            anchor,
            anchor_rect,
        };
        self.boundary = anchor_rect.envelope(anchor_rect);
        self.update(tree, geometry);
        log::trace!("[selection] anchored at {}", anchor);
        true
    }

    fn drag(
        &mut self,
        tree: &Tree,
        geometry: &Geometry<'_>,
        target: Option<NodeId>,
        button: MouseButton,
        host: &mut dyn EditorHost,
    ) -> bool {
        let DragState::Dragging {
            anchor,
            anchor_rect,
        } = self.state
        else {
            return false;
        };
        if button != MouseButton::Left {
            return false;
        }
        let Some(end) = self.cell_in_table(tree, target) else {
            return false;
        };
        let Some(end_rect) = geometry.rect(end) else {
            return false;
        };

        self.boundary = anchor_rect.envelope(end_rect);
        self.update(tree, geometry);
        if end != anchor {
            host.blur();
        }
        true
    }

    fn release(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.state = DragState::Idle;
        was_dragging
    }

    /// Select the cells covered by the envelope of two rectangles, given in
    /// the geometry's frame.
    pub fn set_selection(&mut self, tree: &Tree, geometry: &Geometry<'_>, start: Rect, end: Rect) {
        self.boundary = start.envelope(end);
        self.update(tree, geometry);
    }

    /// Select a single cell. Returns false if the cell has no rectangle.
    pub fn select_cell(&mut self, tree: &Tree, geometry: &Geometry<'_>, cell: NodeId) -> bool {
        match geometry.rect(cell) {
            Some(rect) => {
                self.set_selection(tree, geometry, rect, rect);
                true
            }
            None => false,
        }
    }

    fn update(&mut self, tree: &Tree, geometry: &Geometry<'_>) {
        self.correct_boundary(tree, geometry);
        self.selected = self.compute_selected_cells(tree, geometry);
        self.reposition_help_lines(tree);
    }

    /// Grow the boundary over every cell it intersects.
    ///
    /// One pass in document order: a cell that only starts to intersect
    /// after a later cell widened the boundary is not revisited.
    pub fn correct_boundary(&mut self, tree: &Tree, geometry: &Geometry<'_>) {
        let e = self.tolerance;
        let touches = |start: f32, size: f32, lo: f32, hi: f32| {
            let near = start + e;
            let far = start - e + size;
            (near >= lo && near <= hi) || (far >= lo && far <= hi)
        };
        for (_, rect) in geometry.snapshot(&tree.cells(self.table)) {
            let b = self.boundary;
            if touches(rect.x, rect.width, b.x, b.x1()) && touches(rect.y, rect.height, b.y, b.y1()) {
                self.boundary = b.envelope(rect);
            }
        }
    }

    /// Cells whose rectangle lies inside the boundary on all four edges.
    pub fn compute_selected_cells(&self, tree: &Tree, geometry: &Geometry<'_>) -> Vec<NodeId> {
        let e = self.tolerance;
        let b = self.boundary;
        geometry
            .snapshot(&tree.cells(self.table))
            .into_iter()
            .filter(|(_, r)| {
                r.x + e >= b.x
                    && r.x - e + r.width <= b.x1()
                    && r.y + e >= b.y
                    && r.y - e + r.height <= b.y1()
            })
            .map(|(cell, _)| cell)
            .collect()
    }

    /// Place the boundary lines from the stored boundary.
    pub fn reposition_help_lines(&mut self, tree: &Tree) {
        let scroll_left = tree
            .parent(self.table)
            .map(|wrapper| tree.scroll_left(wrapper))
            .unwrap_or(0.0);
        self.lines.place(self.boundary, scroll_left);
    }

    /// Recompute the boundary from the first and last selected cells, then
    /// place the lines. Use after an edit moved the selected cells.
    pub fn refresh_help_lines(&mut self, tree: &Tree, geometry: &Geometry<'_>) {
        let (Some(&first), Some(&last)) = (self.selected.first(), self.selected.last()) else {
            return;
        };
        let (Some(start), Some(end)) = (geometry.rect(first), geometry.rect(last)) else {
            return;
        };
        self.boundary = start.envelope(end);
        self.reposition_help_lines(tree);
    }

    pub fn clear_selection(&mut self) {
        self.boundary = Rect::default();
        self.selected.clear();
        self.lines.hide();
    }

    /// The document changed under the selection.
    pub fn on_content_changed(&mut self) {
        self.clear_selection();
    }

    /// The table view scrolled horizontally.
    pub fn on_wrapper_scroll(&mut self, tree: &Tree) {
        if !self.selected.is_empty() {
            self.reposition_help_lines(tree);
        }
    }

    /// Number of rows and columns lying inside the boundary, for merging.
    pub fn spans(&self, tree: &Tree, geometry: &Geometry<'_>) -> (Span, Span) {
        let rows = geometry
            .snapshot(&tree.rows(self.table))
            .into_iter()
            .filter(|(_, r)| self.inside_rows(*r))
            .count();
        let columns = self.column_indexes(tree, geometry).len();
        (Span::clamped(rows as u32), Span::clamped(columns as u32))
    }

    /// ColumnGroup indexes lying inside the boundary.
    pub fn column_indexes(&self, tree: &Tree, geometry: &Geometry<'_>) -> Vec<usize> {
        tree.columns(self.table)
            .into_iter()
            .enumerate()
            .filter(|&(_, column)| geometry.rect(column).is_some_and(|r| self.inside_columns(r)))
            .map(|(index, _)| index)
            .collect()
    }

    fn inside_rows(&self, r: Rect) -> bool {
        let e = self.edit_tolerance;
        r.y > self.boundary.y - e && r.y1() < self.boundary.y1() + e
    }

    fn inside_columns(&self, r: Rect) -> bool {
        let e = self.edit_tolerance;
        r.x > self.boundary.x - e && r.x1() < self.boundary.x1() + e
    }

    /// Tear down: drop the selection and stop tracking any drag.
    pub fn destroy(&mut self) {
        self.state = DragState::Idle;
        self.clear_selection();
    }

    fn cell_in_table(&self, tree: &Tree, target: Option<NodeId>) -> Option<NodeId> {
        let cell = tree.closest(target?, NodeKind::Cell)?;
        (tree.closest(cell, NodeKind::Table) == Some(self.table)).then_some(cell)
    }
}
