//! Command layer tying the editor and the selection together.
//!
//! One [`TableModule`] serves a whole document. At most one table has its
//! tools shown at a time; commands act on that table's current selection.

use tabledom::{Attribute, Geometry, MouseButton, NodeId, NodeKind, PointerEvent, Rect, Tree};

use crate::config::TableConfig;
use crate::editor::{ColumnDirection, DeleteOutcome, RowDirection, TableEditor};
use crate::error::EditError;
use crate::host::{ChangeSource, EditorHost};
use crate::schedule::LayoutScheduler;
use crate::selection::SelectionController;

#[derive(Debug, Default)]
pub struct TableModule {
    config: TableConfig,
    scheduler: LayoutScheduler,
    selection: Option<SelectionController>,
    /// Cell to select once the host has laid out the last edit.
    pending_focus: Option<NodeId>,
}

impl TableModule {
    pub fn new(config: TableConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn scheduler(&self) -> &LayoutScheduler {
        &self.scheduler
    }

    pub fn selection(&self) -> Option<&SelectionController> {
        self.selection.as_ref()
    }

    /// Table whose tools are shown.
    pub fn active_table(&self) -> Option<NodeId> {
        self.selection.as_ref().map(SelectionController::table)
    }

    /// Insert an empty `rows` x `cols` table into `parent` before `reference`.
    pub fn insert_table(
        &mut self,
        tree: &mut Tree,
        parent: NodeId,
        reference: Option<NodeId>,
        rows: usize,
        cols: usize,
    ) -> Result<NodeId, EditError> {
        let table = tree.insert_table(parent, reference, rows, cols, self.config.column_width)?;
        self.scheduler.request(table);
        Ok(table)
    }

    /// An editor for the table `node` belongs to, using this module's config
    /// and width scheduler.
    pub fn editor<'a>(
        &'a mut self,
        tree: &'a mut Tree,
        node: NodeId,
    ) -> Result<TableEditor<'a>, EditError> {
        Ok(TableEditor::new(tree, &mut self.scheduler, node)?.with_config(&self.config))
    }

    /// Attach selection tooling to the table `node` belongs to. Switching
    /// tables tears down the previous table's tooling.
    pub fn show_table_tools(&mut self, tree: &Tree, node: NodeId) -> Option<NodeId> {
        let table = tree.resolve_table(node)?;
        if self.active_table() != Some(table) {
            self.hide_table_tools();
            self.selection = Some(SelectionController::new(table, &self.config));
            log::debug!("[table_tools] shown for {}", table);
        }
        Some(table)
    }

    pub fn hide_table_tools(&mut self) {
        if let Some(mut selection) = self.selection.take() {
            selection.destroy();
            log::debug!("[table_tools] hidden for {}", selection.table());
        }
        self.pending_focus = None;
    }

    /// Route a pointer event. A left press inside a table shows that table's
    /// tools; one outside every table hides them.
    pub fn handle_pointer(
        &mut self,
        tree: &Tree,
        geometry: &Geometry<'_>,
        event: &PointerEvent,
        host: &mut dyn EditorHost,
    ) -> bool {
        if let PointerEvent::Press {
            target,
            button: MouseButton::Left,
            ..
        } = *event
        {
            match target.and_then(|t| tree.closest(t, NodeKind::Table)) {
                Some(table) => {
                    self.show_table_tools(tree, table);
                }
                None => {
                    self.hide_table_tools();
                    return false;
                }
            }
        }
        match self.selection.as_mut() {
            Some(selection) => selection.handle_event(tree, geometry, event, host),
            None => false,
        }
    }

    pub fn on_content_changed(&mut self) {
        if let Some(selection) = self.selection.as_mut() {
            selection.on_content_changed();
        }
    }

    pub fn on_wrapper_scroll(&mut self, tree: &Tree, wrapper: NodeId) {
        if let Some(selection) = self
            .selection
            .as_mut()
            .filter(|s| tree.parent(s.table()) == Some(wrapper))
        {
            selection.on_wrapper_scroll(tree);
        }
    }

    /// Run deferred work once the host has laid out the last edit: width
    /// recomputes, then re-selecting the cell the last command focused.
    pub fn flush_layout(&mut self, tree: &mut Tree, geometry: &Geometry<'_>) -> Vec<(NodeId, f32)> {
        let widths = self.scheduler.flush(tree);
        let focus = self.pending_focus.take().filter(|&cell| tree.contains(cell));
        if let (Some(cell), Some(selection)) = (focus, self.selection.as_mut()) {
            if !selection.select_cell(tree, geometry, cell) {
                log::warn!("[flush_layout] focus target {} has no rect", cell);
            }
        }
        widths
    }

    /// Select every cell between two cells, showing tools for their table.
    pub fn select_range(
        &mut self,
        tree: &Tree,
        geometry: &Geometry<'_>,
        start: NodeId,
        end: NodeId,
    ) -> Result<(), EditError> {
        let table = self
            .show_table_tools(tree, start)
            .ok_or(EditError::TableGone(start))?;
        let (Some(start_rect), Some(end_rect)) = (geometry.rect(start), geometry.rect(end)) else {
            return Err(EditError::NoSelection);
        };
        if let Some(selection) = self.selection.as_mut().filter(|s| s.table() == table) {
            selection.set_selection(tree, geometry, start_rect, end_rect);
        }
        Ok(())
    }

    pub fn insert_row(
        &mut self,
        tree: &mut Tree,
        geometry: &Geometry<'_>,
        direction: RowDirection,
        host: &mut dyn EditorHost,
    ) -> Result<Vec<NodeId>, EditError> {
        let (table, boundary, _) = self.current()?;
        let affected = self
            .editor(tree, table)?
            .insert_row(geometry, boundary, direction)?;
        host.update(ChangeSource::User);
        self.pending_focus = affected.first().copied();
        Ok(affected)
    }

    pub fn insert_column(
        &mut self,
        tree: &mut Tree,
        geometry: &Geometry<'_>,
        direction: ColumnDirection,
        host: &mut dyn EditorHost,
    ) -> Result<Vec<NodeId>, EditError> {
        let (table, boundary, _) = self.current()?;
        let index = self.column_index(tree, geometry, table, boundary, direction);
        let affected = self
            .editor(tree, table)?
            .insert_column(geometry, boundary, index, direction)?;
        host.update(ChangeSource::User);
        self.pending_focus = affected.first().copied();
        Ok(affected)
    }

    pub fn delete_selected_rows(
        &mut self,
        tree: &mut Tree,
        geometry: &Geometry<'_>,
        host: &mut dyn EditorHost,
    ) -> Result<DeleteOutcome, EditError> {
        let (table, boundary, _) = self.current()?;
        let outcome = self
            .editor(tree, table)?
            .delete_row(geometry, boundary, host)?;
        self.after_delete(outcome, host);
        Ok(outcome)
    }

    pub fn delete_selected_columns(
        &mut self,
        tree: &mut Tree,
        geometry: &Geometry<'_>,
        host: &mut dyn EditorHost,
    ) -> Result<DeleteOutcome, EditError> {
        let (table, boundary, _) = self.current()?;
        let indexes = self
            .selection
            .as_ref()
            .map(|s| s.column_indexes(tree, geometry))
            .unwrap_or_default();
        let outcome = self
            .editor(tree, table)?
            .delete_columns(geometry, boundary, &indexes, host)?;
        self.after_delete(outcome, host);
        Ok(outcome)
    }

    fn after_delete(&mut self, outcome: DeleteOutcome, host: &mut dyn EditorHost) {
        match outcome {
            DeleteOutcome::TableDestroyed => self.hide_table_tools(),
            DeleteOutcome::Deleted { .. } => {
                host.update(ChangeSource::User);
                if let Some(selection) = self.selection.as_mut() {
                    selection.clear_selection();
                }
            }
            DeleteOutcome::Skipped => {}
        }
    }

    /// Merge the selected cells. Needs at least two; returns the merged cell.
    pub fn merge_selected(
        &mut self,
        tree: &mut Tree,
        geometry: &Geometry<'_>,
        host: &mut dyn EditorHost,
    ) -> Result<Option<NodeId>, EditError> {
        let (table, _, selected) = self.current()?;
        if selected.len() < 2 {
            return Ok(None);
        }
        let (rowspan, colspan) = self
            .selection
            .as_ref()
            .map(|s| s.spans(tree, geometry))
            .ok_or(EditError::NoSelection)?;
        let merged = self
            .editor(tree, table)?
            .merge_cells(&selected, rowspan, colspan)?;
        host.update(ChangeSource::User);
        self.pending_focus = merged;
        Ok(merged)
    }

    pub fn unmerge_selected(
        &mut self,
        tree: &mut Tree,
        geometry: &Geometry<'_>,
        host: &mut dyn EditorHost,
    ) -> Result<Vec<NodeId>, EditError> {
        let (table, _, selected) = self.current()?;
        let created = self.editor(tree, table)?.unmerge_cells(geometry, &selected)?;
        host.update(ChangeSource::User);
        if let Some(selection) = self.selection.as_mut() {
            selection.clear_selection();
        }
        Ok(created)
    }

    /// Set or clear (`None`) the background of every selected cell.
    pub fn set_cell_background(
        &mut self,
        tree: &mut Tree,
        color: Option<&str>,
        host: &mut dyn EditorHost,
    ) -> Result<(), EditError> {
        let (_, _, selected) = self.current()?;
        for cell in selected {
            tree.format(cell, Attribute::Background(color.map(str::to_string)))?;
        }
        host.update(ChangeSource::User);
        Ok(())
    }

    /// Remove the table whose tools are shown.
    pub fn delete_table(&mut self, tree: &mut Tree, host: &mut dyn EditorHost) -> Result<(), EditError> {
        let table = self.active_table().ok_or(EditError::NoSelection)?;
        self.editor(tree, table)?.destroy(host)?;
        self.hide_table_tools();
        Ok(())
    }

    /// Active table, boundary and selected cells.
    fn current(&self) -> Result<(NodeId, Rect, Vec<NodeId>), EditError> {
        let selection = self.selection.as_ref().ok_or(EditError::NoSelection)?;
        if selection.selected().is_empty() {
            return Err(EditError::NoSelection);
        }
        Ok((
            selection.table(),
            selection.boundary(),
            selection.selected().to_vec(),
        ))
    }

    /// ColumnGroup entry whose edge matches the boundary edge on the side of
    /// the insertion. Falls back to the end of the group.
    fn column_index(
        &self,
        tree: &Tree,
        geometry: &Geometry<'_>,
        table: NodeId,
        boundary: Rect,
        direction: ColumnDirection,
    ) -> usize {
        let e = self.config.edit_tolerance;
        let columns = tree.columns(table);
        columns
            .iter()
            .position(|&column| {
                geometry.rect(column).is_some_and(|r| match direction {
                    ColumnDirection::Right => (r.x1() - boundary.x1()).abs() <= e,
                    ColumnDirection::Left => (r.x - boundary.x).abs() <= e,
                })
            })
            .unwrap_or(columns.len())
    }
}
