//! Structural edits on one table.
//!
//! There is no stored grid. Every edit classifies cells by comparing their
//! rendered rectangles against a reference rectangle, using a fixed edge
//! tolerance. Rectangles are captured from the [`Geometry`] before the first
//! mutation, so classification never sees a half-edited table.

mod classify;

use std::collections::{HashMap, HashSet};

use tabledom::{Attribute, Formats, Geometry, NodeId, NodeKind, Rect, RowId, Span, Tree};

use crate::config::TableConfig;
use crate::error::EditError;
use crate::host::{ChangeSource, EditorHost};
use crate::schedule::LayoutScheduler;
use classify::{Axis, Deletion, Insertion};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDirection {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnDirection {
    Left,
    Right,
}

/// Result of a row or column deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DeleteOutcome {
    /// The table had no rows; nothing happened.
    Skipped,
    /// Part of the table was removed.
    Deleted { removed: usize },
    /// Every cell was covered, so the whole table is gone. Do not run further
    /// edits against it.
    TableDestroyed,
}

/// Edits a single table in place.
pub struct TableEditor<'a> {
    tree: &'a mut Tree,
    scheduler: &'a mut LayoutScheduler,
    table: NodeId,
    tolerance: f32,
    column_width: u32,
}

impl<'a> TableEditor<'a> {
    /// Edit the table `node` belongs to (the Table, its Wrapper, or anything
    /// inside it).
    pub fn new(
        tree: &'a mut Tree,
        scheduler: &'a mut LayoutScheduler,
        node: NodeId,
    ) -> Result<Self, EditError> {
        let table = tree.resolve_table(node).ok_or(EditError::TableGone(node))?;
        let config = TableConfig::default();
        Ok(Self {
            tree,
            scheduler,
            table,
            tolerance: config.edit_tolerance,
            column_width: config.column_width,
        })
    }

    pub fn with_config(mut self, config: &TableConfig) -> Self {
        self.tolerance = config.edit_tolerance;
        self.column_width = config.column_width;
        self
    }

    pub fn tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn table(&self) -> NodeId {
        self.table
    }

    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// Insert a row above or below `reference`.
    ///
    /// Cells whose edge touches the insertion edge get a new cell in the new
    /// row, cloning their colspan. Cells the edge runs through grow their
    /// rowspan instead. Returns new and grown cells, left to right.
    pub fn insert_row(
        &mut self,
        geometry: &Geometry<'_>,
        reference: Rect,
        direction: RowDirection,
    ) -> Result<Vec<NodeId>, EditError> {
        self.ensure_live()?;
        let Some(body) = self.populated_body() else {
            return Ok(Vec::new());
        };
        let cells = geometry.snapshot(&self.tree.cells(self.table));
        let rows = geometry.snapshot(&self.tree.rows(self.table));
        let below = direction == RowDirection::Below;
        let edge = if below { reference.y1() } else { reference.y };

        let mut adjacent = Vec::new();
        let mut straddling = Vec::new();
        for &(cell, rect) in &cells {
            match classify::insertion(Axis::Vertical.extent(rect), edge, below, self.tolerance) {
                Insertion::Adjacent => adjacent.push((cell, rect)),
                Insertion::Straddling => straddling.push((cell, rect)),
                Insertion::Unaffected => {}
            }
        }
        adjacent.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));

        let row_id = self.tree.ids().row_id();
        let new_row = self
            .tree
            .create(NodeKind::Row, &Formats::new().row(row_id.clone()));
        let mut affected = Vec::with_capacity(adjacent.len() + straddling.len());
        for (cell, rect) in adjacent {
            let colspan = self.tree.colspan(cell);
            let new_cell = self.new_cell(Some(row_id.clone()), Span::ONE, colspan)?;
            self.tree.append_child(new_row, new_cell)?;
            affected.push((new_cell, rect.x));
        }
        for (cell, rect) in straddling {
            let rowspan = self.tree.rowspan(cell).saturating_add(1);
            self.tree.format(cell, Attribute::Rowspan(Some(rowspan)))?;
            affected.push((cell, rect.x));
        }

        let before = rows
            .iter()
            .find(|(_, rect)| (rect.y - edge).abs() < self.tolerance)
            .map(|&(row, _)| row);
        self.tree.insert_before(body, new_row, before)?;
        self.normalize()?;

        affected.sort_by(|a, b| a.1.total_cmp(&b.1));
        log::debug!(
            "[insert_row] {} {:?}: {} cells affected",
            self.table,
            direction,
            affected.len()
        );
        Ok(affected.into_iter().map(|(cell, _)| cell).collect())
    }

    /// Insert a column left or right of `reference`. `column_index` is the
    /// ColumnGroup entry the reference edge belongs to; the new entry goes
    /// before or after it, or at the end when the index is out of range.
    /// Returns new and grown cells, top to bottom.
    pub fn insert_column(
        &mut self,
        geometry: &Geometry<'_>,
        reference: Rect,
        column_index: usize,
        direction: ColumnDirection,
    ) -> Result<Vec<NodeId>, EditError> {
        self.ensure_live()?;
        if self.populated_body().is_none() {
            return Ok(Vec::new());
        }
        let cells = geometry.snapshot(&self.tree.cells(self.table));
        let right = direction == ColumnDirection::Right;
        let edge = if right { reference.x1() } else { reference.x };

        let mut adjacent = Vec::new();
        let mut straddling = Vec::new();
        for &(cell, rect) in &cells {
            match classify::insertion(Axis::Horizontal.extent(rect), edge, right, self.tolerance) {
                Insertion::Adjacent => adjacent.push((cell, rect)),
                Insertion::Straddling => straddling.push((cell, rect)),
                Insertion::Unaffected => {}
            }
        }

        let mut affected = Vec::with_capacity(adjacent.len() + straddling.len());
        for (cell, rect) in adjacent {
            let Some(row) = self.tree.parent(cell) else {
                continue;
            };
            let sibling = if right { self.tree.next(cell) } else { Some(cell) };
            let row_id = self.tree.row_id(row).cloned();
            let rowspan = self.tree.rowspan(cell);
            let new_cell = self.new_cell(row_id, rowspan, Span::ONE)?;
            self.tree.insert_before(row, new_cell, sibling)?;
            affected.push((new_cell, rect.y));
        }

        match self.tree.column_group(self.table) {
            Some(group) => {
                let columns = self.tree.columns(self.table);
                if column_index >= columns.len() {
                    log::warn!(
                        "[insert_column] column {} out of range, appending",
                        column_index
                    );
                }
                let before = match direction {
                    ColumnDirection::Right => columns.get(column_index + 1).copied(),
                    ColumnDirection::Left => columns.get(column_index).copied(),
                };
                let column = self
                    .tree
                    .create(NodeKind::Column, &Formats::new().width(self.column_width));
                self.tree.insert_before(group, column, before)?;
            }
            None => log::warn!("[insert_column] {} has no column group", self.table),
        }

        for (cell, rect) in straddling {
            let colspan = self.tree.colspan(cell).saturating_add(1);
            self.tree.format(cell, Attribute::Colspan(Some(colspan)))?;
            affected.push((cell, rect.y));
        }

        affected.sort_by(|a, b| a.1.total_cmp(&b.1));
        self.scheduler.request(self.table);
        self.normalize()?;
        log::debug!(
            "[insert_column] {} {:?} at {}: {} cells affected",
            self.table,
            direction,
            column_index,
            affected.len()
        );
        Ok(affected.into_iter().map(|(cell, _)| cell).collect())
    }

    /// Delete the rows covered by `reference`.
    ///
    /// Cells inside the band are removed. Cells reaching into it lose the
    /// deleted rows they cover from their rowspan; those whose first row is
    /// deleted move down into the next surviving row so the rows below keep
    /// their content. Covering every cell destroys the table.
    pub fn delete_row(
        &mut self,
        geometry: &Geometry<'_>,
        reference: Rect,
        host: &mut dyn EditorHost,
    ) -> Result<DeleteOutcome, EditError> {
        self.ensure_live()?;
        if self.populated_body().is_none() {
            return Ok(DeleteOutcome::Skipped);
        }
        let all = self.tree.cells(self.table);
        let cells = geometry.snapshot(&all);
        let rows = geometry.snapshot(&self.tree.rows(self.table));
        let band = Axis::Vertical.extent(reference);
        let tol = self.tolerance;

        let removed_rows: Vec<(NodeId, Rect)> = rows
            .into_iter()
            .filter(|(_, rect)| classify::inside(Axis::Vertical.extent(*rect), band, tol))
            .collect();

        let mut removed = Vec::new();
        let mut shrunk = Vec::new();
        let mut falling = Vec::new();
        for &(cell, rect) in &cells {
            let extent = Axis::Vertical.extent(rect);
            match classify::deletion(extent, band, tol) {
                Deletion::Removed => removed.push(cell),
                Deletion::Spanning => {
                    shrunk.push((cell, removed_rows.len()));
                    if classify::starts_with(extent, band, tol) {
                        falling.push((cell, rect));
                    }
                }
                Deletion::Tail => {
                    let covered = covered_by(&removed_rows, Axis::Vertical, extent, tol);
                    shrunk.push((cell, covered));
                    falling.push((cell, rect));
                }
                Deletion::Head => {
                    let covered = covered_by(&removed_rows, Axis::Vertical, extent, tol);
                    shrunk.push((cell, covered));
                }
                Deletion::Unaffected => {}
            }
        }

        if removed.len() == all.len() {
            self.destroy(host)?;
            return Ok(DeleteOutcome::TableDestroyed);
        }

        let rects: HashMap<NodeId, Rect> = cells.iter().copied().collect();
        let doomed: HashSet<NodeId> = removed_rows.iter().map(|&(row, _)| row).collect();
        for (cell, rect) in falling {
            let Some(target) = self.next_surviving_row(cell, &doomed) else {
                log::warn!("[delete_row] no row left below {} to move it into", cell);
                continue;
            };
            let before = self.cell_after(target, rect.x1(), &rects);
            self.tree.insert_before(target, cell, before)?;
            let row_id = self.tree.row_id(target).cloned();
            self.tree.format(cell, Attribute::Row(row_id))?;
        }

        for &cell in &removed {
            self.tree.remove(cell)?;
        }
        for (cell, by) in shrunk {
            let rowspan = self.tree.rowspan(cell).saturating_sub(by as u32);
            self.tree.format(cell, Attribute::Rowspan(Some(rowspan)))?;
        }
        for (row, _) in removed_rows {
            if self.tree.contains(row) {
                self.tree.remove(row)?;
            }
        }
        self.normalize()?;

        log::debug!(
            "[delete_row] {}: removed {} cells, {} rows",
            self.table,
            removed.len(),
            doomed.len()
        );
        Ok(DeleteOutcome::Deleted {
            removed: removed.len(),
        })
    }

    /// Delete the columns covered by `reference`. `indexes` are the
    /// ColumnGroup entries being deleted; that many entries are removed,
    /// starting at the smallest index.
    pub fn delete_columns(
        &mut self,
        geometry: &Geometry<'_>,
        reference: Rect,
        indexes: &[usize],
        host: &mut dyn EditorHost,
    ) -> Result<DeleteOutcome, EditError> {
        self.ensure_live()?;
        if self.populated_body().is_none() {
            return Ok(DeleteOutcome::Skipped);
        }
        let all = self.tree.cells(self.table);
        let cells = geometry.snapshot(&all);
        let band = Axis::Horizontal.extent(reference);
        let tol = self.tolerance;
        let band_columns: Vec<(NodeId, Rect)> = geometry
            .snapshot(&self.tree.columns(self.table))
            .into_iter()
            .filter(|(_, rect)| classify::inside(Axis::Horizontal.extent(*rect), band, tol))
            .collect();

        let mut removed = Vec::new();
        let mut shrunk = Vec::new();
        for &(cell, rect) in &cells {
            let extent = Axis::Horizontal.extent(rect);
            match classify::deletion(extent, band, tol) {
                Deletion::Removed => removed.push(cell),
                Deletion::Spanning => shrunk.push((cell, indexes.len())),
                Deletion::Tail | Deletion::Head => {
                    let covered = covered_by(&band_columns, Axis::Horizontal, extent, tol);
                    shrunk.push((cell, covered));
                }
                Deletion::Unaffected => {}
            }
        }

        if removed.len() == all.len() {
            self.destroy(host)?;
            return Ok(DeleteOutcome::TableDestroyed);
        }

        if let Some(&first) = indexes.iter().min() {
            for _ in indexes {
                if let Some(&column) = self.tree.columns(self.table).get(first) {
                    self.tree.remove(column)?;
                }
            }
        }
        for &cell in &removed {
            self.tree.remove(cell)?;
        }
        for (cell, by) in shrunk {
            let colspan = self.tree.colspan(cell).saturating_sub(by as u32);
            self.tree.format(cell, Attribute::Colspan(Some(colspan)))?;
        }

        self.scheduler.request(self.table);
        self.normalize()?;
        log::debug!(
            "[delete_columns] {} {:?}: removed {} cells",
            self.table,
            indexes,
            removed.len()
        );
        Ok(DeleteOutcome::Deleted {
            removed: removed.len(),
        })
    }

    /// Merge `cells` into the first of them.
    ///
    /// The cells must form a contiguous rectangle; callers check that. The
    /// first cell takes the given spans and the content of all the others,
    /// and its lines are re-tagged to one cell identity. Returns `None` for
    /// an empty input.
    pub fn merge_cells(
        &mut self,
        cells: &[NodeId],
        rowspan: Span,
        colspan: Span,
    ) -> Result<Option<NodeId>, EditError> {
        self.ensure_live()?;
        let Some((&merged, rest)) = cells.split_first() else {
            return Ok(None);
        };
        self.tree.format(merged, Attribute::Colspan(Some(colspan)))?;
        self.tree.format(merged, Attribute::Rowspan(Some(rowspan)))?;
        for &cell in rest {
            if cell == merged || !self.tree.contains(cell) {
                continue;
            }
            self.tree.move_children_to(cell, merged, None)?;
            self.tree.remove(cell)?;
        }

        let row_id = self.tree.row_id(merged).cloned();
        let cell_id = self
            .tree
            .first_child(merged)
            .and_then(|line| self.tree.formats(line).cell);
        for line in self.tree.children(merged).to_vec() {
            self.tree.format(line, Attribute::Cell(cell_id.clone()))?;
            self.tree.format(line, Attribute::Row(row_id.clone()))?;
            self.tree.format(line, Attribute::Colspan(Some(colspan)))?;
            self.tree.format(line, Attribute::Rowspan(Some(rowspan)))?;
        }
        self.normalize()?;

        log::debug!(
            "[merge_cells] {} cells into {} ({}x{})",
            cells.len(),
            merged,
            rowspan,
            colspan
        );
        Ok(Some(merged))
    }

    /// Split every spanning cell in `cells` back into unit cells.
    ///
    /// A colspan of n adds n-1 cells after the cell in its own row. A rowspan
    /// of m adds n cells to each of the next m-1 rows, placed before the
    /// first cell that starts at or right of the spanning cell's right edge.
    /// Content stays where it was. Returns the new cells.
    pub fn unmerge_cells(
        &mut self,
        geometry: &Geometry<'_>,
        cells: &[NodeId],
    ) -> Result<Vec<NodeId>, EditError> {
        self.ensure_live()?;
        let rects: HashMap<NodeId, Rect> = geometry
            .snapshot(&self.tree.cells(self.table))
            .into_iter()
            .collect();

        let mut created = Vec::new();
        for &cell in cells {
            if self.tree.kind(cell) != Some(NodeKind::Cell) {
                continue;
            }
            let Some(row) = self.tree.parent(cell) else {
                continue;
            };
            let rowspan = self.tree.rowspan(cell).get();
            let colspan = self.tree.colspan(cell).get();

            if colspan > 1 {
                let after = self.tree.next(cell);
                let row_id = self.tree.row_id(row).cloned();
                self.tree.format(cell, Attribute::Colspan(Some(Span::ONE)))?;
                for _ in 1..colspan {
                    let new_cell = self.new_cell(row_id.clone(), Span::ONE, Span::ONE)?;
                    self.tree.insert_before(row, new_cell, after)?;
                    created.push(new_cell);
                }
            }

            if rowspan > 1 {
                let right_edge = rects.get(&cell).map(Rect::x1);
                let mut next_row = self.tree.next(row);
                for _ in 1..rowspan {
                    let Some(target) = next_row else {
                        log::warn!("[unmerge_cells] {} spans past the last row", cell);
                        break;
                    };
                    let before = right_edge.and_then(|x1| self.cell_after(target, x1, &rects));
                    let row_id = self.tree.row_id(target).cloned();
                    for _ in 0..colspan {
                        let new_cell = self.new_cell(row_id.clone(), Span::ONE, Span::ONE)?;
                        self.tree.insert_before(target, new_cell, before)?;
                        created.push(new_cell);
                    }
                    next_row = self.tree.next(target);
                }
                self.tree.format(cell, Attribute::Rowspan(Some(Span::ONE)))?;
            }
        }
        self.normalize()?;

        log::debug!("[unmerge_cells] {} cells created", created.len());
        Ok(created)
    }

    /// Remove the whole table, then tell the host to drop its table tooling
    /// and sync the document.
    pub fn destroy(&mut self, host: &mut dyn EditorHost) -> Result<(), EditError> {
        self.ensure_live()?;
        let target = self.scope();
        self.scheduler.cancel(self.table);
        self.tree.remove(target)?;
        host.hide_table_tools();
        host.update(ChangeSource::User);
        log::debug!("[destroy] {} removed", self.table);
        Ok(())
    }

    /// Request a width recompute on the next scheduler flush.
    pub fn update_width(&mut self) {
        self.scheduler.request(self.table);
    }

    /// Re-run normalization over the table.
    pub fn normalize(&mut self) -> Result<(), EditError> {
        let scope = self.scope();
        self.tree.optimize(scope)?;
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), EditError> {
        match self.tree.kind(self.table) {
            Some(NodeKind::Table) => Ok(()),
            _ => Err(EditError::TableGone(self.table)),
        }
    }

    /// The Wrapper when the table has one, otherwise the table itself.
    fn scope(&self) -> NodeId {
        self.tree
            .parent(self.table)
            .filter(|&p| self.tree.kind(p) == Some(NodeKind::Wrapper))
            .unwrap_or(self.table)
    }

    fn populated_body(&self) -> Option<NodeId> {
        self.tree
            .body(self.table)
            .filter(|&body| self.tree.first_child(body).is_some())
    }

    /// Build a Cell holding one empty line.
    fn new_cell(
        &mut self,
        row: Option<RowId>,
        rowspan: Span,
        colspan: Span,
    ) -> Result<NodeId, EditError> {
        let mut formats = Formats::new().rowspan(rowspan).colspan(colspan);
        formats.row = row;
        let cell = self.tree.create(NodeKind::Cell, &formats);
        formats.row = self.tree.row_id(cell).cloned();
        let line = self.tree.create(NodeKind::CellLine, &formats);
        self.tree.append_child(cell, line)?;
        Ok(cell)
    }

    fn next_surviving_row(&self, cell: NodeId, doomed: &HashSet<NodeId>) -> Option<NodeId> {
        let mut row = self.tree.parent(cell)?;
        loop {
            row = self.tree.next(row)?;
            if !doomed.contains(&row) {
                return Some(row);
            }
        }
    }

    /// First cell of `row` whose left edge is at or right of `x1`.
    fn cell_after(&self, row: NodeId, x1: f32, rects: &HashMap<NodeId, Rect>) -> Option<NodeId> {
        self.tree
            .children(row)
            .iter()
            .copied()
            .find(|cell| rects.get(cell).is_some_and(|r| r.x > x1 - self.tolerance))
    }
}

/// How many of `units` (rows or columns) lie inside `extent`.
fn covered_by(units: &[(NodeId, Rect)], axis: Axis, extent: (f32, f32), tolerance: f32) -> usize {
    units
        .iter()
        .filter(|(_, rect)| classify::inside(axis.extent(*rect), extent, tolerance))
        .count()
}
