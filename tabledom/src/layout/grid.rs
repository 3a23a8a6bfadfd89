//! Table layout in the manner of an HTML table.
//!
//! Column widths come from the ColumnGroup (missing columns fall back to the
//! default width), every row has the same height, and cells are placed in the
//! first free slot of their row after earlier rowspans have claimed theirs.
//! Rowspans running past the last row are clipped.

use super::{LayoutResult, Rect};
use crate::node::{NodeId, NodeKind, DEFAULT_COLUMN_WIDTH};
use crate::tree::Tree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    pub origin_x: f32,
    pub origin_y: f32,
    pub row_height: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            origin_x: 0.0,
            origin_y: 0.0,
            row_height: 30.0,
        }
    }
}

impl GridOptions {
    pub fn origin(mut self, x: f32, y: f32) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    pub fn row_height(mut self, height: f32) -> Self {
        self.row_height = height;
        self
    }
}

struct Placement {
    cell: NodeId,
    row: usize,
    col: usize,
    rowspan: usize,
    colspan: usize,
}

/// Lay out the table `node` refers to (Wrapper, Table or anything inside it).
pub fn layout(tree: &Tree, node: NodeId, options: GridOptions) -> LayoutResult {
    let mut result = LayoutResult::new();
    let Some(table) = tree.resolve_table(node) else {
        return result;
    };

    let rows = tree.rows(table);
    let mut widths: Vec<f32> = tree
        .columns(table)
        .into_iter()
        .map(|col| tree.formats(col).width.unwrap_or(DEFAULT_COLUMN_WIDTH) as f32)
        .collect();

    let mut occupied: Vec<Vec<bool>> = vec![Vec::new(); rows.len()];
    let mut placements = Vec::new();
    for (r, &row) in rows.iter().enumerate() {
        let mut col = 0;
        for &cell in tree.children(row) {
            if tree.kind(cell) != Some(NodeKind::Cell) {
                continue;
            }
            while is_occupied(&occupied[r], col) {
                col += 1;
            }
            let rowspan = (tree.rowspan(cell).get() as usize).min(rows.len() - r);
            let colspan = tree.colspan(cell).get() as usize;
            for slots in occupied.iter_mut().skip(r).take(rowspan) {
                for c in col..col + colspan {
                    occupy(slots, c);
                }
            }
            placements.push(Placement {
                cell,
                row: r,
                col,
                rowspan,
                colspan,
            });
            col += colspan;
        }
    }

    let grid_cols = occupied.iter().map(Vec::len).max().unwrap_or(0);
    while widths.len() < grid_cols {
        widths.push(DEFAULT_COLUMN_WIDTH as f32);
    }
    let mut col_x = Vec::with_capacity(widths.len() + 1);
    let mut x = options.origin_x;
    col_x.push(x);
    for w in &widths {
        x += w;
        col_x.push(x);
    }

    let row_h = options.row_height;
    let total_width = col_x[col_x.len() - 1] - options.origin_x;
    let total_height = rows.len() as f32 * row_h;
    let table_rect = Rect::new(options.origin_x, options.origin_y, total_width, total_height);

    if let Some(wrapper) = tree.parent(table).filter(|&p| tree.kind(p) == Some(NodeKind::Wrapper)) {
        result.insert(wrapper, table_rect);
    }
    result.insert(table, table_rect);
    if let Some(group) = tree.column_group(table) {
        result.insert(group, table_rect);
        for (i, &col) in tree.children(group).iter().enumerate() {
            let rect = Rect::new(col_x[i], options.origin_y, widths[i], total_height);
            result.insert(col, rect);
        }
    }
    if let Some(body) = tree.body(table) {
        result.insert(body, table_rect);
    }
    for (r, &row) in rows.iter().enumerate() {
        let y = options.origin_y + r as f32 * row_h;
        result.insert(row, Rect::new(options.origin_x, y, total_width, row_h));
    }

    for p in placements {
        let x = col_x[p.col];
        let x1 = col_x[p.col + p.colspan];
        let y = options.origin_y + p.row as f32 * row_h;
        let rect = Rect::new(x, y, x1 - x, p.rowspan as f32 * row_h);
        result.insert(p.cell, rect);
        for &line in tree.children(p.cell) {
            result.insert(line, rect);
        }
    }

    result
}

fn is_occupied(slots: &[bool], col: usize) -> bool {
    slots.get(col).copied().unwrap_or(false)
}

fn occupy(slots: &mut Vec<bool>, col: usize) {
    if slots.len() <= col {
        slots.resize(col + 1, false);
    }
    slots[col] = true;
}
