//! Table-shaped queries and construction on top of the raw tree.

use crate::error::TreeError;
use crate::node::{Formats, NodeData, NodeId, NodeKind};
use crate::tree::Tree;

impl Tree {
    /// Find the Table a node belongs to. Accepts the Table itself, its
    /// Wrapper, or anything inside it.
    pub fn resolve_table(&self, id: NodeId) -> Option<NodeId> {
        match self.kind(id)? {
            NodeKind::Wrapper => self
                .children(id)
                .iter()
                .copied()
                .find(|&c| self.kind(c) == Some(NodeKind::Table)),
            _ => self.closest(id, NodeKind::Table),
        }
    }

    pub fn column_group(&self, table: NodeId) -> Option<NodeId> {
        self.child_of_kind(table, NodeKind::ColumnGroup)
    }

    pub fn body(&self, table: NodeId) -> Option<NodeId> {
        self.child_of_kind(table, NodeKind::Body)
    }

    fn child_of_kind(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.kind(c) == Some(kind))
    }

    pub fn columns(&self, table: NodeId) -> Vec<NodeId> {
        self.column_group(table)
            .map(|group| self.children(group).to_vec())
            .unwrap_or_default()
    }

    pub fn rows(&self, table: NodeId) -> Vec<NodeId> {
        self.body(table)
            .map(|body| self.children(body).to_vec())
            .unwrap_or_default()
    }

    /// Every Cell of the table in document order.
    pub fn cells(&self, table: NodeId) -> Vec<NodeId> {
        self.descendants(table, NodeKind::Cell)
    }

    pub fn table_width(&self, table: NodeId) -> Option<f32> {
        match self.data(table)? {
            NodeData::Table { width } => *width,
            _ => None,
        }
    }

    /// Recompute the cached table width from its columns.
    pub fn update_table_width(&mut self, table: NodeId) -> Result<f32, TreeError> {
        let total: u32 = self
            .columns(table)
            .into_iter()
            .filter_map(|col| self.formats(col).width)
            .sum();
        let total = total as f32;
        if let NodeData::Table { width } = &mut self.node_mut(table)?.data {
            *width = Some(total);
        }
        Ok(total)
    }

    /// Build a `rows` x `cols` table with empty cells and insert it into
    /// `parent` before `reference`. Returns the Table node.
    pub fn insert_table(
        &mut self,
        parent: NodeId,
        reference: Option<NodeId>,
        rows: usize,
        cols: usize,
        column_width: u32,
    ) -> Result<NodeId, TreeError> {
        let rows = rows.max(1);
        let cols = cols.max(1);

        let wrapper = self.create(NodeKind::Wrapper, &Formats::new());
        let table = self.create(NodeKind::Table, &Formats::new());
        let group = self.create(NodeKind::ColumnGroup, &Formats::new());
        let body = self.create(NodeKind::Body, &Formats::new());
        self.append_child(wrapper, table)?;
        self.append_child(table, group)?;
        self.append_child(table, body)?;

        for _ in 0..cols {
            let col = self.create(NodeKind::Column, &Formats::new().width(column_width));
            self.append_child(group, col)?;
        }

        for _ in 0..rows {
            let row_id = self.ids().row_id();
            let formats = Formats::new().row(row_id);
            let row = self.create(NodeKind::Row, &formats);
            self.append_child(body, row)?;
            for _ in 0..cols {
                let cell = self.create(NodeKind::Cell, &formats);
                let line = self.create(NodeKind::CellLine, &formats);
                self.append_child(cell, line)?;
                self.append_child(row, cell)?;
            }
        }

        self.insert_before(parent, wrapper, reference)?;
        self.update_table_width(table)?;
        log::debug!("[insert_table] {} rows={} cols={}", table, rows, cols);
        Ok(table)
    }
}
