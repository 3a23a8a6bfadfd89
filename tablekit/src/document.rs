//! Persisted form of a table: a flat list of attributed blocks.
//!
//! Columns come first, one `table-col` block each, followed by one
//! `table-cell-line` block per line in document order. Structure is not
//! stored; it is rebuilt on load by normalization, which wraps each line in
//! its cell, row, body, table and view, and merges neighbours that share a
//! row or cell identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tabledom::{
    Attribute, CellId, Formats, NodeData, NodeId, NodeKind, RowId, Span, Tree,
    DEFAULT_COLUMN_WIDTH,
};

use crate::error::DocumentError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "block", rename_all = "kebab-case")]
pub enum Block {
    TableCol {
        #[serde(default = "default_width")]
        width: u32,
    },
    TableCellLine {
        #[serde(default)]
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        row: Option<RowId>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cell: Option<CellId>,
        #[serde(default)]
        rowspan: Span,
        #[serde(default)]
        colspan: Span,
        #[serde(rename = "cell-bg", default, skip_serializing_if = "Option::is_none")]
        background: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        header: Option<u8>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        marks: BTreeMap<String, String>,
    },
}

fn default_width() -> u32 {
    DEFAULT_COLUMN_WIDTH
}

/// Flatten the table `node` belongs to into blocks.
pub fn serialize_table(tree: &Tree, node: NodeId) -> Vec<Block> {
    let Some(table) = tree.resolve_table(node) else {
        return Vec::new();
    };
    let mut blocks: Vec<Block> = tree
        .columns(table)
        .into_iter()
        .map(|column| Block::TableCol {
            width: tree.formats(column).width.unwrap_or(DEFAULT_COLUMN_WIDTH),
        })
        .collect();

    for line in tree.descendants(table, NodeKind::CellLine) {
        let Some(NodeData::CellLine(data)) = tree.data(line) else {
            continue;
        };
        let attrs = &data.attrs;
        blocks.push(Block::TableCellLine {
            text: data.text.clone(),
            row: attrs.row.clone(),
            cell: attrs.cell.clone(),
            rowspan: attrs.rowspan.unwrap_or_default(),
            colspan: attrs.colspan.unwrap_or_default(),
            background: attrs.background.clone(),
            header: attrs.header,
            marks: data.marks.clone(),
        });
    }
    blocks
}

/// Rebuild a table from blocks and insert it into `parent` before
/// `reference`. Returns the new Table, or `None` if `blocks` is empty.
pub fn deserialize_table(
    tree: &mut Tree,
    parent: NodeId,
    reference: Option<NodeId>,
    blocks: &[Block],
) -> Result<Option<NodeId>, DocumentError> {
    if blocks.is_empty() {
        return Ok(None);
    }

    // Built detached, so normalization cannot merge with neighbours in `parent`.
    let scratch = tree.create(NodeKind::Document, &Formats::new());
    for block in blocks {
        let node = match block {
            Block::TableCol { width } => {
                tree.create(NodeKind::Column, &Formats::new().width(*width))
            }
            Block::TableCellLine {
                text,
                row,
                cell,
                rowspan,
                colspan,
                background,
                header,
                marks,
            } => {
                let formats = Formats {
                    row: row.clone(),
                    cell: cell.clone(),
                    rowspan: Some(*rowspan),
                    colspan: Some(*colspan),
                    background: background.clone(),
                    header: *header,
                    width: None,
                };
                let line = tree.create_line(text.clone(), &formats);
                for (name, value) in marks {
                    tree.format(
                        line,
                        Attribute::Other {
                            name: name.clone(),
                            value: Some(value.clone()),
                        },
                    )?;
                }
                line
            }
        };
        tree.append_child(scratch, node)?;
    }
    tree.optimize(scratch)?;

    let mut table = None;
    for wrapper in tree.children(scratch).to_vec() {
        if table.is_none() {
            table = tree.resolve_table(wrapper);
        }
        tree.insert_before(parent, wrapper, reference)?;
    }
    tree.remove(scratch)?;

    if let Some(table) = table {
        tree.update_table_width(table)?;
        log::debug!("[deserialize_table] {} from {} blocks", table, blocks.len());
    }
    Ok(table)
}

pub fn to_json(blocks: &[Block]) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(blocks)?)
}

pub fn from_json(json: &str) -> Result<Vec<Block>, DocumentError> {
    Ok(serde_json::from_str(json)?)
}
