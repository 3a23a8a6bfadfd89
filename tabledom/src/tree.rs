use std::collections::BTreeMap;
use std::fmt;

use crate::error::TreeError;
use crate::identity::{IdentityAllocator, RandomIds};
use crate::node::{
    Attribute, CellAttrs, CellLine, Formats, LineAttrs, Node, NodeData, NodeId, NodeKind, RowId,
    Span, DEFAULT_COLUMN_WIDTH,
};

/// Arena holding a document and the tables inside it.
///
/// Nodes are addressed by [`NodeId`]. Removing a node kills its whole subtree;
/// stale handles read back as absent and make mutations fail with
/// [`TreeError::UnknownNode`].
pub struct Tree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    ids: Box<dyn IdentityAllocator>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("root", &self.root)
            .field("live", &self.nodes.iter().filter(|n| n.is_some()).count())
            .field("ids", &self.ids)
            .finish()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self::with_ids(RandomIds)
    }

    pub fn with_ids(ids: impl IdentityAllocator + 'static) -> Self {
        Self {
            nodes: vec![Some(Node::new(NodeData::Document))],
            root: NodeId(0),
            ids: Box::new(ids),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn ids(&mut self) -> &mut dyn IdentityAllocator {
        self.ids.as_mut()
    }

    // Navigation

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.get(id).ok_or(TreeError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.get(id).map(Node::data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Position of a node among its siblings.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&c| c == id)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// All descendants of `id` of the given kind, in document order.
    pub fn descendants(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.subtree(id)
            .into_iter()
            .skip(1)
            .filter(|&n| self.kind(n) == Some(kind))
            .collect()
    }

    /// `id` followed by all of its descendants, pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// Nearest node of `kind` starting at `id` and walking up.
    pub fn closest(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if self.kind(node)? == kind {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    // Construction

    /// Create a detached node of `kind`, writing the attributes relevant to it.
    ///
    /// Missing identity keys are allocated, spans default to 1 and the
    /// background is only written when non-empty.
    pub fn create(&mut self, kind: NodeKind, formats: &Formats) -> NodeId {
        let background = formats.background.clone().filter(|bg| !bg.is_empty());
        let data = match kind {
            NodeKind::Document => NodeData::Document,
            NodeKind::Wrapper => NodeData::Wrapper { scroll_left: 0.0 },
            NodeKind::Table => NodeData::Table { width: None },
            NodeKind::ColumnGroup => NodeData::ColumnGroup,
            NodeKind::Column => NodeData::Column {
                width: formats
                    .width
                    .filter(|w| *w > 0)
                    .unwrap_or(DEFAULT_COLUMN_WIDTH),
            },
            NodeKind::Body => NodeData::Body,
            NodeKind::Row => NodeData::Row {
                row: Some(self.row_or_fresh(formats)),
            },
            NodeKind::Cell => NodeData::Cell(CellAttrs {
                row: Some(self.row_or_fresh(formats)),
                rowspan: Some(formats.rowspan.unwrap_or_default()),
                colspan: Some(formats.colspan.unwrap_or_default()),
                background,
            }),
            NodeKind::CellLine => {
                let row = self.row_or_fresh(formats);
                let cell = formats.cell.clone().unwrap_or_else(|| self.ids.cell_id());
                NodeData::CellLine(CellLine {
                    attrs: LineAttrs {
                        row: Some(row),
                        cell: Some(cell),
                        rowspan: Some(formats.rowspan.unwrap_or_default()),
                        colspan: Some(formats.colspan.unwrap_or_default()),
                        background,
                        header: formats.header,
                    },
                    text: String::new(),
                    marks: BTreeMap::new(),
                })
            }
        };
        self.alloc(data)
    }

    /// Create a detached CellLine holding `text`.
    pub fn create_line(&mut self, text: impl Into<String>, formats: &Formats) -> NodeId {
        let id = self.create(NodeKind::CellLine, formats);
        if let Some(Node {
            data: NodeData::CellLine(line),
            ..
        }) = self.nodes[id.0].as_mut()
        {
            line.text = text.into();
        }
        id
    }

    fn row_or_fresh(&mut self, formats: &Formats) -> RowId {
        formats.row.clone().unwrap_or_else(|| self.ids.row_id())
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(data)));
        id
    }

    // Mutation

    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is `None`. The child is detached from its old parent first.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.node(parent)?;
        self.node(child)?;
        if child == parent || self.is_ancestor(child, parent) {
            return Err(TreeError::Cycle { parent, child });
        }
        let reference = match reference {
            Some(r) if r == child => self.next(child),
            other => other,
        };
        if let Some(r) = reference {
            if self.parent(r) != Some(parent) {
                return Err(TreeError::NotAChild { parent, child: r });
            }
        }

        self.detach(child)?;
        let index = match reference {
            Some(r) => self
                .children(parent)
                .iter()
                .position(|&c| c == r)
                .ok_or(TreeError::NotAChild { parent, child: r })?,
            None => self.children(parent).len(),
        };
        self.node_mut(parent)?.children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.insert_before(parent, child, None)
    }

    /// Unlink a node from its parent, keeping it alive.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|&c| c != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Detach a node and destroy it together with its subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootRemoval);
        }
        self.detach(id)?;
        for node in self.subtree(id) {
            self.nodes[node.0] = None;
        }
        Ok(())
    }

    /// Move every child of `from` into `to`, before `reference`.
    pub fn move_children_to(
        &mut self,
        from: NodeId,
        to: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), TreeError> {
        let children = self.node(from)?.children.clone();
        for child in children {
            self.insert_before(to, child, reference)?;
        }
        Ok(())
    }

    // Content

    pub fn text(&self, line: NodeId) -> Option<&str> {
        match self.data(line)? {
            NodeData::CellLine(l) => Some(&l.text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, line: NodeId, text: impl Into<String>) -> Result<(), TreeError> {
        if let NodeData::CellLine(l) = &mut self.node_mut(line)?.data {
            l.text = text.into();
        }
        Ok(())
    }

    /// Text of every line of a cell, joined by newlines.
    pub fn cell_text(&self, cell: NodeId) -> String {
        self.children(cell)
            .iter()
            .filter_map(|&line| self.text(line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Generic marks of a line.
    pub fn marks(&self, line: NodeId) -> Option<&BTreeMap<String, String>> {
        match self.data(line)? {
            NodeData::CellLine(l) => Some(&l.marks),
            _ => None,
        }
    }

    pub fn scroll_left(&self, wrapper: NodeId) -> f32 {
        match self.data(wrapper) {
            Some(NodeData::Wrapper { scroll_left }) => *scroll_left,
            _ => 0.0,
        }
    }

    pub fn set_scroll_left(&mut self, wrapper: NodeId, value: f32) -> Result<(), TreeError> {
        if let NodeData::Wrapper { scroll_left } = &mut self.node_mut(wrapper)?.data {
            *scroll_left = value;
        }
        Ok(())
    }

    // Attributes

    /// Read back the recognized attributes of a node.
    pub fn formats(&self, id: NodeId) -> Formats {
        let Some(data) = self.data(id) else {
            return Formats::default();
        };
        match data {
            NodeData::Column { width } => Formats {
                width: Some(*width),
                ..Formats::default()
            },
            NodeData::Row { row } => Formats {
                row: row.clone(),
                ..Formats::default()
            },
            NodeData::Cell(cell) => Formats {
                row: cell.row.clone(),
                rowspan: Some(cell.rowspan()),
                colspan: Some(cell.colspan()),
                background: cell.background.clone(),
                ..Formats::default()
            },
            NodeData::CellLine(line) => {
                let attrs = &line.attrs;
                Formats {
                    row: attrs.row.clone(),
                    cell: attrs.cell.clone(),
                    rowspan: Some(attrs.rowspan.unwrap_or_default()),
                    colspan: Some(attrs.colspan.unwrap_or_default()),
                    background: attrs.background.clone(),
                    header: attrs.header,
                    width: None,
                }
            }
            _ => Formats::default(),
        }
    }

    /// Row identity of a Row, Cell or CellLine.
    pub fn row_id(&self, id: NodeId) -> Option<&RowId> {
        match self.data(id)? {
            NodeData::Row { row } => row.as_ref(),
            NodeData::Cell(cell) => cell.row.as_ref(),
            NodeData::CellLine(line) => line.attrs.row.as_ref(),
            _ => None,
        }
    }

    pub fn rowspan(&self, cell: NodeId) -> Span {
        match self.data(cell) {
            Some(NodeData::Cell(c)) => c.rowspan(),
            Some(NodeData::CellLine(l)) => l.attrs.rowspan.unwrap_or_default(),
            _ => Span::ONE,
        }
    }

    pub fn colspan(&self, cell: NodeId) -> Span {
        match self.data(cell) {
            Some(NodeData::Cell(c)) => c.colspan(),
            Some(NodeData::CellLine(l)) => l.attrs.colspan.unwrap_or_default(),
            _ => Span::ONE,
        }
    }

    /// Parse `name`/`value` and apply it with [`Tree::format`].
    pub fn format_str(
        &mut self,
        id: NodeId,
        name: &str,
        value: Option<&str>,
    ) -> Result<(), TreeError> {
        let attribute = Attribute::parse(name, value)?;
        self.format(id, attribute)
    }

    /// Set or clear one attribute.
    ///
    /// On a Cell, row/span/background writes are mirrored onto every child
    /// line; anything else is handed to the first line.
    pub fn format(&mut self, id: NodeId, attribute: Attribute) -> Result<(), TreeError> {
        match self.node(id)?.kind() {
            NodeKind::CellLine => self.format_line(id, attribute),
            NodeKind::Cell => self.format_cell(id, attribute),
            NodeKind::Row => {
                if let (NodeData::Row { row }, Attribute::Row(value)) =
                    (&mut self.node_mut(id)?.data, &attribute)
                {
                    *row = value.clone();
                } else {
                    log::trace!("[format] {} ignored on row {}", attribute.name(), id);
                }
                Ok(())
            }
            NodeKind::Column => {
                if let (NodeData::Column { width }, Attribute::Width(value)) =
                    (&mut self.node_mut(id)?.data, &attribute)
                {
                    *width = value.unwrap_or(DEFAULT_COLUMN_WIDTH);
                } else {
                    log::trace!("[format] {} ignored on column {}", attribute.name(), id);
                }
                Ok(())
            }
            kind => {
                log::trace!("[format] {} ignored on {} {}", attribute.name(), kind, id);
                Ok(())
            }
        }
    }

    fn format_cell(&mut self, id: NodeId, attribute: Attribute) -> Result<(), TreeError> {
        let NodeData::Cell(cell) = &mut self.node_mut(id)?.data else {
            return Ok(());
        };
        match &attribute {
            Attribute::Row(value) => cell.row = value.clone(),
            Attribute::Rowspan(value) => cell.rowspan = *value,
            Attribute::Colspan(value) => cell.colspan = *value,
            Attribute::Background(value) => {
                cell.background = value.clone().filter(|bg| !bg.is_empty())
            }
            _ => {
                return match self.first_child(id) {
                    Some(line) => self.format_line(line, attribute),
                    None => Ok(()),
                };
            }
        }
        for line in self.children(id).to_vec() {
            self.format_line(line, attribute.clone())?;
        }
        Ok(())
    }

    fn format_line(&mut self, id: NodeId, attribute: Attribute) -> Result<(), TreeError> {
        let NodeData::CellLine(line) = &mut self.node_mut(id)?.data else {
            return Ok(());
        };
        let attrs = &mut line.attrs;
        match attribute {
            Attribute::Row(value) => attrs.row = value,
            Attribute::Cell(value) => attrs.cell = value,
            Attribute::Rowspan(value) => attrs.rowspan = value,
            Attribute::Colspan(value) => attrs.colspan = value,
            Attribute::Background(value) => {
                attrs.background = value.filter(|bg| !bg.is_empty())
            }
            Attribute::Header(value) => attrs.header = value,
            Attribute::Width(value) => set_mark(
                &mut line.marks,
                "width".to_string(),
                value.map(|w| w.to_string()),
            ),
            Attribute::Other { name, value } => set_mark(&mut line.marks, name, value),
        }
        Ok(())
    }
}

fn set_mark(marks: &mut BTreeMap<String, String>, name: String, value: Option<String>) {
    match value {
        Some(value) => {
            marks.insert(name, value);
        }
        None => {
            marks.remove(&name);
        }
    }
}
