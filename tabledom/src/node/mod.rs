mod attrs;

use std::fmt;

pub use attrs::{
    Attribute, CellAttrs, CellId, CellLine, Formats, LineAttrs, RowId, Span, DEFAULT_COLUMN_WIDTH,
};

/// Handle to a node in a [`Tree`](crate::Tree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Host document root. Not part of the table model, but tables live under it.
    Document,
    Wrapper,
    Table,
    ColumnGroup,
    Column,
    Body,
    Row,
    Cell,
    CellLine,
}

impl NodeKind {
    /// The container kind this node must sit directly under.
    pub const fn required_container(self) -> Option<NodeKind> {
        match self {
            NodeKind::Document | NodeKind::Wrapper => None,
            NodeKind::Table => Some(NodeKind::Wrapper),
            NodeKind::ColumnGroup | NodeKind::Body => Some(NodeKind::Table),
            NodeKind::Column => Some(NodeKind::ColumnGroup),
            NodeKind::Row => Some(NodeKind::Body),
            NodeKind::Cell => Some(NodeKind::Row),
            NodeKind::CellLine => Some(NodeKind::Cell),
        }
    }

    pub const fn is_container(self) -> bool {
        !matches!(self, NodeKind::Column | NodeKind::CellLine)
    }

    /// Name used by the persisted form and in log output.
    pub const fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Wrapper => "table-view",
            NodeKind::Table => "table-container",
            NodeKind::ColumnGroup => "table-col-group",
            NodeKind::Column => "table-col",
            NodeKind::Body => "table-body",
            NodeKind::Row => "table-row",
            NodeKind::Cell => "table",
            NodeKind::CellLine => "table-cell-line",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    Document,
    Wrapper {
        /// Horizontal scroll of the table view.
        scroll_left: f32,
    },
    Table {
        /// Cached pixel width, the sum of all column widths.
        width: Option<f32>,
    },
    ColumnGroup,
    Column {
        width: u32,
    },
    Body,
    Row {
        row: Option<RowId>,
    },
    Cell(CellAttrs),
    CellLine(CellLine),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Document => NodeKind::Document,
            NodeData::Wrapper { .. } => NodeKind::Wrapper,
            NodeData::Table { .. } => NodeKind::Table,
            NodeData::ColumnGroup => NodeKind::ColumnGroup,
            NodeData::Column { .. } => NodeKind::Column,
            NodeData::Body => NodeKind::Body,
            NodeData::Row { .. } => NodeKind::Row,
            NodeData::Cell(_) => NodeKind::Cell,
            NodeData::CellLine(_) => NodeKind::CellLine,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}
