//! Document-tree model for tables embedded in a rich-text document.
//!
//! A table is a Wrapper holding a Table, which owns a ColumnGroup of Columns
//! and a Body of Rows; Rows own Cells and Cells own CellLines. There is no
//! stored grid: spans are a rendering effect, so anything that needs to know
//! which cells sit in which column asks a [`GeometryOracle`] instead.

pub mod event;
pub mod hit;
pub mod identity;
pub mod layout;
pub mod node;

mod error;
mod normalize;
mod table;
mod tree;

pub use error::TreeError;
pub use event::{MouseButton, PointerEvent};
pub use hit::{hit_test, hit_test_kind};
pub use identity::{IdentityAllocator, RandomIds, SequentialIds};
pub use layout::{layout, Geometry, GeometryOracle, GridOptions, LayoutResult, Rect};
pub use node::{
    Attribute, CellAttrs, CellId, CellLine, Formats, LineAttrs, Node, NodeData, NodeId, NodeKind,
    RowId, Span, DEFAULT_COLUMN_WIDTH,
};
pub use tree::Tree;
