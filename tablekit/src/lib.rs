//! Table editing for a rich-text document.
//!
//! [`TableEditor`] performs structural edits on one table, classifying cells
//! by their rendered rectangles. [`SelectionController`] turns pointer drags
//! into rectangular cell selections. [`TableModule`] ties both to a host
//! editor and exposes the menu-level commands.

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod host;
pub mod logging;
pub mod module;
pub mod schedule;
pub mod selection;

pub use config::TableConfig;
pub use editor::{ColumnDirection, DeleteOutcome, RowDirection, TableEditor};
pub use error::{ConfigError, DocumentError, EditError, LoggingError};
pub use host::{ChangeSource, EditorHost};
pub use module::TableModule;
pub use schedule::LayoutScheduler;
pub use selection::{DragState, HelpLines, LinePosition, SelectionController};

pub mod prelude {
    pub use crate::config::TableConfig;
    pub use crate::editor::{ColumnDirection, DeleteOutcome, RowDirection, TableEditor};
    pub use crate::error::EditError;
    pub use crate::host::{ChangeSource, EditorHost};
    pub use crate::module::TableModule;
    pub use crate::selection::SelectionController;

    pub use tabledom::{Geometry, GeometryOracle, NodeId, NodeKind, PointerEvent, Rect, Tree};
}
