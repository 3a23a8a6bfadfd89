use tabledom::{NodeId, TreeError};
use thiserror::Error;

/// Errors raised by structural edits and table commands.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The table was destroyed or never existed.
    #[error("Table {0} is not in the document")]
    TableGone(NodeId),

    /// A selection command ran without selected cells.
    #[error("No cells are selected")]
    NoSelection,
}

/// Errors reading or writing the persisted block form.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid table document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid table config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Failed to open log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Logger already installed: {0}")]
    Init(#[from] log::SetLoggerError),
}
