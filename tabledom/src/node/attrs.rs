use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TreeError;

pub const DEFAULT_COLUMN_WIDTH: u32 = 100;

/// Identity shared by a Row and every Cell and CellLine that belongs to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity shared by every CellLine of one logical cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(String);

impl CellId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Row or column span of a cell. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Span(NonZeroU32);

impl Span {
    pub const ONE: Span = Span(NonZeroU32::MIN);

    pub fn new(n: u32) -> Option<Self> {
        NonZeroU32::new(n).map(Self)
    }

    /// Build a span, raising 0 to 1.
    pub fn clamped(n: u32) -> Self {
        Self::new(n).unwrap_or(Self::ONE)
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }

    pub fn saturating_add(self, n: u32) -> Self {
        Self(self.0.saturating_add(n))
    }

    pub fn saturating_sub(self, n: u32) -> Self {
        Self::clamped(self.get().saturating_sub(n))
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Span {
    type Error = TreeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| TreeError::InvalidAttribute {
            name: "span".into(),
            value: value.to_string(),
        })
    }
}

impl From<Span> for u32 {
    fn from(span: Span) -> Self {
        span.get()
    }
}

impl FromStr for Span {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TreeError::InvalidAttribute {
            name: "span".into(),
            value: s.to_string(),
        };
        let n: u32 = s.trim().parse().map_err(|_| invalid())?;
        Self::new(n).ok_or_else(invalid)
    }
}

/// Attribute bag used to create nodes and to read them back.
///
/// Only the fields meaningful for a node kind are written or read; the rest
/// stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Formats {
    pub row: Option<RowId>,
    pub cell: Option<CellId>,
    pub rowspan: Option<Span>,
    pub colspan: Option<Span>,
    pub background: Option<String>,
    pub header: Option<u8>,
    pub width: Option<u32>,
}

impl Formats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(mut self, row: RowId) -> Self {
        self.row = Some(row);
        self
    }

    pub fn cell(mut self, cell: CellId) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn rowspan(mut self, rowspan: Span) -> Self {
        self.rowspan = Some(rowspan);
        self
    }

    pub fn colspan(mut self, colspan: Span) -> Self {
        self.colspan = Some(colspan);
        self
    }

    pub fn background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn header(mut self, level: u8) -> Self {
        self.header = Some(level);
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }
}

/// A single attribute write. `None` clears the attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    Row(Option<RowId>),
    Cell(Option<CellId>),
    Rowspan(Option<Span>),
    Colspan(Option<Span>),
    Background(Option<String>),
    Header(Option<u8>),
    Width(Option<u32>),
    /// Anything the table model does not recognize; lands on line content.
    Other { name: String, value: Option<String> },
}

impl Attribute {
    /// Parse the string form used by the persisted document and by hosts.
    /// Empty values clear the attribute, as does a span or width of 0.
    pub fn parse(name: &str, value: Option<&str>) -> Result<Self, TreeError> {
        let value = value.filter(|v| !v.is_empty());
        let invalid = |v: &str| TreeError::InvalidAttribute {
            name: name.to_string(),
            value: v.to_string(),
        };
        let number = |v: &str| v.trim().parse::<u32>().map_err(|_| invalid(v));

        let attribute = match name {
            "row" => Attribute::Row(value.map(RowId::new)),
            "cell" => Attribute::Cell(value.map(CellId::new)),
            "rowspan" => Attribute::Rowspan(value.map(number).transpose()?.and_then(Span::new)),
            "colspan" => Attribute::Colspan(value.map(number).transpose()?.and_then(Span::new)),
            "cell-bg" => Attribute::Background(value.map(str::to_string)),
            "header" => Attribute::Header(
                value
                    .map(|v| v.trim().parse::<u8>().map_err(|_| invalid(v)))
                    .transpose()?
                    .filter(|level| *level > 0),
            ),
            "width" => Attribute::Width(value.map(number).transpose()?.filter(|w| *w > 0)),
            other => Attribute::Other {
                name: other.to_string(),
                value: value.map(str::to_string),
            },
        };
        Ok(attribute)
    }

    pub fn name(&self) -> &str {
        match self {
            Attribute::Row(_) => "row",
            Attribute::Cell(_) => "cell",
            Attribute::Rowspan(_) => "rowspan",
            Attribute::Colspan(_) => "colspan",
            Attribute::Background(_) => "cell-bg",
            Attribute::Header(_) => "header",
            Attribute::Width(_) => "width",
            Attribute::Other { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellAttrs {
    pub row: Option<RowId>,
    pub rowspan: Option<Span>,
    pub colspan: Option<Span>,
    pub background: Option<String>,
}

impl CellAttrs {
    pub fn rowspan(&self) -> Span {
        self.rowspan.unwrap_or_default()
    }

    pub fn colspan(&self) -> Span {
        self.colspan.unwrap_or_default()
    }
}

/// Attributes mirrored from the owning Cell, plus the line's own identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineAttrs {
    pub row: Option<RowId>,
    pub cell: Option<CellId>,
    pub rowspan: Option<Span>,
    pub colspan: Option<Span>,
    pub background: Option<String>,
    pub header: Option<u8>,
}

/// A block of text inside a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellLine {
    pub attrs: LineAttrs,
    pub text: String,
    /// Generic formatting the table model does not interpret.
    pub marks: BTreeMap<String, String>,
}
