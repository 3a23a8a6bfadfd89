//! Edge classification of cell rectangles against a reference band.
//!
//! Comparisons are made along one axis at a time. "Coincides" means the two
//! edges are closer than the tolerance; "straddles" means the edge lies
//! further than the tolerance inside the cell on both sides, so a cell that
//! is exactly aligned with a boundary is adjacent, never straddling.

use tabledom::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Start and end of `rect` along this axis.
    pub(crate) fn extent(self, rect: Rect) -> (f32, f32) {
        match self {
            Axis::Horizontal => (rect.x, rect.x1()),
            Axis::Vertical => (rect.y, rect.y1()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    /// The cell's edge touches the insertion edge; a sibling cell is added.
    Adjacent,
    /// The insertion edge falls inside the cell; its span grows.
    Straddling,
    Unaffected,
}

/// Classify a cell against an insertion edge. `at_end` selects which edge of
/// the cell is compared: its end when inserting after, its start otherwise.
pub(crate) fn insertion(cell: (f32, f32), edge: f32, at_end: bool, tolerance: f32) -> Insertion {
    let (start, end) = cell;
    let own_edge = if at_end { end } else { start };
    if (own_edge - edge).abs() < tolerance {
        Insertion::Adjacent
    } else if edge - start > tolerance && edge - end < -tolerance {
        Insertion::Straddling
    } else {
        Insertion::Unaffected
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Deletion {
    /// Entirely inside the band.
    Removed,
    /// Covers the whole band and more; its span shrinks by the band size.
    Spanning,
    /// Starts inside the band and runs past its end; it loses the part of
    /// its span inside the band.
    Tail,
    /// Starts before the band and ends inside it; it loses the part of its
    /// span inside the band.
    Head,
    Unaffected,
}

pub(crate) fn deletion(cell: (f32, f32), band: (f32, f32), tolerance: f32) -> Deletion {
    let (start, end) = cell;
    let (band_start, band_end) = band;
    if start > band_start - tolerance && end < band_end + tolerance {
        Deletion::Removed
    } else if start < band_start + tolerance && end > band_end - tolerance {
        Deletion::Spanning
    } else if start > band_start && start < band_end - tolerance && end > band_end {
        Deletion::Tail
    } else if start < band_start - tolerance
        && end > band_start + tolerance
        && end < band_end + tolerance
    {
        Deletion::Head
    } else {
        Deletion::Unaffected
    }
}

/// Whether `cell` and `band` start at the same edge.
pub(crate) fn starts_with(cell: (f32, f32), band: (f32, f32), tolerance: f32) -> bool {
    (cell.0 - band.0).abs() < tolerance
}

/// Whether `inner` lies within `outer`, both edges within tolerance.
pub(crate) fn inside(inner: (f32, f32), outer: (f32, f32), tolerance: f32) -> bool {
    inner.0 > outer.0 - tolerance && inner.1 < outer.1 + tolerance
}
