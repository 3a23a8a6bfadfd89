//! Row and cell identity generation.

use std::fmt;

use uuid::Uuid;

use crate::node::{CellId, RowId};

/// Source of fresh row and cell identifiers.
pub trait IdentityAllocator: fmt::Debug {
    fn row_id(&mut self) -> RowId;
    fn cell_id(&mut self) -> CellId;
}

/// Random identifiers, `row-xxxxxxxx` / `cell-xxxxxxxx`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl RandomIds {
    fn token() -> String {
        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(8);
        token
    }
}

impl IdentityAllocator for RandomIds {
    fn row_id(&mut self) -> RowId {
        RowId::new(format!("row-{}", Self::token()))
    }

    fn cell_id(&mut self) -> CellId {
        CellId::new(format!("cell-{}", Self::token()))
    }
}

/// Monotonic identifiers, `row-1`, `row-2`, ... Deterministic, for tests and replay.
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    rows: u64,
    cells: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdentityAllocator for SequentialIds {
    fn row_id(&mut self) -> RowId {
        self.rows += 1;
        RowId::new(format!("row-{}", self.rows))
    }

    fn cell_id(&mut self) -> CellId {
        self.cells += 1;
        CellId::new(format!("cell-{}", self.cells))
    }
}
