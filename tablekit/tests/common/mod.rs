#![allow(dead_code)]

use tabledom::{
    hit_test, hit_test_kind, layout, GridOptions, LayoutResult, MouseButton, NodeId, NodeKind,
    PointerEvent, Rect, SequentialIds, Tree,
};
use tablekit::logging::init_test_logger;
use tablekit::{ChangeSource, EditorHost};

pub const COL_WIDTH: f32 = 100.0;
pub const ROW_HEIGHT: f32 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCall {
    HideTableTools,
    Update(ChangeSource),
    Blur,
}

/// Host that records every callback it receives.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub calls: Vec<HostCall>,
}

impl EditorHost for RecordingHost {
    fn hide_table_tools(&mut self) {
        self.calls.push(HostCall::HideTableTools);
    }

    fn update(&mut self, source: ChangeSource) {
        self.calls.push(HostCall::Update(source));
    }

    fn blur(&mut self) {
        self.calls.push(HostCall::Blur);
    }
}

/// A table in a fresh document, with its current grid layout.
pub struct Fixture {
    pub tree: Tree,
    pub table: NodeId,
    pub layout: LayoutResult,
}

impl Fixture {
    pub fn new(rows: usize, cols: usize) -> Self {
        init_test_logger();
        let mut tree = Tree::with_ids(SequentialIds::new());
        let root = tree.root();
        let table = tree
            .insert_table(root, None, rows, cols, COL_WIDTH as u32)
            .unwrap();
        let mut fixture = Self {
            tree,
            table,
            layout: LayoutResult::new(),
        };
        fixture.relayout();
        fixture
    }

    pub fn relayout(&mut self) {
        self.layout = layout(&self.tree, self.table, GridOptions::default());
    }

    /// Centre of grid slot (`row`, `col`).
    pub fn point(row: usize, col: usize) -> (f32, f32) {
        (
            col as f32 * COL_WIDTH + COL_WIDTH / 2.0,
            row as f32 * ROW_HEIGHT + ROW_HEIGHT / 2.0,
        )
    }

    /// The cell covering grid slot (`row`, `col`).
    pub fn cell_at(&self, row: usize, col: usize) -> NodeId {
        let (x, y) = Self::point(row, col);
        hit_test_kind(&self.tree, &self.layout, self.tree.root(), NodeKind::Cell, x, y)
            .unwrap_or_else(|| panic!("no cell at ({row}, {col})"))
    }

    /// Deepest node at grid slot (`row`, `col`), as a pointer would hit it.
    pub fn hit(&self, row: usize, col: usize) -> Option<NodeId> {
        let (x, y) = Self::point(row, col);
        hit_test(&self.tree, &self.layout, self.tree.root(), x, y)
    }

    pub fn rect(&self, node: NodeId) -> Rect {
        self.layout[&node]
    }

    pub fn press(&self, row: usize, col: usize) -> PointerEvent {
        let (x, y) = Self::point(row, col);
        PointerEvent::Press {
            target: self.hit(row, col),
            x,
            y,
            button: MouseButton::Left,
        }
    }

    pub fn drag_to(&self, row: usize, col: usize) -> PointerEvent {
        let (x, y) = Self::point(row, col);
        PointerEvent::Move {
            target: self.hit(row, col),
            x,
            y,
            button: MouseButton::Left,
        }
    }

    pub fn release(&self) -> PointerEvent {
        PointerEvent::Release {
            target: None,
            x: 0.0,
            y: 0.0,
            button: MouseButton::Left,
        }
    }

    /// (rowspan, colspan) of each cell, row by row.
    pub fn spans(&self) -> Vec<Vec<(u32, u32)>> {
        self.tree
            .rows(self.table)
            .into_iter()
            .map(|row| {
                self.tree
                    .children(row)
                    .iter()
                    .map(|&cell| (self.tree.rowspan(cell).get(), self.tree.colspan(cell).get()))
                    .collect()
            })
            .collect()
    }

    pub fn set_text(&mut self, cell: NodeId, text: &str) {
        let line = self.tree.first_child(cell).unwrap();
        self.tree.set_text(line, text).unwrap();
    }

    /// Every cell and line carries its row's identity.
    pub fn assert_identity_stable(&self) {
        for row in self.tree.rows(self.table) {
            let row_id = self.tree.row_id(row).cloned();
            assert!(row_id.is_some(), "row {row} has no identity");
            for &cell in self.tree.children(row) {
                assert_eq!(self.tree.row_id(cell).cloned(), row_id, "cell {cell}");
                for &line in self.tree.children(cell) {
                    assert_eq!(self.tree.row_id(line).cloned(), row_id, "line {line}");
                }
            }
        }
    }
}
