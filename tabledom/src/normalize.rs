//! Post-mutation normalization.
//!
//! Two passes over a subtree:
//!
//! 1. **Auto-wrap.** A node whose parent is not its required container gets
//!    wrapped in a fresh one. CellLine -> Cell carries row, spans and
//!    background; Cell -> Row carries the row identity. The new container is
//!    checked in turn, so a bare line ends up as Cell/Row/Body/Table/Wrapper.
//! 2. **Adjacency merge.** Adjacent siblings of the same container kind are
//!    folded together, outermost first. Rows and Cells only merge when their
//!    first and last children on both sides agree on the row (resp. cell)
//!    identity.
//!
//! Empty Rows and Cells are left in place.

use crate::error::TreeError;
use crate::node::{Formats, NodeId, NodeKind};
use crate::tree::Tree;

impl Tree {
    /// Normalize the subtree rooted at `scope`.
    pub fn optimize(&mut self, scope: NodeId) -> Result<(), TreeError> {
        for id in self.subtree(scope) {
            if self.contains(id) {
                self.wrap_orphan(id)?;
            }
        }
        self.merge_siblings(scope)
    }

    fn wrap_orphan(&mut self, id: NodeId) -> Result<(), TreeError> {
        let mut current = id;
        loop {
            let kind = self.node(current)?.kind();
            let Some(required) = kind.required_container() else {
                return Ok(());
            };
            let Some(parent) = self.parent(current) else {
                return Ok(());
            };
            if self.kind(parent) == Some(required) {
                return Ok(());
            }

            let formats = self.wrap_formats(current);
            let container = self.create(required, &formats);
            self.insert_before(parent, container, Some(current))?;
            self.append_child(container, current)?;
            log::trace!(
                "[optimize] wrapped {} {} in {} {}",
                kind,
                current,
                required,
                container
            );
            current = container;
        }
    }

    /// Attributes a freshly created container inherits from the node it wraps.
    fn wrap_formats(&self, id: NodeId) -> Formats {
        let formats = self.formats(id);
        match self.kind(id) {
            Some(NodeKind::CellLine) => Formats {
                row: formats.row,
                rowspan: formats.rowspan,
                colspan: formats.colspan,
                background: formats.background,
                ..Formats::default()
            },
            Some(NodeKind::Cell) => Formats {
                row: formats.row,
                ..Formats::default()
            },
            _ => Formats::default(),
        }
    }

    fn merge_siblings(&mut self, parent: NodeId) -> Result<(), TreeError> {
        let mut index = 0;
        loop {
            let children = self.children(parent);
            if index + 1 >= children.len() {
                break;
            }
            let (current, next) = (children[index], children[index + 1]);
            if self.check_merge(current, next) {
                log::trace!("[optimize] merging {} into {}", next, current);
                self.move_children_to(next, current, None)?;
                self.remove(next)?;
            } else {
                index += 1;
            }
        }

        for child in self.children(parent).to_vec() {
            self.merge_siblings(child)?;
        }
        Ok(())
    }

    /// Whether `next` should be folded into `current`.
    pub fn check_merge(&self, current: NodeId, next: NodeId) -> bool {
        let (Some(kind), Some(next_kind)) = (self.kind(current), self.kind(next)) else {
            return false;
        };
        if kind != next_kind
            || !kind.is_container()
            || kind == NodeKind::Document
            || self.children(current).is_empty()
        {
            return false;
        }
        match kind {
            NodeKind::Row => self.same_identity(current, next, |f| f.row),
            NodeKind::Cell => self.same_identity(current, next, |f| f.cell),
            _ => true,
        }
    }

    fn same_identity<T: PartialEq>(
        &self,
        current: NodeId,
        next: NodeId,
        key: impl Fn(Formats) -> Option<T>,
    ) -> bool {
        let ends = [
            self.first_child(current),
            self.last_child(current),
            self.first_child(next),
            self.last_child(next),
        ];
        let mut keys = Vec::with_capacity(ends.len());
        for end in ends {
            let Some(end) = end else {
                return false;
            };
            keys.push(key(self.formats(end)));
        }
        keys[0].is_some() && keys.iter().all(|k| *k == keys[0])
    }
}
