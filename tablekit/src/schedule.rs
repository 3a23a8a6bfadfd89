//! Deferred table width recompute.
//!
//! A width depends on the columns as they stand after an edit, so edits only
//! request a recompute. Requests for the same table collapse: however many
//! arrive before [`LayoutScheduler::flush`], the width is computed once, from
//! the columns present at flush time.

use tabledom::{NodeId, Tree};

#[derive(Debug, Default)]
pub struct LayoutScheduler {
    pending: Vec<NodeId>,
}

impl LayoutScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a width recompute for `table` on the next flush.
    pub fn request(&mut self, table: NodeId) {
        if self.pending.contains(&table) {
            log::trace!("[schedule] {} already pending", table);
            return;
        }
        self.pending.push(table);
    }

    pub fn is_pending(&self, table: NodeId) -> bool {
        self.pending.contains(&table)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn cancel(&mut self, table: NodeId) {
        self.pending.retain(|&t| t != table);
    }

    /// Run every pending recompute. Returns the new width per table; tables
    /// removed since the request are dropped.
    pub fn flush(&mut self, tree: &mut Tree) -> Vec<(NodeId, f32)> {
        let mut widths = Vec::with_capacity(self.pending.len());
        for table in self.pending.drain(..) {
            if !tree.contains(table) {
                log::debug!("[schedule] {} removed before flush", table);
                continue;
            }
            match tree.update_table_width(table) {
                Ok(width) => widths.push((table, width)),
                Err(e) => log::warn!("[schedule] width update failed for {}: {}", table, e),
            }
        }
        widths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabledom::SequentialIds;

    #[test]
    fn test_requests_collapse_and_cancel() {
        let mut tree = Tree::with_ids(SequentialIds::new());
        let root = tree.root();
        let first = tree.insert_table(root, None, 1, 2, 100).unwrap();
        let second = tree.insert_table(root, None, 1, 3, 100).unwrap();

        let mut scheduler = LayoutScheduler::new();
        assert!(!scheduler.has_pending());
        scheduler.request(first);
        scheduler.request(second);
        scheduler.request(first);
        scheduler.cancel(second);
        assert!(scheduler.has_pending());
        assert!(!scheduler.is_pending(second));

        assert_eq!(scheduler.flush(&mut tree), vec![(first, 200.0)]);
        assert!(!scheduler.has_pending());
    }

    #[test]
    fn test_removed_table_is_dropped_on_flush() {
        let mut tree = Tree::with_ids(SequentialIds::new());
        let root = tree.root();
        let table = tree.insert_table(root, None, 1, 1, 100).unwrap();
        let wrapper = tree.parent(table).unwrap();

        let mut scheduler = LayoutScheduler::new();
        scheduler.request(table);
        tree.remove(wrapper).unwrap();
        assert!(scheduler.flush(&mut tree).is_empty());
    }
}
