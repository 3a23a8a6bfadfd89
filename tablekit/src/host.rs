//! The editing surface a table lives in.

/// Origin of a document update, passed through to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeSource {
    #[default]
    User,
    Api,
    Silent,
}

/// Callbacks into the rich-text editor embedding the tables.
pub trait EditorHost {
    /// Tear down table tooling (selection lines, column tool).
    fn hide_table_tools(&mut self);

    /// Ask the editor to sync its document with the tree.
    fn update(&mut self, source: ChangeSource);

    /// Drop text focus, so a text selection cannot span several cells.
    fn blur(&mut self);
}

/// A host that ignores every callback.
impl EditorHost for () {
    fn hide_table_tools(&mut self) {}

    fn update(&mut self, _source: ChangeSource) {}

    fn blur(&mut self) {}
}
