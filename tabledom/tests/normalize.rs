use tabledom::{CellId, Formats, NodeKind, RowId, SequentialIds, Span, Tree};

fn tree() -> Tree {
    Tree::with_ids(SequentialIds::new())
}

fn line_formats(row: &str, cell: &str) -> Formats {
    Formats::new().row(RowId::new(row)).cell(CellId::new(cell))
}

#[test]
fn test_bare_line_is_wrapped_up_to_wrapper() {
    let mut tree = tree();
    let root = tree.root();
    let formats = line_formats("row-a", "cell-a")
        .colspan(Span::clamped(2))
        .background("#eee");
    let line = tree.create_line("hello", &formats);
    tree.append_child(root, line).unwrap();

    tree.optimize(root).unwrap();

    let cell = tree.parent(line).unwrap();
    assert_eq!(tree.kind(cell), Some(NodeKind::Cell));
    assert_eq!(tree.colspan(cell).get(), 2);
    assert_eq!(tree.formats(cell).background.as_deref(), Some("#eee"));

    let row = tree.parent(cell).unwrap();
    assert_eq!(tree.kind(row), Some(NodeKind::Row));
    assert_eq!(tree.row_id(row), Some(&RowId::new("row-a")));

    let chain: Vec<_> = [NodeKind::Body, NodeKind::Table, NodeKind::Wrapper]
        .into_iter()
        .scan(row, |current, _| {
            *current = tree.parent(*current)?;
            tree.kind(*current)
        })
        .collect();
    assert_eq!(
        chain,
        vec![NodeKind::Body, NodeKind::Table, NodeKind::Wrapper]
    );
    assert_eq!(tree.children(root).len(), 1);
}

#[test]
fn test_lines_of_one_cell_merge() {
    let mut tree = tree();
    let root = tree.root();
    let formats = line_formats("row-a", "cell-a");
    let first = tree.create_line("one", &formats);
    let second = tree.create_line("two", &formats);
    tree.append_child(root, first).unwrap();
    tree.append_child(root, second).unwrap();

    tree.optimize(root).unwrap();

    let cell = tree.parent(first).unwrap();
    assert_eq!(tree.parent(second), Some(cell));
    assert_eq!(tree.cell_text(cell), "one\ntwo");
    assert_eq!(tree.children(root).len(), 1);
}

#[test]
fn test_cells_of_one_row_merge_but_stay_distinct() {
    let mut tree = tree();
    let root = tree.root();
    let a = tree.create_line("a", &line_formats("row-a", "cell-a"));
    let b = tree.create_line("b", &line_formats("row-a", "cell-b"));
    let c = tree.create_line("c", &line_formats("row-b", "cell-c"));
    for line in [a, b, c] {
        tree.append_child(root, line).unwrap();
    }

    tree.optimize(root).unwrap();

    let cell_a = tree.parent(a).unwrap();
    let cell_b = tree.parent(b).unwrap();
    assert_ne!(cell_a, cell_b);
    let row_a = tree.parent(cell_a).unwrap();
    assert_eq!(tree.parent(cell_b), Some(row_a));

    let row_b = tree.closest(c, NodeKind::Row).unwrap();
    assert_ne!(row_a, row_b);
    assert_eq!(tree.parent(row_a), tree.parent(row_b));
}

#[test]
fn test_rows_with_different_identity_do_not_merge() {
    let mut tree = tree();
    let root = tree.root();
    let table = tree.insert_table(root, None, 2, 2, 100).unwrap();
    let body = tree.body(table).unwrap();

    tree.optimize(root).unwrap();

    assert_eq!(tree.children(body).len(), 2);
    assert_eq!(tree.cells(table).len(), 4);
}

#[test]
fn test_empty_row_survives_normalization() {
    let mut tree = tree();
    let root = tree.root();
    let table = tree.insert_table(root, None, 2, 1, 100).unwrap();
    let body = tree.body(table).unwrap();
    let empty = tree.create(NodeKind::Row, &Formats::new());
    tree.append_child(body, empty).unwrap();

    tree.optimize(root).unwrap();

    assert!(tree.contains(empty));
    assert_eq!(tree.rows(table).len(), 3);
    assert!(tree.children(empty).is_empty());
}

#[test]
fn test_adjacent_wrappers_merge() {
    let mut tree = tree();
    let root = tree.root();
    let first = tree.insert_table(root, None, 1, 1, 100).unwrap();
    let second = tree.insert_table(root, None, 1, 1, 100).unwrap();

    tree.optimize(root).unwrap();

    // Both tables collapse into one wrapper, then into one table.
    assert_eq!(tree.children(root).len(), 1);
    assert!(tree.contains(first));
    assert!(!tree.contains(second));
    assert_eq!(tree.cells(first).len(), 2);
}

#[test]
fn test_check_merge_requires_matching_ends() {
    let mut tree = tree();
    let root = tree.root();
    let table = tree.insert_table(root, None, 2, 1, 100).unwrap();
    let rows = tree.rows(table);
    assert!(!tree.check_merge(rows[0], rows[1]));

    let cells = tree.cells(table);
    assert!(!tree.check_merge(cells[0], cells[1]));
}
