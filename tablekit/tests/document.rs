mod common;

use common::Fixture;
use tabledom::{NodeKind, Span, Tree};
use tablekit::document::{deserialize_table, from_json, serialize_table, to_json, Block};
use tablekit::{LayoutScheduler, TableEditor};

#[test]
fn test_round_trip_keeps_structure() {
    let mut fx = Fixture::new(2, 3);
    let merged = fx.cell_at(0, 0);
    let other = fx.cell_at(1, 0);
    fx.set_text(merged, "first");
    fx.set_text(other, "second");
    fx.tree
        .format_str(fx.cell_at(0, 2), "cell-bg", Some("#eeeeee"))
        .unwrap();
    let mut scheduler = LayoutScheduler::new();
    TableEditor::new(&mut fx.tree, &mut scheduler, fx.table)
        .unwrap()
        .merge_cells(&[merged, other], Span::clamped(2), Span::ONE)
        .unwrap();
    let line = fx.tree.first_child(fx.cell_at(1, 2)).unwrap();
    fx.tree.format_str(line, "bold", Some("true")).unwrap();

    let blocks = serialize_table(&fx.tree, fx.table);
    assert_eq!(blocks.len(), 3 + 6);
    let json = to_json(&blocks).unwrap();
    assert!(json.contains("\"block\": \"table-cell-line\""));
    assert!(json.contains("\"cell-bg\": \"#eeeeee\""));

    let mut restored = Tree::new();
    let root = restored.root();
    let table = deserialize_table(&mut restored, root, None, &from_json(&json).unwrap())
        .unwrap()
        .unwrap();

    assert_eq!(serialize_table(&restored, table), blocks);
    assert_eq!(restored.rows(table).len(), 2);
    assert_eq!(restored.cells(table).len(), 5);
    assert_eq!(restored.table_width(table), Some(300.0));
    let first = restored.cells(table)[0];
    assert_eq!(restored.rowspan(first).get(), 2);
    assert_eq!(restored.cell_text(first), "first\nsecond");
}

#[test]
fn test_missing_attributes_take_defaults() {
    let json = r#"[
        { "block": "table-col" },
        { "block": "table-cell-line", "text": "only" }
    ]"#;
    let blocks = from_json(json).unwrap();
    assert_eq!(blocks[0], Block::TableCol { width: 100 });

    let mut tree = Tree::new();
    let root = tree.root();
    let table = deserialize_table(&mut tree, root, None, &blocks)
        .unwrap()
        .unwrap();

    assert_eq!(tree.kind(tree.parent(table).unwrap()), Some(NodeKind::Wrapper));
    assert_eq!(tree.columns(table).len(), 1);
    let cells = tree.cells(table);
    assert_eq!(cells.len(), 1);
    assert_eq!(tree.rowspan(cells[0]), Span::ONE);
    assert_eq!(tree.colspan(cells[0]), Span::ONE);
    assert_eq!(tree.cell_text(cells[0]), "only");
    let line = tree.first_child(cells[0]).unwrap();
    assert!(tree.row_id(line).is_some());
    assert!(tree.formats(line).cell.is_some());
}

#[test]
fn test_empty_block_list_builds_nothing() {
    let mut tree = Tree::new();
    let root = tree.root();
    assert_eq!(deserialize_table(&mut tree, root, None, &[]).unwrap(), None);
    assert!(tree.children(root).is_empty());
}

#[test]
fn test_invalid_span_is_rejected() {
    let json = r#"[{ "block": "table-cell-line", "rowspan": 0 }]"#;
    assert!(from_json(json).is_err());
}
