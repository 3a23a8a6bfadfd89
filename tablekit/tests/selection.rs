mod common;

use common::{Fixture, HostCall, RecordingHost};
use tabledom::{Geometry, MouseButton, PointerEvent, Rect, Span};
use tablekit::{DragState, LayoutScheduler, LinePosition, SelectionController, TableConfig, TableEditor};

fn controller(fx: &Fixture) -> SelectionController {
    SelectionController::new(fx.table, &TableConfig::default())
}

/// Press on one slot, drag to another.
fn drag(
    fx: &Fixture,
    selection: &mut SelectionController,
    from: (usize, usize),
    to: (usize, usize),
    host: &mut RecordingHost,
) {
    let geometry = Geometry::viewport(&fx.layout);
    assert!(selection.handle_event(&fx.tree, &geometry, &fx.press(from.0, from.1), host));
    assert!(selection.handle_event(&fx.tree, &geometry, &fx.drag_to(to.0, to.1), host));
}

#[test]
fn test_press_selects_anchor_cell() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    let geometry = Geometry::viewport(&fx.layout);

    assert!(selection.handle_event(&fx.tree, &geometry, &fx.press(0, 0), &mut host));
    assert!(selection.is_dragging());
    assert_eq!(selection.selected(), &[fx.cell_at(0, 0)]);
    assert_eq!(selection.boundary(), Rect::new(0.0, 0.0, 99.0, 29.0));
    assert!(host.calls.is_empty());
}

#[test]
fn test_drag_selects_rectangle_and_blurs() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (1, 1), &mut host);

    let b = selection.boundary();
    assert_eq!((b.x, b.y, b.x1(), b.y1()), (0.0, 0.0, 199.0, 59.0));
    assert_eq!(selection.selected(), fx.tree.cells(fx.table).as_slice());
    assert_eq!(host.calls, vec![HostCall::Blur]);
}

#[test]
fn test_drag_within_anchor_does_not_blur() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (0, 0), &mut host);

    assert_eq!(selection.selected().len(), 1);
    assert!(host.calls.is_empty());
}

#[test]
fn test_boundary_snaps_over_partly_covered_cells() {
    let mut fx = Fixture::new(3, 3);
    let top = fx.cell_at(0, 1);
    let below = fx.cell_at(1, 1);
    let mut scheduler = LayoutScheduler::new();
    TableEditor::new(&mut fx.tree, &mut scheduler, fx.table)
        .unwrap()
        .merge_cells(&[top, below], Span::clamped(2), Span::ONE)
        .unwrap();
    fx.relayout();

    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (0, 2), &mut host);

    let b = selection.boundary();
    assert_eq!((b.x, b.y, b.x1(), b.y1()), (0.0, 0.0, 299.0, 59.0));
    assert_eq!(
        selection.selected(),
        &[
            fx.cell_at(0, 0),
            top,
            fx.cell_at(0, 2),
            fx.cell_at(1, 0),
            fx.cell_at(1, 2),
        ]
    );
}

#[test]
fn test_new_press_replaces_selection() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (1, 1), &mut host);
    let geometry = Geometry::viewport(&fx.layout);
    selection.handle_event(&fx.tree, &geometry, &fx.release(), &mut host);

    assert!(selection.handle_event(&fx.tree, &geometry, &fx.press(1, 1), &mut host));
    assert_eq!(selection.selected(), &[fx.cell_at(1, 1)]);
    match selection.state() {
        DragState::Dragging { anchor, .. } => assert_eq!(anchor, fx.cell_at(1, 1)),
        DragState::Idle => panic!("expected a drag in progress"),
    }
}

#[test]
fn test_move_without_press_is_ignored() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    let geometry = Geometry::viewport(&fx.layout);

    assert!(!selection.handle_event(&fx.tree, &geometry, &fx.drag_to(1, 1), &mut host));
    assert!(selection.selected().is_empty());
    assert!(!selection.lines().is_visible());
}

#[test]
fn test_right_button_is_ignored() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    let geometry = Geometry::viewport(&fx.layout);
    let (x, y) = Fixture::point(0, 0);
    let press = PointerEvent::Press {
        target: fx.hit(0, 0),
        x,
        y,
        button: MouseButton::Right,
    };

    assert!(!selection.handle_event(&fx.tree, &geometry, &press, &mut host));
    assert_eq!(selection.state(), DragState::Idle);
}

#[test]
fn test_release_ends_drag() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (0, 1), &mut host);
    let geometry = Geometry::viewport(&fx.layout);

    assert!(selection.handle_event(&fx.tree, &geometry, &fx.release(), &mut host));
    assert!(!selection.is_dragging());
    assert_eq!(selection.selected().len(), 2);

    // Further moves leave the selection alone.
    assert!(!selection.handle_event(&fx.tree, &geometry, &fx.drag_to(1, 1), &mut host));
    assert_eq!(selection.selected().len(), 2);
    assert!(!selection.handle_event(&fx.tree, &geometry, &fx.release(), &mut host));
}

#[test]
fn test_press_outside_table_is_ignored() {
    let mut fx = Fixture::new(1, 1);
    let root = fx.tree.root();
    let other = fx.tree.insert_table(root, None, 1, 1, 100).unwrap();
    let stray = fx.tree.cells(other)[0];
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    let geometry = Geometry::viewport(&fx.layout);
    let press = PointerEvent::Press {
        target: Some(stray),
        x: 0.0,
        y: 0.0,
        button: MouseButton::Left,
    };

    assert!(!selection.handle_event(&fx.tree, &geometry, &press, &mut host));
    assert!(selection.selected().is_empty());
}

#[test]
fn test_content_change_clears_selection() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (1, 1), &mut host);
    assert!(selection.lines().is_visible());

    selection.on_content_changed();
    assert!(selection.selected().is_empty());
    assert!(!selection.lines().is_visible());
    assert_eq!(selection.lines().iter().count(), 0);
}

#[test]
fn test_help_lines_surround_boundary() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (1, 1), &mut host);

    let lines = selection.lines();
    assert!(lines.is_visible());
    assert_eq!(lines.color(), "#0589f3");
    assert_eq!(lines.get(LinePosition::Left), Rect::new(-1.0, 0.0, 1.0, 60.0));
    assert_eq!(lines.get(LinePosition::Right), Rect::new(199.0, 0.0, 1.0, 60.0));
    assert_eq!(lines.get(LinePosition::Top), Rect::new(-1.0, 0.0, 200.0, 1.0));
    assert_eq!(lines.get(LinePosition::Bottom), Rect::new(-1.0, 60.0, 200.0, 1.0));
    assert_eq!(lines.iter().count(), 4);
}

#[test]
fn test_help_lines_follow_horizontal_scroll() {
    let mut fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (1, 1), &mut host);

    let wrapper = fx.tree.parent(fx.table).unwrap();
    fx.tree.set_scroll_left(wrapper, 50.0).unwrap();
    selection.on_wrapper_scroll(&fx.tree);

    let lines = selection.lines();
    assert_eq!(lines.get(LinePosition::Left), Rect::new(-51.0, 0.0, 1.0, 60.0));
    assert_eq!(lines.get(LinePosition::Right), Rect::new(149.0, 0.0, 1.0, 60.0));
    assert_eq!(lines.get(LinePosition::Bottom).y, 60.0);
}

#[test]
fn test_selection_relative_to_frame() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let frame = Rect::new(40.0, 20.0, 800.0, 600.0);
    let geometry = Geometry::new(&fx.layout, frame);
    let start = geometry.rect(fx.cell_at(0, 0)).unwrap();
    let end = geometry.rect(fx.cell_at(0, 1)).unwrap();

    selection.set_selection(&fx.tree, &geometry, start, end);
    assert_eq!(selection.boundary().x, -40.0);
    assert_eq!(selection.boundary().y, -20.0);
    assert_eq!(selection.selected(), &[fx.cell_at(0, 0), fx.cell_at(0, 1)]);
}

#[test]
fn test_spans_and_column_indexes() {
    let fx = Fixture::new(3, 3);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (1, 1), &mut host);
    let geometry = Geometry::viewport(&fx.layout);

    assert_eq!(selection.selected().len(), 4);
    assert_eq!(
        selection.spans(&fx.tree, &geometry),
        (Span::clamped(2), Span::clamped(2))
    );
    assert_eq!(selection.column_indexes(&fx.tree, &geometry), vec![0, 1]);
}

#[test]
fn test_refresh_help_lines_after_edit() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (0, 0), (0, 1), &mut host);

    let moved = fx
        .layout
        .iter()
        .map(|(&node, &rect)| (node, Rect::new(rect.x, rect.y + 30.0, rect.width, rect.height)))
        .collect::<tabledom::LayoutResult>();
    selection.refresh_help_lines(&fx.tree, &Geometry::viewport(&moved));

    assert_eq!(selection.boundary().y, 30.0);
    assert_eq!(selection.lines().get(LinePosition::Top).y, 30.0);
}

#[test]
fn test_destroy_resets_everything() {
    let fx = Fixture::new(2, 2);
    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    let geometry = Geometry::viewport(&fx.layout);
    selection.handle_event(&fx.tree, &geometry, &fx.press(0, 0), &mut host);

    selection.destroy();
    assert_eq!(selection.state(), DragState::Idle);
    assert!(selection.selected().is_empty());
    assert!(!selection.lines().is_visible());
}

#[test]
fn test_drag_onto_lower_part_of_rowspan() {
    let mut fx = Fixture::new(2, 2);
    let top = fx.cell_at(0, 0);
    let below = fx.cell_at(1, 0);
    let mut scheduler = LayoutScheduler::new();
    TableEditor::new(&mut fx.tree, &mut scheduler, fx.table)
        .unwrap()
        .merge_cells(&[top, below], Span::clamped(2), Span::ONE)
        .unwrap();
    fx.relayout();

    let mut selection = controller(&fx);
    let mut host = RecordingHost::default();
    drag(&fx, &mut selection, (1, 1), (1, 0), &mut host);

    assert_eq!(
        selection.selected(),
        &[top, fx.cell_at(0, 1), fx.cell_at(1, 1)]
    );
    assert_eq!(host.calls, vec![HostCall::Blur]);
}

#[test]
fn test_every_drag_selects_without_gaps() {
    let mut fx = Fixture::new(3, 3);
    let mut scheduler = LayoutScheduler::new();
    let tall = [fx.cell_at(0, 1), fx.cell_at(1, 1)];
    let wide = [fx.cell_at(2, 0), fx.cell_at(2, 1)];
    let mut editor = TableEditor::new(&mut fx.tree, &mut scheduler, fx.table).unwrap();
    editor.merge_cells(&tall, Span::clamped(2), Span::ONE).unwrap();
    editor.merge_cells(&wide, Span::ONE, Span::clamped(2)).unwrap();
    fx.relayout();

    let cells = fx.tree.cells(fx.table);
    let slots: Vec<(usize, usize)> = (0..3).flat_map(|r| (0..3).map(move |c| (r, c))).collect();
    for &from in &slots {
        for &to in &slots {
            let mut selection = controller(&fx);
            drag(&fx, &mut selection, from, to, &mut RecordingHost::default());
            let selected = selection.selected();
            assert!(selected.contains(&fx.cell_at(from.0, from.1)));
            assert!(selected.contains(&fx.cell_at(to.0, to.1)));

            for &a in selected {
                for &b in selected {
                    let env = fx.rect(a).envelope(fx.rect(b));
                    for &cell in &cells {
                        let r = fx.rect(cell);
                        let inside = r.x >= env.x
                            && r.x + r.width - 1.0 <= env.x1()
                            && r.y >= env.y
                            && r.y + r.height - 1.0 <= env.y1();
                        assert!(
                            !inside || selected.contains(&cell),
                            "{from:?} -> {to:?}: {cell} lies between {a} and {b} but is not selected"
                        );
                    }
                }
            }
        }
    }
}
