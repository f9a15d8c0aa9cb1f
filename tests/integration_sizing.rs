use term_dock::layout::{Arrangement, DockRect, arrange, resize_split};
use term_dock::model::{LayoutOptions, NodeId, NodeKind, Orientation, PaneKind};
use term_dock::scenario::{PreviewLayout, Scenario};

const EPS: f64 = 1e-6;

fn ide() -> PreviewLayout {
    Scenario::Ide.build(LayoutOptions::default()).unwrap()
}

/// Children of every arranged group fill it exactly and none drops below its
/// calculated minimum.
fn assert_conserved(layout: &PreviewLayout, arrangement: &Arrangement) {
    let splitter = layout.options().splitter_width;
    for group in layout.rooted_nodes() {
        let Some(axis) = layout.orientation(group) else {
            continue;
        };
        let Some(rect) = arrangement.regions.get(group) else {
            continue;
        };
        let children = layout.visible_positionable_children(group);
        if children.is_empty() {
            continue;
        }
        let mut total = splitter * (children.len() - 1) as f64;
        for child in &children {
            let child_rect = arrangement.regions.get(*child).expect("child arranged");
            let length = child_rect.length(axis);
            assert!(
                length + EPS >= layout.calculated_dock_min(*child, axis),
                "{} squeezed to {length}",
                layout.describe(*child)
            );
            total += length;
        }
        assert!(
            (total - rect.length(axis)).abs() < EPS,
            "{}: children take {total} of {}",
            layout.describe(group),
            rect.length(axis)
        );
    }
}

#[test]
fn arranged_lengths_fill_every_group() {
    let mut layout = ide();
    for width in [1600.0, 900.0, 400.0, 200.0] {
        let arrangement = arrange(&mut layout, DockRect::new(0.0, 0.0, width, 700.0));
        assert_conserved(&layout, &arrangement);
    }
}

#[test]
fn shrinking_then_growing_restores_tool_widths() {
    let mut layout = ide();
    let panel = layout.root_panel().unwrap();
    let explorer_pane = layout.children(panel)[0];

    arrange(&mut layout, DockRect::new(0.0, 0.0, 1600.0, 900.0));
    assert_eq!(
        layout.actual_length(explorer_pane, Orientation::Horizontal),
        28.0
    );

    // 90 cells: above the summed minimums but below the nominal tool widths.
    arrange(&mut layout, DockRect::new(0.0, 0.0, 90.0, 900.0));
    let squeezed = layout.actual_length(explorer_pane, Orientation::Horizontal);
    assert!((squeezed - 26.5).abs() < EPS, "{squeezed}");
    assert!(squeezed + EPS >= layout.calculated_dock_min(explorer_pane, Orientation::Horizontal));

    arrange(&mut layout, DockRect::new(0.0, 0.0, 1600.0, 900.0));
    assert_eq!(
        layout.actual_length(explorer_pane, Orientation::Horizontal),
        28.0
    );
}

#[test]
fn splitter_drag_moves_only_the_two_neighbours() {
    let mut layout = ide();
    let panel = layout.root_panel().unwrap();
    let area = DockRect::new(0.0, 0.0, 1600.0, 900.0);
    let before = arrange(&mut layout, area);
    let children = layout.visible_positionable_children(panel);
    let width = |arrangement: &Arrangement, id: NodeId| arrangement.regions.get(id).unwrap().width;

    assert_eq!(resize_split(&mut layout, panel, 1, -40.0), Ok(true));
    let after = arrange(&mut layout, area);
    assert_eq!(width(&after, children[0]), width(&before, children[0]));
    assert!((width(&after, children[1]) - (width(&before, children[1]) - 40.0)).abs() < EPS);
    assert!((width(&after, children[2]) - (width(&before, children[2]) + 40.0)).abs() < EPS);
    assert_conserved(&layout, &after);
}

#[test]
fn visibility_matches_children_after_each_transition() {
    let mut layout = ide();
    let tools: Vec<NodeId> = layout.anchorables();
    let check = |layout: &PreviewLayout| {
        for id in layout.rooted_nodes() {
            let expected = match layout.kind(id) {
                Some(NodeKind::Panel)
                | Some(NodeKind::PaneGroup(_))
                | Some(NodeKind::Pane(PaneKind::Anchorable))
                | Some(NodeKind::FloatingWindow(_)) => {
                    layout.children(id).iter().any(|child| layout.is_visible(*child))
                }
                _ => continue,
            };
            assert_eq!(layout.is_visible(id), expected, "{}", layout.describe(id));
        }
    };

    check(&layout);
    for tool in &tools {
        layout.hide(*tool).unwrap();
        check(&layout);
    }
    for tool in &tools {
        layout.show(*tool).unwrap();
        check(&layout);
    }
    layout.float(tools[0]).unwrap();
    check(&layout);
    layout.toggle_auto_hide(tools[1]).unwrap();
    check(&layout);
}
