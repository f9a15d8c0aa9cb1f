//! Depth-first traversal hooks and a plain-text tree dump.
//!
//! Persistence formats live outside the model: a serializer walks the tree
//! with a [`LayoutVisitor`] and rebuilds it through the public mutation API.

use std::fmt::{self, Write as _};

use super::{AnchorSide, DockLayout, NodeId, NodeKind, Orientation, PaneKind};

pub trait LayoutVisitor<C> {
    fn enter(&mut self, layout: &DockLayout<C>, node: NodeId, depth: usize);

    fn leave(&mut self, _layout: &DockLayout<C>, _node: NodeId, _depth: usize) {}
}

impl fmt::Display for PaneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaneKind::Document => "document",
            PaneKind::Anchorable => "anchorable",
        })
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        })
    }
}

impl fmt::Display for AnchorSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnchorSide::Left => "left",
            AnchorSide::Top => "top",
            AnchorSide::Right => "right",
            AnchorSide::Bottom => "bottom",
        })
    }
}

impl<C> DockLayout<C> {
    /// Walk the whole tree from the root.
    pub fn visit(&self, visitor: &mut impl LayoutVisitor<C>) {
        self.visit_from(self.root, visitor);
    }

    pub fn visit_from(&self, start: NodeId, visitor: &mut impl LayoutVisitor<C>) {
        self.walk(start, 0, visitor);
    }

    fn walk(&self, node: NodeId, depth: usize, visitor: &mut impl LayoutVisitor<C>) {
        visitor.enter(self, node, depth);
        for child in self.children(node) {
            self.walk(*child, depth + 1, visitor);
        }
        visitor.leave(self, node, depth);
    }

    /// One-line description of a node.
    pub fn describe(&self, id: NodeId) -> String {
        let Some(kind) = self.kind(id) else {
            return "<disposed>".to_string();
        };
        let orientation = self
            .orientation(id)
            .map(|o| o.to_string())
            .unwrap_or_default();
        let mut label = match kind {
            NodeKind::Root => "root".to_string(),
            NodeKind::Panel => format!("panel {orientation}"),
            NodeKind::PaneGroup(kind) => format!("{kind}-group {orientation}"),
            NodeKind::Pane(kind) => format!("{kind}-pane"),
            NodeKind::Document | NodeKind::Anchorable => {
                let title = self.content(id).map(|c| c.title()).unwrap_or_default();
                let role = if kind == NodeKind::Document {
                    "document"
                } else {
                    "anchorable"
                };
                format!("{role} {title:?}")
            }
            NodeKind::FloatingWindow(kind) => format!("floating-window {kind}"),
            NodeKind::AnchorSide(side) => format!("side {side}"),
            NodeKind::AnchorGroup => "anchor-group".to_string(),
        };
        if kind.is_content() {
            if self.parent(id).is_some_and(|p| self.kind(p).is_some_and(NodeKind::is_pane))
                && self.is_selected(id)
            {
                label.push_str(" [selected]");
            }
            if self.is_active(id) {
                label.push_str(" [active]");
            }
        }
        label
    }

    /// Indented outline of the whole tree, two spaces per level.
    pub fn dump(&self) -> String {
        let mut dump = Dump::default();
        self.visit(&mut dump);
        dump.out
    }
}

#[derive(Default)]
struct Dump {
    out: String,
}

impl<C> LayoutVisitor<C> for Dump {
    fn enter(&mut self, layout: &DockLayout<C>, node: NodeId, depth: usize) {
        let _ = writeln!(
            self.out,
            "{:indent$}{}",
            "",
            layout.describe(node),
            indent = depth * 2
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn dump_outlines_default_layout() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let doc = layout.new_document("main.rs");
        layout.push_child(pane, doc).unwrap();
        layout.activate(doc).unwrap();
        assert_eq!(
            layout.dump(),
            indoc! {r#"
                root
                  panel horizontal
                    document-pane
                      document "main.rs" [selected] [active]
                  side left
                  side top
                  side right
                  side bottom
            "#}
        );
    }

    #[test]
    fn visitor_sees_enter_and_leave_in_nesting_order() {
        struct Trace(Vec<(bool, usize)>);
        impl LayoutVisitor<()> for Trace {
            fn enter(&mut self, _: &DockLayout<()>, _: NodeId, depth: usize) {
                self.0.push((true, depth));
            }
            fn leave(&mut self, _: &DockLayout<()>, _: NodeId, depth: usize) {
                self.0.push((false, depth));
            }
        }

        let layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let mut trace = Trace(Vec::new());
        layout.visit_from(panel, &mut trace);
        assert_eq!(
            trace.0,
            vec![(true, 0), (true, 1), (false, 1), (false, 0)]
        );
    }
}
