//! Root-level slots: the root panel, the anchor sides, floating windows,
//! hidden anchorables, and active content tracking.

use crate::error::{LayoutError, LayoutResult};

use super::events::Property;
use super::{AnchorSide, DockLayout, NodeData, NodeId, NodeKind, Orientation, PaneKind};

impl<C> DockLayout<C> {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_panel(&self) -> Option<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .find(|child| self.kind(*child) == Some(NodeKind::Panel))
    }

    /// Swap in a new root panel. The previous one is detached and returned.
    pub fn set_root_panel(&mut self, panel: NodeId) -> LayoutResult<Option<NodeId>> {
        let kind = self.kind_of(panel)?;
        if kind != NodeKind::Panel {
            return Err(LayoutError::InvalidChild {
                parent: NodeKind::Root,
                child: kind,
            });
        }
        match self.root_panel() {
            Some(current) if current == panel => Ok(None),
            Some(current) => {
                self.replace_child(current, panel)?;
                Ok(Some(current))
            }
            None => {
                self.insert_child(self.root, 0, panel)?;
                self.events.property_changed(self.root, Property::RootPanel);
                Ok(None)
            }
        }
    }

    pub fn anchor_side(&self, side: AnchorSide) -> NodeId {
        let index = AnchorSide::ALL
            .iter()
            .position(|candidate| *candidate == side)
            .unwrap_or_default();
        self.sides[index]
    }

    /// Auto-hide groups docked to one side, in order.
    pub fn anchor_groups(&self, side: AnchorSide) -> &[NodeId] {
        self.children(self.anchor_side(side))
    }

    pub fn floating_windows(&self) -> Vec<NodeId> {
        self.root_children_of(|kind| matches!(kind, NodeKind::FloatingWindow(_)))
    }

    /// Anchorables parked in the root's hidden list.
    pub fn hidden_anchorables(&self) -> Vec<NodeId> {
        self.root_children_of(|kind| kind == NodeKind::Anchorable)
    }

    fn root_children_of(&self, predicate: impl Fn(NodeKind) -> bool) -> Vec<NodeId> {
        self.children(self.root)
            .iter()
            .copied()
            .filter(|child| self.kind(*child).is_some_and(&predicate))
            .collect()
    }

    pub fn first_document_pane(&self) -> Option<NodeId> {
        let panel = self.root_panel()?;
        self.descendants(panel)
            .find(|id| self.kind(*id) == Some(NodeKind::Pane(PaneKind::Document)))
    }

    /// Document panes in the main tree, excluding floating windows.
    pub fn main_document_panes(&self) -> Vec<NodeId> {
        let Some(panel) = self.root_panel() else {
            return Vec::new();
        };
        self.descendants(panel)
            .filter(|id| self.kind(*id) == Some(NodeKind::Pane(PaneKind::Document)))
            .collect()
    }

    /// Every rooted document or anchorable.
    pub fn contents(&self) -> Vec<NodeId> {
        self.rooted_nodes()
            .filter(|id| self.kind(*id).is_some_and(NodeKind::is_content))
            .collect()
    }

    pub fn documents(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Document)
    }

    pub fn anchorables(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Anchorable)
    }

    pub fn is_floating(&self, id: NodeId) -> bool {
        self.floating_window_of(id).is_some()
    }

    pub fn active_content(&self) -> Option<NodeId> {
        self.active_content.filter(|id| self.nodes.contains_key(*id))
    }

    pub fn last_focused_document(&self) -> Option<NodeId> {
        self.last_focused_document
            .filter(|id| self.nodes.contains_key(*id))
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.active_content() == Some(id)
    }

    /// Make `content` the single active content, or clear it with `None`.
    /// Returns false when nothing changed. Non-content handles are ignored.
    pub fn set_active_content(&mut self, content: Option<NodeId>) -> bool {
        if let Some(id) = content
            && !self.kind(id).is_some_and(NodeKind::is_content)
        {
            return false;
        }
        let previous = self.active_content();
        if previous == content {
            return false;
        }
        let root = self.root;
        self.events.property_changing(root, Property::ActiveContent);
        self.active_content = content;
        if let Some(previous) = previous {
            self.events.property_changed(previous, Property::IsActive);
        }
        if let Some(id) = content {
            self.activation_counter += 1;
            let stamp = self.activation_counter;
            let is_document = self.kind(id) == Some(NodeKind::Document);
            if let Some(NodeData::Content(state)) = self.nodes.get_mut(id).map(|n| &mut n.data) {
                state.last_activation = stamp;
            }
            self.events.property_changed(id, Property::IsActive);
            if is_document && self.last_focused_document() != Some(id) {
                self.last_focused_document = Some(id);
                self.events
                    .property_changed(root, Property::LastFocusedDocument);
            }
        }
        self.events.property_changed(root, Property::ActiveContent);
        self.events.mark_dirty();
        tracing::trace!(content = ?content, "active content changed");
        true
    }

    /// Anchor side a docked element gravitates to when auto-hidden: the edge
    /// of its nearest panel on which the element's branch sits.
    pub fn side_of(&self, id: NodeId) -> AnchorSide {
        let Some(panel) = self.find_ancestor(id, |kind| kind == NodeKind::Panel) else {
            return AnchorSide::Right;
        };
        let branch = self
            .ancestors(id)
            .find(|node| self.parent(*node) == Some(panel))
            .unwrap_or(id);
        let siblings = self.children_count(panel);
        let leading = siblings > 1 && self.index_of(panel, branch) == Some(0);
        match (self.orientation(panel), leading) {
            (Some(Orientation::Vertical), true) => AnchorSide::Top,
            (Some(Orientation::Vertical), false) => AnchorSide::Bottom,
            (_, true) => AnchorSide::Left,
            (_, false) => AnchorSide::Right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_of_uses_branch_position_in_nearest_panel() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let left = layout.new_pane(PaneKind::Anchorable);
        let right = layout.new_pane(PaneKind::Anchorable);
        layout.insert_child(panel, 0, left).unwrap();
        layout.push_child(panel, right).unwrap();
        assert_eq!(layout.side_of(left), AnchorSide::Left);
        assert_eq!(layout.side_of(right), AnchorSide::Right);

        let column = layout.new_panel(Orientation::Vertical);
        let top = layout.new_pane(PaneKind::Anchorable);
        let bottom = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, column).unwrap();
        layout.push_child(column, top).unwrap();
        layout.push_child(column, bottom).unwrap();
        assert_eq!(layout.side_of(top), AnchorSide::Top);
        assert_eq!(layout.side_of(bottom), AnchorSide::Bottom);
    }

    #[test]
    fn set_root_panel_detaches_previous() {
        let mut layout: DockLayout = DockLayout::new();
        let old = layout.root_panel().unwrap();
        let new = layout.new_panel(Orientation::Vertical);
        assert_eq!(layout.set_root_panel(new), Ok(Some(old)));
        assert_eq!(layout.root_panel(), Some(new));
        assert_eq!(layout.parent(old), None);
        assert_eq!(layout.index_of(layout.root(), new), Some(0));
    }

    #[test]
    fn activation_stamps_increase_and_track_last_document() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let a = layout.new_document("a");
        let b = layout.new_document("b");
        let tool = layout.new_anchorable("tool");
        layout.push_child(pane, a).unwrap();
        layout.push_child(pane, b).unwrap();
        layout.push_child(pane, tool).unwrap();

        assert!(layout.set_active_content(Some(a)));
        assert!(!layout.set_active_content(Some(a)));
        assert!(layout.set_active_content(Some(tool)));
        assert_eq!(layout.last_focused_document(), Some(a));
        assert!(layout.set_active_content(Some(b)));
        assert_eq!(layout.last_focused_document(), Some(b));

        let stamp = |id| layout.content(id).unwrap().last_activation();
        assert!(stamp(a) < stamp(tool));
        assert!(stamp(tool) < stamp(b));
        assert!(!layout.set_active_content(Some(pane)));
    }
}
