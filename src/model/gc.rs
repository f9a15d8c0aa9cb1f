//! Structural garbage collection.
//!
//! Transitions leave empty panes, groups, and windows behind. The collector
//! removes them one at a time, restarting its scan after every removal until
//! a pass finds nothing to do, then collapses redundant pane group nesting.
//! Running it twice in a row never changes anything the second time.

use super::{DockLayout, NodeId, NodeKind, PaneKind};

impl<C> DockLayout<C> {
    /// Remove every empty structural node that nothing points back at.
    pub fn collect_garbage(&mut self) {
        let mut removed = 0usize;
        loop {
            self.clear_unrooted_previous_containers();
            let progressed = self.collect_empty_pane()
                || self.collect_empty_pane_group()
                || self.collect_empty_panel()
                || self.collect_empty_floating_window()
                || self.collect_empty_anchor_group();
            if !progressed {
                break;
            }
            removed += 1;
        }
        let collapsed = self.collapse_nested_pane_groups();
        self.drop_unrooted_focus();
        if removed > 0 || collapsed > 0 {
            tracing::debug!(removed, collapsed, "layout garbage collected");
            self.request_layout_pass();
        }
    }

    /// Nodes carrying a restore target, rooted ones only.
    fn rooted_referrers(&self) -> Vec<NodeId> {
        self.rooted_nodes()
            .filter(|id| {
                self.nodes
                    .get(*id)
                    .is_some_and(|node| node.data.previous().is_some())
            })
            .collect()
    }

    fn is_referenced(&self, container: NodeId) -> bool {
        self.rooted_referrers()
            .into_iter()
            .any(|id| self.previous_container(id).map(|p| p.container) == Some(container))
    }

    /// Main-tree document pane that is the only one left; never collected.
    pub(crate) fn is_protected_document_pane(&self, pane: NodeId) -> bool {
        if self.kind(pane) != Some(NodeKind::Pane(PaneKind::Document)) || self.is_floating(pane) {
            return false;
        }
        !self
            .main_document_panes()
            .into_iter()
            .any(|other| other != pane)
    }

    fn clear_unrooted_previous_containers(&mut self) {
        for id in self.rooted_referrers() {
            let Some(previous) = self.previous_container(id) else {
                // Target was disposed; drop the stale handle.
                let _ = self.set_previous_container(id, None);
                continue;
            };
            if !self.is_rooted(previous.container) {
                let _ = self.set_previous_container(id, None);
            }
        }
    }

    fn collect_empty_pane(&mut self) -> bool {
        let empty: Vec<NodeId> = self
            .rooted_nodes()
            .filter(|id| self.kind(*id).is_some_and(NodeKind::is_pane))
            .filter(|id| self.children(*id).is_empty())
            .collect();

        for pane in empty {
            // Docked content does not keep an empty pane alive. Hidden
            // anchorables still do so they can be shown in place.
            for referrer in self.rooted_referrers() {
                let is_content = self.kind(referrer).is_some_and(NodeKind::is_content);
                let hidden_anchorable =
                    self.kind(referrer) == Some(NodeKind::Anchorable) && !self.is_visible(referrer);
                if is_content
                    && !hidden_anchorable
                    && !self.is_floating(referrer)
                    && self.previous_container(referrer).map(|p| p.container) == Some(pane)
                {
                    let _ = self.set_previous_container(referrer, None);
                }
            }

            if self.is_protected_document_pane(pane) || self.is_referenced(pane) {
                continue;
            }

            if self.kind(pane) == Some(NodeKind::Pane(PaneKind::Document))
                && let Some(window) = self.floating_window_of(pane)
                && !self.descendants(window).any(|other| {
                    other != pane && self.kind(other) == Some(NodeKind::Pane(PaneKind::Document))
                })
                && let Some(panel) = self.root_panel()
            {
                let index = self
                    .children(panel)
                    .iter()
                    .position(|child| {
                        self.kind(*child) == Some(NodeKind::PaneGroup(PaneKind::Document))
                    })
                    .unwrap_or(0);
                tracing::trace!(pane = ?pane, "relocating last floating document pane");
                self.detach(pane);
                self.attach(panel, index, pane);
                return true;
            }

            self.remove_and_dispose(pane);
            return true;
        }
        false
    }

    fn collect_empty_pane_group(&mut self) -> bool {
        let group = self.rooted_nodes().find(|id| {
            matches!(self.kind(*id), Some(NodeKind::PaneGroup(_)))
                && self.children(*id).is_empty()
                && !self.is_referenced(*id)
        });
        group.is_some_and(|group| self.remove_and_dispose(group))
    }

    fn collect_empty_panel(&mut self) -> bool {
        let root_panel = self.root_panel();
        if let Some(panel) = root_panel
            && self.children(panel).is_empty()
        {
            let pane = self.new_pane(PaneKind::Document);
            self.attach(panel, 0, pane);
            tracing::trace!("refilled empty root panel with a document pane");
            return true;
        }
        let panel = self.rooted_nodes().find(|id| {
            Some(*id) != root_panel
                && self.kind(*id) == Some(NodeKind::Panel)
                && self.children(*id).is_empty()
                && !self.is_referenced(*id)
        });
        panel.is_some_and(|panel| self.remove_and_dispose(panel))
    }

    fn collect_empty_floating_window(&mut self) -> bool {
        let window = self
            .floating_windows()
            .into_iter()
            .find(|id| self.children(*id).is_empty());
        window.is_some_and(|window| self.remove_and_dispose(window))
    }

    fn collect_empty_anchor_group(&mut self) -> bool {
        let group = self.rooted_nodes().find(|id| {
            self.kind(*id) == Some(NodeKind::AnchorGroup)
                && self.children(*id).is_empty()
                && !self.is_referenced(*id)
        });
        group.is_some_and(|group| self.remove_and_dispose(group))
    }

    fn remove_and_dispose(&mut self, id: NodeId) -> bool {
        tracing::trace!(node = ?id, kind = ?self.kind(id), "collecting empty node");
        if self.detach(id).is_none() {
            return false;
        }
        self.forget_references_into(id);
        self.dispose(id).is_ok()
    }

    /// Fold a pane group whose only child is a pane group of the same kind
    /// into itself. Returns how many groups were folded.
    fn collapse_nested_pane_groups(&mut self) -> usize {
        let mut collapsed = 0;
        loop {
            let candidate = self.rooted_nodes().find_map(|outer| {
                let NodeKind::PaneGroup(kind) = self.kind(outer)? else {
                    return None;
                };
                match self.children(outer) {
                    [inner] if self.kind(*inner) == Some(NodeKind::PaneGroup(kind)) => {
                        Some((outer, *inner))
                    }
                    _ => None,
                }
            });
            let Some((outer, inner)) = candidate else {
                break;
            };
            if let Some(orientation) = self.orientation(inner) {
                let _ = self.set_orientation(outer, orientation);
            }
            self.detach(inner);
            for (index, child) in self.children(inner).to_vec().into_iter().enumerate() {
                self.detach(child);
                self.attach(outer, index, child);
            }
            self.retarget_references(inner, outer);
            let _ = self.dispose(inner);
            collapsed += 1;
        }
        collapsed
    }

    fn retarget_references(&mut self, from: NodeId, to: NodeId) {
        for node in self.nodes.values_mut() {
            if let Some(Some(previous)) = node.data.previous_mut()
                && previous.container == from
            {
                previous.container = to;
            }
        }
    }

    fn drop_unrooted_focus(&mut self) {
        if self
            .active_content()
            .is_some_and(|active| !self.is_rooted(active))
        {
            self.set_active_content(None);
        }
        if self
            .last_focused_document()
            .is_some_and(|doc| !self.is_rooted(doc))
        {
            self.last_focused_document = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnchorSide, Orientation, PreviousContainer};

    #[test]
    fn sole_document_pane_survives_empty() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        layout.collect_garbage();
        assert!(layout.contains(pane));
        assert_eq!(layout.main_document_panes(), vec![pane]);
    }

    #[test]
    fn empty_structure_is_removed_bottom_up() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let column = layout.new_panel(Orientation::Vertical);
        let group = layout.new_pane_group(PaneKind::Anchorable, Orientation::Vertical);
        let pane = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, column).unwrap();
        layout.push_child(column, group).unwrap();
        layout.push_child(group, pane).unwrap();

        layout.collect_garbage();
        assert!(!layout.contains(pane));
        assert!(!layout.contains(group));
        assert!(!layout.contains(column));
        assert_eq!(layout.children(panel).len(), 1);
    }

    #[test]
    fn referenced_pane_is_kept_for_hidden_anchorable() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let pane = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, pane).unwrap();
        let tool = layout.new_anchorable("tool");
        layout.push_child(pane, tool).unwrap();
        layout.hide(tool).unwrap();

        layout.collect_garbage();
        assert!(layout.contains(pane));
        assert_eq!(
            layout.previous_container(tool),
            Some(PreviousContainer {
                container: pane,
                index: 0
            })
        );
    }

    #[test]
    fn docked_content_does_not_pin_empty_pane() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let doc_pane = layout.first_document_pane().unwrap();
        let pane = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, pane).unwrap();
        let tool = layout.new_anchorable("tool");
        layout.push_child(doc_pane, tool).unwrap();
        layout
            .set_previous_container(
                tool,
                Some(PreviousContainer {
                    container: pane,
                    index: 0,
                }),
            )
            .unwrap();

        layout.collect_garbage();
        assert!(!layout.contains(pane));
        assert_eq!(layout.previous_container(tool), None);
    }

    #[test]
    fn unrooted_restore_targets_are_cleared() {
        let mut layout: DockLayout = DockLayout::new();
        let doc_pane = layout.first_document_pane().unwrap();
        let stray = layout.new_pane(PaneKind::Document);
        let doc = layout.new_document("a");
        layout.push_child(doc_pane, doc).unwrap();
        layout
            .set_previous_container(
                doc,
                Some(PreviousContainer {
                    container: stray,
                    index: 3,
                }),
            )
            .unwrap();
        layout.collect_garbage();
        assert_eq!(layout.previous_container(doc), None);
    }

    #[test]
    fn unreferenced_empty_anchor_group_is_removed() {
        let mut layout: DockLayout = DockLayout::new();
        let side = layout.anchor_side(AnchorSide::Left);
        let group = layout.new_anchor_group();
        layout.push_child(side, group).unwrap();
        layout.collect_garbage();
        assert!(layout.anchor_groups(AnchorSide::Left).is_empty());
    }

    #[test]
    fn nested_pane_groups_collapse() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let outer = layout.new_pane_group(PaneKind::Anchorable, Orientation::Horizontal);
        let inner = layout.new_pane_group(PaneKind::Anchorable, Orientation::Vertical);
        let top = layout.new_pane(PaneKind::Anchorable);
        let bottom = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, outer).unwrap();
        layout.push_child(outer, inner).unwrap();
        layout.push_child(inner, top).unwrap();
        layout.push_child(inner, bottom).unwrap();
        for pane in [top, bottom] {
            let tool = layout.new_anchorable("t");
            layout.push_child(pane, tool).unwrap();
        }

        layout.collect_garbage();
        assert!(!layout.contains(inner));
        assert_eq!(layout.children(outer), &[top, bottom]);
        assert_eq!(layout.orientation(outer), Some(Orientation::Vertical));
    }

    #[test]
    fn collection_is_idempotent() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let pane = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, pane).unwrap();
        let tool = layout.new_anchorable("tool");
        layout.push_child(pane, tool).unwrap();
        layout.toggle_auto_hide(tool).unwrap();

        layout.collect_garbage();
        let first = layout.dump();
        let count = layout.node_count();
        layout.collect_garbage();
        assert_eq!(layout.dump(), first);
        assert_eq!(layout.node_count(), count);
    }

    #[test]
    fn closing_last_floating_document_leaves_one_main_document_pane() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let doc = layout.new_document("draft.md");
        layout.push_child(pane, doc).unwrap();
        let window = layout.float(doc).unwrap().unwrap();

        assert_eq!(layout.close(doc), Ok(true));
        assert!(!layout.contains(window));
        assert!(layout.floating_windows().is_empty());
        assert_eq!(layout.main_document_panes().len(), 1);

        let first = layout.dump();
        let count = layout.node_count();
        layout.collect_garbage();
        assert_eq!(layout.dump(), first);
        assert_eq!(layout.node_count(), count);
    }

    #[test]
    fn last_floating_document_pane_moves_into_root_panel() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let main_pane = layout.first_document_pane().unwrap();
        let tools = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, tools).unwrap();
        let tool = layout.new_anchorable("tool");
        layout.push_child(tools, tool).unwrap();
        let doc = layout.new_document("draft.md");
        layout.push_child(main_pane, doc).unwrap();

        let window = layout.float(doc).unwrap().unwrap();
        let floating_pane = layout.parent(doc).unwrap();
        layout.remove_child(panel, main_pane).unwrap();
        assert!(layout.main_document_panes().is_empty());

        assert_eq!(layout.close(doc), Ok(true));
        assert!(!layout.contains(window));
        assert_eq!(layout.parent(floating_pane), Some(panel));
        assert_eq!(layout.children(panel), &[floating_pane, tools]);
        assert_eq!(layout.main_document_panes(), vec![floating_pane]);

        let first = layout.dump();
        layout.collect_garbage();
        assert_eq!(layout.dump(), first);
    }
}
