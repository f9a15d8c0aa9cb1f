//! Child list mutation shared by every container node.
//!
//! All structural edits funnel through [`DockLayout::attach`] and
//! [`DockLayout::detach`]. Those two keep parent links, pane selection, and
//! visibility aggregation consistent and queue the change notifications.
//! Public entry points validate first so a rejected call leaves the tree
//! untouched.

use crate::error::{LayoutError, LayoutResult};

use super::events::{LayoutEvent, Property, TreeChange};
use super::{DockLayout, NodeData, NodeId, NodeKind, PaneKind};

impl<C> DockLayout<C> {
    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|id| *id == child)
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.is_visible)
    }

    /// Insert `child` into `parent` at `index`, detaching it from wherever it
    /// currently lives. Re-inserting into the same parent moves it.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> LayoutResult<()> {
        self.validate_insert(parent, child, None)?;
        let len = self.children_count(parent);
        if let Some(from) = self.index_of(parent, child) {
            return self.move_child(parent, from, index);
        }
        if index > len {
            return Err(LayoutError::IndexOutOfRange { index, len });
        }
        self.detach(child);
        self.attach(parent, index, child);
        Ok(())
    }

    pub fn push_child(&mut self, parent: NodeId, child: NodeId) -> LayoutResult<()> {
        let len = self.children_count(parent);
        let index = match self.index_of(parent, child) {
            Some(_) => len.saturating_sub(1),
            None => len,
        };
        self.insert_child(parent, index, child)
    }

    /// Remove the child at `index`. The removed subtree stays in the arena,
    /// detached, until it is reinserted or disposed.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> LayoutResult<NodeId> {
        let len = self.node(parent)?.children.len();
        let child = *self
            .children(parent)
            .get(index)
            .ok_or(LayoutError::IndexOutOfRange { index, len })?;
        self.guard_fixed_slot(parent, child)?;
        self.detach(child);
        self.forget_references_into(child);
        Ok(child)
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> LayoutResult<usize> {
        let index = self
            .index_of(parent, child)
            .ok_or(LayoutError::NotChild { parent, child })?;
        self.remove_child_at(parent, index)?;
        Ok(index)
    }

    /// Put `new` where `old` sits. `old` ends up detached.
    pub fn replace_child(&mut self, old: NodeId, new: NodeId) -> LayoutResult<()> {
        let parent = self.parent(old).ok_or(LayoutError::Detached(old))?;
        if old == new {
            return Ok(());
        }
        self.validate_insert(parent, new, Some(old))?;
        self.detach(new);
        let index = self
            .index_of(parent, old)
            .ok_or(LayoutError::NotChild { parent, child: old })?;
        self.detach(old);
        self.attach(parent, index, new);
        self.forget_references_into(old);
        if parent == self.root && self.kind(new) == Some(NodeKind::Panel) {
            self.events.property_changed(self.root, Property::RootPanel);
        }
        Ok(())
    }

    /// Reorder within one parent. Only the direct children notification
    /// fires; ancestors see no structural change.
    pub fn move_child(&mut self, parent: NodeId, from: usize, to: usize) -> LayoutResult<()> {
        let len = self.node(parent)?.children.len();
        for index in [from, to] {
            if index >= len {
                return Err(LayoutError::IndexOutOfRange { index, len });
            }
        }
        if from == to {
            return Ok(());
        }
        let node = self.node_mut(parent)?;
        let child = node.children.remove(from);
        node.children.insert(to, child);
        if let NodeData::Pane(_, pane) = &mut node.data {
            pane.selected = pane.selected.map(|selected| {
                if selected == from {
                    to
                } else if from < selected && to >= selected {
                    selected - 1
                } else if from > selected && to <= selected {
                    selected + 1
                } else {
                    selected
                }
            });
        }
        self.events.push(LayoutEvent::ChildrenChanged { group: parent });
        self.events.push(LayoutEvent::ChildrenTreeChanged {
            group: parent,
            change: TreeChange::DirectChildrenChanged,
        });
        self.events.mark_dirty();
        Ok(())
    }

    fn validate_insert(
        &self,
        parent: NodeId,
        child: NodeId,
        replacing: Option<NodeId>,
    ) -> LayoutResult<()> {
        let parent_kind = self.kind_of(parent)?;
        let child_kind = self.kind_of(child)?;
        if !parent_kind.accepts(child_kind) {
            return Err(LayoutError::InvalidChild {
                parent: parent_kind,
                child: child_kind,
            });
        }
        if parent == child || self.is_descendant_of(parent, child) {
            return Err(LayoutError::CycleDetected(child));
        }
        let occupied = |existing: Option<NodeId>| {
            existing.is_some_and(|existing| existing != child && Some(existing) != replacing)
        };
        let slot_taken = match parent_kind {
            NodeKind::Root if child_kind == NodeKind::Panel => occupied(self.root_panel()),
            NodeKind::FloatingWindow(_) => occupied(self.children(parent).first().copied()),
            _ => false,
        };
        if slot_taken {
            return Err(LayoutError::InvalidChild {
                parent: parent_kind,
                child: child_kind,
            });
        }
        Ok(())
    }

    fn guard_fixed_slot(&self, parent: NodeId, child: NodeId) -> LayoutResult<()> {
        if parent != self.root {
            return Ok(());
        }
        match self.kind(child) {
            Some(NodeKind::AnchorSide(_) | NodeKind::Panel) => Err(LayoutError::FixedSlot(child)),
            _ => Ok(()),
        }
    }

    /// Unlink `child` from its parent. Returns the former parent and index.
    pub(crate) fn detach(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes.get(child)?.parent?;
        let was_rooted = self.is_rooted(parent);
        let index = self.index_of(parent, child)?;
        let parent_node = self.nodes.get_mut(parent)?;
        parent_node.children.remove(index);
        let remaining = parent_node.children.len();
        if let NodeData::Pane(_, pane) = &mut parent_node.data {
            pane.selected = match pane.selected {
                _ if remaining == 0 => None,
                Some(selected) if selected == index => Some(index.min(remaining - 1)),
                Some(selected) if selected > index => Some(selected - 1),
                other => other,
            };
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = None;
        }
        if was_rooted {
            self.events.push(LayoutEvent::ElementRemoved { node: child });
        }
        self.notify_structure(parent);
        self.refresh_visibility(child);
        self.refresh_visibility(parent);
        Some((parent, index))
    }

    /// Link a detached `child` into `parent` at `index`. Callers validate.
    pub(crate) fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) {
        let Some(parent_node) = self.nodes.get_mut(parent) else {
            return;
        };
        let index = index.min(parent_node.children.len());
        parent_node.children.insert(index, child);
        if let NodeData::Pane(_, pane) = &mut parent_node.data {
            pane.selected = match pane.selected {
                None => Some(index),
                Some(selected) if index <= selected => Some(selected + 1),
                other => other,
            };
        }
        if let Some(node) = self.nodes.get_mut(child) {
            node.parent = Some(parent);
        }
        if self.is_rooted(parent) {
            self.events.push(LayoutEvent::ElementAdded { node: child });
        }
        self.notify_structure(parent);
        self.refresh_visibility(child);
        self.refresh_visibility(parent);
    }

    fn notify_structure(&mut self, parent: NodeId) {
        self.events.push(LayoutEvent::ChildrenChanged { group: parent });
        self.events.push(LayoutEvent::ChildrenTreeChanged {
            group: parent,
            change: TreeChange::DirectChildrenChanged,
        });
        let ancestors: Vec<NodeId> = self.ancestors(parent).skip(1).collect();
        for ancestor in ancestors {
            self.events.push(LayoutEvent::ChildrenTreeChanged {
                group: ancestor,
                change: TreeChange::TreeChanged,
            });
        }
        self.events.mark_dirty();
    }

    fn compute_visibility(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(id) else {
            return false;
        };
        let any_visible_child = || node.children.iter().any(|child| self.is_visible(*child));
        match node.data.kind() {
            NodeKind::Root => true,
            NodeKind::Panel
            | NodeKind::PaneGroup(_)
            | NodeKind::Pane(PaneKind::Anchorable)
            | NodeKind::FloatingWindow(_) => any_visible_child(),
            NodeKind::Pane(PaneKind::Document) => {
                let in_group = node.parent.and_then(|parent| self.kind(parent))
                    == Some(NodeKind::PaneGroup(PaneKind::Document));
                !in_group || any_visible_child()
            }
            NodeKind::Document | NodeKind::Anchorable => {
                node.parent.is_some_and(|parent| parent != self.root)
            }
            NodeKind::AnchorSide(_) | NodeKind::AnchorGroup => !node.children.is_empty(),
        }
    }

    /// Recompute visibility for `id` and then every ancestor up to the top.
    pub(crate) fn refresh_visibility(&mut self, id: NodeId) {
        let chain: Vec<NodeId> = self.ancestors(id).collect();
        for node in chain {
            let visible = self.compute_visibility(node);
            let Some(entry) = self.nodes.get_mut(node) else {
                continue;
            };
            if entry.is_visible != visible {
                self.events.property_changing(node, Property::IsVisible);
                entry.is_visible = visible;
                self.events.property_changed(node, Property::IsVisible);
            }
        }
    }

    /// Drop active/last-focused handles that point into a subtree leaving
    /// the layout for good.
    pub(crate) fn forget_references_into(&mut self, removed: NodeId) {
        if self
            .active_content
            .is_some_and(|active| active == removed || self.is_descendant_of(active, removed))
        {
            self.set_active_content(None);
        }
        if self
            .last_focused_document
            .is_some_and(|doc| doc == removed || self.is_descendant_of(doc, removed))
        {
            self.last_focused_document = None;
            self.events
                .property_changed(self.root, Property::LastFocusedDocument);
        }
    }

    /// Selected child index of a pane.
    pub fn selected_index(&self, pane: NodeId) -> Option<usize> {
        match &self.nodes.get(pane)?.data {
            NodeData::Pane(_, state) => state.selected,
            _ => None,
        }
    }

    pub fn selected_content(&self, pane: NodeId) -> Option<NodeId> {
        let index = self.selected_index(pane)?;
        self.children(pane).get(index).copied()
    }

    pub fn set_selected_index(&mut self, pane: NodeId, index: usize) -> LayoutResult<()> {
        let len = self.node(pane)?.children.len();
        if index >= len {
            return Err(LayoutError::IndexOutOfRange { index, len });
        }
        let previous = self.selected_content(pane);
        let node = self.node_mut(pane)?;
        let NodeData::Pane(_, state) = &mut node.data else {
            return Err(LayoutError::NotPane(pane));
        };
        if state.selected == Some(index) {
            return Ok(());
        }
        state.selected = Some(index);
        let selected = node.children[index];
        if let Some(previous) = previous {
            self.events.property_changed(previous, Property::IsSelected);
        }
        self.events.property_changed(selected, Property::IsSelected);
        self.events.property_changed(pane, Property::SelectedIndex);
        self.events.mark_dirty();
        Ok(())
    }
}
