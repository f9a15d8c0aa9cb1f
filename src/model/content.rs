//! Documents and anchorables, and the transitions between docked, floating,
//! hidden, auto-hidden, and closed.
//!
//! Every transition validates before it touches the tree, runs the garbage
//! collector once the move is done, and schedules a layout pass.

use crate::constants::{DEFAULT_AUTO_HIDE_MIN_SIZE, DEFAULT_AUTO_HIDE_SIZE};
use crate::error::{LayoutError, LayoutResult};
use crate::layout::DockRect;

use super::events::{LayoutEvent, Property};
use super::{AnchorSide, DockLayout, NodeData, NodeId, NodeKind, Orientation, PaneKind};

/// Where a content item (or auto-hide group) goes back to when restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousContainer {
    pub container: NodeId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnchorableState {
    pub can_hide: bool,
    pub can_auto_hide: bool,
    pub auto_hide_width: f64,
    pub auto_hide_height: f64,
    pub auto_hide_min_width: f64,
    pub auto_hide_min_height: f64,
}

impl Default for AnchorableState {
    fn default() -> Self {
        Self {
            can_hide: true,
            can_auto_hide: true,
            auto_hide_width: DEFAULT_AUTO_HIDE_SIZE,
            auto_hide_height: DEFAULT_AUTO_HIDE_SIZE,
            auto_hide_min_width: DEFAULT_AUTO_HIDE_MIN_SIZE,
            auto_hide_min_height: DEFAULT_AUTO_HIDE_MIN_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentRole {
    Document,
    Anchorable(AnchorableState),
}

/// State derived from the container currently holding a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStatus {
    Docked,
    Floating,
    Hidden,
    AutoHidden,
    Closed,
}

#[derive(Debug, Clone)]
pub struct ContentState<C> {
    pub(crate) role: ContentRole,
    title: String,
    /// Host payload.
    pub content: Option<C>,
    /// Stable identity key used by hosts to match persisted layouts.
    pub content_id: Option<String>,
    pub can_close: bool,
    pub can_float: bool,
    /// Remembered floating placement; zero sizes mean "not yet floated".
    pub floating: DockRect,
    pub is_maximized: bool,
    pub(crate) previous: Option<PreviousContainer>,
    pub(crate) last_activation: u64,
}

impl<C> ContentState<C> {
    pub(crate) fn new(role: ContentRole, title: String) -> Self {
        Self {
            role,
            title,
            content: None,
            content_id: None,
            can_close: true,
            can_float: true,
            floating: DockRect::default(),
            is_maximized: false,
            previous: None,
            last_activation: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn role(&self) -> &ContentRole {
        &self.role
    }

    pub fn is_document(&self) -> bool {
        matches!(self.role, ContentRole::Document)
    }

    pub fn anchorable(&self) -> Option<&AnchorableState> {
        match &self.role {
            ContentRole::Anchorable(state) => Some(state),
            ContentRole::Document => None,
        }
    }

    pub fn anchorable_mut(&mut self) -> Option<&mut AnchorableState> {
        match &mut self.role {
            ContentRole::Anchorable(state) => Some(state),
            ContentRole::Document => None,
        }
    }

    /// Monotonic stamp of the last activation; 0 when never activated.
    pub fn last_activation(&self) -> u64 {
        self.last_activation
    }

    fn pane_kind(&self) -> PaneKind {
        match self.role {
            ContentRole::Document => PaneKind::Document,
            ContentRole::Anchorable(_) => PaneKind::Anchorable,
        }
    }
}

/// Containers that hold content directly.
fn holds_content(kind: Option<NodeKind>) -> bool {
    matches!(kind, Some(NodeKind::Pane(_) | NodeKind::AnchorGroup))
}

impl<C> DockLayout<C> {
    pub fn content(&self, id: NodeId) -> Option<&ContentState<C>> {
        match &self.nodes.get(id)?.data {
            NodeData::Content(state) => Some(state),
            _ => None,
        }
    }

    pub fn content_mut(&mut self, id: NodeId) -> Option<&mut ContentState<C>> {
        match &mut self.nodes.get_mut(id)?.data {
            NodeData::Content(state) => Some(state),
            _ => None,
        }
    }

    fn content_state(&self, id: NodeId) -> LayoutResult<&ContentState<C>> {
        self.node(id)?;
        self.content(id).ok_or(LayoutError::NotContent(id))
    }

    fn anchorable_state(&self, id: NodeId) -> LayoutResult<&AnchorableState> {
        self.content_state(id)?
            .anchorable()
            .ok_or(LayoutError::NotAnchorable(id))
    }

    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) -> LayoutResult<bool> {
        let title = title.into();
        self.content_state(id)?;
        let Some(state) = self.content_mut(id) else {
            return Err(LayoutError::NotContent(id));
        };
        if state.title == title {
            return Ok(false);
        }
        state.title = title;
        self.events.property_changed(id, Property::Title);
        self.events.mark_dirty();
        Ok(true)
    }

    pub fn status(&self, id: NodeId) -> ContentStatus {
        let Some(parent) = self.parent(id) else {
            return ContentStatus::Closed;
        };
        if !self.is_rooted(id) {
            ContentStatus::Closed
        } else if parent == self.root {
            ContentStatus::Hidden
        } else if self.kind(parent) == Some(NodeKind::AnchorGroup) {
            ContentStatus::AutoHidden
        } else if self.is_floating(id) {
            ContentStatus::Floating
        } else {
            ContentStatus::Docked
        }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Anchorable) && self.parent(id) == Some(self.root)
    }

    pub fn is_auto_hidden(&self, id: NodeId) -> bool {
        self.parent(id)
            .is_some_and(|parent| self.kind(parent) == Some(NodeKind::AnchorGroup))
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.parent(id)
            .is_some_and(|pane| self.selected_content(pane) == Some(id))
    }

    /// Restore target of a content item or auto-hide group. Targets that
    /// were disposed read as `None`.
    pub fn previous_container(&self, id: NodeId) -> Option<PreviousContainer> {
        self.nodes
            .get(id)?
            .data
            .previous()
            .filter(|previous| self.nodes.contains_key(previous.container))
    }

    pub fn set_previous_container(
        &mut self,
        id: NodeId,
        previous: Option<PreviousContainer>,
    ) -> LayoutResult<()> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or(LayoutError::UnknownNode(id))?;
        let slot = node
            .data
            .previous_mut()
            .ok_or(LayoutError::NotContent(id))?;
        if *slot != previous {
            *slot = previous;
            self.events.property_changed(id, Property::PreviousContainer);
        }
        Ok(())
    }

    fn slot_of(&self, id: NodeId) -> Option<PreviousContainer> {
        let parent = self.parent(id)?;
        Some(PreviousContainer {
            container: parent,
            index: self.index_of(parent, id)?,
        })
    }

    /// Select `id` within its pane. No-op for content outside a pane.
    pub fn select(&mut self, id: NodeId) -> LayoutResult<()> {
        self.content_state(id)?;
        let Some(parent) = self.parent(id) else {
            return Ok(());
        };
        if !self.kind(parent).is_some_and(NodeKind::is_pane) {
            return Ok(());
        }
        let index = self
            .index_of(parent, id)
            .ok_or(LayoutError::NotChild { parent, child: id })?;
        self.set_selected_index(parent, index)
    }

    /// Select `id` and make it the active content.
    pub fn activate(&mut self, id: NodeId) -> LayoutResult<()> {
        self.select(id)?;
        self.set_active_content(Some(id));
        Ok(())
    }

    pub(crate) fn finish_transition(&mut self) {
        self.collect_garbage();
        self.request_layout_pass();
    }

    /// Put content back into the main tree: its previous container when one
    /// is still around, otherwise the default placement.
    pub fn dock(&mut self, id: NodeId) -> LayoutResult<()> {
        let kind = self.content_state(id)?.pane_kind();
        let leaving_floating = self.is_floating(id);
        let current = self
            .slot_of(id)
            .filter(|slot| holds_content(self.kind(slot.container)));

        tracing::debug!(content = ?id, floating = leaving_floating, "docking content");
        match self.restore_target(id, kind) {
            Some(previous) => {
                let (container, index) = self.prepare_restore(previous, kind)?;
                self.detach(id);
                let index = index.min(self.children_count(container));
                self.insert_child(container, index, id)?;
                // Content pulled out of a floating window remembers it so a
                // later float lands in the same window.
                let back = if leaving_floating { current } else { None };
                self.set_previous_container(id, back)?;
                self.activate(id)?;
            }
            None => self.internal_dock(id)?,
        }
        self.finish_transition();
        Ok(())
    }

    /// Previous container that can still take `id` back.
    fn restore_target(&self, id: NodeId, kind: PaneKind) -> Option<PreviousContainer> {
        let previous = self.previous_container(id)?;
        if !self.is_rooted(previous.container) {
            return None;
        }
        let content_kind = self.kind(id)?;
        let fits = match self.kind(previous.container)? {
            NodeKind::Panel => true,
            NodeKind::PaneGroup(group) => group == kind,
            container => container.accepts(content_kind),
        };
        fits.then_some(previous)
    }

    /// Resolve a restore target to a pane and index. A group target (left
    /// behind when the content's pane was collected) gets a fresh pane.
    fn prepare_restore(
        &mut self,
        previous: PreviousContainer,
        kind: PaneKind,
    ) -> LayoutResult<(NodeId, usize)> {
        let container = previous.container;
        if !self.kind_of(container)?.is_orientable() {
            return Ok((container, previous.index));
        }
        let pane = self.new_pane(kind);
        let index = previous.index.min(self.children_count(container));
        self.insert_child(container, index, pane)?;
        Ok((pane, 0))
    }

    fn internal_dock(&mut self, id: NodeId) -> LayoutResult<()> {
        match self.kind_of(id)? {
            NodeKind::Anchorable => {
                let target = self.default_anchorable_target(id);
                if !self.strategy_before_insert(id, target) {
                    self.place_anchorable(id, target)?;
                }
                self.strategy_after_insert(id);
            }
            _ => {
                let target = self.default_document_target(id);
                if !self.strategy_before_insert(id, target) {
                    let pane = target.ok_or(LayoutError::NoDocumentPane)?;
                    self.push_child(pane, id)?;
                }
                self.strategy_after_insert(id);
            }
        }
        if self.parent(id).is_some() {
            self.activate(id)?;
        }
        Ok(())
    }

    /// Default pane for an anchorable: the active content's anchorable
    /// pane, then a docked right-side pane, then any anchorable pane.
    pub(crate) fn default_anchorable_target(&self, id: NodeId) -> Option<NodeId> {
        let own_pane = self.parent(id);
        let is_tool_pane = |pane: &NodeId| {
            Some(*pane) != own_pane && self.kind(*pane) == Some(NodeKind::Pane(PaneKind::Anchorable))
        };
        if let Some(pane) = self
            .active_content()
            .filter(|active| *active != id)
            .and_then(|active| self.parent(active))
            .filter(is_tool_pane)
        {
            return Some(pane);
        }
        let panes: Vec<NodeId> = self
            .nodes_of_kind(NodeKind::Pane(PaneKind::Anchorable))
            .into_iter()
            .filter(is_tool_pane)
            .collect();
        panes
            .iter()
            .copied()
            .find(|pane| !self.is_floating(*pane) && self.side_of(*pane) == AnchorSide::Right)
            .or_else(|| panes.first().copied())
    }

    pub(crate) fn default_document_target(&self, id: NodeId) -> Option<NodeId> {
        self.last_focused_document()
            .filter(|doc| *doc != id)
            .and_then(|doc| self.parent(doc))
            .filter(|pane| {
                self.kind(*pane) == Some(NodeKind::Pane(PaneKind::Document))
                    && !self.is_floating(*pane)
            })
            .or_else(|| self.first_document_pane())
    }

    /// Append an anchorable to `target`, or to a new fixed-width pane on the
    /// right edge of a new horizontal root panel when there is no target.
    pub(crate) fn place_anchorable(&mut self, id: NodeId, target: Option<NodeId>) -> LayoutResult<()> {
        let pane = match target {
            Some(pane) => pane,
            None => {
                let pane = self.new_pane(PaneKind::Anchorable);
                let width = self.options.new_pane_width;
                self.set_dock_width(pane, super::GridLength::Absolute(width))?;
                let panel = self.new_panel(Orientation::Horizontal);
                self.wrap_root_panel(panel, pane, false)?;
                tracing::debug!(pane = ?pane, "created anchorable pane for docking");
                pane
            }
        };
        self.push_child(pane, id)
    }

    /// Make `panel` the root panel with the old root panel and `pane` as its
    /// two children. `leading` puts `pane` first.
    fn wrap_root_panel(&mut self, panel: NodeId, pane: NodeId, leading: bool) -> LayoutResult<()> {
        let root = self.root;
        let old = self.root_panel();
        if let Some(old) = old {
            self.detach(old);
        }
        self.attach(root, 0, panel);
        let mut cells = vec![pane];
        if let Some(old) = old {
            if leading {
                cells.push(old);
            } else {
                cells.insert(0, old);
            }
        }
        for cell in cells {
            self.push_child(panel, cell)?;
        }
        self.events.property_changed(root, Property::RootPanel);
        Ok(())
    }

    /// Put `pane` on the `side` edge of the root panel, splitting the root
    /// panel when its orientation does not match the edge.
    fn attach_at_edge(&mut self, pane: NodeId, side: AnchorSide) -> LayoutResult<()> {
        let orientation = side.orientation();
        match self.root_panel() {
            Some(panel) if self.orientation(panel) == Some(orientation) => {
                let index = if side.is_leading() {
                    0
                } else {
                    self.children_count(panel)
                };
                self.insert_child(panel, index, pane)
            }
            _ => {
                let panel = self.new_panel(orientation);
                self.wrap_root_panel(panel, pane, side.is_leading())
            }
        }
    }

    /// Detach into a new floating window, or back into the floating window
    /// the content was last docked out of. Returns the hosting window, or
    /// `None` when the content cannot float.
    pub fn float(&mut self, id: NodeId) -> LayoutResult<Option<NodeId>> {
        if !self.content_state(id)?.can_float {
            tracing::debug!(content = ?id, "float skipped: content cannot float");
            return Ok(None);
        }
        if self.is_auto_hidden(id) {
            self.toggle_auto_hide(id)?;
        }
        let slot = self.slot_of(id).ok_or(LayoutError::NotInPane(id))?;
        if !self.kind(slot.container).is_some_and(NodeKind::is_pane) {
            return Err(LayoutError::NotInPane(id));
        }

        let reuse = self
            .previous_container(id)
            .filter(|previous| !self.is_floating(id) && self.is_floating(previous.container))
            .filter(|previous| self.is_rooted(previous.container))
            .filter(|previous| {
                let kind = self.kind(previous.container);
                kind.zip(self.kind(id))
                    .is_some_and(|(container, content)| container.accepts(content))
            });

        let window = match reuse {
            Some(previous) => {
                tracing::debug!(content = ?id, pane = ?previous.container, "floating back into previous window");
                self.detach(id);
                let index = previous.index.min(self.children_count(previous.container));
                self.insert_child(previous.container, index, id)?;
                self.set_previous_container(id, Some(slot))?;
                self.activate(id)?;
                self.floating_window_of(id)
            }
            None => {
                let window = self.float_content(id, slot.container, slot.index)?;
                self.activate(id)?;
                Some(window)
            }
        };
        self.finish_transition();
        Ok(window)
    }

    /// Move an anchorable into the root's hidden list, remembering where it
    /// was. Returns false when nothing was hidden.
    pub fn hide(&mut self, id: NodeId) -> LayoutResult<bool> {
        let can_hide = self.anchorable_state(id)?.can_hide;
        if !self.is_visible(id) {
            if self.is_rooted(id) {
                self.activate(id)?;
            }
            return Ok(false);
        }
        if !can_hide {
            tracing::debug!(content = ?id, "hide skipped: anchorable cannot hide");
            return Ok(false);
        }
        if !self.host_allows_hiding(id) {
            tracing::debug!(content = ?id, "hide canceled by host");
            return Ok(false);
        }
        self.events.property_changing(id, Property::IsHidden);
        if let Some(slot) = self.slot_of(id) {
            self.set_previous_container(id, Some(slot))?;
        }
        self.detach(id);
        let root = self.root;
        self.attach(root, self.children_count(root), id);
        self.events.property_changed(id, Property::IsHidden);
        tracing::debug!(content = ?id, "anchorable hidden");
        self.finish_transition();
        Ok(true)
    }

    /// Restore a hidden anchorable to where it was hidden from.
    pub fn show(&mut self, id: NodeId) -> LayoutResult<bool> {
        self.anchorable_state(id)?;
        if self.is_visible(id) {
            return Ok(false);
        }
        if !self.is_hidden(id) {
            return Err(LayoutError::NotHidden(id));
        }
        let previous = self.restore_target(id, PaneKind::Anchorable);
        self.events.property_changing(id, Property::IsHidden);
        if !self.strategy_before_insert(id, previous.map(|p| p.container)) {
            match previous {
                Some(previous) => {
                    let (container, index) = self.prepare_restore(previous, PaneKind::Anchorable)?;
                    self.detach(id);
                    let index = index.min(self.children_count(container));
                    self.insert_child(container, index, id)?;
                }
                None => {
                    let target = self.default_anchorable_target(id);
                    self.place_anchorable(id, target)?;
                }
            }
            self.activate(id)?;
        }
        self.strategy_after_insert(id);
        self.set_previous_container(id, None)?;
        self.events.property_changed(id, Property::IsHidden);
        tracing::debug!(content = ?id, "anchorable shown");
        self.finish_transition();
        Ok(true)
    }

    /// Move an anchorable's pane into an auto-hide group on the nearest
    /// side, or an auto-hidden group back into a docked pane.
    pub fn toggle_auto_hide(&mut self, id: NodeId) -> LayoutResult<bool> {
        let state = self.anchorable_state(id)?.clone();
        let Some(parent) = self.parent(id) else {
            return Ok(false);
        };
        match self.kind(parent) {
            Some(NodeKind::AnchorGroup) => {
                self.restore_auto_hide_group(id, parent, &state)?;
            }
            Some(NodeKind::Pane(PaneKind::Anchorable)) if !self.is_floating(parent) => {
                if !state.can_auto_hide {
                    return Ok(false);
                }
                let side = self.side_of(parent);
                let group = self.new_anchor_group();
                self.set_previous_container(
                    group,
                    Some(PreviousContainer {
                        container: parent,
                        index: 0,
                    }),
                )?;
                let side_node = self.anchor_side(side);
                self.push_child(side_node, group)?;
                for item in self.children(parent).to_vec() {
                    self.push_child(group, item)?;
                }
                tracing::debug!(pane = ?parent, side = ?side, "pane auto-hidden");
            }
            _ => return Ok(false),
        }
        self.finish_transition();
        Ok(true)
    }

    fn restore_auto_hide_group(
        &mut self,
        id: NodeId,
        group: NodeId,
        state: &AnchorableState,
    ) -> LayoutResult<()> {
        let side = match self.parent(group).and_then(|side| self.kind(side)) {
            Some(NodeKind::AnchorSide(side)) => side,
            _ => AnchorSide::Right,
        };
        let previous = self
            .previous_container(group)
            .map(|previous| previous.container)
            .filter(|pane| {
                self.is_rooted(*pane) && self.kind(*pane) == Some(NodeKind::Pane(PaneKind::Anchorable))
            });
        let pane = match previous {
            Some(pane) => {
                for node in self.nodes.values_mut() {
                    if let Some(Some(previous)) = node.data.previous_mut()
                        && previous.container == group
                    {
                        previous.container = pane;
                    }
                }
                pane
            }
            None => {
                let pane = self.new_pane(PaneKind::Anchorable);
                match side.orientation() {
                    Orientation::Horizontal => {
                        self.set_dock_min_width(pane, state.auto_hide_min_width)?
                    }
                    Orientation::Vertical => {
                        self.set_dock_min_height(pane, state.auto_hide_min_height)?
                    }
                }
                self.attach_at_edge(pane, side)?;
                pane
            }
        };
        for item in self.children(group).to_vec() {
            self.push_child(pane, item)?;
        }
        self.select(id)?;
        if let Some(side_node) = self.parent(group) {
            self.remove_child(side_node, group)?;
        }
        self.dispose(group)?;
        tracing::debug!(pane = ?pane, side = ?side, "auto-hide group docked");
        Ok(())
    }

    /// Close through the host's close command when it handles it, otherwise
    /// through the default close path for the content's role.
    pub fn close(&mut self, id: NodeId) -> LayoutResult<bool> {
        let kind = self.kind_of(id)?;
        self.content_state(id)?;
        if self.host_close_command(id) {
            tracing::debug!(content = ?id, "close handled by host");
            return Ok(true);
        }
        match kind {
            NodeKind::Anchorable => self.close_anchorable(id),
            _ => self.close_document(id),
        }
    }

    pub fn close_document(&mut self, id: NodeId) -> LayoutResult<bool> {
        if !self.content_state(id)?.can_close || !self.host_allows_closing(id) {
            tracing::debug!(content = ?id, "close canceled");
            return Ok(false);
        }
        self.close_internal(id)
    }

    pub fn close_anchorable(&mut self, id: NodeId) -> LayoutResult<bool> {
        self.anchorable_state(id)?;
        if !self.content_state(id)?.can_close || !self.host_allows_closing(id) {
            tracing::debug!(content = ?id, "close canceled");
            return Ok(false);
        }
        if self.is_auto_hidden(id) {
            self.toggle_auto_hide(id)?;
        }
        self.close_internal(id)
    }

    fn close_internal(&mut self, id: NodeId) -> LayoutResult<bool> {
        let Some(parent) = self.parent(id) else {
            return Ok(false);
        };
        if self.previous_container(id).is_none() && holds_content(self.kind(parent)) {
            let mut previous = PreviousContainer {
                container: parent,
                index: self.index_of(parent, id).unwrap_or_default(),
            };
            // The pane goes away with its last item; remember its slot in
            // the enclosing group instead.
            let pane_goes_away = self.children_count(parent) == 1
                && self.kind(parent).is_some_and(NodeKind::is_pane)
                && !self.is_protected_document_pane(parent);
            if pane_goes_away
                && let Some(grand) = self.parent(parent)
                && self.kind(grand).is_some_and(NodeKind::is_orientable)
                && let Some(index) = self.index_of(grand, parent)
            {
                previous = PreviousContainer {
                    container: grand,
                    index,
                };
            }
            self.set_previous_container(id, Some(previous))?;
        }
        self.remove_child(parent, id)?;
        tracing::debug!(content = ?id, "content closed");
        self.finish_transition();
        self.events.push(LayoutEvent::ContentClosed { content: id });
        Ok(true)
    }

    /// Move content into a document pane, preferring the pane of the last
    /// focused document.
    pub fn dock_as_document(&mut self, id: NodeId) -> LayoutResult<bool> {
        self.content_state(id)?;
        let parent = self.parent(id);
        if parent.is_some_and(|p| self.kind(p) == Some(NodeKind::Pane(PaneKind::Document))) {
            return Ok(false);
        }
        if self.previous_container(id).is_some_and(|previous| {
            self.is_rooted(previous.container)
                && self.kind(previous.container) == Some(NodeKind::Pane(PaneKind::Document))
        }) {
            self.dock(id)?;
            return Ok(true);
        }
        let Some(pane) = self.default_document_target(id) else {
            return Err(LayoutError::NoDocumentPane);
        };
        self.push_child(pane, id)?;
        self.activate(id)?;
        self.finish_transition();
        Ok(true)
    }

    /// Hide every anchorable of `pane`, but only when all of them can hide.
    pub fn hide_pane(&mut self, pane: NodeId) -> LayoutResult<bool> {
        if !self.kind_of(pane)?.is_pane() {
            return Err(LayoutError::NotPane(pane));
        }
        let items = self.children(pane).to_vec();
        let all_hideable = items.iter().all(|item| {
            self.content(*item)
                .and_then(ContentState::anchorable)
                .is_some_and(|state| state.can_hide)
        });
        if items.is_empty() || !all_hideable {
            return Ok(false);
        }
        for item in items {
            self.hide(item)?;
        }
        Ok(true)
    }

    /// Close every item of `pane`. Returns how many actually closed.
    pub fn close_all_in(&mut self, pane: NodeId) -> LayoutResult<usize> {
        if !self.kind_of(pane)?.is_pane() {
            return Err(LayoutError::NotPane(pane));
        }
        let mut closed = 0;
        for item in self.children(pane).to_vec() {
            if self.close(item)? {
                closed += 1;
            }
        }
        Ok(closed)
    }
}
