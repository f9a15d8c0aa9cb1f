//! Arena-backed dock layout tree.
//!
//! A [`DockLayout`] owns every node of one layout: the root, its root panel of
//! panes and pane groups, the four anchor sides holding auto-hidden groups,
//! floating windows, and the hidden anchorables. Parent/child links are arena
//! handles, so a node can sit in at most one child list at a time. Handles
//! are generation checked: once a node is disposed, every handle to it reads
//! as empty, which is how `previous container`, active content, and last
//! focused document behave as weak references.
//!
//! Mutation entry points live in the submodules:
//!
//! - [`group`]: raw child list mutation, visibility aggregation, notifications.
//! - [`positionable`]: dock sizes, minimum sizes, floating geometry.
//! - [`content`]: the dock/float/hide/show/auto-hide/close state machine.
//! - [`root`]: root panel, anchor sides, hidden list, active content.
//! - [`gc`]: the structural garbage collector.
//! - [`floating`]: floating window creation.

pub mod content;
pub mod events;
pub mod floating;
pub mod gc;
pub mod group;
pub mod options;
pub mod positionable;
pub mod root;
pub mod source;
pub mod strategy;
pub mod visit;

use std::fmt;

use slotmap::SlotMap;

use crate::error::{LayoutError, LayoutResult};
use crate::layout::DockRect;

pub use content::{AnchorableState, ContentRole, ContentState, ContentStatus, PreviousContainer};
pub use events::{LayoutEvent, Property, TreeChange};
pub use options::LayoutOptions;
pub use positionable::{DockGeometry, GridLength};
pub use source::SourceChange;
pub use strategy::{ContentHost, LayoutUpdateStrategy};
pub use visit::LayoutVisitor;

use events::EventQueue;

slotmap::new_key_type! {
    /// Generation-checked handle to a node of a [`DockLayout`].
    pub struct NodeId;
}

/// Which kind of content a pane, pane group, or floating window hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneKind {
    Document,
    Anchorable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorSide {
    Left,
    Top,
    Right,
    Bottom,
}

impl AnchorSide {
    pub const ALL: [AnchorSide; 4] = [
        AnchorSide::Left,
        AnchorSide::Top,
        AnchorSide::Right,
        AnchorSide::Bottom,
    ];

    /// Orientation a panel needs for a pane to sit on this edge.
    pub fn orientation(self) -> Orientation {
        match self {
            AnchorSide::Left | AnchorSide::Right => Orientation::Horizontal,
            AnchorSide::Top | AnchorSide::Bottom => Orientation::Vertical,
        }
    }

    /// Whether the edge is the leading one (first child) of its panel.
    pub fn is_leading(self) -> bool {
        matches!(self, AnchorSide::Left | AnchorSide::Top)
    }
}

/// Node variants of the layout tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Panel,
    PaneGroup(PaneKind),
    Pane(PaneKind),
    Document,
    Anchorable,
    FloatingWindow(PaneKind),
    AnchorSide(AnchorSide),
    AnchorGroup,
}

impl NodeKind {
    pub fn is_content(self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Anchorable)
    }

    pub fn is_pane(self) -> bool {
        matches!(self, NodeKind::Pane(_))
    }

    /// Groups that split their children along an orientation.
    pub fn is_orientable(self) -> bool {
        matches!(self, NodeKind::Panel | NodeKind::PaneGroup(_))
    }

    /// Whether a container of this kind accepts a child of `child` kind.
    pub fn accepts(self, child: NodeKind) -> bool {
        match self {
            NodeKind::Root => matches!(
                child,
                NodeKind::Panel | NodeKind::FloatingWindow(_) | NodeKind::Anchorable
            ),
            NodeKind::Panel => matches!(
                child,
                NodeKind::Panel | NodeKind::PaneGroup(_) | NodeKind::Pane(_)
            ),
            NodeKind::PaneGroup(kind) => {
                child == NodeKind::PaneGroup(kind) || child == NodeKind::Pane(kind)
            }
            NodeKind::Pane(PaneKind::Document) => child.is_content(),
            NodeKind::Pane(PaneKind::Anchorable) => child == NodeKind::Anchorable,
            NodeKind::FloatingWindow(kind) => child == NodeKind::PaneGroup(kind),
            NodeKind::AnchorSide(_) => child == NodeKind::AnchorGroup,
            NodeKind::AnchorGroup => child == NodeKind::Anchorable,
            NodeKind::Document | NodeKind::Anchorable => false,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct GroupState {
    pub(crate) orientation: Orientation,
    pub(crate) geometry: DockGeometry,
}

#[derive(Debug, Clone)]
pub(crate) struct PaneState {
    pub(crate) geometry: DockGeometry,
    pub(crate) selected: Option<usize>,
}

#[derive(Debug, Clone)]
pub(crate) struct FloatingState {
    pub(crate) bounds: DockRect,
    pub(crate) is_maximized: bool,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeData<C> {
    Root,
    Panel(GroupState),
    PaneGroup(PaneKind, GroupState),
    Pane(PaneKind, PaneState),
    Content(Box<ContentState<C>>),
    FloatingWindow(PaneKind, FloatingState),
    AnchorSide(AnchorSide),
    AnchorGroup(Option<PreviousContainer>),
}

impl<C> NodeData<C> {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            NodeData::Root => NodeKind::Root,
            NodeData::Panel(_) => NodeKind::Panel,
            NodeData::PaneGroup(kind, _) => NodeKind::PaneGroup(*kind),
            NodeData::Pane(kind, _) => NodeKind::Pane(*kind),
            NodeData::Content(state) => match state.role {
                ContentRole::Document => NodeKind::Document,
                ContentRole::Anchorable(_) => NodeKind::Anchorable,
            },
            NodeData::FloatingWindow(kind, _) => NodeKind::FloatingWindow(*kind),
            NodeData::AnchorSide(side) => NodeKind::AnchorSide(*side),
            NodeData::AnchorGroup(_) => NodeKind::AnchorGroup,
        }
    }

    pub(crate) fn geometry(&self) -> Option<&DockGeometry> {
        match self {
            NodeData::Panel(group) | NodeData::PaneGroup(_, group) => Some(&group.geometry),
            NodeData::Pane(_, pane) => Some(&pane.geometry),
            _ => None,
        }
    }

    pub(crate) fn geometry_mut(&mut self) -> Option<&mut DockGeometry> {
        match self {
            NodeData::Panel(group) | NodeData::PaneGroup(_, group) => Some(&mut group.geometry),
            NodeData::Pane(_, pane) => Some(&mut pane.geometry),
            _ => None,
        }
    }

    pub(crate) fn previous(&self) -> Option<PreviousContainer> {
        match self {
            NodeData::Content(state) => state.previous,
            NodeData::AnchorGroup(previous) => *previous,
            _ => None,
        }
    }

    pub(crate) fn previous_mut(&mut self) -> Option<&mut Option<PreviousContainer>> {
        match self {
            NodeData::Content(state) => Some(&mut state.previous),
            NodeData::AnchorGroup(previous) => Some(previous),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<C> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) is_visible: bool,
    pub(crate) data: NodeData<C>,
}

impl<C> Node<C> {
    fn new(data: NodeData<C>) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            is_visible: false,
            data,
        }
    }
}

/// The layout tree of one docking host.
///
/// `C` is the host payload carried by each content item (documents and
/// anchorables). The layout never inspects it except for equality during
/// source synchronization.
pub struct DockLayout<C = ()> {
    pub(crate) nodes: SlotMap<NodeId, Node<C>>,
    pub(crate) root: NodeId,
    pub(crate) sides: [NodeId; 4],
    pub(crate) active_content: Option<NodeId>,
    pub(crate) last_focused_document: Option<NodeId>,
    pub(crate) activation_counter: u64,
    pub(crate) options: LayoutOptions,
    pub(crate) events: EventQueue,
    pub(crate) update_strategy: Option<Box<dyn LayoutUpdateStrategy<C>>>,
    pub(crate) host: Option<Box<dyn ContentHost<C>>>,
}

impl<C> fmt::Debug for DockLayout<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DockLayout")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("active_content", &self.active_content)
            .field("last_focused_document", &self.last_focused_document)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<C> Default for DockLayout<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> DockLayout<C> {
    /// Layout with a horizontal root panel holding one empty document pane.
    pub fn new() -> Self {
        Self::with_options(LayoutOptions::default())
    }

    pub fn with_options(options: LayoutOptions) -> Self {
        let mut layout = Self::bare(options);
        let panel = layout.new_panel(Orientation::Horizontal);
        let pane = layout.new_pane(PaneKind::Document);
        layout.attach(panel, 0, pane);
        layout.attach(layout.root, 0, panel);
        layout.events.clear();
        layout
    }

    /// Layout whose root panel is empty. Hosts that build their own tree
    /// start from here.
    pub fn empty(options: LayoutOptions) -> Self {
        let mut layout = Self::bare(options);
        let panel = layout.new_panel(Orientation::Horizontal);
        layout.attach(layout.root, 0, panel);
        layout.events.clear();
        layout
    }

    fn bare(options: LayoutOptions) -> Self {
        let mut nodes = SlotMap::with_key();
        let mut root_node = Node::new(NodeData::Root);
        root_node.is_visible = true;
        let root = nodes.insert(root_node);
        let sides = AnchorSide::ALL.map(|side| nodes.insert(Node::new(NodeData::AnchorSide(side))));
        let mut layout = Self {
            nodes,
            root,
            sides,
            active_content: None,
            last_focused_document: None,
            activation_counter: 0,
            options,
            events: EventQueue::default(),
            update_strategy: None,
            host: None,
        };
        for (index, side) in sides.into_iter().enumerate() {
            layout.attach(root, index, side);
        }
        layout
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut LayoutOptions {
        &mut self.options
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.nodes.get(id).map(|node| node.data.kind())
    }

    pub(crate) fn node(&self, id: NodeId) -> LayoutResult<&Node<C>> {
        self.nodes.get(id).ok_or(LayoutError::UnknownNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> LayoutResult<&mut Node<C>> {
        self.nodes.get_mut(id).ok_or(LayoutError::UnknownNode(id))
    }

    pub(crate) fn kind_of(&self, id: NodeId) -> LayoutResult<NodeKind> {
        self.kind(id).ok_or(LayoutError::UnknownNode(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children of `id` in order; empty for leaves and unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn children_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    pub fn orientation(&self, id: NodeId) -> Option<Orientation> {
        match &self.nodes.get(id)?.data {
            NodeData::Panel(group) | NodeData::PaneGroup(_, group) => Some(group.orientation),
            _ => None,
        }
    }

    pub fn set_orientation(&mut self, id: NodeId, orientation: Orientation) -> LayoutResult<()> {
        let node = self.nodes.get_mut(id).ok_or(LayoutError::UnknownNode(id))?;
        let group = match &mut node.data {
            NodeData::Panel(group) | NodeData::PaneGroup(_, group) => group,
            _ => return Err(LayoutError::NotContainer(id)),
        };
        if group.orientation == orientation {
            return Ok(());
        }
        self.events.property_changing(id, Property::Orientation);
        group.orientation = orientation;
        self.events.property_changed(id, Property::Orientation);
        self.events.mark_dirty();
        Ok(())
    }

    /// Walk from `id` (inclusive) up to the top of its tree.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, C> {
        Ancestors {
            layout: self,
            next: self.nodes.contains_key(id).then_some(id),
        }
    }

    /// Topmost ancestor of `id` (the node itself when detached).
    pub fn top_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).last()
    }

    /// Whether `id` is reachable from this layout's root.
    pub fn is_rooted(&self, id: NodeId) -> bool {
        self.top_of(id) == Some(self.root)
    }

    /// Nearest strict ancestor of `id` matching `predicate`.
    pub fn find_ancestor(
        &self,
        id: NodeId,
        mut predicate: impl FnMut(NodeKind) -> bool,
    ) -> Option<NodeId> {
        self.ancestors(id)
            .skip(1)
            .find(|ancestor| self.kind(*ancestor).is_some_and(&mut predicate))
    }

    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).skip(1).any(|node| node == ancestor)
    }

    /// Pre-order traversal of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_, C> {
        let stack = if self.nodes.contains_key(id) {
            vec![id]
        } else {
            Vec::new()
        };
        Descendants {
            layout: self,
            stack,
        }
    }

    /// Every node reachable from the root, in pre-order.
    pub fn rooted_nodes(&self) -> Descendants<'_, C> {
        self.descendants(self.root)
    }

    /// Rooted nodes of one kind, in pre-order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.rooted_nodes()
            .filter(|id| self.kind(*id) == Some(kind))
            .collect()
    }

    /// The floating window hosting `id`, if any.
    pub fn floating_window_of(&self, id: NodeId) -> Option<NodeId> {
        self.find_ancestor(id, |kind| matches!(kind, NodeKind::FloatingWindow(_)))
    }

    pub fn floating_bounds(&self, window: NodeId) -> Option<DockRect> {
        match &self.nodes.get(window)?.data {
            NodeData::FloatingWindow(_, state) => Some(state.bounds),
            _ => None,
        }
    }

    pub fn set_floating_bounds(&mut self, window: NodeId, bounds: DockRect) -> LayoutResult<()> {
        let node = self
            .nodes
            .get_mut(window)
            .ok_or(LayoutError::UnknownNode(window))?;
        let NodeData::FloatingWindow(_, state) = &mut node.data else {
            return Err(LayoutError::NotFloatingWindow(window));
        };
        if state.bounds == bounds {
            return Ok(());
        }
        state.bounds = bounds;
        self.events.property_changed(window, Property::FloatingBounds);
        self.events.mark_dirty();
        Ok(())
    }

    pub fn is_floating_window_maximized(&self, window: NodeId) -> bool {
        matches!(
            self.nodes.get(window).map(|node| &node.data),
            Some(NodeData::FloatingWindow(_, state)) if state.is_maximized
        )
    }

    pub fn set_floating_window_maximized(&mut self, window: NodeId, maximized: bool) {
        if let Some(Node {
            data: NodeData::FloatingWindow(_, state),
            ..
        }) = self.nodes.get_mut(window)
            && state.is_maximized != maximized
        {
            state.is_maximized = maximized;
            self.events.property_changed(window, Property::IsMaximized);
        }
    }

    // Node construction. New nodes are detached until inserted somewhere.

    pub fn new_panel(&mut self, orientation: Orientation) -> NodeId {
        let geometry = self.options.new_geometry();
        self.nodes.insert(Node::new(NodeData::Panel(GroupState {
            orientation,
            geometry,
        })))
    }

    pub fn new_pane_group(&mut self, kind: PaneKind, orientation: Orientation) -> NodeId {
        let geometry = self.options.new_geometry();
        self.nodes.insert(Node::new(NodeData::PaneGroup(
            kind,
            GroupState {
                orientation,
                geometry,
            },
        )))
    }

    pub fn new_pane(&mut self, kind: PaneKind) -> NodeId {
        let geometry = self.options.new_geometry();
        let mut node = Node::new(NodeData::Pane(
            kind,
            PaneState {
                geometry,
                selected: None,
            },
        ));
        // A document pane outside a pane group is always a drop target.
        node.is_visible = kind == PaneKind::Document;
        self.nodes.insert(node)
    }

    pub fn new_anchor_group(&mut self) -> NodeId {
        self.nodes.insert(Node::new(NodeData::AnchorGroup(None)))
    }

    pub(crate) fn new_floating_window(&mut self, kind: PaneKind, bounds: DockRect) -> NodeId {
        self.nodes.insert(Node::new(NodeData::FloatingWindow(
            kind,
            FloatingState {
                bounds,
                is_maximized: false,
            },
        )))
    }

    pub fn new_document(&mut self, title: impl Into<String>) -> NodeId {
        let state = ContentState::new(ContentRole::Document, title.into());
        self.nodes.insert(Node::new(NodeData::Content(Box::new(state))))
    }

    pub fn new_anchorable(&mut self, title: impl Into<String>) -> NodeId {
        let role = ContentRole::Anchorable(AnchorableState::default());
        let state = ContentState::new(role, title.into());
        self.nodes.insert(Node::new(NodeData::Content(Box::new(state))))
    }

    /// Free `id` and everything below it from the arena. The node must be
    /// detached; handles into the subtree read as empty afterwards.
    pub fn dispose(&mut self, id: NodeId) -> LayoutResult<usize> {
        if id == self.root {
            return Err(LayoutError::NotContainer(id));
        }
        if self.node(id)?.parent.is_some() {
            return Err(LayoutError::Detached(id));
        }
        let doomed: Vec<NodeId> = self.descendants(id).collect();
        for node in &doomed {
            self.nodes.remove(*node);
        }
        Ok(doomed.len())
    }
}

pub struct Ancestors<'a, C> {
    layout: &'a DockLayout<C>,
    next: Option<NodeId>,
}

impl<C> Iterator for Ancestors<'_, C> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.layout.parent(current);
        Some(current)
    }
}

pub struct Descendants<'a, C> {
    layout: &'a DockLayout<C>,
    stack: Vec<NodeId>,
}

impl<C> Iterator for Descendants<'_, C> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.layout.children(current).iter().rev().copied());
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_has_root_panel_with_document_pane() {
        let layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().expect("root panel");
        assert_eq!(layout.kind(panel), Some(NodeKind::Panel));
        let panes = layout.nodes_of_kind(NodeKind::Pane(PaneKind::Document));
        assert_eq!(panes.len(), 1);
        assert_eq!(layout.parent(panes[0]), Some(panel));
        for side in AnchorSide::ALL {
            assert_eq!(
                layout.kind(layout.anchor_side(side)),
                Some(NodeKind::AnchorSide(side))
            );
        }
    }

    #[test]
    fn accepts_follows_container_rules() {
        let doc_pane = NodeKind::Pane(PaneKind::Document);
        let tool_pane = NodeKind::Pane(PaneKind::Anchorable);
        assert!(doc_pane.accepts(NodeKind::Document));
        assert!(doc_pane.accepts(NodeKind::Anchorable));
        assert!(!tool_pane.accepts(NodeKind::Document));
        assert!(NodeKind::PaneGroup(PaneKind::Anchorable).accepts(tool_pane));
        assert!(!NodeKind::PaneGroup(PaneKind::Anchorable).accepts(doc_pane));
        assert!(NodeKind::Panel.accepts(NodeKind::Panel));
        assert!(!NodeKind::AnchorGroup.accepts(NodeKind::Document));
        assert!(!NodeKind::Root.accepts(NodeKind::AnchorSide(AnchorSide::Left)));
    }

    #[test]
    fn disposed_handles_read_as_empty() {
        let mut layout: DockLayout = DockLayout::new();
        let doc = layout.new_document("scratch");
        assert!(layout.contains(doc));
        assert_eq!(layout.dispose(doc), Ok(1));
        assert!(!layout.contains(doc));
        assert_eq!(layout.kind(doc), None);
        assert!(layout.children(doc).is_empty());
    }

    #[test]
    fn descendants_are_pre_order() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.nodes_of_kind(NodeKind::Pane(PaneKind::Document))[0];
        let a = layout.new_document("a");
        let b = layout.new_document("b");
        layout.push_child(pane, a).unwrap();
        layout.push_child(pane, b).unwrap();
        let order: Vec<NodeId> = layout.descendants(pane).collect();
        assert_eq!(order, vec![pane, a, b]);
        assert!(layout.is_descendant_of(b, layout.root()));
        assert!(layout.is_rooted(a));
    }
}
