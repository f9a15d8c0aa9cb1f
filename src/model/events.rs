//! Change notifications queued by the layout for its host.
//!
//! The layout never calls out to observers while it is mutating. Every change
//! is appended to a queue that the host drains with
//! [`DockLayout::take_events`] once an operation returns.

use super::{DockLayout, NodeId};

/// Node property whose value changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    IsVisible,
    IsSelected,
    IsActive,
    IsHidden,
    IsFloating,
    SelectedIndex,
    ActiveContent,
    LastFocusedDocument,
    RootPanel,
    Orientation,
    Title,
    DockWidth,
    DockHeight,
    DockMinWidth,
    DockMinHeight,
    FloatingBounds,
    IsMaximized,
    PreviousContainer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeChange {
    /// The group's own child list changed.
    DirectChildrenChanged,
    /// A child list somewhere below the group changed.
    TreeChanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    ChildrenChanged {
        group: NodeId,
    },
    ChildrenTreeChanged {
        group: NodeId,
        change: TreeChange,
    },
    PropertyChanging {
        node: NodeId,
        property: Property,
    },
    PropertyChanged {
        node: NodeId,
        property: Property,
    },
    ElementAdded {
        node: NodeId,
    },
    ElementRemoved {
        node: NodeId,
    },
    ContentClosed {
        content: NodeId,
    },
}

#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: Vec<LayoutEvent>,
    layout_pass_pending: bool,
    dirty: bool,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: LayoutEvent) {
        self.events.push(event);
    }

    pub(crate) fn property_changing(&mut self, node: NodeId, property: Property) {
        self.push(LayoutEvent::PropertyChanging { node, property });
    }

    pub(crate) fn property_changed(&mut self, node: NodeId, property: Property) {
        self.push(LayoutEvent::PropertyChanged { node, property });
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
        self.dirty = false;
        self.layout_pass_pending = false;
    }
}

impl<C> DockLayout<C> {
    /// Drain every notification queued since the last call.
    pub fn take_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events.events)
    }

    pub fn pending_events(&self) -> &[LayoutEvent] {
        &self.events.events
    }

    /// Returns true when anything in the tree changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.events.dirty)
    }

    /// Schedule a deferred layout pass. Requests coalesce: only the first
    /// request after a pass ran returns true.
    pub fn request_layout_pass(&mut self) -> bool {
        if self.events.layout_pass_pending {
            return false;
        }
        tracing::trace!("layout pass scheduled");
        self.events.layout_pass_pending = true;
        true
    }

    pub fn is_layout_pass_pending(&self) -> bool {
        self.events.layout_pass_pending
    }

    /// Claim the pending layout pass, if any. The host runs
    /// [`crate::layout::arrange`] when this returns true.
    pub fn take_layout_pass(&mut self) -> bool {
        std::mem::take(&mut self.events.layout_pass_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_pass_requests_coalesce() {
        let mut layout: DockLayout = DockLayout::new();
        assert!(!layout.is_layout_pass_pending());
        assert!(layout.request_layout_pass());
        assert!(!layout.request_layout_pass());
        assert!(layout.take_layout_pass());
        assert!(!layout.take_layout_pass());
        assert!(layout.request_layout_pass());
    }

    #[test]
    fn take_events_drains_queue() {
        let mut layout: DockLayout = DockLayout::new();
        assert!(layout.take_events().is_empty());
        let pane = layout.first_document_pane().unwrap();
        let doc = layout.new_document("notes");
        layout.push_child(pane, doc).unwrap();
        let events = layout.take_events();
        assert!(events.contains(&LayoutEvent::ChildrenChanged { group: pane }));
        assert!(events.contains(&LayoutEvent::ElementAdded { node: doc }));
        assert!(layout.take_events().is_empty());
        assert!(layout.take_dirty());
        assert!(!layout.take_dirty());
    }
}
