//! Host hooks consulted by the layout during content transitions.
//!
//! Hooks are stored boxed on the layout. While one runs it is taken out of
//! its slot, so a hook may freely mutate the layout it is handed; it is put
//! back afterwards unless the hook installed a replacement.

use super::{DockLayout, NodeId, NodeKind};

/// Lets a host decide where new or restored content lands.
pub trait LayoutUpdateStrategy<C> {
    /// Return true when the hook placed `anchorable` itself.
    fn before_insert_anchorable(
        &mut self,
        _layout: &mut DockLayout<C>,
        _anchorable: NodeId,
        _destination: Option<NodeId>,
    ) -> bool {
        false
    }

    fn after_insert_anchorable(&mut self, _layout: &mut DockLayout<C>, _anchorable: NodeId) {}

    /// Return true when the hook placed `document` itself.
    fn before_insert_document(
        &mut self,
        _layout: &mut DockLayout<C>,
        _document: NodeId,
        _destination: Option<NodeId>,
    ) -> bool {
        false
    }

    fn after_insert_document(&mut self, _layout: &mut DockLayout<C>, _document: NodeId) {}
}

/// Lets a host veto or take over closing and hiding.
pub trait ContentHost<C> {
    /// Return false to cancel closing `content`.
    fn closing(&mut self, _layout: &DockLayout<C>, _content: NodeId) -> bool {
        true
    }

    /// Return false to cancel hiding `anchorable`.
    fn hiding(&mut self, _layout: &DockLayout<C>, _anchorable: NodeId) -> bool {
        true
    }

    /// Return true when the host handled the close request itself.
    fn close_command(&mut self, _layout: &mut DockLayout<C>, _content: NodeId) -> bool {
        false
    }
}

impl<C> DockLayout<C> {
    pub fn set_update_strategy(
        &mut self,
        strategy: Option<Box<dyn LayoutUpdateStrategy<C>>>,
    ) -> Option<Box<dyn LayoutUpdateStrategy<C>>> {
        std::mem::replace(&mut self.update_strategy, strategy)
    }

    pub fn set_content_host(
        &mut self,
        host: Option<Box<dyn ContentHost<C>>>,
    ) -> Option<Box<dyn ContentHost<C>>> {
        std::mem::replace(&mut self.host, host)
    }

    pub(crate) fn strategy_before_insert(
        &mut self,
        content: NodeId,
        destination: Option<NodeId>,
    ) -> bool {
        let Some(mut strategy) = self.update_strategy.take() else {
            return false;
        };
        let placed = match self.kind(content) {
            Some(NodeKind::Anchorable) => {
                strategy.before_insert_anchorable(self, content, destination)
            }
            Some(NodeKind::Document) => strategy.before_insert_document(self, content, destination),
            _ => false,
        };
        self.update_strategy.get_or_insert(strategy);
        placed
    }

    pub(crate) fn strategy_after_insert(&mut self, content: NodeId) {
        let Some(mut strategy) = self.update_strategy.take() else {
            return;
        };
        match self.kind(content) {
            Some(NodeKind::Anchorable) => strategy.after_insert_anchorable(self, content),
            Some(NodeKind::Document) => strategy.after_insert_document(self, content),
            _ => {}
        }
        self.update_strategy.get_or_insert(strategy);
    }

    pub(crate) fn host_allows_closing(&mut self, content: NodeId) -> bool {
        let Some(mut host) = self.host.take() else {
            return true;
        };
        let allowed = host.closing(self, content);
        self.host.get_or_insert(host);
        allowed
    }

    pub(crate) fn host_allows_hiding(&mut self, anchorable: NodeId) -> bool {
        let Some(mut host) = self.host.take() else {
            return true;
        };
        let allowed = host.hiding(self, anchorable);
        self.host.get_or_insert(host);
        allowed
    }

    pub(crate) fn host_close_command(&mut self, content: NodeId) -> bool {
        let Some(mut host) = self.host.take() else {
            return false;
        };
        let handled = host.close_command(self, content);
        self.host.get_or_insert(host);
        handled
    }
}
