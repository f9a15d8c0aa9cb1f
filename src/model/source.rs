//! Keeping the tree in step with host-owned document and anchorable lists.
//!
//! Hosts that drive content from their own collections report each change
//! as a [`SourceChange`]. Content nodes are matched to host items by payload
//! equality.

use crate::error::{LayoutError, LayoutResult};

use super::{DockLayout, NodeId, NodeKind};

#[derive(Debug, Clone, PartialEq)]
pub enum SourceChange<T> {
    Added(Vec<T>),
    Removed(Vec<T>),
    /// The collection was replaced wholesale.
    Reset(Vec<T>),
}

impl<C: PartialEq> DockLayout<C> {
    /// Apply a change of the host's document list. Returns created nodes.
    pub fn sync_documents(
        &mut self,
        change: SourceChange<C>,
        title: impl FnMut(&C) -> String,
    ) -> LayoutResult<Vec<NodeId>> {
        self.sync_source(NodeKind::Document, change, title)
    }

    /// Apply a change of the host's anchorable list. Returns created nodes.
    pub fn sync_anchorables(
        &mut self,
        change: SourceChange<C>,
        title: impl FnMut(&C) -> String,
    ) -> LayoutResult<Vec<NodeId>> {
        self.sync_source(NodeKind::Anchorable, change, title)
    }

    /// Content node of `kind` carrying `item`, searched across the tree and
    /// the hidden list.
    pub fn find_content(&self, kind: NodeKind, item: &C) -> Option<NodeId> {
        self.nodes_of_kind(kind).into_iter().find(|id| {
            self.content(*id)
                .and_then(|state| state.content.as_ref())
                .is_some_and(|payload| payload == item)
        })
    }

    fn sync_source(
        &mut self,
        kind: NodeKind,
        change: SourceChange<C>,
        mut title: impl FnMut(&C) -> String,
    ) -> LayoutResult<Vec<NodeId>> {
        let (removed, added) = match change {
            SourceChange::Added(items) => (Vec::new(), items),
            SourceChange::Removed(items) => (
                items
                    .iter()
                    .filter_map(|item| self.find_content(kind, item))
                    .collect(),
                Vec::new(),
            ),
            SourceChange::Reset(items) => {
                let stale = self
                    .nodes_of_kind(kind)
                    .into_iter()
                    .filter(|id| {
                        self.content(*id)
                            .and_then(|state| state.content.as_ref())
                            .is_some_and(|payload| !items.contains(payload))
                    })
                    .collect();
                let fresh = items
                    .into_iter()
                    .filter(|item| self.find_content(kind, item).is_none())
                    .collect();
                (stale, fresh)
            }
        };

        if kind == NodeKind::Document
            && !added.is_empty()
            && self.update_strategy.is_none()
            && self.default_document_target(self.root).is_none()
        {
            return Err(LayoutError::NoDocumentPane);
        }

        for id in removed {
            if let Some(parent) = self.parent(id) {
                self.remove_child(parent, id)?;
            }
            self.dispose(id)?;
            tracing::debug!(content = ?id, "content removed from source");
        }

        let mut created = Vec::with_capacity(added.len());
        for item in added {
            let label = title(&item);
            let id = match kind {
                NodeKind::Anchorable => self.new_anchorable(label),
                _ => self.new_document(label),
            };
            if let Some(state) = self.content_mut(id) {
                state.content = Some(item);
            }
            self.place_from_source(id)?;
            created.push(id);
        }
        self.finish_transition();
        Ok(created)
    }

    fn place_from_source(&mut self, id: NodeId) -> LayoutResult<()> {
        if self.kind(id) == Some(NodeKind::Anchorable) {
            let target = self.default_anchorable_target(id);
            if !self.strategy_before_insert(id, target) {
                self.place_anchorable(id, target)?;
            }
        } else {
            let target = self.default_document_target(id);
            if !self.strategy_before_insert(id, target) {
                let pane = target.ok_or(LayoutError::NoDocumentPane)?;
                self.push_child(pane, id)?;
            }
        }
        self.strategy_after_insert(id);
        Ok(())
    }
}
