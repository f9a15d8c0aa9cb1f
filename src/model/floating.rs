//! Floating window creation for single items and whole panes.

use crate::constants::FLOATING_SIZE_MARGIN;
use crate::error::{LayoutError, LayoutResult};
use crate::layout::DockRect;
use crate::layout::floating::ensure_on_screen;

use super::{ContentRole, DockLayout, NodeId, NodeKind, Orientation, PaneKind, PreviousContainer};

impl<C> DockLayout<C> {
    /// Move `id` out of `pane` into a new floating window and return it.
    pub(crate) fn float_content(
        &mut self,
        id: NodeId,
        pane: NodeId,
        index: usize,
    ) -> LayoutResult<NodeId> {
        let state = self.content(id).ok_or(LayoutError::NotContent(id))?;
        let kind = match state.role {
            ContentRole::Document => PaneKind::Document,
            ContentRole::Anchorable(_) => PaneKind::Anchorable,
        };
        let content_bounds = state.floating;
        if self.geometry(pane).is_none() {
            return Err(LayoutError::NotPane(pane));
        }

        if !self.is_floating(id) {
            self.set_previous_container(
                id,
                Some(PreviousContainer {
                    container: pane,
                    index,
                }),
            )?;
        }
        let bounds = self.floating_size_for(content_bounds, pane);
        let (window, target) = self.new_floating_subtree(kind, pane, bounds)?;
        self.detach(id);
        self.attach(target, 0, id);
        tracing::debug!(content = ?id, window = ?window, "content floated");
        Ok(window)
    }

    /// Float every item of `pane` together, keeping order and selection.
    /// Returns `None` when some item cannot float.
    pub fn float_pane(&mut self, pane: NodeId) -> LayoutResult<Option<NodeId>> {
        let NodeKind::Pane(kind) = self.kind_of(pane)? else {
            return Err(LayoutError::NotPane(pane));
        };
        let items = self.children(pane).to_vec();
        if items.is_empty() {
            return Ok(None);
        }
        if !items
            .iter()
            .all(|item| self.content(*item).is_some_and(|state| state.can_float))
        {
            tracing::debug!(pane = ?pane, "float skipped: pane holds content that cannot float");
            return Ok(None);
        }
        let selected = self.selected_index(pane);
        let record_previous = !self.is_floating(pane);
        let bounds = self.floating_size_for(DockRect::default(), pane);
        let (window, target) = self.new_floating_subtree(kind, pane, bounds)?;

        for (index, item) in items.iter().enumerate() {
            if record_previous {
                self.set_previous_container(
                    *item,
                    Some(PreviousContainer {
                        container: pane,
                        index,
                    }),
                )?;
            }
            self.detach(*item);
            self.attach(target, index, *item);
        }
        if let Some(selected) = selected {
            self.set_selected_index(target, selected)?;
        }
        tracing::debug!(pane = ?pane, window = ?window, "pane floated");
        self.finish_transition();
        Ok(Some(window))
    }

    /// Floating bounds for content leaving `pane`: the content's remembered
    /// size, then the pane's, then the pane's rendered size plus chrome.
    fn floating_size_for(&self, content: DockRect, pane: NodeId) -> DockRect {
        let pane_floating = self
            .geometry(pane)
            .map(|geometry| geometry.floating())
            .unwrap_or_default();
        let pick = |own: f64, remembered: f64, axis: Orientation| {
            if own > 0.0 {
                own
            } else if remembered > 0.0 {
                remembered
            } else {
                self.actual_length(pane, axis) + FLOATING_SIZE_MARGIN
            }
        };
        DockRect {
            x: content.x,
            y: content.y,
            width: pick(content.width, pane_floating.width, Orientation::Horizontal),
            height: pick(content.height, pane_floating.height, Orientation::Vertical),
        }
    }

    /// Build window -> pane group -> pane, seeded with the source pane's
    /// sizing, and attach it to the root. Returns the window and new pane.
    fn new_floating_subtree(
        &mut self,
        kind: PaneKind,
        source_pane: NodeId,
        bounds: DockRect,
    ) -> LayoutResult<(NodeId, NodeId)> {
        let source = self
            .geometry_snapshot(source_pane)
            .ok_or(LayoutError::NotPane(source_pane))?;
        let bounds = ensure_on_screen(bounds, &self.options.monitors);
        let window = self.new_floating_window(kind, bounds);
        let group = self.new_pane_group(kind, Orientation::Horizontal);
        let pane = self.new_pane(kind);
        for node in [group, pane] {
            if let Some(geometry) = self.nodes.get_mut(node).and_then(|n| n.data.geometry_mut()) {
                geometry.seed_from(&source);
            }
        }
        self.attach(group, 0, pane);
        self.attach(window, 0, group);
        let root = self.root;
        self.attach(root, self.children_count(root), window);
        self.request_layout_pass();
        Ok((window, pane))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentStatus;

    #[test]
    fn floated_size_falls_back_to_rendered_pane_plus_margin() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let doc = layout.new_document("a");
        layout.push_child(pane, doc).unwrap();
        layout.set_actual_size(pane, 300.0, 200.0);

        let window = layout.float(doc).unwrap().unwrap();
        let bounds = layout.floating_bounds(window).unwrap();
        assert_eq!(bounds.width, 310.0);
        assert_eq!(bounds.height, 210.0);
    }

    #[test]
    fn floated_size_prefers_content_then_pane_memory() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let doc = layout.new_document("a");
        layout.push_child(pane, doc).unwrap();
        layout
            .set_floating_geometry(pane, DockRect::new(0.0, 0.0, 400.0, 0.0))
            .unwrap();
        layout.content_mut(doc).unwrap().floating = DockRect::new(5.0, 6.0, 0.0, 90.0);

        let window = layout.float(doc).unwrap().unwrap();
        assert_eq!(
            layout.floating_bounds(window),
            Some(DockRect::new(5.0, 6.0, 400.0, 90.0))
        );
    }

    #[test]
    fn anchorable_in_document_pane_floats_as_anchorable_window() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let tool = layout.new_anchorable("tool");
        layout.push_child(pane, tool).unwrap();
        let window = layout.float(tool).unwrap().unwrap();
        assert_eq!(
            layout.kind(window),
            Some(NodeKind::FloatingWindow(PaneKind::Anchorable))
        );
        assert_eq!(layout.status(tool), ContentStatus::Floating);
    }

    #[test]
    fn float_pane_keeps_order_and_selection() {
        let mut layout: DockLayout = DockLayout::new();
        let panel = layout.root_panel().unwrap();
        let pane = layout.new_pane(PaneKind::Anchorable);
        layout.push_child(panel, pane).unwrap();
        let a = layout.new_anchorable("a");
        let b = layout.new_anchorable("b");
        let c = layout.new_anchorable("c");
        for item in [a, b, c] {
            layout.push_child(pane, item).unwrap();
        }
        layout.set_selected_index(pane, 1).unwrap();

        let window = layout.float_pane(pane).unwrap().unwrap();
        let target = layout.parent(a).unwrap();
        assert_eq!(layout.floating_window_of(target), Some(window));
        assert_eq!(layout.children(target), &[a, b, c]);
        assert_eq!(layout.selected_content(target), Some(b));
        assert_eq!(
            layout.previous_container(c),
            Some(PreviousContainer {
                container: pane,
                index: 2
            })
        );
    }

    #[test]
    fn float_pane_requires_every_item_floatable() {
        let mut layout: DockLayout = DockLayout::new();
        let pane = layout.first_document_pane().unwrap();
        let a = layout.new_document("a");
        let b = layout.new_document("b");
        layout.push_child(pane, a).unwrap();
        layout.push_child(pane, b).unwrap();
        layout.content_mut(b).unwrap().can_float = false;
        assert_eq!(layout.float_pane(pane), Ok(None));
        assert!(layout.floating_windows().is_empty());
    }

    #[test]
    fn floating_window_is_pulled_onto_monitor() {
        let mut layout: DockLayout = DockLayout::new();
        layout.options_mut().monitors = vec![DockRect::new(0.0, 0.0, 800.0, 600.0)];
        let pane = layout.first_document_pane().unwrap();
        let doc = layout.new_document("a");
        layout.push_child(pane, doc).unwrap();
        layout.content_mut(doc).unwrap().floating = DockRect::new(2000.0, 100.0, 300.0, 200.0);

        let window = layout.float(doc).unwrap().unwrap();
        assert_eq!(
            layout.floating_bounds(window),
            Some(DockRect::new(500.0, 100.0, 300.0, 200.0))
        );
    }
}
