//! Host-side visuals for layout nodes.
//!
//! A host implements [`VisualFactory`] to build whatever it draws for a node
//! (a widget, a window handle, a cached string). [`VisualTree`] keeps one
//! visual per rooted node, keyed by node handle, and drops visuals whose
//! nodes left the tree. Visuals that know their rendered size feed it back
//! into the layout as actual sizes.

use slotmap::SecondaryMap;

use crate::model::{DockLayout, NodeId};

pub trait VisualFactory<C> {
    type Visual;

    fn create(&mut self, layout: &DockLayout<C>, node: NodeId) -> Self::Visual;

    /// Refresh a visual that already exists for `node`.
    fn update(&mut self, _layout: &DockLayout<C>, _node: NodeId, _visual: &mut Self::Visual) {}
}

/// A visual that can report the size it was last rendered at.
pub trait MeasuredVisual {
    fn measured_size(&self) -> Option<(f64, f64)>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub dropped: usize,
}

#[derive(Debug)]
pub struct VisualTree<V> {
    visuals: SecondaryMap<NodeId, V>,
}

impl<V> Default for VisualTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> VisualTree<V> {
    pub fn new() -> Self {
        Self {
            visuals: SecondaryMap::new(),
        }
    }

    pub fn get(&self, node: NodeId) -> Option<&V> {
        self.visuals.get(node)
    }

    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut V> {
        self.visuals.get_mut(node)
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Bring the cache in line with the rooted nodes of `layout`.
    pub fn sync<C, F>(&mut self, layout: &DockLayout<C>, factory: &mut F) -> SyncReport
    where
        F: VisualFactory<C, Visual = V>,
    {
        let mut report = SyncReport::default();
        let rooted: Vec<NodeId> = layout.rooted_nodes().collect();
        for node in &rooted {
            match self.visuals.get_mut(*node) {
                Some(visual) => {
                    factory.update(layout, *node, visual);
                    report.updated += 1;
                }
                None => {
                    let visual = factory.create(layout, *node);
                    self.visuals.insert(*node, visual);
                    report.created += 1;
                }
            }
        }
        let before = self.visuals.len();
        self.visuals.retain(|node, _| layout.is_rooted(node));
        report.dropped = before - self.visuals.len();
        if report.created + report.dropped > 0 {
            tracing::trace!(?report, "visual tree synced");
        }
        report
    }
}

impl<V: MeasuredVisual> VisualTree<V> {
    /// Copy every measured size into the layout's actual sizes.
    pub fn feed_actual_sizes<C>(&self, layout: &mut DockLayout<C>) {
        for (node, visual) in &self.visuals {
            if let Some((width, height)) = visual.measured_size() {
                layout.set_actual_size(node, width, height);
            }
        }
    }
}
