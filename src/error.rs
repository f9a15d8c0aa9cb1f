//! Error type shared by every fallible layout operation.

use thiserror::Error;

use crate::model::{NodeId, NodeKind};

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("node {0:?} does not exist in this layout")]
    UnknownNode(NodeId),
    #[error("node {0:?} is not attached to the layout root")]
    Detached(NodeId),
    #[error("anchorable {0:?} is not hidden")]
    NotHidden(NodeId),
    #[error("layout must contain at least one document pane in order to host documents")]
    NoDocumentPane,
    #[error("node {0:?} is not a content item")]
    NotContent(NodeId),
    #[error("node {0:?} is not an anchorable")]
    NotAnchorable(NodeId),
    #[error("node {0:?} is not a pane")]
    NotPane(NodeId),
    #[error("node {0:?} cannot hold children")]
    NotContainer(NodeId),
    #[error("node {0:?} is not a floating window")]
    NotFloatingWindow(NodeId),
    #[error("content {0:?} is not hosted in a pane")]
    NotInPane(NodeId),
    #[error("{parent:?} cannot hold a child of kind {child:?}")]
    InvalidChild { parent: NodeKind, child: NodeKind },
    #[error("node {child:?} is not a child of {parent:?}")]
    NotChild { parent: NodeId, child: NodeId },
    #[error("{0:?} occupies a fixed slot of the layout root")]
    FixedSlot(NodeId),
    #[error("index {index} is out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("inserting {0:?} would make it a descendant of itself")]
    CycleDetected(NodeId),
    #[error("minimum size must not be negative (got {0})")]
    NegativeMinSize(f64),
    #[error("minimum {min} is greater than maximum {max}")]
    InvertedRange { min: f64, max: f64 },
}

/// Clamp `value` into `[min, max]`, rejecting inverted bounds.
pub fn clamp_size(value: f64, min: f64, max: f64) -> LayoutResult<f64> {
    if min > max {
        return Err(LayoutError::InvertedRange { min, max });
    }
    Ok(value.clamp(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_size_rejects_inverted_bounds() {
        assert_eq!(clamp_size(5.0, 1.0, 10.0), Ok(5.0));
        assert_eq!(clamp_size(-3.0, 1.0, 10.0), Ok(1.0));
        assert_eq!(clamp_size(30.0, 1.0, 10.0), Ok(10.0));
        assert_eq!(
            clamp_size(5.0, 10.0, 1.0),
            Err(LayoutError::InvertedRange {
                min: 10.0,
                max: 1.0
            })
        );
    }
}
