//! Sample layouts for the preview binary, the bench, and tests.
//!
//! Sizes are in terminal cells.

use clap::ValueEnum;

use crate::error::{LayoutError, LayoutResult};
use crate::layout::DockRect;
use crate::model::{DockLayout, GridLength, LayoutOptions, NodeId, Orientation, PaneKind};

pub type PreviewLayout = DockLayout<String>;

const TOOL_WIDTH: f64 = 28.0;
const TOOL_HEIGHT: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Documents in the middle, explorer left, properties right, output below.
    Ide,
    /// `ide` with the properties tool floating.
    Floating,
    /// The default layout: one empty document pane.
    Empty,
}

impl Scenario {
    pub fn build(self, options: LayoutOptions) -> LayoutResult<PreviewLayout> {
        let mut layout = DockLayout::with_options(options);
        match self {
            Scenario::Empty => {}
            Scenario::Ide => {
                build_ide(&mut layout)?;
            }
            Scenario::Floating => {
                let props = build_ide(&mut layout)?;
                if let Some(window) = layout.float(props)? {
                    layout.set_floating_bounds(window, DockRect::new(50.0, 5.0, 36.0, 12.0))?;
                }
            }
        }
        layout.take_events();
        layout.take_dirty();
        Ok(layout)
    }
}

/// Options scaled for a terminal: thin splitters and small minimums.
pub fn terminal_options(splitter: f64, min_size: f64) -> LayoutOptions {
    LayoutOptions {
        splitter_width: splitter,
        splitter_height: splitter,
        dock_min_size: min_size,
        new_pane_width: TOOL_WIDTH,
        ..LayoutOptions::default()
    }
}

/// Returns the properties anchorable.
fn build_ide(layout: &mut PreviewLayout) -> LayoutResult<NodeId> {
    let panel = layout.root_panel().ok_or(LayoutError::NoDocumentPane)?;
    let docs = layout
        .first_document_pane()
        .ok_or(LayoutError::NoDocumentPane)?;

    let center = layout.new_panel(Orientation::Vertical);
    layout.replace_child(docs, center)?;
    layout.push_child(center, docs)?;
    let output = tool_pane(layout, Orientation::Vertical, TOOL_HEIGHT)?;
    layout.push_child(center, output)?;

    let explorer = tool_pane(layout, Orientation::Horizontal, TOOL_WIDTH)?;
    layout.insert_child(panel, 0, explorer)?;
    let properties = tool_pane(layout, Orientation::Horizontal, TOOL_WIDTH)?;
    layout.push_child(panel, properties)?;

    let main = add_document(layout, docs, "main.rs")?;
    add_document(layout, docs, "lib.rs")?;
    add_document(layout, docs, "Cargo.toml")?;
    add_anchorable(layout, explorer, "Explorer")?;
    add_anchorable(layout, output, "Output")?;
    add_anchorable(layout, output, "Problems")?;
    let props = add_anchorable(layout, properties, "Properties")?;
    layout.activate(main)?;
    Ok(props)
}

fn tool_pane(layout: &mut PreviewLayout, axis: Orientation, length: f64) -> LayoutResult<NodeId> {
    let pane = layout.new_pane(PaneKind::Anchorable);
    layout.set_dock_length(pane, axis, GridLength::Absolute(length))?;
    Ok(pane)
}

pub fn add_document(layout: &mut PreviewLayout, pane: NodeId, title: &str) -> LayoutResult<NodeId> {
    let doc = layout.new_document(title);
    if let Some(state) = layout.content_mut(doc) {
        state.content = Some(format!("// {title}"));
        state.content_id = Some(title.to_string());
    }
    layout.push_child(pane, doc)?;
    Ok(doc)
}

pub fn add_anchorable(layout: &mut PreviewLayout, pane: NodeId, title: &str) -> LayoutResult<NodeId> {
    let tool = layout.new_anchorable(title);
    if let Some(state) = layout.content_mut(tool) {
        state.content = Some(format!("{title} tool"));
        state.content_id = Some(title.to_lowercase());
        if let Some(anchorable) = state.anchorable_mut() {
            anchorable.auto_hide_width = TOOL_WIDTH;
            anchorable.auto_hide_height = TOOL_HEIGHT;
            anchorable.auto_hide_min_width = TOOL_WIDTH / 2.0;
            anchorable.auto_hide_min_height = TOOL_HEIGHT / 2.0;
        }
    }
    layout.push_child(pane, tool)?;
    Ok(tool)
}
