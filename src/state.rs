//! Preview application state: the layout being previewed plus everything the
//! terminal host needs between frames.

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::error::LayoutResult;
use crate::event_loop::ControlFlow;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::floating::WindowDrag;
use crate::layout::{Arrangement, DockRect, SplitterDrag, arrange, resize_split};
use crate::model::{AnchorSide, ContentStatus, NodeId, NodeKind};
use crate::scenario::PreviewLayout;
use crate::visual::{VisualFactory, VisualTree};

/// Cells moved per splitter nudge.
const NUDGE: f64 = 2.0;

/// Cached tab text for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLabel {
    pub text: String,
}

#[derive(Debug, Default)]
struct LabelFactory;

fn label_text(layout: &PreviewLayout, node: NodeId) -> String {
    match layout.content(node) {
        Some(content) => content.title().to_string(),
        None => layout.describe(node),
    }
}

impl VisualFactory<String> for LabelFactory {
    type Visual = NodeLabel;

    fn create(&mut self, layout: &PreviewLayout, node: NodeId) -> NodeLabel {
        NodeLabel {
            text: label_text(layout, node),
        }
    }

    fn update(&mut self, layout: &PreviewLayout, node: NodeId, visual: &mut NodeLabel) {
        let text = label_text(layout, node);
        if visual.text != text {
            visual.text = text;
        }
    }
}

#[derive(Debug)]
pub struct PreviewState {
    layout: PreviewLayout,
    bindings: KeyBindings,
    screen: DockRect,
    arrangement: Arrangement,
    drag: SplitterDrag,
    window_drag: WindowDrag,
    status: String,
    log_visible: bool,
    untitled: usize,
    needs_arrange: bool,
    labels: VisualTree<NodeLabel>,
    label_factory: LabelFactory,
}

impl PreviewState {
    pub fn new(layout: PreviewLayout) -> Self {
        Self {
            layout,
            bindings: KeyBindings::default(),
            screen: DockRect::default(),
            arrangement: Arrangement::default(),
            drag: SplitterDrag::default(),
            window_drag: WindowDrag::default(),
            status: String::new(),
            log_visible: false,
            untitled: 0,
            needs_arrange: true,
            labels: VisualTree::new(),
            label_factory: LabelFactory,
        }
    }

    pub fn layout(&self) -> &PreviewLayout {
        &self.layout
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn drag(&self) -> &SplitterDrag {
        &self.drag
    }

    pub fn window_drag(&self) -> &WindowDrag {
        &self.window_drag
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn log_visible(&self) -> bool {
        self.log_visible
    }

    pub fn label(&self, node: NodeId) -> Option<&str> {
        self.labels.get(node).map(|label| label.text.as_str())
    }

    pub fn screen(&self) -> DockRect {
        self.screen
    }

    /// Whether `side` has auto-hidden content and so gets an edge strip.
    pub fn has_strip(&self, side: AnchorSide) -> bool {
        !self.layout.anchor_groups(side).is_empty()
    }

    /// Area the docked tree is arranged into: the screen minus the status
    /// line, the log strip, and any auto-hide strips.
    pub fn dock_area(&self) -> DockRect {
        let mut area = self.screen;
        area.height = (area.height - 1.0 - self.log_height()).max(0.0);
        if self.has_strip(AnchorSide::Left) {
            area.x += 1.0;
            area.width -= 1.0;
        }
        if self.has_strip(AnchorSide::Right) {
            area.width -= 1.0;
        }
        if self.has_strip(AnchorSide::Top) {
            area.y += 1.0;
            area.height -= 1.0;
        }
        if self.has_strip(AnchorSide::Bottom) {
            area.height -= 1.0;
        }
        area.width = area.width.max(0.0);
        area.height = area.height.max(0.0);
        area
    }

    pub fn log_height(&self) -> f64 {
        if self.log_visible {
            (self.screen.height / 4.0).floor().max(3.0)
        } else {
            0.0
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let screen = DockRect::new(0.0, 0.0, width as f64, height as f64);
        if screen != self.screen {
            self.screen = screen;
            self.needs_arrange = true;
        }
    }

    /// Refresh labels, then run the layout pass when the tree asked for one
    /// or the screen changed.
    pub fn relayout(&mut self) -> bool {
        self.labels.sync(&self.layout, &mut self.label_factory);
        if !self.needs_arrange && !self.layout.is_layout_pass_pending() {
            return false;
        }
        let area = self.dock_area();
        self.arrangement = arrange(&mut self.layout, area);
        self.needs_arrange = false;
        for event in self.layout.take_events() {
            tracing::trace!(?event, "layout event");
        }
        true
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        let result = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse).map(|_| ControlFlow::Continue),
            Event::Resize(width, height) => {
                self.resize(*width, *height);
                Ok(ControlFlow::Continue)
            }
            _ => Ok(ControlFlow::Continue),
        };
        result.unwrap_or_else(|err| {
            tracing::warn!(%err, "preview action failed");
            self.status = format!("error: {err}");
            ControlFlow::Continue
        })
    }

    fn handle_key(&mut self, key: &KeyEvent) -> LayoutResult<ControlFlow> {
        match self.bindings.action_for_key(key) {
            Some(action) => self.apply(action),
            None => Ok(ControlFlow::Continue),
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) -> LayoutResult<bool> {
        if self
            .window_drag
            .handle_mouse(&mut self.layout, &self.arrangement, mouse)?
        {
            if let MouseEventKind::Down(_) = mouse.kind
                && let Some(content) = self.content_at(mouse.column, mouse.row)
            {
                self.layout.activate(content)?;
            }
            return Ok(true);
        }
        if self
            .drag
            .handle_mouse(&mut self.layout, &self.arrangement, mouse)?
        {
            return Ok(true);
        }
        if let MouseEventKind::Down(MouseButton::Left) = mouse.kind
            && let Some(content) = self.content_at(mouse.column, mouse.row)
        {
            self.layout.activate(content)?;
            self.status = self.layout.describe(content);
            return Ok(true);
        }
        Ok(false)
    }

    /// Selected content of the topmost pane under the cell.
    pub fn content_at(&self, column: u16, row: u16) -> Option<NodeId> {
        let (x, y) = (column as f64 + 0.5, row as f64 + 0.5);
        let mut panes: Vec<NodeId> = Vec::new();
        for window in self.arrangement.floating.iter().rev() {
            panes.extend(self.panes_under(*window));
        }
        if let Some(panel) = self.layout.root_panel() {
            panes.extend(self.panes_under(panel));
        }
        let pane = self.arrangement.regions.hit_test(x, y, &panes)?;
        self.layout.selected_content(pane)
    }

    fn panes_under(&self, id: NodeId) -> Vec<NodeId> {
        self.layout
            .descendants(id)
            .filter(|node| self.layout.kind(*node).is_some_and(NodeKind::is_pane))
            .collect()
    }

    /// Content the next action applies to.
    pub fn target(&self) -> Option<NodeId> {
        self.layout
            .active_content()
            .or_else(|| self.cycle_order().first().copied())
    }

    /// Contents that can take focus, in tree order.
    pub fn cycle_order(&self) -> Vec<NodeId> {
        self.layout
            .contents()
            .into_iter()
            .filter(|id| self.layout.status(*id) != ContentStatus::Hidden)
            .collect()
    }

    pub fn apply(&mut self, action: Action) -> LayoutResult<ControlFlow> {
        tracing::debug!(%action, "preview action");
        let target = self.target();
        let changed = match (action, target) {
            (Action::Quit, _) => return Ok(ControlFlow::Quit),
            (Action::NextContent, _) => self.cycle(1)?,
            (Action::PrevContent, _) => self.cycle(-1)?,
            (Action::Float, Some(id)) => self.layout.float(id)?.is_some(),
            (Action::Dock, Some(id)) => {
                self.layout.dock(id)?;
                true
            }
            (Action::Hide, Some(id)) if self.is_anchorable(id) => self.layout.hide(id)?,
            (Action::ShowHidden, _) => match self.layout.hidden_anchorables().last().copied() {
                Some(id) => self.layout.show(id)?,
                None => false,
            },
            (Action::ToggleAutoHide, Some(id)) if self.is_anchorable(id) => {
                self.layout.toggle_auto_hide(id)?
            }
            (Action::Close, Some(id)) => self.layout.close(id)?,
            (Action::DockAsDocument, Some(id)) => self.layout.dock_as_document(id)?,
            (Action::NewDocument, _) => {
                self.untitled += 1;
                let doc = self.layout.new_document(format!("untitled-{}", self.untitled));
                if let Some(state) = self.layout.content_mut(doc) {
                    state.content = Some(String::new());
                }
                self.layout.dock(doc)?;
                true
            }
            (Action::GrowPane, Some(id)) => self.nudge(id, NUDGE)?,
            (Action::ShrinkPane, Some(id)) => self.nudge(id, -NUDGE)?,
            (Action::CollectGarbage, _) => {
                self.layout.collect_garbage();
                true
            }
            (Action::DumpTree, _) => {
                for line in self.layout.dump().lines() {
                    tracing::info!("{line}");
                }
                false
            }
            (Action::ToggleLog, _) => {
                self.log_visible = !self.log_visible;
                self.needs_arrange = true;
                true
            }
            _ => false,
        };
        self.status = match self.layout.active_content() {
            Some(active) => format!("{action}: {}", self.layout.describe(active)),
            None => action.to_string(),
        };
        if changed {
            self.needs_arrange = true;
        }
        Ok(ControlFlow::Continue)
    }

    fn is_anchorable(&self, id: NodeId) -> bool {
        self.layout.kind(id) == Some(NodeKind::Anchorable)
    }

    fn cycle(&mut self, step: isize) -> LayoutResult<bool> {
        let order = self.cycle_order();
        if order.is_empty() {
            return Ok(false);
        }
        let len = order.len() as isize;
        let next = match self.layout.active_content().and_then(|active| {
            order.iter().position(|id| *id == active)
        }) {
            Some(index) => (index as isize + step).rem_euclid(len),
            None => 0,
        };
        self.layout.activate(order[next as usize])?;
        Ok(true)
    }

    /// Move the nearest splitter next to the pane holding `content`, growing
    /// that pane by `delta`.
    fn nudge(&mut self, content: NodeId, delta: f64) -> LayoutResult<bool> {
        let Some(pane) = self.layout.parent(content) else {
            return Ok(false);
        };
        let chain: Vec<NodeId> = self.layout.ancestors(pane).collect();
        for node in chain {
            let Some(group) = self.layout.parent(node) else {
                break;
            };
            if self.layout.orientation(group).is_none() {
                break;
            }
            let siblings = self.layout.visible_positionable_children(group);
            let Some(index) = siblings.iter().position(|id| *id == node) else {
                continue;
            };
            if index + 1 < siblings.len() {
                return resize_split(&mut self.layout, group, index, delta);
            }
            if index > 0 {
                return resize_split(&mut self.layout, group, index - 1, -delta);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::{Scenario, terminal_options};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn ide() -> PreviewState {
        let layout = Scenario::Ide.build(terminal_options(1.0, 3.0)).unwrap();
        let mut state = PreviewState::new(layout);
        state.resize(120, 40);
        state.relayout();
        state
    }

    fn press(state: &mut PreviewState, c: char) -> ControlFlow {
        state.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
    }

    #[test]
    fn dock_area_leaves_room_for_status_line() {
        let state = ide();
        assert_eq!(state.dock_area(), DockRect::new(0.0, 0.0, 120.0, 39.0));
        assert_eq!(state.arrangement().handles.len(), 3);
    }

    #[test]
    fn tab_cycles_through_visible_content() {
        let mut state = ide();
        let order = state.cycle_order();
        assert_eq!(order.len(), 7);
        let start = state.layout().active_content().unwrap();
        let start_index = order.iter().position(|id| *id == start).unwrap();
        state.handle_event(&Event::Key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE)));
        assert_eq!(
            state.layout().active_content(),
            Some(order[(start_index + 1) % order.len()])
        );
    }

    #[test]
    fn float_and_dock_keys_round_trip() {
        let mut state = ide();
        let doc = state.layout().active_content().unwrap();
        press(&mut state, 'f');
        assert_eq!(state.layout().status(doc), ContentStatus::Floating);
        assert!(state.relayout());
        assert_eq!(state.arrangement().floating.len(), 1);
        press(&mut state, 'd');
        assert_eq!(state.layout().status(doc), ContentStatus::Docked);
        assert!(state.layout().floating_windows().is_empty());
    }

    #[test]
    fn auto_hide_adds_edge_strip() {
        let mut state = ide();
        let explorer = state
            .layout()
            .anchorables()
            .into_iter()
            .find(|id| state.layout().content(*id).unwrap().title() == "Explorer")
            .unwrap();
        state.layout.activate(explorer).unwrap();
        press(&mut state, 'a');
        assert_eq!(state.layout().status(explorer), ContentStatus::AutoHidden);
        assert!(state.has_strip(AnchorSide::Left));
        assert_eq!(state.dock_area().x, 1.0);
    }

    #[test]
    fn empty_layout_ignores_content_actions() {
        let mut state = PreviewState::new(
            Scenario::Empty.build(terminal_options(1.0, 3.0)).unwrap(),
        );
        assert_eq!(press(&mut state, 'c'), ControlFlow::Continue);
        assert_eq!(state.status(), "Close");
        assert_eq!(press(&mut state, 'q'), ControlFlow::Quit);
    }

    #[test]
    fn new_document_lands_in_document_pane() {
        let mut state = ide();
        press(&mut state, 'n');
        let active = state.layout().active_content().unwrap();
        assert_eq!(state.layout().content(active).unwrap().title(), "untitled-1");
        let pane = state.layout().parent(active).unwrap();
        assert_eq!(
            state.layout().kind(pane),
            Some(NodeKind::Pane(crate::model::PaneKind::Document))
        );
    }

    #[test]
    fn nudge_grows_active_pane() {
        let mut state = ide();
        let doc = state.layout().active_content().unwrap();
        let pane = state.layout().parent(doc).unwrap();
        let before = state.arrangement().regions.get(pane).unwrap().height;
        press(&mut state, '+');
        state.relayout();
        let after = state.arrangement().regions.get(pane).unwrap().height;
        assert_eq!(after, before + NUDGE);
    }

    #[test]
    fn labels_follow_title_changes() {
        let mut state = ide();
        let doc = state.layout().active_content().unwrap();
        assert_eq!(state.label(doc), Some("main.rs"));
        state.layout.set_title(doc, "main2.rs").unwrap();
        state.relayout();
        assert_eq!(state.label(doc), Some("main2.rs"));
        press(&mut state, 'c');
        state.relayout();
        assert_eq!(state.label(doc), None);
    }

    #[test]
    fn click_activates_pane_under_cursor() {
        let mut state = ide();
        let explorer_pane = state.layout().children(state.layout().root_panel().unwrap())[0];
        let rect = state.arrangement().regions.get(explorer_pane).unwrap().to_cells();
        state.handle_event(&Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: rect.x + 1,
            row: rect.y + 1,
            modifiers: KeyModifiers::NONE,
        }));
        let active = state.layout().active_content().unwrap();
        assert_eq!(state.layout().content(active).unwrap().title(), "Explorer");
    }
}
