use std::collections::HashMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Quit,
    // Active content cycling
    NextContent,
    PrevContent,
    // Content transitions
    Float,
    Dock,
    Hide,
    ShowHidden,
    ToggleAutoHide,
    Close,
    DockAsDocument,
    NewDocument,
    // Splitter nudging around the active pane
    GrowPane,
    ShrinkPane,
    // Diagnostics
    CollectGarbage,
    DumpTree,
    ToggleLog,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Action::Quit => "Quit",
            Action::NextContent => "Activate next content",
            Action::PrevContent => "Activate previous content",
            Action::Float => "Float",
            Action::Dock => "Dock",
            Action::Hide => "Hide",
            Action::ShowHidden => "Show last hidden",
            Action::ToggleAutoHide => "Toggle auto-hide",
            Action::Close => "Close",
            Action::DockAsDocument => "Dock as document",
            Action::NewDocument => "New document",
            Action::GrowPane => "Grow pane",
            Action::ShrinkPane => "Shrink pane",
            Action::CollectGarbage => "Collect garbage",
            Action::DumpTree => "Dump tree to log",
            Action::ToggleLog => "Toggle log",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Shifted letters arrive as uppercase chars, sometimes with SHIFT set
    /// and sometimes without depending on the terminal.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        match key.code {
            KeyCode::Char(c) if c.is_ascii_uppercase() => {
                key.modifiers - KeyModifiers::SHIFT == self.mods - KeyModifiers::SHIFT
            }
            _ => key.modifiers == self.mods,
        }
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", self.code),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: HashMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::new();
        kb.add(Quit, KeyCombo::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        kb.add(Quit, KeyCombo::plain('q'));
        kb.add(NextContent, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(PrevContent, KeyCombo::new(KeyCode::BackTab, KeyModifiers::SHIFT));
        kb.add(PrevContent, KeyCombo::new(KeyCode::BackTab, KeyModifiers::NONE));
        kb.add(Float, KeyCombo::plain('f'));
        kb.add(Dock, KeyCombo::plain('d'));
        kb.add(Hide, KeyCombo::plain('h'));
        kb.add(ShowHidden, KeyCombo::plain('s'));
        kb.add(ToggleAutoHide, KeyCombo::plain('a'));
        kb.add(Close, KeyCombo::plain('c'));
        kb.add(Close, KeyCombo::new(KeyCode::Char('w'), KeyModifiers::CONTROL));
        kb.add(DockAsDocument, KeyCombo::new(KeyCode::Char('D'), KeyModifiers::SHIFT));
        kb.add(NewDocument, KeyCombo::plain('n'));
        kb.add(GrowPane, KeyCombo::plain('+'));
        kb.add(GrowPane, KeyCombo::plain(']'));
        kb.add(ShrinkPane, KeyCombo::plain('-'));
        kb.add(ShrinkPane, KeyCombo::plain('['));
        kb.add(CollectGarbage, KeyCombo::plain('g'));
        kb.add(DumpTree, KeyCombo::plain('p'));
        kb.add(ToggleLog, KeyCombo::plain('l'));
        kb
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// Return the first `KeyCombo` mapped to `action`, if any.
    pub fn first_combo(&self, action: Action) -> Option<KeyCombo> {
        self.map.get(&action).and_then(|list| list.first().cloned())
    }

    /// Compact "key action" hints for the status line, in the given order.
    pub fn hints(&self, actions: &[Action]) -> String {
        actions
            .iter()
            .filter_map(|action| {
                self.first_combo(*action)
                    .map(|combo| format!("{} {}", combo, action.to_string().to_lowercase()))
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}
