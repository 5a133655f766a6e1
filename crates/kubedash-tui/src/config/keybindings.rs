use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    ListNavigation,
    Detail,
    SearchInput,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::new(KeyCode::Backspace), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('/')), Action::OpenSearch);
        global.insert(KeyBinding::new(KeyCode::Char('r')), Action::Refresh);
        global.insert(KeyBinding::ctrl(KeyCode::Char('r')), Action::Refresh);
        global.insert(KeyBinding::new(KeyCode::Char('a')), Action::ClearNamespace);
        bindings.insert(KeyContext::Global, global);

        // List navigation bindings
        let mut list_nav = HashMap::new();
        list_nav.insert(KeyBinding::new(KeyCode::Char('j')), Action::ListDown);
        list_nav.insert(KeyBinding::new(KeyCode::Down), Action::ListDown);
        list_nav.insert(KeyBinding::new(KeyCode::Char('k')), Action::ListUp);
        list_nav.insert(KeyBinding::new(KeyCode::Up), Action::ListUp);
        list_nav.insert(KeyBinding::new(KeyCode::Enter), Action::ListSelect);
        bindings.insert(KeyContext::ListNavigation, list_nav);

        // Detail page bindings - less-like scrolling
        let mut detail = HashMap::new();
        detail.insert(KeyBinding::new(KeyCode::Char('j')), Action::ScrollDown(1));
        detail.insert(KeyBinding::new(KeyCode::Down), Action::ScrollDown(1));
        detail.insert(KeyBinding::new(KeyCode::Char('k')), Action::ScrollUp(1));
        detail.insert(KeyBinding::new(KeyCode::Up), Action::ScrollUp(1));
        detail.insert(KeyBinding::ctrl(KeyCode::Char('d')), Action::ScrollDown(10));
        detail.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::ScrollUp(10));
        detail.insert(KeyBinding::new(KeyCode::PageDown), Action::ScrollDown(10));
        detail.insert(KeyBinding::new(KeyCode::PageUp), Action::ScrollUp(10));
        detail.insert(KeyBinding::new(KeyCode::Char('g')), Action::ScrollToTop);
        detail.insert(KeyBinding::new(KeyCode::Home), Action::ScrollToTop);
        bindings.insert(KeyContext::Detail, detail);

        // Search bar bindings
        let mut search = HashMap::new();
        search.insert(KeyBinding::new(KeyCode::Enter), Action::SubmitSearch);
        search.insert(KeyBinding::new(KeyCode::Esc), Action::CloseSearch);
        search.insert(KeyBinding::new(KeyCode::Backspace), Action::SearchBackspace);
        search.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.insert(KeyContext::SearchInput, search);

        Self { bindings }
    }

    /// Get action for a key event in the given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|context_bindings| context_bindings.get(&binding))
        {
            return Some(action.clone());
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    /// Handle key event while the search bar is open.
    /// Returns Some(Action) for special keys and typed characters
    pub fn get_search_input_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        if let Some(action) = self
            .bindings
            .get(&KeyContext::SearchInput)
            .and_then(|search_bindings| search_bindings.get(&binding))
        {
            return Some(action.clone());
        }

        match key.code {
            KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                Some(Action::SearchInput(c))
            }
            _ => None,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_context_binding_wins_over_global() {
        let kb = KeyBindings::new();
        assert_eq!(
            kb.get_action(KeyContext::Detail, &key(KeyCode::Char('j'))),
            Some(Action::ScrollDown(1))
        );
        assert_eq!(
            kb.get_action(KeyContext::ListNavigation, &key(KeyCode::Char('j'))),
            Some(Action::ListDown)
        );
    }

    #[test]
    fn test_falls_back_to_global() {
        let kb = KeyBindings::new();
        assert_eq!(
            kb.get_action(KeyContext::ListNavigation, &key(KeyCode::Char('q'))),
            Some(Action::Quit)
        );
        assert_eq!(kb.get_action(KeyContext::Detail, &key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_search_input_captures_characters() {
        let kb = KeyBindings::new();
        // 'q' is typed, not quit
        assert_eq!(
            kb.get_search_input_action(&key(KeyCode::Char('q'))),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            kb.get_search_input_action(&KeyEvent::new(KeyCode::Char('W'), KeyModifiers::SHIFT)),
            Some(Action::SearchInput('W'))
        );
        assert_eq!(kb.get_search_input_action(&key(KeyCode::Enter)), Some(Action::SubmitSearch));
        assert_eq!(kb.get_search_input_action(&key(KeyCode::Esc)), Some(Action::CloseSearch));
        assert_eq!(kb.get_search_input_action(&key(KeyCode::Tab)), None);
    }
}
