//! Key binding registry and resolution.
//!
//! [`KeyBindingRegistry`] maps key+modifier combinations to [`BindingAction`]s.
//! Scrolling keys act on the content container under the pointer, the way a
//! browser scrolls the hovered scroll container.

use std::collections::HashMap;

use super::input::{Key, KeyEvent, Modifiers};

/// Action to take when a key binding is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingAction {
    Quit,
    /// Scroll by this many lines (negative is up).
    ScrollLines(i32),
    /// Scroll by this many viewport heights.
    ScrollPage(i32),
    ScrollHome,
    ScrollEnd,
}

/// Registry of key bindings, mapping (Key, Modifiers) -> BindingAction.
#[derive(Debug, Clone)]
pub struct KeyBindingRegistry {
    bindings: HashMap<(Key, Modifiers), BindingAction>,
}

impl KeyBindingRegistry {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Standard bindings:
    /// `Ctrl+C`/`q` quit, arrows scroll a line, `PageUp`/`PageDown`/`Space`
    /// scroll a page, `Home`/`End` jump.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind(Key::Char('c'), Modifiers::CTRL, BindingAction::Quit);
        registry.bind(Key::Char('q'), Modifiers::NONE, BindingAction::Quit);
        registry.bind(Key::Up, Modifiers::NONE, BindingAction::ScrollLines(-1));
        registry.bind(Key::Down, Modifiers::NONE, BindingAction::ScrollLines(1));
        registry.bind(Key::PageUp, Modifiers::NONE, BindingAction::ScrollPage(-1));
        registry.bind(Key::PageDown, Modifiers::NONE, BindingAction::ScrollPage(1));
        registry.bind(Key::Char(' '), Modifiers::NONE, BindingAction::ScrollPage(1));
        registry.bind(Key::Home, Modifiers::NONE, BindingAction::ScrollHome);
        registry.bind(Key::End, Modifiers::NONE, BindingAction::ScrollEnd);
        registry
    }

    /// Register a binding, replacing any previous one for the same keys.
    pub fn bind(&mut self, key: Key, modifiers: Modifiers, action: BindingAction) {
        self.bindings.insert((key, modifiers), action);
    }

    pub fn unbind(&mut self, key: Key, modifiers: Modifiers) -> Option<BindingAction> {
        self.bindings.remove(&(key, modifiers))
    }

    /// Exact key + modifiers lookup.
    pub fn resolve(&self, event: &KeyEvent) -> Option<BindingAction> {
        self.bindings.get(&(event.code, event.modifiers)).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBindingRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: Key, modifiers: Modifiers) -> KeyEvent {
        KeyEvent { code, modifiers }
    }

    #[test]
    fn defaults() {
        let registry = KeyBindingRegistry::with_defaults();
        assert_eq!(registry.len(), 9);
        assert_eq!(
            registry.resolve(&key(Key::Char('c'), Modifiers::CTRL)),
            Some(BindingAction::Quit)
        );
        assert_eq!(
            registry.resolve(&key(Key::Down, Modifiers::NONE)),
            Some(BindingAction::ScrollLines(1))
        );
        assert_eq!(
            registry.resolve(&key(Key::PageUp, Modifiers::NONE)),
            Some(BindingAction::ScrollPage(-1))
        );
        assert_eq!(registry.resolve(&key(Key::End, Modifiers::NONE)), Some(BindingAction::ScrollEnd));
    }

    #[test]
    fn modifiers_must_match() {
        let registry = KeyBindingRegistry::with_defaults();
        assert_eq!(registry.resolve(&key(Key::Char('c'), Modifiers::NONE)), None);
        assert_eq!(registry.resolve(&key(Key::Down, Modifiers::SHIFT)), None);
    }

    #[test]
    fn rebind_and_unbind() {
        let mut registry = KeyBindingRegistry::new();
        assert!(registry.is_empty());
        registry.bind(Key::Char('j'), Modifiers::NONE, BindingAction::ScrollLines(1));
        registry.bind(Key::Char('j'), Modifiers::NONE, BindingAction::ScrollLines(3));
        assert_eq!(
            registry.resolve(&key(Key::Char('j'), Modifiers::NONE)),
            Some(BindingAction::ScrollLines(3))
        );
        assert_eq!(
            registry.unbind(Key::Char('j'), Modifiers::NONE),
            Some(BindingAction::ScrollLines(3))
        );
        assert!(registry.unbind(Key::Char('j'), Modifiers::NONE).is_none());
    }
}
