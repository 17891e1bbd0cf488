//! Input events decoupled from crossterm.
//!
//! Only the app's run loop sees crossterm events; it converts them with
//! [`InputEvent::from_crossterm`] and everything downstream (the `App`, the
//! headless `Pilot`) works with these types.

use std::ops::BitOr;

use crossterm::event as ct;

use crate::geometry::Offset;

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key without modifiers.
    pub fn plain(code: Key) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Drag(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(kind: MouseAction, x: u16, y: u16) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    /// Pointer position in screen cells.
    pub fn position(&self) -> Offset {
        Offset::new(self.x as i32, self.y as i32)
    }
}

/// Top-level input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
}

impl InputEvent {
    /// Convert a crossterm event; focus, paste, key release and unknown keys
    /// yield `None`.
    pub fn from_crossterm(event: ct::Event) -> Option<InputEvent> {
        match event {
            ct::Event::Key(key) if key.kind != ct::KeyEventKind::Release => {
                convert_key(key).map(InputEvent::Key)
            }
            ct::Event::Mouse(mouse) => Some(InputEvent::Mouse(convert_mouse(mouse))),
            ct::Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),
            _ => None,
        }
    }
}

fn convert_modifiers(m: ct::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(ct::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(ct::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(ct::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(key: ct::KeyEvent) -> Option<KeyEvent> {
    let code = match key.code {
        ct::KeyCode::Char(c) => Key::Char(c),
        ct::KeyCode::Enter => Key::Enter,
        ct::KeyCode::Esc => Key::Escape,
        ct::KeyCode::Tab => Key::Tab,
        ct::KeyCode::Left => Key::Left,
        ct::KeyCode::Right => Key::Right,
        ct::KeyCode::Up => Key::Up,
        ct::KeyCode::Down => Key::Down,
        ct::KeyCode::Home => Key::Home,
        ct::KeyCode::End => Key::End,
        ct::KeyCode::PageUp => Key::PageUp,
        ct::KeyCode::PageDown => Key::PageDown,
        _ => return None,
    };
    Some(KeyEvent::new(code, convert_modifiers(key.modifiers)))
}

fn convert_button(button: ct::MouseButton) -> MouseBtn {
    match button {
        ct::MouseButton::Left => MouseBtn::Left,
        ct::MouseButton::Right => MouseBtn::Right,
        ct::MouseButton::Middle => MouseBtn::Middle,
    }
}

fn convert_mouse(mouse: ct::MouseEvent) -> MouseEvent {
    let kind = match mouse.kind {
        ct::MouseEventKind::Down(b) => MouseAction::Down(convert_button(b)),
        ct::MouseEventKind::Up(b) => MouseAction::Up(convert_button(b)),
        ct::MouseEventKind::Drag(b) => MouseAction::Drag(convert_button(b)),
        ct::MouseEventKind::Moved => MouseAction::Moved,
        ct::MouseEventKind::ScrollUp => MouseAction::ScrollUp,
        ct::MouseEventKind::ScrollDown => MouseAction::ScrollDown,
        ct::MouseEventKind::ScrollLeft => MouseAction::ScrollLeft,
        ct::MouseEventKind::ScrollRight => MouseAction::ScrollRight,
    };
    MouseEvent {
        kind,
        x: mouse.column,
        y: mouse.row,
        modifiers: convert_modifiers(mouse.modifiers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modifiers_combine() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(!mods.contains(Modifiers::SHIFT));
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn key_conversion() {
        let event = ct::Event::Key(ct::KeyEvent::new(ct::KeyCode::Char('c'), ct::KeyModifiers::CONTROL));
        assert_eq!(
            InputEvent::from_crossterm(event),
            Some(InputEvent::Key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL)))
        );
        let event = ct::Event::Key(ct::KeyEvent::new(ct::KeyCode::PageDown, ct::KeyModifiers::NONE));
        assert_eq!(
            InputEvent::from_crossterm(event),
            Some(InputEvent::Key(KeyEvent::plain(Key::PageDown)))
        );
    }

    #[test]
    fn unknown_keys_and_releases_are_dropped() {
        let f1 = ct::Event::Key(ct::KeyEvent::new(ct::KeyCode::F(1), ct::KeyModifiers::NONE));
        assert_eq!(InputEvent::from_crossterm(f1), None);

        let mut release = ct::KeyEvent::new(ct::KeyCode::Down, ct::KeyModifiers::NONE);
        release.kind = ct::KeyEventKind::Release;
        assert_eq!(InputEvent::from_crossterm(ct::Event::Key(release)), None);
        assert_eq!(InputEvent::from_crossterm(ct::Event::FocusLost), None);
    }

    #[test]
    fn mouse_conversion() {
        let event = ct::Event::Mouse(ct::MouseEvent {
            kind: ct::MouseEventKind::Drag(ct::MouseButton::Left),
            column: 7,
            row: 3,
            modifiers: ct::KeyModifiers::SHIFT,
        });
        let Some(InputEvent::Mouse(mouse)) = InputEvent::from_crossterm(event) else {
            panic!("expected a mouse event");
        };
        assert_eq!(mouse.kind, MouseAction::Drag(MouseBtn::Left));
        assert_eq!(mouse.position(), Offset::new(7, 3));
        assert_eq!(mouse.modifiers, Modifiers::SHIFT);
    }

    #[test]
    fn resize_conversion() {
        assert_eq!(
            InputEvent::from_crossterm(ct::Event::Resize(100, 40)),
            Some(InputEvent::Resize { width: 100, height: 40 })
        );
    }
}
