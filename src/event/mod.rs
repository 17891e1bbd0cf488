//! Event system: terminal input, key bindings, DOM event queue.

pub mod binding;
pub mod handler;
pub mod input;

pub use binding::{BindingAction, KeyBindingRegistry};
pub use handler::{DomEvent, EventDispatcher};
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
