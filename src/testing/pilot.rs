//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`] in headless mode and provides methods to
//! simulate user input (pointer hover, wheel, thumb drags, keys, resize),
//! advance the virtual clock, finish pending loads and read the screen back
//! as text.

use std::time::Duration;

use crate::app::{App, AppConfig};
use crate::dom::NodeId;
use crate::error::Result;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
use crate::view::Element;
use crate::widget::WidgetId;
use crate::widgets::{ScrollOptions, ScrollWrapper};

use super::snapshot::compositor_to_string;

/// Pointer position guaranteed to be outside every wrapper.
const OFF_SCREEN: u16 = u16::MAX;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```ignore
/// use scrollwrap::testing::Pilot;
/// use scrollwrap::view::Element;
/// use scrollwrap::widgets::ScrollOptions;
///
/// let mut pilot = Pilot::new(40, 20);
/// let id = pilot.mount(ScrollOptions::new(), vec![Element::paragraph("hi")])?;
/// pilot.hover(1, 1)?;
/// assert!(pilot.wrapper(id).unwrap().is_shown());
/// ```
pub struct Pilot {
    app: App,
}

impl Pilot {
    /// Create a headless app with the given terminal size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            app: App::new_headless(width, height),
        }
    }

    /// Create a Pilot from an [`AppConfig`], forcing headless mode.
    pub fn with_config(width: u16, height: u16, config: AppConfig) -> Self {
        Self {
            app: App::with_config(width, height, config),
        }
    }

    // ── Mounting ─────────────────────────────────────────────────────

    /// Mount a wrapper under `<body>` and let its first measurements settle.
    pub fn mount(&mut self, options: ScrollOptions, children: Vec<Element>) -> Result<WidgetId> {
        self.mount_under(None, options, children)
    }

    /// Mount a wrapper under `parent` and let its first measurements settle.
    pub fn mount_under(
        &mut self,
        parent: Option<NodeId>,
        options: ScrollOptions,
        children: Vec<Element>,
    ) -> Result<WidgetId> {
        let id = self.app.mount(ScrollWrapper::new(options, children), parent)?;
        self.settle()?;
        Ok(id)
    }

    pub fn unmount(&mut self, id: WidgetId) -> Result<()> {
        self.app.unmount(id)
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Move the pointer to (x, y).
    pub fn hover(&mut self, x: u16, y: u16) -> Result<()> {
        self.mouse(MouseAction::Moved, x, y)
    }

    /// Move the pointer off every wrapper.
    pub fn leave(&mut self) -> Result<()> {
        self.mouse(MouseAction::Moved, OFF_SCREEN, OFF_SCREEN)
    }

    /// One wheel notch down (positive `notches`) or up (negative) at (x, y).
    pub fn wheel(&mut self, x: u16, y: u16, notches: i32) -> Result<()> {
        let kind = if notches < 0 {
            MouseAction::ScrollUp
        } else {
            MouseAction::ScrollDown
        };
        for _ in 0..notches.unsigned_abs() {
            self.mouse(kind, x, y)?;
        }
        self.process()
    }

    /// Press at `from`, drag to `to`, release, then process the resulting
    /// scroll events.
    pub fn drag(&mut self, from: (u16, u16), to: (u16, u16)) -> Result<()> {
        self.mouse(MouseAction::Down(MouseBtn::Left), from.0, from.1)?;
        self.mouse(MouseAction::Drag(MouseBtn::Left), to.0, to.1)?;
        self.mouse(MouseAction::Up(MouseBtn::Left), to.0, to.1)?;
        self.process()
    }

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> Result<()> {
        self.press_key_with(key, Modifiers::NONE)
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        self.app.handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)))?;
        self.process()
    }

    /// Simulate a terminal resize, then let change sources fire.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        self.app.handle_input(InputEvent::Resize { width, height })?;
        self.process()
    }

    fn mouse(&mut self, kind: MouseAction, x: u16, y: u16) -> Result<()> {
        self.app.handle_input(InputEvent::Mouse(MouseEvent::new(kind, x, y)))
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Dispatch pending DOM events and poll change sources.
    pub fn process(&mut self) -> Result<()> {
        self.app.process().map(|_| ())
    }

    /// Advance the virtual clock by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) -> Result<()> {
        self.app.tick(elapsed)
    }

    /// Advance by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) -> Result<()> {
        self.advance(Duration::from_millis(ms))
    }

    /// Run everything due now without moving the clock.
    pub fn settle(&mut self) -> Result<()> {
        self.advance(Duration::ZERO)
    }

    /// Mark `node` loaded and dispatch its load event.
    pub fn finish_load(&mut self, node: NodeId) -> Result<bool> {
        let loaded = self.app.host.dom.finish_load(node);
        self.process()?;
        Ok(loaded)
    }

    /// Finish every `<img>` still loading.
    pub fn finish_all_loads(&mut self) -> Result<usize> {
        let pending = self.app.host.dom.query_all(|n| n.is_load_target() && !n.loaded);
        for &node in &pending {
            self.app.host.dom.finish_load(node);
        }
        self.process()?;
        Ok(pending.len())
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    pub fn wrapper(&self, id: WidgetId) -> Option<&ScrollWrapper> {
        self.app.widget(id)
    }

    /// Whether the app is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }

    /// Render the frame and return it as text.
    pub fn screen_text(&mut self) -> Result<String> {
        let compositor = self.app.render()?;
        Ok(compositor_to_string(compositor))
    }
}

// ===========================================================================
// Tests
// ===========================================================================
