//! App struct: mounting, input routing, event processing, render loop.
//!
//! [`App`] owns the [`Host`] page and every mounted [`ScrollWrapper`]. It turns
//! terminal input into pointer and scroll calls on the wrapper under the
//! pointer, feeds DOM scroll/load events back to the wrapper that owns the
//! target, and paints the page with scrollbar overlays on top.
//!
//! The `new_headless` constructor allows testing without a real terminal.

use std::time::Duration;

use futures::StreamExt;
use log::{debug, trace, warn};
use slotmap::SlotMap;

use crate::dom::{Dom, NodeId};
use crate::error::Result;
use crate::event::{
    BindingAction, DomEvent, EventDispatcher, InputEvent, KeyBindingRegistry, MouseAction, MouseBtn,
};
use crate::geometry::{Offset, Size};
use crate::host::{Host, DEFAULT_NATIVE_SCROLLBAR_WIDTH};
use crate::layout::SpatialMap;
use crate::render::{paint_dom, Compositor, Driver};
use crate::widget::{LifecycleTracker, Widget, WidgetId};
use crate::widgets::ScrollWrapper;

/// Lines scrolled per mouse wheel notch.
const WHEEL_STEP: i32 = 3;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Terminal window title.
    pub title: String,
    /// Target frames per second for the render loop.
    pub fps: u32,
    /// Width the host reserves for native scrollbars.
    pub native_scrollbar_width: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "scrollwrap".into(),
            fps: 60,
            native_scrollbar_width: DEFAULT_NATIVE_SCROLLBAR_WIDTH,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps.max(1);
        self
    }

    pub fn with_native_scrollbar_width(mut self, width: i32) -> Self {
        self.native_scrollbar_width = width;
        self
    }

    /// Time between frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.fps.max(1)
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// The main application struct.
///
/// The driver is optional to support headless testing.
pub struct App {
    /// The page: DOM, layout and window.
    pub host: Host,
    /// Terminal output driver. `None` in headless mode.
    pub driver: Option<Driver>,
    /// Key binding registry.
    pub bindings: KeyBindingRegistry,
    /// Mount/unmount/update notifications for mounted wrappers.
    pub lifecycle: LifecycleTracker,
    pub config: AppConfig,
    widgets: SlotMap<WidgetId, ScrollWrapper>,
    spatial: SpatialMap,
    compositor: Compositor,
    previous: Option<Compositor>,
    hovered: Option<WidgetId>,
    captured: Option<WidgetId>,
    running: bool,
}

impl App {
    /// Create an app with a real terminal driver sized to the terminal.
    pub fn new(config: AppConfig) -> Result<Self> {
        let (width, height) = Driver::terminal_size()?;
        let mut app = Self::with_config(width, height, config);
        app.driver = Some(Driver::new()?);
        Ok(app)
    }

    /// Create a headless app for testing (no terminal driver).
    pub fn new_headless(width: u16, height: u16) -> Self {
        Self::with_config(width, height, AppConfig::default())
    }

    /// Headless app with an explicit config.
    pub fn with_config(width: u16, height: u16, config: AppConfig) -> Self {
        let size = Size::new(width as i32, height as i32);
        Self {
            host: Host::new(size).with_native_scrollbar_width(config.native_scrollbar_width),
            driver: None,
            bindings: KeyBindingRegistry::with_defaults(),
            lifecycle: LifecycleTracker::new(),
            config,
            widgets: SlotMap::with_key(),
            spatial: SpatialMap::new(),
            compositor: Compositor::new(width, height),
            previous: None,
            hovered: None,
            captured: None,
            running: true,
        }
    }

    // ── Widgets ─────────────────────────────────────────────────────

    /// Mount `wrapper` under `parent`, or under `<body>` when `None`.
    pub fn mount(&mut self, wrapper: ScrollWrapper, parent: Option<NodeId>) -> Result<WidgetId> {
        let parent = match parent {
            Some(parent) => parent,
            None => self.host.body()?,
        };
        let id = self.widgets.insert(wrapper);
        if let Err(err) = self.widgets[id].mount(&mut self.host, parent) {
            self.widgets.remove(id);
            return Err(err);
        }
        self.lifecycle.on_mount(id);
        debug!("mounted wrapper {id:?}");
        Ok(id)
    }

    /// Unmount and drop a wrapper.
    pub fn unmount(&mut self, id: WidgetId) -> Result<()> {
        let Some(mut wrapper) = self.widgets.remove(id) else {
            return Ok(());
        };
        wrapper.unmount(&mut self.host)?;
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.captured == Some(id) {
            self.captured = None;
        }
        self.lifecycle.on_unmount(id);
        Ok(())
    }

    pub fn widget(&self, id: WidgetId) -> Option<&ScrollWrapper> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: WidgetId) -> Option<&mut ScrollWrapper> {
        self.widgets.get_mut(id)
    }

    /// Run `f` with a wrapper and the host it is mounted in.
    pub fn with_widget<R>(
        &mut self,
        id: WidgetId,
        f: impl FnOnce(&mut ScrollWrapper, &mut Host) -> R,
    ) -> Option<R> {
        let wrapper = self.widgets.get_mut(id)?;
        Some(f(wrapper, &mut self.host))
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// The wrapper currently under the pointer.
    pub fn hovered(&self) -> Option<WidgetId> {
        self.hovered
    }

    /// The innermost wrapper at `point`.
    pub fn widget_at(&mut self, point: Offset) -> Option<WidgetId> {
        self.host.reflow();
        self.spatial.update_ordered(&self.host.layout().hit_regions());
        let node = self.spatial.node_at(point)?;
        owner_of(&self.widgets, &self.host.dom, node)
    }

    // ── Input ───────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::Key(key) => {
                if let Some(action) = self.bindings.resolve(&key) {
                    self.apply_binding(action)?;
                }
            }
            InputEvent::Mouse(mouse) => {
                let point = mouse.position();
                match mouse.kind {
                    MouseAction::Moved => self.hover(point),
                    MouseAction::Drag(MouseBtn::Left) => {
                        if let Some(id) = self.captured {
                            if let Some(wrapper) = self.widgets.get_mut(id) {
                                wrapper.pointer_move(&mut self.host, point)?;
                            }
                        } else {
                            self.hover(point);
                        }
                    }
                    MouseAction::Down(MouseBtn::Left) => {
                        self.hover(point);
                        if let Some(id) = self.hovered {
                            if let Some(wrapper) = self.widgets.get_mut(id) {
                                if wrapper.pointer_down(&mut self.host, point)? {
                                    trace!("thumb grabbed on {id:?}");
                                    self.captured = Some(id);
                                }
                            }
                        }
                    }
                    MouseAction::Up(MouseBtn::Left) => {
                        if let Some(id) = self.captured.take() {
                            if let Some(wrapper) = self.widgets.get_mut(id) {
                                wrapper.pointer_up();
                            }
                        }
                        self.hover(point);
                    }
                    MouseAction::ScrollUp => self.wheel(point, Offset::new(0, -WHEEL_STEP))?,
                    MouseAction::ScrollDown => self.wheel(point, Offset::new(0, WHEEL_STEP))?,
                    MouseAction::ScrollLeft => self.wheel(point, Offset::new(-WHEEL_STEP, 0))?,
                    MouseAction::ScrollRight => self.wheel(point, Offset::new(WHEEL_STEP, 0))?,
                    _ => {}
                }
            }
            InputEvent::Resize { width, height } => {
                debug!("window resized to {width}x{height}");
                self.host.resize(Size::new(width as i32, height as i32));
                self.compositor.resize(width, height);
                self.previous = None;
            }
        }
        Ok(())
    }

    /// Track pointer enter/leave between wrappers.
    fn hover(&mut self, point: Offset) {
        let over = self.widget_at(point);
        if over == self.hovered {
            return;
        }
        if let Some(wrapper) = self.hovered.and_then(|id| self.widgets.get_mut(id)) {
            wrapper.pointer_leave();
        }
        if let Some(wrapper) = over.and_then(|id| self.widgets.get_mut(id)) {
            wrapper.pointer_enter();
        }
        trace!("hover {:?} -> {over:?}", self.hovered);
        self.hovered = over;
    }

    fn wheel(&mut self, point: Offset, delta: Offset) -> Result<()> {
        self.hover(point);
        self.scroll_hovered(|_| delta)
    }

    fn apply_binding(&mut self, action: BindingAction) -> Result<()> {
        match action {
            BindingAction::Quit => self.request_quit(),
            BindingAction::ScrollLines(lines) => self.scroll_hovered(|_| Offset::new(0, lines))?,
            BindingAction::ScrollPage(pages) => {
                self.scroll_hovered(|wrapper| Offset::new(0, pages * wrapper.geometry().visible.height.max(1)))?
            }
            BindingAction::ScrollHome => self.scroll_hovered(|wrapper| Offset::new(0, -wrapper.geometry().scroll.y))?,
            BindingAction::ScrollEnd => {
                self.scroll_hovered(|wrapper| Offset::new(0, wrapper.geometry().content.height))?
            }
        }
        Ok(())
    }

    /// Natively scroll the hovered wrapper's content (or the first wrapper).
    fn scroll_hovered(&mut self, delta: impl FnOnce(&ScrollWrapper) -> Offset) -> Result<()> {
        let target = self.hovered.or_else(|| self.widgets.keys().next());
        let Some(wrapper) = target.and_then(|id| self.widgets.get(id)) else {
            return Ok(());
        };
        let Some(content) = wrapper.content() else {
            return Ok(());
        };
        let delta = delta(wrapper);
        self.host.scroll_by(content, delta)?;
        Ok(())
    }

    // ── Processing ──────────────────────────────────────────────────

    /// Dispatch queued DOM events to their owning wrappers, poll change
    /// sources and record lifecycle updates. Returns the number of DOM
    /// events dispatched.
    pub fn process(&mut self) -> Result<usize> {
        let mut dispatcher = EventDispatcher::new();
        let mut handled = 0;
        loop {
            for event in self.host.dom.take_events() {
                dispatcher.push(event);
            }
            if dispatcher.is_empty() {
                break;
            }
            for event in dispatcher.drain() {
                handled += 1;
                let target = event.target();
                let Some(id) = owner_of(&self.widgets, &self.host.dom, target) else {
                    continue;
                };
                let Some(wrapper) = self.widgets.get_mut(id) else {
                    continue;
                };
                match event {
                    DomEvent::Scroll { .. } if wrapper.content() == Some(target) => {
                        wrapper.on_scroll(&mut self.host)?;
                    }
                    DomEvent::Scroll { .. } => {}
                    DomEvent::Load { .. } => {
                        wrapper.on_load(&mut self.host, target)?;
                    }
                }
            }
        }
        for (id, wrapper) in &mut self.widgets {
            wrapper.poll_changes(&mut self.host)?;
            if wrapper.take_dirty() {
                self.lifecycle.on_update(id);
            }
        }
        Ok(handled)
    }

    /// Advance every wrapper's clock by `elapsed`, then process.
    pub fn tick(&mut self, elapsed: Duration) -> Result<()> {
        for (_, wrapper) in &mut self.widgets {
            wrapper.tick(&mut self.host, elapsed)?;
        }
        self.process()?;
        Ok(())
    }

    /// Time until the earliest pending timer of any wrapper.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.widgets
            .values()
            .filter_map(|w| w.next_deadline().map(|d| d.saturating_sub(w.now())))
            .min()
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Paint the page and overlay every wrapper's scrollbar.
    pub fn render(&mut self) -> Result<&Compositor> {
        self.host.reflow();
        self.compositor.clear();
        paint_dom(&self.host.dom, self.host.layout(), &mut self.compositor);
        for (_, wrapper) in &mut self.widgets {
            let Some(outer) = wrapper.outer() else {
                continue;
            };
            let layout_box = self.host.layout_box(outer)?;
            wrapper.set_region(layout_box.region);
            let strips = Widget::render(&*wrapper, layout_box.region);
            self.compositor
                .place_strips(&strips, layout_box.region.intersection(layout_box.clip));
        }
        Ok(&self.compositor)
    }

    pub fn compositor(&self) -> &Compositor {
        &self.compositor
    }

    /// Send changed cells to the terminal.
    pub fn flush(&mut self) -> Result<()> {
        let Some(driver) = self.driver.as_mut() else {
            return Ok(());
        };
        let updates = match &self.previous {
            Some(previous) => self.compositor.diff(previous),
            None => self.compositor.all_cells(),
        };
        driver.apply_updates(&updates)?;
        driver.flush()?;
        self.previous = Some(self.compositor.clone());
        Ok(())
    }

    /// Run until quit: terminal events, timers and frames.
    pub async fn run(&mut self) -> Result<()> {
        if let Some(driver) = self.driver.as_mut() {
            driver.enter(&self.config.title)?;
        }
        let result = self.event_loop().await;
        if let Some(driver) = self.driver.as_mut() {
            driver.leave()?;
        }
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        let mut events = crossterm::event::EventStream::new();
        let frame = self.config.frame_interval();
        let mut last = tokio::time::Instant::now();
        self.process()?;
        self.render()?;
        self.flush()?;

        while self.running {
            let wait = self.next_deadline().map_or(frame, |d| d.min(frame));
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        if let Some(input) = InputEvent::from_crossterm(event) {
                            self.handle_input(input)?;
                        }
                    }
                    Some(Err(err)) => {
                        warn!("terminal event stream failed: {err}");
                        return Err(err.into());
                    }
                    None => break,
                },
                _ = tokio::time::sleep(wait) => {}
            }
            let now = tokio::time::Instant::now();
            self.tick(now - last)?;
            last = now;
            self.render()?;
            self.flush()?;
        }
        debug!("event loop finished");
        Ok(())
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    pub fn request_quit(&mut self) {
        self.running = false;
    }

    pub fn has_driver(&self) -> bool {
        self.driver.is_some()
    }
}

/// The innermost mounted wrapper whose outer box contains `node`.
fn owner_of(widgets: &SlotMap<WidgetId, ScrollWrapper>, dom: &Dom, node: NodeId) -> Option<WidgetId> {
    EventDispatcher::bubble_path(dom, node).into_iter().find_map(|ancestor| {
        widgets
            .iter()
            .find(|(_, w)| w.outer() == Some(ancestor))
            .map(|(id, _)| id)
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::InlineStyle;
    use crate::event::{Key, KeyEvent, Modifiers, MouseEvent};
    use crate::view::Element;
    use crate::widgets::ScrollOptions;

    fn wrapper() -> ScrollWrapper {
        let style = InlineStyle::parse("width: 20px; height: 10px").unwrap();
        ScrollWrapper::new(
            ScrollOptions::new().with_wrapper_style(style).with_min_lengths(1, 1),
            vec![Element::new("div").css("width", "10px").css("height", "40px")],
        )
    }

    fn app_with_wrapper() -> (App, WidgetId) {
        let mut app = App::new_headless(40, 20);
        let id = app.mount(wrapper(), None).unwrap();
        app.tick(Duration::ZERO).unwrap();
        (app, id)
    }

    fn mouse(kind: MouseAction, x: u16, y: u16) -> InputEvent {
        InputEvent::Mouse(MouseEvent::new(kind, x, y))
    }

    #[test]
    fn headless_app_no_driver() {
        let app = App::new_headless(80, 24);
        assert!(!app.has_driver());
        assert!(!app.should_quit());
        assert_eq!(app.compositor().width, 80);
    }

    #[test]
    fn mount_registers_lifecycle() {
        let (mut app, id) = app_with_wrapper();
        assert!(app.lifecycle.is_mounted(id));
        assert_eq!(app.widget_count(), 1);
        app.unmount(id).unwrap();
        assert!(!app.lifecycle.is_mounted(id));
        assert_eq!(app.widget_count(), 0);
    }

    #[test]
    fn mount_under_missing_parent_fails() {
        let (mut app, id) = app_with_wrapper();
        let outer = app.widget(id).unwrap().outer().unwrap();
        app.unmount(id).unwrap();
        assert!(app.mount(wrapper(), Some(outer)).is_err());
        assert_eq!(app.widget_count(), 0);
    }

    #[test]
    fn hover_enters_and_leaves() {
        let (mut app, id) = app_with_wrapper();
        app.handle_input(mouse(MouseAction::Moved, 5, 5)).unwrap();
        assert_eq!(app.hovered(), Some(id));
        assert!(app.widget(id).unwrap().is_shown());
        app.handle_input(mouse(MouseAction::Moved, 30, 15)).unwrap();
        assert_eq!(app.hovered(), None);
        assert!(!app.widget(id).unwrap().is_shown());
    }

    #[test]
    fn wheel_scrolls_content_and_updates_wrapper() {
        let (mut app, id) = app_with_wrapper();
        app.handle_input(mouse(MouseAction::ScrollDown, 5, 5)).unwrap();
        assert_eq!(app.process().unwrap(), 1);
        assert_eq!(app.widget(id).unwrap().geometry().scroll, Offset::new(0, WHEEL_STEP));
    }

    #[test]
    fn keys_scroll_the_hovered_wrapper() {
        let (mut app, id) = app_with_wrapper();
        app.handle_input(InputEvent::Key(KeyEvent::plain(Key::End))).unwrap();
        app.process().unwrap();
        assert_eq!(app.widget(id).unwrap().geometry().scroll.y, 30);
        app.handle_input(InputEvent::Key(KeyEvent::plain(Key::Home))).unwrap();
        app.process().unwrap();
        assert_eq!(app.widget(id).unwrap().geometry().scroll.y, 0);
    }

    #[test]
    fn ctrl_c_quits() {
        let mut app = App::new_headless(10, 10);
        let event = InputEvent::Key(KeyEvent::new(Key::Char('c'), Modifiers::CTRL));
        app.handle_input(event).unwrap();
        assert!(app.should_quit());
    }

    #[test]
    fn resize_reaches_the_window() {
        let (mut app, _) = app_with_wrapper();
        app.handle_input(InputEvent::Resize { width: 60, height: 30 }).unwrap();
        assert_eq!(app.host.window.size(), Size::new(60, 30));
        assert_eq!(app.compositor().width, 60);
    }

    #[test]
    fn process_records_updates() {
        let (mut app, id) = app_with_wrapper();
        app.lifecycle.pending_events();
        app.handle_input(mouse(MouseAction::ScrollDown, 5, 5)).unwrap();
        app.process().unwrap();
        assert!(app
            .lifecycle
            .pending_events()
            .contains(&crate::widget::LifecycleEvent::Update { widget: id }));
    }

    #[test]
    fn render_overlays_the_scrollbar() {
        let (mut app, _) = app_with_wrapper();
        app.handle_input(mouse(MouseAction::Moved, 5, 5)).unwrap();
        let compositor = app.render().unwrap();
        assert_eq!(compositor.get_cell(19, 0).map(|c| c.ch), Some('█'));
        assert_eq!(compositor.get_cell(19, 9).map(|c| c.ch), Some('│'));
        assert_eq!(compositor.get_cell(20, 0).map(|c| c.ch), Some(' '));
    }

    #[test]
    fn app_config_builder() {
        let config = AppConfig::new()
            .with_title("pandas")
            .with_fps(30)
            .with_native_scrollbar_width(2);
        assert_eq!(config.title, "pandas");
        assert_eq!(config.fps, 30);
        assert_eq!(config.native_scrollbar_width, 2);
        assert_eq!(config.frame_interval(), Duration::from_millis(33) + Duration::from_nanos(333_333));
    }
}
