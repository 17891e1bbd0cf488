//! ScrollWrapper: native scrolling content behind an overlay scrollbar.
//!
//! The wrapper renders three nested boxes:
//!
//! ```text
//! outer    consumer's wrapper style and classes, pointer enter/leave
//! └ inner  position: relative; 100% x 100%; overflow: hidden
//!   └ content  absolute, right/bottom pulled out by the gutter, overflow: scroll
//! ```
//!
//! Pulling the content box out by the native scrollbar's gutter pushes the
//! native bars outside the clipped inner box, so only the overlay shows. The
//! gutter is measured, and the insets follow whenever it changes.
//!
//! Every state change schedules a zero-delay remeasure, which runs on the
//! next [`tick`](ScrollWrapper::tick) after layout has caught up.

use std::any::Any;
use std::time::Duration;

use log::{debug, trace, warn};

use crate::css::Scalar;
use crate::dom::NodeId;
use crate::error::{Error, Result};
use crate::geometry::{Offset, Region};
use crate::host::Host;
use crate::render::strip::Strip;
use crate::schedule::{Scheduler, TimerId};
use crate::view::{inject_load_hooks, materialize, Element, LoadContext};
use crate::widget::Widget;

use super::change::{ChangeSource, MutationSource, ResizeSource};
use super::measure::{measure, Geometry, Gutter};
use super::options::{ScrollOptions, VisibilityPolicy};
use super::scrollbar::{DragScroll, ScrollBar, ScrollBarProps};

/// Timer tasks owned by a wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Re-measure after the pending layout pass.
    Remeasure,
    /// Fade-out timer.
    Hide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Nodes {
    outer: NodeId,
    inner: NodeId,
    content: NodeId,
}

/// Forwards scrollbar drags to the content container's scroll position.
struct ContentScroller<'a> {
    host: &'a mut Host,
    content: NodeId,
    result: Result<()>,
}

impl ContentScroller<'_> {
    fn write(&mut self, offset: impl FnOnce(Offset) -> Offset) {
        if self.result.is_err() {
            return;
        }
        let target = offset(self.host.dom.scroll_offset(self.content));
        self.result = self.host.scroll_to(self.content, target).map(|_| ());
    }
}

impl DragScroll for ContentScroller<'_> {
    fn drag_scroll_x(&mut self, scroll_left: i32) {
        self.write(|current| Offset::new(scroll_left, current.y));
    }

    fn drag_scroll_y(&mut self, scroll_top: i32) {
        self.write(|current| Offset::new(current.x, scroll_top));
    }
}

pub struct ScrollWrapper {
    options: ScrollOptions,
    policy: VisibilityPolicy,
    children: Vec<Element>,
    nodes: Option<Nodes>,
    geometry: Geometry,
    show: bool,
    hide_timer: Option<TimerId>,
    remeasure_pending: bool,
    scheduler: Scheduler<Deferred>,
    sources: Vec<Box<dyn ChangeSource>>,
    scrollbar: ScrollBar,
    recomputes: usize,
    updates: usize,
    dirty: bool,
}

impl ScrollWrapper {
    pub fn new(options: ScrollOptions, children: Vec<Element>) -> Self {
        let policy = VisibilityPolicy::from_options(&options);
        let scrollbar = ScrollBar::new(&options);
        Self {
            options,
            policy,
            children,
            nodes: None,
            geometry: Geometry::default(),
            show: false,
            hide_timer: None,
            remeasure_pending: false,
            scheduler: Scheduler::new(),
            sources: Vec::new(),
            scrollbar,
            recomputes: 0,
            updates: 0,
            dirty: false,
        }
    }

    pub fn options(&self) -> &ScrollOptions {
        &self.options
    }

    pub fn policy(&self) -> VisibilityPolicy {
        self.policy
    }

    /// Last stored geometry.
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    /// Whether the scrollbar is requested visible (it may still be fading).
    pub fn is_shown(&self) -> bool {
        self.show
    }

    pub fn scrollbar(&self) -> &ScrollBar {
        &self.scrollbar
    }

    pub fn is_mounted(&self) -> bool {
        self.nodes.is_some()
    }

    pub fn outer(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.outer)
    }

    pub fn content(&self) -> Option<NodeId> {
        self.nodes.map(|n| n.content)
    }

    /// Number of measurement passes run by [`update`](Self::update).
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    /// Number of times the stored state was replaced.
    pub fn update_count(&self) -> usize {
        self.updates
    }

    /// Whether anything visible changed since the last call.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Current time on the wrapper's timer clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn has_pending_hide(&self) -> bool {
        self.hide_timer.is_some_and(|id| self.scheduler.is_pending(id))
    }

    /// Earliest pending timer or fade end.
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.scheduler.next_deadline(), self.scrollbar.fade_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn nodes(&self) -> Result<Nodes> {
        self.nodes.ok_or(Error::NotMounted)
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// The element tree for the current state. Children get load hooks when
    /// `onLoadUpdate` is set; the consumer's tree is left untouched.
    pub fn render(&self) -> Element {
        let children = if self.options.on_load_update {
            inject_load_hooks(self.children.clone())
        } else {
            self.children.clone()
        };
        let mut outer = Element::new("div").style(&self.options.wrapper_style);
        if let Some(names) = &self.options.wrapper_class_names {
            outer = outer.class_names(names);
        }
        let content = Element::new("div")
            .css("position", "absolute")
            .css("top", "0")
            .css("left", "0")
            .css("right", inset(self.geometry.gutter.right))
            .css("bottom", inset(self.geometry.gutter.bottom))
            .css("overflow", "scroll")
            .children(children);
        let inner = Element::new("div")
            .css("position", "relative")
            .css("width", "100%")
            .css("height", "100%")
            .css("overflow", "hidden")
            .child(content);
        outer.child(inner)
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Materialise under `parent`, subscribe change sources and take the
    /// initial measurement. Mounting twice returns the existing outer node.
    ///
    /// On failure nothing stays behind: the subtree is removed and every
    /// subscription made so far is undone.
    pub fn mount(&mut self, host: &mut Host, parent: NodeId) -> Result<NodeId> {
        if let Some(nodes) = self.nodes {
            return Ok(nodes.outer);
        }
        if !host.dom.contains(parent) {
            return Err(Error::MissingNode(parent));
        }
        let outer = materialize(&mut host.dom, Some(parent), self.render());
        self.attach(host, outer)
    }

    fn attach(&mut self, host: &mut Host, outer: NodeId) -> Result<NodeId> {
        let previous = self.geometry;
        match self.subscribe_and_measure(host, outer) {
            Ok(()) => {
                debug!(
                    "scroll wrapper mounted: visible {:?} content {:?} gutter {:?}",
                    self.geometry.visible, self.geometry.content, self.geometry.gutter
                );
                self.changed();
                Ok(outer)
            }
            Err(err) => {
                warn!("scroll wrapper mount failed: {err}");
                self.detach(host, outer);
                self.geometry = previous;
                Err(err)
            }
        }
    }

    fn subscribe_and_measure(&mut self, host: &mut Host, outer: NodeId) -> Result<()> {
        let inner = first_child(host, outer)?;
        let content = first_child(host, inner)?;
        self.nodes = Some(Nodes { outer, inner, content });

        self.sources.push(Box::new(ResizeSource::subscribe(host)));
        if self.options.auto_update {
            self.sources.push(Box::new(MutationSource::observe(host, outer)));
        }

        let measured = measure(host, content, &self.geometry)?;
        let gutter_changed = measured.gutter != self.geometry.gutter;
        self.geometry = measured;
        if gutter_changed {
            self.apply_gutter(host)?;
        }
        Ok(())
    }

    /// Unsubscribe change sources, drop timers and remove the DOM subtree.
    pub fn unmount(&mut self, host: &mut Host) -> Result<()> {
        let nodes = self.nodes()?;
        self.detach(host, nodes.outer);
        debug!("scroll wrapper unmounted");
        Ok(())
    }

    fn detach(&mut self, host: &mut Host, outer: NodeId) {
        for source in &mut self.sources {
            source.disconnect(host);
        }
        self.sources.clear();
        self.scheduler.clear();
        self.hide_timer = None;
        self.remeasure_pending = false;
        self.scrollbar.pointer_up();
        host.dom.remove(outer);
        self.nodes = None;
    }

    // ── Measurement ─────────────────────────────────────────────────

    /// Re-measure. The stored geometry is replaced only if the visible box,
    /// content box or gutter changed; returns whether it was.
    pub fn update(&mut self, host: &mut Host) -> Result<bool> {
        let nodes = self.nodes()?;
        self.recomputes += 1;
        let measured = measure(host, nodes.content, &self.geometry)?;
        if !measured.differs_from(&self.geometry) {
            trace!("update: geometry unchanged");
            return Ok(false);
        }
        let gutter_changed = measured.gutter != self.geometry.gutter;
        self.geometry = Geometry {
            scroll: self.geometry.scroll,
            ..measured
        };
        if gutter_changed {
            self.apply_gutter(host)?;
        }
        debug!(
            "update: visible {:?} content {:?} gutter {:?}",
            self.geometry.visible, self.geometry.content, self.geometry.gutter
        );
        self.changed();
        Ok(true)
    }

    /// Poll every change source; any firing triggers one update.
    pub fn poll_changes(&mut self, host: &mut Host) -> Result<bool> {
        let mut fired = false;
        for source in &mut self.sources {
            if source.poll(host) {
                trace!("{} change source fired", source.name());
                fired = true;
            }
        }
        if fired {
            self.update(host)?;
        }
        Ok(fired)
    }

    /// Run the load hook of `node`; a hook that requests it triggers one update.
    pub fn on_load(&mut self, host: &mut Host, node: NodeId) -> Result<bool> {
        let Some(hook) = host.dom.load_hook(node) else {
            return Ok(false);
        };
        let mut ctx = LoadContext::new(node);
        hook(&mut ctx);
        if ctx.update_requested() {
            trace!("load hook requested an update");
            self.update(host)?;
        }
        Ok(ctx.update_requested())
    }

    /// Advance the wrapper's clock by `elapsed`, running due remeasures and
    /// hides in deadline order.
    pub fn tick(&mut self, host: &mut Host, elapsed: Duration) -> Result<()> {
        let until = self.scheduler.now() + elapsed;
        while let Some((id, task)) = self.scheduler.pop_due(until) {
            self.advance_fade();
            match task {
                Deferred::Remeasure => {
                    self.remeasure_pending = false;
                    if self.nodes.is_some() {
                        self.update(host)?;
                    }
                }
                Deferred::Hide => {
                    if self.hide_timer == Some(id) {
                        self.hide_timer = None;
                        debug!("fade out");
                        self.set_show(false);
                    }
                }
            }
        }
        self.advance_fade();
        Ok(())
    }

    fn advance_fade(&mut self) {
        if self.scrollbar.advance(self.scheduler.now()) {
            self.dirty = true;
        }
    }

    // ── Scrolling ───────────────────────────────────────────────────

    /// Native scroll on the content container: store its offsets and show
    /// the scrollbar per the visibility policy.
    pub fn on_scroll(&mut self, host: &mut Host) -> Result<()> {
        let nodes = self.nodes()?;
        self.interact();
        let scroll = host.dom.scroll_offset(nodes.content);
        if scroll != self.geometry.scroll {
            trace!("scroll {scroll:?}");
            self.geometry.scroll = scroll;
            self.changed();
        }
        Ok(())
    }

    /// Set the content's `scrollLeft` to `value`.
    pub fn drag_scroll_x(&mut self, host: &mut Host, value: i32) -> Result<()> {
        let nodes = self.nodes()?;
        let mut scroller = ContentScroller {
            host,
            content: nodes.content,
            result: Ok(()),
        };
        scroller.drag_scroll_x(value);
        scroller.result
    }

    /// Set the content's `scrollTop` to `value`.
    pub fn drag_scroll_y(&mut self, host: &mut Host, value: i32) -> Result<()> {
        let nodes = self.nodes()?;
        let mut scroller = ContentScroller {
            host,
            content: nodes.content,
            result: Ok(()),
        };
        scroller.drag_scroll_y(value);
        scroller.result
    }

    // ── Visibility ──────────────────────────────────────────────────

    pub fn pointer_enter(&mut self) {
        self.interact();
    }

    /// Hides at once unless pinned.
    pub fn pointer_leave(&mut self) {
        if !self.policy.hides_on_leave() {
            return;
        }
        self.cancel_hide();
        self.set_show(false);
    }

    fn interact(&mut self) {
        match self.policy {
            VisibilityPolicy::AutoFade { hide_after } => self.fade(hide_after),
            VisibilityPolicy::Pinned | VisibilityPolicy::Manual => self.set_show(true),
        }
    }

    /// Show now and (re)arm the single hide timer.
    fn fade(&mut self, hide_after: Duration) {
        self.cancel_hide();
        self.set_show(true);
        self.hide_timer = Some(self.scheduler.set_timeout(hide_after, Deferred::Hide));
        trace!("hide scheduled at {:?}", self.scheduler.now() + hide_after);
    }

    fn cancel_hide(&mut self) {
        if let Some(id) = self.hide_timer.take() {
            self.scheduler.clear_timeout(id);
        }
    }

    fn set_show(&mut self, show: bool) {
        if self.show != show {
            self.show = show;
            self.changed();
        }
    }

    // ── Pointer on the scrollbar ────────────────────────────────────

    /// Press at `point`; returns whether a scrollbar track took it.
    pub fn pointer_down(&mut self, host: &mut Host, point: Offset) -> Result<bool> {
        let nodes = self.nodes()?;
        self.scrollbar.set_region(host.region(nodes.outer)?);
        let mut scroller = ContentScroller {
            host,
            content: nodes.content,
            result: Ok(()),
        };
        let hit = self.scrollbar.pointer_down(point, &mut scroller);
        scroller.result?;
        Ok(hit)
    }

    /// Screen region of the outer box, for scrollbar hit testing.
    pub fn set_region(&mut self, region: Region) {
        self.scrollbar.set_region(region);
    }

    pub fn pointer_move(&mut self, host: &mut Host, point: Offset) -> Result<bool> {
        let nodes = self.nodes()?;
        let mut scroller = ContentScroller {
            host,
            content: nodes.content,
            result: Ok(()),
        };
        let moved = self.scrollbar.pointer_move(point, &mut scroller);
        scroller.result?;
        Ok(moved)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.scrollbar.pointer_up()
    }

    pub fn is_dragging(&self) -> bool {
        self.scrollbar.is_dragging()
    }

    // ── Internals ───────────────────────────────────────────────────

    /// State changed: repaint, push props down, remeasure after layout.
    fn changed(&mut self) {
        self.updates += 1;
        self.dirty = true;
        let props = ScrollBarProps {
            visible: self.geometry.visible,
            content: self.geometry.content,
            scroll: self.geometry.scroll,
            show: self.show,
        };
        self.scrollbar.set_props(props, self.scheduler.now());
        if !self.remeasure_pending && self.nodes.is_some() {
            self.remeasure_pending = true;
            self.scheduler.set_timeout(Duration::ZERO, Deferred::Remeasure);
        }
    }

    fn apply_gutter(&self, host: &mut Host) -> Result<()> {
        let nodes = self.nodes()?;
        let Gutter { right, bottom } = self.geometry.gutter;
        host.dom.set_style_property(nodes.content, "right", &inset(right));
        host.dom.set_style_property(nodes.content, "bottom", &inset(bottom));
        Ok(())
    }
}

impl Widget for ScrollWrapper {
    fn widget_type(&self) -> &str {
        "ScrollWrapper"
    }

    fn render(&self, region: Region) -> Vec<Strip> {
        self.scrollbar.render(region)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Negative inset that pulls an edge out by `gutter`.
fn inset(gutter: i32) -> String {
    Scalar::px(-gutter as f32).to_string()
}

fn first_child(host: &Host, node: NodeId) -> Result<NodeId> {
    host.dom
        .children(node)
        .first()
        .copied()
        .ok_or(Error::MissingNode(node))
}
