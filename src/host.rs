//! The page a widget lives in: DOM, window and layout.
//!
//! [`Host`] plays the part of the browser. Reading metrics forces a layout
//! pass when the DOM changed since the last one, so widgets always measure
//! fresh boxes.

use log::debug;
use slotmap::{new_key_type, SlotMap};

use crate::dom::{BoxMetrics, Dom, NodeData, NodeId};
use crate::error::{Error, Result};
use crate::geometry::{Offset, Region, Size};
use crate::layout::engine::LayoutBox;
use crate::layout::LayoutEngine;

/// Width reserved by a native scrollbar, as browsers on desktop platforms do.
pub const DEFAULT_NATIVE_SCROLLBAR_WIDTH: i32 = 17;

new_key_type! {
    /// Handle for a window resize subscription.
    pub struct ListenerId;
}

/// The viewport and its resize subscribers.
///
/// Listeners are polled rather than called back: a resize flags every
/// listener, and each one takes its own flag.
#[derive(Debug)]
pub struct Window {
    size: Size,
    listeners: SlotMap<ListenerId, bool>,
}

impl Window {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            listeners: SlotMap::with_key(),
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn add_resize_listener(&mut self) -> ListenerId {
        self.listeners.insert(false)
    }

    /// Returns `false` if the listener was not registered.
    pub fn remove_resize_listener(&mut self, listener: ListenerId) -> bool {
        self.listeners.remove(listener).is_some()
    }

    /// Change the viewport size. Every listener is flagged, even if the size
    /// did not change, the way a browser fires `resize` on every request.
    pub fn resize(&mut self, size: Size) {
        debug!("window resize {}x{}", size.width, size.height);
        self.size = size;
        for pending in self.listeners.values_mut() {
            *pending = true;
        }
    }

    /// Take the listener's pending flag.
    pub fn take_resize(&mut self, listener: ListenerId) -> bool {
        self.listeners
            .get_mut(listener)
            .map(std::mem::take)
            .unwrap_or(false)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// DOM + window + layout engine.
pub struct Host {
    pub dom: Dom,
    pub window: Window,
    layout: LayoutEngine,
    native_scrollbar_width: i32,
    reflows: usize,
}

impl Host {
    /// A page with an empty `<body>` root filling the viewport.
    pub fn new(size: Size) -> Self {
        let mut dom = Dom::new();
        dom.insert(NodeData::new("body"));
        Self {
            dom,
            window: Window::new(size),
            layout: LayoutEngine::new(),
            native_scrollbar_width: DEFAULT_NATIVE_SCROLLBAR_WIDTH,
            reflows: 0,
        }
    }

    /// Override the width native scrollbars reserve.
    pub fn with_native_scrollbar_width(mut self, width: i32) -> Self {
        self.native_scrollbar_width = width.max(0);
        self.dom.mark_layout_dirty();
        self
    }

    pub fn native_scrollbar_width(&self) -> i32 {
        self.native_scrollbar_width
    }

    /// The `<body>` node.
    pub fn body(&self) -> Result<NodeId> {
        self.dom.root().ok_or(Error::NotMounted)
    }

    /// Resize the window; layout follows on the next read.
    pub fn resize(&mut self, size: Size) {
        self.window.resize(size);
        self.dom.mark_layout_dirty();
    }

    /// Run layout if anything changed since the last pass.
    pub fn reflow(&mut self) {
        if !self.dom.is_layout_dirty() {
            return;
        }
        self.reflows += 1;
        self.layout.run(
            &mut self.dom,
            self.window.size(),
            self.native_scrollbar_width as f32,
        );
    }

    /// Number of layout passes run so far.
    pub fn reflow_count(&self) -> usize {
        self.reflows
    }

    /// Fresh box metrics of a node.
    pub fn metrics(&mut self, node: NodeId) -> Result<BoxMetrics> {
        self.reflow();
        self.dom
            .get(node)
            .map(|data| data.metrics)
            .ok_or(Error::MissingNode(node))
    }

    /// Absolute border box of a node.
    pub fn region(&mut self, node: NodeId) -> Result<Region> {
        self.layout_box(node).map(|b| b.region)
    }

    /// Area a node may paint into.
    pub fn clip(&mut self, node: NodeId) -> Result<Region> {
        self.layout_box(node).map(|b| b.clip)
    }

    pub fn layout_box(&mut self, node: NodeId) -> Result<LayoutBox> {
        self.reflow();
        self.layout.layout_box(node).ok_or(Error::MissingNode(node))
    }

    /// Layout results, without forcing a pass.
    pub fn layout(&self) -> &LayoutEngine {
        &self.layout
    }

    /// Set the scroll offset of a node after making sure its metrics are fresh.
    pub fn scroll_to(&mut self, node: NodeId, offset: Offset) -> Result<bool> {
        self.reflow();
        if !self.dom.contains(node) {
            return Err(Error::MissingNode(node));
        }
        Ok(self.dom.set_scroll_offset(node, offset))
    }

    /// Set `scrollLeft`.
    pub fn set_scroll_left(&mut self, node: NodeId, x: i32) -> Result<bool> {
        let y = self.dom.scroll_offset(node).y;
        self.scroll_to(node, Offset::new(x, y))
    }

    /// Set `scrollTop`.
    pub fn set_scroll_top(&mut self, node: NodeId, y: i32) -> Result<bool> {
        let x = self.dom.scroll_offset(node).x;
        self.scroll_to(node, Offset::new(x, y))
    }

    /// Scroll by a delta.
    pub fn scroll_by(&mut self, node: NodeId, delta: Offset) -> Result<bool> {
        let current = self.dom.scroll_offset(node);
        self.scroll_to(node, current + delta)
    }
}
