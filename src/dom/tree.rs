//! Tree operations: insert, remove, reparent, walk; mutation recording,
//! native scroll offsets and load completion.

use std::collections::VecDeque;

use log::trace;
use slotmap::{SecondaryMap, SlotMap};

use super::computed::computed_borders;
use super::mutation::{MutationKind, MutationObserverInit, MutationRecord, Observer, ObserverId};
use super::node::{BoxMetrics, NodeData, NodeId};
use crate::css::InlineStyle;
use crate::event::{DomEvent, EventDispatcher};
use crate::geometry::Offset;
use crate::view::LoadHook;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// The central DOM tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
///
/// Every mutating method records a [`MutationRecord`] for matching observers
/// and marks layout dirty. Direct field access through `get_mut` does neither.
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
    observers: SlotMap<ObserverId, Observer>,
    load_hooks: SecondaryMap<NodeId, LoadHook>,
    events: EventDispatcher,
    layout_dirty: bool,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            root: None,
            observers: SlotMap::with_key(),
            load_hooks: SecondaryMap::new(),
            events: EventDispatcher::new(),
            layout_dirty: true,
        }
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        self.layout_dirty = true;
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent node does not exist"
        );
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        self.record(parent, MutationKind::ChildList);
        id
    }

    /// Remove a node and all its descendants.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        if let Some(parent_id) = self.parent.get(id).copied() {
            self.record(parent_id, MutationKind::ChildList);
            self.parent.remove(id);
            if let Some(siblings) = self.children.get_mut(parent_id) {
                siblings.retain(|&child| child != id);
            }
        }

        if self.root == Some(id) {
            self.root = None;
        }

        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                to_remove.extend(kids);
            }
            self.parent.remove(current);
            self.load_hooks.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        let nodes = &self.nodes;
        self.events.retain(|e| nodes.contains_key(e.target()));
        self.layout_dirty = true;
        removed_root_data
    }

    /// Move `node` to become the last child of `new_parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if either `node` or `new_parent` does not exist.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) {
        debug_assert!(self.nodes.contains_key(node), "node does not exist");
        debug_assert!(
            self.nodes.contains_key(new_parent),
            "new_parent does not exist"
        );

        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
            self.record(old_parent, MutationKind::ChildList);
        }

        self.parent.insert(node, new_parent);
        if let Some(siblings) = self.children.get_mut(new_parent) {
            siblings.push(node);
        }
        self.record(new_parent, MutationKind::ChildList);
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Whether `node` is `ancestor` or lies somewhere beneath it.
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// The current root node, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Explicitly set the root node.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
        self.layout_dirty = true;
    }

    /// Number of nodes in the DOM.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the DOM is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the DOM contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            for &child in self.children(current).iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Breadth-first traversal starting from `start`.
    pub fn walk_breadth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            queue.extend(self.children(current).iter().copied());
        }
        result
    }

    // ── Attributes, style, text ─────────────────────────────────────

    /// Set an attribute. `id` and `class` update the dedicated fields.
    ///
    /// Returns `false` if the node does not exist.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        let value = value.into();
        match name {
            "id" => data.id = Some(value),
            "class" => data.classes = value.split_whitespace().map(str::to_string).collect(),
            _ => {
                data.attributes.insert(name.to_string(), value);
            }
        }
        self.record(id, MutationKind::Attributes { name: name.to_string() });
        true
    }

    /// Remove an attribute. Returns `true` if something was removed.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        let removed = match name {
            "id" => data.id.take().is_some(),
            "class" => !std::mem::take(&mut data.classes).is_empty(),
            _ => data.attributes.remove(name).is_some(),
        };
        if removed {
            self.record(id, MutationKind::Attributes { name: name.to_string() });
        }
        removed
    }

    /// Add a class to a node.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        if data.has_class(class) {
            return false;
        }
        data.classes.push(class.to_string());
        self.record(id, MutationKind::Attributes { name: "class".into() });
        true
    }

    /// Remove a class from a node.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        let before = data.classes.len();
        data.classes.retain(|c| c != class);
        if data.classes.len() == before {
            return false;
        }
        self.record(id, MutationKind::Attributes { name: "class".into() });
        true
    }

    /// Replace a node's inline style wholesale.
    pub fn set_style(&mut self, id: NodeId, style: InlineStyle) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        if data.style == style {
            return false;
        }
        data.style = style;
        self.record(id, MutationKind::Attributes { name: "style".into() });
        true
    }

    /// Set a single inline style property.
    pub fn set_style_property(&mut self, id: NodeId, property: &str, value: &str) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        if data.style.get(property) == Some(value) {
            return false;
        }
        data.style.set(property, value);
        self.record(id, MutationKind::Attributes { name: "style".into() });
        true
    }

    /// Replace a node's text content.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        data.text = Some(text.into());
        self.record(id, MutationKind::CharacterData);
        true
    }

    /// The computed `border-*-width` longhands of a node.
    pub fn computed_style(&self, id: NodeId) -> Option<InlineStyle> {
        self.nodes.get(id).map(|data| computed_borders(&data.style))
    }

    // ── Mutation observers ──────────────────────────────────────────

    /// Start observing `target`.
    pub fn observe(&mut self, target: NodeId, init: MutationObserverInit) -> ObserverId {
        self.observers.insert(Observer {
            target,
            init,
            records: Vec::new(),
        })
    }

    /// Take all records delivered to `observer` since the last call.
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .get_mut(observer)
            .map(|o| std::mem::take(&mut o.records))
            .unwrap_or_default()
    }

    /// Stop observing. Returns `false` if the observer was unknown.
    pub fn disconnect(&mut self, observer: ObserverId) -> bool {
        self.observers.remove(observer).is_some()
    }

    /// Number of live observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn record(&mut self, target: NodeId, kind: MutationKind) {
        self.layout_dirty = true;
        if self.observers.is_empty() {
            return;
        }
        let ancestors = self.ancestors(target);
        for observer in self.observers.values_mut() {
            let in_scope = observer.target == target
                || (observer.init.subtree && ancestors.contains(&observer.target));
            if in_scope && observer.init.accepts(&kind) {
                observer.records.push(MutationRecord {
                    target,
                    kind: kind.clone(),
                });
            }
        }
    }

    // ── Native scrolling ────────────────────────────────────────────

    /// Current scroll offset of a node (zero for unknown nodes).
    pub fn scroll_offset(&self, id: NodeId) -> Offset {
        self.nodes
            .get(id)
            .map(|data| data.scroll_offset)
            .unwrap_or(Offset::ZERO)
    }

    /// Set `scrollLeft`. Clamped to the node's scrollable range.
    pub fn set_scroll_left(&mut self, id: NodeId, x: i32) -> bool {
        let y = self.scroll_offset(id).y;
        self.set_scroll_offset(id, Offset::new(x, y))
    }

    /// Set `scrollTop`. Clamped to the node's scrollable range.
    pub fn set_scroll_top(&mut self, id: NodeId, y: i32) -> bool {
        let x = self.scroll_offset(id).x;
        self.set_scroll_offset(id, Offset::new(x, y))
    }

    /// Scroll by a delta.
    pub fn scroll_by(&mut self, id: NodeId, dx: i32, dy: i32) -> bool {
        let current = self.scroll_offset(id);
        self.set_scroll_offset(id, current + Offset::new(dx, dy))
    }

    /// Set both scroll coordinates, clamped to `[0, scroll - client]`.
    ///
    /// Queues a [`DomEvent::Scroll`] and returns `true` if the offset changed.
    pub fn set_scroll_offset(&mut self, id: NodeId, offset: Offset) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        let clamped = offset.clamp_to(data.metrics.max_scroll());
        if clamped == data.scroll_offset {
            return false;
        }
        trace!("scroll {:?} -> {:?}", data.scroll_offset, clamped);
        data.scroll_offset = clamped;
        self.layout_dirty = true;
        self.events.push(DomEvent::Scroll { target: id });
        true
    }

    /// Store fresh layout metrics, re-clamping the scroll offset against them.
    ///
    /// Returns the scroll offset in effect afterwards.
    pub(crate) fn set_metrics(&mut self, id: NodeId, metrics: BoxMetrics) -> Offset {
        let Some(data) = self.nodes.get_mut(id) else {
            return Offset::ZERO;
        };
        data.metrics = metrics;
        let clamped = data.scroll_offset.clamp_to(metrics.max_scroll());
        if clamped != data.scroll_offset {
            trace!("scroll {:?} re-clamped to {:?}", data.scroll_offset, clamped);
            data.scroll_offset = clamped;
            self.events.push(DomEvent::Scroll { target: id });
        }
        clamped
    }

    // ── Loading ─────────────────────────────────────────────────────

    /// Mark a frame/image-like node as loaded and queue a [`DomEvent::Load`].
    ///
    /// Returns `false` if the node is not a load target or already loaded.
    pub fn finish_load(&mut self, id: NodeId) -> bool {
        let Some(data) = self.nodes.get_mut(id) else {
            return false;
        };
        if !data.is_load_target() || data.loaded {
            return false;
        }
        data.loaded = true;
        self.layout_dirty = true;
        self.events.push(DomEvent::Load { target: id });
        true
    }

    /// Install (or replace) a node's load hook.
    pub fn set_load_hook(&mut self, id: NodeId, hook: LoadHook) {
        if self.nodes.contains_key(id) {
            self.load_hooks.insert(id, hook);
        }
    }

    /// The node's load hook, if any.
    pub fn load_hook(&self, id: NodeId) -> Option<LoadHook> {
        self.load_hooks.get(id).cloned()
    }

    // ── Events and layout state ─────────────────────────────────────

    /// Drain queued DOM events.
    pub fn take_events(&mut self) -> Vec<DomEvent> {
        self.events.drain()
    }

    /// Number of queued DOM events.
    pub fn pending_events(&self) -> usize {
        self.events.pending_count()
    }

    /// Whether layout must be recomputed before metrics can be trusted.
    pub fn is_layout_dirty(&self) -> bool {
        self.layout_dirty
    }

    pub fn mark_layout_dirty(&mut self) {
        self.layout_dirty = true;
    }

    pub(crate) fn clear_layout_dirty(&mut self) {
        self.layout_dirty = false;
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}
