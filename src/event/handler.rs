//! DOM event queue and bubble path computation.
//!
//! The DOM pushes [`DomEvent`]s into an [`EventDispatcher`] as native scroll
//! positions change and embedded content finishes loading. The application
//! loop drains them and uses `bubble_path` to find the widget that owns the
//! target node.

use std::collections::VecDeque;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

/// An event fired by the DOM itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomEvent {
    /// The target's scroll offset changed.
    Scroll { target: NodeId },
    /// A frame/image-like target finished loading.
    Load { target: NodeId },
}

impl DomEvent {
    pub fn target(&self) -> NodeId {
        match *self {
            DomEvent::Scroll { target } | DomEvent::Load { target } => target,
        }
    }
}

/// FIFO queue of pending DOM events.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    queue: VecDeque<DomEvent>,
}

impl EventDispatcher {
    /// Create a new, empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event.
    ///
    /// A scroll event already waiting for the same target is not queued twice,
    /// matching how browsers coalesce scroll events per frame.
    pub fn push(&mut self, event: DomEvent) {
        if matches!(event, DomEvent::Scroll { .. }) && self.queue.contains(&event) {
            return;
        }
        self.queue.push_back(event);
    }

    /// Drain all pending events in order.
    pub fn drain(&mut self) -> Vec<DomEvent> {
        self.queue.drain(..).collect()
    }

    /// Keep only the events for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&DomEvent) -> bool) {
        self.queue.retain(|e| keep(e));
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Compute the bubble path from `start` up to the root (inclusive).
    ///
    /// Returns `[start, parent, grandparent, ..., root]`.
    /// If `start` does not exist in the DOM, returns an empty vec.
    pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
        if !dom.contains(start) {
            return Vec::new();
        }
        let mut path = vec![start];
        path.extend(dom.ancestors(start));
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;

    fn build_tree() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body"));
        let a = dom.insert_child(root, NodeData::new("div"));
        let c = dom.insert_child(a, NodeData::new("img"));
        (dom, root, a, c)
    }

    #[test]
    fn fifo_order() {
        let (_, root, a, c) = build_tree();
        let mut disp = EventDispatcher::new();
        disp.push(DomEvent::Scroll { target: a });
        disp.push(DomEvent::Load { target: c });
        disp.push(DomEvent::Scroll { target: root });
        assert_eq!(disp.pending_count(), 3);
        assert_eq!(
            disp.drain(),
            vec![
                DomEvent::Scroll { target: a },
                DomEvent::Load { target: c },
                DomEvent::Scroll { target: root },
            ]
        );
        assert!(disp.is_empty());
    }

    #[test]
    fn scroll_events_coalesce() {
        let (_, _, a, c) = build_tree();
        let mut disp = EventDispatcher::new();
        disp.push(DomEvent::Scroll { target: a });
        disp.push(DomEvent::Scroll { target: a });
        disp.push(DomEvent::Load { target: c });
        disp.push(DomEvent::Load { target: c });
        assert_eq!(disp.pending_count(), 3);
    }

    #[test]
    fn retain_drops_matching() {
        let (_, _, a, c) = build_tree();
        let mut disp = EventDispatcher::new();
        disp.push(DomEvent::Scroll { target: a });
        disp.push(DomEvent::Load { target: c });
        disp.retain(|e| e.target() != a);
        assert_eq!(disp.drain(), vec![DomEvent::Load { target: c }]);
    }

    #[test]
    fn bubble_path_from_leaf() {
        let (dom, root, a, c) = build_tree();
        assert_eq!(EventDispatcher::bubble_path(&dom, c), vec![c, a, root]);
        assert_eq!(EventDispatcher::bubble_path(&dom, root), vec![root]);
    }

    #[test]
    fn bubble_path_removed_node() {
        let (mut dom, _, a, c) = build_tree();
        dom.remove(a);
        assert!(EventDispatcher::bubble_path(&dom, c).is_empty());
    }
}
