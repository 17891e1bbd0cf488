//! Change sources: signals that the wrapper's geometry may be stale.
//!
//! A wrapper subscribes one recompute to any number of sources. Sources are
//! polled; several firings between two polls collapse into one recompute.

use log::trace;

use crate::dom::{MutationObserverInit, NodeId, ObserverId};
use crate::host::{Host, ListenerId};

/// Something that can report "geometry may have changed".
pub trait ChangeSource {
    fn name(&self) -> &'static str;

    /// Whether the source fired since the last poll. Consumes the signal.
    fn poll(&mut self, host: &mut Host) -> bool;

    /// Stop listening. Further polls return `false`.
    fn disconnect(&mut self, host: &mut Host);

    fn is_connected(&self) -> bool;
}

/// Window resize listener.
#[derive(Debug)]
pub struct ResizeSource {
    listener: Option<ListenerId>,
}

impl ResizeSource {
    pub fn subscribe(host: &mut Host) -> Self {
        Self {
            listener: Some(host.window.add_resize_listener()),
        }
    }
}

impl ChangeSource for ResizeSource {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn poll(&mut self, host: &mut Host) -> bool {
        self.listener
            .is_some_and(|listener| host.window.take_resize(listener))
    }

    fn disconnect(&mut self, host: &mut Host) {
        if let Some(listener) = self.listener.take() {
            host.window.remove_resize_listener(listener);
        }
    }

    fn is_connected(&self) -> bool {
        self.listener.is_some()
    }
}

/// Mutation observer on a subtree: child list, attributes and text.
#[derive(Debug)]
pub struct MutationSource {
    observer: Option<ObserverId>,
}

impl MutationSource {
    pub fn observe(host: &mut Host, target: NodeId) -> Self {
        Self {
            observer: Some(host.dom.observe(target, MutationObserverInit::all())),
        }
    }
}

impl ChangeSource for MutationSource {
    fn name(&self) -> &'static str {
        "mutation"
    }

    fn poll(&mut self, host: &mut Host) -> bool {
        let Some(observer) = self.observer else {
            return false;
        };
        let records = host.dom.take_records(observer);
        if !records.is_empty() {
            trace!("{} mutation records", records.len());
        }
        !records.is_empty()
    }

    fn disconnect(&mut self, host: &mut Host) {
        if let Some(observer) = self.observer.take() {
            host.dom.disconnect(observer);
        }
    }

    fn is_connected(&self) -> bool {
        self.observer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeData;
    use crate::geometry::Size;

    #[test]
    fn resize_source_fires_once_per_resize() {
        let mut host = Host::new(Size::new(80, 24));
        let mut source = ResizeSource::subscribe(&mut host);
        assert!(!source.poll(&mut host));
        host.resize(Size::new(100, 30));
        host.resize(Size::new(90, 30));
        assert!(source.poll(&mut host));
        assert!(!source.poll(&mut host));

        source.disconnect(&mut host);
        assert!(!source.is_connected());
        assert_eq!(host.window.listener_count(), 0);
        host.resize(Size::new(80, 24));
        assert!(!source.poll(&mut host));
    }

    #[test]
    fn mutation_source_sees_subtree_changes() {
        let mut host = Host::new(Size::new(80, 24));
        let body = host.body().unwrap();
        let outer = host.dom.insert_child(body, NodeData::new("div"));
        let inner = host.dom.insert_child(outer, NodeData::new("div"));
        let mut source = MutationSource::observe(&mut host, outer);
        assert_eq!(source.name(), "mutation");
        assert!(!source.poll(&mut host));

        host.dom.insert_child(inner, NodeData::new("p"));
        host.dom.set_attribute(inner, "title", "x");
        assert!(source.poll(&mut host));
        assert!(!source.poll(&mut host));

        host.dom.set_text(inner, "text");
        assert!(source.poll(&mut host));

        source.disconnect(&mut host);
        assert_eq!(host.dom.observer_count(), 0);
        host.dom.set_text(inner, "more");
        assert!(!source.poll(&mut host));
    }

    #[test]
    fn sources_are_trait_objects() {
        let mut host = Host::new(Size::new(80, 24));
        let body = host.body().unwrap();
        let mut sources: Vec<Box<dyn ChangeSource>> = vec![
            Box::new(ResizeSource::subscribe(&mut host)),
            Box::new(MutationSource::observe(&mut host, body)),
        ];
        host.resize(Size::new(10, 10));
        let fired: Vec<&str> = sources
            .iter_mut()
            .filter_map(|s| s.poll(&mut host).then(|| s.name()))
            .collect();
        assert_eq!(fired, vec!["resize"]);
    }
}
