//! Widget lifecycle: mount, unmount, update.
//!
//! The `LifecycleTracker` records which widgets are mounted and accumulates
//! `Mount`/`Unmount`/`Update` events for the app loop. An `Update` is pushed
//! each time a widget's state actually changed, so it doubles as a count of
//! re-renders.

use std::collections::HashSet;

use slotmap::new_key_type;

new_key_type! {
    /// Handle of a widget mounted into an [`App`](crate::app::App).
    pub struct WidgetId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Mount { widget: WidgetId },
    Unmount { widget: WidgetId },
    /// State changed; the widget needs repainting.
    Update { widget: WidgetId },
}

#[derive(Debug, Default)]
pub struct LifecycleTracker {
    mounted: HashSet<WidgetId>,
    pending: Vec<LifecycleEvent>,
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// No event if already mounted.
    pub fn on_mount(&mut self, widget: WidgetId) {
        if self.mounted.insert(widget) {
            self.pending.push(LifecycleEvent::Mount { widget });
        }
    }

    /// No event if not mounted.
    pub fn on_unmount(&mut self, widget: WidgetId) {
        if self.mounted.remove(&widget) {
            self.pending.push(LifecycleEvent::Unmount { widget });
        }
    }

    /// Ignored for widgets that are not mounted.
    pub fn on_update(&mut self, widget: WidgetId) {
        if self.mounted.contains(&widget) {
            self.pending.push(LifecycleEvent::Update { widget });
        }
    }

    pub fn is_mounted(&self, widget: WidgetId) -> bool {
        self.mounted.contains(&widget)
    }

    pub fn mounted_count(&self) -> usize {
        self.mounted.len()
    }

    /// Drain pending events in order of occurrence.
    pub fn pending_events(&mut self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<WidgetId> {
        let mut sm: SlotMap<WidgetId, ()> = SlotMap::with_key();
        (0..n).map(|_| sm.insert(())).collect()
    }

    #[test]
    fn mount_update_unmount() {
        let id = ids(1)[0];
        let mut tracker = LifecycleTracker::new();
        tracker.on_mount(id);
        tracker.on_mount(id);
        tracker.on_update(id);
        tracker.on_unmount(id);
        assert_eq!(
            tracker.pending_events(),
            vec![
                LifecycleEvent::Mount { widget: id },
                LifecycleEvent::Update { widget: id },
                LifecycleEvent::Unmount { widget: id },
            ]
        );
        assert!(!tracker.has_pending());
        assert_eq!(tracker.mounted_count(), 0);
    }

    #[test]
    fn updates_for_unmounted_widgets_are_ignored() {
        let v = ids(2);
        let mut tracker = LifecycleTracker::new();
        tracker.on_mount(v[0]);
        tracker.pending_events();
        tracker.on_update(v[1]);
        tracker.on_unmount(v[1]);
        assert!(!tracker.has_pending());
        assert!(tracker.is_mounted(v[0]));
        assert!(!tracker.is_mounted(v[1]));
    }
}
