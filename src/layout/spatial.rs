//! Spatial map for hit testing.
//!
//! [`SpatialMap`] keeps the visible region of every node in paint order and
//! answers "what is under the pointer" queries.

use crate::dom::node::NodeId;
use crate::geometry::{Offset, Region};

/// Node regions ordered by z-order.
///
/// Later entries are in front of earlier ones (painter's order), which is what
/// a depth-first DOM walk produces. Overlay widgets register after the DOM so
/// they sit on top.
#[derive(Debug, Default)]
pub struct SpatialMap {
    entries: Vec<(NodeId, Region)>,
}

impl SpatialMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all entries. The slice order defines z-order: last is frontmost.
    pub fn update_ordered(&mut self, entries: &[(NodeId, Region)]) {
        self.entries.clear();
        self.entries.extend(entries.iter().filter(|(_, r)| !r.is_empty()));
    }

    /// Add an entry in front of everything registered so far.
    pub fn push(&mut self, node: NodeId, region: Region) {
        if !region.is_empty() {
            self.entries.push((node, region));
        }
    }

    /// All nodes containing `point`, frontmost first.
    pub fn hit_test(&self, point: Offset) -> Vec<NodeId> {
        self.entries
            .iter()
            .rev()
            .filter(|(_, region)| region.contains(point.x, point.y))
            .map(|(id, _)| *id)
            .collect()
    }

    /// The frontmost node at `point`.
    pub fn node_at(&self, point: Offset) -> Option<NodeId> {
        self.entries
            .iter()
            .rev()
            .find(|(_, region)| region.contains(point.x, point.y))
            .map(|(id, _)| *id)
    }

    /// The region registered for `node`, if any.
    pub fn region_of(&self, node: NodeId) -> Option<Region> {
        self.entries
            .iter()
            .rev()
            .find(|(id, _)| *id == node)
            .map(|(_, region)| *region)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::node::NodeData;
    use crate::dom::tree::Dom;

    fn make_ids(count: usize) -> Vec<NodeId> {
        let mut dom = Dom::new();
        (0..count).map(|_| dom.insert(NodeData::new("div"))).collect()
    }

    #[test]
    fn empty_map() {
        let map = SpatialMap::new();
        assert!(map.is_empty());
        assert!(map.node_at(Offset::new(0, 0)).is_none());
    }

    #[test]
    fn frontmost_wins() {
        let ids = make_ids(3);
        let mut map = SpatialMap::new();
        map.update_ordered(&[
            (ids[0], Region::new(0, 0, 80, 24)),
            (ids[1], Region::new(10, 5, 20, 10)),
            (ids[2], Region::new(15, 8, 5, 5)),
        ]);
        assert_eq!(map.node_at(Offset::new(16, 9)), Some(ids[2]));
        assert_eq!(map.hit_test(Offset::new(16, 9)), vec![ids[2], ids[1], ids[0]]);
        assert_eq!(map.node_at(Offset::new(11, 6)), Some(ids[1]));
        assert_eq!(map.node_at(Offset::new(0, 0)), Some(ids[0]));
        assert!(map.node_at(Offset::new(80, 0)).is_none());
    }

    #[test]
    fn empty_regions_are_skipped() {
        let ids = make_ids(2);
        let mut map = SpatialMap::new();
        map.update_ordered(&[(ids[0], Region::new(0, 0, 10, 10)), (ids[1], Region::EMPTY)]);
        map.push(ids[1], Region::new(5, 5, 0, 3));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn push_goes_on_top() {
        let ids = make_ids(2);
        let mut map = SpatialMap::new();
        map.update_ordered(&[(ids[0], Region::new(0, 0, 10, 10))]);
        map.push(ids[1], Region::new(9, 0, 1, 10));
        assert_eq!(map.node_at(Offset::new(9, 3)), Some(ids[1]));
        assert_eq!(map.region_of(ids[1]), Some(Region::new(9, 0, 1, 10)));
        map.clear();
        assert!(map.is_empty());
    }
}
