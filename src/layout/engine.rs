//! TaffyTree wrapper for layout computation.
//!
//! [`LayoutEngine`] synchronizes the DOM tree to a taffy layout tree, runs
//! layout, writes [`BoxMetrics`] back into the DOM and keeps the absolute
//! regions used for painting and hit testing.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use taffy::prelude::*;

use crate::dom::node::{BoxMetrics, NodeId};
use crate::dom::tree::Dom;
use crate::geometry::{Offset, Region, Size as CellSize};

use super::resolve::{clips_overflow, resolve_styles};

/// Intrinsic content size of a leaf, consulted by taffy's measure callback.
#[derive(Debug, Clone, Copy, Default)]
struct NodeContext {
    intrinsic: taffy::geometry::Size<f32>,
}

/// Absolute placement of one node after layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutBox {
    /// Border box in screen coordinates.
    pub region: Region,
    /// Padding box minus native scrollbars, in screen coordinates.
    pub client: Region,
    /// Area ancestors let this node paint into.
    pub clip: Region,
}

/// Wraps a [`TaffyTree`] and maintains a mapping from DOM [`NodeId`]s to
/// taffy node ids.
pub struct LayoutEngine {
    tree: TaffyTree<NodeContext>,
    node_map: HashMap<NodeId, taffy::prelude::NodeId>,
    root: Option<taffy::prelude::NodeId>,
    boxes: HashMap<NodeId, LayoutBox>,
    order: Vec<NodeId>,
}

impl LayoutEngine {
    /// Create a new, empty layout engine.
    pub fn new() -> Self {
        Self {
            tree: TaffyTree::new(),
            node_map: HashMap::new(),
            root: None,
            boxes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Sync, compute and write back in one go, then clear the DOM's dirty flag.
    pub fn run(&mut self, dom: &mut Dom, viewport: CellSize, scrollbar_width: f32) {
        let vp = (
            viewport.width.clamp(0, u16::MAX as i32) as u16,
            viewport.height.clamp(0, u16::MAX as i32) as u16,
        );
        self.sync_tree(dom, vp, scrollbar_width);
        self.compute(viewport.width as f32, viewport.height as f32);
        self.apply(dom, viewport);
        dom.clear_layout_dirty();
    }

    /// Synchronize the taffy tree with the DOM structure.
    ///
    /// Walks the DOM depth-first from the root, creating or updating taffy nodes
    /// to match. Stale taffy nodes are removed and parent/child relationships
    /// rebuilt. The root is forced to the viewport size.
    pub fn sync_tree(&mut self, dom: &Dom, viewport: (u16, u16), scrollbar_width: f32) {
        let Some(dom_root) = dom.root() else {
            self.clear();
            return;
        };

        let live_nodes = dom.walk_depth_first(dom_root);
        let live_set: HashSet<NodeId> = live_nodes.iter().copied().collect();

        let stale_keys: Vec<NodeId> = self
            .node_map
            .keys()
            .filter(|k| !live_set.contains(k))
            .copied()
            .collect();
        for key in stale_keys {
            if let Some(taffy_id) = self.node_map.remove(&key) {
                let _ = self.tree.remove(taffy_id);
            }
            self.boxes.remove(&key);
        }

        for &dom_id in &live_nodes {
            let Some(data) = dom.get(dom_id) else {
                continue;
            };
            let mut style = resolve_styles(&data.style, viewport, scrollbar_width);
            if dom_id == dom_root {
                style.size = taffy::geometry::Size {
                    width: Dimension::from_length(viewport.0 as f32),
                    height: Dimension::from_length(viewport.1 as f32),
                };
            }
            let context = NodeContext {
                intrinsic: intrinsic_size(dom, dom_id),
            };
            // Replaced elements take their intrinsic size unless styled otherwise.
            if data.is_load_target() {
                if style.size.width == Dimension::AUTO {
                    style.size.width = Dimension::from_length(context.intrinsic.width);
                }
                if style.size.height == Dimension::AUTO {
                    style.size.height = Dimension::from_length(context.intrinsic.height);
                }
            }

            if let Some(&taffy_id) = self.node_map.get(&dom_id) {
                let _ = self.tree.set_style(taffy_id, style);
                let _ = self.tree.set_node_context(taffy_id, Some(context));
            } else {
                match self.tree.new_leaf_with_context(style, context) {
                    Ok(taffy_id) => {
                        self.node_map.insert(dom_id, taffy_id);
                    }
                    Err(err) => warn!("layout node for <{}> not created: {err}", data.tag),
                }
            }
        }

        for &dom_id in &live_nodes {
            let taffy_children: Vec<taffy::prelude::NodeId> = dom
                .children(dom_id)
                .iter()
                .filter_map(|child_id| self.node_map.get(child_id).copied())
                .collect();
            if let Some(&taffy_id) = self.node_map.get(&dom_id) {
                let _ = self.tree.set_children(taffy_id, &taffy_children);
            }
        }

        self.root = self.node_map.get(&dom_root).copied();
    }

    /// Run taffy layout computation on the root node.
    pub fn compute(&mut self, available_width: f32, available_height: f32) {
        let Some(root) = self.root else {
            return;
        };
        let result = self.tree.compute_layout_with_measure(
            root,
            taffy::geometry::Size {
                width: AvailableSpace::Definite(available_width),
                height: AvailableSpace::Definite(available_height),
            },
            |known, _available, _node, context, _style| {
                let intrinsic = context.map(|c| c.intrinsic).unwrap_or(taffy::geometry::Size::ZERO);
                taffy::geometry::Size {
                    width: known.width.unwrap_or(intrinsic.width),
                    height: known.height.unwrap_or(intrinsic.height),
                }
            },
        );
        if let Err(err) = result {
            warn!("layout failed: {err}");
        }
    }

    /// Layout of a node relative to its parent's border box.
    ///
    /// Taffy's f32 coordinates are rounded to the nearest integer cell.
    pub fn get_layout(&self, node: NodeId) -> Option<Region> {
        let taffy_id = self.node_map.get(&node)?;
        let layout = self.tree.layout(*taffy_id).ok()?;
        Some(Region {
            x: layout.location.x.round() as i32,
            y: layout.location.y.round() as i32,
            width: layout.size.width.round() as i32,
            height: layout.size.height.round() as i32,
        })
    }

    /// Write metrics into the DOM and compute absolute boxes.
    ///
    /// Children of a scrolled node are shifted by its scroll offset; nodes with
    /// overflow other than `visible` clip their descendants to their client box.
    pub fn apply(&mut self, dom: &mut Dom, viewport: CellSize) {
        self.boxes.clear();
        self.order.clear();
        let Some(root) = dom.root() else {
            return;
        };

        let screen = viewport.to_region();
        let mut stack = vec![(root, Offset::ZERO, screen)];
        while let Some((id, parent_origin, clip)) = stack.pop() {
            let Some(&taffy_id) = self.node_map.get(&id) else {
                continue;
            };
            let Ok(layout) = self.tree.layout(taffy_id) else {
                continue;
            };
            let Some(data) = dom.get(id) else {
                continue;
            };

            let origin = parent_origin
                + Offset::new(layout.location.x.round() as i32, layout.location.y.round() as i32);
            let size = CellSize::new(layout.size.width.round() as i32, layout.size.height.round() as i32);
            let border_left = layout.border.left.round() as i32;
            let border_top = layout.border.top.round() as i32;
            let client = CellSize::new(
                size.width
                    - border_left
                    - layout.border.right.round() as i32
                    - layout.scrollbar_size.width.round() as i32,
                size.height
                    - border_top
                    - layout.border.bottom.round() as i32
                    - layout.scrollbar_size.height.round() as i32,
            )
            .max(CellSize::ZERO);
            let content = CellSize::new(
                layout.content_size.width.round() as i32 - border_left,
                layout.content_size.height.round() as i32 - border_top,
            );
            let metrics = BoxMetrics {
                offset: size,
                client,
                scroll: content.max(client),
            };

            let region = Region::new(origin.x, origin.y, size.width, size.height);
            let client_region = Region::new(
                origin.x + border_left,
                origin.y + border_top,
                client.width,
                client.height,
            );
            let (clip_x, clip_y) = clips_overflow(&data.style);
            let child_clip = narrow_clip(clip, client_region, clip_x, clip_y);
            let scroll = dom.set_metrics(id, metrics);
            let child_origin = origin - scroll;

            self.boxes.insert(
                id,
                LayoutBox {
                    region,
                    client: client_region,
                    clip,
                },
            );
            self.order.push(id);

            for &child in dom.children(id).iter().rev() {
                stack.push((child, child_origin, child_clip));
            }
        }
        debug!("layout applied to {} nodes", self.order.len());
    }

    /// The absolute box of a node from the last [`apply`](Self::apply).
    pub fn layout_box(&self, node: NodeId) -> Option<LayoutBox> {
        self.boxes.get(&node).copied()
    }

    /// Nodes in paint order (depth-first) from the last apply.
    pub fn paint_order(&self) -> &[NodeId] {
        &self.order
    }

    /// Visible regions of every node in paint order, for a [`SpatialMap`](super::SpatialMap).
    pub fn hit_regions(&self) -> Vec<(NodeId, Region)> {
        self.order
            .iter()
            .filter_map(|id| {
                let b = self.boxes.get(id)?;
                Some((*id, b.region.intersection(b.clip)))
            })
            .collect()
    }

    fn clear(&mut self) {
        let keys: Vec<_> = self.node_map.drain().map(|(_, v)| v).collect();
        for taffy_id in keys {
            let _ = self.tree.remove(taffy_id);
        }
        self.root = None;
        self.boxes.clear();
        self.order.clear();
    }
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Restrict `clip` to `client` on the clipping axes.
fn narrow_clip(clip: Region, client: Region, clip_x: bool, clip_y: bool) -> Region {
    let bounds = Region::new(
        if clip_x { client.x } else { clip.x },
        if clip_y { client.y } else { clip.y },
        if clip_x { client.width } else { clip.width },
        if clip_y { client.height } else { clip.height },
    );
    clip.intersection(bounds)
}

/// Intrinsic size of a leaf: text extents, or the declared size of a loaded image.
fn intrinsic_size(dom: &Dom, id: NodeId) -> taffy::geometry::Size<f32> {
    let Some(data) = dom.get(id) else {
        return taffy::geometry::Size::ZERO;
    };
    if data.is_load_target() {
        if !data.loaded {
            return taffy::geometry::Size::ZERO;
        }
        return taffy::geometry::Size {
            width: data.numeric_attribute("width").unwrap_or(0.0),
            height: data.numeric_attribute("height").unwrap_or(0.0),
        };
    }
    match &data.text {
        Some(text) if dom.children(id).is_empty() => taffy::geometry::Size {
            width: text.lines().map(|l| l.chars().count()).max().unwrap_or(0) as f32,
            height: text.lines().count() as f32,
        },
        _ => taffy::geometry::Size::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::InlineStyle;
    use crate::dom::node::NodeData;
    use crate::event::DomEvent;

    const VP: CellSize = CellSize::new(80, 24);

    fn styled(tag: &str, css: &str) -> NodeData {
        NodeData::new(tag).with_style(InlineStyle::parse(css).unwrap())
    }

    /// body > outer(100x100, overflow hidden) > content(absolute, -17 insets, scroll) > tall child
    fn wrapper_dom() -> (Dom, NodeId, NodeId, NodeId) {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        let outer = dom.insert_child(
            body,
            styled("div", "position: relative; overflow: hidden; width: 100px; height: 100px"),
        );
        let content = dom.insert_child(
            outer,
            styled(
                "div",
                "position: absolute; top: 0; left: 0; right: -17px; bottom: -17px; overflow: scroll",
            ),
        );
        let tall = dom.insert_child(content, styled("div", "width: 50px; height: 400px"));
        (dom, outer, content, tall)
    }

    #[test]
    fn sync_empty_dom() {
        let mut dom = Dom::new();
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, VP, 17.0);
        assert!(engine.root.is_none());
        assert!(engine.node_map.is_empty());
    }

    #[test]
    fn root_fills_viewport() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body"));
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, VP, 17.0);
        assert_eq!(engine.get_layout(root), Some(Region::new(0, 0, 80, 24)));
        assert_eq!(dom.get(root).unwrap().metrics.offset, CellSize::new(80, 24));
        assert!(!dom.is_layout_dirty());
    }

    #[test]
    fn block_children_stack_vertically() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body"));
        let a = dom.insert_child(root, styled("div", "height: 10px"));
        let b = dom.insert_child(root, styled("div", "height: 5px"));
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, VP, 17.0);
        assert_eq!(engine.layout_box(a).unwrap().region, Region::new(0, 0, 80, 10));
        assert_eq!(engine.layout_box(b).unwrap().region, Region::new(0, 10, 80, 5));
    }

    #[test]
    fn scroll_container_metrics() {
        let (mut dom, outer, content, _tall) = wrapper_dom();
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, VP, 17.0);

        let outer_metrics = dom.get(outer).unwrap().metrics;
        assert_eq!(outer_metrics.offset, CellSize::new(100, 100));
        assert_eq!(outer_metrics.client, CellSize::new(100, 100));

        let metrics = dom.get(content).unwrap().metrics;
        assert_eq!(metrics.offset, CellSize::new(117, 117));
        assert_eq!(metrics.client, CellSize::new(100, 100));
        assert_eq!(metrics.scroll.height, 400);
        assert_eq!(metrics.scroll.width, 100);
    }

    #[test]
    fn scrolled_children_shift_and_clip() {
        let (mut dom, outer, content, tall) = wrapper_dom();
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, CellSize::new(200, 200), 17.0);
        dom.set_scroll_top(content, 30);
        engine.run(&mut dom, CellSize::new(200, 200), 17.0);

        let tall_box = engine.layout_box(tall).unwrap();
        assert_eq!(tall_box.region, Region::new(0, -30, 50, 400));
        assert_eq!(tall_box.clip, Region::new(0, 0, 100, 100));
        assert_eq!(engine.layout_box(outer).unwrap().clip, Region::new(0, 0, 200, 200));
    }

    #[test]
    fn shrinking_content_reclamps_before_placing_children() {
        let (mut dom, _outer, content, tall) = wrapper_dom();
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, CellSize::new(200, 200), 17.0);
        dom.set_scroll_top(content, 300);
        engine.run(&mut dom, CellSize::new(200, 200), 17.0);
        assert_eq!(engine.layout_box(tall).unwrap().region.y, -300);
        dom.take_events();

        dom.set_style_property(tall, "height", "150px");
        engine.run(&mut dom, CellSize::new(200, 200), 17.0);

        assert_eq!(dom.scroll_offset(content), Offset::new(0, 50));
        assert_eq!(engine.layout_box(tall).unwrap().region, Region::new(0, -50, 50, 150));
        assert_eq!(dom.take_events(), vec![DomEvent::Scroll { target: content }]);
    }

    #[test]
    fn unloaded_images_have_no_size() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body"));
        let img = dom.insert_child(
            root,
            NodeData::new("img").with_attribute("width", "30").with_attribute("height", "12"),
        );
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, VP, 17.0);
        assert_eq!(engine.layout_box(img).unwrap().region.height, 0);

        dom.finish_load(img);
        engine.run(&mut dom, VP, 17.0);
        assert_eq!(engine.layout_box(img).unwrap().region.height, 12);
    }

    #[test]
    fn text_measures_lines() {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("body"));
        let p = dom.insert_child(root, NodeData::new("p").with_text("one\nthree\ntwo"));
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, VP, 17.0);
        assert_eq!(engine.layout_box(p).unwrap().region.height, 3);
    }

    #[test]
    fn removed_nodes_leave_the_tree() {
        let (mut dom, outer, content, tall) = wrapper_dom();
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, VP, 17.0);
        assert_eq!(engine.node_map.len(), 4);
        dom.remove(content);
        engine.run(&mut dom, VP, 17.0);
        assert_eq!(engine.node_map.len(), 2);
        assert!(engine.layout_box(tall).is_none());
        assert!(engine.layout_box(outer).is_some());
    }

    #[test]
    fn hit_regions_are_clipped() {
        let (mut dom, _outer, _content, tall) = wrapper_dom();
        let mut engine = LayoutEngine::new();
        engine.run(&mut dom, CellSize::new(200, 200), 17.0);
        let regions = engine.hit_regions();
        let (_, tall_region) = regions.iter().find(|(id, _)| *id == tall).unwrap();
        assert_eq!(*tall_region, Region::new(0, 0, 50, 100));
        assert_eq!(engine.paint_order().len(), 4);
    }

    #[test]
    fn narrow_clip_single_axis() {
        let clip = Region::new(0, 0, 80, 24);
        let client = Region::new(10, 5, 20, 5);
        assert_eq!(narrow_clip(clip, client, true, false), Region::new(10, 0, 20, 24));
        assert_eq!(narrow_clip(clip, client, true, true), client);
        assert_eq!(narrow_clip(clip, client, false, false), clip);
    }
}
