//! Painting DOM nodes into the compositor.
//!
//! Nodes are painted in layout order (parents before children), each clipped
//! by its scroll containers. Colours are inherited from ancestors the way
//! `color` and `background` visually cascade in a browser.

use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::layout::LayoutEngine;

use super::compositor::Compositor;
use super::strip::{CellStyle, Strip};

/// Fill character for a loaded image.
const IMAGE_FILL: char = '░';

/// Paint backgrounds, text and loaded images of every laid-out node.
pub fn paint_dom(dom: &Dom, layout: &LayoutEngine, compositor: &mut Compositor) {
    let mut inherited: HashMap<NodeId, CellStyle> = HashMap::new();
    for &id in layout.paint_order() {
        let (Some(data), Some(layout_box)) = (dom.get(id), layout.layout_box(id)) else {
            continue;
        };
        let parent_style = dom
            .parent(id)
            .and_then(|p| inherited.get(&p))
            .cloned()
            .unwrap_or_default();
        let own = CellStyle::from_inline(&data.style);
        let style = own.clone().or(&parent_style);
        inherited.insert(id, style.clone());

        if matches!(data.style.get("display"), Some("none")) {
            continue;
        }
        let region = layout_box.region;
        let visible = region.intersection(layout_box.clip);
        if visible.is_empty() {
            continue;
        }

        if own.bg.is_some() {
            let strips: Vec<Strip> = (region.y..region.bottom())
                .map(|y| Strip::repeat(y, region.x, ' ', region.width, style.clone()))
                .collect();
            compositor.place_strips(&strips, layout_box.clip);
        }

        if data.is_load_target() {
            if data.loaded {
                let strips: Vec<Strip> = (region.y..region.bottom())
                    .map(|y| Strip::repeat(y, region.x, IMAGE_FILL, region.width, style.clone()))
                    .collect();
                compositor.place_strips(&strips, layout_box.clip);
            }
            continue;
        }

        if let Some(text) = &data.text {
            let origin = layout_box.client;
            let strips: Vec<Strip> = text
                .lines()
                .enumerate()
                .map(|(row, line)| {
                    let mut strip = Strip::new(origin.y + row as i32, origin.x);
                    strip.push_str(line, style.clone());
                    strip
                })
                .collect();
            compositor.place_strips(&strips, layout_box.clip.intersection(region));
        }
    }
}
