//! Node types: NodeId, NodeData, BoxMetrics.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use crate::css::InlineStyle;
use crate::geometry::{Offset, Size};

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Whether an element with this tag (and `type` attribute) fires load events.
///
/// Frames, images and image inputs load asynchronously; their size is unknown
/// until they do.
pub fn is_load_target(tag: &str, type_attr: Option<&str>) -> bool {
    match tag {
        "frame" | "iframe" | "img" => true,
        "input" => type_attr.is_some_and(|t| t.eq_ignore_ascii_case("image")),
        _ => false,
    }
}

/// Box measurements written by layout, read by widgets.
///
/// Mirrors the browser's offset/client/scroll triple:
/// - `offset`: the border box.
/// - `client`: the padding box minus any native scrollbar.
/// - `scroll`: the scrollable extent, never smaller than `client`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoxMetrics {
    pub offset: Size,
    pub client: Size,
    pub scroll: Size,
}

impl BoxMetrics {
    /// Largest valid scroll offset on each axis.
    pub fn max_scroll(&self) -> Offset {
        Offset::new(
            (self.scroll.width - self.client.width).max(0),
            (self.scroll.height - self.client.height).max(0),
        )
    }
}

/// Data associated with a single DOM node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Element tag name (e.g. "div", "img").
    pub tag: String,
    /// Optional unique id.
    pub id: Option<String>,
    /// Class names.
    pub classes: Vec<String>,
    /// Attributes other than id/class/style.
    pub attributes: BTreeMap<String, String>,
    /// Inline style declarations.
    pub style: InlineStyle,
    /// Text content, rendered line by line.
    pub text: Option<String>,
    /// Last layout measurements.
    pub metrics: BoxMetrics,
    /// Native scroll position (scrollLeft, scrollTop).
    pub scroll_offset: Offset,
    /// Whether a load target has finished loading.
    pub loaded: bool,
}

impl NodeData {
    /// Create a new `NodeData` with the given tag and empty everything else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            style: InlineStyle::new(),
            text: None,
            metrics: BoxMetrics::default(),
            scroll_offset: Offset::ZERO,
            loaded: false,
        }
    }

    /// Set the id (builder).
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add a single class (builder).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add multiple classes (builder).
    pub fn with_classes(mut self, classes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        for class in classes {
            self = self.with_class(class);
        }
        self
    }

    /// Set an attribute (builder).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the inline style (builder).
    pub fn with_style(mut self, style: InlineStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Check whether this node has a given class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Look up an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether this node fires load events.
    pub fn is_load_target(&self) -> bool {
        is_load_target(&self.tag, self.attribute("type"))
    }

    /// Parse a numeric attribute such as an image's `width`.
    pub fn numeric_attribute(&self, name: &str) -> Option<f32> {
        self.attribute(name)?.trim().trim_end_matches("px").parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults() {
        let data = NodeData::new("div");
        assert_eq!(data.tag, "div");
        assert!(data.id.is_none());
        assert!(data.classes.is_empty());
        assert!(data.style.is_empty());
        assert_eq!(data.scroll_offset, Offset::ZERO);
        assert!(!data.loaded);
    }

    #[test]
    fn builder_with_classes_dedup() {
        let data = NodeData::new("div").with_class("a").with_classes(["a", "b"]);
        assert_eq!(data.classes, vec!["a", "b"]);
        assert!(data.has_class("b"));
        assert!(!data.has_class("c"));
    }

    #[test]
    fn attributes() {
        let data = NodeData::new("img")
            .with_attribute("src", "panda.jpg")
            .with_attribute("width", "500px");
        assert_eq!(data.attribute("src"), Some("panda.jpg"));
        assert_eq!(data.numeric_attribute("width"), Some(500.0));
        assert_eq!(data.numeric_attribute("height"), None);
    }

    #[test]
    fn load_targets() {
        assert!(is_load_target("img", None));
        assert!(is_load_target("iframe", None));
        assert!(is_load_target("frame", None));
        assert!(is_load_target("input", Some("IMAGE")));
        assert!(!is_load_target("input", Some("text")));
        assert!(!is_load_target("input", None));
        assert!(!is_load_target("div", None));
        assert!(NodeData::new("input").with_attribute("type", "image").is_load_target());
    }

    #[test]
    fn max_scroll() {
        let metrics = BoxMetrics {
            offset: Size::new(117, 117),
            client: Size::new(100, 100),
            scroll: Size::new(100, 400),
        };
        assert_eq!(metrics.max_scroll(), Offset::new(0, 300));
    }

    #[test]
    fn node_id_is_copy() {
        fn assert_copy<T: Copy>() {}
        assert_copy::<NodeId>();
    }
}
