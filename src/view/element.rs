//! Element: a declarative description of a DOM subtree.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::css::InlineStyle;
use crate::dom::{is_load_target, NodeData, NodeId};

/// Callback run when a frame/image-like node finishes loading.
pub type LoadHook = Rc<dyn Fn(&mut LoadContext)>;

/// What a [`LoadHook`] sees, and how it reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadContext {
    node: NodeId,
    update_requested: bool,
}

impl LoadContext {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            update_requested: false,
        }
    }

    /// The node that finished loading.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Ask the owning widget to re-measure its geometry.
    pub fn request_update(&mut self) {
        self.update_requested = true;
    }

    pub fn update_requested(&self) -> bool {
        self.update_requested
    }
}

/// An element to be materialised into the DOM.
///
/// Built with chained methods:
///
/// ```ignore
/// Element::new("div")
///     .class("panel")
///     .css("width", "500px")
///     .child(Element::new("img").attr("src", "panda.jpg"))
/// ```
#[derive(Clone, Default)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub style: InlineStyle,
    pub text: Option<String>,
    pub children: Vec<Element>,
    pub on_load: Option<LoadHook>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// A `<p>` holding `text`.
    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new("p").text(text)
    }

    /// An `<img>` with a source and intrinsic size.
    pub fn image(src: impl Into<String>, width: i32, height: i32) -> Self {
        Self::new("img")
            .attr("src", src)
            .attr("width", width.to_string())
            .attr("height", height.to_string())
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.classes.contains(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Add whitespace-separated class names.
    pub fn class_names(mut self, names: &str) -> Self {
        for name in names.split_whitespace() {
            self = self.class(name);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Overlay a style onto the element's inline style.
    pub fn style(mut self, style: &InlineStyle) -> Self {
        self.style.merge(style);
        self
    }

    /// Set one inline style property.
    pub fn css(mut self, property: &str, value: impl Into<String>) -> Self {
        self.style.set(property, value);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn on_load(mut self, hook: impl Fn(&mut LoadContext) + 'static) -> Self {
        self.on_load = Some(Rc::new(hook));
        self
    }

    /// Whether this element fires load events once materialised.
    pub fn is_load_target(&self) -> bool {
        is_load_target(&self.tag, self.attributes.get("type").map(String::as_str))
    }

    /// Node data for this element alone (children and hook excluded).
    pub fn to_node_data(&self) -> NodeData {
        let mut data = NodeData::new(self.tag.clone())
            .with_classes(self.classes.iter().cloned())
            .with_style(self.style.clone());
        data.id = self.id.clone();
        data.attributes = self.attributes.clone();
        data.text = self.text.clone();
        data
    }

    /// Total number of elements in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Element::count).sum::<usize>()
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag)
            .field("id", &self.id)
            .field("classes", &self.classes)
            .field("attributes", &self.attributes)
            .field("style", &self.style.to_string())
            .field("text", &self.text)
            .field("children", &self.children)
            .field("on_load", &self.on_load.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_chain() {
        let el = Element::new("div")
            .id("main")
            .class_names("a b a")
            .css("width", "10px")
            .child(Element::paragraph("hi"));
        assert_eq!(el.id.as_deref(), Some("main"));
        assert_eq!(el.classes, vec!["a", "b"]);
        assert_eq!(el.style.get("width"), Some("10px"));
        assert_eq!(el.children[0].text.as_deref(), Some("hi"));
        assert_eq!(el.count(), 2);
    }

    #[test]
    fn image_is_load_target() {
        let img = Element::image("panda.jpg", 500, 400);
        assert!(img.is_load_target());
        assert_eq!(img.attributes.get("width").map(String::as_str), Some("500"));
        assert!(Element::new("input").attr("type", "image").is_load_target());
        assert!(!Element::new("input").is_load_target());
    }

    #[test]
    fn node_data_copies_fields() {
        let el = Element::new("p").id("x").class("c").attr("title", "t").text("body");
        let data = el.to_node_data();
        assert_eq!(data.tag, "p");
        assert_eq!(data.id.as_deref(), Some("x"));
        assert!(data.has_class("c"));
        assert_eq!(data.attribute("title"), Some("t"));
        assert_eq!(data.text.as_deref(), Some("body"));
    }

    #[test]
    fn load_context_request() {
        let mut dom = crate::dom::Dom::new();
        let node = dom.insert(NodeData::new("img"));
        let mut ctx = LoadContext::new(node);
        assert!(!ctx.update_requested());
        ctx.request_update();
        assert!(ctx.update_requested());
        assert_eq!(ctx.node(), node);
    }
}
