//! Render-time tree transformations and materialisation into the DOM.

use std::rc::Rc;

use log::trace;

use super::element::{Element, LoadContext, LoadHook};
use crate::dom::{Dom, NodeId};

/// A tree whose children can be taken out and put back.
pub trait TreeNode: Sized {
    fn take_children(&mut self) -> Vec<Self>;
    fn set_children(&mut self, children: Vec<Self>);
}

impl TreeNode for Element {
    fn take_children(&mut self) -> Vec<Self> {
        std::mem::take(&mut self.children)
    }

    fn set_children(&mut self, children: Vec<Self>) {
        self.children = children;
    }
}

/// Post-order rewrite: children are rewritten before their parent is passed
/// to `f`. Consumes the tree and returns the rewritten one.
pub fn rewrite<T: TreeNode>(mut node: T, f: &mut impl FnMut(T) -> T) -> T {
    let children = node
        .take_children()
        .into_iter()
        .map(|child| rewrite(child, f))
        .collect();
    node.set_children(children);
    f(node)
}

/// Give every `frame`, `iframe`, `img` and `input[type=image]` a load hook that
/// runs its existing `on_load` first and then requests a geometry update.
///
/// Other elements are returned untouched.
pub fn inject_load_hooks(children: Vec<Element>) -> Vec<Element> {
    children
        .into_iter()
        .map(|child| rewrite(child, &mut chain_load_hook))
        .collect()
}

fn chain_load_hook(mut element: Element) -> Element {
    if !element.is_load_target() {
        return element;
    }
    let previous = element.on_load.take();
    let hook: LoadHook = Rc::new(move |ctx: &mut LoadContext| {
        if let Some(previous) = &previous {
            previous(ctx);
        }
        ctx.request_update();
    });
    element.on_load = Some(hook);
    element
}

/// Build DOM nodes for `element` and its subtree, installing load hooks.
///
/// With no parent the element becomes a root-level node.
pub fn materialize(dom: &mut Dom, parent: Option<NodeId>, element: Element) -> NodeId {
    let data = element.to_node_data();
    let id = match parent {
        Some(parent) => dom.insert_child(parent, data),
        None => dom.insert(data),
    };
    if let Some(hook) = element.on_load {
        trace!("load hook installed on <{}>", element.tag);
        dom.set_load_hook(id, hook);
    }
    for child in element.children {
        materialize(dom, Some(id), child);
    }
    id
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::dom::NodeData;

    fn nested() -> Vec<Element> {
        vec![
            Element::paragraph("intro"),
            Element::new("div").child(
                Element::new("section").child(Element::new("figure").child(Element::image(
                    "panda.jpg",
                    500,
                    400,
                ))),
            ),
        ]
    }

    fn hooked(elements: &[Element]) -> Vec<String> {
        fn walk(el: &Element, out: &mut Vec<String>) {
            if el.on_load.is_some() {
                out.push(el.tag.clone());
            }
            for child in &el.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        for el in elements {
            walk(el, &mut out);
        }
        out
    }

    #[test]
    fn rewrite_is_post_order() {
        let tree = Element::new("a").child(Element::new("b").child(Element::new("c")));
        let mut order = Vec::new();
        rewrite(tree, &mut |el: Element| {
            order.push(el.tag.clone());
            el
        });
        assert_eq!(order, vec!["c", "b", "a"]);
    }

    #[test]
    fn only_the_deep_image_gets_a_hook() {
        let children = inject_load_hooks(nested());
        assert_eq!(hooked(&children), vec!["img"]);
        assert_eq!(children[1].count(), 4);
    }

    #[test]
    fn original_tree_is_untouched() {
        let original = nested();
        let _ = inject_load_hooks(original.clone());
        assert!(hooked(&original).is_empty());
    }

    #[test]
    fn existing_hook_runs_first() {
        let calls = Rc::new(Cell::new(0));
        let seen = calls.clone();
        let img = Element::image("a.png", 1, 1).on_load(move |ctx| {
            assert!(!ctx.update_requested());
            seen.set(seen.get() + 1);
        });
        let children = inject_load_hooks(vec![img]);
        let hook = children[0].on_load.clone().unwrap();

        let mut dom = Dom::new();
        let node = dom.insert(NodeData::new("img"));
        let mut ctx = LoadContext::new(node);
        hook(&mut ctx);
        assert_eq!(calls.get(), 1);
        assert!(ctx.update_requested());
    }

    #[test]
    fn materialize_builds_nodes_and_hooks() {
        let mut dom = Dom::new();
        let body = dom.insert(NodeData::new("body"));
        let children = inject_load_hooks(nested());
        let ids: Vec<NodeId> = children
            .into_iter()
            .map(|child| materialize(&mut dom, Some(body), child))
            .collect();
        assert_eq!(dom.children(body), ids.as_slice());
        assert_eq!(dom.len(), 1 + 1 + 4);
        let img = dom.query_by_tag("img")[0];
        assert!(dom.load_hook(img).is_some());
        assert_eq!(dom.get(img).unwrap().numeric_attribute("width"), Some(500.0));
        assert!(dom.load_hook(ids[0]).is_none());
    }
}
