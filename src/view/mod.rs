//! Declarative element trees and their materialisation into the DOM.

pub mod element;
pub mod rewrite;

pub use element::{Element, LoadContext, LoadHook};
pub use rewrite::{inject_load_hooks, materialize, rewrite, TreeNode};
