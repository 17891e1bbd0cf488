//! DOM arena: slotmap-backed node tree with queries, mutation observers,
//! native scroll offsets and load events.

pub mod computed;
pub mod mutation;
pub mod node;
pub mod query;
pub mod tree;

pub use computed::{border_width, computed_borders, Edge};
pub use mutation::{MutationKind, MutationObserverInit, MutationRecord, ObserverId};
pub use node::{is_load_target, BoxMetrics, NodeData, NodeId};
pub use tree::Dom;
