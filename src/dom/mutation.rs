//! Mutation observers: records of structural, attribute and text changes.
//!
//! The DOM pushes a [`MutationRecord`] for every mutating call. Each registered
//! observer keeps the records that match its [`MutationObserverInit`] until
//! they are taken with [`Dom::take_records`](super::Dom::take_records).

use slotmap::new_key_type;

use super::node::NodeId;

new_key_type! {
    /// Handle for a registered mutation observer.
    pub struct ObserverId;
}

/// What changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    /// A child was added to or removed from the target.
    ChildList,
    /// An attribute (including `id`, `class` and `style`) of the target changed.
    Attributes { name: String },
    /// The target's text content changed.
    CharacterData,
}

/// A single recorded mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub kind: MutationKind,
}

/// Which mutations an observer is interested in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationObserverInit {
    pub child_list: bool,
    pub attributes: bool,
    pub character_data: bool,
    /// Also report mutations of descendants of the observed node.
    pub subtree: bool,
}

impl MutationObserverInit {
    /// Everything, including the subtree.
    pub fn all() -> Self {
        Self {
            child_list: true,
            attributes: true,
            character_data: true,
            subtree: true,
        }
    }

    pub(crate) fn accepts(&self, kind: &MutationKind) -> bool {
        match kind {
            MutationKind::ChildList => self.child_list,
            MutationKind::Attributes { .. } => self.attributes,
            MutationKind::CharacterData => self.character_data,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Observer {
    pub target: NodeId,
    pub init: MutationObserverInit,
    pub records: Vec<MutationRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_filters_kinds() {
        let init = MutationObserverInit {
            child_list: true,
            ..Default::default()
        };
        assert!(init.accepts(&MutationKind::ChildList));
        assert!(!init.accepts(&MutationKind::CharacterData));
        assert!(!init.accepts(&MutationKind::Attributes { name: "style".into() }));
    }

    #[test]
    fn all_accepts_everything() {
        let init = MutationObserverInit::all();
        assert!(init.subtree);
        assert!(init.accepts(&MutationKind::CharacterData));
        assert!(init.accepts(&MutationKind::Attributes { name: "id".into() }));
    }
}
