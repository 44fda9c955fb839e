//! Scene value types: ids, last-writer-wins slots, sequence items, scene
//! items and the block stream they are written as.

mod blocks;
mod items;
mod tree;

pub use blocks::{
    AuthorIdsBlock, Block, GlyphItemBlock, GroupItemBlock, LineItemBlock, MigrationInfoBlock,
    PageInfoBlock, RootTextBlock, SceneTreeBlock, TreeNodeBlock,
};
pub use items::{
    Group, Highlight, ParagraphStyle, Pen, PenColor, SceneItem, Stroke, StrokePoint, Text,
    TextStyle,
};
pub use tree::SceneTree;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a scene node or sequence item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub namespace: u8,
    pub counter: u64,
}

impl NodeId {
    /// "No neighbor" sentinel.
    pub const NONE: NodeId = NodeId::new(0, 0);
    /// The document root group.
    pub const ROOT: NodeId = NodeId::new(0, 1);

    pub const fn new(namespace: u8, counter: u64) -> Self {
        Self { namespace, counter }
    }

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.counter)
    }
}

/// Last-writer-wins register: a value stamped with the id that wrote it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LwwValue<T> {
    pub timestamp: NodeId,
    pub value: T,
}

impl<T> LwwValue<T> {
    pub fn new(timestamp: NodeId, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// Entry of an ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceItem<T> {
    pub item_id: NodeId,
    pub left_id: NodeId,
    pub right_id: NodeId,
    pub deleted_length: u32,
    pub value: T,
}

impl<T> SequenceItem<T> {
    /// Item with sentinel neighbors; position is given by emission order.
    pub fn appended(item_id: NodeId, value: T) -> Self {
        Self {
            item_id,
            left_id: NodeId::NONE,
            right_id: NodeId::NONE,
            deleted_length: 0,
            value,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SequenceItem<U> {
        SequenceItem {
            item_id: self.item_id,
            left_id: self.left_id,
            right_id: self.right_id,
            deleted_length: self.deleted_length,
            value: f(self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_ids() {
        assert!(NodeId::NONE.is_none());
        assert!(!NodeId::ROOT.is_none());
        assert!(NodeId::NONE < NodeId::ROOT);
        assert_eq!(NodeId::new(0, 7).to_string(), "0:7");
    }

    #[test]
    fn test_appended_uses_sentinels() {
        let item = SequenceItem::appended(NodeId::new(0, 4), "x");
        assert_eq!(item.left_id, NodeId::NONE);
        assert_eq!(item.right_id, NodeId::NONE);
        assert_eq!(item.deleted_length, 0);

        let mapped = item.map(str::len);
        assert_eq!(mapped.item_id, NodeId::new(0, 4));
        assert_eq!(mapped.value, 1);
    }

    #[test]
    fn test_link_items_compare_as_eq() {
        fn assert_eq_type<T: Eq>(_: &T) {}

        let link = GroupItemBlock {
            parent_id: NodeId::ROOT,
            item: SequenceItem::appended(NodeId::new(0, 3), NodeId::new(0, 2)),
        };
        assert_eq_type(&link);
        assert_eq_type(&LwwValue::new(NodeId::new(0, 4), true));
        assert_eq!(link.clone(), link);
    }
}
