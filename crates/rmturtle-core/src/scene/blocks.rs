use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Group, Highlight, NodeId, SequenceItem, Stroke, Text};

/// Author table as `(author index, uuid)` pairs.
// Integer map keys do not survive internally tagged enum buffering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorIdsBlock {
    pub author_uuids: Vec<(u16, Uuid)>,
}

impl AuthorIdsBlock {
    pub fn single(uuid: Uuid) -> Self {
        Self {
            author_uuids: vec![(1, uuid)],
        }
    }

    pub fn primary(&self) -> Option<Uuid> {
        self.author_uuids.first().map(|(_, uuid)| *uuid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationInfoBlock {
    pub migration_id: NodeId,
    pub is_device: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfoBlock {
    pub loads_count: u32,
    pub merges_count: u32,
    pub text_chars_count: u32,
    pub text_lines_count: u32,
}

/// Declares that `tree_id` is a group living under `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneTreeBlock {
    pub tree_id: NodeId,
    pub node_id: NodeId,
    pub is_update: bool,
    pub parent_id: NodeId,
}

/// Carries a group's label and visibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNodeBlock {
    pub group: Group,
}

/// Links a declared group into its parent's children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupItemBlock {
    pub parent_id: NodeId,
    pub item: SequenceItem<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemBlock {
    pub parent_id: NodeId,
    pub item: SequenceItem<Stroke>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphItemBlock {
    pub parent_id: NodeId,
    pub item: SequenceItem<Highlight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootTextBlock {
    pub block_id: NodeId,
    pub value: Text,
}

/// One entry of a scene file, in emission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    AuthorIds(AuthorIdsBlock),
    MigrationInfo(MigrationInfoBlock),
    PageInfo(PageInfoBlock),
    SceneTree(SceneTreeBlock),
    TreeNode(TreeNodeBlock),
    SceneGroupItem(GroupItemBlock),
    SceneLineItem(LineItemBlock),
    SceneGlyphItem(GlyphItemBlock),
    RootText(RootTextBlock),
    /// A block type this library does not understand.
    #[serde(other)]
    Unknown,
}

impl Block {
    /// Stable name of the block kind, as written in the `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::AuthorIds(_) => "author_ids",
            Block::MigrationInfo(_) => "migration_info",
            Block::PageInfo(_) => "page_info",
            Block::SceneTree(_) => "scene_tree",
            Block::TreeNode(_) => "tree_node",
            Block::SceneGroupItem(_) => "scene_group_item",
            Block::SceneLineItem(_) => "scene_line_item",
            Block::SceneGlyphItem(_) => "scene_glyph_item",
            Block::RootText(_) => "root_text",
            Block::Unknown => "unknown",
        }
    }

    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            Block::AuthorIds(_) | Block::MigrationInfo(_) | Block::PageInfo(_)
        )
    }
}
