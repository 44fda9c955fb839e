use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::{Block, Group, NodeId, SceneItem, SequenceItem, Text};
use crate::error::{LoadStage, SceneError, SceneResult};

/// A scene materialized from its block stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneTree {
    pub root: Group,
    /// Last root text block; the device shows a single text flow.
    pub root_text: Option<Text>,
    /// Every root text block in stream order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_texts: Vec<Text>,
}

/// Child waiting to be attached once every block has been read.
enum Pending {
    Node(NodeId),
    Leaf(SceneItem),
}

impl SceneTree {
    pub fn empty() -> Self {
        Self {
            root: Group::new(NodeId::ROOT),
            root_text: None,
            root_texts: Vec::new(),
        }
    }

    /// Materialize a tree from blocks.
    ///
    /// `SceneTree` and `TreeNode` blocks declare groups, link blocks attach
    /// declared groups under their parent and content blocks attach strokes
    /// and highlights. A link inside a group whose target is not a group
    /// orders a stroke or highlight of that group and must name one.
    /// References to undeclared nodes, groups linked twice and unknown block
    /// types are errors.
    pub fn from_blocks(blocks: &[Block]) -> SceneResult<Self> {
        let mut groups: HashMap<NodeId, Group> = HashMap::new();
        let mut pending: HashMap<NodeId, Vec<SequenceItem<Pending>>> = HashMap::new();
        let mut root = Group::new(NodeId::ROOT);
        let mut root_texts = Vec::new();
        let mut leaves: HashSet<(NodeId, NodeId)> = HashSet::new();
        let mut item_links: Vec<(usize, NodeId, NodeId)> = Vec::new();

        let declared = |groups: &HashMap<NodeId, Group>, id: NodeId| {
            id == NodeId::ROOT || groups.contains_key(&id)
        };

        for (index, block) in blocks.iter().enumerate() {
            match block {
                Block::AuthorIds(_) | Block::MigrationInfo(_) | Block::PageInfo(_) => {}
                Block::SceneTree(b) => {
                    if b.tree_id == NodeId::ROOT {
                        continue;
                    }
                    if !declared(&groups, b.parent_id) {
                        return Err(dangling(index, "scene tree parent", b.parent_id));
                    }
                    groups
                        .entry(b.tree_id)
                        .or_insert_with(|| Group::new(b.tree_id));
                }
                Block::TreeNode(b) => {
                    let node = &b.group;
                    let target = if node.node_id == NodeId::ROOT {
                        &mut root
                    } else {
                        groups
                            .entry(node.node_id)
                            .or_insert_with(|| Group::new(node.node_id))
                    };
                    if node.label.is_some() {
                        target.label = node.label.clone();
                    }
                    if node.visible.is_some() {
                        target.visible = node.visible.clone();
                    }
                }
                Block::SceneGroupItem(b) => {
                    if !declared(&groups, b.parent_id) {
                        return Err(dangling(index, "group link parent", b.parent_id));
                    }
                    let target = b.item.value;
                    if groups.contains_key(&target) {
                        let item = b.item.clone().map(Pending::Node);
                        pending.entry(b.parent_id).or_default().push(item);
                    } else if b.parent_id == NodeId::ROOT {
                        return Err(dangling(index, "group link target", target));
                    } else {
                        item_links.push((index, b.parent_id, target));
                    }
                }
                Block::SceneLineItem(b) => {
                    if !declared(&groups, b.parent_id) {
                        return Err(dangling(index, "line parent", b.parent_id));
                    }
                    leaves.insert((b.parent_id, b.item.item_id));
                    let item = b.item.clone().map(|s| Pending::Leaf(SceneItem::Stroke(s)));
                    pending.entry(b.parent_id).or_default().push(item);
                }
                Block::SceneGlyphItem(b) => {
                    if !declared(&groups, b.parent_id) {
                        return Err(dangling(index, "glyph range parent", b.parent_id));
                    }
                    leaves.insert((b.parent_id, b.item.item_id));
                    let item = b.item.clone().map(|h| Pending::Leaf(SceneItem::Highlight(h)));
                    pending.entry(b.parent_id).or_default().push(item);
                }
                Block::RootText(b) => root_texts.push(b.value.clone()),
                Block::Unknown => {
                    return Err(SceneError::parse(
                        LoadStage::Tree,
                        format!("block {index}: unsupported block type"),
                    ));
                }
            }
        }

        for (index, parent, target) in item_links {
            if !leaves.contains(&(parent, target)) {
                return Err(SceneError::parse(
                    LoadStage::Tree,
                    format!("block {index}: link target {target} is neither a group nor an item of {parent}"),
                ));
            }
        }

        let mut visited = HashSet::new();
        visited.insert(NodeId::ROOT);
        root.children = attach(NodeId::ROOT, &mut groups, &mut pending, &mut visited)?;
        if !groups.is_empty() {
            log::debug!("{} declared group(s) never linked into the tree", groups.len());
        }

        Ok(Self {
            root,
            root_text: root_texts.last().cloned(),
            root_texts,
        })
    }

    /// Top-level groups in order.
    pub fn layers(&self) -> impl Iterator<Item = &Group> {
        self.root.children.iter().filter_map(|child| match &child.value {
            SceneItem::Group(group) => Some(group),
            _ => None,
        })
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn dangling(index: usize, what: &str, id: NodeId) -> SceneError {
    SceneError::parse(
        LoadStage::Tree,
        format!("block {index}: {what} {id} is not a declared group"),
    )
}

fn attach(
    parent: NodeId,
    groups: &mut HashMap<NodeId, Group>,
    pending: &mut HashMap<NodeId, Vec<SequenceItem<Pending>>>,
    visited: &mut HashSet<NodeId>,
) -> SceneResult<Vec<SequenceItem<SceneItem>>> {
    let Some(items) = pending.remove(&parent) else {
        return Ok(Vec::new());
    };
    let mut children = Vec::with_capacity(items.len());
    for item in items {
        let SequenceItem {
            item_id,
            left_id,
            right_id,
            deleted_length,
            value,
        } = item;
        let value = match value {
            Pending::Leaf(leaf) => leaf,
            Pending::Node(id) => {
                if !visited.insert(id) {
                    return Err(SceneError::parse(
                        LoadStage::Tree,
                        format!("group {id} is linked more than once"),
                    ));
                }
                let mut group = groups.remove(&id).ok_or_else(|| {
                    SceneError::parse(LoadStage::Tree, format!("group {id} is not declared"))
                })?;
                group.children = attach(id, groups, pending, visited)?;
                SceneItem::Group(group)
            }
        };
        children.push(SequenceItem {
            item_id,
            left_id,
            right_id,
            deleted_length,
            value,
        });
    }
    Ok(children)
}
