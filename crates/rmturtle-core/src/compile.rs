//! Document to block stream compiler.

use crate::document::{Document, IdAllocator, PageMeta, TextAnchor};
use crate::scene::{
    AuthorIdsBlock, Block, GlyphItemBlock, Group, GroupItemBlock, LineItemBlock, LwwValue,
    MigrationInfoBlock, NodeId, PageInfoBlock, RootTextBlock, SceneTreeBlock, SequenceItem, Text,
    TextStyle, TreeNodeBlock,
};

/// Compile `document` into its ordered block stream.
///
/// Emission order: meta blocks, then per layer its tree declaration, node
/// definition and root link followed by each stroke and highlight with its
/// link, then root text. Timestamps and link ids come from a copy of the
/// document's allocator, so compiling twice yields identical output.
pub fn compile(document: &Document) -> Vec<Block> {
    let mut ids = document.ids().clone();
    let root = document.root_id();
    let mut blocks = meta_blocks(document.meta());

    for layer in document.layers() {
        blocks.push(Block::SceneTree(SceneTreeBlock {
            tree_id: layer.id,
            node_id: NodeId::NONE,
            is_update: true,
            parent_id: root,
        }));

        let mut group = Group::new(layer.id);
        group.label = Some(LwwValue::new(ids.next_id(), layer.label.clone()));
        group.visible = Some(LwwValue::new(ids.next_id(), layer.visible));
        blocks.push(Block::TreeNode(TreeNodeBlock { group }));
        blocks.push(link(root, &mut ids, layer.id));

        for entry in &layer.strokes {
            blocks.push(Block::SceneLineItem(LineItemBlock {
                parent_id: layer.id,
                item: SequenceItem::appended(entry.id, entry.stroke.clone()),
            }));
            blocks.push(link(layer.id, &mut ids, entry.id));
        }
        for entry in &layer.highlights {
            blocks.push(Block::SceneGlyphItem(GlyphItemBlock {
                parent_id: layer.id,
                item: SequenceItem::appended(entry.id, entry.highlight.clone()),
            }));
            blocks.push(link(layer.id, &mut ids, entry.id));
        }
    }

    for anchor in document.root_texts() {
        blocks.push(root_text(anchor, &mut ids));
    }

    log::debug!(
        "compiled {} layer(s), {} stroke(s) into {} block(s)",
        document.layers().len(),
        document.stroke_count(),
        blocks.len()
    );
    blocks
}

fn meta_blocks(meta: &PageMeta) -> Vec<Block> {
    vec![
        Block::AuthorIds(AuthorIdsBlock::single(meta.author_uuid)),
        Block::MigrationInfo(MigrationInfoBlock {
            migration_id: meta.migration_id,
            is_device: meta.is_device,
        }),
        Block::PageInfo(PageInfoBlock {
            loads_count: meta.loads_count,
            merges_count: meta.merges_count,
            text_chars_count: meta.text_chars_count,
            text_lines_count: meta.text_lines_count,
        }),
    ]
}

fn link(parent: NodeId, ids: &mut IdAllocator, target: NodeId) -> Block {
    Block::SceneGroupItem(GroupItemBlock {
        parent_id: parent,
        item: SequenceItem::appended(ids.next_id(), target),
    })
}

fn root_text(anchor: &TextAnchor, ids: &mut IdAllocator) -> Block {
    let block_id = ids.next_id();
    let text = Text {
        items: vec![SequenceItem::appended(ids.next_id(), anchor.text.clone())],
        styles: vec![TextStyle {
            anchor: NodeId::NONE,
            style: LwwValue::new(ids.next_id(), anchor.style),
        }],
        pos_x: anchor.position.x,
        pos_y: anchor.position.y,
        width: anchor.width,
    };
    Block::RootText(RootTextBlock {
        block_id,
        value: text,
    })
}
