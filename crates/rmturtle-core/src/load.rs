//! Round-trip loader: scene tree or flat blocks back into a [`Document`].

use kurbo::Point;
use std::collections::HashMap;

use crate::codec::SceneCodec;
use crate::document::{Document, PageMeta, TextAnchor, Tool};
use crate::error::{LoadStage, SceneError, SceneResult};
use crate::scene::{Block, Group, Highlight, NodeId, PenColor, SceneItem, SceneTree, Stroke, Text};

/// Load through the tree path, falling back to the flat block scan.
pub fn load(codec: &dyn SceneCodec, source: &[u8]) -> SceneResult<Document> {
    let tree_error = match codec.read_tree(source).and_then(|tree| load_tree(&tree)) {
        Ok(document) => return Ok(document),
        Err(err) => err,
    };
    log::warn!("tree load failed, falling back to blocks: {tree_error}");

    let blocks = codec.read_blocks(source).map_err(|err| {
        SceneError::parse(
            LoadStage::Blocks,
            format!("{err} (after tree stage failed: {tree_error})"),
        )
    })?;
    Ok(load_blocks(&blocks))
}

/// Build a document from a materialized tree.
///
/// Each group under the root becomes a layer. A root with no groups is an
/// error so that callers can fall back to the block scan instead of
/// silently returning an empty document.
pub fn load_tree(tree: &SceneTree) -> SceneResult<Document> {
    if tree.layers().next().is_none() {
        return Err(SceneError::parse(LoadStage::Tree, "root has no groups"));
    }

    let mut document = Document::new();
    for child in &tree.root.children {
        match &child.value {
            SceneItem::Group(group) => add_layer(&mut document, group),
            other => log::warn!("skipping {} directly under root", item_kind(other)),
        }
    }
    for text in &tree.root_texts {
        document.add_text(text_anchor(text));
    }

    log::debug!(
        "loaded {} layer(s), {} stroke(s) from tree",
        document.layers().len(),
        document.stroke_count()
    );
    Ok(document)
}

fn add_layer(document: &mut Document, group: &Group) {
    let label = group
        .label_text()
        .map(str::to_string)
        .unwrap_or_else(|| default_label(document.layers().len()));
    let layer = document.create_layer(label, group.is_visible());
    let index = document.layers().len() - 1;

    for child in &group.children {
        match &child.value {
            SceneItem::Stroke(stroke) => {
                document.add_stroke_at(index, Tool::inferred_from(stroke), stroke.clone());
            }
            SceneItem::Highlight(highlight) => {
                document.add_highlight_at(index, highlight.clone());
            }
            SceneItem::Group(nested) => {
                log::warn!("skipping nested group {} in layer {layer}", nested.node_id);
            }
        }
    }
}

#[derive(Default)]
struct Accumulated {
    name: Option<String>,
    visible: Option<bool>,
    strokes: Vec<Stroke>,
    highlights: Vec<Highlight>,
}

/// Build a document by scanning blocks in file order.
///
/// Content is grouped by parent id; every id that collected at least one
/// stroke or highlight becomes a layer, in order of first appearance.
/// Unknown blocks are skipped.
pub fn load_blocks(blocks: &[Block]) -> Document {
    let mut order: Vec<NodeId> = Vec::new();
    let mut groups: HashMap<NodeId, Accumulated> = HashMap::new();
    let mut texts: Vec<&Text> = Vec::new();
    let mut meta = PageMeta::default();
    let mut skipped = 0usize;

    for block in blocks {
        match block {
            Block::AuthorIds(b) => {
                if let Some(uuid) = b.primary() {
                    meta.author_uuid = uuid;
                }
            }
            Block::MigrationInfo(b) => {
                meta.migration_id = b.migration_id;
                meta.is_device = b.is_device;
            }
            Block::PageInfo(b) => {
                meta.loads_count = b.loads_count;
                meta.merges_count = b.merges_count;
                meta.text_chars_count = b.text_chars_count;
                meta.text_lines_count = b.text_lines_count;
            }
            Block::SceneTree(b) => {
                accumulate(&mut groups, &mut order, b.tree_id);
            }
            Block::TreeNode(b) => {
                let acc = accumulate(&mut groups, &mut order, b.group.node_id);
                if let Some(label) = &b.group.label {
                    acc.name = Some(label.value.clone());
                }
                if let Some(visible) = &b.group.visible {
                    acc.visible = Some(visible.value);
                }
            }
            Block::SceneLineItem(b) => accumulate(&mut groups, &mut order, b.parent_id)
                .strokes
                .push(b.item.value.clone()),
            Block::SceneGlyphItem(b) => accumulate(&mut groups, &mut order, b.parent_id)
                .highlights
                .push(b.item.value.clone()),
            Block::RootText(b) => texts.push(&b.value),
            Block::SceneGroupItem(_) => {}
            Block::Unknown => skipped += 1,
        }
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} unsupported block(s)");
    }

    let mut document = Document::with_meta(meta);
    for id in order {
        let Some(acc) = groups.remove(&id) else {
            continue;
        };
        if acc.strokes.is_empty() && acc.highlights.is_empty() {
            continue;
        }
        let label = acc
            .name
            .unwrap_or_else(|| default_label(document.layers().len()));
        document.create_layer(label, acc.visible.unwrap_or(true));
        let index = document.layers().len() - 1;
        for stroke in acc.strokes {
            document.add_stroke_at(index, Tool::inferred_from(&stroke), stroke);
        }
        for highlight in acc.highlights {
            document.add_highlight_at(index, highlight);
        }
    }
    for text in texts {
        document.add_text(text_anchor(text));
    }

    log::debug!(
        "loaded {} layer(s), {} stroke(s) from {} block(s)",
        document.layers().len(),
        document.stroke_count(),
        blocks.len()
    );
    document
}

fn accumulate<'a>(
    groups: &'a mut HashMap<NodeId, Accumulated>,
    order: &mut Vec<NodeId>,
    id: NodeId,
) -> &'a mut Accumulated {
    groups.entry(id).or_insert_with(|| {
        order.push(id);
        Accumulated::default()
    })
}

fn default_label(existing: usize) -> String {
    format!("Layer {}", existing + 1)
}

fn text_anchor(text: &Text) -> TextAnchor {
    TextAnchor {
        position: Point::new(text.pos_x, text.pos_y),
        width: text.width,
        style: text.first_style().unwrap_or_default(),
        color: PenColor::Black,
        text: text.plain_text(),
    }
}

fn item_kind(item: &SceneItem) -> &'static str {
    match item {
        SceneItem::Group(_) => "group",
        SceneItem::Stroke(_) => "stroke",
        SceneItem::Highlight(_) => "highlight",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use crate::scene::{
        GroupItemBlock, LineItemBlock, LwwValue, Pen, SequenceItem, StrokePoint,
        TreeNodeBlock,
    };
    use kurbo::Rect;

    fn sample_document() -> Document {
        let mut doc = Document::new();
        let pencil = Tool::new(Pen::Pencil1).with_width(3).with_pressure(70);
        let a = doc.create_layer("Sketch", true);
        doc.add_stroke(
            a,
            pencil,
            pencil.stroke(vec![
                pencil.stamp(Point::new(0.0, 0.0)),
                pencil.stamp(Point::new(10.0, 0.0)),
                pencil.stamp(Point::new(10.0, 10.0)),
            ]),
        )
        .unwrap();
        doc.add_highlight(a, Highlight::new("mark", PenColor::Yellow, vec![Rect::new(0.0, 0.0, 8.0, 4.0)]))
            .unwrap();
        let b = doc.create_layer("Hidden", false);
        let tool = Tool::default();
        doc.add_stroke(b, tool, tool.stroke(vec![tool.stamp(Point::ZERO), tool.stamp(Point::new(1.0, 1.0))]))
            .unwrap();
        doc
    }

    fn geometry(doc: &Document) -> Vec<(String, bool, Vec<Vec<(f64, f64)>>)> {
        doc.layers()
            .iter()
            .map(|layer| {
                let strokes = layer
                    .strokes
                    .iter()
                    .map(|s| s.stroke.points.iter().map(|p| (p.x, p.y)).collect())
                    .collect();
                (layer.label.clone(), layer.visible, strokes)
            })
            .collect()
    }

    #[test]
    fn test_tree_round_trip() {
        let doc = sample_document();
        let tree = SceneTree::from_blocks(&doc.compile()).unwrap();
        let loaded = load_tree(&tree).unwrap();
        assert_eq!(geometry(&loaded), geometry(&doc));
        assert_eq!(loaded.highlight_count(), 1);

        let stroke = &loaded.layers()[0].strokes[0];
        assert_eq!(stroke.tool.width, 3);
        assert_eq!(stroke.tool.pressure, 70);
        assert_eq!(stroke.tool.pen, Pen::Pencil1);
    }

    #[test]
    fn test_blocks_round_trip() {
        let doc = sample_document();
        let loaded = load_blocks(&doc.compile());
        assert_eq!(geometry(&loaded), geometry(&doc));
        assert_eq!(loaded.meta(), doc.meta());
    }

    #[test]
    fn test_empty_tree_is_error() {
        let err = load_tree(&SceneTree::empty()).unwrap_err();
        assert!(matches!(err, SceneError::Parse { stage: LoadStage::Tree, .. }));
    }

    #[test]
    fn test_blocks_default_labels_and_skip_unknown() {
        let tool = Tool::default();
        let stroke = tool.stroke(vec![StrokePoint::new(0.0, 0.0, 2, 100), StrokePoint::new(1.0, 0.0, 2, 100)]);
        let blocks = vec![
            Block::Unknown,
            Block::SceneLineItem(LineItemBlock {
                parent_id: NodeId::new(0, 9),
                item: SequenceItem::appended(NodeId::new(0, 10), stroke.clone()),
            }),
            Block::SceneLineItem(LineItemBlock {
                parent_id: NodeId::new(0, 20),
                item: SequenceItem::appended(NodeId::new(0, 21), stroke),
            }),
        ];
        let doc = load_blocks(&blocks);
        let labels: Vec<_> = doc.layers().iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["Layer 1", "Layer 2"]);
        assert!(doc.layers().iter().all(|l| l.visible));
    }

    #[test]
    fn test_blocks_skip_layers_without_content() {
        let mut group = Group::new(NodeId::new(0, 2));
        group.label = Some(LwwValue::new(NodeId::new(0, 3), "Empty".to_string()));
        let blocks = vec![
            Block::TreeNode(TreeNodeBlock { group }),
            Block::SceneGroupItem(GroupItemBlock {
                parent_id: NodeId::ROOT,
                item: SequenceItem::appended(NodeId::new(0, 4), NodeId::new(0, 2)),
            }),
        ];
        assert!(load_blocks(&blocks).layers().is_empty());
    }

    #[test]
    fn test_load_falls_back_to_blocks() {
        let tool = Tool::default();
        // content under an undeclared parent: the tree path rejects it
        let blocks = vec![Block::SceneLineItem(LineItemBlock {
            parent_id: NodeId::new(0, 5),
            item: SequenceItem::appended(
                NodeId::new(0, 6),
                tool.stroke(vec![StrokePoint::new(0.0, 0.0, 2, 100), StrokePoint::new(3.0, 4.0, 2, 100)]),
            ),
        })];
        let codec = JsonCodec::default();
        let mut bytes = Vec::new();
        codec.write(&mut bytes, &blocks, &Default::default()).unwrap();

        let doc = load(&codec, &bytes).unwrap();
        assert_eq!(doc.layers().len(), 1);
        assert_eq!(doc.layers()[0].label, "Layer 1");
    }

    #[test]
    fn test_load_reports_block_stage() {
        let err = load(&JsonCodec::default(), b"not json").unwrap_err();
        match err {
            SceneError::Parse { stage, message } => {
                assert_eq!(stage, LoadStage::Blocks);
                assert!(message.contains("tree stage"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_root_text_round_trip() {
        let mut doc = Document::new();
        doc.add_text(TextAnchor {
            position: Point::new(5.0, 6.0),
            width: 250.0,
            style: crate::scene::ParagraphStyle::Heading,
            color: PenColor::Black,
            text: "Title".to_string(),
        });
        let layer = doc.create_layer("L", true);
        let tool = Tool::default();
        doc.add_stroke(layer, tool, tool.stroke(vec![tool.stamp(Point::ZERO), tool.stamp(Point::new(2.0, 0.0))]))
            .unwrap();

        let tree = SceneTree::from_blocks(&doc.compile()).unwrap();
        let loaded = load_tree(&tree).unwrap();
        assert_eq!(loaded.root_texts(), doc.root_texts());
    }

    #[test]
    fn test_tree_keeps_every_text_anchor() {
        let mut doc = sample_document();
        for (i, caption) in ["first", "second"].into_iter().enumerate() {
            doc.add_text(TextAnchor {
                position: Point::new(10.0, 100.0 * i as f64),
                width: 400.0,
                style: crate::scene::ParagraphStyle::Plain,
                color: PenColor::Black,
                text: caption.to_string(),
            });
        }

        let tree = SceneTree::from_blocks(&doc.compile()).unwrap();
        let loaded = load_tree(&tree).unwrap();
        let texts: Vec<_> = loaded.root_texts().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_load_uses_tree_path_for_compiled_documents() {
        let doc = sample_document();
        let codec = JsonCodec::default();
        let mut bytes = Vec::new();
        codec.write(&mut bytes, &doc.compile(), &Default::default()).unwrap();

        let tree = codec.read_tree(&bytes).unwrap();
        assert_eq!(tree.layers().count(), 2);
        assert_eq!(geometry(&load(&codec, &bytes).unwrap()), geometry(&doc));
    }
}
