use kurbo::Rect;
use rmturtle_core::scene::Stroke;
use rmturtle_core::{
    Block, Document, FillOptions, JsonCodec, Notebook, Pen, PenColor, SceneCodec, SceneTree,
    TextOptions, Tool, WriteOptions,
};
use tempfile::TempDir;

/// Geometry, labels and visibility: what survives a compile/load cycle.
#[derive(Debug, PartialEq)]
struct LayerSummary {
    label: String,
    visible: bool,
    strokes: Vec<(Pen, PenColor, Vec<(f64, f64)>)>,
    highlights: Vec<String>,
}

fn summarize(document: &Document) -> Vec<LayerSummary> {
    document
        .layers()
        .iter()
        .map(|layer| LayerSummary {
            label: layer.label.clone(),
            visible: layer.visible,
            strokes: layer
                .strokes
                .iter()
                .map(|s| {
                    let points = s.stroke.points.iter().map(|p| (p.x, p.y)).collect();
                    (s.stroke.pen, s.stroke.color, points)
                })
                .collect(),
            highlights: layer
                .highlights
                .iter()
                .map(|h| h.highlight.text.clone())
                .collect(),
        })
        .collect()
}

fn drawing() -> Notebook {
    let mut nb = Notebook::new();
    nb.layer("Shapes");
    nb.move_to(100.0, 100.0);
    for _ in 0..4 {
        nb.forward(150.0).left(90.0);
    }
    nb.stroke();
    nb.star(400.0, 300.0, 80.0, 5, 0.5, -90.0);
    {
        let mut scoped = nb.transform_scope();
        scoped.tf_translate(600.0, 600.0).tf_rotate(30.0);
        scoped.rounded_rect(-50.0, -25.0, 100.0, 50.0);
    }

    nb.layer_with_visibility("Notes", false);
    {
        let mut marker = nb.preset_scope("marker").unwrap();
        marker.filled_ellipse(300.0, 900.0, 60.0, 30.0, 15.0, FillOptions::outlined());
    }
    nb.highlight("important", [Rect::new(10.0, 10.0, 90.0, 30.0)], PenColor::Yellow);
    nb.text(50.0, 1200.0, "Caption", TextOptions::default());
    nb
}

#[test]
fn test_compile_write_read_load_preserves_content() {
    let nb = drawing();
    let codec = JsonCodec::default();
    let mut bytes = Vec::new();
    nb.write(&codec, &mut bytes).unwrap();

    assert_eq!(codec.read_tree(&bytes).unwrap().layers().count(), 2);
    let loaded = Document::load(&codec, &bytes).unwrap();
    assert_eq!(summarize(&loaded), summarize(nb.document()));
    assert_eq!(loaded.root_texts(), nb.document().root_texts());
}

#[test]
fn test_recompile_is_stable() {
    let nb = drawing();
    let first = summarize(nb.document());

    let tree = SceneTree::from_blocks(&nb.compile()).unwrap();
    let once = rmturtle_core::load::load_tree(&tree).unwrap();
    let tree = SceneTree::from_blocks(&once.compile()).unwrap();
    let twice = rmturtle_core::load::load_tree(&tree).unwrap();

    assert_eq!(summarize(&once), first);
    assert_eq!(summarize(&twice), first);
}

/// Stroke values and layer label/visibility as they appear on the wire.
fn wire_content(blocks: &[Block]) -> (Vec<Stroke>, Vec<(Option<String>, Option<bool>)>) {
    let strokes = blocks
        .iter()
        .filter_map(|block| match block {
            Block::SceneLineItem(b) => Some(b.item.value.clone()),
            _ => None,
        })
        .collect();
    let layers = blocks
        .iter()
        .filter_map(|block| match block {
            Block::TreeNode(b) => Some((
                b.group.label.as_ref().map(|l| l.value.clone()),
                b.group.visible.as_ref().map(|v| v.value),
            )),
            _ => None,
        })
        .collect();
    (strokes, layers)
}

#[test]
fn test_compile_load_compile_is_idempotent() {
    let first = drawing().compile();
    let loaded = rmturtle_core::load::load_tree(&SceneTree::from_blocks(&first).unwrap()).unwrap();
    let second = loaded.compile();

    let (strokes, layers) = wire_content(&first);
    assert!(!strokes.is_empty());
    assert_eq!(wire_content(&second), (strokes, layers));
}

#[test]
fn test_tree_and_flat_paths_agree() {
    let nb = drawing();
    let blocks = nb.compile();
    let from_tree = rmturtle_core::load::load_tree(&SceneTree::from_blocks(&blocks).unwrap()).unwrap();
    let from_blocks = rmturtle_core::load::load_blocks(&blocks);
    assert_eq!(summarize(&from_tree), summarize(&from_blocks));
}

#[test]
fn test_loaded_tools_are_inferred_from_points() {
    let nb = drawing();
    let loaded = Document::load(&JsonCodec::default(), &serialize(&nb.compile())).unwrap();
    let fill_stroke = &loaded.layers()[1].strokes[0];
    let marker = Tool::new(Pen::Marker1).with_width(4);
    assert_eq!(fill_stroke.tool, marker);
}

#[test]
fn test_save_and_open() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drawing.json");
    let nb = drawing();
    nb.save(&path).unwrap();

    let reopened = Notebook::open(&path).unwrap();
    assert_eq!(summarize(reopened.document()), summarize(nb.document()));
}

#[test]
fn test_single_stroke_scene_shape() {
    let mut nb = Notebook::new();
    nb.layer("L").line(0.0, 0.0, 10.0, 10.0);
    let blocks = nb.compile();
    let content: Vec<_> = blocks
        .iter()
        .filter(|b| !b.is_meta())
        .map(Block::kind)
        .collect();
    assert_eq!(
        content,
        vec![
            "scene_tree",
            "tree_node",
            "scene_group_item",
            "scene_line_item",
            "scene_group_item",
        ]
    );
}

fn serialize(blocks: &[Block]) -> Vec<u8> {
    let mut bytes = Vec::new();
    JsonCodec::default()
        .write(&mut bytes, blocks, &WriteOptions::default())
        .unwrap();
    bytes
}
