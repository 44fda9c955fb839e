use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

use super::{LwwValue, NodeId, SequenceItem};

/// Pen kinds understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Pen {
    Paintbrush1 = 0,
    Pencil1 = 1,
    Ballpoint1 = 2,
    Marker1 = 3,
    Fineliner1 = 4,
    Highlighter1 = 5,
    Eraser = 6,
    MechanicalPencil1 = 7,
    EraserArea = 8,
    Paintbrush2 = 12,
    MechanicalPencil2 = 13,
    Pencil2 = 14,
    Ballpoint2 = 15,
    Marker2 = 16,
    Fineliner2 = 17,
    Highlighter2 = 18,
    Calligraphy = 21,
    Shader = 23,
}

impl Pen {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_highlighter(self) -> bool {
        matches!(self, Pen::Highlighter1 | Pen::Highlighter2 | Pen::Shader)
    }
}

/// Pen colors understood by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PenColor {
    #[default]
    Black = 0,
    Gray = 1,
    White = 2,
    Yellow = 3,
    Green = 4,
    Pink = 5,
    Blue = 6,
    Red = 7,
    GrayOverlap = 8,
    Highlight = 9,
    Green2 = 10,
    Cyan = 11,
    Magenta = 12,
    Yellow2 = 13,
}

impl PenColor {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Paragraph styles for root text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParagraphStyle {
    Basic,
    #[default]
    Plain,
    Heading,
    Bold,
    Bullet,
    Bullet2,
    Checkbox,
    CheckboxChecked,
}

/// A sampled point of a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    pub speed: u16,
    pub direction: u16,
    pub width: u8,
    pub pressure: u8,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, width: u8, pressure: u8) -> Self {
        Self {
            x,
            y,
            speed: 0,
            direction: 0,
            width,
            pressure,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Same point moved to `position`, keeping its sample data.
    pub fn with_position(self, position: Point) -> Self {
        Self {
            x: position.x,
            y: position.y,
            ..self
        }
    }

    pub fn same_position(&self, other: &StrokePoint) -> bool {
        self.x == other.x && self.y == other.y
    }
}

/// A committed polyline (wire name: line).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub pen: Pen,
    pub color: PenColor,
    pub points: Vec<StrokePoint>,
    pub thickness_scale: f64,
    pub starting_length: f64,
}

impl Stroke {
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first.same_position(last),
            _ => false,
        }
    }

    pub fn max_width(&self) -> u8 {
        self.points.iter().map(|p| p.width).max().unwrap_or(0)
    }

    pub fn max_pressure(&self) -> u8 {
        self.points.iter().map(|p| p.pressure).max().unwrap_or(0)
    }

    /// Bounding box of the point positions.
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.points.iter().map(StrokePoint::position);
        let first = points.next()?;
        Some(points.fold(Rect::from_points(first, first), |rect, p| rect.union_pt(p)))
    }
}

/// Highlighted glyph range (wire name: glyph range).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub start: Option<u32>,
    pub length: u32,
    pub text: String,
    pub color: PenColor,
    pub rectangles: Vec<Rect>,
}

impl Highlight {
    pub fn new(text: impl Into<String>, color: PenColor, rectangles: Vec<Rect>) -> Self {
        let text = text.into();
        Self {
            start: None,
            length: text.chars().count() as u32,
            text,
            color,
            rectangles,
        }
    }
}

/// A group node. In block form the children list is empty; the materialized
/// tree fills it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub node_id: NodeId,
    pub label: Option<LwwValue<String>>,
    pub visible: Option<LwwValue<bool>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SequenceItem<SceneItem>>,
}

impl Group {
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            label: None,
            visible: None,
            children: Vec::new(),
        }
    }

    pub fn label_text(&self) -> Option<&str> {
        self.label.as_ref().map(|lww| lww.value.as_str())
    }

    pub fn is_visible(&self) -> bool {
        self.visible.as_ref().is_none_or(|lww| lww.value)
    }
}

/// Value of a tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneItem {
    Group(Group),
    Stroke(Stroke),
    Highlight(Highlight),
}

/// Style applied from an anchor character onward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub anchor: NodeId,
    pub style: LwwValue<ParagraphStyle>,
}

/// Root-level text block content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub items: Vec<SequenceItem<String>>,
    pub styles: Vec<TextStyle>,
    pub pos_x: f64,
    pub pos_y: f64,
    pub width: f64,
}

impl Text {
    pub fn plain_text(&self) -> String {
        self.items.iter().map(|item| item.value.as_str()).collect()
    }

    /// Style of the first paragraph, if any style was recorded.
    pub fn first_style(&self) -> Option<ParagraphStyle> {
        self.styles.first().map(|s| s.style.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(points: &[(f64, f64, u8)]) -> Stroke {
        Stroke {
            pen: Pen::Ballpoint1,
            color: PenColor::Black,
            points: points
                .iter()
                .map(|&(x, y, w)| StrokePoint::new(x, y, w, 100))
                .collect(),
            thickness_scale: 1.0,
            starting_length: 0.0,
        }
    }

    #[test]
    fn test_pen_codes() {
        assert_eq!(Pen::Ballpoint1.code(), 2);
        assert_eq!(Pen::Highlighter1.code(), 5);
        assert_eq!(Pen::Shader.code(), 23);
        assert_eq!(PenColor::Yellow.code(), 3);
        assert_eq!(PenColor::Yellow2.code(), 13);
    }

    #[test]
    fn test_stroke_closed_and_widths() {
        let s = stroke(&[(0.0, 0.0, 2), (10.0, 0.0, 5), (0.0, 0.0, 3)]);
        assert!(s.is_closed());
        assert_eq!(s.max_width(), 5);
        assert_eq!(s.max_pressure(), 100);

        let open = stroke(&[(0.0, 0.0, 2), (10.0, 0.0, 2)]);
        assert!(!open.is_closed());
    }

    #[test]
    fn test_stroke_bounds() {
        let s = stroke(&[(1.0, 2.0, 2), (-3.0, 8.0, 2)]);
        let bounds = s.bounds().unwrap();
        assert!((bounds.x0 + 3.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 8.0).abs() < f64::EPSILON);
        assert!(stroke(&[]).bounds().is_none());
    }

    #[test]
    fn test_highlight_length_counts_chars() {
        let h = Highlight::new("héllo", PenColor::Yellow, vec![]);
        assert_eq!(h.length, 5);
        assert_eq!(h.start, None);
    }

    #[test]
    fn test_group_defaults_visible() {
        let mut group = Group::new(NodeId::new(0, 2));
        assert!(group.is_visible());
        assert_eq!(group.label_text(), None);
        group.visible = Some(LwwValue::new(NodeId::new(0, 3), false));
        assert!(!group.is_visible());
    }

    #[test]
    fn test_text_plain_text() {
        let text = Text {
            items: vec![
                SequenceItem::appended(NodeId::new(0, 5), "Hello ".to_string()),
                SequenceItem::appended(NodeId::new(0, 6), "world".to_string()),
            ],
            styles: vec![TextStyle {
                anchor: NodeId::NONE,
                style: LwwValue::new(NodeId::new(0, 7), ParagraphStyle::Heading),
            }],
            pos_x: 0.0,
            pos_y: 0.0,
            width: 400.0,
        };
        assert_eq!(text.plain_text(), "Hello world");
        assert_eq!(text.first_style(), Some(ParagraphStyle::Heading));
    }
}
