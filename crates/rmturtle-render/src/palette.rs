//! Display colors for device pen colors.

use std::collections::HashMap;

use peniko::Color;
use rmturtle_core::PenColor;

/// Built-in color for a pen color.
pub fn pen_color(color: PenColor) -> Color {
    let (r, g, b) = match color {
        PenColor::Black => (0x00, 0x00, 0x00),
        PenColor::Gray => (0x7f, 0x7f, 0x7f),
        PenColor::White => (0xff, 0xff, 0xff),
        PenColor::Yellow => (0xf5, 0xd9, 0x0a),
        PenColor::Green => (0x2e, 0x7d, 0x32),
        PenColor::Green2 => (0x66, 0xbb, 0x6a),
        PenColor::Pink => (0xec, 0x40, 0x7a),
        PenColor::Red => (0xd3, 0x2f, 0x2f),
        PenColor::Blue => (0x19, 0x76, 0xd2),
        PenColor::Cyan => (0x00, 0xac, 0xc1),
        PenColor::Magenta => (0x8e, 0x24, 0xaa),
        PenColor::Yellow2 | PenColor::Highlight => (0xff, 0xf5, 0x9d),
        PenColor::GrayOverlap => (0x9e, 0x9e, 0x9e),
    };
    Color::from_rgba8(r, g, b, 255)
}

/// Pen colors with per-color overrides on top of the built-in table.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    overrides: HashMap<PenColor, Color>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color(mut self, pen: PenColor, color: Color) -> Self {
        self.overrides.insert(pen, color);
        self
    }

    pub fn get(&self, pen: PenColor) -> Color {
        self.overrides.get(&pen).copied().unwrap_or_else(|| pen_color(pen))
    }
}

/// `#rrggbb`, alpha ignored.
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(Color::from_rgba8(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
            255,
        )),
        3 => {
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Some(Color::from_rgba8(short(0)?, short(1)?, short(2)?, 255))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pen_colors_to_hex() {
        assert_eq!(to_hex(pen_color(PenColor::Black)), "#000000");
        assert_eq!(to_hex(pen_color(PenColor::Blue)), "#1976d2");
        assert_eq!(to_hex(pen_color(PenColor::Highlight)), "#fff59d");
    }

    #[test]
    fn test_palette_override() {
        let palette = Palette::new().with_color(PenColor::Red, Color::from_rgba8(1, 2, 3, 255));
        assert_eq!(to_hex(palette.get(PenColor::Red)), "#010203");
        assert_eq!(to_hex(palette.get(PenColor::Green)), "#2e7d32");
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ffffff").map(to_hex).as_deref(), Some("#ffffff"));
        assert_eq!(parse_hex("f00").map(to_hex).as_deref(), Some("#ff0000"));
        assert!(parse_hex("#12345").is_none());
        assert!(parse_hex("#gg0000").is_none());
    }
}
