use serde::Serialize;
use std::path::PathBuf;

use crate::layout::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFace {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    /// Parses `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub content: String,
    pub font: FontFace,
    pub size_pt: f32,
    pub color: Rgb,
    pub position: Position,
    pub alignment: Alignment,
    pub line_height_mm: f32,
    /// Wrap at the right page margin; `false` draws a single cell.
    pub wrap: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageBlock {
    pub source: PathBuf,
    pub position: Position,
    pub width_mm: f32,
}

/// One renderer-agnostic visual element. A plan is a list of these in paint
/// order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawInstruction {
    Text(TextBlock),
    Image(ImageBlock),
}

impl DrawInstruction {
    pub fn as_text(&self) -> Option<&TextBlock> {
        match self {
            DrawInstruction::Text(block) => Some(block),
            DrawInstruction::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&ImageBlock> {
        match self {
            DrawInstruction::Image(block) => Some(block),
            DrawInstruction::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Rgb::parse_hex("#c40000"), Some(Rgb(0xc4, 0, 0)));
        assert_eq!(Rgb::parse_hex("FFFFFF"), Some(Rgb(255, 255, 255)));
        assert_eq!(Rgb::parse_hex("#fff"), None);
        assert_eq!(Rgb::parse_hex("#gg0000"), None);
    }

    #[test]
    fn instructions_serialize_with_kind_tag() {
        let image = DrawInstruction::Image(ImageBlock {
            source: PathBuf::from("logo.png"),
            position: Position::new(150.0, 15.0),
            width_mm: 100.0,
        });
        let json = serde_json::to_string(&image).expect("json");
        assert_eq!(
            json,
            r#"{"kind":"image","source":"logo.png","position":{"x_mm":150.0,"y_mm":15.0},"width_mm":100.0}"#
        );
    }
}
