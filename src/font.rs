use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Arc;
use ttf_parser::name_id;
use ttf_parser::Face;

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Parsed TrueType face kept around for width measurement and embedding.
#[derive(Clone)]
pub struct FontMetrics {
    data: Arc<Vec<u8>>,
    units_per_em: u16,
    space_advance: u16,
    family: Option<String>,
    face_index: u32,
}

impl std::fmt::Debug for FontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontMetrics")
            .field("family", &self.family)
            .field("units_per_em", &self.units_per_em)
            .field("face_index", &self.face_index)
            .finish()
    }
}

impl FontMetrics {
    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }

    pub fn data(&self) -> &[u8] {
        self.data.as_ref()
    }
}

pub fn load_font_metrics(path: &Path) -> Result<FontMetrics> {
    let data =
        std::fs::read(path).with_context(|| format!("failed to read font: {}", path.display()))?;
    load_font_metrics_from_data(&data)
        .map_err(|err| anyhow!("failed to parse font: {} ({})", path.display(), err))
}

/// Width of `text` in millimetres at `size_pt`. Without a parsed face the
/// width is estimated from character classes.
pub fn measure_text_width_mm(text: &str, size_pt: f32, font: Option<&FontMetrics>) -> f32 {
    let size_mm = size_pt * PT_TO_MM;
    if let Some(font) = font {
        if let Ok(face) = Face::parse(&font.data, font.face_index) {
            let mut advance = 0u32;
            for ch in text.chars() {
                if ch == '\n' {
                    continue;
                }
                if ch == ' ' {
                    advance = advance.saturating_add(font.space_advance as u32);
                    continue;
                }
                let glyph_advance = face
                    .glyph_index(ch)
                    .and_then(|glyph| face.glyph_hor_advance(glyph))
                    .unwrap_or(font.space_advance);
                advance = advance.saturating_add(glyph_advance as u32);
            }
            let units = font.units_per_em.max(1) as f32;
            return advance as f32 * (size_mm / units);
        }
    }
    estimate_text_width_units(text) * size_mm
}

pub fn pt_to_mm(size_pt: f32) -> f32 {
    size_pt * PT_TO_MM
}

fn estimate_char_units(ch: char) -> f32 {
    if ch.is_whitespace() {
        0.28
    } else if ch.is_ascii_uppercase() || ch.is_ascii_digit() {
        0.62
    } else if ch.is_ascii_alphanumeric() {
        0.52
    } else if ch.is_ascii() {
        0.35
    } else if matches!(
        ch as u32,
        0x4E00..=0x9FFF | 0x3040..=0x30FF | 0x31F0..=0x31FF
    ) {
        1.0
    } else {
        0.6
    }
}

fn estimate_text_width_units(text: &str) -> f32 {
    text.chars()
        .filter(|ch| *ch != '\n')
        .map(estimate_char_units)
        .sum()
}

fn load_font_metrics_from_data(data: &[u8]) -> Result<FontMetrics> {
    let count = ttf_parser::fonts_in_collection(data).unwrap_or(1);
    for index in 0..count {
        if let Ok(face) = Face::parse(data, index) {
            let units_per_em = face.units_per_em().max(1);
            let space_advance = face
                .glyph_index(' ')
                .and_then(|id| face.glyph_hor_advance(id))
                .unwrap_or(units_per_em / 2);
            return Ok(FontMetrics {
                data: Arc::new(data.to_vec()),
                units_per_em,
                space_advance,
                family: extract_family_name(&face),
                face_index: index,
            });
        }
    }
    Err(anyhow!("no usable face in font data"))
}

fn extract_family_name(face: &Face<'_>) -> Option<String> {
    let mut fallback = None;
    for name in face.names() {
        if name.name_id == name_id::TYPOGRAPHIC_FAMILY {
            if let Some(value) = name.to_string() {
                return Some(value);
            }
        } else if name.name_id == name_id::FAMILY && fallback.is_none() {
            fallback = name.to_string();
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_scales_with_font_size() {
        let small = measure_text_width_mm("Camry", 10.0, None);
        let large = measure_text_width_mm("Camry", 20.0, None);
        assert!(small > 0.0);
        assert!((large - small * 2.0).abs() < 1e-4);
    }

    #[test]
    fn newlines_have_no_width() {
        assert_eq!(
            measure_text_width_mm("a\nb", 12.0, None),
            measure_text_width_mm("ab", 12.0, None)
        );
    }

    #[test]
    fn garbage_font_data_is_rejected() {
        assert!(load_font_metrics_from_data(b"not a font").is_err());
    }
}
