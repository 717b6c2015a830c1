use anyhow::{anyhow, Context, Result};
use printpdf::image_crate::{Rgb, RgbImage, RgbaImage};
use printpdf::{
    Image, ImageTransform, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference,
};
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::FlyerError;
use crate::font::{load_font_metrics, measure_text_width_mm, pt_to_mm, FontMetrics};
use crate::instructions::{Alignment, DrawInstruction, FontFace, ImageBlock, TextBlock};
use crate::labels::LookupTable;
use crate::layout::PageSize;

/// Inner padding of a text cell, left and right.
const CELL_MARGIN_MM: f32 = 1.0;
const IMAGE_DPI: f32 = 300.0;

/// Turns draw instructions into a page file.
pub trait PageRenderer {
    fn render(&self, instructions: &[DrawInstruction], page: &PageSize, dest: &Path)
        -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FontPaths {
    pub regular: Option<PathBuf>,
    pub bold: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PdfRenderer {
    title: String,
    regular: Option<FontMetrics>,
    bold: Option<FontMetrics>,
}

impl PdfRenderer {
    pub fn new(title: impl Into<String>, fonts: &FontPaths) -> Result<Self> {
        let regular = fonts.regular.as_deref().map(load_font_metrics).transpose()?;
        let bold = fonts.bold.as_deref().map(load_font_metrics).transpose()?;
        if regular.is_none() || bold.is_none() {
            warn!("no TTF font configured; using built-in Helvetica (WinAnsi text only)");
        }
        Ok(Self {
            title: title.into(),
            regular,
            bold,
        })
    }

    fn uses_builtin_font(&self) -> bool {
        self.regular.is_none() || self.bold.is_none()
    }

    /// Rejects a label pack the built-in fonts cannot draw. With both TTF
    /// faces configured every pack passes.
    pub fn check_labels(&self, table: &LookupTable) -> crate::error::Result<()> {
        if !self.uses_builtin_font() {
            return Ok(());
        }
        match table.texts().find_map(first_non_winansi) {
            Some(ch) => Err(FlyerError::config(format!(
                "label pack '{}' contains '{}', which the built-in PDF font cannot draw; \
                 set assets.font_regular and assets.font_bold to TTF files",
                table.locale, ch
            ))),
            None => Ok(()),
        }
    }

    fn metrics(&self, face: FontFace) -> Option<&FontMetrics> {
        match face {
            FontFace::Regular => self.regular.as_ref(),
            FontFace::Bold => self.bold.as_ref(),
        }
    }

    fn add_font(&self, doc: &PdfDocumentReference, face: FontFace) -> Result<IndirectFontRef> {
        match self.metrics(face) {
            Some(metrics) => doc
                .add_external_font(Cursor::new(metrics.data().to_vec()))
                .map_err(|err| anyhow!("failed to embed font {:?}: {}", metrics.family(), err)),
            None => {
                let builtin = match face {
                    FontFace::Regular => printpdf::BuiltinFont::Helvetica,
                    FontFace::Bold => printpdf::BuiltinFont::HelveticaBold,
                };
                doc.add_builtin_font(builtin)
                    .map_err(|err| anyhow!("failed to add built-in font: {}", err))
            }
        }
    }

    fn draw_text(
        &self,
        layer: &PdfLayerReference,
        font: &IndirectFontRef,
        block: &TextBlock,
        page: &PageSize,
    ) {
        let metrics = self.metrics(block.font);
        let measure = |text: &str| measure_text_width_mm(text, block.size_pt, metrics);
        let cell_width = (page.width_mm - page.margin_mm - block.position.x_mm).max(0.0);
        let lines = if block.wrap {
            wrap_text(
                &block.content,
                (cell_width - CELL_MARGIN_MM * 2.0).max(1.0),
                &measure,
            )
        } else if block.content.is_empty() {
            Vec::new()
        } else {
            vec![block.content.replace('\n', " ")]
        };
        if lines.is_empty() {
            return;
        }

        let (r, g, b) = block.color.to_unit();
        layer.set_fill_color(printpdf::Color::Rgb(printpdf::Rgb::new(r, g, b, None)));
        let size_mm = pt_to_mm(block.size_pt);
        for (idx, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let x = match block.alignment {
                Alignment::Left => block.position.x_mm + CELL_MARGIN_MM,
                Alignment::Center => {
                    block.position.x_mm + ((cell_width - measure(line)) / 2.0).max(0.0)
                }
            };
            let cell_top = block.position.y_mm + idx as f32 * block.line_height_mm;
            let baseline = cell_top + block.line_height_mm / 2.0 + size_mm * 0.3;
            layer.use_text(
                line.as_str(),
                block.size_pt,
                Mm(x),
                Mm(page.height_mm - baseline),
                font,
            );
        }
        debug!("text: {} line(s) at {:?}", lines.len(), block.position);
    }
}

impl PageRenderer for PdfRenderer {
    fn render(
        &self,
        instructions: &[DrawInstruction],
        page: &PageSize,
        dest: &Path,
    ) -> Result<()> {
        for block in instructions.iter().filter_map(DrawInstruction::as_text) {
            if self.metrics(block.font).is_some() {
                continue;
            }
            if let Some(ch) = first_non_winansi(&block.content) {
                return Err(anyhow!(
                    "'{}' in {:?} cannot be drawn with the built-in PDF font; configure a TTF font",
                    ch,
                    block.content
                ));
            }
        }
        let (doc, page_index, layer_index) = PdfDocument::new(
            self.title.as_str(),
            Mm(page.width_mm),
            Mm(page.height_mm),
            "Layer 1",
        );
        let layer = doc.get_page(page_index).get_layer(layer_index);
        let regular = self.add_font(&doc, FontFace::Regular)?;
        let bold = self.add_font(&doc, FontFace::Bold)?;

        for instruction in instructions {
            match instruction {
                DrawInstruction::Text(block) => {
                    let font = match block.font {
                        FontFace::Regular => &regular,
                        FontFace::Bold => &bold,
                    };
                    self.draw_text(&layer, font, block, page);
                }
                DrawInstruction::Image(block) => draw_image(&layer, block, page)?,
            }
        }

        let file = File::create(dest)
            .with_context(|| format!("failed to create pdf: {}", dest.display()))?;
        let mut writer = BufWriter::new(file);
        doc.save(&mut writer)
            .map_err(|err| anyhow!("failed to write pdf {}: {}", dest.display(), err))?;
        Ok(())
    }
}

fn draw_image(layer: &PdfLayerReference, block: &ImageBlock, page: &PageSize) -> Result<()> {
    let image = printpdf::image_crate::open(&block.source)
        .with_context(|| format!("failed to load image: {}", block.source.display()))?;
    let rgb = flatten_on_white(&image.to_rgba8());
    let (width_px, height_px) = rgb.dimensions();
    let image = printpdf::image_crate::DynamicImage::ImageRgb8(rgb);
    let natural_w_mm = px_to_mm(width_px);
    let natural_h_mm = px_to_mm(height_px);
    if natural_w_mm <= 0.0 {
        return Err(anyhow!("image has no width: {}", block.source.display()));
    }
    let scale = block.width_mm / natural_w_mm;
    let height_mm = natural_h_mm * scale;

    let transform = ImageTransform {
        translate_x: Some(Mm(block.position.x_mm)),
        translate_y: Some(Mm(page.height_mm - block.position.y_mm - height_mm)),
        rotate: None,
        scale_x: Some(scale),
        scale_y: Some(scale),
        dpi: Some(IMAGE_DPI),
    };
    Image::from_dynamic_image(&image).add_to_layer(layer.clone(), transform);
    debug!(
        "image: {} at {:?} ({} x {} mm)",
        block.source.display(),
        block.position,
        block.width_mm,
        height_mm
    );
    Ok(())
}

/// Composites transparent pixels onto a white sheet; embedded images carry no
/// alpha channel.
fn flatten_on_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |channel: u8| {
            let alpha = a as u32;
            ((channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Characters outside Windows-1252, the encoding of the built-in PDF fonts.
fn first_non_winansi(text: &str) -> Option<char> {
    const CP1252_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";
    text.chars().find(|&ch| {
        let code = ch as u32;
        let latin1 = (0x20..=0x7e).contains(&code) || (0xa0..=0xff).contains(&code);
        !(latin1 || ch == '\n' || CP1252_EXTRAS.contains(ch))
    })
}

fn px_to_mm(px: u32) -> f32 {
    px as f32 / IMAGE_DPI * 25.4
}

/// Greedy word wrap. Explicit `\n` always breaks; a word wider than the line
/// is split between characters.
pub fn wrap_text(text: &str, max_width_mm: f32, measure: &dyn Fn(&str) -> f32) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let mut result = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };
            if measure(&candidate) <= max_width_mm {
                current = candidate;
                continue;
            }
            if !current.is_empty() {
                result.push(std::mem::take(&mut current));
            }
            if measure(word) <= max_width_mm {
                current = word.to_string();
                continue;
            }
            for ch in word.chars() {
                current.push(ch);
                if measure(&current) > max_width_mm && current.chars().count() > 1 {
                    current.pop();
                    result.push(std::mem::take(&mut current));
                    current.push(ch);
                }
            }
        }
        result.push(current);
    }
    result
}
