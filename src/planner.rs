use serde::Serialize;
use std::path::PathBuf;

use crate::error::{FlyerError, Result};
use crate::instructions::{Alignment, DrawInstruction, FontFace, ImageBlock, TextBlock};
use crate::labels::LookupTable;
use crate::layout::{LayoutConfig, PageSize, Position, TextStyle};
use crate::normalize::NormalizedRecord;

/// Planner output: what to encode into the QR image, where the encoded image
/// must be written, and the draw instructions in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlyerPlan {
    pub qr_url: String,
    pub qr_path: PathBuf,
    pub page: PageSize,
    pub instructions: Vec<DrawInstruction>,
}

impl FlyerPlan {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| FlyerError::config(format!("failed to serialize plan: {}", err)))
    }
}

pub fn plan(
    normalized: &NormalizedRecord,
    config: &LayoutConfig,
    table: &LookupTable,
) -> Result<FlyerPlan> {
    let page = config.page_size();
    validate_page(&page)?;
    let anchors = &config.anchors;
    let title_at = resolve_anchor("title", anchors.title, &page)?;
    let logo_at = resolve_anchor("logo", anchors.logo, &page)?;
    let caption_at = resolve_anchor("qr_caption", anchors.qr_caption, &page)?;
    let qr_at = resolve_anchor("qr_image", anchors.qr_image, &page)?;
    let generation_at = resolve_anchor("generation", anchors.generation, &page)?;
    let characteristics_at = resolve_anchor("characteristics", anchors.characteristics, &page)?;

    require_positive("assets.logo_width_mm", config.logo_width_mm)?;
    require_positive("assets.qr_width_mm", config.qr_width_mm)?;
    let typography = &config.typography;
    for (name, style) in [
        ("title", &typography.title),
        ("generation", &typography.generation),
        ("characteristics", &typography.characteristics),
        ("caption", &typography.caption),
    ] {
        validate_style(name, style)?;
    }

    let qr_url = listing_url(&config.listing_base_url, &normalized.slug)?;
    let qr_path = config.work_dir.join(qr_file_name(&normalized.slug));

    let text = |content: String, font, style: &TextStyle, position, alignment, wrap| {
        DrawInstruction::Text(TextBlock {
            content,
            font,
            size_pt: style.size_pt,
            color: typography.color,
            position,
            alignment,
            line_height_mm: style.line_height_mm,
            wrap,
        })
    };

    let mut instructions = Vec::with_capacity(6);
    instructions.push(text(
        table.title.clone(),
        FontFace::Bold,
        &typography.title,
        title_at,
        Alignment::Left,
        false,
    ));
    instructions.push(DrawInstruction::Image(ImageBlock {
        source: config.logo_path.clone(),
        position: logo_at,
        width_mm: config.logo_width_mm,
    }));
    instructions.push(text(
        break_after_commas(&table.qr_caption),
        FontFace::Regular,
        &typography.caption,
        caption_at,
        Alignment::Center,
        true,
    ));
    instructions.push(DrawInstruction::Image(ImageBlock {
        source: qr_path.clone(),
        position: qr_at,
        width_mm: config.qr_width_mm,
    }));
    if let Some(generation) = &normalized.generation_name {
        instructions.push(text(
            generation.clone(),
            FontFace::Bold,
            &typography.generation,
            generation_at,
            Alignment::Left,
            true,
        ));
    }
    let block = normalized
        .lines()
        .map(|line| format!("{}{}", table.bullet, line))
        .collect::<Vec<_>>()
        .join("\n");
    instructions.push(text(
        block,
        FontFace::Bold,
        &typography.characteristics,
        characteristics_at,
        Alignment::Left,
        true,
    ));

    Ok(FlyerPlan {
        qr_url,
        qr_path,
        page,
        instructions,
    })
}

/// Joins the base URL and the slug with exactly one `/`.
pub fn listing_url(base_url: &str, slug: &str) -> Result<String> {
    let base = base_url.trim().trim_end_matches('/');
    if base.is_empty() {
        return Err(FlyerError::config("listing.base_url is empty"));
    }
    Ok(format!("{}/{}", base, slug.trim_start_matches('/')))
}

/// Every comma ends a line in the caption, on top of automatic wrapping.
fn break_after_commas(text: &str) -> String {
    text.replace(',', ",\n")
}

/// Transient QR image name: the readable slug plus a digest of the raw slug,
/// so slugs that sanitize alike never share a file.
pub fn qr_file_name(slug: &str) -> String {
    let digest = format!("{:x}", md5::compute(slug.as_bytes()));
    format!("qr-{}-{}.png", sanitize_slug(slug), &digest[..8])
}

/// File-name-safe form of a slug.
pub fn sanitize_slug(slug: &str) -> String {
    let cleaned: String = slug
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "listing".to_string()
    } else {
        cleaned
    }
}

fn validate_page(page: &PageSize) -> Result<()> {
    require_positive("page.width_mm", page.width_mm)?;
    require_positive("page.height_mm", page.height_mm)?;
    if !page.margin_mm.is_finite() || page.margin_mm < 0.0 {
        return Err(FlyerError::config(format!(
            "page.margin_mm must be a non-negative number, got {}",
            page.margin_mm
        )));
    }
    if page.margin_mm * 2.0 >= page.width_mm {
        return Err(FlyerError::config(format!(
            "page.margin_mm {} leaves no printable width on a {} mm page",
            page.margin_mm, page.width_mm
        )));
    }
    Ok(())
}

fn resolve_anchor(name: &str, anchor: Option<Position>, page: &PageSize) -> Result<Position> {
    let position =
        anchor.ok_or_else(|| FlyerError::config(format!("anchor '{}' is missing", name)))?;
    if !position.x_mm.is_finite() || !position.y_mm.is_finite() {
        return Err(FlyerError::config(format!(
            "anchor '{}' has a non-finite coordinate",
            name
        )));
    }
    if position.x_mm < 0.0
        || position.y_mm < 0.0
        || position.x_mm >= page.width_mm
        || position.y_mm >= page.height_mm
    {
        return Err(FlyerError::config(format!(
            "anchor '{}' at ({}, {}) lies outside the {} x {} mm page",
            name, position.x_mm, position.y_mm, page.width_mm, page.height_mm
        )));
    }
    Ok(position)
}

fn validate_style(name: &str, style: &TextStyle) -> Result<()> {
    require_positive(&format!("style.{}_size", name), style.size_pt)?;
    require_positive(&format!("style.{}_line_height", name), style.line_height_mm)
}

fn require_positive(name: &str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(FlyerError::config(format!(
            "{} must be a positive number, got {}",
            name, value
        )))
    }
}
