use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{FlyerError, Result};
use crate::instructions::Rgb;
use crate::layout::{
    Anchors, LayoutConfig, Orientation, PageGeometry, Position, TextStyle, Typography,
};
use crate::render::FontPaths;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../flyer.toml");

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub page: PageGeometry,
    pub anchors: Anchors,
    pub logo_path: PathBuf,
    pub logo_width_mm: f32,
    pub qr_width_mm: f32,
    pub qr_module_px: u32,
    pub fonts: FontPaths,
    pub typography: Typography,
    pub listing_base_url: String,
    pub locale: String,
    pub labels_path: Option<PathBuf>,
    pub listings_path: PathBuf,
    pub output_dir: PathBuf,
    pub work_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            page: PageGeometry {
                width_mm: 297.0,
                height_mm: 210.0,
                margin_mm: 10.0,
            },
            anchors: Anchors::default(),
            logo_path: PathBuf::from("logo.png"),
            logo_width_mm: 100.0,
            qr_width_mm: 75.0,
            qr_module_px: 10,
            fonts: FontPaths::default(),
            typography: Typography::default(),
            listing_base_url: String::new(),
            locale: "ru".to_string(),
            labels_path: None,
            listings_path: PathBuf::from("listings.json"),
            output_dir: PathBuf::from("."),
            work_dir: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    page: Option<PageSettings>,
    anchors: Option<AnchorSettings>,
    assets: Option<AssetSettings>,
    style: Option<StyleSettings>,
    listing: Option<ListingSettings>,
    source: Option<SourceSettings>,
    output: Option<OutputSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PageSettings {
    width_mm: Option<f32>,
    height_mm: Option<f32>,
    margin_mm: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnchorSettings {
    title: Option<Position>,
    logo: Option<Position>,
    qr_caption: Option<Position>,
    qr_image: Option<Position>,
    generation: Option<Position>,
    characteristics: Option<Position>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AssetSettings {
    logo: Option<String>,
    logo_width_mm: Option<f32>,
    qr_width_mm: Option<f32>,
    qr_module_px: Option<u32>,
    font_regular: Option<String>,
    font_bold: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleSettings {
    text_color: Option<String>,
    title_size: Option<f32>,
    title_line_height: Option<f32>,
    generation_size: Option<f32>,
    generation_line_height: Option<f32>,
    characteristics_size: Option<f32>,
    characteristics_line_height: Option<f32>,
    caption_size: Option<f32>,
    caption_line_height: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListingSettings {
    base_url: Option<String>,
    locale: Option<String>,
    labels: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceSettings {
    listings: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputSettings {
    dir: Option<String>,
    work_dir: Option<String>,
}

/// Embedded defaults, then `flyer.toml` and `flyer.local.toml` from the
/// current directory, then `extra_path`.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    load_settings_in(Path::new("."), extra_path)
}

pub fn load_settings_in(dir: &Path, extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    settings.merge_str(DEFAULT_SETTINGS_TOML, "embedded defaults")?;

    let mut ordered_paths = vec![dir.join("flyer.toml"), dir.join("flyer.local.toml")];
    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(FlyerError::config(format!(
                "settings file not found: {}",
                extra.display()
            )));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|err| {
                FlyerError::config(format!(
                    "failed to read settings {}: {}",
                    path.display(),
                    err
                ))
            })?;
            settings.merge_str(&content, &path.display().to_string())?;
            debug!("settings: merged {}", path.display());
        }
    }

    Ok(settings)
}

impl Settings {
    pub fn layout_config(&self, orientation: Orientation) -> LayoutConfig {
        LayoutConfig {
            page: self.page,
            orientation,
            anchors: self.anchors,
            logo_path: self.logo_path.clone(),
            logo_width_mm: self.logo_width_mm,
            qr_width_mm: self.qr_width_mm,
            listing_base_url: self.listing_base_url.clone(),
            work_dir: self
                .work_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            typography: self.typography,
        }
    }

    fn merge_str(&mut self, content: &str, origin: &str) -> Result<()> {
        let parsed: SettingsFile = toml::from_str(content).map_err(|err| {
            FlyerError::config(format!("failed to parse settings {}: {}", origin, err))
        })?;
        self.merge(parsed, origin)
    }

    fn merge(&mut self, incoming: SettingsFile, origin: &str) -> Result<()> {
        if let Some(page) = incoming.page {
            set(&mut self.page.width_mm, page.width_mm);
            set(&mut self.page.height_mm, page.height_mm);
            set(&mut self.page.margin_mm, page.margin_mm);
        }
        if let Some(anchors) = incoming.anchors {
            let target = &mut self.anchors;
            for (slot, value) in [
                (&mut target.title, anchors.title),
                (&mut target.logo, anchors.logo),
                (&mut target.qr_caption, anchors.qr_caption),
                (&mut target.qr_image, anchors.qr_image),
                (&mut target.generation, anchors.generation),
                (&mut target.characteristics, anchors.characteristics),
            ] {
                if value.is_some() {
                    *slot = value;
                }
            }
        }
        if let Some(assets) = incoming.assets {
            if let Some(logo) = non_blank(assets.logo) {
                self.logo_path = PathBuf::from(logo);
            }
            set(&mut self.logo_width_mm, assets.logo_width_mm);
            set(&mut self.qr_width_mm, assets.qr_width_mm);
            set(&mut self.qr_module_px, assets.qr_module_px);
            if let Some(path) = non_blank(assets.font_regular) {
                self.fonts.regular = Some(PathBuf::from(path));
            }
            if let Some(path) = non_blank(assets.font_bold) {
                self.fonts.bold = Some(PathBuf::from(path));
            }
        }
        if let Some(style) = incoming.style {
            if let Some(color) = non_blank(style.text_color) {
                self.typography.color = Rgb::parse_hex(&color).ok_or_else(|| {
                    FlyerError::config(format!(
                        "settings {}: style.text_color '{}' is not a #rrggbb colour",
                        origin, color
                    ))
                })?;
            }
            let typography = &mut self.typography;
            merge_style(&mut typography.title, style.title_size, style.title_line_height);
            merge_style(
                &mut typography.generation,
                style.generation_size,
                style.generation_line_height,
            );
            merge_style(
                &mut typography.characteristics,
                style.characteristics_size,
                style.characteristics_line_height,
            );
            merge_style(
                &mut typography.caption,
                style.caption_size,
                style.caption_line_height,
            );
        }
        if let Some(listing) = incoming.listing {
            if let Some(url) = non_blank(listing.base_url) {
                self.listing_base_url = url;
            }
            if let Some(locale) = non_blank(listing.locale) {
                self.locale = locale;
            }
            if let Some(labels) = non_blank(listing.labels) {
                self.labels_path = Some(PathBuf::from(labels));
            }
        }
        if let Some(source) = incoming.source {
            if let Some(listings) = non_blank(source.listings) {
                self.listings_path = PathBuf::from(listings);
            }
        }
        if let Some(output) = incoming.output {
            if let Some(dir) = non_blank(output.dir) {
                self.output_dir = PathBuf::from(dir);
            }
            if let Some(dir) = non_blank(output.work_dir) {
                self.work_dir = Some(PathBuf::from(dir));
            }
        }
        Ok(())
    }
}

fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

fn merge_style(target: &mut TextStyle, size_pt: Option<f32>, line_height_mm: Option<f32>) {
    set(&mut target.size_pt, size_pt);
    set(&mut target.line_height_mm, line_height_mm);
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
