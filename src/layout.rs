use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::instructions::Rgb;

/// Point on the page in millimetres, measured from the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Position {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Position {
    pub const fn new(x_mm: f32, y_mm: f32) -> Self {
        Self { x_mm, y_mm }
    }
}

impl From<[f32; 2]> for Position {
    fn from([x_mm, y_mm]: [f32; 2]) -> Self {
        Self { x_mm, y_mm }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "P",
            Orientation::Landscape => "L",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "p" | "portrait" => Ok(Orientation::Portrait),
            "l" | "landscape" => Ok(Orientation::Landscape),
            other => Err(format!(
                "invalid orientation '{}' (expected P/portrait or L/landscape)",
                other
            )),
        }
    }
}

/// Configured sheet format. Portrait keeps `width_mm × height_mm`,
/// landscape swaps the two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageGeometry {
    pub fn size(&self, orientation: Orientation) -> PageSize {
        match orientation {
            Orientation::Portrait => PageSize {
                width_mm: self.width_mm,
                height_mm: self.height_mm,
                margin_mm: self.margin_mm,
            },
            Orientation::Landscape => PageSize {
                width_mm: self.height_mm,
                height_mm: self.width_mm,
                margin_mm: self.margin_mm,
            },
        }
    }
}

/// Physical page handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchors {
    pub title: Option<Position>,
    pub logo: Option<Position>,
    pub qr_caption: Option<Position>,
    pub qr_image: Option<Position>,
    pub generation: Option<Position>,
    pub characteristics: Option<Position>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub line_height_mm: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub title: TextStyle,
    pub generation: TextStyle,
    pub characteristics: TextStyle,
    pub caption: TextStyle,
    pub color: Rgb,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            title: TextStyle {
                size_pt: 70.0,
                line_height_mm: 20.0,
            },
            generation: TextStyle {
                size_pt: 35.0,
                line_height_mm: 15.0,
            },
            characteristics: TextStyle {
                size_pt: 28.0,
                line_height_mm: 13.0,
            },
            caption: TextStyle {
                size_pt: 14.0,
                line_height_mm: 10.0,
            },
            color: Rgb::BLACK,
        }
    }
}

/// Everything the planner needs besides the record: page geometry, named
/// anchors, assets and typography.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub page: PageGeometry,
    pub orientation: Orientation,
    pub anchors: Anchors,
    pub logo_path: PathBuf,
    pub logo_width_mm: f32,
    pub qr_width_mm: f32,
    pub listing_base_url: String,
    pub work_dir: PathBuf,
    pub typography: Typography,
}

impl LayoutConfig {
    pub fn page_size(&self) -> PageSize {
        self.page.size(self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_parses_short_and_long_forms() {
        assert_eq!("P".parse::<Orientation>(), Ok(Orientation::Portrait));
        assert_eq!("landscape".parse::<Orientation>(), Ok(Orientation::Landscape));
        assert!("diagonal".parse::<Orientation>().is_err());
    }

    #[test]
    fn landscape_swaps_page_sides() {
        let page = PageGeometry {
            width_mm: 297.0,
            height_mm: 210.0,
            margin_mm: 10.0,
        };
        assert_eq!(page.size(Orientation::Portrait).width_mm, 297.0);
        let landscape = page.size(Orientation::Landscape);
        assert_eq!((landscape.width_mm, landscape.height_mm), (210.0, 297.0));
    }
}
