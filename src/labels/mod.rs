use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{FlyerError, Result};
use crate::record::{Drivetrain, FuelType, GearBox, Steering};

include!(concat!(env!("OUT_DIR"), "/embedded_label_packs.rs"));

const PLACEHOLDER: &str = "{}";

/// Versioned code-to-label mapping for one locale, plus the fixed flyer
/// texts that go with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable {
    pub locale: String,
    pub version: u32,
    pub title: String,
    pub qr_caption: String,
    pub bullet: String,
    lines: LineTemplates,
    steering: BTreeMap<String, String>,
    fuel: BTreeMap<String, String>,
    gear_box: BTreeMap<String, String>,
    drivetrain: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct LineTemplates {
    year: String,
    steering: String,
    mileage: String,
    horse_power: String,
}

#[derive(Debug, Deserialize)]
struct LabelPackFile {
    locale: String,
    version: u32,
    text: TextSection,
    lines: LineTemplates,
    #[serde(default)]
    steering: BTreeMap<String, String>,
    #[serde(default)]
    fuel: BTreeMap<String, String>,
    #[serde(default)]
    gear_box: BTreeMap<String, String>,
    #[serde(default)]
    drivetrain: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct TextSection {
    title: String,
    qr_caption: String,
    #[serde(default = "default_bullet")]
    bullet: String,
}

fn default_bullet() -> String {
    "• ".to_string()
}

impl LookupTable {
    /// Loads one of the label packs compiled into the binary.
    pub fn for_locale(code: &str) -> Result<Self> {
        let code = code.trim().to_lowercase();
        let raw = embedded_label_pack(&code).ok_or_else(|| {
            FlyerError::config(format!(
                "unknown locale '{}' (available: {})",
                code,
                EMBEDDED_LOCALES.join(", ")
            ))
        })?;
        Self::from_toml_str(raw, &format!("embedded:{}", code))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|err| {
            FlyerError::config(format!(
                "failed to read label pack {}: {}",
                path.display(),
                err
            ))
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        let parsed: LabelPackFile = toml::from_str(content).map_err(|err| {
            FlyerError::config(format!("failed to parse label pack {}: {}", origin, err))
        })?;
        for (name, template) in [
            ("year", &parsed.lines.year),
            ("steering", &parsed.lines.steering),
            ("mileage", &parsed.lines.mileage),
            ("horse_power", &parsed.lines.horse_power),
        ] {
            if !template.contains(PLACEHOLDER) {
                return Err(FlyerError::config(format!(
                    "label pack {}: line template '{}' has no '{{}}' placeholder",
                    origin, name
                )));
            }
        }
        Ok(LookupTable {
            locale: parsed.locale,
            version: parsed.version,
            title: parsed.text.title,
            qr_caption: parsed.text.qr_caption,
            bullet: parsed.text.bullet,
            lines: parsed.lines,
            steering: parsed.steering,
            fuel: parsed.fuel,
            gear_box: parsed.gear_box,
            drivetrain: parsed.drivetrain,
        })
    }

    pub fn available_locales() -> &'static [&'static str] {
        EMBEDDED_LOCALES
    }

    /// Every piece of text the pack can put on a page.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        [
            &self.title,
            &self.qr_caption,
            &self.bullet,
            &self.lines.year,
            &self.lines.steering,
            &self.lines.mileage,
            &self.lines.horse_power,
        ]
        .into_iter()
        .chain(self.steering.values())
        .chain(self.fuel.values())
        .chain(self.gear_box.values())
        .chain(self.drivetrain.values())
        .map(String::as_str)
    }

    pub fn steering_label(&self, steering: Steering) -> Option<&str> {
        non_empty(self.steering.get(steering.key()))
    }

    pub fn fuel_label(&self, fuel: FuelType) -> Option<&str> {
        fuel.key().and_then(|key| non_empty(self.fuel.get(key)))
    }

    pub fn gear_box_label(&self, gear_box: GearBox) -> Option<&str> {
        gear_box.key().and_then(|key| non_empty(self.gear_box.get(key)))
    }

    pub fn drivetrain_label(&self, drivetrain: Drivetrain) -> Option<&str> {
        drivetrain
            .key()
            .and_then(|key| non_empty(self.drivetrain.get(key)))
    }

    pub fn year_line(&self, value: &str) -> String {
        fill(&self.lines.year, value)
    }

    pub fn steering_line(&self, label: &str) -> String {
        fill(&self.lines.steering, label)
    }

    pub fn mileage_line(&self, value: &str) -> String {
        fill(&self.lines.mileage, value)
    }

    pub fn horse_power_line(&self, value: &str) -> String {
        fill(&self.lines.horse_power, value)
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|label| label.as_str()).filter(|label| !label.trim().is_empty())
}

fn fill(template: &str, value: &str) -> String {
    template.replacen(PLACEHOLDER, value, 1)
}
