use std::path::{Path, PathBuf};

pub mod error;
pub mod flyer;
pub mod font;
pub mod instructions;
pub mod labels;
pub mod layout;
pub mod logging;
pub mod normalize;
pub mod planner;
pub mod qr;
pub mod record;
pub mod render;
pub mod settings;
pub mod source;
mod test_util;
pub mod transient;

pub use error::{FlyerError, Stage};
pub use flyer::{generate, Collaborators, FlyerOutput, FlyerRequest};
pub use instructions::{Alignment, DrawInstruction, FontFace, ImageBlock, Rgb, TextBlock};
pub use labels::LookupTable;
pub use layout::{Anchors, LayoutConfig, Orientation, PageGeometry, PageSize, Position};
pub use normalize::{normalize, NormalizedRecord};
pub use planner::{plan, FlyerPlan};
pub use qr::{QrCodeEncoder, QrEncoder};
pub use record::VehicleRecord;
pub use render::{PageRenderer, PdfRenderer};
pub use source::{JsonListingSource, ListingSource};

#[derive(Debug, Clone)]
pub struct Config {
    pub slug: String,
    pub orientation: Orientation,
    pub settings_path: Option<String>,
    pub output_dir: Option<String>,
    pub source: Option<String>,
    pub locale: Option<String>,
    pub labels: Option<String>,
    pub emit_plan: bool,
}

/// Runs one flyer generation from CLI-level options and returns the text to
/// print on success.
pub fn run(config: Config) -> Result<String, FlyerError> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let mut settings = settings::load_settings(settings_path)?;
    apply_overrides(&mut settings, &config);

    let table = match settings.labels_path.as_deref() {
        Some(path) => LookupTable::from_path(path)?,
        None => LookupTable::for_locale(&settings.locale)?,
    };
    let layout = settings.layout_config(config.orientation);
    tracing::info!(
        "run: slug {} orientation {} locale {}",
        config.slug.trim(),
        config.orientation.as_str(),
        table.locale
    );

    let source = JsonListingSource::new(&settings.listings_path);
    let qr = QrCodeEncoder::new(settings.qr_module_px);
    let renderer = PdfRenderer::new(config.slug.trim(), &settings.fonts)
        .map_err(|err| FlyerError::config(format!("{:#}", err)))?;
    if !config.emit_plan {
        renderer.check_labels(&table)?;
    }
    let collaborators = Collaborators {
        source: &source,
        qr: &qr,
        renderer: &renderer,
    };
    let request = FlyerRequest {
        slug: config.slug.clone(),
        output_dir: settings.output_dir.clone(),
        dry_run: config.emit_plan,
    };

    let output = generate(&request, &layout, &table, &collaborators)?;
    match output.pdf_path {
        Some(path) => Ok(format!("PDF file created: {}", path.display())),
        None => output.plan.to_json(),
    }
}

fn apply_overrides(settings: &mut settings::Settings, config: &Config) {
    if let Some(dir) = non_blank(config.output_dir.as_deref()) {
        settings.output_dir = PathBuf::from(dir);
    }
    if let Some(source) = non_blank(config.source.as_deref()) {
        settings.listings_path = PathBuf::from(source);
    }
    if let Some(locale) = non_blank(config.locale.as_deref()) {
        settings.locale = locale.to_string();
        settings.labels_path = None;
    }
    if let Some(labels) = non_blank(config.labels.as_deref()) {
        settings.labels_path = Some(PathBuf::from(labels));
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
