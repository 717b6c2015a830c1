mod common;

use std::fs;
use std::path::Path;

use anyhow::anyhow;
use common::{REFERENCE_SLUG, Workspace};
use listing_flyer::{
    Collaborators, Config, DrawInstruction, FlyerError, FlyerRequest, JsonListingSource,
    ListingSource, LookupTable, Orientation, PageRenderer, PageSize, PdfRenderer, QrCodeEncoder,
    QrEncoder, Stage, VehicleRecord, generate,
};
use qrcode::{Color, EcLevel, QrCode};
use tempfile::tempdir;

fn request(workspace: &Workspace, slug: &str) -> FlyerRequest {
    FlyerRequest {
        slug: slug.to_string(),
        output_dir: workspace.output_dir.clone(),
        dry_run: false,
    }
}

#[test]
fn reference_listing_renders_pdf_and_cleans_up_qr() {
    let dir = tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    let settings = workspace.settings();
    let table = LookupTable::from_path(&workspace.labels).expect("labels");
    let layout = settings.layout_config(Orientation::Portrait);

    let source = JsonListingSource::new(&settings.listings_path);
    let qr = QrCodeEncoder::new(4);
    let renderer = PdfRenderer::new(REFERENCE_SLUG, &settings.fonts).expect("renderer");
    let collaborators = Collaborators {
        source: &source,
        qr: &qr,
        renderer: &renderer,
    };

    let output = generate(
        &request(&workspace, REFERENCE_SLUG),
        &layout,
        &table,
        &collaborators,
    )
    .expect("flyer");

    let pdf_path = output.pdf_path.expect("pdf path");
    assert_eq!(pdf_path, workspace.output_dir.join("toyota-camry-123.pdf"));
    let bytes = fs::read(&pdf_path).expect("read pdf");
    assert!(bytes.starts_with(b"%PDF"));

    let plan = output.plan;
    assert_eq!(
        plan.qr_url,
        "https://www.mashina.kg/details/toyota-camry-123"
    );
    assert!(!plan.qr_path.exists());
    assert!(workspace.png_files_in_work_dir().is_empty());

    let texts: Vec<&str> = plan
        .instructions
        .iter()
        .filter_map(DrawInstruction::as_text)
        .map(|block| block.content.as_str())
        .collect();
    assert_eq!(texts.len(), 4);
    assert_eq!(texts[2], "XV50");
    assert_eq!(
        texts[3].lines().collect::<Vec<_>>(),
        vec![
            "- 2015",
            "- left-hand drive",
            "- Diesel",
            "- Automatic",
            "- All-wheel drive",
            "- 45 000 km",
            "- 150 hp",
        ]
    );
}

#[test]
fn landscape_page_swaps_dimensions() {
    let dir = tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    let settings = workspace.settings();
    let table = LookupTable::from_path(&workspace.labels).expect("labels");
    let layout = settings.layout_config(Orientation::Landscape);
    let source = JsonListingSource::new(&settings.listings_path);
    let qr = QrCodeEncoder::new(2);
    let renderer = PdfRenderer::new("bare", &settings.fonts).expect("renderer");
    let collaborators = Collaborators {
        source: &source,
        qr: &qr,
        renderer: &renderer,
    };

    let output = generate(
        &request(&workspace, "bare-listing"),
        &layout,
        &table,
        &collaborators,
    )
    .expect("flyer");
    assert_eq!(
        (output.plan.page.width_mm, output.plan.page.height_mm),
        (210.0, 297.0)
    );
    let block = output
        .plan
        .instructions
        .last()
        .and_then(DrawInstruction::as_text)
        .expect("characteristics");
    assert_eq!(block.content, "");
    assert!(output.pdf_path.expect("pdf").exists());
}

#[test]
fn missing_listing_is_not_found_and_writes_nothing() {
    let dir = tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    let settings = workspace.settings();
    let table = LookupTable::from_path(&workspace.labels).expect("labels");
    let layout = settings.layout_config(Orientation::Portrait);
    let source = JsonListingSource::new(&settings.listings_path);
    let qr = QrCodeEncoder::default();
    let renderer = PdfRenderer::new("missing", &settings.fonts).expect("renderer");
    let collaborators = Collaborators {
        source: &source,
        qr: &qr,
        renderer: &renderer,
    };

    let err = generate(
        &request(&workspace, "no-such-listing"),
        &layout,
        &table,
        &collaborators,
    )
    .expect_err("not found");
    assert!(matches!(err, FlyerError::NotFound { ref slug } if slug == "no-such-listing"));
    assert!(!workspace.output_dir.join("no-such-listing.pdf").exists());
    assert!(workspace.png_files_in_work_dir().is_empty());
}

struct FailingRenderer;

impl PageRenderer for FailingRenderer {
    fn render(
        &self,
        _instructions: &[DrawInstruction],
        _page: &PageSize,
        dest: &Path,
    ) -> anyhow::Result<()> {
        fs::write(dest, b"%PDF-partial")?;
        Err(anyhow!("printer on fire"))
    }
}

#[test]
fn render_failure_is_collaborator_error_and_qr_is_removed() {
    let dir = tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    let settings = workspace.settings();
    let table = LookupTable::from_path(&workspace.labels).expect("labels");
    let layout = settings.layout_config(Orientation::Portrait);
    let source = JsonListingSource::new(&settings.listings_path);
    let qr = QrCodeEncoder::new(2);
    let collaborators = Collaborators {
        source: &source,
        qr: &qr,
        renderer: &FailingRenderer,
    };

    let err = generate(
        &request(&workspace, REFERENCE_SLUG),
        &layout,
        &table,
        &collaborators,
    )
    .expect_err("render failure");
    assert!(matches!(
        err,
        FlyerError::Collaborator {
            stage: Stage::Rendering,
            ..
        }
    ));
    assert!(workspace.work_dir.exists());
    assert!(workspace.png_files_in_work_dir().is_empty());
    assert!(!workspace.output_dir.join("toyota-camry-123.pdf").exists());
}

struct BrokenStore;

impl ListingSource for BrokenStore {
    fn fetch_listing(&self, _slug: &str) -> anyhow::Result<Option<VehicleRecord>> {
        Err(anyhow!("connection refused"))
    }
}

#[test]
fn store_failure_is_distinct_from_not_found() {
    let dir = tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    let settings = workspace.settings();
    let table = LookupTable::from_path(&workspace.labels).expect("labels");
    let layout = settings.layout_config(Orientation::Portrait);
    let qr = QrCodeEncoder::default();
    let collaborators = Collaborators {
        source: &BrokenStore,
        qr: &qr,
        renderer: &FailingRenderer,
    };

    let err = generate(
        &request(&workspace, REFERENCE_SLUG),
        &layout,
        &table,
        &collaborators,
    )
    .expect_err("store failure");
    assert!(matches!(
        err,
        FlyerError::Collaborator {
            stage: Stage::DataSource,
            ..
        }
    ));
    assert_eq!(err.exit_code(), 1);
}

/// Keeps a copy of every encoded image outside the work dir.
struct KeepingQr {
    inner: QrCodeEncoder,
    keep: std::path::PathBuf,
}

impl QrEncoder for KeepingQr {
    fn encode(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        self.inner.encode(url, dest)?;
        fs::copy(dest, &self.keep)?;
        Ok(())
    }
}

#[test]
fn qr_image_encodes_the_listing_url() {
    let dir = tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    let settings = workspace.settings();
    let table = LookupTable::from_path(&workspace.labels).expect("labels");
    let layout = settings.layout_config(Orientation::Portrait);
    let source = JsonListingSource::new(&settings.listings_path);
    let module_px = 2;
    let qr = KeepingQr {
        inner: QrCodeEncoder::new(module_px),
        keep: dir.path().join("kept-qr.png"),
    };
    let renderer = PdfRenderer::new(REFERENCE_SLUG, &settings.fonts).expect("renderer");
    let collaborators = Collaborators {
        source: &source,
        qr: &qr,
        renderer: &renderer,
    };

    let output = generate(
        &request(&workspace, REFERENCE_SLUG),
        &layout,
        &table,
        &collaborators,
    )
    .expect("flyer");

    let image = image::open(&qr.keep).expect("open qr").to_luma8();
    let code = QrCode::with_error_correction_level(output.plan.qr_url.as_bytes(), EcLevel::L)
        .expect("qr");
    let modules = code.width() as u32;
    let quiet = 4;
    assert_eq!(image.width(), (modules + quiet * 2) * module_px);
    for (idx, color) in code.to_colors().into_iter().enumerate() {
        let mx = idx as u32 % modules;
        let my = idx as u32 / modules;
        let pixel = image.get_pixel((quiet + mx) * module_px, (quiet + my) * module_px);
        assert_eq!(pixel.0[0] == 0, color == Color::Dark, "module ({}, {})", mx, my);
    }
}

#[test]
fn russian_labels_without_fonts_are_rejected_before_rendering() {
    let dir = tempdir().expect("tempdir");
    let workspace = Workspace::new(dir.path());
    workspace.settings();
    let settings_path = dir.path().join("test-settings.toml");

    let err = listing_flyer::run(Config {
        slug: REFERENCE_SLUG.to_string(),
        orientation: Orientation::Portrait,
        settings_path: Some(settings_path.display().to_string()),
        output_dir: None,
        source: None,
        locale: Some("ru".to_string()),
        labels: None,
        emit_plan: false,
    })
    .expect_err("cyrillic labels need a TTF font");

    assert!(matches!(err, FlyerError::Configuration(_)));
    assert_eq!(err.exit_code(), 3);
    assert!(!workspace.output_dir.join("toyota-camry-123.pdf").exists());
    assert!(workspace.png_files_in_work_dir().is_empty());
}
